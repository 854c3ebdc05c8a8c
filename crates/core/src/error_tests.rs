// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    config_invalid = { EngineError::ConfigInvalid("bad".into()), true },
    bus_corruption = { EngineError::BusCorruption { offset: 0, message: "bad".into() }, true },
    source_transient = { EngineError::SourceTransient { source_id: "s".into(), message: "m".into() }, false },
    source_fatal = { EngineError::SourceFatal { source_id: "s".into(), message: "m".into() }, false },
    transform_error = { EngineError::TransformError { route_name: "r".into(), message: "m".into() }, false },
    delivery_rejected = { EngineError::DeliveryRejected { actor_id: "a".into(), message: "m".into() }, false },
    delivery_error = { EngineError::DeliveryError { actor_id: "a".into(), message: "m".into() }, false },
    checkpoint_write_error = { EngineError::CheckpointWriteError { source_id: "s".into(), message: "m".into() }, false },
)]
fn is_fatal_matches_taxonomy(err: EngineError, expected: bool) {
    assert_eq!(err.is_fatal(), expected);
}
