// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! orgloop-router: the route matcher (§4.5) and transform pipeline (§4.6).

pub mod error;
pub mod index;
pub mod pathset;
pub mod pipeline;
pub mod transforms;
pub mod validate;

pub use error::RouterError;
pub use index::RouteIndex;
pub use pipeline::{PipelineOutcome, RoutePipeline};
pub use transforms::{build_transform, GateCapability, TransformDeps, KNOWN_TRANSFORM_KINDS};
pub use validate::validate_routes;
