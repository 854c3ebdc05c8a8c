// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn deliver_outcome_constructors_set_expected_result_and_error() {
    let delivered = DeliverOutcome::delivered();
    assert_eq!(delivered.result, DeliverResult::Delivered);
    assert!(delivered.error.is_none());

    let rejected = DeliverOutcome::rejected("nope");
    assert_eq!(rejected.result, DeliverResult::Rejected);
    assert_eq!(rejected.error.as_deref(), Some("nope"));

    let errored = DeliverOutcome::error("timeout");
    assert_eq!(errored.result, DeliverResult::Error);
    assert_eq!(errored.error.as_deref(), Some("timeout"));
}

#[test]
fn poll_outcome_default_is_empty() {
    let outcome = PollOutcome::default();
    assert!(outcome.events.is_empty());
    assert!(outcome.checkpoint.is_none());
}
