// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The observer bus: non-blocking fan-out of [`orgloop_core::ObserverEvent`]
//! to registered [`orgloop_core::Logger`] sinks (§4.8).
//!
//! Every stage of the pipeline (source polling, route matching, transform
//! execution, delivery) emits into one [`bus::ObserverBus`]. Each registered
//! logger gets its own bounded channel and dedicated task; a slow or full
//! logger only drops events for itself and never pushes back on the caller.

pub mod bus;
pub mod console;

pub use bus::ObserverBus;
pub use console::ConsoleLogger;
