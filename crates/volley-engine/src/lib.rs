// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chained-timeout continuation engine for Volley.
//!
//! A blast walks its recipient list one step per HTTP invocation. Between
//! steps the service keeps nothing in memory: each step ends by asking an
//! external timer to call back later, with the next action encoded in the
//! callback path.
//!
//! - [`split`]: transport-sized message chunks.
//! - [`payload`]: the callback payload codec and routing.
//! - [`dispatch`]: capped waits with remainder chaining.
//! - [`blast`]: the blast state machine.
//! - [`continuation`]: the callback entry point.

pub mod blast;
pub mod continuation;
pub mod dispatch;
pub mod payload;
pub mod split;

pub use blast::{BlastRunner, DeliveryOutcome, StepOutcome};
pub use continuation::{ContinuationHandler, ContinuationOutcome};
pub use dispatch::{TimeoutDispatcher, WaitPlan};
pub use payload::{Continuation, Params};
pub use split::{Separator, split, split_message};
