// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface of the blast service.
//!
//! Two kinds of traffic reach it: an operator (or another system) triggering
//! a blast through `/blast/{token}`, and the external scheduler calling
//! `/timeout/{payload}` when a wait elapses. Every callback is handled
//! statelessly by the engine's [`ContinuationHandler`](volley_engine::ContinuationHandler).

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use server::{GatewayState, HealthState, build_router, serve_listener, start_server};
