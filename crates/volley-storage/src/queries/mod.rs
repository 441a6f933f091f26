// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for blast progress, recipients, and delivery claims.

pub mod blasts;
pub mod deliveries;
pub mod recipients;
