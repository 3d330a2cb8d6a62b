// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod smoke;
pub mod stats;
pub mod user;

pub use smoke::SmokeEvent;
pub use stats::{DashboardSavings, LifetimeSavings, SavingsRecord, WindowCounts};
pub use user::{Credentials, Currency, User};
