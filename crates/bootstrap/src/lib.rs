// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! One-shot bootstrap of a document database.
//!
//! ```no_run
//! # async fn example(session: &docinit_server::memory::MemorySession) -> docinit_type::Result<()> {
//! use docinit_bootstrap::Bootstrapper;
//! use docinit_type::Plan;
//!
//! let report = Bootstrapper::new(Plan::default())?.run(session).await?;
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod bootstrapper;
pub mod preflight;
mod report;
mod verify;

pub use bootstrapper::Bootstrapper;
pub use report::{Report, Step, StepReport};
pub use verify::{Check, Verification};
