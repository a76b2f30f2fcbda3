//! quizlearn-core: quiz engine, session store, and analytics.
//!
//! This crate defines the data model, question bank, quiz state machine,
//! and the pure analytics/leaderboard functions that the report writers
//! and the command-line front end build on.

pub mod bank;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod model;
pub mod session;
pub mod statistics;
pub mod traits;
