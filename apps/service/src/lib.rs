//! Service health-monitoring engine.
//!
//! Register HTTP(S) endpoints, poll each on an independent timer, and
//! read back a consistent snapshot of every target's health. The
//! presentation layer consumes [`registry::Registry`],
//! [`status::StatusStore`], and [`monitoring::Scheduler`] through an
//! [`engine::Engine`].

pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod monitoring;
pub mod pool;
pub mod registry;
pub mod status;
pub mod validation;
