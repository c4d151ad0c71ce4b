//! Fixtures for sample trace generation.
//!
//! Provides ready-made backend reports (a tabulated fibonacci run, a
//! recursive fibonacci run) and a small report builder for tests that need
//! precise control over steps, tables, and the update log.

pub mod fixtures;

pub use fixtures::{ReportBuilder, report_builder};
