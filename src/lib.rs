//! Stratforge: a rule-based trading strategy builder
//!
//! The crate is organized around a static indicator catalog, a strategy data
//! model, editor binder logic that keeps strategies internally consistent,
//! and code generators that render a strategy as an executable script, a
//! pseudocode document, or a JSON export.

pub mod catalog;
pub mod codegen;
pub mod config;
pub mod core;
pub mod editor;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod store;
