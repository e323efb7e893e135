//! Editor binder logic: keeps conditions and risk rule lists internally
//! consistent across user edits. UI-agnostic; callers own the state.

pub mod condition;
pub mod risk;

pub use condition::{ConditionEditor, EditOutcome};
