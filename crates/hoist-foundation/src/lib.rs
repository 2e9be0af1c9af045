//! Foundation layer for the hoist refactoring engine.
//!
//! This crate provides the caller-facing building blocks shared by the
//! engine and its consumers:
//! - Source ranges and the selection containment predicate
//! - Expression snapshots returned from queries
//! - Printer source-map segments
//! - The error taxonomy for parse, selection, and transformation failures

pub mod descriptor;
pub mod error;
pub mod position;

// Re-export commonly used types for convenience
pub use descriptor::{ExpressionDescriptor, MappingSegment};
pub use error::{HoistError, HoistResult};
pub use position::SourcePosition;
