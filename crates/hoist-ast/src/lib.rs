//! hoist-ast: selection matching and extract-variable transformation for
//! JavaScript/TypeScript source.
//!
//! A [`RefactorSession`] parses source text once through the swc toolkit
//! and then answers two requests against its tree: enumerate every
//! expression a byte-range selection fully contains, and hoist a selected
//! expression into a freshly named `const` binding in its nearest
//! enclosing scope. Parsing, traversal, and printing belong to swc; this
//! crate owns the matching, naming, insertion, and session-state logic.

pub mod parser;
pub mod refactoring;
pub mod scope;
pub mod session;
pub mod transformer;

// Error and protocol types
pub use hoist_foundation::{
    ExpressionDescriptor, HoistError, HoistResult, MappingSegment, SourcePosition,
};

// Session
pub use session::{RefactorSession, SessionOptions};
