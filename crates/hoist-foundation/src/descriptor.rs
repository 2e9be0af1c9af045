//! Caller-facing snapshots of matched expressions and printer mappings

use crate::position::SourcePosition;
use serde::{Deserialize, Serialize};

/// Serialized view of a matched expression node.
///
/// A descriptor is a value snapshot, independent of the syntax tree that
/// produced it: it stays valid after the session is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionDescriptor {
    /// Source text of the expression
    pub text: String,
    /// Range of the expression in the text it was sliced from
    pub range: SourcePosition,
}

impl ExpressionDescriptor {
    /// Snapshot the expression at `range` out of `source`.
    ///
    /// Total over any node range produced by the current tree; out-of-tree
    /// ranges yield an empty text rather than a panic.
    pub fn from_source(source: &str, range: SourcePosition) -> Self {
        Self {
            text: range.slice(source).unwrap_or_default().to_string(),
            range,
        }
    }
}

/// One printer source-map segment: a position in the generated text paired
/// with the byte offset of the original text it was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingSegment {
    /// Line in the generated text (0-based)
    pub generated_line: u32,
    /// Column in the generated text (0-based)
    pub generated_col: u32,
    /// Byte offset in the original text
    pub original_offset: u32,
}
