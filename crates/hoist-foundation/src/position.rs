//! Source ranges and the selection containment predicate

use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` in the current session text.
///
/// Both a caller's selection and a syntax node's recorded extent are
/// expressed as a `SourcePosition`; all offsets are byte offsets into the
/// text the session currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePosition {
    /// Starting byte offset (inclusive)
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
}

impl SourcePosition {
    /// Create a new position
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Check if this position fully contains `node`.
    ///
    /// A node `[ns, ne)` is contained by a selection `[ss, se)` iff
    /// `ss <= ns && ne <= se`. A selection must enclose the whole node;
    /// mere overlap does not match. Boundary-equal ranges match.
    pub fn contains(&self, node: &SourcePosition) -> bool {
        self.start <= node.start && node.end <= self.end
    }

    /// Number of bytes spanned by this position
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range spans zero bytes
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Extract the text within this range from `source`.
    ///
    /// Returns `None` if the range is out of bounds or does not fall on
    /// UTF-8 character boundaries.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_inner_range() {
        let selection = SourcePosition::new(10, 20);

        assert!(selection.contains(&SourcePosition::new(12, 18)));
        assert!(selection.contains(&SourcePosition::new(10, 15)));
        assert!(selection.contains(&SourcePosition::new(15, 20)));
    }

    #[test]
    fn test_contains_boundary_equal() {
        let selection = SourcePosition::new(10, 20);
        assert!(selection.contains(&SourcePosition::new(10, 20)));
    }

    #[test]
    fn test_overlap_without_containment_is_excluded() {
        let selection = SourcePosition::new(10, 20);

        assert!(!selection.contains(&SourcePosition::new(9, 15)));
        assert!(!selection.contains(&SourcePosition::new(15, 21)));
        assert!(!selection.contains(&SourcePosition::new(9, 21)));
    }

    #[test]
    fn test_selection_inside_node_does_not_match() {
        // Selecting a sub-span of an expression must not match the
        // expression itself.
        let selection = SourcePosition::new(12, 14);
        assert!(!selection.contains(&SourcePosition::new(10, 20)));
    }

    #[test]
    fn test_slice() {
        let source = "const x = 42;";
        assert_eq!(SourcePosition::new(10, 12).slice(source), Some("42"));
        assert_eq!(SourcePosition::new(10, 50).slice(source), None);
    }

    #[test]
    fn test_len_and_is_empty() {
        assert_eq!(SourcePosition::new(3, 8).len(), 5);
        assert!(!SourcePosition::new(3, 8).is_empty());
        assert!(SourcePosition::new(8, 8).is_empty());
    }

    #[test]
    fn test_serde_shape() {
        let pos = SourcePosition::new(4, 9);
        let json = serde_json::to_value(pos).unwrap();
        assert_eq!(json, serde_json::json!({ "start": 4, "end": 9 }));
    }
}
