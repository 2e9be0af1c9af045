//! One editing session over one piece of source text.

use hoist_foundation::{
    ExpressionDescriptor, HoistError, HoistResult, MappingSegment, SourcePosition,
};
use swc_ecma_parser::{EsSyntax, Syntax, TsSyntax};
use tracing::debug;

use crate::parser::{self, ParsedProgram};
use crate::refactoring::{self, VariableExtractor};
use crate::transformer;

/// Syntax flavor for a session's source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Parse TypeScript syntax instead of plain ECMAScript
    pub typescript: bool,
    /// Parse TSX (implies TypeScript)
    pub tsx: bool,
}

impl SessionOptions {
    fn syntax(self) -> Syntax {
        if self.typescript || self.tsx {
            Syntax::Typescript(TsSyntax {
                tsx: self.tsx,
                ..Default::default()
            })
        } else {
            Syntax::Es(EsSyntax::default())
        }
    }
}

/// Owns the current text, tree, and source map of one editing session.
///
/// The three always describe the same version of the program: a mutation
/// replaces them together after the whole rewrite-print-reparse pipeline
/// has succeeded, and any failure leaves them exactly as they were. One
/// session serves one logical caller at a time; operations are synchronous
/// and never retried.
pub struct RefactorSession {
    text: String,
    program: ParsedProgram,
    map: Vec<MappingSegment>,
}

impl RefactorSession {
    /// Parse `source` as ECMAScript and open a session over it.
    ///
    /// A parse failure is surfaced unchanged and no session comes into
    /// existence.
    pub fn new(source: &str) -> HoistResult<Self> {
        Self::with_options(source, SessionOptions::default())
    }

    /// Parse `source` with an explicit syntax flavor.
    pub fn with_options(source: &str, options: SessionOptions) -> HoistResult<Self> {
        let program = parser::parse_source(source, options.syntax())?;
        Ok(Self {
            text: program.text.clone(),
            program,
            // a freshly parsed session starts from the identity map
            map: Vec::new(),
        })
    }

    /// The session's current source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Source map produced by the most recent mutation; empty until one
    /// succeeds.
    pub fn source_map(&self) -> &[MappingSegment] {
        &self.map
    }

    /// Every expression whose range the selection fully contains, in
    /// document order.
    ///
    /// Read-only and repeatable. Fails with
    /// [`HoistError::ExpressionNotFound`] instead of returning an empty
    /// sequence.
    pub fn find_expressions(
        &self,
        selection: SourcePosition,
    ) -> HoistResult<Vec<ExpressionDescriptor>> {
        let matches = refactoring::find_contained_expressions(&self.program, selection);
        debug!(
            start = selection.start,
            end = selection.end,
            count = matches.len(),
            "find expressions"
        );
        if matches.is_empty() {
            return Err(HoistError::ExpressionNotFound);
        }
        Ok(matches
            .into_iter()
            .map(|range| ExpressionDescriptor::from_source(&self.text, range))
            .collect())
    }

    /// Extract the selected expression(s) into fresh `const` bindings and
    /// return the rewritten source text.
    ///
    /// On success the session's text, tree, and source map are replaced
    /// together with the printer's output. When the selection contains no
    /// expression the call fails with [`HoistError::ExpressionNotFound`]
    /// and the printer is never invoked, so the session state is left
    /// byte-for-byte as it was.
    pub fn extract_variable(&mut self, selection: SourcePosition) -> HoistResult<String> {
        let mut extractor = VariableExtractor::new(&self.program, selection);
        let module = transformer::rewrite(&self.program, &mut extractor);
        let extracted = extractor.finish()?;
        if extracted == 0 {
            return Err(HoistError::ExpressionNotFound);
        }
        debug!(
            start = selection.start,
            end = selection.end,
            extracted,
            "extract variable"
        );

        let output = transformer::print(&self.program, &module)?;
        self.text = output.code;
        self.program = output.program;
        self.map = output.map;
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection_of(source: &str, needle: &str) -> SourcePosition {
        let start = source.find(needle).unwrap();
        SourcePosition::new(start, start + needle.len())
    }

    #[test]
    fn test_new_rejects_invalid_source() {
        assert!(matches!(
            RefactorSession::new("const x = (;"),
            Err(HoistError::Parse { .. })
        ));
    }

    #[test]
    fn test_typescript_option() {
        let source = "let total: number = price * qty;";
        assert!(RefactorSession::new(source).is_err());

        let session = RefactorSession::with_options(
            source,
            SessionOptions {
                typescript: true,
                tsx: false,
            },
        )
        .unwrap();
        let found = session
            .find_expressions(selection_of(source, "price * qty"))
            .unwrap();
        assert_eq!(found[0].text, "price * qty");
    }

    #[test]
    fn test_find_expressions_is_read_only_and_repeatable() {
        let source = "function f() { return a + b; }";
        let session = RefactorSession::new(source).unwrap();
        let selection = selection_of(source, "a + b");

        let first = session.find_expressions(selection).unwrap();
        let second = session.find_expressions(selection).unwrap();
        assert_eq!(first, second);
        assert_eq!(session.text(), source);
    }

    #[test]
    fn test_failed_extract_leaves_state_untouched() {
        let source = "function f() { return a + b; }";
        let mut session = RefactorSession::new(source).unwrap();
        let probe = selection_of(source, "a + b");
        let before = session.find_expressions(probe).unwrap();

        let result = session.extract_variable(SourcePosition::new(0, 2));
        assert!(matches!(result, Err(HoistError::ExpressionNotFound)));

        assert_eq!(session.text(), source);
        assert!(session.source_map().is_empty());
        assert_eq!(session.find_expressions(probe).unwrap(), before);
    }

    #[test]
    fn test_successful_extract_swaps_state() {
        let source = "function f() { return a + b; }";
        let mut session = RefactorSession::new(source).unwrap();
        let new_text = session
            .extract_variable(selection_of(source, "a + b"))
            .unwrap();

        assert_eq!(session.text(), new_text);
        assert!(!session.source_map().is_empty());
        assert!(new_text.contains("const _ref = a + b;"));
        assert!(new_text.contains("return _ref;"));
    }
}
