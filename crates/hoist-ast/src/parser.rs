//! Parse entry of the external swc toolkit.
//!
//! Everything the engine knows about source text it learns here: one parse
//! produces the module tree, the swc source map the tree's spans point
//! into, and the offset base needed to translate those spans back into
//! byte ranges of the text itself.

use hoist_foundation::{HoistError, HoistResult, SourcePosition};
use swc_common::sync::Lrc;
use swc_common::{BytePos, FileName, FilePathMapping, SourceFile, SourceMap, Span};
use swc_ecma_ast::Module;
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax};

/// A parsed program: the text, its tree, and the span coordinate base.
pub struct ParsedProgram {
    /// The text the tree was parsed from, echoed unchanged
    pub text: String,
    /// Module tree owned by this parse
    pub module: Module,
    /// swc source map the tree's spans are allocated in
    pub source_map: Lrc<SourceMap>,
    /// The single source file backing the parse
    pub file: Lrc<SourceFile>,
    /// Syntax flavor used, retained so a re-parse stays in the same flavor
    pub syntax: Syntax,
}

impl ParsedProgram {
    /// Translate a node span into a byte range of `text`.
    pub fn position_of(&self, span: Span) -> Option<SourcePosition> {
        self.span_index().position_of(span)
    }

    /// Copyable span translator for traversals that cannot borrow the
    /// whole program.
    pub fn span_index(&self) -> SpanIndex {
        SpanIndex {
            file_start: self.file.start_pos,
            text_len: self.text.len(),
        }
    }
}

/// Translates spans, which swc allocates as absolute positions within its
/// source map, into byte ranges relative to the parsed text.
#[derive(Debug, Clone, Copy)]
pub struct SpanIndex {
    file_start: BytePos,
    text_len: usize,
}

impl SpanIndex {
    /// Byte range of `span`, or `None` for spans outside the parsed file
    /// (synthesized nodes carry dummy spans and never resolve).
    pub fn position_of(&self, span: Span) -> Option<SourcePosition> {
        if span.lo < self.file_start || span.hi < span.lo {
            return None;
        }
        let start = (span.lo - self.file_start).0 as usize;
        let end = (span.hi - self.file_start).0 as usize;
        if end > self.text_len {
            return None;
        }
        Some(SourcePosition::new(start, end))
    }
}

/// Parse `source` with the given syntax flavor.
///
/// Diagnostics the parser recovered from still fail the parse: a session
/// must never come into existence over a tree the parser only guessed at.
pub fn parse_source(source: &str, syntax: Syntax) -> HoistResult<ParsedProgram> {
    let cm: Lrc<SourceMap> = Lrc::new(SourceMap::new(FilePathMapping::empty()));
    let file = cm.new_source_file(Lrc::new(FileName::Anon), source.to_string());

    let lexer = Lexer::new(
        syntax,
        Default::default(),
        StringInput::from(&*file),
        None,
    );
    let mut parser = Parser::new_from(lexer);

    let module = parser
        .parse_module()
        .map_err(|e| HoistError::parse(format!("{:?}", e)))?;

    let recovered = parser.take_errors();
    if !recovered.is_empty() {
        return Err(HoistError::parse(format!("{:?}", recovered)));
    }

    Ok(ParsedProgram {
        text: source.to_string(),
        module,
        source_map: cm,
        file,
        syntax,
    })
}
