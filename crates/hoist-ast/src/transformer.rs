//! Transform and print entries of the external swc toolkit.
//!
//! A rewrite runs a single-use visitor over a copy of the session's tree;
//! printing regenerates text plus a source map from the rewritten tree and
//! re-parses the output so the returned tree's spans address the returned
//! text. Callers decide between the two steps, which keeps a zero-match
//! traversal from ever reaching the printer.

use hoist_foundation::{HoistError, HoistResult, MappingSegment};
use swc_ecma_ast::Module;
use swc_ecma_codegen::{text_writer::JsWriter, Emitter};
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::parser::{self, ParsedProgram};

/// Result of printing a rewritten tree: regenerated text, a program
/// re-parsed from that text, and the printer's source map.
pub struct TransformOutput {
    pub code: String,
    pub program: ParsedProgram,
    pub map: Vec<MappingSegment>,
}

/// Apply a single-use visitor to a copy of the program's tree.
///
/// The program itself is left untouched; the caller owns the rewritten
/// copy and decides whether it ever gets printed.
pub fn rewrite<V: VisitMut>(program: &ParsedProgram, visitor: &mut V) -> Module {
    let mut module = program.module.clone();
    module.visit_mut_with(visitor);
    module
}

/// Print a rewritten tree and re-derive a consistent program from it.
pub fn print(program: &ParsedProgram, module: &Module) -> HoistResult<TransformOutput> {
    let (code, map) = emit(program, module)?;
    let reparsed = parser::parse_source(&code, program.syntax)
        .map_err(|e| HoistError::transformation(format!("printed output failed to re-parse: {e}")))?;
    Ok(TransformOutput {
        code,
        program: reparsed,
        map,
    })
}

fn emit(program: &ParsedProgram, module: &Module) -> HoistResult<(String, Vec<MappingSegment>)> {
    let mut buf = vec![];
    let mut src_map_buf = vec![];
    {
        let mut emitter = Emitter {
            cfg: Default::default(),
            cm: program.source_map.clone(),
            comments: None,
            wr: JsWriter::new(
                program.source_map.clone(),
                "\n",
                &mut buf,
                Some(&mut src_map_buf),
            ),
        };

        emitter
            .emit_module(module)
            .map_err(|e| HoistError::transformation(format!("Failed to emit code: {:?}", e)))?;
    }

    let code = String::from_utf8(buf)
        .map_err(|e| HoistError::transformation(format!("Emitted code is not UTF-8: {}", e)))?;

    // Mappings for synthesized nodes carry dummy positions outside the
    // parsed file; only positions that resolve become segments.
    let base = program.file.start_pos;
    let map = src_map_buf
        .iter()
        .filter(|(pos, _)| *pos >= base)
        .map(|(pos, line_col)| MappingSegment {
            generated_line: line_col.line,
            generated_col: line_col.col,
            original_offset: (*pos - base).0,
        })
        .collect();

    Ok((code, map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_ecma_parser::{EsSyntax, Syntax};

    struct Noop;

    impl VisitMut for Noop {}

    fn parse(source: &str) -> ParsedProgram {
        parser::parse_source(source, Syntax::Es(EsSyntax::default())).unwrap()
    }

    #[test]
    fn test_print_regenerates_text() {
        let program = parse("const x = 1;");
        let mut noop = Noop;
        let module = rewrite(&program, &mut noop);
        let output = print(&program, &module).unwrap();
        assert_eq!(output.code.trim(), "const x = 1;");
        assert_eq!(output.program.text, output.code);
    }

    #[test]
    fn test_print_produces_mappings() {
        let program = parse("const x = 1;\nconst y = 2;");
        let mut noop = Noop;
        let module = rewrite(&program, &mut noop);
        let output = print(&program, &module).unwrap();
        assert!(!output.map.is_empty());
        assert!(output
            .map
            .iter()
            .all(|segment| (segment.original_offset as usize) < program.text.len()));
    }

    #[test]
    fn test_rewrite_leaves_program_untouched() {
        let program = parse("const x = 1;");
        let before = program.text.clone();
        let mut noop = Noop;
        let _ = rewrite(&program, &mut noop);
        assert_eq!(program.text, before);
    }
}
