//! The two traversals of the refactoring engine: expression collection for
//! queries and the extract-variable rewrite for mutations.

use std::collections::HashSet;

use hoist_foundation::{HoistError, HoistResult, SourcePosition};
use swc_common::util::take::Take;
use swc_common::{Spanned, SyntaxContext, DUMMY_SP};
use swc_ecma_ast::{
    ArrowExpr, BindingIdent, BlockStmt, BlockStmtOrExpr, CatchClause, Constructor, Decl, Expr,
    Function, Ident, Module, ModuleItem, ParamOrTsParamProp, Pat, ReturnStmt, Stmt,
    TsParamPropParam, VarDecl, VarDeclKind, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitMut, VisitMutWith, VisitWith};
use tracing::debug;

use crate::parser::{ParsedProgram, SpanIndex};
use crate::scope::{self, ScopeTable};

/// Collect the range of every expression node contained by `selection`, in
/// document order. Read-only: the tree is never marked or altered.
pub fn find_contained_expressions(
    program: &ParsedProgram,
    selection: SourcePosition,
) -> Vec<SourcePosition> {
    let mut collector = ExpressionCollector {
        selection,
        spans: program.span_index(),
        matches: Vec::new(),
    };
    program.module.visit_with(&mut collector);
    collector.matches
}

struct ExpressionCollector {
    selection: SourcePosition,
    spans: SpanIndex,
    matches: Vec<SourcePosition>,
}

impl Visit for ExpressionCollector {
    fn visit_expr(&mut self, node: &Expr) {
        if let Some(position) = self.spans.position_of(node.span()) {
            if self.selection.contains(&position) {
                self.matches.push(position);
            }
        }
        node.visit_children_with(self);
    }
}

/// Extract-variable rewrite over one tree.
///
/// Expression nodes are visited in document order; each contained node not
/// yet consumed by this traversal is moved into a fresh `const` declarator
/// and replaced by a reference to the new binding. Queued declarations are
/// spliced in immediately before the statement containing the occurrence
/// by the statement-list driver below.
pub struct VariableExtractor {
    selection: SourcePosition,
    spans: SpanIndex,
    scopes: ScopeTable,
    /// Span identities already consumed by this traversal. Owned by the
    /// traversal, never stored in the tree.
    visited: HashSet<(u32, u32)>,
    /// Declarations waiting for the nearest enclosing statement list.
    pending: Vec<Stmt>,
    extracted: usize,
}

impl VariableExtractor {
    pub fn new(program: &ParsedProgram, selection: SourcePosition) -> Self {
        Self {
            selection,
            spans: program.span_index(),
            scopes: ScopeTable::new(),
            visited: HashSet::new(),
            pending: Vec::new(),
            extracted: 0,
        }
    }

    /// Number of expressions rewritten, once the traversal is over.
    ///
    /// Fails if a queued declaration never found a statement list to land
    /// in; a tree in that state must not reach the printer.
    pub fn finish(&self) -> HoistResult<usize> {
        if !self.pending.is_empty() {
            return Err(HoistError::transformation(
                "extraction site is not inside a statement list",
            ));
        }
        Ok(self.extracted)
    }

    fn try_extract(&mut self, expr: &mut Expr) -> bool {
        let span = expr.span();
        let position = match self.spans.position_of(span) {
            Some(position) => position,
            None => return false,
        };
        if !self.selection.contains(&position) {
            return false;
        }
        if !self.visited.insert((span.lo.0, span.hi.0)) {
            return false;
        }

        let name = self.scopes.unique_name(&naming_hint(expr));
        debug!(
            binding = %name,
            start = position.start,
            end = position.end,
            "extracting expression"
        );

        let init = Box::new(expr.take());
        self.pending.push(declaration_stmt(&name, init));
        *expr = Expr::Ident(Ident::new_no_ctxt(name.clone().into(), DUMMY_SP));
        self.scopes.declare(name);
        self.extracted += 1;
        true
    }

    /// Visit one slot of a statement list, then splice the declarations it
    /// produced in front of it. Declarations created in deeper statement
    /// lists never surface here; they are drained by their own driver.
    fn drive<T, F>(&mut self, list: &mut Vec<T>, mut wrap: F)
    where
        T: VisitMutWith<Self>,
        F: FnMut(Stmt) -> T,
    {
        let mut index = 0;
        while index < list.len() {
            let mark = self.pending.len();
            list[index].visit_mut_with(self);
            let declarations = self.pending.split_off(mark);
            for declaration in declarations {
                list.insert(index, wrap(declaration));
                index += 1;
            }
            index += 1;
        }
    }

    /// Declarations that escaped every statement list inside a function
    /// (parameter defaults and the like) land at the top of its body
    /// rather than outside the function boundary.
    fn keep_inside_body(&mut self, mark: usize, body: Option<&mut BlockStmt>) {
        let escaped = self.pending.split_off(mark);
        if escaped.is_empty() {
            return;
        }
        match body {
            Some(body) => {
                for (offset, declaration) in escaped.into_iter().enumerate() {
                    body.stmts.insert(offset, declaration);
                }
            }
            None => self.pending.extend(escaped),
        }
    }
}

impl VisitMut for VariableExtractor {
    fn visit_mut_module(&mut self, module: &mut Module) {
        self.scopes.push(scope::module_bindings(&module.body));
        module.visit_mut_children_with(self);
        self.scopes.pop();
    }

    fn visit_mut_module_items(&mut self, items: &mut Vec<ModuleItem>) {
        self.drive(items, ModuleItem::Stmt);
    }

    fn visit_mut_stmts(&mut self, stmts: &mut Vec<Stmt>) {
        self.drive(stmts, |declaration| declaration);
    }

    fn visit_mut_block_stmt(&mut self, block: &mut BlockStmt) {
        self.scopes.push(scope::shallow_bindings(&block.stmts));
        block.visit_mut_children_with(self);
        self.scopes.pop();
    }

    fn visit_mut_function(&mut self, function: &mut Function) {
        self.scopes.push(scope::function_bindings(
            function.params.iter().map(|param| &param.pat),
            function.body.as_ref(),
        ));
        let mark = self.pending.len();
        function.visit_mut_children_with(self);
        self.keep_inside_body(mark, function.body.as_mut());
        self.scopes.pop();
    }

    fn visit_mut_arrow_expr(&mut self, arrow: &mut ArrowExpr) {
        let body_block = match &*arrow.body {
            BlockStmtOrExpr::BlockStmt(block) => Some(block),
            BlockStmtOrExpr::Expr(_) => None,
        };
        self.scopes
            .push(scope::function_bindings(arrow.params.iter(), body_block));

        let mark = self.pending.len();
        arrow.visit_mut_children_with(self);
        let escaped = self.pending.split_off(mark);
        if !escaped.is_empty() {
            match &mut *arrow.body {
                BlockStmtOrExpr::BlockStmt(block) => {
                    for (offset, declaration) in escaped.into_iter().enumerate() {
                        block.stmts.insert(offset, declaration);
                    }
                }
                // An expression body gains a block so the declaration can
                // precede the value it feeds.
                BlockStmtOrExpr::Expr(expr) => {
                    let mut stmts = escaped;
                    stmts.push(Stmt::Return(ReturnStmt {
                        span: DUMMY_SP,
                        arg: Some(expr.take()),
                    }));
                    *arrow.body = BlockStmtOrExpr::BlockStmt(BlockStmt {
                        span: DUMMY_SP,
                        ctxt: SyntaxContext::empty(),
                        stmts,
                    });
                }
            }
        }

        self.scopes.pop();
    }

    fn visit_mut_constructor(&mut self, ctor: &mut Constructor) {
        let mut bindings = HashSet::new();
        for param in &ctor.params {
            match param {
                ParamOrTsParamProp::Param(param) => scope::collect_pat(&param.pat, &mut bindings),
                ParamOrTsParamProp::TsParamProp(prop) => match &prop.param {
                    TsParamPropParam::Ident(binding) => {
                        bindings.insert(binding.id.sym.to_string());
                    }
                    TsParamPropParam::Assign(assign) => {
                        scope::collect_pat(&assign.left, &mut bindings);
                    }
                },
            }
        }
        if let Some(body) = &ctor.body {
            bindings.extend(scope::shallow_bindings(&body.stmts));
            scope::hoisted_bindings(&body.stmts, &mut bindings);
        }
        self.scopes.push(bindings);
        let mark = self.pending.len();
        ctor.visit_mut_children_with(self);
        self.keep_inside_body(mark, ctor.body.as_mut());
        self.scopes.pop();
    }

    fn visit_mut_catch_clause(&mut self, clause: &mut CatchClause) {
        let mut bindings = HashSet::new();
        if let Some(param) = &clause.param {
            scope::collect_pat(param, &mut bindings);
        }
        self.scopes.push(bindings);
        clause.visit_mut_children_with(self);
        self.scopes.pop();
    }

    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if self.try_extract(expr) {
            // The consumed subtree is gone; nothing below it to visit.
            return;
        }
        expr.visit_mut_children_with(self);
    }
}

fn naming_hint(expr: &Expr) -> String {
    let named = match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Fn(function) => function.ident.as_ref().map(|ident| ident.sym.to_string()),
        Expr::Class(class) => class.ident.as_ref().map(|ident| ident.sym.to_string()),
        _ => None,
    };
    named.unwrap_or_else(|| "ref".to_string())
}

fn declaration_stmt(name: &str, init: Box<Expr>) -> Stmt {
    Stmt::Decl(Decl::Var(Box::new(VarDecl {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        kind: VarDeclKind::Const,
        declare: false,
        decls: vec![VarDeclarator {
            span: DUMMY_SP,
            name: Pat::Ident(BindingIdent {
                id: Ident::new_no_ctxt(name.into(), DUMMY_SP),
                type_ann: None,
            }),
            init: Some(init),
            definite: false,
        }],
    })))
}
