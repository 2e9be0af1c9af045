//! Lexical scope bookkeeping for generated binding names.
//!
//! The extractor keeps a stack of binding frames, one per lexical region it
//! has entered (module, function, arrow, block, constructor, catch). Frames
//! are collected up front from the region's declarations so a generated
//! name can be checked against bindings that appear after the extraction
//! site as well as before it. Collection follows JavaScript scoping:
//! parameters and lexical declarations belong to the region that declares
//! them, while `var` and `function` declarations hoist through nested
//! blocks up to the function boundary.

use std::collections::HashSet;

use swc_ecma_ast::{
    BlockStmt, Decl, DefaultDecl, ForHead, ImportSpecifier, ModuleDecl, ModuleItem,
    ObjectPatProp, Pat, Stmt, VarDeclKind, VarDeclOrExpr,
};

/// Stack of binding frames for the scopes enclosing the current traversal
/// position.
#[derive(Debug, Default)]
pub struct ScopeTable {
    frames: Vec<HashSet<String>>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a lexical region with its collected bindings.
    pub fn push(&mut self, bindings: HashSet<String>) {
        self.frames.push(bindings);
    }

    /// Leave the innermost region.
    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Record a binding in the innermost region.
    pub fn declare(&mut self, name: impl Into<String>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.into());
        } else {
            self.frames.push(HashSet::from([name.into()]));
        }
    }

    /// Whether `name` is bound anywhere on the active scope chain.
    pub fn is_bound(&self, name: &str) -> bool {
        self.frames.iter().any(|frame| frame.contains(name))
    }

    /// Produce a fresh identifier based on `hint`: `_hint`, then `_hint2`,
    /// `_hint3`, … until a name collides with nothing on the scope chain.
    pub fn unique_name(&self, hint: &str) -> String {
        let base = format!("_{}", hint);
        if !self.is_bound(&base) {
            return base;
        }
        let mut counter = 2usize;
        loop {
            let candidate = format!("{}{}", base, counter);
            if !self.is_bound(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }
}

/// Collect every name a binding pattern introduces.
pub fn collect_pat(pat: &Pat, out: &mut HashSet<String>) {
    match pat {
        Pat::Ident(binding) => {
            out.insert(binding.id.sym.to_string());
        }
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                collect_pat(elem, out);
            }
        }
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => collect_pat(&kv.value, out),
                    ObjectPatProp::Assign(assign) => {
                        out.insert(assign.key.sym.to_string());
                    }
                    ObjectPatProp::Rest(rest) => collect_pat(&rest.arg, out),
                }
            }
        }
        Pat::Assign(assign) => collect_pat(&assign.left, out),
        Pat::Rest(rest) => collect_pat(&rest.arg, out),
        Pat::Expr(_) | Pat::Invalid(_) => {}
    }
}

fn collect_decl(decl: &Decl, out: &mut HashSet<String>) {
    match decl {
        Decl::Var(var) => {
            for declarator in &var.decls {
                collect_pat(&declarator.name, out);
            }
        }
        Decl::Fn(function) => {
            out.insert(function.ident.sym.to_string());
        }
        Decl::Class(class) => {
            out.insert(class.ident.sym.to_string());
        }
        _ => {}
    }
}

/// Names declared directly in a statement list.
pub fn shallow_bindings(stmts: &[Stmt]) -> HashSet<String> {
    let mut out = HashSet::new();
    for stmt in stmts {
        if let Stmt::Decl(decl) = stmt {
            collect_decl(decl, &mut out);
        }
    }
    out
}

/// Names that hoist to the function boundary (`var` and `function`
/// declarations) from anywhere inside a statement list, without crossing
/// into nested functions.
pub fn hoisted_bindings(stmts: &[Stmt], out: &mut HashSet<String>) {
    for stmt in stmts {
        hoisted_in_stmt(stmt, out);
    }
}

fn hoisted_in_stmt(stmt: &Stmt, out: &mut HashSet<String>) {
    match stmt {
        Stmt::Decl(Decl::Var(var)) if var.kind == VarDeclKind::Var => {
            for declarator in &var.decls {
                collect_pat(&declarator.name, out);
            }
        }
        Stmt::Decl(Decl::Fn(function)) => {
            out.insert(function.ident.sym.to_string());
        }
        Stmt::Block(block) => hoisted_bindings(&block.stmts, out),
        Stmt::If(stmt) => {
            hoisted_in_stmt(&stmt.cons, out);
            if let Some(alt) = &stmt.alt {
                hoisted_in_stmt(alt, out);
            }
        }
        Stmt::While(stmt) => hoisted_in_stmt(&stmt.body, out),
        Stmt::DoWhile(stmt) => hoisted_in_stmt(&stmt.body, out),
        Stmt::For(stmt) => {
            if let Some(VarDeclOrExpr::VarDecl(var)) = &stmt.init {
                if var.kind == VarDeclKind::Var {
                    for declarator in &var.decls {
                        collect_pat(&declarator.name, out);
                    }
                }
            }
            hoisted_in_stmt(&stmt.body, out);
        }
        Stmt::ForIn(stmt) => {
            hoisted_in_for_head(&stmt.left, out);
            hoisted_in_stmt(&stmt.body, out);
        }
        Stmt::ForOf(stmt) => {
            hoisted_in_for_head(&stmt.left, out);
            hoisted_in_stmt(&stmt.body, out);
        }
        Stmt::Try(stmt) => {
            hoisted_bindings(&stmt.block.stmts, out);
            if let Some(handler) = &stmt.handler {
                hoisted_bindings(&handler.body.stmts, out);
            }
            if let Some(finalizer) = &stmt.finalizer {
                hoisted_bindings(&finalizer.stmts, out);
            }
        }
        Stmt::Switch(stmt) => {
            for case in &stmt.cases {
                hoisted_bindings(&case.cons, out);
            }
        }
        Stmt::Labeled(stmt) => hoisted_in_stmt(&stmt.body, out),
        Stmt::With(stmt) => hoisted_in_stmt(&stmt.body, out),
        _ => {}
    }
}

fn hoisted_in_for_head(head: &ForHead, out: &mut HashSet<String>) {
    if let ForHead::VarDecl(var) = head {
        if var.kind == VarDeclKind::Var {
            for declarator in &var.decls {
                collect_pat(&declarator.name, out);
            }
        }
    }
}

/// Bindings of the module scope: imports, exports, and top-level
/// declarations, with `var`/`function` hoisting applied.
pub fn module_bindings(items: &[ModuleItem]) -> HashSet<String> {
    let mut out = HashSet::new();
    for item in items {
        match item {
            ModuleItem::Stmt(stmt) => {
                if let Stmt::Decl(decl) = stmt {
                    collect_decl(decl, &mut out);
                }
                hoisted_in_stmt(stmt, &mut out);
            }
            ModuleItem::ModuleDecl(decl) => match decl {
                ModuleDecl::Import(import) => {
                    for specifier in &import.specifiers {
                        match specifier {
                            ImportSpecifier::Named(named) => {
                                out.insert(named.local.sym.to_string());
                            }
                            ImportSpecifier::Default(default) => {
                                out.insert(default.local.sym.to_string());
                            }
                            ImportSpecifier::Namespace(namespace) => {
                                out.insert(namespace.local.sym.to_string());
                            }
                        }
                    }
                }
                ModuleDecl::ExportDecl(export) => collect_decl(&export.decl, &mut out),
                ModuleDecl::ExportDefaultDecl(export) => match &export.decl {
                    DefaultDecl::Fn(function) => {
                        if let Some(ident) = &function.ident {
                            out.insert(ident.sym.to_string());
                        }
                    }
                    DefaultDecl::Class(class) => {
                        if let Some(ident) = &class.ident {
                            out.insert(ident.sym.to_string());
                        }
                    }
                    DefaultDecl::TsInterfaceDecl(_) => {}
                },
                _ => {}
            },
        }
    }
    out
}

/// Bindings of a function scope: parameters plus the body's direct and
/// hoisted declarations.
pub fn function_bindings<'a>(
    params: impl Iterator<Item = &'a Pat>,
    body: Option<&BlockStmt>,
) -> HashSet<String> {
    let mut out = HashSet::new();
    for pat in params {
        collect_pat(pat, &mut out);
    }
    if let Some(body) = body {
        out.extend(shallow_bindings(&body.stmts));
        hoisted_bindings(&body.stmts, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use swc_ecma_parser::{EsSyntax, Syntax};

    fn names(set: &HashSet<String>) -> Vec<&str> {
        let mut names: Vec<&str> = set.iter().map(|name| name.as_str()).collect();
        names.sort_unstable();
        names
    }

    #[test]
    fn test_unique_name_without_collision() {
        let scopes = ScopeTable::new();
        assert_eq!(scopes.unique_name("ref"), "_ref");
    }

    #[test]
    fn test_unique_name_skips_bound_names() {
        let mut scopes = ScopeTable::new();
        scopes.push(HashSet::from([
            "x".to_string(),
            "_x".to_string(),
            "_x2".to_string(),
        ]));
        assert_eq!(scopes.unique_name("x"), "_x3");
    }

    #[test]
    fn test_unique_name_checks_whole_chain() {
        let mut scopes = ScopeTable::new();
        scopes.push(HashSet::from(["_ref".to_string()]));
        scopes.push(HashSet::new());
        assert_eq!(scopes.unique_name("ref"), "_ref2");
    }

    #[test]
    fn test_declare_lands_in_innermost_frame() {
        let mut scopes = ScopeTable::new();
        scopes.push(HashSet::new());
        scopes.declare("_ref");
        assert!(scopes.is_bound("_ref"));
        scopes.pop();
        assert!(!scopes.is_bound("_ref"));
    }

    #[test]
    fn test_module_bindings_with_hoisting() {
        let program = parse_source(
            "import lib from 'lib';\nvar a = 1;\nlet b = 2;\nfunction c() {}\n{ var d = 3; let e = 4; }",
            Syntax::Es(EsSyntax::default()),
        )
        .unwrap();
        let bindings = module_bindings(&program.module.body);
        // `d` hoists out of the block, `e` does not
        assert_eq!(names(&bindings), vec!["a", "b", "c", "d", "lib"]);
    }

    #[test]
    fn test_destructuring_patterns() {
        let program = parse_source(
            "const { p, q: renamed, ...rest } = obj;\nconst [first, , ...others] = list;",
            Syntax::Es(EsSyntax::default()),
        )
        .unwrap();
        let bindings = module_bindings(&program.module.body);
        assert_eq!(
            names(&bindings),
            vec!["first", "others", "p", "renamed", "rest"]
        );
    }
}
