//! Import/export statement extraction for JavaScript modules
//!
//! This collector classifies the ES-module surface of a token stream:
//! side-effect imports, default/named imports, default exports, named
//! exports, declaration exports and wildcard re-exports. It never looks at
//! character-level syntax; everything is judged from the lexer's tokens.

use crate::lexer::{Token, TokenKind};

/// How a module is imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import "x";` — imported for its side effects only.
    SideEffect,
    /// `import d from "x";`, `import { a } from "x";`, `import * as n from "x";`
    NamedOrDefault,
}

/// A single static import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub kind: ImportKind,
    /// The specifier as written, without its surrounding quotes.
    pub source: String,
}

/// What an export statement exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// `export default ...`
    Default,
    /// `export { a, b };`, `export const x = ...;`
    Named,
    /// `export *;` or `export * from "x";`
    All,
}

/// A single export statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    pub kind: ExportKind,
    /// Exported names for `Named` records. Renames (`a as b`) collapse to
    /// the local (left-hand) identifier.
    pub names: Vec<String>,
    /// Re-export source for `export ... from "x"` forms, quotes stripped.
    pub source: Option<String>,
}

/// All module syntax found in one token stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSyntax {
    pub imports: Vec<ImportRecord>,
    pub exports: Vec<ExportRecord>,
}

/// Classify every `import`/`export` statement in `tokens`.
pub fn find_module_syntax(tokens: &[Token]) -> ModuleSyntax {
    let mut collector = Collector::new(tokens);
    collector.run();
    collector.syntax
}

/// Strip the surrounding quote characters from a string-literal token value.
fn strip_quotes(value: &str) -> String {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 && matches!(bytes[0], b'\'' | b'"' | b'`') && bytes[bytes.len() - 1] == bytes[0]
    {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}

/// The contextual keyword `from` is not in the fixed keyword set, so it can
/// surface as either an identifier or a keyword token.
fn is_from(token: &Token) -> bool {
    matches!(token.kind, TokenKind::Identifier | TokenKind::Keyword) && token.value == "from"
}

fn is_name(token: &Token) -> bool {
    matches!(token.kind, TokenKind::Identifier | TokenKind::Keyword)
}

fn is_punct(token: &Token, text: &str) -> bool {
    token.kind == TokenKind::Punctuator && token.value == text
}

struct Collector<'a> {
    tokens: &'a [Token],
    pos: usize,
    syntax: ModuleSyntax,
}

impl<'a> Collector<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            syntax: ModuleSyntax::default(),
        }
    }

    /// Advance to the next significant token and return it.
    fn next_significant(&mut self) -> Option<&'a Token> {
        while self.pos < self.tokens.len() {
            let token = &self.tokens[self.pos];
            self.pos += 1;
            if token.kind.is_significant() && token.kind != TokenKind::Eof {
                return Some(token);
            }
        }
        None
    }

    /// Consume tokens up to and including the next `;`, or to EOF.
    fn skip_statement(&mut self) {
        while let Some(token) = self.next_significant() {
            if is_punct(token, ";") {
                return;
            }
        }
    }

    fn run(&mut self) {
        while let Some(token) = self.next_significant() {
            if token.kind != TokenKind::Keyword {
                continue;
            }
            match token.value.as_str() {
                "import" => self.collect_import(),
                "export" => self.collect_export(),
                _ => {}
            }
        }
    }

    fn collect_import(&mut self) {
        let Some(first) = self.next_significant() else {
            return;
        };
        if first.kind == TokenKind::String {
            self.syntax.imports.push(ImportRecord {
                kind: ImportKind::SideEffect,
                source: strip_quotes(&first.value),
            });
            self.skip_statement();
            return;
        }
        // Dynamic `import(...)` is call syntax, not a static import.
        if is_punct(first, "(") {
            return;
        }
        // Default, namespace or named clause; scan ahead for `from "x"`.
        let mut token = Some(first);
        while let Some(current) = token {
            if is_punct(current, ";") {
                return;
            }
            if is_from(current) {
                if let Some(specifier) = self.next_significant() {
                    if specifier.kind == TokenKind::String {
                        self.syntax.imports.push(ImportRecord {
                            kind: ImportKind::NamedOrDefault,
                            source: strip_quotes(&specifier.value),
                        });
                    }
                }
                self.skip_statement();
                return;
            }
            token = self.next_significant();
        }
    }

    fn collect_export(&mut self) {
        let Some(first) = self.next_significant() else {
            return;
        };
        if is_punct(first, "*") {
            self.collect_export_all();
        } else if first.kind == TokenKind::Keyword && first.value == "default" {
            self.syntax.exports.push(ExportRecord {
                kind: ExportKind::Default,
                names: Vec::new(),
                source: None,
            });
            self.skip_statement();
        } else if is_punct(first, "{") {
            self.collect_export_braces();
        } else if first.kind == TokenKind::Keyword {
            self.collect_export_declaration(first);
        } else {
            self.skip_statement();
        }
    }

    /// `export * ;` or `export * from "x";`
    fn collect_export_all(&mut self) {
        let mut source = None;
        if let Some(next) = self.next_significant() {
            if is_from(next) {
                if let Some(specifier) = self.next_significant() {
                    if specifier.kind == TokenKind::String {
                        source = Some(strip_quotes(&specifier.value));
                    }
                }
                self.skip_statement();
            } else if !is_punct(next, ";") {
                self.skip_statement();
            }
        }
        self.syntax.exports.push(ExportRecord {
            kind: ExportKind::All,
            names: Vec::new(),
            source,
        });
    }

    /// `export { a, b as c };` — optionally with a trailing `from "x"`.
    fn collect_export_braces(&mut self) {
        let mut names = Vec::new();
        let mut expecting_name = true;
        loop {
            let Some(token) = self.next_significant() else {
                break;
            };
            if is_punct(token, "}") {
                break;
            }
            if is_punct(token, ",") {
                expecting_name = true;
            } else if is_name(token) && token.value == "as" {
                // The alias after `as` is dropped; the local name stands.
                expecting_name = false;
            } else if expecting_name && is_name(token) {
                names.push(token.value.clone());
                expecting_name = false;
            }
        }
        let mut source = None;
        if let Some(next) = self.next_significant() {
            if is_from(next) {
                if let Some(specifier) = self.next_significant() {
                    if specifier.kind == TokenKind::String {
                        source = Some(strip_quotes(&specifier.value));
                    }
                }
                self.skip_statement();
            } else if !is_punct(next, ";") {
                self.skip_statement();
            }
        }
        self.syntax.exports.push(ExportRecord {
            kind: ExportKind::Named,
            names,
            source,
        });
    }

    /// `export const x`, `export function f`, `export class C`, and the
    /// `async function` / `function*` variants.
    fn collect_export_declaration(&mut self, keyword: &Token) {
        let mut decl = keyword.value.as_str().to_string();
        if decl == "async" {
            match self.next_significant() {
                Some(next) if next.kind == TokenKind::Keyword && next.value == "function" => {
                    decl = "function".to_string();
                }
                _ => {
                    self.skip_statement();
                    return;
                }
            }
        }
        if !matches!(decl.as_str(), "const" | "let" | "var" | "function" | "class") {
            self.skip_statement();
            return;
        }
        let mut name = self.next_significant();
        // Generator declarations put a `*` between `function` and the name.
        if let Some(star) = name {
            if is_punct(star, "*") {
                name = self.next_significant();
            }
        }
        if let Some(ident) = name {
            if ident.kind == TokenKind::Identifier {
                self.syntax.exports.push(ExportRecord {
                    kind: ExportKind::Named,
                    names: vec![ident.value.clone()],
                    source: None,
                });
            }
        }
        self.skip_statement();
    }
}
