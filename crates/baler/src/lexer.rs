//! The JavaScript lexer.
//!
//! Converts source text into a flat token stream that every downstream pass
//! (module syntax extraction, tree-shaking, bundling, minification,
//! obfuscation) consumes. The scanner is total: it never fails, tolerates
//! unterminated strings, templates, comments and regexes by running to end
//! of input, and always terminates with a single EOF token. Concatenating
//! the token values in order reproduces the source byte for byte.

/// The kind of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Keyword,
    String,
    Template,
    Number,
    Punctuator,
    Regex,
    Comment,
    Whitespace,
    Eof,
}

impl TokenKind {
    /// Whether this token participates in syntax (not trivia).
    #[inline]
    pub fn is_significant(self) -> bool {
        !matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// Whether adjacent tokens of this kind would merge without whitespace.
    #[inline]
    pub fn is_word_like(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier | TokenKind::Keyword | TokenKind::Number
        )
    }
}

/// A scanned token. `value` is the exact source slice; `start`/`end` are
/// byte offsets into the source with `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            start,
            end,
        }
    }
}

/// Whether `word` is in the fixed keyword set.
pub fn is_keyword(word: &str) -> bool {
    matches!(
        word,
        "break"
            | "case"
            | "catch"
            | "class"
            | "const"
            | "continue"
            | "debugger"
            | "default"
            | "delete"
            | "do"
            | "else"
            | "export"
            | "extends"
            | "finally"
            | "for"
            | "function"
            | "if"
            | "import"
            | "in"
            | "instanceof"
            | "let"
            | "new"
            | "return"
            | "super"
            | "switch"
            | "this"
            | "throw"
            | "try"
            | "typeof"
            | "var"
            | "void"
            | "while"
            | "with"
            | "yield"
            | "enum"
            | "await"
            | "async"
            | "of"
    )
}

/// Whether `text` is in the fixed punctuator set.
fn is_punctuator(text: &str) -> bool {
    matches!(
        text,
        "{" | "}"
            | "("
            | ")"
            | "["
            | "]"
            | "."
            | ";"
            | ","
            | ":"
            | "?"
            | "~"
            | "<"
            | ">"
            | "<="
            | ">="
            | "=="
            | "!="
            | "==="
            | "!=="
            | "+"
            | "-"
            | "*"
            | "%"
            | "++"
            | "--"
            | "<<"
            | ">>"
            | ">>>"
            | "&"
            | "|"
            | "^"
            | "!"
            | "&&"
            | "||"
            | "??"
            | "="
            | "+="
            | "-="
            | "*="
            | "%="
            | "<<="
            | ">>="
            | ">>>="
            | "&="
            | "|="
            | "^="
            | "=>"
            | "**"
            | "**="
            | "/"
            | "?."
            | "??="
            | "||="
            | "&&="
    )
}

/// ECMAScript WhiteSpace and LineTerminator characters.
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\r' | '\n' | '\u{000B}' | '\u{000C}' | '\u{00A0}' | '\u{2028}' | '\u{2029}'
            | '\u{FEFF}'
    )
}

#[inline]
fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

#[inline]
fn is_identifier_part(b: u8) -> bool {
    is_identifier_start(b) || b.is_ascii_digit()
}

/// Tokenize `source` into a stream ending with exactly one EOF token.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    lexer.run();
    lexer.tokens
}

/// The scanner. Walks the input with a byte cursor, classifying each token
/// by the current character and one character of lookahead.
struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
    /// Index of the most recent non-whitespace, non-comment token.
    prev_significant: Option<usize>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
            prev_significant: None,
        }
    }

    fn run(&mut self) {
        while self.pos < self.bytes.len() {
            self.scan_token();
        }
        let len = self.source.len();
        self.tokens.push(Token::new(TokenKind::Eof, "", len, len));
    }

    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    /// Decode the character at the cursor. The cursor is always on a char
    /// boundary when this is called.
    #[inline]
    fn current_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn scan_token(&mut self) {
        let start = self.pos;
        let b = self.bytes[self.pos];

        if let Some(c) = self.current_char() {
            if is_js_whitespace(c) {
                self.scan_whitespace();
                self.emit(TokenKind::Whitespace, start);
                return;
            }
        }

        match b {
            b'/' if self.byte_at(1) == Some(b'/') => {
                self.scan_line_comment();
                self.emit(TokenKind::Comment, start);
            }
            b'/' if self.byte_at(1) == Some(b'*') => {
                self.scan_block_comment();
                self.emit(TokenKind::Comment, start);
            }
            b'\'' | b'"' => {
                self.scan_string(b);
                self.emit(TokenKind::String, start);
            }
            b'`' => {
                self.scan_template();
                self.emit(TokenKind::Template, start);
            }
            b'0'..=b'9' => {
                self.scan_number();
                self.emit(TokenKind::Number, start);
            }
            b'.' if self.byte_at(1).is_some_and(|n| n.is_ascii_digit()) => {
                self.scan_number();
                self.emit(TokenKind::Number, start);
            }
            _ if is_identifier_start(b) => {
                while self.byte_at(0).is_some_and(is_identifier_part) {
                    self.pos += 1;
                }
                let kind = if is_keyword(&self.source[start..self.pos]) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                };
                self.emit(kind, start);
            }
            b'/' if self.regex_allowed() => {
                self.scan_regex();
                self.emit(TokenKind::Regex, start);
            }
            _ => {
                self.scan_punctuator();
                self.emit(TokenKind::Punctuator, start);
            }
        }
    }

    fn emit(&mut self, kind: TokenKind, start: usize) {
        let token = Token::new(kind, &self.source[start..self.pos], start, self.pos);
        if kind.is_significant() {
            self.prev_significant = Some(self.tokens.len());
        }
        self.tokens.push(token);
    }

    /// Consume a maximal run of whitespace characters.
    fn scan_whitespace(&mut self) {
        while let Some(c) = self.current_char() {
            if !is_js_whitespace(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Consume `//` up to but not including the next CR or LF.
    fn scan_line_comment(&mut self) {
        self.pos += 2;
        while let Some(b) = self.byte_at(0) {
            if b == b'\r' || b == b'\n' {
                break;
            }
            self.pos += 1;
        }
    }

    /// Consume `/*` up to and including `*/`, or to EOF if unterminated.
    fn scan_block_comment(&mut self) {
        self.pos += 2;
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'*' && self.byte_at(1) == Some(b'/') {
                self.pos += 2;
                return;
            }
            self.pos += 1;
        }
    }

    /// Consume a quoted string. `\X` is a two-character escape; an
    /// unterminated string runs to EOF.
    fn scan_string(&mut self, quote: u8) {
        self.pos += 1;
        while let Some(b) = self.byte_at(0) {
            if b == b'\\' {
                self.pos = (self.pos + 2).min(self.bytes.len());
            } else if b == quote {
                self.pos += 1;
                return;
            } else {
                self.pos += 1;
            }
        }
    }

    /// Consume a template literal as a single token. `${` opens an
    /// interpolation tracked by a brace-depth counter; the closing backtick
    /// only counts at depth zero. Interpolated expressions are not
    /// re-tokenized.
    fn scan_template(&mut self) {
        self.pos += 1;
        let mut brace_depth: usize = 0;
        while let Some(b) = self.byte_at(0) {
            if b == b'\\' {
                self.pos = (self.pos + 2).min(self.bytes.len());
            } else if brace_depth == 0 && b == b'`' {
                self.pos += 1;
                return;
            } else if brace_depth == 0 && b == b'$' && self.byte_at(1) == Some(b'{') {
                brace_depth = 1;
                self.pos += 2;
            } else if brace_depth > 0 && b == b'{' {
                brace_depth += 1;
                self.pos += 1;
            } else if brace_depth > 0 && b == b'}' {
                brace_depth -= 1;
                self.pos += 1;
            } else {
                self.pos += 1;
            }
        }
    }

    /// Consume a numeric literal: `0x` hex, or decimal digits optionally
    /// followed by a fraction.
    fn scan_number(&mut self) {
        if self.bytes[self.pos] == b'0'
            && matches!(self.byte_at(1), Some(b'x') | Some(b'X'))
            && self.byte_at(2).is_some_and(|b| b.is_ascii_hexdigit())
        {
            self.pos += 2;
            while self.byte_at(0).is_some_and(|b| b.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            return;
        }
        if self.bytes[self.pos] == b'.' {
            self.pos += 1;
            while self.byte_at(0).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
            return;
        }
        while self.byte_at(0).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.byte_at(0) == Some(b'.') && self.byte_at(1).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
            while self.byte_at(0).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
    }

    /// Whether a `/` at the cursor starts a regex literal rather than
    /// division, judged by the most recent significant token.
    fn regex_allowed(&self) -> bool {
        let Some(idx) = self.prev_significant else {
            return true;
        };
        let prev = &self.tokens[idx];
        match prev.kind {
            TokenKind::Keyword => matches!(
                prev.value.as_str(),
                "return" | "case" | "throw" | "else" | "do" | "typeof" | "instanceof" | "in"
                    | "of"
            ),
            TokenKind::Punctuator => matches!(
                prev.value.as_str(),
                "(" | "{"
                    | "["
                    | ","
                    | ";"
                    | "!"
                    | "~"
                    | "?"
                    | "="
                    | ":"
                    | "&&"
                    | "||"
                    | "??"
                    | "+"
                    | "-"
                    | "*"
                    | "/"
                    | "%"
                    | "&"
                    | "|"
                    | "^"
                    | "<"
                    | ">"
            ),
            _ => false,
        }
    }

    /// Consume a regex literal: body until an unescaped `/` at character
    /// class depth zero, then trailing flag letters.
    fn scan_regex(&mut self) {
        self.pos += 1;
        let mut class_depth: usize = 0;
        while let Some(b) = self.byte_at(0) {
            if b == b'\\' {
                self.pos = (self.pos + 2).min(self.bytes.len());
            } else if b == b'[' {
                class_depth += 1;
                self.pos += 1;
            } else if b == b']' {
                class_depth = class_depth.saturating_sub(1);
                self.pos += 1;
            } else if b == b'/' && class_depth == 0 {
                self.pos += 1;
                while self.byte_at(0).is_some_and(|b| b.is_ascii_alphabetic()) {
                    self.pos += 1;
                }
                return;
            } else {
                self.pos += 1;
            }
        }
    }

    /// Greedy longest-first punctuator match, 3 characters down to 1. An
    /// unknown character falls back to a single-character punctuator so the
    /// scanner stays total.
    fn scan_punctuator(&mut self) {
        for len in (1..=3).rev() {
            let end = self.pos + len;
            if end <= self.source.len()
                && self.source.is_char_boundary(end)
                && is_punctuator(&self.source[self.pos..end])
            {
                self.pos = end;
                return;
            }
        }
        let c = self.current_char().unwrap_or('\u{FFFD}');
        self.pos += c.len_utf8();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.value.as_str()).collect()
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens
            .iter()
            .filter(|t| t.kind.is_significant() && t.kind != TokenKind::Eof)
            .map(|t| t.kind)
            .collect()
    }

    fn assert_round_trip(source: &str) {
        let tokens = tokenize(source);
        assert_eq!(concat(&tokens), source, "round trip failed for {source:?}");
        let eof = tokens.last().expect("token stream is never empty");
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.start, source.len());
        assert_eq!(eof.end, source.len());
        for token in &tokens {
            assert!(token.start <= token.end);
            assert!(token.end <= source.len());
            assert_eq!(&source[token.start..token.end], token.value);
        }
    }

    #[test]
    fn empty_source_yields_only_eof() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn round_trips_representative_sources() {
        for source in [
            "const x = 1;",
            "a\r\nb\tc\u{00a0}d",
            "let s = 'it\\'s';",
            "f(`a ${b + `c`} d`);",
            "/* block */ // line",
            "if (a) { return /x[/]y/gi.test(b); }",
            "x >>>= 0xFF + .5;",
            "const u = \"http://x/*y*/?q=1\";",
            "émoji = '🎉';",
        ] {
            assert_round_trip(source);
        }
    }

    #[test]
    fn classifies_keywords_and_identifiers() {
        let tokens = tokenize("async function of_x(await) {}");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Keyword,
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Punctuator,
                TokenKind::Keyword,
                TokenKind::Punctuator,
                TokenKind::Punctuator,
                TokenKind::Punctuator,
            ]
        );
    }

    #[test]
    fn punctuators_match_longest_first() {
        let tokens = tokenize("a===b");
        assert_eq!(tokens[1].value, "===");
        let tokens = tokenize("a**=b");
        assert_eq!(tokens[1].value, "**=");
        let tokens = tokenize("a?.b");
        assert_eq!(tokens[1].value, "?.");
    }

    #[test]
    fn regex_in_regex_position() {
        let tokens = tokenize("x = /a/g;");
        let regex: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Regex)
            .collect();
        assert_eq!(regex.len(), 1);
        assert_eq!(regex[0].value, "/a/g");
    }

    #[test]
    fn division_in_division_position() {
        let tokens = tokenize("b /a/g");
        let significant: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind.is_significant() && t.kind != TokenKind::Eof)
            .map(|t| (t.kind, t.value.as_str()))
            .collect();
        assert_eq!(
            significant,
            vec![
                (TokenKind::Identifier, "b"),
                (TokenKind::Punctuator, "/"),
                (TokenKind::Identifier, "a"),
                (TokenKind::Punctuator, "/"),
                (TokenKind::Identifier, "g"),
            ]
        );
    }

    #[test]
    fn regex_allowed_after_return_and_open_paren() {
        for source in ["return /a/;", "f(/a/)", "x = y && /a/"] {
            let tokens = tokenize(source);
            assert!(
                tokens.iter().any(|t| t.kind == TokenKind::Regex),
                "expected a regex token in {source:?}"
            );
            assert_round_trip(source);
        }
    }

    #[test]
    fn unterminated_string_runs_to_eof() {
        let tokens = tokenize("\"abc");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].value, "\"abc");
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn unterminated_block_comment_runs_to_eof() {
        let tokens = tokenize("a /* never closed");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
        assert_eq!(tokens[tokens.len() - 2].kind, TokenKind::Comment);
        assert_round_trip("a /* never closed");
    }

    #[test]
    fn template_with_interpolation_is_one_token() {
        let source = "`a ${ {b: `}`} } c` + d";
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind, TokenKind::Template);
        assert_eq!(tokens[0].value, "`a ${ {b: `}`} } c`");
        assert_round_trip(source);
    }

    #[test]
    fn line_comment_excludes_line_break() {
        let tokens = tokenize("// note\nx");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].value, "// note");
        assert_eq!(tokens[1].kind, TokenKind::Whitespace);
    }

    #[test]
    fn hex_and_fractional_numbers() {
        let tokens = tokenize("0xFF 12.5 .25 1.");
        let numbers: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Number)
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(numbers, vec!["0xFF", "12.5", ".25", "1"]);
    }

    #[test]
    fn unknown_characters_become_punctuators() {
        let source = "#€@";
        let tokens = tokenize(source);
        assert!(tokens
            .iter()
            .take(3)
            .all(|t| t.kind == TokenKind::Punctuator));
        assert_round_trip(source);
    }

    #[test]
    fn comment_syntax_survives_inside_strings() {
        let tokens = tokenize("const u = \"http://x/*y*/?q=1\";");
        let strings: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::String)
            .collect();
        assert_eq!(strings.len(), 1);
        assert_eq!(strings[0].value, "\"http://x/*y*/?q=1\"");
    }
}
