//! Token-stream minifier
//!
//! Drops comments, shortens the boolean literals, and collapses whitespace
//! down to the single spaces the grammar needs between word-like tokens.
//! String, template and regex token bodies pass through byte-identical, so
//! comment-like sequences inside them survive. Semantics are preserved for
//! programs that do not depend on source positions or comments.

use crate::{
    config::MinifyOptions,
    lexer::{tokenize, TokenKind},
};

/// Minify with default options.
pub fn minify(source: &str) -> String {
    minify_with_options(source, &MinifyOptions::default())
}

/// Minify `source`. With `keep_comments` set, the source is returned
/// unchanged apart from leading/trailing whitespace.
pub fn minify_with_options(source: &str, options: &MinifyOptions) -> String {
    if options.keep_comments {
        return source.trim().to_string();
    }

    let tokens = tokenize(source);
    let mut output = String::with_capacity(source.len());
    let mut prev_word_like = false;
    let mut pending_space = false;

    for token in &tokens {
        match token.kind {
            TokenKind::Comment | TokenKind::Eof => {}
            TokenKind::Whitespace => pending_space = true,
            _ => {
                let value = match token.kind {
                    // `null` is not rewritten; it is not equivalent to `void 0`.
                    TokenKind::Identifier | TokenKind::Keyword if token.value == "true" => "!0",
                    TokenKind::Identifier | TokenKind::Keyword if token.value == "false" => "!1",
                    _ => token.value.as_str(),
                };
                let word_like = token.kind.is_word_like();
                if pending_space && prev_word_like && word_like {
                    output.push(' ');
                }
                pending_space = false;
                output.push_str(value);
                prev_word_like = word_like;
            }
        }
    }

    output.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortens_booleans_but_not_null() {
        let output = minify("if (true) { a = false; b = null; }");
        assert!(output.contains("!0"));
        assert!(output.contains("!1"));
        assert!(output.contains("null"));
        assert!(!output.contains("true"));
        assert!(!output.contains("false"));
        assert_eq!(output, "if(!0){a=!1;b=null;}");
    }

    #[test]
    fn drops_comments() {
        let output = minify("/* header */ var x = 1; // trailing");
        assert_eq!(output, "var x=1;");
    }

    #[test]
    fn keeps_space_between_word_like_tokens() {
        assert_eq!(minify("return  value ;"), "return value;");
        assert_eq!(minify("let x = 1"), "let x=1");
        assert_eq!(minify("typeof 0x10"), "typeof 0x10");
    }

    #[test]
    fn drops_space_around_punctuation() {
        assert_eq!(
            minify("function foo ( x ) { return x + 1 ; }"),
            "function foo(x){return x+1;}"
        );
    }

    #[test]
    fn string_internal_comment_syntax_survives() {
        let output = minify("const u = \"http://x/*y*/?q=1\";");
        assert!(output.contains("http://x/*y*/?q=1"));
    }

    #[test]
    fn template_and_regex_bodies_pass_through() {
        let output = minify("const t = `a  //  ${ x }`; const r = /a  b/g;");
        assert!(output.contains("`a  //  ${ x }`"));
        assert!(output.contains("/a  b/g"));
    }

    #[test]
    fn empty_and_whitespace_only_sources_minify_to_empty() {
        assert_eq!(minify(""), "");
        assert_eq!(minify(" \t\r\n "), "");
    }

    #[test]
    fn keep_comments_returns_trimmed_source() {
        let source = "  /* keep me */ var x = 1;  ";
        let options = MinifyOptions {
            keep_comments: true,
        };
        assert_eq!(
            minify_with_options(source, &options),
            "/* keep me */ var x = 1;"
        );
    }

    #[test]
    fn whitespace_run_spanning_a_comment_collapses_once() {
        assert_eq!(minify("let a /* gap */ = b"), "let a=b");
        assert_eq!(minify("return /* gap */ x"), "return x");
    }
}
