//! Token-stream obfuscator
//!
//! Two independent transforms over the token stream: hex-encoding of string
//! literal bodies and identifier renaming to generated short names. When
//! both are requested, renaming runs first and the renamed output is
//! re-tokenized before encoding. `flatten_ifs` is accepted and currently a
//! no-op.

use rustc_hash::FxHashMap;

use crate::{
    config::ObfuscateOptions,
    lexer::{tokenize, Token, TokenKind},
};

/// Obfuscate `source` according to `options`.
pub fn obfuscate(source: &str, options: &ObfuscateOptions) -> String {
    let mut output = source.to_string();
    if options.rename_identifiers {
        output = rename_identifiers(&output);
    }
    if options.encode_strings {
        output = encode_strings(&output);
    }
    output
}

/// Identifiers that must never be renamed: host globals, language values
/// and the CommonJS module surface.
fn is_reserved_global(name: &str) -> bool {
    matches!(
        name,
        "window"
            | "global"
            | "globalThis"
            | "document"
            | "console"
            | "Math"
            | "Date"
            | "JSON"
            | "Array"
            | "Object"
            | "String"
            | "Number"
            | "Boolean"
            | "RegExp"
            | "Promise"
            | "Set"
            | "Map"
            | "Buffer"
            | "atob"
            | "undefined"
            | "NaN"
            | "Infinity"
            | "Error"
            | "TypeError"
            | "ReferenceError"
            | "SyntaxError"
            | "RangeError"
            | "eval"
            | "parseInt"
            | "parseFloat"
            | "isNaN"
            | "isFinite"
            | "encodeURI"
            | "decodeURI"
            | "encodeURIComponent"
            | "decodeURIComponent"
            | "require"
            | "module"
            | "exports"
            | "__dirname"
            | "__filename"
    )
}

/// Whether a token may be renamed: an identifier that is not a reserved
/// global, not a literal value, and not in property-access position.
fn renamable(token: &Token, prev_significant: Option<&Token>) -> bool {
    if token.kind != TokenKind::Identifier {
        return false;
    }
    // Literal values lex as identifiers; renaming them would manufacture
    // unbound names.
    if matches!(token.value.as_str(), "true" | "false" | "null") {
        return false;
    }
    if is_reserved_global(&token.value) {
        return false;
    }
    if let Some(prev) = prev_significant {
        if prev.kind == TokenKind::Punctuator && (prev.value == "." || prev.value == "?.") {
            return false;
        }
    }
    true
}

/// Map an index to a base-52 name: `a..z`, `A..Z`, `aa`, `ab`, ...
fn generate_name(index: usize) -> String {
    const ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut name = String::new();
    let mut n = index as i64;
    loop {
        name.insert(0, ALPHABET[(n % 52) as usize] as char);
        n = n / 52 - 1;
        if n < 0 {
            break;
        }
    }
    name
}

/// Rename every renamable identifier, assigning generated names in first
/// encounter order. The token kind sequence is preserved.
fn rename_identifiers(source: &str) -> String {
    let tokens = tokenize(source);

    // Collect pass: assign a generated name per distinct identifier.
    let mut assigned: FxHashMap<&str, String> = FxHashMap::default();
    let mut prev_significant: Option<&Token> = None;
    for token in &tokens {
        if renamable(token, prev_significant) && !assigned.contains_key(token.value.as_str()) {
            let name = generate_name(assigned.len());
            assigned.insert(&token.value, name);
        }
        if token.kind.is_significant() {
            prev_significant = Some(token);
        }
    }

    // Rewrite pass: substitute assigned names, emit everything else verbatim.
    let mut output = String::with_capacity(source.len());
    let mut prev_significant: Option<&Token> = None;
    for token in &tokens {
        match assigned.get(token.value.as_str()) {
            Some(name) if renamable(token, prev_significant) => output.push_str(name),
            _ => output.push_str(&token.value),
        }
        if token.kind.is_significant() {
            prev_significant = Some(token);
        }
    }
    output
}

/// Hex-encode the body of every string token, and of every template token
/// that carries no interpolation. A body containing a code point above
/// U+00FF passes through verbatim: `\xHH` cannot express it.
fn encode_strings(source: &str) -> String {
    let tokens = tokenize(source);
    let mut output = String::with_capacity(source.len() * 2);
    for token in &tokens {
        match token.kind {
            TokenKind::String => output.push_str(&encode_quoted(&token.value)),
            TokenKind::Template if !token.value.contains("${") => {
                output.push_str(&encode_quoted(&token.value));
            }
            _ => output.push_str(&token.value),
        }
    }
    output
}

/// Re-emit a quoted token with its inner text hex-encoded. Unterminated
/// tokens and bodies outside the `\xHH` range are left untouched.
fn encode_quoted(value: &str) -> String {
    let bytes = value.as_bytes();
    let terminated = bytes.len() >= 2 && bytes[bytes.len() - 1] == bytes[0];
    if !terminated {
        return value.to_string();
    }
    let quote = value.chars().next().unwrap_or('"');
    let inner = &value[1..value.len() - 1];
    match encode_inner(inner) {
        Some(encoded) => format!("{quote}{encoded}{quote}"),
        None => value.to_string(),
    }
}

fn encode_inner(inner: &str) -> Option<String> {
    let mut encoded = String::with_capacity(inner.len() * 4);
    for c in inner.chars() {
        let unit = c as u32;
        if unit > 0xFF {
            return None;
        }
        encoded.push_str(&format!("\\x{unit:02x}"));
    }
    Some(encoded)
}
