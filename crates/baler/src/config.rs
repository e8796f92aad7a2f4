//! Pass configuration
//!
//! Typed option structs threaded through the transformation passes. All
//! defaults match the behavior a caller gets without any configuration:
//! comments dropped, strings encoded, identifiers untouched.

/// Options for the minifier pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinifyOptions {
    /// Return the source unchanged (trimmed) instead of minifying.
    pub keep_comments: bool,
}

/// Options for the obfuscator pass.
#[derive(Debug, Clone, Copy)]
pub struct ObfuscateOptions {
    /// Rewrite string literal bodies as `\xHH` escape runs.
    pub encode_strings: bool,
    /// Rename non-global, non-property identifiers to generated short names.
    pub rename_identifiers: bool,
    /// Reserved; currently a no-op.
    pub flatten_ifs: bool,
}

impl Default for ObfuscateOptions {
    fn default() -> Self {
        Self {
            encode_strings: true,
            rename_identifiers: false,
            flatten_ifs: false,
        }
    }
}

/// Options for a full pipeline run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    pub minify: MinifyOptions,
    pub obfuscate: ObfuscateOptions,
}
