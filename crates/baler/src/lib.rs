//! baler: a token-driven JavaScript build core
//!
//! Transforms an in-memory map of ES-module sources into a single
//! distributable artifact. The shared lexer feeds every pass; no pass ever
//! re-interprets character-level syntax. The host supplies the module map
//! and entry id (filesystem walking, CLI parsing and output writing live
//! outside this crate) and wires a `log` implementation for diagnostics.

pub mod code_generator;
pub mod config;
pub mod graph;
pub mod lexer;
pub mod minifier;
pub mod module_syntax;
pub mod obfuscator;
pub mod pipeline;
pub mod side_effects;
pub mod tree_shaking;
pub mod types;

pub use code_generator::{bundle, BundleOutput, Bundler};
pub use config::{MinifyOptions, ObfuscateOptions, PipelineOptions};
pub use graph::{ModuleGraph, ModuleId, ModuleNode};
pub use lexer::{tokenize, Token, TokenKind};
pub use minifier::{minify, minify_with_options};
pub use module_syntax::{
    find_module_syntax, ExportKind, ExportRecord, ImportKind, ImportRecord, ModuleSyntax,
};
pub use obfuscator::obfuscate;
pub use pipeline::{run_pipeline, PipelineRun, PipelineStep, PipelineValue};
pub use tree_shaking::{shake, TreeShaker, SIDE_EFFECT_SENTINEL};
pub use types::ModuleMap;
