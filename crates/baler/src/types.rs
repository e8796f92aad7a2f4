//! Shared type definitions for the baler crate
//!
//! This module contains common aliases that are used across multiple
//! components of the bundler, ensuring consistency and avoiding circular
//! dependencies.

use std::hash::BuildHasherDefault;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHasher;

/// Type alias for FxHasher-based IndexMap
pub type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Type alias for FxHasher-based IndexSet
pub type FxIndexSet<T> = IndexSet<T, BuildHasherDefault<FxHasher>>;

/// Ordered mapping from module id to source text.
///
/// Module ids are the literal specifier strings used in `import` / `export
/// ... from` statements, quotes stripped, with no path normalization.
/// Iteration order is insertion order; callers rely on it for deterministic
/// output.
pub type ModuleMap = FxIndexMap<String, String>;
