//! Module dependency graph for JavaScript bundling
//!
//! One node per module-map entry; one edge importer → imported for every
//! static import whose specifier is a key of the map. Imports of unknown
//! specifiers never become edges (the bundler skips them and the
//! tree-shaker treats them as exporting nothing). The graph also records
//! per-module export names, re-export sources and the side-effect flag, and
//! provides cycle diagnostics plus the depth-first emission order.

use log::debug;
use petgraph::{
    algo::is_cyclic_directed,
    graph::{DiGraph, NodeIndex},
};
use rustc_hash::FxHashMap;

use crate::{
    lexer::tokenize,
    module_syntax::{find_module_syntax, ExportKind},
    side_effects,
    types::{FxIndexMap, FxIndexSet, ModuleMap},
};

/// Unique identifier for a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId(u32);

impl ModuleId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying u32 value of the ModuleId
    #[inline]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

/// Everything the downstream passes need to know about one module.
#[derive(Debug, Clone)]
pub struct ModuleNode {
    pub id: ModuleId,
    /// Module id string as used in import specifiers.
    pub name: String,
    /// Import specifiers as written, in source order.
    pub imports: FxIndexSet<String>,
    /// Exported names; `default` and `*` are reserved names.
    pub exports: FxIndexSet<String>,
    /// Sources of `export ... from "x"` statements.
    pub reexport_sources: FxIndexSet<String>,
    /// Whether the module body must be kept even if nothing imports it.
    pub has_side_effects: bool,
}

/// DFS node colors for cycle path search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// State for the cycle path search.
struct CycleSearchState {
    visited: FxHashMap<ModuleId, Color>,
    path: Vec<ModuleId>,
    cycles: Vec<Vec<ModuleId>>,
}

/// Dependency graph over all modules of a module map.
#[derive(Debug)]
pub struct ModuleGraph {
    /// All modules, in module-map insertion order.
    pub modules: FxIndexMap<ModuleId, ModuleNode>,
    /// Module name to ID mapping
    pub module_names: FxHashMap<String, ModuleId>,
    /// Petgraph storage for efficient algorithms
    graph: DiGraph<ModuleId, ()>,
    /// Node index mapping
    node_indices: FxHashMap<ModuleId, NodeIndex>,
    /// Next module ID to allocate
    next_module_id: u32,
}

impl Default for ModuleGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            modules: FxIndexMap::default(),
            module_names: FxHashMap::default(),
            graph: DiGraph::new(),
            node_indices: FxHashMap::default(),
            next_module_id: 0,
        }
    }

    /// Build the graph for every module in `modules`, tokenizing each source
    /// once and extracting its module syntax.
    pub fn build(modules: &ModuleMap) -> Self {
        let mut graph = Self::new();
        for (name, source) in modules {
            let tokens = tokenize(source);
            let syntax = find_module_syntax(&tokens);

            let id = graph.add_module(name.clone());
            let node = &mut graph.modules[&id];
            node.has_side_effects = side_effects::module_has_side_effects(&tokens);
            for import in &syntax.imports {
                node.imports.insert(import.source.clone());
            }
            for export in &syntax.exports {
                match export.kind {
                    ExportKind::Default => {
                        node.exports.insert("default".to_string());
                    }
                    ExportKind::Named => {
                        node.exports.extend(export.names.iter().cloned());
                    }
                    ExportKind::All => {
                        node.exports.insert("*".to_string());
                    }
                }
                if let Some(source) = &export.source {
                    node.reexport_sources.insert(source.clone());
                }
            }
        }

        // Second pass: edges exist only for specifiers defined in the map.
        for idx in 0..graph.modules.len() {
            let (id, imports) = {
                let node = &graph.modules[idx];
                (node.id, node.imports.clone())
            };
            for specifier in &imports {
                if let Some(&dep) = graph.module_names.get(specifier) {
                    graph.add_dependency(id, dep);
                } else {
                    debug!("skipping import of unknown module '{specifier}'");
                }
            }
        }

        graph
    }

    /// Add an empty module node, allocating its id.
    pub fn add_module(&mut self, name: String) -> ModuleId {
        let id = ModuleId::new(self.next_module_id);
        self.next_module_id += 1;
        self.module_names.insert(name.clone(), id);
        self.modules.insert(
            id,
            ModuleNode {
                id,
                name,
                imports: FxIndexSet::default(),
                exports: FxIndexSet::default(),
                reexport_sources: FxIndexSet::default(),
                has_side_effects: false,
            },
        );
        let node_idx = self.graph.add_node(id);
        self.node_indices.insert(id, node_idx);
        id
    }

    /// Add an edge `from` → `to` (from imports to).
    pub fn add_dependency(&mut self, from: ModuleId, to: ModuleId) {
        if let (Some(&from_idx), Some(&to_idx)) =
            (self.node_indices.get(&from), self.node_indices.get(&to))
        {
            if !self.graph.contains_edge(from_idx, to_idx) {
                self.graph.add_edge(from_idx, to_idx, ());
            }
        }
    }

    /// Get a module by name
    pub fn get(&self, name: &str) -> Option<&ModuleNode> {
        self.module_names.get(name).and_then(|id| self.modules.get(id))
    }

    /// Get all modules that a given module imports.
    pub fn dependencies_of(&self, id: ModuleId) -> Vec<ModuleId> {
        if let Some(&node_idx) = self.node_indices.get(&id) {
            self.graph
                .neighbors_directed(node_idx, petgraph::Direction::Outgoing)
                .map(|idx| self.graph[idx])
                .collect()
        } else {
            vec![]
        }
    }

    /// Get all modules that import a given module.
    pub fn dependents_of(&self, id: ModuleId) -> Vec<ModuleId> {
        if let Some(&node_idx) = self.node_indices.get(&id) {
            self.graph
                .neighbors_directed(node_idx, petgraph::Direction::Incoming)
                .map(|idx| self.graph[idx])
                .collect()
        } else {
            vec![]
        }
    }

    /// Check if the graph has cycles
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Find cycle paths using DFS with three-color marking. Each reported
    /// cycle lists the participating module names in path order.
    pub fn find_cycle_paths(&self) -> Vec<Vec<String>> {
        let mut state = CycleSearchState {
            visited: self.modules.keys().map(|&id| (id, Color::White)).collect(),
            path: Vec::new(),
            cycles: Vec::new(),
        };

        for &id in self.modules.keys() {
            if state.visited[&id] == Color::White {
                self.dfs_find_cycles(id, &mut state);
            }
        }

        state
            .cycles
            .into_iter()
            .map(|cycle| {
                cycle
                    .into_iter()
                    .filter_map(|id| self.modules.get(&id).map(|node| node.name.clone()))
                    .collect()
            })
            .collect()
    }

    /// DFS helper for finding cycles
    fn dfs_find_cycles(&self, id: ModuleId, state: &mut CycleSearchState) {
        state.visited.insert(id, Color::Gray);
        state.path.push(id);

        for neighbor in self.edges_in_source_order(id) {
            match state.visited.get(&neighbor).unwrap_or(&Color::White) {
                Color::White => self.dfs_find_cycles(neighbor, state),
                Color::Gray => {
                    // Back edge: the tail of the path from the target is a cycle.
                    if let Some(start) = state.path.iter().position(|&n| n == neighbor) {
                        state.cycles.push(state.path[start..].to_vec());
                    }
                }
                Color::Black => {}
            }
        }

        state.path.pop();
        state.visited.insert(id, Color::Black);
    }

    /// Depth-first topological emission order: the entry subtree first with
    /// dependencies before their importers (back edges skipped), then any
    /// remaining modules in insertion order. Every module appears once.
    pub fn emission_order(&self, entry: &str) -> Vec<ModuleId> {
        let mut visited: FxHashMap<ModuleId, Color> =
            self.modules.keys().map(|&id| (id, Color::White)).collect();
        let mut order = Vec::with_capacity(self.modules.len());

        if let Some(&entry_id) = self.module_names.get(entry) {
            self.order_visit(entry_id, &mut visited, &mut order);
        }
        for &id in self.modules.keys() {
            if visited[&id] == Color::White {
                self.order_visit(id, &mut visited, &mut order);
            }
        }
        order
    }

    fn order_visit(
        &self,
        id: ModuleId,
        visited: &mut FxHashMap<ModuleId, Color>,
        order: &mut Vec<ModuleId>,
    ) {
        visited.insert(id, Color::Gray);
        for dep in self.edges_in_source_order(id) {
            if visited.get(&dep) == Some(&Color::White) {
                self.order_visit(dep, visited, order);
            }
            // Gray is a back edge (cycle participant), Black already placed.
        }
        visited.insert(id, Color::Black);
        order.push(id);
    }

    /// Graph edges of `id`, in the source order of the import statements.
    /// Petgraph's neighbor iteration is insertion-reversed, which would make
    /// emission order depend on edge registration order.
    fn edges_in_source_order(&self, id: ModuleId) -> impl Iterator<Item = ModuleId> + '_ {
        self.modules
            .get(&id)
            .into_iter()
            .flat_map(|node| node.imports.iter())
            .filter_map(|specifier| self.module_names.get(specifier).copied())
    }
}
