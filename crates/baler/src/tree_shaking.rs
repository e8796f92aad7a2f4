//! Tree shaker that empties unreachable, effect-free modules
//!
//! Reachability runs over the module graph from the entry. Every import
//! marks the complete export set of the imported module as used (the usage
//! map is deliberately coarse: importers are not inspected for which names
//! they actually reference), and re-export sources are pulled into the
//! reachable set. Side-effecting modules are pinned through a sentinel
//! export name so their bodies survive even with no used exports.

use std::collections::VecDeque;

use log::{debug, trace};

use crate::{
    graph::ModuleGraph,
    types::{FxIndexMap, FxIndexSet, ModuleMap},
};

/// Synthetic export name that keeps a module body alive even when no real
/// export of it is used.
pub const SIDE_EFFECT_SENTINEL: &str = "__side_effects__";

/// Tree shaker over a prebuilt module graph.
#[derive(Debug)]
pub struct TreeShaker<'a> {
    graph: &'a ModuleGraph,
    /// Live export names per module name.
    usage: FxIndexMap<String, FxIndexSet<String>>,
    /// Modules reached from the entry.
    visited: FxIndexSet<String>,
}

impl<'a> TreeShaker<'a> {
    /// Create a tree shaker from an existing graph.
    pub fn from_graph(graph: &'a ModuleGraph) -> Self {
        Self {
            graph,
            usage: FxIndexMap::default(),
            visited: FxIndexSet::default(),
        }
    }

    /// Walk the graph from `entry`, filling the usage map.
    pub fn analyze(&mut self, entry: &str) {
        debug!("Starting tree-shaking analysis from entry module: {entry}");

        let mut worklist = VecDeque::new();
        self.visited.insert(entry.to_string());
        worklist.push_back(entry.to_string());

        while let Some(name) = worklist.pop_front() {
            let Some(node) = self.graph.get(&name) else {
                // Missing module: no exports, nothing to enqueue.
                trace!("module '{name}' is not in the map; treated as empty");
                continue;
            };
            for dep in &node.imports {
                if let Some(dep_node) = self.graph.get(dep) {
                    self.usage
                        .entry(dep.clone())
                        .or_default()
                        .extend(dep_node.exports.iter().cloned());
                }
                if self.visited.insert(dep.clone()) {
                    worklist.push_back(dep.clone());
                }
            }
            for source in &node.reexport_sources {
                if self.visited.insert(source.clone()) {
                    worklist.push_back(source.clone());
                }
            }
        }

        // Pin every reachable side-effecting module.
        for name in &self.visited {
            if let Some(node) = self.graph.get(name) {
                if node.has_side_effects {
                    self.usage
                        .entry(name.clone())
                        .or_default()
                        .insert(SIDE_EFFECT_SENTINEL.to_string());
                }
            }
        }

        debug!(
            "Tree-shaking analysis complete: {} of {} modules reachable",
            self.visited.len(),
            self.graph.modules.len()
        );
    }

    /// Exports considered live for a module.
    pub fn used_exports_for_module(&self, name: &str) -> Option<&FxIndexSet<String>> {
        self.usage.get(name)
    }

    /// Check if an export survives tree-shaking.
    pub fn is_export_used(&self, module: &str, export: &str) -> bool {
        self.usage
            .get(module)
            .is_some_and(|used| used.contains(export))
    }

    /// Whether a module was reached from the entry.
    pub fn is_reachable(&self, name: &str) -> bool {
        self.visited.contains(name)
    }

    /// Produce the shaken module map: the entry and every used or
    /// side-effecting module verbatim, everything else emptied. Input
    /// insertion order is preserved.
    pub fn apply(&self, modules: &ModuleMap, entry: &str) -> ModuleMap {
        let mut output = ModuleMap::default();
        for (name, source) in modules {
            let keep = name == entry
                || self.usage.get(name).is_some_and(|used| !used.is_empty())
                || self.graph.get(name).is_some_and(|node| node.has_side_effects);
            if !keep {
                trace!("emptying unused module '{name}'");
            }
            output.insert(
                name.clone(),
                if keep { source.clone() } else { String::new() },
            );
        }
        output
    }
}

/// Build the graph for `modules`, analyze reachability from `entry`, and
/// return the shaken map.
pub fn shake(modules: &ModuleMap, entry: &str) -> ModuleMap {
    let graph = ModuleGraph::build(modules);
    let mut shaker = TreeShaker::from_graph(&graph);
    shaker.analyze(entry);
    shaker.apply(modules, entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module_map(entries: &[(&str, &str)]) -> ModuleMap {
        entries
            .iter()
            .map(|(name, source)| (name.to_string(), source.to_string()))
            .collect()
    }

    #[test]
    fn unreachable_pure_module_is_emptied() {
        let modules = module_map(&[
            ("./index.js", "import { used } from './used.js'; used();"),
            ("./used.js", "export function used() { return 1; }"),
            ("./dead.js", "export function dead() { return 2; }"),
        ]);
        let shaken = shake(&modules, "./index.js");
        assert_eq!(shaken["./used.js"], modules["./used.js"]);
        assert_eq!(shaken["./dead.js"], "");
        assert_eq!(shaken["./index.js"], modules["./index.js"]);
    }

    #[test]
    fn imports_mark_all_exports_used() {
        // The usage map is coarse: importing one name keeps every export.
        let modules = module_map(&[
            ("./index.js", "import { one } from './multi.js'; one();"),
            (
                "./multi.js",
                "export const one = 1; export const two = 2;",
            ),
        ]);
        let graph = ModuleGraph::build(&modules);
        let mut shaker = TreeShaker::from_graph(&graph);
        shaker.analyze("./index.js");
        assert!(shaker.is_export_used("./multi.js", "one"));
        assert!(shaker.is_export_used("./multi.js", "two"));
    }

    #[test]
    fn side_effecting_module_survives_without_used_exports() {
        let modules = module_map(&[
            ("./index.js", "export const nothing = 0;"),
            ("./tracker.js", "const t = new Tracker();"),
        ]);
        let shaken = shake(&modules, "./index.js");
        // Unreachable but side-effecting: kept verbatim.
        assert_eq!(shaken["./tracker.js"], modules["./tracker.js"]);
    }

    #[test]
    fn reachable_side_effecting_module_gets_the_sentinel() {
        let modules = module_map(&[
            ("./index.js", "import './boot.js';"),
            ("./boot.js", "new App();"),
        ]);
        let graph = ModuleGraph::build(&modules);
        let mut shaker = TreeShaker::from_graph(&graph);
        shaker.analyze("./index.js");
        assert!(shaker.is_export_used("./boot.js", SIDE_EFFECT_SENTINEL));
    }

    #[test]
    fn reexport_sources_are_pulled_into_reachability() {
        let modules = module_map(&[
            ("./index.js", "import { a } from './facade.js'; a();"),
            ("./facade.js", "export * from './impl.js';"),
            ("./impl.js", "import './deep.js'; export const a = 1;"),
            ("./deep.js", "new Probe();"),
        ]);
        let graph = ModuleGraph::build(&modules);
        let mut shaker = TreeShaker::from_graph(&graph);
        shaker.analyze("./index.js");
        assert!(shaker.is_reachable("./impl.js"));
        assert!(shaker.is_reachable("./deep.js"));
        assert!(shaker.is_export_used("./deep.js", SIDE_EFFECT_SENTINEL));
    }

    #[test]
    fn missing_dependency_is_treated_as_exporting_nothing() {
        let modules = module_map(&[("./index.js", "import { gone } from './missing.js';")]);
        let shaken = shake(&modules, "./index.js");
        assert_eq!(shaken.len(), 1);
        assert_eq!(shaken["./index.js"], modules["./index.js"]);
    }

    #[test]
    fn entry_is_always_kept_verbatim() {
        let modules = module_map(&[("./index.js", "   // nothing here\n")]);
        let shaken = shake(&modules, "./index.js");
        assert_eq!(shaken["./index.js"], modules["./index.js"]);
    }

    #[test]
    fn output_preserves_insertion_order() {
        let modules = module_map(&[
            ("./z.js", "export const z = 1;"),
            ("./index.js", "import { z } from './z.js';"),
            ("./a.js", "export const a = 1;"),
        ]);
        let shaken = shake(&modules, "./index.js");
        let keys: Vec<_> = shaken.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["./z.js", "./index.js", "./a.js"]);
        assert_eq!(shaken["./a.js"], "");
    }
}
