//! Bundle emission
//!
//! Wraps each module body in a fixed registration template and concatenates
//! them dependencies-first. Bodies are inserted verbatim; `import`/`export`
//! statements are not rewritten here (a downstream consumer translates
//! them, or modules use the CommonJS fallback already present in their
//! body). Cycles are reported as diagnostics and never abort the bundle.

use log::{debug, warn};

use crate::{graph::ModuleGraph, types::ModuleMap};

/// A finished bundle plus its cycle diagnostics.
#[derive(Debug)]
pub struct BundleOutput {
    pub code: String,
    /// Participant module names of every detected import cycle.
    pub cycles: Vec<Vec<String>>,
}

/// Bundler over an immutable module map.
#[derive(Debug)]
pub struct Bundler<'a> {
    modules: &'a ModuleMap,
    graph: ModuleGraph,
}

impl<'a> Bundler<'a> {
    pub fn new(modules: &'a ModuleMap) -> Self {
        Self {
            modules,
            graph: ModuleGraph::build(modules),
        }
    }

    /// Emit the bundle for `entry`.
    pub fn bundle(&self, entry: &str) -> BundleOutput {
        let cycles = if self.graph.has_cycles() {
            let cycles = self.graph.find_cycle_paths();
            for cycle in &cycles {
                warn!("circular import chain: {}", cycle.join(" -> "));
            }
            cycles
        } else {
            Vec::new()
        };

        let order = self.graph.emission_order(entry);
        debug!("emitting {} modules", order.len());

        let mut parts = Vec::with_capacity(order.len() + 2);
        parts.push("var __modules__ = {};".to_string());
        for id in order {
            let node = &self.graph.modules[&id];
            if let Some(body) = self.modules.get(&node.name) {
                parts.push(wrap_module(&node.name, body));
            }
        }
        parts.push(format!("var __entry__ = __modules__['{entry}'];"));

        BundleOutput {
            code: parts.join("\n\n"),
            cycles,
        }
    }
}

/// The registration wrapper. `require`, `module` and `exports` are bound as
/// parameters of the inner function so the body can reference them without
/// leaking; the finished exports land in the shared `__modules__` table.
fn wrap_module(id: &str, body: &str) -> String {
    format!(
        "/* Module: {id} */\n\
         (function (modules, moduleName) {{\n\
         \x20\x20var module = {{ exports: {{}} }};\n\
         \x20\x20var exports = module.exports;\n\
         \x20\x20(function (require, module, exports) {{\n\
         {body}\n\
         \x20\x20}})(function (id) {{ return modules[id]; }}, module, exports);\n\
         \x20\x20modules[moduleName] = module.exports;\n\
         }})(__modules__, '{id}');"
    )
}

/// Build the graph for `modules` and emit the bundle for `entry`.
pub fn bundle(modules: &ModuleMap, entry: &str) -> BundleOutput {
    Bundler::new(modules).bundle(entry)
}
