//! Pass sequencer
//!
//! Threads a value through a caller-chosen sequence of passes. The value is
//! a module map until a bundle step collapses it to a single source string;
//! feeding the wrong shape to a pass is a usage error and terminates the
//! run. Cycle diagnostics surfaced by bundle steps accumulate on the run
//! result.

use anyhow::{bail, Result};
use log::{debug, info};

use crate::{
    code_generator,
    config::PipelineOptions,
    minifier, obfuscator, tree_shaking,
    types::ModuleMap,
};

/// One pass of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    TreeShake,
    Bundle,
    Minify,
    Obfuscate,
}

/// The value flowing between passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineValue {
    Modules(ModuleMap),
    Source(String),
}

impl PipelineValue {
    /// The bundled source, if the pipeline has produced one.
    pub fn into_source(self) -> Option<String> {
        match self {
            PipelineValue::Source(source) => Some(source),
            PipelineValue::Modules(_) => None,
        }
    }
}

/// A finished pipeline run.
#[derive(Debug)]
pub struct PipelineRun {
    pub value: PipelineValue,
    /// Cycle diagnostics collected from bundle steps.
    pub cycles: Vec<Vec<String>>,
}

/// Run `steps` over `modules`, threading each step's output into the next.
pub fn run_pipeline(
    steps: &[PipelineStep],
    entry: &str,
    modules: ModuleMap,
    options: &PipelineOptions,
) -> Result<PipelineRun> {
    info!("Starting pipeline: {} steps, entry '{entry}'", steps.len());

    let mut value = PipelineValue::Modules(modules);
    let mut cycles = Vec::new();

    for &step in steps {
        debug!("Running step {step:?}");
        value = match (step, value) {
            (PipelineStep::TreeShake, PipelineValue::Modules(map)) => {
                PipelineValue::Modules(tree_shaking::shake(&map, entry))
            }
            (PipelineStep::Bundle, PipelineValue::Modules(map)) => {
                let output = code_generator::bundle(&map, entry);
                cycles.extend(output.cycles);
                PipelineValue::Source(output.code)
            }
            (PipelineStep::Minify, PipelineValue::Source(source)) => {
                PipelineValue::Source(minifier::minify_with_options(&source, &options.minify))
            }
            (PipelineStep::Obfuscate, PipelineValue::Source(source)) => {
                PipelineValue::Source(obfuscator::obfuscate(&source, &options.obfuscate))
            }
            (PipelineStep::TreeShake | PipelineStep::Bundle, PipelineValue::Source(_)) => {
                bail!("step {step:?} requires a module map, but a previous step already bundled")
            }
            (PipelineStep::Minify | PipelineStep::Obfuscate, PipelineValue::Modules(_)) => {
                bail!("step {step:?} requires bundled source; run a bundle step first")
            }
        };
    }

    info!("Pipeline complete");
    Ok(PipelineRun { value, cycles })
}
