use crate::normalize::Normalizer;
use anyhow::Context;
use code_graph::{OffsetType, Output};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A named, typed group of source files (package, module, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Type")]
    pub unit_type: String,

    /// Files relative to the repository root
    #[serde(rename = "Files", default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, unit_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit_type: unit_type.into(),
            files: Vec::new(),
        }
    }
}

/// Per-language analyzer producing raw graph output for one source unit
pub trait Grapher {
    /// Units in which this grapher reports positions
    fn offset_type(&self) -> OffsetType {
        OffsetType::Unspecified
    }

    fn graph(&self, dir: &Path, unit: &SourceUnit) -> anyhow::Result<Output>;
}

/// Run `grapher` over `unit` and return canonical output
pub fn run_grapher<G: Grapher + ?Sized>(
    grapher: &G,
    normalizer: &Normalizer,
    dir: &Path,
    unit: &SourceUnit,
) -> anyhow::Result<Output> {
    let mut output = grapher
        .graph(dir, unit)
        .with_context(|| format!("grapher failed on {} unit {}", unit.unit_type, unit.name))?;

    let report = normalizer
        .normalize(grapher.offset_type(), &unit.unit_type, dir, &mut output)
        .with_context(|| format!("normalizing output of {} unit {}", unit.unit_type, unit.name))?;

    log::debug!(
        "Graphed {} unit {}: {} defs, {} refs, {} docs, {} anns ({} ref repos rewritten)",
        unit.unit_type,
        unit.name,
        output.defs.len(),
        output.refs.len(),
        output.docs.len(),
        output.anns.len(),
        report.rewritten_refs
    );
    Ok(output)
}
