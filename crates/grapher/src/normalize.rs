use crate::config::OffsetPolicy;
use crate::error::Result;
use crate::offsets::{ConversionReport, OffsetConverter};
use code_graph::{make_uri, validate_defs, validate_docs, validate_refs, OffsetType, Output, Ref};
use std::path::Path;

/// What a normalization pass did
#[derive(Debug, Default)]
pub struct NormalizeReport {
    /// Refs whose `def_repo` changed spelling
    pub rewritten_refs: usize,

    /// Set when offsets were converted
    pub conversion: Option<ConversionReport>,
}

impl NormalizeReport {
    pub fn converted_offsets(&self) -> bool {
        self.conversion.is_some()
    }
}

/// Turns raw grapher output into canonical output
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    policy: OffsetPolicy,
}

impl Normalizer {
    pub fn new(policy: OffsetPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &OffsetPolicy {
        &self.policy
    }

    /// Canonicalize `output` in place.
    ///
    /// Rewrites ref repositories into URIs, converts offsets when needed,
    /// validates refs, defs and docs (first violation aborts), then sorts.
    /// On error the output may be partly converted and unsorted.
    pub fn normalize(
        &self,
        offset_type: OffsetType,
        unit_type: &str,
        dir: &Path,
        output: &mut Output,
    ) -> Result<NormalizeReport> {
        let mut report = NormalizeReport {
            rewritten_refs: rewrite_ref_repos(&mut output.refs),
            conversion: None,
        };

        if self.policy.needs_conversion(offset_type, unit_type) {
            let mut converter = OffsetConverter::new(dir);
            let conversion = converter.convert_output(output);
            if !conversion.warnings.is_empty() {
                log::warn!(
                    "{} of {} records in unit type {unit_type:?} kept unconverted offsets",
                    conversion.failed(),
                    output.len()
                );
            }
            report.conversion = Some(conversion);
        } else {
            log::debug!(
                "Keeping offsets as byte offsets (offset type {}, unit type {unit_type:?})",
                offset_type.as_str()
            );
        }

        validate_refs(&output.refs)?;
        validate_defs(&output.defs)?;
        validate_docs(&output.docs)?;

        output.sort();
        Ok(report)
    }
}

/// Canonicalize `output` with the default offset policy
pub fn normalize_data(
    offset_type: OffsetType,
    unit_type: &str,
    dir: &Path,
    output: &mut Output,
) -> Result<NormalizeReport> {
    Normalizer::default().normalize(offset_type, unit_type, dir, output)
}

/// Refs with an empty `def_repo` point into the same repository and stay as they are.
fn rewrite_ref_repos(refs: &mut [Ref]) -> usize {
    let mut rewritten = 0;
    for r in refs.iter_mut().filter(|r| !r.def_repo.is_empty()) {
        let uri = make_uri(&r.def_repo);
        if uri != r.def_repo {
            r.def_repo = uri;
            rewritten += 1;
        }
    }
    rewritten
}
