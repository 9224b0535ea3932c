//! Verdict reports printed by `trc-validate`

use serde::Serialize;
use trustroot_core::Trc;

use crate::chain::ChainError;
use crate::config::OutputFormat;
use crate::error::ErrorCategory;
use crate::info::UpdateInfo;

/// An accepted lineage
#[derive(Debug, Serialize)]
pub struct ChainReport<'a> {
    pub isd: u16,
    pub base_version: u64,
    pub updates: Vec<ReportEntry<'a>>,
}

/// One accepted update
#[derive(Debug, Serialize)]
pub struct ReportEntry<'a> {
    pub version: u64,
    #[serde(flatten)]
    pub info: &'a UpdateInfo,
}

/// The first rejected update of a lineage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub index: usize,
    pub version: u64,
    pub category: ErrorCategory,
    pub code: &'static str,
    pub message: String,
}

impl<'a> ChainReport<'a> {
    /// Pair each TRC after the first with its validation result
    pub fn new(trcs: &'a [Trc], infos: &'a [UpdateInfo]) -> Self {
        Self {
            isd: trcs.first().map(|t| t.isd().0).unwrap_or_default(),
            base_version: trcs.first().map(|t| t.base_version()).unwrap_or_default(),
            updates: trcs
                .iter()
                .skip(1)
                .zip(infos)
                .map(|(trc, info)| ReportEntry {
                    version: trc.version(),
                    info,
                })
                .collect(),
        }
    }

    /// Render in the requested format
    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(self),
            OutputFormat::Text => {
                let mut out = String::new();
                for entry in &self.updates {
                    out.push_str(&format!(
                        "ISD {} v{}: {:?} update, {} AS(es) with key changes, {} AS(es) with attribute changes\n",
                        self.isd,
                        entry.version,
                        entry.info.update_type,
                        entry.info.key_changes.affected_ases().len(),
                        entry.info.attribute_changes.len(),
                    ));
                }
                out.push_str("OK");
                Ok(out)
            }
        }
    }
}

impl Rejection {
    /// Render in the requested format
    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(self),
            OutputFormat::Text => Ok(format!(
                "REJECTED: update {} (version {}): {}",
                self.index, self.version, self.message
            )),
        }
    }
}

impl From<&ChainError> for Rejection {
    fn from(e: &ChainError) -> Self {
        Self {
            index: e.index,
            version: e.version,
            category: e.source.category(),
            code: e.source.code(),
            message: e.source.to_string(),
        }
    }
}
