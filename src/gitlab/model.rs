use log::debug;
use serde::Deserialize;

use crate::errors::SyncError;

/// One CI/CD variable record as returned by the GitLab project API.
///
/// `protected` and `masked` are carried through for logging but play no role
/// in filtering or merging. A missing or `*` environment scope means the
/// variable applies to every environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Variable {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub masked: bool,
    #[serde(default)]
    pub environment_scope: Option<String>,
}

impl Variable {
    pub fn is_global(&self) -> bool {
        matches!(self.environment_scope.as_deref(), None | Some("") | Some("*"))
    }
}

/// Decodes one page of the variables endpoint.
///
/// Returns the raw record count alongside the kept records: pagination
/// termination looks at how many records the API sent, not how many survived
/// the blank-key check. Records with an empty or whitespace-only key are
/// dropped here with a debug log.
pub fn decode_page(body: &str) -> Result<(usize, Vec<Variable>), SyncError> {
    let records: Vec<Variable> = serde_json::from_str(body).map_err(|source| SyncError::Decode {
        context: "variables page".to_string(),
        source,
    })?;
    let raw_count = records.len();
    let kept = records
        .into_iter()
        .filter(|v| {
            if v.key.trim().is_empty() {
                debug!(
                    "Dropping variable with blank key (scope: {:?})",
                    v.environment_scope
                );
                false
            } else {
                true
            }
        })
        .collect();
    Ok((raw_count, kept))
}
