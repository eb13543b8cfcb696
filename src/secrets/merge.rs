use std::collections::{BTreeMap, HashMap, HashSet};

use log::debug;

use crate::gitlab::model::Variable;

/// Counters reported after one merge pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub added: usize,
    pub skipped: usize,
}

/// Folds the fetched variables into the secrets mapping, in sequence order.
///
/// With `only_new` the merge is additive: keys already present are left
/// untouched and counted as skipped. Otherwise every variable is written,
/// overwriting on conflict. Duplicate keys within `variables` resolve to the
/// last one processed; [`duplicate_keys`] reports how many there were.
/// Keys are never removed from the mapping.
pub fn merge(
    secrets: &mut BTreeMap<String, String>,
    variables: &[Variable],
    only_new: bool,
) -> MergeOutcome {
    // only_new guards against keys that were present before this run, not
    // against duplicates within the fetched sequence, so the check is made
    // against a snapshot of the original key set.
    let existing: HashSet<String> = secrets.keys().cloned().collect();
    let mut outcome = MergeOutcome::default();
    for variable in variables {
        if only_new && existing.contains(&variable.key) {
            debug!("Skipping existing key: {}", variable.key);
            outcome.skipped += 1;
            continue;
        }
        debug!("Setting key: {}", variable.key);
        secrets.insert(variable.key.clone(), variable.value.clone());
        outcome.added += 1;
    }
    outcome
}

/// Number of keys appearing more than once in the filtered sequence, e.g.
/// the same key scoped to several environments that all passed the filter.
pub fn duplicate_keys(variables: &[Variable]) -> usize {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for variable in variables {
        *counts.entry(variable.key.as_str()).or_default() += 1;
    }
    counts.values().filter(|&&n| n > 1).count()
}
