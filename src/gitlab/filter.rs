use log::info;

use super::model::Variable;

/// Keeps variables whose key starts with `prefix`, ignoring ASCII case.
/// Byte-wise comparison, not locale-aware. Order is preserved.
pub fn by_prefix(variables: Vec<Variable>, prefix: &str) -> Vec<Variable> {
    variables
        .into_iter()
        .filter(|v| {
            v.key.len() >= prefix.len()
                && v.key.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
        })
        .collect()
}

/// Keeps variables scoped to `environment`, plus every global variable.
/// Global variables (no scope, empty scope, or `*`) pass every environment
/// filter; that is intentional, not a hole in the filter.
pub fn by_environment(variables: Vec<Variable>, environment: &str) -> Vec<Variable> {
    variables
        .into_iter()
        .filter(|v| {
            v.is_global()
                || v.environment_scope
                    .as_deref()
                    .is_some_and(|scope| scope.eq_ignore_ascii_case(environment))
        })
        .collect()
}

/// Applies both filter stages in fixed order: prefix, then environment.
/// A stage with no criterion is skipped outright.
pub fn apply(
    mut variables: Vec<Variable>,
    prefix: Option<&str>,
    environment: Option<&str>,
) -> Vec<Variable> {
    if let Some(prefix) = prefix {
        variables = by_prefix(variables, prefix);
        info!(
            "Filtered to {} variables with prefix '{prefix}'",
            variables.len()
        );
    }
    if let Some(environment) = environment {
        variables = by_environment(variables, environment);
        info!(
            "Filtered to {} variables for environment '{environment}' (including global variables)",
            variables.len()
        );
    }
    variables
}
