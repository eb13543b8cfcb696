pub mod client;
pub mod filter;
pub mod model;

/// Connection settings for one GitLab project, resolved once per run from
/// flags and environment. Passed into the client rather than kept as shared
/// mutable state so nothing leaks between requests.
#[derive(Clone)]
pub struct GitLabConfig {
    pub endpoint: String,
    pub project_id: String,
    pub token: String,
}

impl std::fmt::Debug for GitLabConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitLabConfig")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .field("token", &"***redacted***")
            .finish()
    }
}
