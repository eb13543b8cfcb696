use std::time::Duration;

use log::debug;
use reqwest::Method;
use url::Url;

use super::model::{decode_page, Variable};
use super::GitLabConfig;
use crate::errors::SyncError;

/// Page size for the variables endpoint; 100 is the maximum GitLab accepts.
const PER_PAGE: usize = 100;

/// HTTP client for the GitLab project variables API.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    client: reqwest::Client,
    config: GitLabConfig,
}

impl GitLabClient {
    pub fn new(config: GitLabConfig) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .use_rustls_tls()
            .build()
            .map_err(|e| SyncError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn variables_url(&self) -> Result<Url, SyncError> {
        // Ensure the base URL ends with a trailing slash for proper path joining
        let mut endpoint = self.config.endpoint.clone();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let base = Url::parse(&endpoint).map_err(|e| {
            SyncError::Config(format!("invalid GitLab URL '{}': {e}", self.config.endpoint))
        })?;
        base.join(&format!(
            "api/v4/projects/{}/variables",
            self.config.project_id
        ))
        .map_err(|e| {
            SyncError::Config(format!(
                "could not build variables URL for project '{}': {e}",
                self.config.project_id
            ))
        })
    }

    /// Fetches the complete variable list for the project, one page at a
    /// time. Requests are issued strictly sequentially and never retried.
    /// A page with fewer than [`PER_PAGE`] records is the last one, so a
    /// project with an exact multiple of 100 variables costs one extra
    /// empty-page request.
    pub async fn list_variables(&self) -> Result<Vec<Variable>, SyncError> {
        let url = self.variables_url()?;
        let mut variables = Vec::new();
        let mut page: u32 = 1;

        loop {
            debug!("Requesting page {page} of {url}");
            let response = self
                .client
                .request(Method::GET, url.clone())
                .header("PRIVATE-TOKEN", &self.config.token)
                .query(&[("page", page.to_string()), ("per_page", PER_PAGE.to_string())])
                .send()
                .await
                .map_err(|source| SyncError::Transport {
                    url: url.to_string(),
                    source,
                })?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|source| SyncError::Transport {
                    url: url.to_string(),
                    source,
                })?;
            if !status.is_success() {
                return Err(SyncError::Api {
                    status,
                    url: url.to_string(),
                    body,
                });
            }

            let (raw_count, mut records) = decode_page(&body)?;
            debug!("Page {page}: {raw_count} records, kept {}", records.len());
            variables.append(&mut records);

            // Raw count, not kept count: dropped blank-key records must not
            // make a full page look like the last one.
            if raw_count < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(variables)
    }
}
