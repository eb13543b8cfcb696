use std::path::Path;

use anyhow::Result;
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use crate::errors::SyncError;
use crate::gitlab::client::GitLabClient;
use crate::gitlab::{filter, GitLabConfig};
use crate::secrets::{merge, project, store};

/// Fetches GitLab CI/CD project-level variables and writes them to the local
/// .NET user-secrets store.
#[derive(Parser, Debug)]
#[clap(name = "gitlab-secrets", bin_name = "gitlab-secrets", version, about)]
pub struct SyncCommand {
    /// GitLab project ID
    #[clap(long)]
    pub project_id: String,

    /// GitLab personal access token
    #[clap(long, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Base URL for the GitLab API
    #[clap(long, default_value = "https://gitlab.com")]
    pub gitlab_url: String,

    /// Only keep variables whose key starts with this prefix
    #[clap(long)]
    pub prefix: Option<String>,

    /// Only keep variables scoped to this environment (variables that apply
    /// to all environments are always kept)
    #[clap(long)]
    pub environment: Option<String>,

    /// Explicit UserSecretsId, instead of reading it from a .csproj file in
    /// the current directory
    #[clap(long)]
    pub user_secrets_id: Option<String>,

    /// Only add variables that do not already exist in secrets.json
    #[clap(long)]
    pub only_new: bool,

    /// Show detailed information about processed variables
    #[clap(short, long)]
    pub verbose: bool,
}

impl SyncCommand {
    /// Runs one sync: resolve configuration, fetch, filter, merge, save.
    /// The store is only written after the merge has completed, so any
    /// earlier failure leaves it untouched.
    pub async fn run(&self) -> Result<()> {
        setup_logging(self.verbose)?;

        let token = self.token.clone().ok_or_else(|| {
            SyncError::Config(
                "GitLab token is required. Provide it via --token or the GITLAB_TOKEN \
                 environment variable."
                    .to_string(),
            )
        })?;

        let user_secrets_id = match &self.user_secrets_id {
            Some(id) => id.clone(),
            None => project::find_user_secrets_id(Path::new(".")).ok_or_else(|| {
                SyncError::Config(
                    "UserSecretsId not found. Either provide it via --user-secrets-id or \
                     ensure a .csproj file with a UserSecretsId exists in the current directory."
                        .to_string(),
                )
            })?,
        };
        info!("Using UserSecretsId: {user_secrets_id}");

        let client = GitLabClient::new(GitLabConfig {
            endpoint: self.gitlab_url.clone(),
            project_id: self.project_id.clone(),
            token,
        })?;
        let variables = client.list_variables().await?;
        info!("Fetched {} variables from GitLab", variables.len());

        let variables = filter::apply(
            variables,
            self.prefix.as_deref(),
            self.environment.as_deref(),
        );
        let duplicates = merge::duplicate_keys(&variables);

        let path = store::secrets_path(&user_secrets_id)?;
        let mut secrets = store::load(&path)?;
        let outcome = merge::merge(&mut secrets, &variables, self.only_new);
        store::save(&path, &secrets)?;

        println!("Summary:");
        println!(
            "  - Processed {} variables (after filtering)",
            variables.len()
        );
        println!("  - Added {} new secrets", outcome.added);
        if self.only_new && outcome.skipped > 0 {
            println!("  - Skipped {} already existing keys", outcome.skipped);
        }
        if duplicates > 0 {
            println!(
                "  - {duplicates} keys had multiple values after filtering; \
                 the last value fetched wins"
            );
        }
        println!("Secrets written to: {}", path.display());

        Ok(())
    }
}

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gitlab_url_defaults_to_gitlab_com() {
        let cmd = SyncCommand::parse_from(["gitlab-secrets", "--project-id", "42"]);
        assert_eq!(cmd.gitlab_url, "https://gitlab.com");
        assert!(!cmd.only_new);
        assert!(cmd.prefix.is_none());
    }

    #[test]
    fn project_id_is_required() {
        let result = SyncCommand::try_parse_from(["gitlab-secrets"]);
        assert!(result.is_err());
    }

    #[test]
    fn all_flags_parse() {
        let cmd = SyncCommand::parse_from([
            "gitlab-secrets",
            "--project-id",
            "42",
            "--token",
            "glpat-x",
            "--gitlab-url",
            "https://gitlab.example.com",
            "--prefix",
            "APP_",
            "--environment",
            "production",
            "--user-secrets-id",
            "my-id",
            "--only-new",
            "--verbose",
        ]);
        assert_eq!(cmd.project_id, "42");
        assert_eq!(cmd.token.as_deref(), Some("glpat-x"));
        assert_eq!(cmd.gitlab_url, "https://gitlab.example.com");
        assert_eq!(cmd.prefix.as_deref(), Some("APP_"));
        assert_eq!(cmd.environment.as_deref(), Some("production"));
        assert_eq!(cmd.user_secrets_id.as_deref(), Some("my-id"));
        assert!(cmd.only_new);
        assert!(cmd.verbose);
    }
}
