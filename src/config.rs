//! Environment-driven configuration.
//!
//! Read once at startup. Nothing else in the crate touches the process
//! environment, so every component receives its settings through [`Config`].

use std::path::{Path, PathBuf};

use crate::ZetError;

/// Name of the notes repository, reported by `check`.
pub const REPO_NAME: &str = "zet";

const DEFAULT_EDITOR: &str = "vi";

/// Settings for one invocation of the tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    repo: Option<PathBuf>,
    editor: String,
    pager: Option<String>,
    git_user: Option<String>,
    repos: Option<PathBuf>,
    remote_override: bool,
}

impl Config {
    /// Builds a configuration purely from the environment.
    pub fn from_env() -> Self {
        ConfigBuilder::new().build()
    }

    /// Repository root, if configured.
    pub fn repo(&self) -> Option<&Path> {
        self.repo.as_deref()
    }

    /// Repository root, failing when `ZETDIR` is not set.
    pub fn require_repo(&self) -> Result<&Path, ZetError> {
        self.repo().ok_or(ZetError::MissingConfig("ZETDIR"))
    }

    pub fn editor(&self) -> &str {
        &self.editor
    }

    pub fn pager(&self) -> Option<&str> {
        self.pager.as_deref()
    }

    pub fn git_user(&self) -> Option<&str> {
        self.git_user.as_deref()
    }

    /// Parent directory of local repositories (`REPOS`).
    pub fn repos(&self) -> Option<&Path> {
        self.repos.as_deref()
    }

    /// True when `GIT_REMOTE` is set, skipping the remote-existence check.
    pub fn remote_override(&self) -> bool {
        self.remote_override
    }
}

/// Builder for [`Config`].
///
/// Explicit values win; unset fields fall back to their environment
/// variable, then to a default.
///
/// # Examples
///
/// ```
/// use zet::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .repo("/home/me/Repos/zet")
///     .editor("nvim")
///     .build();
///
/// assert_eq!(config.editor(), "nvim");
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    repo: Option<PathBuf>,
    editor: Option<String>,
    pager: Option<String>,
    git_user: Option<String>,
    repos: Option<PathBuf>,
    remote_override: Option<bool>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the repository root (`ZETDIR`).
    pub fn repo(mut self, repo: impl Into<PathBuf>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    /// Sets the editor executable (`EDITOR`).
    pub fn editor(mut self, editor: impl Into<String>) -> Self {
        self.editor = Some(editor.into());
        self
    }

    /// Sets the pager executable (`PAGER`).
    pub fn pager(mut self, pager: impl Into<String>) -> Self {
        self.pager = Some(pager.into());
        self
    }

    /// Sets the remote username (`GITUSER`).
    pub fn git_user(mut self, user: impl Into<String>) -> Self {
        self.git_user = Some(user.into());
        self
    }

    /// Sets the parent directory of local repositories (`REPOS`).
    pub fn repos(mut self, repos: impl Into<PathBuf>) -> Self {
        self.repos = Some(repos.into());
        self
    }

    /// Forces the remote-existence check on or off (`GIT_REMOTE`).
    pub fn remote_override(mut self, enabled: bool) -> Self {
        self.remote_override = Some(enabled);
        self
    }

    /// Builds the configuration, consulting the environment for unset fields.
    ///
    /// Empty environment values count as unset.
    pub fn build(self) -> Config {
        Config {
            repo: self.repo.or_else(|| env_var("ZETDIR").map(PathBuf::from)),
            editor: self
                .editor
                .or_else(|| env_var("EDITOR"))
                .unwrap_or_else(|| DEFAULT_EDITOR.to_string()),
            pager: self.pager.or_else(|| env_var("PAGER")),
            git_user: self.git_user.or_else(|| env_var("GITUSER")),
            repos: self.repos.or_else(|| env_var("REPOS").map(PathBuf::from)),
            remote_override: self
                .remote_override
                .unwrap_or_else(|| env_var("GIT_REMOTE").is_some()),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
