//! Remote repository URLs and cloning
//!
//! Cloning goes through the system `git` binary, which handles SSH
//! authentication natively via the user's agent and configuration.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::process::{command_line, CommandRunner};
use crate::session::tmux::check;
use crate::session::SessionError;

/// `https://host/owner/repo[.git]`
const HTTPS_PATTERN: &str = r"^https://[^/\s]+/[^/\s]+/([^/\s]+?)(?:\.git)?/?$";
/// `git@host:owner/repo[.git]`
const SSH_PATTERN: &str = r"^git@[^:/\s]+:[^/\s]+/([^/\s]+?)(?:\.git)?$";

fn patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [HTTPS_PATTERN, SSH_PATTERN]
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    })
}

/// A repository URL in one of the two accepted forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrl {
    url: String,
    name: String,
}

impl RemoteUrl {
    /// Parse a URL, returning None unless it matches an accepted form
    pub fn parse(raw: &str) -> Option<Self> {
        let url = raw.trim();
        patterns().iter().find_map(|re| {
            let name = re.captures(url)?.get(1)?.as_str();
            Some(Self {
                url: url.to_string(),
                name: name.to_string(),
            })
        })
    }

    /// The URL as given (trimmed)
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Short repository name (last path segment without `.git`)
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Whether `text` would be accepted by [`RemoteUrl::parse`]
pub fn looks_like_remote_url(text: &str) -> bool {
    RemoteUrl::parse(text).is_some()
}

/// Clone `url` into `dest` with the system git client
pub fn clone_repository<R: CommandRunner + ?Sized>(
    runner: &R,
    url: &RemoteUrl,
    dest: &Path,
) -> Result<(), SessionError> {
    let args = vec![
        "clone".to_string(),
        url.as_str().to_string(),
        dest.to_string_lossy().into_owned(),
    ];
    tracing::info!("Cloning {} into {}", url.as_str(), dest.display());
    let output = runner
        .output("git", &args)
        .map_err(|source| SessionError::Spawn {
            command: command_line("git", &args),
            source,
        })?;
    check("git", &args, output).map(|_| ())
}
