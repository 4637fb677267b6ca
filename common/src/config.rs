use std::fmt;
use std::str::FromStr;

use url::Url;

pub const DEFAULT_PORTAL: &str = "https://ipv6.he.net/";

/// What the dispatcher does when a diagnostic command cannot be run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandErrorPolicy {
    /// Log the failure and drop only that test.
    Skip,
    /// Stop the whole run with an error.
    Abort,
}

impl FromStr for CommandErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            _ => Err(format!("invalid command error policy: {s} (expected 'skip' or 'abort')")),
        }
    }
}

impl fmt::Display for CommandErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => f.write_str("skip"),
            Self::Abort => f.write_str("abort"),
        }
    }
}

pub struct Config {
    /// Base URL of the certification portal. Login and submission
    /// endpoints are resolved relative to it.
    pub portal: Url,
    /// Runs every command but never submits the output.
    pub dry_run: bool,
    pub on_command_error: CommandErrorPolicy,
    /// Ignores `HTTP_PROXY` and friends when building the HTTP client.
    pub no_proxy: bool,
}

impl Config {
    pub fn new(portal: Url, on_command_error: CommandErrorPolicy) -> Self {
        Self {
            portal,
            dry_run: false,
            on_command_error,
            no_proxy: false,
        }
    }

    /// Resolves `path` against the portal base URL.
    ///
    /// The base is treated as a directory, so `https://host/cert` and
    /// `https://host/cert/` give the same endpoints.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        if self.portal.path().ends_with('/') {
            return self.portal.join(path);
        }
        let mut base: Url = self.portal.clone();
        base.set_path(&format!("{}/", self.portal.path()));
        base.join(path)
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
