use std::io;
use std::process::ExitStatus;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("invalid login endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("login request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("failed to login, got '{0}' response")]
    Status(StatusCode),
    #[error("failed to login, couldn't find a session ID in response")]
    MissingSessionCookie,
}

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("lookup of '{host}' failed: {source}")]
    Lookup {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("could not find IPv6 address for '{host}'")]
    NoIpv6Address { host: String },
    #[error("site list is empty, nothing to pick from")]
    NoCandidates,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unbalanced quoting in command line: {0}")]
    Tokenize(String),
    #[error("empty command line")]
    Empty,
    #[error("couldn't start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("couldn't capture command output: {0}")]
    Capture(#[source] io::Error),
    #[error("'{program}' exited with {status}")]
    Exit {
        program: String,
        status: ExitStatus,
        /// Combined output captured before the exit.
        output: Vec<u8>,
    },
    #[error("'{program}' was terminated by a signal")]
    Signaled { program: String, output: Vec<u8> },
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("invalid submission endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("submission request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("submission rejected with status '{0}'")]
    Status(StatusCode),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("test '{test}' aborted the run: {source}")]
    Command {
        test: &'static str,
        #[source]
        source: CommandError,
    },
    #[error("test task failed to complete: {0}")]
    Join(#[from] tokio::task::JoinError),
}
