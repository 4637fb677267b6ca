//! Runs diagnostic commands without going through a shell.
//!
//! Command lines are split with POSIX quoting rules, so a quoted argument such
//! as the whois query `"n 2001:db8::1"` stays a single argv entry. Standard
//! output and standard error share one pipe and come back as a single buffer,
//! interleaved the way a terminal would have shown them.

use std::io::{self, Read};
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::CommandError;

#[derive(Debug)]
pub struct CommandOutput {
    /// Combined stdout and stderr.
    pub output: Vec<u8>,
    pub status: ExitStatus,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `line` to completion and returns what it printed.
    ///
    /// A non-zero exit or a kill by signal is an error; the error still
    /// carries whatever the command printed.
    async fn run(&self, line: &str) -> Result<CommandOutput, CommandError>;
}

/// Runs commands as real child processes.
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, line: &str) -> Result<CommandOutput, CommandError> {
        run_command(line).await
    }
}

/// Splits a command line into argv tokens.
pub fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    let tokens: Vec<String> =
        shlex::split(line).ok_or_else(|| CommandError::Tokenize(line.to_string()))?;
    if tokens.is_empty() {
        return Err(CommandError::Empty);
    }
    Ok(tokens)
}

pub async fn run_command(line: &str) -> Result<CommandOutput, CommandError> {
    let argv: Vec<String> = tokenize(line)?;
    let (program, args) = argv.split_first().ok_or(CommandError::Empty)?;

    let (mut reader, writer) = io::pipe().map_err(CommandError::Capture)?;
    let stderr_writer = writer.try_clone().map_err(CommandError::Capture)?;

    let mut cmd: Command = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(writer)
        .stderr(stderr_writer);

    let mut child = cmd.spawn().map_err(|source| CommandError::Spawn {
        program: program.clone(),
        source,
    })?;
    // The command still owns our copies of the write end; the reader only
    // sees EOF once they are gone.
    drop(cmd);

    let capture = tokio::task::spawn_blocking(move || -> io::Result<Vec<u8>> {
        let mut buffer: Vec<u8> = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Ok(buffer)
    });

    let status: ExitStatus = child.wait().await.map_err(CommandError::Capture)?;
    let output: Vec<u8> = capture
        .await
        .map_err(|e| CommandError::Capture(io::Error::other(e)))?
        .map_err(CommandError::Capture)?;

    match status.code() {
        Some(0) => Ok(CommandOutput { output, status }),
        Some(_) => Err(CommandError::Exit {
            program: program.clone(),
            status,
            output,
        }),
        None => Err(CommandError::Signaled {
            program: program.clone(),
            output,
        }),
    }
}
