pub mod direct;
pub mod random;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hecert_common::config::{CommandErrorPolicy, DEFAULT_PORTAL};
use hecert_core::resolver::random::DEFAULT_ATTEMPTS;
use url::Url;

#[derive(Parser)]
#[command(name = "hecert")]
#[command(about = "Runs the Hurricane Electric IPv6 certification daily tests.")]
pub struct CommandLine {
    /// HE certification username
    #[arg(short, long)]
    pub username: String,
    /// HE certification password
    #[arg(short, long)]
    pub password: String,
    /// Base URL of the certification portal
    #[arg(long, default_value = DEFAULT_PORTAL)]
    pub portal: Url,
    /// Run every test but do not submit the results
    #[arg(long)]
    pub dryrun: bool,
    /// What to do when a test command cannot be run: 'skip' or 'abort'
    /// [default: skip for direct, abort for random]
    #[arg(long, value_name = "POLICY")]
    pub on_command_error: Option<CommandErrorPolicy>,
    /// Ignore proxy settings from the environment
    #[arg(long)]
    pub no_proxy: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Test against the given IPv6 hostname (must be a hostname, not an IP)
    #[command(alias = "d")]
    Direct {
        #[arg(long)]
        host: String,
    },
    /// Test against a random live site taken from a list
    #[command(alias = "r")]
    Random {
        /// File with one '<hostname> <ipv6 address>' pair per line
        #[arg(long)]
        sites: PathBuf,
        /// How many sites to probe before settling on an unverified one
        #[arg(long, default_value_t = DEFAULT_ATTEMPTS)]
        attempts: usize,
    },
}

impl Commands {
    pub fn default_policy(&self) -> CommandErrorPolicy {
        match self {
            Commands::Direct { .. } => CommandErrorPolicy::Skip,
            Commands::Random { .. } => CommandErrorPolicy::Abort,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
