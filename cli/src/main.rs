mod commands;
mod terminal;

use commands::{CommandLine, Commands, direct, random};
use hecert_common::config::{CommandErrorPolicy, Config, Credentials};
use terminal::{logging, print};
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init();
    print::banner();

    let policy: CommandErrorPolicy = commands
        .on_command_error
        .unwrap_or_else(|| commands.command.default_policy());
    let cfg = Config {
        portal: commands.portal,
        dry_run: commands.dryrun,
        on_command_error: policy,
        no_proxy: commands.no_proxy,
    };
    debug!("Command errors will {}, dry run: {}", policy, cfg.dry_run);

    let creds = Credentials::new(commands.username, commands.password);

    match commands.command {
        Commands::Direct { host } => {
            print::header("direct mode");
            direct::direct(&host, &creds, &cfg).await
        }
        Commands::Random { sites, attempts } => {
            print::header("random mode");
            random::random(&sites, attempts, &creds, &cfg).await
        }
    }
}
