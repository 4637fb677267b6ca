use std::sync::Arc;

use anyhow::Context;
use hecert_common::config::{Config, Credentials};
use hecert_common::daily::DAILY_TESTS;
use hecert_common::target::Target;
use hecert_core::command::SystemRunner;
use hecert_core::dispatcher::{self, DispatchReport};
use hecert_core::{resolver, session};
use tracing::info;

use crate::terminal::print;

pub async fn direct(host: &str, creds: &Credentials, cfg: &Config) -> anyhow::Result<()> {
    let session = session::login(cfg, creds)
        .await
        .context("authentication failed")?;
    info!("Logged in as '{}'", creds.username);

    let target: Target = resolver::resolve_direct(host)
        .await
        .context("target resolution failed")?;
    info!("Testing against {}", target);

    print::header("running daily tests");
    let report: DispatchReport = dispatcher::dispatch(
        &DAILY_TESTS,
        &target,
        cfg,
        Arc::new(SystemRunner),
        Arc::new(session),
    )
    .await?;

    print::summary(&report);
    Ok(())
}
