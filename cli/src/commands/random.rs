use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use hecert_common::config::{Config, Credentials};
use hecert_common::daily::DAILY_TESTS;
use hecert_common::target::{self, SiteCandidate, Target};
use hecert_core::command::SystemRunner;
use hecert_core::dispatcher::{self, DispatchReport};
use hecert_core::resolver::random::{PingProbe, RandomSelection, select_random};
use hecert_core::session;
use tracing::{info, warn};

use crate::terminal::print;

pub async fn random(
    sites: &Path,
    attempts: usize,
    creds: &Credentials,
    cfg: &Config,
) -> anyhow::Result<()> {
    let session = session::login(cfg, creds)
        .await
        .context("authentication failed")?;
    info!("Logged in as '{}'", creds.username);

    let list: String = tokio::fs::read_to_string(sites)
        .await
        .with_context(|| format!("reading site list {}", sites.display()))?;
    let candidates: Vec<SiteCandidate> = target::parse_site_list(&list)
        .with_context(|| format!("parsing site list {}", sites.display()))?;
    info!("Loaded {} candidate sites", candidates.len());

    let selection: RandomSelection =
        select_random(&candidates, attempts, &PingProbe, &mut rand::rng())
            .await
            .context("target resolution failed")?;

    if selection.verified {
        info!(
            "Picked {} after {} attempt(s)",
            selection.candidate.hostname, selection.attempts
        );
    } else {
        warn!(
            "Using {} without a successful liveness probe",
            selection.candidate.hostname
        );
    }
    let target: Target = selection.candidate.into();

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
