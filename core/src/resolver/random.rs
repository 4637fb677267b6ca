use std::process::Stdio;

use async_trait::async_trait;
use hecert_common::target::SiteCandidate;
use rand::Rng;
use rand::seq::IndexedRandom;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::ResolutionError;

pub const DEFAULT_ATTEMPTS: usize = 26;

#[async_trait]
pub trait LivenessProbe: Send + Sync {
    async fn is_alive(&self, candidate: &SiteCandidate) -> bool;
}

/// Fires a single `ping6` at the candidate.
///
/// A candidate counts as alive as soon as the ping process starts; its result
/// is never looked at.
pub struct PingProbe;

#[async_trait]
impl LivenessProbe for PingProbe {
    async fn is_alive(&self, candidate: &SiteCandidate) -> bool {
        let spawned = Command::new("ping6")
            .args(["-n", "-c1", &candidate.address.to_string()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(_child) => true,
            Err(e) => {
                debug!("Couldn't start ping6 for {}: {}", candidate.hostname, e);
                false
            }
        }
    }
}

/// The outcome of a random pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomSelection {
    pub candidate: SiteCandidate,
    /// Number of probes sent.
    pub attempts: usize,
    /// `false` when no probe succeeded and the last pick was kept anyway.
    pub verified: bool,
}

/// Picks random candidates until one passes the probe or `max_attempts` runs
/// out. In the latter case the last pick is returned unverified.
pub async fn select_random<P, R>(
    candidates: &[SiteCandidate],
    max_attempts: usize,
    probe: &P,
    rng: &mut R,
) -> Result<RandomSelection, ResolutionError>
where
    P: LivenessProbe + ?Sized,
    R: Rng + ?Sized,
{
    let mut last: Option<&SiteCandidate> = None;

    for attempt in 1..=max_attempts {
        let candidate: &SiteCandidate =
            candidates.choose(rng).ok_or(ResolutionError::NoCandidates)?;

        if probe.is_alive(candidate).await {
            return Ok(RandomSelection {
                candidate: candidate.clone(),
                attempts: attempt,
                verified: true,
            });
        }

        debug!("Attempt {}: {} did not respond", attempt, candidate.hostname);
        last = Some(candidate);
    }

    let fallback: &SiteCandidate = match last {
        Some(candidate) => candidate,
        None => candidates.choose(rng).ok_or(ResolutionError::NoCandidates)?,
    };
    warn!(
        "No live site found in {} attempts, using {} anyway",
        max_attempts, fallback.hostname
    );

    Ok(RandomSelection {
        candidate: fallback.clone(),
        attempts: max_attempts,
        verified: false,
    })
}
