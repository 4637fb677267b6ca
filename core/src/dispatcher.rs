//! # Test Dispatcher
//!
//! Runs every [`TestDefinition`] against the resolved [`Target`] at the same
//! time and hands each output to a [`Submitter`].
//!
//! Each test is one task in a [`JoinSet`]. Tasks share the target and the
//! submitter read-only and never talk to each other. The dispatcher waits for
//! all of them, so the returned [`DispatchReport`] holds exactly one entry per
//! definition.
//!
//! When a command cannot be run or exits non-zero, [`CommandErrorPolicy`]
//! decides whether only that test is dropped or the whole run stops. Submission failures are
//! always logged and skipped.

use std::sync::Arc;

use hecert_common::config::{CommandErrorPolicy, Config};
use hecert_common::daily::TestDefinition;
use hecert_common::target::Target;
use tokio::task::JoinSet;
use tracing::{error, info};
use url::Url;

use crate::command::{CommandOutput, CommandRunner};
use crate::error::{CommandError, DispatchError, SubmissionError};
use crate::session::Submitter;

#[derive(Debug)]
pub enum BranchOutcome {
    Submitted,
    /// Command ran, submission was suppressed.
    DryRun,
    CommandFailed(CommandError),
    SubmissionFailed(SubmissionError),
}

#[derive(Debug)]
pub struct BranchReport {
    pub test: &'static str,
    pub command: String,
    pub outcome: BranchOutcome,
}

#[derive(Debug, Default)]
pub struct DispatchReport {
    /// In the order of the definitions passed to [`dispatch`].
    pub branches: Vec<BranchReport>,
}

impl DispatchReport {
    pub fn submitted(&self) -> usize {
        self.count(|outcome| matches!(outcome, BranchOutcome::Submitted))
    }

    pub fn dry_runs(&self) -> usize {
        self.count(|outcome| matches!(outcome, BranchOutcome::DryRun))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| {
            matches!(
                outcome,
                BranchOutcome::CommandFailed(_) | BranchOutcome::SubmissionFailed(_)
            )
        })
    }

    fn count(&self, pred: impl Fn(&BranchOutcome) -> bool) -> usize {
        self.branches.iter().filter(|b| pred(&b.outcome)).count()
    }
}

pub async fn dispatch(
    tests: &[TestDefinition],
    target: &Target,
    cfg: &Config,
    runner: Arc<dyn CommandRunner>,
    submitter: Arc<dyn Submitter>,
) -> Result<DispatchReport, DispatchError> {
    let target: Arc<Target> = Arc::new(target.clone());
    let dry_run: bool = cfg.dry_run;
    let mut set: JoinSet<(usize, BranchReport)> = JoinSet::new();

    for (idx, test) in tests.iter().copied().enumerate() {
        let url: Result<Url, url::ParseError> = cfg.endpoint(test.path);
        let target = Arc::clone(&target);
        let runner = Arc::clone(&runner);
        let submitter = Arc::clone(&submitter);

        set.spawn(async move {
            let report: BranchReport =
                run_branch(test, &target, url, dry_run, runner.as_ref(), submitter.as_ref()).await;
            (idx, report)
        });
    }

    let mut slots: Vec<Option<BranchReport>> = (0..tests.len()).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        let (idx, report) = joined?;

        if cfg.on_command_error == CommandErrorPolicy::Abort
            && let BranchOutcome::CommandFailed(source) = report.outcome
        {
            // Dropping the set aborts the branches still running.
            return Err(DispatchError::Command {
                test: report.test,
                source,
            });
        }

        slots[idx] = Some(report);
    }

    Ok(DispatchReport {
        branches: slots.into_iter().flatten().collect(),
    })
}

async fn run_branch(
    test: TestDefinition,
    target: &Target,
    url: Result<Url, url::ParseError>,
    dry_run: bool,
    runner: &dyn CommandRunner,
    submitter: &dyn Submitter,
) -> BranchReport {
    let command: String = test.render(target);
    info!("Running test '{}' with cmd: {}", test.name, command);

    let output: CommandOutput = match runner.run(&command).await {
        Ok(output) => output,
        Err(e) => {
            error!("Couldn't run command '{}': {}", command, e);
            return BranchReport {
                test: test.name,
                command,
                outcome: BranchOutcome::CommandFailed(e),
            };
        }
    };

    let outcome: BranchOutcome = match url {
        Err(e) => {
            error!("Could not submit '{}': {}", test.name, e);
            BranchOutcome::SubmissionFailed(SubmissionError::Endpoint(e))
        }
        Ok(url) if dry_run => {
            info!("Dry run, not submitting '{}' to '{}'", test.name, url);
            BranchOutcome::DryRun
        }
        Ok(url) => {
            info!("Submitting '{}' to '{}'", test.name, url);
            match submitter.submit(url, &output.output).await {
                Ok(()) => BranchOutcome::Submitted,
                Err(e) => {
                    error!("Could not submit '{}': {}", test.name, e);
                    BranchOutcome::SubmissionFailed(e)
                }
            }
        }
    };

    BranchReport {
        test: test.name,
        command,
        outcome,
    }
}
