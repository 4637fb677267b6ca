use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::sync::Arc;

use async_trait::async_trait;
use hecert_common::config::{CommandErrorPolicy, Config, Credentials};
use hecert_common::daily::{DAILY_TESTS, TestDefinition};
use hecert_common::target::Target;
use hecert_core::command::{CommandOutput, CommandRunner, SystemRunner};
use hecert_core::dispatcher::{self, BranchOutcome, DispatchReport};
use hecert_core::error::{CommandError, DispatchError};
use hecert_core::session;

use crate::util::PortalStub;

/// Pretends every command succeeded and printed its own command line.
struct ReplayRunner;

#[async_trait]
impl CommandRunner for ReplayRunner {
    async fn run(&self, line: &str) -> Result<CommandOutput, CommandError> {
        Ok(CommandOutput {
            output: line.as_bytes().to_vec(),
            status: ExitStatus::from_raw(0),
        })
    }
}

fn target() -> Target {
    Target::new("ipv6.example.net", "2001:db8::1".parse().unwrap())
}

fn creds() -> Credentials {
    Credentials::new("alice", "secret")
}

#[tokio::test]
async fn daily_suite_is_submitted_to_every_form() {
    let portal = PortalStub::accepting().await;
    let cfg: Config = portal.config(CommandErrorPolicy::Skip);
    let session = session::login(&cfg, &creds()).await.unwrap();

    let report: DispatchReport = dispatcher::dispatch(
        &DAILY_TESTS,
        &target(),
        &cfg,
        Arc::new(ReplayRunner),
        Arc::new(session),
    )
    .await
    .unwrap();

    assert_eq!(report.submitted(), DAILY_TESTS.len());

    let submissions: Vec<_> = portal
        .requests()
        .into_iter()
        .filter(|req| req.target.starts_with("/certification/daily.php"))
        .collect();
    assert_eq!(submissions.len(), DAILY_TESTS.len());

    let traceroute = submissions
        .iter()
        .find(|req| req.target.ends_with("test=traceroute"))
        .expect("traceroute was not submitted");
    assert_eq!(
        traceroute.form().get("input").map(String::as_str),
        Some("traceroute6 -n ipv6.example.net")
    );

    let ptr = submissions
        .iter()
        .find(|req| req.target.ends_with("test=ptr"))
        .expect("ptr lookup was not submitted");
    assert_eq!(
        ptr.form().get("input").map(String::as_str),
        Some("dig @8.8.8.8 -x 2001:db8::1")
    );
}

#[tokio::test]
async fn dry_run_never_reaches_the_portal() {
    let portal = PortalStub::accepting().await;
    let mut cfg: Config = portal.config(CommandErrorPolicy::Abort);
    cfg.dry_run = true;
    let session = session::login(&cfg, &creds()).await.unwrap();

    let report: DispatchReport = dispatcher::dispatch(
        &DAILY_TESTS,
        &target(),
        &cfg,
        Arc::new(ReplayRunner),
        Arc::new(session),
    )
    .await
    .unwrap();

    assert_eq!(report.dry_runs(), DAILY_TESTS.len());
    // Only the login went over the wire.
    assert_eq!(portal.requests().len(), 1);
}

#[tokio::test]
async fn real_commands_are_captured_and_submitted() {
    let tests = [
        TestDefinition {
            name: "echo address",
            command: r#"sh -c "echo n {address}; echo warn 1>&2""#,
            path: "certification/daily.php?test=echo",
        },
        TestDefinition {
            name: "missing binary",
            command: "hecert-no-such-binary {host}",
            path: "certification/daily.php?test=missing",
        },
    ];
    let portal = PortalStub::accepting().await;
    let cfg: Config = portal.config(CommandErrorPolicy::Skip);
    let session = session::login(&cfg, &creds()).await.unwrap();

    let report: DispatchReport = dispatcher::dispatch(
        &tests,
        &target(),
        &cfg,
        Arc::new(SystemRunner),
        Arc::new(session),
    )
    .await
    .unwrap();

    assert_eq!(report.branches.len(), 2);
    assert!(matches!(report.branches[0].outcome, BranchOutcome::Submitted));
    assert!(matches!(
        report.branches[1].outcome,
        BranchOutcome::CommandFailed(CommandError::Spawn { .. })
    ));

    let requests = portal.requests();
    let echo = requests
        .iter()
        .find(|req| req.target.ends_with("test=echo"))
        .expect("echo output was not submitted");
    let input: String = echo.form().get("input").cloned().unwrap_or_default();
    assert!(input.contains("n 2001:db8::1"));
    assert!(input.contains("warn"));
    assert!(!requests.iter().any(|req| req.target.ends_with("test=missing")));
}

fn lossy_ping() -> [TestDefinition; 1] {
    [TestDefinition {
        name: "lossy ping",
        command: r#"sh -c "echo 100% packet loss; exit 1""#,
        path: "certification/daily.php?test=ping",
    }]
}

#[tokio::test]
async fn failed_command_aborts_run_without_submitting() {
    let portal = PortalStub::accepting().await;
    let cfg: Config = portal.config(CommandErrorPolicy::Abort);
    let session = session::login(&cfg, &creds()).await.unwrap();

    let result = dispatcher::dispatch(
        &lossy_ping(),
        &target(),
        &cfg,
        Arc::new(SystemRunner),
        Arc::new(session),
    )
    .await;

    assert!(matches!(
        result,
        Err(DispatchError::Command {
            test: "lossy ping",
            source: CommandError::Exit { .. }
        })
    ));
    assert!(!portal.requests().iter().any(|req| req.target.ends_with("test=ping")));
}

#[tokio::test]
async fn failed_command_is_skipped_under_skip_policy() {
    let portal = PortalStub::accepting().await;
    let cfg: Config = portal.config(CommandErrorPolicy::Skip);
    let session = session::login(&cfg, &creds()).await.unwrap();

    let report: DispatchReport = dispatcher::dispatch(
        &lossy_ping(),
        &target(),
        &cfg,
        Arc::new(SystemRunner),
        Arc::new(session),
    )
    .await
    .unwrap();

    assert_eq!(report.branches.len(), 1);
    match &report.branches[0].outcome {
        BranchOutcome::CommandFailed(CommandError::Exit { output, .. }) => {
            assert_eq!(String::from_utf8_lossy(output).trim(), "100% packet loss");
        }
        other => panic!("expected a failed command, got {other:?}"),
    }
    assert_eq!(portal.requests().len(), 1);
}
