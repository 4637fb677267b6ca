use hecert_common::config::{CommandErrorPolicy, Config, Credentials};
use hecert_core::error::{AuthenticationError, SubmissionError};
use hecert_core::session::{self, Submitter};
use reqwest::StatusCode;
use url::Url;

use crate::util::{PortalStub, Reply};

fn creds() -> Credentials {
    Credentials::new("alice", "s3cret & more")
}

#[tokio::test]
async fn login_posts_credentials_and_keeps_session() {
    let portal = PortalStub::accepting().await;
    let cfg: Config = portal.config(CommandErrorPolicy::Skip);

    let result = session::login(&cfg, &creds()).await;
    assert!(result.is_ok(), "Login failed: {:?}", result.err());

    let requests = portal.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].target, "/certification/login.php");

    let form = requests[0].form();
    assert_eq!(form.get("f_user").map(String::as_str), Some("alice"));
    assert_eq!(form.get("f_pass").map(String::as_str), Some("s3cret & more"));
}

#[tokio::test]
async fn login_rejects_bad_status() {
    let portal = PortalStub::start(|_| Reply::status(403)).await;
    let cfg: Config = portal.config(CommandErrorPolicy::Skip);

    let result = session::login(&cfg, &creds()).await;
    assert!(matches!(
        result,
        Err(AuthenticationError::Status(StatusCode::FORBIDDEN))
    ));
}

#[tokio::test]
async fn login_requires_session_cookie() {
    let portal = PortalStub::start(|_| Reply::ok()).await;
    let cfg: Config = portal.config(CommandErrorPolicy::Skip);

    let result = session::login(&cfg, &creds()).await;
    assert!(matches!(result, Err(AuthenticationError::MissingSessionCookie)));
}

#[tokio::test]
async fn login_reports_transport_errors() {
    // Nothing listens on the discard port on loopback.
    let mut cfg: Config = Config::new(
        Url::parse("http://127.0.0.1:9/").unwrap(),
        CommandErrorPolicy::Skip,
    );
    cfg.no_proxy = true;

    let result = session::login(&cfg, &creds()).await;
    assert!(matches!(result, Err(AuthenticationError::Transport(_))));
}

#[tokio::test]
async fn submission_sends_output_with_session_cookie() {
    let portal = PortalStub::accepting().await;
    let cfg: Config = portal.config(CommandErrorPolicy::Skip);
    let session = session::login(&cfg, &creds()).await.unwrap();

    let url: Url = cfg.endpoint("certification/daily.php?test=ping").unwrap();
    let output: &[u8] = b"PING ipv6.example.net 56 data bytes\n4 packets transmitted";
    session.submit(url, output).await.unwrap();

    let requests = portal.requests();
    let submission = requests.last().unwrap();
    assert_eq!(submission.target, "/certification/daily.php?test=ping");
    assert_eq!(
        submission.form().get("input").map(String::as_bytes),
        Some(output)
    );
    let cookie: &str = submission.cookie.as_deref().unwrap_or_default();
    assert!(cookie.contains("PHPSESSID=deadbeef0123"), "cookie header: {cookie}");
}

#[tokio::test]
async fn submission_reports_bad_status() {
    let portal = PortalStub::start(|req| {
        if req.target.ends_with("login.php") {
            Reply::with_session()
        } else {
            Reply::status(500)
        }
    })
    .await;
    let cfg: Config = portal.config(CommandErrorPolicy::Skip);
    let session = session::login(&cfg, &creds()).await.unwrap();

    let url: Url = cfg.endpoint("certification/daily.php?test=whois").unwrap();
    let result = session.submit(url, b"whois output").await;

    assert!(matches!(
        result,
        Err(SubmissionError::Status(StatusCode::INTERNAL_SERVER_ERROR))
    ));
}
