use std::sync::Arc;

use async_trait::async_trait;
use hecert_common::config::{Config, Credentials};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::error::{AuthenticationError, SubmissionError};

pub const LOGIN_PATH: &str = "certification/login.php";
pub const SESSION_COOKIE: &str = "PHPSESSID";

/// Delivers a test's output to the portal.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, url: Url, output: &[u8]) -> Result<(), SubmissionError>;
}

/// An HTTP client whose cookie jar holds a live portal session.
///
/// Only [`login`] creates one, and nothing mutates it afterwards, so a single
/// session can be shared by every concurrent submission.
#[derive(Clone)]
pub struct Session {
    client: Client,
}

/// Logs into the portal and returns the authenticated session.
///
/// Succeeds only on a `200 OK` that leaves a `PHPSESSID` cookie in the jar
/// for the portal origin.
pub async fn login(cfg: &Config, creds: &Credentials) -> Result<Session, AuthenticationError> {
    let jar: Arc<Jar> = Arc::new(Jar::default());
    let mut builder = Client::builder().cookie_provider(Arc::clone(&jar));
    if cfg.no_proxy {
        builder = builder.no_proxy();
    }
    let client: Client = builder.build().map_err(AuthenticationError::Client)?;

    let url: Url = cfg.endpoint(LOGIN_PATH)?;
    debug!("Logging in as '{}' at {}", creds.username, url);

    let form = [
        ("f_user", creds.username.as_str()),
        ("f_pass", creds.password.as_str()),
    ];
    let response = client
        .post(url)
        .form(&form)
        .send()
        .await
        .map_err(AuthenticationError::Transport)?;

    let status: StatusCode = response.status();
    if status != StatusCode::OK {
        return Err(AuthenticationError::Status(status));
    }

    if !has_session_cookie(jar.as_ref(), &cfg.portal) {
        return Err(AuthenticationError::MissingSessionCookie);
    }

    Ok(Session { client })
}

#[async_trait]
impl Submitter for Session {
    async fn submit(&self, url: Url, output: &[u8]) -> Result<(), SubmissionError> {
        let input: String = String::from_utf8_lossy(output).into_owned();
        let response = self
            .client
            .post(url)
            .form(&[("input", input)])
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(SubmissionError::Status(status)),
        }
    }
}

fn has_session_cookie(jar: &impl CookieStore, origin: &Url) -> bool {
    let Some(header) = jar.cookies(origin) else {
        return false;
    };
    let Ok(cookies) = header.to_str() else {
        return false;
    };

    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, _)| name == SESSION_COOKIE)
}
