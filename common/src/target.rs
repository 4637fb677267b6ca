//! # Test Target Model
//!
//! The daily tests always run against a single [`Target`]: a hostname and the
//! IPv6 address it resolved to. In random mode the target is drawn from a list
//! of [`SiteCandidate`]s loaded from a plain text file:
//!
//! ```text
//! # hostname            address
//! ipv6.example.net      2001:db8::1
//! www.example.org       2001:db8:ffff::80
//! ```

use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

use thiserror::Error;

/// The host every daily test is run against.
///
/// The address is kept as an [`Ipv6Addr`] so only a valid IPv6 literal can
/// ever be substituted into a command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub hostname: String,
    pub address: Ipv6Addr,
}

impl Target {
    pub fn new(hostname: impl Into<String>, address: Ipv6Addr) -> Self {
        Self {
            hostname: hostname.into(),
            address,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.hostname, self.address)
    }
}

/// One entry of the random mode site list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteCandidate {
    pub hostname: String,
    pub address: Ipv6Addr,
}

impl From<SiteCandidate> for Target {
    fn from(candidate: SiteCandidate) -> Self {
        Target::new(candidate.hostname, candidate.address)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SiteListError {
    #[error("line {line}: expected '<hostname> <address>', got '{content}'")]
    Malformed { line: usize, content: String },
    #[error("line {line}: '{address}' is not an IPv6 address")]
    InvalidAddress { line: usize, address: String },
}

impl FromStr for SiteCandidate {
    type Err = SiteListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_line(s, 1)
    }
}

/// Parses a whole site list. Blank lines and `#` comments are skipped.
pub fn parse_site_list(input: &str) -> Result<Vec<SiteCandidate>, SiteListError> {
    input
        .lines()
        .enumerate()
        .map(|(idx, raw)| (idx + 1, strip_comment(raw).trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line_no, line)| parse_line(line, line_no))
        .collect()
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_line(line: &str, line_no: usize) -> Result<SiteCandidate, SiteListError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [hostname, address] = fields.as_slice() else {
        return Err(SiteListError::Malformed {
            line: line_no,
            content: line.to_string(),
        });
    };

    let address: Ipv6Addr = address.parse().map_err(|_| SiteListError::InvalidAddress {
        line: line_no,
        address: address.to_string(),
    })?;

    Ok(SiteCandidate {
        hostname: hostname.to_string(),
        address,
    })
}
