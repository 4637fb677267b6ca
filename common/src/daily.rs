use crate::target::Target;

const HOST_PLACEHOLDER: &str = "{host}";
const ADDRESS_PLACEHOLDER: &str = "{address}";

/// A named diagnostic command and the portal form its output is posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestDefinition {
    pub name: &'static str,
    /// Command line with `{host}` and/or `{address}` placeholders.
    pub command: &'static str,
    /// Submission path, relative to the portal base URL.
    pub path: &'static str,
}

impl TestDefinition {
    /// Fills the placeholders of the command template with the target.
    pub fn render(&self, target: &Target) -> String {
        self.command
            .replace(HOST_PLACEHOLDER, &target.hostname)
            .replace(ADDRESS_PLACEHOLDER, &target.address.to_string())
    }
}

/// The daily test suite, in submission order.
pub const DAILY_TESTS: [TestDefinition; 5] = [
    TestDefinition {
        name: "traceroute6",
        command: "traceroute6 -n {host}",
        path: "certification/daily.php?test=traceroute",
    },
    TestDefinition {
        name: "dig aaaa",
        command: "dig @8.8.8.8 AAAA {host}",
        path: "certification/daily.php?test=aaaa",
    },
    TestDefinition {
        name: "dig ptr",
        command: "dig @8.8.8.8 -x {address}",
        path: "certification/daily.php?test=ptr",
    },
    TestDefinition {
        name: "ping6",
        command: "ping6 -n -c4 {host}",
        path: "certification/daily.php?test=ping",
    },
    TestDefinition {
        name: "whois",
        command: r#"whois -h whois.arin.net "n {address}""#,
        path: "certification/daily.php?test=whois",
    },
];
