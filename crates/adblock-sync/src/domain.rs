//! Domain normalization and set arithmetic.

use regex_lite::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::info;

/// Names that are never blocked, whatever the source says
pub const SKIP_DOMAINS: [&str; 3] = ["localhost", "local", "localhost.localdomain"];

/// `<ipv4> <host>` as found in hosts files
fn hosts_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}\s+(.+)$").expect("valid hosts-line pattern")
    })
}

/// Labels of 1-63 alphanumerics/hyphens, no edge hyphens, alphabetic TLD of 2-6
fn domain_syntax() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,6}$")
            .expect("valid domain pattern")
    })
}

/// How a source line was read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMatch<'a> {
    /// Hosts-file line; the captured hostname part
    Host(&'a str),
    /// Anything else, taken verbatim
    Raw(&'a str),
}

impl<'a> LineMatch<'a> {
    /// Classify a trimmed line
    #[must_use]
    pub fn classify(line: &'a str) -> Self {
        hosts_line()
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map_or(Self::Raw(line), |host| Self::Host(host.as_str()))
    }

    /// The candidate domain text
    #[must_use]
    pub const fn value(&self) -> &'a str {
        match self {
            Self::Host(value) | Self::Raw(value) => value,
        }
    }
}

/// A canonical, lowercase, IDNA-encoded domain name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domain(String);

impl Domain {
    /// Validate and canonicalize a candidate
    ///
    /// Returns `None` for skip-listed names, anything containing `#`, and
    /// anything failing the domain syntax rule.
    #[must_use]
    pub fn parse(candidate: &str) -> Option<Self> {
        let candidate = candidate.trim().to_lowercase();

        if candidate.contains('#') || SKIP_DOMAINS.contains(&candidate.as_str()) {
            return None;
        }
        if !domain_syntax().is_match(&candidate) {
            return None;
        }

        match url::Host::parse(&candidate) {
            Ok(url::Host::Domain(ascii)) => Some(Self(ascii)),
            _ => None,
        }
    }

    /// The domain as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An unordered set of domains
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSet(HashSet<Domain>);

impl DomainSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a domain, returning false if it was already present
    pub fn insert(&mut self, domain: Domain) -> bool {
        self.0.insert(domain)
    }

    /// Returns true if the set contains `domain`
    #[must_use]
    pub fn contains(&self, domain: &Domain) -> bool {
        self.0.contains(domain)
    }

    /// Number of domains
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &Domain> {
        self.0.iter()
    }

    /// Domains in `self` that are not in `other`
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.0.difference(&other.0).cloned().collect()
    }

    /// Finalize into a sorted sequence
    #[must_use]
    pub fn into_sorted_vec(self) -> Vec<Domain> {
        let mut domains: Vec<Domain> = self.0.into_iter().collect();
        domains.sort_unstable();
        domains
    }
}

impl FromIterator<Domain> for DomainSet {
    fn from_iter<I: IntoIterator<Item = Domain>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Domain> for DomainSet {
    fn extend<I: IntoIterator<Item = Domain>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

fn normalize_line(line: &str) -> Option<Domain> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let candidate = LineMatch::classify(line).value().trim().to_lowercase();
    let candidate = candidate
        .split_once('#')
        .map_or(candidate.as_str(), |(before, _)| before);

    Domain::parse(candidate)
}

/// Parse list text (hosts files, plain domain lists, or both concatenated)
/// into a domain set
pub fn normalize(text: &str) -> DomainSet {
    let domains: DomainSet = text.lines().filter_map(normalize_line).collect();
    info!(domains = domains.len(), "Parsed domain list");
    domains
}

/// `adlist - whitelist`, sorted
pub fn reconcile(adlist: &DomainSet, whitelist: &DomainSet) -> Vec<Domain> {
    let desired = adlist.difference(whitelist).into_sorted_vec();
    info!(domains = desired.len(), "Number of domains after filtering");
    desired
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(set: DomainSet) -> Vec<String> {
        set.into_sorted_vec()
            .into_iter()
            .map(Domain::into_string)
            .collect()
    }

    #[test]
    fn test_classify_hosts_line() {
        assert_eq!(
            LineMatch::classify("0.0.0.0 ads.example.com"),
            LineMatch::Host("ads.example.com")
        );
        assert_eq!(
            LineMatch::classify("127.0.0.1\tlocalhost"),
            LineMatch::Host("localhost")
        );
        assert_eq!(
            LineMatch::classify("tracker.example.net"),
            LineMatch::Raw("tracker.example.net")
        );
        assert_eq!(LineMatch::classify("0.0.0.0"), LineMatch::Raw("0.0.0.0"));
    }

    #[test]
    fn test_domain_parse() {
        assert_eq!(
            Domain::parse("  Ads.Example.COM ").map(Domain::into_string),
            Some("ads.example.com".to_string())
        );
        assert!(Domain::parse("localhost").is_none());
        assert!(Domain::parse("localhost.localdomain").is_none());
        assert!(Domain::parse("local").is_none());
        assert!(Domain::parse("-bad.example.com").is_none());
        assert!(Domain::parse("bad-.example.com").is_none());
        assert!(Domain::parse("example").is_none());
        assert!(Domain::parse("example.c0m").is_none());
        assert!(Domain::parse("1.2.3.4").is_none());
        assert!(Domain::parse("a#b.com").is_none());
        assert!(Domain::parse("with space.com").is_none());
    }

    #[test]
    fn test_tld_length_rule() {
        assert!(Domain::parse("example.co").is_some());
        assert!(Domain::parse("example.museum").is_some());
        assert!(Domain::parse("example.c").is_none());
        assert!(Domain::parse("example.website").is_none());
    }

    #[test]
    fn test_label_length_rule() {
        let label63 = "a".repeat(63);
        let label64 = "a".repeat(64);
        assert!(Domain::parse(&format!("{label63}.com")).is_some());
        assert!(Domain::parse(&format!("{label64}.com")).is_none());
    }

    #[test]
    fn test_normalize_hosts_file() {
        let text = "# Title\n\
                    127.0.0.1 localhost\n\
                    0.0.0.0 ads.example.com\n\
                    0.0.0.0 ADS.example.com # duplicate\n\
                    \n\
                    tracker.example.net#inline\n\
                    not a domain\n\
                    ::1 ip6-localhost\n";
        assert_eq!(
            names(normalize(text)),
            vec!["ads.example.com", "tracker.example.net"]
        );
    }

    #[test]
    fn test_normalize_scenario_text() {
        let text = "0.0.0.0 ads.example.com\n# comment\nlocalhost\ntracker.example.net\n";
        assert_eq!(
            names(normalize(text)),
            vec!["ads.example.com", "tracker.example.net"]
        );
    }

    #[test]
    fn test_normalize_crlf() {
        let text = "ads.example.com\r\n0.0.0.0 b.example.org\r\n";
        assert_eq!(names(normalize(text)), vec!["ads.example.com", "b.example.org"]);
    }

    #[test]
    fn test_reconcile_removes_whitelisted() {
        let adlist = normalize("a.example.com\nb.example.com\nc.example.com\n");
        let whitelist = normalize("b.example.com\nunrelated.org\n");
        let desired: Vec<String> = reconcile(&adlist, &whitelist)
            .into_iter()
            .map(Domain::into_string)
            .collect();
        assert_eq!(desired, vec!["a.example.com", "c.example.com"]);
    }

    #[test]
    fn test_reconcile_is_sorted() {
        let adlist = normalize("zz.example.com\naa.example.com\nmm.example.com\n");
        let desired = reconcile(&adlist, &DomainSet::new());
        let mut sorted = desired.clone();
        sorted.sort();
        assert_eq!(desired, sorted);
    }
}
