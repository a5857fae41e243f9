//! Ordered rule tables for origin and jurisdiction inference.
//!
//! Each table is a sequence of `(matcher, result)` pairs evaluated top to
//! bottom; the first matching rule wins. Inputs are lower-cased before
//! matching, except country codes which are upper-cased.

use serde::{Deserialize, Serialize};

/// Text predicate of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Matcher {
    /// Text contains any of the needles.
    ContainsAny(Vec<String>),
    /// Text is a domain ending in the given suffix (`.in`), or the bare label.
    DomainSuffix(String),
    /// Text starts with any of the prefixes.
    PrefixAny(Vec<String>),
    /// Text equals the value exactly.
    Exact(String),
}

impl Matcher {
    pub fn contains_any<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Matcher::ContainsAny(needles.into_iter().map(Into::into).collect())
    }

    pub fn prefix_any<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Matcher::PrefixAny(prefixes.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        match self {
            Matcher::ContainsAny(needles) => needles.iter().any(|n| text.contains(n.as_str())),
            Matcher::DomainSuffix(suffix) => {
                text.ends_with(suffix.as_str()) || Some(text) == suffix.strip_prefix('.')
            }
            Matcher::PrefixAny(prefixes) => prefixes.iter().any(|p| text.starts_with(p.as_str())),
            Matcher::Exact(value) => text == value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub matcher: Matcher,
    pub result: String,
}

impl Rule {
    pub fn new(matcher: Matcher, result: impl Into<String>) -> Self {
        Self {
            matcher,
            result: result.into(),
        }
    }
}

/// First-match-wins rule list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(text))
            .map(|rule| rule.result.as_str())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// Domain allow-list of the Indian eduroam federation.
pub const INDIAN_INSTITUTION_DOMAINS: &[&str] = &[
    "iitd.ac.in",
    "iitm.ac.in",
    "iitb.ac.in",
    "iitg.ac.in",
    "iitk.ac.in",
    "iitr.ac.in",
    "iiserkol.ac.in",
    "iisc.ac.in",
    "icgeb.ac.in",
    "nit.ac.in",
    "ernet.in",
    "iiserpune.ac.in",
    "iisertvm.ac.in",
    "iiserb.ac.in",
    "bits-pilani.ac.in",
    "jnu.ac.in",
    "du.ac.in",
    "tifr.res.in",
    "cdac.in",
    "csir.res.in",
];

/// Name fragments of Indian institutions as they appear in server names.
pub const INDIAN_INSTITUTION_FRAGMENTS: &[&str] = &["iit", "iisc", "iiser", "nit"];

/// Address prefixes of Indian campus networks.
pub const INDIAN_IP_PREFIXES: &[&str] = &["14.139.", "103."];

/// Markers of the federation's top-level exchange servers.
pub const EXCHANGE_SERVER_MARKERS: &[&str] = &["eduroam.org"];

/// Realm TLD rules checked after the domestic rules, in priority order.
pub const COUNTRY_SUFFIXES: &[(&str, &str)] = &[
    (".it", "Italy"),
    (".uk", "UK"),
    (".edu", "USA"),
    (".de", "Germany"),
    (".fr", "France"),
    (".nl", "Netherlands"),
    (".se", "Sweden"),
];

/// ISO 3166 codes used in F-TICKS `VISCOUNTRY`.
pub const COUNTRY_CODES: &[(&str, &str)] = &[
    ("IN", "India"),
    ("IT", "Italy"),
    ("GB", "UK"),
    ("UK", "UK"),
    ("US", "USA"),
    ("DE", "Germany"),
    ("FR", "France"),
    ("NL", "Netherlands"),
    ("SE", "Sweden"),
];

/// Complete classification configuration for one federation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Jurisdiction name of the domestic federation.
    pub domestic_jurisdiction: String,
    /// Realm signal for [`UserOrigin::Domestic`](roam_model::UserOrigin).
    pub domestic_realms: Matcher,
    /// Institution-name signal for domestic origin and visiting location.
    pub domestic_institutions: Matcher,
    /// Server IP signal for a domestic visiting location.
    pub domestic_ip_prefixes: Matcher,
    /// Institution text naming the federation exchange servers.
    pub exchange_servers: Matcher,
    /// Realm to home jurisdiction, domestic rules first.
    pub home_rules: RuleTable,
    /// F-TICKS country code to visiting jurisdiction.
    pub country_codes: RuleTable,
}

impl RuleSet {
    /// Rules for the Indian eduroam federation.
    pub fn indian_federation() -> Self {
        let domestic = "India";
        let domestic_realms = Matcher::contains_any(INDIAN_INSTITUTION_DOMAINS.iter().copied());

        let mut home_rules = RuleTable::default()
            .with_rule(Rule::new(Matcher::DomainSuffix(".in".to_string()), domestic))
            .with_rule(Rule::new(domestic_realms.clone(), domestic));
        for (suffix, jurisdiction) in COUNTRY_SUFFIXES {
            home_rules = home_rules.with_rule(Rule::new(
                Matcher::DomainSuffix((*suffix).to_string()),
                *jurisdiction,
            ));
        }

        let country_codes = RuleTable::new(
            COUNTRY_CODES
                .iter()
                .map(|(code, jurisdiction)| {
                    Rule::new(Matcher::Exact((*code).to_string()), *jurisdiction)
                })
                .collect(),
        );

        Self {
            domestic_jurisdiction: domestic.to_string(),
            domestic_realms,
            domestic_institutions: Matcher::contains_any(
                INDIAN_INSTITUTION_FRAGMENTS.iter().copied(),
            ),
            domestic_ip_prefixes: Matcher::prefix_any(INDIAN_IP_PREFIXES.iter().copied()),
            exchange_servers: Matcher::contains_any(EXCHANGE_SERVER_MARKERS.iter().copied()),
            home_rules,
            country_codes,
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::indian_federation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_suffix_matches_label_boundary() {
        let matcher = Matcher::DomainSuffix(".it".to_string());
        assert!(matcher.matches("uni.it"));
        assert!(matcher.matches("it"));
        assert!(!matcher.matches("unit"));
        assert!(!matcher.matches("it.example.org"));
    }

    #[test]
    fn empty_text_never_matches() {
        assert!(!Matcher::contains_any([""]).matches(""));
        assert!(!Matcher::Exact(String::new()).matches(""));
    }

    #[test]
    fn first_match_wins() {
        let table = RuleTable::default()
            .with_rule(Rule::new(Matcher::contains_any(["ac"]), "first"))
            .with_rule(Rule::new(Matcher::DomainSuffix(".uk".to_string()), "second"));
        assert_eq!(table.first_match("ox.ac.uk"), Some("first"));
        assert_eq!(table.first_match("bbc.co.uk"), Some("second"));
        assert_eq!(table.first_match("example.com"), None);
    }

    #[test]
    fn indian_rules_put_domestic_first() {
        let rules = RuleSet::indian_federation();
        let first = &rules.home_rules.rules()[0];
        assert_eq!(first.result, "India");
        assert_eq!(rules.home_rules.first_match("iitd.ac.in"), Some("India"));
        assert_eq!(rules.home_rules.first_match("cam.ac.uk"), Some("UK"));
        assert_eq!(rules.home_rules.first_match("mit.edu"), Some("USA"));
        assert_eq!(rules.country_codes.first_match("GB"), Some("UK"));
    }
}
