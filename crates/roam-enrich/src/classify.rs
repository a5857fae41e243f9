//! Pure classification functions over normalized fields.
//!
//! None of these fail: missing or ambiguous input maps to a fallback
//! category (`Foreign`, `"Unknown"`, empty realm).

use roam_model::{INTERNATIONAL_JURISDICTION, UNKNOWN_JURISDICTION, UserOrigin};

use crate::rules::RuleSet;

/// Substring after the first `@`, or empty.
pub fn realm_of(username: Option<&str>) -> &str {
    username
        .and_then(|user| user.split_once('@'))
        .map_or("", |(_, realm)| realm)
}

/// Lower-cased `source destination` text used by the institution rules.
pub fn institution_text(source: Option<&str>, destination: Option<&str>) -> String {
    let mut text = String::new();
    text.push_str(source.unwrap_or_default());
    text.push(' ');
    text.push_str(destination.unwrap_or_default());
    text.to_lowercase()
}

/// Domestic if the realm names a domestic institution or the institution
/// text carries a domestic name fragment.
pub fn classify_origin(rules: &RuleSet, realm: &str, institutions: &str) -> UserOrigin {
    let realm = realm.to_lowercase();
    if rules.domestic_realms.matches(&realm) || rules.domestic_institutions.matches(institutions) {
        UserOrigin::Domestic
    } else {
        UserOrigin::Foreign
    }
}

pub fn home_jurisdiction(rules: &RuleSet, realm: &str) -> String {
    rules
        .home_rules
        .first_match(&realm.trim().to_lowercase())
        .unwrap_or(UNKNOWN_JURISDICTION)
        .to_string()
}

/// Visiting location from institution text and the server's address.
pub fn visiting_jurisdiction(rules: &RuleSet, institutions: &str, server_ip: Option<&str>) -> String {
    let domestic_ip = server_ip.is_some_and(|ip| rules.domestic_ip_prefixes.matches(ip.trim()));
    if rules.domestic_institutions.matches(institutions) || domestic_ip {
        rules.domestic_jurisdiction.clone()
    } else if rules.exchange_servers.matches(institutions) {
        INTERNATIONAL_JURISDICTION.to_string()
    } else {
        UNKNOWN_JURISDICTION.to_string()
    }
}

/// Visiting location of an F-TICKS record: country code first, then the
/// visited institution's name.
pub fn fticks_visiting_jurisdiction(
    rules: &RuleSet,
    country_code: &str,
    institution: &str,
) -> String {
    match rules
        .country_codes
        .first_match(&country_code.trim().to_uppercase())
    {
        Some(jurisdiction) => jurisdiction.to_string(),
        None => visiting_jurisdiction(rules, &institution.to_lowercase(), None),
    }
}

/// Roaming iff the home jurisdiction is known and differs from the visited one.
pub fn is_roaming(home: &str, visiting: &str) -> bool {
    home != UNKNOWN_JURISDICTION && home != visiting
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn realm_requires_at_sign() {
        assert_eq!(realm_of(Some("alice@iitd.ac.in")), "iitd.ac.in");
        assert_eq!(realm_of(Some("alice")), "");
        assert_eq!(realm_of(None), "");
    }

    #[test]
    fn origin_from_realm_or_institution() {
        let rules = RuleSet::default();
        assert_eq!(classify_origin(&rules, "IITD.AC.IN", " "), UserOrigin::Domestic);
        assert_eq!(
            classify_origin(&rules, "uni.it", "iitb_idp_sp etlr1.eduroam.org"),
            UserOrigin::Domestic
        );
        assert_eq!(
            classify_origin(&rules, "uni.it", "sp1.example sp2.example"),
            UserOrigin::Foreign
        );
        assert_eq!(classify_origin(&rules, "", " "), UserOrigin::Foreign);
    }

    #[test]
    fn home_jurisdiction_follows_rule_order() {
        let rules = RuleSet::default();
        assert_eq!(home_jurisdiction(&rules, "iitd.ac.in"), "India");
        assert_eq!(home_jurisdiction(&rules, "ernet.in"), "India");
        assert_eq!(home_jurisdiction(&rules, "unimi.it"), "Italy");
        assert_eq!(home_jurisdiction(&rules, "ox.ac.uk"), "UK");
        assert_eq!(home_jurisdiction(&rules, "stanford.edu"), "USA");
        assert_eq!(home_jurisdiction(&rules, "tum.de"), "Germany");
        assert_eq!(home_jurisdiction(&rules, "example.com"), "Unknown");
        assert_eq!(home_jurisdiction(&rules, ""), "Unknown");
    }

    #[test]
    fn visiting_from_names_ip_then_exchange() {
        let rules = RuleSet::default();
        assert_eq!(visiting_jurisdiction(&rules, "iitd_sp x", None), "India");
        assert_eq!(
            visiting_jurisdiction(&rules, "sp1.example ", Some("14.139.1.2")),
            "India"
        );
        assert_eq!(
            visiting_jurisdiction(&rules, "etlr1.eduroam.org ", Some("10.0.0.1")),
            "International"
        );
        assert_eq!(
            visiting_jurisdiction(&rules, "sp1.example sp2.example", Some("10.0.0.5")),
            "Unknown"
        );
        // Prefix, not substring.
        assert_eq!(
            visiting_jurisdiction(&rules, " ", Some("10.103.0.1")),
            "Unknown"
        );
    }

    #[test]
    fn fticks_visiting_prefers_country_code() {
        let rules = RuleSet::default();
        assert_eq!(fticks_visiting_jurisdiction(&rules, "in", "anything"), "India");
        assert_eq!(fticks_visiting_jurisdiction(&rules, "SE", "iitb.ac.in"), "Sweden");
        assert_eq!(fticks_visiting_jurisdiction(&rules, "", "IITB.ac.in"), "India");
        assert_eq!(fticks_visiting_jurisdiction(&rules, "ZZ", "x"), "Unknown");
    }

    #[test]
    fn unknown_home_is_never_roaming() {
        assert!(!is_roaming("Unknown", "India"));
        assert!(!is_roaming("India", "India"));
        assert!(is_roaming("Italy", "India"));
        assert!(is_roaming("India", "Unknown"));
    }
}
