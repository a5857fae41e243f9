//! Session enrichment for eduroam logs.
//!
//! Derives user origin (domestic or foreign), home and visiting
//! jurisdiction, and the roaming flag from realm, institution-name and
//! server-address heuristics. The heuristics live in ordered rule tables
//! ([`RuleSet`]) so their priority is explicit and replaceable.

mod classify;
mod enrich;
mod rules;

pub use classify::{
    classify_origin, fticks_visiting_jurisdiction, home_jurisdiction, institution_text,
    is_roaming, realm_of, visiting_jurisdiction,
};
pub use enrich::{Enricher, enrich_log};
pub use rules::{
    COUNTRY_CODES, COUNTRY_SUFFIXES, EXCHANGE_SERVER_MARKERS, INDIAN_INSTITUTION_DOMAINS,
    INDIAN_INSTITUTION_FRAGMENTS, INDIAN_IP_PREFIXES, Matcher, Rule, RuleSet, RuleTable,
};
