//! Builds the enriched session table from parsed records.

use roam_model::{AccessEvent, EnrichedSession, FticksEvent, ParsedLog, SessionKind};
use tracing::debug;

use crate::classify::{
    classify_origin, fticks_visiting_jurisdiction, home_jurisdiction, institution_text,
    is_roaming, realm_of, visiting_jurisdiction,
};
use crate::rules::RuleSet;

/// Applies a [`RuleSet`] to parsed records.
#[derive(Debug, Clone, Default)]
pub struct Enricher {
    rules: RuleSet,
}

impl Enricher {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn enrich_access(&self, event: &AccessEvent) -> EnrichedSession {
        let realm = realm_of(event.username.as_deref()).to_string();
        let institutions =
            institution_text(event.source.as_deref(), event.destination.as_deref());
        let origin = classify_origin(&self.rules, &realm, &institutions);
        let home = home_jurisdiction(&self.rules, &realm);
        let visiting =
            visiting_jurisdiction(&self.rules, &institutions, Some(event.server_ip.as_str()));
        let roaming = is_roaming(&home, &visiting);

        EnrichedSession {
            kind: SessionKind::Access,
            line: event.line,
            timestamp: event.timestamp,
            event: Some(event.event),
            username: event.username.clone(),
            station_id: event.station_id.clone(),
            source: event.source.clone(),
            destination: event.destination.clone(),
            server_ip: Some(event.server_ip.clone()),
            cui: event.cui.clone(),
            realm,
            visiting_country: None,
            visiting_institution: None,
            csi: None,
            fticks_outcome: None,
            origin,
            home_jurisdiction: home,
            visiting_jurisdiction: visiting,
            is_roaming: roaming,
        }
    }

    pub fn enrich_fticks(&self, event: &FticksEvent) -> EnrichedSession {
        let institutions = event.visiting_institution.to_lowercase();
        let origin = classify_origin(&self.rules, &event.realm, &institutions);
        let home = home_jurisdiction(&self.rules, &event.realm);
        let visiting = fticks_visiting_jurisdiction(
            &self.rules,
            &event.visiting_country,
            &event.visiting_institution,
        );
        let roaming = is_roaming(&home, &visiting);

        EnrichedSession {
            kind: SessionKind::Fticks,
            line: event.line,
            timestamp: event.timestamp,
            event: None,
            username: None,
            station_id: None,
            source: None,
            destination: None,
            server_ip: None,
            cui: None,
            realm: event.realm.clone(),
            visiting_country: Some(event.visiting_country.clone()),
            visiting_institution: Some(event.visiting_institution.clone()),
            csi: Some(event.csi.clone()),
            fticks_outcome: Some(event.outcome),
            origin,
            home_jurisdiction: home,
            visiting_jurisdiction: visiting,
            is_roaming: roaming,
        }
    }

    /// One session per record, in source line order. Access rows precede
    /// F-TICKS rows from the same line.
    pub fn enrich_log(&self, parsed: &ParsedLog) -> Vec<EnrichedSession> {
        let mut sessions: Vec<EnrichedSession> = parsed
            .access
            .iter()
            .map(|event| self.enrich_access(event))
            .chain(parsed.fticks.iter().map(|event| self.enrich_fticks(event)))
            .collect();
        sessions.sort_by_key(|session| session.line);

        debug!(
            sessions = sessions.len(),
            roaming = sessions.iter().filter(|s| s.is_roaming).count(),
            "sessions enriched"
        );
        sessions
    }
}

/// Enrich with the default rule set.
pub fn enrich_log(parsed: &ParsedLog) -> Vec<EnrichedSession> {
    Enricher::default().enrich_log(parsed)
}
