//! Heuristic fixture extraction.
//!
//! The fixture page has no stable markup contract, so extraction is a
//! cascade of strategies ordered by confidence. The first strategy that
//! yields anything wins; the rest never run.

pub mod line_scan;
pub mod patterns;
pub mod structured;

use tracing::{debug, info, warn};

use crate::{config::TeamConfig, types::MatchRecord};
pub use line_scan::LineScanStrategy;
pub use structured::StructuredStrategy;

/// One way of turning page markup into fixtures. Never fails; markup it
/// cannot read yields an empty list.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, html: &str) -> Vec<MatchRecord>;
}

pub struct FixtureExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl FixtureExtractor {
    /// Structured row scan first, then the plain-text line scan.
    pub fn new(team: TeamConfig) -> Self {
        Self::with_strategies(vec![
            Box::new(StructuredStrategy::new(team.clone())),
            Box::new(LineScanStrategy::new(team)),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn extract(&self, html: &str) -> Vec<MatchRecord> {
        for strategy in &self.strategies {
            let records = strategy.extract(html);
            if records.is_empty() {
                info!("Strategy '{}' found no fixtures, falling back", strategy.name());
                continue;
            }
            debug!("Strategy '{}' found {} candidate fixtures", strategy.name(), records.len());
            return finalize(records);
        }
        Vec::new()
    }
}

/// Drops same-team and duplicate fixtures.
fn finalize(records: Vec<MatchRecord>) -> Vec<MatchRecord> {
    let mut kept: Vec<MatchRecord> = Vec::with_capacity(records.len());
    for record in records {
        if !record.has_distinct_teams() {
            warn!(
                "Dropping fixture with invalid teams: home={:?} away={:?}",
                record.home_team, record.away_team
            );
            continue;
        }
        if kept.iter().any(|existing| existing.same_fixture(&record)) {
            continue;
        }
        kept.push(record);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    struct Fixed {
        records: Vec<MatchRecord>,
        calls: Arc<AtomicUsize>,
    }

    impl ExtractionStrategy for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn extract(&self, _html: &str) -> Vec<MatchRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.records.clone()
        }
    }

    fn record(home: &str, away: &str, time: &str) -> MatchRecord {
        MatchRecord::new("", time, home, away, &TeamConfig::default())
    }

    #[test]
    fn test_first_non_empty_strategy_wins() {
        let first_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));
        let third_calls = Arc::new(AtomicUsize::new(0));

        let extractor = FixtureExtractor::with_strategies(vec![
            Box::new(Fixed { records: vec![], calls: first_calls.clone() }),
            Box::new(Fixed {
                records: vec![record("Team A", "Team B", "10:00")],
                calls: second_calls.clone(),
            }),
            Box::new(Fixed {
                records: vec![record("Team C", "Team D", "12:00")],
                calls: third_calls.clone(),
            }),
        ]);

        let records = extractor.extract("<html></html>");
        assert_eq!(records, vec![record("Team A", "Team B", "10:00")]);
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
        assert_eq!(third_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_finalize_drops_same_team_and_duplicates() {
        let records = finalize(vec![
            record("Team A", "team a ", "10:00"),
            record("Team A", "Team B", "10:00"),
            record("Team A", "Team B", "10:00"),
            record("Team A", "Team B", "18:00"),
            record("", "Team B", "10:00"),
        ]);

        assert_eq!(
            records,
            vec![record("Team A", "Team B", "10:00"), record("Team A", "Team B", "18:00")]
        );
    }

    #[test]
    fn test_default_cascade_on_empty_page() {
        let extractor = FixtureExtractor::new(TeamConfig::default());
        assert!(extractor.extract("<html><body><p>Yükleniyor</p></body></html>").is_empty());
    }
}
