use scraper::{Html, Selector};
use std::{mem, sync::LazyLock};
use tracing::{debug, trace};

use super::{
    patterns::{find_clock, find_date, has_score, is_team_candidate, text_lines},
    ExtractionStrategy,
};
use crate::{
    config::TeamConfig,
    types::{teams_are_distinct, MatchRecord},
};

static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid body selector"));

/// Partially read fixture while walking the page text.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
enum Accumulator {
    /// No kickoff time seen yet; team-like lines here are discarded.
    #[default]
    Empty,
    TimeKnown {
        time: String,
        date: String,
    },
    HomeKnown {
        time: String,
        date: String,
        home: String,
    },
    Complete {
        time: String,
        date: String,
        home: String,
        away: String,
    },
}

impl Accumulator {
    fn opened(time: &str) -> Self {
        Accumulator::TimeKnown {
            time: time.to_string(),
            date: String::new(),
        }
    }

    fn attach_date(&mut self, found: &str) {
        match self {
            Accumulator::Empty => {}
            Accumulator::TimeKnown { date, .. }
            | Accumulator::HomeKnown { date, .. }
            | Accumulator::Complete { date, .. } => *date = found.to_string(),
        }
    }

    fn with_team(self, team: &str) -> Self {
        match self {
            Accumulator::Empty => {
                trace!("Discarding {:?} seen before any kickoff time", team);
                Accumulator::Empty
            }
            Accumulator::TimeKnown { time, date } => Accumulator::HomeKnown {
                time,
                date,
                home: team.to_string(),
            },
            Accumulator::HomeKnown { time, date, home } => {
                if teams_are_distinct(&home, team) {
                    Accumulator::Complete {
                        time,
                        date,
                        home,
                        away: team.to_string(),
                    }
                } else {
                    Accumulator::HomeKnown { time, date, home }
                }
            }
            complete @ Accumulator::Complete { .. } => complete,
        }
    }

    fn into_record(self, team: &TeamConfig) -> Option<MatchRecord> {
        match self {
            Accumulator::Complete {
                time,
                date,
                home,
                away,
            } if teams_are_distinct(&home, &away) => {
                Some(MatchRecord::new(&date, &time, &home, &away, team))
            }
            Accumulator::Empty => None,
            incomplete => {
                debug!("Dropping incomplete fixture: {:?}", incomplete);
                None
            }
        }
    }
}

/// Threads page lines through an [`Accumulator`], committing on each new
/// kickoff time and once more at end of input.
struct LineScanner<'a> {
    team: &'a TeamConfig,
    state: Accumulator,
    records: Vec<MatchRecord>,
}

impl<'a> LineScanner<'a> {
    fn new(team: &'a TeamConfig) -> Self {
        Self {
            team,
            state: Accumulator::Empty,
            records: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        if !has_score(line) {
            if let Some(clock) = find_clock(line) {
                let previous = mem::replace(&mut self.state, Accumulator::opened(clock));
                self.commit(previous);
            }
        }

        if let Some(date) = find_date(line) {
            self.state.attach_date(date);
        }

        if is_team_candidate(line) {
            self.state = mem::take(&mut self.state).with_team(line);
        }
    }

    fn commit(&mut self, accumulator: Accumulator) {
        if let Some(record) = accumulator.into_record(self.team) {
            self.records.push(record);
        }
    }

    fn finish(mut self) -> Vec<MatchRecord> {
        let last = mem::take(&mut self.state);
        self.commit(last);
        self.records
    }
}

/// Last resort: reads fixtures from the page's visible text line by line.
pub struct LineScanStrategy {
    team: TeamConfig,
}

impl LineScanStrategy {
    pub fn new(team: TeamConfig) -> Self {
        Self { team }
    }

    pub fn scan_lines<I, S>(&self, lines: I) -> Vec<MatchRecord>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scanner = LineScanner::new(&self.team);
        for line in lines {
            scanner.feed(line.as_ref().trim());
        }
        scanner.finish()
    }
}

impl ExtractionStrategy for LineScanStrategy {
    fn name(&self) -> &'static str {
        "line-scan"
    }

    fn extract(&self, html: &str) -> Vec<MatchRecord> {
        let document = Html::parse_document(html);
        let root = document
            .select(&BODY)
            .next()
            .unwrap_or_else(|| document.root_element());
        self.scan_lines(text_lines(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strategy() -> LineScanStrategy {
        LineScanStrategy::new(TeamConfig::default())
    }

    #[test]
    fn test_accumulator_transitions() {
        let state = Accumulator::opened("10:00");
        let state = state.with_team("Team A");
        assert_eq!(
            state,
            Accumulator::HomeKnown {
                time: "10:00".to_string(),
                date: String::new(),
                home: "Team A".to_string(),
            }
        );

        // Same team again keeps waiting for an opponent.
        let state = state.with_team("TEAM A");
        assert!(matches!(state, Accumulator::HomeKnown { .. }));

        let state = state.with_team("Team B");
        assert!(matches!(state, Accumulator::Complete { .. }));

        let state = state.with_team("Team C");
        assert!(matches!(state, Accumulator::Complete { ref away, .. } if away == "Team B"));
    }

    #[test]
    fn test_empty_state_ignores_teams_and_dates() {
        let mut state = Accumulator::Empty.with_team("Team A");
        state.attach_date("01.03.2025");
        assert_eq!(state, Accumulator::Empty);
    }

    #[test]
    fn test_single_fixture_from_lines() {
        let records = strategy().scan_lines(["10:00", "01.03.2025", "Team A", "Team B"]);
        assert_eq!(
            records,
            vec![MatchRecord {
                date: "01.03.2025".to_string(),
                time: "10:00".to_string(),
                home_team: "Team A".to_string(),
                away_team: "Team B".to_string(),
                venue: "Deplasman".to_string(),
            }]
        );
    }

    #[test]
    fn test_commit_on_next_time_and_end() {
        let records = strategy().scan_lines([
            "Fikstür",
            "08.03.2025",
            "13:30",
            "Karaman FK",
            "Altınordu",
            "Yeni Karaman Stadyumu",
            "15.03.2025 19:00",
            "Ankara Demirspor",
            "Karaman FK",
        ]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].home_team, "Karaman FK");
        assert_eq!(records[0].away_team, "Altınordu");
        assert_eq!(records[0].date, "");
        assert_eq!(records[0].venue, "Yeni Karaman Stadyumu");
        assert_eq!(records[1].date, "15.03.2025");
        assert_eq!(records[1].time, "19:00");
        assert_eq!(records[1].home_team, "Ankara Demirspor");
        assert_eq!(records[1].venue, "Deplasman");
    }

    #[test]
    fn test_incomplete_fixtures_are_not_committed() {
        let records = strategy().scan_lines(["10:00", "Team A", "12:00", "Team B"]);
        assert!(records.is_empty());
    }

    #[test]
    fn test_score_lines_do_not_open_fixtures() {
        let records = strategy().scan_lines(["2 - 1 90:00", "Team A", "Team B"]);
        assert!(records.is_empty());
    }

    #[test]
    fn test_extract_reads_body_text() {
        let html = r#"<html><head><title>Karaman FK Fikstür</title></head>
            <body><div><div>10:00</div><div>01.03.2025</div>
            <div>Team A</div><div>Team B</div></div></body></html>"#;

        let records = strategy().extract(html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].time, "10:00");
        assert_eq!(records[0].date, "01.03.2025");
        assert_eq!(records[0].home_team, "Team A");
        assert_eq!(records[0].away_team, "Team B");
    }

    #[test]
    fn test_extract_joins_inline_markup_in_team_names() {
        let html = r#"<html><body>
            <div>10:00</div><div>01.03.2025</div>
            <div><span>Karaman</span> <span>FK</span></div>
            <div>Menemen <b>Belediye</b></div>
        </body></html>"#;

        let records = strategy().extract(html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].home_team, "Karaman FK");
        assert_eq!(records[0].away_team, "Menemen Belediye");
        assert_eq!(records[0].venue, "Yeni Karaman Stadyumu");
    }
}
