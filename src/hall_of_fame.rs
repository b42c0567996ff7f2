//! Hall of fame match records
//!
//! A capped list of match summaries, newest first, serialized as JSON under a
//! fixed storage key. The storage itself (LocalStorage, a file, whatever the
//! host has) belongs to the embedding layer; this module only owns the format.

use serde::{Deserialize, Serialize};

use crate::sim::state::{MatchOutcome, MatchState};

/// Maximum number of records to keep
pub const MAX_RECORDS: usize = 20;

/// Key the embedding layer should store the serialized list under
pub const STORAGE_KEY: &str = "bounce_battle_hall_of_fame";

/// One ball's line in a match record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallRecord {
    pub name: String,
    pub power_score: f32,
    pub final_hp: f32,
    pub max_hp: f32,
    pub passive: String,
    pub tier: String,
    pub is_winner: bool,
}

/// A finished match summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    /// ISO-8601 date string supplied by the host
    pub date: String,
    /// Match duration in seconds
    pub duration: f32,
    pub balls: Vec<BallRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HallOfFame {
    pub records: Vec<MatchRecord>,
}

impl HallOfFame {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Record a finished match, newest first, trimming to [`MAX_RECORDS`]
    pub fn record_match(&mut self, state: &MatchState, date: String) {
        let outcome = state.outcome();

        let balls = state
            .balls
            .iter()
            .enumerate()
            .map(|(index, ball)| BallRecord {
                name: ball.name.clone(),
                power_score: ball.power_score,
                final_hp: ball.hp.max(0.0),
                max_hp: ball.max_hp,
                passive: ball.ability.kind.name().to_string(),
                tier: ball.passive_tier.as_str().to_string(),
                is_winner: outcome == MatchOutcome::Winner(index),
            })
            .collect();

        self.records.insert(
            0,
            MatchRecord {
                date,
                duration: state.elapsed,
                balls,
            },
        );
        self.records.truncate(MAX_RECORDS);
        log::info!("Match result saved to hall of fame");
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&MatchRecord> {
        self.records.first()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{\"records\":[]}".to_string())
    }

    /// Tolerant load: a corrupt payload yields an empty list, never an error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(hall) => hall,
            Err(err) => {
                log::warn!("Discarding unreadable hall of fame data: {err}");
                Self::new()
            }
        }
    }
}

/// Format a duration as MM:SS
pub fn format_duration(seconds: f32) -> String {
    let total = seconds.max(0.0) as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn finished_match(loser: usize) -> MatchState {
        let mut state = MatchState::new("Zeus", "Apollo", &Tuning::default(), 55);
        state.elapsed = 95.0;
        state.balls[loser].hp = 0.0;
        state
    }

    #[test]
    fn test_record_match_marks_winner() {
        let mut hall = HallOfFame::new();
        hall.record_match(&finished_match(1), "2025-06-01T12:00:00Z".into());

        let record = hall.latest().unwrap();
        assert_eq!(record.balls.len(), 2);
        assert!(record.balls[0].is_winner);
        assert!(!record.balls[1].is_winner);
        assert_eq!(record.balls[1].final_hp, 0.0);
        assert_eq!(record.duration, 95.0);
    }

    #[test]
    fn test_newest_first_and_capped() {
        let mut hall = HallOfFame::new();
        for i in 0..25 {
            hall.record_match(&finished_match(0), format!("2025-06-01T12:00:{i:02}Z"));
        }
        assert_eq!(hall.records.len(), MAX_RECORDS);
        assert_eq!(hall.latest().unwrap().date, "2025-06-01T12:00:24Z");
    }

    #[test]
    fn test_json_round_trip() {
        let mut hall = HallOfFame::new();
        hall.record_match(&finished_match(1), "2025-06-01T12:00:00Z".into());

        let json = hall.to_json();
        let back = HallOfFame::from_json(&json);
        assert_eq!(back.records.len(), 1);
        assert_eq!(back.latest().unwrap().balls[0].name, "Zeus");
    }

    #[test]
    fn test_corrupt_json_yields_empty() {
        let hall = HallOfFame::from_json("not json at all");
        assert!(hall.is_empty());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00");
        assert_eq!(format_duration(75.4), "01:15");
        assert_eq!(format_duration(600.0), "10:00");
    }
}
