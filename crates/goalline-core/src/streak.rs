//! Current result streaks.
//!
//! A team's streak is the run of its most recent matches, scanned backward,
//! for which the mode's predicate holds. The scan stops at the first match
//! that breaks it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  record::{MatchResult, Outcome},
};

/// The predicate a streak is measured against.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StreakMode {
  #[default]
  Winning,
  Unbeaten,
  Winless,
  Scoring,
  Clean,
}

impl StreakMode {
  pub fn parse(text: &str) -> Result<Self> {
    text
      .trim()
      .parse()
      .map_err(|_| Error::UnknownStreakMode(text.to_owned()))
  }

  pub fn holds(self, entry: &StreakEntry) -> bool {
    match self {
      Self::Winning => entry.outcome == Outcome::Win,
      Self::Unbeaten => entry.outcome != Outcome::Loss,
      Self::Winless => entry.outcome != Outcome::Win,
      Self::Scoring => entry.goals_for > 0,
      Self::Clean => entry.goals_against == 0,
    }
  }
}

/// Leaderboard length, clamped into `1..=50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StreakLimit(usize);

impl StreakLimit {
  pub const MIN: usize = 1;
  pub const MAX: usize = 50;

  pub fn clamped(requested: i64) -> Self {
    let max = Self::MAX as i64;
    Self(requested.clamp(Self::MIN as i64, max) as usize)
  }

  pub fn get(self) -> usize { self.0 }
}

impl Default for StreakLimit {
  fn default() -> Self { Self(10) }
}

/// One match from a single team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakEntry {
  pub outcome:       Outcome,
  pub goals_for:     u64,
  pub goals_against: u64,
}

impl StreakEntry {
  pub fn new(goals_for: u64, goals_against: u64) -> Self {
    Self {
      outcome: Outcome::from_goals(goals_for, goals_against),
      goals_for,
      goals_against,
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Streak {
  pub length:        u32,
  pub goals_for:     u64,
  pub goals_against: u64,
}

/// Measure the current streak over `entries` (oldest first).
pub fn current_streak(entries: &[StreakEntry], mode: StreakMode) -> Streak {
  entries
    .iter()
    .rev()
    .take_while(|entry| mode.holds(entry))
    .fold(Streak::default(), |acc, entry| Streak {
      length:        acc.length + 1,
      goals_for:     acc.goals_for.saturating_add(entry.goals_for),
      goals_against: acc.goals_against.saturating_add(entry.goals_against),
    })
}

/// Per-team chronological sequences of both sides of every match.
pub fn team_sequences(matches: &[MatchResult]) -> HashMap<String, Vec<StreakEntry>> {
  let mut sequences: HashMap<String, Vec<StreakEntry>> = HashMap::new();
  for m in matches {
    sequences
      .entry(m.home_identity.clone())
      .or_default()
      .push(StreakEntry::new(m.home_goals, m.away_goals));
    sequences
      .entry(m.away_identity.clone())
      .or_default()
      .push(StreakEntry::new(m.away_goals, m.home_goals));
  }
  sequences
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakRow {
  pub team:              String,
  pub length:            u32,
  pub goals_for_sum:     u64,
  pub goals_against_sum: u64,
}

/// Rank every team's current streak: longest first, then more goals scored,
/// then fewer conceded, then team identity.
pub fn streak_leaderboard(
  matches: &[MatchResult],
  mode: StreakMode,
  limit: StreakLimit,
) -> Vec<StreakRow> {
  let mut rows: Vec<StreakRow> = team_sequences(matches)
    .into_iter()
    .map(|(team, entries)| {
      let streak = current_streak(&entries, mode);
      StreakRow {
        team,
        length: streak.length,
        goals_for_sum: streak.goals_for,
        goals_against_sum: streak.goals_against,
      }
    })
    .collect();

  rows.sort_by(|a, b| {
    b.length
      .cmp(&a.length)
      .then(b.goals_for_sum.cmp(&a.goals_for_sum))
      .then(a.goals_against_sum.cmp(&b.goals_against_sum))
      .then_with(|| a.team.cmp(&b.team))
  });
  rows.truncate(limit.get());
  rows
}

#[cfg(test)]
mod tests {
  use super::*;

  fn result(home: &str, away: &str, hg: u64, ag: u64) -> MatchResult {
    MatchResult {
      home_identity:     home.into(),
      away_identity:     away.into(),
      home_goals:        hg,
      away_goals:        ag,
      date:              None,
      round:             None,
      competition_scope: None,
      season_scope:      None,
    }
  }

  fn entries(scores: &[(u64, u64)]) -> Vec<StreakEntry> {
    scores.iter().map(|&(gf, ga)| StreakEntry::new(gf, ga)).collect()
  }

  #[test]
  fn winning_run_stops_at_the_first_draw() {
    // W, W, D, W with the most recent last.
    let seq = entries(&[(2, 0), (1, 0), (1, 1), (3, 2)]);
    assert_eq!(current_streak(&seq, StreakMode::Unbeaten).length, 4);

    let winning = current_streak(&seq, StreakMode::Winning);
    assert_eq!(winning, Streak { length: 1, goals_for: 3, goals_against: 2 });
  }

  #[test]
  fn broken_latest_match_means_no_streak() {
    let seq = entries(&[(2, 0), (0, 1)]);
    assert_eq!(current_streak(&seq, StreakMode::Winning), Streak::default());
    assert_eq!(current_streak(&[], StreakMode::Clean), Streak::default());
  }

  #[test]
  fn goal_based_modes() {
    let seq = entries(&[(0, 0), (1, 0), (2, 0), (1, 1)]);
    assert_eq!(current_streak(&seq, StreakMode::Scoring).length, 3);
    assert_eq!(current_streak(&seq, StreakMode::Clean).length, 0);

    let seq = entries(&[(1, 3), (0, 0), (0, 2)]);
    let winless = current_streak(&seq, StreakMode::Winless);
    assert_eq!(winless, Streak { length: 3, goals_for: 1, goals_against: 5 });
  }

  #[test]
  fn large_goal_sums_do_not_overflow() {
    let seq = entries(&[(4_000_000_000, 0), (4_000_000_000, 1)]);
    let winning = current_streak(&seq, StreakMode::Winning);
    assert_eq!(winning, Streak { length: 2, goals_for: 8_000_000_000, goals_against: 1 });

    let seq = entries(&[(u64::MAX, 0), (u64::MAX, 0)]);
    assert_eq!(current_streak(&seq, StreakMode::Scoring).goals_for, u64::MAX);
  }

  #[test]
  fn leaderboard_tie_breaks() {
    let matches = [
      result("A", "B", 2, 0),
      result("C", "D", 1, 0),
      result("E", "F", 1, 0),
      result("G", "H", 3, 1),
    ];
    let rows = streak_leaderboard(&matches, StreakMode::Winning, StreakLimit::default());
    let order: Vec<_> = rows.iter().map(|r| r.team.as_str()).collect();
    // All winners have length 1: G scored most; A next; C and E tie on
    // everything but name. Losers follow by name.
    assert_eq!(order, vec!["G", "A", "C", "E", "B", "D", "F", "H"]);
    assert_eq!(rows[0].goals_against_sum, 1);
    assert_eq!(rows[4].length, 0);
  }

  #[test]
  fn fewer_goals_conceded_ranks_higher() {
    let matches = [result("A", "B", 2, 1), result("C", "D", 2, 0)];
    let rows = streak_leaderboard(&matches, StreakMode::Scoring, StreakLimit::default());
    let order: Vec<_> = rows.iter().map(|r| r.team.as_str()).collect();
    assert_eq!(order, vec!["C", "A", "B", "D"]);
  }

  #[test]
  fn leaderboard_is_truncated() {
    let matches = [result("A", "B", 2, 0), result("C", "D", 1, 0)];
    let rows = streak_leaderboard(&matches, StreakMode::Winning, StreakLimit::clamped(2));
    assert_eq!(rows.len(), 2);
  }

  #[test]
  fn limit_is_clamped() {
    assert_eq!(StreakLimit::clamped(0).get(), 1);
    assert_eq!(StreakLimit::clamped(-5).get(), 1);
    assert_eq!(StreakLimit::clamped(17).get(), 17);
    assert_eq!(StreakLimit::clamped(500).get(), 50);
  }

  #[test]
  fn mode_parsing() {
    assert_eq!(StreakMode::parse("Unbeaten").unwrap(), StreakMode::Unbeaten);
    assert_eq!(StreakMode::parse("clean").unwrap(), StreakMode::Clean);
    assert_eq!(StreakMode::Winless.to_string(), "winless");
    assert!(matches!(StreakMode::parse("losing"), Err(Error::UnknownStreakMode(_))));
  }
}
