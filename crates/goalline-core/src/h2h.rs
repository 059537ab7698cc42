//! Head-to-head summaries between two teams.

use chrono::NaiveDate;
use serde::{Serialize, Serializer, ser::{SerializeMap, SerializeStruct}};
use tracing::debug;

use crate::{filter::TeamPair, record::MatchResult};

/// A count kept for each of the two requested teams.
///
/// Serialised inside [`HeadToHead`] as a map keyed by the team identities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerTeam {
  pub team_a: u64,
  pub team_b: u64,
}

impl PerTeam {
  fn credit(&mut self, pair: &TeamPair, identity: &str, amount: u64) {
    if identity == pair.team_a {
      self.team_a = self.team_a.saturating_add(amount);
    } else {
      self.team_b = self.team_b.saturating_add(amount);
    }
  }

  fn keyed<'a>(&self, team_a: &'a str, team_b: &'a str) -> KeyedCounts<'a> {
    KeyedCounts { team_a, team_b, counts: *self }
  }
}

/// `{ <team_a>: n, <team_b>: n }`.
struct KeyedCounts<'a> {
  team_a: &'a str,
  team_b: &'a str,
  counts: PerTeam,
}

impl Serialize for KeyedCounts<'_> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    // A pair naming one team twice credits everything to `team_a`.
    if self.team_a == self.team_b {
      let mut map = serializer.serialize_map(Some(1))?;
      map.serialize_entry(self.team_a, &self.counts.team_a)?;
      return map.end();
    }
    let mut map = serializer.serialize_map(Some(2))?;
    map.serialize_entry(self.team_a, &self.counts.team_a)?;
    map.serialize_entry(self.team_b, &self.counts.team_b)?;
    map.end()
  }
}

/// One contributing match, sides as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadToHeadMatch {
  pub date:   Option<NaiveDate>,
  pub round:  Option<String>,
  /// Home side.
  pub team_a: String,
  /// Away side.
  pub team_b: String,
  /// `"home-away"`.
  pub score:  String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadToHead {
  pub team_a:  String,
  pub team_b:  String,
  pub played:  u32,
  pub wins:    PerTeam,
  pub draws:   u32,
  pub goals:   PerTeam,
  pub matches: Vec<HeadToHeadMatch>,
}

impl Serialize for HeadToHead {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct("HeadToHead", 7)?;
    state.serialize_field("team_a", &self.team_a)?;
    state.serialize_field("team_b", &self.team_b)?;
    state.serialize_field("played", &self.played)?;
    state.serialize_field("wins", &self.wins.keyed(&self.team_a, &self.team_b))?;
    state.serialize_field("draws", &self.draws)?;
    state.serialize_field("goals", &self.goals.keyed(&self.team_a, &self.team_b))?;
    state.serialize_field("matches", &self.matches)?;
    state.end()
  }
}

/// Fold the matches between exactly `pair` into a summary.
///
/// Any match whose sides are not exactly the pair is skipped.
pub fn head_to_head(matches: &[MatchResult], pair: &TeamPair) -> HeadToHead {
  let mut summary = HeadToHead {
    team_a:  pair.team_a.clone(),
    team_b:  pair.team_b.clone(),
    played:  0,
    wins:    PerTeam::default(),
    draws:   0,
    goals:   PerTeam::default(),
    matches: Vec::new(),
  };

  for m in matches {
    if !pair.is_exactly(&m.home_identity, &m.away_identity) {
      debug!(
        home = %m.home_identity,
        away = %m.away_identity,
        "skipping match outside the head-to-head pair"
      );
      continue;
    }

    summary.played += 1;
    summary.goals.credit(pair, &m.home_identity, m.home_goals);
    summary.goals.credit(pair, &m.away_identity, m.away_goals);
    match m.home_goals.cmp(&m.away_goals) {
      std::cmp::Ordering::Greater => summary.wins.credit(pair, &m.home_identity, 1),
      std::cmp::Ordering::Less => summary.wins.credit(pair, &m.away_identity, 1),
      std::cmp::Ordering::Equal => summary.draws += 1,
    }

    summary.matches.push(HeadToHeadMatch {
      date:   m.date,
      round:  m.round.clone(),
      team_a: m.home_identity.clone(),
      team_b: m.away_identity.clone(),
      score:  m.score().to_string(),
    });
  }

  summary
}
