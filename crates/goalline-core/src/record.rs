//! Raw match documents and the canonical [`MatchResult`].
//!
//! Two schema eras share the match collection. Legacy documents carry plain
//! team names in `team1`/`team2` and a loosely-typed `score`; current
//! documents carry `home_team_id`/`away_team_id` (plus denormalised
//! `home_team`/`away_team` names), `competition_id`/`season_id` and a nested
//! `score.ft`. Everything downstream of [`normalize_match`] sees only
//! [`MatchResult`] and never branches on the era.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::score::{Score, normalize_score};

/// An untyped match document as returned by the storage layer.
pub type RawMatch = serde_json::Map<String, Value>;

/// Home-side identity fields, in resolution order.
pub const HOME_IDENTITY_FIELDS: [&str; 3] = ["home_team_id", "home_team", "team1"];
/// Away-side identity fields, in resolution order.
pub const AWAY_IDENTITY_FIELDS: [&str; 3] = ["away_team_id", "away_team", "team2"];

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// A single team's result in one match, rendered as `W`, `D` or `L`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
  #[serde(rename = "W")]
  Win,
  #[serde(rename = "D")]
  Draw,
  #[serde(rename = "L")]
  Loss,
}

impl Outcome {
  pub fn from_goals(goals_for: u64, goals_against: u64) -> Self {
    match goals_for.cmp(&goals_against) {
      std::cmp::Ordering::Greater => Self::Win,
      std::cmp::Ordering::Less => Self::Loss,
      std::cmp::Ordering::Equal => Self::Draw,
    }
  }

  /// The same result seen from the opponent's side.
  pub fn reversed(self) -> Self {
    match self {
      Self::Win => Self::Loss,
      Self::Loss => Self::Win,
      Self::Draw => Self::Draw,
    }
  }

  pub fn code(self) -> char {
    match self {
      Self::Win => 'W',
      Self::Draw => 'D',
      Self::Loss => 'L',
    }
  }
}

impl fmt::Display for Outcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.code())
  }
}

// ─── MatchResult ─────────────────────────────────────────────────────────────

/// One finished match, independent of the schema it was stored in.
///
/// Only produced for records with a resolvable full-time score and two
/// resolvable sides. `home_identity != away_identity` is assumed, not checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
  /// Team id or team name, whichever the source record carries.
  pub home_identity:     String,
  pub away_identity:     String,
  pub home_goals:        u64,
  pub away_goals:        u64,
  /// Calendar date; `None` when the record has no parseable date.
  pub date:              Option<NaiveDate>,
  pub round:             Option<String>,
  pub competition_scope: Option<String>,
  pub season_scope:      Option<String>,
}

impl MatchResult {
  pub fn score(&self) -> Score { Score::new(self.home_goals, self.away_goals) }

  pub fn home_outcome(&self) -> Outcome {
    Outcome::from_goals(self.home_goals, self.away_goals)
  }

  pub fn away_outcome(&self) -> Outcome { self.home_outcome().reversed() }

  pub fn is_self_referential(&self) -> bool {
    self.home_identity == self.away_identity
  }
}

// ─── Normalisation ───────────────────────────────────────────────────────────

/// The competition/season the query was scoped to; used as the fallback scope
/// for records that don't carry their own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredScope {
  pub competition: Option<String>,
  pub season:      Option<String>,
}

/// Why a raw record did not make it into the analytical sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DropReason {
  /// The record's string round sorts after the requested cutoff.
  RoundCutoff,
  /// One side has no non-empty identity in any of its fields.
  UnresolvedIdentity,
  /// The score is missing, unparseable or the fixture is unplayed.
  NoFullTimeScore,
  /// A head-to-head candidate whose sides are not exactly the requested pair.
  OutsidePair,
}

/// Map one raw document of either schema era onto a [`MatchResult`].
pub fn normalize_match(
  raw: &RawMatch,
  scope: &DeclaredScope,
) -> Result<MatchResult, DropReason> {
  let home_identity = resolve_identity(raw, &HOME_IDENTITY_FIELDS)
    .ok_or(DropReason::UnresolvedIdentity)?;
  let away_identity = resolve_identity(raw, &AWAY_IDENTITY_FIELDS)
    .ok_or(DropReason::UnresolvedIdentity)?;
  let score = raw
    .get("score")
    .and_then(normalize_score)
    .ok_or(DropReason::NoFullTimeScore)?;

  Ok(MatchResult {
    home_identity,
    away_identity,
    home_goals: score.home,
    away_goals: score.away,
    date: raw.get("date").and_then(parse_date_value),
    round: raw.get("round").and_then(round_text),
    competition_scope: first_text(raw, &["competition_id", "competition"])
      .or_else(|| scope.competition.clone()),
    season_scope: first_text(raw, &["season_id", "season"])
      .or_else(|| scope.season.clone()),
  })
}

/// The first field in `fields` holding a non-empty identity.
pub fn resolve_identity(raw: &RawMatch, fields: &[&str]) -> Option<String> {
  first_text(raw, fields)
}

fn first_text(raw: &RawMatch, fields: &[&str]) -> Option<String> {
  fields.iter().find_map(|key| raw.get(*key).and_then(identity_text))
}

/// Render an identifier-like value as text.
///
/// Strings are taken as-is, numbers in decimal, and extended-JSON
/// `{"$oid": "..."}` objects as their hex string. Empty strings, nulls and
/// every other shape resolve to nothing.
pub fn identity_text(value: &Value) -> Option<String> {
  match value {
    Value::String(s) if !s.is_empty() => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Object(map) => map
      .get("$oid")
      .and_then(Value::as_str)
      .filter(|s| !s.is_empty())
      .map(str::to_owned),
    _ => None,
  }
}

fn round_text(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Parse a stored `date` value down to its calendar date.
pub fn parse_date_value(value: &Value) -> Option<NaiveDate> {
  match value {
    Value::String(s) => parse_date_text(s),
    Value::Object(map) => match map.get("$date")? {
      Value::Number(millis) => {
        DateTime::from_timestamp_millis(millis.as_i64()?).map(|dt| dt.date_naive())
      }
      other => parse_date_value(other),
    },
    _ => None,
  }
}

/// Parse `YYYY-MM-DD`, RFC 3339, or a naive ISO timestamp, discarding the
/// time of day.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
  let text = text.trim();
  if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
    return Some(date);
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
    return Some(dt.date_naive());
  }
  ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    .map(|dt| dt.date())
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn raw(value: Value) -> RawMatch {
    match value {
      Value::Object(map) => map,
      _ => panic!("fixture must be an object"),
    }
  }

  fn normalize(value: Value) -> Result<MatchResult, DropReason> {
    normalize_match(&raw(value), &DeclaredScope::default())
  }

  #[test]
  fn legacy_record_uses_team_names() {
    let m = normalize(json!({
      "round": "Matchday 1",
      "date": "2024-08-16",
      "team1": "Arsenal FC",
      "team2": "Chelsea FC",
      "score": "2-1",
      "competition": "Premier League",
      "season": "2024/25",
    }))
    .unwrap();

    assert_eq!(m.home_identity, "Arsenal FC");
    assert_eq!(m.away_identity, "Chelsea FC");
    assert_eq!((m.home_goals, m.away_goals), (2, 1));
    assert_eq!(m.date, NaiveDate::from_ymd_opt(2024, 8, 16));
    assert_eq!(m.round.as_deref(), Some("Matchday 1"));
    assert_eq!(m.competition_scope.as_deref(), Some("Premier League"));
    assert_eq!(m.season_scope.as_deref(), Some("2024/25"));
  }

  #[test]
  fn current_record_prefers_ids_over_names() {
    let m = normalize(json!({
      "home_team_id": { "$oid": "64b7f0c2a1b2c3d4e5f60718" },
      "away_team_id": "t-2",
      "home_team": "Arsenal FC",
      "away_team": "Chelsea FC",
      "competition_id": "c-1",
      "season_id": "s-1",
      "date": "2024-08-16T19:00:00Z",
      "score": { "ft": { "home": 0, "away": 0 } },
    }))
    .unwrap();

    assert_eq!(m.home_identity, "64b7f0c2a1b2c3d4e5f60718");
    assert_eq!(m.away_identity, "t-2");
    assert_eq!(m.home_outcome(), Outcome::Draw);
    assert_eq!(m.competition_scope.as_deref(), Some("c-1"));
    assert_eq!(m.date, NaiveDate::from_ymd_opt(2024, 8, 16));
  }

  #[test]
  fn empty_fields_fall_through_to_the_next_candidate() {
    let m = normalize(json!({
      "home_team_id": "",
      "home_team": null,
      "team1": "Leeds",
      "away_team": "Hull",
      "score": "1-0",
    }))
    .unwrap();
    assert_eq!(m.home_identity, "Leeds");
    assert_eq!(m.away_identity, "Hull");
  }

  #[test]
  fn unresolved_side_drops_the_record() {
    let err = normalize(json!({ "team1": "Leeds", "score": "1-0" })).unwrap_err();
    assert_eq!(err, DropReason::UnresolvedIdentity);
  }

  #[test]
  fn unplayed_fixture_drops_the_record() {
    let err = normalize(json!({ "team1": "Leeds", "team2": "Hull" })).unwrap_err();
    assert_eq!(err, DropReason::NoFullTimeScore);

    let err = normalize(json!({ "team1": "Leeds", "team2": "Hull", "score": "-" }))
      .unwrap_err();
    assert_eq!(err, DropReason::NoFullTimeScore);
  }

  #[test]
  fn declared_scope_fills_missing_record_scope() {
    let scope = DeclaredScope {
      competition: Some("c-9".into()),
      season:      Some("s-9".into()),
    };
    let m = normalize_match(
      &raw(json!({ "team1": "A", "team2": "B", "score": "0-3" })),
      &scope,
    )
    .unwrap();
    assert_eq!(m.competition_scope.as_deref(), Some("c-9"));
    assert_eq!(m.season_scope.as_deref(), Some("s-9"));
    assert_eq!(m.away_outcome(), Outcome::Win);
  }

  #[test]
  fn numeric_rounds_and_missing_dates_are_kept() {
    let m = normalize(json!({ "team1": "A", "team2": "B", "score": "1-1", "round": 7 }))
      .unwrap();
    assert_eq!(m.round.as_deref(), Some("7"));
    assert_eq!(m.date, None);
  }

  #[test]
  fn self_referential_record_is_not_rejected() {
    let m = normalize(json!({ "team1": "A", "team2": "A", "score": "1-1" })).unwrap();
    assert!(m.is_self_referential());
  }

  #[test]
  fn date_formats() {
    let d = NaiveDate::from_ymd_opt(2025, 1, 4);
    assert_eq!(parse_date_text("2025-01-04"), d);
    assert_eq!(parse_date_text("2025-01-04T15:00:00"), d);
    assert_eq!(parse_date_text("2025-01-04 15:00:00.250"), d);
    assert_eq!(parse_date_text("2025-01-04T15:00:00+01:00"), d);
    assert_eq!(parse_date_value(&json!({ "$date": "2025-01-04T00:00:00Z" })), d);
    assert_eq!(parse_date_value(&json!({ "$date": 1_735_999_200_000_i64 })), d);
    assert_eq!(parse_date_text("04/01/2025"), None);
    assert_eq!(parse_date_value(&json!(20250104)), None);
  }

  #[test]
  fn outcome_codes() {
    assert_eq!(Outcome::from_goals(3, 1).to_string(), "W");
    assert_eq!(Outcome::from_goals(1, 1).code(), 'D');
    assert_eq!(Outcome::from_goals(0, 2).reversed(), Outcome::Win);
    assert_eq!(serde_json::to_value(Outcome::Loss).unwrap(), json!("L"));
  }
}
