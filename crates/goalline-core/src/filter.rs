//! Query criteria and the predicates derived from them.
//!
//! A [`MatchFilter`] yields two predicates. [`MatchFilter::storage_admits`] is
//! what a storage backend evaluates (or translates into its own query
//! language) before records reach the core; it may admit a superset.
//! [`MatchFilter::round_admits`] is the round cutoff, always applied
//! in-process.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
  Error, Result,
  record::{
    AWAY_IDENTITY_FIELDS, DeclaredScope, HOME_IDENTITY_FIELDS, RawMatch,
    identity_text, parse_date_text, parse_date_value,
  },
};

// ─── Criteria ────────────────────────────────────────────────────────────────

/// Caller-supplied criteria, exactly as received at the boundary.
///
/// Every field is untrimmed free text; [`FilterCriteria::build`] validates and
/// normalises them into a [`MatchFilter`].
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
  pub competition:      Option<String>,
  pub competition_like: Option<String>,
  pub season:           Option<String>,
  pub competition_id:   Option<String>,
  pub season_id:        Option<String>,
  pub team_id:          Option<String>,
  pub status:           Option<String>,
  pub date_from:        Option<String>,
  pub date_to:          Option<String>,
  pub round_to:         Option<String>,
}

impl FilterCriteria {
  pub fn build(self) -> Result<MatchFilter> {
    let competition = match (clean(self.competition), clean(self.competition_like)) {
      (Some(exact), _) => Some(CompetitionFilter::Exact(exact)),
      (None, Some(like)) => Some(CompetitionFilter::Like(like)),
      (None, None) => None,
    };

    Ok(MatchFilter {
      competition,
      season: clean(self.season),
      competition_id: clean(self.competition_id),
      season_id: clean(self.season_id),
      team_id: clean(self.team_id),
      status: clean(self.status),
      date_from: parse_bound("date_from", self.date_from)?,
      date_to: parse_bound("date_to", self.date_to)?,
      // The cutoff is compared verbatim, so it is not trimmed.
      round_to: self.round_to.filter(|r| !r.is_empty()),
      pair: None,
    })
  }
}

fn clean(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

fn parse_bound(field: &'static str, value: Option<String>) -> Result<Option<NaiveDate>> {
  match clean(value) {
    None => Ok(None),
    Some(text) => parse_date_text(&text)
      .map(Some)
      .ok_or(Error::InvalidDate { field, value: text }),
  }
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// How the legacy `competition` name field is matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionFilter {
  Exact(String),
  /// Case-insensitive substring.
  Like(String),
}

impl CompetitionFilter {
  fn admits(&self, name: &str) -> bool {
    match self {
      Self::Exact(expected) => name == expected,
      Self::Like(fragment) => name.to_lowercase().contains(&fragment.to_lowercase()),
    }
  }
}

/// The unordered pair of teams a head-to-head query is restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamPair {
  pub team_a: String,
  pub team_b: String,
}

impl TeamPair {
  pub fn new(team_a: &str, team_b: &str) -> Result<Self> {
    let team_a = team_a.trim();
    let team_b = team_b.trim();
    if team_a.is_empty() {
      return Err(Error::MissingTeam("team_a"));
    }
    if team_b.is_empty() {
      return Err(Error::MissingTeam("team_b"));
    }
    Ok(Self { team_a: team_a.to_owned(), team_b: team_b.to_owned() })
  }

  /// `{home, away} == {team_a, team_b}` as sets.
  pub fn is_exactly(&self, home: &str, away: &str) -> bool {
    (home == self.team_a && away == self.team_b)
      || (home == self.team_b && away == self.team_a)
  }

  fn contains(&self, identity: &str) -> bool {
    identity == self.team_a || identity == self.team_b
  }

  /// Storage pre-filter: any of the six team fields names either team.
  ///
  /// This admits supersets (e.g. a record whose id fields name other teams
  /// but whose legacy names match), hence the exact re-check after
  /// normalisation.
  pub fn touches(&self, raw: &RawMatch) -> bool {
    HOME_IDENTITY_FIELDS
      .iter()
      .chain(AWAY_IDENTITY_FIELDS.iter())
      .filter_map(|key| raw.get(*key).and_then(identity_text))
      .any(|identity| self.contains(&identity))
  }
}

/// Validated query criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchFilter {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub competition:    Option<CompetitionFilter>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub season:         Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub competition_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub season_id:      Option<String>,
  /// Matches records where this id is either the home or the away team id.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub team_id:        Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status:         Option<String>,
  /// Inclusive lower bound.
  pub date_from:      Option<NaiveDate>,
  /// Inclusive upper bound.
  pub date_to:        Option<NaiveDate>,
  pub round_to:       Option<String>,
  /// Head-to-head restriction; set by the head-to-head view.
  #[serde(skip)]
  pub pair:           Option<TeamPair>,
}

impl MatchFilter {
  pub fn with_pair(mut self, pair: TeamPair) -> Self {
    self.pair = Some(pair);
    self
  }

  /// The scope a record without its own competition/season is assumed to
  /// belong to.
  pub fn declared_scope(&self) -> DeclaredScope {
    let competition = self.competition_id.clone().or_else(|| match &self.competition {
      Some(CompetitionFilter::Exact(name)) => Some(name.clone()),
      _ => None,
    });
    DeclaredScope {
      competition,
      season: self.season_id.clone().or_else(|| self.season.clone()),
    }
  }

  /// The storage-level predicate. Every present criterion must hold.
  pub fn storage_admits(&self, raw: &RawMatch) -> bool {
    let text = |key: &str| raw.get(key).and_then(identity_text);
    let equals = |key: &str, expected: &Option<String>| match expected {
      None => true,
      Some(expected) => text(key).as_deref() == Some(expected.as_str()),
    };

    if let Some(competition) = &self.competition {
      match text("competition") {
        Some(name) if competition.admits(&name) => {}
        _ => return false,
      }
    }

    if !(equals("season", &self.season)
      && equals("competition_id", &self.competition_id)
      && equals("season_id", &self.season_id)
      && equals("status", &self.status))
    {
      return false;
    }

    if let Some(team_id) = &self.team_id {
      let on_either_side = ["home_team_id", "away_team_id"]
        .iter()
        .any(|key| text(key).as_deref() == Some(team_id.as_str()));
      if !on_either_side {
        return false;
      }
    }

    if (self.date_from.is_some() || self.date_to.is_some()) && !self.date_admits(raw) {
      return false;
    }

    self.pair.as_ref().is_none_or(|pair| pair.touches(raw))
  }

  fn date_admits(&self, raw: &RawMatch) -> bool {
    let Some(date) = raw.get("date").and_then(parse_date_value) else {
      return false;
    };
    self.date_from.is_none_or(|from| date >= from) && self.date_to.is_none_or(|to| date <= to)
  }

  /// The in-process round cutoff.
  ///
  /// A string round is excluded when it compares lexicographically greater
  /// than the cutoff, so `"10"` passes a cutoff of `"9"`. Non-string rounds
  /// are never excluded.
  pub fn round_admits(&self, raw: &RawMatch) -> bool {
    match (&self.round_to, raw.get("round")) {
      (Some(cutoff), Some(serde_json::Value::String(round))) => round <= cutoff,
      _ => true,
    }
  }
}
