//! Rolling form windows.
//!
//! Each team keeps a fixed-capacity FIFO of its most recent results, appended
//! in chronological order; pushing past capacity evicts the oldest entry.

use std::{
  collections::{HashMap, VecDeque},
  fmt,
};

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  record::{MatchResult, Outcome},
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// A validated window size in `1..=20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormWindow(usize);

impl FormWindow {
  pub const MIN: usize = 1;
  pub const MAX: usize = 20;

  pub fn new(size: usize) -> Result<Self> {
    if (Self::MIN..=Self::MAX).contains(&size) {
      Ok(Self(size))
    } else {
      Err(Error::InvalidFormWindow { got: size, min: Self::MIN, max: Self::MAX })
    }
  }

  pub fn get(self) -> usize { self.0 }
}

impl Default for FormWindow {
  fn default() -> Self { Self(5) }
}

/// Which side(s) of each match feed a team's window.
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
pub enum Perspective {
  #[default]
  Overall,
  Home,
  Away,
}

impl Perspective {
  pub fn parse(text: &str) -> Result<Self> {
    text
      .trim()
      .parse()
      .map_err(|_| Error::UnknownPerspective(text.to_owned()))
  }

  fn records_home(self) -> bool { matches!(self, Self::Overall | Self::Home) }

  fn records_away(self) -> bool { matches!(self, Self::Overall | Self::Away) }
}

// ─── History ─────────────────────────────────────────────────────────────────

/// One team's bounded result history, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormHistory {
  capacity: usize,
  entries:  VecDeque<Outcome>,
}

impl FormHistory {
  pub fn new(window: FormWindow) -> Self {
    Self {
      capacity: window.get(),
      entries:  VecDeque::with_capacity(window.get()),
    }
  }

  pub fn push(&mut self, outcome: Outcome) {
    if self.entries.len() == self.capacity {
      self.entries.pop_front();
    }
    self.entries.push_back(outcome);
  }

  pub fn outcomes(&self) -> Vec<Outcome> { self.entries.iter().copied().collect() }

  pub fn wins(&self) -> usize {
    self.entries.iter().filter(|o| **o == Outcome::Win).count()
  }
}

impl fmt::Display for FormHistory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.entries.iter().try_for_each(|o| write!(f, "{o}"))
  }
}

/// Scan `matches` in order and build every team's window.
pub fn build_histories(
  matches: &[MatchResult],
  window: FormWindow,
  perspective: Perspective,
) -> HashMap<String, FormHistory> {
  let mut histories: HashMap<String, FormHistory> = HashMap::new();
  let mut push = |team: &str, outcome: Outcome| {
    histories
      .entry(team.to_owned())
      .or_insert_with(|| FormHistory::new(window))
      .push(outcome);
  };

  for m in matches {
    if perspective.records_home() {
      push(&m.home_identity, m.home_outcome());
    }
    if perspective.records_away() {
      push(&m.away_identity, m.away_outcome());
    }
  }
  histories
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormRow {
  pub team:          String,
  pub window_size:   usize,
  pub form_sequence: Vec<Outcome>,
  pub form_string:   String,
}

/// Every team's form, most wins in the window first, then by team.
///
/// With `team` set, only that team's row is returned (if it played).
pub fn form_table(
  matches: &[MatchResult],
  window: FormWindow,
  perspective: Perspective,
  team: Option<&str>,
) -> Vec<FormRow> {
  let mut rows: Vec<(usize, FormRow)> = build_histories(matches, window, perspective)
    .into_iter()
    .filter(|(name, _)| team.is_none_or(|wanted| wanted == name.as_str()))
    .map(|(name, history)| {
      let row = FormRow {
        team:          name,
        window_size:   window.get(),
        form_sequence: history.outcomes(),
        form_string:   history.to_string(),
      };
      (history.wins(), row)
    })
    .collect();

  rows.sort_by(|(wins_a, a), (wins_b, b)| {
    wins_b.cmp(wins_a).then_with(|| a.team.cmp(&b.team))
  });
  rows.into_iter().map(|(_, row)| row).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::record::Outcome::{Draw as D, Loss as L, Win as W};

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

  fn window(n: usize) -> FormWindow { FormWindow::new(n).unwrap() }

  #[test]
  fn window_bounds() {
    assert!(FormWindow::new(1).is_ok());
    assert!(FormWindow::new(20).is_ok());
    assert!(matches!(
      FormWindow::new(0),
      Err(Error::InvalidFormWindow { got: 0, min: 1, max: 20 })
    ));
    assert!(FormWindow::new(21).is_err());
    assert_eq!(FormWindow::default().get(), 5);
  }

  #[test]
  fn oldest_results_are_evicted() {
    let mut history = FormHistory::new(window(3));
    for outcome in [W, D, L, W, W] {
      history.push(outcome);
    }
    assert_eq!(history.outcomes(), vec![L, W, W]);
    assert_eq!(history.to_string(), "LWW");
    assert_eq!(history.wins(), 2);
  }

  #[test]
  fn short_history_keeps_everything() {
    let rows = form_table(&[result("A", "B", 1, 0)], window(5), Perspective::Overall, None);
    assert_eq!(rows[0].team, "A");
    assert_eq!(rows[0].form_string, "W");
    assert_eq!(rows[1].form_sequence, vec![L]);
    assert_eq!(rows[1].window_size, 5);
  }

  #[test]
  fn perspective_selects_sides() {
    let matches = [result("A", "B", 2, 0), result("B", "A", 1, 1)];

    let home = build_histories(&matches, window(5), Perspective::Home);
    assert_eq!(home["A"].to_string(), "W");
    assert_eq!(home["B"].to_string(), "D");

    let away = build_histories(&matches, window(5), Perspective::Away);
    assert_eq!(away["B"].to_string(), "L");
    assert_eq!(away["A"].to_string(), "D");

    let overall = build_histories(&matches, window(5), Perspective::Overall);
    assert_eq!(overall["A"].to_string(), "WD");
    assert_eq!(overall["B"].to_string(), "LD");
  }

  #[test]
  fn teams_without_a_side_in_perspective_are_absent() {
    let histories = build_histories(&[result("A", "B", 0, 1)], window(5), Perspective::Home);
    assert!(histories.contains_key("A"));
    assert!(!histories.contains_key("B"));
  }

  #[test]
  fn listing_orders_by_wins_then_team() {
    let matches = [
      result("C", "D", 1, 0),
      result("B", "A", 0, 0),
      result("D", "C", 0, 2),
      result("A", "B", 3, 1),
    ];
    let rows = form_table(&matches, window(5), Perspective::Overall, None);
    let order: Vec<_> = rows.iter().map(|r| (r.team.as_str(), r.form_string.as_str())).collect();
    assert_eq!(order, vec![("C", "WW"), ("A", "DW"), ("B", "DL"), ("D", "LL")]);
  }

  #[test]
  fn listing_can_be_restricted_to_one_team() {
    let matches = [result("A", "B", 1, 0), result("B", "C", 1, 0)];
    let rows = form_table(&matches, window(5), Perspective::Overall, Some("B"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].form_string, "LW");
    assert!(form_table(&matches, window(5), Perspective::Overall, Some("Z")).is_empty());
  }

  #[test]
  fn perspective_parsing() {
    assert_eq!(Perspective::parse("HOME").unwrap(), Perspective::Home);
    assert_eq!(Perspective::parse(" away ").unwrap(), Perspective::Away);
    assert_eq!(Perspective::Overall.to_string(), "overall");
    assert!(matches!(Perspective::parse("neutral"), Err(Error::UnknownPerspective(_))));
  }
}
