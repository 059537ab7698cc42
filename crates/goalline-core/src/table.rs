//! League table construction.
//!
//! Rows are created lazily the first time a team appears and are owned by a
//! single build; nothing is cached between calls. Final ordering is points,
//! goal difference and goals scored (all descending), then team identity
//! ascending, which makes the output independent of input order.

use std::{cmp::Ordering, collections::HashMap};

use serde::{Deserialize, Serialize};

use crate::{
  form::{FormWindow, Perspective, build_histories},
  record::{MatchResult, Outcome},
};

// ─── Points ──────────────────────────────────────────────────────────────────

/// Points awarded per result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsScheme {
  pub win:  i32,
  pub draw: i32,
  pub loss: i32,
}

impl Default for PointsScheme {
  fn default() -> Self { Self { win: 3, draw: 1, loss: 0 } }
}

impl PointsScheme {
  pub fn award(&self, outcome: Outcome) -> i64 {
    i64::from(match outcome {
      Outcome::Win => self.win,
      Outcome::Draw => self.draw,
      Outcome::Loss => self.loss,
    })
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// The per-side figures embedded into an overall row in breakdown mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowSummary {
  pub played:          u32,
  pub wins:            u32,
  pub draws:           u32,
  pub losses:          u32,
  pub goals_for:       u64,
  pub goals_against:   u64,
  pub goal_difference: i64,
  pub points:          i64,
}

/// One team's standing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
  pub team:            String,
  pub played:          u32,
  pub wins:            u32,
  pub draws:           u32,
  pub losses:          u32,
  pub goals_for:       u64,
  pub goals_against:   u64,
  /// Always `goals_for - goals_against`; refreshed by [`TableRow::record`].
  pub goal_difference: i64,
  pub points:          i64,
  /// 1-based; zero until the table is ranked.
  pub position:        usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub home:            Option<RowSummary>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub away:            Option<RowSummary>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub form:            Option<Vec<Outcome>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub form_str:        Option<String>,
}

impl TableRow {
  pub fn new(team: impl Into<String>) -> Self {
    Self {
      team:            team.into(),
      played:          0,
      wins:            0,
      draws:           0,
      losses:          0,
      goals_for:       0,
      goals_against:   0,
      goal_difference: 0,
      points:          0,
      position:        0,
      home:            None,
      away:            None,
      form:            None,
      form_str:        None,
    }
  }

  /// Fold one match into the row from this team's point of view.
  pub fn record(
    &mut self,
    goals_for: u64,
    goals_against: u64,
    points: &PointsScheme,
  ) -> Outcome {
    let outcome = Outcome::from_goals(goals_for, goals_against);
    self.played += 1;
    self.goals_for = self.goals_for.saturating_add(goals_for);
    self.goals_against = self.goals_against.saturating_add(goals_against);
    match outcome {
      Outcome::Win => self.wins += 1,
      Outcome::Draw => self.draws += 1,
      Outcome::Loss => self.losses += 1,
    }
    self.points = self.points.saturating_add(points.award(outcome));
    self.goal_difference = goal_difference(self.goals_for, self.goals_against);
    outcome
  }

  pub fn summary(&self) -> RowSummary {
    RowSummary {
      played:          self.played,
      wins:            self.wins,
      draws:           self.draws,
      losses:          self.losses,
      goals_for:       self.goals_for,
      goals_against:   self.goals_against,
      goal_difference: self.goal_difference,
      points:          self.points,
    }
  }
}

/// `goals_for - goals_against`, saturating at the `i64` bounds.
fn goal_difference(goals_for: u64, goals_against: u64) -> i64 {
  let difference = i128::from(goals_for) - i128::from(goals_against);
  i64::try_from(difference).unwrap_or(if difference < 0 { i64::MIN } else { i64::MAX })
}

/// The table tie-break order.
pub fn compare_rows(a: &TableRow, b: &TableRow) -> Ordering {
  b.points
    .cmp(&a.points)
    .then(b.goal_difference.cmp(&a.goal_difference))
    .then(b.goals_for.cmp(&a.goals_for))
    .then_with(|| a.team.cmp(&b.team))
}

// ─── Builders ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Accumulator {
  rows: HashMap<String, TableRow>,
}

impl Accumulator {
  fn row(&mut self, team: &str) -> &mut TableRow {
    self
      .rows
      .entry(team.to_owned())
      .or_insert_with(|| TableRow::new(team))
  }

  fn into_ranked(self) -> Vec<TableRow> {
    let mut rows: Vec<TableRow> = self.rows.into_values().collect();
    rows.sort_by(compare_rows);
    for (index, row) in rows.iter_mut().enumerate() {
      row.position = index + 1;
    }
    rows
  }
}

/// Build a ranked table over `matches`.
pub fn build_table(matches: &[MatchResult], points: &PointsScheme) -> Vec<TableRow> {
  let mut acc = Accumulator::default();
  for m in matches {
    acc.row(&m.home_identity).record(m.home_goals, m.away_goals, points);
    acc.row(&m.away_identity).record(m.away_goals, m.home_goals, points);
  }
  acc.into_ranked()
}

/// Home-only and away-only tables: each match counts once, for one side.
fn build_side_tables(
  matches: &[MatchResult],
  points: &PointsScheme,
) -> (Vec<TableRow>, Vec<TableRow>) {
  let mut home = Accumulator::default();
  let mut away = Accumulator::default();
  for m in matches {
    home.row(&m.home_identity).record(m.home_goals, m.away_goals, points);
    away.row(&m.away_identity).record(m.away_goals, m.home_goals, points);
  }
  (home.into_ranked(), away.into_ranked())
}

/// Options for [`build_standings`].
#[derive(Debug, Clone, Default)]
pub struct TableOptions {
  pub points:    PointsScheme,
  /// Also build home-only and away-only tables.
  pub breakdown: bool,
  /// Attach each team's overall form over this window.
  pub form:      Option<FormWindow>,
}

/// A ranked table plus the optional breakdown tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standings {
  pub matches_included: usize,
  pub table:            Vec<TableRow>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub home_table:       Option<Vec<TableRow>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub away_table:       Option<Vec<TableRow>>,
}

pub fn build_standings(matches: &[MatchResult], options: &TableOptions) -> Standings {
  let mut table = build_table(matches, &options.points);

  if let Some(window) = options.form {
    let histories = build_histories(matches, window, Perspective::Overall);
    for row in &mut table {
      let history = histories.get(&row.team);
      row.form = Some(history.map(|h| h.outcomes()).unwrap_or_default());
      row.form_str = Some(history.map(|h| h.to_string()).unwrap_or_default());
    }
  }

  let (home_table, away_table) = if options.breakdown {
    let (home_table, away_table) = build_side_tables(matches, &options.points);
    let home_by_team: HashMap<&str, &TableRow> =
      home_table.iter().map(|r| (r.team.as_str(), r)).collect();
    let away_by_team: HashMap<&str, &TableRow> =
      away_table.iter().map(|r| (r.team.as_str(), r)).collect();
    for row in &mut table {
      row.home = home_by_team.get(row.team.as_str()).map(|r| r.summary());
      row.away = away_by_team.get(row.team.as_str()).map(|r| r.summary());
    }
    (Some(home_table), Some(away_table))
  } else {
    (None, None)
  };

  Standings {
    matches_included: matches.len(),
    table,
    home_table,
    away_table,
  }
}
