//! Request-scoped analytical views over a [`MatchSource`].
//!
//! Each call fetches the filtered, ordered raw records, normalises them into
//! [`MatchResult`]s and folds them into one view. Nothing is shared between
//! calls except the source itself, so calls may run concurrently.

use serde::Serialize;
use tracing::debug;

use crate::{
  Error, Result,
  filter::{MatchFilter, TeamPair},
  form::{FormRow, FormWindow, Perspective, form_table},
  h2h::{HeadToHead, head_to_head},
  record::{DropReason, MatchResult, RawMatch, normalize_match},
  source::MatchSource,
  streak::{StreakLimit, StreakMode, StreakRow, streak_leaderboard},
  table::{PointsScheme, Standings, TableOptions, build_standings},
};

// ─── Requests ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct TableRequest {
  #[serde(flatten)]
  pub filter:    MatchFilter,
  pub points:    PointsScheme,
  pub breakdown: bool,
  /// Attach a form window of this size to every row.
  pub form:      Option<FormWindow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadToHeadRequest {
  #[serde(flatten)]
  pub filter: MatchFilter,
  #[serde(flatten)]
  pub pair:   TeamPair,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StreakRequest {
  #[serde(flatten)]
  pub filter: MatchFilter,
  pub mode:   StreakMode,
  pub limit:  StreakLimit,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FormRequest {
  #[serde(flatten)]
  pub filter:      MatchFilter,
  pub window:      FormWindow,
  pub perspective: Perspective,
  /// Restrict the listing to one team.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub team:        Option<String>,
}

// ─── Reports ─────────────────────────────────────────────────────────────────

/// A view together with the criteria that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct Report<F, V> {
  pub filters: F,
  #[serde(flatten)]
  pub view:    V,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreakListing {
  pub streaks: Vec<StreakRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormListing {
  pub data: Vec<FormRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadToHeadView {
  pub summary: HeadToHead,
}

pub type TableReport = Report<TableRequest, Standings>;
pub type HeadToHeadReport = Report<HeadToHeadRequest, HeadToHeadView>;
pub type StreakReport = Report<StreakRequest, StreakListing>;
pub type FormReport = Report<FormRequest, FormListing>;

// ─── Normalisation ───────────────────────────────────────────────────────────

/// Turn the fetched records into the analytical sequence, preserving order.
///
/// Applies the round cutoff and, for head-to-head filters, the exact pair
/// check. Dropped records are traced, never reported as errors.
pub fn prepare_matches(raws: &[RawMatch], filter: &MatchFilter) -> Vec<MatchResult> {
  let scope = filter.declared_scope();
  let mut kept = Vec::with_capacity(raws.len());

  for raw in raws {
    let outcome = if filter.round_admits(raw) {
      normalize_match(raw, &scope)
    } else {
      Err(DropReason::RoundCutoff)
    };
    let outcome = outcome.and_then(|m| match &filter.pair {
      Some(pair) if !pair.is_exactly(&m.home_identity, &m.away_identity) => {
        Err(DropReason::OutsidePair)
      }
      _ => Ok(m),
    });

    match outcome {
      Ok(m) => {
        if m.is_self_referential() {
          debug!(team = %m.home_identity, "match lists the same team on both sides");
        }
        kept.push(m);
      }
      Err(reason) => debug!(%reason, round = ?raw.get("round"), "dropping match record"),
    }
  }

  debug!(fetched = raws.len(), kept = kept.len(), "normalised match records");
  kept
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// The four analytical views over an injected [`MatchSource`].
#[derive(Debug, Clone)]
pub struct Analytics<S> {
  source: S,
}

impl<S: MatchSource> Analytics<S> {
  pub fn new(source: S) -> Self { Self { source } }

  async fn load(&self, filter: &MatchFilter) -> Result<Vec<MatchResult>> {
    let raws = self
      .source
      .fetch_matches(filter)
      .await
      .map_err(|e| Error::Source(Box::new(e)))?;
    Ok(prepare_matches(&raws, filter))
  }

  /// League table, optionally with home/away breakdown and per-team form.
  pub async fn table(&self, request: TableRequest) -> Result<TableReport> {
    let matches = self.load(&request.filter).await?;
    let view = build_standings(&matches, &TableOptions {
      points:    request.points,
      breakdown: request.breakdown,
      form:      request.form,
    });
    Ok(Report { filters: request, view })
  }

  /// Summary of the meetings between exactly two teams.
  pub async fn head_to_head(&self, request: HeadToHeadRequest) -> Result<HeadToHeadReport> {
    let filter = request.filter.clone().with_pair(request.pair.clone());
    let matches = self.load(&filter).await?;
    let summary = head_to_head(&matches, &request.pair);
    Ok(Report { filters: request, view: HeadToHeadView { summary } })
  }

  /// Current streak leaderboard.
  pub async fn streaks(&self, request: StreakRequest) -> Result<StreakReport> {
    let matches = self.load(&request.filter).await?;
    let streaks = streak_leaderboard(&matches, request.mode, request.limit);
    Ok(Report { filters: request, view: StreakListing { streaks } })
  }

  /// Rolling form for every team (or one team).
  pub async fn form(&self, request: FormRequest) -> Result<FormReport> {
    let matches = self.load(&request.filter).await?;
    let data = form_table(
      &matches,
      request.window,
      request.perspective,
      request.team.as_deref(),
    );
    Ok(Report { filters: request, view: FormListing { data } })
  }
}

#[cfg(test)]
mod tests {
  use serde_json::{Value, json};

  use super::*;
  use crate::filter::FilterCriteria;

  fn raws(values: Vec<Value>) -> Vec<RawMatch> {
    values
      .into_iter()
      .map(|v| match v {
        Value::Object(map) => map,
        _ => panic!("fixture must be an object"),
      })
      .collect()
  }

  #[test]
  fn unplayed_and_unresolved_records_are_dropped() {
    let records = raws(vec![
      json!({ "team1": "A", "team2": "B", "score": "1-0" }),
      json!({ "team1": "A", "team2": "C" }),
      json!({ "team1": "A", "score": "2-2" }),
      json!({ "home_team_id": "t1", "away_team_id": "t2", "score": { "ft": [0, 1] } }),
    ]);
    let kept = prepare_matches(&records, &MatchFilter::default());
    assert_eq!(kept.len(), 2);
    assert_eq!(kept[1].home_identity, "t1");
  }

  #[test]
  fn round_cutoff_runs_before_normalisation() {
    let filter = FilterCriteria { round_to: Some("9".into()), ..Default::default() }
      .build()
      .unwrap();
    let records = raws(vec![
      json!({ "team1": "A", "team2": "B", "score": "1-0", "round": "10" }),
      json!({ "team1": "A", "team2": "B", "score": "1-0", "round": "95" }),
      json!({ "team1": "A", "team2": "B", "score": "1-0", "round": 95 }),
    ]);
    let kept = prepare_matches(&records, &filter);
    let rounds: Vec<_> = kept.iter().map(|m| m.round.as_deref()).collect();
    assert_eq!(rounds, vec![Some("10"), Some("95")]);
  }

  #[test]
  fn pair_filter_rechecks_exact_sides() {
    // Legacy names match the pair but the ids don't.
    let records = raws(vec![
      json!({ "home_team_id": "x", "away_team_id": "y", "team1": "A", "team2": "B", "score": "1-1" }),
      json!({ "team1": "B", "team2": "A", "score": "0-2" }),
    ]);
    let filter = MatchFilter::default().with_pair(TeamPair::new("A", "B").unwrap());
    let kept = prepare_matches(&records, &filter);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].home_identity, "B");
  }

  #[test]
  fn report_serialises_filters_and_view() {
    let report = Report {
      filters: StreakRequest::default(),
      view:    StreakListing { streaks: vec![] },
    };
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["filters"]["mode"], json!("winning"));
    assert_eq!(value["filters"]["limit"], json!(10));
    assert_eq!(value["filters"]["round_to"], Value::Null);
    assert_eq!(value["streaks"], json!([]));
  }
}
