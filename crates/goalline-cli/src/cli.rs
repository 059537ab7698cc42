//! Command-line surface and boundary validation.
//!
//! Every flag is checked here, before any record is loaded; the core only
//! ever sees validated requests.

use clap::{Args, Parser, Subcommand};
use goalline_core::{
  analytics::{
    Analytics, FormRequest, HeadToHeadRequest, StreakRequest, TableRequest,
  },
  filter::{FilterCriteria, TeamPair},
  form::{FormWindow, Perspective},
  source::MatchSource,
  streak::{StreakLimit, StreakMode},
  table::PointsScheme,
};
use serde_json::Value;

use crate::settings::Settings;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "goalline", version, about = "Football match analytics")]
pub struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "goalline.toml")]
  pub config: std::path::PathBuf,

  /// JSON file of raw match documents; overrides `data_path`.
  #[arg(short, long, value_name = "FILE", env = "GOALLINE_DATA")]
  pub data: Option<std::path::PathBuf>,

  /// Pretty-print the JSON report.
  #[arg(long)]
  pub pretty: bool,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// League table.
  Table(TableArgs),
  /// Head-to-head record between two teams.
  H2h(HeadToHeadArgs),
  /// Current streak leaderboard.
  Streaks(StreakArgs),
  /// Rolling form per team.
  Form(FormArgs),
}

/// Criteria shared by every view.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
  /// Exact legacy competition name.
  #[arg(long)]
  pub competition:      Option<String>,
  /// Case-insensitive substring of the legacy competition name.
  #[arg(long)]
  pub competition_like: Option<String>,
  #[arg(long)]
  pub season:           Option<String>,
  #[arg(long)]
  pub competition_id:   Option<String>,
  #[arg(long)]
  pub season_id:        Option<String>,
  /// Only matches where this id is the home or away team.
  #[arg(long)]
  pub team_id:          Option<String>,
  #[arg(long)]
  pub status:           Option<String>,
  /// Inclusive lower date bound (ISO-8601).
  #[arg(long)]
  pub date_from:        Option<String>,
  /// Inclusive upper date bound (ISO-8601).
  #[arg(long)]
  pub date_to:          Option<String>,
  /// Skip string rounds sorting after this value (compared as text).
  #[arg(long)]
  pub round_to:         Option<String>,
}

impl From<FilterArgs> for FilterCriteria {
  fn from(args: FilterArgs) -> Self {
    Self {
      competition:      args.competition,
      competition_like: args.competition_like,
      season:           args.season,
      competition_id:   args.competition_id,
      season_id:        args.season_id,
      team_id:          args.team_id,
      status:           args.status,
      date_from:        args.date_from,
      date_to:          args.date_to,
      round_to:         args.round_to,
    }
  }
}

#[derive(Args, Debug)]
pub struct TableArgs {
  #[command(flatten)]
  pub filter:    FilterArgs,
  #[arg(long, allow_negative_numbers = true)]
  pub pts_win:   Option<i32>,
  #[arg(long, allow_negative_numbers = true)]
  pub pts_draw:  Option<i32>,
  #[arg(long, allow_negative_numbers = true)]
  pub pts_loss:  Option<i32>,
  /// Add home-only and away-only tables.
  #[arg(long)]
  pub breakdown: bool,
  /// Form window attached to each row.
  #[arg(long, value_name = "N")]
  pub form:      Option<usize>,
  /// Leave form out of the table.
  #[arg(long, conflicts_with = "form")]
  pub no_form:   bool,
}

#[derive(Args, Debug)]
pub struct HeadToHeadArgs {
  #[command(flatten)]
  pub filter: FilterArgs,
  #[arg(long)]
  pub team1:  String,
  #[arg(long)]
  pub team2:  String,
}

#[derive(Args, Debug)]
pub struct StreakArgs {
  #[command(flatten)]
  pub filter: FilterArgs,
  /// winning, unbeaten, winless, scoring or clean.
  #[arg(long = "type", default_value = "winning")]
  pub mode:   String,
  /// Rows to return; clamped into 1..=50.
  #[arg(long, allow_negative_numbers = true)]
  pub limit:  Option<i64>,
}

#[derive(Args, Debug)]
pub struct FormArgs {
  #[command(flatten)]
  pub filter: FilterArgs,
  /// Window size, 1..=20.
  #[arg(short, long)]
  pub n:      Option<usize>,
  /// overall, home or away.
  #[arg(long, default_value = "overall")]
  pub by:     String,
  /// Only report this team.
  #[arg(long)]
  pub team:   Option<String>,
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// A validated request for one view.
#[derive(Debug)]
pub enum Request {
  Table(TableRequest),
  HeadToHead(HeadToHeadRequest),
  Streaks(StreakRequest),
  Form(FormRequest),
}

impl Command {
  pub fn into_request(self, settings: &Settings) -> goalline_core::Result<Request> {
    let request = match self {
      Command::Table(args) => {
        let defaults = settings.points;
        let form = if args.no_form {
          None
        } else {
          Some(FormWindow::new(args.form.unwrap_or(settings.form_window))?)
        };
        Request::Table(TableRequest {
          filter: FilterCriteria::from(args.filter).build()?,
          points: PointsScheme {
            win:  args.pts_win.unwrap_or(defaults.win),
            draw: args.pts_draw.unwrap_or(defaults.draw),
            loss: args.pts_loss.unwrap_or(defaults.loss),
          },
          breakdown: args.breakdown,
          form,
        })
      }
      Command::H2h(args) => Request::HeadToHead(HeadToHeadRequest {
        pair:   TeamPair::new(&args.team1, &args.team2)?,
        filter: FilterCriteria::from(args.filter).build()?,
      }),
      Command::Streaks(args) => Request::Streaks(StreakRequest {
        mode:   StreakMode::parse(&args.mode)?,
        limit:  StreakLimit::clamped(args.limit.unwrap_or(settings.streak_limit)),
        filter: FilterCriteria::from(args.filter).build()?,
      }),
      Command::Form(args) => Request::Form(FormRequest {
        window:      FormWindow::new(args.n.unwrap_or(settings.form_window))?,
        perspective: Perspective::parse(&args.by)?,
        team:        args.team.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty()),
        filter:      FilterCriteria::from(args.filter).build()?,
      }),
    };
    Ok(request)
  }
}

impl Request {
  pub fn view_name(&self) -> &'static str {
    match self {
      Request::Table(_) => "table",
      Request::HeadToHead(_) => "h2h",
      Request::Streaks(_) => "streaks",
      Request::Form(_) => "form",
    }
  }

  /// Run the view and render its report as JSON.
  pub async fn run<S: MatchSource>(self, analytics: &Analytics<S>) -> anyhow::Result<Value> {
    let value = match self {
      Request::Table(r) => serde_json::to_value(analytics.table(r).await?)?,
      Request::HeadToHead(r) => serde_json::to_value(analytics.head_to_head(r).await?)?,
      Request::Streaks(r) => serde_json::to_value(analytics.streaks(r).await?)?,
      Request::Form(r) => serde_json::to_value(analytics.form(r).await?)?,
    };
    Ok(value)
  }
}

#[cfg(test)]
mod tests {
  use goalline_core::Error;

  use super::*;

  fn request(args: &[&str]) -> goalline_core::Result<Request> {
    let mut argv = vec!["goalline"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv)
      .expect("arguments parse")
      .command
      .into_request(&Settings::default())
  }

  #[test]
  fn table_defaults_come_from_settings() {
    let Request::Table(table) = request(&["table"]).unwrap() else {
      panic!("expected a table request");
    };
    assert_eq!(table.points, PointsScheme::default());
    assert_eq!(table.form.map(FormWindow::get), Some(5));
    assert!(!table.breakdown);
  }

  #[test]
  fn table_flags_override_settings() {
    let Request::Table(table) = request(&[
      "table", "--pts-win", "2", "--pts-loss", "-1", "--no-form", "--breakdown",
      "--competition-like", "premier",
    ])
    .unwrap() else {
      panic!("expected a table request");
    };
    assert_eq!(table.points, PointsScheme { win: 2, draw: 1, loss: -1 });
    assert_eq!(table.form, None);
    assert!(table.breakdown);
  }

  #[test]
  fn zero_form_window_is_rejected() {
    let err = request(&["form", "-n", "0"]).unwrap_err();
    assert!(matches!(err, Error::InvalidFormWindow { got: 0, .. }));
    assert!(request(&["table", "--form", "21"]).is_err());
  }

  #[test]
  fn unknown_mode_and_perspective_are_rejected() {
    assert!(matches!(
      request(&["streaks", "--type", "losing"]),
      Err(Error::UnknownStreakMode(_))
    ));
    assert!(matches!(
      request(&["form", "--by", "neutral"]),
      Err(Error::UnknownPerspective(_))
    ));
  }

  #[test]
  fn streak_limit_is_clamped() {
    let Request::Streaks(streaks) = request(&["streaks", "--limit", "500"]).unwrap() else {
      panic!("expected a streaks request");
    };
    assert_eq!(streaks.limit.get(), 50);
    assert_eq!(streaks.mode, StreakMode::Winning);
  }

  #[test]
  fn non_numeric_limit_fails_to_parse() {
    let result = Cli::try_parse_from(["goalline", "streaks", "--limit", "ten"]);
    assert!(result.is_err());
  }

  #[test]
  fn head_to_head_needs_two_teams() {
    assert!(matches!(
      request(&["h2h", "--team1", "A", "--team2", " "]),
      Err(Error::MissingTeam("team_b"))
    ));
    let Request::HeadToHead(h2h) = request(&["h2h", "--team1", "A", "--team2", "B"]).unwrap()
    else {
      panic!("expected a head-to-head request");
    };
    assert_eq!(h2h.pair.team_b, "B");
  }

  #[test]
  fn bad_dates_are_rejected() {
    assert!(matches!(
      request(&["form", "--date-to", "last week"]),
      Err(Error::InvalidDate { field: "date_to", .. })
    ));
  }
}
