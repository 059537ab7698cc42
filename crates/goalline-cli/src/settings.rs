//! Runtime settings: an optional TOML file, then `GOALLINE_*` environment
//! variables (nested keys use `__`, e.g. `GOALLINE_POINTS__WIN=2`).

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use goalline_core::table::PointsScheme;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// JSON file holding the raw match documents.
  pub data_path:    PathBuf,
  pub points:       PointsScheme,
  /// Default form window for `table` and `form`.
  pub form_window:  usize,
  /// Default leaderboard length for `streaks`.
  pub streak_limit: i64,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      data_path:    PathBuf::from("matches.json"),
      points:       PointsScheme::default(),
      form_window:  5,
      streak_limit: 10,
    }
  }
}

impl Settings {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(
        config::Environment::with_prefix("GOALLINE")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise Settings")
  }
}
