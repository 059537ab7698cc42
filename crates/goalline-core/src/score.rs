//! Full-time score normalisation.
//!
//! Scores arrive in three shapes depending on when the record was written:
//! a structured `{"ft": [h, a]}` pair, a structured `{"ft": {"home": h,
//! "away": a}}` map, or a legacy free-text `"2-1"` string. Anything that does
//! not yield an exact pair is reported as `None`, which callers treat as an
//! unplayed fixture.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keys that may carry the full-time result inside a structured score, in
/// lookup order.
const FULL_TIME_KEYS: [&str; 2] = ["ft", "full_time"];

/// `<digits><non-digit separator><digits>`, anchored on both ends.
static SCORE_TEXT: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\s*([0-9]+)[^0-9]+([0-9]+)\s*$").expect("score pattern compiles")
});

/// A full-time score from the home side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
  pub home: u64,
  pub away: u64,
}

impl Score {
  pub fn new(home: u64, away: u64) -> Self { Self { home, away } }
}

impl fmt::Display for Score {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.home, self.away)
  }
}

/// Parse a raw `score` value into a [`Score`].
///
/// A structured object takes precedence over text. Returns `None` for any
/// other shape, for non-numeric or negative goal counts, and for strings that
/// only partially match the `h-a` pattern.
pub fn normalize_score(raw: &Value) -> Option<Score> {
  match raw {
    Value::Object(map) => {
      let full_time = FULL_TIME_KEYS.iter().find_map(|key| map.get(*key))?;
      structured_pair(full_time)
    }
    Value::String(text) => text_pair(text),
    _ => None,
  }
}

fn structured_pair(full_time: &Value) -> Option<Score> {
  match full_time {
    Value::Array(items) if items.len() == 2 => {
      Some(Score::new(goal_count(&items[0])?, goal_count(&items[1])?))
    }
    Value::Object(sides) => Some(Score::new(
      goal_count(sides.get("home")?)?,
      goal_count(sides.get("away")?)?,
    )),
    _ => None,
  }
}

fn text_pair(text: &str) -> Option<Score> {
  let caps = SCORE_TEXT.captures(text)?;
  Some(Score::new(caps[1].parse().ok()?, caps[2].parse().ok()?))
}

/// A single goal count: a non-negative integer, an integral float, or a
/// numeric string.
fn goal_count(value: &Value) -> Option<u64> {
  match value {
    Value::Number(n) => n.as_u64().or_else(|| {
      n.as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
        .map(|f| f as u64)
    }),
    Value::String(s) => s.trim().parse().ok(),
    _ => None,
  }
}
