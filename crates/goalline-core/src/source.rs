//! The `MatchSource` trait and the ordering contract it must honour.
//!
//! The trait is implemented by storage backends (e.g.
//! `goalline-store-memory`). The core never opens or holds a storage handle
//! itself; it is handed a source and asks it for records.

use std::{cmp::Ordering, future::Future};

use chrono::NaiveDate;
use serde_json::Value;

use crate::{
  filter::MatchFilter,
  record::{RawMatch, parse_date_value},
};

/// Abstraction over whatever stores raw match documents.
pub trait MatchSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return every record admitted by [`MatchFilter::storage_admits`] (a
  /// superset is allowed), sorted by [`chronological_order`].
  ///
  /// The round cutoff and the head-to-head exactness check are applied by the
  /// core afterwards; backends need not evaluate them.
  fn fetch_matches<'a>(
    &'a self,
    filter: &'a MatchFilter,
  ) -> impl Future<Output = Result<Vec<RawMatch>, Self::Error>> + Send + 'a;
}

/// Sort position of a stored `round` value: missing, then numbers, then
/// strings.
#[derive(Debug, PartialEq, PartialOrd)]
enum RoundKey<'a> {
  Missing,
  Number(f64),
  Text(&'a str),
}

fn round_key(raw: &RawMatch) -> RoundKey<'_> {
  match raw.get("round") {
    Some(Value::Number(n)) => n.as_f64().map_or(RoundKey::Missing, RoundKey::Number),
    Some(Value::String(s)) => RoundKey::Text(s),
    _ => RoundKey::Missing,
  }
}

fn date_key(raw: &RawMatch) -> Option<NaiveDate> {
  raw.get("date").and_then(parse_date_value)
}

/// Ascending `(date, round)` order. Undated records sort first.
pub fn chronological_order(a: &RawMatch, b: &RawMatch) -> Ordering {
  date_key(a)
    .cmp(&date_key(b))
    .then_with(|| {
      round_key(a)
        .partial_cmp(&round_key(b))
        .unwrap_or(Ordering::Equal)
    })
}
