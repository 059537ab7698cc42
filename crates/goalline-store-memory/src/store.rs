//! [`MemoryStore`] — an in-memory implementation of [`MatchSource`].

use std::{path::Path, sync::Arc};

use serde_json::Value;
use tracing::debug;

use goalline_core::{
  filter::MatchFilter,
  record::RawMatch,
  source::{MatchSource, chronological_order},
};

use crate::{Error, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A read-only collection of raw match documents.
///
/// Cloning is cheap — the documents are reference-counted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  matches: Arc<Vec<RawMatch>>,
}

impl MemoryStore {
  pub fn new(matches: Vec<RawMatch>) -> Self {
    Self { matches: Arc::new(matches) }
  }

  /// Read a JSON document from `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let text = tokio::fs::read_to_string(path.as_ref()).await?;
    let store = Self::from_json_str(&text)?;
    debug!(path = %path.as_ref().display(), matches = store.len(), "loaded match documents");
    Ok(store)
  }

  /// Parse either a plain array of match objects or an object whose
  /// `matches` field is such an array.
  pub fn from_json_str(text: &str) -> Result<Self> {
    let document: Value = serde_json::from_str(text)?;
    let items = match document {
      Value::Array(items) => items,
      Value::Object(mut envelope) => match envelope.remove("matches") {
        Some(Value::Array(items)) => items,
        _ => {
          return Err(Error::Shape("object without a `matches` array".into()));
        }
      },
      other => {
        return Err(Error::Shape(format!("top level is {}", kind_of(&other))));
      }
    };

    let matches = items
      .into_iter()
      .enumerate()
      .map(|(index, item)| match item {
        Value::Object(map) => Ok(map),
        other => Err(Error::Shape(format!(
          "match {index} is {}, expected an object",
          kind_of(&other)
        ))),
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(Self::new(matches))
  }

  pub fn len(&self) -> usize { self.matches.len() }

  pub fn is_empty(&self) -> bool { self.matches.is_empty() }
}

fn kind_of(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}

// ─── MatchSource impl ────────────────────────────────────────────────────────

impl MatchSource for MemoryStore {
  type Error = Error;

  async fn fetch_matches<'a>(&'a self, filter: &'a MatchFilter) -> Result<Vec<RawMatch>> {
    let mut selected: Vec<RawMatch> = self
      .matches
      .iter()
      .filter(|raw| filter.storage_admits(raw))
      .cloned()
      .collect();
    selected.sort_by(chronological_order);
    debug!(total = self.matches.len(), selected = selected.len(), "fetched matches");
    Ok(selected)
  }
}
