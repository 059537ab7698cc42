//! Core types and computations for the Goalline match analytics.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! receives raw match documents from a [`source::MatchSource`], normalises them
//! into [`record::MatchResult`]s and folds those into league tables, streaks,
//! form windows and head-to-head summaries.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
#![allow(async_fn_in_trait)]

pub mod analytics;
pub mod error;
pub mod filter;
pub mod form;
pub mod h2h;
pub mod record;
pub mod score;
pub mod source;
pub mod streak;
pub mod table;

pub use error::{Error, Result};
