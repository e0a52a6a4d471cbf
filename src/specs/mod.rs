// src/specs/mod.rs
//! # Response “specs” module
//!
//! This module hosts the **endpoint-specific reading rules** for the stats API.
//! Each spec knows one endpoint: which query it needs and which of the
//! returned tables carry the data we keep.
//!
//! ## What lives here
//! - **Request shape** per endpoint (query parameters, endpoint name).
//! - **Table selection** from the generic `resultSets` envelope, decoded by
//!   `result_sets` into `store::DataSet`s (headers + string rows).
//!
//! ## What does **not** live here
//! - **Retry, pacing, resume state** – `retry`, `collect` and `runner` decide
//!   when and how often to call a spec.
//! - **Column semantics** – beyond locating tables, nothing here interprets
//!   stats columns. `index` reads GAME_ID / GAME_DATE; everything else passes
//!   through untouched.
//!
//! ## Typical call chain
//! ```text
//! runner → RetryPolicy::call → StatsSource (HttpSource) → specs::<endpoint>::fetch()
//!                                            ↘  DataSet / BoxScore
//!                         collect::Collector appends to disk (outside of specs)
//! ```
//!
//! ## Testing notes
//! Every spec splits `parse_doc` from `fetch` so it can be tested offline
//! against captured response bodies.
pub mod result_sets;
pub mod game_log;
pub mod box_score;

pub use box_score::BoxScore;
