// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text canonicalization and fuzzy matching for the Engram memory subsystem.
//!
//! [`normalize`] produces the canonical form used as the embedding cache
//! key; [`fuzzy`] scores raw strings against each other for the retrieval
//! fallback path when no embedding is available.

pub mod fuzzy;
pub mod normalize;

pub use fuzzy::{fuzzy_score, term_overlap_ratio, FuzzyScore};
pub use normalize::normalize;
