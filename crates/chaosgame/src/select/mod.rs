//! Vertex selection under history constraints.
//!
//! Model
//! - A `VertexSelectionStrategy` is a pure predicate over
//!   `(candidate, history, vertex_count)`, where `history` lists previously
//!   accepted indices, most recent first.
//! - A `VertexSelector` draws uniform candidates, rejects those the predicate
//!   refuses, and records accepted indices in a history of bounded length.
//!
//! Termination
//! - Every shipped strategy refuses at most two indices and a polygon has at
//!   least three vertices, so some candidate is always acceptable. The draw
//!   loop is still bounded by `cfg::MAX_SELECTION_ATTEMPTS`; past that the
//!   selector scans all candidates once and panics only if none is accepted.

mod selector;
mod strategy;

pub use selector::VertexSelector;
pub use strategy::{ParseStrategyError, VertexSelectionStrategy};

#[cfg(test)]
mod tests;
