use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Constraint on which vertex may be chosen given the recent choices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum VertexSelectionStrategy {
    /// Any vertex.
    #[default]
    Random,
    /// Any vertex except the previous one.
    NonRepeating,
    /// Any vertex except the one `n` places counter-clockwise before the
    /// previous one, i.e. refuse `index` when `previous == (index + n) mod count`.
    ///
    /// `ALL` offers `n` = 1 and 2; any `n >= 1` is accepted (parsed as
    /// `not-n-places-away:N`). At most one index is refused, so every `n`
    /// leaves a choice, and `n` that is a multiple of the vertex count acts
    /// like `NonRepeating`. `n = 0` is rejected by settings validation.
    NotNPlacesAway { n: usize },
    /// When the previous two choices were the same vertex, refuse both of its
    /// neighbours; otherwise any vertex.
    NotAdjacentIfPreviousTwoIdentical,
}

impl VertexSelectionStrategy {
    /// The strategies offered to users, in display order.
    pub const ALL: [VertexSelectionStrategy; 5] = [
        Self::Random,
        Self::NonRepeating,
        Self::NotNPlacesAway { n: 1 },
        Self::NotNPlacesAway { n: 2 },
        Self::NotAdjacentIfPreviousTwoIdentical,
    ];

    /// Number of previously accepted indices the predicate looks at.
    #[inline]
    pub fn kept_history_count(&self) -> usize {
        match self {
            Self::Random => 0,
            Self::NonRepeating | Self::NotNPlacesAway { .. } => 1,
            Self::NotAdjacentIfPreviousTwoIdentical => 2,
        }
    }

    /// Whether `index` may be chosen after `history` (most recent first).
    pub fn accepts(&self, index: usize, history: &[usize], vertex_count: usize) -> bool {
        match *self {
            Self::Random => true,
            Self::NonRepeating => history.first().map_or(true, |&last| index != last),
            Self::NotNPlacesAway { n } => history
                .first()
                .map_or(true, |&last| last != (index + n % vertex_count) % vertex_count),
            Self::NotAdjacentIfPreviousTwoIdentical => match history {
                [last, before, ..] if last == before => {
                    let clockwise = (last + 1) % vertex_count;
                    let counter_clockwise = (last + vertex_count - 1) % vertex_count;
                    index != clockwise && index != counter_clockwise
                }
                _ => true,
            },
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> String {
        match *self {
            Self::Random => "Random".into(),
            Self::NonRepeating => "Non-Repeating".into(),
            Self::NotNPlacesAway { n: 1 } => "Not One Place Away".into(),
            Self::NotNPlacesAway { n: 2 } => "Not Two Places Away".into(),
            Self::NotNPlacesAway { n } => format!("Not {n} Places Away"),
            Self::NotAdjacentIfPreviousTwoIdentical => {
                "Not Adjacent If Two Previous Were Identical".into()
            }
        }
    }
}

/// Kebab-case identifiers, e.g. `non-repeating` or `not-n-places-away:3`.
impl fmt::Display for VertexSelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => f.write_str("random"),
            Self::NonRepeating => f.write_str("non-repeating"),
            Self::NotNPlacesAway { n: 1 } => f.write_str("not-one-place-away"),
            Self::NotNPlacesAway { n: 2 } => f.write_str("not-two-places-away"),
            Self::NotNPlacesAway { n } => write!(f, "not-n-places-away:{n}"),
            Self::NotAdjacentIfPreviousTwoIdentical => {
                f.write_str("not-adjacent-if-previous-two-identical")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown vertex selection strategy `{0}`")]
pub struct ParseStrategyError(pub String);

impl FromStr for VertexSelectionStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let strategy = match key.as_str() {
            "random" => Self::Random,
            "non-repeating" => Self::NonRepeating,
            "not-one-place-away" => Self::NotNPlacesAway { n: 1 },
            "not-two-places-away" => Self::NotNPlacesAway { n: 2 },
            "not-adjacent-if-previous-two-identical" => Self::NotAdjacentIfPreviousTwoIdentical,
            other => {
                let n = other
                    .strip_prefix("not-n-places-away:")
                    .and_then(|n| n.parse::<usize>().ok())
                    .ok_or_else(|| ParseStrategyError(s.to_string()))?;
                Self::NotNPlacesAway { n }
            }
        };
        Ok(strategy)
    }
}
