use super::*;
use crate::geom2::{Polygon, Rect};

const TRIALS: usize = 10_000;
const VERTEX_COUNTS: [usize; 5] = [3, 4, 5, 8, 20];

fn selector(n: usize, strategy: VertexSelectionStrategy, seed: u64) -> VertexSelector {
    let polygon = Polygon::regular(n, &Rect::unit()).unwrap();
    VertexSelector::from_seed(polygon, strategy, seed)
}

fn picks(n: usize, strategy: VertexSelectionStrategy, seed: u64) -> Vec<usize> {
    let mut sel = selector(n, strategy, seed);
    (0..TRIALS).map(|_| sel.select_index()).collect()
}

#[test]
fn random_reaches_every_vertex() {
    for (k, &n) in VERTEX_COUNTS.iter().enumerate() {
        let seq = picks(n, VertexSelectionStrategy::Random, 100 + k as u64);
        let mut seen = vec![false; n];
        for &i in &seq {
            assert!(i < n);
            seen[i] = true;
        }
        assert!(seen.iter().all(|&s| s), "n={n}");
    }
}

#[test]
fn random_keeps_no_history() {
    let mut sel = selector(5, VertexSelectionStrategy::Random, 1);
    for _ in 0..10 {
        sel.select_index();
    }
    assert!(sel.history().is_empty());
}

#[test]
fn non_repeating_never_repeats() {
    for (k, &n) in VERTEX_COUNTS.iter().enumerate() {
        let seq = picks(n, VertexSelectionStrategy::NonRepeating, 200 + k as u64);
        for w in seq.windows(2) {
            assert_ne!(w[0], w[1], "n={n}");
        }
    }
}

#[test]
fn not_one_place_away_never_picks_predecessor() {
    let strategy = VertexSelectionStrategy::NotNPlacesAway { n: 1 };
    for (k, &n) in VERTEX_COUNTS.iter().enumerate() {
        let seq = picks(n, strategy, 300 + k as u64);
        for w in seq.windows(2) {
            assert_ne!(w[0], (w[1] + 1) % n, "n={n}");
        }
    }
}

#[test]
fn not_two_places_away_never_picks_second_predecessor() {
    let strategy = VertexSelectionStrategy::NotNPlacesAway { n: 2 };
    for (k, &n) in VERTEX_COUNTS.iter().enumerate() {
        let seq = picks(n, strategy, 400 + k as u64);
        for w in seq.windows(2) {
            assert_ne!(w[0], (w[1] + 2) % n, "n={n}");
        }
    }
}

#[test]
fn not_adjacent_after_identical_pair() {
    let strategy = VertexSelectionStrategy::NotAdjacentIfPreviousTwoIdentical;
    for (k, &n) in VERTEX_COUNTS.iter().enumerate() {
        let seq = picks(n, strategy, 500 + k as u64);
        let mut constrained = 0usize;
        for w in seq.windows(3) {
            if w[0] == w[1] {
                constrained += 1;
                assert_ne!(w[2], (w[1] + 1) % n, "n={n}");
                assert_ne!(w[2], (w[1] + n - 1) % n, "n={n}");
            }
        }
        // The constraint must actually have been exercised.
        assert!(constrained > 0, "n={n}");
    }
}

#[test]
fn history_is_bounded_and_most_recent_first() {
    for strategy in VertexSelectionStrategy::ALL {
        let mut sel = selector(8, strategy, 9);
        let mut last = Vec::new();
        for _ in 0..50 {
            last.insert(0, sel.select_index());
            assert!(sel.history().len() <= strategy.kept_history_count());
        }
        let kept = strategy.kept_history_count();
        assert_eq!(sel.history(), &last[..kept]);
    }
}

#[test]
fn select_vertex_returns_polygon_vertices() {
    let mut sel = selector(6, VertexSelectionStrategy::NonRepeating, 3);
    let vertices = sel.polygon().vertices().to_vec();
    for _ in 0..100 {
        let v = sel.select_vertex();
        assert!(vertices.contains(&v));
    }
}

#[test]
fn seeded_selectors_agree() {
    assert_eq!(
        picks(5, VertexSelectionStrategy::NonRepeating, 42),
        picks(5, VertexSelectionStrategy::NonRepeating, 42)
    );
}

#[test]
fn predicates_leave_a_choice_on_triangles() {
    // Exhaustive over every history of length <= 2 on a triangle.
    let n = 3;
    let mut histories: Vec<Vec<usize>> = vec![vec![]];
    for a in 0..n {
        histories.push(vec![a]);
        for b in 0..n {
            histories.push(vec![a, b]);
        }
    }
    for strategy in VertexSelectionStrategy::ALL {
        for h in &histories {
            let h = &h[..h.len().min(strategy.kept_history_count())];
            let accepted = (0..n).filter(|&i| strategy.accepts(i, h, n)).count();
            assert!(accepted >= 1, "{strategy} with history {h:?}");
        }
    }
}

#[test]
fn predicate_edge_cases() {
    use VertexSelectionStrategy::*;
    // Empty history accepts everything.
    for strategy in VertexSelectionStrategy::ALL {
        assert!((0..4).all(|i| strategy.accepts(i, &[], 4)));
    }
    // n wraps modulo the vertex count.
    assert!(!NotNPlacesAway { n: 1 }.accepts(3, &[0], 4));
    assert!(!NotNPlacesAway { n: 5 }.accepts(3, &[0], 4));
    assert!(NotNPlacesAway { n: 1 }.accepts(0, &[0], 4));
    // Different previous pair leaves all choices open.
    assert!((0..4).all(|i| NotAdjacentIfPreviousTwoIdentical.accepts(i, &[1, 2], 4)));
    // Identical pair at 0 on a square refuses 1 and 3.
    let ok: Vec<usize> = (0..4)
        .filter(|&i| NotAdjacentIfPreviousTwoIdentical.accepts(i, &[0, 0], 4))
        .collect();
    assert_eq!(ok, vec![0, 2]);
}

#[test]
fn strategy_names_parse_back() {
    for strategy in VertexSelectionStrategy::ALL {
        let parsed: VertexSelectionStrategy = strategy.to_string().parse().unwrap();
        assert_eq!(parsed, strategy);
    }
    let custom: VertexSelectionStrategy = "not-n-places-away:3".parse().unwrap();
    assert_eq!(custom, VertexSelectionStrategy::NotNPlacesAway { n: 3 });
    assert!("sometimes".parse::<VertexSelectionStrategy>().is_err());
    assert_eq!(
        VertexSelectionStrategy::NotNPlacesAway { n: 1 }.label(),
        "Not One Place Away"
    );
}

#[test]
fn strategy_json_is_tagged() {
    let json = serde_json::to_value(VertexSelectionStrategy::NotNPlacesAway { n: 2 }).unwrap();
    assert_eq!(json, serde_json::json!({"kind": "notNPlacesAway", "n": 2}));
    let back: VertexSelectionStrategy =
        serde_json::from_value(serde_json::json!({"kind": "nonRepeating"})).unwrap();
    assert_eq!(back, VertexSelectionStrategy::NonRepeating);
}
