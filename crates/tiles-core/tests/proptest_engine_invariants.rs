//! Property-based invariant tests for move resolution.
//!
//! These tests verify structural invariants that must hold for any board
//! and any direction:
//!
//! 1. Magnitude is conserved: merges turn two N tiles into one 2N tile.
//! 2. The score delta is the sum of merge results.
//! 3. No destination absorbs two merges in one move.
//! 4. `changed` agrees with the pending layer actually changing.
//! 5. A second resolve in the same direction changes nothing iff the first
//!    left no slide or merge available, i.e. always after the first settles
//!    the line, except where a fresh merge result can merge again.
//! 6. `is_blocked` agrees with brute force over all four directions.
//! 7. The committed layer is never written by the engine.

use std::collections::HashSet;

use proptest::prelude::*;
use tiles_core::{Board, CellValue, Direction, Position, Transition, resolve};

// ── Helpers ─────────────────────────────────────────────────────────────

fn value_strategy() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        3 => Just(CellValue::Empty),
        4 => (1u8..=6).prop_map(|e| CellValue::from_exponent(e).unwrap()),
        1 => (7u8..=15).prop_map(|e| CellValue::from_exponent(e).unwrap()),
    ]
}

fn board_strategy() -> impl Strategy<Value = Board> {
    prop::array::uniform16(value_strategy()).prop_map(|values| {
        let mut board = Board::new();
        for (pos, value) in Position::all().zip(values) {
            board.set(pos, value);
        }
        board
    })
}

/// Boards with no empty cell, which makes the blocked predicate interesting.
fn full_board_strategy() -> impl Strategy<Value = Board> {
    prop::array::uniform16(1u8..=5).prop_map(|exps| {
        let mut board = Board::new();
        for (pos, e) in Position::all().zip(exps) {
            board.set(pos, CellValue::from_exponent(e).unwrap());
        }
        board
    })
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Magnitude conservation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn magnitude_is_conserved(board in board_strategy(), direction in direction_strategy()) {
        let result = resolve(&board, direction);
        prop_assert_eq!(result.board.total(), board.total());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Score delta is the sum of merge results
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn score_delta_matches_merges(board in board_strategy(), direction in direction_strategy()) {
        let result = resolve(&board, direction);
        let merged: u32 = result
            .transitions
            .iter()
            .filter_map(|t| match t {
                Transition::Merge { result, .. } => Some(result.magnitude()),
                _ => None,
            })
            .sum();
        prop_assert_eq!(result.score_delta, merged);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. One merge per destination
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn merges_never_share_a_destination(board in board_strategy(), direction in direction_strategy()) {
        let result = resolve(&board, direction);
        let mut seen = HashSet::new();
        for t in &result.transitions {
            if let Transition::Merge { to, .. } = t {
                prop_assert!(seen.insert(*to), "two merges into {:?}", to);
            }
        }
    }

    #[test]
    fn every_destination_is_occupied(board in board_strategy(), direction in direction_strategy()) {
        let result = resolve(&board, direction);
        for t in &result.transitions {
            let to = t.destination();
            prop_assert!(to.is_some());
            if let Some(to) = to {
                prop_assert!(!result.board.pending(to).is_empty(), "{:?} left {:?} empty", t, to);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. `changed` agrees with the pending layer
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn changed_iff_pending_differs(board in board_strategy(), direction in direction_strategy()) {
        let result = resolve(&board, direction);
        let differs = result.board.pending_rows() != board.pending_rows();
        prop_assert_eq!(result.changed, differs);
        prop_assert_eq!(result.changed, !result.transitions.is_empty());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Resolving twice
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn second_resolve_changes_only_by_merging(
        board in board_strategy(),
        direction in direction_strategy(),
    ) {
        let first = resolve(&board, direction);
        let mut settled = first.board.clone();
        for pos in Position::all() {
            settled.commit(pos);
        }
        let second = resolve(&settled, direction);
        // After one move every line is packed against the edge, so the
        // only thing left to do is merge results that were barred from
        // chaining on the first pass.
        for t in &second.transitions {
            if let Transition::Slide { .. } = t {
                // Slides only follow a merge on the same line.
                prop_assert!(second.merge_count() > 0);
            }
        }
        if first.merge_count() == 0 {
            prop_assert!(!second.changed);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Blocked predicate vs brute force
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn blocked_matches_brute_force(board in full_board_strategy()) {
        let brute = Direction::ALL.iter().all(|&d| !resolve(&board, d).changed);
        prop_assert_eq!(board.is_blocked(), brute);
    }

    #[test]
    fn blocked_matches_brute_force_sparse(board in board_strategy()) {
        let brute = Direction::ALL.iter().all(|&d| !resolve(&board, d).changed);
        prop_assert_eq!(board.is_blocked(), brute);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Committed layer untouched
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn committed_layer_untouched(board in board_strategy(), direction in direction_strategy()) {
        let result = resolve(&board, direction);
        prop_assert_eq!(result.board.committed_rows(), board.committed_rows());
    }
}
