//! Flood fill from the player start over unblocked playable cells.

use std::collections::{BTreeSet, VecDeque};

use crate::types::Pos;

use super::grid::GridDraft;

/// Cells reachable from `start` by 4-directional steps through in-bounds,
/// playable, non-movement-blocked cells. Includes `start` when it is playable.
pub fn reachable_cells(draft: &GridDraft, start: Pos) -> BTreeSet<Pos> {
    let mut reached = BTreeSet::new();
    if !draft.is_playable(start) {
        return reached;
    }

    let mut queue = VecDeque::from([start]);
    reached.insert(start);
    while let Some(pos) = queue.pop_front() {
        for next in pos.neighbors4() {
            if !draft.is_playable(next) || draft.is_movement_blocked(next) {
                continue;
            }
            if reached.insert(next) {
                queue.push_back(next);
            }
        }
    }
    reached
}
