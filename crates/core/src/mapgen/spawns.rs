//! Enemy spawn selection: reachable free cells, farthest from the player first.

use std::cmp::Ordering;

use tracing::warn;

use crate::catalog::Catalog;
use crate::types::Pos;

use super::grid::GridDraft;
use super::model::EnemySpawn;
use super::reachability::reachable_cells;
use super::seed::SeededRng;

/// Upper bound (exclusive) of the random score added to each candidate's distance.
pub const SPAWN_JITTER: f64 = 0.75;

pub(super) struct SpawnContext<'a> {
    pub(super) catalog: &'a Catalog,
    pub(super) player_start: Pos,
    pub(super) enemy_count: usize,
}

struct Candidate {
    pos: Pos,
    score: f64,
}

pub(super) fn allocate_spawns(
    draft: &mut GridDraft,
    context: &SpawnContext<'_>,
    rng: &mut SeededRng,
) -> Vec<EnemySpawn> {
    if context.enemy_count == 0 {
        return Vec::new();
    }
    if context.catalog.enemies.is_empty() {
        warn!("catalog has no enemy types; spawns skipped");
        draft.note("no enemy types in catalog; spawns skipped");
        return Vec::new();
    }

    let open = spawn_candidates(draft, context.player_start);
    let reachable = reachable_cells(draft, context.player_start);
    let filtered: Vec<Pos> = open.iter().copied().filter(|pos| reachable.contains(pos)).collect();
    let cells = if filtered.is_empty() && !open.is_empty() {
        draft.note("no reachable spawn cells; using unfiltered candidates");
        open
    } else {
        filtered
    };

    let mut candidates: Vec<Candidate> = cells
        .into_iter()
        .map(|pos| Candidate {
            pos,
            score: f64::from(pos.manhattan(context.player_start)) + rng.next_f64() * SPAWN_JITTER,
        })
        .collect();
    candidates.sort_by(|left, right| match right.score.total_cmp(&left.score) {
        Ordering::Equal => left.pos.cmp(&right.pos),
        other => other,
    });

    let mut spawns: Vec<EnemySpawn> = Vec::with_capacity(context.enemy_count.min(candidates.len()));
    for candidate in candidates {
        if spawns.len() >= context.enemy_count {
            break;
        }
        if spawns.iter().any(|spawn| spawn.pos == candidate.pos) {
            continue;
        }
        let Some(enemy) = rng.pick(&context.catalog.enemies) else {
            break;
        };
        spawns.push(EnemySpawn { enemy_type: enemy.id.clone(), pos: candidate.pos });
    }

    if spawns.len() < context.enemy_count {
        draft.note(format!(
            "requested {} enemies, placed {}",
            context.enemy_count,
            spawns.len()
        ));
    } else {
        draft.note(format!("spawns={}", spawns.len()));
    }
    spawns
}

/// Playable cells free of obstacles, walls, and decorations, excluding the start.
/// Reserved cells stay eligible.
fn spawn_candidates(draft: &GridDraft, player_start: Pos) -> Vec<Pos> {
    draft
        .playable_cells()
        .into_iter()
        .filter(|&pos| pos != player_start && !draft.is_occupied(pos))
        .collect()
}
