//! Advisory grid sizing from the prompt's size hint and the combatant count.

use crate::types::{GridSize, MAX_GRID_SIDE, SizeHint};

use super::model::GridRecommendation;

/// Minimum cells per combatant (enemies plus the player).
pub const CELLS_PER_COMBATANT: usize = 12;

const GROWTH_COLS: usize = 4;
const GROWTH_ROWS: usize = 3;

fn base_grid(size_hint: SizeHint) -> GridSize {
    match size_hint {
        SizeHint::Small => GridSize::new(10, 8),
        SizeHint::Medium => GridSize::new(16, 12),
        SizeHint::Large => GridSize::new(24, 18),
    }
}

/// Suggested grid for the hint and enemy count, or `None` when the current
/// grid already matches. Never applied to the running request.
pub fn recommend_grid(
    size_hint: SizeHint,
    enemy_count: usize,
    current: GridSize,
) -> Option<GridRecommendation> {
    let combatants = enemy_count.saturating_add(1);
    let needed = combatants.saturating_mul(CELLS_PER_COMBATANT);
    let mut grid = base_grid(size_hint);
    while grid.cell_count() < needed && grid.cols < MAX_GRID_SIDE && grid.rows < MAX_GRID_SIDE {
        grid = GridSize::new(
            (grid.cols + GROWTH_COLS).min(MAX_GRID_SIDE),
            (grid.rows + GROWTH_ROWS).min(MAX_GRID_SIDE),
        );
    }

    if grid == current {
        return None;
    }
    Some(GridRecommendation {
        cols: grid.cols,
        rows: grid.rows,
        reason: format!(
            "{} map for {combatants} combatants ({} cells each)",
            size_hint.as_str(),
            grid.cell_count().checked_div(combatants).unwrap_or(0)
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_hint_with_few_enemies_keeps_base_size() {
        let recommendation = recommend_grid(SizeHint::Small, 3, GridSize::new(20, 20)).unwrap();
        assert_eq!((recommendation.cols, recommendation.rows), (10, 8));
        assert!(recommendation.reason.starts_with("small map for 4 combatants"));
    }

    #[test]
    fn crowded_requests_grow_in_four_by_three_steps() {
        let recommendation = recommend_grid(SizeHint::Small, 10, GridSize::new(10, 8)).unwrap();
        assert_eq!((recommendation.cols, recommendation.rows), (14, 11));
        assert!(recommendation.cols * recommendation.rows >= 11 * CELLS_PER_COMBATANT);
    }

    #[test]
    fn matching_grid_yields_none() {
        assert_eq!(recommend_grid(SizeHint::Medium, 2, GridSize::new(16, 12)), None);
    }

    #[test]
    fn growth_stops_at_the_grid_ceiling() {
        let recommendation =
            recommend_grid(SizeHint::Large, 100_000, GridSize::new(12, 8)).unwrap();
        assert!(recommendation.cols <= MAX_GRID_SIDE);
        assert!(recommendation.rows <= MAX_GRID_SIDE);
    }

    #[test]
    fn maximal_enemy_count_saturates() {
        let recommendation =
            recommend_grid(SizeHint::Small, usize::MAX, GridSize::new(12, 8)).unwrap();
        assert_eq!((recommendation.cols, recommendation.rows), (MAX_GRID_SIDE, 98));
        assert!(recommendation.reason.ends_with("(0 cells each)"));
    }
}
