//! Battle-map generation split into coherent submodules: the draft and its
//! placement primitives, pattern stamping, layout modules, reachability,
//! spawn allocation, and the orchestrating pipeline.

pub mod model;
pub mod patterns;
pub mod placement;

mod generator;
mod grid;
mod layout;
mod reachability;
mod recommend;
mod seed;
mod spawns;

pub use generator::MapGenerator;
pub use grid::GridDraft;
pub use layout::{
    LayoutContext, LayoutOutcome, MANUAL_ATTEMPTS_PER_ITEM, PLAYER_RESERVE_RADIUS, Rect,
    SCATTER_ATTEMPTS_PER_PROP, VEGETATION_ATTEMPTS_PER_TREE, build_layout,
};
pub use model::{
    DecorInstance, EnemySpawn, GridRecommendation, MapBuildResult, ObstacleInstance, WallInstance,
};
pub use reachability::reachable_cells;
pub use recommend::{CELLS_PER_COMBATANT, recommend_grid};
pub use seed::{SeededRng, seed_from_text};
pub use spawns::SPAWN_JITTER;

use crate::catalog::Catalog;
use crate::config::ManualConfig;
use crate::types::GridSize;

/// Generates a map from a free-text prompt.
pub fn generate(
    prompt: &str,
    grid: GridSize,
    enemy_count: usize,
    catalog: &Catalog,
) -> MapBuildResult {
    MapGenerator::new(catalog).generate(prompt, grid, enemy_count)
}

/// Generates a map from a structured manual configuration.
pub fn generate_manual(config: &ManualConfig, catalog: &Catalog) -> MapBuildResult {
    MapGenerator::new(catalog).generate_manual(config)
}
