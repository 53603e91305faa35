//! Stage sequencing for prompt and manual runs, and result assembly.

use std::mem;

use tracing::debug;

use crate::catalog::Catalog;
use crate::config::ManualConfig;
use crate::prompt::interpret_prompt;
use crate::types::{GridSize, LayoutId, Pos, Theme};

use super::super::grid::GridDraft;
use super::super::layout::{LayoutContext, LayoutOutcome, build_layout, manual_arena};
use super::super::model::{EnemySpawn, GridRecommendation, MapBuildResult};
use super::super::recommend::recommend_grid;
use super::super::seed::SeededRng;
use super::super::spawns::{SpawnContext, allocate_spawns};

pub(super) fn generate_from_prompt(
    catalog: &Catalog,
    prompt: &str,
    grid: GridSize,
    enemy_count: usize,
) -> MapBuildResult {
    let (grid, clamp_note) = clamp_grid(grid);
    let interpretation = interpret_prompt(prompt, grid);
    let spec = &interpretation.spec;
    debug!(theme = %spec.theme, layout = %spec.layout, %grid, "prompt interpreted");

    let mut rng = SeededRng::from_seed_text(prompt);
    debug!(seed = rng.seed(), "seeded from prompt");

    let recommendation = recommend_grid(spec.size_hint, enemy_count, grid);
    if let Some(recommendation) = &recommendation {
        debug!(cols = recommendation.cols, rows = recommendation.rows, "grid recommended");
    }

    let context = LayoutContext { catalog, normalized_prompt: &interpretation.normalized };
    let LayoutOutcome { mut draft, player_start } = build_layout(spec, &context, &mut rng);
    debug!(
        obstacles = draft.obstacles().len(),
        walls = draft.walls().len(),
        decorations = draft.decorations().len(),
        "layout built"
    );

    let spawns = allocate_spawns(
        &mut draft,
        &SpawnContext { catalog, player_start, enemy_count },
        &mut rng,
    );
    debug!(spawns = spawns.len(), requested = enemy_count, "spawns allocated");

    let mut log: Vec<String> = clamp_note.into_iter().collect();
    log.extend(interpretation.notes.iter().cloned());
    assemble(
        Assembly {
            theme: spec.theme,
            layout: spec.layout,
            player_start,
            spawns,
            requested_enemies: enemy_count,
            recommendation,
            log,
        },
        draft,
    )
}

pub(super) fn generate_from_config(catalog: &Catalog, config: &ManualConfig) -> MapBuildResult {
    let mut rng = SeededRng::from_seed_text(&config.canonical_json());
    debug!(seed = rng.seed(), preset = %config.preset_id, "seeded from manual config");

    let (grid, clamp_note) = clamp_grid(config.grid);
    let clamped_config;
    let config = if grid == config.grid {
        config
    } else {
        clamped_config = ManualConfig { grid, ..config.clone() };
        &clamped_config
    };

    let context = LayoutContext { catalog, normalized_prompt: "" };
    let LayoutOutcome { mut draft, player_start } = manual_arena(config, &context, &mut rng);
    debug!(obstacles = draft.obstacles().len(), walls = draft.walls().len(), "manual arena built");

    let spawns = allocate_spawns(
        &mut draft,
        &SpawnContext { catalog, player_start, enemy_count: config.enemy_count },
        &mut rng,
    );
    debug!(spawns = spawns.len(), requested = config.enemy_count, "spawns allocated");

    assemble(
        Assembly {
            theme: config.options.theme,
            layout: LayoutId::ManualArena,
            player_start,
            spawns,
            requested_enemies: config.enemy_count,
            recommendation: None,
            log: clamp_note.into_iter().collect(),
        },
        draft,
    )
}

fn clamp_grid(grid: GridSize) -> (GridSize, Option<String>) {
    let (clamped, changed) = grid.clamped();
    let note = changed.then(|| format!("grid clamped from {grid} to {clamped}"));
    (clamped, note)
}

/// Everything the result needs besides the draft itself.
struct Assembly {
    theme: Theme,
    layout: LayoutId,
    player_start: Pos,
    spawns: Vec<EnemySpawn>,
    requested_enemies: usize,
    recommendation: Option<GridRecommendation>,
    /// Notes that precede the draft log.
    log: Vec<String>,
}

fn assemble(assembly: Assembly, mut draft: GridDraft) -> MapBuildResult {
    let grid = draft.size();
    let playable_cells = draft.playable_cells().into_iter().map(Pos::key).collect();
    let terrain = draft.terrain().to_vec();
    let elevation = draft.elevation().to_vec();
    let light = draft.light().to_vec();
    let obstacles = mem::take(&mut draft.obstacles);
    let walls = mem::take(&mut draft.walls);
    let decorations = mem::take(&mut draft.decorations);

    let mut summary = vec![
        format!("{} / {} on {grid}", assembly.theme, assembly.layout),
        format!(
            "obstacles={} walls={} decorations={}",
            obstacles.len(),
            walls.len(),
            decorations.len()
        ),
        format!(
            "player start {}; enemies {}/{}",
            assembly.player_start,
            assembly.spawns.len(),
            assembly.requested_enemies
        ),
    ];
    if let Some(recommendation) = &assembly.recommendation {
        summary.push(format!(
            "recommended grid {}x{}: {}",
            recommendation.cols, recommendation.rows, recommendation.reason
        ));
    }

    let mut log = assembly.log;
    log.extend(draft.into_log());

    MapBuildResult {
        summary,
        log,
        grid,
        theme: assembly.theme,
        layout: assembly.layout,
        player_start: assembly.player_start,
        spawns: assembly.spawns,
        playable_cells,
        obstacles,
        walls,
        decorations,
        terrain,
        elevation,
        light,
        recommendation: assembly.recommendation,
    }
}
