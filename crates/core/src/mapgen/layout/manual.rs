//! Manual arena: a structured config drives terrain, border walls, doors,
//! forced patterns, and exact obstacle counts.

use std::collections::BTreeSet;

use tracing::warn;

use crate::catalog::ObstacleType;
use crate::config::{BorderMask, ManualConfig};
use crate::types::{DoorState, GridSize, Pos};

use super::super::grid::GridDraft;
use super::super::patterns::{StampRequest, stamp_patterns};
use super::super::placement::{Placement, place_obstacle};
use super::super::seed::SeededRng;
use super::{
    LayoutContext, LayoutOutcome, nearest_free, opening_separation, place_boundary_walls,
    place_doors, random_rotation, reserve_player_area, scatter_props, select_openings,
};

/// Random tries granted per requested obstacle instance.
pub const MANUAL_ATTEMPTS_PER_ITEM: usize = 25;
/// Share of the density fill ratio applied when no counts are requested.
const DENSITY_SCALE: f64 = 0.3;

pub(crate) fn manual_arena(
    config: &ManualConfig,
    context: &LayoutContext<'_>,
    rng: &mut SeededRng,
) -> LayoutOutcome {
    let catalog = context.catalog;
    let options = &config.options;
    let theme = options.theme;
    let size = config.grid;
    let mut draft = GridDraft::new(size);
    draft.fill_terrain(theme.base_terrain());
    draft.apply_lighting(options.lighting);
    draft.note(format!("manual preset={} theme={theme}", display_preset(config)));

    if options.walls && options.border.any() {
        let boundary = border_cells(size, options.border);
        let corners = corner_cells(size);
        let candidates: Vec<Pos> =
            boundary.iter().copied().filter(|pos| !corners.contains(pos)).collect();
        let count = usize::from(options.entrances);
        let openings =
            select_openings(rng, &candidates, count, opening_separation(boundary.len(), count));
        for &opening in &openings {
            draft.reserve(opening);
        }
        let walls = place_boundary_walls(&mut draft, catalog, theme, &boundary, &openings);
        let doors = place_doors(&mut draft, catalog, theme, &openings, DoorState::Open);
        draft.note(format!("walls={walls} doors={doors}"));
    }

    let center = size.center();
    let player_start = nearest_free(&draft, &draft.playable_cells(), center).unwrap_or(center);
    reserve_player_area(&mut draft, player_start);

    if options.corridors {
        let reserved = reserve_corridors(&mut draft);
        draft.note(format!("corridors reserved {reserved} cells"));
    }

    for pattern_id in &options.patterns {
        let Some(pattern) = catalog.pattern(pattern_id) else {
            warn!(pattern = %pattern_id, "manual config references unknown pattern");
            draft.note(format!("pattern {pattern_id} not in catalog; skipped"));
            continue;
        };
        let placed = stamp_patterns(&mut draft, catalog, rng, &[pattern], StampRequest::up_to(1, ""));
        if placed == 0 {
            draft.note(format!("pattern {pattern_id} did not fit; skipped"));
        }
    }

    if config.obstacles.is_empty() {
        let props = catalog.scatter_obstacles(theme);
        let cells: Vec<Pos> =
            draft.playable_cells().into_iter().filter(|&pos| draft.is_free(pos)).collect();
        let target = (cells.len() as f64 * options.density.fill_ratio() * DENSITY_SCALE) as usize;
        let placed = scatter_props(&mut draft, rng, &props, &cells, target);
        draft.note(format!("density={} props={placed}/{target}", options.density.as_str()));
    }
    for request in &config.obstacles {
        let Some(obstacle) = catalog.obstacle(&request.type_id) else {
            warn!(obstacle = %request.type_id, "manual config references unknown obstacle");
            draft.note(format!("obstacle {} not in catalog; skipped", request.type_id));
            continue;
        };
        let placed = place_exact(&mut draft, rng, obstacle, request.count);
        if placed < request.count {
            draft.note(format!("placed {placed}/{} {}", request.count, request.type_id));
        } else {
            draft.note(format!("placed {placed} {}", request.type_id));
        }
    }

    LayoutOutcome { draft, player_start }
}

fn display_preset(config: &ManualConfig) -> &str {
    if config.preset_id.is_empty() { "custom" } else { &config.preset_id }
}

/// Border cells on the sides enabled in `mask`, row-major.
fn border_cells(size: GridSize, mask: BorderMask) -> Vec<Pos> {
    let last_x = size.cols as i32 - 1;
    let last_y = size.rows as i32 - 1;
    size.cells()
        .filter(|pos| {
            (mask.north && pos.y == 0)
                || (mask.south && pos.y == last_y)
                || (mask.west && pos.x == 0)
                || (mask.east && pos.x == last_x)
        })
        .collect()
}

fn corner_cells(size: GridSize) -> BTreeSet<Pos> {
    let last_x = size.cols as i32 - 1;
    let last_y = size.rows as i32 - 1;
    BTreeSet::from([Pos::new(0, 0), Pos::new(last_x, 0), Pos::new(0, last_y), Pos::new(last_x, last_y)])
}

/// Reserves the free cells of the middle row and column.
fn reserve_corridors(draft: &mut GridDraft) -> usize {
    let size = draft.size();
    let middle = size.center();
    let corridor: Vec<Pos> = size
        .cells()
        .filter(|pos| pos.x == middle.x || pos.y == middle.y)
        .filter(|&pos| draft.is_free(pos))
        .collect();
    for &pos in &corridor {
        draft.reserve(pos);
    }
    corridor.len()
}

/// Places up to `count` instances, each granted [`MANUAL_ATTEMPTS_PER_ITEM`]
/// random tries. Requests beyond the free cell count share the budget of the
/// cells that exist.
fn place_exact(
    draft: &mut GridDraft,
    rng: &mut SeededRng,
    obstacle: &ObstacleType,
    count: usize,
) -> usize {
    let cells: Vec<Pos> =
        draft.playable_cells().into_iter().filter(|&pos| draft.is_free(pos)).collect();
    if cells.is_empty() {
        return 0;
    }
    // No more instances than free cells can ever land.
    let budget = count.min(cells.len()).saturating_mul(MANUAL_ATTEMPTS_PER_ITEM);
    let mut placed = 0;
    for _ in 0..budget {
        if placed >= count {
            break;
        }
        let Some(&anchor) = rng.pick(&cells) else {
            break;
        };
        let placement = Placement::at(anchor).rotated(random_rotation(rng));
        if place_obstacle(draft, obstacle, placement).is_ok() {
            placed += 1;
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::Density;

    fn run(config: &ManualConfig) -> LayoutOutcome {
        let catalog = Catalog::builtin();
        let context = LayoutContext { catalog: &catalog, normalized_prompt: "" };
        let mut rng = SeededRng::from_seed_text(&config.canonical_json());
        manual_arena(config, &context, &mut rng)
    }

    #[test]
    fn exact_counts_are_met_on_an_open_grid() {
        let config = ManualConfig::new(GridSize::new(8, 8)).with_obstacle("barrel-wood", 5);
        let outcome = run(&config);
        let barrels =
            outcome.draft.obstacles().iter().filter(|o| o.type_id == "barrel-wood").count();
        assert_eq!(barrels, 5);
    }

    #[test]
    fn oversized_counts_stop_at_the_free_cell_budget() {
        for count in [2_000_000, usize::MAX] {
            let config = ManualConfig::new(GridSize::new(8, 8)).with_obstacle("barrel-wood", count);
            let outcome = run(&config);
            let barrels =
                outcome.draft.obstacles().iter().filter(|o| o.type_id == "barrel-wood").count();
            assert!(barrels > 0 && barrels < 64, "barrels={barrels}");
            let shortfall = format!("placed {barrels}/{count} barrel-wood");
            assert!(outcome.draft.log().iter().any(|line| *line == shortfall));
        }
    }

    #[test]
    fn border_mask_limits_wall_sides() {
        let mut config = ManualConfig::new(GridSize::new(6, 5));
        config.options.entrances = 0;
        config.options.border = BorderMask { north: true, ..BorderMask::NONE };
        let outcome = run(&config);
        let wall_cells: BTreeSet<Pos> =
            outcome.draft.walls().iter().flat_map(|wall| wall.cells.iter().copied()).collect();
        let north: BTreeSet<Pos> = (0..6).map(|x| Pos::new(x, 0)).collect();
        assert_eq!(wall_cells, north);
    }

    #[test]
    fn entrances_become_open_doors() {
        let mut config = ManualConfig::new(GridSize::new(10, 10));
        config.options.entrances = 3;
        let outcome = run(&config);
        let doors: Vec<_> = outcome.draft.walls().iter().filter(|w| w.door.is_some()).collect();
        assert_eq!(doors.len(), 3);
        for door in doors {
            assert!(!outcome.draft.is_movement_blocked(door.anchor));
        }
    }

    #[test]
    fn unknown_ids_are_logged_and_skipped() {
        let mut config = ManualConfig::new(GridSize::new(10, 10)).with_obstacle("dragon-egg", 2);
        config.options.patterns.push("no-such-pattern".into());
        let outcome = run(&config);
        let log = outcome.draft.log();
        assert!(log.iter().any(|line| line == "pattern no-such-pattern not in catalog; skipped"));
        assert!(log.iter().any(|line| line == "obstacle dragon-egg not in catalog; skipped"));
    }

    #[test]
    fn corridors_stay_clear() {
        let mut config = ManualConfig::new(GridSize::new(11, 11));
        config.options.corridors = true;
        config.options.density = Density::Dense;
        let outcome = run(&config);
        let middle = GridSize::new(11, 11).center();
        for x in 1..10 {
            assert!(!outcome.draft.is_occupied(Pos::new(x, middle.y)));
        }
    }
}
