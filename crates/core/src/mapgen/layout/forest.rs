//! Forest clearing: open grass around the player, a ring of vegetation, and
//! raised, shaded woodland beyond it.

use tracing::warn;

use crate::catalog::{ObstacleCategory, ObstacleType};
use crate::map_spec::{ForestParams, LayoutParams, MapSpec};
use crate::types::{Pos, TerrainKind, Theme};

use super::super::grid::GridDraft;
use super::super::patterns::{StampRequest, stamp_patterns};
use super::super::placement::{Placement, place_decoration, place_obstacle};
use super::super::seed::SeededRng;
use super::{LayoutContext, LayoutOutcome, random_rotation, reserve_player_area};

const THEME: Theme = Theme::Forest;
/// Rejection-sampling draws granted per tree the ring should receive.
pub const VEGETATION_ATTEMPTS_PER_TREE: usize = 12;
const WOODLAND_ELEVATION: i32 = 1;
const CANOPY_SHADE: f32 = 0.15;

pub(super) fn clearing(
    spec: &MapSpec,
    context: &LayoutContext<'_>,
    rng: &mut SeededRng,
) -> LayoutOutcome {
    let params = match &spec.params {
        LayoutParams::Forest(params) => params.clone(),
        _ => ForestParams { lighting: spec.lighting(), ..ForestParams::default() },
    };
    let size = spec.grid;
    let mut draft = GridDraft::new(size);
    draft.fill_terrain(THEME.base_terrain());
    draft.apply_lighting(params.lighting);

    let shortest = size.cols.min(size.rows) as f64;
    let clearing_radius = params
        .clearing_radius
        .unwrap_or(shortest * 0.25)
        .clamp(1.5, (shortest / 2.0).max(1.5));
    let ring_width = (shortest / 3.0).floor().max(2.0);
    let outer_radius = clearing_radius + ring_width;

    let player_start = size.center();
    let center = player_start;
    for pos in size.cells() {
        let distance = pos.distance(center);
        if distance > outer_radius {
            draft.set_elevation(pos, WOODLAND_ELEVATION);
        } else if distance > clearing_radius {
            draft.set_terrain(pos, TerrainKind::Undergrowth);
        }
    }
    reserve_player_area(&mut draft, player_start);
    draft.note(format!(
        "clearing radius={clearing_radius:.1} ring={ring_width:.0} density={}",
        params.density.as_str()
    ));

    let in_ring = |pos: Pos| {
        let distance = pos.distance(center);
        distance > clearing_radius && distance <= outer_radius
    };
    let annulus_cells = size.cells().filter(|&pos| in_ring(pos)).count();
    let target = (annulus_cells as f64 * params.density.fill_ratio() * 0.5).round() as usize;

    let vegetation: Vec<&ObstacleType> = context
        .catalog
        .obstacles_in(THEME, ObstacleCategory::Nature)
        .into_iter()
        .filter(|obstacle| obstacle.spawn_weight > 0)
        .collect();
    let trees = if vegetation.is_empty() {
        warn!("no forest vegetation in catalog");
        draft.note("no vegetation types available; ring left bare");
        0
    } else {
        plant_ring(&mut draft, rng, &vegetation, target, |pos| {
            in_ring(pos) && pos.distance(player_start) >= clearing_radius.max(2.0)
        })
    };
    draft.note(format!("vegetation={trees}/{target}"));

    shade_canopy(&mut draft, outer_radius, center);

    let patterns = context.catalog.patterns_for(THEME);
    let stamped = stamp_patterns(
        &mut draft,
        context.catalog,
        rng,
        &patterns,
        StampRequest::up_to(1, context.normalized_prompt),
    );
    draft.note(format!("patterns={stamped}"));

    let flowers = scatter_ground_cover(&mut draft, context, rng, clearing_radius, center);
    draft.note(format!("decorations={flowers}"));

    LayoutOutcome { draft, player_start }
}

/// Rejection sampling over the whole grid, keeping draws `accept` admits.
fn plant_ring(
    draft: &mut GridDraft,
    rng: &mut SeededRng,
    vegetation: &[&ObstacleType],
    target: usize,
    accept: impl Fn(Pos) -> bool,
) -> usize {
    let size = draft.size();
    let mut planted = 0;
    for _ in 0..target * VEGETATION_ATTEMPTS_PER_TREE {
        if planted >= target {
            break;
        }
        let pos = Pos::new(
            rng.range_usize(0, size.cols - 1) as i32,
            rng.range_usize(0, size.rows - 1) as i32,
        );
        if !accept(pos) {
            continue;
        }
        let Some(&kind) = rng.pick_weighted(vegetation, |kind| f64::from(kind.spawn_weight)) else {
            break;
        };
        let placement = Placement::at(pos).rotated(random_rotation(rng));
        if place_obstacle(draft, kind, placement).is_ok() {
            planted += 1;
        }
    }
    planted
}

/// Dims the woodland beyond the ring and the cells under each tree.
fn shade_canopy(draft: &mut GridDraft, outer_radius: f64, center: Pos) {
    for pos in draft.size().cells() {
        if pos.distance(center) > outer_radius
            && let Some(level) = draft.light_at(pos)
        {
            draft.set_light(pos, level - CANOPY_SHADE);
        }
    }
    let canopy: Vec<Pos> =
        draft.obstacles().iter().flat_map(|obstacle| obstacle.cells.iter().copied()).collect();
    for cell in canopy {
        for neighbor in cell.neighbors4() {
            if let Some(level) = draft.light_at(neighbor) {
                draft.set_light(neighbor, level - CANOPY_SHADE / 3.0);
            }
        }
    }
}

fn scatter_ground_cover(
    draft: &mut GridDraft,
    context: &LayoutContext<'_>,
    rng: &mut SeededRng,
    clearing_radius: f64,
    center: Pos,
) -> usize {
    let cover = context.catalog.decorations_for(THEME);
    if cover.is_empty() {
        return 0;
    }
    let cells: Vec<Pos> = draft
        .size()
        .cells()
        .filter(|&pos| pos.distance(center) <= clearing_radius + 1.0 && draft.is_free(pos))
        .collect();
    let target = (cells.len() / 8).min(4);
    let mut placed = 0;
    for _ in 0..target * 4 {
        if placed >= target {
            break;
        }
        let (Some(&decoration), Some(&pos)) = (rng.pick(&cover), rng.pick(&cells)) else {
            break;
        };
        if place_decoration(draft, decoration, Placement::at(pos)).is_ok() {
            placed += 1;
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::{Density, GridSize, LayoutId, SizeHint, TimeOfDay};

    fn run(grid: GridSize, density: Density, seed: u64) -> LayoutOutcome {
        let catalog = Catalog::builtin();
        let spec = MapSpec {
            theme: THEME,
            layout: LayoutId::ForestClearing,
            grid,
            size_hint: SizeHint::Medium,
            time_of_day: TimeOfDay::Day,
            params: LayoutParams::Forest(ForestParams { density, ..ForestParams::default() }),
        };
        let context = LayoutContext { catalog: &catalog, normalized_prompt: "" };
        clearing(&spec, &context, &mut SeededRng::new(seed))
    }

    #[test]
    fn player_starts_in_an_open_clearing() {
        let outcome = run(GridSize::new(20, 16), Density::Normal, 1);
        let start = outcome.player_start;
        assert_eq!(start, GridSize::new(20, 16).center());
        for neighbor in start.neighbors4() {
            assert!(!outcome.draft.is_occupied(neighbor));
        }
    }

    #[test]
    fn dense_forests_hold_more_trees_than_sparse_ones() {
        let grid = GridSize::new(24, 20);
        let sparse = run(grid, Density::Sparse, 5).draft.obstacles().len();
        let dense = run(grid, Density::Dense, 5).draft.obstacles().len();
        assert!(dense > sparse, "dense={dense} sparse={sparse}");
    }

    #[test]
    fn woodland_is_raised_and_darker() {
        let outcome = run(GridSize::new(30, 30), Density::Normal, 3);
        let corner = Pos::new(0, 0);
        assert_eq!(outcome.draft.elevation_at(corner), Some(WOODLAND_ELEVATION));
        assert!(outcome.draft.light_at(corner).unwrap() < 1.0);
        assert_eq!(outcome.draft.elevation_at(outcome.player_start), Some(0));
    }
}
