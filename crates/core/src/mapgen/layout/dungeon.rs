//! Dungeon rooms: a circular chamber carved out of rock, or a square hall
//! walled along the grid edge.

use std::collections::BTreeSet;
use std::f64::consts::TAU;

use tracing::warn;

use crate::catalog::{Catalog, ObstacleCategory, ObstacleType};
use crate::map_spec::{DungeonParams, LayoutParams, MapSpec};
use crate::types::{DoorState, Lighting, Pos, TerrainKind, Theme};

use super::super::grid::GridDraft;
use super::super::patterns::{StampRequest, stamp_patterns};
use super::super::placement::{Placement, place_decoration, place_obstacle};
use super::super::seed::SeededRng;
use super::{
    LayoutContext, LayoutOutcome, Rect, boundary_cells, nearest_free, opening_separation,
    place_boundary_walls, place_doors, reserve_player_area, scatter_props, select_openings,
};

const THEME: Theme = Theme::Dungeon;
const ALTAR_ELEVATION: i32 = 1;
const TORCH_LIMIT: usize = 4;
const TORCH_RADIUS: f64 = 3.0;
const TORCH_INTENSITY: f32 = 0.5;

pub(super) fn circular_room(
    spec: &MapSpec,
    context: &LayoutContext<'_>,
    rng: &mut SeededRng,
) -> LayoutOutcome {
    let params = dungeon_params(spec);
    let size = spec.grid;
    let mut draft = GridDraft::new(size);

    let center_x = (size.cols as f64 - 1.0) / 2.0;
    let center_y = (size.rows as f64 - 1.0) / 2.0;
    let max_radius = (size.cols.min(size.rows) as f64 - 1.0) / 2.0;
    let radius = params.radius.map_or(max_radius, |radius| radius.clamp(1.0, max_radius));

    let mask: BTreeSet<Pos> = size
        .cells()
        .filter(|pos| {
            let dx = f64::from(pos.x) - center_x;
            let dy = f64::from(pos.y) - center_y;
            (dx * dx + dy * dy).sqrt() <= radius + 1e-9
        })
        .collect();
    draft.fill_terrain(TerrainKind::Void);
    for &pos in &mask {
        draft.set_terrain(pos, THEME.base_terrain());
    }
    draft.set_playable_mask(mask);
    draft.apply_lighting(params.lighting);
    draft.note(format!("circular room radius={radius:.1}"));

    let boundary = boundary_cells(&draft);
    if boundary.len() == draft.playable_cells().len() {
        let mut outcome = square_room(spec, context, rng);
        outcome.draft.note("room too small for a circle; walled the grid edge instead");
        return outcome;
    }

    let center = Pos::new(center_x.round() as i32, center_y.round() as i32);
    let enclosed = enclose(&mut draft, context.catalog, rng, &params, &boundary, center, |_| true);
    enclosed.finish(draft, context, rng, &params, &boundary, |count| {
        ring_positions(center_x, center_y, radius * 0.55, count)
    })
}

pub(super) fn square_room(
    spec: &MapSpec,
    context: &LayoutContext<'_>,
    rng: &mut SeededRng,
) -> LayoutOutcome {
    let params = dungeon_params(spec);
    let size = spec.grid;
    let mut draft = GridDraft::new(size);
    draft.fill_terrain(THEME.base_terrain());
    draft.apply_lighting(params.lighting);
    draft.note("square room");

    let last_x = size.cols as i32 - 1;
    let last_y = size.rows as i32 - 1;
    let is_corner = move |pos: Pos| (pos.x == 0 || pos.x == last_x) && (pos.y == 0 || pos.y == last_y);

    let center = size.center();
    let boundary = boundary_cells(&draft);
    let enclosed =
        enclose(&mut draft, context.catalog, rng, &params, &boundary, center, |pos| !is_corner(pos));
    enclosed.finish(draft, context, rng, &params, &boundary, |count| {
        inset_ring_positions(size.cols, size.rows, count)
    })
}

fn dungeon_params(spec: &MapSpec) -> DungeonParams {
    match &spec.params {
        LayoutParams::Dungeon(params) => params.clone(),
        _ => DungeonParams { lighting: spec.lighting(), ..DungeonParams::default() },
    }
}

/// Walls and openings are in place; the player start is known.
struct Enclosed {
    openings: Vec<Pos>,
    walls: usize,
    doors: usize,
    player_start: Pos,
}

fn enclose(
    draft: &mut GridDraft,
    catalog: &Catalog,
    rng: &mut SeededRng,
    params: &DungeonParams,
    boundary: &[Pos],
    center: Pos,
    opening_allowed: impl Fn(Pos) -> bool,
) -> Enclosed {
    let candidates: Vec<Pos> = boundary.iter().copied().filter(|&pos| opening_allowed(pos)).collect();
    let count = usize::from(params.entrances);
    let openings =
        select_openings(rng, &candidates, count, opening_separation(boundary.len(), count));
    for &opening in &openings {
        draft.reserve(opening);
    }

    let walls = place_boundary_walls(draft, catalog, THEME, boundary, &openings);
    let doors = if params.closed_doors {
        place_doors(draft, catalog, THEME, &openings, DoorState::Closed)
    } else {
        0
    };

    let boundary_set: BTreeSet<Pos> = boundary.iter().copied().collect();
    let interior: Vec<Pos> =
        draft.playable_cells().into_iter().filter(|pos| !boundary_set.contains(pos)).collect();
    let target = openings.first().copied().unwrap_or(center);
    let player_start = nearest_free(draft, &interior, target)
        .or_else(|| nearest_free(draft, &draft.playable_cells(), center))
        .unwrap_or(center);
    reserve_player_area(draft, player_start);

    Enclosed { openings, walls, doors, player_start }
}

impl Enclosed {
    fn finish(
        self,
        mut draft: GridDraft,
        context: &LayoutContext<'_>,
        rng: &mut SeededRng,
        params: &DungeonParams,
        boundary: &[Pos],
        column_positions: impl Fn(usize) -> Vec<Pos>,
    ) -> LayoutOutcome {
        let catalog = context.catalog;
        draft.note(format!(
            "walls={} openings={} doors={}",
            self.walls,
            self.openings.len(),
            self.doors
        ));

        let columns = place_columns(&mut draft, catalog, column_positions(usize::from(params.columns)));
        if params.columns > 0 {
            draft.note(format!("columns={columns}/{}", params.columns));
        }
        if params.altar {
            place_altar(&mut draft, catalog, self.player_start);
        }

        let boundary_set: BTreeSet<Pos> = boundary.iter().copied().collect();
        let interior: Vec<Pos> =
            draft.playable_cells().into_iter().filter(|pos| !boundary_set.contains(pos)).collect();

        // Wall segments inside the room would break the enclosure.
        let patterns: Vec<_> = catalog
            .patterns_for(THEME)
            .into_iter()
            .filter(|pattern| !pattern.has_walls())
            .collect();
        let max_patterns = (interior.len() / 40).clamp(1, 3);
        let stamped = stamp_patterns(
            &mut draft,
            catalog,
            rng,
            &patterns,
            StampRequest::up_to(max_patterns, context.normalized_prompt),
        );
        draft.note(format!("patterns={stamped}"));

        let props: Vec<&ObstacleType> = catalog
            .scatter_obstacles(THEME)
            .into_iter()
            .filter(|prop| !prop.is_multi_cell())
            .collect();
        let scattered = scatter_props(&mut draft, rng, &props, &interior, interior.len() / 30);
        draft.note(format!("props={scattered}"));

        if params.lighting == Lighting::Dark {
            let torches = place_torches(&mut draft, catalog, boundary);
            draft.note(format!("torches={torches}"));
        }

        LayoutOutcome { draft, player_start: self.player_start }
    }
}

/// Cells on a ring of `ring_radius` around the room center, `count` evenly spaced.
fn ring_positions(center_x: f64, center_y: f64, ring_radius: f64, count: usize) -> Vec<Pos> {
    (0..count)
        .map(|index| {
            let angle = TAU * index as f64 / count as f64;
            Pos::new(
                (center_x + ring_radius * angle.cos()).round() as i32,
                (center_y + ring_radius * angle.sin()).round() as i32,
            )
        })
        .collect()
}

/// Evenly spaced cells on the rectangle two cells in from the grid edge.
fn inset_ring_positions(cols: usize, rows: usize, count: usize) -> Vec<Pos> {
    let Some(ring) = (cols > 4 && rows > 4).then(|| Rect::new(2, 2, cols - 4, rows - 4)) else {
        return Vec::new();
    };
    let perimeter: Vec<Pos> = ring
        .cells()
        .filter(|pos| {
            pos.x as usize == ring.x
                || pos.y as usize == ring.y
                || pos.x as usize == ring.right()
                || pos.y as usize == ring.bottom()
        })
        .collect();
    let mut ordered = perimeter.clone();
    // Walk the ring clockwise so even spacing spreads around all four sides.
    ordered.sort_by_key(|pos| {
        let (x, y) = (pos.x as usize, pos.y as usize);
        if y == ring.y {
            (0, x as i64)
        } else if x == ring.right() {
            (1, y as i64)
        } else if y == ring.bottom() {
            (2, -(x as i64))
        } else {
            (3, -(y as i64))
        }
    });
    if count == 0 || ordered.is_empty() {
        return Vec::new();
    }
    let step = ordered.len() as f64 / count as f64;
    let mut picked: Vec<Pos> =
        (0..count).filter_map(|index| ordered.get((index as f64 * step) as usize).copied()).collect();
    picked.dedup();
    picked
}

fn place_columns(draft: &mut GridDraft, catalog: &Catalog, positions: Vec<Pos>) -> usize {
    if positions.is_empty() {
        return 0;
    }
    let column = catalog
        .obstacle("column-stone")
        .or_else(|| catalog.obstacles_in(THEME, ObstacleCategory::Structure).into_iter().next());
    let Some(column) = column else {
        warn!("no column obstacle in catalog");
        draft.note("no column type available; columns skipped");
        return 0;
    };
    positions
        .into_iter()
        .filter(|&pos| place_obstacle(draft, column, Placement::at(pos)).is_ok())
        .count()
}

fn place_altar(draft: &mut GridDraft, catalog: &Catalog, player_start: Pos) {
    let altar = catalog
        .obstacle("altar-stone")
        .or_else(|| catalog.obstacles_in(THEME, ObstacleCategory::Religious).into_iter().next());
    let Some(altar) = altar else {
        warn!("no altar obstacle in catalog");
        draft.note("no altar type available; altar skipped");
        return;
    };

    let center = draft.size().center();
    let mut candidates = draft.playable_cells();
    candidates.retain(|pos| pos.manhattan(player_start) > 1);
    candidates.sort_by(|left, right| {
        left.distance(center).total_cmp(&right.distance(center)).then(left.cmp(right))
    });
    for anchor in candidates.into_iter().take(12) {
        if place_obstacle(draft, altar, Placement::at(anchor)).is_ok() {
            let cells = draft.obstacles().last().map(|placed| placed.cells.clone()).unwrap_or_default();
            for cell in cells {
                draft.set_elevation(cell, ALTAR_ELEVATION);
            }
            draft.note(format!("altar at {anchor}"));
            return;
        }
    }
    draft.note("altar did not fit near the center");
}

/// Sconces on interior cells that touch a wall, each adding a light pool.
fn place_torches(draft: &mut GridDraft, catalog: &Catalog, boundary: &[Pos]) -> usize {
    let Some(torch) = catalog.decoration("torch-sconce") else {
        draft.note("no torch decoration available; room stays dark");
        return 0;
    };
    let boundary_set: BTreeSet<Pos> = boundary.iter().copied().collect();
    let candidates: Vec<Pos> = draft
        .playable_cells()
        .into_iter()
        .filter(|pos| !boundary_set.contains(pos))
        .filter(|pos| pos.neighbors4().iter().any(|neighbor| boundary_set.contains(neighbor)))
        .collect();
    if candidates.is_empty() {
        return 0;
    }

    let step = (candidates.len() / TORCH_LIMIT).max(1);
    let mut placed = 0;
    for pos in candidates.into_iter().step_by(step) {
        if placed >= TORCH_LIMIT {
            break;
        }
        if place_decoration(draft, torch, Placement::at(pos)).is_ok() {
            draft.add_light_source(pos, TORCH_RADIUS, TORCH_INTENSITY);
            placed += 1;
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_spec::RoomShape;
    use crate::types::{GridSize, LayoutId, SizeHint, TimeOfDay};

    fn spec(layout: LayoutId, grid: GridSize, params: DungeonParams) -> MapSpec {
        MapSpec {
            theme: Theme::Dungeon,
            layout,
            grid,
            size_hint: SizeHint::Medium,
            time_of_day: TimeOfDay::Unknown,
            params: LayoutParams::Dungeon(params),
        }
    }

    fn run(spec: &MapSpec, seed: u64) -> LayoutOutcome {
        let catalog = Catalog::builtin();
        let context = LayoutContext { catalog: &catalog, normalized_prompt: "" };
        let mut rng = SeededRng::new(seed);
        match spec.layout {
            LayoutId::DungeonSquareRoom => square_room(spec, &context, &mut rng),
            _ => circular_room(spec, &context, &mut rng),
        }
    }

    #[test]
    fn square_room_without_entrances_is_walled_on_the_border_only() {
        let grid = GridSize::new(10, 8);
        let params = DungeonParams { shape: RoomShape::Square, entrances: 0, ..DungeonParams::default() };
        let outcome = run(&spec(LayoutId::DungeonSquareRoom, grid, params), 4);

        let wall_cells: BTreeSet<Pos> =
            outcome.draft.walls().iter().flat_map(|wall| wall.cells.iter().copied()).collect();
        let border: BTreeSet<Pos> = grid.cells().filter(|&pos| grid.is_border(pos)).collect();
        assert_eq!(wall_cells, border);
    }

    #[test]
    fn square_room_openings_avoid_corners() {
        let grid = GridSize::new(9, 9);
        let params = DungeonParams { entrances: 4, ..DungeonParams::default() };
        for seed in 0..10 {
            let outcome = run(&spec(LayoutId::DungeonSquareRoom, grid, params.clone()), seed);
            for corner in [Pos::new(0, 0), Pos::new(8, 0), Pos::new(0, 8), Pos::new(8, 8)] {
                assert!(outcome.draft.is_occupied(corner), "corner {corner} left open");
            }
        }
    }

    #[test]
    fn circular_room_masks_corners_and_starts_inside() {
        let grid = GridSize::new(15, 15);
        let outcome = run(&spec(LayoutId::DungeonCircularRoom, grid, DungeonParams::default()), 9);
        let draft = &outcome.draft;
        assert!(!draft.is_playable(Pos::new(0, 0)));
        assert!(draft.is_playable(outcome.player_start));
        assert!(!draft.is_occupied(outcome.player_start));
        assert_eq!(draft.terrain_at(Pos::new(0, 0)), Some(TerrainKind::Void));
    }

    #[test]
    fn closed_doors_fill_openings() {
        let grid = GridSize::new(13, 13);
        let params = DungeonParams { entrances: 3, closed_doors: true, ..DungeonParams::default() };
        let outcome = run(&spec(LayoutId::DungeonCircularRoom, grid, params), 2);
        let doors = outcome.draft.walls().iter().filter(|wall| wall.door.is_some()).count();
        assert_eq!(doors, 3);
    }

    #[test]
    fn columns_and_altar_are_requested_props() {
        let grid = GridSize::new(17, 17);
        let params = DungeonParams { columns: 4, altar: true, ..DungeonParams::default() };
        let outcome = run(&spec(LayoutId::DungeonCircularRoom, grid, params), 21);
        let draft = &outcome.draft;
        let columns = draft.obstacles().iter().filter(|o| o.type_id == "column-stone").count();
        assert_eq!(columns, 4);
        let altar = draft.obstacles().iter().find(|o| o.type_id == "altar-stone").unwrap();
        assert_eq!(draft.elevation_at(altar.anchor), Some(ALTAR_ELEVATION));
    }

    #[test]
    fn dark_rooms_get_torches() {
        let grid = GridSize::new(13, 11);
        let params = DungeonParams { lighting: Lighting::Dark, ..DungeonParams::default() };
        let outcome = run(&spec(LayoutId::DungeonSquareRoom, grid, params), 6);
        assert!(outcome.draft.decorations().iter().any(|d| d.type_id == "torch-sconce"));
    }

    #[test]
    fn inset_ring_spreads_positions() {
        let positions = inset_ring_positions(12, 12, 4);
        assert_eq!(positions.len(), 4);
        let unique: BTreeSet<Pos> = positions.iter().copied().collect();
        assert_eq!(unique.len(), 4);
    }
}
