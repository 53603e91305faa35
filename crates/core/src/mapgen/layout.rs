//! Layout dispatch and the helpers shared by the layout modules: rectangles,
//! boundary extraction, opening selection, boundary walls, and prop scatter.

mod city;
mod dungeon;
mod forest;
mod generic;
mod manual;

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::catalog::{Catalog, ObstacleType, WallBehavior};
use crate::map_spec::MapSpec;
use crate::types::{DoorState, GridSize, LayoutId, Pos, Rotation, Theme};

use super::grid::GridDraft;
use super::placement::{Placement, place_obstacle, place_wall};
use super::seed::SeededRng;

pub use forest::VEGETATION_ATTEMPTS_PER_TREE;
pub(crate) use manual::manual_arena;
pub use manual::MANUAL_ATTEMPTS_PER_ITEM;

/// Chebyshev radius kept clear around the player start.
pub const PLAYER_RESERVE_RADIUS: i32 = 1;
/// Random tries granted per prop a scatter pass wants to place.
pub const SCATTER_ATTEMPTS_PER_PROP: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle with its top-left at `origin`; `None` when it would start off
    /// the grid or be empty.
    pub fn from_origin(origin: Pos, width: i32, height: i32) -> Option<Self> {
        Some(Self {
            x: usize::try_from(origin.x).ok()?,
            y: usize::try_from(origin.y).ok()?,
            width: usize::try_from(width).ok().filter(|&w| w > 0)?,
            height: usize::try_from(height).ok().filter(|&h| h > 0)?,
        })
    }

    pub fn covering(size: GridSize) -> Option<Self> {
        (size.cols > 0 && size.rows > 0).then(|| Self::new(0, 0, size.cols, size.rows))
    }

    pub fn right(self) -> usize {
        self.x + self.width - 1
    }

    pub fn bottom(self) -> usize {
        self.y + self.height - 1
    }

    pub fn area(self) -> usize {
        self.width * self.height
    }

    pub fn center(self) -> Pos {
        Pos::new((self.x + self.width / 2) as i32, (self.y + self.height / 2) as i32)
    }

    pub fn contains(self, pos: Pos) -> bool {
        let (Ok(px), Ok(py)) = (usize::try_from(pos.x), usize::try_from(pos.y)) else {
            return false;
        };
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    pub fn contains_rect(self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Cells in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Pos> {
        (self.y..=self.bottom())
            .flat_map(move |y| (self.x..=self.right()).map(move |x| Pos::new(x as i32, y as i32)))
    }
}

/// What every layout module hands back.
#[derive(Clone, Debug)]
pub struct LayoutOutcome {
    pub draft: GridDraft,
    pub player_start: Pos,
}

/// Read-only inputs shared by the layout modules.
#[derive(Clone, Copy, Debug)]
pub struct LayoutContext<'a> {
    pub catalog: &'a Catalog,
    pub normalized_prompt: &'a str,
}

/// Runs the layout module selected by `spec.layout`.
pub fn build_layout(
    spec: &MapSpec,
    context: &LayoutContext<'_>,
    rng: &mut SeededRng,
) -> LayoutOutcome {
    debug!(layout = %spec.layout, grid = %spec.grid, "building layout");
    match spec.layout {
        LayoutId::DungeonCircularRoom => dungeon::circular_room(spec, context, rng),
        LayoutId::DungeonSquareRoom => dungeon::square_room(spec, context, rng),
        LayoutId::ForestClearing => forest::clearing(spec, context, rng),
        LayoutId::CityStreet => city::street(spec, context, rng),
        LayoutId::GenericScatter => generic::scatter(spec, context, rng),
        LayoutId::ManualArena => {
            let mut outcome = generic::scatter(spec, context, rng);
            outcome.draft.note("manual_arena needs a manual config; used generic_scatter");
            outcome
        }
    }
}

/// Playable cells with at least one 4-neighbour that is off the grid or
/// outside the playable mask, in row-major order.
pub fn boundary_cells(draft: &GridDraft) -> Vec<Pos> {
    draft
        .playable_cells()
        .into_iter()
        .filter(|pos| pos.neighbors4().iter().any(|&neighbor| !draft.is_playable(neighbor)))
        .collect()
}

/// Picks up to `count` openings from `candidates`, spreading them at least
/// `min_separation` apart. A second pass drops the spacing rule when the
/// first cannot reach `count`. Result is sorted.
pub fn select_openings(
    rng: &mut SeededRng,
    candidates: &[Pos],
    count: usize,
    min_separation: f64,
) -> Vec<Pos> {
    if count == 0 || candidates.is_empty() {
        return Vec::new();
    }
    let mut shuffled = candidates.to_vec();
    rng.shuffle(&mut shuffled);

    let mut chosen: Vec<Pos> = Vec::with_capacity(count);
    for &candidate in &shuffled {
        if chosen.len() >= count {
            break;
        }
        if chosen.iter().all(|&picked| picked.distance(candidate) >= min_separation) {
            chosen.push(candidate);
        }
    }
    for &candidate in &shuffled {
        if chosen.len() >= count {
            break;
        }
        if !chosen.contains(&candidate) {
            chosen.push(candidate);
        }
    }
    chosen.sort();
    chosen
}

/// Spacing target for `count` openings along a boundary of `boundary_len` cells.
pub fn opening_separation(boundary_len: usize, count: usize) -> f64 {
    (boundary_len as f64 / (count.max(1) as f64 * 3.0)).max(2.0)
}

/// Places a solid wall on every boundary cell that is not an opening.
/// Returns the number of segments placed.
pub fn place_boundary_walls(
    draft: &mut GridDraft,
    catalog: &Catalog,
    theme: Theme,
    boundary: &[Pos],
    openings: &[Pos],
) -> usize {
    let Some(wall) = catalog.wall_for(WallBehavior::Solid, theme) else {
        warn!(%theme, "no solid wall type in catalog");
        draft.note("no solid wall type available; boundary walls skipped");
        return 0;
    };
    let openings: BTreeSet<Pos> = openings.iter().copied().collect();
    let mut placed = 0;
    for &pos in boundary {
        if openings.contains(&pos) {
            continue;
        }
        if place_wall(draft, wall, Placement::at(pos), None).is_ok() {
            placed += 1;
        }
    }
    placed
}

/// Hangs doors in `openings`, which are expected to be reserved.
pub fn place_doors(
    draft: &mut GridDraft,
    catalog: &Catalog,
    theme: Theme,
    openings: &[Pos],
    state: DoorState,
) -> usize {
    if openings.is_empty() {
        return 0;
    }
    let Some(door) = catalog.wall_for(WallBehavior::Door, theme) else {
        warn!(%theme, "no door type in catalog");
        draft.note("no door type available; openings left empty");
        return 0;
    };
    openings
        .iter()
        .filter(|&&pos| {
            place_wall(draft, door, Placement::at(pos).overriding_reserved(), Some(state)).is_ok()
        })
        .count()
}

pub fn reserve_player_area(draft: &mut GridDraft, start: Pos) {
    draft.reserve_around(start, PLAYER_RESERVE_RADIUS);
}

/// Free cell of `cells` closest to `target`, ties broken row-major.
pub fn nearest_free(draft: &GridDraft, cells: &[Pos], target: Pos) -> Option<Pos> {
    cells
        .iter()
        .copied()
        .filter(|&pos| draft.is_free(pos))
        .min_by(|left, right| {
            left.distance(target).total_cmp(&right.distance(target)).then(left.cmp(right))
        })
}

/// Weighted random props dropped on `cells`. Returns how many landed.
pub fn scatter_props(
    draft: &mut GridDraft,
    rng: &mut SeededRng,
    props: &[&ObstacleType],
    cells: &[Pos],
    target: usize,
) -> usize {
    if props.is_empty() || cells.is_empty() || target == 0 {
        return 0;
    }
    let mut placed = 0;
    for _ in 0..target * SCATTER_ATTEMPTS_PER_PROP {
        if placed >= target {
            break;
        }
        let Some(&prop) = rng.pick_weighted(props, |prop| f64::from(prop.spawn_weight)) else {
            break;
        };
        let Some(&anchor) = rng.pick(cells) else {
            break;
        };
        let rotation = random_rotation(rng);
        if place_obstacle(draft, prop, Placement::at(anchor).rotated(rotation)).is_ok() {
            placed += 1;
        }
    }
    placed
}

pub fn random_rotation(rng: &mut SeededRng) -> Rotation {
    Rotation::from_quarter_turns(rng.range_usize(0, 3) as u8)
}
