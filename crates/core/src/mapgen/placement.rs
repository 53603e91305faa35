//! Atomic, collision-checked placement of single obstacles, walls, and
//! decorations onto a draft.
//!
//! Each primitive resolves the instance footprint through the catalog, runs
//! every check, and only then commits. A rejected call leaves the draft exactly
//! as it was.

use crate::catalog::{DecorationType, Footprint, ObstacleType, WallType};
use crate::error::PlacementError;
use crate::types::{DoorState, Pos, Rotation};

use super::grid::GridDraft;
use super::model::{DecorInstance, ObstacleInstance, WallInstance};

/// Where and how to place one instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement<'a> {
    pub anchor: Pos,
    pub variant: Option<&'a str>,
    pub rotation: Rotation,
    /// Allows committing onto reserved cells (doors in openings, for example).
    pub override_reserved: bool,
}

impl<'a> Placement<'a> {
    pub const fn at(anchor: Pos) -> Self {
        Self { anchor, variant: None, rotation: Rotation::R0, override_reserved: false }
    }

    pub const fn rotated(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub const fn variant(mut self, variant: Option<&'a str>) -> Self {
        self.variant = variant;
        self
    }

    pub const fn overriding_reserved(mut self) -> Self {
        self.override_reserved = true;
        self
    }
}

/// Resolves the footprint and runs every placement check without committing.
pub fn validate_footprint<F: Footprint + ?Sized>(
    draft: &GridDraft,
    kind: &F,
    placement: &Placement<'_>,
) -> Result<Vec<Pos>, PlacementError> {
    let cells = kind
        .occupied_cells(placement.variant, placement.anchor, placement.rotation)
        .ok_or_else(|| PlacementError::UnknownVariant {
            type_id: kind.type_id().to_string(),
            variant: placement.variant.unwrap_or_default().to_string(),
        })?;
    check_cells(draft, &cells, placement.override_reserved)?;
    Ok(cells)
}

/// Bounds, playable mask, reservation, and occupancy checks, in that order.
pub fn check_cells(
    draft: &GridDraft,
    cells: &[Pos],
    override_reserved: bool,
) -> Result<(), PlacementError> {
    for &pos in cells {
        if !draft.in_bounds(pos) {
            return Err(PlacementError::OutOfBounds(pos));
        }
        if !draft.is_playable(pos) {
            return Err(PlacementError::OutsidePlayable(pos));
        }
        if !override_reserved && draft.is_reserved(pos) {
            return Err(PlacementError::Reserved(pos));
        }
        if draft.is_occupied(pos) {
            return Err(PlacementError::Occupied(pos));
        }
    }
    Ok(())
}

pub fn place_obstacle(
    draft: &mut GridDraft,
    obstacle: &ObstacleType,
    placement: Placement<'_>,
) -> Result<(), PlacementError> {
    let cells = validate_footprint(draft, obstacle, &placement)?;
    let variant_id = obstacle.resolve_variant(placement.variant).unwrap_or_default().to_string();

    commit_cells(draft, &cells, obstacle.blocks_movement);
    let id = format!("obstacle-{}", draft.next_obstacle_id);
    draft.next_obstacle_id += 1;
    draft.obstacles.push(ObstacleInstance {
        id,
        type_id: obstacle.id.clone(),
        variant_id,
        anchor: placement.anchor,
        rotation: placement.rotation,
        durability: obstacle.durability,
        max_durability: obstacle.durability,
        cells,
    });
    Ok(())
}

pub fn place_wall(
    draft: &mut GridDraft,
    wall: &WallType,
    placement: Placement<'_>,
    door: Option<DoorState>,
) -> Result<(), PlacementError> {
    let cells = validate_footprint(draft, wall, &placement)?;
    let variant_id = wall.resolve_variant(placement.variant).unwrap_or_default().to_string();

    commit_cells(draft, &cells, wall.blocks_movement(door));
    let id = format!("wall-{}", draft.next_wall_id);
    draft.next_wall_id += 1;
    draft.walls.push(WallInstance {
        id,
        type_id: wall.id.clone(),
        variant_id,
        anchor: placement.anchor,
        rotation: placement.rotation,
        door,
        cells,
    });
    Ok(())
}

pub fn place_decoration(
    draft: &mut GridDraft,
    decoration: &DecorationType,
    placement: Placement<'_>,
) -> Result<(), PlacementError> {
    let cells = validate_footprint(draft, decoration, &placement)?;

    draft.decor_occupied.extend(cells.iter().copied());
    let id = format!("decor-{}", draft.next_decor_id);
    draft.next_decor_id += 1;
    draft.decorations.push(DecorInstance {
        id,
        type_id: decoration.id.clone(),
        anchor: placement.anchor,
        rotation: placement.rotation,
    });
    Ok(())
}

fn commit_cells(draft: &mut GridDraft, cells: &[Pos], blocks_movement: bool) {
    draft.occupied.extend(cells.iter().copied());
    if blocks_movement {
        draft.movement_blocked.extend(cells.iter().copied());
    }
}
