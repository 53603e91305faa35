//! Mutable generation workspace: layered cell arrays, masks, occupancy, and
//! the generation log.

use std::collections::BTreeSet;

use tracing::trace;

use crate::types::{GridSize, Lighting, Pos, TerrainKind};

use super::model::{DecorInstance, ObstacleInstance, WallInstance};

/// Working state for one generation run. Only layout modules and the
/// placement primitives mutate it; spawn allocation and result assembly read it.
#[derive(Clone, Debug)]
pub struct GridDraft {
    size: GridSize,
    terrain: Vec<TerrainKind>,
    elevation: Vec<i32>,
    light: Vec<f32>,
    /// Empty means the whole grid is playable.
    playable: BTreeSet<Pos>,
    pub(super) occupied: BTreeSet<Pos>,
    pub(super) decor_occupied: BTreeSet<Pos>,
    pub(super) movement_blocked: BTreeSet<Pos>,
    reserved: BTreeSet<Pos>,
    pub(super) obstacles: Vec<ObstacleInstance>,
    pub(super) walls: Vec<WallInstance>,
    pub(super) decorations: Vec<DecorInstance>,
    pub(super) next_obstacle_id: u32,
    pub(super) next_wall_id: u32,
    pub(super) next_decor_id: u32,
    log: Vec<String>,
}

impl GridDraft {
    pub fn new(size: GridSize) -> Self {
        let cells = size.cell_count();
        Self {
            size,
            terrain: vec![TerrainKind::default(); cells],
            elevation: vec![0; cells],
            light: vec![1.0; cells],
            playable: BTreeSet::new(),
            occupied: BTreeSet::new(),
            decor_occupied: BTreeSet::new(),
            movement_blocked: BTreeSet::new(),
            reserved: BTreeSet::new(),
            obstacles: Vec::new(),
            walls: Vec::new(),
            decorations: Vec::new(),
            next_obstacle_id: 1,
            next_wall_id: 1,
            next_decor_id: 1,
            log: Vec::new(),
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        self.size.contains(pos)
    }

    pub fn is_playable(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && (self.playable.is_empty() || self.playable.contains(&pos))
    }

    pub fn playable_mask(&self) -> &BTreeSet<Pos> {
        &self.playable
    }

    pub fn set_playable_mask(&mut self, mask: BTreeSet<Pos>) {
        self.playable = mask.into_iter().filter(|pos| self.size.contains(*pos)).collect();
    }

    /// Every playable cell, in row-major order.
    pub fn playable_cells(&self) -> Vec<Pos> {
        if self.playable.is_empty() {
            self.size.cells().collect()
        } else {
            self.playable.iter().copied().collect()
        }
    }

    pub fn is_occupied(&self, pos: Pos) -> bool {
        self.occupied.contains(&pos) || self.decor_occupied.contains(&pos)
    }

    pub fn is_reserved(&self, pos: Pos) -> bool {
        self.reserved.contains(&pos)
    }

    pub fn is_movement_blocked(&self, pos: Pos) -> bool {
        self.movement_blocked.contains(&pos)
    }

    /// Playable, unoccupied, and not reserved.
    pub fn is_free(&self, pos: Pos) -> bool {
        self.is_playable(pos) && !self.is_occupied(pos) && !self.is_reserved(pos)
    }

    pub fn reserve(&mut self, pos: Pos) {
        if self.in_bounds(pos) {
            self.reserved.insert(pos);
        }
    }

    /// Reserves every in-bounds cell within Chebyshev `radius` of `center`.
    pub fn reserve_around(&mut self, center: Pos, radius: i32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                self.reserve(center.offset(dx, dy));
            }
        }
    }

    pub fn reserved_cells(&self) -> &BTreeSet<Pos> {
        &self.reserved
    }

    pub fn occupied_cells(&self) -> &BTreeSet<Pos> {
        &self.occupied
    }

    pub fn decoration_cells(&self) -> &BTreeSet<Pos> {
        &self.decor_occupied
    }

    pub fn movement_blocked_cells(&self) -> &BTreeSet<Pos> {
        &self.movement_blocked
    }

    pub fn obstacles(&self) -> &[ObstacleInstance] {
        &self.obstacles
    }

    pub fn walls(&self) -> &[WallInstance] {
        &self.walls
    }

    pub fn decorations(&self) -> &[DecorInstance] {
        &self.decorations
    }

    pub fn terrain_at(&self, pos: Pos) -> Option<TerrainKind> {
        self.size.index(pos).map(|index| self.terrain[index])
    }

    pub fn set_terrain(&mut self, pos: Pos, terrain: TerrainKind) {
        if let Some(index) = self.size.index(pos) {
            self.terrain[index] = terrain;
        }
    }

    pub fn fill_terrain(&mut self, terrain: TerrainKind) {
        self.terrain.fill(terrain);
    }

    pub fn elevation_at(&self, pos: Pos) -> Option<i32> {
        self.size.index(pos).map(|index| self.elevation[index])
    }

    pub fn set_elevation(&mut self, pos: Pos, elevation: i32) {
        if let Some(index) = self.size.index(pos) {
            self.elevation[index] = elevation;
        }
    }

    pub fn light_at(&self, pos: Pos) -> Option<f32> {
        self.size.index(pos).map(|index| self.light[index])
    }

    pub fn set_light(&mut self, pos: Pos, level: f32) {
        if let Some(index) = self.size.index(pos) {
            self.light[index] = level.clamp(0.0, 1.0);
        }
    }

    /// Applies the lighting tier's base level to playable cells and darkness
    /// to the rest.
    pub fn apply_lighting(&mut self, lighting: Lighting) {
        let base = lighting.base_level();
        for pos in self.size.cells() {
            let level = if self.is_playable(pos) { base } else { 0.0 };
            self.set_light(pos, level);
        }
    }

    /// Brightens cells within `radius` of `source`, fading linearly.
    pub fn add_light_source(&mut self, source: Pos, radius: f64, intensity: f32) {
        let reach = radius.ceil() as i32;
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let pos = source.offset(dx, dy);
                let distance = pos.distance(source);
                if distance > radius || !self.is_playable(pos) {
                    continue;
                }
                let falloff = (1.0 - distance / (radius + 1.0)) as f32;
                if let Some(current) = self.light_at(pos) {
                    self.set_light(pos, current + intensity * falloff);
                }
            }
        }
    }

    pub fn terrain(&self) -> &[TerrainKind] {
        &self.terrain
    }

    pub fn elevation(&self) -> &[i32] {
        &self.elevation
    }

    pub fn light(&self) -> &[f32] {
        &self.light
    }

    /// Appends a human-readable generation note.
    pub fn note(&mut self, message: impl Into<String>) {
        let message = message.into();
        trace!(note = %message, "generation note");
        self.log.push(message);
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub(super) fn into_log(self) -> Vec<String> {
        self.log
    }
}
