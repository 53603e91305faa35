//! Public data models for placed entities, spawns, and generated maps.

use std::hash::Hasher;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

use crate::types::{DoorState, GridSize, LayoutId, Pos, Rotation, TerrainKind, Theme};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleInstance {
    pub id: String,
    pub type_id: String,
    pub variant_id: String,
    pub anchor: Pos,
    pub rotation: Rotation,
    pub durability: u32,
    pub max_durability: u32,
    pub cells: Vec<Pos>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallInstance {
    pub id: String,
    pub type_id: String,
    pub variant_id: String,
    pub anchor: Pos,
    pub rotation: Rotation,
    pub door: Option<DoorState>,
    pub cells: Vec<Pos>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorInstance {
    pub id: String,
    pub type_id: String,
    pub anchor: Pos,
    pub rotation: Rotation,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub enemy_type: String,
    pub pos: Pos,
}

/// Advisory grid size; never applied to the current request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRecommendation {
    pub cols: usize,
    pub rows: usize,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapBuildResult {
    pub summary: Vec<String>,
    pub log: Vec<String>,
    pub grid: GridSize,
    pub theme: Theme,
    pub layout: LayoutId,
    pub player_start: Pos,
    pub spawns: Vec<EnemySpawn>,
    /// Playable cells as `"x,y"` strings, row-major.
    pub playable_cells: Vec<String>,
    pub obstacles: Vec<ObstacleInstance>,
    pub walls: Vec<WallInstance>,
    pub decorations: Vec<DecorInstance>,
    pub terrain: Vec<TerrainKind>,
    pub elevation: Vec<i32>,
    pub light: Vec<f32>,
    pub recommendation: Option<GridRecommendation>,
}

impl MapBuildResult {
    /// Stable hash of everything the result carries, for determinism checks.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh3::new();
        for line in self.summary.iter().chain(&self.log) {
            hasher.write(line.as_bytes());
            hasher.write_u8(0);
        }
        hasher.write_usize(self.grid.cols);
        hasher.write_usize(self.grid.rows);
        hasher.write(self.theme.as_str().as_bytes());
        hasher.write(self.layout.as_str().as_bytes());
        write_pos(&mut hasher, self.player_start);

        hasher.write_usize(self.spawns.len());
        for spawn in &self.spawns {
            hasher.write(spawn.enemy_type.as_bytes());
            write_pos(&mut hasher, spawn.pos);
        }
        for cell in &self.playable_cells {
            hasher.write(cell.as_bytes());
            hasher.write_u8(0);
        }

        hasher.write_usize(self.obstacles.len());
        for obstacle in &self.obstacles {
            hasher.write(obstacle.type_id.as_bytes());
            hasher.write(obstacle.variant_id.as_bytes());
            write_pos(&mut hasher, obstacle.anchor);
            hasher.write_u16(obstacle.rotation.degrees());
            hasher.write_u32(obstacle.durability);
        }
        hasher.write_usize(self.walls.len());
        for wall in &self.walls {
            hasher.write(wall.type_id.as_bytes());
            write_pos(&mut hasher, wall.anchor);
            hasher.write_u16(wall.rotation.degrees());
            hasher.write_u8(match wall.door {
                None => 0,
                Some(DoorState::Open) => 1,
                Some(DoorState::Closed) => 2,
            });
        }
        hasher.write_usize(self.decorations.len());
        for decoration in &self.decorations {
            hasher.write(decoration.type_id.as_bytes());
            write_pos(&mut hasher, decoration.anchor);
        }

        for terrain in &self.terrain {
            hasher.write_u8(*terrain as u8);
        }
        for &elevation in &self.elevation {
            hasher.write_i32(elevation);
        }
        for level in &self.light {
            hasher.write_u32(level.to_bits());
        }
        if let Some(recommendation) = &self.recommendation {
            hasher.write_usize(recommendation.cols);
            hasher.write_usize(recommendation.rows);
        }
        hasher.finish()
    }

    /// Every cell covered by an obstacle, wall, or decoration.
    pub fn covered_cells(&self) -> Vec<Pos> {
        let mut cells: Vec<Pos> = self
            .obstacles
            .iter()
            .flat_map(|obstacle| obstacle.cells.iter().copied())
            .chain(self.walls.iter().flat_map(|wall| wall.cells.iter().copied()))
            .chain(self.decorations.iter().map(|decoration| decoration.anchor))
            .collect();
        cells.sort();
        cells
    }

    pub fn terrain_at(&self, pos: Pos) -> Option<TerrainKind> {
        self.grid.index(pos).map(|index| self.terrain[index])
    }

    pub fn count_obstacles(&self, type_id: &str) -> usize {
        self.obstacles.iter().filter(|obstacle| obstacle.type_id == type_id).count()
    }
}

fn write_pos(hasher: &mut Xxh3, pos: Pos) {
    hasher.write_i32(pos.x);
    hasher.write_i32(pos.y);
}
