//! Structured generation request produced by the prompt interpreter and
//! consumed once by a layout module.

use serde::{Deserialize, Serialize};

use crate::types::{Density, GridSize, LayoutId, Lighting, SizeHint, Theme, TimeOfDay};

/// Highest entrance count a room layout will try to open.
pub const MAX_ENTRANCES: u8 = 8;
/// Highest column count a dungeon room will try to raise.
pub const MAX_COLUMNS: u8 = 12;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapSpec {
    pub theme: Theme,
    pub layout: LayoutId,
    pub grid: GridSize,
    pub size_hint: SizeHint,
    pub time_of_day: TimeOfDay,
    pub params: LayoutParams,
}

impl MapSpec {
    pub fn lighting(&self) -> Lighting {
        match &self.params {
            LayoutParams::Dungeon(params) => params.lighting,
            LayoutParams::Forest(params) => params.lighting,
            LayoutParams::City(params) => params.lighting,
            LayoutParams::Generic(params) => params.lighting,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutParams {
    Dungeon(DungeonParams),
    Forest(ForestParams),
    City(CityParams),
    Generic(GenericParams),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomShape {
    #[default]
    Circular,
    Square,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DungeonParams {
    pub shape: RoomShape,
    /// Room radius in cells; `None` fills the grid.
    pub radius: Option<f64>,
    pub entrances: u8,
    pub columns: u8,
    pub altar: bool,
    pub closed_doors: bool,
    pub lighting: Lighting,
}

impl Default for DungeonParams {
    fn default() -> Self {
        Self {
            shape: RoomShape::Circular,
            radius: None,
            entrances: 2,
            columns: 0,
            altar: false,
            closed_doors: false,
            lighting: Lighting::Bright,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    /// Radius of the open clearing; `None` derives it from the grid.
    pub clearing_radius: Option<f64>,
    pub density: Density,
    pub lighting: Lighting,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreetOrientation {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityParams {
    pub orientation: StreetOrientation,
    pub street_width: usize,
    /// Depth of each building band; `None` uses everything beside the road.
    pub building_depth: Option<usize>,
    pub lighting: Lighting,
}

impl Default for CityParams {
    fn default() -> Self {
        Self {
            orientation: StreetOrientation::Horizontal,
            street_width: 3,
            building_depth: None,
            lighting: Lighting::Bright,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericParams {
    pub lighting: Lighting,
}
