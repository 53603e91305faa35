use std::fmt;

use serde::{Deserialize, Serialize};

/// Smallest grid side accepted by the pipeline; smaller requests are clamped up.
pub const MIN_GRID_SIDE: usize = 3;
/// Largest grid side accepted by the pipeline; larger requests are clamped down.
pub const MAX_GRID_SIDE: usize = 128;

/// Grid coordinate. Ordering is row-major (`y` first) so ordered sets iterate
/// in reading order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }

    /// North, east, south, west.
    pub const fn neighbors4(self) -> [Pos; 4] {
        [
            Pos { y: self.y - 1, x: self.x },
            Pos { y: self.y, x: self.x + 1 },
            Pos { y: self.y + 1, x: self.x },
            Pos { y: self.y, x: self.x - 1 },
        ]
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn distance(self, other: Pos) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// `"x,y"` encoding used by result consumers.
    pub fn key(self) -> String {
        format!("{},{}", self.x, self.y)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub cols: usize,
    pub rows: usize,
}

impl GridSize {
    pub const fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    pub const fn cell_count(self) -> usize {
        self.cols * self.rows
    }

    pub fn contains(self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.cols && (pos.y as usize) < self.rows
    }

    pub fn index(self, pos: Pos) -> Option<usize> {
        self.contains(pos).then(|| (pos.y as usize) * self.cols + (pos.x as usize))
    }

    /// Returns the size clamped into the accepted range and whether clamping
    /// changed anything.
    pub fn clamped(self) -> (Self, bool) {
        let clamped = Self {
            cols: self.cols.clamp(MIN_GRID_SIDE, MAX_GRID_SIDE),
            rows: self.rows.clamp(MIN_GRID_SIDE, MAX_GRID_SIDE),
        };
        (clamped, clamped != self)
    }

    pub fn center(self) -> Pos {
        Pos { y: (self.rows / 2) as i32, x: (self.cols / 2) as i32 }
    }

    pub fn cells(self) -> impl Iterator<Item = Pos> {
        (0..self.rows).flat_map(move |y| (0..self.cols).map(move |x| Pos::new(x as i32, y as i32)))
    }

    pub fn is_border(self, pos: Pos) -> bool {
        self.contains(pos)
            && (pos.x == 0
                || pos.y == 0
                || pos.x as usize == self.cols - 1
                || pos.y as usize == self.rows - 1)
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

/// Quarter-turn rotation, serialized as degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    pub const fn degrees(self) -> u16 {
        match self {
            Self::R0 => 0,
            Self::R90 => 90,
            Self::R180 => 180,
            Self::R270 => 270,
        }
    }

    pub const fn quarter_turns(self) -> u8 {
        match self {
            Self::R0 => 0,
            Self::R90 => 1,
            Self::R180 => 2,
            Self::R270 => 3,
        }
    }

    pub const fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Self::R0,
            1 => Self::R90,
            2 => Self::R180,
            _ => Self::R270,
        }
    }

    pub const fn then(self, other: Rotation) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }

    /// True when the rotation swaps width and height.
    pub const fn is_sideways(self) -> bool {
        matches!(self, Self::R90 | Self::R270)
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Self::R0),
            90 => Ok(Self::R90),
            180 => Ok(Self::R180),
            270 => Ok(Self::R270),
            other => Err(format!("rotation must be 0, 90, 180 or 270 degrees, got {other}")),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Dungeon,
    Forest,
    City,
    #[default]
    Generic,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dungeon => "dungeon",
            Self::Forest => "forest",
            Self::City => "city",
            Self::Generic => "generic",
        }
    }

    pub const fn base_terrain(self) -> TerrainKind {
        match self {
            Self::Dungeon => TerrainKind::Stone,
            Self::Forest => TerrainKind::Grass,
            Self::City => TerrainKind::Pavement,
            Self::Generic => TerrainKind::Dirt,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Day,
    Night,
    #[default]
    Unknown,
}

impl TimeOfDay {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Night => "night",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lighting {
    #[default]
    Bright,
    Dim,
    Dark,
}

impl Lighting {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bright => "bright",
            Self::Dim => "dim",
            Self::Dark => "dark",
        }
    }

    pub const fn base_level(self) -> f32 {
        match self {
            Self::Bright => 1.0,
            Self::Dim => 0.6,
            Self::Dark => 0.3,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeHint {
    Small,
    #[default]
    Medium,
    Large,
}

impl SizeHint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Density {
    Sparse,
    #[default]
    Normal,
    Dense,
}

impl Density {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sparse => "sparse",
            Self::Normal => "normal",
            Self::Dense => "dense",
        }
    }

    /// Fraction of eligible cells that should receive a prop.
    pub const fn fill_ratio(self) -> f64 {
        match self {
            Self::Sparse => 0.2,
            Self::Normal => 0.35,
            Self::Dense => 0.55,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    #[default]
    Stone,
    Grass,
    Undergrowth,
    Dirt,
    Road,
    Pavement,
    Floorboards,
    Void,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorState {
    Open,
    Closed,
}

/// Layout generator selected for a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutId {
    DungeonCircularRoom,
    DungeonSquareRoom,
    ForestClearing,
    CityStreet,
    GenericScatter,
    ManualArena,
}

impl LayoutId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DungeonCircularRoom => "dungeon_circular_room",
            Self::DungeonSquareRoom => "dungeon_square_room",
            Self::ForestClearing => "forest_clearing",
            Self::CityStreet => "city_street",
            Self::GenericScatter => "generic_scatter",
            Self::ManualArena => "manual_arena",
        }
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_serializes_as_degrees_and_rejects_other_angles() {
        let json = serde_json::to_string(&Rotation::R270).unwrap();
        assert_eq!(json, "270");
        assert_eq!(serde_json::from_str::<Rotation>("90").unwrap(), Rotation::R90);
        assert!(serde_json::from_str::<Rotation>("45").is_err());
    }

    #[test]
    fn rotation_composition_wraps_after_full_turn() {
        assert_eq!(Rotation::R270.then(Rotation::R180), Rotation::R90);
        assert_eq!(Rotation::R90.then(Rotation::R270), Rotation::R0);
    }

    #[test]
    fn pos_ordering_is_row_major() {
        let mut cells = vec![Pos::new(3, 0), Pos::new(0, 1), Pos::new(1, 0)];
        cells.sort();
        assert_eq!(cells, vec![Pos::new(1, 0), Pos::new(3, 0), Pos::new(0, 1)]);
        assert_eq!(Pos::new(4, 7).key(), "4,7");
    }

    #[test]
    fn grid_clamping_reports_changes() {
        assert_eq!(GridSize::new(12, 8).clamped(), (GridSize::new(12, 8), false));
        assert_eq!(GridSize::new(0, 500).clamped(), (GridSize::new(3, 128), true));
    }
}
