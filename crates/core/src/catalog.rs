//! Catalog of placeable types: obstacles, walls, decorations, enemies, and
//! map patterns.
//!
//! Catalogs are plain immutable data handed to the generator by reference.
//! Each category has a fixed core schema plus an `extensions` map for
//! free-form fields that the pipeline carries but never interprets.

mod builtin;
mod pattern;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CatalogError;
use crate::types::{DoorState, Pos, Rotation, Theme};

pub use pattern::{
    ElementKind, MapPattern, PatternAnchor, PatternConstraints, PatternElement, PatternVariant,
};

pub type Extensions = BTreeMap<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

/// One footprint shape of a type. An empty cell list is the anchor cell alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootprintVariant {
    pub id: String,
    #[serde(default)]
    pub cells: Vec<Offset>,
}

impl FootprintVariant {
    pub fn single(id: &str) -> Self {
        Self { id: id.to_string(), cells: Vec::new() }
    }

    pub fn shaped(id: &str, cells: &[(i32, i32)]) -> Self {
        Self { id: id.to_string(), cells: cells.iter().map(|&(dx, dy)| Offset::new(dx, dy)).collect() }
    }

    pub fn cells_at(&self, anchor: Pos, rotation: Rotation) -> Vec<Pos> {
        rotate_offsets(&self.cells, rotation)
            .into_iter()
            .map(|offset| anchor.offset(offset.dx, offset.dy))
            .collect()
    }
}

/// Rotates footprint offsets clockwise and shifts the result so its bounding
/// box keeps the same top-left corner as the unrotated shape.
pub fn rotate_offsets(cells: &[Offset], rotation: Rotation) -> Vec<Offset> {
    if cells.is_empty() {
        return vec![Offset::new(0, 0)];
    }

    let mut rotated: Vec<Offset> = cells.to_vec();
    for _ in 0..rotation.quarter_turns() {
        for offset in &mut rotated {
            *offset = Offset::new(-offset.dy, offset.dx);
        }
    }

    let (origin_dx, origin_dy) = bounding_min(cells);
    let (rotated_dx, rotated_dy) = bounding_min(&rotated);
    let shift_dx = origin_dx - rotated_dx;
    let shift_dy = origin_dy - rotated_dy;
    rotated.iter().map(|offset| Offset::new(offset.dx + shift_dx, offset.dy + shift_dy)).collect()
}

fn bounding_min(cells: &[Offset]) -> (i32, i32) {
    let min_dx = cells.iter().map(|offset| offset.dx).min().unwrap_or(0);
    let min_dy = cells.iter().map(|offset| offset.dy).min().unwrap_or(0);
    (min_dx, min_dy)
}

/// The catalog's pure footprint function: which cells an instance covers.
pub trait Footprint {
    fn type_id(&self) -> &str;

    /// Resolves the variant id, defaulting to the first declared variant.
    fn resolve_variant(&self, variant: Option<&str>) -> Option<&str>;

    /// Cells covered when anchored at `anchor`, or `None` for an unknown variant.
    fn occupied_cells(&self, variant: Option<&str>, anchor: Pos, rotation: Rotation)
    -> Option<Vec<Pos>>;
}

fn find_variant<'a>(
    variants: &'a [FootprintVariant],
    variant: Option<&str>,
) -> Option<&'a FootprintVariant> {
    match variant {
        Some(id) => variants.iter().find(|candidate| candidate.id == id),
        None => variants.first(),
    }
}

fn theme_allows(themes: &[Theme], theme: Theme) -> bool {
    themes.is_empty() || themes.contains(&theme)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleCategory {
    Nature,
    Furniture,
    Container,
    Structure,
    Religious,
    Urban,
    Debris,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleType {
    pub id: String,
    pub label: String,
    pub category: ObstacleCategory,
    #[serde(default = "default_true")]
    pub blocks_movement: bool,
    #[serde(default)]
    pub blocks_vision: bool,
    pub durability: u32,
    /// Relative weight for random scatter; zero keeps the type out of scatters.
    #[serde(default = "default_weight")]
    pub spawn_weight: u32,
    #[serde(default)]
    pub themes: Vec<Theme>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub variants: Vec<FootprintVariant>,
    #[serde(default)]
    pub extensions: Extensions,
}

impl ObstacleType {
    pub fn new(id: &str, label: &str, category: ObstacleCategory, durability: u32) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            category,
            blocks_movement: true,
            blocks_vision: false,
            durability,
            spawn_weight: 1,
            themes: Vec::new(),
            tags: Vec::new(),
            variants: vec![FootprintVariant::single("default")],
            extensions: Extensions::new(),
        }
    }

    pub fn passable(mut self) -> Self {
        self.blocks_movement = false;
        self
    }

    pub fn opaque(mut self) -> Self {
        self.blocks_vision = true;
        self
    }

    pub fn weight(mut self, spawn_weight: u32) -> Self {
        self.spawn_weight = spawn_weight;
        self
    }

    pub fn themes(mut self, themes: &[Theme]) -> Self {
        self.themes = themes.to_vec();
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|tag| (*tag).to_string()).collect();
        self
    }

    pub fn variants(mut self, variants: Vec<FootprintVariant>) -> Self {
        self.variants = variants;
        self
    }

    pub fn allows_theme(&self, theme: Theme) -> bool {
        theme_allows(&self.themes, theme)
    }

    pub fn is_multi_cell(&self) -> bool {
        self.variants.iter().any(|variant| variant.cells.len() > 1)
    }
}

impl Footprint for ObstacleType {
    fn type_id(&self) -> &str {
        &self.id
    }

    fn resolve_variant(&self, variant: Option<&str>) -> Option<&str> {
        find_variant(&self.variants, variant).map(|found| found.id.as_str())
    }

    fn occupied_cells(
        &self,
        variant: Option<&str>,
        anchor: Pos,
        rotation: Rotation,
    ) -> Option<Vec<Pos>> {
        find_variant(&self.variants, variant).map(|found| found.cells_at(anchor, rotation))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallBehavior {
    Solid,
    Door,
    Window,
    Breakable,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallType {
    pub id: String,
    pub label: String,
    pub behavior: WallBehavior,
    /// Texture key handed to the renderer.
    pub appearance: String,
    #[serde(default)]
    pub themes: Vec<Theme>,
    pub variants: Vec<FootprintVariant>,
    #[serde(default)]
    pub extensions: Extensions,
}

impl WallType {
    pub fn new(id: &str, label: &str, behavior: WallBehavior, appearance: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            behavior,
            appearance: appearance.to_string(),
            themes: Vec::new(),
            variants: vec![FootprintVariant::single("segment")],
            extensions: Extensions::new(),
        }
    }

    pub fn themes(mut self, themes: &[Theme]) -> Self {
        self.themes = themes.to_vec();
        self
    }

    pub fn allows_theme(&self, theme: Theme) -> bool {
        theme_allows(&self.themes, theme)
    }

    /// Open doors are the only wall segments that can be walked through.
    pub fn blocks_movement(&self, door: Option<DoorState>) -> bool {
        match self.behavior {
            WallBehavior::Door => door != Some(DoorState::Open),
            WallBehavior::Solid | WallBehavior::Window | WallBehavior::Breakable => true,
        }
    }
}

impl Footprint for WallType {
    fn type_id(&self) -> &str {
        &self.id
    }

    fn resolve_variant(&self, variant: Option<&str>) -> Option<&str> {
        find_variant(&self.variants, variant).map(|found| found.id.as_str())
    }

    fn occupied_cells(
        &self,
        variant: Option<&str>,
        anchor: Pos,
        rotation: Rotation,
    ) -> Option<Vec<Pos>> {
        find_variant(&self.variants, variant).map(|found| found.cells_at(anchor, rotation))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecorationType {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub themes: Vec<Theme>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub extensions: Extensions,
}

impl DecorationType {
    pub fn new(id: &str, label: &str, themes: &[Theme]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            themes: themes.to_vec(),
            tags: Vec::new(),
            extensions: Extensions::new(),
        }
    }

    pub fn allows_theme(&self, theme: Theme) -> bool {
        theme_allows(&self.themes, theme)
    }
}

impl Footprint for DecorationType {
    fn type_id(&self) -> &str {
        &self.id
    }

    fn resolve_variant(&self, _variant: Option<&str>) -> Option<&str> {
        Some("default")
    }

    fn occupied_cells(
        &self,
        _variant: Option<&str>,
        anchor: Pos,
        _rotation: Rotation,
    ) -> Option<Vec<Pos>> {
        Some(vec![anchor])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub max_hp: u32,
    pub armor_class: u32,
    pub speed: u32,
    pub attack_bonus: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyType {
    pub id: String,
    pub label: String,
    pub stats: EnemyStats,
    #[serde(default)]
    pub themes: Vec<Theme>,
    #[serde(default)]
    pub extensions: Extensions,
}

fn default_true() -> bool {
    true
}

fn default_weight() -> u32 {
    1
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub obstacles: Vec<ObstacleType>,
    #[serde(default)]
    pub walls: Vec<WallType>,
    #[serde(default)]
    pub decorations: Vec<DecorationType>,
    #[serde(default)]
    pub enemies: Vec<EnemyType>,
    #[serde(default)]
    pub patterns: Vec<MapPattern>,
}

impl Catalog {
    /// Sample catalog covering every theme, used by the CLI and tests.
    pub fn builtin() -> Self {
        builtin::catalog()
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        check_unique("obstacle", self.obstacles.iter().map(|entry| entry.id.as_str()))?;
        check_unique("wall", self.walls.iter().map(|entry| entry.id.as_str()))?;
        check_unique("decoration", self.decorations.iter().map(|entry| entry.id.as_str()))?;
        check_unique("enemy", self.enemies.iter().map(|entry| entry.id.as_str()))?;
        check_unique("pattern", self.patterns.iter().map(|entry| entry.id.as_str()))?;

        for obstacle in &self.obstacles {
            if obstacle.variants.is_empty() {
                return Err(CatalogError::NoVariants { kind: "obstacle", id: obstacle.id.clone() });
            }
        }
        for wall in &self.walls {
            if wall.variants.is_empty() {
                return Err(CatalogError::NoVariants { kind: "wall", id: wall.id.clone() });
            }
        }

        for pattern in &self.patterns {
            if pattern.width == 0 || pattern.height == 0 || pattern.elements.is_empty() {
                return Err(CatalogError::EmptyPattern { pattern: pattern.id.clone() });
            }
            for element in pattern.all_elements() {
                let known = match element.kind {
                    ElementKind::Obstacle => self.obstacle(&element.type_id).is_some(),
                    ElementKind::Wall => self.wall(&element.type_id).is_some(),
                    ElementKind::Decoration => self.decoration(&element.type_id).is_some(),
                };
                if !known {
                    return Err(CatalogError::UnknownElementType {
                        pattern: pattern.id.clone(),
                        kind: element.kind.as_str(),
                        type_id: element.type_id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn obstacle(&self, id: &str) -> Option<&ObstacleType> {
        self.obstacles.iter().find(|entry| entry.id == id)
    }

    pub fn wall(&self, id: &str) -> Option<&WallType> {
        self.walls.iter().find(|entry| entry.id == id)
    }

    pub fn decoration(&self, id: &str) -> Option<&DecorationType> {
        self.decorations.iter().find(|entry| entry.id == id)
    }

    pub fn pattern(&self, id: &str) -> Option<&MapPattern> {
        self.patterns.iter().find(|entry| entry.id == id)
    }

    /// Obstacles eligible for random scatter in `theme`.
    pub fn scatter_obstacles(&self, theme: Theme) -> Vec<&ObstacleType> {
        self.obstacles
            .iter()
            .filter(|entry| entry.spawn_weight > 0 && entry.allows_theme(theme))
            .collect()
    }

    pub fn obstacles_in(&self, theme: Theme, category: ObstacleCategory) -> Vec<&ObstacleType> {
        self.obstacles
            .iter()
            .filter(|entry| entry.category == category && entry.allows_theme(theme))
            .collect()
    }

    /// First wall with `behavior`, preferring one themed for `theme`.
    pub fn wall_for(&self, behavior: WallBehavior, theme: Theme) -> Option<&WallType> {
        let candidates = || self.walls.iter().filter(move |entry| entry.behavior == behavior);
        candidates()
            .find(|entry| entry.themes.contains(&theme))
            .or_else(|| candidates().find(|entry| entry.allows_theme(theme)))
            .or_else(|| candidates().next())
    }

    pub fn decorations_for(&self, theme: Theme) -> Vec<&DecorationType> {
        self.decorations.iter().filter(|entry| entry.allows_theme(theme)).collect()
    }

    pub fn patterns_for(&self, theme: Theme) -> Vec<&MapPattern> {
        self.patterns.iter().filter(|entry| entry.allows_theme(theme)).collect()
    }
}

fn check_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId { kind, id: id.to_string() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_keeps_footprint_top_left_at_anchor() {
        let table = FootprintVariant::shaped("long", &[(0, 0), (1, 0)]);
        let anchor = Pos::new(4, 4);

        assert_eq!(table.cells_at(anchor, Rotation::R0), vec![Pos::new(4, 4), Pos::new(5, 4)]);
        assert_eq!(table.cells_at(anchor, Rotation::R90), vec![Pos::new(4, 4), Pos::new(4, 5)]);
        let mut half_turn = table.cells_at(anchor, Rotation::R180);
        half_turn.sort();
        assert_eq!(half_turn, vec![Pos::new(4, 4), Pos::new(5, 4)]);
    }

    #[test]
    fn l_shaped_footprint_turns_clockwise() {
        let shape = FootprintVariant::shaped("ell", &[(0, 0), (0, 1), (1, 1)]);
        let mut cells = shape.cells_at(Pos::new(0, 0), Rotation::R90);
        cells.sort();
        assert_eq!(cells, vec![Pos::new(0, 0), Pos::new(1, 0), Pos::new(0, 1)]);
    }

    #[test]
    fn unknown_variant_has_no_footprint() {
        let catalog = Catalog::builtin();
        let barrel = catalog.obstacle("barrel-wood").unwrap();
        assert!(barrel.occupied_cells(Some("missing"), Pos::new(1, 1), Rotation::R0).is_none());
        assert_eq!(
            barrel.occupied_cells(None, Pos::new(1, 1), Rotation::R90),
            Some(vec![Pos::new(1, 1)])
        );
    }

    #[test]
    fn only_closed_doors_block_among_doors() {
        let catalog = Catalog::builtin();
        let door = catalog.wall_for(WallBehavior::Door, Theme::Dungeon).unwrap();
        assert!(door.blocks_movement(Some(DoorState::Closed)));
        assert!(!door.blocks_movement(Some(DoorState::Open)));
        let stone = catalog.wall_for(WallBehavior::Solid, Theme::Dungeon).unwrap();
        assert!(stone.blocks_movement(None));
    }

    #[test]
    fn builtin_catalog_validates_and_survives_json() {
        let catalog = Catalog::builtin();
        catalog.validate().unwrap();

        let json = serde_json::to_string(&catalog).unwrap();
        let reloaded = Catalog::from_json_str(&json).unwrap();
        assert_eq!(reloaded, catalog);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{
            "obstacles": [
                {"id": "crate", "label": "Crate", "category": "container", "durability": 5,
                 "variants": [{"id": "default"}]},
                {"id": "crate", "label": "Crate again", "category": "container", "durability": 5,
                 "variants": [{"id": "default"}]}
            ]
        }"#;
        let error = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(error, CatalogError::DuplicateId { kind: "obstacle", .. }));
    }

    #[test]
    fn pattern_with_unknown_element_is_rejected() {
        let json = r#"{
            "patterns": [
                {"id": "lonely", "label": "Lonely", "width": 1, "height": 1,
                 "elements": [{"kind": "obstacle", "type_id": "ghost", "dx": 0, "dy": 0}]}
            ]
        }"#;
        let error = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(error, CatalogError::UnknownElementType { .. }));
    }

    #[test]
    fn extension_fields_are_carried_through() {
        let json = r#"{
            "decorations": [
                {"id": "banner", "label": "Banner", "extensions": {"sprite": "banner_red", "frames": 4}}
            ]
        }"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        let banner = catalog.decoration("banner").unwrap();
        assert_eq!(banner.extensions.get("frames"), Some(&Value::from(4)));
        assert!(banner.allows_theme(Theme::Forest));
    }
}
