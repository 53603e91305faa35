//! Read-only map pattern templates ("stamps").

use std::iter;

use serde::{Deserialize, Serialize};

use crate::prompt::normalize_prompt;
use crate::types::{DoorState, Rotation, Theme};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternAnchor {
    #[default]
    TopLeft,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Obstacle,
    Wall,
    Decoration,
}

impl ElementKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Obstacle => "obstacle",
            Self::Wall => "wall",
            Self::Decoration => "decoration",
        }
    }
}

/// One typed entity at an offset from the pattern's top-left corner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternElement {
    pub kind: ElementKind,
    pub type_id: String,
    pub dx: i32,
    pub dy: i32,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub door: Option<DoorState>,
}

impl PatternElement {
    pub fn obstacle(type_id: &str, dx: i32, dy: i32) -> Self {
        Self::new(ElementKind::Obstacle, type_id, dx, dy)
    }

    pub fn wall(type_id: &str, dx: i32, dy: i32) -> Self {
        Self::new(ElementKind::Wall, type_id, dx, dy)
    }

    pub fn decoration(type_id: &str, dx: i32, dy: i32) -> Self {
        Self::new(ElementKind::Decoration, type_id, dx, dy)
    }

    fn new(kind: ElementKind, type_id: &str, dx: i32, dy: i32) -> Self {
        Self {
            kind,
            type_id: type_id.to_string(),
            dx,
            dy,
            rotation: Rotation::R0,
            variant: None,
            door: None,
        }
    }

    pub fn rotated(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn variant(mut self, variant: &str) -> Self {
        self.variant = Some(variant.to_string());
        self
    }

    pub fn door(mut self, state: DoorState) -> Self {
        self.door = Some(state);
        self
    }
}

/// Alternative element set for a pattern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternVariant {
    pub id: String,
    pub elements: Vec<PatternElement>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConstraints {
    /// Minimum distance in cells between the stamp and the grid edge.
    #[serde(default)]
    pub border_margin: u32,
    /// Every cell of the bounding footprint must be free before stamping.
    #[serde(default)]
    pub needs_clear_area: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapPattern {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub themes: Vec<Theme>,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub anchor: PatternAnchor,
    pub elements: Vec<PatternElement>,
    #[serde(default)]
    pub variants: Vec<PatternVariant>,
    #[serde(default)]
    pub constraints: PatternConstraints,
}

impl MapPattern {
    pub fn allows_theme(&self, theme: Theme) -> bool {
        self.themes.is_empty() || self.themes.contains(&theme)
    }

    /// Base elements followed by every alternative set.
    pub fn all_elements(&self) -> impl Iterator<Item = &PatternElement> {
        self.elements.iter().chain(self.variants.iter().flat_map(|variant| variant.elements.iter()))
    }

    pub fn has_walls(&self) -> bool {
        self.all_elements().any(|element| element.kind == ElementKind::Wall)
    }

    /// Element list for `variant`, where `None` is the base list.
    pub fn elements_for(&self, variant: Option<&str>) -> Option<&[PatternElement]> {
        match variant {
            None => Some(&self.elements),
            Some(id) => self
                .variants
                .iter()
                .find(|candidate| candidate.id == id)
                .map(|found| found.elements.as_slice()),
        }
    }

    pub fn variant_count(&self) -> usize {
        1 + self.variants.len()
    }

    /// Words from the tags and label, normalized like prompt text, used for
    /// prompt matching.
    pub fn keywords(&self) -> Vec<String> {
        let mut words: Vec<String> = self
            .tags
            .iter()
            .chain(iter::once(&self.label))
            .flat_map(|text| {
                normalize_prompt(text).split_whitespace().map(str::to_string).collect::<Vec<_>>()
            })
            .filter(|word| word.len() > 2)
            .collect();
        words.sort();
        words.dedup();
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MapPattern {
        MapPattern {
            id: "sample".to_string(),
            label: "Market Corner".to_string(),
            tags: vec!["market".to_string(), "shop".to_string()],
            themes: vec![Theme::City],
            width: 2,
            height: 1,
            anchor: PatternAnchor::TopLeft,
            elements: vec![PatternElement::obstacle("crate-wood", 0, 0)],
            variants: vec![PatternVariant {
                id: "walled".to_string(),
                elements: vec![PatternElement::wall("wall-brick", 1, 0)],
            }],
            constraints: PatternConstraints::default(),
        }
    }

    #[test]
    fn keywords_merge_tags_and_label_words() {
        assert_eq!(sample().keywords(), vec!["corner", "market", "shop"]);
    }

    #[test]
    fn accented_tags_fold_like_prompt_words() {
        let mut pattern = sample();
        pattern.label = "Crypte Effondrée".to_string();
        pattern.tags = vec!["forêt".to_string(), "Éboulis".to_string()];
        assert_eq!(pattern.keywords(), vec!["crypte", "eboulis", "effondree", "foret"]);
    }

    #[test]
    fn wall_detection_includes_alternative_sets() {
        let pattern = sample();
        assert!(pattern.has_walls());
        assert_eq!(pattern.variant_count(), 2);
        assert_eq!(pattern.elements_for(Some("walled")).map(<[_]>::len), Some(1));
        assert!(pattern.elements_for(Some("missing")).is_none());
    }
}
