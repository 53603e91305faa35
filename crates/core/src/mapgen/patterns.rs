//! Pattern engine: stamps multi-element templates onto a draft with rotation,
//! mirroring, and anchor resolution, all or nothing.

use std::collections::BTreeSet;

use tracing::debug;

use crate::catalog::{Catalog, ElementKind, Footprint, MapPattern, PatternAnchor, PatternElement};
use crate::error::{PatternError, PlacementError};
use crate::types::{Pos, Rotation};

use super::grid::GridDraft;
use super::layout::Rect;
use super::placement::{Placement, place_decoration, place_obstacle, place_wall};
use super::seed::SeededRng;

/// Random pattern/transform/anchor triples tried per stamping pass.
pub const PATTERN_ATTEMPT_BUDGET: usize = 40;

/// Mirror first, then rotate clockwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PatternTransform {
    pub rotation: Rotation,
    pub mirror_x: bool,
    pub mirror_y: bool,
}

impl PatternTransform {
    pub const IDENTITY: Self = Self { rotation: Rotation::R0, mirror_x: false, mirror_y: false };

    pub fn random(rng: &mut SeededRng) -> Self {
        let rotation = Rotation::from_quarter_turns(rng.range_usize(0, 3) as u8);
        Self { rotation, mirror_x: rng.chance(0.5), mirror_y: rng.chance(0.5) }
    }

    /// Bounding size after the transform.
    pub fn size(self, width: i32, height: i32) -> (i32, i32) {
        if self.rotation.is_sideways() { (height, width) } else { (width, height) }
    }

    /// Maps an offset inside a `width` x `height` box to its transformed offset.
    pub fn apply(self, dx: i32, dy: i32, width: i32, height: i32) -> (i32, i32) {
        let dx = if self.mirror_x { width - 1 - dx } else { dx };
        let dy = if self.mirror_y { height - 1 - dy } else { dy };
        match self.rotation {
            Rotation::R0 => (dx, dy),
            Rotation::R90 => (height - 1 - dy, dx),
            Rotation::R180 => (width - 1 - dx, height - 1 - dy),
            Rotation::R270 => (dy, width - 1 - dx),
        }
    }
}

/// Top-left corner of a stamp of the given (transformed) size.
pub fn resolve_origin(anchor: PatternAnchor, at: Pos, width: i32, height: i32) -> Pos {
    match anchor {
        PatternAnchor::TopLeft => at,
        PatternAnchor::Center => at.offset(-(width / 2), -(height / 2)),
    }
}

/// One element after transformation, ready for a placement primitive.
#[derive(Clone, Debug, PartialEq, Eq)]
struct StagedElement<'a> {
    element: &'a PatternElement,
    anchor: Pos,
    rotation: Rotation,
}

/// Stamps `elements` of `pattern` at `anchor`. On any rejection the draft is
/// left untouched. Returns the number of elements placed.
pub fn try_place_pattern(
    draft: &mut GridDraft,
    catalog: &Catalog,
    pattern: &MapPattern,
    elements: &[PatternElement],
    anchor: Pos,
    transform: PatternTransform,
    region: Option<Rect>,
) -> Result<usize, PatternError> {
    let base_width = pattern.width as i32;
    let base_height = pattern.height as i32;
    let (width, height) = transform.size(base_width, base_height);
    let origin = resolve_origin(pattern.anchor, anchor, width, height);
    let bounds = Rect::from_origin(origin, width, height).ok_or(PatternError::OutsideMargin)?;

    let size = draft.size();
    let margin = pattern.constraints.border_margin as usize;
    if bounds.x < margin
        || bounds.y < margin
        || bounds.right() + margin >= size.cols
        || bounds.bottom() + margin >= size.rows
    {
        return Err(PatternError::OutsideMargin);
    }
    if let Some(region) = region
        && !region.contains_rect(&bounds)
    {
        return Err(PatternError::OutsideRegion);
    }
    if pattern.constraints.needs_clear_area
        && let Some(blocked) =
            bounds.cells().find(|&pos| draft.is_occupied(pos) || draft.is_reserved(pos))
    {
        return Err(PatternError::AreaNotClear(blocked));
    }

    let staged = stage_elements(catalog, elements, origin, transform, base_width, base_height)?;

    let mut scratch = draft.clone();
    for item in &staged {
        commit_element(&mut scratch, catalog, item).map_err(|source| PatternError::Element {
            type_id: item.element.type_id.clone(),
            source,
        })?;
    }
    *draft = scratch;
    Ok(staged.len())
}

fn stage_elements<'a>(
    catalog: &Catalog,
    elements: &'a [PatternElement],
    origin: Pos,
    transform: PatternTransform,
    width: i32,
    height: i32,
) -> Result<Vec<StagedElement<'a>>, PatternError> {
    let mut staged = Vec::with_capacity(elements.len());
    for element in elements {
        let local = element_cells(catalog, element)?;
        // The element's own footprint is carried through the transform so the
        // committed anchor is the top-left of the transformed cells.
        let moved: BTreeSet<(i32, i32)> = local
            .iter()
            .map(|pos| transform.apply(pos.x, pos.y, width, height))
            .collect();
        let min_x = moved.iter().map(|&(x, _)| x).min().unwrap_or(0);
        let min_y = moved.iter().map(|&(_, y)| y).min().unwrap_or(0);
        staged.push(StagedElement {
            element,
            anchor: origin.offset(min_x, min_y),
            rotation: element.rotation.then(transform.rotation),
        });
    }
    Ok(staged)
}

/// Untransformed cells of an element relative to the pattern's top-left.
fn element_cells(catalog: &Catalog, element: &PatternElement) -> Result<Vec<Pos>, PatternError> {
    let local_anchor = Pos::new(element.dx, element.dy);
    let variant = element.variant.as_deref();
    let unknown = || PatternError::UnknownType {
        kind: element.kind.as_str(),
        type_id: element.type_id.clone(),
    };
    let footprint: &dyn Footprint = match element.kind {
        ElementKind::Obstacle => catalog.obstacle(&element.type_id).ok_or_else(unknown)?,
        ElementKind::Wall => catalog.wall(&element.type_id).ok_or_else(unknown)?,
        ElementKind::Decoration => catalog.decoration(&element.type_id).ok_or_else(unknown)?,
    };
    footprint.occupied_cells(variant, local_anchor, element.rotation).ok_or_else(|| {
        PatternError::Element {
            type_id: element.type_id.clone(),
            source: PlacementError::UnknownVariant {
                type_id: element.type_id.clone(),
                variant: variant.unwrap_or_default().to_string(),
            },
        }
    })
}

fn commit_element(
    draft: &mut GridDraft,
    catalog: &Catalog,
    item: &StagedElement<'_>,
) -> Result<(), PlacementError> {
    let element = item.element;
    let placement = Placement::at(item.anchor)
        .rotated(item.rotation)
        .variant(element.variant.as_deref());
    // Types were resolved while staging.
    match element.kind {
        ElementKind::Obstacle => match catalog.obstacle(&element.type_id) {
            Some(obstacle) => place_obstacle(draft, obstacle, placement),
            None => Ok(()),
        },
        ElementKind::Wall => match catalog.wall(&element.type_id) {
            Some(wall) => place_wall(draft, wall, placement, element.door),
            None => Ok(()),
        },
        ElementKind::Decoration => match catalog.decoration(&element.type_id) {
            Some(decoration) => place_decoration(draft, decoration, placement),
            None => Ok(()),
        },
    }
}

/// Picks a pattern weighted by keyword overlap with the normalized prompt.
/// Every candidate keeps a base weight of one, so no overlap means uniform.
pub fn choose_pattern<'a>(
    rng: &mut SeededRng,
    candidates: &[&'a MapPattern],
    normalized_prompt: &str,
) -> Option<&'a MapPattern> {
    let words: BTreeSet<&str> = normalized_prompt.split_whitespace().collect();
    let weighted: Vec<(&'a MapPattern, f64)> = candidates
        .iter()
        .map(|&pattern| {
            let matched = pattern
                .keywords()
                .iter()
                .filter(|keyword| words.iter().any(|word| keyword_matches(keyword, word)))
                .count();
            (pattern, 1.0 + matched as f64)
        })
        .collect();
    rng.pick_weighted(&weighted, |entry| entry.1).map(|entry| entry.0)
}

fn keyword_matches(keyword: &str, word: &str) -> bool {
    keyword == word || keyword.trim_end_matches('s') == word.trim_end_matches('s')
}

/// Picks the base element list or one of the alternatives, uniformly.
pub fn choose_elements<'a>(rng: &mut SeededRng, pattern: &'a MapPattern) -> &'a [PatternElement] {
    let index = rng.range_usize(0, pattern.variant_count() - 1);
    let variant = index
        .checked_sub(1)
        .and_then(|alternative| pattern.variants.get(alternative))
        .map(|alternative| alternative.id.as_str());
    pattern.elements_for(variant).unwrap_or(pattern.elements.as_slice())
}

/// What a stamping pass should do.
#[derive(Clone, Copy, Debug)]
pub struct StampRequest<'a> {
    pub max_count: usize,
    pub region: Option<Rect>,
    pub prompt: &'a str,
    /// Keeps transforms at identity; used for patterns authored for one facing.
    pub fixed_orientation: bool,
}

impl<'a> StampRequest<'a> {
    pub fn up_to(max_count: usize, prompt: &'a str) -> Self {
        Self { max_count, region: None, prompt, fixed_orientation: false }
    }

    pub fn within(mut self, region: Rect) -> Self {
        self.region = Some(region);
        self
    }
}

/// Tries random pattern/transform/anchor triples under
/// [`PATTERN_ATTEMPT_BUDGET`] and returns the number of stamps placed.
pub fn stamp_patterns(
    draft: &mut GridDraft,
    catalog: &Catalog,
    rng: &mut SeededRng,
    candidates: &[&MapPattern],
    request: StampRequest<'_>,
) -> usize {
    if candidates.is_empty() || request.max_count == 0 {
        return 0;
    }

    let area = request.region.or_else(|| Rect::covering(draft.size()));
    let Some(area) = area else {
        return 0;
    };

    let mut placed = 0;
    for attempt in 0..PATTERN_ATTEMPT_BUDGET {
        if placed >= request.max_count {
            break;
        }
        let Some(pattern) = choose_pattern(rng, candidates, request.prompt) else {
            break;
        };
        let elements = choose_elements(rng, pattern);
        let transform = if request.fixed_orientation {
            PatternTransform::IDENTITY
        } else {
            PatternTransform::random(rng)
        };
        let (width, height) = transform.size(pattern.width as i32, pattern.height as i32);
        let Some(origin) = random_origin(rng, area, width, height) else {
            continue;
        };
        let anchor = match pattern.anchor {
            PatternAnchor::TopLeft => origin,
            PatternAnchor::Center => origin.offset(width / 2, height / 2),
        };

        match try_place_pattern(draft, catalog, pattern, elements, anchor, transform, request.region)
        {
            Ok(count) => {
                placed += 1;
                draft.note(format!(
                    "pattern {} at {} rot={} ({} elements)",
                    pattern.id,
                    anchor,
                    transform.rotation.degrees(),
                    count
                ));
            }
            Err(error) => {
                debug!(pattern = %pattern.id, attempt, %error, "pattern stamp rejected");
            }
        }
    }
    placed
}

fn random_origin(rng: &mut SeededRng, area: Rect, width: i32, height: i32) -> Option<Pos> {
    let width = usize::try_from(width).ok()?;
    let height = usize::try_from(height).ok()?;
    if width > area.width || height > area.height {
        return None;
    }
    let x = rng.range_usize(area.x, area.x + area.width - width);
    let y = rng.range_usize(area.y, area.y + area.height - height);
    Some(Pos::new(x as i32, y as i32))
}
