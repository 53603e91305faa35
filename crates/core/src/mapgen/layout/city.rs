//! City street: a road band through the middle with building bands on each
//! side. Buildings, and therefore walls, only ever come from patterns.

use crate::catalog::ObstacleType;
use crate::map_spec::{CityParams, LayoutParams, MapSpec, StreetOrientation};
use crate::types::{GridSize, Lighting, Pos, TerrainKind, Theme};

use super::super::grid::GridDraft;
use super::super::patterns::{StampRequest, stamp_patterns};
use super::super::placement::{Placement, place_obstacle};
use super::super::seed::SeededRng;
use super::{LayoutContext, LayoutOutcome, Rect, reserve_player_area};

const THEME: Theme = Theme::City;
const LAMP_SPACING: usize = 5;
const LAMP_RADIUS: f64 = 2.5;
const LAMP_INTENSITY: f32 = 0.4;

/// Road and building bands in grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct StreetBands {
    road: Rect,
    near: Option<Rect>,
    far: Option<Rect>,
}

pub(super) fn street(
    spec: &MapSpec,
    context: &LayoutContext<'_>,
    rng: &mut SeededRng,
) -> LayoutOutcome {
    let params = match &spec.params {
        LayoutParams::City(params) => params.clone(),
        _ => CityParams { lighting: spec.lighting(), ..CityParams::default() },
    };
    let size = spec.grid;
    let mut draft = GridDraft::new(size);
    draft.fill_terrain(THEME.base_terrain());
    draft.apply_lighting(params.lighting);

    let bands = partition(size, &params);
    for pos in bands.road.cells() {
        draft.set_terrain(pos, TerrainKind::Road);
    }
    draft.note(format!(
        "street {} width={} building_bands={}",
        match params.orientation {
            StreetOrientation::Horizontal => "horizontal",
            StreetOrientation::Vertical => "vertical",
        },
        road_width(&bands, params.orientation),
        [bands.near, bands.far].iter().flatten().count(),
    ));

    let player_start = match params.orientation {
        StreetOrientation::Horizontal => Pos::new(0, bands.road.center().y),
        StreetOrientation::Vertical => Pos::new(bands.road.center().x, 0),
    };
    reserve_player_area(&mut draft, player_start);

    let patterns = context.catalog.patterns_for(THEME);
    let mut stamped = 0;
    for band in [bands.near, bands.far].into_iter().flatten() {
        let max_count = (band.area() / 16).max(1);
        stamped += stamp_patterns(
            &mut draft,
            context.catalog,
            rng,
            &patterns,
            StampRequest::up_to(max_count, context.normalized_prompt).within(band),
        );
    }
    draft.note(format!("patterns={stamped} walls={}", draft.walls().len()));

    let lamps = line_sidewalk(&mut draft, context, rng, &bands, params.orientation);
    if params.lighting != Lighting::Bright {
        let lamp_cells: Vec<Pos> = draft
            .obstacles()
            .iter()
            .filter(|obstacle| obstacle.type_id == "lamp-post")
            .map(|obstacle| obstacle.anchor)
            .collect();
        for cell in lamp_cells {
            draft.add_light_source(cell, LAMP_RADIUS, LAMP_INTENSITY);
        }
    }
    draft.note(format!("props={lamps}"));

    LayoutOutcome { draft, player_start }
}

fn road_width(bands: &StreetBands, orientation: StreetOrientation) -> usize {
    match orientation {
        StreetOrientation::Horizontal => bands.road.height,
        StreetOrientation::Vertical => bands.road.width,
    }
}

/// Splits the grid into a centered road and the building bands beside it.
fn partition(size: GridSize, params: &CityParams) -> StreetBands {
    let (length, across) = match params.orientation {
        StreetOrientation::Horizontal => (size.cols, size.rows),
        StreetOrientation::Vertical => (size.rows, size.cols),
    };
    let width = params.street_width.clamp(1, across.saturating_sub(2).max(1));
    let road_start = (across - width) / 2;
    let road_end = road_start + width;

    let near_depth = params.building_depth.map_or(road_start, |depth| depth.min(road_start));
    let far_room = across - road_end;
    let far_depth = params.building_depth.map_or(far_room, |depth| depth.min(far_room));

    // Bands hug the road; anything between a band and the grid edge stays open.
    let near = (near_depth > 0).then(|| (road_start - near_depth, near_depth));
    let far = (far_depth > 0).then_some((road_end, far_depth));

    let oriented = |start: usize, extent: usize| match params.orientation {
        StreetOrientation::Horizontal => Rect::new(0, start, length, extent),
        StreetOrientation::Vertical => Rect::new(start, 0, extent, length),
    };
    StreetBands {
        road: oriented(road_start, width),
        near: near.map(|(start, extent)| oriented(start, extent)),
        far: far.map(|(start, extent)| oriented(start, extent)),
    }
}

/// Street-side props on the sidewalk row or column touching the road.
fn line_sidewalk(
    draft: &mut GridDraft,
    context: &LayoutContext<'_>,
    rng: &mut SeededRng,
    bands: &StreetBands,
    orientation: StreetOrientation,
) -> usize {
    let catalog = context.catalog;
    let lamp = catalog.obstacle("lamp-post");
    let clutter: Vec<&ObstacleType> = catalog
        .scatter_obstacles(THEME)
        .into_iter()
        .filter(|obstacle| !obstacle.is_multi_cell() && obstacle.id != "lamp-post")
        .collect();

    let mut edges = Vec::new();
    if bands.near.is_some() {
        edges.push(match orientation {
            StreetOrientation::Horizontal => Rect::new(0, bands.road.y - 1, bands.road.width, 1),
            StreetOrientation::Vertical => Rect::new(bands.road.x - 1, 0, 1, bands.road.height),
        });
    }
    if bands.far.is_some() {
        edges.push(match orientation {
            StreetOrientation::Horizontal => {
                Rect::new(0, bands.road.bottom() + 1, bands.road.width, 1)
            }
            StreetOrientation::Vertical => {
                Rect::new(bands.road.right() + 1, 0, 1, bands.road.height)
            }
        });
    }

    let mut placed = 0;
    for edge in edges {
        let offset = rng.range_usize(0, LAMP_SPACING - 1);
        for (index, pos) in edge.cells().enumerate() {
            if index % LAMP_SPACING != offset {
                continue;
            }
            let kind = match lamp {
                Some(lamp) if index % (LAMP_SPACING * 2) == offset => Some(lamp),
                _ => rng.pick(&clutter).copied(),
            };
            if let Some(kind) = kind
                && place_obstacle(draft, kind, Placement::at(pos)).is_ok()
            {
                placed += 1;
            }
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::{LayoutId, SizeHint, TimeOfDay};

    fn run(grid: GridSize, params: CityParams, seed: u64) -> LayoutOutcome {
        let catalog = Catalog::builtin();
        let spec = MapSpec {
            theme: THEME,
            layout: LayoutId::CityStreet,
            grid,
            size_hint: SizeHint::Medium,
            time_of_day: TimeOfDay::Night,
            params: LayoutParams::City(params),
        };
        let context = LayoutContext { catalog: &catalog, normalized_prompt: "" };
        street(&spec, &context, &mut SeededRng::new(seed))
    }

    #[test]
    fn horizontal_partition_centers_the_road() {
        let bands = partition(GridSize::new(20, 15), &CityParams::default());
        assert_eq!(bands.road, Rect::new(0, 6, 20, 3));
        assert_eq!(bands.near, Some(Rect::new(0, 0, 20, 6)));
        assert_eq!(bands.far, Some(Rect::new(0, 9, 20, 6)));
    }

    #[test]
    fn building_depth_keeps_bands_beside_the_road() {
        let params = CityParams {
            orientation: StreetOrientation::Vertical,
            building_depth: Some(4),
            ..CityParams::default()
        };
        let bands = partition(GridSize::new(21, 12), &params);
        assert_eq!(bands.road, Rect::new(9, 0, 3, 12));
        assert_eq!(bands.near, Some(Rect::new(5, 0, 4, 12)));
        assert_eq!(bands.far, Some(Rect::new(12, 0, 4, 12)));
    }

    #[test]
    fn walls_never_touch_the_road() {
        for seed in 0..8 {
            let outcome = run(GridSize::new(24, 18), CityParams::default(), seed);
            let draft = &outcome.draft;
            for wall in draft.walls() {
                for &cell in &wall.cells {
                    assert_ne!(draft.terrain_at(cell), Some(TerrainKind::Road));
                }
            }
        }
    }

    #[test]
    fn player_starts_on_the_road() {
        let outcome = run(GridSize::new(16, 12), CityParams::default(), 2);
        assert_eq!(outcome.draft.terrain_at(outcome.player_start), Some(TerrainKind::Road));
        assert_eq!(outcome.player_start.x, 0);
    }
}
