//! Fallback layout: default terrain and a light weighted scatter of props.

use crate::catalog::ObstacleType;
use crate::map_spec::MapSpec;
use crate::types::{Pos, Theme};

use super::super::grid::GridDraft;
use super::super::patterns::{StampRequest, stamp_patterns};
use super::super::seed::SeededRng;
use super::{LayoutContext, LayoutOutcome, reserve_player_area, scatter_props};

/// Cells per scattered prop.
const CELLS_PER_PROP: usize = 20;
const MIN_PROPS: usize = 2;

pub(super) fn scatter(
    spec: &MapSpec,
    context: &LayoutContext<'_>,
    rng: &mut SeededRng,
) -> LayoutOutcome {
    let size = spec.grid;
    let theme = spec.theme;
    let mut draft = GridDraft::new(size);
    draft.fill_terrain(theme.base_terrain());
    draft.apply_lighting(spec.lighting());

    let player_start = Pos::new(1.min(size.cols as i32 - 1), (size.rows / 2) as i32);
    reserve_player_area(&mut draft, player_start);

    let patterns = context.catalog.patterns_for(Theme::Generic);
    let stamped = stamp_patterns(
        &mut draft,
        context.catalog,
        rng,
        &patterns,
        StampRequest::up_to(1, context.normalized_prompt),
    );

    let props: Vec<&ObstacleType> = context.catalog.scatter_obstacles(theme);
    let target = (size.cell_count() / CELLS_PER_PROP).max(MIN_PROPS);
    let cells = draft.playable_cells();
    let placed = scatter_props(&mut draft, rng, &props, &cells, target);
    draft.note(format!("patterns={stamped} props={placed}/{target}"));

    LayoutOutcome { draft, player_start }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::map_spec::{GenericParams, LayoutParams};
    use crate::types::{GridSize, LayoutId, SizeHint, TerrainKind, TimeOfDay};

    #[test]
    fn scatter_uses_dirt_and_a_west_start() {
        let catalog = Catalog::builtin();
        let spec = MapSpec {
            theme: Theme::Generic,
            layout: LayoutId::GenericScatter,
            grid: GridSize::new(12, 8),
            size_hint: SizeHint::Medium,
            time_of_day: TimeOfDay::Unknown,
            params: LayoutParams::Generic(GenericParams::default()),
        };
        let context = LayoutContext { catalog: &catalog, normalized_prompt: "" };
        let outcome = scatter(&spec, &context, &mut SeededRng::new(0));

        assert_eq!(outcome.player_start, Pos::new(1, 4));
        assert_eq!(outcome.draft.terrain_at(Pos::new(5, 5)), Some(TerrainKind::Dirt));
        assert!(!outcome.draft.obstacles().is_empty());
        assert!(!outcome.draft.is_occupied(outcome.player_start));
    }
}
