use std::collections::BTreeSet;

use battlemap_core::map_spec::{DungeonParams, LayoutParams, RoomShape};
use battlemap_core::mapgen::{
    GridDraft, LayoutContext, MapBuildResult, SeededRng, build_layout, reachable_cells,
};
use battlemap_core::{
    Catalog, GridSize, LayoutId, Lighting, ManualConfig, MapSpec, Pos, SizeHint, Theme,
    TimeOfDay, generate, generate_manual,
};
use proptest::prelude::*;

const PROMPTS: [&str; 10] = [
    "",
    "donjon circulaire avec 2 acces et 4 colonnes",
    "salle carree du donjon avec trois portes fermees et un autel",
    "dungeon square room with 0 doors",
    "foret clairsemee",
    "dense dark forest at night",
    "ruelle etroite",
    "wide vertical avenue",
    "grande arene",
    "!!! ??? ...",
];

fn playable_set(result: &MapBuildResult) -> BTreeSet<String> {
    result.playable_cells.iter().cloned().collect()
}

fn assert_map_invariants(result: &MapBuildResult) -> Result<(), TestCaseError> {
    let playable = playable_set(result);
    let covered = result.covered_cells();
    let unique: BTreeSet<Pos> = covered.iter().copied().collect();
    prop_assert_eq!(unique.len(), covered.len(), "overlapping footprints");
    for pos in &covered {
        prop_assert!(playable.contains(&pos.key()), "{} outside playable mask", pos);
    }

    prop_assert!(playable.contains(&result.player_start.key()));
    prop_assert!(!unique.contains(&result.player_start), "player start is covered");

    let spawn_cells: BTreeSet<Pos> = result.spawns.iter().map(|spawn| spawn.pos).collect();
    prop_assert_eq!(spawn_cells.len(), result.spawns.len(), "duplicate spawns");
    prop_assert!(!spawn_cells.contains(&result.player_start));
    for spawn in &result.spawns {
        prop_assert!(playable.contains(&spawn.pos.key()));
        prop_assert!(!unique.contains(&spawn.pos), "spawn on a covered cell");
    }

    let cells = result.grid.cell_count();
    prop_assert_eq!(result.terrain.len(), cells);
    prop_assert_eq!(result.elevation.len(), cells);
    prop_assert_eq!(result.light.len(), cells);
    prop_assert!(result.light.iter().all(|&level| (0.0..=1.0).contains(&level)));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]
    #[test]
    fn prompt_maps_hold_structural_invariants(
        prompt_index in 0_usize..PROMPTS.len(),
        cols in 3_usize..48,
        rows in 3_usize..48,
        enemies in 0_usize..16,
    ) {
        let catalog = Catalog::builtin();
        let result = generate(PROMPTS[prompt_index], GridSize::new(cols, rows), enemies, &catalog);
        assert_map_invariants(&result)?;
        prop_assert!(result.spawns.len() <= enemies);
    }

    #[test]
    fn manual_maps_hold_structural_invariants(
        cols in 3_usize..32,
        rows in 3_usize..32,
        barrels in 0_usize..12,
        tables in 0_usize..4,
        entrances in 0_u8..=8,
        corridors in any::<bool>(),
        enemies in 0_usize..12,
    ) {
        let mut config = ManualConfig::new(GridSize::new(cols, rows))
            .with_obstacle("barrel-wood", barrels)
            .with_obstacle("table-wood", tables);
        config.options.entrances = entrances;
        config.options.corridors = corridors;
        config.enemy_count = enemies;

        let result = generate_manual(&config, &Catalog::builtin());
        assert_map_invariants(&result)?;
        prop_assert!(result.count_obstacles("barrel-wood") <= barrels);
    }

    #[test]
    fn reachable_cells_stay_inside_the_unblocked_mask(
        cols in 3_usize..40,
        rows in 3_usize..40,
        prompt_index in 0_usize..PROMPTS.len(),
    ) {
        let catalog = Catalog::builtin();
        let interpretation =
            battlemap_core::interpret_prompt(PROMPTS[prompt_index], GridSize::new(cols, rows));
        let context = LayoutContext { catalog: &catalog, normalized_prompt: &interpretation.normalized };
        let mut rng = SeededRng::from_seed_text(PROMPTS[prompt_index]);
        let outcome = build_layout(&interpretation.spec, &context, &mut rng);

        let reached = reachable_cells(&outcome.draft, outcome.player_start);
        prop_assert!(reached.contains(&outcome.player_start));
        for pos in &reached {
            prop_assert!(outcome.draft.is_playable(*pos));
            prop_assert!(*pos == outcome.player_start || !outcome.draft.is_movement_blocked(*pos));
        }
    }
}

#[test]
fn square_room_without_entrances_has_walls_only_on_the_boundary() {
    let catalog = Catalog::builtin();
    for (cols, rows) in [(6, 6), (9, 7), (14, 10), (20, 20)] {
        let spec = MapSpec {
            theme: Theme::Dungeon,
            layout: LayoutId::DungeonSquareRoom,
            grid: GridSize::new(cols, rows),
            size_hint: SizeHint::Medium,
            time_of_day: TimeOfDay::Unknown,
            params: LayoutParams::Dungeon(DungeonParams {
                shape: RoomShape::Square,
                entrances: 0,
                lighting: Lighting::Bright,
                ..DungeonParams::default()
            }),
        };
        let context = LayoutContext { catalog: &catalog, normalized_prompt: "" };
        let outcome = build_layout(&spec, &context, &mut SeededRng::new(cols as u64));

        let size = GridSize::new(cols, rows);
        let wall_cells: BTreeSet<Pos> =
            outcome.draft.walls().iter().flat_map(|wall| wall.cells.iter().copied()).collect();
        let border: BTreeSet<Pos> = size.cells().filter(|&pos| size.is_border(pos)).collect();
        assert_eq!(wall_cells, border, "{cols}x{rows}");
    }
}

#[test]
fn empty_draft_reaches_every_cell() {
    let draft = GridDraft::new(GridSize::new(7, 5));
    assert_eq!(reachable_cells(&draft, Pos::new(3, 2)).len(), 35);
}
