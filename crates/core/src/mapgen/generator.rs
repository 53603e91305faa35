//! Orchestration entry points that run a full generation against one catalog.

mod pipeline;

use crate::catalog::Catalog;
use crate::config::ManualConfig;
use crate::types::GridSize;

use super::model::MapBuildResult;

/// Runs prompt or manual generation against a borrowed catalog. Holds no
/// other state, so one generator can serve any number of runs.
#[derive(Clone, Copy, Debug)]
pub struct MapGenerator<'a> {
    catalog: &'a Catalog,
}

impl<'a> MapGenerator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Prompt pipeline: interpret, seed from the prompt, recommend, lay out,
    /// allocate spawns, assemble.
    pub fn generate(&self, prompt: &str, grid: GridSize, enemy_count: usize) -> MapBuildResult {
        pipeline::generate_from_prompt(self.catalog, prompt, grid, enemy_count)
    }

    /// Manual pipeline: seed from the config's canonical JSON, build the
    /// manual arena, allocate spawns, assemble.
    pub fn generate_manual(&self, config: &ManualConfig) -> MapBuildResult {
        pipeline::generate_from_config(self.catalog, config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;
    use crate::types::{LayoutId, Pos, Theme};

    #[test]
    fn same_inputs_produce_identical_results() {
        let catalog = Catalog::builtin();
        let generator = MapGenerator::new(&catalog);
        let first = generator.generate("donjon sombre avec 3 portes", GridSize::new(16, 12), 4);
        let second = generator.generate("donjon sombre avec 3 portes", GridSize::new(16, 12), 4);
        assert_eq!(first, second);
        assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn different_prompts_change_the_map() {
        let catalog = Catalog::builtin();
        let generator = MapGenerator::new(&catalog);
        let crypt = generator.generate("crypt", GridSize::new(16, 12), 3);
        let forest = generator.generate("forest", GridSize::new(16, 12), 3);
        assert_ne!(crypt.fingerprint(), forest.fingerprint());
    }

    #[test]
    fn oversized_grids_are_clamped_with_a_note() {
        let catalog = Catalog::builtin();
        let result = MapGenerator::new(&catalog).generate("", GridSize::new(500, 1), 0);
        assert_eq!(result.grid, GridSize::new(128, 3));
        assert!(result.log[0].starts_with("grid clamped"));
        assert_eq!(result.terrain.len(), 128 * 3);
    }

    #[test]
    fn log_starts_with_interpreter_notes() {
        let catalog = Catalog::builtin();
        let result = MapGenerator::new(&catalog).generate("", GridSize::new(12, 8), 2);
        assert_eq!(result.theme, Theme::Generic);
        assert_eq!(result.layout, LayoutId::GenericScatter);
        assert_eq!(result.log[0], "theme=generic layout=generic_scatter time=unknown");
        assert!(!result.summary.is_empty());
    }

    #[test]
    fn manual_generation_uses_the_manual_arena() {
        let catalog = Catalog::builtin();
        let mut config = ManualConfig::new(GridSize::new(10, 10)).with_obstacle("crate-wood", 3);
        config.enemy_count = 2;
        let result = MapGenerator::new(&catalog).generate_manual(&config);
        assert_eq!(result.layout, LayoutId::ManualArena);
        assert_eq!(result.count_obstacles("crate-wood"), 3);
        assert_eq!(result.spawns.len(), 2);
        assert_eq!(result, MapGenerator::new(&catalog).generate_manual(&config));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]
        #[test]
        fn results_never_overlap_and_stay_inside_the_mask(
            prompt_index in 0_usize..6,
            cols in 3_usize..40,
            rows in 3_usize..40,
            enemies in 0_usize..12,
        ) {
            let prompts = [
                "",
                "donjon circulaire avec 2 acces et 4 colonnes",
                "square crypt with altar and closed doors",
                "dense forest at night",
                "wide city street",
                "petite arene ronde",
            ];
            let catalog = Catalog::builtin();
            let result = MapGenerator::new(&catalog)
                .generate(prompts[prompt_index], GridSize::new(cols, rows), enemies);

            let covered = result.covered_cells();
            let unique: BTreeSet<Pos> = covered.iter().copied().collect();
            prop_assert_eq!(unique.len(), covered.len());

            let playable: BTreeSet<String> = result.playable_cells.iter().cloned().collect();
            for pos in &covered {
                prop_assert!(playable.contains(&pos.key()));
            }
            prop_assert!(playable.contains(&result.player_start.key()));
            prop_assert!(!unique.contains(&result.player_start));
        }
    }
}
