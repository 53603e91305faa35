use std::collections::BTreeSet;

use anyhow::{Result, ensure};
use battlemap_core::{
    BorderMask, Catalog, Density, GridSize, MapBuildResult, ManualConfig, MapGenerator, Pos, Theme,
};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about = "Randomized invariant checks for map generation", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 500)]
    runs: u32,
}

const WORDS: &[&str] = &[
    "donjon", "dungeon", "crypte", "foret", "forest", "clairiere", "ville", "rue", "street",
    "circulaire", "round", "carree", "square", "avec", "with", "deux", "4", "trois", "acces",
    "portes", "doors", "colonnes", "pillars", "autel", "sombre", "dark", "nuit", "night", "jour",
    "dense", "sparse", "petite", "grande", "verticale", "wide", "narrow", "et", "de", "la", "!",
    "é", "cases", "large",
];

const OBSTACLES: &[&str] = &["barrel-wood", "crate-wood", "table-wood", "rock-boulder", "cart"];

fn below(rng: &mut ChaCha8Rng, bound: usize) -> usize {
    rng.next_u64() as usize % bound
}

fn random_prompt(rng: &mut ChaCha8Rng) -> String {
    let length = below(rng, 9);
    (0..length).map(|_| WORDS[below(rng, WORDS.len())]).collect::<Vec<_>>().join(" ")
}

fn random_config(rng: &mut ChaCha8Rng) -> ManualConfig {
    let mut config = ManualConfig::new(GridSize::new(3 + below(rng, 30), 3 + below(rng, 30)));
    for _ in 0..below(rng, 3) {
        config = config.with_obstacle(OBSTACLES[below(rng, OBSTACLES.len())], below(rng, 8));
    }
    config.enemy_count = below(rng, 12);
    config.options.entrances = below(rng, 9) as u8;
    config.options.corridors = rng.next_u64() % 2 == 0;
    config.options.walls = rng.next_u64() % 4 != 0;
    config.options.density = [Density::Sparse, Density::Normal, Density::Dense][below(rng, 3)];
    config.options.theme =
        [Theme::Dungeon, Theme::Forest, Theme::City, Theme::Generic][below(rng, 4)];
    config.options.border = BorderMask {
        north: rng.next_u64() % 2 == 0,
        south: rng.next_u64() % 2 == 0,
        east: rng.next_u64() % 2 == 0,
        west: rng.next_u64() % 2 == 0,
    };
    config
}

fn check_invariants(result: &MapBuildResult, label: &str) -> Result<()> {
    let playable: BTreeSet<&str> = result.playable_cells.iter().map(String::as_str).collect();
    let covered = result.covered_cells();
    let unique: BTreeSet<Pos> = covered.iter().copied().collect();
    ensure!(unique.len() == covered.len(), "{label}: overlapping footprints");
    for pos in &unique {
        ensure!(playable.contains(pos.key().as_str()), "{label}: {pos} outside playable mask");
    }
    ensure!(
        playable.contains(result.player_start.key().as_str()) && !unique.contains(&result.player_start),
        "{label}: invalid player start {}",
        result.player_start
    );
    let spawns: BTreeSet<Pos> = result.spawns.iter().map(|spawn| spawn.pos).collect();
    ensure!(spawns.len() == result.spawns.len(), "{label}: duplicate spawns");
    for pos in &spawns {
        ensure!(*pos != result.player_start, "{label}: spawn on player start");
        ensure!(playable.contains(pos.key().as_str()), "{label}: spawn {pos} outside mask");
        ensure!(!unique.contains(pos), "{label}: spawn {pos} on a covered cell");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting map fuzz harness on seed {} for {} runs...", args.seed, args.runs);
    let catalog = Catalog::builtin();
    let generator = MapGenerator::new(&catalog);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut total_spawns = 0;
    for run in 0..args.runs {
        if rng.next_u64() % 3 == 0 {
            let config = random_config(&mut rng);
            let result = generator.generate_manual(&config);
            check_invariants(&result, &format!("run {run} manual {}", config.canonical_json()))?;
            ensure!(
                result == generator.generate_manual(&config),
                "run {run}: manual generation is not deterministic"
            );
            total_spawns += result.spawns.len();
        } else {
            let prompt = random_prompt(&mut rng);
            let grid = GridSize::new(1 + below(&mut rng, 64), 1 + below(&mut rng, 64));
            let enemies = below(&mut rng, 16);
            let result = generator.generate(&prompt, grid, enemies);
            check_invariants(&result, &format!("run {run} prompt {prompt:?} grid {grid}"))?;
            ensure!(
                result.fingerprint() == generator.generate(&prompt, grid, enemies).fingerprint(),
                "run {run}: prompt {prompt:?} is not deterministic"
            );
            total_spawns += result.spawns.len();
        }
    }

    println!("Fuzzing completed successfully ({total_spawns} spawns checked).");
    Ok(())
}
