pub mod catalog;
pub mod config;
pub mod error;
pub mod map_spec;
pub mod mapgen;
pub mod prompt;
pub mod types;

pub use catalog::Catalog;
pub use config::{BorderMask, ManualConfig, ManualOptions, ObstacleCount};
pub use error::{CatalogError, ConfigError, PatternError, PlacementError};
pub use map_spec::{LayoutParams, MapSpec};
pub use mapgen::{MapBuildResult, MapGenerator, generate, generate_manual};
pub use prompt::{PromptInterpretation, PromptInterpreter, interpret_prompt};
pub use types::*;
