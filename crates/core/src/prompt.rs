//! Free-text prompt interpretation into a [`MapSpec`].
//!
//! Matching is keyword based on a normalized copy of the prompt. Every
//! extraction is independent of the others; absent or conflicting hints fall
//! back to defaults and interpretation never fails.

mod keywords;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::map_spec::{
    CityParams, DungeonParams, ForestParams, GenericParams, LayoutParams, MAX_COLUMNS,
    MAX_ENTRANCES, MapSpec, RoomShape, StreetOrientation,
};
use crate::types::{Density, GridSize, LayoutId, Lighting, SizeHint, Theme, TimeOfDay};

use self::keywords::number_value;

const DEFAULT_ENTRANCES: u8 = 2;
/// Column count used when column words appear without a number.
const IMPLIED_COLUMNS: u8 = 4;
const NARROW_STREET_WIDTH: usize = 2;
const WIDE_STREET_WIDTH: usize = 5;
const MAX_STREET_WIDTH: usize = 9;

#[derive(Clone, Debug, PartialEq)]
pub struct PromptInterpretation {
    pub spec: MapSpec,
    pub notes: Vec<String>,
    pub normalized: String,
}

/// Compiled keyword tables. Build once and reuse across prompts.
pub struct PromptInterpreter {
    dungeon: Regex,
    forest: Regex,
    city: Regex,
    day: Regex,
    night: Regex,
    circular: Regex,
    square: Regex,
    clearing: Regex,
    street: Regex,
    entrance_count: Regex,
    column_count: Regex,
    column: Regex,
    altar: Regex,
    low_light: Regex,
    closed_doors: Regex,
    dense: Regex,
    sparse: Regex,
    vertical: Regex,
    wide_street: Regex,
    narrow_street: Regex,
    street_width: Regex,
    small: Regex,
    medium: Regex,
    large: Regex,
}

static SHARED_INTERPRETER: LazyLock<Result<PromptInterpreter, regex::Error>> =
    LazyLock::new(PromptInterpreter::new);

/// Interprets `prompt` with a process-wide interpreter.
pub fn interpret_prompt(prompt: &str, grid: GridSize) -> PromptInterpretation {
    match &*SHARED_INTERPRETER {
        Ok(interpreter) => interpreter.interpret(prompt, grid),
        Err(error) => {
            warn!(%error, "prompt keyword tables failed to compile");
            fallback_interpretation(prompt, grid)
        }
    }
}

impl PromptInterpreter {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            dungeon: Regex::new(keywords::DUNGEON_PATTERN)?,
            forest: Regex::new(keywords::FOREST_PATTERN)?,
            city: Regex::new(keywords::CITY_PATTERN)?,
            day: Regex::new(keywords::DAY_PATTERN)?,
            night: Regex::new(keywords::NIGHT_PATTERN)?,
            circular: Regex::new(keywords::CIRCULAR_PATTERN)?,
            square: Regex::new(keywords::SQUARE_PATTERN)?,
            clearing: Regex::new(keywords::CLEARING_PATTERN)?,
            street: Regex::new(keywords::STREET_PATTERN)?,
            entrance_count: Regex::new(&keywords::entrance_count_pattern())?,
            column_count: Regex::new(&keywords::column_count_pattern())?,
            column: Regex::new(keywords::COLUMN_PATTERN)?,
            altar: Regex::new(keywords::ALTAR_PATTERN)?,
            low_light: Regex::new(keywords::LOW_LIGHT_PATTERN)?,
            closed_doors: Regex::new(keywords::CLOSED_DOORS_PATTERN)?,
            dense: Regex::new(keywords::DENSE_PATTERN)?,
            sparse: Regex::new(keywords::SPARSE_PATTERN)?,
            vertical: Regex::new(keywords::VERTICAL_PATTERN)?,
            wide_street: Regex::new(keywords::WIDE_STREET_PATTERN)?,
            narrow_street: Regex::new(keywords::NARROW_STREET_PATTERN)?,
            street_width: Regex::new(&keywords::street_width_pattern())?,
            small: Regex::new(keywords::SMALL_PATTERN)?,
            medium: Regex::new(keywords::MEDIUM_PATTERN)?,
            large: Regex::new(keywords::LARGE_PATTERN)?,
        })
    }

    pub fn interpret(&self, prompt: &str, grid: GridSize) -> PromptInterpretation {
        let normalized = normalize_prompt(prompt);
        let text = normalized.as_str();

        let theme = self.theme(text);
        let time_of_day = self.time_of_day(text);
        let layout = self.layout(text, theme);
        let lighting = self.lighting(text, time_of_day);
        let size_hint = self.size_hint(text);
        let params = match layout {
            LayoutId::DungeonCircularRoom | LayoutId::DungeonSquareRoom => {
                LayoutParams::Dungeon(self.dungeon_params(text, layout, lighting))
            }
            LayoutId::ForestClearing => LayoutParams::Forest(self.forest_params(text, lighting)),
            LayoutId::CityStreet => LayoutParams::City(self.city_params(text, lighting)),
            LayoutId::GenericScatter | LayoutId::ManualArena => {
                LayoutParams::Generic(GenericParams { lighting })
            }
        };

        let notes = vec![
            format!("theme={theme} layout={layout} time={}", time_of_day.as_str()),
            params_note(&params),
            format!("size={}", size_hint.as_str()),
        ];
        debug!(%theme, %layout, size = size_hint.as_str(), "interpreted prompt");

        PromptInterpretation {
            spec: MapSpec { theme, layout, grid, size_hint, time_of_day, params },
            notes,
            normalized,
        }
    }

    fn theme(&self, text: &str) -> Theme {
        if self.dungeon.is_match(text) {
            Theme::Dungeon
        } else if self.forest.is_match(text) {
            Theme::Forest
        } else if self.city.is_match(text) {
            Theme::City
        } else {
            Theme::Generic
        }
    }

    fn time_of_day(&self, text: &str) -> TimeOfDay {
        match (self.day.is_match(text), self.night.is_match(text)) {
            (true, false) => TimeOfDay::Day,
            (false, true) => TimeOfDay::Night,
            _ => TimeOfDay::Unknown,
        }
    }

    fn layout(&self, text: &str, theme: Theme) -> LayoutId {
        let circular = self.circular.is_match(text);
        let square = self.square.is_match(text);
        match theme {
            Theme::Dungeon if square && !circular => LayoutId::DungeonSquareRoom,
            Theme::Dungeon => LayoutId::DungeonCircularRoom,
            Theme::Forest => LayoutId::ForestClearing,
            Theme::City => LayoutId::CityStreet,
            Theme::Generic if circular => LayoutId::DungeonCircularRoom,
            Theme::Generic if square => LayoutId::DungeonSquareRoom,
            Theme::Generic if self.clearing.is_match(text) => LayoutId::ForestClearing,
            Theme::Generic if self.street.is_match(text) => LayoutId::CityStreet,
            Theme::Generic => LayoutId::GenericScatter,
        }
    }

    fn lighting(&self, text: &str, time_of_day: TimeOfDay) -> Lighting {
        match (self.low_light.is_match(text), time_of_day == TimeOfDay::Night) {
            (true, true) => Lighting::Dark,
            (true, false) | (false, true) => Lighting::Dim,
            (false, false) => Lighting::Bright,
        }
    }

    fn size_hint(&self, text: &str) -> SizeHint {
        let medium = self.medium.is_match(text);
        match (self.small.is_match(text), self.large.is_match(text)) {
            (true, false) if !medium => SizeHint::Small,
            (false, true) if !medium => SizeHint::Large,
            _ => SizeHint::Medium,
        }
    }

    fn dungeon_params(&self, text: &str, layout: LayoutId, lighting: Lighting) -> DungeonParams {
        let shape = match layout {
            LayoutId::DungeonSquareRoom => RoomShape::Square,
            _ => RoomShape::Circular,
        };
        let entrances = captured_count(&self.entrance_count, text)
            .map_or(DEFAULT_ENTRANCES, |count| clamp_u8(count, MAX_ENTRANCES));
        let columns = match captured_count(&self.column_count, text) {
            Some(count) => clamp_u8(count, MAX_COLUMNS),
            None if self.column.is_match(text) => IMPLIED_COLUMNS,
            None => 0,
        };
        DungeonParams {
            shape,
            radius: None,
            entrances,
            columns,
            altar: self.altar.is_match(text),
            closed_doors: self.closed_doors.is_match(text),
            lighting,
        }
    }

    fn forest_params(&self, text: &str, lighting: Lighting) -> ForestParams {
        let density = match (self.dense.is_match(text), self.sparse.is_match(text)) {
            (true, false) => Density::Dense,
            (false, true) => Density::Sparse,
            _ => Density::Normal,
        };
        ForestParams { clearing_radius: None, density, lighting }
    }

    fn city_params(&self, text: &str, lighting: Lighting) -> CityParams {
        let orientation = if self.vertical.is_match(text) {
            StreetOrientation::Vertical
        } else {
            StreetOrientation::Horizontal
        };
        let default_width = CityParams::default().street_width;
        let street_width = match captured_count(&self.street_width, text) {
            Some(width) => (width as usize).clamp(1, MAX_STREET_WIDTH),
            None => match (self.narrow_street.is_match(text), self.wide_street.is_match(text)) {
                (true, false) => NARROW_STREET_WIDTH,
                (false, true) => WIDE_STREET_WIDTH,
                _ => default_width,
            },
        };
        CityParams { orientation, street_width, building_depth: None, lighting }
    }
}

/// First number captured by `regex` (group 1), if any.
fn captured_count(regex: &Regex, text: &str) -> Option<u32> {
    regex.captures_iter(text).find_map(|captures| number_value(captures.get(1)?.as_str()))
}

fn clamp_u8(value: u32, max_value: u8) -> u8 {
    u8::try_from(value.min(u32::from(max_value))).unwrap_or(max_value)
}

fn params_note(params: &LayoutParams) -> String {
    match params {
        LayoutParams::Dungeon(dungeon) => format!(
            "entrances={} columns={} altar={} closed_doors={} lighting={}",
            dungeon.entrances,
            dungeon.columns,
            dungeon.altar,
            dungeon.closed_doors,
            dungeon.lighting.as_str()
        ),
        LayoutParams::Forest(forest) => {
            format!("density={} lighting={}", forest.density.as_str(), forest.lighting.as_str())
        }
        LayoutParams::City(city) => format!(
            "street={} width={} lighting={}",
            match city.orientation {
                StreetOrientation::Horizontal => "horizontal",
                StreetOrientation::Vertical => "vertical",
            },
            city.street_width,
            city.lighting.as_str()
        ),
        LayoutParams::Generic(generic) => format!("lighting={}", generic.lighting.as_str()),
    }
}

fn fallback_interpretation(prompt: &str, grid: GridSize) -> PromptInterpretation {
    let spec = MapSpec {
        theme: Theme::Generic,
        layout: LayoutId::GenericScatter,
        grid,
        size_hint: SizeHint::Medium,
        time_of_day: TimeOfDay::Unknown,
        params: LayoutParams::Generic(GenericParams::default()),
    };
    let notes = vec![
        "theme=generic layout=generic_scatter time=unknown".to_string(),
        params_note(&spec.params),
        "size=medium".to_string(),
    ];
    PromptInterpretation { spec, notes, normalized: normalize_prompt(prompt) }
}

/// Lowercases, folds Latin diacritics, turns punctuation into spaces, and
/// collapses whitespace.
pub fn normalize_prompt(prompt: &str) -> String {
    let mut folded = String::with_capacity(prompt.len());
    for ch in prompt.chars().flat_map(char::to_lowercase) {
        match fold_diacritic(ch) {
            Some(replacement) => folded.push_str(replacement),
            None if ch.is_alphanumeric() => folded.push(ch),
            None => folded.push(' '),
        }
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn fold_diacritic(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => "o",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'œ' => "oe",
        'æ' => "ae",
        'ß' => "ss",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpret(prompt: &str) -> PromptInterpretation {
        interpret_prompt(prompt, GridSize::new(12, 8))
    }

    fn dungeon(interpretation: &PromptInterpretation) -> &DungeonParams {
        match &interpretation.spec.params {
            LayoutParams::Dungeon(params) => params,
            other => panic!("expected dungeon params, got {other:?}"),
        }
    }

    #[test]
    fn keyword_tables_compile() {
        assert!(PromptInterpreter::new().is_ok());
    }

    #[test]
    fn normalization_folds_accents_and_punctuation() {
        assert_eq!(normalize_prompt("  Forêt, SOMBRE!! près de l'Autel  "), "foret sombre pres de l autel");
        assert_eq!(normalize_prompt(""), "");
    }

    #[test]
    fn empty_prompt_is_generic_scatter() {
        let interpretation = interpret("");
        assert_eq!(interpretation.spec.theme, Theme::Generic);
        assert_eq!(interpretation.spec.layout, LayoutId::GenericScatter);
        assert_eq!(interpretation.notes[0], "theme=generic layout=generic_scatter time=unknown");
    }

    #[test]
    fn french_dungeon_prompt_extracts_counts() {
        let interpretation = interpret("donjon circulaire avec 2 acces et 4 colonnes");
        assert_eq!(interpretation.spec.theme, Theme::Dungeon);
        assert_eq!(interpretation.spec.layout, LayoutId::DungeonCircularRoom);
        let params = dungeon(&interpretation);
        assert_eq!(params.entrances, 2);
        assert_eq!(params.columns, 4);
    }

    #[test]
    fn number_words_and_accents_are_understood() {
        let interpretation = interpret("Crypte carrée, trois entrées, autel, portes fermées");
        assert_eq!(interpretation.spec.layout, LayoutId::DungeonSquareRoom);
        let params = dungeon(&interpretation);
        assert_eq!(params.entrances, 3);
        assert!(params.altar);
        assert!(params.closed_doors);
    }

    #[test]
    fn counts_are_clamped_and_columns_default_when_unnumbered() {
        let interpretation = interpret("dungeon with 40 doors and pillars");
        let params = dungeon(&interpretation);
        assert_eq!(params.entrances, MAX_ENTRANCES);
        assert_eq!(params.columns, IMPLIED_COLUMNS);

        let interpretation = interpret("dungeon with 30 columns");
        assert_eq!(dungeon(&interpretation).columns, MAX_COLUMNS);
        assert_eq!(dungeon(&interpretation).entrances, DEFAULT_ENTRANCES);
    }

    #[test]
    fn theme_precedence_prefers_dungeon_then_forest() {
        assert_eq!(interpret("a crypt under the forest in the city").spec.theme, Theme::Dungeon);
        assert_eq!(interpret("forest road near town").spec.theme, Theme::Forest);
        assert_eq!(interpret("busy market street").spec.theme, Theme::City);
    }

    #[test]
    fn day_and_night_together_are_unknown() {
        assert_eq!(interpret("forest at night").spec.time_of_day, TimeOfDay::Night);
        assert_eq!(interpret("foret de jour").spec.time_of_day, TimeOfDay::Day);
        assert_eq!(interpret("day and night").spec.time_of_day, TimeOfDay::Unknown);
    }

    #[test]
    fn lighting_combines_low_light_and_night() {
        assert_eq!(interpret("crypt").spec.lighting(), Lighting::Bright);
        assert_eq!(interpret("dark crypt").spec.lighting(), Lighting::Dim);
        assert_eq!(interpret("crypt at night").spec.lighting(), Lighting::Dim);
        assert_eq!(interpret("donjon sombre la nuit").spec.lighting(), Lighting::Dark);
    }

    #[test]
    fn forest_and_city_params_follow_hints() {
        let forest = interpret("dense forest");
        assert_eq!(forest.spec.layout, LayoutId::ForestClearing);
        assert!(matches!(&forest.spec.params, LayoutParams::Forest(p) if p.density == Density::Dense));

        let city = interpret("ruelle verticale");
        assert_eq!(city.spec.layout, LayoutId::CityStreet);
        match &city.spec.params {
            LayoutParams::City(params) => {
                assert_eq!(params.orientation, StreetOrientation::Vertical);
                assert_eq!(params.street_width, NARROW_STREET_WIDTH);
            }
            other => panic!("expected city params, got {other:?}"),
        }

        let avenue = interpret("city street 4 cells wide");
        assert!(matches!(&avenue.spec.params, LayoutParams::City(p) if p.street_width == 4));
    }

    #[test]
    fn generic_theme_takes_any_layout_hint() {
        let interpretation = interpret("a round arena");
        assert_eq!(interpretation.spec.theme, Theme::Generic);
        assert_eq!(interpretation.spec.layout, LayoutId::DungeonCircularRoom);
    }

    #[test]
    fn size_hint_conflicts_resolve_to_medium() {
        assert_eq!(interpret("small cellar").spec.size_hint, SizeHint::Small);
        assert_eq!(interpret("vaste foret").spec.size_hint, SizeHint::Large);
        assert_eq!(interpret("small but huge").spec.size_hint, SizeHint::Medium);
        assert_eq!(interpret("crypt").notes[2], "size=medium");
    }

    #[test]
    fn french_street_width_is_not_a_size_hint() {
        let street = interpret("rue verticale de 4 cases de large");
        assert_eq!(street.spec.size_hint, SizeHint::Medium);
        assert!(matches!(&street.spec.params, LayoutParams::City(p) if p.street_width == 4));
        assert_eq!(interpret("grande rue").spec.size_hint, SizeHint::Large);
    }

    #[test]
    fn notes_are_ordered_theme_params_size() {
        let interpretation = interpret("donjon");
        assert_eq!(interpretation.notes.len(), 3);
        assert!(interpretation.notes[0].starts_with("theme=dungeon layout=dungeon_circular_room"));
        assert!(interpretation.notes[1].starts_with("entrances=2 columns=0"));
    }
}
