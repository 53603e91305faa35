//! Keyword tables matched against normalized prompt text (lowercase, no
//! diacritics, single spaces). French and English vocabulary side by side.

pub(super) const DUNGEON_PATTERN: &str = r"\b(donjons?|dungeons?|cryptes?|crypts?|catacombes?|catacombs?|cachots?|souterrains?|caveaux?|tombeaux?|tombs?|tombes?|oubliettes?|cellars?|celliers?|vaults?)\b";
pub(super) const FOREST_PATTERN: &str = r"\b(forets?|forests?|bois|woods?|woodland|clairieres?|clearings?|glades?|bosquets?|groves?|jungles?|sylves?)\b";
pub(super) const CITY_PATTERN: &str = r"\b(villes?|city|cities|towns?|cites?|rues?|streets?|ruelles?|alleys?|avenues?|boulevards?|villages?|marches?|markets?|quartiers?|districts?)\b";

pub(super) const DAY_PATTERN: &str = r"\b(jour|journee|day|daytime|daylight|midi|noon|matin|morning|ensoleillee?|sunny|aube|dawn)\b";
pub(super) const NIGHT_PATTERN: &str = r"\b(nuit|night|nighttime|nocturne|nocturnal|minuit|midnight|soir|soiree|evening|crepuscule|dusk)\b";

pub(super) const CIRCULAR_PATTERN: &str = r"\b(circulaires?|circular|ronde?s?|round|cercles?|circles?)\b";
pub(super) const SQUARE_PATTERN: &str = r"\b(carree?s?|squares?|rectangulaires?|rectangular|rectangles?)\b";
pub(super) const CLEARING_PATTERN: &str = r"\b(clairieres?|clearings?|glades?)\b";
pub(super) const STREET_PATTERN: &str = r"\b(rues?|streets?|ruelles?|alleys?|avenues?|boulevards?|roads?|routes?)\b";

/// Number word alternation shared by the counted-noun patterns.
const NUMBER: &str = r"(\d+|zero|une?|deux|trois|quatre|cinq|six|sept|huit|neuf|dix|one|two|three|four|five|seven|eight|nine|ten|aucune?|no|sans)";

pub(super) fn entrance_count_pattern() -> String {
    format!(r"\b{NUMBER}\s+(?:[a-z]+\s+)?(entrees?|entrances?|acces|portes?|doors?|sorties?|exits?|issues?|ouvertures?|openings?)\b")
}

pub(super) fn column_count_pattern() -> String {
    format!(r"\b{NUMBER}\s+(?:[a-z]+\s+)?(colonnes?|columns?|piliers?|pillars?)\b")
}

pub(super) const COLUMN_PATTERN: &str = r"\b(colonnes?|columns?|piliers?|pillars?|colonnades?)\b";

pub(super) const ALTAR_PATTERN: &str = r"\b(autels?|altars?|shrines?)\b";
pub(super) const LOW_LIGHT_PATTERN: &str = r"\b(sombres?|obscure?s?|obscurite|dark|darkness|tenebres?|tenebreuse?|penombre|dim|gloomy|lugubres?|unlit|faible lumiere|low light)\b";
pub(super) const CLOSED_DOORS_PATTERN: &str = r"\b(fermees?|closed|locked|verrouillees?|barricadees?|barred)\b";

pub(super) const DENSE_PATTERN: &str = r"\b(denses?|epaisses?|epais|touffues?|thick|overgrown|profonde?s?|deep)\b";
pub(super) const SPARSE_PATTERN: &str = r"\b(clairsemee?s?|sparse|epars|eparse?s?|thin|scattered)\b";

pub(super) const VERTICAL_PATTERN: &str = r"\b(verticale?s?|vertical|nord sud|north south)\b";
pub(super) const WIDE_STREET_PATTERN: &str = r"\b(wide|avenues?|boulevards?)\b";
pub(super) const NARROW_STREET_PATTERN: &str = r"\b(etroites?|narrow|ruelles?|alleys?)\b";

pub(super) fn street_width_pattern() -> String {
    format!(r"\b{NUMBER}\s+(?:cases?|cells?|squares?|tiles?)\s+(?:de\s+)?(?:large|largeur|wide|width)\b")
}

pub(super) const SMALL_PATTERN: &str = r"\b(petite?s?|small|tiny|minuscules?|cramped|exigue?s?)\b";
pub(super) const MEDIUM_PATTERN: &str = r"\b(moyenne?s?|medium|average)\b";
pub(super) const LARGE_PATTERN: &str = r"\b(grande?s?|big|huge|vastes?|immenses?|enormes?|spacious|spacieuse?s?)\b";

/// Value of a digit string or number word captured by [`NUMBER`].
pub(super) fn number_value(token: &str) -> Option<u32> {
    if let Ok(value) = token.parse::<u32>() {
        return Some(value);
    }
    let value = match token {
        "zero" | "aucun" | "aucune" | "no" | "sans" => 0,
        "un" | "une" | "one" => 1,
        "deux" | "two" => 2,
        "trois" | "three" => 3,
        "quatre" | "four" => 4,
        "cinq" | "five" => 5,
        "six" => 6,
        "sept" | "seven" => 7,
        "huit" | "eight" => 8,
        "neuf" | "nine" => 9,
        "dix" | "ten" => 10,
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_words_cover_zero_to_ten_in_both_languages() {
        assert_eq!(number_value("quatre"), Some(4));
        assert_eq!(number_value("four"), Some(4));
        assert_eq!(number_value("dix"), Some(10));
        assert_eq!(number_value("sans"), Some(0));
        assert_eq!(number_value("12"), Some(12));
        assert_eq!(number_value("beaucoup"), None);
    }
}
