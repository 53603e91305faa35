//! Built-in sample catalog covering every theme.

use crate::types::{DoorState, Theme};

use super::{
    Catalog, DecorationType, EnemyStats, EnemyType, Extensions, FootprintVariant, MapPattern,
    ObstacleCategory, ObstacleType, PatternAnchor, PatternConstraints, PatternElement,
    PatternVariant, WallBehavior, WallType,
};

use Theme::{City, Dungeon, Forest, Generic};

pub(super) fn catalog() -> Catalog {
    Catalog {
        obstacles: obstacles(),
        walls: walls(),
        decorations: decorations(),
        enemies: enemies(),
        patterns: patterns(),
    }
}

fn obstacles() -> Vec<ObstacleType> {
    use ObstacleCategory::{Container, Debris, Furniture, Nature, Religious, Structure, Urban};

    vec![
        ObstacleType::new("barrel-wood", "Wooden barrel", Container, 10)
            .weight(4)
            .tags(&["barrel", "tonneau", "storage"]),
        ObstacleType::new("crate-wood", "Wooden crate", Container, 12)
            .weight(4)
            .themes(&[Dungeon, City, Generic])
            .tags(&["crate", "caisse", "storage"]),
        ObstacleType::new("column-stone", "Stone column", Structure, 40)
            .opaque()
            .weight(0)
            .themes(&[Dungeon])
            .tags(&["column", "colonne", "pillar"]),
        ObstacleType::new("altar-stone", "Stone altar", Religious, 50)
            .weight(0)
            .themes(&[Dungeon])
            .tags(&["altar", "autel", "shrine"])
            .variants(vec![
                FootprintVariant::single("single"),
                FootprintVariant::shaped("wide", &[(0, 0), (1, 0)]),
            ]),
        ObstacleType::new("sarcophagus", "Sarcophagus", Religious, 35)
            .themes(&[Dungeon])
            .tags(&["tomb", "crypt", "sarcophage"])
            .variants(vec![FootprintVariant::shaped("long", &[(0, 0), (0, 1)])]),
        ObstacleType::new("rubble", "Rubble", Debris, 8)
            .passable()
            .weight(3)
            .themes(&[Dungeon, City, Generic])
            .tags(&["rubble", "debris", "gravats"]),
        ObstacleType::new("tree-oak", "Oak tree", Nature, 30)
            .opaque()
            .weight(4)
            .themes(&[Forest])
            .tags(&["tree", "arbre", "oak", "chene"])
            .variants(vec![
                FootprintVariant::single("young"),
                FootprintVariant::shaped("ancient", &[(0, 0), (1, 0), (0, 1), (1, 1)]),
            ]),
        ObstacleType::new("tree-pine", "Pine tree", Nature, 25)
            .opaque()
            .weight(3)
            .themes(&[Forest])
            .tags(&["tree", "arbre", "pine", "sapin"]),
        ObstacleType::new("bush", "Bush", Nature, 5)
            .passable()
            .opaque()
            .weight(3)
            .themes(&[Forest, Generic])
            .tags(&["bush", "buisson", "undergrowth"]),
        ObstacleType::new("rock-boulder", "Boulder", Nature, 60)
            .weight(2)
            .themes(&[Forest, Generic, Dungeon])
            .tags(&["rock", "rocher", "boulder"])
            .variants(vec![
                FootprintVariant::single("small"),
                FootprintVariant::shaped("large", &[(0, 0), (1, 0)]),
            ]),
        ObstacleType::new("fallen-log", "Fallen log", Nature, 20)
            .weight(1)
            .themes(&[Forest])
            .tags(&["log", "tronc"])
            .variants(vec![FootprintVariant::shaped("long", &[(0, 0), (1, 0), (2, 0)])]),
        ObstacleType::new("campfire", "Campfire", Nature, 5)
            .weight(0)
            .themes(&[Forest, Generic])
            .tags(&["fire", "feu", "camp"]),
        ObstacleType::new("table-wood", "Wooden table", Furniture, 15)
            .weight(2)
            .themes(&[City, Dungeon, Generic])
            .tags(&["table", "tavern", "taverne"])
            .variants(vec![FootprintVariant::shaped("long", &[(0, 0), (1, 0)])]),
        ObstacleType::new("cart", "Cart", Urban, 20)
            .weight(1)
            .themes(&[City, Generic])
            .tags(&["cart", "charrette", "wagon"])
            .variants(vec![FootprintVariant::shaped("long", &[(0, 0), (1, 0)])]),
        ObstacleType::new("market-stall", "Market stall", Urban, 15)
            .weight(2)
            .themes(&[City])
            .tags(&["market", "marche", "stall", "etal"])
            .variants(vec![FootprintVariant::shaped("long", &[(0, 0), (1, 0)])]),
        ObstacleType::new("lamp-post", "Lamp post", Urban, 25)
            .weight(2)
            .themes(&[City])
            .tags(&["lamp", "lampadaire", "light"]),
        ObstacleType::new("fountain", "Fountain", Urban, 80)
            .weight(0)
            .themes(&[City])
            .tags(&["fountain", "fontaine"])
            .variants(vec![FootprintVariant::shaped("basin", &[(0, 0), (1, 0), (0, 1), (1, 1)])]),
    ]
}

fn walls() -> Vec<WallType> {
    vec![
        WallType::new("wall-stone", "Stone wall", WallBehavior::Solid, "stone").themes(&[Dungeon]),
        WallType::new("wall-brick", "Brick wall", WallBehavior::Solid, "brick")
            .themes(&[City, Generic]),
        WallType::new("palisade", "Wooden palisade", WallBehavior::Breakable, "wood-stakes")
            .themes(&[Forest, Generic]),
        WallType::new("door-wood", "Wooden door", WallBehavior::Door, "wood"),
        WallType::new("window-glass", "Glass window", WallBehavior::Window, "glass")
            .themes(&[City]),
    ]
}

fn decorations() -> Vec<DecorationType> {
    vec![
        DecorationType::new("torch-sconce", "Wall torch", &[Dungeon, City]),
        DecorationType::new("bones", "Scattered bones", &[Dungeon]),
        DecorationType::new("rug", "Worn rug", &[Dungeon, City]),
        DecorationType::new("banner", "Banner", &[Dungeon, City]),
        DecorationType::new("moss", "Moss patch", &[Forest, Dungeon]),
        DecorationType::new("mushrooms", "Mushrooms", &[Forest]),
        DecorationType::new("flowers", "Wild flowers", &[Forest, Generic]),
        DecorationType::new("puddle", "Puddle", &[City, Generic]),
        DecorationType::new("hay", "Hay pile", &[Generic]),
    ]
}

fn enemy(id: &str, label: &str, stats: (u32, u32, u32, i32), themes: &[Theme]) -> EnemyType {
    let (max_hp, armor_class, speed, attack_bonus) = stats;
    EnemyType {
        id: id.to_string(),
        label: label.to_string(),
        stats: EnemyStats { max_hp, armor_class, speed, attack_bonus },
        themes: themes.to_vec(),
        extensions: Extensions::new(),
    }
}

fn enemies() -> Vec<EnemyType> {
    vec![
        enemy("goblin", "Goblin", (7, 15, 30, 4), &[Dungeon, Forest, Generic]),
        enemy("skeleton", "Skeleton", (13, 13, 30, 4), &[Dungeon]),
        enemy("orc", "Orc", (15, 13, 30, 5), &[Dungeon, Forest, Generic]),
        enemy("wolf", "Wolf", (11, 13, 40, 4), &[Forest]),
        enemy("bandit", "Bandit", (11, 12, 30, 3), &[City, Forest, Generic]),
        enemy("giant-spider", "Giant spider", (26, 14, 30, 5), &[Dungeon, Forest]),
        enemy("cultist", "Cultist", (9, 12, 30, 3), &[Dungeon, City]),
    ]
}

fn pattern(
    id: &str,
    label: &str,
    tags: &[&str],
    themes: &[Theme],
    size: (u32, u32),
    elements: Vec<PatternElement>,
) -> MapPattern {
    MapPattern {
        id: id.to_string(),
        label: label.to_string(),
        tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
        themes: themes.to_vec(),
        width: size.0,
        height: size.1,
        anchor: PatternAnchor::TopLeft,
        elements,
        variants: Vec::new(),
        constraints: PatternConstraints { border_margin: 1, needs_clear_area: true },
    }
}

fn with_variant(mut pattern: MapPattern, id: &str, elements: Vec<PatternElement>) -> MapPattern {
    pattern.variants.push(PatternVariant { id: id.to_string(), elements });
    pattern
}

fn centered(mut pattern: MapPattern) -> MapPattern {
    pattern.anchor = PatternAnchor::Center;
    pattern
}

fn patterns() -> Vec<MapPattern> {
    let o = PatternElement::obstacle;
    let w = PatternElement::wall;
    let d = PatternElement::decoration;

    let crypt = with_variant(
        pattern(
            "crypt-sarcophagi",
            "Crypt sarcophagi",
            &["crypt", "crypte", "tomb", "tombeau", "undead", "mort"],
            &[Dungeon],
            (3, 2),
            vec![o("sarcophagus", 0, 0), o("sarcophagus", 2, 0), d("bones", 1, 1)],
        ),
        "candlelit",
        vec![o("sarcophagus", 0, 0), o("sarcophagus", 2, 0), d("torch-sconce", 1, 0)],
    );

    let ritual = centered(pattern(
        "ritual-circle",
        "Ritual circle",
        &["ritual", "rituel", "cult", "culte", "altar", "autel", "shrine"],
        &[Dungeon],
        (3, 3),
        vec![
            o("altar-stone", 1, 1),
            d("torch-sconce", 0, 0),
            d("torch-sconce", 2, 0),
            d("torch-sconce", 0, 2),
            d("torch-sconce", 2, 2),
        ],
    ));

    let storage = pattern(
        "storage-corner",
        "Storage corner",
        &["storage", "reserve", "cellar", "cellier", "tonneaux", "barrels"],
        &[Dungeon, City, Generic],
        (2, 2),
        vec![o("barrel-wood", 0, 0), o("crate-wood", 1, 0), o("barrel-wood", 0, 1)],
    );

    let collapse = pattern(
        "collapsed-ceiling",
        "Collapsed ceiling",
        &["ruin", "ruine", "ruins", "collapsed", "effondre", "debris"],
        &[Dungeon],
        (3, 2),
        vec![
            o("rubble", 0, 0),
            o("rubble", 1, 0),
            o("rubble", 1, 1),
            o("rock-boulder", 2, 1).variant("small"),
        ],
    );

    let campsite = centered(pattern(
        "campsite",
        "Campsite",
        &["camp", "campement", "campfire", "feu", "bandit", "bandits"],
        &[Forest, Generic],
        (3, 3),
        vec![o("campfire", 1, 1), o("fallen-log", 0, 2), d("hay", 0, 0)],
    ));

    let boulders = pattern(
        "boulder-cluster",
        "Boulder cluster",
        &["rock", "rocher", "rocky", "rocheux", "boulder", "pierre"],
        &[Forest, Generic],
        (2, 2),
        vec![o("rock-boulder", 0, 0), o("bush", 1, 0), o("rock-boulder", 1, 1)],
    );

    let fairy_ring = centered(pattern(
        "mushroom-ring",
        "Mushroom ring",
        &["fairy", "fee", "fees", "mushroom", "champignon", "magic", "magique"],
        &[Forest],
        (3, 3),
        vec![
            d("mushrooms", 1, 0),
            d("mushrooms", 0, 1),
            d("mushrooms", 2, 1),
            d("mushrooms", 1, 2),
        ],
    ));

    let house = with_variant(
        pattern(
            "small-house",
            "Small house",
            &["house", "maison", "home", "residential"],
            &[City],
            (4, 3),
            vec![
                w("wall-brick", 0, 0),
                w("wall-brick", 1, 0),
                w("wall-brick", 2, 0),
                w("wall-brick", 3, 0),
                w("wall-brick", 0, 1),
                w("wall-brick", 3, 1),
                w("wall-brick", 0, 2),
                w("wall-brick", 1, 2),
                w("door-wood", 2, 2).door(DoorState::Closed),
                w("wall-brick", 3, 2),
                o("table-wood", 1, 1),
            ],
        ),
        "shopfront",
        vec![
            w("wall-brick", 0, 0),
            w("window-glass", 1, 0),
            w("window-glass", 2, 0),
            w("wall-brick", 3, 0),
            w("wall-brick", 0, 1),
            w("wall-brick", 3, 1),
            w("wall-brick", 0, 2),
            w("door-wood", 1, 2).door(DoorState::Open),
            w("wall-brick", 2, 2),
            w("wall-brick", 3, 2),
            o("crate-wood", 1, 1),
            o("barrel-wood", 2, 1),
        ],
    );

    let yard = pattern(
        "walled-yard",
        "Walled yard",
        &["yard", "cour", "warehouse", "entrepot"],
        &[City],
        (3, 3),
        vec![
            w("wall-brick", 0, 0),
            w("wall-brick", 1, 0),
            w("wall-brick", 2, 0),
            w("wall-brick", 0, 1),
            w("wall-brick", 0, 2),
            o("crate-wood", 1, 1),
            o("cart", 1, 2),
        ],
    );

    let market = pattern(
        "market-corner",
        "Market corner",
        &["market", "marche", "shop", "merchant", "marchand"],
        &[City],
        (3, 2),
        vec![o("market-stall", 0, 0), o("crate-wood", 2, 0), o("barrel-wood", 0, 1), d("banner", 2, 1)],
    );

    let plaza = centered(pattern(
        "fountain-plaza",
        "Fountain plaza",
        &["square", "place", "plaza", "fountain", "fontaine"],
        &[City],
        (4, 4),
        vec![o("fountain", 1, 1), o("lamp-post", 0, 0), o("lamp-post", 3, 3), d("puddle", 3, 0)],
    ));

    let cache = pattern(
        "supply-cache",
        "Supply cache",
        &["supplies", "supply", "cache", "ravitaillement"],
        &[Generic],
        (2, 2),
        vec![o("crate-wood", 0, 0), o("barrel-wood", 1, 0), o("crate-wood", 1, 1)],
    );

    let standing_stones = centered(pattern(
        "standing-stones",
        "Standing stones",
        &["stones", "menhir", "druid", "druide", "cercle", "circle"],
        &[Generic, Forest],
        (3, 3),
        vec![
            o("rock-boulder", 1, 0),
            o("rock-boulder", 0, 1),
            o("rock-boulder", 2, 1),
            o("rock-boulder", 1, 2),
            d("flowers", 1, 1),
        ],
    ));

    vec![
        crypt,
        ritual,
        storage,
        collapse,
        campsite,
        boulders,
        fairy_ring,
        house,
        yard,
        market,
        plaza,
        cache,
        standing_stones,
    ]
}
