//! Level table
//!
//! Static, ordered list of levels. Each level names its candidate pool, quiz
//! mode and timer mode; the board size comes from `layers`.

use serde::{Deserialize, Serialize};

use super::catalog::{CatalogEntry, Continent, Country, CountryCatalog};
use crate::consts::DEFAULT_LAYERS;

/// How a cube is labelled and which key it matches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelMode {
    /// Flag plus country name
    Standard,
    /// Flag only
    Visual,
    /// Capital city name; matches on the capital's continent
    Capital,
    /// Country outline
    Shape,
}

impl LevelMode {
    /// Column-match key for an item in this mode
    pub fn match_key(&self, entry: &CatalogEntry) -> Continent {
        match self {
            LevelMode::Capital => entry.capital_continent(),
            LevelMode::Standard | LevelMode::Visual | LevelMode::Shape => entry.continent,
        }
    }

    /// Label text shown on the cube face (None = flag/outline only)
    pub fn cube_label(&self, entry: &CatalogEntry) -> Option<&'static str> {
        match self {
            LevelMode::Standard => Some(entry.name),
            LevelMode::Capital => Some(entry.capital),
            LevelMode::Visual | LevelMode::Shape => None,
        }
    }
}

/// Timer behaviour for a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimerMode {
    None,
    CountUp,
    Blitz { seconds: f64 },
}

/// How a level's candidate pool is drawn from the catalog
#[derive(Debug, Clone, PartialEq)]
pub enum PoolSpec {
    /// Every country up to and including this tier
    UpToTier(u8),
    /// Exactly one tier
    Tier(u8),
    /// Explicit ISO codes (unresolved codes are dropped at generation)
    Codes(&'static [&'static str]),
}

/// One playable level
#[derive(Debug, Clone)]
pub struct LevelDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub hint: &'static str,
    pub pool: Vec<Country>,
    pub mode: LevelMode,
    pub timer: TimerMode,
    /// Cubes per column
    pub layers: usize,
}

impl LevelDefinition {
    pub fn blitz_seconds(&self) -> Option<f64> {
        match self.timer {
            TimerMode::Blitz { seconds } => Some(seconds),
            _ => None,
        }
    }
}

struct LevelRow {
    id: &'static str,
    title: &'static str,
    subtitle: &'static str,
    hint: &'static str,
    pool: PoolSpec,
    mode: LevelMode,
    timer: TimerMode,
    layers: usize,
}

fn builtin_rows() -> Vec<LevelRow> {
    vec![
        LevelRow {
            id: "warmup",
            title: "Warm-Up",
            subtitle: "Famous flags, no clock",
            hint: "Click a tower to drop your cube in at the bottom and lift its top cube out.",
            pool: PoolSpec::UpToTier(1),
            mode: LevelMode::Standard,
            timer: TimerMode::None,
            layers: 6,
        },
        LevelRow {
            id: "world-tour",
            title: "World Tour",
            subtitle: "Sort every flag onto its continent",
            hint: "Four full towers clear the level.",
            pool: PoolSpec::UpToTier(1),
            mode: LevelMode::Standard,
            timer: TimerMode::None,
            layers: DEFAULT_LAYERS,
        },
        LevelRow {
            id: "stopwatch",
            title: "Against the Clock",
            subtitle: "Same idea, now timed",
            hint: "Your best time is saved per level.",
            pool: PoolSpec::UpToTier(2),
            mode: LevelMode::Standard,
            timer: TimerMode::CountUp,
            layers: DEFAULT_LAYERS,
        },
        LevelRow {
            id: "flags-only",
            title: "Flags Only",
            subtitle: "No names this time",
            hint: "Colours and emblems are all you get.",
            pool: PoolSpec::UpToTier(2),
            mode: LevelMode::Visual,
            timer: TimerMode::CountUp,
            layers: DEFAULT_LAYERS,
        },
        LevelRow {
            id: "capitals",
            title: "Capital Cities",
            subtitle: "Sort cities by the continent they stand on",
            hint: "Moscow is in Europe even though most of Russia is not.",
            pool: PoolSpec::UpToTier(2),
            mode: LevelMode::Capital,
            timer: TimerMode::None,
            layers: DEFAULT_LAYERS,
        },
        LevelRow {
            id: "outlines",
            title: "Outlines",
            subtitle: "Recognise the shape",
            hint: "Islands are the giveaway in Oceania.",
            pool: PoolSpec::UpToTier(1),
            mode: LevelMode::Shape,
            timer: TimerMode::CountUp,
            layers: DEFAULT_LAYERS,
        },
        LevelRow {
            id: "blitz",
            title: "Blitz",
            subtitle: "Three minutes on the clock",
            hint: "Every cube dropped on the wrong continent costs five seconds.",
            pool: PoolSpec::UpToTier(2),
            mode: LevelMode::Standard,
            timer: TimerMode::Blitz { seconds: 180.0 },
            layers: DEFAULT_LAYERS,
        },
        LevelRow {
            id: "deep-cuts",
            title: "Deep Cuts",
            subtitle: "Obscure flags, four minutes",
            hint: "Microstates and island nations, flags only.",
            pool: PoolSpec::Tier(3),
            mode: LevelMode::Visual,
            timer: TimerMode::Blitz { seconds: 240.0 },
            layers: DEFAULT_LAYERS,
        },
    ]
}

/// Ordered, immutable level list
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<LevelDefinition>,
}

impl LevelCatalog {
    /// Resolve the builtin level table against a country catalog
    pub fn builtin(catalog: &CountryCatalog) -> Self {
        let levels = builtin_rows()
            .into_iter()
            .map(|row| LevelDefinition {
                id: row.id,
                title: row.title,
                subtitle: row.subtitle,
                hint: row.hint,
                pool: resolve_pool(catalog, &row.pool),
                mode: row.mode,
                timer: row.timer,
                layers: row.layers,
            })
            .collect();
        Self { levels }
    }

    /// Custom level list (tests, tooling). Must not be empty.
    pub fn from_levels(levels: Vec<LevelDefinition>) -> Option<Self> {
        if levels.is_empty() {
            return None;
        }
        Some(Self { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelDefinition> {
        self.levels.get(index)
    }

    /// Level at `index`, clamped to the first level when out of range
    pub fn level(&self, index: usize) -> &LevelDefinition {
        self.levels.get(index).unwrap_or(&self.levels[0])
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.iter()
    }
}

fn resolve_pool(catalog: &CountryCatalog, spec: &PoolSpec) -> Vec<Country> {
    match spec {
        PoolSpec::UpToTier(tier) => catalog.tier_pool(*tier),
        PoolSpec::Tier(tier) => catalog.tier_only(*tier),
        PoolSpec::Codes(codes) => codes.iter().map(|code| catalog.resolve(code)).collect(),
    }
}
