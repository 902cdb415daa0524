/// Threshold tables that turn sensor values into status tiers
use crate::models::{Category, Classification, Hue, Severity, Swatch, Tier};

/// One step of a ladder: values strictly below `upper` land in `band`
#[derive(Debug, Clone, Copy)]
pub struct Rung {
    pub upper: f64,
    pub band: Classification,
}

/// Ascending thresholds for one category
///
/// Bounds are half-open: a value equal to a rung's `upper` belongs to the
/// next rung, and anything at or above the last bound lands in `ceiling`.
#[derive(Debug, Clone, Copy)]
pub struct Ladder {
    pub rungs: &'static [Rung],
    pub ceiling: Classification,
}

impl Ladder {
    pub fn place(&self, value: f64) -> Classification {
        if value.is_nan() {
            return UNKNOWN;
        }
        self.rungs
            .iter()
            .find(|rung| value < rung.upper)
            .map(|rung| rung.band)
            .unwrap_or(self.ceiling)
    }
}

const fn band(
    tier: Tier,
    label: &'static str,
    severity: Severity,
    hue: Hue,
    text_shade: u16,
    background_hue: Hue,
    background_shade: u16,
) -> Classification {
    Classification {
        tier,
        label,
        severity,
        text: Swatch::new(hue, text_shade),
        background: Swatch::new(background_hue, background_shade),
    }
}

/// Neutral result for values that can't be placed
pub const UNKNOWN: Classification = band(
    Tier::Unknown,
    "Unknown",
    Severity::Unknown,
    Hue::Gray,
    500,
    Hue::Gray,
    100,
);

pub static TEMPERATURE: Ladder = Ladder {
    rungs: &[
        Rung {
            upper: 15.0,
            band: band(Tier::Cold, "Too Cold", Severity::Alert, Hue::Blue, 600, Hue::Blue, 100),
        },
        Rung {
            upper: 20.0,
            band: band(Tier::Cool, "Cool", Severity::Normal, Hue::Cyan, 600, Hue::Cyan, 50),
        },
        Rung {
            upper: 30.0,
            band: band(Tier::Perfect, "Perfect", Severity::Ideal, Hue::Green, 600, Hue::Green, 100),
        },
        Rung {
            upper: 35.0,
            band: band(Tier::Warm, "Warm", Severity::Normal, Hue::Orange, 600, Hue::Orange, 100),
        },
    ],
    ceiling: band(Tier::Hot, "Too Hot", Severity::Alert, Hue::Red, 600, Hue::Red, 100),
};

pub static HUMIDITY: Ladder = Ladder {
    rungs: &[
        Rung {
            upper: 30.0,
            band: band(Tier::Dry, "Too Dry", Severity::Alert, Hue::Red, 600, Hue::Red, 100),
        },
        Rung {
            upper: 50.0,
            band: band(Tier::Moderate, "Moderate", Severity::Normal, Hue::Blue, 500, Hue::Blue, 50),
        },
        Rung {
            upper: 70.0,
            band: band(Tier::Perfect, "Perfect", Severity::Ideal, Hue::Green, 600, Hue::Green, 100),
        },
    ],
    ceiling: band(Tier::Humid, "Too Humid", Severity::Alert, Hue::Cyan, 700, Hue::Cyan, 100),
};

pub static SOIL_MOISTURE: Ladder = Ladder {
    rungs: &[
        Rung {
            upper: 20.0,
            band: band(Tier::BoneDry, "Bone Dry", Severity::Alert, Hue::Red, 700, Hue::Red, 200),
        },
        Rung {
            upper: 40.0,
            band: band(Tier::Dry, "Dry", Severity::Alert, Hue::Orange, 600, Hue::Orange, 100),
        },
        Rung {
            upper: 70.0,
            band: band(Tier::Moist, "Moist", Severity::Ideal, Hue::Green, 600, Hue::Green, 100),
        },
    ],
    ceiling: band(Tier::Wet, "Wet", Severity::Normal, Hue::Blue, 600, Hue::Blue, 100),
};

/// Light thresholds are in lux, not raw ADC counts
pub static LIGHT: Ladder = Ladder {
    rungs: &[
        Rung {
            upper: 200.0,
            band: band(Tier::Dark, "Too Dark", Severity::Alert, Hue::Gray, 600, Hue::Gray, 200),
        },
        Rung {
            upper: 800.0,
            band: band(Tier::Low, "Low Light", Severity::Normal, Hue::Orange, 600, Hue::Orange, 100),
        },
        Rung {
            upper: 1600.0,
            band: band(Tier::Medium, "Medium Light", Severity::Normal, Hue::Yellow, 600, Hue::Yellow, 100),
        },
    ],
    ceiling: band(Tier::High, "High Light", Severity::Ideal, Hue::Green, 600, Hue::Green, 100),
};

pub fn ladder_for(category: Category) -> &'static Ladder {
    match category {
        Category::Temperature => &TEMPERATURE,
        Category::Humidity => &HUMIDITY,
        Category::SoilMoisture => &SOIL_MOISTURE,
        Category::Light => &LIGHT,
    }
}

/// Classify a value for a known category
pub fn classify(category: Category, value: f64) -> Classification {
    ladder_for(category).place(value)
}

/// Classify by category name, falling back to `UNKNOWN` for names we don't track
pub fn classify_named(category: &str, value: f64) -> Classification {
    match category.parse::<Category>() {
        Ok(category) => classify(category, value),
        Err(_) => UNKNOWN,
    }
}
