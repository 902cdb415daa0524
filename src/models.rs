use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use time::OffsetDateTime;

/// Raw values from one shadow document
///
/// Units: °C, % RH, % volumetric water content, 12-bit ADC count.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShadowReading {
    pub temperature: f64,
    pub humidity: f64,
    pub soil_moisture: f64,
    pub raw_light: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Temperature,
    Humidity,
    SoilMoisture,
    Light,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Temperature,
        Category::Humidity,
        Category::SoilMoisture,
        Category::Light,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Category::Temperature => "Temperature",
            Category::Humidity => "Humidity",
            Category::SoilMoisture => "Soil Moisture",
            Category::Light => "Light",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Category::Temperature => "°C",
            Category::Humidity | Category::SoilMoisture => "%",
            Category::Light => "LUX",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sensor category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "temperature" | "temp" => Ok(Category::Temperature),
            "humidity" | "humid" => Ok(Category::Humidity),
            "soil" | "soilMoisture" | "soil_moisture" => Ok(Category::SoilMoisture),
            "light" | "lux" => Ok(Category::Light),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Named classification bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Cold,
    Cool,
    Perfect,
    Warm,
    Hot,
    Dry,
    Moderate,
    Humid,
    BoneDry,
    Moist,
    Wet,
    Dark,
    Low,
    Medium,
    High,
    Unknown,
}

/// How a tier should be flagged to the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Out of the comfortable range
    Alert,
    /// Target range
    Ideal,
    Normal,
    Unknown,
}

impl Severity {
    pub fn marker(self) -> &'static str {
        match self {
            Severity::Alert => "⚠️ ",
            Severity::Ideal => "✅ ",
            Severity::Normal | Severity::Unknown => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hue {
    Gray,
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
}

/// Palette entry, a hue plus a 50..900 shade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub hue: Hue,
    pub shade: u16,
}

impl Swatch {
    pub const fn new(hue: Hue, shade: u16) -> Self {
        Self { hue, shade }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub tier: Tier,
    pub label: &'static str,
    pub severity: Severity,
    pub text: Swatch,
    pub background: Swatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Availability {
    #[default]
    Checking,
    Online,
    Offline,
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Availability::Checking => "Checking...",
            Availability::Online => "Online",
            Availability::Offline => "Offline",
        };
        f.write_str(text)
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub reading: ShadowReading,
    pub lux: u32,
    /// Saturation cap of the calibration that produced `lux`
    pub max_lux: u32,
    /// Ordered as `Category::ALL`
    pub classifications: [Classification; 4],
    pub availability: Availability,
    pub last_seen: Option<OffsetDateTime>,
}
