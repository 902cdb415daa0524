/// Console rendering of dashboard views
use colored::{Color, ColoredString, Colorize};

use crate::models::{Availability, Category, DashboardView, Hue, Swatch};
use crate::utils::{format_lux, format_reading, format_time_of_day};

const TITLE: &str = "🌱 Plant Monitor";

fn terminal_color(swatch: Swatch) -> Color {
    // Dark shades get the plain color, light ones the bright variant
    let bright = swatch.shade < 500;
    match (swatch.hue, bright) {
        (Hue::Gray, false) => Color::BrightBlack,
        (Hue::Gray, true) => Color::White,
        (Hue::Red, false) => Color::Red,
        (Hue::Red, true) => Color::BrightRed,
        (Hue::Orange, _) => Color::TrueColor {
            r: 234,
            g: 88,
            b: 12,
        },
        (Hue::Yellow, false) => Color::Yellow,
        (Hue::Yellow, true) => Color::BrightYellow,
        (Hue::Green, false) => Color::Green,
        (Hue::Green, true) => Color::BrightGreen,
        (Hue::Cyan, false) => Color::Cyan,
        (Hue::Cyan, true) => Color::BrightCyan,
        (Hue::Blue, false) => Color::Blue,
        (Hue::Blue, true) => Color::BrightBlue,
    }
}

fn availability_badge(availability: Availability) -> ColoredString {
    let text = format!("• {}", availability);
    match availability {
        Availability::Online => text.green().bold(),
        Availability::Offline => text.red().bold(),
        Availability::Checking => text.yellow(),
    }
}

/// Build the text for one dashboard frame
pub fn render_dashboard(view: &DashboardView) -> String {
    let last_update = view
        .last_seen
        .as_ref()
        .map(format_time_of_day)
        .unwrap_or_else(|| "Waiting...".to_string());

    let mut lines = vec![
        format!(
            "{}  {}",
            TITLE.bold(),
            availability_badge(view.availability)
        ),
        format!("Last Update: {}", last_update.dimmed()),
    ];

    for (category, classification) in Category::ALL.iter().zip(view.classifications.iter()) {
        let value = match category {
            Category::Temperature => format_reading(view.reading.temperature),
            Category::Humidity => format_reading(view.reading.humidity),
            Category::SoilMoisture => format_reading(view.reading.soil_moisture),
            Category::Light => format_lux(view.lux, view.max_lux),
        };
        let label = format!("{}{}", classification.severity.marker(), classification.label);

        lines.push(format!(
            "  {:<14} {:>8} {:<4} {}",
            category.title().to_uppercase(),
            value.bold(),
            category.unit(),
            label.color(terminal_color(classification.text)).bold()
        ));
    }

    lines.join("\n")
}
