/// The poller's single "current reading" slot
use log::warn;
use time::OffsetDateTime;

use crate::models::{Availability, Category, DashboardView, ShadowReading};
use crate::sensors::{classify, LuxCalibration};
use crate::shadow::client::{ShadowError, ShadowFields};
use crate::utils::now_local_or_utc;

/// Last-known reading plus device availability
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub reading: ShadowReading,
    pub availability: Availability,
    pub last_seen: Option<OffsetDateTime>,
}

impl DashboardState {
    /// Apply the outcome of one poll
    ///
    /// A failed poll only flips availability; the reading stays at its
    /// last-known value.
    pub fn record(&mut self, outcome: Result<ShadowFields, ShadowError>) {
        match outcome {
            Ok(fields) => {
                self.reading = fields.merge_into(&self.reading);
                self.availability = Availability::Online;
                self.last_seen = Some(now_local_or_utc());
            }
            Err(e) => {
                warn!("Shadow poll failed, device offline: {}", e);
                self.availability = Availability::Offline;
            }
        }
    }

    /// Derive lux and classifications for rendering
    pub fn view(&self, calibration: &LuxCalibration) -> DashboardView {
        let reading = self.reading;
        let lux = calibration.estimate_lux(reading.raw_light);

        let classifications = Category::ALL.map(|category| {
            let value = match category {
                Category::Temperature => reading.temperature,
                Category::Humidity => reading.humidity,
                Category::SoilMoisture => reading.soil_moisture,
                Category::Light => lux as f64,
            };
            classify(category, value)
        });

        DashboardView {
            reading,
            lux,
            max_lux: calibration.max_lux,
            classifications,
            availability: self.availability,
            last_seen: self.last_seen,
        }
    }
}
