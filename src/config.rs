use log::{debug, info};
use std::env;
use url::Url;

use crate::sensors::LuxCalibration;

pub const DEFAULT_SHADOW_URL: &str = "https://api.netpie.io/v2/device/shadow/data";
pub const DEFAULT_CALIBRATION: &str = "ldr-gamma";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub client_id: String,
    pub token: String,
    pub shadow_url: Url,
    pub calibration_name: String,
    pub calibration: LuxCalibration,
}

impl DashboardConfig {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Load environment variables
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, Box<dyn std::error::Error>> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
                _ => Err(format!("{} environment variable not set", key).into()),
            }
        };

        let client_id = required("NETPIE_CLIENT_ID")?;
        let token = required("NETPIE_TOKEN")?;

        let shadow_url = match lookup("NETPIE_SHADOW_URL") {
            Some(raw) if !raw.trim().is_empty() => {
                debug!("Using shadow endpoint override '{}'", raw.trim());
                raw.trim().to_string()
            }
            _ => DEFAULT_SHADOW_URL.to_string(),
        };
        let shadow_url = Url::parse(&shadow_url)
            .map_err(|e| format!("Invalid NETPIE_SHADOW_URL '{}': {}", shadow_url, e))?;

        let calibration_name = lookup("LUX_CALIBRATION")
            .map(|name| name.trim().to_ascii_lowercase())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_CALIBRATION.to_string());
        let calibration = LuxCalibration::from_name(&calibration_name).ok_or_else(|| {
            format!(
                "Unknown LUX_CALIBRATION '{}', expected ldr-gamma or ldr-linear",
                calibration_name
            )
        })?;

        info!(
            "Monitoring device {} via {} ({} calibration)",
            client_id, shadow_url, calibration_name
        );

        Ok(DashboardConfig {
            client_id,
            token,
            shadow_url,
            calibration_name,
            calibration,
        })
    }

    /// Value of the `Authorization` header for device-credential requests
    pub fn authorization_header(&self) -> String {
        format!("Device {}:{}", self.client_id, self.token)
    }
}
