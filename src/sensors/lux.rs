//! Illuminance estimation from a light-dependent resistor voltage divider
//!
//! The photoresistor sits on the high side of a divider with a fixed resistor
//! to ground, so the ADC count rises with light. The count is turned back into
//! the LDR resistance and the resistance into lux through the calibration's
//! response curve.

/// Upper bound reported when the sensor is saturated
pub const MAX_LUX: u32 = 50_000;

/// Resistance-to-illuminance curve of a photoresistor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LuxResponse {
    /// `lux = reference_lux * (reference_resistance / r_ldr) ^ (1 / gamma)`
    PowerLaw {
        reference_lux: f64,
        reference_resistance: f64,
        gamma: f64,
    },
    /// `lux = lux_per_kohm / (r_ldr / 1000)`
    InverseResistance { lux_per_kohm: f64 },
}

/// Calibration constants for one photoresistor circuit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuxCalibration {
    /// Divider supply voltage in volts
    pub supply_voltage: f64,
    /// ADC count at the supply rail (12-bit converter)
    pub adc_full_scale: f64,
    /// Fixed divider resistor in ohms
    pub fixed_resistance: f64,
    /// Readings below this count are under the detector's resolution
    pub dark_adc: f64,
    /// Readings above this count are treated as saturated
    pub saturation_adc: f64,
    /// Value reported for saturated readings
    pub max_lux: u32,
    pub response: LuxResponse,
}

impl LuxCalibration {
    /// GL55-style LDR with gamma curve, 10 lux at 15 kΩ
    pub const LDR_GAMMA: Self = Self {
        supply_voltage: 3.3,
        adc_full_scale: 4095.0,
        fixed_resistance: 10_000.0,
        dark_adc: 5.0,
        saturation_adc: 4079.0,
        max_lux: MAX_LUX,
        response: LuxResponse::PowerLaw {
            reference_lux: 10.0,
            reference_resistance: 15_000.0,
            gamma: 0.7,
        },
    };

    /// Simplified fit, 500 lux per kΩ^-1
    ///
    /// The dark cutoff is 0.1 V on the divider output (about ADC 124 at 3.3 V).
    /// There is no saturation band below the rail.
    pub const LDR_LINEAR: Self = Self {
        supply_voltage: 3.3,
        adc_full_scale: 4095.0,
        fixed_resistance: 10_000.0,
        dark_adc: 124.1,
        saturation_adc: 4095.0,
        max_lux: MAX_LUX,
        response: LuxResponse::InverseResistance {
            lux_per_kohm: 500.0,
        },
    };

    /// Look up a preset by its configuration name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ldr-gamma" | "gamma" => Some(Self::LDR_GAMMA),
            "ldr-linear" | "linear" => Some(Self::LDR_LINEAR),
            _ => None,
        }
    }

    /// Estimate illuminance in whole lux from a raw ADC count
    ///
    /// Never fails: out-of-range input is clamped to `0..=max_lux` and NaN
    /// reads as dark.
    pub fn estimate_lux(&self, raw_adc: f64) -> u32 {
        if raw_adc.is_nan() || raw_adc < self.dark_adc {
            return 0;
        }
        if raw_adc > self.saturation_adc {
            return self.max_lux;
        }

        let v_out = raw_adc / self.adc_full_scale * self.supply_voltage;
        if v_out <= 0.0 {
            return 0;
        }
        if v_out >= self.supply_voltage {
            return self.max_lux;
        }

        let r_ldr = self.supply_voltage * self.fixed_resistance / v_out - self.fixed_resistance;
        if r_ldr <= 0.0 {
            return self.max_lux;
        }

        let lux = match self.response {
            LuxResponse::PowerLaw {
                reference_lux,
                reference_resistance,
                gamma,
            } => reference_lux * (reference_resistance / r_ldr).powf(1.0 / gamma),
            LuxResponse::InverseResistance { lux_per_kohm } => lux_per_kohm / (r_ldr / 1000.0),
        };

        if !lux.is_finite() {
            return self.max_lux;
        }
        lux.round().clamp(0.0, self.max_lux as f64) as u32
    }
}

impl Default for LuxCalibration {
    fn default() -> Self {
        Self::LDR_GAMMA
    }
}

/// Estimate lux with the default calibration
pub fn estimate_lux(raw_adc: f64) -> u32 {
    LuxCalibration::default().estimate_lux(raw_adc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_resolution_is_dark() {
        for raw in [0.0, 1.0, 2.5, 4.0, 4.999] {
            assert_eq!(estimate_lux(raw), 0, "raw={raw}");
        }
    }

    #[test]
    fn saturated_readings_are_capped() {
        for raw in [4079.001, 4080.0, 4090.0, 4095.0] {
            assert_eq!(estimate_lux(raw), MAX_LUX, "raw={raw}");
        }
    }

    #[test]
    fn out_of_domain_input_is_clamped() {
        assert_eq!(estimate_lux(-12.0), 0);
        assert_eq!(estimate_lux(f64::NAN), 0);
        assert_eq!(estimate_lux(f64::NEG_INFINITY), 0);
        assert_eq!(estimate_lux(f64::INFINITY), MAX_LUX);
        assert_eq!(estimate_lux(10_000.0), MAX_LUX);
        assert_eq!(LuxCalibration::LDR_LINEAR.estimate_lux(10_000.0), MAX_LUX);
    }

    #[test]
    fn both_presets_are_monotonic() {
        for calibration in [LuxCalibration::LDR_GAMMA, LuxCalibration::LDR_LINEAR] {
            let mut previous = 0;
            for raw in 0..=4095 {
                let lux = calibration.estimate_lux(raw as f64);
                assert!(lux >= previous, "{calibration:?} dropped at raw={raw}");
                assert!(lux <= MAX_LUX);
                previous = lux;
            }
        }
    }

    #[test]
    fn mid_scale_reading() {
        // r_ldr ~= 9995 ohm at half scale
        assert_eq!(LuxCalibration::LDR_GAMMA.estimate_lux(2048.0), 18);
        assert_eq!(LuxCalibration::LDR_LINEAR.estimate_lux(2048.0), 50);
    }

    #[test]
    fn gamma_curve_hits_reference_point() {
        // v_out for r_ldr = 15k: 3.3 * 10k / 25k = 1.32 V -> ADC 1638
        let raw = 1.32 / 3.3 * 4095.0;
        assert_eq!(LuxCalibration::LDR_GAMMA.estimate_lux(raw), 10);
    }

    #[test]
    fn linear_preset_dark_cutoff_is_tenth_of_a_volt() {
        let calibration = LuxCalibration::LDR_LINEAR;
        assert_eq!(calibration.estimate_lux(124.0), 0);
        assert!(calibration.estimate_lux(130.0) > 0);
        // Rail reading has zero LDR resistance
        assert_eq!(calibration.estimate_lux(4095.0), MAX_LUX);
    }

    #[test]
    fn presets_by_name() {
        assert_eq!(
            LuxCalibration::from_name("ldr-gamma"),
            Some(LuxCalibration::LDR_GAMMA)
        );
        assert_eq!(
            LuxCalibration::from_name(" LDR-Linear "),
            Some(LuxCalibration::LDR_LINEAR)
        );
        assert_eq!(LuxCalibration::from_name("bh1750"), None);
    }
}
