use ulcerwatch_schema::{SensorKind, Status};

pub const TEMP_LOW_C: f64 = 29.0;
pub const TEMP_HIGH_C: f64 = 32.0;
pub const PRESSURE_LOW: f64 = 1000.0;
pub const PRESSURE_HIGH: f64 = 1800.0;
pub const HEART_RATE_LOW: f64 = 60.0;
pub const HEART_RATE_HIGH: f64 = 120.0;
pub const SPO2_LOW: f64 = 90.0;

/// Maps a sensor value to its severity band.
///
/// Pure and total: any `f64`, including non-finite values, yields a
/// `Status`. Band edges are inclusive on the normal side, so exactly 29.0
/// and 32.0 are `Normal` for temperature, 1000.0 and 1800.0 for pressure.
pub fn classify(kind: SensorKind, value: f64) -> Status {
    if !value.is_finite() {
        return Status::Critical;
    }
    match kind {
        SensorKind::Temperature => {
            if value < TEMP_LOW_C {
                Status::Elevated
            } else if value > TEMP_HIGH_C {
                Status::Critical
            } else {
                Status::Normal
            }
        }
        SensorKind::Pressure => {
            if value < PRESSURE_LOW || value > PRESSURE_HIGH {
                Status::Critical
            } else {
                Status::Normal
            }
        }
        SensorKind::HeartRate => {
            if value < HEART_RATE_LOW || value > HEART_RATE_HIGH {
                Status::Elevated
            } else {
                Status::Normal
            }
        }
        SensorKind::SpO2 => {
            if value < SPO2_LOW {
                Status::Critical
            } else {
                Status::Normal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_bands() {
        assert_eq!(classify(SensorKind::Temperature, 28.9), Status::Elevated);
        assert_eq!(classify(SensorKind::Temperature, 29.0), Status::Normal);
        assert_eq!(classify(SensorKind::Temperature, 31.5), Status::Normal);
        assert_eq!(classify(SensorKind::Temperature, 32.0), Status::Normal);
        assert_eq!(classify(SensorKind::Temperature, 32.1), Status::Critical);
    }

    #[test]
    fn pressure_bands() {
        assert_eq!(classify(SensorKind::Pressure, 999.9), Status::Critical);
        assert_eq!(classify(SensorKind::Pressure, 1000.0), Status::Normal);
        assert_eq!(classify(SensorKind::Pressure, 1800.0), Status::Normal);
        assert_eq!(classify(SensorKind::Pressure, 1800.1), Status::Critical);
    }

    #[test]
    fn heart_rate_bands() {
        assert_eq!(classify(SensorKind::HeartRate, 59.0), Status::Elevated);
        assert_eq!(classify(SensorKind::HeartRate, 60.0), Status::Normal);
        assert_eq!(classify(SensorKind::HeartRate, 120.0), Status::Normal);
        assert_eq!(classify(SensorKind::HeartRate, 121.0), Status::Elevated);
    }

    #[test]
    fn spo2_bands() {
        assert_eq!(classify(SensorKind::SpO2, 89.9), Status::Critical);
        assert_eq!(classify(SensorKind::SpO2, 90.0), Status::Normal);
        assert_eq!(classify(SensorKind::SpO2, 98.0), Status::Normal);
    }

    #[test]
    fn total_over_pathological_inputs() {
        assert_eq!(classify(SensorKind::Temperature, f64::NAN), Status::Critical);
        assert_eq!(classify(SensorKind::Pressure, f64::INFINITY), Status::Critical);
        assert_eq!(
            classify(SensorKind::HeartRate, f64::NEG_INFINITY),
            Status::Critical
        );
        // Absurd but finite values still band.
        assert_eq!(classify(SensorKind::Temperature, -273.15), Status::Elevated);
        assert_eq!(classify(SensorKind::Pressure, 1.0e9), Status::Critical);
    }
}
