/// Full scale of a 16-bit raw value.
const FULL_SCALE: f32 = 65535.0;

/// Converts a raw temperature value to degrees Celsius.
pub fn to_celsius(raw: u16) -> f32 {
    175.0 * (raw as f32 / FULL_SCALE) - 45.0
}

/// Converts a raw temperature value to degrees Fahrenheit.
pub fn to_fahrenheit(raw: u16) -> f32 {
    to_celsius(raw) * 9.0 / 5.0 + 32.0
}

/// Converts a raw humidity value to relative humidity in percent.
pub fn to_percentage(raw: u16) -> f32 {
    100.0 * (raw as f32 / FULL_SCALE)
}

/// Raw values returned by one successful measurement.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawMeasurement {
    /// Raw temperature word.
    pub temperature: u16,
    /// Raw relative humidity word.
    pub humidity: u16,
}

impl RawMeasurement {
    /// Temperature in degrees Celsius.
    pub fn celsius(&self) -> f32 {
        to_celsius(self.temperature)
    }

    /// Temperature in degrees Fahrenheit.
    pub fn fahrenheit(&self) -> f32 {
        to_fahrenheit(self.temperature)
    }

    /// Relative humidity in percent.
    pub fn relative_humidity(&self) -> f32 {
        to_percentage(self.humidity)
    }

    /// Converts both values to physical units.
    pub fn to_reading(&self) -> Reading {
        Reading {
            temperature: self.celsius(),
            relative_humidity: self.relative_humidity(),
        }
    }
}

/// Measurement converted to physical units.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub relative_humidity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celsius_range() {
        assert_eq!(to_celsius(0), -45.0);
        assert!((to_celsius(u16::MAX) - 130.0).abs() < 1e-4);
    }

    #[test]
    fn test_percentage_range() {
        assert_eq!(to_percentage(0), 0.0);
        assert!((to_percentage(u16::MAX) - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_fahrenheit_matches_celsius() {
        for raw in (0..=u16::MAX).step_by(97).chain([u16::MAX]) {
            assert_eq!(to_fahrenheit(raw), to_celsius(raw) * 9.0 / 5.0 + 32.0);
        }
    }

    #[test]
    fn test_fahrenheit_range() {
        assert_eq!(to_fahrenheit(0), -49.0);
        assert!((to_fahrenheit(u16::MAX) - 266.0).abs() < 1e-3);
    }

    #[test]
    fn test_reading() {
        let raw = RawMeasurement {
            temperature: 0x668A,
            humidity: 0x5A3C,
        };
        let reading = raw.to_reading();

        // 0x668A = 26250 -> 175 * 26250 / 65535 - 45 ~= 25.096C
        assert!((reading.temperature - 25.096).abs() < 0.01);
        // 0x5A3C = 23100 -> 100 * 23100 / 65535 ~= 35.25%
        assert!((reading.relative_humidity - 35.248).abs() < 0.01);
        assert_eq!(reading.temperature, raw.celsius());
        assert_eq!(reading.relative_humidity, raw.relative_humidity());
    }
}
