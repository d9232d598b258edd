//! Unit conversion tables
//!
//! Multiplicative factors keyed by lowercase `(from, to)` pairs, with the
//! temperature scales (celsius/fahrenheit/kelvin) special-cased as affine
//! formulas. Lookup is case-insensitive; a missing pair falls back to the
//! reciprocal of the reverse pair before giving up.

use std::str::FromStr;

use thiserror::Error;

/// Decimal places used when formatting converted values.
pub const PRECISION: usize = 4;

/// Errors produced by unit conversion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    /// No conversion defined between the two units
    #[error("cannot convert from {from} to {to}")]
    Unsupported { from: String, to: String },

    /// Free-text request did not match `<value> <from> to <to>`
    #[error("invalid conversion request: {0}")]
    InvalidRequest(String),
}

/// Static multiplicative factors. Both directions are entered explicitly;
/// the reverse-reciprocal fallback covers anything added one-way later.
const FACTORS: &[(&str, &str, f64)] = &[
    // Length
    ("meters", "feet", 3.28084),
    ("feet", "meters", 0.3048),
    ("meters", "inches", 39.3701),
    ("inches", "meters", 0.0254),
    ("kilometers", "miles", 0.621371),
    ("miles", "kilometers", 1.60934),
    // Weight
    ("kg", "pounds", 2.20462),
    ("pounds", "kg", 0.453592),
    ("grams", "ounces", 0.035274),
    ("ounces", "grams", 28.3495),
];

/// A typed unit-conversion request.
///
/// Replaces the ad-hoc `"100 meters to feet"` string splitting: the free
/// text is parsed once at the boundary and everything downstream works
/// with this struct.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub value: f64,
    pub from_unit: String,
    pub to_unit: String,
}

impl ConversionRequest {
    pub fn new(value: f64, from_unit: impl Into<String>, to_unit: impl Into<String>) -> Self {
        ConversionRequest {
            value,
            from_unit: from_unit.into().to_lowercase(),
            to_unit: to_unit.into().to_lowercase(),
        }
    }

    /// Perform the conversion.
    pub fn convert(&self) -> Result<f64, UnitError> {
        convert(self.value, &self.from_unit, &self.to_unit)
    }

    /// Perform the conversion and format the canonical result line.
    pub fn format(&self) -> Result<String, UnitError> {
        let result = self.convert()?;
        Ok(format!(
            "{} {} = {:.prec$} {}",
            self.value,
            self.from_unit,
            result,
            self.to_unit,
            prec = PRECISION
        ))
    }
}

impl FromStr for ConversionRequest {
    type Err = UnitError;

    /// Parse the free-text form `<value> <from_unit> to <to_unit>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        match parts.as_slice() {
            [value, from_unit, kw, to_unit] if kw.eq_ignore_ascii_case("to") => {
                let value: f64 = value.parse().map_err(|_| {
                    UnitError::InvalidRequest(format!("invalid numeric value: {}", parts[0]))
                })?;
                Ok(ConversionRequest::new(value, *from_unit, *to_unit))
            }
            _ => Err(UnitError::InvalidRequest(format!(
                "expected '<value> <from_unit> to <to_unit>', got '{}'",
                s.trim()
            ))),
        }
    }
}

/// Fold abbreviations onto the table's spelled-out unit names.
fn canonical(unit: &str) -> String {
    let unit = unit.to_lowercase();
    match unit.as_str() {
        "km" => "kilometers".to_string(),
        _ => unit,
    }
}

/// Convert `value` from `from_unit` to `to_unit` (case-insensitive).
pub fn convert(value: f64, from_unit: &str, to_unit: &str) -> Result<f64, UnitError> {
    let from = canonical(from_unit);
    let to = canonical(to_unit);

    if from == to {
        return Ok(value);
    }

    if let Some(result) = convert_temperature(value, &from, &to) {
        return Ok(result);
    }

    if let Some(factor) = factor(&from, &to) {
        return Ok(value * factor);
    }

    // One-directional entries are usable backwards via the reciprocal.
    if let Some(factor) = factor(&to, &from) {
        return Ok(value / factor);
    }

    Err(UnitError::Unsupported { from, to })
}

fn factor(from: &str, to: &str) -> Option<f64> {
    FACTORS
        .iter()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|(_, _, factor)| *factor)
}

/// Affine temperature formulas for all directed pairs of the three scales.
fn convert_temperature(value: f64, from: &str, to: &str) -> Option<f64> {
    // Normalize through celsius.
    let celsius = match from {
        "celsius" => value,
        "fahrenheit" => (value - 32.0) * 5.0 / 9.0,
        "kelvin" => value - 273.15,
        _ => return None,
    };
    match to {
        "celsius" => Some(celsius),
        "fahrenheit" => Some(celsius * 9.0 / 5.0 + 32.0),
        "kelvin" => Some(celsius + 273.15),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_temperature_fixed_points() {
        assert!(approx(convert(0.0, "celsius", "fahrenheit").unwrap(), 32.0));
        assert!(approx(convert(100.0, "celsius", "fahrenheit").unwrap(), 212.0));
        assert!(approx(convert(0.0, "celsius", "kelvin").unwrap(), 273.15));
        assert!(approx(convert(32.0, "fahrenheit", "kelvin").unwrap(), 273.15));
    }

    #[test]
    fn test_km_is_an_alias_for_kilometers() {
        assert!(approx(convert(1.0, "km", "kilometers").unwrap(), 1.0));
        assert!(approx(convert(1.0, "KM", "miles").unwrap(), 0.621371));
        assert!(approx(convert(1.0, "miles", "km").unwrap(), 1.60934));
    }

    #[test]
    fn test_case_insensitive_lookup() {
        assert!(approx(
            convert(1.0, "Meters", "FEET").unwrap(),
            3.28084
        ));
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        for (from, to, _) in FACTORS {
            let out = convert(100.0, from, to).unwrap();
            let back = convert(out, to, from).unwrap();
            assert!(
                (back - 100.0).abs() < 0.01,
                "round trip {} -> {} drifted: {}",
                from,
                to,
                back
            );
        }
        // Temperature round trips too.
        let f = convert(37.0, "celsius", "fahrenheit").unwrap();
        assert!(approx(convert(f, "fahrenheit", "celsius").unwrap(), 37.0));
    }

    #[test]
    fn test_unsupported_pair() {
        let err = convert(1.0, "meters", "pounds").unwrap_err();
        assert_eq!(
            err,
            UnitError::Unsupported {
                from: "meters".to_string(),
                to: "pounds".to_string()
            }
        );
    }

    #[test]
    fn test_identity_conversion() {
        assert!(approx(convert(42.0, "meters", "meters").unwrap(), 42.0));
    }

    #[test]
    fn test_free_text_parsing() {
        let req: ConversionRequest = "100 meters to feet".parse().unwrap();
        assert_eq!(req, ConversionRequest::new(100.0, "meters", "feet"));
        assert!(approx(req.convert().unwrap(), 328.084));

        assert!(matches!(
            "100 meters feet".parse::<ConversionRequest>(),
            Err(UnitError::InvalidRequest(_))
        ));
        assert!(matches!(
            "many meters to feet".parse::<ConversionRequest>(),
            Err(UnitError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_formatting_precision() {
        let line = ConversionRequest::new(0.0, "celsius", "fahrenheit")
            .format()
            .unwrap();
        assert_eq!(line, "0 celsius = 32.0000 fahrenheit");
    }
}
