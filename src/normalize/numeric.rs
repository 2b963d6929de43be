//! Number extraction and length unit conversion for loosely typed values.

use crate::model::PropertyValue;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static NUMBER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:[.,]\d+)*").expect("number token pattern"));

/// Values without a unit whose magnitude exceeds this are read as millimetres.
pub const UNITLESS_MM_THRESHOLD: f64 = 50.0;

/// Finds the first numeric token in `text` and returns its value and byte span.
#[must_use]
pub fn numeric_token(text: &str) -> Option<(f64, Range<usize>)> {
    let m = NUMBER_TOKEN.find(text)?;
    let value = interpret_token(m.as_str())?;
    Some((value, m.range()))
}

/// Parses the first number embedded in `text`, ignoring whitespace.
///
/// `"1,234.5 m³"` reads as 1234.5, `"2,5"` as 2.5 and `"Volume: 3.2"` as 3.2.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    numeric_token(&compact).map(|(value, _)| value)
}

/// Numeric reading of a property value.
#[must_use]
pub fn value_to_number(value: &PropertyValue) -> Option<f64> {
    match value {
        PropertyValue::Number(n) if n.is_finite() => Some(*n),
        PropertyValue::Number(_) => None,
        PropertyValue::Text(s) => parse_number(s),
    }
}

/// Reads a property value as a length in metres.
///
/// Text values use whatever surrounds the number as the unit hint; bare
/// numbers have no hint and go through the magnitude heuristic.
#[must_use]
pub fn value_to_metres(value: &PropertyValue) -> Option<f64> {
    match value {
        PropertyValue::Number(n) if n.is_finite() => {
            Some(LengthUnit::Unspecified.to_metres(*n))
        }
        PropertyValue::Number(_) => None,
        PropertyValue::Text(s) => {
            let (number, unit) = number_with_unit(s)?;
            Some(unit.to_metres(number))
        }
    }
}

/// Reads a property value as a length in millimetres.
///
/// A unit written next to the number is converted; a bare number is taken
/// as millimetres already, with no magnitude heuristic.
#[must_use]
pub fn value_to_millimetres(value: &PropertyValue) -> Option<f64> {
    match value {
        PropertyValue::Number(n) if n.is_finite() => Some(*n),
        PropertyValue::Number(_) => None,
        PropertyValue::Text(s) => {
            let (number, unit) = number_with_unit(s)?;
            Some(unit.to_millimetres(number))
        }
    }
}

fn number_with_unit(text: &str) -> Option<(f64, LengthUnit)> {
    let text = text.trim();
    let (number, span) = numeric_token(text)?;
    let hint = format!("{}{}", &text[..span.start], &text[span.end..]);
    Some((number, LengthUnit::from_hint(&hint)))
}

/// Unit named next to a length value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Millimetre,
    Centimetre,
    Metre,
    Foot,
    Inch,
    Unspecified,
}

impl LengthUnit {
    /// Reads the unit out of the text around a number. Checked in order
    /// mm, cm, m, ft/feet, in.
    #[must_use]
    pub fn from_hint(hint: &str) -> Self {
        let hint = hint.to_lowercase();
        if hint.contains("mm") {
            Self::Millimetre
        } else if hint.contains("cm") {
            Self::Centimetre
        } else if hint.contains('m') {
            Self::Metre
        } else if hint.contains("ft") || hint.contains("feet") {
            Self::Foot
        } else if hint.contains("in") {
            Self::Inch
        } else {
            Self::Unspecified
        }
    }

    /// Converts `value` to metres. Unspecified values above
    /// [`UNITLESS_MM_THRESHOLD`] in magnitude are taken as millimetres.
    #[must_use]
    pub fn to_metres(self, value: f64) -> f64 {
        match self {
            Self::Millimetre => value / 1000.0,
            Self::Centimetre => value / 100.0,
            Self::Metre => value,
            Self::Foot => value * 0.3048,
            Self::Inch => value * 0.0254,
            Self::Unspecified if value.abs() > UNITLESS_MM_THRESHOLD => value / 1000.0,
            Self::Unspecified => value,
        }
    }

    /// Converts `value` to millimetres. Unspecified values are already
    /// millimetres.
    #[must_use]
    pub fn to_millimetres(self, value: f64) -> f64 {
        match self {
            Self::Millimetre | Self::Unspecified => value,
            Self::Centimetre => value * 10.0,
            Self::Metre => value * 1000.0,
            Self::Foot => value * 304.8,
            Self::Inch => value * 25.4,
        }
    }
}

/// Rounds to 3 decimal places for emission.
#[must_use]
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

// The last separator kind present is the decimal mark and the other is digit
// grouping. A lone separator is decimal unless it is a comma followed by
// exactly three digits.
fn interpret_token(token: &str) -> Option<f64> {
    let commas = token.matches(',').count();
    let dots = token.matches('.').count();

    let normalized = match (commas, dots) {
        (0, 0 | 1) => token.to_string(),
        (0, _) => token.replace('.', ""),
        (1, 0) => {
            let after = token.rsplit(',').next().unwrap_or_default();
            if after.len() == 3 {
                token.replace(',', "")
            } else {
                token.replace(',', ".")
            }
        }
        (_, 0) => token.replace(',', ""),
        _ => {
            let last_comma = token.rfind(',').unwrap_or(0);
            let last_dot = token.rfind('.').unwrap_or(0);
            if last_dot > last_comma {
                token.replace(',', "")
            } else {
                token.replace('.', "").replace(',', ".")
            }
        }
    };

    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_first_number_in_text() {
        assert_eq!(parse_number("2.500"), Some(2.5));
        assert_eq!(parse_number("Volume 3.25 m³"), Some(3.25));
        assert_eq!(parse_number("-12"), Some(-12.0));
        assert_eq!(parse_number("n/a"), None);
    }

    #[test]
    fn reads_separators() {
        assert_eq!(parse_number("1,234"), Some(1234.0));
        assert_eq!(parse_number("1,234.5"), Some(1234.5));
        assert_eq!(parse_number("1.234,5"), Some(1234.5));
        assert_eq!(parse_number("2,5"), Some(2.5));
        assert_eq!(parse_number("1 250 mm"), Some(1250.0));
    }

    #[test]
    fn unit_hints_convert_to_metres() {
        assert_eq!(value_to_metres(&"150 mm".into()), Some(0.15));
        assert_eq!(value_to_metres(&"30cm".into()), Some(0.3));
        assert_eq!(value_to_metres(&"3.2 m".into()), Some(3.2));
        assert_eq!(value_to_metres(&"1 ft".into()), Some(0.3048));
        assert_eq!(value_to_metres(&"2 in".into()), Some(0.0508));
    }

    // Unitless magnitudes above 50 are read as millimetres. This is the
    // documented behaviour of the normalizer, kept as-is.
    #[test]
    fn unitless_magnitude_heuristic_is_characterized() {
        assert_eq!(value_to_metres(&PropertyValue::Number(7.0)), Some(7.0));
        assert_eq!(value_to_metres(&PropertyValue::Number(7000.0)), Some(7.0));
        assert_eq!(value_to_metres(&"7000".into()), Some(7.0));
        assert_eq!(value_to_metres(&PropertyValue::Number(50.0)), Some(50.0));
        assert_eq!(value_to_metres(&PropertyValue::Number(51.0)), Some(0.051));
    }

    #[test]
    fn explicit_units_convert_to_millimetres() {
        let mm = |s: &str| value_to_millimetres(&PropertyValue::from(s));
        assert_eq!(mm("0.2 m"), Some(200.0));
        assert_eq!(mm("20 cm"), Some(200.0));
        assert_eq!(mm("200 mm"), Some(200.0));
        assert_eq!(mm("200"), Some(200.0));
        assert_eq!(value_to_millimetres(&PropertyValue::from(7.0)), Some(7.0));
    }

    #[test]
    fn rounds_to_three_places() {
        assert_eq!(round3(2.500_4), 2.5);
        assert_eq!(round3(0.1 + 0.2), 0.3);
    }
}
