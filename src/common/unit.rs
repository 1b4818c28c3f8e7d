//! Unit conversion utilities.
//!
//! Office lengths arrive as strings such as `"12pt"` or `"0.5cm"`; HTML output
//! wants pixels for font sizes. Only the units ODF actually writes are
//! supported.

use crate::common::{Error, Result};
use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

/// Default screen resolution used for pt→px conversion
pub const DEFAULT_DPI: u32 = 96;

/// Supported length units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    /// Millimeter
    Millimeter,
    /// Centimeter
    Centimeter,
    /// Point (1/72 inch)
    Point,
    /// Pica (1/6 inch)
    Pica,
    /// Inch
    Inch,
    /// Pixel
    Pixel,
}

impl LengthUnit {
    /// Get the unit abbreviation
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Point => "pt",
            Self::Pica => "pc",
            Self::Inch => "in",
            Self::Pixel => "px",
        }
    }

    fn from_str_internal(s: &str) -> Option<Self> {
        match s {
            "mm" => Some(Self::Millimeter),
            "cm" => Some(Self::Centimeter),
            "pt" => Some(Self::Point),
            "pc" => Some(Self::Pica),
            "in" | "inch" => Some(Self::Inch),
            "px" => Some(Self::Pixel),
            _ => None,
        }
    }
}

impl FromStr for LengthUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_internal(s)
            .ok_or_else(|| Error::InvalidFormat(format!("Unknown length unit '{}'", s)))
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Length value with unit
///
/// # Examples
///
/// ```
/// use odtpara::common::unit::{Length, LengthUnit};
///
/// let length = "12pt".parse::<Length>().unwrap();
/// assert_eq!(length.unit(), LengthUnit::Point);
/// assert_eq!(length.to_pixels(96), 16.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    value: f64,
    unit: LengthUnit,
}

impl Length {
    /// Create a new length measurement
    #[inline]
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    /// Get the numeric value
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Get the unit
    #[inline]
    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// Convert to pixels at the given DPI
    pub fn to_pixels(&self, dpi: u32) -> f64 {
        let dpi = dpi as f64;
        match self.unit {
            LengthUnit::Pixel => self.value,
            LengthUnit::Inch => self.value * dpi,
            LengthUnit::Centimeter => self.value / 2.54 * dpi,
            LengthUnit::Millimeter => self.value / 25.4 * dpi,
            LengthUnit::Point => self.value / 72.0 * dpi,
            LengthUnit::Pica => self.value / 6.0 * dpi,
        }
    }
}

impl FromStr for Length {
    type Err = Error;

    /// Parse length from string (e.g., "2.5cm", "10pt"). A unit is required.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(s.len());
        let (digits, unit) = s.split_at(split);

        if digits.is_empty() {
            return Err(Error::InvalidFormat(format!(
                "No numeric value found in '{}'",
                s
            )));
        }

        let value: f64 = digits
            .parse()
            .map_err(|_| Error::InvalidFormat(format!("Failed to parse numeric value from '{}'", s)))?;

        Ok(Self::new(value, unit.trim().parse()?))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::new();
        write_num(&mut buf, self.value);
        write!(f, "{}{}", buf, self.unit.as_str())
    }
}

/// Write a number with at most two decimals and no trailing zeros.
#[inline]
pub fn write_num(buf: &mut String, n: f64) {
    if n.fract() == 0.0 && n.abs() < 1e10 {
        let _ = write!(buf, "{}", n as i64);
    } else {
        let rounded = (n * 100.0).round() / 100.0;

        let mut buffer = ryu::Buffer::new();
        let s = buffer.format(rounded);

        if s.contains('.') {
            buf.push_str(s.trim_end_matches('0').trim_end_matches('.'));
        } else {
            buf.push_str(s);
        }
    }
}

/// Convert an ODF length (typically a font size in points) to a CSS pixel value.
///
/// Percentages, keywords and anything unparsable pass through unchanged, so
/// the caller can always emit the result.
///
/// ```
/// use odtpara::common::unit::pt_to_px;
/// assert_eq!(pt_to_px("12pt", 96), "16px");
/// assert_eq!(pt_to_px("10pt", 96), "13.33px");
/// assert_eq!(pt_to_px("150%", 96), "150%");
/// ```
pub fn pt_to_px(value: &str, dpi: u32) -> String {
    match value.parse::<Length>() {
        Ok(length) => {
            let mut out = String::with_capacity(8);
            write_num(&mut out, length.to_pixels(dpi));
            out.push_str("px");
            out
        },
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_length() {
        let length = "2.5cm".parse::<Length>().unwrap();
        assert_eq!(length.value(), 2.5);
        assert_eq!(length.unit(), LengthUnit::Centimeter);

        let length = "10pt".parse::<Length>().unwrap();
        assert_eq!(length.value(), 10.0);
        assert_eq!(length.unit(), LengthUnit::Point);

        // Negative values
        let length = "-5mm".parse::<Length>().unwrap();
        assert_eq!(length.value(), -5.0);
        assert_eq!(length.unit(), LengthUnit::Millimeter);
    }

    #[test]
    fn test_parse_requires_unit() {
        assert!("12".parse::<Length>().is_err());
        assert!("pt".parse::<Length>().is_err());
        assert!("12em".parse::<Length>().is_err());
    }

    #[test]
    fn test_to_pixels() {
        assert_eq!(Length::new(1.0, LengthUnit::Inch).to_pixels(96) as i32, 96);
        assert_eq!(Length::new(2.54, LengthUnit::Centimeter).to_pixels(96).round() as i32, 96);
        assert_eq!(Length::new(72.0, LengthUnit::Point).to_pixels(96) as i32, 96);
        assert_eq!(Length::new(6.0, LengthUnit::Pica).to_pixels(72) as i32, 72);
    }

    #[test]
    fn test_pt_to_px() {
        assert_eq!(pt_to_px("12pt", 96), "16px");
        assert_eq!(pt_to_px("18pt", 96), "24px");
        assert_eq!(pt_to_px("11pt", 96), "14.67px");
        assert_eq!(pt_to_px("12pt", 72), "12px");
        assert_eq!(pt_to_px("130%", 96), "130%");
        assert_eq!(pt_to_px("large", 96), "large");
    }

    #[test]
    fn test_display() {
        assert_eq!(Length::new(2.5, LengthUnit::Centimeter).to_string(), "2.5cm");
        assert_eq!(Length::new(10.0, LengthUnit::Point).to_string(), "10pt");
    }
}
