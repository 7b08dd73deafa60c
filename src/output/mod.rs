//! Output writers for resolved position fixes
//!
//! All three formats carry the same four values per fix: latitude,
//! longitude, altitude (feet, optional) and the ICAO address rendered as
//! `0x`-prefixed lowercase hex.

pub mod csv;
pub mod json;
pub mod kml;

use std::fmt;

/// Supported output formats, selected by the CLI `<format>` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
    Kml,
}

impl OutputFormat {
    /// Parse a format argument such as `.csv` (a bare `csv` also works).
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "kml" => Some(Self::Kml),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
            Self::Kml => write!(f, "kml"),
        }
    }
}

/// ICAO address in the output notation shared by every writer.
pub(crate) fn format_icao(icao: u32) -> String {
    format!("{icao:#x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_arg() {
        assert_eq!(OutputFormat::from_arg(".csv"), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::from_arg("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_arg(".KML"), Some(OutputFormat::Kml));
        assert_eq!(OutputFormat::from_arg(".txt"), None);
    }

    #[test]
    fn test_icao_notation() {
        assert_eq!(format_icao(0x4B1234), "0x4b1234");
        assert_eq!(format_icao(0xABC), "0xabc");
    }
}
