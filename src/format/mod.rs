//! Fixed-format institutional and personnel identifiers.
//!
//! NIP: 7 digits `YYRRXXX` (year, region, sequence), displayed dotted as
//! `YY.RR.XXX`. NIAM: a 2-letter role prefix followed by 9 digits
//! `PPYYRRXXXSS`, displayed dotted as `PP.YY.RR.XXX.SS`.
//!
//! The `format_*` functions accept either representation and return the
//! requested one. Input that does not match the expected shape is returned
//! unchanged rather than rejected: these functions sit on display paths
//! where legacy malformed codes must still render. Callers that need
//! validation to fail use [`Nip::parse`] / [`Niam::parse`].

use std::fmt;

/// Strip the separators tolerated in punctuated identifiers.
fn strip_separators(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | ' '))
        .collect()
}

/// Format an institution code (NIP). `clean = true` yields the 7-digit
/// form, `clean = false` the dotted `YY.RR.XXX` form. Invalid input is
/// passed through unchanged.
pub fn format_nip(input: &str, clean: bool) -> String {
    let stripped = strip_separators(input);
    if stripped.len() != 7 || !stripped.bytes().all(|b| b.is_ascii_digit()) {
        return input.to_string();
    }
    if clean {
        stripped
    } else {
        format!("{}.{}.{}", &stripped[0..2], &stripped[2..4], &stripped[4..7])
    }
}

/// Format a personnel code (NIAM). `clean = true` yields the 11-character
/// form, `clean = false` the dotted `PP.YY.RR.XXX.SS` form. Invalid input
/// is passed through unchanged.
pub fn format_niam(input: &str, clean: bool) -> String {
    let stripped = strip_separators(input);
    let bytes = stripped.as_bytes();
    let well_formed = bytes.len() == 11
        && bytes[0..2].iter().all(|b| b.is_ascii_uppercase())
        && bytes[2..11].iter().all(|b| b.is_ascii_digit());
    if !well_formed {
        return input.to_string();
    }
    if clean {
        stripped
    } else {
        format!(
            "{}.{}.{}.{}.{}",
            &stripped[0..2],
            &stripped[2..4],
            &stripped[4..6],
            &stripped[6..9],
            &stripped[9..11]
        )
    }
}

/// A strictly-parsed institution identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nip {
    pub year: String,
    pub region: String,
    pub sequence: String,
}

impl Nip {
    /// Parse either representation; `None` when the shape is wrong.
    pub fn parse(input: &str) -> Option<Nip> {
        let stripped = strip_separators(input);
        if stripped.len() != 7 || !stripped.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Nip {
            year: stripped[0..2].to_string(),
            region: stripped[2..4].to_string(),
            sequence: stripped[4..7].to_string(),
        })
    }

    /// The 7-digit unpunctuated form.
    pub fn clean(&self) -> String {
        format!("{}{}{}", self.year, self.region, self.sequence)
    }

    /// Region code embedded in the identifier, e.g. "01".
    pub fn region_code(&self) -> &str {
        &self.region
    }
}

impl fmt::Display for Nip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.year, self.region, self.sequence)
    }
}

/// A strictly-parsed personnel identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Niam {
    pub prefix: String,
    pub year: String,
    pub region: String,
    pub sequence: String,
    pub sub_sequence: String,
}

impl Niam {
    /// Parse either representation; `None` when the shape is wrong.
    pub fn parse(input: &str) -> Option<Niam> {
        let stripped = strip_separators(input);
        let bytes = stripped.as_bytes();
        let well_formed = bytes.len() == 11
            && bytes[0..2].iter().all(|b| b.is_ascii_uppercase())
            && bytes[2..11].iter().all(|b| b.is_ascii_digit());
        if !well_formed {
            return None;
        }
        Some(Niam {
            prefix: stripped[0..2].to_string(),
            year: stripped[2..4].to_string(),
            region: stripped[4..6].to_string(),
            sequence: stripped[6..9].to_string(),
            sub_sequence: stripped[9..11].to_string(),
        })
    }

    /// The 11-character unpunctuated form.
    pub fn clean(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.prefix, self.year, self.region, self.sequence, self.sub_sequence
        )
    }
}

impl fmt::Display for Niam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}.{}",
            self.prefix, self.year, self.region, self.sequence, self.sub_sequence
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nip_dotted_to_clean_and_back() {
        assert_eq!(format_nip("26.01.001", true), "2601001");
        assert_eq!(format_nip("2601001", false), "26.01.001");
    }

    #[test]
    fn nip_round_trip_reproduces_dotted_form() {
        let dotted = "26.01.001";
        assert_eq!(format_nip(&format_nip(dotted, true), false), dotted);
    }

    #[test]
    fn nip_clean_formatting_is_idempotent() {
        let once = format_nip("26.01.001", true);
        let twice = format_nip(&once, true);
        assert_eq!(once, twice);
    }

    #[test]
    fn nip_invalid_length_passes_through() {
        assert_eq!(format_nip("26.01", true), "26.01");
        assert_eq!(format_nip("26010011", false), "26010011");
        assert_eq!(format_nip("26O1001", true), "26O1001");
    }

    #[test]
    fn niam_clean_to_dotted() {
        assert_eq!(format_niam("AN260100101", false), "AN.26.01.001.01");
        assert_eq!(format_niam("AN.26.01.001.01", true), "AN260100101");
    }

    #[test]
    fn niam_rejects_lowercase_prefix_via_passthrough() {
        assert_eq!(format_niam("an260100101", false), "an260100101");
    }

    #[test]
    fn nip_strict_parse() {
        let nip = Nip::parse("26.01.001").unwrap();
        assert_eq!(nip.year, "26");
        assert_eq!(nip.region_code(), "01");
        assert_eq!(nip.sequence, "001");
        assert_eq!(nip.clean(), "2601001");
        assert_eq!(nip.to_string(), "26.01.001");
        assert!(Nip::parse("26.01").is_none());
    }

    #[test]
    fn niam_strict_parse() {
        let niam = Niam::parse("AN.26.01.001.01").unwrap();
        assert_eq!(niam.prefix, "AN");
        assert_eq!(niam.clean(), "AN260100101");
        assert_eq!(niam.to_string(), "AN.26.01.001.01");
        assert!(Niam::parse("A1260100101").is_none());
    }
}
