use std::fmt;

use crate::ObjectError;

/// A UTC offset as recorded in commit and tag headers.
///
/// `+0000` and `-0000` both mean "no displacement", but git records the
/// sign and so does this type: `negative_utc` is only meaningful when
/// `offset` is zero.
///
/// [`Timezone::format`] writes exactly four digits, so it only round-trips
/// offsets in whole minutes of at most [`Timezone::MAX_OFFSET`] either way.
/// Outside that domain the seconds are dropped, or more than two hour
/// digits are written and [`Timezone::parse`] rejects the result. Use
/// [`Timezone::checked_from_offset`] to build a zone from an arbitrary
/// offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timezone {
    /// Offset from UTC in seconds.
    pub offset: i32,
    /// Set for a textual `-0000`.
    pub negative_utc: bool,
}

impl Timezone {
    pub const UTC: Self = Self {
        offset: 0,
        negative_utc: false,
    };

    /// The `-0000` zone.
    pub const NEGATIVE_UTC: Self = Self {
        offset: 0,
        negative_utc: true,
    };

    /// The largest magnitude `[+-]HHMM` can express: 99 hours 59 minutes.
    pub const MAX_OFFSET: i32 = 99 * 3600 + 59 * 60;

    /// Wrap an offset in seconds without range checking.
    pub const fn from_offset(offset: i32) -> Self {
        Self {
            offset,
            negative_utc: false,
        }
    }

    /// Like [`Timezone::from_offset`], but only for offsets that format
    /// without loss.
    pub fn checked_from_offset(offset: i32) -> Result<Self, ObjectError> {
        let zone = Self::from_offset(offset);
        if !zone.is_representable() {
            return Err(ObjectError::malformed(format!(
                "timezone offset of {offset}s is not expressible as [+-]HHMM"
            )));
        }
        Ok(zone)
    }

    /// Whether [`Timezone::format`] output parses back to this value.
    pub fn is_representable(&self) -> bool {
        self.offset % 60 == 0 && self.offset.unsigned_abs() <= Self::MAX_OFFSET.unsigned_abs()
    }

    /// Parse `[+-]HHMM`.
    ///
    /// `HH` and `MM` are not range checked: `-0440` is four hours and forty
    /// minutes west of UTC.
    pub fn parse(text: &[u8]) -> Result<Self, ObjectError> {
        let bad = || ObjectError::malformed_raw("invalid timezone", text);
        let (&sign, digits) = text.split_first().ok_or_else(bad)?;
        let negative = match sign {
            b'+' => false,
            b'-' => true,
            _ => return Err(bad()),
        };
        if digits.len() != 4 || !digits.iter().all(u8::is_ascii_digit) {
            return Err(bad());
        }
        let num = |d: &[u8]| d.iter().fold(0i32, |acc, &b| acc * 10 + i32::from(b - b'0'));
        let magnitude = num(&digits[..2]) * 3600 + num(&digits[2..]) * 60;
        Ok(Self {
            offset: if negative { -magnitude } else { magnitude },
            negative_utc: negative && magnitude == 0,
        })
    }

    /// Render as `[+-]HHMM`.
    pub fn format(&self) -> String {
        let sign = if self.offset < 0 || (self.offset == 0 && self.negative_utc) {
            '-'
        } else {
            '+'
        };
        let abs = self.offset.unsigned_abs();
        format!("{}{:02}{:02}", sign, abs / 3600, (abs % 3600) / 60)
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_utc() {
        assert_eq!(Timezone::parse(b"+0000").unwrap(), Timezone::UTC);
    }

    #[test]
    fn parse_negative_utc() {
        let tz = Timezone::parse(b"-0000").unwrap();
        assert_eq!(tz.offset, 0);
        assert!(tz.negative_utc);
    }

    #[test]
    fn format_utc_both_signs() {
        assert_eq!(Timezone::UTC.format(), "+0000");
        assert_eq!(Timezone::NEGATIVE_UTC.format(), "-0000");
    }

    #[test]
    fn cet() {
        assert_eq!(Timezone::parse(b"+0100").unwrap(), Timezone::from_offset(3600));
        assert_eq!(Timezone::from_offset(3600).format(), "+0100");
    }

    #[test]
    fn pdt() {
        assert_eq!(
            Timezone::parse(b"-0400").unwrap(),
            Timezone::from_offset(-4 * 3600)
        );
        assert_eq!(Timezone::from_offset(-4 * 3600).format(), "-0400");
    }

    #[test]
    fn pdt_half() {
        assert_eq!(Timezone::parse(b"-0440").unwrap(), Timezone::from_offset(-16800));
        assert_eq!(Timezone::from_offset(-16800).format(), "-0440");
    }

    #[test]
    fn small_positive_offset() {
        assert_eq!(Timezone::from_offset(5 * 60).to_string(), "+0005");
    }

    #[test]
    fn representable_domain() {
        for offset in [0, 60, -16800, Timezone::MAX_OFFSET, -Timezone::MAX_OFFSET] {
            let tz = Timezone::checked_from_offset(offset).unwrap();
            assert_eq!(Timezone::parse(tz.format().as_bytes()).unwrap(), tz);
        }
        for offset in [90, 100 * 3600, -100 * 3600, Timezone::MAX_OFFSET + 60] {
            assert!(Timezone::checked_from_offset(offset).is_err(), "{offset}");
            assert!(!Timezone::from_offset(offset).is_representable());
        }
        // Out of range values still format, but not as something parse accepts.
        assert_eq!(Timezone::from_offset(100 * 3600).format(), "+10000");
        assert!(Timezone::parse(b"+10000").is_err());
        // Unnormalised minutes parse beyond the representable range.
        assert!(!Timezone::parse(b"+9999").unwrap().is_representable());
    }

    #[test]
    fn rejects_other_shapes() {
        for bad in [&b""[..], b"0000", b"+000", b"+00000", b"*0100", b"+01a0", b"+ 100"] {
            assert!(Timezone::parse(bad).is_err(), "{:?}", bad);
        }
    }
}
