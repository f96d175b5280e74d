use bstr::{BStr, BString, ByteSlice};

use crate::{ObjectError, Timezone};

/// An identity with a timestamp, as found in `author`, `committer` and
/// `tagger` headers: `Name <email> 1234567890 +0000`.
///
/// The identity is kept verbatim so that objects with a malformed identity
/// still parse; [`check_identity`] decides whether it is well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    /// `"Name <email>"`.
    pub identity: BString,
    /// Seconds since the Unix epoch.
    pub time: i64,
    pub timezone: Timezone,
}

impl Signature {
    pub fn new(identity: impl Into<BString>, time: i64, timezone: Timezone) -> Self {
        Self {
            identity: identity.into(),
            time,
            timezone,
        }
    }

    /// Parse a header value. The last two space-separated fields are the
    /// timestamp and the timezone; everything before them is the identity.
    pub fn parse(value: &[u8]) -> Result<Self, ObjectError> {
        let bad = |reason: &str| ObjectError::malformed_raw(reason, value);
        let tz_sep = value
            .rfind_byte(b' ')
            .ok_or_else(|| bad("missing timezone in signature"))?;
        let time_sep = value[..tz_sep]
            .rfind_byte(b' ')
            .ok_or_else(|| bad("missing timestamp in signature"))?;

        let time_text = &value[time_sep + 1..tz_sep];
        if time_text.is_empty() || !time_text.iter().all(u8::is_ascii_digit) {
            return Err(bad("invalid timestamp in signature"));
        }
        let time = time_text
            .to_str()
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(|| bad("timestamp out of range"))?;
        let timezone = Timezone::parse(&value[tz_sep + 1..])?;

        Ok(Self {
            identity: BString::from(&value[..time_sep]),
            time,
            timezone,
        })
    }

    /// Format as a header value.
    pub fn to_bytes(&self) -> BString {
        let mut out = self.identity.clone();
        out.extend_from_slice(format!(" {} {}", self.time, self.timezone).as_bytes());
        out
    }

    /// The display name: everything before `<`, without trailing spaces.
    pub fn name(&self) -> &BStr {
        let end = self.identity.find_byte(b'<').unwrap_or(self.identity.len());
        self.identity[..end].trim_end().as_bstr()
    }

    /// The text between `<` and `>`, if both are present.
    pub fn email(&self) -> Option<&BStr> {
        let start = self.identity.find_byte(b'<')?;
        let end = self.identity.rfind_byte(b'>')?;
        (start < end).then(|| self.identity[start + 1..end].as_bstr())
    }
}

/// Validate an identity string: `"Name <email>"` or `"<email>"`.
///
/// Exactly one `<` and one `>` are allowed, and `>` must end the string.
pub fn check_identity(identity: &[u8]) -> Result<(), ObjectError> {
    let opens = identity.iter().filter(|&&b| b == b'<').count();
    let closes = identity.iter().filter(|&&b| b == b'>').count();
    if opens != 1 || closes != 1 || identity.last() != Some(&b'>') {
        return Err(ObjectError::malformed_raw("invalid identity", identity));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_signature() {
        let sig = Signature::parse(b"John Doe <john@example.com> 1234567890 +0000").unwrap();
        assert_eq!(sig.identity, "John Doe <john@example.com>");
        assert_eq!(sig.name(), "John Doe");
        assert_eq!(sig.email().unwrap(), "john@example.com");
        assert_eq!(sig.time, 1234567890);
        assert_eq!(sig.timezone, Timezone::UTC);
    }

    #[test]
    fn signature_roundtrip() {
        let sig = Signature::new("Jane Doe <jane@example.com>", 1234567890, Timezone::from_offset(-5 * 3600));
        let bytes = sig.to_bytes();
        assert_eq!(bytes, "Jane Doe <jane@example.com> 1234567890 -0500");
        assert_eq!(Signature::parse(&bytes).unwrap(), sig);
    }

    #[test]
    fn negative_utc_survives_roundtrip() {
        let sig = Signature::parse(b"A <a@b> 1 -0000").unwrap();
        assert!(sig.timezone.negative_utc);
        assert_eq!(sig.to_bytes(), "A <a@b> 1 -0000");
    }

    #[test]
    fn identity_without_email_still_parses() {
        let sig = Signature::parse(b"some guy without an email address 1174773719 +0000").unwrap();
        assert_eq!(sig.identity, "some guy without an email address");
        assert!(sig.email().is_none());
        assert!(check_identity(&sig.identity).is_err());
    }

    #[test]
    fn empty_name() {
        let sig = Signature::parse(b" <@localhost> 1312655901 +0100").unwrap();
        assert_eq!(sig.identity, " <@localhost>");
        assert_eq!(sig.name(), "");
        assert_eq!(sig.email().unwrap(), "@localhost");
    }

    #[test]
    fn rejects_non_numeric_time() {
        assert!(Signature::parse(b"A <a@b> Sun 7 Jul 2007 12:54:34 +0700").is_err());
        assert!(Signature::parse(b"A <a@b> +0700").is_err());
        assert!(Signature::parse(b"A <a@b> 12 0700").is_err());
    }

    #[test]
    fn good_identities() {
        check_identity(b"Dave Borowitz <dborowitz@google.com>").unwrap();
        check_identity(b"<dborowitz@google.com>").unwrap();
        check_identity(b"Dave <>").unwrap();
    }

    #[test]
    fn bad_identities() {
        for bad in [
            &b"Dave Borowitz"[..],
            b"Dave Borowitz <dborowitz",
            b"dborowitz@google.com>",
            b"Dave Borowitz <<dborowitz@google.com>",
            b"Dave Borowitz <dborowitz@google.com>>",
            b"Dave Borowitz <dborowitz@google.com>xxx",
        ] {
            assert!(check_identity(bad).is_err(), "{:?}", BStr::new(bad));
        }
    }
}
