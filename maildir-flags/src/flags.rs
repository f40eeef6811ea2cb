//! # Flags
//!
//! Module dedicated to the set of message state flags and its compact
//! string encoding.

use log::trace;
use std::{
    collections::HashSet,
    fmt, ops,
    str::FromStr,
};

use crate::{Error, Flag, Result};

/// Separator between a message file name and its informational suffix.
const INFORMATIONAL_SUFFIX_SEPARATOR: &str = ":2,";

/// The set of message state flags.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Flags(pub HashSet<Flag>);

impl Flags {
    /// Encode the set into its compact flag string.
    ///
    /// Characters are deduplicated and sorted in descending code point
    /// order. Encoding never fails.
    pub fn to_flag_string(&self) -> String {
        let mut chars: Vec<char> = self.iter().map(char::from).collect();
        chars.sort_unstable_by(|a, b| b.cmp(a));
        chars.dedup();
        String::from_iter(chars)
    }

    /// Decode a flag string into a set of flags.
    ///
    /// Characters without a decode mapping (the write-only codes
    /// included) are silently ignored, so decoding never fails.
    pub fn from_flag_string(s: &str) -> Self {
        s.chars()
            .filter_map(|c| match Flag::try_from(c) {
                Ok(flag) => Some(flag),
                Err(_) => {
                    trace!("ignoring unknown maildir flag char {c}");
                    None
                }
            })
            .collect()
    }

    /// Split a message file name into its id and its decoded flags.
    ///
    /// File names without an informational suffix decode to an empty
    /// set, which matches messages still sitting in the `new` folder.
    pub fn from_file_name(file_name: &str) -> (&str, Self) {
        match file_name.split_once(INFORMATIONAL_SUFFIX_SEPARATOR) {
            Some((id, flags)) => (id, Self::from_flag_string(flags)),
            None => (file_name, Self::default()),
        }
    }

    /// Build the informational suffix a `cur` file name carries.
    pub fn to_file_suffix(&self) -> String {
        format!("{INFORMATIONAL_SUFFIX_SEPARATOR}{}", self.to_flag_string())
    }
}

impl ops::Deref for Flags {
    type Target = HashSet<Flag>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ops::DerefMut for Flags {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromIterator<Flag> for Flags {
    fn from_iter<T: IntoIterator<Item = Flag>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<&str> for Flags {
    fn from(s: &str) -> Self {
        s.split_whitespace().flat_map(|flag| flag.parse()).collect()
    }
}

impl From<String> for Flags {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl FromStr for Flags {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self(
            s.split_whitespace()
                .map(|flag| flag.parse())
                .collect::<Result<HashSet<_>>>()?,
        ))
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut glue = "";
        for flag in self.iter() {
            write!(f, "{glue}{flag}")?;
            glue = " ";
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_sorts_descending_and_dedups() {
        let flags = Flags::from_iter([Flag::Flagged, Flag::Seen, Flag::Seen]);
        assert_eq!(flags.to_flag_string(), "SF");

        let flags = Flags::from_iter([Flag::Draft, Flag::Trashed, Flag::New]);
        assert_eq!(flags.to_flag_string(), "TND");
    }

    #[test]
    fn encode_write_only_codes() {
        let flags = Flags::from_iter([Flag::Unread, Flag::Attach, Flag::Seen]);
        // lowercase codes sort above the uppercase ones
        assert_eq!(flags.to_flag_string(), "uaS");
    }

    #[test]
    fn decode_ignores_unknown_and_write_only_chars() {
        let flags = Flags::from_flag_string("DFXu");
        assert_eq!(flags, Flags::from_iter([Flag::Draft, Flag::Flagged]));

        assert_eq!(Flags::from_flag_string("axsu"), Flags::default());
        assert_eq!(Flags::from_flag_string(""), Flags::default());
    }

    #[test]
    fn decode_collapses_duplicates() {
        let flags = Flags::from_flag_string("SSRS");
        assert_eq!(flags, Flags::from_iter([Flag::Seen, Flag::Replied]));
    }

    #[test]
    fn decode_encode_restricts_to_decodable_flags() {
        let flags = Flags::from_iter([
            Flag::Draft,
            Flag::Seen,
            Flag::Encrypted,
            Flag::Signed,
            Flag::Unread,
        ]);

        let decoded = Flags::from_flag_string(&flags.to_flag_string());
        assert_eq!(decoded, Flags::from_iter([Flag::Draft, Flag::Seen]));
    }

    #[test]
    fn encode_decode_normalizes_flag_strings() {
        // unknown chars dropped, duplicates collapsed, descending order
        assert_eq!(
            Flags::from_flag_string("FZSDFu9").to_flag_string(),
            "SFD",
        );
        assert_eq!(Flags::from_flag_string("RPNT").to_flag_string(), "TRPN");
    }

    #[test]
    fn file_name_round_trip() {
        let (id, flags) = Flags::from_file_name("1734604131.abc123.host:2,RS");
        assert_eq!(id, "1734604131.abc123.host");
        assert_eq!(flags, Flags::from_iter([Flag::Replied, Flag::Seen]));
        assert_eq!(flags.to_file_suffix(), ":2,SR");

        let (id, flags) = Flags::from_file_name("1734604131.abc123.host");
        assert_eq!(id, "1734604131.abc123.host");
        assert_eq!(flags, Flags::default());
    }

    #[test]
    fn parse_flag_names() {
        let flags = Flags::from("seen replied");
        assert_eq!(flags, Flags::from_iter([Flag::Seen, Flag::Replied]));

        // lenient parsing drops unknown names
        let flags = Flags::from("seen bogus");
        assert_eq!(flags, Flags::from_iter([Flag::Seen]));

        // strict parsing rejects them
        assert!("seen bogus".parse::<Flags>().is_err());
    }
}
