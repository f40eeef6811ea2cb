//! # Flag
//!
//! Module dedicated to the single message state flag.

use std::{fmt, str::FromStr};

use crate::{Error, Result};

/// The message state flag.
///
/// Every flag maps to exactly one reserved character code. The four
/// last variants are write-only: encoding a flag set can produce their
/// codes, but decoding a flag string never yields them back.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Flag {
    Draft,
    Flagged,
    New,
    Passed,
    Replied,
    Seen,
    Trashed,
    Attach,
    Encrypted,
    Signed,
    Unread,
}

impl From<&Flag> for char {
    fn from(flag: &Flag) -> Self {
        match flag {
            Flag::Draft => 'D',
            Flag::Flagged => 'F',
            Flag::New => 'N',
            Flag::Passed => 'P',
            Flag::Replied => 'R',
            Flag::Seen => 'S',
            Flag::Trashed => 'T',
            Flag::Attach => 'a',
            Flag::Encrypted => 'x',
            Flag::Signed => 's',
            Flag::Unread => 'u',
        }
    }
}

impl From<Flag> for char {
    fn from(flag: Flag) -> Self {
        (&flag).into()
    }
}

impl TryFrom<char> for Flag {
    type Error = Error;

    /// Parse a flag from its character code.
    ///
    /// The mapping is partial on purpose: the write-only codes (`a`,
    /// `x`, `s`, `u`) are rejected like any unknown character. Matching
    /// is exact, lowercase variants of the known codes do not parse.
    fn try_from(c: char) -> Result<Self> {
        match c {
            'D' => Ok(Flag::Draft),
            'F' => Ok(Flag::Flagged),
            'N' => Ok(Flag::New),
            'P' => Ok(Flag::Passed),
            'R' => Ok(Flag::Replied),
            'S' => Ok(Flag::Seen),
            'T' => Ok(Flag::Trashed),
            unknown => Err(Error::ParseFlagCharError(unknown)),
        }
    }
}

impl FromStr for Flag {
    type Err = Error;

    fn from_str(slice: &str) -> Result<Self> {
        match slice.trim() {
            draft if draft.eq_ignore_ascii_case("draft") => Ok(Flag::Draft),
            flagged if flagged.eq_ignore_ascii_case("flagged") => Ok(Flag::Flagged),
            new if new.eq_ignore_ascii_case("new") => Ok(Flag::New),
            passed if passed.eq_ignore_ascii_case("passed") => Ok(Flag::Passed),
            replied if replied.eq_ignore_ascii_case("replied") => Ok(Flag::Replied),
            seen if seen.eq_ignore_ascii_case("seen") => Ok(Flag::Seen),
            trashed if trashed.eq_ignore_ascii_case("trashed") => Ok(Flag::Trashed),
            attach if attach.eq_ignore_ascii_case("attach") => Ok(Flag::Attach),
            encrypted if encrypted.eq_ignore_ascii_case("encrypted") => Ok(Flag::Encrypted),
            signed if signed.eq_ignore_ascii_case("signed") => Ok(Flag::Signed),
            unread if unread.eq_ignore_ascii_case("unread") => Ok(Flag::Unread),
            unknown => Err(Error::ParseFlagError(unknown.to_string())),
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::Draft => write!(f, "draft"),
            Flag::Flagged => write!(f, "flagged"),
            Flag::New => write!(f, "new"),
            Flag::Passed => write!(f, "passed"),
            Flag::Replied => write!(f, "replied"),
            Flag::Seen => write!(f, "seen"),
            Flag::Trashed => write!(f, "trashed"),
            Flag::Attach => write!(f, "attach"),
            Flag::Encrypted => write!(f, "encrypted"),
            Flag::Signed => write!(f, "signed"),
            Flag::Unread => write!(f, "unread"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flag_char() {
        assert_eq!(Flag::try_from('S').unwrap(), Flag::Seen);
        assert_eq!(Flag::try_from('T').unwrap(), Flag::Trashed);

        // write-only codes never parse back
        assert!(Flag::try_from('a').is_err());
        assert!(Flag::try_from('x').is_err());
        assert!(Flag::try_from('s').is_err());
        assert!(Flag::try_from('u').is_err());

        assert!(Flag::try_from('Z').is_err());
    }

    #[test]
    fn parse_flag_name() {
        assert_eq!("seen".parse::<Flag>().unwrap(), Flag::Seen);
        assert_eq!(" Unread ".parse::<Flag>().unwrap(), Flag::Unread);
        assert!("unknown".parse::<Flag>().is_err());
    }
}
