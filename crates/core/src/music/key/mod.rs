// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fmt, str::FromStr};

pub type KeyCodeValue = u8;

/// The 24 musical keys.
///
/// The numbering follows the circle of fifths in clock-wise orientation,
/// alternating between a major key and its relative minor key.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::FromRepr, strum::EnumIter,
)]
#[repr(u8)]
pub enum KeyCode {
    /// C major
    Cmaj = 1,

    /// A minor
    Amin = 2,

    /// G major
    Gmaj = 3,

    /// E minor
    Emin = 4,

    /// D major
    Dmaj = 5,

    /// B minor
    Bmin = 6,

    /// A major
    Amaj = 7,

    /// F\u{266F}/G\u{266D} minor
    Gbmin = 8,

    /// E major
    Emaj = 9,

    /// D\u{266D} minor
    Dbmin = 10,

    /// B major
    Bmaj = 11,

    /// A\u{266D} minor
    Abmin = 12,

    /// F\u{266F}/G\u{266D} major
    Gbmaj = 13,

    /// E\u{266D} minor
    Ebmin = 14,

    /// D\u{266D} major
    Dbmaj = 15,

    /// B\u{266D} minor
    Bbmin = 16,

    /// A\u{266D} major
    Abmaj = 17,

    /// F minor
    Fmin = 18,

    /// E\u{266D} major
    Ebmaj = 19,

    /// C minor
    Cmin = 20,

    /// B\u{266D} major
    Bbmaj = 21,

    /// G minor
    Gmin = 22,

    /// F major
    Fmaj = 23,

    /// D minor
    Dmin = 24,
}

impl KeyCode {
    #[must_use]
    pub const fn to_value(self) -> KeyCodeValue {
        self as _
    }

    #[must_use]
    pub const fn try_from_value(val: KeyCodeValue) -> Option<Self> {
        Self::from_repr(val)
    }

    #[must_use]
    pub const fn mode(self) -> KeyMode {
        match self.to_value() % 2 {
            1 => KeyMode::Major,
            _ => KeyMode::Minor,
        }
    }

    /// Convert a pitch class and a mode into a key code.
    ///
    /// The pitch class uses standard integer notation, i.e. 0 = C,
    /// 1 = C\u{266F}/D\u{266D}, ..., 11 = B. This is the notation
    /// found in the audio features of most streaming services.
    #[must_use]
    pub const fn from_pitch_class(pitch_class: u8, mode: KeyMode) -> Option<Self> {
        if pitch_class >= 12 {
            return None;
        }
        // Minor keys share the position of their relative major key
        // on the circle of fifths, 3 semitones above.
        let major_pitch_class = match mode {
            KeyMode::Major => pitch_class,
            KeyMode::Minor => (pitch_class + 3) % 12,
        };
        // Each step on the circle of fifths is 7 semitones wide.
        let fifths = (major_pitch_class * 7) % 12;
        let value = 2 * fifths
            + match mode {
                KeyMode::Major => 1,
                KeyMode::Minor => 2,
            };
        Self::try_from_value(value)
    }

    #[must_use]
    pub const fn as_canonical_str(self) -> &'static str {
        #[allow(clippy::enum_glob_use)]
        use KeyCode::*;
        match self {
            Cmaj => "Cmaj",
            Amin => "Amin",
            Gmaj => "Gmaj",
            Emin => "Emin",
            Dmaj => "Dmaj",
            Bmin => "Bmin",
            Amaj => "Amaj",
            Gbmin => "Gbmin",
            Emaj => "Emaj",
            Dbmin => "Dbmin",
            Bmaj => "Bmaj",
            Abmin => "Abmin",
            Gbmaj => "Gbmaj",
            Ebmin => "Ebmin",
            Dbmaj => "Dbmaj",
            Bbmin => "Bbmin",
            Abmaj => "Abmaj",
            Fmin => "Fmin",
            Ebmaj => "Ebmaj",
            Cmin => "Cmin",
            Bbmaj => "Bbmaj",
            Gmin => "Gmin",
            Fmaj => "Fmaj",
            Dmin => "Dmin",
        }
    }

    #[must_use]
    pub const fn as_openkey_str(self) -> &'static str {
        #[allow(clippy::enum_glob_use)]
        use KeyCode::*;
        match self {
            Cmaj => "1d",
            Amin => "1m",
            Gmaj => "2d",
            Emin => "2m",
            Dmaj => "3d",
            Bmin => "3m",
            Amaj => "4d",
            Gbmin => "4m",
            Emaj => "5d",
            Dbmin => "5m",
            Bmaj => "6d",
            Abmin => "6m",
            Gbmaj => "7d",
            Ebmin => "7m",
            Dbmaj => "8d",
            Bbmin => "8m",
            Abmaj => "9d",
            Fmin => "9m",
            Ebmaj => "10d",
            Cmin => "10m",
            Bbmaj => "11d",
            Gmin => "11m",
            Fmaj => "12d",
            Dmin => "12m",
        }
    }

    #[must_use]
    pub const fn as_camelot_str(self) -> &'static str {
        #[allow(clippy::enum_glob_use)]
        use KeyCode::*;
        match self {
            Cmaj => "8B",
            Amin => "8A",
            Gmaj => "9B",
            Emin => "9A",
            Dmaj => "10B",
            Bmin => "10A",
            Amaj => "11B",
            Gbmin => "11A",
            Emaj => "12B",
            Dbmin => "12A",
            Bmaj => "1B",
            Abmin => "1A",
            Gbmaj => "2B",
            Ebmin => "2A",
            Dbmaj => "3B",
            Bbmin => "3A",
            Abmaj => "4B",
            Fmin => "4A",
            Ebmaj => "5B",
            Cmin => "5A",
            Bbmaj => "6B",
            Gmin => "6A",
            Fmaj => "7B",
            Dmin => "7A",
        }
    }

    /// Parse a Camelot key like `8B` or `12a`.
    ///
    /// Leading and trailing whitespace is ignored and the mode letter
    /// is case-insensitive.
    #[must_use]
    pub fn try_from_camelot_str(s: &str) -> Option<Self> {
        let (code, mode) = split_mode_suffix(s)?;
        let mode = match mode {
            'A' | 'a' => KeyMode::Minor,
            'B' | 'b' => KeyMode::Major,
            _ => {
                return None;
            }
        };
        let code = code.parse().ok()?;
        CamelotKeySignature::new(code, mode).map(|camelot| camelot.key_signature().code())
    }

    /// Parse an Open Key notation like `1d` or `12m`.
    #[must_use]
    pub fn try_from_openkey_str(s: &str) -> Option<Self> {
        let (code, mode) = split_mode_suffix(s)?;
        let offset = match mode {
            'd' => 1,
            'm' => 0,
            _ => {
                return None;
            }
        };
        let code: KeyCodeValue = code.parse().ok()?;
        if !(1..=12).contains(&code) {
            return None;
        }
        Self::try_from_value(2 * code - offset)
    }
}

/// Split a trimmed key notation into its numeric code and the trailing mode letter.
fn split_mode_suffix(s: &str) -> Option<(&str, char)> {
    let s = s.trim();
    let mode = s.chars().next_back()?;
    Some((&s[..s.len() - mode.len_utf8()], mode))
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_canonical_str())
    }
}

impl From<KeyCode> for KeyCodeValue {
    fn from(from: KeyCode) -> Self {
        from.to_value()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyMode {
    Major,
    Minor,
}

impl KeyMode {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Major => Self::Minor,
            Self::Minor => Self::Major,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeySignature(KeyCode);

impl KeySignature {
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self(code)
    }

    #[must_use]
    pub const fn code(self) -> KeyCode {
        let Self(code) = self;
        code
    }

    #[must_use]
    pub const fn mode(self) -> KeyMode {
        self.code().mode()
    }

    /// All keys that mix harmonically with this key, including itself.
    ///
    /// On the Camelot wheel these are the same position in the other
    /// mode and both adjacent positions in the same mode.
    #[must_use]
    pub fn harmonic_neighbors(self) -> [Self; 4] {
        let camelot = CamelotKeySignature::from(self);
        let code = camelot.code();
        let mode = camelot.mode();
        [
            self,
            CamelotKeySignature::wrapping_new(code, mode.opposite()).into(),
            CamelotKeySignature::wrapping_new(code + 1, mode).into(),
            CamelotKeySignature::wrapping_new(code + CamelotKeySignature::MAX_CODE - 1, mode)
                .into(),
        ]
    }

    #[must_use]
    pub fn is_harmonic_with(self, other: Self) -> bool {
        self.harmonic_neighbors().contains(&other)
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.code().fmt(f)
    }
}

impl From<KeyCode> for KeySignature {
    fn from(from: KeyCode) -> Self {
        KeySignature::new(from)
    }
}

impl From<KeySignature> for KeyCode {
    fn from(from: KeySignature) -> Self {
        from.code()
    }
}

///////////////////////////////////////////////////////////////////////
// CamelotKeySignature
///////////////////////////////////////////////////////////////////////

/// A key signature on the Camelot wheel.
///
/// Codes 1 to 12 denote positions on the wheel. Minor keys are
/// marked with the letter `A` and major keys with the letter `B`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CamelotKeySignature(KeySignature);

impl CamelotKeySignature {
    pub const MIN_CODE: KeyCodeValue = 1;
    pub const MAX_CODE: KeyCodeValue = 12;

    #[must_use]
    pub fn new(code: KeyCodeValue, mode: KeyMode) -> Option<Self> {
        if !(Self::MIN_CODE..=Self::MAX_CODE).contains(&code) {
            return None;
        }
        Some(Self::wrapping_new(code, mode))
    }

    /// Codes outside of the valid range wrap around the wheel,
    /// i.e. 13 becomes 1 and 0 becomes 12.
    #[must_use]
    #[allow(clippy::missing_panics_doc)] // Never panics
    pub fn wrapping_new(code: KeyCodeValue, mode: KeyMode) -> Self {
        let code = (code + Self::MAX_CODE - 1) % Self::MAX_CODE + 1;
        let value = ((code * 2 + 9) % 24)
            + match mode {
                KeyMode::Major => 0,
                KeyMode::Minor => 1,
            };
        let code = KeyCode::try_from_value(value).expect("valid key code");
        Self(KeySignature::new(code))
    }

    #[must_use]
    pub const fn code(self) -> KeyCodeValue {
        1 + ((self.0.code().to_value() + 13) / 2) % 12
    }

    #[must_use]
    pub const fn mode(self) -> KeyMode {
        self.0.mode()
    }

    #[must_use]
    pub const fn key_signature(self) -> KeySignature {
        self.0
    }
}

impl From<KeySignature> for CamelotKeySignature {
    fn from(key_sig: KeySignature) -> Self {
        CamelotKeySignature(key_sig)
    }
}

impl From<CamelotKeySignature> for KeySignature {
    fn from(from: CamelotKeySignature) -> Self {
        from.0
    }
}

impl fmt::Display for CamelotKeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.code().as_camelot_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid Camelot key: {0:?}")]
pub struct ParseCamelotKeyError(String);

impl FromStr for CamelotKeySignature {
    type Err = ParseCamelotKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyCode::try_from_camelot_str(s)
            .map(|code| KeySignature::new(code).into())
            .ok_or_else(|| ParseCamelotKeyError(s.to_owned()))
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////
