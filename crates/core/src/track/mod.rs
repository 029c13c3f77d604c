// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use smol_str::SmolStr;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    music::{
        genre::{GenreScalar, GenreScalarInvalidity},
        key::KeySignature,
        tempo::{TempoBpm, TempoBpmInvalidity},
    },
    prelude::*,
};

///////////////////////////////////////////////////////////////////////
// TrackId
///////////////////////////////////////////////////////////////////////

/// Opaque identifier as provided by the feature source.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct TrackId(SmolStr);

impl TrackId {
    #[must_use]
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for TrackId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for TrackId {
    fn from(from: &str) -> Self {
        Self::new(from)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrackIdInvalidity {
    Empty,
}

impl Validate for TrackId {
    type Invalidity = TrackIdInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(self.as_str().trim().is_empty(), Self::Invalidity::Empty)
            .into()
    }
}

///////////////////////////////////////////////////////////////////////
// ArtistName
///////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ArtistName(SmolStr);

impl ArtistName {
    #[must_use]
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ArtistName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ArtistName {
    fn from(from: &str) -> Self {
        Self::new(from)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArtistNameInvalidity {
    Blank,
}

impl Validate for ArtistName {
    type Invalidity = ArtistNameInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(self.as_str().trim().is_empty(), Self::Invalidity::Blank)
            .into()
    }
}

///////////////////////////////////////////////////////////////////////
// Level
///////////////////////////////////////////////////////////////////////

pub type LevelValue = u8;

/// A perceptual attribute banded into integer steps from 0 to 10.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Level(LevelValue);

impl Level {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(10);

    #[must_use]
    pub const fn new(value: LevelValue) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> LevelValue {
        let Self(value) = self;
        value
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LevelInvalidity {
    OutOfRange,
}

impl Validate for Level {
    type Invalidity = LevelInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(*self > Self::MAX, Self::Invalidity::OutOfRange)
            .into()
    }
}

///////////////////////////////////////////////////////////////////////
// Track
///////////////////////////////////////////////////////////////////////

/// The feature record of a single track.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub id: TrackId,

    /// Informational only, never used for sequencing.
    pub title: Option<String>,

    pub artists: Vec<ArtistName>,

    pub key: KeySignature,

    pub tempo_bpm: TempoBpm,

    pub energy: Level,

    pub danceability: Level,

    pub popularity: Level,

    /// Only required for sequencing by genre.
    pub genre: Option<GenreScalar>,
}

impl Track {
    #[must_use]
    pub fn shares_artist_with(&self, other: &Self) -> bool {
        self.artists
            .iter()
            .any(|artist| other.artists.contains(artist))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackInvalidity {
    Id(TrackIdInvalidity),
    ArtistsEmpty,
    ArtistName(ArtistNameInvalidity),
    TempoBpm(TempoBpmInvalidity),
    Energy(LevelInvalidity),
    Danceability(LevelInvalidity),
    Popularity(LevelInvalidity),
    Genre(GenreScalarInvalidity),
}

impl Validate for Track {
    type Invalidity = TrackInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let mut context = ValidationContext::new()
            .validate_with(&self.id, Self::Invalidity::Id)
            .invalidate_if(self.artists.is_empty(), Self::Invalidity::ArtistsEmpty)
            .validate_with(&self.tempo_bpm, Self::Invalidity::TempoBpm)
            .validate_with(&self.energy, Self::Invalidity::Energy)
            .validate_with(&self.danceability, Self::Invalidity::Danceability)
            .validate_with(&self.popularity, Self::Invalidity::Popularity);
        if let Some(genre) = &self.genre {
            context = context.validate_with(genre, Self::Invalidity::Genre);
        }
        self.artists
            .iter()
            .fold(context, |context, artist| {
                context.validate_with(artist, Self::Invalidity::ArtistName)
            })
            .into()
    }
}

///////////////////////////////////////////////////////////////////////
// SelectType
///////////////////////////////////////////////////////////////////////

/// Records how a track has been chosen for its position.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum SelectType {
    /// Uniformly chosen from the whole pool
    Random,

    /// Explicitly requested as the first track
    Seed,

    /// Maximum energy of the whole pool
    Peak,

    /// Minimum energy of the whole pool
    Floor,

    Dj,
    Basic,
    Party,
    Setlist,
    Genre,
}

///////////////////////////////////////////////////////////////////////
// Placement
///////////////////////////////////////////////////////////////////////

/// A track at its final position in a sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub track: Track,
    pub select_type: SelectType,
}
