// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Compatibility filters.
//!
//! Each filter narrows a subset of donor positions down to those that
//! are compatible with the most recently placed track. Filters never
//! modify their inputs and always return a new subset in ascending
//! order.

use hashbrown::HashMap;
use static_assertions::const_assert;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use segue_core::{Track, music::tempo::TempoBand, track::LevelValue};

use crate::working_set::View;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct Params {
    /// Number of recently placed tracks whose artists are excluded
    /// if no artist dominates the working set.
    pub artist_window: usize,

    /// Tempo ratios relative to the previous track that are considered
    /// as compatible.
    pub tempo_bands: [TempoBand; 3],

    /// Maximum distance of banded attribute values.
    pub band_tolerance: LevelValue,
}

pub const DEFAULT_ARTIST_WINDOW: usize = 5;

const_assert!(DEFAULT_ARTIST_WINDOW > 0);

impl Params {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            artist_window: DEFAULT_ARTIST_WINDOW,
            tempo_bands: TempoBand::DEFAULT_BANDS,
            band_tolerance: 1,
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new()
    }
}

/// Numeric track attributes with a banded notion of similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Attribute {
    Energy,
    Danceability,
    Popularity,
    Genre,
}

impl Attribute {
    /// The attribute value on a common, integer scale from 0 to 10.
    ///
    /// Genre scalars are quantized to tenths.
    #[must_use]
    pub fn band_value_of(self, track: &Track) -> Option<LevelValue> {
        match self {
            Self::Energy => Some(track.energy.value()),
            Self::Danceability => Some(track.danceability.value()),
            Self::Popularity => Some(track.popularity.value()),
            Self::Genre => track.genre.map(|genre| genre.to_tenths()),
        }
    }
}

fn last_placed<'a>(view: &View<'a>) -> Option<&'a Track> {
    let last = view.last_placed();
    debug_assert!(last.is_some(), "nothing has been placed yet");
    last
}

fn retain_compatible(
    view: &View<'_>,
    candidates: &[usize],
    mut is_compatible: impl FnMut(&Track) -> bool,
) -> Vec<usize> {
    candidates
        .iter()
        .copied()
        .filter(|&position| is_compatible(view.donor_track(position)))
        .collect()
}

/// Number of recently placed tracks whose artists are excluded.
///
/// The window shrinks if a single artist dominates the working set.
/// Otherwise artist exclusion would rule out too many candidates.
#[must_use]
pub fn artist_window(view: &View<'_>, params: &Params) -> usize {
    let total_count = view.total_len();
    if total_count == 0 {
        return params.artist_window;
    }
    let mut artist_counts = HashMap::<&str, usize>::new();
    for track in view.donor_tracks().chain(view.recipient().iter().copied()) {
        for artist in &track.artists {
            *artist_counts.entry(artist.as_str()).or_default() += 1;
        }
    }
    let max_artist_count = artist_counts.values().copied().max().unwrap_or_default();
    // The ratio of the dominant artist rounded to tenths
    let ratio_tenths = ((max_artist_count * 10) as f64 / total_count as f64).round() as usize;
    (10 - ratio_tenths.min(10)) * params.artist_window / 10
}

/// Exclude candidates sharing any artist with the most recently placed tracks.
#[must_use]
pub fn artist_recency(view: &View<'_>, candidates: &[usize], params: &Params) -> Vec<usize> {
    if last_placed(view).is_none() {
        return Vec::new();
    }
    let window = artist_window(view, params);
    let recipient = view.recipient();
    let recent = &recipient[recipient.len().saturating_sub(window)..];
    retain_compatible(view, candidates, |track| {
        !recent.iter().any(|placed| placed.shares_artist_with(track))
    })
}

/// Retain candidates in a harmonically compatible key.
#[must_use]
pub fn harmonic_key(view: &View<'_>, candidates: &[usize]) -> Vec<usize> {
    let Some(prev) = last_placed(view) else {
        return Vec::new();
    };
    let neighbors = prev.key.harmonic_neighbors();
    retain_compatible(view, candidates, |track| neighbors.contains(&track.key))
}

/// Retain candidates within any of the tempo bands.
#[must_use]
pub fn tempo(view: &View<'_>, candidates: &[usize], params: &Params) -> Vec<usize> {
    let Some(prev) = last_placed(view) else {
        return Vec::new();
    };
    retain_compatible(view, candidates, |track| {
        params
            .tempo_bands
            .iter()
            .any(|band| band.contains(prev.tempo_bpm, track.tempo_bpm))
    })
}

/// Retain candidates with an attribute value close to the previous one.
///
/// Candidates without a value are excluded.
#[must_use]
pub fn banded(
    view: &View<'_>,
    candidates: &[usize],
    attribute: Attribute,
    params: &Params,
) -> Vec<usize> {
    let Some(prev_value) = last_placed(view).and_then(|prev| attribute.band_value_of(prev)) else {
        return Vec::new();
    };
    retain_compatible(view, candidates, |track| {
        attribute
            .band_value_of(track)
            .is_some_and(|value| value.abs_diff(prev_value) <= params.band_tolerance)
    })
}

/// Retain candidates with the same attribute value as the previous one.
#[must_use]
pub fn equal(view: &View<'_>, candidates: &[usize], attribute: Attribute) -> Vec<usize> {
    let Some(prev_value) = last_placed(view).and_then(|prev| attribute.band_value_of(prev)) else {
        return Vec::new();
    };
    retain_compatible(view, candidates, |track| {
        attribute.band_value_of(track) == Some(prev_value)
    })
}

/// Merge subsets into a single, deduplicated subset.
#[must_use]
pub fn union(subsets: impl IntoIterator<Item = Vec<usize>>) -> Vec<usize> {
    let mut merged = subsets.into_iter().flatten().collect::<Vec<_>>();
    merged.sort_unstable();
    merged.dedup();
    merged
}
