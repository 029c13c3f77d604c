// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::cmp::Reverse;

use rand::{Rng, seq::IndexedRandom as _};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use segue_core::Track;

use crate::{
    filter::{self, Attribute, Params},
    lookahead,
    working_set::View,
};

/// How to choose among equally compatible candidates.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum TieBreak {
    /// Uniformly at random
    #[default]
    Random,

    /// The candidate that leaves the most compatible successors
    Lookahead,
}

impl TieBreak {
    pub fn choose<R>(
        self,
        view: &View<'_>,
        candidates: &[usize],
        params: &Params,
        rng: &mut R,
    ) -> Option<usize>
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Random => candidates.choose(rng).copied(),
            Self::Lookahead => lookahead::pick_deepest(view, candidates, params),
        }
    }
}

/// Strategies for choosing the next donor track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Selector {
    /// Any donor track, uniformly at random
    Random,

    /// Strict compatibility of artist, key, tempo, and energy
    Dj,

    /// Different artist and at least one compatible feature
    Basic,

    /// Peak seeking
    Party,

    /// Trough seeking
    Setlist,

    /// Similar genre
    Genre,
}

impl Selector {
    /// Select the position of the next donor track.
    ///
    /// Returns `None` if no donor track qualifies. All selectors
    /// except [`Selector::Random`] require a previously placed track.
    /// [`Selector::Random`] ignores the tie break.
    pub fn select<R>(
        self,
        view: &View<'_>,
        params: &Params,
        tie_break: TieBreak,
        rng: &mut R,
    ) -> Option<usize>
    where
        R: Rng + ?Sized,
    {
        if self != Self::Random && view.last_placed().is_none() {
            return None;
        }
        let selected = match self {
            // The last resort is always uniform, regardless of the tie break
            Self::Random => view.donor_positions().choose(rng).copied(),
            Self::Dj => {
                let candidates = dj_candidates(view, view.donor_positions(), params);
                tie_break.choose(view, &candidates, params, rng)
            }
            Self::Basic => {
                let candidates = basic_candidates(view, params);
                tie_break.choose(view, &candidates, params, rng)
            }
            Self::Party => {
                let candidates =
                    arc_candidates(view, [Attribute::Energy, Attribute::Danceability], params);
                peak_position(view, &candidates)
            }
            Self::Setlist => {
                let candidates =
                    arc_candidates(view, [Attribute::Energy, Attribute::Popularity], params);
                floor_position(view, &candidates)
            }
            Self::Genre => {
                let candidates = genre_candidates(view, params);
                tie_break.choose(view, &candidates, params, rng)
            }
        };
        log::trace!(
            "{selector} selector {outcome}",
            selector = self,
            outcome = if selected.is_some() {
                "succeeded"
            } else {
                "found no candidate"
            }
        );
        selected
    }
}

/// Candidates passing the strict filter chain.
///
/// Artist recency, then harmonic key, then tempo, then the energy band.
#[must_use]
pub fn dj_candidates(view: &View<'_>, candidates: &[usize], params: &Params) -> Vec<usize> {
    let candidates = filter::artist_recency(view, candidates, params);
    let candidates = filter::harmonic_key(view, &candidates);
    let candidates = filter::tempo(view, &candidates, params);
    filter::banded(view, &candidates, Attribute::Energy, params)
}

fn basic_candidates(view: &View<'_>, params: &Params) -> Vec<usize> {
    let candidates = filter::artist_recency(view, view.donor_positions(), params);
    filter::union([
        filter::harmonic_key(view, &candidates),
        filter::tempo(view, &candidates, params),
        filter::banded(view, &candidates, Attribute::Energy, params),
        filter::banded(view, &candidates, Attribute::Danceability, params),
    ])
}

/// Artist recency, harmonic key, and tempo.
fn mixable_candidates(view: &View<'_>, params: &Params) -> Vec<usize> {
    let candidates = filter::artist_recency(view, view.donor_positions(), params);
    let candidates = filter::harmonic_key(view, &candidates);
    filter::tempo(view, &candidates, params)
}

fn arc_candidates(view: &View<'_>, attributes: [Attribute; 2], params: &Params) -> Vec<usize> {
    let candidates = mixable_candidates(view, params);
    filter::union(
        attributes
            .map(|attribute| filter::banded(view, &candidates, attribute, params)),
    )
}

fn genre_candidates(view: &View<'_>, params: &Params) -> Vec<usize> {
    let candidates = mixable_candidates(view, params);
    let same_genre = filter::equal(view, &candidates, Attribute::Genre);
    if same_genre.is_empty() {
        filter::banded(view, &candidates, Attribute::Genre, params)
    } else {
        same_genre
    }
}

fn party_rank(track: &Track) -> (u8, u8) {
    (track.energy.value(), track.danceability.value())
}

fn setlist_rank(track: &Track) -> (u8, u8) {
    (track.energy.value(), track.popularity.value())
}

/// The candidate with the maximum (energy, danceability).
///
/// Ties resolve to the lowest position.
#[must_use]
pub fn peak_position(view: &View<'_>, candidates: &[usize]) -> Option<usize> {
    candidates
        .iter()
        .copied()
        .min_by_key(|&position| Reverse(party_rank(view.donor_track(position))))
}

/// The candidate with the minimum (energy, popularity).
///
/// Ties resolve to the lowest position.
#[must_use]
pub fn floor_position(view: &View<'_>, candidates: &[usize]) -> Option<usize> {
    candidates
        .iter()
        .copied()
        .min_by_key(|&position| setlist_rank(view.donor_track(position)))
}
