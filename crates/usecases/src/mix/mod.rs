// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::num::NonZeroUsize;

use hashbrown::HashSet;
use rand::Rng;
use semval::Validate as _;
use static_assertions::const_assert_eq;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use segue_core::{Placement, SelectType, Track, TrackId};

use crate::{
    Error, Result,
    filter::{self, Attribute},
    select::{self, Selector, TieBreak},
    working_set::WorkingSet,
};

/// The overall shape of a sequence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Profile {
    /// Smooth transitions from a random start
    Dj,

    /// Rising to the most energetic track in the middle and falling again
    Party,

    /// Falling to the least energetic track in the middle and rising again
    Setlist,

    /// Tracks of similar genres grouped together
    Genre,
}

const DJ_CASCADE: &[(Selector, SelectType)] = &[
    (Selector::Dj, SelectType::Dj),
    (Selector::Basic, SelectType::Basic),
    (Selector::Random, SelectType::Random),
];

const PARTY_CASCADE: &[(Selector, SelectType)] = &[
    (Selector::Party, SelectType::Party),
    (Selector::Dj, SelectType::Dj),
    (Selector::Basic, SelectType::Basic),
    (Selector::Random, SelectType::Random),
];

const SETLIST_CASCADE: &[(Selector, SelectType)] = &[
    (Selector::Setlist, SelectType::Setlist),
    (Selector::Dj, SelectType::Dj),
    (Selector::Basic, SelectType::Basic),
    (Selector::Random, SelectType::Random),
];

const GENRE_CASCADE: &[(Selector, SelectType)] = &[
    (Selector::Genre, SelectType::Genre),
    (Selector::Basic, SelectType::Basic),
    (Selector::Random, SelectType::Random),
];

impl Profile {
    /// Selectors ordered from strict to relaxed.
    ///
    /// The last selector never fails while donor tracks remain.
    #[must_use]
    pub const fn cascade(self) -> &'static [(Selector, SelectType)] {
        match self {
            Self::Dj => DJ_CASCADE,
            Self::Party => PARTY_CASCADE,
            Self::Setlist => SETLIST_CASCADE,
            Self::Genre => GENRE_CASCADE,
        }
    }

    /// The tag of the most desirable selector.
    #[must_use]
    pub const fn best_select_type(self) -> SelectType {
        self.cascade()[0].1
    }

    /// Arc profiles grow two halves around an energy extreme.
    #[must_use]
    pub const fn is_arc(self) -> bool {
        matches!(self, Self::Party | Self::Setlist)
    }

    #[must_use]
    pub const fn required_attribute(self) -> Option<Attribute> {
        match self {
            Self::Genre => Some(Attribute::Genre),
            Self::Dj | Self::Party | Self::Setlist => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct Params {
    pub filter: filter::Params,

    pub tie_break: TieBreak,

    /// The window of the energy moving average is the number of
    /// tracks divided by this value.
    pub moving_average_divisor: NonZeroUsize,

    /// Start with this track instead of a random one.
    ///
    /// Only supported by linear profiles.
    pub first_track: Option<TrackId>,
}

pub const DEFAULT_MOVING_AVERAGE_DIVISOR: NonZeroUsize = NonZeroUsize::MIN.saturating_add(9);

const_assert_eq!(10, DEFAULT_MOVING_AVERAGE_DIVISOR.get());

impl Params {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            filter: filter::Params::new(),
            tie_break: TieBreak::Random,
            moving_average_divisor: DEFAULT_MOVING_AVERAGE_DIVISOR,
            first_track: None,
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mixed {
    pub placements: Vec<Placement>,

    /// Trailing moving average of the energy, only for arc profiles.
    ///
    /// Contains one entry per placement. Entries are `None` until
    /// the window is filled.
    pub energy_moving_average: Option<Vec<Option<f64>>>,
}

impl Mixed {
    #[must_use]
    pub fn count_select_type(&self, select_type: SelectType) -> usize {
        self.placements
            .iter()
            .filter(|placement| placement.select_type == select_type)
            .count()
    }

    pub fn track_ids(&self) -> impl Iterator<Item = &TrackId> {
        self.placements.iter().map(|placement| &placement.track.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Seeding,
    Extending,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Half {
    Front,
    Back,
}

impl Half {
    const fn other(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }
}

/// Builds a sequence one placement at a time.
#[derive(Debug)]
pub struct Sequencer<'p> {
    profile: Profile,
    params: &'p Params,
    first_track_position: Option<usize>,
    working_set: WorkingSet,
    back_half: Vec<Placement>,
    next_half: Half,
    phase: Phase,
}

impl<'p> Sequencer<'p> {
    /// Validate all tracks and prepare the working set.
    pub fn new(profile: Profile, tracks: Vec<Track>, params: &'p Params) -> Result<Self> {
        validate_tracks(profile, &tracks)?;
        let first_track_position = if let Some(first_track) = &params.first_track {
            if profile.is_arc() {
                return Err(Error::FirstTrackNotSupported(profile));
            }
            let position = tracks
                .iter()
                .position(|track| &track.id == first_track)
                .ok_or_else(|| Error::UnknownFirstTrack(first_track.clone()))?;
            Some(position)
        } else {
            None
        };
        Ok(Self {
            profile,
            params,
            first_track_position,
            working_set: WorkingSet::new(tracks),
            back_half: Vec::new(),
            next_half: Half::Back,
            phase: Phase::Seeding,
        })
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Place the next track and return the resulting phase.
    pub fn step<R>(&mut self, rng: &mut R) -> Phase
    where
        R: Rng + ?Sized,
    {
        match self.phase {
            Phase::Seeding => self.seed(rng),
            Phase::Extending => self.extend(rng),
            Phase::Done => (),
        }
        if self.working_set.is_exhausted() {
            self.phase = Phase::Done;
        } else if self.phase == Phase::Seeding {
            self.phase = Phase::Extending;
        }
        self.phase
    }

    fn seed<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        if self.working_set.is_exhausted() {
            return;
        }
        let view = self.working_set.view();
        let seed = if let Some(position) = self.first_track_position {
            Some((position, SelectType::Seed))
        } else {
            match self.profile {
                Profile::Dj | Profile::Genre => Selector::Random
                    .select(&view, &self.params.filter, TieBreak::Random, rng)
                    .map(|position| (position, SelectType::Random)),
                Profile::Party => select::peak_position(&view, view.donor_positions())
                    .map(|position| (position, SelectType::Peak)),
                Profile::Setlist => select::floor_position(&view, view.donor_positions())
                    .map(|position| (position, SelectType::Floor)),
            }
        };
        let Some((position, select_type)) = seed else {
            return;
        };
        log::debug!(
            "Seeding {profile} mix with track {id} as {select_type}",
            profile = self.profile,
            id = view.donor_track(position).id,
        );
        self.working_set.place(position, select_type);
    }

    fn extend<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let half = if self.profile.is_arc() {
            let half = self.next_half;
            self.next_half = half.other();
            half
        } else {
            Half::Front
        };
        // A still empty back half continues from the front half
        let compared_half = if half == Half::Back && !self.back_half.is_empty() {
            &self.back_half[..]
        } else {
            self.working_set.recipient()
        };
        let view = self.working_set.view_with(compared_half);
        let selected = self
            .profile
            .cascade()
            .iter()
            .find_map(|&(selector, select_type)| {
                selector
                    .select(&view, &self.params.filter, self.params.tie_break, rng)
                    .map(|position| (position, select_type))
            });
        let Some((position, select_type)) = selected else {
            // Unreachable while the cascade ends with the random selector
            log::warn!("No track selected from {} donor tracks", view.donor_positions().len());
            self.phase = Phase::Done;
            return;
        };
        match half {
            Half::Front => self.working_set.place(position, select_type),
            Half::Back => {
                self.working_set
                    .place_into(position, select_type, &mut self.back_half);
            }
        }
    }

    /// Run until all tracks have been placed.
    pub fn run<R>(mut self, rng: &mut R) -> Mixed
    where
        R: Rng + ?Sized,
    {
        while self.step(rng) != Phase::Done {}
        self.finish()
    }

    fn finish(self) -> Mixed {
        let Self {
            profile,
            params,
            working_set,
            back_half,
            ..
        } = self;
        let mut placements = working_set.into_recipient();
        let energy_moving_average = if profile.is_arc() {
            placements.reverse();
            placements.extend(back_half);
            Some(energy_moving_average(
                &placements,
                params.moving_average_divisor,
            ))
        } else {
            debug_assert!(back_half.is_empty());
            None
        };
        let mixed = Mixed {
            placements,
            energy_moving_average,
        };
        log::info!(
            "Mixed {count} tracks with profile {profile}: {best} {best_select_type}, {random} random",
            count = mixed.placements.len(),
            best_select_type = profile.best_select_type(),
            best = mixed.count_select_type(profile.best_select_type()),
            random = mixed.count_select_type(SelectType::Random),
        );
        mixed
    }
}

fn validate_tracks(profile: Profile, tracks: &[Track]) -> Result<()> {
    let mut track_ids = HashSet::with_capacity(tracks.len());
    for track in tracks {
        if let Err(err) = track.validate() {
            return Err(Error::InvalidTrack {
                track_id: track.id.clone(),
                invalidities: err.into_iter().collect(),
            });
        }
        if !track_ids.insert(&track.id) {
            return Err(Error::DuplicateTrackId(track.id.clone()));
        }
    }
    if let Some(attribute) = profile.required_attribute()
        && let Some(track) = tracks
            .iter()
            .find(|track| attribute.band_value_of(track).is_none())
    {
        return Err(Error::MissingAttribute {
            profile,
            attribute,
            track_id: track.id.clone(),
        });
    }
    Ok(())
}

/// Trailing moving average of the energy.
///
/// The window spans the number of placements divided by the divisor,
/// but at least a single placement.
#[must_use]
pub fn energy_moving_average(
    placements: &[Placement],
    divisor: NonZeroUsize,
) -> Vec<Option<f64>> {
    let window = (placements.len() / divisor.get()).max(1);
    (0..placements.len())
        .map(|end| {
            if end + 1 < window {
                return None;
            }
            let sum: u32 = placements[end + 1 - window..=end]
                .iter()
                .map(|placement| u32::from(placement.track.energy.value()))
                .sum();
            Some(f64::from(sum) / window as f64)
        })
        .collect()
}

/// Reorder tracks according to a profile.
///
/// Empty input results in empty output.
pub fn mix<R>(profile: Profile, tracks: Vec<Track>, params: &Params, rng: &mut R) -> Result<Mixed>
where
    R: Rng + ?Sized,
{
    let sequencer = Sequencer::new(profile, tracks, params)?;
    Ok(sequencer.run(rng))
}

#[cfg(test)]
mod tests;
