// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use segue_core::{Placement, SelectType, Track};

/// Unplaced tracks and the placed sequence.
///
/// Every track is either in the donor pool or in a recipient
/// sequence. The only mutation is moving a single track from the
/// donor pool into a recipient sequence.
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    donor: Vec<Track>,
    recipient: Vec<Placement>,
}

impl WorkingSet {
    #[must_use]
    pub fn new(tracks: Vec<Track>) -> Self {
        let recipient = Vec::with_capacity(tracks.len());
        Self {
            donor: tracks,
            recipient,
        }
    }

    #[must_use]
    pub fn donor(&self) -> &[Track] {
        &self.donor
    }

    #[must_use]
    pub fn recipient(&self) -> &[Placement] {
        &self.recipient
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.donor.is_empty()
    }

    /// A view on the donor pool and the own recipient sequence.
    #[must_use]
    pub fn view(&self) -> View<'_> {
        self.view_with(&self.recipient)
    }

    /// A view on the donor pool and a foreign recipient sequence.
    #[must_use]
    pub fn view_with<'a>(&'a self, recipient: &'a [Placement]) -> View<'a> {
        View::new(
            &self.donor,
            recipient.iter().map(|placement| &placement.track).collect(),
        )
    }

    /// Move a donor track into the own recipient sequence.
    ///
    /// The relative order of the remaining donor tracks is preserved.
    pub fn place(&mut self, position: usize, select_type: SelectType) {
        let placement = self.take(position, select_type);
        self.recipient.push(placement);
    }

    /// Move a donor track into a foreign recipient sequence.
    pub fn place_into(
        &mut self,
        position: usize,
        select_type: SelectType,
        recipient: &mut Vec<Placement>,
    ) {
        let placement = self.take(position, select_type);
        recipient.push(placement);
    }

    fn take(&mut self, position: usize, select_type: SelectType) -> Placement {
        let track = self.donor.remove(position);
        log::trace!("Placing track {id} as {select_type}", id = track.id);
        Placement { track, select_type }
    }

    #[must_use]
    pub fn into_recipient(self) -> Vec<Placement> {
        debug_assert!(self.is_exhausted());
        self.recipient
    }
}

/// Immutable snapshot of a donor pool and a recipient sequence.
///
/// Donor tracks are referenced by their position in the donor pool.
/// A placement can be simulated without touching the underlying
/// collections.
#[derive(Debug, Clone)]
pub struct View<'a> {
    donor: &'a [Track],
    donor_positions: Vec<usize>,
    recipient: Vec<&'a Track>,
}

impl<'a> View<'a> {
    #[must_use]
    pub fn new(donor: &'a [Track], recipient: Vec<&'a Track>) -> Self {
        Self {
            donor,
            donor_positions: (0..donor.len()).collect(),
            recipient,
        }
    }

    /// The positions of all available donor tracks in ascending order.
    #[must_use]
    pub fn donor_positions(&self) -> &[usize] {
        &self.donor_positions
    }

    #[must_use]
    pub fn donor_track(&self, position: usize) -> &'a Track {
        &self.donor[position]
    }

    pub fn donor_tracks(&self) -> impl Iterator<Item = &'a Track> + '_ {
        let donor = self.donor;
        self.donor_positions
            .iter()
            .map(move |&position| &donor[position])
    }

    #[must_use]
    pub fn recipient(&self) -> &[&'a Track] {
        &self.recipient
    }

    /// The most recently placed track.
    #[must_use]
    pub fn last_placed(&self) -> Option<&'a Track> {
        self.recipient.last().copied()
    }

    /// Total number of tracks in both the donor pool and the recipient sequence.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.donor_positions.len() + self.recipient.len()
    }

    /// Simulate moving a donor track into the recipient sequence.
    #[must_use]
    pub fn with_placed(&self, position: usize) -> Self {
        debug_assert!(self.donor_positions.contains(&position));
        let donor_positions = self
            .donor_positions
            .iter()
            .copied()
            .filter(|&donor_position| donor_position != position)
            .collect();
        let mut recipient = Vec::with_capacity(self.recipient.len() + 1);
        recipient.extend_from_slice(&self.recipient);
        recipient.push(&self.donor[position]);
        Self {
            donor: self.donor,
            donor_positions,
            recipient,
        }
    }
}
