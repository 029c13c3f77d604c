// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Greedy construction of harmonically mixable track sequences.
//!
//! Tracks are moved one by one from an unordered donor pool into an
//! ordered recipient sequence. Each step walks a cascade of selectors
//! from strict to relaxed until one of them yields a candidate.

use std::result::Result as StdResult;

use thiserror::Error;

use segue_core::{TrackId, TrackInvalidity};

pub mod filter;
pub mod lookahead;
pub mod mix;
pub mod optimize;
pub mod select;
pub mod working_set;

use self::{filter::Attribute, mix::Profile};

#[derive(Error, Debug)]
pub enum Error {
    #[error("profile {profile} requires the {attribute} of track {track_id}")]
    MissingAttribute {
        profile: Profile,
        attribute: Attribute,
        track_id: TrackId,
    },

    #[error("invalid track {track_id}: {invalidities:?}")]
    InvalidTrack {
        track_id: TrackId,
        invalidities: Vec<TrackInvalidity>,
    },

    #[error("duplicate track {0}")]
    DuplicateTrackId(TrackId),

    #[error("unknown first track {0}")]
    UnknownFirstTrack(TrackId),

    #[error("profile {0} does not support a first track")]
    FirstTrackNotSupported(Profile),
}

pub type Result<T> = StdResult<T, Error>;
