// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Domain model of the harmonic playlist sequencer.
//!
//! All types are plain values without any behavior that depends on
//! external state. Extraction of features from raw tracks happens
//! elsewhere, this crate only defines and validates their shape.

pub mod music;
pub mod track;

pub use self::track::{
    ArtistName, Level, Placement, SelectType, Track, TrackId, TrackInvalidity,
};

pub mod prelude {
    // Re-export trait methods from semval
    pub use semval::{IsValid as _, Validate as _};

    pub(crate) use semval::prelude::*;
}
