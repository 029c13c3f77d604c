// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Harmonic playlist sequencing.
//!
//! Re-exports the domain model together with the optional sequencing
//! engine and JSON mapping.

pub use segue_core::*;

#[cfg(feature = "json")]
pub use segue_core_json as json;

#[cfg(feature = "usecases")]
pub use segue_usecases as usecases;
