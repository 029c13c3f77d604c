// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! JSON representation of feature records and mixed sequences.

pub mod prelude {
    pub(crate) use serde::{Deserialize, Serialize};
}

pub mod mix;
pub mod track;
