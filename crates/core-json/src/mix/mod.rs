// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::{prelude::*, track::Track};

mod _core {
    pub(super) use segue_core::track::{Placement, SelectType};
}

/// A placed feature record, tagged with how it has been selected.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(test, derive(PartialEq))]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(flatten)]
    pub track: Track,

    pub select_type: _core::SelectType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_moving_average: Option<f64>,
}

impl From<_core::Placement> for Entry {
    fn from(from: _core::Placement) -> Self {
        let _core::Placement {
            track,
            select_type,
        } = from;
        Self {
            track: track.into(),
            select_type,
            energy_moving_average: None,
        }
    }
}

/// Convert a mixed sequence into entries in the same order.
///
/// The moving average, if available, is expected to contain one value
/// per placement.
#[must_use]
pub fn export_placements(
    placements: Vec<_core::Placement>,
    energy_moving_average: Option<Vec<Option<f64>>>,
) -> Vec<Entry> {
    debug_assert!(
        energy_moving_average
            .as_ref()
            .is_none_or(|values| values.len() == placements.len())
    );
    let mut moving_average = energy_moving_average.into_iter().flatten();
    placements
        .into_iter()
        .map(|placement| Entry {
            energy_moving_average: moving_average.next().flatten(),
            ..placement.into()
        })
        .collect()
}

#[cfg(test)]
mod tests;
