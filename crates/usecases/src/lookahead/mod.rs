// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! One level of lookahead for breaking ties between candidates.

use crate::{filter::Params, select::dj_candidates, working_set::View};

/// Count the donor tracks that remain strictly compatible if the
/// candidate was placed next.
///
/// The placement is only simulated on a snapshot of the view.
/// Looking ahead stops after a single level.
#[must_use]
pub fn drill_depth(view: &View<'_>, candidate: usize, params: &Params) -> usize {
    let snapshot = view.with_placed(candidate);
    dj_candidates(&snapshot, snapshot.donor_positions(), params).len()
}

/// The candidate with the maximum drill depth.
///
/// Ties resolve to the first candidate in the given order.
#[must_use]
pub fn pick_deepest(view: &View<'_>, candidates: &[usize], params: &Params) -> Option<usize> {
    let mut deepest: Option<(usize, usize)> = None;
    for &candidate in candidates {
        let depth = drill_depth(view, candidate, params);
        log::trace!("Drill depth of candidate {candidate}: {depth}");
        if deepest.is_none_or(|(_, max_depth)| depth > max_depth) {
            deepest = Some((candidate, depth));
        }
    }
    deepest.map(|(candidate, _)| candidate)
}
