// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::num::NonZeroUsize;

use rand::Rng;

use segue_core::{SelectType, Track};

use crate::{
    Result,
    mix::{self, Mixed, Profile},
};

#[derive(Debug, Clone)]
pub struct Optimized {
    pub mixed: Mixed,

    /// Number of placements by the most desirable selector
    pub best_count: usize,

    /// Number of placements chosen at random
    pub random_count: usize,
}

impl Optimized {
    #[must_use]
    pub fn score(&self) -> isize {
        self.best_count as isize - self.random_count as isize
    }
}

/// Mix repeatedly and keep the best run.
///
/// Each run is scored by the number of placements of the profile's most
/// desirable selector minus the number of random placements. The first
/// run wins ties. Without an explicit number of iterations the tracks
/// are mixed once per track.
pub fn optimize<R>(
    profile: Profile,
    tracks: &[Track],
    params: &mix::Params,
    iterations: Option<NonZeroUsize>,
    rng: &mut R,
) -> Result<Optimized>
where
    R: Rng + ?Sized,
{
    let iterations = iterations
        .or_else(|| NonZeroUsize::new(tracks.len()))
        .unwrap_or(NonZeroUsize::MIN);
    let best_select_type = profile.best_select_type();
    let mut best: Option<Optimized> = None;
    for iteration in 0..iterations.get() {
        let mixed = mix::mix(profile, tracks.to_vec(), params, rng)?;
        let candidate = Optimized {
            best_count: mixed.count_select_type(best_select_type),
            random_count: mixed.count_select_type(SelectType::Random),
            mixed,
        };
        log::debug!(
            "Iteration {current}/{total} of {profile} mix: {best_count} {best_select_type}, {random_count} random",
            current = iteration + 1,
            total = iterations,
            best_count = candidate.best_count,
            random_count = candidate.random_count,
        );
        if best
            .as_ref()
            .is_none_or(|best| candidate.score() > best.score())
        {
            best = Some(candidate);
        }
    }
    // At least one iteration has been run
    let best = best.unwrap_or_else(|| Optimized {
        mixed: Mixed::default(),
        best_count: 0,
        random_count: 0,
    });
    log::info!(
        "Optimized {profile} mix: {best_count} {best_select_type}, {random_count} random",
        best_count = best.best_count,
        random_count = best.random_count,
    );
    Ok(best)
}
