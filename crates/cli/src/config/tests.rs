// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::num::NonZeroUsize;

use segue_core::TrackId;
use segue_usecases::select::TieBreak;

use super::*;

#[test]
fn empty_config_yields_defaults() {
    assert_eq!(Params::new(), parse_params(b"()").unwrap());
}

#[test]
fn partial_config_overrides_defaults() {
    let params = parse_params(
        br#"(
            filter: (
                artistWindow: 3,
            ),
            tieBreak: lookahead,
            movingAverageDivisor: 4,
            firstTrack: Some("t1"),
        )"#,
    )
    .unwrap();
    assert_eq!(3, params.filter.artist_window);
    assert_eq!(Params::new().filter.tempo_bands, params.filter.tempo_bands);
    assert_eq!(TieBreak::Lookahead, params.tie_break);
    assert_eq!(NonZeroUsize::new(4), Some(params.moving_average_divisor));
    assert_eq!(Some(TrackId::new("t1")), params.first_track);
}

#[test]
fn invalid_config_is_rejected() {
    assert!(parse_params(b"(movingAverageDivisor: 0)").is_err());
    assert!(parse_params(b"(tieBreak: fastest)").is_err());
}
