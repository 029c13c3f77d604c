// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use strum::IntoEnumIterator as _;
use test_log::test;

use segue_core::{
    Level,
    music::{
        genre::GenreScalar,
        tempo::{TempoBand, TempoBpm},
    },
};

use super::*;
use crate::tests::{new_track, seeded_rng};

const CAMELOT_KEYS: [&str; 24] = [
    "1A", "1B", "2A", "2B", "3A", "3B", "4A", "4B", "5A", "5B", "6A", "6B", "7A", "7B", "8A",
    "8B", "9A", "9B", "10A", "10B", "11A", "11B", "12A", "12B",
];

fn pool(len: usize) -> Vec<Track> {
    (0..len)
        .map(|i| {
            let mut track = new_track(
                &format!("t{i}"),
                &format!("Artist {}", i % 7),
                CAMELOT_KEYS[(i * 5) % CAMELOT_KEYS.len()],
                90.0 + ((i * 7) % 60) as f64,
                (i % 11) as u8,
            );
            track.danceability = Level::new(((i * 3) % 11) as u8);
            track.popularity = Level::new(((i * 7) % 11) as u8);
            track.genre = Some(GenreScalar::new(((i * 13) % 101) as f64 / 100.0));
            track
        })
        .collect()
}

fn sorted_ids<'a>(ids: impl Iterator<Item = &'a TrackId>) -> Vec<String> {
    let mut ids = ids.map(|id| id.as_str().to_owned()).collect::<Vec<_>>();
    ids.sort();
    ids
}

fn select_types(mixed: &Mixed) -> Vec<SelectType> {
    mixed
        .placements
        .iter()
        .map(|placement| placement.select_type)
        .collect()
}

#[test]
fn empty_input_results_in_empty_output() {
    for profile in Profile::iter() {
        let mixed = mix(profile, vec![], &Params::new(), &mut seeded_rng(0)).unwrap();
        assert!(mixed.placements.is_empty());
    }
}

#[test]
fn single_track() {
    for profile in Profile::iter() {
        let mixed = mix(profile, pool(1), &Params::new(), &mut seeded_rng(0)).unwrap();
        assert_eq!(1, mixed.placements.len());
    }
}

#[test]
fn output_is_a_permutation_of_the_input() {
    let tracks = pool(40);
    let expected_ids = sorted_ids(tracks.iter().map(|track| &track.id));
    for profile in Profile::iter() {
        for tie_break in TieBreak::iter() {
            for seed in 0..3 {
                let params = Params {
                    tie_break,
                    ..Params::new()
                };
                let mixed = mix(profile, tracks.clone(), &params, &mut seeded_rng(seed)).unwrap();
                assert_eq!(expected_ids, sorted_ids(mixed.track_ids()));
            }
        }
    }
}

#[test]
fn every_placement_is_tagged_by_the_profile() {
    let tracks = pool(40);
    for profile in Profile::iter() {
        let mixed = mix(profile, tracks.clone(), &Params::new(), &mut seeded_rng(1)).unwrap();
        let seed_type = match profile {
            Profile::Dj | Profile::Genre => SelectType::Random,
            Profile::Party => SelectType::Peak,
            Profile::Setlist => SelectType::Floor,
        };
        if profile.is_arc() {
            assert_eq!(1, mixed.count_select_type(seed_type));
        } else {
            assert_eq!(seed_type, mixed.placements[0].select_type);
        }
        for placement in &mixed.placements {
            let select_type = placement.select_type;
            assert!(
                select_type == seed_type
                    || profile
                        .cascade()
                        .iter()
                        .any(|(_, cascade_type)| *cascade_type == select_type),
                "unexpected {select_type} with profile {profile}"
            );
        }
    }
}

#[test]
fn dj_seeds_randomly() {
    let mixed = mix(Profile::Dj, pool(10), &Params::new(), &mut seeded_rng(2)).unwrap();
    assert_eq!(SelectType::Random, mixed.placements[0].select_type);
    assert!(mixed.energy_moving_average.is_none());
}

#[test]
fn five_track_scenario() {
    let tracks = vec![
        new_track("120", "A", "8B", 120.0, 5),
        new_track("121", "B", "8B", 121.0, 5),
        new_track("240", "C", "8B", 240.0, 5),
        new_track("60", "D", "8B", 60.0, 5),
        new_track("200", "E", "8B", 200.0, 5),
    ];
    let params = Params {
        tie_break: TieBreak::Lookahead,
        first_track: Some(TrackId::new("120")),
        ..Params::new()
    };
    let mixed = mix(Profile::Dj, tracks.clone(), &params, &mut seeded_rng(0)).unwrap();
    let ids = mixed
        .track_ids()
        .take(3)
        .map(TrackId::as_str)
        .collect::<Vec<_>>();
    assert_eq!(vec!["120", "121", "240"], ids);
    assert_eq!(
        vec![
            SelectType::Seed,
            SelectType::Dj,
            SelectType::Dj,
            SelectType::Basic,
            SelectType::Basic,
        ],
        select_types(&mixed)
    );

    // With random tie breaking
    for seed in 0..20 {
        let params = Params {
            first_track: Some(TrackId::new("120")),
            ..Params::new()
        };
        let mixed = mix(Profile::Dj, tracks.clone(), &params, &mut seeded_rng(seed)).unwrap();
        assert_eq!(0, mixed.count_select_type(SelectType::Random));
        let placements = &mixed.placements;
        // The track at 120 bpm is always followed by a strictly compatible track
        assert_eq!(SelectType::Dj, placements[1].select_type);
        for pair in placements.windows(2) {
            let [prev, next] = pair else {
                unreachable!();
            };
            if next.select_type == SelectType::Dj {
                assert!(TempoBand::DEFAULT_BANDS
                    .iter()
                    .any(|band| band.contains(prev.track.tempo_bpm, next.track.tempo_bpm)));
            }
        }
        // No other track is compatible to the track at 200 bpm
        let placement_200 = placements
            .iter()
            .find(|placement| placement.track.id.as_str() == "200")
            .unwrap();
        assert_eq!(SelectType::Basic, placement_200.select_type);
    }
}

#[test]
fn party_arc_peaks_in_the_middle() {
    for len in [2, 9, 10, 25] {
        let tracks = pool(len);
        let peak_rank = tracks
            .iter()
            .map(|track| (track.energy, track.danceability))
            .max()
            .unwrap();
        let mixed = mix(Profile::Party, tracks, &Params::new(), &mut seeded_rng(3)).unwrap();
        assert_eq!(len, mixed.placements.len());
        assert_eq!(1, mixed.count_select_type(SelectType::Peak));
        let middle = &mixed.placements[(len - 1) / 2];
        assert_eq!(SelectType::Peak, middle.select_type);
        assert_eq!(
            peak_rank,
            (middle.track.energy, middle.track.danceability)
        );
        let moving_average = mixed.energy_moving_average.unwrap();
        assert_eq!(len, moving_average.len());
        let window = (len / 10).max(1);
        assert!(moving_average[..window - 1].iter().all(Option::is_none));
        assert!(moving_average[window - 1..].iter().all(Option::is_some));
    }
}

#[test]
fn party_arc_energy_rises_and_falls() {
    let tracks = (0..30)
        .map(|i| {
            new_track(
                &format!("t{i}"),
                &format!("Artist {i}"),
                "8B",
                120.0,
                (i % 11) as u8,
            )
        })
        .collect::<Vec<_>>();
    for seed in 0..5 {
        let mixed =
            mix(Profile::Party, tracks.clone(), &Params::new(), &mut seeded_rng(seed)).unwrap();
        let peak = 14;
        assert_eq!(SelectType::Peak, mixed.placements[peak].select_type);
        let energies = mixed
            .placements
            .iter()
            .map(|placement| placement.track.energy.value())
            .collect::<Vec<_>>();
        assert!(energies[..=peak].is_sorted());
        assert!(energies[peak..].iter().rev().is_sorted());

        let window = 3;
        let moving_average = mixed
            .energy_moving_average
            .unwrap()
            .into_iter()
            .skip(window - 1)
            .collect::<Option<Vec<_>>>()
            .unwrap();
        // Rising until the window reaches the peak
        for pair in moving_average[..=peak + 1 - window].windows(2) {
            assert!(pair[0] <= pair[1] + 1e-9);
        }
        // Falling after the window has left the rising half
        for pair in moving_average[peak..].windows(2) {
            assert!(pair[0] + 1e-9 >= pair[1]);
        }
    }
}

#[test]
fn lookahead_does_not_affect_the_random_fallback() {
    // Neither key, tempo, energy, nor danceability are compatible
    let tracks = [("1A", 100.0, 0), ("4A", 130.0, 3), ("7A", 170.0, 6), ("10A", 75.0, 9)]
        .into_iter()
        .enumerate()
        .map(|(i, (camelot, bpm, level))| {
            let mut track =
                new_track(&format!("t{i}"), &format!("Artist {i}"), camelot, bpm, level);
            track.danceability = Level::new(level);
            track
        })
        .collect::<Vec<_>>();
    let params = Params {
        tie_break: TieBreak::Lookahead,
        first_track: Some(TrackId::new("t0")),
        ..Params::new()
    };
    let mut orders = (0..30)
        .map(|seed| {
            let mixed = mix(Profile::Dj, tracks.clone(), &params, &mut seeded_rng(seed)).unwrap();
            assert_eq!(3, mixed.count_select_type(SelectType::Random));
            mixed
                .track_ids()
                .map(|id| id.as_str().to_owned())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    orders.sort();
    orders.dedup();
    assert!(orders.len() > 1);
}

#[test]
fn setlist_arc_has_the_floor_in_the_middle() {
    let tracks = pool(17);
    let floor_rank = tracks
        .iter()
        .map(|track| (track.energy, track.popularity))
        .min()
        .unwrap();
    let mixed = mix(Profile::Setlist, tracks, &Params::new(), &mut seeded_rng(4)).unwrap();
    let middle = &mixed.placements[8];
    assert_eq!(SelectType::Floor, middle.select_type);
    assert_eq!(floor_rank, (middle.track.energy, middle.track.popularity));
    assert!(mixed.energy_moving_average.is_some());
}

#[test]
fn arc_halves_are_joined_around_the_extreme() {
    let tracks = vec![
        new_track("peak", "A", "8B", 120.0, 9),
        new_track("b", "B", "8B", 120.0, 8),
        new_track("c", "C", "8B", 120.0, 8),
    ];
    let mixed = mix(Profile::Party, tracks, &Params::new(), &mut seeded_rng(0)).unwrap();
    // The back half is extended first and then the front half
    let ids = mixed.track_ids().map(TrackId::as_str).collect::<Vec<_>>();
    assert_eq!(vec!["c", "peak", "b"], ids);
    assert_eq!(
        vec![SelectType::Party, SelectType::Peak, SelectType::Party],
        select_types(&mixed)
    );
}

#[test]
fn genre_requires_all_genres() {
    let mut tracks = pool(5);
    tracks[3].genre = None;
    let err = mix(Profile::Genre, tracks.clone(), &Params::new(), &mut seeded_rng(0)).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingAttribute {
            profile: Profile::Genre,
            attribute: Attribute::Genre,
            track_id,
        } if track_id.as_str() == "t3"
    ));
    // Other profiles ignore the genre
    assert!(mix(Profile::Dj, tracks, &Params::new(), &mut seeded_rng(0)).is_ok());
}

#[test]
fn invalid_tracks_are_rejected() {
    let mut tracks = pool(5);
    tracks[2].tempo_bpm = TempoBpm::new(0.0);
    let err = mix(Profile::Dj, tracks, &Params::new(), &mut seeded_rng(0)).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidTrack { track_id, invalidities }
            if track_id.as_str() == "t2" && invalidities.len() == 1
    ));
}

#[test]
fn duplicate_track_ids_are_rejected() {
    let mut tracks = pool(5);
    tracks[4].id = TrackId::new("t1");
    let err = mix(Profile::Dj, tracks, &Params::new(), &mut seeded_rng(0)).unwrap_err();
    assert!(matches!(err, Error::DuplicateTrackId(track_id) if track_id.as_str() == "t1"));
}

#[test]
fn first_track() {
    let params = Params {
        first_track: Some(TrackId::new("t7")),
        ..Params::new()
    };
    for profile in [Profile::Dj, Profile::Genre] {
        for seed in 0..5 {
            let mixed = mix(profile, pool(10), &params, &mut seeded_rng(seed)).unwrap();
            assert_eq!("t7", mixed.placements[0].track.id.as_str());
            assert_eq!(SelectType::Seed, mixed.placements[0].select_type);
            assert_eq!(1, mixed.count_select_type(SelectType::Seed));
        }
    }
    for profile in [Profile::Party, Profile::Setlist] {
        let err = mix(profile, pool(10), &params, &mut seeded_rng(0)).unwrap_err();
        assert!(matches!(err, Error::FirstTrackNotSupported(p) if p == profile));
    }
    let params = Params {
        first_track: Some(TrackId::new("unknown")),
        ..Params::new()
    };
    let err = mix(Profile::Dj, pool(10), &params, &mut seeded_rng(0)).unwrap_err();
    assert!(matches!(err, Error::UnknownFirstTrack(track_id) if track_id.as_str() == "unknown"));
}

#[test]
fn same_seed_same_sequence() {
    for profile in Profile::iter() {
        let lhs = mix(profile, pool(30), &Params::new(), &mut seeded_rng(42)).unwrap();
        let rhs = mix(profile, pool(30), &Params::new(), &mut seeded_rng(42)).unwrap();
        assert_eq!(lhs, rhs);
    }
}

#[test]
fn sequencer_phases() {
    let params = Params::new();
    let mut rng = seeded_rng(0);
    let mut sequencer = Sequencer::new(Profile::Dj, pool(3), &params).unwrap();
    assert_eq!(Phase::Seeding, sequencer.phase());
    assert_eq!(Phase::Extending, sequencer.step(&mut rng));
    assert_eq!(Phase::Extending, sequencer.step(&mut rng));
    assert_eq!(Phase::Done, sequencer.step(&mut rng));
    assert_eq!(Phase::Done, sequencer.step(&mut rng));
    assert_eq!(3, sequencer.run(&mut rng).placements.len());

    let mut sequencer = Sequencer::new(Profile::Party, vec![], &params).unwrap();
    assert_eq!(Phase::Done, sequencer.step(&mut rng));
}

#[test]
fn moving_average_of_energy() {
    let placements = [2, 4, 6, 8]
        .into_iter()
        .enumerate()
        .map(|(i, energy)| Placement {
            track: new_track(&format!("t{i}"), "A", "8B", 120.0, energy),
            select_type: SelectType::Random,
        })
        .collect::<Vec<_>>();
    assert_eq!(
        vec![None, Some(3.0), Some(5.0), Some(7.0)],
        energy_moving_average(&placements, NonZeroUsize::MIN.saturating_add(1))
    );
    // The window covers at least a single placement
    assert_eq!(
        vec![Some(2.0), Some(4.0), Some(6.0), Some(8.0)],
        energy_moving_average(&placements, DEFAULT_MOVING_AVERAGE_DIVISOR)
    );
}

#[test]
fn profile_from_str() {
    assert_eq!(Profile::Setlist, "setlist".parse::<Profile>().unwrap());
    assert!("techno".parse::<Profile>().is_err());
    assert_eq!(SelectType::Party, Profile::Party.best_select_type());
    assert_eq!(SelectType::Genre, Profile::Genre.best_select_type());
    for profile in Profile::iter() {
        let cascade = profile.cascade();
        assert_eq!(Some(&(Selector::Random, SelectType::Random)), cascade.last());
    }
}
