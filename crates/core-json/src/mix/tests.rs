// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use segue_core::{
    ArtistName, Level, Track, TrackId,
    music::{
        key::{KeyCode, KeySignature},
        tempo::TempoBpm,
    },
};

use super::*;

fn placement(id: &str, energy: u8, select_type: _core::SelectType) -> _core::Placement {
    _core::Placement {
        track: Track {
            id: TrackId::new(id),
            title: None,
            artists: vec![ArtistName::new("Artist")],
            key: KeySignature::new(KeyCode::Gmaj),
            tempo_bpm: TempoBpm::new(128.0),
            energy: Level::new(energy),
            danceability: Level::new(5),
            popularity: Level::new(5),
            genre: None,
        },
        select_type,
    }
}

#[test]
fn export_without_moving_average() {
    let entries = export_placements(
        vec![
            placement("a", 4, _core::SelectType::Random),
            placement("b", 5, _core::SelectType::Dj),
        ],
        None,
    );
    let json = serde_json::to_value(&entries).unwrap();
    assert_eq!(
        serde_json::json!([
            {
                "trackId": "a",
                "artists": ["Artist"],
                "key": "9B",
                "bpm": 128.0,
                "energy": 4,
                "danceability": 5,
                "popularity": 5,
                "selectType": "random",
            },
            {
                "trackId": "b",
                "artists": ["Artist"],
                "key": "9B",
                "bpm": 128.0,
                "energy": 5,
                "danceability": 5,
                "popularity": 5,
                "selectType": "dj",
            },
        ]),
        json
    );
}

#[test]
fn export_with_moving_average() {
    let entries = export_placements(
        vec![
            placement("a", 2, _core::SelectType::Party),
            placement("b", 9, _core::SelectType::Peak),
            placement("c", 4, _core::SelectType::Party),
        ],
        Some(vec![None, Some(5.5), Some(6.5)]),
    );
    let moving_average = entries
        .iter()
        .map(|entry| entry.energy_moving_average)
        .collect::<Vec<_>>();
    assert_eq!(vec![None, Some(5.5), Some(6.5)], moving_average);
    let json = serde_json::to_value(&entries[1]).unwrap();
    assert_eq!(Some(&serde_json::json!("peak")), json.get("selectType"));
    assert_eq!(Some(&serde_json::json!(5.5)), json.get("energyMovingAverage"));
    let json = serde_json::to_value(&entries[0]).unwrap();
    assert!(json.get("energyMovingAverage").is_none());
}
