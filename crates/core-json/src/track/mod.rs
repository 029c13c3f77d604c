// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use anyhow::anyhow;

use crate::prelude::*;

mod _core {
    pub(super) use segue_core::{
        music::{
            genre::{GenreScalar, project_genres},
            key::CamelotKeySignature,
            tempo::TempoBpm,
        },
        track::*,
    };
}

///////////////////////////////////////////////////////////////////////
// Track
///////////////////////////////////////////////////////////////////////

/// A feature record.
///
/// The key is given in Camelot notation, e.g. `"8B"`. Levels are
/// integers from 0 to 10.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Track {
    pub track_id: _core::TrackId,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,

    pub artists: Vec<_core::ArtistName>,

    pub key: String,

    pub bpm: f64,

    pub energy: _core::Level,

    pub danceability: _core::Level,

    pub popularity: _core::Level,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub genre: Option<f64>,

    /// Raw genre tags for projecting a missing genre.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub genre_tags: Vec<String>,
}

impl From<_core::Track> for Track {
    fn from(from: _core::Track) -> Self {
        let _core::Track {
            id,
            title,
            artists,
            key,
            tempo_bpm,
            energy,
            danceability,
            popularity,
            genre,
        } = from;
        Self {
            track_id: id,
            title,
            artists,
            key: _core::CamelotKeySignature::from(key).to_string(),
            bpm: tempo_bpm.value(),
            energy,
            danceability,
            popularity,
            genre: genre.map(_core::GenreScalar::value),
            genre_tags: Vec::new(),
        }
    }
}

impl TryFrom<Track> for _core::Track {
    type Error = anyhow::Error;

    fn try_from(from: Track) -> anyhow::Result<Self> {
        let Track {
            track_id,
            title,
            artists,
            key,
            bpm,
            energy,
            danceability,
            popularity,
            genre,
            genre_tags: _,
        } = from;
        let key = key
            .parse::<_core::CamelotKeySignature>()
            .map_err(|err| anyhow!("track {track_id}: {err}"))?
            .key_signature();
        let into = Self {
            id: track_id,
            title,
            artists,
            key,
            tempo_bpm: _core::TempoBpm::new(bpm),
            energy,
            danceability,
            popularity,
            genre: genre.map(_core::GenreScalar::new),
        };
        Ok(into)
    }
}

/// Convert all feature records into core tracks.
///
/// If any record carries genre tags the tag sets of all records are
/// projected onto genre scalars. The projected values only replace
/// missing genres.
pub fn import_tracks(tracks: Vec<Track>) -> anyhow::Result<Vec<_core::Track>> {
    let projected_genres = if tracks.iter().any(|track| !track.genre_tags.is_empty()) {
        let tag_sets = tracks
            .iter()
            .map(|track| track.genre_tags.as_slice())
            .collect::<Vec<_>>();
        let projected_genres = _core::project_genres(&tag_sets);
        log::debug!(
            "Projected genre tags of {count} track(s)",
            count = projected_genres.len()
        );
        Some(projected_genres)
    } else {
        None
    };
    tracks
        .into_iter()
        .enumerate()
        .map(|(index, track)| {
            let mut track = _core::Track::try_from(track)?;
            if track.genre.is_none() {
                track.genre = projected_genres
                    .as_ref()
                    .and_then(|genres| genres.get(index).copied());
            }
            Ok(track)
        })
        .collect()
}
