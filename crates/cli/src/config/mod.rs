// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fs, path::Path};

use anyhow::Context as _;

use segue_usecases::mix::Params;

/// Load tunable parameters from a RON file.
///
/// Omitted fields keep their default values.
pub(crate) fn load_params(file_path: &Path) -> anyhow::Result<Params> {
    log::info!("Loading parameters from file: {}", file_path.display());
    let bytes = fs::read(file_path)
        .with_context(|| format!("failed to read config file {}", file_path.display()))?;
    parse_params(&bytes)
}

pub(crate) fn parse_params(bytes: &[u8]) -> anyhow::Result<Params> {
    ron::de::from_bytes(bytes).map_err(Into::into)
}

#[cfg(test)]
mod tests;
