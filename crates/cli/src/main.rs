// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    fs,
    io::{self, Write as _},
    num::NonZeroUsize,
    path::PathBuf,
};

use anyhow::Context as _;
use clap::{Arg, ArgAction, ArgMatches, Command, builder::PossibleValuesParser};
use rand::{SeedableRng as _, rngs::StdRng};
use strum::IntoEnumIterator as _;

use segue_core::TrackId;
use segue_core_json::{
    mix::export_placements,
    track::{Track, import_tracks},
};
use segue_usecases::{
    mix::{self, Mixed, Params, Profile},
    optimize::optimize,
    select::TieBreak,
};

mod config;

const DEFAULT_LOG_FILTER: &str = "info";

const DEFAULT_PROFILE: &str = "dj";

const INPUT_FILE_ARG: &str = "input-file";

const PROFILE_ARG: &str = "profile";

const LOOKAHEAD_ARG: &str = "lookahead";

const ITERATIONS_ARG: &str = "iterations";

const FIRST_TRACK_ARG: &str = "first-track";

const SEED_ARG: &str = "seed";

const CONFIG_FILE_ARG: &str = "config";

const OUTPUT_FILE_ARG: &str = "output";

fn new_app() -> Command {
    Command::new("segue")
        .about("Sequences tracks into playlists with smooth transitions")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(
            Command::new("mix")
                .about("Mixes the feature records of a JSON file into a playlist")
                .arg(
                    Arg::new(INPUT_FILE_ARG)
                        .help("The input file path for reading JSON feature records")
                        .num_args(1)
                        .value_parser(clap::value_parser!(PathBuf))
                        .required(true),
                )
                .arg(
                    Arg::new(PROFILE_ARG)
                        .long(PROFILE_ARG)
                        .help("The overall shape of the playlist")
                        .num_args(1)
                        .value_parser(PossibleValuesParser::new(
                            Profile::iter().map(<&'static str>::from),
                        ))
                        .default_value(DEFAULT_PROFILE),
                )
                .arg(
                    Arg::new(LOOKAHEAD_ARG)
                        .long(LOOKAHEAD_ARG)
                        .help("Prefer candidates with the most compatible successors")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new(ITERATIONS_ARG)
                        .long(ITERATIONS_ARG)
                        .help("Mix repeatedly and keep the best playlist")
                        .num_args(1)
                        .value_parser(clap::value_parser!(NonZeroUsize))
                        .required(false),
                )
                .arg(
                    Arg::new(FIRST_TRACK_ARG)
                        .long(FIRST_TRACK_ARG)
                        .help("The id of the first track, only for linear profiles")
                        .num_args(1)
                        .required(false),
                )
                .arg(
                    Arg::new(SEED_ARG)
                        .long(SEED_ARG)
                        .help("Seed the random number generator for reproducible results")
                        .num_args(1)
                        .value_parser(clap::value_parser!(u64))
                        .required(false),
                )
                .arg(
                    Arg::new(CONFIG_FILE_ARG)
                        .long(CONFIG_FILE_ARG)
                        .help("The file path of a RON file with tunable parameters")
                        .num_args(1)
                        .value_parser(clap::value_parser!(PathBuf))
                        .required(false),
                )
                .arg(
                    Arg::new(OUTPUT_FILE_ARG)
                        .long(OUTPUT_FILE_ARG)
                        .help("The output file path for writing JSON data instead of stdout")
                        .num_args(1)
                        .value_parser(clap::value_parser!(PathBuf))
                        .required(false),
                ),
        )
}

/// Command line arguments override the parameters from the config file.
fn params_from_matches(matches: &ArgMatches) -> anyhow::Result<Params> {
    let mut params = if let Some(file_path) = matches.get_one::<PathBuf>(CONFIG_FILE_ARG) {
        config::load_params(file_path)?
    } else {
        Params::new()
    };
    if matches.get_flag(LOOKAHEAD_ARG) {
        params.tie_break = TieBreak::Lookahead;
    }
    if let Some(first_track) = matches.get_one::<String>(FIRST_TRACK_ARG) {
        params.first_track = Some(TrackId::new(first_track.as_str()));
    }
    Ok(params)
}

fn profile_from_matches(matches: &ArgMatches) -> anyhow::Result<Profile> {
    matches
        .get_one::<String>(PROFILE_ARG)
        .map_or(DEFAULT_PROFILE, String::as_str)
        .parse()
        .map_err(Into::into)
}

fn new_rng(matches: &ArgMatches) -> StdRng {
    if let Some(seed) = matches.get_one::<u64>(SEED_ARG) {
        log::debug!("Using random seed {seed}");
        StdRng::seed_from_u64(*seed)
    } else {
        StdRng::from_os_rng()
    }
}

fn run_mix(matches: &ArgMatches) -> anyhow::Result<()> {
    let profile = profile_from_matches(matches)?;
    let params = params_from_matches(matches)?;
    let Some(input_file_path) = matches.get_one::<PathBuf>(INPUT_FILE_ARG) else {
        anyhow::bail!("missing input file");
    };
    log::info!(
        "Reading feature records from file: {}",
        input_file_path.display()
    );
    let bytes = fs::read(input_file_path)
        .with_context(|| format!("failed to read input file {}", input_file_path.display()))?;
    let records: Vec<Track> = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse input file {}", input_file_path.display()))?;
    let tracks = import_tracks(records)?;

    let mut rng = new_rng(matches);
    let Mixed {
        placements,
        energy_moving_average,
    } = if let Some(iterations) = matches.get_one::<NonZeroUsize>(ITERATIONS_ARG) {
        let optimized = optimize(profile, &tracks, &params, Some(*iterations), &mut rng)?;
        log::info!(
            "Best of {iterations} {profile} mixes: {best_count} {best_select_type}, {random_count} random",
            best_count = optimized.best_count,
            best_select_type = profile.best_select_type(),
            random_count = optimized.random_count,
        );
        optimized.mixed
    } else {
        mix::mix(profile, tracks, &params, &mut rng)?
    };

    let entries = export_placements(placements, energy_moving_average);
    let json = serde_json::to_vec_pretty(&entries)?;
    if let Some(output_file_path) = matches.get_one::<PathBuf>(OUTPUT_FILE_ARG) {
        log::info!("Writing playlist into file: {}", output_file_path.display());
        fs::write(output_file_path, &json).with_context(|| {
            format!("failed to write output file {}", output_file_path.display())
        })?;
    } else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(&json)?;
        writeln!(stdout)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .init();

    let mut app = new_app();
    let app_usage = app.render_usage();
    let matches = app.get_matches();

    match matches.subcommand() {
        Some(("mix", matches)) => run_mix(matches),
        Some((subcommand, _)) => {
            unreachable!("Unknown subcommand {subcommand}");
        }
        None => {
            println!("{app_usage}");
            Ok(())
        }
    }
}
