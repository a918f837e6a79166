#![forbid(unsafe_code)]

mod logger;
mod show;
mod stdout;

use clap::{App, AppSettings, Arg};
use log::LevelFilter;
use logger::PedanticLogger;
use show::ShowOptions;
use std::process;

fn main() {
    let matches = App::new("tagsift")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Show the metadata of music files")
        .setting(AppSettings::ArgRequiredElseHelp)
        .arg(
            Arg::with_name("FILES")
                .help("The files to read")
                .required(true)
                .multiple(true),
        )
        .arg(
            Arg::with_name("all")
                .short("a")
                .long("all")
                .help("Show every frame, including ones without a readable name"),
        )
        .arg(
            Arg::with_name("tags")
                .short("t")
                .long("tags")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("Only show these tags, such as title or ^TPE1"),
        )
        .arg(
            Arg::with_name("skip-bad-frames")
                .short("s")
                .long("skip-bad-frames")
                .help("Drop frames that cannot be decoded instead of failing the whole tag"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Log what happens while reading, repeat for more detail"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .conflicts_with("verbose")
                .help("Do not log anything"),
        )
        .get_matches();

    let level = if matches.is_present("quiet") {
        LevelFilter::Off
    } else {
        match matches.occurrences_of("verbose") {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Trace,
        }
    };

    PedanticLogger::setup(level);

    let opts = ShowOptions {
        all: matches.is_present("all"),
        skip_bad_frames: matches.is_present("skip-bad-frames"),
        filter: matches
            .values_of("tags")
            .map(|tags| tags.collect())
            .unwrap_or_default(),
    };

    let ok = match matches.values_of("FILES") {
        Some(paths) => show::show(paths, &opts),
        None => false,
    };

    if !ok {
        process::exit(1);
    }
}
