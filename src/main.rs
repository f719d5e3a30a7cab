//! Command-line compressor and decompressor for legacy LZ4 files.

use clap::{Arg, ArgAction, Command};
use lz4_grind::framed::{CompressionSettings, FrameReader};
use lz4_grind::Level;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::process::ExitCode;
use std::time::Instant;

fn compress_file(infile: &str, outfile: &str, level: Level) -> io::Result<()> {
    let reader = BufReader::new(File::open(infile)?);
    let mut writer = BufWriter::new(File::create(outfile)?);
    CompressionSettings::default()
        .level(level)
        .compress(reader, &mut writer)?;
    writer.flush()
}

fn decompress_file(infile: &str, outfile: &str) -> io::Result<()> {
    let reader = BufReader::new(File::open(infile)?);
    let mut writer = BufWriter::new(File::create(outfile)?);
    let mut decoded = FrameReader::new(reader)?.into_read();
    io::copy(&mut decoded, &mut writer)?;
    writer.flush()
}

/// Integer percentage of `num` relative to `den`.
fn percent(num: u64, den: u64) -> u64 {
    if den == 0 {
        0
    } else {
        num.saturating_mul(100) / den
    }
}

fn main() -> ExitCode {
    let matches = Command::new("lz4grind")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compresses files into the LZ4 legacy frame format, slowly but well")
        .arg(
            Arg::new("level5")
                .short('5')
                .help("Compress faster (default)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("level6")
                .short('6')
                .action(ArgAction::SetTrue)
                .hide(true),
        )
        .arg(
            Arg::new("level7")
                .short('7')
                .action(ArgAction::SetTrue)
                .hide(true),
        )
        .arg(
            Arg::new("level8")
                .short('8')
                .action(ArgAction::SetTrue)
                .hide(true),
        )
        .arg(
            Arg::new("level9")
                .short('9')
                .help("Compress better")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("optimal")
                .long("optimal")
                .help("Optimal but very slow compression")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["level5", "level6", "level7", "level8", "level9"]),
        )
        .arg(
            Arg::new("decompress")
                .short('d')
                .long("decompress")
                .help("Decompress instead of compressing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Report sizes, ratio and timing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("INFILE")
                .help("File to read")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("OUTFILE")
                .help("File to create")
                .required(true)
                .index(2),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    env_logger::Builder::new()
        .format_timestamp(None)
        .filter_level(if verbose {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    let level = if matches.get_flag("optimal") {
        Level::Optimal
    } else if matches.get_flag("level9") {
        Level::L9
    } else if matches.get_flag("level8") {
        Level::L8
    } else if matches.get_flag("level7") {
        Level::L7
    } else if matches.get_flag("level6") {
        Level::L6
    } else {
        Level::L5
    };

    let infile = matches.get_one::<String>("INFILE").unwrap();
    let outfile = matches.get_one::<String>("OUTFILE").unwrap();
    let decompress = matches.get_flag("decompress");

    let start = Instant::now();
    let result = if decompress {
        decompress_file(infile, outfile)
    } else {
        log::info!("compressing at level {}", level.number());
        compress_file(infile, outfile, level)
    };

    if let Err(e) = result {
        log::error!("{}: {}", infile, e);
        return ExitCode::FAILURE;
    }

    let insize = std::fs::metadata(infile).map(|m| m.len()).unwrap_or(0);
    let outsize = std::fs::metadata(outfile).map(|m| m.len()).unwrap_or(0);
    let ratio = if decompress {
        percent(insize, outsize)
    } else {
        percent(outsize, insize)
    };
    log::info!(
        "in {} out {} ratio {}% time {:.2}s",
        insize,
        outsize,
        ratio,
        start.elapsed().as_secs_f64()
    );

    ExitCode::SUCCESS
}
