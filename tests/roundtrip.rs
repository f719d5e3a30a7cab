//! End-to-end tests over whole legacy frames.

use lz4_grind::framed::{CompressionSettings, DecompressionError, FrameReader, MAGIC};
use lz4_grind::{compress_block, decompress_frame, max_packed_size, Level};

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::io::Cursor;

const ALL_LEVELS: [Level; 6] = [
    Level::L5,
    Level::L6,
    Level::L7,
    Level::L8,
    Level::L9,
    Level::Optimal,
];

fn pack(data: &[u8], level: Level) -> Vec<u8> {
    let mut out = Vec::new();
    CompressionSettings::default()
        .level(level)
        .compress(Cursor::new(data), &mut out)
        .unwrap();
    out
}

fn unpack(data: &[u8]) -> Vec<u8> {
    decompress_frame(Cursor::new(data)).unwrap()
}

/// A mix of runs, repeated phrases and noise, like real files have.
fn mixed_data(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(len);
    while data.len() < len {
        match rng.gen_range(0, 4) {
            0 => data.extend_from_slice(&[rng.gen::<u8>(); 37]),
            1 => data.extend_from_slice(b"a moderately sized repeated phrase"),
            2 => {
                let mut noise = [0u8; 23];
                rng.fill_bytes(&mut noise);
                data.extend_from_slice(&noise);
            }
            _ => {
                let start = data.len().saturating_sub(rng.gen_range(1, 200));
                let chunk: Vec<u8> = data[start..].to_vec();
                data.extend_from_slice(&chunk);
            }
        }
    }
    data.truncate(len);
    data
}

#[test]
fn every_level_roundtrips_mixed_data() {
    let data = mixed_data(60_000, 7);
    for level in ALL_LEVELS {
        let packed = pack(&data, level);
        assert_eq!(unpack(&packed), data, "level {}", level.number());
    }
}

#[test]
fn empty_file_is_just_the_magic() {
    let packed = pack(b"", Level::L5);
    assert_eq!(packed, MAGIC.to_le_bytes());
    assert_eq!(unpack(&packed), b"");
}

#[test]
fn small_blocks_split_the_stream() {
    let data = mixed_data(10_000, 21);
    let mut packed = Vec::new();
    CompressionSettings::default()
        .level(Level::L6)
        .block_size(1024)
        .compress(Cursor::new(&data), &mut packed)
        .unwrap();
    assert_eq!(unpack(&packed), data);
}

#[test]
fn concatenated_frames_decode_to_concatenated_data() {
    let first = mixed_data(5_000, 1);
    let second = mixed_data(3_000, 2);

    let mut joined = pack(&first, Level::L5);
    joined.extend_from_slice(&pack(&second, Level::L9));

    let mut expected = first;
    expected.extend_from_slice(&second);
    assert_eq!(unpack(&joined), expected);
}

#[test]
fn wrong_magic_is_reported() {
    let err = FrameReader::new(Cursor::new(b"not an lz4 file".to_vec())).unwrap_err();
    match err {
        DecompressionError::WrongMagic(m) => assert_ne!(m, MAGIC),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn truncated_block_is_reported() {
    let mut packed = pack(b"some data that compresses into one block", Level::L5);
    packed.truncate(packed.len() - 3);
    decompress_frame(Cursor::new(&packed)).unwrap_err();
}

#[test]
fn overlong_block_length_is_reported() {
    let mut packed = Vec::new();
    packed.extend_from_slice(&MAGIC.to_le_bytes());
    packed.extend_from_slice(&(u32::MAX / 2).to_le_bytes());

    let mut reader = FrameReader::new(Cursor::new(&packed)).unwrap();
    let mut out = Vec::new();
    let err = reader.decode_block(&mut out).unwrap_err();
    assert!(matches!(err, DecompressionError::BlockTooLong(_)));
}

#[test]
fn optimal_is_at_least_as_tight_as_every_level() {
    let data = mixed_data(30_000, 99);
    let optimal = pack(&data, Level::Optimal).len();
    for level in ALL_LEVELS {
        assert!(optimal <= pack(&data, level).len());
    }
}

#[test]
fn block_sizes_stay_within_the_bound() {
    let mut rng = StdRng::seed_from_u64(1234);
    let mut worst = vec![0u8; 100_000];
    rng.fill_bytes(&mut worst);

    for level in [Level::L5, Level::L9, Level::Optimal] {
        let mut out = Vec::new();
        let written = compress_block(&worst, &mut out, level);
        assert!(written <= max_packed_size(worst.len()));
    }
}

#[test]
fn long_runs_and_long_literal_tails_roundtrip() {
    // Exercises match lengths needing several 0xFF extension bytes and a
    // literal run crossing the 15 + n*255 boundaries.
    let mut data = vec![b'R'; 8_000];
    data.extend(mixed_data(700, 3));
    for level in [Level::L5, Level::L9, Level::Optimal] {
        let packed = pack(&data, level);
        assert_eq!(unpack(&packed), data);
    }
}

#[test]
fn far_matches_at_the_offset_limit_roundtrip() {
    // A repeated phrase a hair under and then well over 65535 bytes back;
    // only the near one is reachable. The filler is noise so nothing else
    // matches.
    let phrase = b"offset boundary probe phrase!!";
    let mut rng = StdRng::seed_from_u64(42);
    let mut gap1 = vec![0u8; 65_490];
    rng.fill_bytes(&mut gap1);
    let mut gap2 = vec![0u8; 70_000];
    rng.fill_bytes(&mut gap2);

    let mut data = Vec::new();
    data.extend_from_slice(phrase);
    data.extend_from_slice(&gap1);
    data.extend_from_slice(phrase);
    data.extend_from_slice(&gap2);
    data.extend_from_slice(phrase);

    for level in [Level::L7, Level::Optimal] {
        let packed = pack(&data, level);
        assert_eq!(unpack(&packed), data);
    }
}
