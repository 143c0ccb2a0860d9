use std::path::Path;
use std::process::Command;

use blockscramble::{
    image_io, key_path_for, scramble_with_key, unscramble, unscramble_with_key, Error, Key,
    KeyFormat, Permutation,
};
use image::{DynamicImage, Rgb, RgbImage};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

fn gradient(w: u32, h: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, y| {
        Rgb([(x * 3) as u8, (y * 5) as u8, (x ^ y) as u8])
    }))
}

fn write_png(path: &Path, im: &DynamicImage) {
    image_io::save(path, image_io::as_array(im).unwrap(), im.color()).unwrap();
}

#[test]
fn files_65x65() {
    let dir = tempfile::tempdir().unwrap();
    let scrambled = dir.path().join("scrambled.png");
    let im = gradient(65, 65);

    let mut rng = Xoshiro256StarStar::seed_from_u64(2023);
    let (out, key) = scramble_with_key(image_io::as_array(&im).unwrap(), 32, &mut rng).unwrap();
    image_io::save(&scrambled, out.view(), im.color()).unwrap();
    key.save(key_path_for(&scrambled), KeyFormat::Full).unwrap();
    assert_eq!(key.permutation().len(), 9);

    let loaded = image_io::load(&scrambled).unwrap();
    let key = Key::load(key_path_for(&scrambled)).unwrap();
    let back = unscramble_with_key(image_io::as_array(&loaded).unwrap(), &key, None).unwrap();
    assert_eq!(back.as_slice().unwrap(), im.as_bytes());
}

#[test]
fn legacy_key_file() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("k.json");
    let im = gradient(48, 40);

    let mut rng = Xoshiro256StarStar::seed_from_u64(1);
    let (out, key) = scramble_with_key(image_io::as_array(&im).unwrap(), 16, &mut rng).unwrap();
    key.save(&key_path, KeyFormat::Legacy).unwrap();

    let text = std::fs::read_to_string(&key_path).unwrap();
    assert!(text.starts_with('['));

    let key = Key::load(&key_path).unwrap();
    let back = unscramble(out.view(), key.permutation(), 16).unwrap();
    assert_eq!(back.as_slice().unwrap(), im.as_bytes());
}

#[test]
fn short_key_rejected() {
    let im = gradient(65, 65);
    let arr = image_io::as_array(&im).unwrap();
    let perm: Permutation = (0..8).collect::<Vec<_>>().try_into().unwrap();
    assert!(matches!(
        unscramble(arr, &perm, 32),
        Err(Error::KeySizeMismatch {
            expected: 9,
            found: 8
        })
    ));
}

#[test]
fn cli_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let scrambled = dir.path().join("scr.png");
    let output = dir.path().join("out.png");
    let im = gradient(70, 33);
    write_png(&input, &im);

    let status = Command::new(env!("CARGO_BIN_EXE_blockscramble"))
        .args(["scramble", "-b", "16", "--seed", "abc", "-o"])
        .arg(&scrambled)
        .arg(&input)
        .status()
        .unwrap();
    assert!(status.success());
    assert!(key_path_for(&scrambled).exists());

    let status = Command::new(env!("CARGO_BIN_EXE_blockscramble"))
        .args(["unscramble", "-o"])
        .arg(&output)
        .arg(&scrambled)
        .status()
        .unwrap();
    assert!(status.success());

    let back = image_io::load(&output).unwrap();
    assert_eq!(back.as_bytes(), im.as_bytes());
}

#[test]
fn cli_failures_leave_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    write_png(&input, &gradient(20, 20));

    // No key next to the input
    let status = Command::new(env!("CARGO_BIN_EXE_blockscramble"))
        .args(["unscramble", "-o"])
        .arg(&output)
        .arg(&input)
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!output.exists());

    // Key for a different block size
    std::fs::write(key_path_for(&input), "[0, 1, 2]").unwrap();
    let status = Command::new(env!("CARGO_BIN_EXE_blockscramble"))
        .args(["unscramble", "-b", "8", "-o"])
        .arg(&output)
        .arg(&input)
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!output.exists());

    let status = Command::new(env!("CARGO_BIN_EXE_blockscramble"))
        .args(["scramble", "-b", "0", "-o"])
        .arg(&output)
        .arg(&input)
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!output.exists());
}

#[test]
fn cli_failed_write_leaves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    write_png(&input, &gradient(20, 20));

    // Key can't be written, image must not be either
    let scrambled = dir.path().join("scr.png");
    let status = Command::new(env!("CARGO_BIN_EXE_blockscramble"))
        .args(["scramble", "-b", "8", "-k"])
        .arg(dir.path().join("nodir").join("k.json"))
        .arg("-o")
        .arg(&scrambled)
        .arg(&input)
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!scrambled.exists());

    // Image can't be encoded, key must be removed again
    let scrambled = dir.path().join("scr.unknown");
    let status = Command::new(env!("CARGO_BIN_EXE_blockscramble"))
        .args(["scramble", "-b", "8", "-o"])
        .arg(&scrambled)
        .arg(&input)
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!scrambled.exists());
    assert!(!key_path_for(&scrambled).exists());
}
