use assert_cmd::Command;
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use predicates::prelude::*;
use std::io::Cursor;
use std::path::Path;

fn write_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 128, 255]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageOutputFormat::Png)
        .unwrap();
    std::fs::write(path, out.into_inner()).unwrap();
}

fn fileshift() -> Command {
    Command::cargo_bin("fileshift").unwrap()
}

#[test]
fn converts_png_to_jpg_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("cat.png");
    write_png(&input, 10, 6);

    fileshift()
        .args(["-in", input.to_str().unwrap(), "-to", "jpg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Detected MIME: image/png Ext: .png"))
        .stdout(predicate::str::contains("Output MIME: image/jpeg"))
        .stdout(predicate::str::contains("Saved:"));

    let output = dir.path().join("cat.jpg");
    let decoded = image::open(&output).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (10, 6));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&output).unwrap().permissions().mode();
        assert_eq!(mode & 0o600, 0o600);
        assert_eq!(mode & 0o133, 0);
    }
}

#[test]
fn honours_explicit_output_and_double_dash_flags() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("upload");
    let output = dir.path().join("result.png");
    write_png(&input, 3, 3);

    fileshift()
        .arg("--in")
        .arg(&input)
        .arg("--out")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ext: .png"))
        .stdout(predicate::str::contains("Output MIME: image/png"));

    assert!(output.exists());
}

#[test]
fn json_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("photo.PNG");
    write_png(&input, 4, 2);

    let assert = fileshift()
        .args(["-in", input.to_str().unwrap(), "-to", "jpeg", "-json"])
        .assert()
        .success();

    let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["detected"]["extension"], ".png");
    assert_eq!(report["output_mime"], "image/jpeg");
    assert_eq!(report["source_format"], "png");
    assert_eq!(report["width"], 4);
}

#[test]
fn missing_input_flag_prints_usage() {
    fileshift()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("usage:"));
}

#[test]
fn unreadable_input_fails() {
    fileshift()
        .args(["-in", "/nonexistent/input.png"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read input file"));
}

#[test]
fn non_image_input_fails_to_convert() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    std::fs::write(&input, "just text").unwrap();

    fileshift()
        .args(["-in", input.to_str().unwrap(), "-to", "png"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Detected MIME: application/octet-stream Ext: .txt"))
        .stderr(predicate::str::contains("convert error"));

    assert!(!dir.path().join("notes.png").exists());
}

#[test]
fn unsupported_target_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("cat.png");
    write_png(&input, 2, 2);

    fileshift()
        .args(["-in", input.to_str().unwrap(), "-to", "bmp"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unsupported target format: \"bmp\""));
}
