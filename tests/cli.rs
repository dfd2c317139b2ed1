use assert_cmd::prelude::*;
use image::{ImageFormat, Rgba, RgbaImage};
use predicates::prelude::*;
use predicates::str::contains;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn write_png(dir: &Path, name: &str, width: u32, height: u32, color: [u8; 4]) {
    let image = RgbaImage::from_pixel(width, height, Rgba(color));
    image
        .save_with_format(dir.join(format!("{name}.png")), ImageFormat::Png)
        .expect("write png");
}

fn build_assets() -> TempDir {
    let dir = TempDir::new().expect("temp asset dir");
    write_png(dir.path(), "grass", 16, 16, [40, 160, 60, 255]);
    write_png(dir.path(), "stone", 32, 8, [120, 120, 120, 255]);
    dir
}

#[test]
fn summary_lists_default_textures() {
    let assets = build_assets();
    let mut cmd = Command::cargo_bin("quad-viewer").expect("binary exists");
    cmd.arg(assets.path()).arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains("Loaded texture grass (16x16, 5 mip levels)"))
        .stdout(contains("Loaded texture stone (32x8, 6 mip levels)"))
        .stdout(contains("Clear color: (0.50, 0.20, 0.60, 1.00)"))
        .stdout(contains("Quad: 4 vertices (triangle strip)"));
}

#[test]
fn summary_honors_texture_flags() {
    let assets = build_assets();
    let mut cmd = Command::cargo_bin("quad-viewer").expect("binary exists");
    cmd.arg(assets.path())
        .args(["--texture", "stone", "--summary-only"]);
    cmd.assert()
        .success()
        .stdout(contains("Loaded texture stone"))
        .stdout(contains("Loaded texture grass").not());
}

#[test]
fn missing_texture_fails() {
    let assets = build_assets();
    let mut cmd = Command::cargo_bin("quad-viewer").expect("binary exists");
    cmd.arg(assets.path())
        .args(["--texture", "lava", "--summary-only"]);
    cmd.assert()
        .failure()
        .stderr(contains("failed to load texture lava"));
}

#[test]
fn unknown_flag_prints_usage() {
    let mut cmd = Command::cargo_bin("quad-viewer").expect("binary exists");
    cmd.arg("--fullscreen");
    cmd.assert()
        .failure()
        .stderr(contains("Usage: quad-viewer"));
}
