//! End-to-end tests of the `strata` binary.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::process::Command;

fn strata() -> Command {
    Command::new(env!("CARGO_BIN_EXE_strata"))
}

fn write_rgba(path: &Path, w: u32, h: u32, data: &[u8]) {
    let mut enc = png::Encoder::new(BufWriter::new(File::create(path).unwrap()), w, h);
    enc.set_color(png::ColorType::Rgba);
    enc.set_depth(png::BitDepth::Eight);
    let mut writer = enc.write_header().unwrap();
    writer.write_image_data(data).unwrap();
    writer.finish().unwrap();
}

fn read_rgba(path: &Path) -> (u32, u32, Vec<u8>) {
    let mut reader = png::Decoder::new(BufReader::new(File::open(path).unwrap())).read_info().unwrap();
    let mut buf = vec![0u8; reader.output_buffer_size().unwrap()];
    let info = reader.next_frame(&mut buf).unwrap();
    buf.truncate(info.buffer_size());
    (info.width, info.height, buf)
}

#[test]
fn test_adjust_curve_on_white() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("white.png");
    let output = dir.path().join("out.png");
    write_rgba(&input, 2, 2, &[255; 16]);

    let status = strata()
        .args(["adjust", input.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .args(["--curve", "0,50", "255,200"])
        .status()
        .unwrap();
    assert!(status.success());

    let (w, h, data) = read_rgba(&output);
    assert_eq!((w, h), (2, 2));
    assert!(data.chunks_exact(4).all(|p| p == [200, 200, 200, 255]));
}

#[test]
fn test_adjust_settings_file_and_override() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    let settings = dir.path().join("look.json");
    write_rgba(&input, 1, 1, &[100, 100, 100, 255]);
    std::fs::write(&settings, r#"{"brightness": 50, "saturation": -100}"#).unwrap();

    let status = strata()
        .args(["adjust", input.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .args(["--settings", settings.to_str().unwrap(), "--brightness", "-20"])
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(read_rgba(&output).2, [80, 80, 80, 255]);
}

#[test]
fn test_adjust_unknown_filter_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    write_rgba(&input, 1, 1, &[1, 2, 3, 255]);
    let out = strata()
        .args(["adjust", input.to_str().unwrap(), "-o", "unused.png", "--filter", "lomo"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("lomo"));
}

#[test]
fn test_curve_json() {
    let out = strata().args(["curve", "0,0", "255,255", "--json"]).output().unwrap();
    assert!(out.status.success());
    let table: Vec<u8> = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(table.len(), 256);
    assert!(table.iter().enumerate().all(|(i, &v)| v as usize == i));
}

#[test]
fn test_render_project() {
    let dir = tempfile::tempdir().unwrap();
    write_rgba(&dir.path().join("base.png"), 2, 1, &[200, 100, 50, 255, 200, 100, 50, 255]);
    write_rgba(&dir.path().join("top.png"), 1, 1, &[128, 128, 128, 255]);
    let project = dir.path().join("project.json");
    std::fs::write(
        &project,
        r#"{
            "base": "base.png",
            "layers": [
                { "kind": "image" },
                { "kind": "image", "path": "top.png", "blend_mode": "multiply",
                  "transform": { "x": 1, "y": 0, "width": 1, "height": 1 } },
                { "kind": "image", "visible": false, "adjustments": { "brightness": 100 } }
            ]
        }"#,
    )
    .unwrap();
    let output = dir.path().join("flat.png");

    let status = strata()
        .args(["render", project.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(read_rgba(&output).2, [200, 100, 50, 255, 100, 50, 25, 255]);
}

#[test]
fn test_list() {
    let out = strata().arg("list").output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("sepia"));
    assert!(text.contains("color-dodge"));
}
