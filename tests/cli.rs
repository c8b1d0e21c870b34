//! End-to-end tests running the built `switch-source` binary.
//!
//! Each test works in its own temp directory, which doubles as the fake Hugin
//! installation passed through `--hugin`.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const JPEG_PROJECT: &str = "\
# hugin project file
p f2 w6000 h1500 v360 n\"TIFF_m c:LZW r:CROP\"
i w4000 h3000 f0 v50 n\"jpeg/IMG_0001.jpg\"
i w4000 h3000 f0 v50 n\"jpeg/IMG_0002.jpg\"
c n0 N1 x1203.5 y880.25 X214.75 Y871 t0
";

fn switch_source(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_switch-source"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run switch-source")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn hugin_arg(tmp: &TempDir) -> String {
    tmp.path().to_string_lossy().into_owned()
}

#[test]
fn switch_named_project_to_tiff() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("pano.pto"), JPEG_PROJECT).unwrap();

    let hugin = hugin_arg(&tmp);
    let out = switch_source(tmp.path(), &["switch", "pano.pto", "--hugin", &hugin]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "Switching pano.pto to TIFF\nChanged 2 filenames\nDone!\n"
    );

    let updated = fs::read_to_string(tmp.path().join("pano.pto")).unwrap();
    let expected = JPEG_PROJECT
        .replace("jpeg/IMG_0001.jpg", "tiff16/IMG_0001.tif")
        .replace("jpeg/IMG_0002.jpg", "tiff16/IMG_0002.tif");
    assert_eq!(updated, expected);
}

#[test]
fn switch_discovers_single_project() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("pano.pto"), JPEG_PROJECT).unwrap();

    let hugin = hugin_arg(&tmp);
    let out = switch_source(tmp.path(), &["switch", "-t", "jpeg", "--hugin", &hugin]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "Switching pano.pto to JPEG\nNo changes made to file.\nDone!\n"
    );
    assert_eq!(
        fs::read_to_string(tmp.path().join("pano.pto")).unwrap(),
        JPEG_PROJECT
    );
}

#[test]
fn switch_refuses_ambiguous_directory() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.pto"), JPEG_PROJECT).unwrap();
    fs::write(tmp.path().join("b.pto"), JPEG_PROJECT).unwrap();

    let hugin = hugin_arg(&tmp);
    let out = switch_source(tmp.path(), &["switch", "--hugin", &hugin]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Found 2 PTO files, don't know what to do!"));
    assert_eq!(fs::read_to_string(tmp.path().join("a.pto")).unwrap(), JPEG_PROJECT);
}

#[test]
fn switch_requires_hugin() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("pano.pto"), JPEG_PROJECT).unwrap();

    let missing = tmp.path().join("Hugin*").to_string_lossy().into_owned();
    let out = switch_source(tmp.path(), &["switch", "--hugin", &missing]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Hugin directory not found"));
    assert_eq!(
        fs::read_to_string(tmp.path().join("pano.pto")).unwrap(),
        JPEG_PROJECT
    );
}

#[test]
fn switch_rejects_unknown_layout() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("pano.pto"), JPEG_PROJECT).unwrap();

    let hugin = hugin_arg(&tmp);
    let out = switch_source(tmp.path(), &["switch", "-t", "PNG", "--hugin", &hugin]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Unknown layout \"PNG\""));
}

#[test]
fn switch_reports_missing_project() {
    let tmp = TempDir::new().unwrap();

    let hugin = hugin_arg(&tmp);
    let out = switch_source(tmp.path(), &["switch", "gone.pto", "--hugin", &hugin]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Cannot read project file gone.pto"));
}

#[test]
fn config_adds_layout_and_default() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("pano.pto"), JPEG_PROJECT).unwrap();
    fs::write(
        tmp.path().join("switch-source.toml"),
        format!(
            "default_layout = \"PNG\"\nhugin_dir = {:?}\n\n[layouts.PNG]\ndirectory = \"png8\"\nextension = \"png\"\n",
            hugin_arg(&tmp)
        ),
    )
    .unwrap();

    let out = switch_source(tmp.path(), &["switch"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("Changed 2 filenames"));
    assert!(
        fs::read_to_string(tmp.path().join("pano.pto"))
            .unwrap()
            .contains("n\"png8/IMG_0002.png\"")
    );
}

#[test]
fn layouts_lists_stock_layouts() {
    let tmp = TempDir::new().unwrap();
    let out = switch_source(tmp.path(), &["layouts"]);
    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        "Layouts\n001 JPEG\n    Source: jpeg/*.jpg\n002 TIFF (default)\n    Source: tiff16/*.tif\n"
    );
}

#[test]
fn gen_config_prints_stock_file() {
    let tmp = TempDir::new().unwrap();
    let out = switch_source(tmp.path(), &["gen-config"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("default_layout = \"TIFF\""));
    assert!(text.contains("[layouts.JPEG]"));
}
