//! Command-line tests for the editx binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn editx() -> Command {
    let mut cmd = Command::cargo_bin("editx").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("EDITX_LOG_LEVEL")
        .env_remove("EDITX_FFMPEG_PATH")
        .env_remove("EDITX_FFPROBE_PATH");
    cmd
}

#[test]
fn test_compile_blur_and_brightness() {
    editx()
        .args(["compile", "--duration", "10", "--blur", "10", "--brightness", "0.3"])
        .assert()
        .success()
        .stdout(predicate::eq(
            "-i input.mp4 -vf boxblur=10:1,eq=brightness=0.3:contrast=1 -preset ultrafast output.mp4\n",
        ));
}

#[test]
fn test_compile_trim_only_copies_streams() {
    editx()
        .args(["compile", "--duration", "0:10", "-s", "2.5", "-e", "7"])
        .assert()
        .success()
        .stdout(predicate::eq(
            "-i input.mp4 -ss 2.5 -to 7 -c copy output.mp4\n",
        ));
}

#[test]
fn test_compile_negative_brightness_and_reverse() {
    editx()
        .args([
            "compile",
            "--duration",
            "10",
            "--brightness",
            "-0.5",
            "--reverse",
            "--rotate",
            "180",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "-vf eq=brightness=-0.5:contrast=1,transpose=1,transpose=1,reverse -af areverse",
        ));
}

#[test]
fn test_compile_rejects_bad_rotation() {
    editx()
        .args(["compile", "--duration", "10", "--rotate", "45"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rotation"));
}

#[test]
fn test_compile_rejects_out_of_range_blur() {
    editx()
        .args(["compile", "--duration", "10", "--blur", "25"])
        .assert()
        .failure();
}

#[test]
fn test_compile_rejects_inverted_trim() {
    editx()
        .args(["compile", "--duration", "10", "-s", "6", "-e", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid edit parameters"));
}

#[test]
fn test_apply_rejects_non_video_input() {
    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, b"hello").unwrap();

    editx()
        .current_dir(dir.path())
        .args(["apply", "--duration", "10", "--grayscale", "--input"])
        .arg(&notes)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported input file"));
}

#[test]
fn test_broken_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("editx.toml");
    std::fs::write(&config, "[logging\nlevel = ").unwrap();

    editx()
        .current_dir(dir.path())
        .args(["compile", "--duration", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_help_lists_commands() {
    editx()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("compile"))
        .stdout(predicate::str::contains("probe"));
}
