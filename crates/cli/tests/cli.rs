//! End-to-end tests of the `taskwork` command line.

mod common;

use common::{completed, BIN};
use std::process::Command;

#[test]
fn test_images_command_end_to_end() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    let input = image::RgbImage::from_pixel(2, 1, image::Rgb([100, 240, 8]));
    input.save(src.path().join("a.png")).unwrap();
    input.save(src.path().join("b.png")).unwrap();
    std::fs::write(src.path().join("c.txt"), b"ignored").unwrap();

    let status = Command::new(BIN)
        .arg("images")
        .arg("--source")
        .arg(src.path())
        .arg("--destination")
        .arg(dst.path())
        .args(["--ext", ".png", "--backend", "process"])
        .status()
        .unwrap();
    assert!(status.success());

    for name in ["a.png", "b.png"] {
        let out = image::open(dst.path().join(name)).unwrap().to_rgb8();
        assert_eq!(out.dimensions(), (2, 1));
        assert_eq!(out.get_pixel(1, 0).0, [50, 120, 4]);
    }
    assert!(!dst.path().join("c.txt").exists());
}

#[test]
fn test_images_command_defaults_to_jpeg() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    image::RgbImage::from_pixel(2, 2, image::Rgb([200, 200, 200]))
        .save(src.path().join("photo.jpg"))
        .unwrap();
    image::RgbImage::from_pixel(2, 2, image::Rgb([200, 200, 200]))
        .save(src.path().join("skipped.png"))
        .unwrap();

    let status = Command::new(BIN)
        .arg("images")
        .arg("--source")
        .arg(src.path())
        .arg("--destination")
        .arg(dst.path())
        .args(["--backend", "thread"])
        .status()
        .unwrap();
    assert!(status.success());

    assert!(dst.path().join("photo.jpg").is_file());
    assert!(!dst.path().join("skipped.png").exists());
}

#[test]
fn test_run_command_reads_job_file() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("out.log");
    let job = dir.path().join("job.json");
    let content = serde_json::json!({
        "backend": "thread",
        "name_prefix": "Job",
        "source": {
            "type": "messages",
            "messages": ["x", "y"],
            "delay_ms": 0,
            "log": log
        }
    });
    std::fs::write(&job, content.to_string()).unwrap();

    let status = Command::new(BIN)
        .arg("run")
        .arg("--config")
        .arg(&job)
        .status()
        .unwrap();
    assert!(status.success());

    assert_eq!(completed(&log), vec!["Job-1", "Job-2"]);
}

#[test]
fn test_worker_without_payload_exits_non_zero() {
    let status = Command::new(BIN)
        .arg("worker")
        .env_remove(taskwork_worker::TASK_ENV)
        .status()
        .unwrap();
    assert!(!status.success());
}
