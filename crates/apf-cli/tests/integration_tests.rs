//! End-to-end tests driving the `apf` binary.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;
use walkdir::WalkDir;

const CONFIG: &str = r#"
[metadata.core]
author = "whitequark"
name = "demo"
version = "0.1.0"
release_date = "2024-03-01"
description = "Demo core"
description_long = "A longer description of the demo core."

[[metadata.platform]]
id = "demo"
name = "Démo"
manufacturer = "Acme"
year = 2024

[[video.mode]]
width = 256
height = 224
pixel_width = 8
pixel_height = 7
"#;

/// Test context with a project directory holding a core description and
/// one bitstream.
struct TestContext {
    temp_dir: TempDir,
    config: PathBuf,
    rbf: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        Self::with_config(CONFIG)
    }

    fn with_config(config: &str) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("analogue.toml");
        std::fs::write(&config_path, config).expect("failed to write config");
        let rbf = temp_dir.path().join("top.rbf");
        std::fs::write(&rbf, [0x80, 0x01, 0xF0]).expect("failed to write bitstream");
        Self {
            temp_dir,
            config: config_path,
            rbf,
        }
    }

    fn out(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    fn apf_cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_apf"));
        cmd.current_dir(self.temp_dir.path());
        cmd.env_remove("APF_OUTPUT_DIR");
        cmd.env_remove("APF_ZIP");
        cmd.env("NO_COLOR", "1");
        cmd
    }

    fn core_arg(&self) -> String {
        format!("main={}", self.rbf.display())
    }

    fn run(&self, args: &[&str]) -> Output {
        self.apf_cmd().args(args).output().expect("failed to run apf")
    }
}

fn tree_contents(root: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(|entry| entry.expect("walk failed"))
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let rel = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            (rel, std::fs::read(entry.path()).unwrap())
        })
        .collect()
}

fn zip_contents(path: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut member = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            member.read_to_end(&mut data).unwrap();
            (member.name().to_string(), data)
        })
        .collect()
}

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let output = ctx.run(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("build"));
}

#[test]
fn test_version_command() {
    let ctx = TestContext::new();
    let output = ctx.run(&["--version"]);
    assert!(output.status.success());
}

#[test]
fn test_check_valid_config() {
    let ctx = TestContext::new();
    let output = ctx.run(&["check", ctx.config.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("whitequark.demo"));
    assert!(stdout.contains("2024-03-01"));
}

#[test]
fn test_check_reports_error_location() {
    let ctx = TestContext::with_config(&CONFIG.replace("width = 256", "width = 4096"));
    let output = ctx.run(&["check", ctx.config.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("video.mode.0.width"), "stderr: {stderr}");
}

#[test]
fn test_check_rejects_unknown_property() {
    let ctx = TestContext::with_config(&format!("{CONFIG}\n[cartridge]\nslots = 1\n"));
    let output = ctx.run(&["check", ctx.config.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown property `cartridge`"), "stderr: {stderr}");
}

#[test]
fn test_build_tree() {
    let ctx = TestContext::new();
    let out = ctx.out("dist");
    let output = ctx.run(&[
        "build",
        ctx.config.to_str().unwrap(),
        "--core",
        ctx.core_arg().as_str(),
        "--output",
        out.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let files = tree_contents(&out);
    let paths: Vec<&str> = files.keys().map(String::as_str).collect();
    assert_eq!(
        paths,
        [
            "Cores/whitequark.demo/audio.json",
            "Cores/whitequark.demo/core.json",
            "Cores/whitequark.demo/core_0.rbf_r",
            "Cores/whitequark.demo/data.json",
            "Cores/whitequark.demo/info.txt",
            "Cores/whitequark.demo/input.json",
            "Cores/whitequark.demo/interact.json",
            "Cores/whitequark.demo/variants.json",
            "Cores/whitequark.demo/video.json",
            "Platforms/demo.json",
        ]
    );

    assert_eq!(files["Cores/whitequark.demo/core_0.rbf_r"], [0x01, 0x80, 0x0F]);
    assert_eq!(
        files["Cores/whitequark.demo/info.txt"],
        b"A longer description of the demo core."
    );

    let platform = &files["Platforms/demo.json"];
    assert!(platform.is_ascii());
    assert!(String::from_utf8_lossy(platform).contains("D\\u00e9mo"));

    let video: serde_json::Value =
        serde_json::from_slice(&files["Cores/whitequark.demo/video.json"]).unwrap();
    assert_eq!(video["video"]["scaler_modes"][0]["aspect_w"], 64);
    assert_eq!(video["video"]["scaler_modes"][0]["aspect_h"], 49);
}

#[test]
fn test_build_zip_matches_tree() {
    let ctx = TestContext::new();
    let tree = ctx.out("tree");
    let archive_dir = ctx.out("zip");
    let config = ctx.config.to_str().unwrap();
    let core = ctx.core_arg();

    let output = ctx.run(&["build", config, "--core", core.as_str(), "-o", tree.to_str().unwrap()]);
    assert!(output.status.success());

    let output = ctx
        .apf_cmd()
        .args(["build", config, "--core", core.as_str(), "--zip"])
        .env("APF_OUTPUT_DIR", &archive_dir)
        .output()
        .expect("failed to run apf");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let zip_path = archive_dir.join("whitequark.demo_0.1.0_2024-03-01.zip");
    assert!(zip_path.exists());
    assert_eq!(zip_contents(&zip_path), tree_contents(&tree));
}

#[test]
fn test_zip_is_reproducible() {
    let ctx = TestContext::new();
    let config = ctx.config.to_str().unwrap();
    let core = ctx.core_arg();

    let mut archives = Vec::new();
    for name in ["a", "b"] {
        let dir = ctx.out(name);
        let output = ctx.run(&["build", config, "--core", core.as_str(), "--zip", "-o", dir.to_str().unwrap()]);
        assert!(output.status.success());
        archives.push(std::fs::read(dir.join("whitequark.demo_0.1.0_2024-03-01.zip")).unwrap());
    }
    assert_eq!(archives[0], archives[1]);
}

#[test]
fn test_build_missing_bitstream_fails() {
    let ctx = TestContext::new();
    let out = ctx.out("dist");
    let output = ctx.run(&[
        "build",
        ctx.config.to_str().unwrap(),
        "--core",
        "main=does-not-exist.rbf",
        "-o",
        out.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does-not-exist.rbf"), "stderr: {stderr}");
    assert!(!out.exists());
}

#[test]
fn test_info_lists_files_without_writing() {
    let ctx = TestContext::new();
    let output = ctx.run(&["info", ctx.config.to_str().unwrap(), "--core", ctx.core_arg().as_str()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Platforms/demo.json"));
    assert!(stdout.contains("Cores/whitequark.demo/core_0.rbf_r"));
    assert!(stdout.contains("whitequark.demo_0.1.0_2024-03-01.zip"));
    assert!(!ctx.out("Cores").exists());
}
