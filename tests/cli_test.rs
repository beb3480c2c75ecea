//! Integration tests for the multibuild CLI
//!
//! Runs the real binary against a temporary project, with shell scripts
//! standing in for rustup and cargo:
//! - Missing manifest is reported
//! - `targets` lists and persists the reconciled selection
//! - `select`/`deselect` survive restarts
//! - `build` stops at the first failing target and restores the active target
//! - An interrupt lets the running target finish, then cancels the rest

#![cfg(unix)]

mod common;

use common::{TestProject, SAMPLE_MANIFEST};
use predicates::prelude::*;
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

const LINUX: &str = "x86_64-unknown-linux-gnu";
const WINDOWS: &str = "x86_64-pc-windows-msvc";
const WASM: &str = "wasm32-unknown-unknown";

struct Fixture {
    project: TestProject,
    rustup: PathBuf,
    cargo: PathBuf,
}

impl Fixture {
    /// Project whose toolchain has `installed` triples and whose cargo fails for `failing`
    fn new(installed: &[&str], failing: Option<&str>) -> Self {
        Self::with_build_time(installed, failing, 0)
    }

    /// Like [`Fixture::new`], with every cargo invocation taking `seconds`
    fn with_build_time(installed: &[&str], failing: Option<&str>, seconds: u32) -> Self {
        let project = TestProject::new();
        project.create_file("multibuild.toml", SAMPLE_MANIFEST);

        let rustup = project.create_script(
            "fake-rustup",
            &installed
                .iter()
                .map(|t| format!("echo {t}"))
                .collect::<Vec<_>>()
                .join("\n"),
        );

        let log = project.path().join("cargo.log");
        let fail_case = failing.map_or_else(String::new, |triple| {
            format!("  {triple}) echo 'error: linker not found' >&2; exit 101 ;;\n")
        });
        let cargo = project.create_script(
            "fake-cargo",
            &format!(
                "echo \"$3\" >> '{}'\nsleep {seconds}\n\
                 case \"$3\" in\n{fail_case}  *) exit 0 ;;\nesac",
                log.display()
            ),
        );

        Self {
            project,
            rustup,
            cargo,
        }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_multibuild"))
            .current_dir(self.project.path())
            .env("MULTIBUILD_RUSTUP", &self.rustup)
            .env("MULTIBUILD_CARGO", &self.cargo)
            .env_remove("RUST_LOG")
            .args(args)
            .output()
            .expect("Failed to execute multibuild")
    }

    fn cargo_calls(&self) -> Vec<String> {
        if !self.project.file_exists("cargo.log") {
            return Vec::new();
        }
        self.project
            .read_file("cargo.log")
            .lines()
            .map(ToString::to_string)
            .collect()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_missing_manifest() {
    let fixture = Fixture::new(&[LINUX], None);
    std::fs::remove_file(fixture.project.path().join("multibuild.toml")).unwrap();

    let output = fixture.run(&["targets"]);
    assert!(!output.status.success());
    assert!(predicate::str::contains("Manifest not found").eval(&stderr(&output)));
}

#[test]
fn test_targets_lists_installed_and_persists() {
    let fixture = Fixture::new(&[WASM, LINUX, "riscv64gc-unknown-none-elf"], None);

    let output = fixture.run(&["targets"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(predicate::str::contains("[x] linux-x64").eval(&out));
    assert!(predicate::str::contains("[x] wasm32").eval(&out));
    assert!(!out.contains("windows-x64"));
    assert!(fixture.project.file_exists(".multibuild/selection.toml"));
}

#[test]
fn test_deselect_survives_restart() {
    let fixture = Fixture::new(&[LINUX, WASM], None);

    let output = fixture.run(&["deselect", "wasm32"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = fixture.run(&["--json", "targets"]);
    assert!(output.status.success());
    let entries: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], "linux-x64");
    assert_eq!(entries[0]["selected"], true);
    assert_eq!(entries[1]["id"], "wasm32");
    assert_eq!(entries[1]["selected"], false);
}

#[test]
fn test_select_uncataloged_target_fails() {
    let fixture = Fixture::new(&[LINUX], None);

    let output = fixture.run(&["select", "windows-x64"]);
    assert!(!output.status.success());
    assert!(predicate::str::contains("not buildable").eval(&stderr(&output)));
}

#[test]
fn test_vanished_target_dropped_from_selection() {
    let wide = Fixture::new(&[LINUX, WASM], None);
    assert!(wide.run(&["targets"]).status.success());

    let narrow_rustup = wide.project.create_script("narrow-rustup", &format!("echo {LINUX}"));
    let output = Command::new(env!("CARGO_BIN_EXE_multibuild"))
        .current_dir(wide.project.path())
        .env("MULTIBUILD_RUSTUP", &narrow_rustup)
        .args(["--json", "targets"])
        .output()
        .unwrap();
    let entries: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert!(!wide
        .project
        .read_file(".multibuild/selection.toml")
        .contains("wasm32"));
}

#[test]
fn test_build_all_selected() {
    let fixture = Fixture::new(&[LINUX, WASM], None);
    assert!(fixture.run(&["active", "linux-x64"]).status.success());

    let output = fixture.run(&["build"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(predicate::str::contains("Build complete!").eval(&stdout(&output)));

    assert_eq!(fixture.cargo_calls(), vec![LINUX.to_string(), WASM.to_string()]);
    assert_eq!(
        fixture.project.read_file(".multibuild/active-target").trim(),
        "linux-x64"
    );
}

#[test]
fn test_build_aborts_on_first_failure() {
    let fixture = Fixture::new(&[LINUX, WINDOWS, WASM], Some(WINDOWS));
    assert!(fixture.run(&["active", "wasm32"]).status.success());

    let output = fixture.run(&["build"]);
    assert!(!output.status.success());

    let out = stdout(&output);
    assert!(predicate::str::contains("Build failed for windows-x64").eval(&out));
    assert!(predicate::str::contains("linker not found").eval(&out));
    assert!(predicate::str::contains("active target restored to wasm32").eval(&out));

    // Windows comes first in catalog order, nothing after it is attempted
    assert_eq!(fixture.cargo_calls(), vec![WINDOWS.to_string()]);
    assert_eq!(
        fixture.project.read_file(".multibuild/active-target").trim(),
        "wasm32"
    );
}

#[test]
fn test_build_json_report() {
    let fixture = Fixture::new(&[LINUX, WASM], Some(WASM));
    assert!(fixture.run(&["active", "linux-x64"]).status.success());

    let output = fixture.run(&["--json", "build"]);
    assert!(!output.status.success());

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["outcome"]["status"], "aborted");
    assert_eq!(report["outcome"]["target"], "wasm32");
    assert_eq!(report["results"][0]["succeeded"], true);
    assert_eq!(report["restore"]["status"], "restored");
}

#[test]
fn test_build_explicit_target_outside_catalog() {
    let fixture = Fixture::new(&[LINUX], None);

    let output = fixture.run(&["build", "--target", "macos-arm64"]);
    assert!(!output.status.success());
    assert!(predicate::str::contains("not buildable").eval(&stderr(&output)));
    assert!(fixture.cargo_calls().is_empty());
}

#[test]
fn test_build_repeated_target_builds_once() {
    let fixture = Fixture::new(&[LINUX, WASM], None);

    let output = fixture.run(&["build", "-t", "linux-x64", "-t", "linux-x64"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(fixture.cargo_calls(), vec![LINUX.to_string()]);
}

#[test]
fn test_build_with_nothing_selected() {
    let fixture = Fixture::new(&[LINUX], None);
    assert!(fixture.run(&["deselect", "--all"]).status.success());

    let output = fixture.run(&["build"]);
    assert!(output.status.success());
    assert!(predicate::str::contains("No targets selected").eval(&stdout(&output)));
    assert!(fixture.cargo_calls().is_empty());
}

#[test]
fn test_missing_rustup_is_distinct_from_empty_catalog() {
    let fixture = Fixture::new(&[], None);

    let output = Command::new(env!("CARGO_BIN_EXE_multibuild"))
        .current_dir(fixture.project.path())
        .env("MULTIBUILD_RUSTUP", "/nonexistent/rustup-for-tests")
        .arg("targets")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(predicate::str::contains("rustup").eval(&stderr(&output)));

    let output = fixture.run(&["targets"]);
    assert!(output.status.success());
    assert!(predicate::str::contains("No buildable targets").eval(&stdout(&output)));
}

#[test]
fn test_interrupt_finishes_current_target_then_cancels() {
    let fixture = Fixture::with_build_time(&[LINUX, WASM], None, 2);
    assert!(fixture.run(&["active", "linux-x64"]).status.success());

    let child = Command::new(env!("CARGO_BIN_EXE_multibuild"))
        .current_dir(fixture.project.path())
        .env("MULTIBUILD_RUSTUP", &fixture.rustup)
        .env("MULTIBUILD_CARGO", &fixture.cargo)
        .env_remove("RUST_LOG")
        .arg("build")
        .process_group(0)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn multibuild");

    // Wait until the first cargo invocation is running
    let deadline = Instant::now() + Duration::from_secs(10);
    while fixture.cargo_calls().is_empty() {
        assert!(Instant::now() < deadline, "cargo was never invoked");
        std::thread::sleep(Duration::from_millis(50));
    }
    std::thread::sleep(Duration::from_millis(300));

    // Same signal a terminal sends to the foreground group on Ctrl-C
    let status = Command::new("kill")
        .args(["-INT", &format!("-{}", child.id())])
        .status()
        .unwrap();
    assert!(status.success());

    let output = child.wait_with_output().unwrap();
    assert!(!output.status.success());

    let out = stdout(&output);
    assert!(
        predicate::str::contains("Linux 64-bit built").eval(&out),
        "stdout: {out}\nstderr: {}",
        stderr(&output)
    );
    assert!(predicate::str::contains("Build cancelled before wasm32").eval(&out));
    assert!(!out.contains("Build failed"));
    assert_eq!(fixture.cargo_calls(), vec![LINUX.to_string()]);
    assert_eq!(
        fixture.project.read_file(".multibuild/active-target").trim(),
        "linux-x64"
    );
}
