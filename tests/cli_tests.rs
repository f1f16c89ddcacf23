#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use apiseq::{PlanArtifact, PlanStatus};
use common::fixtures::LOGIN_PROFILE;
use common::temp_files;
use std::path::PathBuf;
use std::process::Command;

fn demo_spec() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join("openapi.yaml")
}

fn apiseq() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_apiseq"));
    cmd.env_remove("APISEQ_CONFIG")
        .env_remove("RUST_LOG")
        .env("APISEQ_LOG_LEVEL", "warn");
    cmd
}

#[test]
fn test_cli_plan_to_stdout() {
    let spec = temp_files::create_temp_yaml(LOGIN_PROFILE);
    let output = apiseq()
        .arg("plan")
        .arg("--spec")
        .arg(&spec)
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let artifact: PlanArtifact = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(artifact.status, PlanStatus::Ok);
    assert_eq!(artifact.sequence, vec!["POST /login", "GET /profile"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ok: 2 operations, 1 edges, 0 cycles"));
    temp_files::cleanup_temp_files(&[spec]);
}

#[test]
fn test_cli_plan_writes_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("plan.yaml");
    let status = apiseq()
        .arg("plan")
        .arg("--spec")
        .arg(demo_spec())
        .arg("--output")
        .arg(&out)
        .status()
        .expect("run cli");
    assert!(status.success(), "cycles do not fail without --fail-on-cycle");

    let text = std::fs::read_to_string(&out).unwrap();
    let artifact: PlanArtifact = serde_yaml::from_str(&text).unwrap();
    assert_eq!(artifact.nodes.len(), 7);
    assert_eq!(artifact.sequence.len(), 7);
    assert_eq!(artifact.sequence[0], "GET /pets");
    assert_eq!(
        artifact.protected_headers["POST /store/orders"],
        vec!["X-Partner-Key"]
    );
}

#[test]
fn test_cli_fail_on_cycle_exit_code() {
    let status = apiseq()
        .arg("plan")
        .arg("--spec")
        .arg(demo_spec())
        .arg("--fail-on-cycle")
        .output()
        .expect("run cli")
        .status;
    assert_eq!(status.code(), Some(2));
}

#[test]
fn test_cli_inspect_lists_operations() {
    let output = apiseq()
        .arg("inspect")
        .arg("--spec")
        .arg(demo_spec())
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 7);
    assert!(stdout.contains("POST /auth/login\tproducer=true\tprotected=false\theaders=[]"));
    assert!(stdout.contains("GET /pets/{pet_id}\tproducer=false\tprotected=true\theaders=[Authorization]"));
}

#[test]
fn test_cli_config_prints_defaults() {
    let output = apiseq().arg("config").output().expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed = apiseq::PlannerConfig::from_toml_str(&stdout).unwrap();
    assert_eq!(parsed, apiseq::PlannerConfig::default());
}

#[test]
fn test_cli_custom_config_and_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("apiseq.toml");
    std::fs::write(&config, "producer_keywords = []\ncredential_fields = []\ncredential_substrings = []\ncredential_suffixes = []\n").unwrap();

    let output = apiseq()
        .arg("inspect")
        .arg("--spec")
        .arg(demo_spec())
        .arg("--config")
        .arg(&config)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    assert!(!String::from_utf8_lossy(&output.stdout).contains("producer=true"));

    let missing_config = apiseq()
        .arg("plan")
        .arg("--spec")
        .arg(demo_spec())
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .output()
        .expect("run cli");
    assert_eq!(missing_config.status.code(), Some(1));

    let missing_spec = apiseq()
        .arg("plan")
        .arg("--spec")
        .arg(dir.path().join("absent.yaml"))
        .output()
        .expect("run cli");
    assert_eq!(missing_spec.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&missing_spec.stderr).contains("absent.yaml"));
}

#[test]
fn test_cli_output_dir_uses_title_slug() {
    let dir = tempfile::tempdir().unwrap();
    let status = apiseq()
        .arg("plan")
        .arg("--spec")
        .arg(demo_spec())
        .arg("--output-dir")
        .arg(dir.path())
        .arg("--format")
        .arg("yaml")
        .status()
        .expect("run cli");
    assert!(status.success());

    let text = std::fs::read_to_string(dir.path().join("pet_store.plan.yaml")).unwrap();
    let artifact: PlanArtifact = serde_yaml::from_str(&text).unwrap();
    assert_eq!(artifact.status, PlanStatus::CycleDetected);
}
