use std::path::PathBuf;
use std::process::{Command, Output};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("runtime-tests-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn balance(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_balance")).args(args).output().expect("failed to launch balance")
}

fn config_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../configs/ball_balance.json")
}

#[test]
fn zero_policy_rollout_succeeds() {
    let assets = scratch_dir("zero");
    let out = balance(&[
        "--num-envs",
        "4",
        "--steps",
        "20",
        "--log-every",
        "10",
        "--asset-dir",
        assets.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(assets.join("balance_bot.xml").exists());
}

#[test]
fn random_policy_with_shipped_config() {
    let assets = scratch_dir("random");
    let config = config_path();
    let out = balance(&[
        "--config",
        config.to_str().unwrap(),
        "--num-envs",
        "2",
        "--steps",
        "10",
        "--policy",
        "random",
        "--seed",
        "7",
        "--asset-dir",
        assets.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
}

#[test]
fn missing_config_fails() {
    let dir = scratch_dir("missing");
    let missing = dir.join("nope.json");
    let out = balance(&["--config", missing.to_str().unwrap(), "--steps", "1"]);
    assert!(!out.status.success());
}

#[test]
fn zero_envs_is_rejected() {
    let assets = scratch_dir("zero-envs");
    let out = balance(&["--num-envs", "0", "--steps", "1", "--asset-dir", assets.to_str().unwrap()]);
    assert!(!out.status.success());
}

#[test]
fn unknown_policy_is_a_usage_error() {
    let out = balance(&["--policy", "greedy"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("greedy"));
}
