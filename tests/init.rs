use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_voxmap"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "voxmap init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config_path = dir.path().join(".voxmap.toml");
    assert!(config_path.exists(), ".voxmap.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[index]"));
    assert!(content.contains("[match]"));

    // Verify it's valid TOML that voxmap-core can parse
    let _config: voxmap_core::VoxmapConfig = toml::from_str(&content).unwrap();
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".voxmap.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_voxmap"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn bare_invocation_prints_welcome() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_voxmap"))
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Quick start:"), "stdout: {stdout}");
    assert!(stdout.contains("resolve"), "stdout: {stdout}");
}
