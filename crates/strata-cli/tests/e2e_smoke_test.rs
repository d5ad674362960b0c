use std::{fs, path::PathBuf};

use tempfile::tempdir;

use strata_cli::{Args, run};

/// Collects all .toml files from a directory
fn collect_scenarios(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn scenarios_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios")
}

fn args_for(input: &PathBuf, out_dir: &std::path::Path, prefix: &str) -> Args {
    let stem = input.file_stem().unwrap().to_string_lossy();
    Args {
        input: input.to_string_lossy().to_string(),
        output: out_dir
            .join(format!("{prefix}{stem}.svg"))
            .to_string_lossy()
            .to_string(),
        notifications: Some(
            out_dir
                .join(format!("{prefix}{stem}.notifications.toml"))
                .to_string_lossy()
                .to_string(),
        ),
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_scenarios() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_scenarios = collect_scenarios(scenarios_path());

    assert!(
        !valid_scenarios.is_empty(),
        "No valid scenarios found in scenarios/"
    );

    let mut failed_scenarios = Vec::new();

    for scenario_path in &valid_scenarios {
        let args = args_for(scenario_path, temp_dir.path(), "");

        match run(&args) {
            Ok(()) => {
                let svg = fs::read_to_string(&args.output).expect("overlay written");
                assert!(svg.contains("<svg"), "{}", scenario_path.display());
            }
            Err(e) => failed_scenarios.push((scenario_path.clone(), e)),
        }
    }

    if !failed_scenarios.is_empty() {
        eprintln!("\nValid scenarios that failed:");
        for (path, err) in &failed_scenarios {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!(
            "{} valid scenario(s) failed unexpectedly",
            failed_scenarios.len()
        );
    }

    println!("✅ All {} valid scenarios passed", valid_scenarios.len());
}

#[test]
fn e2e_smoke_test_error_scenarios() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_scenarios = collect_scenarios(scenarios_path().join("errors"));

    assert!(
        !error_scenarios.is_empty(),
        "No error scenarios found in scenarios/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for scenario_path in &error_scenarios {
        let args = args_for(scenario_path, temp_dir.path(), "error_");

        if run(&args).is_ok() {
            unexpectedly_succeeded.push(scenario_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError scenarios that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error scenario(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }

    println!(
        "✅ All {} error scenarios failed as expected",
        error_scenarios.len()
    );
}

#[test]
fn e2e_move_to_layer_transcript() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = scenarios_path().join("move_to_layer.toml");
    let args = args_for(&input, temp_dir.path(), "");

    run(&args).expect("scenario replays");

    let transcript = fs::read_to_string(args.notifications.as_ref().unwrap()).unwrap();
    let transcript: toml::Table = toml::from_str(&transcript).unwrap();
    let notifications = transcript["notification"].as_array().unwrap();

    assert_eq!(notifications.len(), 1);
    let notification = notifications[0].as_table().unwrap();
    assert_eq!(notification["kind"].as_str(), Some("set_constraint"));
    assert_eq!(notification["node_id"].as_str(), Some("source"));
    assert_eq!(notification["layer_constraint"].as_integer(), Some(2));
    assert!(!notification.contains_key("position_constraint"));

    let svg = fs::read_to_string(&args.output).unwrap();
    assert!(svg.contains("data-node=\"source\""));
}

#[test]
fn e2e_cancel_sends_nothing() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = scenarios_path().join("cancel.toml");
    let args = args_for(&input, temp_dir.path(), "");

    run(&args).expect("scenario replays");

    let transcript = fs::read_to_string(args.notifications.as_ref().unwrap()).unwrap();
    let transcript: toml::Table = toml::from_str(&transcript).unwrap();
    assert!(transcript["notification"].as_array().unwrap().is_empty());
}

#[test]
fn e2e_direction_from_config() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "[interaction]\ndirection = \"down\"\n").unwrap();

    // Root in layer 0, two children side by side in layer 1 below it.
    let input = temp_dir.path().join("tree.toml");
    fs::write(
        &input,
        r#"
[snapshot]
source_uri = "file:///tree.sctx"

[[snapshot.nodes]]
id = "root"
x = 0
y = 0
width = 20
height = 20

[[snapshot.nodes]]
id = "left"
x = 0
y = 60
width = 20
height = 20
layer_id = 1

[[snapshot.nodes]]
id = "right"
x = 40
y = 60
width = 20
height = 20
layer_id = 1
position_id = 1

[[step]]
action = "down"
node = "right"
x = 50
y = 70

[[step]]
action = "move"
x = -20
y = 70

[[step]]
action = "up"
x = -20
y = 70
"#,
    )
    .unwrap();

    let mut args = args_for(&input, temp_dir.path(), "");
    args.config = Some(config.to_string_lossy().to_string());

    run(&args).expect("scenario replays");

    let transcript = fs::read_to_string(args.notifications.as_ref().unwrap()).unwrap();
    let transcript: toml::Table = toml::from_str(&transcript).unwrap();
    let notifications = transcript["notification"].as_array().unwrap();

    assert_eq!(notifications.len(), 1);
    let notification = notifications[0].as_table().unwrap();
    assert_eq!(notification["node_id"].as_str(), Some("right"));
    assert_eq!(notification["position_constraint"].as_integer(), Some(0));
    assert!(!notification.contains_key("layer_constraint"));
}
