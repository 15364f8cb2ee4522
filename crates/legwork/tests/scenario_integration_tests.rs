//! Integration tests running full simulations over every scenario

use std::path::PathBuf;

use legwork::scenario::PRESETS;
use legwork::{AppConfig, Scenario, Simulation};

fn scenario_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios")
}

fn run(scenario: &Scenario, ticks: usize) -> Simulation {
    let mut config = AppConfig::default();
    config.run.seed = 2024;
    let mut sim = Simulation::new(scenario, &config).unwrap();

    for _ in 0..ticks {
        sim.tick().unwrap();
        for limb in sim.rig().engine.limbs() {
            let r = limb.current_retraction();
            assert!((0.0..=1.0).contains(&r), "{}: retraction {}", scenario.name, r);
            assert!(!(limb.is_retracting() && limb.is_extending()));
            assert!((0.0..=1.0).contains(&limb.flip_completion()));
        }
    }
    sim
}

#[test]
fn test_every_preset_runs() {
    for name in PRESETS {
        let scenario = Scenario::preset(name).unwrap();
        let sim = run(&scenario, 300);
        assert_eq!(sim.report().ticks, 300);
    }
}

#[test]
fn test_cage_flips_knees() {
    let sim = run(&Scenario::cage(), 300);
    let report = sim.report();
    assert!(
        report.knee_flips + report.relocations + report.invalid_limb_ticks > 0,
        "cage walls never touched a knee: {:?}",
        report
    );
}

#[test]
fn test_scenario_files_load_and_run() {
    let mut found = 0;
    for entry in std::fs::read_dir(scenario_dir()).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|e| e == "ron") {
            let scenario = Scenario::load(&path).unwrap();
            let sim = run(&scenario, 120);
            assert!(sim.report().steps_started > 0, "{}", scenario.name);
            found += 1;
        }
    }
    assert!(found >= 2);
}
