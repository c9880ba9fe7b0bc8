mod integration;

use tracing_subscriber::EnvFilter;

use crate::integration::{load_scenarios_from_json, run_scenario};

#[test]
fn native_block_scenarios() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("ch_native=debug,scenarios_test=debug"))
        .with_test_writer()
        .try_init();

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/integration/scenarios.json");
    let scenarios = load_scenarios_from_json(path);
    assert!(!scenarios.is_empty());
    for scenario in &scenarios {
        run_scenario(scenario);
    }
}
