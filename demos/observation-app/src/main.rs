use observa_core::Entropy;
use observa_platform::{RunnerConfig, run_headless_app};
use observation_app::App;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    run_headless_app(App(Entropy::from_entropy()), RunnerConfig::default())
}
