use digipg::{Config, init_tracing, run};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let (config, source) = Config::discover()?;
    config.validate()?;

    init_tracing(&config);
    info!(%source, "Configuration loaded");

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if config.general.worker_threads > 0 {
        builder.worker_threads(config.general.worker_threads);
    }

    let runtime = builder.build()?;
    runtime.block_on(run(config))
}
