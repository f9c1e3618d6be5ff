use anyhow::Result;
use clap::Parser;
use tabshift::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Route log::info!() etc. into the debug log. Precedence: --log-level,
    // then RUST_LOG, then the config file (applied below).
    tabshift::debug::init_log_bridge(cli.log_level);

    let config = cli::load_config(&cli)?;
    if cli.log_level.is_none() && std::env::var_os("RUST_LOG").is_none() {
        tabshift::debug::set_level_filter(config.log_level.to_level_filter());
    }
    log::info!("Starting tabshift {}", tabshift::VERSION);

    // Every service call is awaited in sequence, so a single thread is enough
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let code = runtime.block_on(cli::run(cli, config))?;

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
