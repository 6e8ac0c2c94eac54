//! Главный исполняемый файл sqlscan

use clap::Parser;
use sqlscan::cli::{init_logging, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    init_logging(&config.logging.level);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli.execute(&config, &mut out)
}
