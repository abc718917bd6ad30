use std::io;

use anyhow::Context;
use quicknote_core::{Settings, ViewController};
use quicknote_widget::{logging, run, FileStore, HostConfig, TerminalView, UreqTransport};

fn main() -> anyhow::Result<()> {
    let config = HostConfig::from_env();
    logging::initialize(&config.log_path, config.log_level);
    log::info!("starting against {}", config.api_base);

    let mut store = FileStore::open(&config.settings_path)
        .with_context(|| format!("opening settings at {}", config.settings_path.display()))?;
    let settings = Settings::load(&store).context("reading stored settings")?;

    let view = TerminalView::new(io::stdin().lock(), io::stdout());
    let mut controller = ViewController::new(&config.api_base, settings, UreqTransport::new(), view);

    run(&mut controller, &mut store);
    log::info!("bye");
    Ok(())
}
