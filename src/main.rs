use anyhow::Context;
use clap::Parser;
use dial::config;
use dial::dial::DialState;
use dial::gui::app::AppModel;
use dial::gui::snapshot;
use dial::sys::runtime;
use relm4::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "A circular dial control", long_about = None)]
struct Args {
    /// Starting value, clamped to 0..=100 (overrides the config file)
    #[arg(short, long, allow_hyphen_values = true)]
    value: Option<f64>,

    /// Control socket path (overrides the config file)
    #[arg(short, long)]
    socket: Option<PathBuf>,

    /// Render the dial to a PNG file and exit instead of opening a window
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,

    /// Write the default config file if missing and print its path
    #[arg(long)]
    init_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.init_config {
        let path = config::write_default_config().context("writing default config")?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut config = config::load_or_default();
    if let Some(socket) = args.socket {
        config.server.socket = socket;
    }
    let state = DialState::new(args.value.unwrap_or(config.dial.initial_value));

    if let Some(path) = args.snapshot {
        snapshot::write_png(&path, &config.dial, state.get())
            .with_context(|| format!("rendering snapshot to {}", path.display()))?;
        return Ok(());
    }

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx, config.server.socket.clone());

    // GTK would otherwise try to parse our command line
    let app = RelmApp::new("org.dial.dial").with_args(Vec::new());
    app.run::<AppModel>((state.into_handle(), config, rx));

    Ok(())
}
