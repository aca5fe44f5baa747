mod app;
mod cli;
mod contact;
mod controller;
mod filter;
mod loader;
mod logging;
mod nav;
mod product;
mod renderer;
mod repository;
mod theme;
mod view;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Logging is best effort; the browser works without it.
    let log_path = cli.log_file.clone().or_else(logging::default_log_path);
    if let Some(ref path) = log_path {
        if let Err(e) = logging::init(path) {
            eprintln!("Warning: logging disabled: {e:#}");
        }
    }

    let (columns, _) = crossterm::terminal::size()?;
    tracing::info!(source = %cli.source, columns, "starting catalog browser");

    let mut app = app::App::new(&cli, columns);
    app.run()?;

    Ok(())
}
