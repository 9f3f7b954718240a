use std::io;
use std::time::Duration;

use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod app;
mod catalog;
mod config;
mod db;
mod error;
mod models;
mod tui;

use app::App;
use catalog::Catalog;
use config::Config;
use error::Result;
use models::ResourceFilter;
use tui::{draw, handle_key_event};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let config = Config::load()?;

    // The catalog is opened once here and handed to everything that needs it
    let catalog = Catalog::open(&config.db_path).await?;

    // Headless listing
    if args.get(1).map(String::as_str) == Some("--list") {
        print_catalog(&catalog).await;
        return Ok(());
    }

    let mut app = App::new(catalog).await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn print_catalog(catalog: &Catalog) {
    let listing = catalog.list(&ResourceFilter::default()).await;
    if let Some(message) = listing.error {
        eprintln!("{message}");
        return;
    }

    for resource in &listing.value {
        println!("[{}] {}", resource.category, resource.title);
        if let Some(url) = &resource.url {
            println!("    {url}");
        }
        if !resource.description.is_empty() {
            println!("    {}", resource.description);
        }
    }
    println!("{} resources", catalog.count().await.value);
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = handle_key_event(key, app.mode, app.show_help) {
                        if app.handle_action(action).await {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
