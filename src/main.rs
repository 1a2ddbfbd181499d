use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use hotel_map::app::App;
use hotel_map::config::Args;
use hotel_map::hotel::{Listing, PriceRange};
use hotel_map::{data, ui};
use ratatui::layout::Rect;
use ratatui::DefaultTerminal;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let listings = match &args.dataset {
        Some(path) => data::load_listings(path)
            .with_context(|| format!("Failed to load hotel dataset {}", path.display()))?,
        None => data::bundled_listings().context("Bundled hotel dataset is corrupt")?,
    };

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, &args, listings);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    info!("exiting");
    result
}

/// Log to a file; stdout belongs to the map
fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "hotel_map=info".into());

    match args.open_log() {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init(),
        None => {
            eprintln!(
                "warning: cannot create log file {}, logging disabled",
                args.log_file.display()
            );
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
        }
    }
}

/// Handle mouse events for panning, zooming and picking
fn handle_mouse(app: &mut App, mouse: MouseEvent, pressed_at: &mut Option<(u16, u16)>) {
    match mouse.kind {
        // Scroll wheel for zooming towards mouse position
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
            *pressed_at = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            // Press and release on the same cell is a click, anything else was a drag
            if pressed_at.take() == Some((mouse.column, mouse.row)) {
                app.click(mouse.column, mouse.row);
            }
            app.end_drag();
        }
        _ => {}
    }
}

fn handle_key(app: &mut App, code: KeyCode) {
    if !app.is_ready() {
        if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
            app.quit();
        }
        return;
    }

    match code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc => {
            if !app.close_popup() {
                app.quit();
            }
        }

        // Filters
        KeyCode::Char('1') => app.set_price_range(PriceRange::All),
        KeyCode::Char('2') => app.set_price_range(PriceRange::Budget),
        KeyCode::Char('3') => app.set_price_range(PriceRange::Mid),
        KeyCode::Char('4') => app.set_price_range(PriceRange::Luxury),
        KeyCode::Char('p') | KeyCode::Char('P') => app.cycle_price_range(),
        KeyCode::Char(']') => app.nudge_rating(1),
        KeyCode::Char('[') => app.nudge_rating(-1),

        // Pan with hjkl or arrow keys
        KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
        KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
        KeyCode::Up | KeyCode::Char('k') => app.pan(0, -8),
        KeyCode::Down | KeyCode::Char('j') => app.pan(0, 8),

        // Zoom
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

        // Cluster popup
        KeyCode::Char('n') | KeyCode::Tab => app.cycle_popup(true),
        KeyCode::Char('N') | KeyCode::BackTab => app.cycle_popup(false),

        KeyCode::Char('d') | KeyCode::Char('D') => app.map_renderer.toggle_detail(),

        // Reset view
        KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),

        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, args: &Args, listings: Vec<Listing>) -> Result<()> {
    let size = terminal.size()?;
    let map_area = ui::map_inner(Rect::new(0, 0, size.width, size.height));
    let mut app = App::new(
        listings,
        map_area,
        args.cluster_radius,
        args.loading_delay(),
        Instant::now(),
    );

    if let Some(path) = &args.basemap {
        data::load_basemap(&mut app.map_renderer, path);
    }

    // Fall back to a sketched shoreline if no base map loaded
    if !app.map_renderer.has_data() {
        data::generate_waterfront(&mut app.map_renderer);
    }

    let mut pressed_at = None;

    // Main loop
    loop {
        // Draw
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                // Only handle key press events (not release)
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(&mut app, key.code),
                Event::Mouse(mouse) if app.is_ready() => {
                    handle_mouse(&mut app, mouse, &mut pressed_at);
                }
                Event::Resize(width, height) => {
                    app.resize(ui::map_inner(Rect::new(0, 0, width, height)));
                }
                _ => {}
            }
        }

        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
