use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;

use parallax_core::{AppConfig, ImageFetcher, ImageRecord};
use parallax_tui::{
    app::{App, LoadState, Mode, PHOTO_FETCH_WIDTH},
    event::{AppEvent, EventHandler, ImageLoadResult, SearchResult},
    input::{handle_key_event, Action},
    keymap::Keymap,
    load_theme,
    widgets::{CarouselWidget, PopupWidget, StatusBarWidget},
    Loader,
};

type Backend = CrosstermBackend<io::Stdout>;

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    // Fail before touching the terminal if the request can never succeed
    config.search_request()?;

    let keymap = Keymap::from_config(&config.keymap);
    let fetcher = Arc::new(ImageFetcher::new(&config)?);

    let (search_tx, mut search_rx) = mpsc::unbounded_channel::<SearchResult>();
    let (img_tx, mut img_rx) = mpsc::unbounded_channel::<ImageLoadResult>();
    let mut loader = Loader::new(fetcher, search_tx, img_tx)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut terminal = or_restore(setup_terminal, || {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    })?;

    let theme = load_theme(&config.ui.theme);
    let mut app = App::new(config.clone(), theme);

    start_load(&mut app, &mut loader);

    let result = event_loop(
        &mut terminal,
        &mut app,
        &mut loader,
        &keymap,
        &mut search_rx,
        &mut img_rx,
    )
    .await;

    // Late results must never reach the app
    loader.abort_all();
    drop(search_rx);
    drop(img_rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn setup_terminal() -> Result<Terminal<Backend>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("Parallax"))?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Run `setup`, calling `restore` before returning its error
fn or_restore<T>(setup: impl FnOnce() -> Result<T>, restore: impl FnOnce()) -> Result<T> {
    setup().map_err(|e| {
        restore();
        e
    })
}

async fn event_loop(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    loader: &mut Loader,
    keymap: &Keymap,
    search_rx: &mut mpsc::UnboundedReceiver<SearchResult>,
    img_rx: &mut mpsc::UnboundedReceiver<ImageLoadResult>,
) -> Result<()> {
    let event_handler = EventHandler::with_animation_tick(
        app.config.ui.tick_rate_ms,
        app.animator.tick_duration(),
    );

    // Track if we need high frame rate for the snap animation
    let mut needs_fast_update = false;

    loop {
        // Process finished searches (non-blocking)
        while let Ok(result) = search_rx.try_recv() {
            if let Some(records) = app.apply_search_result(result) {
                spawn_image_loads(app, loader, &records);
            }
        }

        // Process any completed image loads (non-blocking)
        while let Ok(result) = img_rx.try_recv() {
            app.apply_image_result(result);
        }

        // Draw UI
        terminal.draw(|frame| {
            let size = frame.area();

            // Main layout: carousel + status bar
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(size);

            match app.load_state.clone() {
                LoadState::Ready => {
                    CarouselWidget::render(frame, main_layout[0], app);
                }
                LoadState::Loading => {
                    let query = app.config.unsplash.query.clone();
                    PopupWidget::render_loading(
                        frame,
                        main_layout[0],
                        app.spinner(),
                        &query,
                        &app.theme,
                    );
                }
                LoadState::Failed(message) => {
                    PopupWidget::render_error(
                        frame,
                        main_layout[0],
                        &message,
                        &app.config.keymap.reload,
                        &app.theme,
                    );
                }
            }

            StatusBarWidget::render(frame, main_layout[1], app);

            if app.mode == Mode::Help {
                PopupWidget::render_help(frame, size, &app.config.keymap, &app.theme);
            }
        })?;

        // Handle events (use faster tick rate while animating)
        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, app, keymap);
                    handle_action(app, loader, action);
                }
                AppEvent::Resize(width, _) => {
                    app.set_viewport_width(width);
                }
                AppEvent::Tick => {
                    app.tick_spinner();
                }
            }
        }

        needs_fast_update = app.needs_fast_update();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn start_load(app: &mut App, loader: &mut Loader) {
    loader.abort_all();
    let generation = app.begin_load();

    match app.config.search_request() {
        Ok(request) => {
            tracing::info!(
                "Load attempt {}: '{}' ({} per page)",
                generation,
                request.query(),
                request.page_size()
            );
            loader.spawn_search(generation, request);
        }
        Err(e) => {
            app.load_state = LoadState::Failed(e.to_string());
        }
    }
}

fn spawn_image_loads(app: &mut App, loader: &mut Loader, records: &[ImageRecord]) {
    let sigma = app.poster_blur_sigma();
    for record in records {
        if app.images.start_loading(&record.id) {
            loader.spawn_image(app.generation, record, PHOTO_FETCH_WIDTH, sigma);
        }
    }
}

fn handle_action(app: &mut App, loader: &mut Loader, action: Action) {
    // Clear pending key on any action except PendingG
    if action != Action::PendingG {
        app.clear_pending_key();
    }
    if matches!(action, Action::Next | Action::Prev | Action::First | Action::Last) {
        app.clear_status();
    }

    match action {
        Action::Quit => {
            app.should_quit = true;
        }
        Action::Next => app.next(),
        Action::Prev => app.prev(),
        Action::First => app.first(),
        Action::Last => app.last(),
        Action::PendingG => {
            app.pending_key = Some('g');
        }
        Action::Reload => {
            if app.is_loading() {
                app.set_status("Already loading");
            } else {
                start_load(app, loader);
            }
        }
        Action::OpenInBrowser => {
            let url = app.current_record().map(|record| record.full_url.clone());
            match url {
                Some(url) => {
                    if let Err(e) = open::that(&url) {
                        tracing::warn!("Failed to open {}: {}", url, e);
                        app.set_status(format!("Failed to open browser: {}", e));
                    } else {
                        app.set_status("Opened photo in browser");
                    }
                }
                None => app.set_status("No photo selected"),
            }
        }
        Action::Help => app.toggle_help(),
        Action::ExitMode => {
            app.mode = Mode::Normal;
        }
        Action::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_failed_setup_restores_terminal() {
        let restored = Cell::new(false);
        let setup = || -> Result<()> { Err(anyhow::anyhow!("no tty")) };
        let result = or_restore(setup, || restored.set(true));
        assert!(result.is_err());
        assert!(restored.get());
    }

    #[test]
    fn test_successful_setup_keeps_terminal() {
        let restored = Cell::new(false);
        let value = or_restore(|| Ok(7), || restored.set(true)).unwrap();
        assert_eq!(value, 7);
        assert!(!restored.get());
    }
}
