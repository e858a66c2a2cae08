mod app;
mod config;
mod meal;
mod meal_form;
mod navigation;
mod photo_picker;
mod views;
mod widgets;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use app::{App, Task};
use meal_form::{FormEvent, FormField};
use navigation::Presentation;

enum BackgroundMessage {
    PhotosListed {
        dir: PathBuf,
        result: std::result::Result<Vec<PathBuf>, String>,
    },
    PhotoDecoded {
        path: PathBuf,
        result: std::result::Result<meal::Photo, String>,
    },
}

#[derive(Debug, Default)]
struct CliArgs {
    photos_dir: Option<PathBuf>,
    no_samples: bool,
}

fn run_task(tx: &UnboundedSender<BackgroundMessage>, task: Task) {
    let tx = tx.clone();
    match task {
        Task::ScanPhotos { dir, show_hidden } => {
            tokio::spawn(async move {
                let result = photo_picker::scan_dir_async(dir.clone(), show_hidden)
                    .await
                    .map_err(|e| format!("{:#}", e));
                let _ = tx.send(BackgroundMessage::PhotosListed { dir, result });
            });
        }
        Task::DecodePhoto(path) => {
            tokio::spawn(async move {
                let result = photo_picker::load_photo_async(path.clone())
                    .await
                    .map_err(|e| format!("{:#}", e));
                let _ = tx.send(BackgroundMessage::PhotoDecoded { path, result });
            });
        }
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}

fn init_logging() -> Result<()> {
    let file = open_log_file(&config::log_path()?)?;
    let filter = EnvFilter::try_from_env("MEALBOOK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args();
    // Stderr is still the plain terminal here.
    if let Err(e) = init_logging() {
        eprintln!("mealbook: logging disabled: {:#}", e);
    }

    let mut config = config::load_config()?.unwrap_or_default();
    if let Some(dir) = args.photos_dir {
        config.photos.dir = Some(dir);
    }
    if args.no_samples {
        config.sample_meals = false;
    }

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config);
    info!(meals = app.meals.len(), photos = %app.photos_dir.display(), "mealbook started");
    let (bg_tx, mut bg_rx) = tokio::sync::mpsc::unbounded_channel();

    // Main loop
    let result = loop {
        while let Ok(message) = bg_rx.try_recv() {
            match message {
                BackgroundMessage::PhotosListed { dir, result } => {
                    app.photos_listed(&dir, result);
                }
                BackgroundMessage::PhotoDecoded { path, result } => {
                    app.photo_decoded(&path, result);
                }
            }
        }

        if let Err(e) = terminal.draw(|f| ui(f, &app)) {
            break Err(e.into());
        }

        match poll_key() {
            Ok(Some(key)) => {
                // Clear flash on any keypress
                app.flash = None;

                let task = if app.show_keybindings {
                    handle_keybindings_keys(&mut app, key.code);
                    None
                } else if app.picker.is_some() {
                    handle_picker_keys(&mut app, key.code)
                } else if app.is_form_open() {
                    handle_form_keys(&mut app, key)
                } else {
                    handle_list_keys(&mut app, key.code);
                    None
                };
                if let Some(task) = task {
                    debug!(?task, "starting background task");
                    run_task(&bg_tx, task);
                }
            }
            Ok(None) => {}
            Err(e) => break Err(e),
        }

        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("mealbook exited");

    result
}

fn poll_key() -> Result<Option<KeyEvent>> {
    if !event::poll(Duration::from_millis(120))? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}

fn parse_args() -> CliArgs {
    let mut args = CliArgs::default();
    let mut show_help = false;
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--photos" => args.photos_dir = iter.next().map(PathBuf::from),
            "--no-samples" => args.no_samples = true,
            "--help" | "-h" => show_help = true,
            _ => {}
        }
    }

    if show_help {
        println!("mealbook");
        println!("  --photos <dir>     Directory the photo picker browses");
        println!("  --no-samples       Start without the sample meals");
        println!("  -h, --help         Show this help");
        std::process::exit(0);
    }

    args
}

fn ui(f: &mut ratatui::Frame, app: &App) {
    use ratatui::layout::{Constraint, Direction, Layout};
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Paragraph};

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    let header = Paragraph::new(Line::from(Span::styled(
        " mealbook ",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    // Content area: a pushed form replaces the list, a modal form floats over it.
    match app.form.as_ref() {
        Some(form) if form.host() == Some(Presentation::Pushed) => {
            widgets::meal_edit::render(f, chunks[1], form);
        }
        Some(form) => {
            views::meal_list::render(f, chunks[1], app);
            widgets::meal_edit::render(f, chunks[1], form);
        }
        None => views::meal_list::render(f, chunks[1], app),
    }

    // Status bar
    let status_text = if let Some(ref flash) = app.flash {
        Span::styled(flash.as_str(), Style::default().fg(Color::Red))
    } else {
        let hints = if app.picker.is_some() {
            " j/k: navigate  Enter: use photo  Esc: cancel "
        } else if app.is_form_open() {
            " Tab: next field  Ctrl+S: save  Esc: cancel "
        } else {
            " j/k: navigate  a: add  Enter: edit  x: delete  ?: keys  q: quit "
        };
        Span::styled(hints, Style::default().fg(Color::DarkGray))
    };
    f.render_widget(Paragraph::new(Line::from(status_text)), chunks[2]);

    if let Some(ref picker) = app.picker {
        widgets::photo_picker::render(f, picker);
    }
    if app.show_keybindings {
        widgets::keybindings_help::render(f);
    }
}

fn handle_keybindings_keys(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => app.close_keybindings(),
        _ => {}
    }
}

fn handle_list_keys(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.move_selection_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection_up(),
        KeyCode::Char('?') => app.toggle_keybindings(),
        KeyCode::Char('a') => app.open_add_form(),
        KeyCode::Enter | KeyCode::Char('e') => app.open_edit_form(),
        KeyCode::Char('x') | KeyCode::Delete => app.delete_selected(),
        _ => {}
    }
}

fn handle_picker_keys(app: &mut App, key: KeyCode) -> Option<Task> {
    match key {
        KeyCode::Esc => app.dispatch_form(FormEvent::PhotoPickCancelled),
        KeyCode::Char('j') | KeyCode::Down => {
            if let Some(picker) = app.picker.as_mut() {
                picker.move_down();
            }
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if let Some(picker) = app.picker.as_mut() {
                picker.move_up();
            }
            None
        }
        KeyCode::Enter => app.pick_selected_photo(),
        _ => None,
    }
}

fn handle_form_keys(app: &mut App, key: KeyEvent) -> Option<Task> {
    let (focused, editing, name, rating) = match app.form.as_ref() {
        Some(form) => (
            form.focused(),
            form.is_editing_name(),
            form.name.clone(),
            form.rating,
        ),
        None => return None,
    };

    match key.code {
        KeyCode::Esc => return app.dispatch_form(FormEvent::CancelRequested),
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if editing {
                app.dispatch_form(FormEvent::NameEditingEnded);
            }
            return app.dispatch_form(FormEvent::SaveConfirmed);
        }
        KeyCode::Tab => {
            app.form_focus_next();
            return None;
        }
        KeyCode::BackTab => {
            app.form_focus_prev();
            return None;
        }
        _ => {}
    }

    match focused {
        FormField::Name => match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if !editing {
                    app.dispatch_form(FormEvent::NameEditingStarted);
                }
                let mut text = name;
                text.push(c);
                app.dispatch_form(FormEvent::NameChanged(text))
            }
            KeyCode::Backspace => {
                if !editing {
                    app.dispatch_form(FormEvent::NameEditingStarted);
                }
                let mut text = name;
                text.pop();
                app.dispatch_form(FormEvent::NameChanged(text))
            }
            KeyCode::Enter if editing => app.dispatch_form(FormEvent::NameEditingEnded),
            KeyCode::Enter => app.dispatch_form(FormEvent::NameEditingStarted),
            KeyCode::Down => {
                app.form_focus_next();
                None
            }
            _ => None,
        },
        FormField::Photo => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => app.dispatch_form(FormEvent::PhotoPickRequested),
            KeyCode::Down => {
                app.form_focus_next();
                None
            }
            KeyCode::Up => {
                app.form_focus_prev();
                None
            }
            _ => None,
        },
        FormField::Rating => match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                app.dispatch_form(FormEvent::RatingChanged(rating.decrement()))
            }
            KeyCode::Right | KeyCode::Char('l') => {
                app.dispatch_form(FormEvent::RatingChanged(rating.increment()))
            }
            KeyCode::Char(c @ '0'..='5') => {
                let star = c.to_digit(10).unwrap_or(0) as u8;
                app.dispatch_form(FormEvent::RatingChanged(rating.select_star(star)))
            }
            KeyCode::Up => {
                app.form_focus_prev();
                None
            }
            _ => None,
        },
    }
}
