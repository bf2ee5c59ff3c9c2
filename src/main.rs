pub mod config;
pub mod game;
pub mod pointer;
pub mod rounds;
pub mod runtime;
pub mod session;
pub mod surface;
pub mod ui;

use crate::config::{Config, ConfigStore, FileConfigStore};
use crate::game::Game;
use crate::pointer::{PointerAction, PointerEvent};
use crate::rounds::Round;
use crate::runtime::{spawn_input_thread, AppEvent, TickHandle};
use crate::session::SessionConfig;
use crate::surface::{DragSurface, SurfaceEvent};
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    sync::mpsc,
    time::Duration,
};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// timed sentence-builder quiz for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Drag the word tokens into the sentence blanks before the countdown runs out, then see how many landed in the right place."
)]
pub struct Cli {
    /// number of seconds on the countdown
    #[clap(short = 's', long)]
    number_of_secs: Option<u32>,

    /// number of segments in the countdown progress bar
    #[clap(short = 'g', long)]
    segments: Option<u32>,

    /// bundled round to play
    #[clap(short = 'r', long, value_enum)]
    round: Option<BuiltinRound>,

    /// pick a bundled round at random
    #[clap(long)]
    random_round: bool,

    /// load a round from a JSON file instead of the bundled set
    #[clap(long)]
    round_file: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum BuiltinRound {
    ProjectDiscussion,
    MorningRush,
    GardenPlans,
}

impl BuiltinRound {
    fn as_round(&self) -> Round {
        Round::builtin(&self.to_string())
    }
}

fn resolve_round(cli: &Cli, config: &Config) -> Result<Round, Box<dyn Error>> {
    if let Some(path) = &cli.round_file {
        return Round::from_file(path);
    }
    if let Some(builtin) = cli.round {
        return Ok(builtin.as_round());
    }
    if cli.random_round {
        return Ok(Round::random());
    }
    // Config round names are best effort; unknown ones fall back to default.
    Ok(Round::bundled(&config.round).unwrap_or_else(|_| Round::builtin(&Config::default().round)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Start,
    Playing,
    Results,
}

/// Navigation outcome of one input event, interpreted by the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppSignal {
    StartSession,
    Back,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub round: Round,
    pub game: Game,
    pub surface: DragSurface,
    pub state: AppState,
    pub area: Rect,
}

impl App {
    pub fn new(round: Round, session_config: SessionConfig) -> Self {
        let game = Game::new(round.words.clone(), round.answer_key.clone(), session_config);
        Self {
            round,
            game,
            surface: DragSurface::new(),
            state: AppState::Start,
            area: Rect::default(),
        }
    }

    pub fn start_session(&mut self) {
        self.game.reset();
        self.surface.reset();
        self.state = AppState::Playing;
    }

    pub fn leave_session(&mut self) {
        self.game.reset();
        self.surface.reset();
        self.state = AppState::Start;
    }

    /// Promote the app to the results screen once the game has finished.
    /// Returns true when the transition happened on this call.
    pub fn settle(&mut self) -> bool {
        if self.state == AppState::Playing && self.game.has_finished() {
            self.state = AppState::Results;
            self.surface.reset();
            return true;
        }
        false
    }

    /// Re-register drag regions from the current layout; called on every
    /// draw so hit-testing always matches what is on screen.
    pub fn sync_surface(&mut self, area: Rect) {
        self.area = area;
        if self.state != AppState::Playing {
            self.surface.reset();
            return;
        }

        let layout = ui::PlayingLayout::compute(&self.game, &self.round, area);
        self.surface.begin_frame();

        for (id, rect) in &layout.tokens {
            self.surface.register_draggable(id.clone(), *rect);
        }
        for (slot, rect) in layout.blanks() {
            if let Some(word) = self.game.blanks.get(slot).and_then(|b| b.as_ref()) {
                self.surface.register_draggable(word.id.clone(), rect);
            }
            self.surface.register_droppable(slot.to_string(), rect);
        }
    }

    pub fn on_tick(&mut self) {
        if self.state == AppState::Playing {
            self.game.tick();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Option<AppSignal> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(AppSignal::Quit);
        }
        match (self.state, key.code) {
            (AppState::Start, KeyCode::Esc) => Some(AppSignal::Quit),
            (AppState::Start, KeyCode::Enter) => Some(AppSignal::StartSession),
            (_, KeyCode::Esc) => Some(AppSignal::Back),
            _ => None,
        }
    }

    pub fn on_pointer(&mut self, ev: PointerEvent) -> Option<AppSignal> {
        match self.state {
            AppState::Start => {
                if ev.action == PointerAction::Down {
                    let layout = ui::StartLayout::compute(self.area);
                    if ui::hit(layout.start, ev.column, ev.row) {
                        return Some(AppSignal::StartSession);
                    }
                    if ui::hit(layout.back, ev.column, ev.row) {
                        return Some(AppSignal::Quit);
                    }
                }
                None
            }
            AppState::Playing => {
                if ev.action == PointerAction::Down && self.surface.active_id().is_none() {
                    let layout = ui::PlayingLayout::compute(&self.game, &self.round, self.area);
                    if ui::hit(layout.quit, ev.column, ev.row) {
                        return Some(AppSignal::Back);
                    }
                    if ui::hit(layout.submit, ev.column, ev.row) {
                        if self.game.can_submit() {
                            self.game.submit();
                        }
                        return None;
                    }
                }

                if let Some(SurfaceEvent::Dropped {
                    id,
                    over: Some(target),
                }) = self.surface.handle(ev)
                {
                    if let Ok(slot) = target.parse::<usize>() {
                        self.game.place_word(&id, slot);
                    }
                }
                None
            }
            AppState::Results => {
                if ev.action == PointerAction::Down {
                    let layout = ui::ResultsLayout::compute(self.area);
                    if ui::hit(layout.back, ev.column, ev.row) {
                        return Some(AppSignal::Back);
                    }
                }
                None
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config = FileConfigStore::new().load();
    let round = resolve_round(&cli, &config)?;
    let session_config = SessionConfig::new(
        cli.number_of_secs.unwrap_or(config.number_of_secs),
        cli.segments.unwrap_or(config.segments),
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(round, session_config);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let (tx, rx) = mpsc::channel();
    spawn_input_thread(tx.clone());
    let mut tick: Option<TickHandle> = None;

    loop {
        terminal.draw(|f| ui(app, f))?;

        let signal = match rx.recv()? {
            AppEvent::Tick => {
                app.on_tick();
                None
            }
            AppEvent::Resize => None,
            AppEvent::Pointer(p) => app.on_pointer(p),
            AppEvent::Key(key) => app.on_key(key),
        };

        if app.settle() {
            // The session is over; its timer goes with it.
            tick = None;
        }

        match signal {
            Some(AppSignal::StartSession) => {
                app.start_session();
                tick = Some(TickHandle::start(tx.clone(), TICK_PERIOD));
            }
            Some(AppSignal::Back) => {
                tick = None;
                app.leave_session();
            }
            Some(AppSignal::Quit) => break,
            None => {}
        }
    }

    drop(tick);
    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    app.sync_surface(f.area());
    f.render_widget(&*app, f.area());
}
