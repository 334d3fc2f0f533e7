//! Scene application framework

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{debug, warn};

use crate::renderer::{RenderBackend, RenderError};

/// Default display rate
pub const DEFAULT_FPS: u32 = 60;

/// A scene driven by a fixed-rate frame loop
pub trait SceneApp {
    /// Application state type
    type State;

    /// Initialize application state
    fn init(&mut self) -> Self::State;

    /// Acquire backend resources for a freshly initialized state
    fn prepare(&mut self, _state: &mut Self::State, _backend: &mut dyn RenderBackend) {}

    /// Handle a key press. Return false to quit.
    fn handle_key(&mut self, key: KeyEvent, state: &mut Self::State) -> bool;

    /// Advance the scene by `dt` seconds
    fn update(&mut self, state: &mut Self::State, dt: f32);

    /// Draw the current state
    fn render(&self, state: &Self::State, backend: &mut dyn RenderBackend);
}

/// Raw mode plus alternate screen, undone on drop
struct TerminalSession;

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen) {
            warn!("Failed to leave alternate screen: {}", e);
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("Failed to disable raw mode: {}", e);
        }
    }
}

/// Runs a [`SceneApp`] against a backend at a fixed frame rate
pub struct SceneAppRunner<A: SceneApp, B: RenderBackend> {
    app: A,
    backend: B,
    frame_interval: Duration,
}

impl<A: SceneApp, B: RenderBackend> SceneAppRunner<A, B> {
    /// Create a new app runner at [`DEFAULT_FPS`]
    pub fn new(app: A, backend: B) -> Self {
        Self {
            app,
            backend,
            frame_interval: frame_interval(DEFAULT_FPS),
        }
    }

    /// Set the display rate
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.frame_interval = frame_interval(fps);
        self
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run interactively until the app or the user quits.
    ///
    /// `q` and Ctrl-C always quit. The terminal is restored on every exit
    /// path, including errors.
    pub fn run(&mut self) -> Result<A::State, RenderError> {
        let _session = TerminalSession::enter()?;

        let mut state = self.app.init();
        self.app.prepare(&mut state, &mut self.backend);
        let mut last_frame = Instant::now();

        loop {
            let timeout = self
                .frame_interval
                .checked_sub(last_frame.elapsed())
                .unwrap_or_default();

            if event::poll(timeout)? {
                if let CrosstermEvent::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && is_quit(&key) {
                        debug!("Quit requested");
                        break;
                    }
                    if !self.app.handle_key(key, &mut state) {
                        break;
                    }
                }
            }

            if last_frame.elapsed() >= self.frame_interval {
                let dt = last_frame.elapsed().as_secs_f32();
                last_frame = Instant::now();
                self.frame(&mut state, dt)?;
            }
        }

        Ok(state)
    }

    /// Run exactly `frames` frames without touching the terminal.
    ///
    /// Frames are paced in real time so background producers keep up, and
    /// each update receives the nominal frame interval as `dt`.
    pub fn run_frames(&mut self, frames: u64) -> Result<A::State, RenderError> {
        let mut state = self.app.init();
        self.app.prepare(&mut state, &mut self.backend);
        let dt = self.frame_interval.as_secs_f32();
        let mut next_due = Instant::now();

        for _ in 0..frames {
            let now = Instant::now();
            if next_due > now {
                thread::sleep(next_due - now);
            }
            next_due += self.frame_interval;
            self.frame(&mut state, dt)?;
        }

        Ok(state)
    }

    fn frame(&mut self, state: &mut A::State, dt: f32) -> Result<(), RenderError> {
        self.app.update(state, dt);
        self.backend.begin_frame()?;
        self.app.render(state, &mut self.backend);
        self.backend.end_frame()
    }
}

fn frame_interval(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / fps.max(1) as f64)
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
