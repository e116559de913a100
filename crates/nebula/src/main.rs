mod logging;

use std::io::stdout;
use std::time::Instant;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
};
use nebula_background::{SceneState, time_seed};
use nebula_config::{Config, ConfigError};
use nebula_core::AnimationSpeed;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Stylize},
    text::Line,
};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    if let Some(path) = logging::init(&config)? {
        tracing::info!(path = %path.display(), "logging to file");
    }

    let mut app = App::new(config);
    if let Some(err) = &config_error {
        app.report_config_error(err);
    }

    let terminal = ratatui::init();
    let result = execute!(stdout(), EnableMouseCapture)
        .map_err(Into::into)
        .and_then(|()| app.run(terminal));
    let _ = execute!(stdout(), DisableMouseCapture);
    ratatui::restore();
    if let Some(err) = config_error {
        eprintln!("nebula: ignored unreadable config, used defaults: {err}");
    }
    result
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Settings loaded at startup, updated by key presses.
    config: Config,
    /// Animated layers.
    scene: SceneState,
    /// Current animation speed.
    speed: AnimationSpeed,
    /// Time the application started, for frame timing.
    started: Instant,
    /// Transient status shown in the footer.
    status: Option<String>,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        let seed = config.seed.unwrap_or_else(time_seed);
        let mut scene =
            SceneState::with_seed(seed).with_cell_size(config.cell_width, config.cell_height);
        scene.set_graph_enabled(config.show_graph);
        scene.set_particles_enabled(config.show_particles);
        tracing::info!(seed, speed = config.speed.name(), fps = config.fps, "starting");

        Self {
            running: false,
            speed: config.speed,
            config,
            scene,
            started: Instant::now(),
            status: None,
        }
    }

    /// Show a config load failure in the footer until the next key press.
    fn report_config_error(&mut self, err: &ConfigError) {
        tracing::warn!(error = %err, "ignoring unreadable config");
        self.status = Some("config unreadable, using defaults".to_string());
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        tracing::info!("stopped");
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let [hero, footer] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        self.scene.render(frame, hero, elapsed_ms, self.speed);

        frame.render_widget(self.help_line(), footer);
    }

    /// Footer with key bindings and current state.
    fn help_line(&self) -> Line<'static> {
        let accent = Color::Cyan;
        let mut spans = vec![
            "q".bold().fg(accent),
            " quit  ".dark_gray(),
            "s".bold().fg(accent),
            format!(" speed: {}  ", self.speed.name()).dark_gray(),
            "space".bold().fg(accent),
            if self.scene.is_paused() {
                " resume  ".dark_gray()
            } else {
                " pause  ".dark_gray()
            },
            "g".bold().fg(accent),
            " graph  ".dark_gray(),
            "p".bold().fg(accent),
            " particles  ".dark_gray(),
            "r".bold().fg(accent),
            " reseed  ".dark_gray(),
            "w".bold().fg(accent),
            " save".dark_gray(),
        ];
        if let Some(status) = &self.status {
            spans.push(format!("  {status}").fg(accent));
        }
        Line::from(spans).centered()
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits at most one frame interval so the animation keeps running.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(self.config.frame_interval())? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::FocusLost => self.scene.pointer_left(),
                // Size changes are picked up on the next draw.
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        self.status = None;
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('s')) => self.cycle_speed(),
            (_, KeyCode::Char(' ')) => self.toggle_pause(),
            (_, KeyCode::Char('g')) => self.toggle_graph(),
            (_, KeyCode::Char('p')) => self.toggle_particles(),
            (_, KeyCode::Char('r')) => self.scene.reseed(time_seed()),
            (_, KeyCode::Char('w')) => self.save_config(),
            _ => {}
        }
    }

    /// Forwards pointer movement to the scene.
    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.scene.pointer_moved(mouse.column, mouse.row)
            }
            _ => {}
        }
    }

    /// Cycle through animation speeds.
    fn cycle_speed(&mut self) {
        self.speed = self.speed.next();
        tracing::debug!(speed = self.speed.name(), "speed changed");
    }

    fn toggle_pause(&mut self) {
        self.scene.set_paused(!self.scene.is_paused());
    }

    fn toggle_graph(&mut self) {
        self.scene.set_graph_enabled(!self.scene.graph_enabled());
    }

    fn toggle_particles(&mut self) {
        self.scene
            .set_particles_enabled(!self.scene.particles_enabled());
    }

    /// Persist the current speed and layer toggles.
    fn save_config(&mut self) {
        self.config.speed = self.speed;
        self.config.show_graph = self.scene.graph_enabled();
        self.config.show_particles = self.scene.particles_enabled();
        self.status = Some(match self.config.save() {
            Ok(()) => "settings saved".to_string(),
            Err(err) => {
                tracing::error!(error = %err, "failed to save config");
                "save failed".to_string()
            }
        });
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn app() -> App {
        App::new(Config {
            seed: Some(42),
            ..Default::default()
        })
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_app_creation_follows_config() {
        let app = App::new(Config {
            seed: Some(1),
            speed: AnimationSpeed::Fast,
            show_particles: false,
            ..Default::default()
        });
        assert_eq!(app.speed, AnimationSpeed::Fast);
        assert_eq!(app.scene.seed(), 1);
        assert!(app.scene.graph_enabled());
        assert!(!app.scene.particles_enabled());
    }

    #[test]
    fn test_key_bindings() {
        let mut app = app();
        app.running = true;

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.speed, AnimationSpeed::Fast);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.scene.is_paused());
        press(&mut app, KeyCode::Char('g'));
        assert!(!app.scene.graph_enabled());
        press(&mut app, KeyCode::Char('p'));
        assert!(!app.scene.particles_enabled());

        app.on_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[test]
    fn test_render_draws_scene_and_footer() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let footer: String = (0..80u16).map(|x| buffer[(x, 23)].symbol()).collect();
        assert!(footer.contains("quit"));
        assert!(footer.contains("speed: medium"));
        assert!(app.scene.graph().is_some());
    }

    #[test]
    fn test_config_error_shows_in_footer() {
        let mut app = app();
        app.report_config_error(&ConfigError::NoConfigDir);

        let mut terminal = Terminal::new(TestBackend::new(120, 24)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let footer: String = (0..120u16).map(|x| buffer[(x, 23)].symbol()).collect();
        assert!(footer.contains("config unreadable"));

        press(&mut app, KeyCode::Char('s'));
        assert!(app.status.is_none());
    }

    #[test]
    fn test_mouse_moves_reach_graph() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        app.on_mouse_event(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 10,
            row: 5,
            modifiers: KeyModifiers::NONE,
        });
        assert!(app.scene.graph().unwrap().pointer().is_some());

        // The footer row is outside the hero area.
        app.on_mouse_event(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 10,
            row: 23,
            modifiers: KeyModifiers::NONE,
        });
        assert!(app.scene.graph().unwrap().pointer().is_none());
    }
}
