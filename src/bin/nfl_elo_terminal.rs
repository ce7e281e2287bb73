use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;

use nfl_elo_dashboard::config::DashboardConfig;
use nfl_elo_dashboard::dashboard::{Dashboard, PipelineRun};
use nfl_elo_dashboard::display::DisplayElement;
use nfl_elo_dashboard::tui::draw;

struct App {
    dashboard: Dashboard,
    elements: Vec<DisplayElement>,
    status: String,
    should_quit: bool,
}

impl App {
    fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            elements: Vec::new(),
            status: "Loading...".to_string(),
            should_quit: false,
        }
    }

    fn load(&mut self) {
        let run = self.dashboard.run();
        self.status = status_line(&run);
        self.elements = run.display();
    }

    fn refresh(&mut self) {
        self.dashboard.refresh();
        self.load();
    }
}

fn status_line(run: &PipelineRun) -> String {
    match (&run.fetched_at, run.from_cache) {
        (Some(at), true) => format!("{} games, cached {at}", run.projections.len()),
        (Some(at), false) => format!("{} games, fetched {at}", run.projections.len()),
        (None, _) => "no data".to_string(),
    }
}

fn main() -> io::Result<()> {
    // stdout belongs to the alternate screen; logging stays off unless RUST_LOG points it at
    // stderr explicitly.
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init();
    }

    let cfg = DashboardConfig::from_env();
    let mut app = App::new(Dashboard::from_config(&cfg));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    terminal.draw(|f| draw(f, &app.elements, &app.status))?;
    app.load();

    loop {
        terminal.draw(|f| draw(f, &app.elements, &app.status))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
                        KeyCode::Char('r') => {
                            app.status = "Refreshing...".to_string();
                            terminal.draw(|f| draw(f, &app.elements, &app.status))?;
                            app.refresh();
                        }
                        _ => {}
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
