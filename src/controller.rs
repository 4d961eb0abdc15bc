//! Application controller.
//!
//! This module orchestrates the main application loop:
//! - Terminal initialization and cleanup
//! - Forwarding session requests to the provider worker
//! - Feeding provider responses back into the session
//! - Event polling, state updates and rendering

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::config::Config;
use crate::event::{apply_action, handle_event, poll_event, Action};
use crate::provider::{GenomeProvider, ProviderWorker, Request};
use crate::session::Session;
use crate::ui::glyphs::{self, Glyphs};
use crate::ui::{calculate_canvas_width, render};

/// The main application controller.
pub struct App {
    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Browser state
    session: Session,
    /// Runs provider queries off the UI thread
    worker: ProviderWorker,
    glyphs: Glyphs,
    /// Event poll timeout
    tick_rate: Duration,
}

impl App {
    /// Starts the provider worker, activates its genome and takes over the
    /// terminal.
    pub fn new(provider: Arc<dyn GenomeProvider>, config: Config) -> Result<Self> {
        let info = provider
            .genome_info()
            .context("Provider has no active genome")?;
        let worker = ProviderWorker::spawn(provider).context("Failed to start provider worker")?;

        let glyphs = glyphs::select(config.render.fancy_glyphs);
        let mut session = Session::new(config);
        session.activate_genome(info);

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            session,
            worker,
            glyphs,
            tick_rate: Duration::from_millis(50),
        })
    }

    /// Runs the main application loop.
    pub fn run(&mut self) -> Result<()> {
        self.update_canvas_width()?;

        loop {
            self.dispatch_requests();
            self.collect_responses();

            self.terminal.draw(|frame| {
                render(frame, &self.session, &self.glyphs);
            })?;

            if let Some(event) = poll_event(self.tick_rate) {
                let action = handle_event(event, self.session.mode(), self.session.focus());

                if let Action::Resize(_, _) = action {
                    self.update_canvas_width()?;
                }

                if !apply_action(&mut self.session, action) {
                    break;
                }
            }
        }

        Ok(())
    }

    fn dispatch_requests(&mut self) {
        let mut requests = self.session.drain_requests().into_iter();
        while let Some(request) = requests.next() {
            log::trace!("Submitting {:?}", request);
            if let Err(err) = self.worker.submit(request.clone()) {
                // The worker is gone; the rest would fail the same way.
                log::error!("Provider worker unavailable: {}", err);
                let unsent: Vec<Request> = std::iter::once(request).chain(requests).collect();
                self.session.fail_requests(unsent, err);
                break;
            }
        }
    }

    fn collect_responses(&mut self) {
        while let Some(response) = self.worker.try_recv() {
            self.session.handle_response(response);
        }
    }

    /// Recomputes the canvas width from the terminal size.
    fn update_canvas_width(&mut self) -> Result<()> {
        let size = self.terminal.size()?;
        let width = calculate_canvas_width(size.width, self.session.config().render.px_per_cell);
        self.session.set_canvas_width(width);
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Convenience function to browse a provider's genome.
pub fn run_app(provider: Arc<dyn GenomeProvider>, config: Config) -> Result<()> {
    let mut app = App::new(provider, config)?;
    app.run()
}
