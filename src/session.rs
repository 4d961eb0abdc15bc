//! Browser session state.
//!
//! A [`Session`] owns everything one browsing session needs: the viewport,
//! the annotation catalog, the last features received for drawing, the
//! selected sequence, and the status notice. User commands are plain methods;
//! each one that moves the window ends by queueing a features request.
//!
//! Provider traffic is asynchronous. Outgoing [`Request`]s collect in an
//! outbox drained by the caller, and answers come back through
//! [`Session::handle_response`]. Every request carries a fresh token and only
//! the newest token of each kind is accepted, so a slow answer for an old
//! window can never overwrite a newer one.

use crate::catalog::CatalogView;
use crate::config::Config;
use crate::error::{BrowserError, InputError, Notice};
use crate::model::{CanvasSize, Feature, GenomeWindow};
use crate::projection::FeatureRecord;
use crate::provider::{GenomeInfo, ProviderError, ProviderResult, Request, RequestToken, Response};
use crate::render::{DrawOp, Palette, RecordingSurface, RenderStats, TrackRenderer};
use crate::viewport::ViewportController;

/// Which view occupies the main panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayContext {
    #[default]
    Tracks,
    Sequence,
}

/// Which panel receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Tracks,
    Catalog,
}

/// Input state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Navigation keys
    #[default]
    Normal,
    /// Typing a goto query (position or feature name)
    Goto(String),
}

/// Features ready to draw, with the window they were fetched for.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    pub window: GenomeWindow,
    pub records: Vec<FeatureRecord>,
}

/// A drawn frame, ready to be replayed onto a terminal canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub canvas: CanvasSize,
    pub ops: Vec<DrawOp>,
    pub stats: RenderStats,
}

/// Bases of the feature picked in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedSequence {
    pub feature: Feature,
    /// `None` while the provider has not answered yet.
    pub bases: Option<String>,
}

/// Hooks for the surrounding shell.
pub trait SessionObserver {
    fn on_window_changed(&mut self, _window: &GenomeWindow) {}
    fn on_feature_selected(&mut self, _feature: &Feature) {}
}

#[derive(Debug, Clone, Default)]
struct PendingTokens {
    features: Option<(RequestToken, GenomeWindow)>,
    by_name: Option<RequestToken>,
    list: Option<RequestToken>,
    sequence: Option<RequestToken>,
}

pub struct Session {
    config: Config,
    viewport: ViewportController,
    renderer: TrackRenderer,
    genome: Option<GenomeInfo>,
    catalog: CatalogView,
    all_features: Vec<Feature>,
    frame: Option<FeatureFrame>,
    canvas_width: f64,
    selected: Option<SelectedSequence>,
    display: DisplayContext,
    focus: Focus,
    mode: InputMode,
    notice: Option<Notice>,
    next_token: u64,
    pending: PendingTokens,
    outbox: Vec<Request>,
    observers: Vec<Box<dyn SessionObserver>>,
    should_quit: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("genome", &self.genome)
            .field("window", &self.viewport.window())
            .field("display", &self.display)
            .field("mode", &self.mode)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a session with no genome.
    pub fn new(config: Config) -> Self {
        let viewport = ViewportController::with_config(0, config.viewport.clone());
        let renderer = TrackRenderer::new(
            config.layout.clone(),
            config.render.clone(),
            Palette::from_config(&config.palette),
        );
        Self {
            config,
            viewport,
            renderer,
            genome: None,
            catalog: CatalogView::default(),
            all_features: Vec::new(),
            frame: None,
            canvas_width: 0.0,
            selected: None,
            display: DisplayContext::Tracks,
            focus: Focus::Tracks,
            mode: InputMode::Normal,
            notice: None,
            next_token: 0,
            pending: PendingTokens::default(),
            outbox: Vec::new(),
            observers: Vec::new(),
            should_quit: false,
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    // ----- accessors -----

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn window(&self) -> GenomeWindow {
        self.viewport.window()
    }

    pub fn window_label(&self) -> String {
        self.viewport.label()
    }

    pub fn genome(&self) -> Option<&GenomeInfo> {
        self.genome.as_ref()
    }

    pub fn catalog(&self) -> &CatalogView {
        &self.catalog
    }

    pub fn all_features(&self) -> &[Feature] {
        &self.all_features
    }

    /// The features to draw and the window they belong to.
    pub fn frame(&self) -> Option<&FeatureFrame> {
        self.frame.as_ref()
    }

    pub fn selected(&self) -> Option<&SelectedSequence> {
        self.selected.as_ref()
    }

    pub fn display(&self) -> DisplayContext {
        self.display
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    /// Whether a features request is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending.features.is_some()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draws the last received features for the window they were fetched
    /// for. `None` until the first frame arrives.
    pub fn render_frame(&self) -> Option<RenderedFrame> {
        let frame = self.frame.as_ref()?;
        let canvas = self.renderer.layout_engine().layout().canvas(self.canvas_width.max(1.0));
        let mut surface = RecordingSurface::new();
        let stats = self.renderer.render(&mut surface, &frame.window, canvas, &frame.records);
        Some(RenderedFrame {
            canvas,
            ops: surface.into_ops(),
            stats,
        })
    }

    /// Takes every request queued since the last call.
    pub fn drain_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    // ----- genome lifecycle -----

    /// Makes `info` the active genome: resets the window to its full extent
    /// and requests the catalog and the first frame.
    pub fn activate_genome(&mut self, info: GenomeInfo) {
        log::info!("Active genome: {} ({} bp)", info.id, info.length);
        self.viewport = ViewportController::with_config(info.length, self.config.viewport.clone());
        self.notice = Some(Notice::info(format!("Loaded: {} ({} bp)", info.id, info.length)));
        self.genome = Some(info);
        self.frame = None;
        self.selected = None;
        self.all_features.clear();
        self.catalog = CatalogView::default();
        self.display = DisplayContext::Tracks;
        // Nothing asked of the previous genome may land on this one.
        self.pending = PendingTokens::default();
        self.outbox.clear();

        let token = self.issue_token();
        self.pending.list = Some(token);
        self.outbox.push(Request::FeatureList { token });
        self.window_changed();
    }

    /// Updates the canvas width; a new width needs a new frame.
    pub fn set_canvas_width(&mut self, width: f64) {
        if (self.canvas_width - width).abs() < f64::EPSILON {
            return;
        }
        log::debug!("Canvas width {} -> {}", self.canvas_width, width);
        self.canvas_width = width;
        if self.genome.is_some() {
            self.request_features();
        }
    }

    // ----- viewport commands -----

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
        self.window_changed();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
        self.window_changed();
    }

    pub fn pan_left(&mut self) {
        self.viewport.pan_left();
        self.window_changed();
    }

    pub fn pan_right(&mut self) {
        self.viewport.pan_right();
        self.window_changed();
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
        self.window_changed();
    }

    pub fn goto_position(&mut self, pos: u64) {
        self.viewport.goto_position(pos);
        self.window_changed();
    }

    pub fn goto_feature(&mut self, feature: &Feature) {
        self.viewport.goto_feature(feature);
        self.window_changed();
    }

    /// Runs a goto query: all digits is a position, anything else a feature
    /// name looked up through the provider. Blank queries do nothing.
    pub fn goto_query(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        if self.genome.is_none() {
            self.report(InputError::NoGenome);
            return;
        }
        if query.bytes().all(|b| b.is_ascii_digit()) {
            // Too many digits for u64 still means "past the end".
            let pos = query
                .parse::<u64>()
                .unwrap_or(u64::MAX)
                .min(self.viewport.genome_length());
            self.goto_position(pos);
            return;
        }
        let token = self.issue_token();
        self.pending.by_name = Some(token);
        self.outbox.push(Request::FeatureByName {
            token,
            name: query.to_string(),
        });
    }

    // ----- catalog commands -----

    /// Opens a catalog entry: fetches its bases, switches to the sequence
    /// view, and centers the viewport on it.
    pub fn select_feature(&mut self, feature: Feature) {
        log::debug!("Selected {} ({}-{})", feature.name, feature.start, feature.end);
        let token = self.issue_token();
        self.pending.sequence = Some(token);
        self.outbox.push(Request::Sequence {
            token,
            start: feature.start,
            end: feature.end,
        });

        self.display = DisplayContext::Sequence;
        self.goto_feature(&feature);
        for observer in &mut self.observers {
            observer.on_feature_selected(&feature);
        }
        self.selected = Some(SelectedSequence {
            feature,
            bases: None,
        });
    }

    /// Opens the entry under the catalog cursor, if any.
    pub fn select_catalog_entry(&mut self) {
        if let Some(feature) = self.catalog.selected().cloned() {
            self.select_feature(feature);
        }
    }

    pub fn catalog_up(&mut self) {
        self.catalog.move_up();
    }

    pub fn catalog_down(&mut self) {
        self.catalog.move_down();
    }

    pub fn catalog_next_column(&mut self) {
        self.catalog.next_column();
    }

    pub fn catalog_previous_column(&mut self) {
        self.catalog.previous_column();
    }

    // ----- display, focus and input -----

    pub fn show_tracks(&mut self) {
        self.display = DisplayContext::Tracks;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Tracks => Focus::Catalog,
            Focus::Catalog => Focus::Tracks,
        };
    }

    pub fn enter_goto_mode(&mut self) {
        self.mode = InputMode::Goto(String::new());
    }

    pub fn goto_input(&mut self, c: char) {
        if let InputMode::Goto(ref mut query) = self.mode {
            query.push(c);
        }
    }

    pub fn goto_backspace(&mut self) {
        if let InputMode::Goto(ref mut query) = self.mode {
            if query.pop().is_none() {
                self.mode = InputMode::Normal;
            }
        }
    }

    pub fn execute_goto(&mut self) {
        if let InputMode::Goto(query) = std::mem::take(&mut self.mode) {
            self.goto_query(&query);
        }
    }

    pub fn cancel_goto(&mut self) {
        self.mode = InputMode::Normal;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // ----- provider responses -----

    /// Applies a provider answer. Answers to superseded requests are dropped.
    pub fn handle_response(&mut self, response: Response) {
        match response {
            Response::Features { token, result } => {
                let Some((expected, window)) = self.pending.features else {
                    return self.discard("features", token);
                };
                if expected != token {
                    return self.discard("features", token);
                }
                self.pending.features = None;
                if let Some(records) = self.accept(result) {
                    log::trace!("Frame for {}: {} records", window.label(), records.len());
                    self.frame = Some(FeatureFrame { window, records });
                }
            }
            Response::FeatureByName { token, name, result } => {
                if self.pending.by_name != Some(token) {
                    return self.discard("lookup", token);
                }
                self.pending.by_name = None;
                match self.accept(result) {
                    Some(Some(feature)) => self.goto_feature(&feature),
                    Some(None) => self.report(InputError::FeatureNotFound(name)),
                    None => {}
                }
            }
            Response::FeatureList { token, result } => {
                if self.pending.list != Some(token) {
                    return self.discard("feature list", token);
                }
                self.pending.list = None;
                if let Some(features) = self.accept(result) {
                    self.catalog.set_features(&features);
                    self.all_features = features;
                }
            }
            Response::Sequence { token, result } => {
                if self.pending.sequence != Some(token) {
                    return self.discard("sequence", token);
                }
                self.pending.sequence = None;
                if let Some(bases) = self.accept(result) {
                    if let Some(selected) = self.selected.as_mut() {
                        selected.bases = Some(bases);
                    }
                }
            }
        }
    }

    /// Answers requests that never reached the provider with `err`, so their
    /// tokens are released and the failure shows up as a notice.
    pub fn fail_requests(
        &mut self,
        requests: impl IntoIterator<Item = Request>,
        err: ProviderError,
    ) {
        for request in requests {
            self.handle_response(Response::failed(request, err.clone()));
        }
    }

    /// Records a provider failure as a notice instead of propagating it.
    fn accept<T>(&mut self, result: ProviderResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("Provider error: {}", err);
                self.report(err);
                None
            }
        }
    }

    fn discard(&self, kind: &str, token: RequestToken) {
        log::debug!("Discarding stale {} response {:?}", kind, token);
    }

    fn report(&mut self, err: impl Into<BrowserError>) {
        let err = err.into();
        self.notice = Some(Notice::from(&err));
    }

    fn issue_token(&mut self) -> RequestToken {
        self.next_token += 1;
        RequestToken(self.next_token)
    }

    fn window_changed(&mut self) {
        let window = self.viewport.window();
        for observer in &mut self.observers {
            observer.on_window_changed(&window);
        }
        if self.genome.is_some() {
            self.request_features();
        }
    }

    fn request_features(&mut self) {
        let window = self.viewport.window();
        let token = self.issue_token();
        self.pending.features = Some((token, window));
        self.outbox.push(Request::Features {
            token,
            start: window.start(),
            end: window.end(),
            canvas_width_px: self.canvas_width.max(1.0).round() as u32,
        });
    }
}
