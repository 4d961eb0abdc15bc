//! TUI rendering module.
//!
//! Screen layout, top to bottom:
//! - Info bar: active genome and annotation count
//! - Main panel: the track canvas, or the sequence of the selected annotation
//! - Catalog: one column per track type
//! - Status bar: mode, goto prompt or notice, loading indicator, window
//!
//! The track canvas replays the renderer's recorded primitives onto a braille
//! [`Canvas`]. Renderer coordinates grow downwards, so y is flipped here.

pub mod glyphs;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine},
        Block, Borders, Paragraph,
    },
    Frame,
};

use crate::catalog::entry_label;
use crate::error::NoticeLevel;
use crate::model::{FeatureType, Rgba};
use crate::render::{DrawOp, PxRect};
use crate::session::{DisplayContext, Focus, InputMode, RenderedFrame, Session};

use glyphs::Glyphs;

/// Height of the info and status bars.
const BAR_HEIGHT: u16 = 1;
/// Height of the catalog panel (including borders).
const CATALOG_HEIGHT: u16 = 10;
/// Minimum height for the main panel.
const MIN_MAIN_HEIGHT: u16 = 8;
/// Braille dots per terminal cell, vertically.
const DOTS_PER_ROW: f64 = 4.0;

const CANVAS_BACKGROUND: Rgba = Rgba::rgb(0xff, 0xff, 0xff);

/// Converts a renderer colour to a terminal colour, blending alpha over the
/// canvas background.
pub fn to_color(color: Rgba) -> Color {
    let c = color.over(CANVAS_BACKGROUND);
    Color::Rgb(c.r, c.g, c.b)
}

/// Renders the complete UI.
pub fn render(frame: &mut Frame, session: &Session, glyphs: &Glyphs) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(BAR_HEIGHT),
            Constraint::Min(MIN_MAIN_HEIGHT),
            Constraint::Length(CATALOG_HEIGHT),
            Constraint::Length(BAR_HEIGHT),
        ])
        .split(area);

    render_info_bar(frame, session, main_layout[0]);
    match session.display() {
        DisplayContext::Tracks => render_tracks(frame, session, main_layout[1]),
        DisplayContext::Sequence => render_sequence(frame, session, main_layout[1], glyphs),
    }
    render_catalog(frame, session, main_layout[2], glyphs);
    render_status_bar(frame, session, main_layout[3], glyphs);
}

fn render_info_bar(frame: &mut Frame, session: &Session, area: Rect) {
    let text = match session.genome() {
        Some(info) if info.has_annotations => {
            let counts = session
                .catalog()
                .counts()
                .iter()
                .map(|(feature_type, n)| format!("{} {}", feature_type.label(), n))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                " Genome: {} | Length: {} bp | Annotations: {}",
                info.id, info.length, counts
            )
        }
        Some(info) => format!(
            " Genome: {} | Length: {} bp | Annotations: none",
            info.id, info.length
        ),
        None => " No genome loaded".to_string(),
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(paragraph, area);
}

fn panel_block(title: String, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
}

fn render_tracks(frame: &mut Frame, session: &Session, area: Rect) {
    let focused = session.focus() == Focus::Tracks;
    let block = panel_block(format!("Tracks [{}]", session.window_label()), focused);

    let Some(rendered) = session.render_frame() else {
        let placeholder = if session.genome().is_some() {
            "Loading features..."
        } else {
            "No genome loaded"
        };
        frame.render_widget(Paragraph::new(placeholder).block(block), area);
        return;
    };

    let inner_rows = area.height.saturating_sub(2).max(1) as f64;
    let dot_height = rendered.canvas.height / (inner_rows * DOTS_PER_ROW);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .background_color(to_color(CANVAS_BACKGROUND))
        .x_bounds([0.0, rendered.canvas.width])
        .y_bounds([0.0, rendered.canvas.height])
        .paint(|ctx| replay(ctx, &rendered, dot_height));
    frame.render_widget(canvas, area);
}

/// Draws recorded primitives onto a canvas context.
fn replay(ctx: &mut Context, rendered: &RenderedFrame, dot_height: f64) {
    let flip = |y: f64| rendered.canvas.height - y;

    for op in &rendered.ops {
        match op {
            // The canvas background already is the cleared state.
            DrawOp::Clear(_) => {}
            DrawOp::FillRect { rect, color } => {
                fill_rect(ctx, rect, to_color(*color), dot_height, flip);
            }
            DrawOp::FillText { text, x, y, style } => {
                ctx.print(
                    *x,
                    flip(*y),
                    Span::styled(text.clone(), Style::default().fg(to_color(style.color))),
                );
            }
            DrawOp::FillPath { points, color } => {
                let color = to_color(*color);
                for (i, &(x1, y1)) in points.iter().enumerate() {
                    let (x2, y2) = points[(i + 1) % points.len()];
                    ctx.draw(&CanvasLine::new(x1, flip(y1), x2, flip(y2), color));
                }
            }
        }
    }
}

/// Braille has no fill; a filled rectangle is one horizontal line per dot row.
fn fill_rect(
    ctx: &mut Context,
    rect: &PxRect,
    color: Color,
    dot_height: f64,
    flip: impl Fn(f64) -> f64,
) {
    let (x1, x2) = (rect.x, rect.x + rect.width);
    if rect.height <= dot_height {
        let y = flip(rect.y + rect.height / 2.0);
        ctx.draw(&CanvasLine::new(x1, y, x2, y, color));
        return;
    }
    let mut y = rect.y;
    while y <= rect.y + rect.height {
        ctx.draw(&CanvasLine::new(x1, flip(y), x2, flip(y), color));
        y += dot_height;
    }
}

fn render_sequence(frame: &mut Frame, session: &Session, area: Rect, glyphs: &Glyphs) {
    let focused = session.focus() == Focus::Tracks;
    let Some(selected) = session.selected() else {
        let block = panel_block("Sequence".to_string(), focused);
        frame.render_widget(Paragraph::new("No annotation selected").block(block), area);
        return;
    };

    let feature = &selected.feature;
    let title = format!(
        "Sequence {} {} {} {} bp | Esc: back to tracks",
        glyphs.h_separator,
        entry_label(feature),
        feature.strand.symbol(),
        feature.len(),
    );
    let block = panel_block(title, focused);

    let width = area.width.saturating_sub(2).max(1) as usize;
    let lines: Vec<Line> = match &selected.bases {
        Some(bases) if bases.is_empty() => vec![Line::from("(empty)")],
        Some(bases) => textwrap::wrap(bases, width)
            .into_iter()
            .map(|chunk| Line::from(chunk.into_owned()))
            .collect(),
        None => vec![Line::from(format!("Loading sequence {}", glyphs.loading))],
    };
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_catalog(frame: &mut Frame, session: &Session, area: Rect, glyphs: &Glyphs) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            FeatureType::TRACKS
                .iter()
                .map(|_| Constraint::Ratio(1, FeatureType::TRACKS.len() as u32)),
        )
        .split(area);

    let catalog = session.catalog();
    let counts = catalog.counts();
    let catalog_focused = session.focus() == Focus::Catalog;
    let visible_rows = area.height.saturating_sub(2) as usize;

    for (column_area, feature_type) in columns.iter().zip(FeatureType::TRACKS) {
        let is_current = catalog_focused && catalog.current_type() == feature_type;
        let title = if is_current {
            format!(
                "{} {} ({}) {}",
                glyphs.arrow_left,
                feature_type.label().to_uppercase(),
                counts.get(&feature_type).copied().unwrap_or(0),
                glyphs.arrow_right
            )
        } else {
            format!(
                "{} ({})",
                feature_type.label().to_uppercase(),
                counts.get(&feature_type).copied().unwrap_or(0)
            )
        };

        let entries = catalog
            .groups()
            .get(&feature_type)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let cursor = is_current.then(|| catalog.cursor_row());
        // Keep the cursor row on screen.
        let offset = cursor
            .map(|row| (row + 1).saturating_sub(visible_rows))
            .unwrap_or(0);

        let lines: Vec<Line> = entries
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible_rows)
            .map(|(idx, feature)| {
                if Some(idx) == cursor {
                    Line::from(Span::styled(
                        format!("{} {}", glyphs.cursor, entry_label(feature)),
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(format!("  {}", entry_label(feature)))
                }
            })
            .collect();

        frame.render_widget(
            Paragraph::new(lines).block(panel_block(title, is_current)),
            *column_area,
        );
    }
}

/// Renders the status bar at the bottom.
fn render_status_bar(frame: &mut Frame, session: &Session, area: Rect, glyphs: &Glyphs) {
    let (mode_str, prompt) = match session.mode() {
        InputMode::Normal => ("NORMAL", None),
        InputMode::Goto(query) => ("GOTO", Some(format!(":{}", query))),
    };

    let (message, message_color) = match (prompt, session.notice()) {
        (Some(prompt), _) => (prompt, Color::Black),
        (None, Some(notice)) => {
            let color = match notice.level {
                NoticeLevel::Info => Color::Black,
                NoticeLevel::Warning => Color::Yellow,
                NoticeLevel::Error => Color::Red,
            };
            (notice.text.clone(), color)
        }
        (None, None) => (String::new(), Color::Black),
    };

    let loading = if session.is_loading() {
        format!("{} ", glyphs.loading)
    } else {
        String::new()
    };
    let position_info = format!("{}{} ", loading, session.window_label());

    let left_content = format!(" {} | ", mode_str);
    let used = left_content.chars().count()
        + message.chars().count()
        + position_info.chars().count();
    let status_line = Line::from(vec![
        Span::styled(left_content, Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::styled(
            message,
            Style::default()
                .fg(message_color)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " ".repeat((area.width as usize).saturating_sub(used)),
            Style::default().bg(Color::Cyan),
        ),
        Span::styled(
            position_info,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    frame.render_widget(Paragraph::new(status_line), area);
}

/// Canvas width in renderer pixels for a terminal of `terminal_width` columns.
pub fn calculate_canvas_width(terminal_width: u16, px_per_cell: f64) -> f64 {
    // Account for the panel borders
    let columns = terminal_width.saturating_sub(2).max(1);
    (columns as f64 * px_per_cell).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::{Feature, Strand};
    use crate::provider::{GenomeInfo, Request, Response};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_canvas_width() {
        // 100 - 2 (borders) = 98 columns at 8 px each
        assert_eq!(calculate_canvas_width(100, 8.0), 784.0);
        assert_eq!(calculate_canvas_width(0, 8.0), 8.0);
    }

    #[test]
    fn test_colors_blend_over_white() {
        assert_eq!(to_color(Rgba::rgb(10, 20, 30)), Color::Rgb(10, 20, 30));
        assert_eq!(to_color(Rgba::rgba(0, 0, 0, 0)), Color::Rgb(255, 255, 255));
    }

    fn draw(session: &Session) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|frame| render(frame, session, &glyphs::select(false)))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_render_without_genome() {
        let session = Session::new(Config::default());
        let screen = draw(&session);
        assert!(screen.contains("No genome loaded"));
        assert!(screen.contains("NORMAL"));
    }

    #[test]
    fn test_render_tracks_and_catalog() {
        let mut session = Session::new(Config::default());
        session.set_canvas_width(calculate_canvas_width(100, 8.0));
        session.activate_genome(GenomeInfo {
            id: "chrT".into(),
            length: 10_000,
            has_annotations: true,
        });
        let gene = Feature::new(FeatureType::Gene, "thrL", 100, 900, Strand::Forward);
        for request in session.drain_requests() {
            let response = match request {
                Request::FeatureList { token } => Response::FeatureList {
                    token,
                    result: Ok(vec![gene.clone()]),
                },
                Request::Features { token, .. } => Response::Features {
                    token,
                    result: Ok(vec![gene.clone().into()]),
                },
                other => panic!("unexpected request {:?}", other),
            };
            session.handle_response(response);
        }

        let screen = draw(&session);
        assert!(screen.contains("Genome: chrT"));
        assert!(screen.contains("gene 1, mRNA 0"));
        assert!(screen.contains("GENE (1)"));
        assert!(screen.contains("thrL (100-900)"));
        assert!(screen.contains("Window: 0-10000"));
    }
}
