// SPDX-License-Identifier: GPL-3.0-only

//! Terminal scanner
//!
//! Renders the camera feed with Unicode half-block characters, and shows
//! the lookup result below it with the status line at the bottom.
//!
//! Everything runs on one thread: each iteration drains the available
//! frames through the session, draws, then polls the keyboard.

use crate::Config;
use crate::app::presenter::{Presenter, ResultsRegion, StatusLine};
use crate::app::{DisplayItem, ScanState, Session};
use crate::backends::camera::{CameraFrame, FrameSource, PixelFormat, V4l2Camera};
use crate::constants::timing;
use crate::errors::AppResult;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use std::io::{self, stdout};
use tracing::{error, info};

/// Run the interactive scanner
pub fn run(config: &Config) -> AppResult<()> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &Config,
) -> AppResult<()> {
    // The dataset load blocks, so show the loading status first
    let loading = StatusLine::Loading.to_string();
    terminal.draw(|f| {
        let area = f.area();
        let [_, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        f.render_widget(StatusBar { message: &loading }, status_area);
    })?;

    let mut session = Session::from_config(config);

    let mut camera = V4l2Camera::open(
        &config.camera_device,
        config.frame_width,
        config.frame_height,
    )?;
    info!(device = camera.device_path(), "Camera started");

    let mut frame_widget = FrameWidget::new();
    // Transient message that replaces the status line until the next result
    let mut notice: Option<String> = None;
    // Set once the camera has stopped for good; outranks everything else
    let mut camera_error: Option<String> = None;

    loop {
        // Process every available frame; the preview holds the decoded
        // frame until reset
        while let Some(frame) = camera.try_next_frame() {
            let frozen = session.scan_state() == ScanState::Matched;
            if session.on_camera_frame(&frame).is_decoded() {
                notice = None;
            }
            if !frozen {
                frame_widget.update_frame(frame);
            }
        }

        if camera_error.is_none() {
            camera_error = source_error(&camera);
        }

        let status_message = match (&camera_error, &notice) {
            (Some(message), _) | (None, Some(message)) => message.clone(),
            (None, None) => build_status_message(session.presenter()),
        };

        // Draw
        terminal.draw(|f| {
            let area = f.area();
            let results = ResultsPanel {
                presenter: session.presenter(),
            };
            let results_height = results.height().min(area.height / 2);

            let [camera_area, results_area, status_area] = Layout::vertical([
                Constraint::Min(0),
                Constraint::Length(results_height),
                Constraint::Length(1),
            ])
            .areas(area);

            f.render_widget(&frame_widget, camera_area);
            f.render_widget(results, results_area);
            f.render_widget(
                StatusBar {
                    message: &status_message,
                },
                status_area,
            );
        })?;

        // Handle input with timeout for frame updates
        if event::poll(timing::INPUT_POLL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            // Ctrl+C to quit
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }

            match key.code {
                KeyCode::Char('q') => break,
                // 'r' or Enter invokes the reset action
                KeyCode::Char('r') | KeyCode::Enter => {
                    if session.reset() {
                        notice = None;
                    }
                }
                // '1'..'9' opens the matching link
                KeyCode::Char(c @ '1'..='9') => {
                    let index = (c as usize) - ('1' as usize);
                    if let Some(url) = session.presenter().results().links().get(index) {
                        notice = Some(open_link(url));
                    }
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Status text for a frame source that has stopped producing frames
fn source_error(source: &impl FrameSource) -> Option<String> {
    let reason = source.stopped_reason()?;
    error!(reason = %reason, "Camera stopped");
    Some(format!("Error: camera stopped: {} | 'q' quit", reason))
}

/// Open `url` in the system browser, returning the status text to show
fn open_link(url: &str) -> String {
    match open::that_detached(url) {
        Ok(()) => {
            info!(url, "Opened link");
            format!("Opened {}", url)
        }
        Err(e) => {
            error!(url, error = %e, "Failed to open link");
            format!("Error: could not open {}: {}", url, e)
        }
    }
}

fn build_status_message(presenter: &Presenter) -> String {
    let mut msg = presenter.status().to_string();
    if let Some(action) = presenter.reset_action() {
        msg.push_str(&format!(" | 'r' {}", action.label()));
    }
    if !presenter.results().links().is_empty() {
        msg.push_str(" | '1-9' open link");
    }
    msg.push_str(" | 'q' quit");
    msg
}

/// Lookup result below the camera view
struct ResultsPanel<'a> {
    presenter: &'a Presenter,
}

impl ResultsPanel<'_> {
    /// Rows needed to show every line plus the border
    fn height(&self) -> u16 {
        let lines = self.presenter.results().lines().len() as u16;
        lines.saturating_add(2)
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let results = self.presenter.results();
        match results {
            ResultsRegion::Items(items) => numbered_items(items),
            ResultsRegion::NotFound(_) => styled_lines(results, Color::Yellow),
            ResultsRegion::NoDataset | ResultsRegion::ConfigurationError(_) => {
                styled_lines(results, Color::Red)
            }
            ResultsRegion::Idle => styled_lines(results, Color::Gray),
        }
    }
}

/// Items as lines, with links numbered for the '1-9' keys
fn numbered_items(items: &[DisplayItem]) -> Vec<Line<'static>> {
    let mut link_number = 0;
    items
        .iter()
        .map(|item| {
            if item.url().is_some() {
                link_number += 1;
                Line::styled(
                    format!("[{}] {}", link_number, item),
                    Style::default().fg(Color::Cyan),
                )
            } else {
                Line::raw(item.to_string())
            }
        })
        .collect()
}

fn styled_lines(results: &ResultsRegion, color: Color) -> Vec<Line<'static>> {
    results
        .lines()
        .into_iter()
        .map(|line| Line::styled(line, Style::default().fg(color)))
        .collect()
}

impl Widget for ResultsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::TOP | Borders::BOTTOM);
        Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

/// Widget that renders a camera frame using half-block characters
struct FrameWidget {
    frame: Option<CameraFrame>,
}

impl FrameWidget {
    fn new() -> Self {
        Self { frame: None }
    }

    fn update_frame(&mut self, frame: CameraFrame) {
        self.frame = Some(frame);
    }
}

impl Widget for &FrameWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = self.frame.as_ref().filter(|f| f.width > 0 && f.height > 0) else {
            // No frame yet - show placeholder
            let msg = "Waiting for camera...";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, msg, Style::default());
            }
            return;
        };

        // Each terminal cell displays 2 vertical pixels
        let frame_aspect = frame.width as f64 / frame.height as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64;

        let (display_width, display_height) = if term_width / term_height > frame_aspect {
            // Terminal is wider - fit to height
            let h = term_height;
            let w = h * frame_aspect;
            (w as u16, (h / 2.0) as u16)
        } else {
            // Terminal is taller - fit to width
            let w = term_width;
            let h = w / frame_aspect;
            (w as u16, (h / 2.0) as u16)
        };

        if display_width == 0 || display_height == 0 {
            return;
        }

        // Center the image
        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = frame.width as f64 / display_width as f64;
        let y_scale = frame.height as f64 / (display_height * 2) as f64;

        // Upper half (▀) colored with fg, lower half with bg
        for ty in 0..display_height {
            for tx in 0..display_width {
                let term_x = x_offset + tx;
                let term_y = y_offset + ty;

                if term_x >= area.x + area.width || term_y >= area.y + area.height {
                    continue;
                }

                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                let top_color = sample_pixel(frame, src_x, src_y_top);
                let bottom_color = sample_pixel(frame, src_x, src_y_bottom);

                if let Some(cell) = buf.cell_mut((term_x, term_y)) {
                    cell.set_char('▀');
                    cell.set_fg(top_color);
                    cell.set_bg(bottom_color);
                }
            }
        }
    }
}

fn sample_pixel(frame: &CameraFrame, x: u32, y: u32) -> Color {
    let (r, g, b) = sample_pixel_rgb(frame, x, y);
    Color::Rgb(r, g, b)
}

fn sample_pixel_rgb(frame: &CameraFrame, x: u32, y: u32) -> (u8, u8, u8) {
    let x = x.min(frame.width - 1);
    let y = y.min(frame.height - 1);
    let data = &frame.data;

    match frame.format {
        PixelFormat::RGBA => {
            let idx = (y * frame.stride + x * 4) as usize;
            if idx + 2 < data.len() {
                (data[idx], data[idx + 1], data[idx + 2])
            } else {
                (0, 0, 0)
            }
        }
        PixelFormat::Gray8 => {
            let idx = (y * frame.stride + x) as usize;
            match data.get(idx) {
                Some(&v) => (v, v, v),
                None => (0, 0, 0),
            }
        }
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        // Truncate on a char boundary
        let text: String = self.message.chars().take(area.width as usize).collect();

        buf.set_string(
            area.x,
            area.y,
            text,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}
