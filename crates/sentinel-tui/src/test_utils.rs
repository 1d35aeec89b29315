//! Rendering harness for widget and screen tests
//!
//! Draws into ratatui's `TestBackend` and reads the result back row by row,
//! so tests can assert on the alert panel without a real terminal.

use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use ratatui::{Frame, Terminal};

/// A typical desktop terminal
const DEFAULT_SIZE: (u16, u16) = (80, 24);

/// Small enough to hide the header hint and force the alert text to wrap
const COMPACT_SIZE: (u16, u16) = (40, 12);

pub struct TestTerminal {
    terminal: Terminal<TestBackend>,
}

impl TestTerminal {
    /// 80x24
    pub fn new() -> Self {
        Self::with_size(DEFAULT_SIZE.0, DEFAULT_SIZE.1)
    }

    /// 40x12
    pub fn compact() -> Self {
        Self::with_size(COMPACT_SIZE.0, COMPACT_SIZE.1)
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        let terminal = Terminal::new(TestBackend::new(width, height))
            .expect("TestBackend never fails to initialize");
        Self { terminal }
    }

    pub fn area(&self) -> Rect {
        *self.buffer().area()
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        self.draw_with(|frame| frame.render_widget(widget, area));
    }

    /// Draw a full frame, e.g. with `render::view`.
    pub fn draw_with<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f).expect("drawing to TestBackend failed");
    }

    /// Whether any single row contains `text`.
    pub fn buffer_contains(&self, text: &str) -> bool {
        self.rows().any(|row| row.contains(text))
    }

    pub fn line_contains(&self, y: u16, text: &str) -> bool {
        self.line(y).contains(text)
    }

    /// Row `y` as drawn, trailing blanks included. Empty when out of range.
    pub fn line(&self, y: u16) -> String {
        let buffer = self.buffer();
        if y >= buffer.area.height {
            return String::new();
        }
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect()
    }

    fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.buffer().area.height).map(|y| self.line(y))
    }

    fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }
}

impl Default for TestTerminal {
    fn default() -> Self {
        Self::new()
    }
}
