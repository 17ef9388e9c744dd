//! FilterInput: tui-input wrapped as the search bar at the foot of a list.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_FILTER_BG, C_FILTER_FG, C_MUTED, C_SECONDARY};

#[derive(Debug, PartialEq)]
pub enum FilterAction {
    Changed(String),
    Confirmed,
    Cancelled,
}

pub struct FilterInput {
    input: Input,
    active: bool,
    placeholder: &'static str,
}

impl FilterInput {
    pub fn new(placeholder: &'static str) -> Self {
        Self {
            input: Input::default(),
            active: false,
            placeholder,
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn query(&self) -> &str {
        self.input.value()
    }

    pub fn reset(&mut self) {
        self.input = Input::default();
        self.active = false;
    }

    /// Esc clears the text first; a second Esc on an empty bar closes it.
    /// Enter keeps the query and hands keys back to the list.
    pub fn handle_key(&mut self, key: KeyEvent) -> FilterAction {
        match key.code {
            KeyCode::Esc if !self.input.value().is_empty() => {
                self.input = Input::default();
                FilterAction::Changed(String::new())
            }
            KeyCode::Esc => {
                self.active = false;
                FilterAction::Cancelled
            }
            KeyCode::Enter => {
                self.active = false;
                FilterAction::Confirmed
            }
            _ => {
                self.input.handle_event(&Event::Key(key));
                FilterAction::Changed(self.input.value().to_string())
            }
        }
    }

    /// One-row bar; `counts` is (matches, page size) shown on the right.
    pub fn draw(&self, frame: &mut Frame, area: Rect, counts: (usize, usize)) {
        let counter = format!(" {}/{} ", counts.0, counts.1);
        let width = area.width.saturating_sub(counter.len() as u16 + 2) as usize;
        let scroll = self.input.visual_scroll(width);
        let value = self.input.value();

        let text = if value.is_empty() {
            Span::styled(format!("/ {}", self.placeholder), Style::default().fg(C_MUTED))
        } else {
            let visible: String = value.chars().skip(scroll).collect();
            Span::styled(format!("/ {}", visible), Style::default().fg(C_FILTER_FG))
        };
        frame.render_widget(
            Paragraph::new(Line::from(text)).style(Style::default().bg(C_FILTER_BG)),
            area,
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(counter, Style::default().fg(C_SECONDARY))))
                .right_aligned(),
            area,
        );

        if self.active {
            let cursor_x = area.x + 2 + (self.input.visual_cursor().saturating_sub(scroll)) as u16;
            frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(1)), area.y));
        }
    }
}
