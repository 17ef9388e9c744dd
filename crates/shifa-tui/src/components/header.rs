//! Header component: 2-row top bar.
//!
//! Row 1: brand, workspace tabs, catalog endpoint.
//! Row 2: catalog page / loading state | active stock lookup.
//!
//! Not focusable; draws to a 2-row area.

use ratatui::crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    action::{Action, ComponentId, Workspace},
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_ERROR, C_MUTED, C_NUMBER_HINT, C_PRIMARY, C_SECONDARY, C_SEPARATOR},
};

const BRAND: &str = " ✚ Shifa Maroc ";

pub struct Header {
    pub workspace: Workspace,
}

impl Header {
    pub fn new() -> Self {
        Self {
            workspace: Workspace::Home,
        }
    }

    /// Horizontal spans of each tab label, in draw order.
    fn tab_columns(&self) -> Vec<(Workspace, u16, u16)> {
        let mut x = BRAND.width() as u16 + 1;
        Workspace::ALL
            .into_iter()
            .map(|ws| {
                let w = tab_label(ws).width() as u16;
                let col = (ws, x, x + w);
                x += w + 1;
                col
            })
            .collect()
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

fn tab_label(ws: Workspace) -> String {
    let n = Workspace::ALL.iter().position(|w| *w == ws).unwrap_or(0) + 1;
    format!(" {} {} ", n, ws.title())
}

impl Component for Header {
    fn id(&self) -> ComponentId {
        ComponentId::Home
    }

    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    /// Clicking a tab switches to it.
    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) || event.row != area.y {
            return vec![];
        }
        let col = event.column.saturating_sub(area.x);
        self.tab_columns()
            .into_iter()
            .find(|(_, start, end)| col >= *start && col < *end)
            .map(|(ws, _, _)| vec![Action::SwitchWorkspace(ws)])
            .unwrap_or_default()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        frame.render_widget(Clear, area);
        if area.height < 2 {
            frame.render_widget(Paragraph::new(self.build_tabs(state, area.width)), area);
            return;
        }
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);
        frame.render_widget(Paragraph::new(self.build_tabs(state, area.width)), rows[0]);
        frame.render_widget(Paragraph::new(build_status(state)), rows[1]);
    }
}

impl Header {
    fn build_tabs(&self, state: &AppState, width: u16) -> Line<'static> {
        let mut spans = vec![
            Span::styled(
                BRAND,
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled("│", Style::default().fg(C_SEPARATOR)),
        ];
        let mut used = BRAND.width() + 1;
        for ws in Workspace::ALL {
            let label = tab_label(ws);
            used += label.width() + 1;
            let style = if ws == self.workspace {
                Style::default()
                    .fg(C_PRIMARY)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(C_SECONDARY)
            };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }

        // Endpoint, right-aligned when it fits.
        let endpoint = format!("{} ", state.endpoint);
        let room = (width as usize).saturating_sub(used);
        if !state.endpoint.is_empty() && endpoint.width() + 2 <= room {
            spans.push(Span::raw(" ".repeat(room - endpoint.width())));
            spans.push(Span::styled(endpoint, Style::default().fg(C_NUMBER_HINT)));
        }
        Line::from(spans)
    }
}

// ── Row 2: catalog page and stock lookup ──────────────────────────────────────

fn build_status(state: &AppState) -> Line<'static> {
    let page = state.pager.display_number();
    let mut spans = vec![Span::raw(" ")];

    if state.catalog.is_loading() {
        spans.push(Span::styled(
            format!("◔ page {} en cours de chargement…", page),
            Style::default().fg(C_ACCENT),
        ));
    } else if state.catalog.error().is_some() {
        spans.push(Span::styled(
            format!("⛔ page {} indisponible", page),
            Style::default().fg(C_ERROR),
        ));
    } else {
        spans.push(Span::styled(
            format!("page {} · {} médicament(s)", page, state.catalog.items().len()),
            Style::default().fg(C_SECONDARY),
        ));
    }

    if let Some(name) = &state.stockists {
        spans.push(Span::styled("  │  ", Style::default().fg(C_SEPARATOR)));
        spans.push(Span::styled(
            format!("à proximité : {}", name),
            Style::default().fg(C_ACCENT),
        ));
    }

    if let Some(selected) = state.details.visible() {
        spans.push(Span::styled("  │  ", Style::default().fg(C_SEPARATOR)));
        spans.push(Span::styled(
            selected.title().to_string(),
            Style::default().fg(C_MUTED),
        ));
    }
    Line::from(spans)
}
