//! Home component: welcome banner and the three entry cards.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId, Workspace},
    app_state::AppState,
    component::Component,
    theme::{
        style_secondary, C_ACCENT, C_MUTED, C_PANEL_BORDER, C_PANEL_BORDER_FOCUSED, C_PRIMARY,
        C_SELECTION_BG,
    },
};

struct Card {
    icon: &'static str,
    title: &'static str,
    blurb: &'static str,
    target: Workspace,
}

const CARDS: [Card; 3] = [
    Card {
        icon: "⌖",
        title: "Pharmacies Proches",
        blurb: "Trouvez les pharmacies les plus proches de chez vous",
        target: Workspace::Pharmacies,
    },
    Card {
        icon: "✚",
        title: "Médicaments",
        blurb: "Consultez les informations sur les médicaments",
        target: Workspace::Medicines,
    },
    Card {
        icon: "☾",
        title: "Pharmacies de Garde",
        blurb: "Trouvez les pharmacies de garde ouvertes maintenant",
        target: Workspace::OnDuty,
    },
];

const CARD_H: u16 = 6;

pub struct Home {
    cursor: usize,
    /// Card rects from the last draw, for mouse hit-testing.
    card_areas: Vec<Rect>,
}

impl Home {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            card_areas: Vec::new(),
        }
    }

    fn open(&self, idx: usize) -> Vec<Action> {
        CARDS
            .get(idx)
            .map(|c| vec![Action::SwitchWorkspace(c.target)])
            .unwrap_or_default()
    }
}

impl Default for Home {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Home {
    fn id(&self) -> ComponentId {
        ComponentId::Home
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Left | KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = (self.cursor + 1).min(CARDS.len() - 1);
            }
            KeyCode::Enter => return self.open(self.cursor),
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        let hit = self.card_areas.iter().position(|r| {
            event.column >= r.x && event.column < r.right() && event.row >= r.y && event.row < r.bottom()
        });
        match hit {
            Some(idx) => {
                self.cursor = idx;
                self.open(idx)
            }
            None => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _state: &AppState) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(4),
                Constraint::Length(CARD_H),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let banner = vec![
            Line::from(Span::styled(
                "Bienvenue sur Shifa Maroc",
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Trouvez facilement vos médicaments et localisez les pharmacies proches.",
                style_secondary(),
            )),
        ];
        frame.render_widget(
            Paragraph::new(banner)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            rows[1],
        );

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(rows[2]);
        self.card_areas = cols.to_vec();

        for (idx, (card, cell)) in CARDS.iter().zip(cols.iter()).enumerate() {
            let selected = idx == self.cursor;
            let border = if selected && focused {
                C_PANEL_BORDER_FOCUSED
            } else {
                C_PANEL_BORDER
            };
            let mut block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border));
            if selected {
                block = block.style(Style::default().bg(C_SELECTION_BG));
            }
            let body = vec![
                Line::from(Span::styled(card.icon, Style::default().fg(C_ACCENT))),
                Line::from(Span::styled(
                    card.title,
                    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(card.blurb, style_secondary())),
            ];
            frame.render_widget(
                Paragraph::new(body)
                    .block(block)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                *cell,
            );
        }

        frame.render_widget(
            Paragraph::new(Span::styled(
                "Shifa Maroc, votre compagnon santé en toute simplicité !",
                Style::default().fg(C_MUTED),
            ))
            .alignment(Alignment::Center),
            rows[4],
        );
    }
}
