//! HelpOverlay component: centered popup with keyboard shortcut reference.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_MUTED, C_OVERLAY_BG, C_PANEL_BORDER_FOCUSED, C_PRIMARY, C_SECONDARY},
};

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

impl Default for HelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for HelpOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::HelpOverlay
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return vec![];
        }
        match key.code {
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc => vec![Action::ToggleHelp],
            // Consume all keys while overlay is open
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::ToggleHelp = action {
            self.toggle();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, _state: &AppState) {
        if !self.visible {
            return;
        }

        let popup = centered_rect(64, 33, area);
        let heading = |s: &'static str| {
            Line::from(Span::styled(
                s,
                Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
            ))
        };

        let help_lines: Vec<Line> = vec![
            Line::from(Span::styled(
                " raccourcis clavier",
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            heading(" onglets"),
            help_row("1 / 2 / 3 / 4", "accueil / médicaments / pharmacies / garde"),
            help_row("h / m / p / g", "idem, par initiale"),
            help_row("tab", "onglet suivant"),
            Line::from(""),
            heading(" listes"),
            help_row("↑ / ↓  ou  j / k", "déplacer la sélection"),
            help_row("pg up / pg dn", "sauter 10 lignes"),
            help_row("home / end  ou  G", "premier / dernier"),
            help_row("enter", "ouvrir les détails"),
            help_row("/", "filtrer (Esc efface et ferme)"),
            Line::from(""),
            heading(" catalogue"),
            help_row("n  ou  →", "page suivante"),
            help_row("b  ou  ←", "page précédente"),
            help_row("r", "recharger la page"),
            help_row("+ / -", "plus / moins de lignes par page"),
            help_row("a", "pharmacies qui ont ce médicament"),
            Line::from(""),
            heading(" pharmacies"),
            help_row("y", "copier le lien d'itinéraire"),
            help_row("esc", "quitter la recherche de stock"),
            Line::from(""),
            heading(" interface"),
            help_row("esc", "fermer les détails"),
            help_row("K", "afficher / masquer la barre des touches"),
            help_row("?", "afficher / masquer cette aide"),
            help_row("q / Ctrl+C", "quitter"),
            Line::from(""),
            Line::from(Span::styled(
                " ? ou Esc pour fermer",
                Style::default().fg(C_MUTED),
            )),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(help_lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(C_PANEL_BORDER_FOCUSED))
                        .style(Style::default().bg(C_OVERLAY_BG)),
                )
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}

fn help_row<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{:<20}", key),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc, Style::default().fg(C_SECONDARY)),
    ])
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}
