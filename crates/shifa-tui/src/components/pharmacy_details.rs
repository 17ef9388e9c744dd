//! PharmacyDetails: right-hand overlay for the selected pharmacy.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame,
};

use shifa_proto::projection::{directions_link, map_pin, status_style};
use shifa_proto::protocol::{Medicine, Pharmacy};
use shifa_proto::selection::{unavailable_medicines, Selected, Unavailable};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::pharmacy_list::copy_directions,
    theme::{
        style_badge, style_heading, style_secondary, C_ACCENT, C_DANGER, C_INFO, C_MUTED,
        C_OVERLAY_BG, C_PRIMARY, C_SECONDARY,
    },
    widgets::pane_chrome::pane_chrome,
};

pub struct PharmacyDetails {
    scroll: u16,
}

impl PharmacyDetails {
    pub fn new() -> Self {
        Self { scroll: 0 }
    }
}

impl Default for PharmacyDetails {
    fn default() -> Self {
        Self::new()
    }
}

fn field(label: &'static str, value: Span<'static>) -> Line<'static> {
    Line::from(vec![Span::styled(format!(" {:<12}", label), style_secondary()), value])
}

fn section(title: String) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {}", title),
        Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
    ))
}

fn pharmacy_lines(pharmacy: &Pharmacy, catalog: &[Medicine]) -> Vec<Line<'static>> {
    let plain = |s: &str| Span::styled(s.to_string(), Style::default().fg(C_PRIMARY));
    let muted = |s: &str| Span::styled(s.to_string(), Style::default().fg(C_MUTED));

    let mut heading = vec![
        Span::styled(format!(" {} ", pharmacy.name), style_heading()),
        Span::styled(
            format!(" {} ", pharmacy.status),
            style_badge(status_style(pharmacy.status)),
        ),
    ];
    if let Some(distance) = &pharmacy.distance {
        heading.push(Span::styled(format!("  {}", distance), Style::default().fg(C_ACCENT)));
    }

    let mut lines = vec![Line::from(heading), Line::from("")];
    lines.push(field("Adresse", plain(&pharmacy.address)));
    lines.push(field("Téléphone", plain(&pharmacy.phone)));

    lines.push(field(
        "Carte",
        match map_pin(pharmacy) {
            Some(pin) => Span::styled(format!("◉ {}", pin.describe()), Style::default().fg(C_ACCENT)),
            None => muted("position inconnue"),
        },
    ));
    lines.push(field(
        "Itinéraire",
        match directions_link(pharmacy) {
            Some(link) => Span::styled(
                link,
                Style::default().fg(C_INFO).add_modifier(Modifier::UNDERLINED),
            ),
            None => muted("indisponible"),
        },
    ));

    lines.push(Line::from(""));
    if let Some(stock) = pharmacy.medicines.items() {
        lines.push(section(format!("En stock ({})", stock.len())));
        for m in stock {
            lines.push(Line::from(vec![
                Span::styled("   ✓ ", Style::default().fg(C_ACCENT)),
                Span::raw(m.name.clone()),
            ]));
        }
        lines.push(Line::from(""));
    }

    match unavailable_medicines(catalog, pharmacy) {
        Unavailable::Unknown => {
            lines.push(section("Médicaments indisponibles".to_string()));
            lines.push(Line::from(Span::styled(
                "   Stock non communiqué par la pharmacie.",
                Style::default().fg(C_MUTED),
            )));
        }
        Unavailable::Listed(missing) if missing.is_empty() => {
            lines.push(section("Médicaments indisponibles".to_string()));
            lines.push(Line::from(Span::styled(
                "   Aucun : tout le répertoire est disponible.",
                Style::default().fg(C_SECONDARY),
            )));
        }
        Unavailable::Listed(missing) => {
            lines.push(section(format!("Médicaments indisponibles ({})", missing.len())));
            for m in missing {
                lines.push(Line::from(vec![
                    Span::styled("   ✗ ", Style::default().fg(C_DANGER)),
                    Span::styled(m.name.clone(), Style::default().fg(C_PRIMARY)),
                    Span::styled(format!("  {}", m.price), style_secondary()),
                ]));
            }
        }
    }
    lines
}

impl Component for PharmacyDetails {
    fn id(&self) -> ComponentId {
        ComponentId::PharmacyDetails
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => {
                return vec![Action::CloseDetails];
            }
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Home => self.scroll = 0,
            KeyCode::Char('y') => {
                if let Some(Selected::Pharmacy(p)) = state.details.visible() {
                    return vec![copy_directions(p)];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollDown => self.scroll = self.scroll.saturating_add(1),
            MouseEventKind::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::OpenPharmacy(_) = action {
            self.scroll = 0;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let Some(Selected::Pharmacy(pharmacy)) = state.details.visible() else {
            return;
        };
        let lines = pharmacy_lines(pharmacy, &state.directory.medicines);
        let footer = Line::from(Span::styled(
            " Esc fermer · y copier l'itinéraire ",
            Style::default().fg(C_SECONDARY),
        ));
        let block = pane_chrome("détails de la pharmacie", None, focused, None, Some(footer));
        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(Style::default().bg(C_OVERLAY_BG)), area);
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0)),
            area,
        );
    }
}
