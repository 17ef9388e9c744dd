//! MedicineDetails: right-hand overlay for the selected catalog row.
//!
//! Wire fields always; the curated sheet (prescription badge, indications,
//! alternatives...) only when the directory knows the medicine.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame,
};

use shifa_proto::projection::{format_price, PrescriptionBadge};
use shifa_proto::protocol::{CatalogRecord, Medicine};
use shifa_proto::selection::Selected;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        style_heading, style_secondary, token_color, C_ACCENT, C_MUTED, C_OVERLAY_BG, C_PRICE,
        C_PRIMARY, C_SECONDARY,
    },
    widgets::pane_chrome::pane_chrome,
};

pub struct MedicineDetails {
    scroll: u16,
}

impl MedicineDetails {
    pub fn new() -> Self {
        Self { scroll: 0 }
    }
}

impl Default for MedicineDetails {
    fn default() -> Self {
        Self::new()
    }
}

fn field<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!(" {:<20}", label), style_secondary()),
        Span::styled(value, Style::default().fg(C_PRIMARY)),
    ])
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        format!(" {}", title),
        Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
    ))
}

/// Lines for the wire record, empty fields skipped.
fn record_lines(record: &CatalogRecord) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(format!(" {}", record.specialite), style_heading())),
        Line::from(""),
    ];
    let text_fields = [
        ("Dosage", &record.dosage),
        ("Forme", &record.forme),
        ("Présentation", &record.presentation),
        ("Substance active", &record.substance_active),
        ("Classe", &record.classe_therapeutique),
        ("Statut AMM", &record.statut_amm),
        ("Commercialisation", &record.statut_commercialisation),
    ];
    for (label, value) in text_fields {
        if !value.is_empty() {
            lines.push(field(label, value.clone()));
        }
    }
    lines.push(Line::from(vec![
        Span::styled(format!(" {:<20}", "Prix public"), style_secondary()),
        Span::styled(
            format_price(record.ppv),
            Style::default().fg(C_PRICE).add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(field("Prix hôpital", format_price(record.ph)));
    if record.code != 0 {
        lines.push(field("Code", record.code.to_string()));
    }
    lines
}

fn curated_lines(medicine: &Medicine) -> Vec<Line<'static>> {
    let badge = PrescriptionBadge::for_medicine(medicine.prescription);
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" {} {} ", badge.icon.glyph(), badge.label),
            Style::default()
                .fg(token_color(badge.tone))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if !medicine.laboratory.is_empty() {
        lines.push(field("Laboratoire", medicine.laboratory.clone()));
    }
    if !medicine.category.is_empty() {
        lines.push(field("Catégorie", medicine.category.clone()));
    }
    if !medicine.description.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", medicine.description),
            style_secondary(),
        )));
    }
    if !medicine.indications.is_empty() {
        lines.push(Line::from(""));
        lines.push(section("Indications"));
        lines.push(Line::from(format!("   {}", medicine.indications)));
    }
    if let Some(contra) = &medicine.contraindications {
        lines.push(Line::from(""));
        lines.push(section("Contre-indications"));
        lines.push(Line::from(format!("   {}", contra)));
    }
    if !medicine.alternatives.is_empty() {
        lines.push(Line::from(""));
        lines.push(section("Alternatives"));
        for alt in &medicine.alternatives {
            lines.push(Line::from(vec![
                Span::styled("   • ", Style::default().fg(C_ACCENT)),
                Span::raw(alt.clone()),
            ]));
        }
    }
    lines
}

impl Component for MedicineDetails {
    fn id(&self) -> ComponentId {
        ComponentId::MedicineDetails
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
            KeyCode::Char('a') => {
                if let Some(Selected::Medicine(record)) = state.details.visible() {
                    return vec![Action::ShowStockists(record.specialite.clone())];
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
        if let Action::OpenMedicine(_) = action {
            self.scroll = 0;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let Some(Selected::Medicine(record)) = state.details.visible() else {
            return;
        };

        let mut lines = record_lines(record);
        match state.curated(record) {
            Some(medicine) => lines.extend(curated_lines(medicine)),
            None => {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    " Pas de fiche détaillée pour ce médicament.",
                    Style::default().fg(C_MUTED),
                )));
            }
        }

        let footer = Line::from(Span::styled(
            " Esc fermer · a pharmacies ",
            Style::default().fg(C_SECONDARY),
        ));
        let block = pane_chrome("détails du médicament", None, focused, None, Some(footer));
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

#[cfg(test)]
mod tests {
    use super::*;

    fn medicine(prescription: bool, contraindications: Option<&str>) -> Medicine {
        Medicine {
            id: "m1".to_string(),
            name: "Amoxil 1g".to_string(),
            form: "Comprimé".to_string(),
            dosage: "1g".to_string(),
            price: "45.00 DH".to_string(),
            laboratory: "GSK".to_string(),
            description: String::new(),
            category: "Antibiotique".to_string(),
            prescription,
            alternatives: vec!["Clamoxyl 1g".to_string(), "Hiconcil 1g".to_string()],
            indications: "Infections bactériennes".to_string(),
            contraindications: contraindications.map(str::to_string),
        }
    }

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn prescription_badge_and_alternatives_in_order() {
        let out = text(&curated_lines(&medicine(true, None)));
        assert!(out.contains("⚠ Médicament sous ordonnance"));
        let first = out.find("Clamoxyl 1g").unwrap();
        let second = out.find("Hiconcil 1g").unwrap();
        assert!(first < second);
    }

    #[test]
    fn contraindications_only_when_present() {
        let without = text(&curated_lines(&medicine(false, None)));
        assert!(!without.contains("Contre-indications"));
        assert!(without.contains("✓ Médicament sans ordonnance"));

        let with = text(&curated_lines(&medicine(false, Some("Allergie aux pénicillines"))));
        assert!(with.contains("Contre-indications"));
        assert!(with.contains("Allergie aux pénicillines"));
    }

    #[test]
    fn record_lines_skip_empty_fields_and_format_prices() {
        let record: CatalogRecord = serde_json::from_value(serde_json::json!({
            "id": 7,
            "SPECIALITE": "DOLIPRANE",
            "DOSAGE": "1000 MG",
            "PPV": 18.0,
            "PH": 12.4,
        }))
        .unwrap();
        let out = text(&record_lines(&record));
        assert!(out.contains("DOLIPRANE"));
        assert!(out.contains("1000 MG"));
        assert!(!out.contains("Présentation"));
        assert!(out.contains("18.00 DH"));
        assert!(out.contains("12.40 DH"));
    }
}
