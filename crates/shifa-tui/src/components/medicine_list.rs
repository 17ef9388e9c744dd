//! MedicineList component: one page of the remote catalog.

use std::time::Instant;

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use shifa_proto::filter::{not_found_message, ListKind};
use shifa_proto::projection::format_price;
use shifa_proto::protocol::CatalogRecord;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        C_ACCENT, C_CLASS, C_ERROR, C_MUTED, C_PRICE, C_PRIMARY, C_SECONDARY, C_SELECTION_BG,
        C_WARNING,
    },
    widgets::{
        filter_input::{FilterAction, FilterInput},
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
        text::fit,
    },
};

const PRICE_W: usize = 12;
const CLASS_W: usize = 22;

pub struct MedicineList {
    pub list: ScrollableList<CatalogRecord>,
    pub filter_input: FilterInput,
    list_state: ListState,
    last_click: Option<(usize, Instant)>,
}

impl MedicineList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            filter_input: FilterInput::new("nom ou classe thérapeutique…"),
            list_state: ListState::default(),
            last_click: None,
        }
    }

    /// Take the loader's current page. The filter query carries over.
    pub fn sync_page(&mut self, state: &AppState) {
        self.list.set_items(state.catalog.items().to_vec());
    }

    fn selected_actions(&self, open: bool) -> Vec<Action> {
        match self.list.selected_item() {
            Some(record) if open => vec![Action::OpenMedicine(record.clone())],
            Some(record) => vec![Action::ShowStockists(record.specialite.clone())],
            None => vec![],
        }
    }

    fn render_item(&self, record: &CatalogRecord, is_selected: bool, width: usize) -> ListItem<'static> {
        let name_style = if is_selected {
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_PRIMARY)
        };
        let detail = [record.dosage.as_str(), record.forme.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" · ");

        let name_w = width.saturating_sub(PRICE_W + CLASS_W + 4) * 3 / 5;
        let detail_w = width.saturating_sub(PRICE_W + CLASS_W + 4 + name_w);

        let mut spans = vec![
            Span::styled(if is_selected { "▸ " } else { "  " }, Style::default().fg(C_ACCENT)),
            Span::styled(fit(&record.specialite, name_w), name_style),
            Span::styled(fit(&detail, detail_w), Style::default().fg(C_SECONDARY)),
            Span::styled(
                fit(&format_price(record.ppv), PRICE_W),
                Style::default().fg(C_PRICE),
            ),
            Span::styled(
                fit(&record.classe_therapeutique, CLASS_W),
                Style::default().fg(C_CLASS),
            ),
        ];
        if is_selected && !record.statut_amm.is_empty() {
            spans.push(Span::styled(
                format!(" {}", record.statut_amm),
                Style::default().fg(C_WARNING),
            ));
        }

        let bg = if is_selected {
            Style::default().bg(C_SELECTION_BG)
        } else {
            Style::default()
        };
        ListItem::new(Line::from(spans)).style(bg)
    }

    fn footer(&self, state: &AppState) -> Line<'static> {
        let enabled = Style::default().fg(C_PRIMARY);
        let disabled = Style::default().fg(C_MUTED);
        let prev_style = if state.pager.can_go_back() { enabled } else { disabled };
        let mut spans = vec![
            Span::styled(" ◂ Précédent ", prev_style),
            Span::styled("│", disabled),
            Span::styled(" Suivant ▸ ", enabled),
        ];
        if let Some(at) = state.catalog.fetched_at() {
            spans.push(Span::styled(
                format!(" chargé à {} ", at.format("%H:%M:%S")),
                disabled,
            ));
        }
        Line::from(spans)
    }

    /// Placeholder text for the body, when there is nothing to list.
    fn status_message(&self, state: &AppState) -> Option<(String, Style)> {
        if state.catalog.is_loading() {
            return Some((
                format!("  Chargement de la page {}…", state.pager.display_number()),
                Style::default().fg(C_ACCENT),
            ));
        }
        if let Some(err) = state.catalog.error() {
            return Some((
                format!("  {}\n  r pour réessayer", err),
                Style::default().fg(C_ERROR),
            ));
        }
        if state.catalog.is_end_of_data() {
            return Some((
                "  Fin du catalogue : cette page est vide.".to_string(),
                Style::default().fg(C_MUTED),
            ));
        }
        if self.list.is_empty() && self.list.total_len() > 0 {
            return Some((
                format!("  {}", not_found_message(ListKind::Medicines, self.list.filter())),
                Style::default().fg(C_MUTED),
            ));
        }
        None
    }
}

impl Default for MedicineList {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for MedicineList {
    fn id(&self) -> ComponentId {
        ComponentId::MedicineList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        if self.filter_input.is_active() {
            match key.code {
                KeyCode::Up => self.list.select_up(1),
                KeyCode::Down => self.list.select_down(1),
                _ => match self.filter_input.handle_key(key) {
                    FilterAction::Changed(q) => self.list.set_filter(&q),
                    FilterAction::Confirmed => return vec![Action::CloseFilter],
                    FilterAction::Cancelled => {
                        self.list.set_filter("");
                        return vec![Action::CloseFilter];
                    }
                },
            }
            return vec![];
        }

        let step = if key.modifiers.contains(KeyModifiers::SHIFT) { 5 } else { 1 };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(step),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(step),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),

            KeyCode::Enter => return self.selected_actions(true),
            KeyCode::Char('a') => return self.selected_actions(false),

            KeyCode::Right | KeyCode::Char('n') => return vec![Action::NextPage],
            KeyCode::Left | KeyCode::Char('b') if state.pager.can_go_back() => {
                return vec![Action::PrevPage];
            }
            KeyCode::Char('r') => return vec![Action::ReloadPage],
            KeyCode::Char('+') => {
                return vec![Action::SetPageSize(state.pager.stepped_size(true))];
            }
            KeyCode::Char('-') => {
                return vec![Action::SetPageSize(state.pager.stepped_size(false))];
            }

            KeyCode::Char('/') => {
                self.filter_input.activate();
                return vec![Action::OpenFilter];
            }
            KeyCode::Esc if !self.list.filter().is_empty() => {
                self.filter_input.reset();
                self.list.set_filter("");
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        let rel_row = event.row.saturating_sub(area.y + 1) as usize;
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                let is_double = self
                    .last_click
                    .map_or(false, |(row, t)| row == rel_row && t.elapsed().as_millis() < 400);
                if self.list.handle_click(rel_row) && is_double {
                    self.last_click = None;
                    return self.selected_actions(true);
                }
                self.last_click = Some((rel_row, Instant::now()));
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let page_label = format!("page {}", state.pager.display_number());
        let badge = Badge {
            text: &page_label,
            color: if state.catalog.is_loading() { C_ACCENT } else { C_SECONDARY },
        };
        let block = pane_chrome("médicaments", Some('2'), focused, Some(badge), Some(self.footer(state)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let show_filter = self.filter_input.is_active() || !self.list.filter().is_empty();
        let list_h = inner.height.saturating_sub(show_filter as u16);
        let list_area = Rect { height: list_h, ..inner };

        if let Some((msg, style)) = self.status_message(state) {
            frame.render_widget(
                Paragraph::new(msg).style(style).wrap(Wrap { trim: false }),
                list_area,
            );
        } else {
            let content_h = list_area.height as usize;
            self.list.ensure_visible(content_h);
            let sel_in_view = self.list.selected_in_view();
            let width = list_area.width as usize;
            let items: Vec<ListItem> = self
                .list
                .visible_items(content_h)
                .into_iter()
                .enumerate()
                .map(|(row, record)| self.render_item(record, row == sel_in_view, width))
                .collect();
            self.list_state.select(Some(sel_in_view));
            frame.render_stateful_widget(List::new(items), list_area, &mut self.list_state);
        }

        if show_filter {
            let filter_area = Rect {
                y: inner.y + list_h,
                height: 1,
                ..inner
            };
            self.filter_input
                .draw(frame, filter_area, (self.list.len(), self.list.total_len()));
        }
    }

    fn is_capturing_input(&self) -> bool {
        self.filter_input.is_active()
    }
}
