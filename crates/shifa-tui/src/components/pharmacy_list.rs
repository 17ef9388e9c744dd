//! PharmacyList component: all pharmacies, or only those on duty.

use std::time::Instant;

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use shifa_proto::filter::{not_found_message, ListKind};
use shifa_proto::projection::{directions_link, status_style};
use shifa_proto::protocol::Pharmacy;

use crate::{
    action::{Action, ComponentId},
    app_state::{AppState, PharmacyScope},
    component::Component,
    theme::{style_badge, C_ACCENT, C_MUTED, C_PRIMARY, C_SECONDARY, C_SELECTION_BG},
    widgets::{
        filter_input::{FilterAction, FilterInput},
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
        text::fit,
    },
};

const BADGE_W: usize = 9;
const DISTANCE_W: usize = 9;

/// Copy the directions link, or explain why there is none.
pub fn copy_directions(pharmacy: &Pharmacy) -> Action {
    match directions_link(pharmacy) {
        Some(link) => Action::CopyToClipboard(link),
        None => Action::Warn(format!(
            "{} : position inconnue, itinéraire indisponible",
            pharmacy.name
        )),
    }
}

pub struct PharmacyList {
    scope: PharmacyScope,
    pub list: ScrollableList<Pharmacy>,
    pub filter_input: FilterInput,
    list_state: ListState,
    last_click: Option<(usize, Instant)>,
}

impl PharmacyList {
    pub fn new(scope: PharmacyScope) -> Self {
        Self {
            scope,
            list: ScrollableList::new(),
            filter_input: FilterInput::new("nom ou adresse…"),
            list_state: ListState::default(),
            last_click: None,
        }
    }

    /// Rebuild from the directory and the current stock lookup.
    pub fn sync(&mut self, state: &AppState) {
        self.list.set_items(state.pharmacies_for(self.scope));
    }

    fn title(&self) -> &'static str {
        match self.scope {
            PharmacyScope::All => "pharmacies",
            PharmacyScope::OnDuty => "pharmacies de garde",
        }
    }

    fn number_key(&self) -> char {
        match self.scope {
            PharmacyScope::All => '3',
            PharmacyScope::OnDuty => '4',
        }
    }

    fn render_item(&self, pharmacy: &Pharmacy, is_selected: bool, width: usize) -> ListItem<'static> {
        let name_style = if is_selected {
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_PRIMARY)
        };
        let name_w = width.saturating_sub(BADGE_W + DISTANCE_W + 4) * 2 / 5;
        let address_w = width.saturating_sub(BADGE_W + DISTANCE_W + 4 + name_w);

        let spans = vec![
            Span::styled(if is_selected { "▸ " } else { "  " }, Style::default().fg(C_ACCENT)),
            Span::styled(
                fit(&format!(" {}", pharmacy.status), BADGE_W - 1),
                style_badge(status_style(pharmacy.status)),
            ),
            Span::raw(" "),
            Span::styled(fit(&pharmacy.name, name_w), name_style),
            Span::styled(fit(&pharmacy.address, address_w), Style::default().fg(C_SECONDARY)),
            Span::styled(
                fit(pharmacy.distance.as_deref().unwrap_or(""), DISTANCE_W),
                Style::default().fg(C_ACCENT),
            ),
        ];
        let bg = if is_selected {
            Style::default().bg(C_SELECTION_BG)
        } else {
            Style::default()
        };
        ListItem::new(Line::from(spans)).style(bg)
    }
}

impl Component for PharmacyList {
    fn id(&self) -> ComponentId {
        match self.scope {
            PharmacyScope::All => ComponentId::PharmacyList,
            PharmacyScope::OnDuty => ComponentId::OnDutyList,
        }
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

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter => {
                if let Some(p) = self.list.selected_item() {
                    return vec![Action::OpenPharmacy(p.clone())];
                }
            }
            KeyCode::Char('y') => {
                if let Some(p) = self.list.selected_item() {
                    return vec![copy_directions(p)];
                }
            }
            KeyCode::Char('/') => {
                self.filter_input.activate();
                return vec![Action::OpenFilter];
            }
            KeyCode::Esc if !self.list.filter().is_empty() => {
                self.filter_input.reset();
                self.list.set_filter("");
            }
            KeyCode::Esc if state.stockists.is_some() => return vec![Action::ClearStockists],
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
                    if let Some(p) = self.list.selected_item() {
                        return vec![Action::OpenPharmacy(p.clone())];
                    }
                }
                self.last_click = Some((rel_row, Instant::now()));
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        if matches!(action, Action::ShowStockists(_) | Action::ClearStockists) {
            self.sync(state);
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let lookup = state.stockists.as_deref().map(|name| format!("stock : {}", name));
        let badge = lookup.as_deref().map(|text| Badge {
            text,
            color: C_ACCENT,
        });
        let footer = Line::from(Span::styled(
            format!(" {} pharmacie(s) ", self.list.len()),
            Style::default().fg(C_MUTED),
        ));
        let block = pane_chrome(
            self.title(),
            Some(self.number_key()),
            focused,
            badge,
            Some(footer),
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let show_filter = self.filter_input.is_active() || !self.list.filter().is_empty();
        let list_h = inner.height.saturating_sub(show_filter as u16);
        let list_area = Rect { height: list_h, ..inner };

        if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(format!(
                    "  {}",
                    not_found_message(ListKind::Pharmacies, self.list.filter())
                ))
                .style(Style::default().fg(C_MUTED)),
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
                .map(|(row, p)| self.render_item(p, row == sel_in_view, width))
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
