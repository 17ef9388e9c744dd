//! App: component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App applies each Action, then lets
//!   every component react to it.
//! - Catalog pages are fetched on spawned tasks; only the latest request's
//!   completion is applied.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use shifa_proto::client::{CatalogSource, FetchError};
use shifa_proto::directory::Directory;
use shifa_proto::loader::{Completion, Ticket};
use shifa_proto::pagination::{PageRequest, Pager};
use shifa_proto::protocol::CatalogRecord;
use shifa_proto::selection::{pharmacies_stocking, Selected};

use crate::{
    action::{Action, ComponentId, Workspace},
    app_state::{AppState, PharmacyScope},
    component::Component,
    components::{
        header::Header, help_overlay::HelpOverlay, home::Home,
        medicine_details::MedicineDetails, medicine_list::MedicineList,
        pharmacy_details::PharmacyDetails, pharmacy_list::PharmacyList,
    },
    theme::C_BG,
    widgets::{
        status_bar::{self, InputMode},
        toast::ToastManager,
    },
    workspace::{PaneAreas, WorkspaceManager},
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    /// A catalog fetch finished, successfully or not.
    PageLoaded(Ticket, Result<Vec<CatalogRecord>, FetchError>),
}

// ── Persistence serde structs ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, Default)]
struct UiSessionState {
    #[serde(default)]
    workspace: String,
    #[serde(default)]
    page_index: usize,
}

pub struct App {
    state: AppState,
    wm: WorkspaceManager,
    pane_areas: PaneAreas,

    header: Header,
    home: Home,
    medicine_list: MedicineList,
    pharmacy_list: PharmacyList,
    on_duty_list: PharmacyList,
    medicine_details: MedicineDetails,
    pharmacy_details: PharmacyDetails,
    help_overlay: HelpOverlay,
    toast: ToastManager,

    source: Arc<dyn CatalogSource>,
    fetch_task: Option<JoinHandle<()>>,
    catalog_started: bool,
    tx: mpsc::Sender<AppMessage>,
    rx: Option<mpsc::Receiver<AppMessage>>,

    ui_state_path: PathBuf,
    should_quit: bool,
}

impl App {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        directory: Directory,
        pager: Pager,
        endpoint: String,
        ui_state_path: PathBuf,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<AppMessage>(256);
        let mut app = Self {
            state: AppState::new(directory, pager, endpoint),
            wm: WorkspaceManager::new(),
            pane_areas: PaneAreas::default(),
            header: Header::new(),
            home: Home::new(),
            medicine_list: MedicineList::new(),
            pharmacy_list: PharmacyList::new(PharmacyScope::All),
            on_duty_list: PharmacyList::new(PharmacyScope::OnDuty),
            medicine_details: MedicineDetails::new(),
            pharmacy_details: PharmacyDetails::new(),
            help_overlay: HelpOverlay::new(),
            toast: ToastManager::new(),
            source,
            fetch_task: None,
            catalog_started: false,
            tx,
            rx: Some(rx),
            ui_state_path,
            should_quit: false,
        };
        app.pharmacy_list.sync(&app.state);
        app.on_duty_list.sync(&app.state);
        app.restore_ui_session_state();
        app
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut rx = self
            .rx
            .take()
            .ok_or_else(|| anyhow!("app event loop already running"))?;

        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = self.tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        if self.wm.workspace == Workspace::Medicines {
            self.ensure_catalog_loaded();
        }

        // Toast expiry check + spinner animation
        let mut toast_tick = tokio::time::interval(Duration::from_millis(100));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    self.handle_message(msg);
                    while let Ok(next) = rx.try_recv() {
                        self.handle_message(next);
                    }
                    needs_redraw = true;
                }

                _ = toast_tick.tick() => {
                    needs_redraw = self.toast.tick();
                }
            }

            if self.should_quit {
                break;
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        self.state.catalog.close();
        if let Some(task) = self.fetch_task.take() {
            task.abort();
        }
        self.save_ui_session_state();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("shifa exiting");

        Ok(())
    }

    fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return;
                    }
                    for a in self.handle_key(key) {
                        self.dispatch(a);
                    }
                    self.save_ui_session_state();
                }
                Event::Mouse(mouse) => {
                    for a in self.handle_mouse(mouse) {
                        self.dispatch(a);
                    }
                }
                Event::Resize(w, h) => self.dispatch(Action::Resize(w, h)),
                _ => {}
            },

            AppMessage::PageLoaded(ticket, result) => self.on_page_loaded(ticket, result),
        }
    }

    // ── Catalog fetching ──────────────────────────────────────────────────────

    /// Fetch the current page the first time the catalog is shown.
    fn ensure_catalog_loaded(&mut self) {
        if !self.catalog_started {
            self.catalog_started = true;
            self.request_page(self.state.pager.request());
        }
    }

    fn request_page(&mut self, request: PageRequest) {
        let ticket = self.state.catalog.begin(request);
        if let Some(task) = self.fetch_task.take() {
            task.abort();
        }
        self.toast.spinner(format!(
            "Chargement de la page {}…",
            request.page_index.saturating_add(1)
        ));

        let source = self.source.clone();
        let tx = self.tx.clone();
        self.fetch_task = Some(tokio::spawn(async move {
            let result = source.fetch_page(request).await;
            let _ = tx.send(AppMessage::PageLoaded(ticket, result)).await;
        }));
    }

    fn on_page_loaded(&mut self, ticket: Ticket, result: Result<Vec<CatalogRecord>, FetchError>) {
        if let Err(e) = &result {
            warn!("[catalog] page {} failed: {}", ticket.request().page_index, e);
        }
        match self.state.catalog.complete(ticket, result) {
            Completion::Applied => {
                self.fetch_task = None;
                self.toast.stop_spinner();
                self.medicine_list.sync_page(&self.state);
                if let Some(msg) = self.state.catalog.error() {
                    self.toast.error(msg.to_string());
                } else if self.state.catalog.is_end_of_data() {
                    self.toast.info("Fin du catalogue");
                }
            }
            Completion::Stale => {
                debug!(
                    "[catalog] dropped stale page {}",
                    ticket.request().page_index
                );
            }
            Completion::Discarded => {}
        }
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        // Help overlay captures all keys when visible
        if self.wm.show_help {
            let actions = self.help_overlay.handle_key(key, &self.state);
            if !actions.is_empty() {
                return actions;
            }
            return vec![Action::ToggleHelp];
        }

        let details_open = self.state.details_open();
        if self.state.input_mode == InputMode::Normal {
            let jump = |ws| vec![Action::SwitchWorkspace(ws)];
            match key.code {
                KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE && !details_open => {
                    return vec![Action::Quit];
                }
                KeyCode::Char('?') => return vec![Action::ToggleHelp],
                KeyCode::Char('K') => return vec![Action::ToggleKeys],
                KeyCode::Tab => return vec![Action::NextWorkspace],
                KeyCode::Char('1') | KeyCode::Char('h') => return jump(Workspace::Home),
                KeyCode::Char('2') | KeyCode::Char('m') => return jump(Workspace::Medicines),
                KeyCode::Char('3') | KeyCode::Char('p') => return jump(Workspace::Pharmacies),
                KeyCode::Char('4') | KeyCode::Char('g') => return jump(Workspace::OnDuty),
                _ => {}
            }
        }

        // Dispatch to the focused component
        let focused = self.wm.focused(self.state.details.visible());
        let s = &self.state;
        match focused {
            ComponentId::Home => self.home.handle_key(key, s),
            ComponentId::MedicineList => self.medicine_list.handle_key(key, s),
            ComponentId::PharmacyList => self.pharmacy_list.handle_key(key, s),
            ComponentId::OnDutyList => self.on_duty_list.handle_key(key, s),
            ComponentId::MedicineDetails => self.medicine_details.handle_key(key, s),
            ComponentId::PharmacyDetails => self.pharmacy_details.handle_key(key, s),
            ComponentId::HelpOverlay => self.help_overlay.handle_key(key, s),
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let relevant = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !relevant || self.wm.show_help {
            return vec![];
        }

        fn hit(r: Rect, col: u16, row: u16) -> bool {
            r.width > 0
                && r.height > 0
                && col >= r.x
                && col < r.x + r.width
                && row >= r.y
                && row < r.y + r.height
        }

        let (col, row) = (event.column, event.row);
        let areas = self.pane_areas;
        let s = &self.state;

        if hit(areas.header, col, row) {
            return self.header.handle_mouse(event, areas.header, s);
        }
        if let Some(details) = areas.details {
            if hit(details, col, row) {
                return match s.details.visible() {
                    Some(Selected::Medicine(_)) => {
                        self.medicine_details.handle_mouse(event, details, s)
                    }
                    Some(Selected::Pharmacy(_)) => {
                        self.pharmacy_details.handle_mouse(event, details, s)
                    }
                    None => vec![],
                };
            }
        }
        if hit(areas.body, col, row) {
            let body = areas.body;
            return match self.wm.workspace {
                Workspace::Home => self.home.handle_mouse(event, body, s),
                Workspace::Medicines => self.medicine_list.handle_mouse(event, body, s),
                Workspace::Pharmacies => self.pharmacy_list.handle_mouse(event, body, s),
                Workspace::OnDuty => self.on_duty_list.handle_mouse(event, body, s),
            };
        }
        vec![]
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        // State first, so components react to the updated view of it.
        self.apply_action(action.clone());

        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.home.on_action(&action, s));
            out.extend(self.medicine_list.on_action(&action, s));
            out.extend(self.pharmacy_list.on_action(&action, s));
            out.extend(self.on_duty_list.on_action(&action, s));
            out.extend(self.medicine_details.on_action(&action, s));
            out.extend(self.pharmacy_details.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        // Dispatch any secondary actions (depth-limited to 1 level)
        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        match &action {
            Action::Resize(_, _) => {}
            _ => debug!("apply_action: {:?}", action),
        }
        match action {
            // ── Catalog paging ────────────────────────────────────────────────
            Action::NextPage => {
                let request = self.state.pager.next();
                self.request_page(request);
            }
            Action::PrevPage => {
                if let Some(request) = self.state.pager.previous() {
                    self.request_page(request);
                }
            }
            Action::ReloadPage => self.request_page(self.state.pager.request()),
            Action::SetPageSize(size) => {
                if let Some(request) = self.state.pager.set_page_size(size) {
                    self.toast
                        .info(format!("{} médicaments par page", request.page_size));
                    self.request_page(request);
                }
            }

            // ── Filter ────────────────────────────────────────────────────────
            Action::OpenFilter => self.state.input_mode = InputMode::Filter,
            Action::CloseFilter => self.state.input_mode = InputMode::Normal,

            // ── Details overlay ───────────────────────────────────────────────
            Action::OpenMedicine(record) => {
                self.state.details.select(Selected::Medicine(record));
            }
            Action::OpenPharmacy(pharmacy) => {
                self.state.details.select(Selected::Pharmacy(pharmacy));
            }
            Action::CloseDetails => self.state.details.close(),

            // ── Stock lookup ──────────────────────────────────────────────────
            Action::ShowStockists(name) => {
                let count = pharmacies_stocking(&self.state.directory.pharmacies, &name).len();
                info!("[stock] {} stocked by {} pharmacies", name, count);
                if count == 0 {
                    self.toast
                        .warning(format!("Aucune pharmacie ne signale {} en stock", name));
                } else {
                    self.toast
                        .info(format!("{} pharmacie(s) ont {} en stock", count, name));
                }
                self.state.stockists = Some(name);
                self.switch_workspace(Workspace::Pharmacies);
            }
            Action::ClearStockists => self.state.stockists = None,

            // ── Workspace ─────────────────────────────────────────────────────
            Action::SwitchWorkspace(ws) => self.switch_workspace(ws),
            Action::NextWorkspace => self.switch_workspace(self.wm.workspace.next()),

            // ── UI toggles ────────────────────────────────────────────────────
            Action::ToggleHelp => self.wm.show_help = !self.wm.show_help,
            Action::ToggleKeys => self.wm.show_keys_bar = !self.wm.show_keys_bar,
            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        // Truncate for toast display
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text
                        };
                        self.toast.success(format!("copié : {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("presse-papiers indisponible : {}", e));
                    }
                }
            }
            Action::Warn(msg) => self.toast.warning(msg),

            // ── System ────────────────────────────────────────────────────────
            Action::Quit => self.should_quit = true,
            Action::Resize(_, _) => {}
        }
    }

    /// Leaving a view drops its selection; entering the catalog loads it.
    fn switch_workspace(&mut self, workspace: Workspace) {
        if !self.wm.switch(workspace) {
            return;
        }
        self.state.details.close();
        self.state.input_mode = InputMode::Normal;
        self.header.workspace = workspace;
        if workspace == Workspace::Medicines {
            self.ensure_catalog_loaded();
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let details_open = self.state.details_open();
        let focused = self.wm.focused(self.state.details.visible());
        let areas = self.wm.layout(area, details_open);
        self.pane_areas = areas;

        self.header.draw(frame, areas.header, false, &self.state);

        let s = &self.state;
        match self.wm.workspace {
            Workspace::Home => {
                self.home
                    .draw(frame, areas.body, focused == ComponentId::Home, s)
            }
            Workspace::Medicines => self.medicine_list.draw(
                frame,
                areas.body,
                focused == ComponentId::MedicineList,
                s,
            ),
            Workspace::Pharmacies => self.pharmacy_list.draw(
                frame,
                areas.body,
                focused == ComponentId::PharmacyList,
                s,
            ),
            Workspace::OnDuty => self.on_duty_list.draw(
                frame,
                areas.body,
                focused == ComponentId::OnDutyList,
                s,
            ),
        }

        if let Some(details) = areas.details {
            match s.details.visible() {
                Some(Selected::Medicine(_)) => self.medicine_details.draw(frame, details, true, s),
                Some(Selected::Pharmacy(_)) => self.pharmacy_details.draw(frame, details, true, s),
                None => {}
            }
        }

        if self.wm.show_keys_bar {
            let catalog_error =
                self.wm.workspace == Workspace::Medicines && s.catalog.error().is_some();
            status_bar::draw_keys_bar(
                frame,
                areas.keys,
                s.input_mode,
                self.wm.workspace,
                details_open,
                s.catalog.is_loading(),
                catalog_error,
            );
        }

        // ── Help overlay (on top of everything) ──────────────────────────────
        if self.wm.show_help {
            self.help_overlay.draw(frame, area, false, s);
        }

        // ── Toast notifications (topmost layer) ──────────────────────────────
        self.toast.draw(frame, area);
    }

    // ── Session persistence ───────────────────────────────────────────────────

    fn restore_ui_session_state(&mut self) {
        let saved = load_ui_session_state(&self.ui_state_path);
        if let Some(ws) = Workspace::from_key(&saved.workspace) {
            self.wm.switch(ws);
            self.header.workspace = ws;
        }
        if self.state.pager.go_to(saved.page_index).is_some() {
            debug!("restored catalog page {}", saved.page_index);
        }
    }

    fn save_ui_session_state(&self) {
        let ui_state = UiSessionState {
            workspace: self.wm.workspace.key().to_string(),
            page_index: self.state.pager.page_index(),
        };
        if let Err(e) = save_ui_session_state(&self.ui_state_path, &ui_state) {
            debug!("could not save ui state: {}", e);
        }
    }
}

fn load_ui_session_state(path: &PathBuf) -> UiSessionState {
    let Ok(content) = std::fs::read_to_string(path) else {
        return UiSessionState::default();
    };
    serde_json::from_str(&content).unwrap_or_default()
}

fn save_ui_session_state(path: &PathBuf, state: &UiSessionState) -> anyhow::Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(state)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shifa_proto::client::StaticSource;

    fn record(id: i64) -> CatalogRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "SPECIALITE": format!("MED {}", id),
        }))
        .unwrap()
    }

    fn app(records: usize, dir: &tempfile::TempDir) -> App {
        let source = StaticSource::new((1..=records as i64).map(record).collect());
        App::new(
            Arc::new(source),
            Directory::bundled().unwrap(),
            Pager::new(2),
            "http://localhost:8003/medecines/".to_string(),
            dir.path().join("ui_state.json"),
        )
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    /// Deliver the next background message to the app.
    async fn pump(app: &mut App) {
        let rx = app.rx.as_mut().unwrap();
        let msg = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        app.handle_message(msg);
    }

    #[tokio::test]
    async fn entering_catalog_loads_first_page() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(5, &dir);
        assert!(!app.state.catalog.is_loading());

        app.dispatch(Action::SwitchWorkspace(Workspace::Medicines));
        assert!(app.state.catalog.is_loading());
        pump(&mut app).await;

        let ids: Vec<i64> = app.state.catalog.items().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(app.medicine_list.list.total_len(), 2);
        assert!(!app.toast.has_spinner());
    }

    #[tokio::test]
    async fn paging_forward_and_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(5, &dir);
        app.dispatch(Action::SwitchWorkspace(Workspace::Medicines));
        pump(&mut app).await;

        app.dispatch(Action::NextPage);
        pump(&mut app).await;
        let ids: Vec<i64> = app.state.catalog.items().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 4]);

        app.dispatch(Action::PrevPage);
        pump(&mut app).await;
        assert_eq!(app.state.pager.page_index(), 0);

        // Already on the first page: nothing is requested.
        app.dispatch(Action::PrevPage);
        assert!(!app.state.catalog.is_loading());
    }

    #[tokio::test]
    async fn past_the_end_is_end_of_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(2, &dir);
        app.dispatch(Action::SwitchWorkspace(Workspace::Medicines));
        pump(&mut app).await;
        app.dispatch(Action::NextPage);
        pump(&mut app).await;
        assert!(app.state.catalog.is_end_of_data());
        assert_eq!(app.state.pager.page_index(), 1);
    }

    #[tokio::test]
    async fn resizing_pages_refetches_from_the_start() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(5, &dir);
        app.dispatch(Action::SwitchWorkspace(Workspace::Medicines));
        pump(&mut app).await;
        app.dispatch(Action::NextPage);
        pump(&mut app).await;

        app.dispatch(Action::SetPageSize(3));
        assert!(app.state.catalog.is_loading());
        pump(&mut app).await;
        let ids: Vec<i64> = app.state.catalog.items().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(app.state.pager.page_index(), 0);

        // Same size again: no fetch.
        app.dispatch(Action::SetPageSize(3));
        assert!(!app.state.catalog.is_loading());
    }

    #[tokio::test]
    async fn absurd_restored_page_does_not_overflow() {
        let dir = tempfile::tempdir().unwrap();
        let saved = UiSessionState {
            workspace: "home".to_string(),
            page_index: usize::MAX,
        };
        save_ui_session_state(&dir.path().join("ui_state.json"), &saved).unwrap();
        let mut app = app(0, &dir);
        assert_eq!(app.state.pager.display_number(), usize::MAX);
        app.dispatch(Action::NextPage);
        assert_eq!(app.state.pager.page_index(), usize::MAX);
    }

    #[test]
    fn one_selection_at_a_time() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(0, &dir);
        let pharmacy = app.state.directory.pharmacies[0].clone();
        app.dispatch(Action::OpenMedicine(record(1)));
        app.dispatch(Action::OpenPharmacy(pharmacy.clone()));
        assert_eq!(
            app.state.details.visible(),
            Some(&Selected::Pharmacy(pharmacy))
        );
        assert_eq!(
            app.wm.focused(app.state.details.visible()),
            ComponentId::PharmacyDetails
        );
        app.dispatch(Action::CloseDetails);
        assert!(!app.state.details_open());
    }

    #[test]
    fn stock_lookup_narrows_pharmacies() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(0, &dir);
        let all = app.pharmacy_list.list.total_len();
        app.dispatch(Action::ShowStockists("Smecta 3g".to_string()));
        assert_eq!(app.wm.workspace, Workspace::Pharmacies);
        assert!(app.pharmacy_list.list.total_len() < all);
        assert!(app.pharmacy_list.list.total_len() > 0);

        app.dispatch(Action::ClearStockists);
        assert_eq!(app.pharmacy_list.list.total_len(), all);
    }

    #[test]
    fn switching_workspace_closes_details() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(0, &dir);
        app.dispatch(Action::SwitchWorkspace(Workspace::Pharmacies));
        let pharmacy = app.state.directory.pharmacies[0].clone();
        app.dispatch(Action::OpenPharmacy(pharmacy));
        app.dispatch(Action::SwitchWorkspace(Workspace::OnDuty));
        assert!(!app.state.details_open());
    }

    #[test]
    fn q_closes_details_before_quitting() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(0, &dir);
        let pharmacy = app.state.directory.pharmacies[0].clone();
        app.dispatch(Action::OpenPharmacy(pharmacy));

        let actions = app.handle_key(key('q'));
        assert!(matches!(actions.as_slice(), [Action::CloseDetails]));
        for a in actions {
            app.dispatch(a);
        }
        assert!(matches!(app.handle_key(key('q')).as_slice(), [Action::Quit]));
    }

    #[test]
    fn filter_mode_keeps_global_keys_out() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(0, &dir);
        app.dispatch(Action::SwitchWorkspace(Workspace::Pharmacies));
        for a in app.handle_key(key('/')) {
            app.dispatch(a);
        }
        assert_eq!(app.state.input_mode, InputMode::Filter);
        // '2' is typed into the filter instead of switching tabs.
        for a in app.handle_key(key('2')) {
            app.dispatch(a);
        }
        assert_eq!(app.wm.workspace, Workspace::Pharmacies);
        assert_eq!(app.pharmacy_list.list.filter(), "2");
    }

    #[test]
    fn session_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui_state.json");
        let saved = UiSessionState {
            workspace: "on_duty".to_string(),
            page_index: 3,
        };
        save_ui_session_state(&path, &saved).unwrap();
        assert_eq!(load_ui_session_state(&path), saved);

        let app = app(0, &dir);
        assert_eq!(app.wm.workspace, Workspace::OnDuty);
        assert_eq!(app.header.workspace, Workspace::OnDuty);
        assert_eq!(app.state.pager.page_index(), 3);
    }

    #[test]
    fn corrupt_session_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui_state.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_ui_session_state(&path), UiSessionState::default());
    }
}
