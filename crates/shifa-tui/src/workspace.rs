//! WorkspaceManager: active tab, overlay toggles and the frame layout.
//!
//! Focus is not cycled by hand: the details overlay takes it while open,
//! otherwise the active workspace's list has it.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::action::{ComponentId, Workspace};
use shifa_proto::selection::Selected;

/// Below this width the details overlay covers the whole body.
const SPLIT_MIN_WIDTH: u16 = 100;
const DETAILS_MIN_WIDTH: u16 = 46;

/// Where each part of the frame goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaneAreas {
    pub header: Rect,
    pub body: Rect,
    pub details: Option<Rect>,
    pub keys: Rect,
}

pub struct WorkspaceManager {
    pub workspace: Workspace,
    pub show_help: bool,
    pub show_keys_bar: bool,
}

impl WorkspaceManager {
    pub fn new() -> Self {
        Self {
            workspace: Workspace::Home,
            show_help: false,
            show_keys_bar: true,
        }
    }

    /// Returns true when the workspace actually changed.
    pub fn switch(&mut self, workspace: Workspace) -> bool {
        let changed = self.workspace != workspace;
        self.workspace = workspace;
        changed
    }

    pub fn focused(&self, details: Option<&Selected>) -> ComponentId {
        match details {
            Some(Selected::Medicine(_)) => ComponentId::MedicineDetails,
            Some(Selected::Pharmacy(_)) => ComponentId::PharmacyDetails,
            None => self.workspace.list_component(),
        }
    }

    pub fn layout(&self, area: Rect, details_open: bool) -> PaneAreas {
        let keys_h = if self.show_keys_bar { 1 } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(keys_h),
            ])
            .split(area);
        let (header, main, keys) = (rows[0], rows[1], rows[2]);

        if !details_open {
            return PaneAreas {
                header,
                body: main,
                details: None,
                keys,
            };
        }

        if main.width < SPLIT_MIN_WIDTH {
            return PaneAreas {
                header,
                body: main,
                details: Some(main),
                keys,
            };
        }

        let details_w = (main.width * 2 / 5).max(DETAILS_MIN_WIDTH);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(details_w)])
            .split(main);
        PaneAreas {
            header,
            body: cols[0],
            details: Some(cols[1]),
            keys,
        }
    }
}

impl Default for WorkspaceManager {
    fn default() -> Self {
        Self::new()
    }
}
