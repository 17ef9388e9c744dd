//! Action enum: all user-initiated intents and internal events.

use shifa_proto::protocol::{CatalogRecord, Pharmacy};

/// Unique identifier for a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Home,
    MedicineList,
    PharmacyList,
    OnDutyList,
    MedicineDetails,
    PharmacyDetails,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Catalog paging ───────────────────────────────────────────────────────
    NextPage,
    PrevPage,
    ReloadPage,
    /// Change records per page; goes back to page 1.
    SetPageSize(usize),

    // ── Filter/search ────────────────────────────────────────────────────────
    OpenFilter,
    CloseFilter,

    // ── Details overlay ──────────────────────────────────────────────────────
    OpenMedicine(CatalogRecord),
    OpenPharmacy(Pharmacy),
    CloseDetails,

    // ── Stock lookup ─────────────────────────────────────────────────────────
    /// Show pharmacies whose stock lists this medicine name.
    ShowStockists(String),
    ClearStockists,

    // ── Workspace ────────────────────────────────────────────────────────────
    SwitchWorkspace(Workspace),
    NextWorkspace,

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleHelp,
    ToggleKeys,
    CopyToClipboard(String), // text to copy
    Warn(String),

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Resize(u16, u16),
}

/// Which workspace (tab) is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workspace {
    Home,
    Medicines,
    Pharmacies,
    OnDuty,
}

impl Workspace {
    pub const ALL: [Workspace; 4] = [
        Workspace::Home,
        Workspace::Medicines,
        Workspace::Pharmacies,
        Workspace::OnDuty,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Accueil",
            Self::Medicines => "Médicaments",
            Self::Pharmacies => "Pharmacies",
            Self::OnDuty => "De garde",
        }
    }

    /// Stable name for session persistence.
    pub fn key(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Medicines => "medicines",
            Self::Pharmacies => "pharmacies",
            Self::OnDuty => "on_duty",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.key() == key)
    }

    pub fn next(self) -> Self {
        match self {
            Self::Home => Self::Medicines,
            Self::Medicines => Self::Pharmacies,
            Self::Pharmacies => Self::OnDuty,
            Self::OnDuty => Self::Home,
        }
    }

    /// The list component shown in this workspace, if any.
    pub fn list_component(self) -> ComponentId {
        match self {
            Self::Home => ComponentId::Home,
            Self::Medicines => ComponentId::MedicineList,
            Self::Pharmacies => ComponentId::PharmacyList,
            Self::OnDuty => ComponentId::OnDutyList,
        }
    }
}
