//! AppState: shared read-only data passed to all components during render/event.
//!
//! Components read this but never mutate it.
//! The App event-loop is the only thing that writes to AppState.

use shifa_proto::directory::Directory;
use shifa_proto::loader::PageLoader;
use shifa_proto::pagination::Pager;
use shifa_proto::protocol::{CatalogRecord, Medicine, Pharmacy};
use shifa_proto::selection::{pharmacies_stocking, Selected, Selection};

use crate::widgets::status_bar::InputMode;

/// Which pharmacies a list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PharmacyScope {
    All,
    OnDuty,
}

pub struct AppState {
    // ── Catalog ─────────────────────────────────────────────────────────────
    pub catalog: PageLoader<CatalogRecord>,
    pub pager: Pager,
    /// Medicines endpoint, shown in the header.
    pub endpoint: String,

    // ── Directory ───────────────────────────────────────────────────────────
    pub directory: Directory,
    /// Medicine name the pharmacy lists are narrowed to, if any.
    pub stockists: Option<String>,

    // ── View ────────────────────────────────────────────────────────────────
    pub details: Selection<Selected>,
    pub input_mode: InputMode,
}

impl AppState {
    pub fn new(directory: Directory, pager: Pager, endpoint: String) -> Self {
        Self {
            catalog: PageLoader::new(),
            pager,
            endpoint,
            directory,
            stockists: None,
            details: Selection::new(),
            input_mode: InputMode::Normal,
        }
    }

    pub fn details_open(&self) -> bool {
        self.details.is_open()
    }

    /// Curated details for a catalog row, matched on the brand name.
    pub fn curated(&self, record: &CatalogRecord) -> Option<&Medicine> {
        self.directory.medicine_named(&record.specialite)
    }

    pub fn pharmacies_for(&self, scope: PharmacyScope) -> Vec<Pharmacy> {
        let in_scope = |p: &Pharmacy| scope == PharmacyScope::All || p.is_on_duty();
        match &self.stockists {
            Some(name) => pharmacies_stocking(&self.directory.pharmacies, name)
                .into_iter()
                .filter(|p| in_scope(*p))
                .cloned()
                .collect(),
            None => match scope {
                PharmacyScope::All => self.directory.pharmacies.clone(),
                PharmacyScope::OnDuty => self.directory.on_duty(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(
            Directory::bundled().unwrap(),
            Pager::default(),
            "http://localhost:8003/medecines/".to_string(),
        )
    }

    #[test]
    fn scopes_without_lookup() {
        let s = state();
        assert_eq!(
            s.pharmacies_for(PharmacyScope::All).len(),
            s.directory.pharmacies.len()
        );
        let duty = s.pharmacies_for(PharmacyScope::OnDuty);
        assert!(!duty.is_empty());
        assert!(duty.iter().all(Pharmacy::is_on_duty));
    }

    #[test]
    fn stockist_lookup_narrows_both_scopes() {
        let mut s = state();
        s.stockists = Some("doliprane 1000mg".to_string());
        let all = s.pharmacies_for(PharmacyScope::All);
        assert!(!all.is_empty());
        assert!(all
            .iter()
            .all(|p| p.medicines.contains_named("Doliprane 1000mg")));
        let duty = s.pharmacies_for(PharmacyScope::OnDuty);
        assert!(duty.len() <= all.len());
        assert!(duty.iter().all(Pharmacy::is_on_duty));
    }

    #[test]
    fn curated_join_uses_brand_name() {
        let s = state();
        let record: CatalogRecord =
            serde_json::from_str(r#"{"id": 1, "SPECIALITE": "DOLIPRANE 1000MG"}"#).unwrap();
        assert_eq!(
            s.curated(&record).map(|m| m.name.as_str()),
            Some("Doliprane 1000mg")
        );
    }
}
