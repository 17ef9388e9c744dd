//! Selection: the record shown in a detail overlay.
//!
//! The overlay slides out rather than unmounting, so `close` keeps the
//! selected record around for the closing frame.

use crate::protocol::{CatalogRecord, Medicine, Pharmacy, PharmacyStatus, Stock};

#[derive(Debug, Clone)]
pub struct Selection<T> {
    selected: Option<T>,
    open: bool,
}

impl<T> Selection<T> {
    pub fn new() -> Self {
        Self {
            selected: None,
            open: false,
        }
    }

    /// Replace whatever was selected and open the overlay.
    pub fn select(&mut self, record: T) {
        self.selected = Some(record);
        self.open = true;
    }

    /// Hide the overlay. The selection stays populated.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.as_ref()
    }

    /// The record to render, only while open.
    pub fn visible(&self) -> Option<&T> {
        if self.open {
            self.selected.as_ref()
        } else {
            None
        }
    }
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The one record a view may have selected at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum Selected {
    Medicine(CatalogRecord),
    Pharmacy(Pharmacy),
}

impl Selected {
    pub fn title(&self) -> &str {
        match self {
            Self::Medicine(m) => &m.specialite,
            Self::Pharmacy(p) => &p.name,
        }
    }
}

/// Catalog medicines a pharmacy does not carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Unavailable<'a> {
    /// The pharmacy reported no stock list; nothing can be said.
    Unknown,
    /// Catalog entries missing from a known stock, in catalog order.
    Listed(Vec<&'a Medicine>),
}

impl<'a> Unavailable<'a> {
    pub fn medicines(&self) -> &[&'a Medicine] {
        match self {
            Self::Unknown => &[],
            Self::Listed(list) => list,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// Names are compared exactly against the pharmacy's stock.
pub fn unavailable_medicines<'a>(catalog: &'a [Medicine], pharmacy: &Pharmacy) -> Unavailable<'a> {
    match &pharmacy.medicines {
        Stock::Unknown => Unavailable::Unknown,
        stock @ Stock::Known(_) => Unavailable::Listed(
            catalog
                .iter()
                .filter(|m| !stock.contains_named(&m.name))
                .collect(),
        ),
    }
}

/// Pharmacies whose known stock includes `name` (case-insensitive).
/// On-duty pharmacies first, then open, then closed; stable otherwise.
pub fn pharmacies_stocking<'a>(pharmacies: &'a [Pharmacy], name: &str) -> Vec<&'a Pharmacy> {
    let wanted = name.trim().to_lowercase();
    let mut hits: Vec<&Pharmacy> = pharmacies
        .iter()
        .filter(|p| {
            p.medicines
                .items()
                .map_or(false, |list| list.iter().any(|m| m.name.to_lowercase() == wanted))
        })
        .collect();
    hits.sort_by_key(|p| match p.status {
        PharmacyStatus::OnDuty => 0,
        PharmacyStatus::Open => 1,
        PharmacyStatus::Closed => 2,
    });
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn med(name: &str) -> Medicine {
        Medicine {
            id: name.to_lowercase(),
            name: name.to_string(),
            form: "Comprimé".to_string(),
            dosage: "500mg".to_string(),
            price: "10.00 DH".to_string(),
            laboratory: String::new(),
            description: String::new(),
            category: String::new(),
            prescription: false,
            alternatives: Vec::new(),
            indications: String::new(),
            contraindications: None,
        }
    }

    fn pharmacy(id: &str, status: PharmacyStatus, medicines: Stock) -> Pharmacy {
        Pharmacy {
            id: id.to_string(),
            name: id.to_string(),
            address: String::new(),
            phone: String::new(),
            status,
            distance: None,
            latitude: None,
            longitude: None,
            medicines,
        }
    }

    #[test]
    fn select_replaces_and_close_keeps() {
        let mut sel = Selection::new();
        assert!(!sel.is_open());
        assert!(sel.selected().is_none());

        sel.select("A");
        sel.select("B");
        assert_eq!(sel.selected(), Some(&"B"));
        assert!(sel.is_open());

        sel.close();
        assert!(!sel.is_open());
        assert_eq!(sel.selected(), Some(&"B"));
        assert_eq!(sel.visible(), None);
    }

    #[test]
    fn medicine_and_pharmacy_share_one_slot() {
        let mut sel = Selection::new();
        sel.select(Selected::Pharmacy(pharmacy(
            "p",
            PharmacyStatus::Open,
            Stock::Unknown,
        )));
        let record: CatalogRecord = serde_json::from_str(r#"{"SPECIALITE": "DOLIPRANE"}"#).unwrap();
        sel.select(Selected::Medicine(record));
        assert_eq!(sel.selected().map(Selected::title), Some("DOLIPRANE"));
        assert!(matches!(sel.visible(), Some(Selected::Medicine(_))));
    }

    #[test]
    fn unavailable_lists_catalog_minus_stock() {
        let catalog = vec![med("M1"), med("M2"), med("M3")];
        let p = pharmacy("p", PharmacyStatus::Open, Stock::Known(vec![med("M1")]));
        let names: Vec<&str> = unavailable_medicines(&catalog, &p)
            .medicines()
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["M2", "M3"]);
    }

    #[test]
    fn unknown_stock_is_reported_as_unknown_not_as_everything_missing() {
        let catalog = vec![med("M1"), med("M2"), med("M3")];
        let p = pharmacy("p", PharmacyStatus::Open, Stock::Unknown);
        let result = unavailable_medicines(&catalog, &p);
        assert_eq!(result, Unavailable::Unknown);
        assert!(result.medicines().is_empty());
    }

    #[test]
    fn known_empty_stock_lists_whole_catalog() {
        let catalog = vec![med("M1"), med("M2")];
        let p = pharmacy("p", PharmacyStatus::Open, Stock::Known(Vec::new()));
        assert_eq!(unavailable_medicines(&catalog, &p).medicines().len(), 2);
    }

    #[test]
    fn stocking_orders_on_duty_first() {
        let pharmacies = vec![
            pharmacy("closed", PharmacyStatus::Closed, Stock::Known(vec![med("Doliprane")])),
            pharmacy("open", PharmacyStatus::Open, Stock::Known(vec![med("Doliprane")])),
            pharmacy("none", PharmacyStatus::OnDuty, Stock::Known(vec![med("Aspro")])),
            pharmacy("unknown", PharmacyStatus::OnDuty, Stock::Unknown),
            pharmacy("duty", PharmacyStatus::OnDuty, Stock::Known(vec![med("Doliprane")])),
        ];
        let ids: Vec<&str> = pharmacies_stocking(&pharmacies, "doliprane")
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["duty", "open", "closed"]);
    }
}
