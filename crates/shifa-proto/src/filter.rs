//! Page-local search.
//!
//! Filtering narrows the page that is already loaded; it never fetches and
//! never looks beyond the current page.

use crate::protocol::{CatalogRecord, Medicine, Pharmacy};

pub trait Searchable {
    /// Case-insensitive substring match. The empty query matches everything.
    fn matches(&self, query: &str) -> bool;
}

/// Lowercased query, or `None` for the identity filter.
fn normalize(query: &str) -> Option<String> {
    if query.is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}

fn any_contains(fields: &[&str], query: &str) -> bool {
    match normalize(query) {
        None => true,
        Some(q) => fields.iter().any(|f| f.to_lowercase().contains(&q)),
    }
}

impl Searchable for CatalogRecord {
    fn matches(&self, query: &str) -> bool {
        any_contains(
            &[self.specialite.as_str(), self.classe_therapeutique.as_str()],
            query,
        )
    }
}

impl Searchable for Medicine {
    fn matches(&self, query: &str) -> bool {
        any_contains(&[self.name.as_str(), self.category.as_str()], query)
    }
}

impl Searchable for Pharmacy {
    fn matches(&self, query: &str) -> bool {
        any_contains(&[self.name.as_str(), self.address.as_str()], query)
    }
}

/// Positions of the items that match, in page order.
pub fn filter_page<T: Searchable>(items: &[T], query: &str) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.matches(query))
        .map(|(i, _)| i)
        .collect()
}

/// Which list an empty result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Medicines,
    Pharmacies,
}

/// Message shown when filtering leaves nothing. Not an error.
pub fn not_found_message(kind: ListKind, query: &str) -> String {
    match kind {
        ListKind::Medicines => format!("Aucun médicament trouvé pour \"{}\"", query),
        ListKind::Pharmacies if query.is_empty() => "Aucune pharmacie trouvée".to_string(),
        ListKind::Pharmacies => format!("Aucune pharmacie trouvée pour \"{}\"", query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{PharmacyStatus, Stock};

    fn record(name: &str, class: &str) -> CatalogRecord {
        CatalogRecord {
            id: 1,
            code: 1,
            specialite: name.to_string(),
            dosage: String::new(),
            forme: String::new(),
            presentation: String::new(),
            substance_active: String::new(),
            classe_therapeutique: class.to_string(),
            ppv: 0.0,
            ph: 0.0,
            statut_amm: String::new(),
            statut_commercialisation: String::new(),
        }
    }

    fn pharmacy(name: &str, address: &str) -> Pharmacy {
        Pharmacy {
            id: name.to_string(),
            name: name.to_string(),
            address: address.to_string(),
            phone: String::new(),
            status: PharmacyStatus::Open,
            distance: None,
            latitude: None,
            longitude: None,
            medicines: Stock::Unknown,
        }
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(record("", "").matches(""));
        assert!(record("DOLIPRANE", "ANTALGIQUE").matches(""));
        assert!(pharmacy("", "").matches(""));
    }

    #[test]
    fn name_or_class_matches_for_records() {
        let r = record("Paracétamol 500mg", "ANTALGIQUES");
        assert!(r.matches("parac"));
        assert!(r.matches("antalg"));
        assert!(!r.matches("xylocaine"));
    }

    #[test]
    fn matching_ignores_case() {
        let r = record("Paracétamol 500mg", "Antalgiques");
        for q in ["parac", "cétamol", "500MG", "antalgiques"] {
            assert_eq!(r.matches(q), r.matches(&q.to_uppercase()), "query {q}");
            assert!(r.matches(q));
        }
        assert!(r.matches("PARACÉTAMOL"));
    }

    #[test]
    fn pharmacies_match_name_or_address() {
        let p = pharmacy("Pharmacie Centrale", "12 Bd Mohammed V, Casablanca");
        assert!(p.matches("centrale"));
        assert!(p.matches("casablanca"));
        assert!(!p.matches("rabat"));
    }

    #[test]
    fn filter_is_a_narrowing_of_the_page() {
        let page = vec![
            record("Amoxil", "ANTIBIOTIQUE"),
            record("Doliprane", "ANTALGIQUE"),
            record("Augmentin", "ANTIBIOTIQUE"),
        ];
        let hits = filter_page(&page, "antibio");
        assert_eq!(hits.len(), 2);
        assert_eq!(page[hits[0]].specialite, "Amoxil");
        assert!(hits.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(filter_page(&page, "").len(), 3);
    }

    #[test]
    fn not_found_echoes_query() {
        assert_eq!(
            not_found_message(ListKind::Medicines, "xylocaine"),
            "Aucun médicament trouvé pour \"xylocaine\""
        );
        assert_eq!(
            not_found_message(ListKind::Pharmacies, ""),
            "Aucune pharmacie trouvée"
        );
        assert_eq!(
            not_found_message(ListKind::Pharmacies, "fès"),
            "Aucune pharmacie trouvée pour \"fès\""
        );
    }
}
