//! Record → display tokens. Pure functions, no I/O.
//!
//! Status colours live here once; list and detail views both call
//! `status_style` so the two can never disagree.

use crate::protocol::{Coordinates, Pharmacy, PharmacyStatus};

/// Semantic tone, mapped to concrete colours by the UI theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleToken {
    Success,
    Danger,
    Info,
    Warning,
}

pub fn status_style(status: PharmacyStatus) -> StyleToken {
    match status {
        PharmacyStatus::Open => StyleToken::Success,
        PharmacyStatus::Closed => StyleToken::Danger,
        PharmacyStatus::OnDuty => StyleToken::Info,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Alert,
    Check,
}

impl Icon {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Alert => "⚠",
            Self::Check => "✓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrescriptionBadge {
    pub icon: Icon,
    pub tone: StyleToken,
    pub label: &'static str,
}

impl PrescriptionBadge {
    pub fn for_medicine(prescription: bool) -> Self {
        if prescription {
            Self {
                icon: Icon::Alert,
                tone: StyleToken::Warning,
                label: "Médicament sous ordonnance",
            }
        } else {
            Self {
                icon: Icon::Check,
                tone: StyleToken::Success,
                label: "Médicament sans ordonnance",
            }
        }
    }
}

/// "12.50 DH".
pub fn format_price(amount: f64) -> String {
    format!("{:.2} DH", amount)
}

pub fn directions_url(at: Coordinates) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}",
        at.latitude, at.longitude
    )
}

/// Directions link, or `None` when the pharmacy has no position.
pub fn directions_link(pharmacy: &Pharmacy) -> Option<String> {
    pharmacy.coordinates().map(directions_url)
}

/// What the map collaborator needs: a position and a label.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPin {
    pub position: Coordinates,
    pub label: String,
}

pub fn map_pin(pharmacy: &Pharmacy) -> Option<MapPin> {
    pharmacy.coordinates().map(|position| MapPin {
        position,
        label: pharmacy.name.clone(),
    })
}

impl MapPin {
    /// Compact "33.5731, -7.5898" form for text rendering.
    pub fn describe(&self) -> String {
        format!(
            "{:.4}, {:.4}",
            self.position.latitude, self.position.longitude
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Stock;

    fn pharmacy(lat: Option<f64>, lng: Option<f64>) -> Pharmacy {
        Pharmacy {
            id: "p1".to_string(),
            name: "Pharmacie du Port".to_string(),
            address: "Tanger".to_string(),
            phone: "0539000000".to_string(),
            status: PharmacyStatus::OnDuty,
            distance: Some("800 m".to_string()),
            latitude: lat,
            longitude: lng,
            medicines: Stock::Unknown,
        }
    }

    #[test]
    fn status_tones_are_exhaustive() {
        assert_eq!(status_style(PharmacyStatus::Open), StyleToken::Success);
        assert_eq!(status_style(PharmacyStatus::Closed), StyleToken::Danger);
        assert_eq!(status_style(PharmacyStatus::OnDuty), StyleToken::Info);
        let parsed = PharmacyStatus::parse("De Garde").unwrap();
        assert_eq!(status_style(parsed), StyleToken::Info);
    }

    #[test]
    fn prescription_badge() {
        let rx = PrescriptionBadge::for_medicine(true);
        assert_eq!(rx.icon, Icon::Alert);
        assert_eq!(rx.tone, StyleToken::Warning);
        assert_eq!(rx.label, "Médicament sous ordonnance");

        let otc = PrescriptionBadge::for_medicine(false);
        assert_eq!(otc.icon, Icon::Check);
        assert_eq!(otc.tone, StyleToken::Success);
        assert_eq!(otc.label, "Médicament sans ordonnance");
    }

    #[test]
    fn price_has_currency_suffix() {
        assert_eq!(format_price(12.5), "12.50 DH");
        assert_eq!(format_price(0.0), "0.00 DH");
    }

    #[test]
    fn directions_need_both_coordinates() {
        let p = pharmacy(Some(35.78), Some(-5.81));
        assert_eq!(
            directions_link(&p).unwrap(),
            "https://www.google.com/maps/dir/?api=1&destination=35.78,-5.81"
        );
        assert_eq!(directions_link(&pharmacy(None, Some(-5.81))), None);
        assert_eq!(directions_link(&pharmacy(None, None)), None);
    }

    #[test]
    fn map_pin_degrades_without_position() {
        assert!(map_pin(&pharmacy(None, None)).is_none());
        let pin = map_pin(&pharmacy(Some(35.78), Some(-5.81))).unwrap();
        assert_eq!(pin.label, "Pharmacie du Port");
        assert_eq!(pin.describe(), "35.7800, -5.8100");
    }
}
