//! Data model shared by the catalog client and the TUI.
//!
//! `CatalogRecord` is the wire shape of `GET /medecines/`; `Medicine` and
//! `Pharmacy` are the curated records of the static directory.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One row of the remote medicine catalog, exactly as served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "CODE", default)]
    pub code: i64,
    #[serde(rename = "SPECIALITE", default, deserialize_with = "null_as_empty")]
    pub specialite: String,
    #[serde(rename = "DOSAGE", default, deserialize_with = "null_as_empty")]
    pub dosage: String,
    #[serde(rename = "FORME", default, deserialize_with = "null_as_empty")]
    pub forme: String,
    #[serde(rename = "PRESENTATION", default, deserialize_with = "null_as_empty")]
    pub presentation: String,
    #[serde(rename = "SUBSTANCE_ACTIVE", default, deserialize_with = "null_as_empty")]
    pub substance_active: String,
    #[serde(
        rename = "CLASSE_THERAPEUTIQUE",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub classe_therapeutique: String,
    /// Public sale price (prix public de vente), in dirhams.
    #[serde(rename = "PPV", default, deserialize_with = "null_as_zero")]
    pub ppv: f64,
    /// Hospital price, in dirhams.
    #[serde(rename = "PH", default, deserialize_with = "null_as_zero")]
    pub ph: f64,
    #[serde(rename = "STATUT_AMM", default, deserialize_with = "null_as_empty")]
    pub statut_amm: String,
    #[serde(
        rename = "STATUT_COMMERCIALISATION",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub statut_commercialisation: String,
}

fn null_as_empty<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

fn null_as_zero<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(de)?.unwrap_or(0.0))
}

/// Curated medicine entry from the static directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub form: String,
    #[serde(default)]
    pub dosage: String,
    /// Pre-formatted, currency included (e.g. "25.00 DH").
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub laboratory: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub prescription: bool,
    /// Display order is insertion order.
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub indications: String,
    /// `None` means no contraindication data, which is not the same as "".
    #[serde(default)]
    pub contraindications: Option<String>,
}

/// Opening status of a pharmacy. Exhaustive: there is no "unknown" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PharmacyStatus {
    Open,
    Closed,
    OnDuty,
}

impl PharmacyStatus {
    /// Canonical display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Ouverte",
            Self::Closed => "Fermée",
            Self::OnDuty => "Garde",
        }
    }

    /// Parse a status label. Both on-duty spellings ("Garde", "De Garde")
    /// normalize to `OnDuty`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "ouverte" => Some(Self::Open),
            "fermée" | "fermee" => Some(Self::Closed),
            "garde" | "de garde" => Some(Self::OnDuty),
            _ => None,
        }
    }
}

impl fmt::Display for PharmacyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for PharmacyStatus {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for PharmacyStatus {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(de)?;
        Self::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("unknown pharmacy status: {:?}", raw))
        })
    }
}

/// Known stock of a pharmacy.
///
/// `Unknown` (no list at all) must not be confused with `Known(vec![])`
/// (a pharmacy that reported an empty stock).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Stock {
    #[default]
    Unknown,
    Known(Vec<Medicine>),
}

impl Stock {
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Exact name match against the known stock. Always false when unknown.
    pub fn contains_named(&self, name: &str) -> bool {
        match self {
            Self::Known(list) => list.iter().any(|m| m.name == name),
            Self::Unknown => false,
        }
    }

    pub fn items(&self) -> Option<&[Medicine]> {
        match self {
            Self::Known(list) => Some(list),
            Self::Unknown => None,
        }
    }

    pub fn len(&self) -> Option<usize> {
        self.items().map(<[Medicine]>::len)
    }
}

impl From<Option<Vec<Medicine>>> for Stock {
    fn from(v: Option<Vec<Medicine>>) -> Self {
        match v {
            Some(list) => Self::Known(list),
            None => Self::Unknown,
        }
    }
}

/// A latitude/longitude pair with both halves present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pharmacy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    pub status: PharmacyStatus,
    /// Opaque, pre-formatted (e.g. "1.2 km"). `None` when unknown.
    #[serde(default)]
    pub distance: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(
        default,
        serialize_with = "stock_ser",
        deserialize_with = "stock_de"
    )]
    pub medicines: Stock,
}

fn stock_ser<S: Serializer>(stock: &Stock, s: S) -> Result<S::Ok, S::Error> {
    stock.items().serialize(s)
}

fn stock_de<'de, D: Deserializer<'de>>(de: D) -> Result<Stock, D::Error> {
    Ok(Option::<Vec<Medicine>>::deserialize(de)?.into())
}

impl Pharmacy {
    /// Both coordinates, or `None` when either is missing or not finite.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) if latitude.is_finite() && longitude.is_finite() => {
                Some(Coordinates {
                    latitude,
                    longitude,
                })
            }
            _ => None,
        }
    }

    pub fn is_on_duty(&self) -> bool {
        self.status == PharmacyStatus::OnDuty
    }
}
