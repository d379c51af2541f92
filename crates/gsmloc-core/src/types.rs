use serde::{Deserialize, Serialize};

/// Attachment data exactly as the modem reports it.
///
/// `network_code` is `"MCC MNC"` separated by a single space; `lac` and `cid`
/// are hexadecimal digit strings without a prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNetworkInfo {
    pub network_code: String,
    pub lac: String,
    pub cid: String,
}

/// A normalized cell identity, ready to be sent to the lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellIdentity {
    pub mcc: String,
    pub mnc: String,
    pub lac: u32,
    pub cid: u32,
}

/// One of the coordinates a position lookup can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionField {
    Latitude,
    Longitude,
    Altitude,
}

impl PositionField {
    const fn bit(self) -> u8 {
        match self {
            PositionField::Latitude => 0b001,
            PositionField::Longitude => 0b010,
            PositionField::Altitude => 0b100,
        }
    }
}

/// The set of coordinates that were actually populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionFields(u8);

impl PositionFields {
    const ALL: [PositionField; 3] = [
        PositionField::Latitude,
        PositionField::Longitude,
        PositionField::Altitude,
    ];

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, field: PositionField) {
        self.0 |= field.bit();
    }

    #[must_use]
    pub const fn contains(self, field: PositionField) -> bool {
        self.0 & field.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the populated fields in latitude, longitude, altitude order.
    pub fn iter(self) -> impl Iterator<Item = PositionField> {
        Self::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl FromIterator<PositionField> for PositionFields {
    fn from_iter<I: IntoIterator<Item = PositionField>>(iter: I) -> Self {
        let mut fields = Self::empty();
        for field in iter {
            fields.insert(field);
        }
        fields
    }
}

impl Serialize for PositionFields {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for PositionFields {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Vec::<PositionField>::deserialize(deserializer)?;
        Ok(fields.into_iter().collect())
    }
}

/// Coarse confidence classification, ordered from no fix to a detailed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyLevel {
    None,
    Country,
    Region,
    Locality,
    PostalCode,
    Street,
    Detailed,
}

/// Accuracy attached to a position: a level plus metre estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accuracy {
    pub level: AccuracyLevel,
    pub horizontal: f64,
    pub vertical: f64,
}

impl Accuracy {
    #[must_use]
    pub const fn new(level: AccuracyLevel, horizontal: f64, vertical: f64) -> Self {
        Self {
            level,
            horizontal,
            vertical,
        }
    }
}

/// A position estimate produced for a single request.
///
/// Each coordinate is `Some` exactly when its flag is present in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionResult {
    /// Seconds since the Unix epoch, captured when the request started.
    pub timestamp: i64,
    pub fields: PositionFields,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub accuracy: Accuracy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    Available,
    Unavailable,
    Error,
}

impl std::fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderStatus::Available => write!(f, "available"),
            ProviderStatus::Unavailable => write!(f, "unavailable"),
            ProviderStatus::Error => write!(f, "error"),
        }
    }
}
