//! Wire types for the marketplace public API
//!
//! Mirrors the legacy `orders.get` endpoint: a JSON envelope wrapping the
//! competing orders for one (location, algorithm) pair. Prices arrive as
//! strings, so numeric fields use a tolerant deserializer.

use serde::{Deserialize, Serialize};

/// Market region the order is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Europe,
    Usa,
}

impl Location {
    /// Numeric id used in request URLs.
    pub fn wire_id(&self) -> u8 {
        match self {
            Location::Europe => 0,
            Location::Usa => 1,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Europe => write!(f, "europe"),
            Location::Usa => write!(f, "usa"),
        }
    }
}

/// Traded hashing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Scrypt,
    Sha256,
    X11,
    Keccak,
    NeoScrypt,
    Lyra2Rev2,
    DaggerHashimoto,
    CryptoNight,
    Equihash,
}

impl Algorithm {
    /// Numeric id used in request URLs.
    pub fn wire_id(&self) -> u8 {
        match self {
            Algorithm::Scrypt => 0,
            Algorithm::Sha256 => 1,
            Algorithm::X11 => 3,
            Algorithm::Keccak => 5,
            Algorithm::NeoScrypt => 8,
            Algorithm::Lyra2Rev2 => 14,
            Algorithm::DaggerHashimoto => 20,
            Algorithm::CryptoNight => 22,
            Algorithm::Equihash => 24,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Algorithm::Scrypt => "scrypt",
            Algorithm::Sha256 => "sha256",
            Algorithm::X11 => "x11",
            Algorithm::Keccak => "keccak",
            Algorithm::NeoScrypt => "neoscrypt",
            Algorithm::Lyra2Rev2 => "lyra2rev2",
            Algorithm::DaggerHashimoto => "daggerhashimoto",
            Algorithm::CryptoNight => "cryptonight",
            Algorithm::Equihash => "equihash",
        };
        write!(f, "{}", name)
    }
}

/// One competing order in a market snapshot.
///
/// Created fresh on every fetch; carries no identity beyond a single
/// aggregation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetingOrder {
    #[serde(default)]
    pub id: u64,
    /// 0 = standard order, eligible for aggregation; anything else is not.
    #[serde(rename = "type", default)]
    pub order_type: u8,
    /// Current bid price.
    #[serde(default, deserialize_with = "deserialize_f64_from_string_or_number")]
    pub price: f64,
    /// Speed cap the order advertises.
    #[serde(
        rename = "limit_speed",
        default,
        deserialize_with = "deserialize_f64_from_string_or_number"
    )]
    pub limit_speed: f64,
    /// Whether the order is currently active.
    #[serde(default)]
    pub alive: bool,
    /// Number of workers currently fulfilling the order.
    #[serde(default)]
    pub workers: u32,
}

/// Envelope the API wraps every response in.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub result: OrdersResult,
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrdersResult {
    #[serde(default)]
    pub orders: Vec<CompetingOrder>,
    /// Present instead of `orders` when the server rejects the request.
    #[serde(default)]
    pub error: Option<String>,
}

// Custom deserializer for numeric fields the API sends as strings
fn deserialize_f64_from_string_or_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct F64OrString;

    impl<'de> Visitor<'de> for F64OrString {
        type Value = f64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a number or a numeric string")
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v as f64)
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v as f64)
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            v.parse().map_err(de::Error::custom)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(0.0)
        }
    }

    deserializer.deserialize_any(F64OrString)
}
