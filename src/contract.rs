//! Tea contract - table, column and type definitions shared by every layer
//!
//! The contract is pure data: it names the `teas` table, its columns and the
//! valid tea type codes. Addressing lives in [`crate::uri`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default content authority, unique to this application.
pub const CONTENT_AUTHORITY: &str = "com.example.android.teainventory";

/// Default URI scheme for content addresses.
pub const CONTENT_SCHEME: &str = "content";

/// Path segment appended to the base URI for the tea collection.
pub const PATH_TEAS: &str = "teas";

/// Name of the database table for teas.
pub const TABLE_NAME: &str = "teas";

/// MIME prefix for an address denoting a set of rows.
pub const DIR_BASE_TYPE: &str = "vnd.android.cursor.dir";

/// MIME prefix for an address denoting a single row.
pub const ITEM_BASE_TYPE: &str = "vnd.android.cursor.item";

/// Columns of the `teas` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeaColumn {
    /// Row id, assigned by the store
    Id,
    /// Non-empty tea name
    Name,
    /// Tea type code, see [`TeaType`]
    Type,
    /// Non-negative unit price
    Price,
    /// Units in stock
    Quantity,
    /// Opaque image reference
    Image,
}

impl TeaColumn {
    /// Column name as stored in SQLite
    pub fn as_str(&self) -> &'static str {
        match self {
            TeaColumn::Id => "id",
            TeaColumn::Name => "name",
            TeaColumn::Type => "type",
            TeaColumn::Price => "price",
            TeaColumn::Quantity => "quantity",
            TeaColumn::Image => "image",
        }
    }

    /// All columns in table order
    pub fn all() -> &'static [TeaColumn] {
        &[
            TeaColumn::Id,
            TeaColumn::Name,
            TeaColumn::Type,
            TeaColumn::Price,
            TeaColumn::Quantity,
            TeaColumn::Image,
        ]
    }
}

impl FromStr for TeaColumn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "id" | "_id" => Ok(TeaColumn::Id),
            "name" => Ok(TeaColumn::Name),
            "type" => Ok(TeaColumn::Type),
            "price" => Ok(TeaColumn::Price),
            "quantity" | "qty" => Ok(TeaColumn::Quantity),
            "image" => Ok(TeaColumn::Image),
            _ => Err(Error::Config(format!("Unknown tea column: {}", s))),
        }
    }
}

impl fmt::Display for TeaColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tea type. Stored as a small integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeaType {
    Black,
    Green,
    Herbal,
}

impl TeaType {
    pub const BLACK: i64 = 0;
    pub const GREEN: i64 = 1;
    pub const HERBAL: i64 = 2;

    /// Storage code for this type
    pub fn code(&self) -> i64 {
        match self {
            TeaType::Black => Self::BLACK,
            TeaType::Green => Self::GREEN,
            TeaType::Herbal => Self::HERBAL,
        }
    }

    /// Map a storage code back to a type
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            Self::BLACK => Some(TeaType::Black),
            Self::GREEN => Some(TeaType::Green),
            Self::HERBAL => Some(TeaType::Herbal),
            _ => None,
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            TeaType::Black => "Black",
            TeaType::Green => "Green",
            TeaType::Herbal => "Herbal",
        }
    }

    pub fn all() -> &'static [TeaType] {
        &[TeaType::Black, TeaType::Green, TeaType::Herbal]
    }
}

/// Returns whether `code` is one of the three valid tea type codes.
pub fn is_valid_type(code: i64) -> bool {
    TeaType::from_code(code).is_some()
}

impl FromStr for TeaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i64>() {
            return TeaType::from_code(code)
                .ok_or_else(|| Error::Config(format!("Unknown tea type code: {}", code)));
        }
        match s.to_lowercase().as_str() {
            "black" => Ok(TeaType::Black),
            "green" => Ok(TeaType::Green),
            "herbal" => Ok(TeaType::Herbal),
            _ => {
                let known = TeaType::all()
                    .iter()
                    .map(|t| t.label().to_lowercase())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(Error::Config(format!("Unknown tea type: {} (expected one of {})", s, known)))
            }
        }
    }
}

impl fmt::Display for TeaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
