//! Tea records and the validation rules applied before every write
//!
//! [`Tea`] is a complete row as read back from the store. [`TeaValues`] is
//! the write payload: any subset of columns, used both for inserts (where
//! name and type are required) and partial updates.

use crate::contract::{self, TeaColumn, TeaType};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// Reasons a write payload is rejected before it reaches storage.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("tea requires a name")]
    MissingName,

    #[error("tea requires a valid type, got {0:?}")]
    InvalidType(Option<i64>),

    #[error("tea requires a valid price, got {0}")]
    InvalidPrice(f64),

    #[error("tea quantity must not be negative, got {0}")]
    InvalidQuantity(i64),
}

/// A tea as stored in the `teas` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tea {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub tea_type: TeaType,
    pub price: f64,
    pub quantity: i64,
    /// Opaque locator of the tea's picture
    pub image: Option<String>,
}

/// Column values for an insert or update.
///
/// Unset fields are left out of the statement entirely. `image` uses a
/// nested option so an update can explicitly clear it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeaValues {
    pub name: Option<String>,
    /// Raw type code; checked against [`contract::is_valid_type`]
    pub type_code: Option<i64>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub image: Option<Option<String>>,
}

impl TeaValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn tea_type(self, tea_type: TeaType) -> Self {
        self.type_code(tea_type.code())
    }

    pub fn type_code(mut self, code: i64) -> Self {
        self.type_code = Some(code);
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn image(mut self, image: Option<String>) -> Self {
        self.image = Some(image);
        self
    }

    /// True when no column is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.type_code.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.image.is_none()
    }

    /// Rules for a new row: name and type are required, price and quantity
    /// are checked when present.
    pub fn validate_for_insert(&self) -> Result<(), ValidationError> {
        if self.name.is_none() {
            return Err(ValidationError::MissingName);
        }
        if self.type_code.is_none() {
            return Err(ValidationError::InvalidType(None));
        }
        self.validate_present()
    }

    /// Rules for an update: only the columns present are checked.
    pub fn validate_for_update(&self) -> Result<(), ValidationError> {
        self.validate_present()
    }

    fn validate_present(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::MissingName);
            }
        }

        if let Some(code) = self.type_code {
            if !contract::is_valid_type(code) {
                return Err(ValidationError::InvalidType(Some(code)));
            }
        }

        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                return Err(ValidationError::InvalidPrice(price));
            }
        }

        if let Some(quantity) = self.quantity {
            if quantity < 0 {
                return Err(ValidationError::InvalidQuantity(quantity));
            }
        }

        // Any image reference is accepted, including none.
        Ok(())
    }

    /// Set columns paired with their SQL values, in table order
    pub(crate) fn to_columns(&self) -> Vec<(TeaColumn, Value)> {
        let mut columns = Vec::new();
        if let Some(name) = &self.name {
            columns.push((TeaColumn::Name, Value::Text(name.clone())));
        }
        if let Some(code) = self.type_code {
            columns.push((TeaColumn::Type, Value::Integer(code)));
        }
        if let Some(price) = self.price {
            columns.push((TeaColumn::Price, Value::Real(price)));
        }
        if let Some(quantity) = self.quantity {
            columns.push((TeaColumn::Quantity, Value::Integer(quantity)));
        }
        if let Some(image) = &self.image {
            let value = image.clone().map(Value::Text).unwrap_or(Value::Null);
            columns.push((TeaColumn::Image, value));
        }
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assam() -> TeaValues {
        TeaValues::new()
            .name("Assam")
            .tea_type(TeaType::Black)
            .price(4.50)
            .quantity(12)
    }

    #[test]
    fn test_valid_insert() {
        assert_eq!(assam().validate_for_insert(), Ok(()));
        assert_eq!(assam().image(Some("file:///tmp/assam.png".into())).validate_for_insert(), Ok(()));
    }

    #[test]
    fn test_insert_requires_name() {
        let mut values = assam();
        values.name = None;
        assert_eq!(values.validate_for_insert(), Err(ValidationError::MissingName));
        assert_eq!(assam().name("").validate_for_insert(), Err(ValidationError::MissingName));
        assert_eq!(assam().name("   ").validate_for_insert(), Err(ValidationError::MissingName));
    }

    #[test]
    fn test_insert_requires_valid_type() {
        let mut values = assam();
        values.type_code = None;
        assert_eq!(values.validate_for_insert(), Err(ValidationError::InvalidType(None)));
        assert_eq!(
            assam().type_code(3).validate_for_insert(),
            Err(ValidationError::InvalidType(Some(3)))
        );
    }

    #[test]
    fn test_insert_rejects_negative_price() {
        assert_eq!(
            assam().price(-0.01).validate_for_insert(),
            Err(ValidationError::InvalidPrice(-0.01))
        );
        assert!(assam().price(f64::NAN).validate_for_insert().is_err());
        assert!(assam().price(f64::INFINITY).validate_for_insert().is_err());

        let mut no_price = assam();
        no_price.price = None;
        assert_eq!(no_price.validate_for_insert(), Ok(()));
    }

    #[test]
    fn test_negative_quantity() {
        assert_eq!(
            assam().quantity(-1).validate_for_insert(),
            Err(ValidationError::InvalidQuantity(-1))
        );
        assert_eq!(
            TeaValues::new().quantity(-5).validate_for_update(),
            Err(ValidationError::InvalidQuantity(-5))
        );
    }

    #[test]
    fn test_update_checks_only_present_fields() {
        assert_eq!(TeaValues::new().validate_for_update(), Ok(()));
        assert_eq!(TeaValues::new().quantity(11).validate_for_update(), Ok(()));
        assert_eq!(
            TeaValues::new().name("").validate_for_update(),
            Err(ValidationError::MissingName)
        );
        assert_eq!(
            TeaValues::new().type_code(9).validate_for_update(),
            Err(ValidationError::InvalidType(Some(9)))
        );
    }

    #[test]
    fn test_to_columns_skips_unset() {
        let columns = TeaValues::new().quantity(3).image(None).to_columns();
        assert_eq!(
            columns,
            vec![
                (TeaColumn::Quantity, Value::Integer(3)),
                (TeaColumn::Image, Value::Null),
            ]
        );
        assert!(TeaValues::new().is_empty());
    }
}
