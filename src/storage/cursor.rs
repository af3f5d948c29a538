//! Lazy query results
//!
//! A [`TeaCursor`] steps a live SQLite statement one row at a time. It is
//! forward-only and cannot be rewound. The statement is finalized as soon as
//! the last row has been read, on [`TeaCursor::close`], or on drop.

use crate::contract::{TeaColumn, TeaType};
use crate::tea::{Tea, ValidationError};
use crate::uri::ContentUri;
use crate::{Error, Result};
use ouroboros::self_referencing;
use rusqlite::types::{Type, Value};
use rusqlite::{Row, Rows, Statement, params_from_iter};
use serde::Serialize;

/// One result row, holding only the columns that were requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeaRow {
    #[serde(skip)]
    columns: Vec<TeaColumn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub tea_type: Option<TeaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    pub image: Option<String>,
}

impl TeaRow {
    /// Columns present in this row, in projection order
    pub fn columns(&self) -> &[TeaColumn] {
        &self.columns
    }

    /// The full record, if every non-optional column was projected
    pub fn to_tea(&self) -> Option<Tea> {
        Some(Tea {
            id: self.id?,
            name: self.name.clone()?,
            tea_type: self.tea_type?,
            price: self.price?,
            quantity: self.quantity?,
            image: self.image.clone(),
        })
    }

    fn from_row(row: &Row<'_>, columns: &[TeaColumn]) -> rusqlite::Result<Self> {
        let mut out = TeaRow {
            columns: columns.to_vec(),
            ..Default::default()
        };

        for (idx, column) in columns.iter().enumerate() {
            match column {
                TeaColumn::Id => out.id = Some(row.get(idx)?),
                TeaColumn::Name => out.name = Some(row.get(idx)?),
                TeaColumn::Type => {
                    let code: i64 = row.get(idx)?;
                    let tea_type = TeaType::from_code(code).ok_or_else(|| {
                        rusqlite::Error::FromSqlConversionFailure(
                            idx,
                            Type::Integer,
                            Box::new(ValidationError::InvalidType(Some(code))),
                        )
                    })?;
                    out.tea_type = Some(tea_type);
                }
                TeaColumn::Price => out.price = Some(row.get(idx)?),
                TeaColumn::Quantity => out.quantity = Some(row.get(idx)?),
                TeaColumn::Image => out.image = row.get(idx)?,
            }
        }

        Ok(out)
    }
}

#[self_referencing]
struct RowStream<'conn> {
    stmt: Statement<'conn>,
    #[borrows(mut stmt)]
    #[not_covariant]
    rows: Rows<'this>,
}

/// Forward-only sequence of [`TeaRow`]s produced by [`crate::TeaStore::query`].
pub struct TeaCursor<'conn> {
    uri: ContentUri,
    columns: Vec<TeaColumn>,
    stream: Option<RowStream<'conn>>,
}

impl<'conn> TeaCursor<'conn> {
    pub(crate) fn open(
        uri: ContentUri,
        columns: Vec<TeaColumn>,
        stmt: Statement<'conn>,
        args: Vec<Value>,
    ) -> Result<Self> {
        let stream = RowStream::try_new(stmt, |stmt| stmt.query(params_from_iter(args)))
            .map_err(|e| Error::storage_at(&uri, e))?;

        Ok(Self {
            uri,
            columns,
            stream: Some(stream),
        })
    }

    /// Address this cursor was queried with
    pub fn uri(&self) -> &ContentUri {
        &self.uri
    }

    /// Projected columns, in order
    pub fn columns(&self) -> &[TeaColumn] {
        &self.columns
    }

    /// False once exhausted, closed, or failed
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Release the underlying statement without reading further rows.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!("Cursor on {} closed early", self.uri);
        }
    }

    /// Read every remaining row as a full [`Tea`]; rows missing projected
    /// columns are skipped.
    pub fn into_teas(self) -> Result<Vec<Tea>> {
        let mut teas = Vec::new();
        for row in self {
            if let Some(tea) = row?.to_tea() {
                teas.push(tea);
            }
        }
        Ok(teas)
    }

    fn next_row(&mut self) -> Result<Option<TeaRow>> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(None);
        };

        let columns = &self.columns;
        let next = stream.with_rows_mut(|rows| match rows.next()? {
            Some(row) => TeaRow::from_row(row, columns).map(Some),
            None => Ok(None),
        });

        match next {
            Ok(Some(row)) => Ok(Some(row)),
            Ok(None) => {
                self.stream = None;
                Ok(None)
            }
            Err(e) => {
                self.stream = None;
                tracing::error!("Failed to read row from {}: {}", self.uri, e);
                Err(Error::storage_at(&self.uri, e))
            }
        }
    }
}

impl Iterator for TeaCursor<'_> {
    type Item = Result<TeaRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

impl std::fmt::Debug for TeaCursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeaCursor")
            .field("uri", &self.uri)
            .field("columns", &self.columns)
            .field("open", &self.is_open())
            .finish()
    }
}
