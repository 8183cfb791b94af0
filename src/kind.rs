//! Host-declared argument types and the numeric kinds the aggregate accepts.
//!
//! The host describes the argument of `min_to_max(...)` with a [`SqlType`].
//! Only five of those resolve to a [`NumericKind`]; everything else is
//! rejected before any value is stored.
//!
//! ```
//! use min_to_max::{NumericKind, SqlType};
//!
//! let ty: SqlType = "double precision".parse().unwrap();
//! assert_eq!(NumericKind::try_from(&ty).unwrap(), NumericKind::Float8);
//! assert!(NumericKind::try_from(&SqlType::named("text")).is_err());
//! ```

use crate::error::AggError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Human-readable list of accepted types, used in error messages.
pub const SUPPORTED_TYPES: &str = "SMALLINT, INTEGER, BIGINT, REAL, or DOUBLE PRECISION";

/// The argument type as declared by the host.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    SmallInt,
    Integer,
    BigInt,
    Real,
    DoublePrecision,
    /// Any other resolvable type, stored by lower-cased name.
    Named(String),
    /// The host could not resolve the argument type.
    Unknown,
}

impl SqlType {
    /// A non-numeric type by name, e.g. `text` or `numeric`.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into().to_ascii_lowercase())
    }

    /// Whether this type maps onto one of the supported [`NumericKind`]s.
    pub fn is_supported(&self) -> bool {
        NumericKind::try_from(self).is_ok()
    }
}

impl FromStr for SqlType {
    type Err = std::convert::Infallible;

    /// Parse a SQL type name or one of its common aliases. Unrecognized names
    /// become [`SqlType::Named`]; an empty name is [`SqlType::Unknown`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();
        Ok(match norm.as_str() {
            "" => SqlType::Unknown,
            "int2" | "smallint" => SqlType::SmallInt,
            "int4" | "int" | "integer" => SqlType::Integer,
            "int8" | "bigint" => SqlType::BigInt,
            "float4" | "real" => SqlType::Real,
            "float8" | "double precision" | "float" => SqlType::DoublePrecision,
            _ => SqlType::Named(norm),
        })
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::SmallInt => f.write_str("smallint"),
            SqlType::Integer => f.write_str("integer"),
            SqlType::BigInt => f.write_str("bigint"),
            SqlType::Real => f.write_str("real"),
            SqlType::DoublePrecision => f.write_str("double precision"),
            SqlType::Named(name) => f.write_str(name),
            SqlType::Unknown => f.write_str("unknown"),
        }
    }
}

/// One of the five fixed-width numeric representations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NumericKind {
    /// 16-bit signed integer (`SMALLINT`).
    Int2,
    /// 32-bit signed integer (`INTEGER`).
    Int4,
    /// 64-bit signed integer (`BIGINT`).
    Int8,
    /// 32-bit IEEE float (`REAL`).
    Float4,
    /// 64-bit IEEE float (`DOUBLE PRECISION`).
    Float8,
}

impl NumericKind {
    /// The SQL spelling of this kind.
    pub fn sql_name(self) -> &'static str {
        match self {
            NumericKind::Int2 => "SMALLINT",
            NumericKind::Int4 => "INTEGER",
            NumericKind::Int8 => "BIGINT",
            NumericKind::Float4 => "REAL",
            NumericKind::Float8 => "DOUBLE PRECISION",
        }
    }
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

impl From<NumericKind> for SqlType {
    fn from(kind: NumericKind) -> Self {
        match kind {
            NumericKind::Int2 => SqlType::SmallInt,
            NumericKind::Int4 => SqlType::Integer,
            NumericKind::Int8 => SqlType::BigInt,
            NumericKind::Float4 => SqlType::Real,
            NumericKind::Float8 => SqlType::DoublePrecision,
        }
    }
}

impl TryFrom<&SqlType> for NumericKind {
    type Error = AggError;

    fn try_from(ty: &SqlType) -> Result<Self, Self::Error> {
        match ty {
            SqlType::SmallInt => Ok(NumericKind::Int2),
            SqlType::Integer => Ok(NumericKind::Int4),
            SqlType::BigInt => Ok(NumericKind::Int8),
            SqlType::Real => Ok(NumericKind::Float4),
            SqlType::DoublePrecision => Ok(NumericKind::Float8),
            SqlType::Unknown => Err(AggError::InvalidInputKind {
                detail: "argument type could not be determined".into(),
            }),
            SqlType::Named(_) => Err(AggError::UnsupportedType { found: ty.clone() }),
        }
    }
}
