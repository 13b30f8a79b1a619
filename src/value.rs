// Copyright 2024-2026 oplog Contributors
// SPDX-License-Identifier: Apache-2.0

//! Call argument and result values.
//!
//! [`CallValue`] is the currency passed through an intercepted operation. Its
//! `Display` output is the bounded summary used in log lines and as the result
//! signature for change detection: collections are reduced to their length and
//! unmodeled types to their type name, so a log line never grows with the size
//! of a payload.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

/// Literal used for absent values.
pub const NULL_TEXT: &str = "(null)";

/// A value crossing an intercepted call boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum CallValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Text(String),
    /// Fixed-point decimal: `mantissa * 10^-scale`.
    Decimal { mantissa: i128, scale: u32 },
    List(Vec<CallValue>),
    /// Enumerated value, summarized by its symbolic name.
    Symbol { type_name: String, name: String },
    Date(NaiveDateTime),
    /// Value of a type with no textual model; only its type name is shown.
    Opaque { type_name: String },
}

impl CallValue {
    pub fn symbol(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Symbol {
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    /// Opaque placeholder for a value of type `T`.
    pub fn opaque<T: ?Sized>() -> Self {
        Self::Opaque {
            type_name: std::any::type_name::<T>().to_string(),
        }
    }

    /// Opaque placeholder taking the type from a value.
    pub fn opaque_of<T: ?Sized>(_value: &T) -> Self {
        Self::opaque::<T>()
    }

    /// Fixed-point decimal; scales above [`MAX_DECIMAL_SCALE`] are truncated.
    pub fn decimal(mantissa: i128, scale: u32) -> Self {
        let (mantissa, scale) = clamp_decimal(mantissa, scale);
        Self::Decimal { mantissa, scale }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Bounded textual summary of this value.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

/// Largest decimal scale kept; extra fractional digits are truncated.
pub const MAX_DECIMAL_SCALE: u32 = 28;

/// Truncate `mantissa * 10^-scale` to at most [`MAX_DECIMAL_SCALE`] digits.
fn clamp_decimal(mantissa: i128, scale: u32) -> (i128, u32) {
    if scale <= MAX_DECIMAL_SCALE {
        return (mantissa, scale);
    }
    let excess = scale - MAX_DECIMAL_SCALE;
    // 10^39 overflows i128, and every i128 has at most 39 digits.
    let mantissa = if excess > 38 {
        0
    } else {
        mantissa / 10i128.pow(excess)
    };
    (mantissa, MAX_DECIMAL_SCALE)
}

fn write_decimal(f: &mut fmt::Formatter<'_>, mantissa: i128, scale: u32) -> fmt::Result {
    let (mantissa, scale) = clamp_decimal(mantissa, scale);
    if scale == 0 {
        return write!(f, "{}", mantissa);
    }
    let scale = scale as usize;
    let mut digits = mantissa.unsigned_abs().to_string();
    if digits.len() <= scale {
        let zeros = "0".repeat(scale + 1 - digits.len());
        digits.insert_str(0, &zeros);
    }
    let sign = if mantissa < 0 { "-" } else { "" };
    let (int_part, frac_part) = digits.split_at(digits.len() - scale);
    write!(f, "{}{}.{}", sign, int_part, frac_part)
}

impl fmt::Display for CallValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str(NULL_TEXT),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Char(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
            Self::Decimal { mantissa, scale } => write_decimal(f, *mantissa, *scale),
            Self::List(items) => write!(f, "{} items", items.len()),
            Self::Symbol { name, .. } => f.write_str(name),
            Self::Date(v) => write!(f, "{}", v.date().format("%Y-%m-%d")),
            Self::Opaque { type_name } => f.write_str(type_name),
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for CallValue {
            fn from(v: $t) -> Self {
                Self::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for CallValue {
            fn from(v: $t) -> Self {
                Self::UInt(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<bool> for CallValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f32> for CallValue {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for CallValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<char> for CallValue {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl From<String> for CallValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for CallValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<NaiveDateTime> for CallValue {
    fn from(v: NaiveDateTime) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveDate> for CallValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v.and_time(chrono::NaiveTime::MIN))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for CallValue {
    fn from(v: DateTime<Tz>) -> Self {
        Self::Date(v.naive_local())
    }
}

impl<T: Into<CallValue>> From<Option<T>> for CallValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<CallValue>> From<Vec<T>> for CallValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<()> for CallValue {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[derive(Debug)]
    enum Color {
        Red,
    }

    struct Account {
        _balance: u64,
    }

    #[test]
    fn test_null_summary() {
        assert_eq!(CallValue::Null.describe(), "(null)");
        assert_eq!(CallValue::from(None::<i32>).describe(), "(null)");
        assert_eq!(CallValue::from(()).describe(), "(null)");
    }

    #[test]
    fn test_scalar_summaries() {
        assert_eq!(CallValue::from(42).describe(), "42");
        assert_eq!(CallValue::from(-7i64).describe(), "-7");
        assert_eq!(CallValue::from(3u8).describe(), "3");
        assert_eq!(CallValue::from(true).describe(), "true");
        assert_eq!(CallValue::from(2.5).describe(), "2.5");
        assert_eq!(CallValue::from('x').describe(), "x");
        assert_eq!(CallValue::from("hello").describe(), "hello");
        assert_eq!(CallValue::from(Some("a")).describe(), "a");
    }

    #[test]
    fn test_decimal_keeps_scale() {
        assert_eq!(CallValue::decimal(150, 2).describe(), "1.50");
        assert_eq!(CallValue::decimal(-12345, 3).describe(), "-12.345");
        assert_eq!(CallValue::decimal(5, 3).describe(), "0.005");
        assert_eq!(CallValue::decimal(-5, 1).describe(), "-0.5");
        assert_eq!(CallValue::decimal(42, 0).describe(), "42");
    }

    #[test]
    fn test_decimal_scale_is_bounded() {
        assert_eq!(
            CallValue::decimal(1, 30),
            CallValue::Decimal {
                mantissa: 0,
                scale: MAX_DECIMAL_SCALE
            }
        );
        assert_eq!(
            CallValue::decimal(12_345, 30).describe(),
            "0.0000000000000000000000000123"
        );
        assert_eq!(
            CallValue::decimal(1, 50_000_000).describe(),
            format!("0.{}", "0".repeat(28))
        );

        // Variants built directly are clamped when rendered.
        let raw = CallValue::Decimal {
            mantissa: i128::MIN,
            scale: u32::MAX,
        };
        assert_eq!(raw.describe(), format!("0.{}", "0".repeat(28)));
        let raw = CallValue::Decimal {
            mantissa: -10_i128.pow(29),
            scale: 70_000,
        };
        assert!(raw.describe().len() <= 2 + 28 + 40);
    }

    #[test]
    fn test_list_is_counted_not_expanded() {
        assert_eq!(CallValue::from(Vec::<i32>::new()).describe(), "0 items");
        assert_eq!(CallValue::from(vec!["a", "b", "c"]).describe(), "3 items");

        let big: Vec<u32> = (0..10_000).collect();
        assert_eq!(CallValue::from(big).describe(), "10000 items");
    }

    #[test]
    fn test_symbol_uses_name() {
        let value = CallValue::symbol("Color", format!("{:?}", Color::Red));
        assert_eq!(value.describe(), "Red");
    }

    #[test]
    fn test_date_drops_time_of_day() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(17, 45, 12)
            .unwrap();
        assert_eq!(CallValue::from(dt).describe(), "2024-03-09");

        let day = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        assert_eq!(CallValue::from(day).describe(), "1999-12-31");

        let utc = Utc.with_ymd_and_hms(2020, 1, 2, 23, 59, 59).unwrap();
        assert_eq!(CallValue::from(utc).describe(), "2020-01-02");
    }

    #[test]
    fn test_opaque_uses_type_name_only() {
        let account = Account { _balance: 1_000_000 };
        let value = CallValue::opaque_of(&account);
        let text = value.describe();
        assert!(text.ends_with("Account"), "got {}", text);
        assert!(!text.contains("1000000"));
    }
}
