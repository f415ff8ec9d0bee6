//! Cell values for exposure and output tables

use std::fmt;
use std::hash::{Hash, Hasher};

/// A single cell of a loaded table
///
/// CSV text is typed on load: empty cells become `Null`, integral text
/// becomes `Int`, other numbers become `Float`, anything else stays `Str`.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
}

/// Normalized form used for equality and hashing so that `1` and `1.0`
/// land in the same group
#[derive(PartialEq, Eq, Hash)]
enum Canonical<'a> {
    Null,
    Int(i64),
    Float(u64),
    Str(&'a str),
}

impl Value {
    /// Type a raw CSV field
    pub fn parse(field: &str) -> Self {
        let field = field.trim();
        if field.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = field.parse::<i64>() {
            return Value::Int(i);
        }
        match field.parse::<f64>() {
            Ok(f) if f.is_nan() => Value::Null,
            Ok(f) if f.is_finite() => Value::Float(f),
            _ => Value::Str(field.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Integer view; integral floats (e.g. `3.0`) qualify
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 && in_i64_range(*f) => Some(*f as i64),
            _ => None,
        }
    }

    fn canonical(&self) -> Canonical<'_> {
        match self {
            Value::Null => Canonical::Null,
            Value::Int(i) => Canonical::Int(*i),
            Value::Float(f) if f.fract() == 0.0 && in_i64_range(*f) => Canonical::Int(*f as i64),
            Value::Float(f) => Canonical::Float(f.to_bits()),
            Value::Str(s) => Canonical::Str(s),
        }
    }
}

fn in_i64_range(f: f64) -> bool {
    f >= i64::MIN as f64 && f <= i64::MAX as f64
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_types_fields() {
        assert_eq!(Value::parse(""), Value::Null);
        assert_eq!(Value::parse("  "), Value::Null);
        assert!(matches!(Value::parse("42"), Value::Int(42)));
        assert!(matches!(Value::parse("1.5"), Value::Float(_)));
        assert!(matches!(Value::parse("WTC"), Value::Str(_)));
        assert_eq!(Value::parse("NaN"), Value::Null);
        // "inf" is text here, not a number
        assert!(matches!(Value::parse("inf"), Value::Str(_)));
    }

    #[test]
    fn test_integral_float_equals_int() {
        assert_eq!(Value::Float(3.0), Value::Int(3));
        assert_ne!(Value::Float(3.5), Value::Int(3));
        assert_ne!(Value::Str("3".into()), Value::Int(3));

        let mut set = HashSet::new();
        set.insert(Value::Int(7));
        assert!(set.contains(&Value::Float(7.0)));
    }

    #[test]
    fn test_display_round_trips_csv_text() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Int(12).to_string(), "12");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::from("US").to_string(), "US");
    }
}
