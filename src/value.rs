//! The instance value model: kind detection, arbitrary-precision number
//! parsing, deep equality for `enum`/`const` and the canonical encoding
//! used by `uniqueItems`.
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;
use serde_json::{Number, Value};
use std::{
    fmt,
    fmt::{Error, Formatter},
    str::FromStr,
};

/// The detected kind of a JSON value. `Integer` is split out of `Number`:
/// a number whose value has no fractional part is detected as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Number,
    Integer,
    Object,
    Array,
    Boolean,
    Null,
    Unknown,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Kind::String => write!(f, "string"),
            Kind::Number => write!(f, "number"),
            Kind::Integer => write!(f, "integer"),
            Kind::Object => write!(f, "object"),
            Kind::Array => write!(f, "array"),
            Kind::Boolean => write!(f, "boolean"),
            Kind::Null => write!(f, "null"),
            Kind::Unknown => write!(f, "unknown"),
        }
    }
}

pub(crate) fn kind_of(value: &Value) -> Kind {
    match value {
        Value::Null => Kind::Null,
        Value::Bool(_) => Kind::Boolean,
        Value::String(_) => Kind::String,
        Value::Array(_) => Kind::Array,
        Value::Object(_) => Kind::Object,
        Value::Number(number) => {
            if is_integer(number) {
                Kind::Integer
            } else {
                Kind::Number
            }
        }
    }
}

/// The lexeme the number was written with; `serde_json` keeps it verbatim
/// under `arbitrary_precision`.
pub(crate) fn lexeme(number: &Number) -> String {
    number.to_string()
}

pub(crate) fn decimal(number: &Number) -> Option<BigDecimal> {
    BigDecimal::from_str(&number.to_string()).ok()
}

pub(crate) fn is_integer(number: &Number) -> bool {
    if number.is_u64() || number.is_i64() {
        return true;
    }
    decimal(number).map_or(false, |value| value.is_integer())
}

/// An exact rational with the same value as the decimal.
pub(crate) fn to_rational(value: &BigDecimal) -> BigRational {
    let (digits, scale) = value.as_bigint_and_exponent();
    if scale >= 0 {
        BigRational::new(digits, num_traits::pow(BigInt::from(10), scale as usize))
    } else {
        BigRational::from_integer(digits * num_traits::pow(BigInt::from(10), (-scale) as usize))
    }
}

/// Structural equality with arbitrary-precision number comparison and
/// key-order-insensitive object comparison.
pub(crate) fn equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => match (decimal(left), decimal(right)) {
            (Some(left), Some(right)) => left == right,
            _ => left.to_string() == right.to_string(),
        },
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len()
                && left.iter().zip(right.iter()).all(|(l, r)| equal(l, r))
        }
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .all(|(key, l)| right.get(key).map_or(false, |r| equal(l, r)))
        }
        (_, _) => left == right,
    }
}

/// Number lexemes are normalized by dropping fractional trailing zeros and
/// a trailing decimal point, so `1.0` and `1.00` collapse to `1`.
pub(crate) fn canonical_number(lexeme: &str) -> String {
    if lexeme.contains('.') && !lexeme.contains(['e', 'E']) {
        lexeme.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        lexeme.to_string()
    }
}

/// The compact, recursively key-sorted encoding used for uniqueness
/// comparisons ("canonical bytes").
pub(crate) fn canonical_string(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(number) => out.push_str(&canonical_number(&number.to_string())),
        Value::String(string) => {
            out.push_str(&serde_json::to_string(string).expect("strings always serialize"))
        }
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (index, key) in keys.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(key).expect("strings always serialize"));
                out.push(':');
                write_canonical(&map[key.as_str()], out);
            }
            out.push('}');
        }
    }
}

/// The uniqueness cache key: detected kind plus canonical encoding. The
/// scanner does not tell integers and numbers apart, so both share the
/// `number` class and `1` equals `1.0`.
pub(crate) fn unique_key(value: &Value) -> String {
    let class = match kind_of(value) {
        Kind::Integer | Kind::Number => "number",
        Kind::String => "string",
        Kind::Object => "object",
        Kind::Array => "array",
        Kind::Boolean => "boolean",
        Kind::Null => "null",
        Kind::Unknown => "unknown",
    };
    format!("{}:{}", class, canonical_string(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(r#""foo""#, Kind::String)]
    #[test_case("1", Kind::Integer)]
    #[test_case("1.0", Kind::Integer; "integral fraction")]
    #[test_case("1e2", Kind::Integer; "integral exponent")]
    #[test_case("1.5", Kind::Number)]
    #[test_case("{}", Kind::Object)]
    #[test_case("[]", Kind::Array)]
    #[test_case("true", Kind::Boolean)]
    #[test_case("null", Kind::Null)]
    fn kind_detection(document: &str, expected: Kind) {
        let value: Value = serde_json::from_str(document).unwrap();
        assert_eq!(kind_of(&value), expected);
    }

    #[test_case("1.0", "1")]
    #[test_case("1.20", "1.2")]
    #[test_case("100", "100"; "integer zeros are kept")]
    #[test_case("0.5", "0.5")]
    fn number_canonicalization(lexeme: &str, expected: &str) {
        assert_eq!(canonical_number(lexeme), expected);
    }

    #[test]
    fn objects_compare_without_key_order() {
        let left = json!({"a": 1, "b": 2});
        let right = json!({"b": 2, "a": 1});
        assert!(equal(&left, &right));
    }

    #[test]
    fn numbers_compare_by_value() {
        let left: Value = serde_json::from_str("1.0").unwrap();
        let right: Value = serde_json::from_str("1").unwrap();
        assert!(equal(&left, &right));
    }

    #[test]
    fn canonical_string_sorts_keys_recursively() {
        let value = json!({"b": {"d": 1.0, "c": 2}, "a": [1, 2]});
        assert_eq!(canonical_string(&value), r#"{"a":[1,2],"b":{"c":2,"d":1}}"#);
    }

    #[test]
    fn unique_keys_fold_number_kinds() {
        let integer: Value = serde_json::from_str("1").unwrap();
        let fraction: Value = serde_json::from_str("1.0").unwrap();
        assert_eq!(unique_key(&integer), unique_key(&fraction));
    }

    #[test]
    fn rational_conversion_is_exact() {
        let value = BigDecimal::from_str("0.1").unwrap();
        let rational = to_rational(&value);
        assert_eq!(rational, BigRational::new(1.into(), 10.into()));
    }
}
