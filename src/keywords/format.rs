//! Validator for the `format` keyword. Formats apply to strings only;
//! every other kind passes silently, and unrecognized format names are
//! not validated at all.
use crate::{compilation::SchemaNode, error::ValidationError, helpers};
use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde_json::Value;
use std::{
    net::{Ipv4Addr, Ipv6Addr},
    str::FromStr,
};
use url::Url;

lazy_static::lazy_static! {
    static ref LEAP_SECOND_RE: Regex =
        Regex::new(r"(\d{2}:[0-5]\d:)60").expect("is a valid regex");
    static ref DURATION_RE: Regex = Regex::new(
        r"^P(?:\d+W|(?:\d+Y)?(?:\d+M)?(?:\d+D)?(?:T(?:\d+H)?(?:\d+M)?(?:\d+S)?)?)$"
    )
    .expect("is a valid regex");
    static ref UUID_RE: Regex =
        Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
            .expect("is a valid regex");
    static ref URI_REFERENCE_RE: Regex =
        Regex::new(r"^(\w+:(/?/?))?[^#\\\s]*(#[^\\\s]*)?$").expect("is a valid regex");
    static ref JSON_POINTER_RE: Regex =
        Regex::new(r"^(/(([^/~])|(~[01]))*)*$").expect("is a valid regex");
    static ref RELATIVE_JSON_POINTER_RE: Regex =
        Regex::new(r"^(?:0|[1-9][0-9]*)(?:#|(?:/(?:[^~/]|~0|~1)*)*)$").expect("is a valid regex");
}

pub(crate) fn validate(node: &SchemaNode, instance: &Value) -> Result<(), ValidationError> {
    let string = match instance {
        Value::String(string) => string,
        _ => return Ok(()),
    };
    let format = match &node.format {
        Some(format) => format,
        None => return Ok(()),
    };
    let valid = match format.as_str() {
        "date-time" => is_valid_date_time(string),
        "date" => NaiveDate::parse_from_str(string, "%Y-%m-%d").is_ok(),
        "time" => is_valid_time(string),
        "duration" => is_valid_duration(string),
        "email" | "idn-email" => is_valid_email(string),
        "hostname" => is_valid_hostname(string),
        "idn-hostname" => is_valid_idn_hostname(string),
        "ipv4" => Ipv4Addr::from_str(string).is_ok(),
        "ipv6" => Ipv6Addr::from_str(string).is_ok() && !string.contains('.'),
        "uuid" => UUID_RE.is_match(&string.to_ascii_lowercase()),
        "uri" | "iri" => Url::from_str(string).is_ok(),
        "uri-reference" | "iri-reference" => URI_REFERENCE_RE.is_match(string),
        "uri-template" => is_valid_uri_template(string),
        "json-pointer" => JSON_POINTER_RE.is_match(string),
        "relative-json-pointer" => RELATIVE_JSON_POINTER_RE.is_match(string),
        "regex" => fancy_regex::Regex::new(&helpers::convert_regex(string)).is_ok(),
        _ => true,
    };
    if valid {
        Ok(())
    } else {
        Err(ValidationError::format(instance, format))
    }
}

/// RFC 3339 date-time. A leap second (`:60`) is normalized to `:59`
/// before parsing, and the offsets `24:00` and `00:60` are rejected even
/// though some parsers tolerate them.
fn is_valid_date_time(string: &str) -> bool {
    let normalized = normalize_leap_second(string);
    DateTime::parse_from_rfc3339(&normalized).is_ok() && !has_invalid_offset(&normalized)
}

/// RFC 3339 time, checked by pinning it to an arbitrary date.
fn is_valid_time(string: &str) -> bool {
    let normalized = normalize_leap_second(string);
    let pinned = format!("1970-01-01T{}", normalized);
    DateTime::parse_from_rfc3339(&pinned).is_ok() && !has_invalid_offset(&normalized)
}

fn normalize_leap_second(string: &str) -> String {
    let upper = string.to_ascii_uppercase();
    LEAP_SECOND_RE.replace(&upper, "${1}59").into_owned()
}

fn has_invalid_offset(string: &str) -> bool {
    string.len() >= 5 && (string.ends_with("24:00") || string.ends_with("00:60"))
}

/// ISO 8601 duration per its ABNF; a bare `P` or a trailing `T` carry no
/// components and are rejected.
fn is_valid_duration(string: &str) -> bool {
    DURATION_RE.is_match(string) && string.len() > 1 && !string.ends_with('T')
}

fn is_valid_email(string: &str) -> bool {
    match string.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && local.len() <= 64
                && !local.starts_with('.')
                && !local.ends_with('.')
                && !local.contains(char::is_whitespace)
                && !domain.is_empty()
                && !domain.contains('@')
                && !domain.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Dotted labels of 1-63 characters each, 253 in total.
fn is_valid_hostname(string: &str) -> bool {
    if string.is_empty() || string.chars().count() > 253 {
        return false;
    }
    string.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

/// IDNA lookup with the strict profile: STD3 rules, hyphen, joiner and
/// DNS-length checks.
fn is_valid_idn_hostname(string: &str) -> bool {
    !string.is_empty() && idna::domain_to_ascii_strict(string).is_ok()
}

/// URI templates only need balanced, non-nested braces here.
fn is_valid_uri_template(string: &str) -> bool {
    let mut open = false;
    for c in string.chars() {
        match c {
            '{' => {
                if open {
                    return false;
                }
                open = true;
            }
            '}' => {
                if !open {
                    return false;
                }
                open = false;
            }
            _ => {}
        }
    }
    !open
}
