//! Fault-tolerant access to JSON document trees.
//!
//! Readers never fail: a missing key and a value of the wrong type both resolve to the caller's default. Writers produce numbers in the rounding used by every document this crate emits.

use serde_json::{Map, Value};

/// A JSON object, the shape of every document fragment.
pub type Object = Map<String, Value>;

/// Gets a float field, or `default` if it is missing or not a number.
#[must_use]
pub fn get_f32(obj: &Object, key: &str, default: f32) -> f32 {
    obj.get(key)
        .and_then(Value::as_f64)
        .map(|n| n as f32)
        .filter(|n| n.is_finite())
        .unwrap_or(default)
}

/// Gets an integer field, or `default` if it is missing or not a number.
///
/// Fractional numbers are truncated toward zero.
#[must_use]
pub fn get_i32(obj: &Object, key: &str, default: i32) -> i32 {
    match obj.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i32)
            })
            .unwrap_or(default),
        _ => default,
    }
}

/// Gets an optional integer field, `None` if it is missing or not a number.
#[must_use]
pub fn get_opt_i32(obj: &Object, key: &str) -> Option<i32> {
    obj.get(key)
        .filter(|value| value.is_number())
        .map(|_| get_i32(obj, key, 0))
}

/// Gets a boolean field, or `default` if it is missing or not a boolean.
#[must_use]
pub fn get_bool(obj: &Object, key: &str, default: bool) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(default)
}

/// Gets a string field, or an empty string if it is missing or not a string.
#[must_use]
pub fn get_string(obj: &Object, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// Gets a nested object field.
#[must_use]
pub fn get_object<'a>(obj: &'a Object, key: &str) -> Option<&'a Object> {
    obj.get(key).and_then(Value::as_object)
}

/// Iterates the object elements of an array field. Non-object elements and a missing field yield nothing.
pub fn objects<'a>(obj: &'a Object, key: &str) -> impl Iterator<Item = &'a Object> + use<'a> {
    obj.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

/// Gets the elements of an array field, empty if missing.
#[must_use]
pub fn array<'a>(obj: &'a Object, key: &str) -> &'a [Value] {
    obj.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Gets an integer array field, skipping non-integer elements.
#[must_use]
pub fn get_i32_array(obj: &Object, key: &str) -> Vec<i32> {
    array(obj, key)
        .iter()
        .filter_map(Value::as_i64)
        .filter_map(|n| i32::try_from(n).ok())
        .collect()
}

/// Gets a string array field, skipping non-string elements.
#[must_use]
pub fn get_string_array(obj: &Object, key: &str) -> Vec<String> {
    array(obj, key)
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_owned)
        .collect()
}

/// Converts a float into the JSON number written to documents.
///
/// Whole values are written as integers, others are rounded to 3 decimal places. Non-finite values become `0`.
#[must_use]
pub fn number(value: f32) -> Value {
    let value = f64::from(value);
    if !value.is_finite() {
        return Value::from(0);
    }
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        return Value::from(value as i64);
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded.fract() == 0.0 {
        Value::from(rounded as i64)
    } else {
        Value::from(rounded)
    }
}

/// Builds an object from its fields, in the given order.
#[must_use]
pub fn object<'a>(fields: impl IntoIterator<Item = (&'a str, Value)>) -> Object {
    fields
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}

/// A set of top-level field replacements to merge into a base document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    replacements: Vec<(String, Value)>,
}

impl Patch {
    /// Creates an empty patch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            replacements: Vec::new(),
        }
    }

    /// Replaces `key` with `value` on merge. A later replacement of the same key wins.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.replacements.push((key.into(), value.into()));
        self
    }

    /// Keys replaced by this patch, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.replacements.iter().map(|(key, _)| key.as_str())
    }

    /// Merges the replacements into a clone of `base`. `base` itself is left untouched.
    ///
    /// Replaced keys keep their position in `base`; new keys are appended.
    #[must_use]
    pub fn merge_into(&self, base: &Object) -> Object {
        let mut merged = base.clone();
        for (key, value) in &self.replacements {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}
