// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Safe accessors over loosely typed API objects.
//!
//! Paths are dot separated (`status.loadBalancer.ingress`). A missing key or
//! a value of the wrong shape yields `None`; nothing here panics or errors.

use serde_json::{Map, Value};

/// Walk a dot separated path of object keys
pub fn at<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, key| current.get(key))
}

pub fn str_at<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
    at(value, path)?.as_str()
}

/// Integer read that also accepts float encodings (truncated)
pub fn int_at(value: &Value, path: &str) -> Option<i64> {
    let v = at(value, path)?;
    v.as_i64().or_else(|| v.as_f64().map(|f| f as i64))
}

pub fn bool_at(value: &Value, path: &str) -> Option<bool> {
    at(value, path)?.as_bool()
}

pub fn array_at<'a>(value: &'a Value, path: &str) -> Option<&'a Vec<Value>> {
    at(value, path)?.as_array()
}

pub fn object_at<'a>(value: &'a Value, path: &str) -> Option<&'a Map<String, Value>> {
    at(value, path)?.as_object()
}

/// Object entries of an array, skipping anything that isn't an object
pub fn objects_at<'a>(value: &'a Value, path: &str) -> impl Iterator<Item = &'a Value> + use<'a> {
    array_at(value, path)
        .into_iter()
        .flatten()
        .filter(|entry| entry.is_object())
}

pub fn name(item: &Value) -> String {
    str_at(item, "metadata.name").unwrap_or_default().to_string()
}

pub fn namespace(item: &Value) -> String {
    str_at(item, "metadata.namespace").unwrap_or_default().to_string()
}
