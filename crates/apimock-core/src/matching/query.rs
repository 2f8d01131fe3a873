//! Query parameter parsing and matching.

use crate::expression::expression_matches;
use crate::types::descriptor::QueryOrExpression;
use serde_json::Value;
use std::collections::HashMap;

/// Parse a query string into a map with URL decoding.
///
/// Repeated keys are joined with commas: `a=1&a=2` yields `a => "1,2"`.
pub fn parse_query_string(query_str: &str) -> HashMap<String, String> {
    let mut result: HashMap<String, String> = HashMap::new();

    for pair in query_str.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode(key);
        let value = decode(value);

        result
            .entry(key)
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    result
}

fn decode(s: &str) -> String {
    let s = s.replace('+', " ");
    urlencoding::decode(&s)
        .map(|v| v.into_owned())
        .unwrap_or(s)
}

/// Query parameters of `url` merged with `explicit` (explicit values win).
pub fn request_query(url: &str, explicit: Option<&HashMap<String, String>>) -> HashMap<String, String> {
    let mut query = url
        .split_once('?')
        .map(|(_, q)| parse_query_string(q.split('#').next().unwrap_or("")))
        .unwrap_or_default();
    if let Some(explicit) = explicit {
        query.extend(explicit.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    query
}

fn split_values(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim)
}

/// Every expected key must be present with a matching value.
///
/// A comma-separated value on either side matches when any of its items does.
fn query_intersects(expected: &HashMap<String, String>, actual: &HashMap<String, String>) -> bool {
    expected.iter().all(|(key, expected_value)| {
        actual.get(key).is_some_and(|actual_value| {
            split_values(expected_value)
                .any(|ev| split_values(actual_value).any(|av| av == ev))
        })
    })
}

/// Query map as JSON for expressions; multi-valued keys become arrays.
fn query_to_value(query: &HashMap<String, String>) -> Value {
    let map = query
        .iter()
        .map(|(key, value)| {
            let value = if value.contains(',') {
                Value::Array(split_values(value).map(|v| Value::String(v.to_string())).collect())
            } else {
                Value::String(value.clone())
            };
            (key.clone(), value)
        })
        .collect();
    Value::Object(map)
}

pub fn query_matches(expected: Option<&QueryOrExpression>, actual: &HashMap<String, String>) -> bool {
    match expected {
        None => true,
        Some(QueryOrExpression::Map(expected)) => query_intersects(expected, actual),
        Some(QueryOrExpression::Expression(expr)) => expression_matches(expr, &query_to_value(actual)),
    }
}
