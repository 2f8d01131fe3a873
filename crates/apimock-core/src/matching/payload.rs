//! Request payload (JSON) matching with deep subset comparison and expressions.

use crate::expression::expression_matches;
use crate::types::descriptor::PayloadOrExpression;
use serde_json::Value;

/// Check if `subset` is contained in `target`.
///
/// Objects match when every key of `subset` matches in `target`; arrays match
/// when every item of `subset` matches some item of `target`. A null or empty
/// object subset matches anything.
pub fn object_intersects(target: Option<&Value>, subset: &Value) -> bool {
    match subset {
        Value::Null => true,
        Value::Object(o) if o.is_empty() => true,
        _ => target.is_some_and(|t| value_intersects(t, subset)),
    }
}

fn value_intersects(target: &Value, subset: &Value) -> bool {
    match (target, subset) {
        (Value::Object(t), Value::Object(s)) => s
            .iter()
            .all(|(k, sv)| t.get(k).is_some_and(|tv| value_intersects(tv, sv))),
        (Value::Array(t), Value::Array(s)) => s
            .iter()
            .all(|sv| t.iter().any(|tv| value_intersects(tv, sv))),
        _ => target == subset,
    }
}

/// Match a request body against the expected payload.
///
/// An expected payload never matches a request without a body.
pub fn payload_matches(expected: Option<&PayloadOrExpression>, actual: Option<&Value>) -> bool {
    match expected {
        None => true,
        Some(PayloadOrExpression::Value(subset)) => object_intersects(actual, subset),
        Some(PayloadOrExpression::Expression(expr)) => {
            actual.is_some_and(|body| expression_matches(expr, body))
        }
    }
}
