//! `${...}` JMESPath expressions used by query and payload matchers.

use jmespath::Variable;
use serde_json::Value;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Extract the JMESPath source from a `${...}` wrapped string.
///
/// Returns `None` for plain strings, which are matched literally.
pub fn unwrap_expression(s: &str) -> Option<&str> {
    s.strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
        .map(str::trim)
}

/// Compile an expression once to check that it parses.
pub fn validate_expression(expression: &str) -> Result<(), String> {
    jmespath::compile(expression)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

fn to_variable(value: &Value) -> Rc<Variable> {
    let var = match value {
        Value::Null => Variable::Null,
        Value::Bool(b) => Variable::Bool(*b),
        Value::Number(n) => Variable::Number(n.clone()),
        Value::String(s) => Variable::String(s.clone()),
        Value::Array(items) => Variable::Array(items.iter().map(to_variable).collect()),
        Value::Object(obj) => Variable::Object(
            obj.iter()
                .map(|(k, v)| (k.clone(), to_variable(v)))
                .collect::<BTreeMap<_, _>>(),
        ),
    };
    Rc::new(var)
}

fn to_value(var: &Variable) -> Option<Value> {
    Some(match var {
        Variable::Null => Value::Null,
        Variable::Bool(b) => Value::Bool(*b),
        Variable::Number(n) => Value::Number(n.clone()),
        Variable::String(s) => Value::String(s.clone()),
        Variable::Array(items) => Value::Array(
            items
                .iter()
                .map(|v| to_value(v))
                .collect::<Option<Vec<_>>>()?,
        ),
        Variable::Object(obj) => Value::Object(
            obj.iter()
                .map(|(k, v)| to_value(v).map(|v| (k.clone(), v)))
                .collect::<Option<serde_json::Map<_, _>>>()?,
        ),
        // Expression references have no JSON form
        Variable::Expref(_) => return None,
    })
}

/// JMESPath truthiness: false, null and empty values are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Evaluate an expression against `data`.
///
/// Returns `None` when the expression does not compile, fails at runtime
/// or yields a value that cannot be represented as JSON.
pub fn evaluate(expression: &str, data: &Value) -> Option<Value> {
    let expr = jmespath::compile(expression).ok()?;
    let data = to_variable(data);
    let result = expr.search(&data).ok()?;
    to_value(&result)
}

/// An expression matches when it evaluates to a truthy value.
pub fn expression_matches(expression: &str, data: &Value) -> bool {
    evaluate(expression, data).is_some_and(|v| is_truthy(&v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("${page == '1'}", Some("page == '1'"))]
    #[case("${ label }", Some("label"))]
    #[case("page", None)]
    #[case("${unterminated", None)]
    #[case("{not}", None)]
    fn test_unwrap_expression(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(unwrap_expression(input), expected);
    }

    #[rstest]
    #[case(json!(true), true)]
    #[case(json!(false), false)]
    #[case(Value::Null, false)]
    #[case(json!(0), false)]
    #[case(json!(2), true)]
    #[case(json!(""), false)]
    #[case(json!("x"), true)]
    #[case(json!([]), false)]
    #[case(json!([1]), true)]
    #[case(json!({}), false)]
    #[case(json!({"a": 1}), true)]
    fn test_is_truthy(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_truthy(&value), expected);
    }

    #[rstest]
    #[case("label", Some(json!("Default")))]
    #[case("scope_list[0]", Some(json!("project:read")))]
    #[case("scope_list[1]", Some(json!("org:read")))]
    #[case("missing", Some(Value::Null))]
    #[case("[broken", None)]
    fn test_evaluate(#[case] expression: &str, #[case] expected: Option<Value>) {
        let data = json!({
            "label": "Default",
            "scope_list": ["project:read", "org:read"]
        });
        assert_eq!(evaluate(expression, &data), expected);
    }

    #[rstest]
    #[case("contains(scope_list, 'org:read')", true)]
    #[case("contains(scope_list, 'org:admin')", false)]
    #[case("[broken", false)]
    fn test_expression_matches(#[case] expression: &str, #[case] expected: bool) {
        let data = json!({"scope_list": ["project:read", "org:read"]});
        assert_eq!(expression_matches(expression, &data), expected);
    }

    #[rstest]
    fn test_validate_expression() {
        assert!(validate_expression("label == 'x'").is_ok());
        assert!(validate_expression("[broken").is_err());
    }
}
