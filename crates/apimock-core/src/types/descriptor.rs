//! Mock response descriptors registered by test setup.

use crate::expression::unwrap_expression;
use crate::types::method::HttpMethod;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// Status returned when a descriptor does not set one.
pub const DEFAULT_STATUS: u16 = 200;

/// Expected query parameters - either a map (subset match) or an expression string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOrExpression {
    Map(HashMap<String, String>),
    Expression(String),
}

impl Serialize for QueryOrExpression {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            QueryOrExpression::Map(map) => map.serialize(serializer),
            QueryOrExpression::Expression(expr) => format!("${{{expr}}}").serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for QueryOrExpression {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => match unwrap_expression(&s) {
                Some(expr) => Ok(QueryOrExpression::Expression(expr.to_string())),
                None => Err(serde::de::Error::custom(
                    "query string must be an expression like \"${page == '1'}\"",
                )),
            },
            Value::Object(map) => {
                // Scalars are compared in their query-string form
                let mut result = HashMap::with_capacity(map.len());
                for (k, v) in map {
                    let v = match v {
                        Value::String(s) => s,
                        Value::Number(n) => n.to_string(),
                        Value::Bool(b) => b.to_string(),
                        _ => {
                            return Err(serde::de::Error::custom(format!(
                                "query parameter '{k}' must be a scalar"
                            )))
                        }
                    };
                    result.insert(k, v);
                }
                Ok(QueryOrExpression::Map(result))
            }
            _ => Err(serde::de::Error::custom(
                "query must be either an object or an expression string",
            )),
        }
    }
}

/// Expected request body - either a JSON value (deep subset match) or an expression string
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadOrExpression {
    Value(Value),
    Expression(String),
}

impl Serialize for PayloadOrExpression {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PayloadOrExpression::Value(v) => v.serialize(serializer),
            PayloadOrExpression::Expression(expr) => format!("${{{expr}}}").serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for PayloadOrExpression {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if let Value::String(s) = &value {
            if let Some(expr) = unwrap_expression(s) {
                return Ok(PayloadOrExpression::Expression(expr.to_string()));
            }
        }
        Ok(PayloadOrExpression::Value(value))
    }
}

/// A registered (method, url, body) fixture used to answer a mocked request.
///
/// `method` is optional only so that descriptors read from fixture files can be
/// rejected with a precise error; registration fails when it is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockResponse {
    /// URL pattern (supports {param} placeholders)
    #[serde(default)]
    pub url: String,
    /// HTTP method this descriptor answers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    /// Response status code (100-599), 200 when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Response body
    #[serde(default)]
    pub body: Value,
    /// Response headers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Expected values of URL path parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, String>>,
    /// Expected query parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryOrExpression>,
    /// Expected request body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<PayloadOrExpression>,
}

impl MockResponse {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Some(method),
            status: None,
            body: Value::Null,
            headers: None,
            params: None,
            query: None,
            payload: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, query: QueryOrExpression) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_payload(mut self, payload: PayloadOrExpression) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Effective status code.
    pub fn status(&self) -> u16 {
        self.status.unwrap_or(DEFAULT_STATUS)
    }
}
