use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Name used when the caller does not supply a usable `name` parameter.
pub const DEFAULT_NAME: &str = "stranger";

pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// The part of a platform invocation event the greeter reads.
///
/// Proxy events carry many more attributes (path, headers, request context, ...).
/// They are ignored on deserialization.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationRequest {
    /// `None` when the platform sent no parameters, sent `null`, or sent
    /// something that is not a string mapping.
    #[serde(default, deserialize_with = "lenient_query_params")]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

impl InvocationRequest {
    pub fn with_query_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            query_string_parameters: Some(
                params
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(key))
            .map(String::as_str)
    }

    /// The caller supplied `name`, or [`DEFAULT_NAME`] when it is missing or empty.
    pub fn name(&self) -> &str {
        match self.query_param("name") {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_NAME,
        }
    }
}

/// Accepts any JSON value for `queryStringParameters`. Objects keep their
/// string-valued entries; everything else becomes `None`.
fn lenient_query_params<'de, D>(
    deserializer: D,
) -> Result<Option<HashMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => Some(
            map.into_iter()
                .filter_map(|(key, value)| match value {
                    Value::String(s) => Some((key, s)),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

/// The JSON document carried in [`Response::body`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GreetingPayload {
    pub message: String,
}

impl GreetingPayload {
    pub fn for_name(name: &str) -> Self {
        Self {
            message: format!("Hello, {}! new ...", name),
        }
    }

    pub fn to_body(&self) -> String {
        serde_json::json!({ "message": self.message }).to_string()
    }
}

/// Proxy-integration response record returned to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl Response {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

fn cors_json_headers() -> HashMap<String, String> {
    [
        ("Content-Type", "application/json"),
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Headers", "Content-Type"),
        ("Access-Control-Allow-Methods", ALLOWED_METHODS),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Greets the caller named by the `name` query parameter.
///
/// Always answers 200 with a JSON body and open CORS headers. There is no
/// failure path: missing, empty or malformed parameters fall back to
/// [`DEFAULT_NAME`].
pub fn handle(request: InvocationRequest) -> Response {
    let payload = GreetingPayload::for_name(request.name());

    Response {
        status_code: 200,
        headers: cors_json_headers(),
        body: payload.to_body(),
    }
}
