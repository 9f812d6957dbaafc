use greeter_core::handler::{InvocationRequest, Response, handle};
use std::collections::HashMap;
use std::convert::Infallible;
use tracing::warn;
use warp::Filter;
use warp::http::StatusCode;
use warp::http::header::{HeaderName, HeaderValue};

/// Every method on every path. The URL query string plays the part of the
/// proxy event's `queryStringParameters`.
pub fn greeter()
-> impl Filter<Extract = (warp::http::Response<String>,), Error = Infallible> + Clone {
    warp::any().and(query_params()).map(|params: HashMap<String, String>| {
        let request = InvocationRequest {
            query_string_parameters: Some(params),
        };
        into_http(handle(request))
    })
}

/// Query strings decode leniently: invalid UTF-8 becomes U+FFFD, bare keys get
/// empty values and a repeated key keeps its last value. Anything the decoder
/// still rejects counts as no parameters at all.
fn query_params() -> impl Filter<Extract = (HashMap<String, String>,), Error = Infallible> + Clone {
    warp::query::<HashMap<String, String>>()
        .or(warp::any().map(HashMap::new))
        .unify()
}

fn into_http(response: Response) -> warp::http::Response<String> {
    let mut http = warp::http::Response::new(response.body);

    match StatusCode::from_u16(response.status_code) {
        Ok(status) => *http.status_mut() = status,
        Err(e) => warn!("Dropping invalid status code {}: {}", response.status_code, e),
    }

    let headers = http.headers_mut();
    for (name, value) in response.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!("Dropping invalid header {}: {}", name, value),
        }
    }

    http
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    async fn call(method: &str, path: &str) -> warp::http::Response<warp::hyper::body::Bytes> {
        warp::test::request()
            .method(method)
            .path(path)
            .reply(&greeter())
            .await
    }

    fn body_json(response: &warp::http::Response<warp::hyper::body::Bytes>) -> Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    #[tokio::test]
    async fn test_get_with_name() {
        let response = call("GET", "/?name=Ada").await;

        assert_eq!(response.status(), 200);
        assert_eq!(body_json(&response), json!({"message": "Hello, Ada! new ..."}));
    }

    #[tokio::test]
    async fn test_percent_encoded_name() {
        let response = call("GET", "/greet?name=%CE%A9").await;
        assert_eq!(body_json(&response), json!({"message": "Hello, Ω! new ..."}));
    }

    #[tokio::test]
    async fn test_any_method_and_path_without_query() {
        for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
            let response = call(method, "/some/nested/path").await;

            assert_eq!(response.status(), 200);
            assert_eq!(
                body_json(&response),
                json!({"message": "Hello, stranger! new ..."})
            );
        }
    }

    #[tokio::test]
    async fn test_empty_name_uses_default() {
        let response = call("GET", "/?name=").await;
        assert_eq!(
            body_json(&response),
            json!({"message": "Hello, stranger! new ..."})
        );
    }

    #[tokio::test]
    async fn test_response_headers() {
        let response = call("OPTIONS", "/").await;
        let headers = response.headers();

        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-headers"], "Content-Type");
        assert_eq!(
            headers["access-control-allow-methods"],
            "GET, POST, PUT, DELETE, OPTIONS"
        );
    }

    #[tokio::test]
    async fn test_malformed_query_strings_still_greet() {
        let cases = [
            ("/?name=%FF", "Hello, \u{FFFD}! new ..."),
            ("/?%", "Hello, stranger! new ..."),
            ("/?name", "Hello, stranger! new ..."),
            ("/?name=a&name=b", "Hello, b! new ..."),
            ("/?&&=&", "Hello, stranger! new ..."),
        ];

        for (path, message) in cases {
            let response = call("GET", path).await;

            assert_eq!(response.status(), 200, "{}", path);
            assert_eq!(body_json(&response), json!({ "message": message }), "{}", path);
        }
    }

    #[test]
    fn test_invalid_header_is_dropped() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Bad Header".to_string(), "x".to_string());

        let http = into_http(Response {
            status_code: 200,
            headers,
            body: "{}".to_string(),
        });

        assert_eq!(http.headers().len(), 1);
        assert_eq!(http.body(), "{}");
    }
}
