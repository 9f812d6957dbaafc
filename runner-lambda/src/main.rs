use greeter_core::handler::{InvocationRequest, Response, handle};
use greeter_core::telemetry::init_lambda_tracing;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use tracing::{debug, info};

/// Proxy-integration entry point: the event's `queryStringParameters` feed the
/// greeter and the returned record is the platform's HTTP response.
pub async fn lambda_handler(event: LambdaEvent<InvocationRequest>) -> Result<Response, Error> {
    let LambdaEvent {
        payload: request,
        context,
    } = event;
    debug!(request_id = %context.request_id, name = request.name(), "greeting");

    Ok(handle(request))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_lambda_tracing("info");
    info!("Starting greeter on the Lambda runtime");

    lambda_runtime::run(service_fn(lambda_handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_runtime::Context;
    use serde_json::{Value, json};

    fn event(payload: Value) -> LambdaEvent<InvocationRequest> {
        let request: InvocationRequest = serde_json::from_value(payload).unwrap();
        LambdaEvent::new(request, Context::default())
    }

    #[tokio::test]
    async fn test_handler_greets_query_name() {
        let response = lambda_handler(event(json!({
            "httpMethod": "GET",
            "path": "/greet",
            "queryStringParameters": {"name": "Ada"}
        })))
        .await
        .unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, r#"{"message":"Hello, Ada! new ..."}"#);
    }

    #[tokio::test]
    async fn test_handler_tolerates_null_parameters() {
        let response = lambda_handler(event(json!({"queryStringParameters": null})))
            .await
            .unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, r#"{"message":"Hello, stranger! new ..."}"#);
    }

    #[tokio::test]
    async fn test_handler_output_is_proxy_response_json() {
        let response = lambda_handler(event(json!({}))).await.unwrap();
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["statusCode"], json!(200));
        assert_eq!(value["headers"]["Content-Type"], json!("application/json"));
        assert_eq!(
            value["headers"]["Access-Control-Allow-Methods"],
            json!("GET, POST, PUT, DELETE, OPTIONS")
        );
    }
}
