use lambda_http::{http::header::CONTENT_TYPE, Body, Error, Request, RequestExt, Response};

use crate::{
    counter::{self, OperationResult},
    dispatch::InboundRequest,
    error::CounterError,
    state::AppState,
};

/// Run one invocation: dispatch, execute, and convert every outcome into a
/// response. Only a failure to build the response itself is returned as `Err`.
pub async fn function_handler(
    state: &AppState,
    event: Request,
) -> Result<Response<Body>, Error> {
    let request = InboundRequest::from_request(&event);
    let result = handle(state, &request, &event).await;

    Ok(Response::builder()
        .status(result.status_code)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::Text(result.body))
        .map_err(Box::new)?)
}

async fn handle(state: &AppState, request: &InboundRequest, event: &Request) -> OperationResult {
    let outcome = match request.dispatch() {
        Ok(operation) => counter::execute(state.db.as_ref(), &operation).await,
        Err(err) => Err(err),
    };

    match outcome {
        Ok(visit_count) => {
            tracing::info!(
                page_id = %request.page_id,
                function_name = %request.function_name,
                visit_count,
                "counter request served"
            );
            OperationResult::ok(visit_count)
        }
        Err(err) => {
            log_failure(&err, request, event);
            OperationResult::from(&err)
        }
    }
}

fn log_failure(err: &CounterError, request: &InboundRequest, event: &Request) {
    let path_parameters = event.path_parameters_ref();
    let query_string_parameters = event.query_string_parameters_ref();

    match err {
        CounterError::StoreCommunication { .. } => tracing::error!(
            error_code = err.error_code(),
            error_message = %err.log_message(),
            route_key = %request.route_key,
            ?path_parameters,
            ?query_string_parameters,
            "store request failed"
        ),
        CounterError::RecordNotFound => tracing::info!(
            error_code = err.error_code(),
            page_id = %request.page_id,
            "page id has no counter"
        ),
        _ => tracing::warn!(
            error_code = err.error_code(),
            error_message = %err.log_message(),
            route_key = %request.route_key,
            ?path_parameters,
            ?query_string_parameters,
            "counter request rejected"
        ),
    }
}
