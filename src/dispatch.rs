use lambda_http::{request::RequestContext, Request, RequestExt};

use crate::error::CounterError;

pub const COUNTS_ROUTE: &str = "GET /counts/{page-id}";
pub const FUNC_PARAM: &str = "func";
pub const PAGE_ID_PARAM: &str = "page-id";

pub const GET_VISITOR_COUNT: &str = "getVisitorCount";
pub const ADD_ONE_VISITOR_COUNT: &str = "addOneVisitorCount";

/// The parts of a Lambda event needed to pick an operation.
///
/// Absent fields are empty strings, so an incomplete event simply fails to
/// match instead of failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundRequest {
    pub route_key: String,
    pub function_name: String,
    pub page_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    GetVisitorCount { page_id: String },
    AddOneVisitorCount { page_id: String },
}

impl InboundRequest {
    pub fn new(
        route_key: impl Into<String>,
        function_name: impl Into<String>,
        page_id: impl Into<String>,
    ) -> Self {
        Self {
            route_key: route_key.into(),
            function_name: function_name.into(),
            page_id: page_id.into(),
        }
    }

    pub fn from_request(event: &Request) -> Self {
        let function_name = event
            .query_string_parameters_ref()
            .and_then(|params| params.first(FUNC_PARAM))
            .unwrap_or_default();
        let page_id = event
            .path_parameters_ref()
            .and_then(|params| params.first(PAGE_ID_PARAM))
            .unwrap_or_default();

        Self::new(route_key(event), function_name, page_id)
    }

    /// Match the request against the known `(route, func)` pairs.
    pub fn dispatch(&self) -> Result<Operation, CounterError> {
        if self.route_key != COUNTS_ROUTE || self.page_id.is_empty() {
            return Err(CounterError::RequestNotRecognized);
        }

        let page_id = self.page_id.clone();
        match self.function_name.as_str() {
            GET_VISITOR_COUNT => Ok(Operation::GetVisitorCount { page_id }),
            ADD_ONE_VISITOR_COUNT => Ok(Operation::AddOneVisitorCount { page_id }),
            _ => Err(CounterError::RequestNotRecognized),
        }
    }
}

/// HTTP APIs carry the route key directly; REST APIs only have the method
/// and resource template, which together form the same string.
fn route_key(event: &Request) -> String {
    match event.request_context_ref() {
        Some(RequestContext::ApiGatewayV2(ctx)) => ctx.route_key.clone().unwrap_or_default(),
        Some(RequestContext::ApiGatewayV1(ctx)) => match &ctx.resource_path {
            Some(resource) => format!("{} {resource}", ctx.http_method),
            None => String::new(),
        },
        _ => String::new(),
    }
}
