use lambda_http::{run, service_fn, Error, Request};
use visit_counter::{config::Config, handler::function_handler, state::AppState};

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_http::tracing::init_default_subscriber();

    let config = Config::from_env()
        .inspect_err(|e| tracing::error!("invalid configuration: {e}"))?;
    let state = AppState::new(config).await;

    run(service_fn(|event: Request| function_handler(&state, event))).await
}
