//! Run the handler once against a sample API Gateway event.
//!
//! ```text
//! COUNTER_BACKEND=memory invoke_local addOneVisitorCount --seed 41
//! DYNAMODB_TABLE_NAME=counts invoke_local events/custom.json
//! ```
//!
//! The first argument is either a path to an event file or the name of one of
//! the bundled `events/sampleEvent_<name>.json` files. `--seed <n>` writes a
//! counter record for the event's page id before invoking.

use std::{env, fs};

use lambda_http::{request::from_str, Error};
use visit_counter::{
    config::Config,
    db::PageCounterRecord,
    dispatch::{InboundRequest, GET_VISITOR_COUNT},
    handler::function_handler,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_http::tracing::init_default_subscriber();

    let mut event_arg = None;
    let mut seed = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                seed = Some(value.parse::<u64>()?);
            }
            _ => event_arg = Some(arg),
        }
    }

    let event_file = match event_arg {
        Some(arg) if arg.ends_with(".json") => arg,
        Some(name) => format!("events/sampleEvent_{name}.json"),
        None => format!("events/sampleEvent_{GET_VISITOR_COUNT}.json"),
    };
    let event = from_str(&fs::read_to_string(&event_file)?)?;

    let state = AppState::new(Config::from_env()?).await;

    if let Some(visit_count) = seed {
        let page_id = InboundRequest::from_request(&event).page_id;
        state
            .db
            .put_counter(&PageCounterRecord {
                pkey_uuid: page_id,
                visit_count,
            })
            .await?;
    }

    let response = function_handler(&state, event).await?;
    println!("{}", response.status().as_u16());
    println!("{}", String::from_utf8_lossy(response.body().as_ref()));

    Ok(())
}
