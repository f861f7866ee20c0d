//! This file defines the incentive-map binary entry point.

use incentive_map::app;
use incentive_map::app_state::AppState;
use incentive_map::cli;
use incentive_map::error;
use incentive_map::metrics;
use incentive_map::server;
use incentive_map::supabase::SupabaseClient;
use incentive_map::tracing;

use std::process::ExitCode;
use std::sync::Arc;

/// Application entry point
#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    tracing::init_tracing(&args);
    if let Err(err) = metrics::register_metrics() {
        error::log_error(&err);
        return ExitCode::FAILURE;
    }
    let client = SupabaseClient::new(&args.supabase_url, &args.supabase_key);
    let state = AppState::load(&client).await;
    let service = app::service(Arc::new(state));
    let result = server::serve(&args, service).await;
    tracing::shutdown_tracing();
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error::log_error(&err);
            ExitCode::FAILURE
        }
    }
}
