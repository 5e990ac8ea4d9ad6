use std::{
    env,
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    process::exit,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use tally_rs::{AppState, build_router, graceful_shutdown, logging_middleware};

/// The web server for tally_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The address to serve the application from.
    #[arg(short, long, default_value = "127.0.0.1")]
    address: IpAddr,

    /// The port to serve the application from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// File path to write debug logs to.
    #[arg(long, default_value = "debug.log")]
    log_path: String,

    /// Log the body of every request and response.
    #[arg(long)]
    log_bodies: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logging(&args.log_path);

    let secret = match env::var("SECRET") {
        Ok(secret) => secret,
        Err(_) => {
            tracing::error!("The environment variable 'SECRET' must be set");
            exit(1);
        }
    };

    let conn = match Connection::open(&args.db_path) {
        Ok(conn) => conn,
        Err(error) => {
            tracing::error!("Could not open the database at {}: {error}", args.db_path);
            exit(1);
        }
    };

    let state = match AppState::new(conn, &secret) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not initialize the application: {error}");
            exit(1);
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state);
    let router = if args.log_bodies {
        router.layer(middleware::from_fn(logging_middleware))
    } else {
        router
    };
    let router = add_tracing_layer(router);

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let addr = SocketAddr::from((args.address, args.port));
    tracing::info!("HTTP server listening on {}", addr);

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server stopped with an error: {error}");
        exit(1);
    }
}

fn setup_logging(log_path: &str) {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let debug_log = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(log_file) => Some(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_writer(Arc::new(log_file))
                .with_filter(filter::LevelFilter::DEBUG),
        ),
        Err(error) => {
            eprintln!("Could not open log file {log_path}: {error}");
            None
        }
    };

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
