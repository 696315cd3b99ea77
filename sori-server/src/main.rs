// Sori - Just Run It!
// Launch and it's ready - zero configuration required

use sori_engine::{EngineConfig, EngineHandle, EngineState};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    info!("🚀 Starting Sori...");

    // Create default configuration - everything works out of the box
    let config = create_default_config();
    let engine_config = EngineConfig::from_env();

    // Initialize speech engine
    info!("📦 Initializing {} engine...", engine_config.engine);
    let handle = Arc::new(EngineHandle::initialize(engine_config).await);
    match handle.state() {
        EngineState::Ready => info!("✅ Engine ready: {}", handle.engine_name()),
        EngineState::Failed(reason) => {
            warn!(
                "⚠️  Engine failed to initialize: {}. Requests will get error responses.",
                reason
            );
        }
        _ => {}
    }

    // Start HTTP server
    info!("🌐 Starting HTTP server on {}...", config.http_port);
    let http_server = start_http_server(config.http_port, handle.clone()).await?;
    info!("✅ HTTP server ready on http://localhost:{}", config.http_port);

    // Print ready message
    print_ready_message(&config, &handle);

    // Wait for shutdown signal
    info!("🎯 Sori is ready! Press Ctrl+C to stop.");
    wait_for_shutdown().await;

    // Graceful shutdown
    info!("🛑 Shutting down Sori...");
    shutdown_gracefully(http_server).await?;

    info!("👋 Sori stopped. Goodbye!");
    Ok(())
}

/// Default configuration - everything works out of the box
struct ServerConfig {
    http_port: u16,
}

fn create_default_config() -> ServerConfig {
    let http_port = std::env::var("SORI_PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(5001);

    ServerConfig { http_port }
}

/// Start HTTP server
async fn start_http_server(
    port: u16,
    handle: Arc<EngineHandle>,
) -> anyhow::Result<tokio::task::JoinHandle<()>> {
    use sori_server::http::*;
    use std::net::SocketAddr;

    // Create API state
    let state = ApiState { handle };

    // Create router
    let app = create_router(state);

    // Bind before spawning so a taken port fails startup instead of a detached task
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("✅ HTTP server listening on http://{}", addr);

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP server failed: {}", e);
        }
    });

    Ok(server)
}

/// Print ready message
fn print_ready_message(config: &ServerConfig, handle: &EngineHandle) {
    let engine_status = if handle.is_ready() { "ready" } else { "unavailable" };
    println!();
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║                                                               ║");
    println!("║     ✅  SORI IS READY!  ✅                                   ║");
    println!("║                                                               ║");
    println!("║     🌐 HTTP API:  http://localhost:{}                        ║", config.http_port);
    println!("║     🗣️  Engine:    {} ({})                                   ║", handle.engine_name(), engine_status);
    println!("║                                                               ║");
    println!("║     POST /tts       synthesize text to audio                  ║");
    println!("║     GET  /health    service health                            ║");
    println!("║     GET  /speakers  available speakers                        ║");
    println!("║                                                               ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
}

/// Wait for shutdown signal
async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}

/// Graceful shutdown
async fn shutdown_gracefully(http_server: tokio::task::JoinHandle<()>) -> anyhow::Result<()> {
    use sori_server::http::{
        TOTAL_ERRORS, TOTAL_REQUESTS, TOTAL_SYNTHESES, TOTAL_SYNTHESIS_TIME_MS,
    };
    use std::sync::atomic::Ordering;

    info!("🔄 Stopping services...");

    // Stop HTTP server
    http_server.abort();

    let requests = TOTAL_REQUESTS.load(Ordering::Relaxed);
    let syntheses = TOTAL_SYNTHESES.load(Ordering::Relaxed);
    let errors = TOTAL_ERRORS.load(Ordering::Relaxed);
    let avg_ms = if syntheses > 0 {
        TOTAL_SYNTHESIS_TIME_MS.load(Ordering::Relaxed) as f64 / syntheses as f64
    } else {
        0.0
    };
    info!(
        "📊 Served {} requests: {} syntheses, {} errors, avg {:.1}ms",
        requests, syntheses, errors, avg_ms
    );

    info!("✅ All services stopped");

    Ok(())
}
