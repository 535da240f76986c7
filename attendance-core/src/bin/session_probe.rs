//! Session Probe
//!
//! A minimal harness for exercising the attendance core against a live
//! backend without any UI: loads the registry, opens a session, watches the
//! countdown for a few seconds, then fetches the check-in records and
//! exports the session's code image.
//!
//! Usage:
//!   BACKEND_URL="http://localhost:8080/api" \
//!   USER_ID="admin_user_001" \
//!   PROBE_TITLE="Physics Lecture" \
//!   PROBE_SECTION="A" \
//!   PROBE_MINUTES="5" \
//!   cargo run --bin session_probe

use std::env;
use std::sync::Arc;
use std::time::Duration;

use dotenv::dotenv;

use attendance_core::backend::rest::RestBackend;
use attendance_core::format::format_time;
use attendance_core::qr::CodeRenderer;
use attendance_core::{
    CheckInReconciler, Config, CountdownTicker, NewSession, Section, SessionRegistry,
};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    if config.user_id.is_empty() {
        log::error!("USER_ID must be set");
        std::process::exit(1);
    }

    let backend = Arc::new(
        RestBackend::new(&config).expect("BACKEND_URL must be a valid URL"),
    );

    let title = env::var("PROBE_TITLE").unwrap_or_else(|_| "Probe Session".to_string());
    let section: Section = env::var("PROBE_SECTION")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(Section::All);
    let minutes: u32 = env::var("PROBE_MINUTES")
        .ok()
        .and_then(|m| m.parse().ok())
        .unwrap_or(5);

    // Reconcile against whatever the backend already knows, then open the
    // probe session.
    let mut working = SessionRegistry::new();
    if let Err(e) = working.load(backend.as_ref()).await {
        log::warn!("Failed to load existing sessions: {}", e);
    }
    log::info!("Loaded {} existing sessions", working.len());

    let session = match working
        .create(
            backend.as_ref(),
            NewSession {
                title,
                section,
                duration_minutes: minutes,
            },
        )
        .await
    {
        Ok(s) => s,
        Err(e) => {
            log::error!("Error creating session: {}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "Created session '{}' token={} window={}",
        session.title,
        session.token,
        format_time(session.time_left)
    );

    let registry = SessionRegistry::shared();
    *registry.write() = working;
    let ticker = CountdownTicker::start(registry.clone());

    // Watch the countdown for a few seconds.
    for _ in 0..5 {
        tokio::time::sleep(Duration::from_secs(1)).await;
        for s in registry.read().list() {
            log::info!(
                "  {} [{}] {}",
                s.title,
                s.eligible_section,
                if s.is_active() {
                    format!("Time left: {}", format_time(s.time_left))
                } else {
                    "Expired".to_string()
                }
            );
        }
    }

    // The record list is always the backend's authoritative set.
    let reconciler = CheckInReconciler::new(backend.clone());
    match reconciler.fetch_records(&session.token).await {
        Ok(records) => {
            log::info!("{} students checked in", records.len());
            for record in records {
                log::info!("  {} at {}", record.user_id, record.check_in_time);
            }
        }
        Err(e) => log::error!("Error fetching records: {}", e),
    }

    // Render and export the scannable code.
    match CodeRenderer::new(&config) {
        Ok(renderer) => match renderer.fetch_svg(&session.token).await {
            Ok(svg) => {
                match renderer.export(&svg, &session.title, &session.token, &env::temp_dir()) {
                    Ok(path) => log::info!("Code image exported to {:?}", path),
                    Err(e) => log::error!("{}", e),
                }
            }
            Err(e) => log::error!("{}", e),
        },
        Err(e) => log::error!("{}", e),
    }

    ticker.shutdown().await;
}
