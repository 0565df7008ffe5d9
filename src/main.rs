mod bridge_registry;
mod bridge_text;
mod config;
mod coordinator;
mod eta;
mod geometry;
mod ingress;
mod logging;
mod metrics;
mod orchestrator;
mod stallbacka;
mod timers;
mod utilities;
mod vessel;
mod vessel_engine;
mod web;

use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tokio::time;
use tracing::{error, info, warn};

use config::Config;
use ingress::{is_structurally_valid, PositionReportReader};
use metrics::MetricsLogger;
use orchestrator::Orchestrator;

const HOUSEKEEPING_INTERVAL: Duration = Duration::from_secs(10);
const METRICS_LOG_INTERVAL: Duration = Duration::from_secs(60);
const WEB_PORT: u16 = 8088;

#[tokio::main]
async fn main() {
    let config = load_config();

    let _log_guard = logging::init(&config.logging);
    info!("ais-bridge-monitor starting");

    let registry = bridge_registry::BridgeRegistry::from_config(&config);
    let validation = registry.validate();
    if !validation.ok {
        for err in &validation.errors {
            error!(%err, "bridge configuration error");
        }
        std::process::exit(1);
    }

    let start = Instant::now();
    let orchestrator = Arc::new(Mutex::new(Orchestrator::new(config, start)));

    let web_orchestrator = orchestrator.clone();
    tokio::spawn(async move {
        if let Err(e) = web::server::start_web_server(web_orchestrator, WEB_PORT).await {
            error!(error = %e, "web status server exited");
        }
    });

    let housekeeping_orchestrator = orchestrator.clone();
    tokio::spawn(async move {
        let mut ticker = time::interval(HOUSEKEEPING_INTERVAL);
        let mut metrics_logger = MetricsLogger::new(METRICS_LOG_INTERVAL);
        loop {
            ticker.tick().await;
            let mut orch = housekeeping_orchestrator.lock().await;
            orch.housekeep(Instant::now());
            metrics_logger.check_and_log(&mut orch.metrics);
        }
    });

    run_ingress_loop(orchestrator).await;
}

fn load_config() -> Config {
    match env::var("AIS_BRIDGE_MONITOR_CONFIG") {
        Ok(path) => Config::from_file(&path).unwrap_or_else(|e| {
            eprintln!("failed to load config from {}: {}, using defaults", path, e);
            Config::default()
        }),
        Err(_) => Config::default(),
    }
}

async fn run_ingress_loop(orchestrator: Arc<Mutex<Orchestrator>>) {
    let reader = BufReader::new(stdin());
    let mut reports = PositionReportReader::new(reader);

    loop {
        match reports.next_report().await {
            Ok(Some(report)) => {
                if !is_structurally_valid(&report) {
                    warn!(mmsi = %report.mmsi, "dropping structurally invalid report");
                    continue;
                }
                let now = Instant::now();
                let mut orch = orchestrator.lock().await;
                if let Some(text) = orch.handle_report(&report.mmsi, &report, now) {
                    info!(bridge_text = %text, "bridge text updated");
                }
            }
            Ok(None) => {
                info!("ingress stream closed, shutting down");
                break;
            }
            Err(e) => {
                error!(error = ?e, "ingress read error, shutting down");
                break;
            }
        }
    }

    orchestrator.lock().await.shutdown();
}
