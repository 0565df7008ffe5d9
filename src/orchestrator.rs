//! The Orchestrator: plumbing only. Receives a report, calls
//! the State Engine, consults the Coordinator, invokes the Generator, and
//! publishes the message iff it changed.
//!
//! A straight line from report to publication: read frame, update state,
//! republish iff changed, generalized here to the bridge-text pipeline
//! with an explicit debounce gate instead of an unconditional broadcast.

use std::time::Instant;

use tracing::{info, trace};

use crate::bridge_registry::BridgeRegistry;
use crate::bridge_text::BridgeTextGenerator;
use crate::config::Config;
use crate::coordinator::{PositionAnalysis, SystemCoordinator};
use crate::ingress::PositionReport;
use crate::metrics::EngineMetrics;
use crate::vessel::Confidence;
use crate::vessel_engine::VesselStateEngine;

pub struct Orchestrator {
    config: Config,
    registry: BridgeRegistry,
    engine: VesselStateEngine,
    coordinator: SystemCoordinator,
    generator: BridgeTextGenerator,
    last_published: String,
    pub metrics: EngineMetrics,
}

impl Orchestrator {
    pub fn new(config: Config, now: Instant) -> Self {
        let registry = BridgeRegistry::from_config(&config);
        let coordinator = SystemCoordinator::new(config.timers.coordination_window(), config.timers.bridge_text_debounce(), now);
        Self {
            engine: VesselStateEngine::new(config.clone()),
            config,
            registry,
            coordinator,
            generator: BridgeTextGenerator::new(),
            last_published: String::new(),
            metrics: EngineMetrics::new(),
        }
    }

    /// Ingests one report end to end. Returns `Some(text)` when a new
    /// bridge text was published, `None` when the report was rejected or
    /// publication was debounced.
    pub fn handle_report(&mut self, mmsi: &str, report: &PositionReport, now: Instant) -> Option<String> {
        let snapshot = match self.engine.update(mmsi, report, now) {
            Some(s) => s,
            None => {
                self.metrics.reports_rejected += 1;
                return None;
            }
        };
        self.metrics.reports_ingested += 1;

        let analysis = PositionAnalysis {
            is_gps_jump: snapshot.has_gps_jump_hold(now),
            is_large_move: snapshot.confidence == Confidence::Medium,
            accept_with_caution: false,
        };
        let coordination = self.coordinator.coordinate_position_update(mmsi, &analysis, now);
        let stabilized_status = self.coordinator.coordinate_status_stabilization(snapshot.status, &analysis);
        trace!(mmsi = %mmsi, status = ?stabilized_status, "status stabilization pass");
        self.metrics.gps_jump_holds_active = self.engine.all().iter().filter(|v| v.has_gps_jump_hold(now)).count() as u64;

        let all_vessels = self.engine.all();
        let result = self.generator.generate(&all_vessels, &self.registry, &self.config, now);
        for consumed_mmsi in &result.consumed_holds {
            self.engine.consume_pending_hold(consumed_mmsi);
        }

        let debounce = self.coordinator.should_debounce_bridge_text(now);
        if coordination.should_debounce_text || debounce.should_debounce {
            self.metrics.messages_debounced += 1;
            return None;
        }

        if result.text != self.last_published {
            self.last_published = result.text.clone();
            self.metrics.messages_published += 1;
            info!(bridge_text = %result.text, "published bridge text");
            Some(result.text)
        } else {
            None
        }
    }

    /// Periodic housekeeping: sweeps stale vessels and expired coordinator
    /// timers. Call on a fixed interval from the main loop.
    pub fn housekeep(&mut self, now: Instant) {
        self.engine.sweep_stale(now);
        self.coordinator.cleanup(now);
    }

    pub fn remove_vessel(&mut self, mmsi: &str, reason: &str) {
        self.engine.remove(mmsi, reason);
        self.coordinator.remove_vessel(mmsi);
    }

    pub fn current_bridge_text(&self) -> &str {
        self.generator.last_bridge_text()
    }

    pub fn vessels(&self) -> Vec<crate::vessel::VesselSnapshot> {
        self.engine.all()
    }

    pub fn shutdown(&mut self) {
        self.engine.clear_all_timers();
    }
}
