//! The Bridge Text Generator: a deterministic formatter turning the
//! current set of tracked vessels into one Swedish status sentence. This
//! is the hardest and most load-bearing component in the repository;
//! every literal template and priority rule below is pinned by the
//! end-to-end scenario and boundary tests further down in this file.
//!
//! Turns one vessel's kinematic state into a human phrase, generalized
//! into a pure function over the *whole* vessel population with grouping,
//! priority selection, and a multi-template cascade, since one bridge
//! text must summarize every tracked vessel at once.

use std::time::Instant;

use crate::bridge_registry::BridgeRegistry;
use crate::config::Config;
use crate::eta;
use crate::geometry;
use crate::vessel::{HoldState, VesselSnapshot, VesselStatus};

const DEFAULT_MESSAGE: &str = "Inga båtar är i närheten av Klaffbron eller Stridsbergsbron";
const FALLBACK_MESSAGE: &str = "Båtar upptäckta men tid kan ej beräknas";

pub struct BridgeTextGenerator {
    last_bridge_text: String,
}

/// The rendered text plus the MMSIs whose pending-under-bridge hold this
/// call consumed. The caller (orchestrator) feeds these back into
/// [`crate::vessel_engine::VesselStateEngine::consume_pending_hold`] —
/// the generator itself never mutates engine state, only reports which
/// holds it rendered so the engine can retire them.
pub struct GenerateResult {
    pub text: String,
    pub consumed_holds: Vec<String>,
}

impl BridgeTextGenerator {
    pub fn new() -> Self {
        Self {
            last_bridge_text: String::new(),
        }
    }

    pub fn last_bridge_text(&self) -> &str {
        &self.last_bridge_text
    }

    pub fn generate(&mut self, vessels: &[VesselSnapshot], registry: &BridgeRegistry, config: &Config, now: Instant) -> GenerateResult {
        if vessels.is_empty() {
            self.last_bridge_text = DEFAULT_MESSAGE.to_string();
            return GenerateResult {
                text: DEFAULT_MESSAGE.to_string(),
                consumed_holds: Vec::new(),
            };
        }

        let filtered: Vec<&VesselSnapshot> = vessels.iter().filter(|v| !v.has_gps_jump_hold(now)).collect();

        if filtered.is_empty() {
            let text = if !self.last_bridge_text.is_empty() {
                self.last_bridge_text.clone()
            } else {
                DEFAULT_MESSAGE.to_string()
            };
            return GenerateResult {
                text,
                consumed_holds: Vec::new(),
            };
        }

        let groups = group_by_effective_bridge(&filtered, registry);

        let mut consumed_holds = Vec::new();
        let mut phrases: Vec<String> = Vec::new();

        for (target_name, group) in groups {
            if group.is_empty() {
                continue;
            }
            let count = group.len();
            let priority_vessel = select_priority_vessel(&group, registry, &target_name);

            if let Some(phrase) = render_phrase(priority_vessel, &target_name, registry, config, now, &mut consumed_holds) {
                let suffixed = if count > 1 {
                    format!("{}{}", phrase, multi_vessel_suffix(count - 1))
                } else {
                    phrase
                };
                phrases.push(suffixed);
            }
        }

        if phrases.is_empty() {
            let text = FALLBACK_MESSAGE.to_string();
            self.last_bridge_text = text.clone();
            return GenerateResult { text, consumed_holds };
        }

        phrases.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)).then_with(|| a.cmp(b)));
        let text = phrases.join("; ");
        self.last_bridge_text = text.clone();

        GenerateResult { text, consumed_holds }
    }
}

impl Default for BridgeTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_key(phrase: &str) -> u8 {
    if phrase.contains("Klaffbron") {
        0
    } else if phrase.contains("Stridsbergsbron") {
        1
    } else {
        2
    }
}

fn multi_vessel_suffix(extra: usize) -> String {
    if extra == 1 {
        ", ytterligare 1 båt på väg".to_string()
    } else {
        format!(", ytterligare {} båtar på väg", extra)
    }
}

/// Groups vessels by their effective bridge key: prefer `targetBridge`;
/// else `currentBridge` for under-bridge vessels; else `lastPassedBridge`
/// for passed vessels; else drop.
fn group_by_effective_bridge<'a>(
    vessels: &[&'a VesselSnapshot],
    _registry: &BridgeRegistry,
) -> Vec<(String, Vec<&'a VesselSnapshot>)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: std::collections::HashMap<String, Vec<&VesselSnapshot>> = std::collections::HashMap::new();

    for v in vessels {
        let key = if let Some(target) = &v.target_bridge {
            Some(target.clone())
        } else if v.status == VesselStatus::UnderBridge {
            v.current_bridge.clone()
        } else if v.status == VesselStatus::Passed {
            v.last_passed_bridge.clone()
        } else {
            None
        };

        if let Some(key) = key {
            if !groups.contains_key(&key) {
                order.push(key.clone());
            }
            groups.entry(key).or_default().push(v);
        }
    }

    order.into_iter().map(|key| { let g = groups.remove(&key).unwrap_or_default(); (key, g) }).collect()
}

/// Status priority descending, ties by smaller distance to the group's
/// target bridge, then smaller ETA, then stable ascending MMSI so the
/// chosen vessel within a group never flickers between otherwise-equal
/// candidates.
fn select_priority_vessel<'a>(group: &[&'a VesselSnapshot], registry: &BridgeRegistry, target_name: &str) -> &'a VesselSnapshot {
    let inf = f64::INFINITY;
    let target = registry.by_name(target_name);
    let distance_to_target = |v: &VesselSnapshot| -> f64 {
        target
            .and_then(|b| geometry::distance(v.lat, v.lon, b.lat, b.lon))
            .unwrap_or(inf)
    };
    *group
        .iter()
        .min_by(|a, b| {
            b.status
                .priority()
                .cmp(&a.status.priority())
                .then_with(|| distance_to_target(a).partial_cmp(&distance_to_target(b)).unwrap())
                .then_with(|| a.eta_minutes.unwrap_or(inf).partial_cmp(&b.eta_minutes.unwrap_or(inf)).unwrap())
                .then_with(|| a.mmsi.cmp(&b.mmsi))
        })
        .expect("group is non-empty")
}

fn eta_clause(eta_minutes: Option<f64>) -> String {
    match eta_minutes {
        Some(eta) if eta::is_valid(eta) => format!(", beräknad broöppning {}", eta::format(eta)),
        _ => String::new(),
    }
}

/// The ETA phrase alone (no leading label), for templates that already
/// spell out "beräknad broöppning av <Target>" once and just need the
/// trailing "<ETA>" appended.
fn eta_only(eta_minutes: Option<f64>) -> String {
    match eta_minutes {
        Some(eta) if eta::is_valid(eta) => format!(" {}", eta::format(eta)),
        _ => String::new(),
    }
}

/// Renders the phrase for one group's priority vessel. `target_name` is
/// the group's key (usually the vessel's own `targetBridge`). Returns
/// `None` when the cascade finds no applicable template, dropping the
/// group silently.
fn render_phrase(
    v: &VesselSnapshot,
    target_name: &str,
    registry: &BridgeRegistry,
    config: &Config,
    now: Instant,
    consumed_holds: &mut Vec<String>,
) -> Option<String> {
    // Pending under-bridge hold: forces an "opening in progress" phrase
    // ahead of any "just passed" phrase, consumed on use. Checked before
    // the recently-passed template so a fresh passage reads as "opening"
    // on this call and only becomes "precis passerat" on the next one,
    // once the hold has been consumed.
    if let HoldState::PendingUnder { bridge, .. } = &v.hold_state {
        consumed_holds.push(v.mmsi.clone());
        return Some(render_opening_phrase(bridge, target_name, v.eta_minutes, registry));
    }

    if let HoldState::SyntheticUnder { bridge, until } = &v.hold_state {
        if *until > now {
            return Some(render_opening_phrase(bridge, target_name, v.eta_minutes, registry));
        }
    }

    // (a) Recently passed.
    if v.status == VesselStatus::Passed {
        if let (Some(passed_bridge), Some(passed_time)) = (&v.last_passed_bridge, v.last_passed_bridge_time) {
            let age_ms = now.saturating_duration_since(passed_time).as_millis() as u64;
            if age_ms <= config.timers.recent_passage_ms {
                if registry.is_target(passed_bridge) && v.target_bridge.is_none() {
                    return None;
                }
                return Some(format!(
                    "En båt har precis passerat {} på väg mot {}{}",
                    passed_bridge,
                    target_name,
                    eta_clause(v.eta_minutes)
                ));
            }
        }
    }

    let at_intermediate = match &v.current_bridge {
        Some(bridge) => bridge != target_name && v.distance_to_current.unwrap_or(f64::INFINITY) <= config.distances.approach_m,
        None => false,
    };

    if at_intermediate {
        let current = v.current_bridge.as_deref().unwrap();
        if registry.is_special(current) {
            return match v.status {
                VesselStatus::StallbackaWaiting => Some(format!(
                    "En båt åker strax under Stallbackabron på väg mot {}{}",
                    target_name,
                    eta_clause(v.eta_minutes)
                )),
                VesselStatus::UnderBridge => Some(format!(
                    "En båt passerar Stallbackabron på väg mot {}{}",
                    target_name,
                    eta_clause(v.eta_minutes)
                )),
                VesselStatus::Approaching
                    if v.distance_to_current.unwrap_or(0.0) > config.distances.approach_m
                        && v.distance_to_current.unwrap_or(f64::INFINITY) <= config.distances.approaching_m =>
                {
                    Some(format!(
                        "En båt närmar sig Stallbackabron på väg mot {}{}",
                        target_name,
                        eta_clause(v.eta_minutes)
                    ))
                }
                _ => None,
            };
        }

        return match v.status {
            VesselStatus::UnderBridge => Some(format!(
                "Broöppning pågår vid {}, beräknad broöppning av {}{}",
                current,
                target_name,
                eta_only(v.eta_minutes)
            )),
            VesselStatus::Waiting => Some(format!(
                "En båt inväntar broöppning av {} på väg mot {}{}",
                current,
                target_name,
                eta_clause(v.eta_minutes)
            )),
            VesselStatus::Passed => Some(format!("En båt på väg mot {}{}", target_name, eta_clause(v.eta_minutes))),
            _ => Some(format!(
                "En båt vid {} närmar sig {}{}",
                current,
                target_name,
                eta_clause(v.eta_minutes)
            )),
        };
    }

    // (e) Standard single/multi vessel at the group's own bridge.
    // Stallbackabron never opens, so the target here is the bridge itself
    // (both real targets already passed) and the opening-specific
    // templates below don't apply.
    if registry.is_special(target_name) {
        return match v.status {
            VesselStatus::UnderBridge => Some(format!("En båt passerar {}", target_name)),
            VesselStatus::Waiting | VesselStatus::StallbackaWaiting => Some(format!("En båt åker strax under {}", target_name)),
            VesselStatus::Approaching => Some(format!(
                "En båt närmar sig {}{}",
                target_name,
                eta_clause(v.eta_minutes)
            )),
            VesselStatus::EnRoute => v.eta_minutes.map(|_| format!("En båt på väg mot {}{}", target_name, eta_clause(v.eta_minutes))),
            VesselStatus::Passed => None,
        };
    }

    match v.status {
        VesselStatus::UnderBridge => Some(format!("Broöppning pågår vid {}", target_name)),
        VesselStatus::Waiting => Some(format!("En båt inväntar broöppning vid {}", target_name)),
        VesselStatus::Approaching => Some(format!(
            "En båt närmar sig {}{}",
            target_name,
            eta_clause(v.eta_minutes)
        )),
        VesselStatus::EnRoute => v.eta_minutes.map(|_| format!("En båt på väg mot {}{}", target_name, eta_clause(v.eta_minutes))),
        VesselStatus::StallbackaWaiting | VesselStatus::Passed => None,
    }
}

fn render_opening_phrase(bridge: &str, target_name: &str, eta_minutes: Option<f64>, registry: &BridgeRegistry) -> String {
    if registry.is_special(bridge) {
        return format!("En båt passerar Stallbackabron på väg mot {}{}", target_name, eta_clause(eta_minutes));
    }
    if bridge == target_name {
        format!("Broöppning pågår vid {}", target_name)
    } else {
        format!(
            "Broöppning pågår vid {}, beräknad broöppning av {}{}",
            bridge,
            target_name,
            eta_only(eta_minutes)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge_registry::BridgeRegistry;
    use crate::vessel::Confidence;
    use std::time::Duration;

    fn registry() -> BridgeRegistry {
        BridgeRegistry::from_config(&Config::default())
    }

    fn base_vessel(mmsi: &str) -> VesselSnapshot {
        VesselSnapshot {
            mmsi: mmsi.to_string(),
            name: None,
            lat: 58.28,
            lon: 12.30,
            sog: 5.0,
            cog: Some(0.0),
            last_update_time: Instant::now(),
            last_update_at: chrono::Utc::now(),
            current_bridge: None,
            distance_to_current: None,
            target_bridge: None,
            status: VesselStatus::EnRoute,
            eta_minutes: None,
            is_waiting: false,
            confidence: Confidence::High,
            passed_bridges: Vec::new(),
            last_passed_bridge: None,
            last_passed_bridge_time: None,
            hold_state: HoldState::None,
            gps_jump_hold_until: None,
        }
    }

    #[test]
    fn test_scenario_1_no_vessels() {
        let mut gen = BridgeTextGenerator::new();
        let result = gen.generate(&[], &registry(), &Config::default(), Instant::now());
        assert_eq!(result.text, DEFAULT_MESSAGE);
    }

    #[test]
    fn test_scenario_2_approaching_target() {
        let mut gen = BridgeTextGenerator::new();
        let mut v = base_vessel("1");
        v.status = VesselStatus::Approaching;
        v.target_bridge = Some("Stridsbergsbron".to_string());
        v.eta_minutes = Some(4.0);
        let result = gen.generate(&[v], &registry(), &Config::default(), Instant::now());
        assert_eq!(result.text, "En båt närmar sig Stridsbergsbron, beräknad broöppning om 4 minuter");
    }

    #[test]
    fn test_scenario_3_under_intermediate() {
        let mut gen = BridgeTextGenerator::new();
        let mut v = base_vessel("1");
        v.status = VesselStatus::UnderBridge;
        v.current_bridge = Some("Olidebron".to_string());
        v.distance_to_current = Some(10.0);
        v.target_bridge = Some("Klaffbron".to_string());
        v.eta_minutes = Some(9.0);
        let result = gen.generate(&[v], &registry(), &Config::default(), Instant::now());
        assert_eq!(result.text, "Broöppning pågår vid Olidebron, beräknad broöppning av Klaffbron om 9 minuter");
    }

    #[test]
    fn test_scenario_4_waiting_intermediate() {
        let mut gen = BridgeTextGenerator::new();
        let mut v = base_vessel("1");
        v.status = VesselStatus::Waiting;
        v.current_bridge = Some("Olidebron".to_string());
        v.distance_to_current = Some(120.0);
        v.target_bridge = Some("Klaffbron".to_string());
        v.eta_minutes = Some(8.0);
        let result = gen.generate(&[v], &registry(), &Config::default(), Instant::now());
        assert_eq!(
            result.text,
            "En båt inväntar broöppning av Olidebron på väg mot Klaffbron, beräknad broöppning om 8 minuter"
        );
    }

    #[test]
    fn test_scenario_5_pending_hold_then_recently_passed() {
        let mut gen = BridgeTextGenerator::new();
        let now = Instant::now();
        let mut v = base_vessel("1");
        v.status = VesselStatus::Passed;
        v.last_passed_bridge = Some("Klaffbron".to_string());
        v.last_passed_bridge_time = Some(now - Duration::from_millis(15_000));
        v.target_bridge = Some("Stridsbergsbron".to_string());
        v.hold_state = HoldState::PendingUnder {
            bridge: "Klaffbron".to_string(),
            set_at: now,
        };

        let first = gen.generate(&[v.clone()], &registry(), &Config::default(), now);
        assert!(first.text.contains("Broöppning pågår vid Klaffbron"));
        assert_eq!(first.consumed_holds, vec!["1".to_string()]);

        v.hold_state = HoldState::None;
        let second = gen.generate(&[v], &registry(), &Config::default(), now);
        assert!(second.text.contains("En båt har precis passerat Klaffbron på väg mot Stridsbergsbron"));
    }

    #[test]
    fn test_scenario_6_two_groups_klaffbron_first() {
        let mut gen = BridgeTextGenerator::new();
        let mut a = base_vessel("1");
        a.status = VesselStatus::Approaching;
        a.target_bridge = Some("Stridsbergsbron".to_string());
        a.eta_minutes = Some(4.0);

        let mut b = base_vessel("2");
        b.status = VesselStatus::Waiting;
        b.target_bridge = Some("Klaffbron".to_string());

        let result = gen.generate(&[a, b], &registry(), &Config::default(), Instant::now());
        let klaffbron_pos = result.text.find("Klaffbron").unwrap();
        let stridsbergsbron_pos = result.text.find("Stridsbergsbron").unwrap();
        assert!(klaffbron_pos < stridsbergsbron_pos);
        assert!(result.text.contains("; "));
    }

    #[test]
    fn test_gps_jump_hold_filters_vessel() {
        let mut gen = BridgeTextGenerator::new();
        let now = Instant::now();
        let mut v = base_vessel("1");
        v.status = VesselStatus::Approaching;
        v.target_bridge = Some("Klaffbron".to_string());
        v.eta_minutes = Some(2.0);
        v.gps_jump_hold_until = Some(now + Duration::from_secs(5));

        let result = gen.generate(&[v], &registry(), &Config::default(), now);
        assert_eq!(result.text, DEFAULT_MESSAGE);
    }

    #[test]
    fn test_gps_jump_hold_returns_last_text_when_all_filtered() {
        let mut gen = BridgeTextGenerator::new();
        let now = Instant::now();
        let mut stable = base_vessel("1");
        stable.status = VesselStatus::Approaching;
        stable.target_bridge = Some("Klaffbron".to_string());
        stable.eta_minutes = Some(2.0);
        let first = gen.generate(&[stable], &registry(), &Config::default(), now);

        let mut jumpy = base_vessel("2");
        jumpy.gps_jump_hold_until = Some(now + Duration::from_secs(5));
        let second = gen.generate(&[jumpy], &registry(), &Config::default(), now);
        assert_eq!(second.text, first.text);
    }

    #[test]
    fn test_multi_vessel_suffix_singular_and_plural() {
        assert_eq!(multi_vessel_suffix(1), ", ytterligare 1 båt på väg");
        assert_eq!(multi_vessel_suffix(2), ", ytterligare 2 båtar på väg");
    }

    #[test]
    fn test_waiting_at_target_has_no_eta() {
        let mut gen = BridgeTextGenerator::new();
        let mut v = base_vessel("1");
        v.status = VesselStatus::Waiting;
        v.target_bridge = Some("Klaffbron".to_string());
        v.eta_minutes = Some(3.0);
        let result = gen.generate(&[v], &registry(), &Config::default(), Instant::now());
        assert_eq!(result.text, "En båt inväntar broöppning vid Klaffbron");
    }

    #[test]
    fn test_under_target_has_no_eta() {
        let mut gen = BridgeTextGenerator::new();
        let mut v = base_vessel("1");
        v.status = VesselStatus::UnderBridge;
        v.current_bridge = Some("Klaffbron".to_string());
        v.distance_to_current = Some(5.0);
        v.target_bridge = Some("Klaffbron".to_string());
        v.eta_minutes = Some(3.0);
        let result = gen.generate(&[v], &registry(), &Config::default(), Instant::now());
        assert_eq!(result.text, "Broöppning pågår vid Klaffbron");
    }

    #[test]
    fn test_stallbacka_approach_window() {
        let mut gen = BridgeTextGenerator::new();
        let mut v = base_vessel("1");
        v.status = VesselStatus::Approaching;
        v.current_bridge = Some("Stallbackabron".to_string());
        v.distance_to_current = Some(400.0);
        v.target_bridge = Some("Stridsbergsbron".to_string());
        v.eta_minutes = Some(6.0);
        let result = gen.generate(&[v], &registry(), &Config::default(), Instant::now());
        assert_eq!(
            result.text,
            "En båt närmar sig Stallbackabron på väg mot Stridsbergsbron, beräknad broöppning om 6 minuter"
        );
    }

    #[test]
    fn test_stallbacka_waiting_close_phrase() {
        let mut gen = BridgeTextGenerator::new();
        let mut v = base_vessel("1");
        v.status = VesselStatus::StallbackaWaiting;
        v.current_bridge = Some("Stallbackabron".to_string());
        v.distance_to_current = Some(150.0);
        v.target_bridge = Some("Stridsbergsbron".to_string());
        v.eta_minutes = Some(2.0);
        let result = gen.generate(&[v], &registry(), &Config::default(), Instant::now());
        assert_eq!(
            result.text,
            "En båt åker strax under Stallbackabron på väg mot Stridsbergsbron, beräknad broöppning om 2 minuter"
        );
    }

    #[test]
    fn test_multi_vessel_group_appends_suffix() {
        let mut gen = BridgeTextGenerator::new();
        let mut a = base_vessel("1");
        a.status = VesselStatus::Approaching;
        a.target_bridge = Some("Klaffbron".to_string());
        a.eta_minutes = Some(3.0);
        a.distance_to_current = Some(400.0);

        let mut b = base_vessel("2");
        b.status = VesselStatus::EnRoute;
        b.target_bridge = Some("Klaffbron".to_string());
        b.eta_minutes = Some(10.0);

        let result = gen.generate(&[a, b], &registry(), &Config::default(), Instant::now());
        assert!(result.text.ends_with(", ytterligare 1 båt på väg"));
    }

    #[test]
    fn test_recently_passed_skipped_when_target_was_itself_and_no_new_target() {
        let mut gen = BridgeTextGenerator::new();
        let now = Instant::now();
        let mut v = base_vessel("1");
        v.status = VesselStatus::Passed;
        v.last_passed_bridge = Some("Stridsbergsbron".to_string());
        v.last_passed_bridge_time = Some(now - Duration::from_millis(5_000));
        v.target_bridge = None;
        let result = gen.generate(&[v], &registry(), &Config::default(), now);
        assert_eq!(result.text, FALLBACK_MESSAGE);
    }

    #[test]
    fn test_recent_passage_window_boundary() {
        let mut gen = BridgeTextGenerator::new();
        let now = Instant::now();
        let mut at_boundary = base_vessel("1");
        at_boundary.status = VesselStatus::Passed;
        at_boundary.last_passed_bridge = Some("Klaffbron".to_string());
        at_boundary.last_passed_bridge_time = Some(now - Duration::from_millis(60_000));
        at_boundary.target_bridge = Some("Stridsbergsbron".to_string());
        let result = gen.generate(&[at_boundary], &registry(), &Config::default(), now);
        assert!(result.text.contains("precis passerat"));
    }

    #[test]
    fn test_under_stallbackabron_with_no_target_never_says_opening() {
        // Both target bridges already passed: grouped by current_bridge
        // (Stallbackabron), which never opens.
        let mut gen = BridgeTextGenerator::new();
        let mut v = base_vessel("1");
        v.status = VesselStatus::UnderBridge;
        v.current_bridge = Some("Stallbackabron".to_string());
        v.distance_to_current = Some(10.0);
        v.target_bridge = None;
        let result = gen.generate(&[v], &registry(), &Config::default(), Instant::now());
        assert_eq!(result.text, "En båt passerar Stallbackabron");
        assert!(!result.text.contains("Broöppning"));
    }

    #[test]
    fn test_priority_tiebreak_uses_distance_to_target_not_current() {
        let mut gen = BridgeTextGenerator::new();
        // Both vessels share status/ETA; "near" is closer to the target
        // bridge (Stridsbergsbron) but farther from its own current bridge,
        // "far" is the opposite. The tiebreak must pick "near".
        let mut near = base_vessel("near");
        near.status = VesselStatus::Approaching;
        near.target_bridge = Some("Stridsbergsbron".to_string());
        near.current_bridge = Some("Stallbackabron".to_string());
        near.distance_to_current = Some(50.0);
        near.lat = 58.2985;
        near.lon = 12.2805;

        let mut far = base_vessel("far");
        far.status = VesselStatus::Approaching;
        far.target_bridge = Some("Stridsbergsbron".to_string());
        far.current_bridge = Some("Stallbackabron".to_string());
        far.distance_to_current = Some(5.0);
        far.lat = 58.28;
        far.lon = 12.30;

        let group = vec![&near, &far];
        let reg = registry();
        let chosen = select_priority_vessel(&group, &reg, "Stridsbergsbron");
        assert_eq!(chosen.mmsi, "near");
    }
}
