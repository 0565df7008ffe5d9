//! Static catalogue of the five bridges along the canal segment: lookups,
//! the south-to-north sequence, and pairwise gap distances.
//!
//! Built once at startup as a small immutable value handed around by
//! reference, specialized into read-only lookup methods instead of plain
//! field access, since the registry is queried by name/id from several
//! components (`vessel_engine`, `bridge_text`).

use std::collections::HashMap;

use crate::config::{BridgeConfig, Config};
use crate::geometry;

#[derive(Debug, Clone, PartialEq)]
pub struct Bridge {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub radius_m: f64,
}

impl From<&BridgeConfig> for Bridge {
    fn from(c: &BridgeConfig) -> Self {
        Bridge {
            id: c.id.clone(),
            name: c.name.clone(),
            lat: c.lat,
            lon: c.lon,
            radius_m: c.radius_m,
        }
    }
}

#[derive(Debug)]
pub struct BridgeRegistry {
    bridges: Vec<Bridge>,
    sequence: Vec<String>,
    target_names: Vec<String>,
    special_name: String,
    default_gap_m: f64,
    /// Indexed cache: bridge id -> position in `sequence`.
    sequence_index: HashMap<String, usize>,
}

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub ok: bool,
    pub errors: Vec<String>,
}

impl BridgeRegistry {
    pub fn from_config(config: &Config) -> Self {
        let bridges: Vec<Bridge> = config.bridges.iter().map(Bridge::from).collect();
        let sequence = config.bridge_sequence.clone();
        let sequence_index = sequence
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        Self {
            bridges,
            sequence,
            target_names: config.target_bridges.clone(),
            special_name: config.special_bridge.clone(),
            default_gap_m: config.distances.default_gap_m,
            sequence_index,
        }
    }

    pub fn by_name(&self, name: &str) -> Option<&Bridge> {
        self.bridges.iter().find(|b| b.name == name)
    }

    pub fn by_id(&self, id: &str) -> Option<&Bridge> {
        self.bridges.iter().find(|b| b.id == id)
    }

    pub fn is_target(&self, name: &str) -> bool {
        self.target_names.iter().any(|t| t == name)
    }

    pub fn is_special(&self, name: &str) -> bool {
        self.special_name == name
    }

    pub fn special_name(&self) -> &str {
        &self.special_name
    }

    pub fn target_names(&self) -> &[String] {
        &self.target_names
    }

    pub fn sequence(&self) -> &[String] {
        &self.sequence
    }

    pub fn next(&self, id: &str) -> Option<&Bridge> {
        let idx = *self.sequence_index.get(id)?;
        let next_id = self.sequence.get(idx + 1)?;
        self.by_id(next_id)
    }

    pub fn previous(&self, id: &str) -> Option<&Bridge> {
        let idx = *self.sequence_index.get(id)?;
        if idx == 0 {
            return None;
        }
        let prev_id = self.sequence.get(idx - 1)?;
        self.by_id(prev_id)
    }

    /// All bridges nearest to `(lat, lon)` within `max_distance_m`, as
    /// `(bridge, distance_m)`, sorted by ascending distance. Used by the
    /// vessel engine to find `currentBridge`.
    pub fn nearest_within(&self, lat: f64, lon: f64, max_distance_m: f64) -> Option<(&Bridge, f64)> {
        self.bridges
            .iter()
            .filter_map(|b| geometry::distance(lat, lon, b.lat, b.lon).map(|d| (b, d)))
            .filter(|(_, d)| *d <= max_distance_m)
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
    }

    /// Nearest bridge to `(lat, lon)` with no radius limit, used to locate
    /// a vessel's position in the sequence for direction inference even
    /// when it is too far from any bridge to have a `currentBridge`.
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<(&Bridge, f64)> {
        self.bridges
            .iter()
            .filter_map(|b| geometry::distance(lat, lon, b.lat, b.lon).map(|d| (b, d)))
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
    }

    /// Sequence index of a bridge by id, if present.
    pub fn sequence_index(&self, id: &str) -> Option<usize> {
        self.sequence_index.get(id).copied()
    }

    /// Gap distance between two bridges by id. Direction-insensitive:
    /// falls back to the configured default when either bridge is unknown
    /// or the distance cannot be computed.
    pub fn gap(&self, from_id: &str, to_id: &str) -> f64 {
        match (self.by_id(from_id), self.by_id(to_id)) {
            (Some(a), Some(b)) => geometry::distance(a.lat, a.lon, b.lat, b.lon).unwrap_or(self.default_gap_m),
            _ => self.default_gap_m,
        }
    }

    /// Inclusive sub-slice of the sequence between `current_id` and the
    /// bridge named `target_name`, ordered south-to-north regardless of
    /// which endpoint comes first.
    pub fn between(&self, current_id: &str, target_name: &str) -> Vec<String> {
        let target = match self.by_name(target_name) {
            Some(b) => b,
            None => return Vec::new(),
        };
        let (Some(&a), Some(&b)) = (
            self.sequence_index.get(current_id),
            self.sequence_index.get(&target.id),
        ) else {
            return Vec::new();
        };
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.sequence[lo..=hi].to_vec()
    }

    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();

        for name in &self.target_names {
            if self.by_name(name).is_none() {
                errors.push(format!("target bridge '{}' not found in bridge table", name));
            }
        }

        for id in &self.sequence {
            if self.by_id(id).is_none() {
                errors.push(format!("sequence id '{}' not found in bridge table", id));
            }
        }

        if self.by_name(&self.special_name).is_none() {
            errors.push(format!(
                "special bridge '{}' not found in bridge table",
                self.special_name
            ));
        }

        ValidationResult {
            ok: errors.is_empty(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> BridgeRegistry {
        BridgeRegistry::from_config(&Config::default())
    }

    #[test]
    fn test_by_name_and_id() {
        let reg = registry();
        assert_eq!(reg.by_name("Klaffbron").unwrap().id, "klaffbron");
        assert_eq!(reg.by_id("stridsbergsbron").unwrap().name, "Stridsbergsbron");
        assert!(reg.by_name("Nonexistent").is_none());
    }

    #[test]
    fn test_is_target_and_special() {
        let reg = registry();
        assert!(reg.is_target("Klaffbron"));
        assert!(reg.is_target("Stridsbergsbron"));
        assert!(!reg.is_target("Olidebron"));
        assert!(reg.is_special("Stallbackabron"));
        assert!(!reg.is_special("Klaffbron"));
    }

    #[test]
    fn test_sequence_order() {
        let reg = registry();
        assert_eq!(
            reg.sequence(),
            &[
                "klaffbron".to_string(),
                "jarnvagsbron".to_string(),
                "olidebron".to_string(),
                "stallbackabron".to_string(),
                "stridsbergsbron".to_string(),
            ]
        );
    }

    #[test]
    fn test_next_and_previous() {
        let reg = registry();
        assert_eq!(reg.next("klaffbron").unwrap().id, "jarnvagsbron");
        assert_eq!(reg.previous("jarnvagsbron").unwrap().id, "klaffbron");
        assert!(reg.previous("klaffbron").is_none());
        assert!(reg.next("stridsbergsbron").is_none());
    }

    #[test]
    fn test_gap_fallback_on_unknown() {
        let reg = registry();
        assert_eq!(reg.gap("unknown-a", "unknown-b"), 800.0);
    }

    #[test]
    fn test_gap_known_pair_is_positive() {
        let reg = registry();
        let gap = reg.gap("klaffbron", "jarnvagsbron");
        assert!(gap > 0.0);
    }

    #[test]
    fn test_between_inclusive_either_direction() {
        let reg = registry();
        let fwd = reg.between("klaffbron", "Stallbackabron");
        let bwd = reg.between("stallbackabron", "Klaffbron");
        assert_eq!(
            fwd,
            vec![
                "klaffbron".to_string(),
                "jarnvagsbron".to_string(),
                "olidebron".to_string(),
                "stallbackabron".to_string(),
            ]
        );
        assert_eq!(fwd, bwd);
    }

    #[test]
    fn test_validate_ok_on_default_config() {
        let reg = registry();
        let result = reg.validate();
        assert!(result.ok, "errors: {:?}", result.errors);
    }

    #[test]
    fn test_validate_reports_missing_target() {
        let mut cfg = Config::default();
        cfg.target_bridges.push("Nonexistent".to_string());
        let reg = BridgeRegistry::from_config(&cfg);
        let result = reg.validate();
        assert!(!result.ok);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_nearest_within() {
        let reg = registry();
        let klaffbron = reg.by_name("Klaffbron").unwrap().clone();
        let (nearest, dist) = reg.nearest_within(klaffbron.lat, klaffbron.lon, 500.0).unwrap();
        assert_eq!(nearest.name, "Klaffbron");
        assert!(dist < 1.0);
    }

    #[test]
    fn test_nearest_within_none_when_far() {
        let reg = registry();
        assert!(reg.nearest_within(0.0, 0.0, 500.0).is_none());
    }

    #[test]
    fn test_nearest_has_no_radius_limit() {
        let reg = registry();
        let (bridge, _) = reg.nearest(0.0, 0.0).unwrap();
        assert!(!bridge.name.is_empty());
    }

    #[test]
    fn test_sequence_index_lookup() {
        let reg = registry();
        assert_eq!(reg.sequence_index("klaffbron"), Some(0));
        assert_eq!(reg.sequence_index("stridsbergsbron"), Some(4));
        assert_eq!(reg.sequence_index("unknown"), None);
    }
}
