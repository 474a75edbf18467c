//! Generation parameters for the exploration map
//!
//! All weights and probabilities read by the tile generator. The struct is
//! serde-loadable with `#[serde(default)]`, so a JSON file only needs the keys
//! it wants to change.

use std::fmt;
use std::path::Path;

use crate::tiles::BiomeKind;

/// Error loading or validating a configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Weights and probabilities used by the tile generator
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    // Base biome weights
    pub hills_weight: f32,
    pub forest_weight: f32,
    pub mountains_weight: f32,
    pub desert_weight: f32,
    pub swamp_weight: f32,

    // Rare biome upgrade chances
    pub mystic_forest_chance: f32,
    pub poison_swamp_chance: f32,
    pub dragon_bones_chance: f32,
    /// Checked first on mountains
    pub lavascape_chance: f32,
    /// Checked in the probability mass after lavascape
    pub ice_spikes_chance: f32,

    // POI chances
    pub rare_poi_chance: f32,
    pub epic_poi_chance: f32,
    pub megagon_chance: f32,

    // Clustering
    pub biome_clustering_strength: f32,
    pub biome_cluster_radius: i32,

    // Megagons
    /// No two megagon centers may be closer than this
    pub megagon_min_separation: i32,
    /// Radius scanned for POIs that unlock bonus megagons
    pub megagon_poi_scan_radius: i32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            hills_weight: 1.0,
            forest_weight: 1.0,
            mountains_weight: 0.8,
            desert_weight: 0.7,
            swamp_weight: 0.6,

            mystic_forest_chance: 0.15,
            poison_swamp_chance: 0.15,
            dragon_bones_chance: 0.05,
            lavascape_chance: 0.2,
            ice_spikes_chance: 0.2,

            rare_poi_chance: 0.3,
            epic_poi_chance: 0.1,
            megagon_chance: 0.02,

            biome_clustering_strength: 0.6,
            biome_cluster_radius: 2,

            megagon_min_separation: 5,
            megagon_poi_scan_radius: 5,
        }
    }
}

impl GenerationConfig {
    /// Load from a JSON file and validate
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GenerationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Base weight of one of the five base biomes, 0 for anything else
    pub fn base_weight(&self, biome: BiomeKind) -> f32 {
        match biome {
            BiomeKind::Hills => self.hills_weight,
            BiomeKind::Forest => self.forest_weight,
            BiomeKind::Mountains => self.mountains_weight,
            BiomeKind::Desert => self.desert_weight,
            BiomeKind::Swamp => self.swamp_weight,
            _ => 0.0,
        }
    }

    /// Base biomes paired with their weights, in roll order
    pub fn base_weights(&self) -> [(BiomeKind, f32); 5] {
        BiomeKind::BASE.map(|biome| (biome, self.base_weight(biome)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (biome, weight) in self.base_weights() {
            if !(weight >= 0.0) {
                return Err(ConfigError::Invalid(format!("{} weight must be non-negative, got {}", biome, weight)));
            }
        }
        if self.base_weights().iter().all(|(_, w)| *w == 0.0) {
            return Err(ConfigError::Invalid("at least one base biome weight must be positive".to_string()));
        }

        let probabilities = [
            ("mystic_forest_chance", self.mystic_forest_chance),
            ("poison_swamp_chance", self.poison_swamp_chance),
            ("dragon_bones_chance", self.dragon_bones_chance),
            ("lavascape_chance", self.lavascape_chance),
            ("ice_spikes_chance", self.ice_spikes_chance),
            ("rare_poi_chance", self.rare_poi_chance),
            ("epic_poi_chance", self.epic_poi_chance),
            ("megagon_chance", self.megagon_chance),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid(format!("{} must be within [0, 1], got {}", name, p)));
            }
        }
        if self.lavascape_chance + self.ice_spikes_chance > 1.0 {
            return Err(ConfigError::Invalid(
                "lavascape_chance + ice_spikes_chance must not exceed 1".to_string(),
            ));
        }

        if !(self.biome_clustering_strength >= 0.0) {
            return Err(ConfigError::Invalid("biome_clustering_strength must be non-negative".to_string()));
        }
        if self.biome_cluster_radius < 0 || self.megagon_min_separation < 0 || self.megagon_poi_scan_radius < 0 {
            return Err(ConfigError::Invalid("radii must be non-negative".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GenerationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_weight(BiomeKind::Mountains), 0.8);
        assert_eq!(config.base_weight(BiomeKind::Lavascape), 0.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GenerationConfig::from_json_str(r#"{ "megagon_chance": 0.5 }"#).unwrap();
        assert_eq!(config.megagon_chance, 0.5);
        assert_eq!(config.hills_weight, 1.0);
        assert_eq!(config.biome_cluster_radius, 2);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let negative = GenerationConfig {
            desert_weight: -1.0,
            ..Default::default()
        };
        assert!(matches!(negative.validate(), Err(ConfigError::Invalid(_))));

        let all_zero = GenerationConfig {
            hills_weight: 0.0,
            forest_weight: 0.0,
            mountains_weight: 0.0,
            desert_weight: 0.0,
            swamp_weight: 0.0,
            ..Default::default()
        };
        assert!(all_zero.validate().is_err());

        let probability = GenerationConfig {
            rare_poi_chance: 1.5,
            ..Default::default()
        };
        assert!(probability.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = GenerationConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
