//! Assessment policy configuration.
//!
//! Everything that is policy rather than algorithm lives here: intrinsic
//! scoring weights, factor normalization, classification thresholds, and
//! per-component criticality overrides. The policy is an immutable value
//! injected at engine construction; alternate policies are just alternate
//! values, which keeps tests deterministic.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::Criticality;
use crate::errors::PolicyError;

/// Weights for the intrinsic component risk factors. Must sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_change_frequency_weight")]
    pub change_frequency: f64,

    #[serde(default = "default_dependencies_weight")]
    pub dependencies: f64,

    #[serde(default = "default_complexity_weight")]
    pub complexity: f64,

    #[serde(default = "default_criticality_weight")]
    pub criticality: f64,

    #[serde(default = "default_recent_changes_weight")]
    pub recent_changes: f64,
}

fn default_change_frequency_weight() -> f64 {
    0.30
}

fn default_dependencies_weight() -> f64 {
    0.25
}

fn default_complexity_weight() -> f64 {
    0.20
}

fn default_criticality_weight() -> f64 {
    0.15
}

fn default_recent_changes_weight() -> f64 {
    0.10
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            change_frequency: default_change_frequency_weight(),
            dependencies: default_dependencies_weight(),
            complexity: default_complexity_weight(),
            criticality: default_criticality_weight(),
            recent_changes: default_recent_changes_weight(),
        }
    }
}

impl ScoringWeights {
    fn is_valid_weight(weight: f64) -> bool {
        (0.0..=1.0).contains(&weight)
    }

    fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("change_frequency", self.change_frequency),
            ("dependencies", self.dependencies),
            ("complexity", self.complexity),
            ("criticality", self.criticality),
            ("recent_changes", self.recent_changes),
        ]
    }

    pub fn sum(&self) -> f64 {
        self.named().iter().map(|(_, weight)| weight).sum()
    }

    /// Validate that each weight is in range and the set sums to 1.0
    /// (small tolerance for floating point).
    pub fn validate(&self) -> Result<(), PolicyError> {
        for (name, value) in self.named() {
            if !Self::is_valid_weight(value) {
                return Err(PolicyError::WeightOutOfRange { name, value });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > 0.001 {
            return Err(PolicyError::WeightSum { sum });
        }
        Ok(())
    }

    /// Rescale the weights so they sum to 1.0.
    pub fn normalize(&mut self) {
        let sum = self.sum();
        if sum > 0.0 && (sum - 1.0).abs() > 0.001 {
            self.change_frequency /= sum;
            self.dependencies /= sum;
            self.complexity /= sum;
            self.criticality /= sum;
            self.recent_changes /= sum;
        }
    }
}

/// Factor values assigned to each criticality rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalityWeights {
    #[serde(default = "default_low_criticality")]
    pub low: f64,
    #[serde(default = "default_medium_criticality")]
    pub medium: f64,
    #[serde(default = "default_high_criticality")]
    pub high: f64,
    #[serde(default = "default_critical_criticality")]
    pub critical: f64,
}

fn default_low_criticality() -> f64 {
    0.25
}

fn default_medium_criticality() -> f64 {
    0.5
}

fn default_high_criticality() -> f64 {
    0.75
}

fn default_critical_criticality() -> f64 {
    1.0
}

impl Default for CriticalityWeights {
    fn default() -> Self {
        Self {
            low: default_low_criticality(),
            medium: default_medium_criticality(),
            high: default_high_criticality(),
            critical: default_critical_criticality(),
        }
    }
}

impl CriticalityWeights {
    pub fn weight_for(&self, criticality: Criticality) -> f64 {
        match criticality {
            Criticality::Low => self.low,
            Criticality::Medium => self.medium,
            Criticality::High => self.high,
            Criticality::Critical => self.critical,
        }
    }

    fn validate(&self) -> Result<(), PolicyError> {
        let named = [
            ("criticality.low", self.low),
            ("criticality.medium", self.medium),
            ("criticality.high", self.high),
            ("criticality.critical", self.critical),
        ];
        for (name, value) in named {
            if !ScoringWeights::is_valid_weight(value) {
                return Err(PolicyError::WeightOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

/// How raw component attributes map onto the [0, 1] factor scale. The
/// mapping is policy, not an implementation detail, and is stable across
/// runs for a given configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationConfig {
    /// Dependency counts at or above this cap normalize to 1.0.
    #[serde(default = "default_dependency_cap")]
    pub dependency_cap: usize,

    #[serde(default)]
    pub criticality_weights: CriticalityWeights,
}

fn default_dependency_cap() -> usize {
    10
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            dependency_cap: default_dependency_cap(),
            criticality_weights: CriticalityWeights::default(),
        }
    }
}

impl NormalizationConfig {
    pub fn normalized_dependency_count(&self, count: usize) -> f64 {
        (count as f64 / self.dependency_cap as f64).min(1.0)
    }

    fn validate(&self) -> Result<(), PolicyError> {
        if self.dependency_cap == 0 {
            return Err(PolicyError::ZeroDependencyCap);
        }
        self.criticality_weights.validate()
    }
}

/// Classification cut points applied to the final score.
///
/// Buckets are half-open with a closed top: a score equal to a cut point
/// lands in the higher bucket, and anything at or above `critical`
/// (including scores past 1.0) is critical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    #[serde(default = "default_medium_threshold")]
    pub medium: f64,
    #[serde(default = "default_high_threshold")]
    pub high: f64,
    #[serde(default = "default_critical_threshold")]
    pub critical: f64,
}

fn default_medium_threshold() -> f64 {
    0.3
}

fn default_high_threshold() -> f64 {
    0.6
}

fn default_critical_threshold() -> f64 {
    0.8
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium: default_medium_threshold(),
            high: default_high_threshold(),
            critical: default_critical_threshold(),
        }
    }
}

impl RiskThresholds {
    /// Classify more changes as high risk.
    pub fn strict() -> Self {
        Self {
            medium: 0.2,
            high: 0.45,
            critical: 0.7,
        }
    }

    /// Default cut points.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Tolerate more risk before escalating.
    pub fn lenient() -> Self {
        Self {
            medium: 0.4,
            high: 0.7,
            critical: 0.9,
        }
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        let ordered = 0.0 < self.medium
            && self.medium < self.high
            && self.high < self.critical
            && self.critical <= 1.0;
        if !ordered {
            return Err(PolicyError::ThresholdOrder {
                medium: self.medium,
                high: self.high,
                critical: self.critical,
            });
        }
        Ok(())
    }
}

/// Immutable assessment policy injected at engine construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPolicy {
    #[serde(default)]
    pub weights: ScoringWeights,

    #[serde(default)]
    pub normalization: NormalizationConfig,

    #[serde(default)]
    pub thresholds: RiskThresholds,

    /// Multiplier applied to the intrinsic score of affected components
    /// that carry no direct change record.
    #[serde(default = "default_indirect_multiplier")]
    pub indirect_multiplier: f64,

    /// Per-component criticality overrides keyed by component id.
    #[serde(default)]
    pub criticality: HashMap<String, Criticality>,
}

fn default_indirect_multiplier() -> f64 {
    1.0
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            normalization: NormalizationConfig::default(),
            thresholds: RiskThresholds::default(),
            indirect_multiplier: default_indirect_multiplier(),
            criticality: HashMap::new(),
        }
    }
}

impl RiskPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        self.weights.validate()?;
        self.normalization.validate()?;
        self.thresholds.validate()?;
        if !(0.0..=crate::risk::MAX_EFFECTIVE_SCORE).contains(&self.indirect_multiplier) {
            return Err(PolicyError::IndirectMultiplierOutOfRange {
                value: self.indirect_multiplier,
            });
        }
        Ok(())
    }

    /// Criticality for a component, honoring configured overrides.
    pub fn criticality_for(&self, component_id: &str, declared: Criticality) -> Criticality {
        self.criticality
            .get(component_id)
            .copied()
            .unwrap_or(declared)
    }
}

const CONFIG_FILE_NAME: &str = "blastmap.toml";

fn parse_policy_file(path: &Path) -> anyhow::Result<RiskPolicy> {
    let contents = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config {}: {}", path.display(), e))?;
    let policy = toml::from_str::<RiskPolicy>(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config {}: {}", path.display(), e))?;
    Ok(policy)
}

/// Load the policy from an explicit path, or from `blastmap.toml` in the
/// working directory when present, or fall back to defaults.
pub fn load_policy(path: Option<&Path>) -> anyhow::Result<RiskPolicy> {
    match path {
        Some(path) => parse_policy_file(path),
        None => {
            let default_path = PathBuf::from(CONFIG_FILE_NAME);
            if default_path.exists() {
                parse_policy_file(&default_path)
            } else {
                log::debug!("no {CONFIG_FILE_NAME} found, using default policy");
                Ok(RiskPolicy::default())
            }
        }
    }
}

const DEFAULT_CONFIG: &str = r#"# Blastmap Configuration

# Multiplier for affected components without a direct change record.
indirect_multiplier = 1.0

[weights]
change_frequency = 0.30
dependencies = 0.25
complexity = 0.20
criticality = 0.15
recent_changes = 0.10

[normalization]
dependency_cap = 10

[normalization.criticality_weights]
low = 0.25
medium = 0.50
high = 0.75
critical = 1.00

[thresholds]
medium = 0.3
high = 0.6
critical = 0.8

[criticality]
# Per-component overrides, e.g.:
# "prod/network/vpc" = "critical"
"#;

/// Write a default `blastmap.toml` into the working directory.
pub fn init_config(force: bool) -> anyhow::Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    fs::write(&config_path, DEFAULT_CONFIG)?;
    println!("Created {CONFIG_FILE_NAME} configuration file");

    Ok(())
}
