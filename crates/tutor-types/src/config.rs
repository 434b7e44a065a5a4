//! Configuration types for the tutoring engine (spec §6, "Configuration").
//!
//! Layered: built-in `Default` values, optionally overridden by a
//! `tutor.toml` file, then by `TUTOR_*` environment variables (see
//! `TutorConfig::load`).

use serde::{Deserialize, Serialize};

/// Top-level configuration for one running engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    pub llm: LlmConfig,
    pub router: RouterConfig,
    pub tracker: TrackerConfig,
    pub metrics: MetricsConfig,
    pub gamification: GamificationConfig,
    pub limits: LimitsConfig,
}

/// `llm.*` — LLM Gateway behavior (spec §4.1, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_s: u64,
    pub retry_budget: u32,
}

/// `router.*` — decision-tree overrides (spec §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Rule ids to disable; a disabled rule is skipped during evaluation.
    pub rule_overrides: Vec<String>,
}

/// `tracker.*` — phase/milestone progression thresholds (spec §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub phase_completion_threshold: f32,
    pub topic_transition_threshold_tau: f32,
}

/// `metrics.*` — enhancement metric weighting (spec §4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub weights: MetricWeights,
}

/// The six-tuple of weights feeding `overall_cognitive_score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricWeights {
    pub cognitive_offloading_prevention: f32,
    pub deep_thinking_engagement: f32,
    pub knowledge_integration: f32,
    pub scaffolding_effectiveness: f32,
    pub learning_progression: f32,
    pub metacognitive_awareness: f32,
}

/// `gamification.*` — challenge-game frequency cap (spec §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GamificationConfig {
    pub max_per_window: u32,
    pub window_turns: u32,
}

/// `limits.*` — per-stage and overall turn timeouts (spec §5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub classification_timeout_s: u64,
    pub agent_timeout_s: u64,
    pub synthesizer_timeout_s: u64,
    pub turn_timeout_s: u64,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            router: RouterConfig::default(),
            tracker: TrackerConfig::default(),
            metrics: MetricsConfig::default(),
            gamification: GamificationConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_output_tokens: 800,
            timeout_s: 20,
            retry_budget: 3,
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            rule_overrides: Vec::new(),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            phase_completion_threshold: 0.8,
            topic_transition_threshold_tau: 0.5,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            weights: MetricWeights::default(),
        }
    }
}

impl Default for MetricWeights {
    fn default() -> Self {
        // Equal weighting by default; deployments can re-balance via config
        // (spec §9 open question: weights are not pinned by the source).
        Self {
            cognitive_offloading_prevention: 1.0 / 6.0,
            deep_thinking_engagement: 1.0 / 6.0,
            knowledge_integration: 1.0 / 6.0,
            scaffolding_effectiveness: 1.0 / 6.0,
            learning_progression: 1.0 / 6.0,
            metacognitive_awareness: 1.0 / 6.0,
        }
    }
}

impl Default for GamificationConfig {
    fn default() -> Self {
        Self {
            max_per_window: 1,
            window_turns: 5,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            classification_timeout_s: 5,
            agent_timeout_s: 20,
            synthesizer_timeout_s: 20,
            turn_timeout_s: 60,
        }
    }
}

impl TutorConfig {
    /// Load configuration from built-in defaults, an optional `tutor.toml`
    /// in the current directory, and `TUTOR_*` environment overrides, in
    /// that order of increasing precedence.
    pub fn load() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let builder = config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .add_source(config::File::with_name("tutor").required(false))
            .add_source(config::Environment::with_prefix("TUTOR").separator("__"));
        builder.build()?.try_deserialize()
    }
}
