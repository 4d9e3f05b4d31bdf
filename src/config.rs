//! Field configuration - typed, defaulted settings for a rated field.
//!
//! Settings are deserialised from JSON with serde. Keys follow the settings
//! map the host application stores (`vote_type`, `enable_voting_target`,
//! `target_bridge_field`, ...); every key except `field_name` has a default.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;

pub const DEFAULT_VOTE_KIND: &str = "vote";
pub const MAX_STARS: u8 = 10;

/// When a rating is collected from a human.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatedWhile {
    #[default]
    Viewing,
    Editing,
}

impl fmt::Display for RatedWhile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatedWhile::Viewing => write!(f, "viewing"),
            RatedWhile::Editing => write!(f, "editing"),
        }
    }
}

/// Links a rated entity to a second entity whose rating field mirrors each vote.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSettings {
    #[serde(rename = "enable_voting_target")]
    pub enabled: bool,
    /// Reference field on the rated entity pointing at the target.
    #[serde(rename = "target_bridge_field")]
    pub bridge_field: String,
    /// Rating field the target must carry.
    #[serde(rename = "target_fivestar_field")]
    pub fivestar_field: String,
}

/// Settings of one rated field on an entity type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub field_name: String,
    #[serde(default = "default_vote_kind", alias = "vote_type")]
    pub vote_kind: String,
    #[serde(default = "default_stars")]
    pub stars: u8,
    #[serde(default)]
    pub allow_clear: bool,
    #[serde(default = "default_true")]
    pub allow_revote: bool,
    #[serde(default = "default_true")]
    pub allow_ownvote: bool,
    #[serde(default)]
    pub rated_while: RatedWhile,
    #[serde(flatten)]
    pub target: TargetSettings,
}

fn default_vote_kind() -> String {
    DEFAULT_VOTE_KIND.to_string()
}

fn default_stars() -> u8 {
    5
}

fn default_true() -> bool {
    true
}

impl FieldConfig {
    pub fn new(field_name: impl Into<String>) -> Self {
        FieldConfig {
            field_name: field_name.into(),
            vote_kind: default_vote_kind(),
            stars: default_stars(),
            allow_clear: false,
            allow_revote: true,
            allow_ownvote: true,
            rated_while: RatedWhile::default(),
            target: TargetSettings::default(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        serde_json::from_value(value).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn with_vote_kind(mut self, vote_kind: impl Into<String>) -> Self {
        self.vote_kind = vote_kind.into();
        self
    }

    pub fn with_stars(mut self, stars: u8) -> Self {
        self.stars = stars;
        self
    }

    pub fn with_rated_while(mut self, rated_while: RatedWhile) -> Self {
        self.rated_while = rated_while;
        self
    }

    pub fn with_allow_ownvote(mut self, allow: bool) -> Self {
        self.allow_ownvote = allow;
        self
    }

    /// Enable vote mirroring through `bridge_field` onto the target's `fivestar_field`.
    pub fn with_target(
        mut self,
        bridge_field: impl Into<String>,
        fivestar_field: impl Into<String>,
    ) -> Self {
        self.target = TargetSettings {
            enabled: true,
            bridge_field: bridge_field.into(),
            fivestar_field: fivestar_field.into(),
        };
        self
    }

    /// Whether a rating collected in `context` is accepted for this field.
    pub fn accepts(&self, context: RatedWhile) -> bool {
        self.rated_while == context
    }

    /// Convert a selected star count (1..=stars) to the 0-100 rating scale.
    pub fn rating_for_stars(&self, selected: u8) -> i32 {
        if self.stars == 0 {
            return 0;
        }
        let selected = selected.min(self.stars) as i32;
        (selected * 100 + self.stars as i32 / 2) / self.stars as i32
    }

    /// Check the settings against a sample host entity of the configured type.
    pub fn validate(&self, host: &Entity, kinds: &VoteKindRegistry) -> Result<(), ConfigError> {
        if self.stars == 0 || self.stars > MAX_STARS {
            return Err(ConfigError::StarsOutOfRange(self.stars));
        }
        if self.vote_kind.is_empty() {
            return Err(ConfigError::EmptyVoteKind);
        }
        if !kinds.contains(&self.vote_kind) {
            return Err(ConfigError::UnknownVoteKind(self.vote_kind.clone()));
        }
        if !self.target.enabled {
            return Ok(());
        }

        let bridge = &self.target.bridge_field;
        if bridge.is_empty() {
            return Err(ConfigError::MissingSetting("target_bridge_field"));
        }
        match host.field(bridge) {
            None => {
                return Err(ConfigError::MissingBridgeField {
                    field: bridge.clone(),
                })
            }
            Some(value) if !value.is_reference() => {
                return Err(ConfigError::BridgeFieldNotReference {
                    field: bridge.clone(),
                    field_type: value.field_type(),
                })
            }
            Some(_) => {}
        }
        if self.target.fivestar_field.is_empty() {
            return Err(ConfigError::MissingSetting("target_fivestar_field"));
        }
        Ok(())
    }
}

/// Known vote kinds with their human-readable labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteKindRegistry {
    kinds: BTreeMap<String, String>,
}

impl Default for VoteKindRegistry {
    fn default() -> Self {
        let mut kinds = BTreeMap::new();
        kinds.insert(DEFAULT_VOTE_KIND.to_string(), "Vote".to_string());
        Self { kinds }
    }
}

impl VoteKindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<String>, label: impl Into<String>) {
        self.kinds.insert(id.into(), label.into());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.kinds.contains_key(id)
    }

    pub fn label(&self, id: &str) -> Option<&str> {
        self.kinds.get(id).map(|label| label.as_str())
    }

    /// `(id, label)` pairs ordered by id.
    pub fn options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.kinds.iter().map(|(id, label)| (id.as_str(), label.as_str()))
    }
}

/// Rejected field configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    StarsOutOfRange(u8),
    EmptyVoteKind,
    UnknownVoteKind(String),
    MissingSetting(&'static str),
    MissingBridgeField { field: String },
    BridgeFieldNotReference { field: String, field_type: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(message) => write!(f, "invalid field settings: {}", message),
            ConfigError::StarsOutOfRange(stars) => {
                write!(f, "number of stars must be 1-{}, got {}", MAX_STARS, stars)
            }
            ConfigError::EmptyVoteKind => write!(f, "vote kind must not be empty"),
            ConfigError::UnknownVoteKind(kind) => write!(f, "unknown vote kind: {}", kind),
            ConfigError::MissingSetting(name) => write!(f, "setting {} is required", name),
            ConfigError::MissingBridgeField { field } => {
                write!(f, "the host entity doesn't contain field: \"{}\"", field)
            }
            ConfigError::BridgeFieldNotReference { field, field_type } => write!(
                f,
                "the bridge field \"{}\" must have \"entity_reference\" type, got \"{}\"",
                field, field_type
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
