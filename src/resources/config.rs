//! Interaction configuration resource.
//!
//! Defaults used when building rules, velocity appliers and the world clock,
//! loaded from an INI configuration file. Safe defaults apply for every key
//! that is missing.
//!
//! # Configuration File Format
//!
//! ```ini
//! [rule]
//! reject_when_disabled = true
//! reject_when_inactive = true
//!
//! [navmesh]
//! base_offset = 0.0
//! distance_limit = 0.1
//! valid_areas = -1
//!
//! [velocity]
//! drag = 1.0
//! angular_drag = 0.5
//! nil_velocity_tolerance = 0.001
//! nil_angular_velocity_tolerance = 0.001
//!
//! [time]
//! fixed_delta = 0.02
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::components::rule::{NavMeshRule, RejectRuleStates};

const DEFAULT_REJECT_WHEN_DISABLED: bool = true;
const DEFAULT_REJECT_WHEN_INACTIVE: bool = true;
const DEFAULT_NAVMESH_BASE_OFFSET: f32 = 0.0;
const DEFAULT_NAVMESH_DISTANCE_LIMIT: f32 = 0.1;
const DEFAULT_NAVMESH_VALID_AREAS: i32 = -1;
const DEFAULT_DRAG: f32 = 1.0;
const DEFAULT_ANGULAR_DRAG: f32 = 0.5;
const DEFAULT_NIL_TOLERANCE: f32 = 0.001;
const DEFAULT_FIXED_DELTA: f32 = 0.02;
const DEFAULT_CONFIG_PATH: &str = "./zinnia.ini";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ZinniaConfig {
    /// Rules reject while their component is disabled.
    pub reject_when_disabled: bool,
    /// Rules reject while their entity is inactive in the hierarchy.
    pub reject_when_inactive: bool,
    pub navmesh_base_offset: f32,
    pub navmesh_distance_limit: f32,
    pub navmesh_valid_areas: i32,
    pub drag: f32,
    pub angular_drag: f32,
    pub nil_velocity_tolerance: f32,
    pub nil_angular_velocity_tolerance: f32,
    /// Seconds per fixed step.
    pub fixed_delta: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for ZinniaConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ZinniaConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            reject_when_disabled: DEFAULT_REJECT_WHEN_DISABLED,
            reject_when_inactive: DEFAULT_REJECT_WHEN_INACTIVE,
            navmesh_base_offset: DEFAULT_NAVMESH_BASE_OFFSET,
            navmesh_distance_limit: DEFAULT_NAVMESH_DISTANCE_LIMIT,
            navmesh_valid_areas: DEFAULT_NAVMESH_VALID_AREAS,
            drag: DEFAULT_DRAG,
            angular_drag: DEFAULT_ANGULAR_DRAG,
            nil_velocity_tolerance: DEFAULT_NIL_TOLERANCE,
            nil_angular_velocity_tolerance: DEFAULT_NIL_TOLERANCE,
            fixed_delta: DEFAULT_FIXED_DELTA,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);

        info!(
            "Loaded config: reject(disabled={}, inactive={}), navmesh(offset={}, limit={}, areas={}), drag={}/{}, fixed_delta={}",
            self.reject_when_disabled,
            self.reject_when_inactive,
            self.navmesh_base_offset,
            self.navmesh_distance_limit,
            self.navmesh_valid_areas,
            self.drag,
            self.angular_drag,
            self.fixed_delta
        );

        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, content: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [rule] section
        if let Some(value) = config.getbool("rule", "reject_when_disabled").ok().flatten() {
            self.reject_when_disabled = value;
        }
        if let Some(value) = config.getbool("rule", "reject_when_inactive").ok().flatten() {
            self.reject_when_inactive = value;
        }

        // [navmesh] section
        if let Some(value) = config.getfloat("navmesh", "base_offset").ok().flatten() {
            self.navmesh_base_offset = value as f32;
        }
        if let Some(value) = config.getfloat("navmesh", "distance_limit").ok().flatten() {
            self.navmesh_distance_limit = value as f32;
        }
        if let Some(value) = config.getint("navmesh", "valid_areas").ok().flatten() {
            self.navmesh_valid_areas = value as i32;
        }

        // [velocity] section
        if let Some(value) = config.getfloat("velocity", "drag").ok().flatten() {
            self.drag = value as f32;
        }
        if let Some(value) = config.getfloat("velocity", "angular_drag").ok().flatten() {
            self.angular_drag = value as f32;
        }
        if let Some(value) = config
            .getfloat("velocity", "nil_velocity_tolerance")
            .ok()
            .flatten()
        {
            self.nil_velocity_tolerance = value as f32;
        }
        if let Some(value) = config
            .getfloat("velocity", "nil_angular_velocity_tolerance")
            .ok()
            .flatten()
        {
            self.nil_angular_velocity_tolerance = value as f32;
        }

        // [time] section
        if let Some(value) = config.getfloat("time", "fixed_delta").ok().flatten() {
            self.fixed_delta = value as f32;
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("rule", "reject_when_disabled", Some(self.reject_when_disabled.to_string()));
        config.set("rule", "reject_when_inactive", Some(self.reject_when_inactive.to_string()));

        config.set("navmesh", "base_offset", Some(self.navmesh_base_offset.to_string()));
        config.set("navmesh", "distance_limit", Some(self.navmesh_distance_limit.to_string()));
        config.set("navmesh", "valid_areas", Some(self.navmesh_valid_areas.to_string()));

        config.set("velocity", "drag", Some(self.drag.to_string()));
        config.set("velocity", "angular_drag", Some(self.angular_drag.to_string()));
        config.set(
            "velocity",
            "nil_velocity_tolerance",
            Some(self.nil_velocity_tolerance.to_string()),
        );
        config.set(
            "velocity",
            "nil_angular_velocity_tolerance",
            Some(self.nil_angular_velocity_tolerance.to_string()),
        );

        config.set("time", "fixed_delta", Some(self.fixed_delta.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Auto-reject states new rules start with.
    pub fn reject_rule_states(&self) -> RejectRuleStates {
        let mut states = RejectRuleStates::empty();
        if self.reject_when_disabled {
            states |= RejectRuleStates::RULE_COMPONENT_IS_DISABLED;
        }
        if self.reject_when_inactive {
            states |= RejectRuleStates::RULE_ENTITY_IS_NOT_ACTIVE_IN_HIERARCHY;
        }
        states
    }

    /// Navigation mesh rule built from the configured defaults.
    pub fn nav_mesh_rule(&self) -> NavMeshRule {
        NavMeshRule {
            base_offset: self.navmesh_base_offset,
            distance_limit: self.navmesh_distance_limit,
            valid_areas: self.navmesh_valid_areas,
        }
    }
}
