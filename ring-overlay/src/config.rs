//! Validated overlay parameters and the edit surface that mutates them.

use std::fmt;

use bevy::prelude::*;
use constants::ring_defaults::{
    DEFAULT_COLOR_SRGB, DEFAULT_LABEL_SIZE, DEFAULT_LINE_WIDTH, DEFAULT_MAX_RADIUS,
    DEFAULT_REFERENCE_FRAME, DEFAULT_RESOLUTION, DEFAULT_SHOW_LABELS, DEFAULT_SPACING,
    MAX_RESOLUTION, MIN_RESOLUTION,
};
use serde::{Deserialize, Serialize};

use crate::error::{OverlayError, Result};

/// Style and geometry parameters of one overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingConfig {
    pub color: Color,
    pub line_width: f32,
    pub max_radius: f32,
    pub spacing: f32,
    pub resolution: u32,
    pub show_labels: bool,
    pub label_size: f32,
    pub reference_frame: String,
}

impl Default for RingConfig {
    fn default() -> Self {
        let [r, g, b] = DEFAULT_COLOR_SRGB;
        Self {
            color: Color::srgb_u8(r, g, b),
            line_width: DEFAULT_LINE_WIDTH,
            max_radius: DEFAULT_MAX_RADIUS,
            spacing: DEFAULT_SPACING,
            resolution: DEFAULT_RESOLUTION,
            show_labels: DEFAULT_SHOW_LABELS,
            label_size: DEFAULT_LABEL_SIZE,
            reference_frame: DEFAULT_REFERENCE_FRAME.to_string(),
        }
    }
}

impl RingConfig {
    /// Current value of `field`.
    pub fn get(&self, field: ConfigField) -> FieldValue {
        match field {
            ConfigField::Color => FieldValue::Color(self.color),
            ConfigField::LineWidth => FieldValue::Float(self.line_width),
            ConfigField::MaxRadius => FieldValue::Float(self.max_radius),
            ConfigField::Spacing => FieldValue::Float(self.spacing),
            ConfigField::Resolution => FieldValue::Int(i64::from(self.resolution)),
            ConfigField::ShowLabels => FieldValue::Bool(self.show_labels),
            ConfigField::LabelSize => FieldValue::Float(self.label_size),
            ConfigField::ReferenceFrame => FieldValue::Text(self.reference_frame.clone()),
        }
    }
}

/// Individually editable configuration fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigField {
    Color,
    LineWidth,
    MaxRadius,
    Spacing,
    Resolution,
    ShowLabels,
    LabelSize,
    ReferenceFrame,
}

impl ConfigField {
    pub const ALL: [ConfigField; 8] = [
        Self::Color,
        Self::LineWidth,
        Self::MaxRadius,
        Self::Spacing,
        Self::Resolution,
        Self::ShowLabels,
        Self::LabelSize,
        Self::ReferenceFrame,
    ];

    /// Convert string identifier to field for host property panels.
    pub fn from_string(s: &str) -> Option<Self> {
        let name = s.to_lowercase();
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::LineWidth => "line_width",
            Self::MaxRadius => "max_radius",
            Self::Spacing => "spacing",
            Self::Resolution => "resolution",
            Self::ShowLabels => "show_labels",
            Self::LabelSize => "label_size",
            Self::ReferenceFrame => "reference_frame",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value carried by a single field edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    Text(String),
    Color(Color),
}

impl FieldValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "string",
            Self::Color(_) => "colour",
        }
    }
}

/// A discrete `set(field, value)` request from the host UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEdit {
    pub field: ConfigField,
    pub value: FieldValue,
}

impl ConfigEdit {
    pub fn new(field: ConfigField, value: FieldValue) -> Self {
        Self { field, value }
    }
}

/// Downstream notification produced by an accepted edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    /// The value matched the current one.
    Unchanged,
    /// Ring count, radii, sampling or anchoring frame changed.
    Geometry,
    /// Colour or line width changed. `rebake` is set when per-point ring
    /// colours must be regenerated.
    Style { rebake: bool },
    LabelVisibility,
    LabelHeight,
}

impl ConfigChange {
    /// Whether this change requires regenerating ring geometry.
    pub fn needs_rebuild(&self) -> bool {
        matches!(self, Self::Geometry | Self::Style { rebake: true })
    }

    pub fn is_style(&self) -> bool {
        matches!(self, Self::Style { .. } | Self::LabelHeight)
    }
}

/// Single logical copy of the overlay configuration.
///
/// Every mutation passes the field's bound check first. A rejected edit
/// leaves the previous value in effect.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    config: RingConfig,
}

impl ConfigStore {
    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    pub fn apply(&mut self, edit: ConfigEdit) -> Result<ConfigChange> {
        self.set(edit.field, edit.value)
    }

    /// Validate and store `value`, classifying the resulting change.
    pub fn set(&mut self, field: ConfigField, value: FieldValue) -> Result<ConfigChange> {
        let config = &mut self.config;
        let change = match field {
            ConfigField::Color => {
                let color = expect_color(field, value)?;
                replace(&mut config.color, color, ConfigChange::Style { rebake: true })
            }
            ConfigField::LineWidth => {
                let width = expect_non_negative(field, value)?;
                replace(
                    &mut config.line_width,
                    width,
                    ConfigChange::Style { rebake: false },
                )
            }
            ConfigField::MaxRadius => {
                let radius = expect_non_negative(field, value)?;
                replace(&mut config.max_radius, radius, ConfigChange::Geometry)
            }
            ConfigField::Spacing => {
                let spacing = expect_non_negative(field, value)?;
                replace(&mut config.spacing, spacing, ConfigChange::Geometry)
            }
            ConfigField::Resolution => {
                let resolution = expect_resolution(field, value)?;
                replace(&mut config.resolution, resolution, ConfigChange::Geometry)
            }
            ConfigField::ShowLabels => {
                let show = expect_bool(field, value)?;
                replace(&mut config.show_labels, show, ConfigChange::LabelVisibility)
            }
            ConfigField::LabelSize => {
                let size = expect_non_negative(field, value)?;
                replace(&mut config.label_size, size, ConfigChange::LabelHeight)
            }
            ConfigField::ReferenceFrame => {
                let frame = expect_text(field, value)?;
                replace(&mut config.reference_frame, frame, ConfigChange::Geometry)
            }
        };

        if change == ConfigChange::Unchanged {
            debug!("Ring overlay {} unchanged", field);
        } else {
            debug!("Ring overlay {} accepted ({:?})", field, change);
        }
        Ok(change)
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T, change: ConfigChange) -> ConfigChange {
    if *slot == value {
        return ConfigChange::Unchanged;
    }
    *slot = value;
    change
}

fn type_mismatch(field: ConfigField, expected: &str, value: &FieldValue) -> OverlayError {
    OverlayError::rejected(field, format!("expected {expected}, got {}", value.kind()))
}

fn expect_color(field: ConfigField, value: FieldValue) -> Result<Color> {
    match value {
        FieldValue::Color(color) => Ok(color),
        other => Err(type_mismatch(field, "colour", &other)),
    }
}

fn expect_bool(field: ConfigField, value: FieldValue) -> Result<bool> {
    match value {
        FieldValue::Bool(flag) => Ok(flag),
        other => Err(type_mismatch(field, "bool", &other)),
    }
}

fn expect_text(field: ConfigField, value: FieldValue) -> Result<String> {
    match value {
        FieldValue::Text(text) => Ok(text),
        other => Err(type_mismatch(field, "string", &other)),
    }
}

fn expect_non_negative(field: ConfigField, value: FieldValue) -> Result<f32> {
    let number = match value {
        FieldValue::Float(number) => number,
        FieldValue::Int(number) => number as f32,
        other => return Err(type_mismatch(field, "float", &other)),
    };

    if !number.is_finite() {
        return Err(OverlayError::rejected(field, "must be a finite number"));
    }
    if number < 0.0 {
        return Err(OverlayError::rejected(
            field,
            format!("{number} must not be negative"),
        ));
    }
    Ok(number)
}

fn expect_resolution(field: ConfigField, value: FieldValue) -> Result<u32> {
    let resolution = match value {
        FieldValue::Int(resolution) => resolution,
        other => return Err(type_mismatch(field, "integer", &other)),
    };

    if resolution < i64::from(MIN_RESOLUTION) {
        return Err(OverlayError::rejected(
            field,
            format!("{resolution} is below the minimum of {MIN_RESOLUTION}"),
        ));
    }
    if resolution > i64::from(MAX_RESOLUTION) {
        let clamped = u32::try_from(resolution).unwrap_or(u32::MAX);
        return Err(OverlayError::resolution_exceeded(clamped, MAX_RESOLUTION));
    }
    // Bounded by MAX_RESOLUTION above.
    Ok(resolution as u32)
}
