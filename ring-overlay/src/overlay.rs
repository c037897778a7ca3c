//! The overlay as a whole: configuration, geometry and frame following.

use bevy::prelude::*;

use crate::config::{ConfigChange, ConfigEdit, ConfigField, ConfigStore, FieldValue, RingConfig};
use crate::error::{OverlayError, Result};
use crate::follower::{FrameFollower, PoseResult, TransformResolver};
use crate::geometry::generate;
use crate::labels::format_labels;
use crate::scene::SceneGraph;
use crate::status::{StatusCategory, StatusReport, StatusSink};
use crate::synchronizer::SceneSynchronizer;

/// One distance ring overlay.
///
/// Edits arrive through [`RingOverlay::set`] and the host calls
/// [`RingOverlay::tick`] once per rendered frame. Both must be serialised by
/// the host. The scene graph is passed into every call so hosts can hand out
/// short-lived access to their renderer.
#[derive(Debug)]
pub struct RingOverlay<H> {
    store: ConfigStore,
    sync: SceneSynchronizer<H>,
    follower: FrameFollower,
    enabled: bool,
    /// Resolution that was refused for exceeding the vertex budget. While set,
    /// the overlay stays empty.
    resolution_fault: Option<u32>,
}

impl<H: Copy + Eq + std::fmt::Debug> RingOverlay<H> {
    /// Create the root node and build rings from `config` in a single pass.
    ///
    /// Fields of `config` that fail validation are reported and fall back to
    /// their defaults. If the scene refuses an object, everything created so
    /// far, the root included, is released before the error is returned.
    pub fn initialize<S, K>(scene: &mut S, sink: &mut K, config: RingConfig) -> Result<Self>
    where
        S: SceneGraph<Handle = H>,
        K: StatusSink + ?Sized,
    {
        let sync = SceneSynchronizer::attach(scene)?;
        let mut overlay = Self {
            store: ConfigStore::default(),
            sync,
            follower: FrameFollower::new(),
            enabled: true,
            resolution_fault: None,
        };
        for field in ConfigField::ALL {
            let value = config.get(field);
            if value == overlay.config().get(field) {
                continue;
            }
            if let Err(err) = overlay.accept(sink, field, value) {
                debug!("Initial '{}' not applied: {}", field, err);
            }
        }

        match overlay.regenerate(scene, sink) {
            Ok(()) => {}
            Err(err @ OverlayError::Scene(_)) => {
                overlay.sync.teardown(scene);
                return Err(err);
            }
            // Already reported; the overlay stays empty until corrected.
            Err(err) => debug!("Initial rings not built: {}", err),
        }
        info!(
            "Ring overlay initialised following '{}'",
            overlay.config().reference_frame
        );
        Ok(overlay)
    }

    pub fn config(&self) -> &RingConfig {
        self.store.config()
    }

    pub fn synchronizer(&self) -> &SceneSynchronizer<H> {
        &self.sync
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn resolution_fault(&self) -> Option<u32> {
        self.resolution_fault
    }

    pub fn apply_edit<S, K>(&mut self, scene: &mut S, sink: &mut K, edit: ConfigEdit) -> Result<ConfigChange>
    where
        S: SceneGraph<Handle = H>,
        K: StatusSink + ?Sized,
    {
        self.set(scene, sink, edit.field, edit.value)
    }

    /// Validate one field edit and push its effect into the scene.
    pub fn set<S, K>(
        &mut self,
        scene: &mut S,
        sink: &mut K,
        field: ConfigField,
        value: FieldValue,
    ) -> Result<ConfigChange>
    where
        S: SceneGraph<Handle = H>,
        K: StatusSink + ?Sized,
    {
        let recovering = field == ConfigField::Resolution && self.resolution_fault.is_some();
        let change = match self.accept(sink, field, value) {
            Ok(change) => change,
            Err(err) => {
                if matches!(err, OverlayError::ResolutionExceeded { .. }) {
                    self.sync.clear(scene);
                }
                return Err(err);
            }
        };

        // Any accepted resolution corrects a fault, even one equal to the
        // value that was retained while faulted.
        if recovering {
            self.regenerate(scene, sink)?;
            return Ok(change);
        }

        let config = self.store.config();
        match change {
            ConfigChange::Unchanged => {}
            ConfigChange::Geometry | ConfigChange::Style { rebake: true } => {
                self.regenerate(scene, sink)?;
            }
            ConfigChange::Style { rebake: false } => {
                let (color, width) = (config.color, config.line_width);
                self.sync.apply_style(scene, color, width);
            }
            ConfigChange::LabelVisibility => {
                let visible = config.show_labels;
                self.sync.set_labels_visible(scene, visible);
            }
            ConfigChange::LabelHeight => {
                let height = config.label_size;
                self.sync.set_label_height(scene, height);
            }
        }
        Ok(change)
    }

    /// Re-anchor the root to the reference frame. Does nothing while disabled.
    pub fn tick<S, R, K>(&mut self, scene: &mut S, resolver: &R, sink: &mut K) -> Option<PoseResult>
    where
        S: SceneGraph<Handle = H>,
        R: TransformResolver + ?Sized,
        K: StatusSink + ?Sized,
    {
        if !self.enabled || self.sync.root().is_none() {
            return None;
        }
        let frame = self.store.config().reference_frame.as_str();
        Some(
            self.follower
                .tick(frame, resolver, scene, &mut self.sync, sink),
        )
    }

    /// Show or hide the overlay. Enabling rebuilds from the current
    /// configuration.
    pub fn set_enabled<S, K>(&mut self, scene: &mut S, sink: &mut K, enabled: bool) -> Result<()>
    where
        S: SceneGraph<Handle = H>,
        K: StatusSink + ?Sized,
    {
        if self.enabled == enabled {
            return Ok(());
        }
        self.enabled = enabled;
        self.sync.set_visible(scene, enabled);
        info!(
            "Ring overlay {}",
            if enabled { "enabled" } else { "disabled" }
        );
        if enabled {
            self.regenerate(scene, sink)?;
        }
        Ok(())
    }

    /// Release every scene object including the root. Safe to repeat.
    pub fn teardown<S: SceneGraph<Handle = H>>(&mut self, scene: &mut S) {
        self.sync.teardown(scene);
    }

    /// Store one field and report the outcome, without touching the scene.
    fn accept<K>(&mut self, sink: &mut K, field: ConfigField, value: FieldValue) -> Result<ConfigChange>
    where
        K: StatusSink + ?Sized,
    {
        match self.store.set(field, value) {
            Ok(change) => {
                if field == ConfigField::Resolution {
                    self.resolution_fault = None;
                }
                sink.report(StatusReport::ok(StatusCategory::Configuration));
                Ok(change)
            }
            Err(err @ OverlayError::ResolutionExceeded { resolution, .. }) => {
                self.resolution_fault = Some(resolution);
                sink.report(StatusReport::error(
                    StatusCategory::Resolution,
                    err.to_string(),
                ));
                Err(err)
            }
            Err(err) => {
                warn!("Ring overlay edit refused: {}", err);
                sink.report(StatusReport::warn(
                    StatusCategory::Configuration,
                    err.to_string(),
                ));
                Err(err)
            }
        }
    }

    /// Full rebuild of rings and labels from the accepted configuration.
    fn regenerate<S, K>(&mut self, scene: &mut S, sink: &mut K) -> Result<()>
    where
        S: SceneGraph<Handle = H>,
        K: StatusSink + ?Sized,
    {
        if let Some(resolution) = self.resolution_fault {
            self.sync.clear(scene);
            let err = OverlayError::resolution_exceeded(
                resolution,
                constants::ring_defaults::MAX_RESOLUTION,
            );
            sink.report(StatusReport::error(
                StatusCategory::Resolution,
                err.to_string(),
            ));
            return Ok(());
        }

        let config = self.store.config();
        let rings = match generate(config) {
            Ok(rings) => rings,
            Err(err) => {
                self.sync.clear(scene);
                error!("Ring geometry refused: {}", err);
                sink.report(StatusReport::error(
                    StatusCategory::Resolution,
                    err.to_string(),
                ));
                return Err(err);
            }
        };
        sink.report(StatusReport::ok(StatusCategory::Resolution));

        let labels = format_labels(&rings, config);
        let line_width = config.line_width;
        if let Err(err) = self.sync.rebuild(scene, &rings, &labels, line_width) {
            error!("Ring overlay rebuild failed: {}", err);
            return Err(err);
        }
        Ok(())
    }
}
