//! Concentric distance rings anchored to a moving reference frame.
//!
//! Configuration edits flow through [`config::ConfigStore`], ring polylines
//! come from [`geometry::generate`], radius labels from
//! [`labels::format_label`], and [`synchronizer::SceneSynchronizer`] owns
//! every scene object built from them. Once per frame
//! [`follower::FrameFollower`] re-anchors the overlay root to the latest pose
//! of the configured frame. [`overlay::RingOverlay`] wires the pieces
//! together; [`host`] plugs them into a Bevy app.

pub mod config;
pub mod error;
pub mod follower;
pub mod geometry;
pub mod host;
pub mod labels;
pub mod overlay;
pub mod scene;
pub mod status;
pub mod synchronizer;

pub use config::{ConfigChange, ConfigEdit, ConfigField, ConfigStore, FieldValue, RingConfig};
pub use error::{OverlayError, Result};
pub use follower::{FrameFollower, LookupTime, PoseResult, StaticFrames, TransformResolver};
pub use geometry::{RingDescriptor, generate};
pub use host::{DistanceRings, DistanceRingsPlugin, OverlayStatus};
pub use labels::{LabelDescriptor, format_label};
pub use overlay::RingOverlay;
pub use scene::{SceneError, SceneGraph};
pub use status::{StatusBoard, StatusCategory, StatusLevel, StatusReport, StatusSink};
pub use synchronizer::SceneSynchronizer;
