//! Controller-driven teleport targeting for VR rigs.
//!
//! A [`TeleportSystem`] is fed button signals and a per-frame [`Pose`]; it samples a
//! ballistic or straight path, finds the first walkable surface along it, animates
//! the path reveal and, on a confirmed release, returns where the rig should move.
//!
//! ```ignore
//! let mut system = TeleportSystem::new(TeleportConfig::default());
//! system.button_down();
//! // Each frame:
//! let visuals = system.update(time_ms, delta_ms, &pose, &surfaces);
//! // On release:
//! if let AimOutcome::Teleported(relocation) = system.button_up(&rig) {
//!     // move the rig to relocation.viewer_position
//! }
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod math;
pub mod physics;
pub mod teleport;

pub use config::{CurveType, TeleportConfig, TeleportVisualConfig};
pub use error::TeleportError;
pub use input::{ButtonEdgeDetector, ControllerButtons, EventBindings, InputSignal, TeleportButton};
pub use logging::init_logging;
pub use teleport::{
    AimIndicator, AimOutcome, Pose, Relocation, RigSnapshot, TeleportEvent, TeleportState,
    TeleportSurface, TeleportSystem, TeleportVisuals,
};
