// VR Teleport Movement System
//
// The player aims a ballistic arc (or straight ray) from a controller, sees where it
// lands, and is relocated there on release. Per frame: sample the path, resolve the
// first walkable hit along it, reveal the path over time, and on a confirmed release
// move the rig while keeping its height above ground.

pub mod collision;
pub mod motion;
pub mod relocation;
pub mod reveal;
pub mod surface;
pub mod teleport_system;
pub mod teleport_ui;
pub mod trajectory;

pub use collision::{CollisionResolver, TeleportHit};
pub use motion::MotionParameters;
pub use relocation::{Relocation, RigRelocator, RigSnapshot, TeleportEvent};
pub use reveal::RevealScheduler;
pub use surface::{GroundPlane, SurfaceHit, TeleportSurface};
pub use teleport_system::{AimOutcome, Pose, TeleportState, TeleportSystem};
pub use teleport_ui::{AimIndicator, HitMarker, TeleportUI, TeleportVisuals};
pub use trajectory::TrajectorySampler;
