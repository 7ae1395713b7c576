use cgmath::{Matrix4, SquareMatrix, Vector3};
use serde::Serialize;

/// Emitted once per committed teleport, for consumers such as screen fades
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TeleportEvent {
    pub old_position: Vector3<f32>,
    pub new_position: Vector3<f32>,
    pub hit_point: Vector3<f32>,
}

/// World-space state of the viewer rig at the moment a teleport is committed
#[derive(Clone, Debug, PartialEq)]
pub struct RigSnapshot {
    /// Current world position of the rig (or camera, when no rig is configured)
    pub viewer_position: Vector3<f32>,
    /// World position of the point that should end up over the hit, if configured
    pub anchor_position: Option<Vector3<f32>>,
    /// Whether an explicit viewer rig was configured; without one, tracked hands are moved too
    pub explicit_rig: bool,
    /// World positions of tracked secondary bodies (hand controllers)
    pub secondary_positions: Vec<Vector3<f32>>,
    /// World transform of the rig's parent, used to express the result in local space
    pub parent_transform: Option<Matrix4<f32>>,
}

impl RigSnapshot {
    pub fn at(viewer_position: Vector3<f32>) -> Self {
        RigSnapshot {
            viewer_position,
            anchor_position: None,
            explicit_rig: true,
            secondary_positions: Vec::new(),
            parent_transform: None,
        }
    }
}

/// Where everything should be placed after a teleport
#[derive(Clone, Debug, PartialEq)]
pub struct Relocation {
    pub viewer_position: Vector3<f32>,
    /// New rig position in its parent's space; equals `viewer_position` without a parent
    pub viewer_local_position: Vector3<f32>,
    /// New secondary body positions, in snapshot order. Empty when an explicit rig is configured.
    pub secondary_positions: Vec<Vector3<f32>>,
    pub event: TeleportEvent,
}

/// Computes rig placement, keeping the viewer's height above ground across teleports.
#[derive(Clone, Debug, Default)]
pub struct RigRelocator {
    previous_hit_height: f32,
}

impl RigRelocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_previous_hit_height(previous_hit_height: f32) -> Self {
        RigRelocator { previous_hit_height }
    }

    pub fn previous_hit_height(&self) -> f32 {
        self.previous_hit_height
    }

    pub fn relocate(&mut self, hit_point: Vector3<f32>, rig: &RigSnapshot) -> Relocation {
        let current = rig.viewer_position;
        let mut new_position = hit_point;

        // Put the anchor, not the rig origin, over the hit
        if let Some(anchor) = rig.anchor_position {
            new_position = new_position - anchor + current;
        }

        // Height changes by the delta between successive hits rather than snapping
        new_position.y = current.y + hit_point.y - self.previous_hit_height;
        self.previous_hit_height = hit_point.y;

        let delta = new_position - current;
        let secondary_positions = if rig.explicit_rig {
            Vec::new()
        } else {
            rig.secondary_positions.iter().map(|hand| *hand + delta).collect()
        };

        let viewer_local_position = rig
            .parent_transform
            .and_then(|parent| parent.invert())
            .map(|inverse| (inverse * new_position.extend(1.0)).truncate())
            .unwrap_or(new_position);

        crate::relocation_log!(
            DEBUG,
            "relocating rig from {:?} to {:?} (hit {:?})",
            current,
            new_position,
            hit_point
        );

        Relocation {
            viewer_position: new_position,
            viewer_local_position,
            secondary_positions,
            event: TeleportEvent {
                old_position: current,
                new_position,
                hit_point,
            },
        }
    }
}
