// Teleport Runtime - headless frame loop for exercising the teleport system
//
// Builds a small collider scene, holds the teleport button for a fixed time while
// aiming from a scripted controller pose, releases, and prints what happened.

use std::path::PathBuf;

use anyhow::Context;
use cgmath::{Deg, Quaternion, Rotation3, vec3};
use clap::Parser;
use rapier3d::prelude::*;
use serde_json::json;
use teleport::{
    AimOutcome, ButtonEdgeDetector, ControllerButtons, InputSignal, Pose, RigSnapshot,
    TeleportConfig, TeleportSurface, TeleportSystem, logging::DEFAULT_LOG_ENV,
    physics::util::isometry,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "teleport_runtime")]
#[command(about = "Headless frame loop driving a teleport aim/release cycle")]
struct Args {
    /// JSON teleport configuration; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Controller pitch in degrees (negative aims down)
    #[arg(long, default_value = "-20", allow_hyphen_values = true)]
    pitch: f32,

    /// Controller yaw in degrees
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    yaw: f32,

    /// Controller height above the floor
    #[arg(long, default_value = "1.2")]
    height: f32,

    /// How long the teleport button is held
    #[arg(long, default_value = "1000")]
    hold_ms: f32,

    /// Simulated frame rate
    #[arg(long, default_value = "90")]
    fps: f32,

    /// Add a raised platform three metres ahead
    #[arg(long)]
    platform: bool,

    /// Tilt the platform about X by this many degrees, turning it into a ramp
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    platform_tilt: f32,

    /// Add a tall wall two metres ahead
    #[arg(long)]
    wall: bool,
}

/// Standing height of the viewer's head above the rig origin
const VIEWER_HEIGHT: f32 = 1.6;

fn build_scene(args: &Args) -> ColliderSet {
    let mut colliders = ColliderSet::new();

    colliders.insert(
        ColliderBuilder::cuboid(20.0, 0.5, 20.0)
            .translation(vector![0.0, -0.5, 0.0])
            .build(),
    );

    if args.platform {
        let tilt = Quaternion::from_angle_x(Deg(args.platform_tilt));
        colliders.insert(
            ColliderBuilder::cuboid(1.5, 0.3, 1.5)
                .position(isometry(vec3(0.0, 0.3, -3.0), tilt))
                .build(),
        );
    }

    if args.wall {
        colliders.insert(
            ColliderBuilder::cuboid(3.0, 2.0, 0.1)
                .translation(vector![0.0, 2.0, -2.0])
                .build(),
        );
    }

    colliders
}

fn main() -> anyhow::Result<()> {
    teleport::init_logging(DEFAULT_LOG_ENV);

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => TeleportConfig::load(path)
            .with_context(|| format!("Failed to load teleport config {}", path.display()))?,
        None => TeleportConfig::default(),
    };

    if args.fps <= 0.0 {
        anyhow::bail!("--fps must be positive, got {}", args.fps);
    }

    info!(
        "Aiming {:?} curve: pitch {} yaw {} height {} for {}ms at {}fps",
        config.curve_type, args.pitch, args.yaw, args.height, args.hold_ms, args.fps
    );

    let colliders = build_scene(&args);
    let surfaces: [&dyn TeleportSurface; 1] = [&colliders];

    let button = config.button;
    let mut system = TeleportSystem::new(config);
    let mut detector = ButtonEdgeDetector::new(button);

    let rotation = Quaternion::from_angle_y(Deg(args.yaw)) * Quaternion::from_angle_x(Deg(args.pitch));
    let pose = Pose::from_transform(vec3(0.2, args.height, -0.3), rotation);
    let rig = RigSnapshot {
        explicit_rig: false,
        secondary_positions: vec![vec3(-0.2, args.height, -0.3), pose.origin],
        ..RigSnapshot::at(vec3(0.0, VIEWER_HEIGHT, 0.0))
    };

    let frame_ms = 1000.0 / args.fps;
    let mut time_ms = 0.0f64;
    let mut outcome = None;

    // One extra frame with the button released to produce the up edge
    let held_frames = (args.hold_ms / frame_ms).ceil() as usize;
    for frame in 0..=held_frames {
        let value = if frame < held_frames { 1.0 } else { 0.0 };
        let buttons = ControllerButtons {
            trackpad: value,
            trigger: value,
            grip: value,
            menu: value,
        };

        if let Some(signal) = detector.update(&buttons) {
            if signal == InputSignal::ButtonUp {
                info!("Button released after {:.0}ms", time_ms);
            }
            if let Some(result) = system.handle_signal(signal, &rig) {
                outcome = Some(result);
            }
        }

        let visuals = system.update(time_ms, frame_ms, &pose, &surfaces);
        let (visible, indicator, path_points) =
            (visuals.visible, visuals.indicator, visuals.path.len());
        if visible && frame % 10 == 0 {
            info!(
                "frame {}: {:?}, reveal {:.2}, path of {} points ({:.2}m sampled)",
                frame,
                indicator,
                system.reveal().fraction(),
                path_points,
                system.arc_length(),
            );
        }

        time_ms += frame_ms as f64;
    }

    match outcome {
        Some(AimOutcome::Teleported(relocation)) => {
            let report = json!({
                "teleported": relocation.event,
                "hands": relocation.secondary_positions,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Some(AimOutcome::Cancelled) => warn!("Released before the reveal finished; teleport cancelled"),
        Some(AimOutcome::Missed) => warn!("No walkable surface under the path"),
        Some(AimOutcome::NotAiming) | None => warn!("Button was never released while aiming"),
    }

    Ok(())
}
