use cgmath::{InnerSpace, Quaternion, Vector3};

use super::{
    AimIndicator, CollisionResolver, MotionParameters, Relocation, RevealScheduler, RigRelocator,
    RigSnapshot, TeleportHit, TeleportSurface, TeleportUI, TeleportVisuals, TrajectorySampler,
};
use crate::config::{CurveType, TeleportConfig};
use crate::input::{EventBindings, InputSignal};
use crate::math::{forward_from_rotation, try_normalize};

/// Lifecycle of one aiming controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TeleportState {
    Idle,
    Aiming,
    /// A confirmed hit is being committed; only observable while relocating
    Resolved,
}

/// World-space origin and forward direction of the aiming object
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub origin: Vector3<f32>,
    pub forward: Vector3<f32>,
}

impl Pose {
    pub fn new(origin: Vector3<f32>, forward: Vector3<f32>) -> Self {
        Pose { origin, forward }
    }

    /// Pose of an object looking down its local -Z axis
    pub fn from_transform(position: Vector3<f32>, rotation: Quaternion<f32>) -> Self {
        Pose {
            origin: position,
            forward: forward_from_rotation(rotation),
        }
    }
}

/// What releasing the button led to
#[derive(Clone, Debug, PartialEq)]
pub enum AimOutcome {
    /// Button released while not aiming
    NotAiming,
    /// Nothing valid was under the path
    Missed,
    /// A hit existed but the reveal had not finished; the hit is discarded
    Cancelled,
    Teleported(Relocation),
}

impl AimOutcome {
    pub fn relocation(&self) -> Option<&Relocation> {
        match self {
            AimOutcome::Teleported(relocation) => Some(relocation),
            _ => None,
        }
    }
}

/// Per-activation state, reset on every press and release
#[derive(Clone, Debug)]
struct AimSession {
    hit: Option<TeleportHit>,
    reveal: RevealScheduler,
    last_check_ms: Option<f64>,
    flight_span: f32,
}

impl AimSession {
    fn new(config: &TeleportConfig) -> Self {
        AimSession {
            hit: None,
            reveal: RevealScheduler::from_config(config),
            last_check_ms: None,
            flight_span: config.max_flight_time_s,
        }
    }

    fn reset(&mut self) {
        self.hit = None;
        self.reveal.reset();
        self.last_check_ms = None;
    }

    fn should_recheck(&self, time_ms: f64, interval_ms: f64) -> bool {
        match self.last_check_ms {
            None => true,
            Some(previous) => time_ms - previous > interval_ms,
        }
    }
}

/// Teleport targeting for one controller: aims a path while the button is held and
/// relocates the rig on release if a landing has been confirmed.
pub struct TeleportSystem {
    config: TeleportConfig,
    state: TeleportState,
    bindings: EventBindings,
    sampler: TrajectorySampler,
    resolver: CollisionResolver,
    relocator: RigRelocator,
    session: AimSession,
    display: Vec<Vector3<f32>>,
}

impl TeleportSystem {
    pub fn new(config: TeleportConfig) -> Self {
        TeleportSystem {
            state: TeleportState::Idle,
            bindings: EventBindings::from_config(&config),
            sampler: TrajectorySampler::new(config.sample_count()),
            resolver: CollisionResolver::from_config(&config),
            relocator: RigRelocator::new(),
            session: AimSession::new(&config),
            display: Vec::with_capacity(config.sample_count()),
            config,
        }
    }

    pub fn with_default_config() -> Self {
        Self::new(TeleportConfig::default())
    }

    pub fn get_config(&self) -> &TeleportConfig {
        &self.config
    }

    /// Replace the configuration. The sample buffer is only reallocated if its size changed.
    pub fn set_config(&mut self, config: TeleportConfig) {
        self.sampler.set_point_count(config.sample_count());
        self.resolver = CollisionResolver::from_config(&config);
        self.bindings = EventBindings::from_config(&config);
        self.session = AimSession::new(&config);
        self.config = config;
        crate::aim_log!(DEBUG, "teleport config updated: {:?}", self.config.curve_type);
    }

    pub fn state(&self) -> TeleportState {
        self.state
    }

    pub fn is_aiming(&self) -> bool {
        self.state == TeleportState::Aiming
    }

    /// Hit from the most recent collision check of the current session
    pub fn current_hit(&self) -> Option<&TeleportHit> {
        self.session.hit.as_ref()
    }

    pub fn reveal(&self) -> &RevealScheduler {
        &self.session.reveal
    }

    /// Samples from the last update; scratch data, overwritten every frame
    pub fn samples(&self) -> &[Vector3<f32>] {
        self.sampler.points()
    }

    /// Polyline length of the current samples
    pub fn arc_length(&self) -> f32 {
        self.sampler.arc_length()
    }

    pub fn previous_hit_height(&self) -> f32 {
        self.relocator.previous_hit_height()
    }

    /// Start (or restart) aiming.
    pub fn button_down(&mut self) {
        let restarted = self.state == TeleportState::Aiming;
        self.state = TeleportState::Aiming;
        self.session.reset();
        crate::aim_log!(DEBUG, "aim started (restart: {})", restarted);
    }

    /// Stop aiming, teleporting only if a hit exists and its reveal has completed.
    pub fn button_up(&mut self, rig: &RigSnapshot) -> AimOutcome {
        if self.state != TeleportState::Aiming {
            return AimOutcome::NotAiming;
        }

        let hit = self.session.hit;
        let reveal_complete = self.session.reveal.is_complete();
        self.session.reset();
        self.state = TeleportState::Idle;

        let Some(hit) = hit else {
            crate::aim_log!(DEBUG, "released without a landing target");
            return AimOutcome::Missed;
        };

        if !reveal_complete {
            crate::aim_log!(DEBUG, "released before the reveal finished, teleport cancelled");
            return AimOutcome::Cancelled;
        }

        self.state = TeleportState::Resolved;
        let relocation = self.relocator.relocate(hit.point, rig);
        self.state = TeleportState::Idle;

        crate::aim_log!(
            INFO,
            "teleported from {:?} to {:?}",
            relocation.event.old_position,
            relocation.event.new_position
        );
        AimOutcome::Teleported(relocation)
    }

    /// Route a press/release signal. Returns the release outcome, `None` for presses.
    pub fn handle_signal(&mut self, signal: InputSignal, rig: &RigSnapshot) -> Option<AimOutcome> {
        match signal {
            InputSignal::ButtonDown => {
                self.button_down();
                None
            }
            InputSignal::ButtonUp => Some(self.button_up(rig)),
        }
    }

    /// Route a named controller event through the configured bindings.
    pub fn handle_event(&mut self, event_name: &str, rig: &RigSnapshot) -> Option<AimOutcome> {
        let Some(signal) = self.bindings.signal_for(event_name) else {
            crate::input_log!(TRACE, "ignoring unbound event '{}'", event_name);
            return None;
        };
        self.handle_signal(signal, rig)
    }

    /// Advance one frame. `time_ms` is the frame timestamp, `delta_ms` the time since the
    /// previous frame. Collision is only re-evaluated once `interval_ms` has passed since
    /// the last check; the reveal advances every frame.
    pub fn update(
        &mut self,
        time_ms: f64,
        delta_ms: f32,
        pose: &Pose,
        surfaces: &[&dyn TeleportSurface],
    ) -> TeleportVisuals<'_> {
        if self.state != TeleportState::Aiming {
            return TeleportVisuals::hidden();
        }

        self.session.reveal.advance(delta_ms);

        let Some(direction) = try_normalize(pose.forward) else {
            crate::aim_log!(TRACE, "aim direction is degenerate, nothing to draw");
            self.display.clear();
            return self.visuals();
        };

        let recheck = self.session.should_recheck(time_ms, self.config.interval_ms);

        match self.config.curve_type {
            CurveType::Parabolic => {
                self.update_parabolic(pose.origin, direction, recheck, surfaces)
            }
            CurveType::Line => self.update_line(pose.origin, direction, recheck, surfaces),
        }

        if recheck {
            self.session.last_check_ms = Some(time_ms);
        }

        self.visuals()
    }

    fn update_parabolic(
        &mut self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        recheck: bool,
        surfaces: &[&dyn TeleportSurface],
    ) {
        let motion = MotionParameters::ballistic(
            origin,
            direction,
            self.config.curve_shooting_speed,
            self.config.gravity,
        );

        if recheck {
            self.session.flight_span =
                motion.flight_span(self.config.min_flight_time_s, self.config.max_flight_time_s);
        }

        self.sampler.sample(&motion, self.session.flight_span);

        if recheck {
            self.session.hit = self.resolver.resolve(self.sampler.points(), surfaces);
            crate::collision_log!(
                TRACE,
                "re-check over {:.3}s: {:?}",
                self.session.flight_span,
                self.session.hit.map(|hit| {
                    let hit_time = self.sampler.time_at(hit.segment_index - 1)
                        + hit.segment_fraction * self.sampler.time_step();
                    (hit.segment_index, hit.point, hit_time)
                })
            );
        }

        self.session
            .reveal
            .displayed_path(self.sampler.points(), self.session.hit.as_ref(), &mut self.display);
    }

    fn update_line(
        &mut self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        recheck: bool,
        surfaces: &[&dyn TeleportSurface],
    ) {
        let max_length = self.config.max_length;
        let motion = MotionParameters::linear(origin, direction, max_length);

        self.sampler.sample(&motion, 1.0);

        if recheck {
            self.session.hit = self.resolver.resolve(self.sampler.points(), surfaces);
            crate::collision_log!(
                TRACE,
                "line re-check: {:?}",
                self.session.hit.map(|hit| hit.point)
            );
        }

        let distance = self
            .session
            .hit
            .map(|hit| (hit.point - origin).magnitude())
            .unwrap_or(max_length);
        let end_t = if max_length > 0.0 {
            self.session.reveal.fraction() * distance / max_length
        } else {
            0.0
        };

        self.display.clear();
        self.display.push(origin);
        self.display.push(motion.position_at(end_t));
    }

    fn visuals(&self) -> TeleportVisuals<'_> {
        TeleportUI::build_visuals(
            &self.display,
            self.session.hit.as_ref(),
            &self.session.reveal,
            &self.config.visual,
        )
    }

    /// Indicator state for the current frame, `None` while idle
    pub fn indicator(&self) -> Option<AimIndicator> {
        if self.state != TeleportState::Aiming {
            return None;
        }
        Some(AimIndicator::from_state(
            self.session.hit.is_some(),
            self.session.reveal.is_complete(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    const FRAME_MS: f32 = 16.0;

    fn forward_pose() -> Pose {
        Pose::new(vec3(0.0, 1.6, 0.0), vec3(0.0, 0.0, -1.0))
    }

    fn down_pose(x: f32) -> Pose {
        Pose::new(vec3(x, 1.6, 0.0), vec3(0.0, -1.0, 0.0))
    }

    fn rig() -> RigSnapshot {
        RigSnapshot::at(vec3(0.0, 1.6, 0.0))
    }

    /// Run `frames` updates starting at `start_ms`, returning the time after the last one
    fn run_frames(system: &mut TeleportSystem, start_ms: f64, frames: usize, pose: &Pose) -> f64 {
        let mut time_ms = start_ms;
        for _ in 0..frames {
            system.update(time_ms, FRAME_MS, pose, &[]);
            time_ms += FRAME_MS as f64;
        }
        time_ms
    }

    fn incremental_config() -> TeleportConfig {
        TeleportConfig {
            draw_incrementally: true,
            incremental_draw_ms: 700.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_idle_update_is_hidden() {
        let mut system = TeleportSystem::with_default_config();
        let visuals = system.update(0.0, FRAME_MS, &forward_pose(), &[]);

        assert!(!visuals.visible);
        assert_eq!(system.state(), TeleportState::Idle);
        assert_eq!(system.indicator(), None);
    }

    #[test]
    fn test_release_without_press_does_nothing() {
        let mut system = TeleportSystem::with_default_config();
        assert_eq!(system.button_up(&rig()), AimOutcome::NotAiming);
    }

    #[test]
    fn test_press_aim_release_teleports() {
        let mut system = TeleportSystem::with_default_config();
        system.button_down();
        assert_eq!(system.state(), TeleportState::Aiming);

        let visuals = system.update(0.0, FRAME_MS, &forward_pose(), &[]);
        assert!(visuals.visible);
        assert_eq!(visuals.indicator, Some(AimIndicator::Confirmed));
        assert_eq!(visuals.path.len(), 30);

        let outcome = system.button_up(&rig());
        let relocation = outcome.relocation().expect("expected a teleport");
        assert!(relocation.viewer_position.z < -2.0);
        assert!((relocation.viewer_position.y - 1.6).abs() < 1e-4);
        assert_eq!(system.state(), TeleportState::Idle);
        assert!(system.current_hit().is_none());
    }

    #[test]
    fn test_early_release_cancels_teleport() {
        let mut system = TeleportSystem::new(incremental_config());
        system.button_down();
        run_frames(&mut system, 0.0, 10, &forward_pose());

        assert!(system.current_hit().is_some());
        assert!(system.reveal().elapsed_ms() < system.reveal().target_ms());
        assert_eq!(system.indicator(), Some(AimIndicator::Targeting));

        assert_eq!(system.button_up(&rig()), AimOutcome::Cancelled);
        assert_eq!(system.state(), TeleportState::Idle);
    }

    #[test]
    fn test_release_after_full_reveal_teleports() {
        let mut system = TeleportSystem::new(incremental_config());
        system.button_down();
        run_frames(&mut system, 0.0, 50, &forward_pose());

        assert_eq!(system.reveal().fraction(), 1.0);
        assert_eq!(system.indicator(), Some(AimIndicator::Confirmed));
        assert!(matches!(system.button_up(&rig()), AimOutcome::Teleported(_)));
    }

    #[test]
    fn test_release_with_no_hit_is_a_miss() {
        let mut system = TeleportSystem::with_default_config();
        system.button_down();
        // Straight up; the arc falls back past the launch point but never reaches the
        // ground inside the simulated span
        let pose = Pose::new(vec3(0.0, 1.6, 0.0), vec3(0.0, 1.0, 0.0));
        let visuals = system.update(0.0, FRAME_MS, &pose, &[]);

        assert_eq!(visuals.indicator, Some(AimIndicator::Searching));
        assert_eq!(system.button_up(&rig()), AimOutcome::Missed);
    }

    #[test]
    fn test_repress_restarts_reveal() {
        let mut system = TeleportSystem::new(incremental_config());
        system.button_down();
        let time_ms = run_frames(&mut system, 0.0, 20, &forward_pose());
        assert!(system.reveal().elapsed_ms() > 0.0);

        system.button_down();
        assert_eq!(system.reveal().elapsed_ms(), 0.0);
        assert!(system.current_hit().is_none());

        system.update(time_ms, FRAME_MS, &forward_pose(), &[]);
        assert_eq!(system.reveal().elapsed_ms(), FRAME_MS);
        assert!(system.current_hit().is_some());
    }

    #[test]
    fn test_recheck_is_throttled_by_interval() {
        let config = TeleportConfig {
            curve_type: CurveType::Line,
            interval_ms: 100.0,
            ..Default::default()
        };
        let mut system = TeleportSystem::new(config);
        system.button_down();

        system.update(0.0, FRAME_MS, &down_pose(0.0), &[]);
        let first = system.current_hit().unwrap().point;
        assert!(first.x.abs() < 1e-5);

        // Moved, but the interval has not elapsed: previous result is reused
        system.update(16.0, FRAME_MS, &down_pose(5.0), &[]);
        assert_eq!(system.current_hit().unwrap().point, first);

        system.update(120.0, FRAME_MS, &down_pose(5.0), &[]);
        assert!((system.current_hit().unwrap().point.x - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_ballistic_span_only_changes_on_recheck() {
        let config = TeleportConfig {
            interval_ms: 100.0,
            ..Default::default()
        };
        let mut system = TeleportSystem::new(config);
        system.button_down();

        // Level launch simulates the full four seconds
        system.update(0.0, FRAME_MS, &forward_pose(), &[]);
        let last = system.samples().len() - 1;
        let first_hit = *system.current_hit().unwrap();
        let level_second_sample = system.samples()[1];
        assert!((system.sampler.time_at(last) - 4.0).abs() < 1e-4);

        // Pitched up inside the interval: the path follows the new pose over the old span
        let lofted = Pose::new(vec3(0.0, 1.6, 0.0), vec3(0.0, 1.0, -1.0).normalize());
        system.update(16.0, FRAME_MS, &lofted, &[]);
        assert!(system.samples()[1].y > level_second_sample.y);
        assert!((system.sampler.time_at(last) - 4.0).abs() < 1e-4);
        assert_eq!(system.current_hit(), Some(&first_hit));

        // Next check: 2·vy/g ≈ 0.72s, raised to the one second minimum
        system.update(120.0, FRAME_MS, &lofted, &[]);
        assert!((system.sampler.time_at(last) - 1.0).abs() < 1e-4);
        assert!(system.current_hit().is_none());
    }

    #[test]
    fn test_line_path_grows_to_hit() {
        let config = TeleportConfig {
            curve_type: CurveType::Line,
            draw_incrementally: true,
            incremental_draw_ms: 100.0,
            ..Default::default()
        };
        let mut system = TeleportSystem::new(config);
        system.button_down();

        let visuals = system.update(0.0, 50.0, &down_pose(0.0), &[]);
        assert_eq!(visuals.path.len(), 2);
        assert_eq!(visuals.path[0], vec3(0.0, 1.6, 0.0));
        assert!((visuals.path[1].y - 0.8).abs() < 1e-4);

        let visuals = system.update(50.0, 50.0, &down_pose(0.0), &[]);
        assert!(visuals.path[1].y.abs() < 1e-4);
    }

    #[test]
    fn test_line_miss_draws_full_length() {
        let config = TeleportConfig {
            curve_type: CurveType::Line,
            max_length: 3.0,
            ..Default::default()
        };
        let mut system = TeleportSystem::new(config);
        system.button_down();

        let visuals = system.update(0.0, FRAME_MS, &forward_pose(), &[]);
        assert_eq!(visuals.path[1], vec3(0.0, 1.6, -3.0));
        assert!(system.current_hit().is_none());
    }

    #[test]
    fn test_degenerate_direction_draws_nothing() {
        let mut system = TeleportSystem::with_default_config();
        system.button_down();

        let pose = Pose::new(vec3(0.0, 1.6, 0.0), vec3(0.0, 0.0, 0.0));
        let visuals = system.update(0.0, FRAME_MS, &pose, &[]);

        assert!(visuals.visible);
        assert!(visuals.path.is_empty());
        assert!(system.current_hit().is_none());
    }

    #[test]
    fn test_named_events_drive_session() {
        let config = TeleportConfig {
            start_events: vec!["aim-start".to_string()],
            end_events: vec!["aim-end".to_string()],
            ..Default::default()
        };
        let mut system = TeleportSystem::new(config);

        assert_eq!(system.handle_event("trackpaddown", &rig()), None);
        assert_eq!(system.state(), TeleportState::Idle);

        assert_eq!(system.handle_event("aim-start", &rig()), None);
        assert!(system.is_aiming());
        system.update(0.0, FRAME_MS, &forward_pose(), &[]);

        let outcome = system.handle_event("aim-end", &rig()).unwrap();
        assert!(outcome.relocation().is_some());
    }

    #[test]
    fn test_set_config_resizes_samples() {
        let mut system = TeleportSystem::with_default_config();
        assert_eq!(system.samples().len(), 30);

        system.set_config(TeleportConfig {
            curve_number_points: 12,
            ..Default::default()
        });
        assert_eq!(system.samples().len(), 12);

        system.set_config(TeleportConfig {
            curve_type: CurveType::Line,
            ..Default::default()
        });
        assert_eq!(system.samples().len(), 2);
    }
}
