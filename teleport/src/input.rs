use serde::{Deserialize, Serialize};

use crate::config::TeleportConfig;

/// Analog value at or above which a controller button counts as pressed
pub const BUTTON_PRESS_THRESHOLD: f32 = 0.5;

/// Button mapping options for teleport activation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeleportButton {
    Trackpad,
    Trigger,
    Grip,
    Menu,
}

impl TeleportButton {
    pub fn name(&self) -> &'static str {
        match self {
            TeleportButton::Trackpad => "trackpad",
            TeleportButton::Trigger => "trigger",
            TeleportButton::Grip => "grip",
            TeleportButton::Menu => "menu",
        }
    }
}

/// Discrete signal driving the aim lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSignal {
    ButtonDown,
    ButtonUp,
}

/// Raw analog button values for one controller, as sampled each frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControllerButtons {
    pub trackpad: f32,
    pub trigger: f32,
    pub grip: f32,
    pub menu: f32,
}

impl ControllerButtons {
    pub fn value(&self, button: TeleportButton) -> f32 {
        match button {
            TeleportButton::Trackpad => self.trackpad,
            TeleportButton::Trigger => self.trigger,
            TeleportButton::Grip => self.grip,
            TeleportButton::Menu => self.menu,
        }
    }
}

/// Turns per-frame analog button values into press/release edges.
#[derive(Clone, Debug)]
pub struct ButtonEdgeDetector {
    button: TeleportButton,
    threshold: f32,
    was_pressed: bool,
}

impl ButtonEdgeDetector {
    pub fn new(button: TeleportButton) -> Self {
        ButtonEdgeDetector {
            button,
            threshold: BUTTON_PRESS_THRESHOLD,
            was_pressed: false,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn update(&mut self, buttons: &ControllerButtons) -> Option<InputSignal> {
        let is_pressed = buttons.value(self.button) >= self.threshold;
        let was_pressed = std::mem::replace(&mut self.was_pressed, is_pressed);

        match (was_pressed, is_pressed) {
            (false, true) => Some(InputSignal::ButtonDown),
            (true, false) => Some(InputSignal::ButtonUp),
            _ => None,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.was_pressed
    }
}

/// Maps named controller events (`"triggerdown"`, custom start/end events) to signals.
///
/// Custom events only take over when both a start and an end list are configured.
#[derive(Clone, Debug, PartialEq)]
pub struct EventBindings {
    start_events: Vec<String>,
    end_events: Vec<String>,
}

impl EventBindings {
    pub fn from_config(config: &TeleportConfig) -> Self {
        if !config.start_events.is_empty() && !config.end_events.is_empty() {
            EventBindings {
                start_events: config.start_events.clone(),
                end_events: config.end_events.clone(),
            }
        } else {
            let button = config.button.name();
            EventBindings {
                start_events: vec![format!("{}down", button)],
                end_events: vec![format!("{}up", button)],
            }
        }
    }

    pub fn signal_for(&self, event_name: &str) -> Option<InputSignal> {
        if self.start_events.iter().any(|e| e == event_name) {
            Some(InputSignal::ButtonDown)
        } else if self.end_events.iter().any(|e| e == event_name) {
            Some(InputSignal::ButtonUp)
        } else {
            None
        }
    }
}
