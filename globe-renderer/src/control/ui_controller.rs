use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::data::globe::GlobeState;

/// Change of the auto-rotation speed per key press.
pub const SPEED_STEP: f32 = 0.001;

/// Parses a raw auto-rotation speed. Anything that isn't a finite number
/// stops the rotation instead of poisoning the globe's angles with NaN.
pub fn parse_rotation_speed(raw: &str) -> f32 {
    raw.trim()
        .parse::<f32>()
        .ok()
        .filter(|speed| speed.is_finite())
        .unwrap_or(0.0)
}

/// Where the per-frame auto-rotation speed comes from, e.g. a slider on the page.
pub trait RotationSpeedSource {
    fn raw_value(&self) -> String;

    fn set_raw_value(&mut self, value: &str);

    fn speed(&self) -> f32 {
        parse_rotation_speed(&self.raw_value())
    }

    fn step(&mut self, delta: f32) {
        let speed = self.speed() + delta;
        self.set_raw_value(&speed.to_string());
    }
}

/// Speed held in memory, seeded from the settings.
#[derive(Clone, Debug, PartialEq)]
pub struct ManualRotationSpeed {
    value: String,
}

impl ManualRotationSpeed {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl RotationSpeedSource for ManualRotationSpeed {
    fn raw_value(&self) -> String {
        self.value.clone()
    }

    fn set_raw_value(&mut self, value: &str) {
        self.value = value.to_string();
    }
}

pub struct UiController {
    rotation_speed: Box<dyn RotationSpeedSource>,
}

impl UiController {
    pub fn new(rotation_speed: Box<dyn RotationSpeedSource>) -> Self {
        Self { rotation_speed }
    }

    pub fn set_rotation_speed_source(&mut self, rotation_speed: Box<dyn RotationSpeedSource>) {
        self.rotation_speed = rotation_speed;
    }

    pub fn set_rotation_speed(&mut self, value: &str) {
        self.rotation_speed.set_raw_value(value);
        log::debug!("Auto-rotation speed set to {}", self.rotation_speed.speed());
    }

    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed.speed()
    }

    /// Returns whether the event was consumed
    pub fn process_events(&mut self, event: &WindowEvent) -> bool {
        let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    state: ElementState::Pressed,
                    physical_key: PhysicalKey::Code(keycode),
                    ..
                },
            ..
        } = *event
        else {
            return false;
        };

        match keycode {
            KeyCode::BracketRight => self.rotation_speed.step(SPEED_STEP),
            KeyCode::BracketLeft => self.rotation_speed.step(-SPEED_STEP),
            KeyCode::Digit0 => self.rotation_speed.set_raw_value("0"),
            _ => return false,
        }

        log::info!("Auto-rotation speed: {}", self.rotation_speed.speed());
        true
    }

    /// Applied once per frame.
    pub fn auto_rotate(&self, globe: &mut GlobeState) {
        globe.rotate(0.0, self.rotation_speed.speed());
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("0.001", 0.001)]
    #[case(" 0.02 ", 0.02)]
    #[case("-0.005", -0.005)]
    #[case("0", 0.0)]
    #[case("", 0.0)]
    #[case("fast", 0.0)]
    #[case("NaN", 0.0)]
    #[case("inf", 0.0)]
    #[case("-infinity", 0.0)]
    fn rotation_speed_parsing_falls_back_to_zero(#[case] raw: &str, #[case] expected: f32) {
        assert_relative_eq!(parse_rotation_speed(raw), expected);
    }

    #[test]
    fn auto_rotation_accumulates_every_frame() {
        let controller = UiController::new(Box::new(ManualRotationSpeed::new("0.01")));
        let mut globe = GlobeState::new(16);

        (0..100).for_each(|_| controller.auto_rotate(&mut globe));

        assert_relative_eq!(globe.rotation.y, PI + 1.0, epsilon = 1e-4);
        assert_relative_eq!(globe.rotation.x, 0.0);
    }

    #[test]
    fn invalid_speed_leaves_globe_still() {
        let mut controller = UiController::new(Box::new(ManualRotationSpeed::new("0.01")));
        controller.set_rotation_speed("not a number");
        let mut globe = GlobeState::new(16);

        controller.auto_rotate(&mut globe);

        assert_relative_eq!(globe.rotation.y, PI);
        assert!(globe.rotation.y.is_finite());
    }

    #[test]
    fn stepping_adjusts_speed() {
        let mut source = ManualRotationSpeed::new("0.001");

        source.step(SPEED_STEP);
        assert_relative_eq!(source.speed(), 0.002, epsilon = 1e-6);

        source.step(-3.0 * SPEED_STEP);
        assert_relative_eq!(source.speed(), -0.001, epsilon = 1e-6);
    }
}
