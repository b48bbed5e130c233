use glam::DVec2;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};

use crate::data::application_data::ApplicationData;

/// Radians of rotation per logical pixel of drag.
pub const DRAG_SENSITIVITY: f64 = 0.005;
/// Camera distance per logical pixel of wheel scroll.
pub const ZOOM_SPEED: f32 = 0.1;
/// Pixel equivalent of one wheel line, as browsers report `DOM_DELTA_LINE`.
pub const PIXELS_PER_LINE: f32 = 100.0;

/// Converts pointer and wheel events into globe rotation and camera distance.
#[derive(Debug)]
pub struct InputController {
    drag_sensitivity: f64,
    zoom_speed: f32,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new(DRAG_SENSITIVITY, ZOOM_SPEED)
    }
}

impl InputController {
    pub fn new(drag_sensitivity: f64, zoom_speed: f32) -> Self {
        Self {
            drag_sensitivity,
            zoom_speed,
        }
    }

    /// Returns whether the event was consumed. Positions and pixel deltas
    /// are converted to logical pixels before being applied.
    pub fn process_events(&self, event: &WindowEvent, data: &mut ApplicationData) -> bool {
        match *event {
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                data.set_scale_factor(scale_factor);
                false
            }
            WindowEvent::MouseInput { state, .. } => {
                match state {
                    ElementState::Pressed => data.pointer.press(),
                    ElementState::Released => data.pointer.release(),
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = position.to_logical::<f64>(data.scale_factor());
                self.pointer_moved(DVec2::new(position.x, position.y), data);
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.wheel(wheel_delta_pixels(delta, data.scale_factor()), data);
                true
            }
            _ => false,
        }
    }

    pub fn pointer_moved(&self, position: DVec2, data: &mut ApplicationData) {
        if let Some(delta) = data.pointer.moved_to(position) {
            let delta = delta * self.drag_sensitivity;
            // Horizontal drag spins around the vertical axis and vice versa
            data.globe.rotate(delta.y as f32, delta.x as f32);
        }
    }

    /// Positive deltas scroll "down" and move the camera away from the globe.
    pub fn wheel(&self, delta_y: f32, data: &mut ApplicationData) {
        data.camera.zoom(delta_y * self.zoom_speed);
    }
}

/// Vertical wheel movement in browser `deltaY` convention: logical pixels,
/// positive when scrolling down. winit reports the opposite sign.
pub fn wheel_delta_pixels(delta: MouseScrollDelta, scale_factor: f64) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * PIXELS_PER_LINE,
        MouseScrollDelta::PixelDelta(position) => {
            -position.to_logical::<f64>(scale_factor).y as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use approx::assert_relative_eq;
    use rstest::rstest;
    use winit::{
        dpi::{LogicalPosition, PhysicalPosition},
        event::{DeviceId, MouseButton},
    };

    use super::*;
    use crate::data::camera::{DEFAULT_DISTANCE, MAX_DISTANCE, MIN_DISTANCE};

    fn data() -> ApplicationData {
        ApplicationData::new((800.0, 600.0).into(), 16)
    }

    #[test]
    fn horizontal_drag_spins_around_vertical_axis() {
        let controller = InputController::default();
        let mut data = data();
        controller.pointer_moved(DVec2::new(200.0, 300.0), &mut data);

        data.pointer.press();
        controller.pointer_moved(DVec2::new(300.0, 300.0), &mut data);

        assert_relative_eq!(data.globe.rotation.y, PI + 0.5, epsilon = 1e-6);
        assert_relative_eq!(data.globe.rotation.x, 0.0);
    }

    #[test]
    fn vertical_drag_tilts_around_horizontal_axis() {
        let controller = InputController::default();
        let mut data = data();
        data.pointer.press();

        controller.pointer_moved(DVec2::new(0.0, -40.0), &mut data);

        assert_relative_eq!(data.globe.rotation.x, -0.2, epsilon = 1e-6);
        assert_relative_eq!(data.globe.rotation.y, PI);
    }

    #[test]
    fn moving_without_a_drag_does_not_rotate() {
        let controller = InputController::default();
        let mut data = data();

        controller.pointer_moved(DVec2::new(500.0, 500.0), &mut data);
        data.pointer.press();
        data.pointer.release();
        controller.pointer_moved(DVec2::new(0.0, 0.0), &mut data);

        assert_relative_eq!(data.globe.rotation.x, 0.0);
        assert_relative_eq!(data.globe.rotation.y, PI);
    }

    #[rstest]
    #[case(100.0, DEFAULT_DISTANCE + 10.0)]
    #[case(-100.0, DEFAULT_DISTANCE - 10.0)]
    #[case(10_000.0, MAX_DISTANCE)]
    #[case(-10_000.0, MIN_DISTANCE)]
    fn wheel_zooms_within_bounds(#[case] delta_y: f32, #[case] expected: f32) {
        let controller = InputController::default();
        let mut data = data();

        controller.wheel(delta_y, &mut data);

        assert_relative_eq!(data.camera.distance(), expected, epsilon = 1e-4);
    }

    #[test]
    fn any_wheel_sequence_stays_clamped() {
        let controller = InputController::default();
        let mut data = data();

        [-400.0, 2000.0, 35.5, -90_000.0, 120.0, 1e9, -3.0]
            .into_iter()
            .for_each(|delta_y| {
                controller.wheel(delta_y, &mut data);
                let distance = data.camera.distance();
                assert!((MIN_DISTANCE..=MAX_DISTANCE).contains(&distance));
            });
    }

    #[rstest]
    #[case(MouseScrollDelta::LineDelta(0.0, -1.0), 1.0, 100.0)]
    #[case(MouseScrollDelta::LineDelta(0.0, 3.0), 2.0, -300.0)]
    #[case(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -53.0)), 1.0, 53.0)]
    #[case(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -106.0)), 2.0, 53.0)]
    fn wheel_deltas_follow_browser_convention(
        #[case] delta: MouseScrollDelta,
        #[case] scale_factor: f64,
        #[case] expected: f32,
    ) {
        assert_relative_eq!(wheel_delta_pixels(delta, scale_factor), expected);
    }

    fn device_id() -> DeviceId {
        // SAFETY: only used to build synthetic events in tests
        unsafe { DeviceId::dummy() }
    }

    fn cursor_at(x: f64, y: f64, scale_factor: f64) -> WindowEvent {
        WindowEvent::CursorMoved {
            device_id: device_id(),
            position: LogicalPosition::new(x, y).to_physical(scale_factor),
        }
    }

    #[rstest]
    #[case(1.0)]
    #[case(1.5)]
    #[case(2.0)]
    fn drag_is_measured_in_logical_pixels(#[case] scale_factor: f64) {
        let controller = InputController::default();
        let mut data = data();
        data.set_scale_factor(scale_factor);

        controller.process_events(&cursor_at(200.0, 300.0, scale_factor), &mut data);
        controller.process_events(
            &WindowEvent::MouseInput {
                device_id: device_id(),
                state: ElementState::Pressed,
                button: MouseButton::Left,
            },
            &mut data,
        );
        controller.process_events(&cursor_at(300.0, 300.0, scale_factor), &mut data);

        assert_relative_eq!(data.globe.rotation.y, PI + 0.5, epsilon = 1e-5);
        assert_relative_eq!(data.globe.rotation.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn pixel_wheel_zoom_is_measured_in_logical_pixels() {
        let controller = InputController::default();
        let mut data = data();
        data.set_scale_factor(2.0);

        controller.process_events(
            &WindowEvent::MouseWheel {
                device_id: device_id(),
                delta: MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -200.0)),
                phase: winit::event::TouchPhase::Moved,
            },
            &mut data,
        );

        assert_relative_eq!(
            data.camera.distance(),
            DEFAULT_DISTANCE + 10.0,
            epsilon = 1e-4
        );
    }
}
