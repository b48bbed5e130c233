use glam::DVec2;

/// Drag state of the pointer over the viewport.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointerState {
    dragging: bool,
    previous_position: DVec2,
}

impl PointerState {
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn previous_position(&self) -> DVec2 {
        self.previous_position
    }

    /// The previous position is left alone, so the first move after a press
    /// is measured from wherever the pointer was last seen.
    pub fn press(&mut self) {
        self.dragging = true;
    }

    pub fn release(&mut self) {
        self.dragging = false;
    }

    /// Records the new position and returns the offset from the previous one
    /// while a drag is in progress.
    pub fn moved_to(&mut self, position: DVec2) -> Option<DVec2> {
        let delta = position - self.previous_position;
        self.previous_position = position;
        self.dragging.then_some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_are_tracked_while_idle() {
        let mut pointer = PointerState::default();

        assert_eq!(pointer.moved_to(DVec2::new(5.0, 7.0)), None);
        assert_eq!(pointer.previous_position(), DVec2::new(5.0, 7.0));
        assert!(!pointer.is_dragging());
    }

    #[test]
    fn first_delta_after_press_uses_last_seen_position() {
        let mut pointer = PointerState::default();
        pointer.moved_to(DVec2::new(10.0, 10.0));

        pointer.press();

        assert_eq!(
            pointer.moved_to(DVec2::new(30.0, 5.0)),
            Some(DVec2::new(20.0, -5.0))
        );
        assert_eq!(
            pointer.moved_to(DVec2::new(31.0, 5.0)),
            Some(DVec2::new(1.0, 0.0))
        );
    }

    #[test]
    fn release_ends_the_drag() {
        let mut pointer = PointerState::default();
        pointer.press();
        pointer.release();

        assert_eq!(pointer.moved_to(DVec2::new(1.0, 1.0)), None);
    }
}
