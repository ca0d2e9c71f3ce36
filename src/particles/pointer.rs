use super::config::POINTER_SENTINEL;

/// Latest pointer position in field (device-pixel) space.
///
/// Written by input handlers, read by the physics step. Each write replaces
/// the previous one; nothing is queued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    x: f32,
    y: f32,
    radius: f32,
}

/// On-screen bounds of the canvas, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
}

impl PointerState {
    pub fn new(radius: f32) -> Self {
        Self {
            x: POINTER_SENTINEL,
            y: POINTER_SENTINEL,
            radius,
        }
    }

    pub fn position(&self) -> [f32; 2] {
        [self.x, self.y]
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Maps a pointer or primary-touch client coordinate into field space.
    pub fn track(&mut self, client_x: f64, client_y: f64, rect: CanvasRect, dpr: f32) {
        let dpr = dpr as f64;
        self.x = ((client_x - rect.left) * dpr) as f32;
        self.y = ((client_y - rect.top) * dpr) as f32;
    }

    pub fn leave(&mut self) {
        self.x = POINTER_SENTINEL;
        self.y = POINTER_SENTINEL;
    }

    pub fn is_away(&self) -> bool {
        self.x == POINTER_SENTINEL && self.y == POINTER_SENTINEL
    }
}

#[cfg(test)]
mod tests {
    use super::{CanvasRect, PointerState};
    use crate::particles::simulation::repulsion_direction;

    #[test]
    fn starts_off_canvas() {
        let pointer = PointerState::new(70.0);
        assert!(pointer.is_away());
        assert!(repulsion_direction([0.0, 0.0], &pointer).is_none());
    }

    #[test]
    fn track_maps_client_coordinates_to_device_pixels() {
        let mut pointer = PointerState::new(140.0);
        let rect = CanvasRect {
            left: 20.0,
            top: 64.5,
        };
        pointer.track(120.0, 164.5, rect, 2.0);
        assert_eq!(pointer.position(), [200.0, 200.0]);
        assert!(!pointer.is_away());
    }

    #[test]
    fn leave_puts_every_particle_outside_the_radius() {
        let mut pointer = PointerState::new(140.0);
        pointer.track(300.0, 300.0, CanvasRect::default(), 2.0);
        pointer.leave();

        for x in (0..4000).step_by(250) {
            for y in (0..2000).step_by(250) {
                assert!(repulsion_direction([x as f32, y as f32], &pointer).is_none());
            }
        }
    }

    #[test]
    fn latest_write_wins() {
        let mut pointer = PointerState::new(70.0);
        pointer.track(10.0, 10.0, CanvasRect::default(), 1.0);
        pointer.track(30.0, 40.0, CanvasRect::default(), 1.0);
        assert_eq!(pointer.position(), [30.0, 40.0]);
    }
}
