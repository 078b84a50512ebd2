/// Platform-agnostic pointer handling and the virtual touchpad
use glam::Vec2;

use crate::model::DirectionalInput;

/// Platform-independent input events, positions in window pixels (top-left origin)
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { id: u64, x: f32, y: f32 },
    PointerMove { id: u64, x: f32, y: f32 },
    PointerUp { id: u64, x: f32, y: f32 },

    // Window events
    FocusLost,
}

/// Source of the per-frame steering vector
pub trait InputSampler {
    fn sample(&self) -> DirectionalInput;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn contains(&self, p: Vec2) -> bool {
        self.center.distance_squared(p) <= self.radius * self.radius
    }
}

/// Axis-aligned rectangle in UI world units, bottom-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiRect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl UiRect {
    pub fn to_local(&self, p: Vec2) -> Vec2 {
        p - self.origin
    }
}

/// On-screen joystick. The knob follows the pointer inside the knob circle and
/// reports its offset from the center, normalized by the knob radius.
pub struct Touchpad {
    pub bounds: UiRect,
    pub knob_size: Vec2,
    touch: Circle,
    knob_area: Circle,
    deadzone: Circle,
    /// Widget-local knob center
    knob_position: Vec2,
    knob_percent: Vec2,
    active_pointer: Option<u64>,
}

impl Touchpad {
    pub fn new(bounds: UiRect, deadzone_radius: f32, knob_size: Vec2) -> Self {
        let half = bounds.size / 2.0;
        let touch_radius = half.x.min(half.y);
        let knob_radius = (touch_radius - knob_size.x.max(knob_size.y) / 2.0).max(0.0);
        Self {
            bounds,
            knob_size,
            touch: Circle { center: half, radius: touch_radius },
            knob_area: Circle { center: half, radius: knob_radius },
            deadzone: Circle { center: half, radius: deadzone_radius },
            knob_position: half,
            knob_percent: Vec2::ZERO,
            active_pointer: None,
        }
    }

    pub fn is_touched(&self) -> bool {
        self.active_pointer.is_some()
    }

    pub fn knob_percent(&self) -> Vec2 {
        self.knob_percent
    }

    /// Knob center in UI world units
    pub fn knob_world_position(&self) -> Vec2 {
        self.bounds.origin + self.knob_position
    }

    /// Returns true when the touch was captured by the pad
    pub fn touch_down(&mut self, pointer: u64, local: Vec2) -> bool {
        if self.active_pointer.is_some() || !self.touch.contains(local) {
            return false;
        }
        self.active_pointer = Some(pointer);
        self.update_knob(local, false);
        true
    }

    pub fn touch_dragged(&mut self, pointer: u64, local: Vec2) {
        if self.active_pointer == Some(pointer) {
            self.update_knob(local, false);
        }
    }

    pub fn touch_up(&mut self, pointer: u64, local: Vec2) {
        if self.active_pointer == Some(pointer) {
            self.active_pointer = None;
            self.update_knob(local, true);
        }
    }

    /// Drop any active touch, e.g. when the window loses focus
    pub fn release(&mut self) {
        self.active_pointer = None;
        self.knob_position = self.knob_area.center;
        self.knob_percent = Vec2::ZERO;
    }

    fn update_knob(&mut self, local: Vec2, reset: bool) {
        let center = self.knob_area.center;
        self.knob_position = center;
        self.knob_percent = Vec2::ZERO;

        if reset || self.deadzone.contains(local) || self.knob_area.radius <= 0.0 {
            return;
        }

        let mut percent = (local - center) / self.knob_area.radius;
        let length = percent.length();
        if length > 1.0 {
            percent /= length;
        }
        self.knob_percent = percent;

        self.knob_position = if self.knob_area.contains(local) {
            local
        } else {
            center + percent.normalize_or_zero() * self.knob_area.radius
        };
    }
}

impl InputSampler for Touchpad {
    fn sample(&self) -> DirectionalInput {
        DirectionalInput::new(self.knob_percent.x, self.knob_percent.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad() -> Touchpad {
        Touchpad::new(
            UiRect { origin: Vec2::new(15.0, 15.0), size: Vec2::new(200.0, 200.0) },
            10.0,
            Vec2::new(64.0, 64.0),
        )
    }

    #[test]
    fn untouched_pad_samples_zero() {
        assert!(pad().sample().is_zero());
    }

    #[test]
    fn touch_outside_circle_is_ignored() {
        let mut pad = pad();
        // the corner of the widget lies outside the touch circle
        assert!(!pad.touch_down(0, Vec2::new(2.0, 2.0)));
        assert!(!pad.is_touched());
        assert!(pad.sample().is_zero());
    }

    #[test]
    fn deadzone_reports_zero() {
        let mut pad = pad();
        assert!(pad.touch_down(0, Vec2::new(105.0, 100.0)));
        assert!(pad.is_touched());
        assert!(pad.sample().is_zero());
    }

    #[test]
    fn drag_inside_knob_area_is_proportional() {
        let mut pad = pad();
        pad.touch_down(0, Vec2::new(100.0, 100.0));
        // knob radius = 100 - 32 = 68
        pad.touch_dragged(0, Vec2::new(134.0, 100.0));
        let input = pad.sample();
        assert!((input.x - 0.5).abs() < 1e-6);
        assert_eq!(input.y, 0.0);
        assert_eq!(pad.knob_world_position(), Vec2::new(149.0, 115.0));
    }

    #[test]
    fn drag_past_edge_is_unit_length_and_knob_clamped() {
        let mut pad = pad();
        pad.touch_down(0, Vec2::new(100.0, 100.0));
        pad.touch_dragged(0, Vec2::new(100.0, 400.0));
        let input = pad.sample();
        assert_eq!(input, DirectionalInput::new(0.0, 1.0));
        assert!((pad.knob_world_position() - Vec2::new(115.0, 183.0)).length() < 1e-4);
    }

    #[test]
    fn release_resets_knob() {
        let mut pad = pad();
        pad.touch_down(0, Vec2::new(100.0, 100.0));
        pad.touch_dragged(0, Vec2::new(160.0, 160.0));
        assert!(!pad.sample().is_zero());
        pad.touch_up(0, Vec2::new(160.0, 160.0));
        assert!(pad.sample().is_zero());
        assert_eq!(pad.knob_world_position(), Vec2::new(115.0, 115.0));
    }

    #[test]
    fn second_pointer_cannot_steal_the_pad() {
        let mut pad = pad();
        pad.touch_down(1, Vec2::new(150.0, 100.0));
        assert!(!pad.touch_down(2, Vec2::new(50.0, 100.0)));
        pad.touch_dragged(2, Vec2::new(50.0, 100.0));
        assert!(pad.sample().x > 0.0);
        pad.touch_up(2, Vec2::new(50.0, 100.0));
        assert!(pad.is_touched());
    }
}
