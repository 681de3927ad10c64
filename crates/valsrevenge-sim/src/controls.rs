//! On-screen joysticks.
//!
//! Two joysticks sit in scene space: movement on the left, attack on the
//! right. A touch that lands inside a joystick's base is tracked by that
//! joystick until it lifts; other touches are ignored here.

use glam::Vec2;

use valsrevenge_core::commands::{TouchEvent, TouchId};
use valsrevenge_core::constants::{JOYSTICK_DEAD_ZONE, JOYSTICK_RANGE};
use valsrevenge_core::enums::Direction;

/// What a touch asks the player to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Move(Direction),
    /// Throw toward this direction; `Stop` means the player's facing.
    Attack(Direction),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joystick {
    pub center: Vec2,
    /// Stick travel per axis.
    pub range: f32,
    /// Radius of the touchable base.
    pub hit_radius: f32,
    touch: Option<TouchId>,
    direction: Direction,
}

impl Joystick {
    pub fn new(center: Vec2, range: f32) -> Self {
        Self {
            center,
            range,
            hit_radius: range * 2.0,
            touch: None,
            direction: Direction::Stop,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.distance(self.center) <= self.hit_radius
    }

    pub fn is_tracking(&self) -> bool {
        self.touch.is_some()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Start tracking `touch` if it landed on the base.
    fn begin(&mut self, touch: TouchId, position: Vec2) -> bool {
        if self.touch.is_some() || !self.contains(position) {
            return false;
        }
        self.touch = Some(touch);
        true
    }

    /// Update the stick. Returns the new direction when it changed.
    fn drag(&mut self, touch: TouchId, position: Vec2) -> Option<Direction> {
        if self.touch != Some(touch) {
            return None;
        }
        let offset = (position - self.center).clamp(Vec2::splat(-self.range), Vec2::splat(self.range));
        let direction = Direction::from_offset(offset, JOYSTICK_DEAD_ZONE);
        if direction == self.direction {
            return None;
        }
        self.direction = direction;
        Some(direction)
    }

    fn end(&mut self, touch: TouchId) -> bool {
        if self.touch != Some(touch) {
            return false;
        }
        self.touch = None;
        self.direction = Direction::Stop;
        true
    }
}

/// Both joysticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    pub movement: Joystick,
    pub attack: Joystick,
}

impl Default for Controls {
    fn default() -> Self {
        Self::new(Vec2::new(-400.0, -200.0), Vec2::new(400.0, -200.0))
    }
}

impl Controls {
    pub fn new(movement_center: Vec2, attack_center: Vec2) -> Self {
        Self {
            movement: Joystick::new(movement_center, JOYSTICK_RANGE),
            attack: Joystick::new(attack_center, JOYSTICK_RANGE),
        }
    }

    /// Translate one touch into at most one action.
    pub fn handle(&mut self, event: TouchEvent) -> Option<ControlAction> {
        match event {
            TouchEvent::Down { touch, position } => {
                if self.movement.begin(touch, position) {
                    None
                } else if self.attack.begin(touch, position) {
                    Some(ControlAction::Attack(Direction::Stop))
                } else {
                    None
                }
            }
            TouchEvent::Moved { touch, position } => {
                if let Some(direction) = self.movement.drag(touch, position) {
                    return Some(ControlAction::Move(direction));
                }
                match self.attack.drag(touch, position) {
                    Some(Direction::Stop) | None => None,
                    Some(direction) => Some(ControlAction::Attack(direction)),
                }
            }
            TouchEvent::Up { touch, .. } => {
                if self.movement.end(touch) {
                    Some(ControlAction::Move(Direction::Stop))
                } else {
                    self.attack.end(touch);
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(id: u64, x: f32, y: f32) -> TouchEvent {
        TouchEvent::Down {
            touch: TouchId(id),
            position: Vec2::new(x, y),
        }
    }

    fn moved(id: u64, x: f32, y: f32) -> TouchEvent {
        TouchEvent::Moved {
            touch: TouchId(id),
            position: Vec2::new(x, y),
        }
    }

    fn up(id: u64) -> TouchEvent {
        TouchEvent::Up {
            touch: TouchId(id),
            position: Vec2::ZERO,
        }
    }

    #[test]
    fn movement_stick_quantizes_and_stops() {
        let mut controls = Controls::new(Vec2::ZERO, Vec2::new(500.0, 0.0));
        assert_eq!(controls.handle(down(1, 5.0, 5.0)), None);
        assert!(controls.movement.is_tracking());
        assert_eq!(
            controls.handle(moved(1, 200.0, 0.0)),
            Some(ControlAction::Move(Direction::Right))
        );
        // Same sector again: no new action.
        assert_eq!(controls.handle(moved(1, 40.0, 3.0)), None);
        assert_eq!(
            controls.handle(moved(1, -30.0, 30.0)),
            Some(ControlAction::Move(Direction::TopLeft))
        );
        assert_eq!(controls.handle(up(1)), Some(ControlAction::Move(Direction::Stop)));
        assert!(!controls.movement.is_tracking());
    }

    #[test]
    fn offset_clamped_per_axis() {
        let mut controls = Controls::new(Vec2::ZERO, Vec2::new(500.0, 0.0));
        controls.handle(down(1, 0.0, 0.0));
        // Clamped to (55, 55), which still reads as a diagonal.
        assert_eq!(
            controls.handle(moved(1, 900.0, 200.0)),
            Some(ControlAction::Move(Direction::TopRight))
        );
    }

    #[test]
    fn attack_stick_fires_on_press_and_aim() {
        let mut controls = Controls::new(Vec2::ZERO, Vec2::new(500.0, 0.0));
        assert_eq!(
            controls.handle(down(2, 510.0, 0.0)),
            Some(ControlAction::Attack(Direction::Stop))
        );
        assert_eq!(
            controls.handle(moved(2, 500.0, 40.0)),
            Some(ControlAction::Attack(Direction::Up))
        );
        assert_eq!(controls.handle(up(2)), None);
    }

    #[test]
    fn two_fingers_tracked_independently() {
        let mut controls = Controls::new(Vec2::ZERO, Vec2::new(500.0, 0.0));
        controls.handle(down(1, 0.0, 0.0));
        controls.handle(down(2, 500.0, 0.0));
        // Finger 2 dragging does not move the movement stick.
        assert_eq!(
            controls.handle(moved(2, 460.0, 0.0)),
            Some(ControlAction::Attack(Direction::Left))
        );
        assert_eq!(controls.movement.direction(), Direction::Stop);
        assert_eq!(
            controls.handle(moved(1, 0.0, -50.0)),
            Some(ControlAction::Move(Direction::Down))
        );
    }

    #[test]
    fn touches_off_the_sticks_are_ignored() {
        let mut controls = Controls::new(Vec2::ZERO, Vec2::new(500.0, 0.0));
        assert_eq!(controls.handle(down(3, 250.0, 250.0)), None);
        assert_eq!(controls.handle(moved(3, 260.0, 250.0)), None);
        assert_eq!(controls.handle(up(3)), None);
    }
}
