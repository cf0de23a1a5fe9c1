/// Discrete input events and the held-direction bookkeeping for the ship.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
    Escape,
    Enter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    KeyUp(Key),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Which direction keys are down, and which went down last.
///
/// Pressing one direction while the other is held overrides it; releasing
/// the overriding key hands control back to the one still held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldDirections {
    pub left: bool,
    pub right: bool,
    pub latest: Option<Direction>,
}

impl HeldDirections {
    pub fn press(&mut self, dir: Direction) {
        match dir {
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
        }
        self.latest = Some(dir);
    }

    pub fn release(&mut self, dir: Direction) {
        match dir {
            Direction::Left => self.left = false,
            Direction::Right => self.right = false,
        }
        self.latest = match (self.left, self.right) {
            (true, false) => Some(Direction::Left),
            (false, true) => Some(Direction::Right),
            (false, false) => None,
            (true, true) => self.latest,
        };
    }

    /// The direction currently steering the ship, if any.
    pub fn active(&self) -> Option<Direction> {
        match (self.left, self.right) {
            (true, true) => self.latest,
            (true, false) => Some(Direction::Left),
            (false, true) => Some(Direction::Right),
            (false, false) => None,
        }
    }

    /// Horizontal velocity for a ship moving at `speed`.
    pub fn velocity(&self, speed: f32) -> f32 {
        match self.active() {
            Some(Direction::Left) => -speed,
            Some(Direction::Right) => speed,
            None => 0.0,
        }
    }
}

impl Key {
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            _ => None,
        }
    }
}
