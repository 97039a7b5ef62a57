use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;

pub type BoxId = i32;

/// One row of a state snapshot: id followed by the three coordinates.
/// Serializes as a plain JSON array, which is the wire layout the
/// control-panel clients expect.
pub type BoxState = (BoxId, i32, i32, i32);

pub const WIDTH: i32 = 10;
pub const DEPTH: i32 = 10;
pub const HEIGHT: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub fn new(x: i32, y: i32, z: i32) -> Position {
        Position { x, y, z }
    }
}

impl Add<Direction> for Position {
    type Output = Position;

    fn add(self, direction: Direction) -> Position {
        let (dx, dy, dz) = direction.offset();
        Position {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
