use std::collections::HashMap;

use msgs::box_data::{BoxId, Position};
use msgs::direction::Direction;

use crate::route::BoxMove;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cell {
    Occupied(BoxId),
    Free,
    Blocked,
}

/// A client-side mirror of the warehouse, rebuilt from each snapshot.
/// Cells can additionally be marked blocked to reserve them while a route
/// is being assembled.
#[derive(Clone)]
pub struct Grid {
    width: i32,
    depth: i32,
    height: i32,
    box_positions: HashMap<BoxId, Position>,
    matrix: Vec<Vec<Vec<Cell>>>,
}

impl Grid {
    pub fn new(width: i32, depth: i32, height: i32) -> Grid {
        Grid {
            width,
            depth,
            height,
            box_positions: HashMap::new(),
            matrix: vec![vec![vec![Cell::Free; height as usize]; depth as usize]; width as usize],
        }
    }

    pub fn insert_box(&mut self, box_id: BoxId, position: Position) {
        self.box_positions.insert(box_id, position);
        self.set(position, Cell::Occupied(box_id));
    }

    fn cell(&self, position: Position) -> Cell {
        if !self.in_bounds(position) {
            return Cell::Blocked;
        }
        self.matrix[position.x as usize][position.y as usize][position.z as usize]
    }

    fn set(&mut self, position: Position, cell: Cell) {
        self.matrix[position.x as usize][position.y as usize][position.z as usize] = cell;
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        (0..self.width).contains(&position.x)
            && (0..self.depth).contains(&position.y)
            && (0..self.height).contains(&position.z)
    }

    pub fn box_position(&self, box_id: BoxId) -> Option<Position> {
        self.box_positions.get(&box_id).copied()
    }

    pub fn box_id_at(&self, position: Position) -> Option<BoxId> {
        match self.cell(position) {
            Cell::Occupied(box_id) => Some(box_id),
            _ => None,
        }
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        matches!(self.cell(position), Cell::Occupied(_))
    }

    pub fn is_blocked(&self, position: Position) -> bool {
        self.cell(position) == Cell::Blocked
    }

    pub fn support_below(&self, position: Position) -> bool {
        position.z == 0 || self.is_occupied(position + Direction::Down)
    }

    pub fn box_above(&self, position: Position) -> bool {
        self.is_occupied(position + Direction::Up)
    }

    /// Cardinal in-bounds neighbors; routing never changes height on its
    /// own, vertical legs are split out of the finished route instead.
    pub fn adjacent_positions(&self, position: Position) -> Vec<Position> {
        Direction::cardinal()
            .iter()
            .map(|&direction| position + direction)
            .filter(|&adjacent| self.in_bounds(adjacent))
            .collect()
    }

    /// Reserves a free cell; false when something already sits there.
    pub fn block_position(&mut self, position: Position) -> bool {
        if self.is_occupied(position) {
            return false;
        }
        self.set(position, Cell::Blocked);
        true
    }

    pub fn is_valid_move(&self, box_move: BoxMove) -> bool {
        if !self.in_bounds(box_move.destination) {
            return false;
        }
        if self.is_occupied(box_move.destination) || self.is_blocked(box_move.destination) {
            return false;
        }
        if !self.support_below(box_move.destination) {
            return false;
        }
        if self.box_above(box_move.source) {
            return false;
        }
        true
    }

    pub fn apply_move(&mut self, box_move: BoxMove) -> bool {
        if !self.is_valid_move(box_move) {
            return false;
        }

        self.set(box_move.source, Cell::Free);
        self.set(box_move.destination, Cell::Occupied(box_move.box_id));
        self.box_positions.insert(box_move.box_id, box_move.destination);
        true
    }
}
