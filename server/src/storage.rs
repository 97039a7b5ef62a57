use std::collections::{HashMap, HashSet};

use msgs::box_data::{BoxId, BoxState, Position};
use msgs::direction::Direction;

use crate::error::StorageError;

/// The authoritative warehouse grid. Every box occupies one cell; gravity
/// is enforced through the stability checks, with one escape hatch: a box
/// may slide or climb into midair, which marks it unstable, and the next
/// move must settle it again.
pub struct Storage {
    boxes: HashMap<BoxId, Position>,
    matrix: Vec<Vec<Vec<Option<BoxId>>>>,
    width: i32,
    depth: i32,
    height: i32,
    unstable_box_id: Option<BoxId>,
}

impl Storage {
    pub fn new(width: i32, depth: i32, height: i32) -> Storage {
        Storage {
            boxes: HashMap::new(),
            matrix: vec![vec![vec![None; height as usize]; depth as usize]; width as usize],
            width,
            depth,
            height,
            unstable_box_id: None,
        }
    }

    pub fn box_position(&self, box_id: BoxId) -> Option<Position> {
        self.boxes.get(&box_id).copied()
    }

    pub fn unstable_box_id(&self) -> Option<BoxId> {
        self.unstable_box_id
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        (0..self.width).contains(&position.x)
            && (0..self.depth).contains(&position.y)
            && (0..self.height).contains(&position.z)
    }

    pub fn box_at(&self, position: Position) -> Option<BoxId> {
        if !self.in_bounds(position) {
            return None;
        }
        self.matrix[position.x as usize][position.y as usize][position.z as usize]
    }

    pub fn occupied(&self, position: Position) -> bool {
        self.box_at(position).is_some()
    }

    // Stable: on the ground, or resting on a box other than `ignore`.
    fn is_stable(&self, position: Position, ignore: Option<BoxId>) -> bool {
        if position.z == 0 {
            return true;
        }
        match self.box_at(position + Direction::Down) {
            Some(below) => ignore != Some(below),
            None => false,
        }
    }

    fn add_checks(&self, box_id: BoxId, position: Position) -> Result<(), StorageError> {
        if box_id < 1 {
            return Err(StorageError::NonPositiveBoxId);
        }
        if !self.in_bounds(position) {
            return Err(StorageError::AddOutOfBounds);
        }
        if self.boxes.contains_key(&box_id) {
            return Err(StorageError::BoxAlreadyExists);
        }
        if self.occupied(position) {
            return Err(StorageError::PositionOccupied);
        }
        if !self.is_stable(position, None) {
            return Err(StorageError::AddInMidair);
        }
        Ok(())
    }

    pub fn add_box(&mut self, box_id: BoxId, position: Position) -> Result<(), StorageError> {
        self.add_checks(box_id, position)?;
        self.place(box_id, position);
        Ok(())
    }

    /// Places a box without any checks, used when mirroring a snapshot or
    /// staging a scenario. Placing into midair marks the box unstable.
    pub fn add_box_unchecked(&mut self, box_id: BoxId, position: Position) {
        if !self.is_stable(position, None) {
            self.unstable_box_id = Some(box_id);
        }
        self.place(box_id, position);
    }

    fn place(&mut self, box_id: BoxId, position: Position) {
        self.boxes.insert(box_id, position);
        self.matrix[position.x as usize][position.y as usize][position.z as usize] = Some(box_id);

        // Sliding a box underneath the unstable box settles it.
        if self.unstable_box_id.is_some() && self.box_at(position + Direction::Up) == self.unstable_box_id
        {
            self.unstable_box_id = None;
        }
    }

    fn remove_checks(&self, box_id: BoxId) -> Result<Position, StorageError> {
        let position = self
            .box_position(box_id)
            .ok_or(StorageError::RemoveMissingBox)?;

        if self.occupied(position + Direction::Up) {
            return Err(StorageError::RemoveSupportingBox);
        }

        // The unstable box may be halfway up this box's side:
        // 0 0 1 0            0 0 1 0
        // 0 2 0 0 --del 2--> 0 0 0 0 ?!? (nothing left to climb against)
        // 0 3 0 0            0 3 0 0
        if let Some(unstable) = self.unstable_box_id {
            if unstable != box_id {
                let above = position + Direction::Up;
                for direction in Direction::cardinal() {
                    let hook = above + direction;
                    if self.in_bounds(hook) && self.box_at(hook) == Some(unstable) {
                        return Err(StorageError::RemoveClimbedBox);
                    }
                }
            }
        }

        Ok(position)
    }

    pub fn remove_box(&mut self, box_id: BoxId) -> Result<(), StorageError> {
        let position = self.remove_checks(box_id)?;

        self.matrix[position.x as usize][position.y as usize][position.z as usize] = None;
        self.boxes.remove(&box_id);

        if self.unstable_box_id == Some(box_id) {
            self.unstable_box_id = None;
        }

        Ok(())
    }

    /// Checks whether a box may move in a direction; on success returns the
    /// unstable-box marker the move would leave behind.
    pub fn can_move(
        &self,
        box_id: BoxId,
        direction: Direction,
    ) -> Result<Option<BoxId>, StorageError> {
        let current = self
            .box_position(box_id)
            .ok_or(StorageError::MoveMissingBox)?;
        let next = current + direction;
        let mut new_unstable = self.unstable_box_id;

        if !self.in_bounds(next) {
            return Err(StorageError::OutOfBounds);
        }
        if self.occupied(next) {
            return Err(StorageError::Blocked);
        }
        if self.occupied(current + Direction::Up) {
            return Err(StorageError::MoveSupportingBox);
        }

        if let Some(unstable) = self.unstable_box_id {
            if unstable != box_id {
                return Err(StorageError::UnstableBoxUnresolved);
            }
            if !self.is_stable(next, Some(unstable)) {
                return Err(StorageError::UnstableDestination);
            }
            new_unstable = None;
        }

        if direction == Direction::Up {
            // A box can only go up by clinging to a neighbor's side.
            let side_supported = Direction::cardinal()
                .iter()
                .any(|&side| self.occupied(current + side));
            if !side_supported {
                return Err(StorageError::ClimbWithoutSupport);
            }
            new_unstable = Some(box_id);
        } else if !self.is_stable(next, None) {
            // Legal, but the box hangs in midair until the next move.
            new_unstable = Some(box_id);
        }

        Ok(new_unstable)
    }

    pub fn move_box(&mut self, box_id: BoxId, direction: Direction) -> Result<(), StorageError> {
        let new_unstable = self.can_move(box_id, direction)?;

        let current = self
            .box_position(box_id)
            .ok_or(StorageError::MoveMissingBox)?;
        let next = current + direction;

        self.matrix[current.x as usize][current.y as usize][current.z as usize] = None;
        self.matrix[next.x as usize][next.y as usize][next.z as usize] = Some(box_id);
        self.boxes.insert(box_id, next);
        self.unstable_box_id = new_unstable;

        Ok(())
    }

    /// Validates that all moves could run simultaneously against the
    /// current state, then applies them one by one. A move invalidated by
    /// an earlier one in the same set is skipped.
    pub fn move_multiple_boxes(
        &mut self,
        moves: &[(BoxId, Direction)],
    ) -> Result<(), StorageError> {
        let mut seen = HashSet::new();
        for (box_id, _) in moves {
            if !seen.insert(*box_id) {
                return Err(StorageError::DuplicateBoxInMoveSet);
            }
        }

        for (index, (box_id, direction)) in moves.iter().enumerate() {
            if let Err(e) = self.can_move(*box_id, *direction) {
                return Err(StorageError::InvalidMoveInSet {
                    index,
                    source: Box::new(e),
                });
            }
        }

        for (box_id, direction) in moves {
            let _ = self.move_box(*box_id, *direction);
        }

        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Storage::new(self.width, self.depth, self.height);
    }

    pub fn box_states(&self) -> Vec<BoxState> {
        let mut states: Vec<BoxState> = self
            .boxes
            .iter()
            .map(|(&box_id, &position)| (box_id, position.x, position.y, position.z))
            .collect();
        states.sort();
        states
    }

    /// The legal moveset of every box that is free to move. While an
    /// unstable box exists only its moveset is reported, since nothing
    /// else may move until it settles.
    pub fn available_moves(&self) -> HashMap<Position, Vec<Position>> {
        if let Some(unstable) = self.unstable_box_id {
            let Some(position) = self.box_position(unstable) else {
                return HashMap::new();
            };
            return HashMap::from([(position, self.destinations_for(unstable, position))]);
        }

        self.boxes
            .iter()
            .filter(|&(_, &position)| !self.occupied(position + Direction::Up))
            .map(|(&box_id, &position)| (position, self.destinations_for(box_id, position)))
            .collect()
    }

    fn destinations_for(&self, box_id: BoxId, position: Position) -> Vec<Position> {
        Direction::all()
            .iter()
            .filter(|&&direction| self.can_move(box_id, direction).is_ok())
            .map(|&direction| position + direction)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BOX_ID: BoxId = 1;

    fn pos(x: i32, y: i32, z: i32) -> Position {
        Position::new(x, y, z)
    }

    // One box in the middle of the floor.
    fn single_box() -> Storage {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(TEST_BOX_ID, pos(5, 5, 0)).unwrap();
        storage
    }

    // The test box next to a neighbor it can climb.
    fn single_box_up() -> Storage {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(2, pos(5, 5, 0)).unwrap();
        storage.add_box(TEST_BOX_ID, pos(5, 4, 0)).unwrap();
        storage
    }

    // The test box hanging unstable one cell above the floor.
    fn single_box_down() -> Storage {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(2, pos(5, 5, 0)).unwrap();
        storage.add_box(TEST_BOX_ID, pos(5, 5, 1)).unwrap();
        storage.move_box(TEST_BOX_ID, Direction::North).unwrap();
        storage
    }

    // The test box sealed in on every side.
    fn blocked() -> Storage {
        let mut storage = Storage::new(10, 10, 10);

        storage.add_box(2, pos(1, 1, 0)).unwrap();
        storage.add_box(3, pos(0, 1, 0)).unwrap();
        storage.add_box(4, pos(1, 0, 0)).unwrap();
        storage.add_box(5, pos(1, 2, 0)).unwrap();
        storage.add_box(6, pos(2, 1, 0)).unwrap();

        storage.add_box(TEST_BOX_ID, pos(1, 1, 1)).unwrap();

        storage.add_box(7, pos(1, 2, 1)).unwrap();
        storage.add_box(8, pos(2, 1, 1)).unwrap();
        storage.add_box(9, pos(1, 0, 1)).unwrap();
        storage.add_box(10, pos(0, 1, 1)).unwrap();

        storage.add_box(11, pos(1, 1, 2)).unwrap();

        storage
    }

    // A tiny storage with the test box against the wall the direction runs into.
    fn out_bound_box(direction: Direction) -> Storage {
        let mut storage = Storage::new(2, 2, 2);
        match direction {
            Direction::East | Direction::North | Direction::Up => {
                storage.add_box(42, pos(1, 1, 0)).unwrap();
                storage.add_box(TEST_BOX_ID, pos(1, 1, 1)).unwrap();
            }
            Direction::West => {
                storage.add_box(42, pos(0, 1, 0)).unwrap();
                storage.add_box(TEST_BOX_ID, pos(0, 1, 1)).unwrap();
            }
            Direction::South => {
                storage.add_box(42, pos(1, 0, 0)).unwrap();
                storage.add_box(TEST_BOX_ID, pos(1, 0, 1)).unwrap();
            }
            Direction::Down => {
                storage.add_box(TEST_BOX_ID, pos(0, 0, 0)).unwrap();
            }
        }
        storage
    }

    fn assert_direction_limits(direction: Direction) {
        match direction {
            Direction::Down => {
                let mut storage = single_box_down();
                assert_eq!(storage.move_box(TEST_BOX_ID, Direction::Down), Ok(()));
            }
            Direction::Up => {
                let mut storage = single_box_up();
                assert_eq!(storage.move_box(TEST_BOX_ID, Direction::Up), Ok(()));
            }
            _ => {
                let mut storage = single_box();
                assert_eq!(storage.move_box(TEST_BOX_ID, direction), Ok(()));
            }
        }

        let mut storage = blocked();
        assert_eq!(
            storage.move_box(TEST_BOX_ID, direction),
            Err(StorageError::Blocked)
        );

        let mut storage = out_bound_box(direction);
        assert_eq!(
            storage.move_box(TEST_BOX_ID, direction),
            Err(StorageError::OutOfBounds)
        );
    }

    #[test]
    fn add_box_stores_the_position() {
        let mut storage = Storage::new(10, 10, 10);
        assert!(!storage.occupied(pos(1, 3, 0)));
        storage.add_box(TEST_BOX_ID, pos(1, 3, 0)).unwrap();
        assert_eq!(storage.box_position(TEST_BOX_ID), Some(pos(1, 3, 0)));
    }

    #[test]
    fn remove_box_clears_the_position() {
        let mut storage = single_box();
        storage.remove_box(TEST_BOX_ID).unwrap();
        assert!(!storage.occupied(pos(5, 5, 0)));
    }

    #[test]
    fn north_limits() {
        assert_direction_limits(Direction::North);
    }

    #[test]
    fn east_limits() {
        assert_direction_limits(Direction::East);
    }

    #[test]
    fn south_limits() {
        assert_direction_limits(Direction::South);
    }

    #[test]
    fn west_limits() {
        assert_direction_limits(Direction::West);
    }

    #[test]
    fn up_limits() {
        assert_direction_limits(Direction::Up);
    }

    #[test]
    fn down_limits() {
        assert_direction_limits(Direction::Down);
    }

    #[test]
    fn no_levitating_up() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(TEST_BOX_ID, pos(0, 0, 0)).unwrap();

        assert_eq!(
            storage.can_move(TEST_BOX_ID, Direction::Up),
            Err(StorageError::ClimbWithoutSupport)
        );
        assert_eq!(
            storage.move_box(TEST_BOX_ID, Direction::Up),
            Err(StorageError::ClimbWithoutSupport)
        );
    }

    #[test]
    fn the_ceiling_holds() {
        let mut storage = Storage::new(10, 10, 1);
        storage.add_box(TEST_BOX_ID, pos(0, 0, 0)).unwrap();
        storage.add_box(99, pos(0, 1, 0)).unwrap();

        // With a higher ceiling the box could climb, but there isn't one.
        assert_eq!(
            storage.can_move(TEST_BOX_ID, Direction::Up),
            Err(StorageError::OutOfBounds)
        );
    }

    #[test]
    fn adding_the_same_box_twice_fails() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(TEST_BOX_ID, pos(1, 1, 0)).unwrap();
        assert_eq!(
            storage.add_box(TEST_BOX_ID, pos(2, 1, 0)),
            Err(StorageError::BoxAlreadyExists)
        );
    }

    #[test]
    fn adding_out_of_bounds_fails() {
        let mut storage = Storage::new(10, 10, 10);
        assert_eq!(
            storage.add_box(TEST_BOX_ID, pos(10, 10, 10)),
            Err(StorageError::AddOutOfBounds)
        );
    }

    #[test]
    fn adding_onto_an_occupied_cell_fails() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(TEST_BOX_ID, pos(1, 1, 0)).unwrap();
        assert_eq!(
            storage.add_box(2, pos(1, 1, 0)),
            Err(StorageError::PositionOccupied)
        );
    }

    #[test]
    fn adding_a_non_positive_id_fails() {
        let mut storage = Storage::new(10, 10, 10);
        assert_eq!(
            storage.add_box(0, pos(1, 1, 0)),
            Err(StorageError::NonPositiveBoxId)
        );
        assert_eq!(
            storage.add_box(-5, pos(1, 1, 0)),
            Err(StorageError::NonPositiveBoxId)
        );
    }

    #[test]
    fn removing_a_missing_box_fails() {
        let mut storage = Storage::new(10, 10, 10);
        assert_eq!(
            storage.remove_box(TEST_BOX_ID),
            Err(StorageError::RemoveMissingBox)
        );
    }

    #[test]
    fn moving_a_missing_box_fails() {
        let mut storage = Storage::new(10, 10, 10);
        assert_eq!(
            storage.move_box(TEST_BOX_ID, Direction::North),
            Err(StorageError::MoveMissingBox)
        );
    }

    #[test]
    fn ground_slide() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(TEST_BOX_ID, pos(0, 0, 0)).unwrap();
        assert_eq!(storage.move_box(TEST_BOX_ID, Direction::North), Ok(()));
    }

    #[test]
    fn out_of_bounds_queries() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(TEST_BOX_ID, pos(0, 0, 0)).unwrap();
        assert!(!storage.in_bounds(pos(-1, 0, 0)));
        assert!(!storage.in_bounds(pos(0, -1, 0)));
        assert!(!storage.in_bounds(pos(0, 0, -1)));
        assert!(!storage.in_bounds(pos(42, 100, 3)));
        assert!(storage.occupied(pos(0, 0, 0)));
        assert!(!storage.occupied(pos(1, 0, 0)));
    }

    #[test]
    fn supported_slide() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(8055, pos(0, 0, 0)).unwrap();
        storage.add_box(834, pos(0, 1, 0)).unwrap();
        storage.add_box(TEST_BOX_ID, pos(0, 0, 1)).unwrap();

        assert_eq!(storage.move_box(TEST_BOX_ID, Direction::North), Ok(()));
        assert_eq!(storage.unstable_box_id(), None);
    }

    #[test]
    fn no_floating_addition() {
        let mut storage = Storage::new(10, 10, 10);
        assert_eq!(
            storage.add_box(TEST_BOX_ID, pos(1, 1, 5)),
            Err(StorageError::AddInMidair)
        );
    }

    #[test]
    fn sliding_into_midair_marks_the_box_unstable() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(89, pos(0, 0, 0)).unwrap();
        storage.add_box(TEST_BOX_ID, pos(0, 0, 1)).unwrap();
        storage.move_box(TEST_BOX_ID, Direction::North).unwrap();
        assert_eq!(storage.unstable_box_id(), Some(TEST_BOX_ID));
    }

    #[test]
    fn only_the_unstable_box_may_move() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(89, pos(0, 0, 0)).unwrap();
        storage.add_box(420, pos(5, 5, 0)).unwrap();
        storage.add_box(TEST_BOX_ID, pos(0, 0, 1)).unwrap();

        storage.move_box(TEST_BOX_ID, Direction::North).unwrap();

        assert_eq!(
            storage.move_box(420, Direction::North),
            Err(StorageError::UnstableBoxUnresolved)
        );
    }

    #[test]
    fn the_unstable_box_must_settle() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(89, pos(0, 0, 0)).unwrap();
        storage.add_box(TEST_BOX_ID, pos(0, 0, 1)).unwrap();

        storage.move_box(TEST_BOX_ID, Direction::North).unwrap();

        assert_eq!(
            storage.move_box(TEST_BOX_ID, Direction::North),
            Err(StorageError::UnstableDestination)
        );
    }

    #[test]
    fn moving_back_settles_the_unstable_box() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(89, pos(0, 0, 0)).unwrap();
        storage.add_box(TEST_BOX_ID, pos(0, 0, 1)).unwrap();

        storage.move_box(TEST_BOX_ID, Direction::North).unwrap();

        assert_eq!(storage.move_box(TEST_BOX_ID, Direction::South), Ok(()));
        assert_eq!(storage.unstable_box_id(), None);
    }

    #[test]
    fn stepping_down_settles_the_unstable_box() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(89, pos(0, 0, 0)).unwrap();
        storage.add_box(TEST_BOX_ID, pos(0, 0, 1)).unwrap();

        storage.move_box(TEST_BOX_ID, Direction::North).unwrap();

        assert_eq!(storage.move_box(TEST_BOX_ID, Direction::Down), Ok(()));
        assert_eq!(storage.unstable_box_id(), None);
    }

    #[test]
    fn this_is_not_minecraft() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(89, pos(0, 0, 0)).unwrap();
        storage.add_box(TEST_BOX_ID, pos(0, 0, 1)).unwrap();

        assert_eq!(
            storage.remove_box(89),
            Err(StorageError::RemoveSupportingBox)
        );
    }

    #[test]
    fn top_layer_removal_works() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(89, pos(0, 0, 0)).unwrap();
        storage.add_box(TEST_BOX_ID, pos(0, 0, 1)).unwrap();

        assert_eq!(storage.remove_box(TEST_BOX_ID), Ok(()));
    }

    #[test]
    fn a_supporting_box_cannot_move() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(TEST_BOX_ID, pos(0, 0, 0)).unwrap();
        storage.add_box(89, pos(0, 0, 1)).unwrap();

        assert_eq!(
            storage.move_box(TEST_BOX_ID, Direction::North),
            Err(StorageError::MoveSupportingBox)
        );
    }

    #[test]
    fn climbing_marks_the_box_unstable() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(89, pos(5, 5, 0)).unwrap();
        storage.add_box(TEST_BOX_ID, pos(5, 4, 0)).unwrap();
        storage.move_box(TEST_BOX_ID, Direction::Up).unwrap();

        assert_eq!(storage.unstable_box_id(), Some(TEST_BOX_ID));
    }

    #[test]
    fn removing_the_climbed_box_fails() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(89, pos(5, 5, 0)).unwrap();
        storage.add_box(TEST_BOX_ID, pos(5, 4, 0)).unwrap();
        storage.move_box(TEST_BOX_ID, Direction::Up).unwrap();

        assert_eq!(
            storage.remove_box(89),
            Err(StorageError::RemoveClimbedBox)
        );
    }

    #[test]
    fn removing_the_unstable_box_clears_the_marker() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(TEST_BOX_ID, pos(0, 0, 0)).unwrap();
        storage.add_box(2, pos(0, 1, 0)).unwrap();

        storage.move_box(TEST_BOX_ID, Direction::Up).unwrap();
        storage.remove_box(TEST_BOX_ID).unwrap();

        assert_eq!(storage.unstable_box_id(), None);
    }

    #[test]
    fn adding_underneath_settles_the_unstable_box() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(TEST_BOX_ID, pos(0, 0, 0)).unwrap();
        storage.add_box(2, pos(0, 1, 0)).unwrap();

        storage.move_box(TEST_BOX_ID, Direction::Up).unwrap();
        storage.add_box(4, pos(0, 0, 0)).unwrap();

        assert_eq!(storage.unstable_box_id(), None);
    }

    #[test]
    fn multiple_moves_reject_the_same_box_twice() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(TEST_BOX_ID, pos(5, 5, 0)).unwrap();

        assert_eq!(
            storage.move_multiple_boxes(&[
                (TEST_BOX_ID, Direction::North),
                (TEST_BOX_ID, Direction::East),
            ]),
            Err(StorageError::DuplicateBoxInMoveSet)
        );
    }

    #[test]
    fn multiple_moves_report_the_first_invalid_move() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(1, pos(0, 0, 0)).unwrap();
        storage.add_box(2, pos(0, 1, 0)).unwrap();

        let result = storage.move_multiple_boxes(&[(2, Direction::North), (1, Direction::North)]);
        assert_eq!(
            result,
            Err(StorageError::InvalidMoveInSet {
                index: 1,
                source: Box::new(StorageError::Blocked),
            })
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid Multiple Moves, Move 1 is Invalid with error message: Invalid Move, another box is in the way!"
        );
    }

    #[test]
    fn multiple_moves_apply_together() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(TEST_BOX_ID, pos(5, 5, 0)).unwrap();
        storage.add_box(5, pos(0, 0, 0)).unwrap();

        assert_eq!(
            storage.move_multiple_boxes(&[
                (TEST_BOX_ID, Direction::North),
                (5, Direction::North),
            ]),
            Ok(())
        );
        assert_eq!(storage.box_position(TEST_BOX_ID), Some(pos(5, 6, 0)));
        assert_eq!(storage.box_position(5), Some(pos(0, 1, 0)));
    }

    #[test]
    fn clear_empties_the_storage() {
        let mut storage = single_box();
        storage.clear();
        assert!(storage.is_empty());
        assert!(!storage.occupied(pos(5, 5, 0)));
    }

    #[test]
    fn box_states_are_sorted_by_id() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(9, pos(0, 0, 0)).unwrap();
        storage.add_box(2, pos(3, 3, 0)).unwrap();
        storage.add_box(5, pos(7, 1, 0)).unwrap();

        assert_eq!(
            storage.box_states(),
            vec![(2, 3, 3, 0), (5, 7, 1, 0), (9, 0, 0, 0)]
        );
    }

    fn assert_moves(actual: HashMap<Position, Vec<Position>>, expected: &[(Position, &[Position])]) {
        assert_eq!(
            actual.len(),
            expected.len(),
            "moveset keys differ: {actual:?} vs {expected:?}"
        );
        for (source, destinations) in expected {
            let found = actual
                .get(source)
                .unwrap_or_else(|| panic!("no moveset for {source}"));
            assert_eq!(
                found.len(),
                destinations.len(),
                "destinations for {source} differ: {found:?} vs {destinations:?}"
            );
            for destination in *destinations {
                assert!(
                    found.contains(destination),
                    "missing destination {destination} for {source}: {found:?}"
                );
            }
        }
    }

    #[test]
    fn available_moves_for_one_box() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(123456, pos(0, 0, 0)).unwrap();

        assert_moves(
            storage.available_moves(),
            &[(pos(0, 0, 0), &[pos(0, 1, 0), pos(1, 0, 0)])],
        );
    }

    #[test]
    fn available_moves_for_two_neighbors() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(12345, pos(0, 0, 0)).unwrap();
        storage.add_box(23456, pos(1, 0, 0)).unwrap();

        assert_moves(
            storage.available_moves(),
            &[
                (pos(1, 0, 0), &[pos(1, 1, 0), pos(2, 0, 0), pos(1, 0, 1)]),
                (pos(0, 0, 0), &[pos(0, 1, 0), pos(0, 0, 1)]),
            ],
        );
    }

    #[test]
    fn available_moves_empty_after_removal() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(1, pos(0, 0, 0)).unwrap();
        storage.remove_box(1).unwrap();

        assert!(storage.available_moves().is_empty());
    }

    #[test]
    fn available_moves_follow_a_moved_box() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(1, pos(0, 0, 0)).unwrap();
        storage.move_box(1, Direction::North).unwrap();

        assert_moves(
            storage.available_moves(),
            &[(pos(0, 1, 0), &[pos(1, 1, 0), pos(0, 2, 0), pos(0, 0, 0)])],
        );
    }

    #[test]
    fn a_stacked_box_locks_the_one_below() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(1, pos(0, 0, 0)).unwrap();
        storage.add_box(2, pos(0, 0, 1)).unwrap();

        assert_moves(
            storage.available_moves(),
            &[(pos(0, 0, 1), &[pos(0, 1, 1), pos(1, 0, 1)])],
        );
    }

    #[test]
    fn unstacking_frees_the_box_below() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(1, pos(0, 0, 0)).unwrap();
        storage.add_box(2, pos(0, 0, 1)).unwrap();
        storage.remove_box(2).unwrap();

        assert_moves(
            storage.available_moves(),
            &[(pos(0, 0, 0), &[pos(0, 1, 0), pos(1, 0, 0)])],
        );
    }

    #[test]
    fn available_moves_while_unstable() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(1, pos(4, 4, 0)).unwrap();
        storage.add_box(2, pos(4, 3, 0)).unwrap();

        storage.move_box(2, Direction::Up).unwrap();
        assert_eq!(storage.unstable_box_id(), Some(2));

        assert_moves(
            storage.available_moves(),
            &[(pos(4, 3, 1), &[pos(4, 3, 0), pos(4, 4, 1)])],
        );

        storage.move_box(2, Direction::North).unwrap();
        assert_eq!(storage.unstable_box_id(), None);

        assert_moves(
            storage.available_moves(),
            &[(
                pos(4, 4, 1),
                &[pos(5, 4, 1), pos(4, 5, 1), pos(4, 3, 1), pos(3, 4, 1)],
            )],
        );
    }

    #[test]
    fn available_moves_after_a_forced_midair_add() {
        let mut storage = Storage::new(10, 10, 10);
        storage.add_box(1, pos(4, 4, 0)).unwrap();
        storage.add_box_unchecked(2, pos(4, 3, 1));

        assert_eq!(storage.unstable_box_id(), Some(2));

        assert_moves(
            storage.available_moves(),
            &[(pos(4, 3, 1), &[pos(4, 3, 0), pos(4, 4, 1)])],
        );
    }
}
