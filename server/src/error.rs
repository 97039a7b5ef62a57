use thiserror::Error;

/// Rule violations of the warehouse. The display texts are the ack strings
/// clients show in their log panels, so they are part of the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Invalid Adding, box ID's must be positive integers")]
    NonPositiveBoxId,
    #[error("Invalid Adding, the position is out of storage bounds")]
    AddOutOfBounds,
    #[error("Invalid Adding, this box has already been added")]
    BoxAlreadyExists,
    #[error("Invalid Adding, this position is occupied")]
    PositionOccupied,
    #[error("Invalid Adding, there's nothing underneath this box")]
    AddInMidair,

    #[error("Invalid Removing, the box does not exist")]
    RemoveMissingBox,
    #[error("Invalid Removing, that's not a Minecraft tree - other boxes are being supported by that! ")]
    RemoveSupportingBox,
    #[error("Invalid Removing, the unstable box is climbing up that!")]
    RemoveClimbedBox,

    #[error("Invalid Move, the box does not exist")]
    MoveMissingBox,
    #[error("Invalid Move, outside of the storage bounds!")]
    OutOfBounds,
    #[error("Invalid Move, another box is in the way!")]
    Blocked,
    #[error("Invalid move, that box is supporting something, so you can't move it!")]
    MoveSupportingBox,
    #[error("Invalid move, you must resolve the unstable box!")]
    UnstableBoxUnresolved,
    #[error("Invalid move, that box is still unstable! It must be stablised")]
    UnstableDestination,
    #[error("Invalid move, that box isn't supported from any side, so it cannot move up")]
    ClimbWithoutSupport,

    #[error("Invalid multiple moves, you can't move the same box multiple times simultaneously!")]
    DuplicateBoxInMoveSet,
    #[error("Invalid Multiple Moves, Move {index} is Invalid with error message: {source}")]
    InvalidMoveInSet {
        index: usize,
        source: Box<StorageError>,
    },
}
