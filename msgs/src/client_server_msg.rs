use serde::{Deserialize, Serialize};

use crate::box_data::BoxId;
use crate::camera::{CameraPreset, ColorMode};
use crate::direction::Direction;

/// Requests a client can issue. Serialized as JSON text frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientServerMsg {
    Subscribe,
    GetState,
    AddBox {
        box_id: BoxId,
        x: i32,
        y: i32,
        z: i32,
    },
    RemoveBox(BoxId),
    MoveBox {
        box_id: BoxId,
        direction: Direction,
    },
    MoveMultipleBoxes(Vec<(BoxId, Direction)>),
    CsvUpload(String),
    ClearAllBoxes,
    SetCameraPreset(CameraPreset),
    Mode(ColorMode),
    GetAccess {
        username: String,
        password: String,
    },
    ReleaseAccess,
    RegisterViewer,
}

impl ClientServerMsg {
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    pub fn decode(input: &str) -> anyhow::Result<ClientServerMsg> {
        Ok(serde_json::from_str(input)?)
    }
}
