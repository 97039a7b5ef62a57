use serde::{Deserialize, Serialize};

use crate::box_data::BoxState;
use crate::camera::{CameraPreset, ColorMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessLevel {
    Ordinary,
    Admin,
}

/// Answer to a `GetAccess` request. `Occupied` means another ordinary user
/// currently holds exclusive access and the caller should wait for it to be
/// released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessOutcome {
    Granted(AccessLevel),
    Occupied,
    Rejected(String),
}

/// Replies and pushes a client can receive. `State` doubles as the
/// `GetState` reply and the broadcast sent to subscribers after every
/// mutation; `CameraPreset` and `Mode` are relays addressed to the
/// registered viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ServerClientMsg {
    Reply(String),
    State(Vec<BoxState>),
    Access(AccessOutcome),
    KickOutLogin,
    CameraPreset(CameraPreset),
    Mode(ColorMode),
}

impl ServerClientMsg {
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    pub fn decode(input: &str) -> anyhow::Result<ServerClientMsg> {
        Ok(serde_json::from_str(input)?)
    }
}
