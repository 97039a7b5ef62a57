use anyhow::bail;
use msgs::box_data::BoxId;
use msgs::camera::{CameraPreset, ColorMode};
use msgs::direction::Direction;

pub enum ConsoleCmd {
    AddBox { box_id: BoxId, x: i32, y: i32, z: i32 },
    RemoveBox(BoxId),
    MoveBox { box_id: BoxId, direction: Direction },
    State,
    Clear,
    Upload(String),
    Download(String),
    Camera(CameraPreset),
    Mode(ColorMode),
    Access { username: String, password: String },
    Release,
    Help,
    Quit,
}

impl ConsoleCmd {
    pub fn parse(input: &str) -> anyhow::Result<ConsoleCmd> {
        let mut parts = input.split_whitespace();
        let Some(keyword) = parts.next() else {
            bail!("cmd not recognized");
        };

        let cmd = match keyword {
            "add" => ConsoleCmd::AddBox {
                box_id: int(parts.next())?,
                x: int(parts.next())?,
                y: int(parts.next())?,
                z: int(parts.next())?,
            },
            "remove" => ConsoleCmd::RemoveBox(int(parts.next())?),
            "move" => ConsoleCmd::MoveBox {
                box_id: int(parts.next())?,
                direction: direction(parts.next())?,
            },
            "state" => ConsoleCmd::State,
            "clear" => ConsoleCmd::Clear,
            "upload" => ConsoleCmd::Upload(word(parts.next())?.to_owned()),
            "download" => {
                ConsoleCmd::Download(parts.next().unwrap_or("warehouse.csv").to_owned())
            }
            "camera" => ConsoleCmd::Camera(preset(parts.next())?),
            "mode" => ConsoleCmd::Mode(mode(parts.next())?),
            "access" => ConsoleCmd::Access {
                username: word(parts.next())?.to_owned(),
                password: word(parts.next())?.to_owned(),
            },
            "release" => ConsoleCmd::Release,
            "help" => ConsoleCmd::Help,
            "quit" | "exit" => ConsoleCmd::Quit,
            _ => bail!("cmd not recognized"),
        };

        Ok(cmd)
    }
}

fn word(part: Option<&str>) -> anyhow::Result<&str> {
    match part {
        Some(part) => Ok(part),
        None => bail!("missing argument"),
    }
}

fn int(part: Option<&str>) -> anyhow::Result<i32> {
    Ok(word(part)?.parse()?)
}

fn direction(part: Option<&str>) -> anyhow::Result<Direction> {
    match Direction::from_str(word(part)?) {
        Some(direction) => Ok(direction),
        None => {
            bail!("Invalid direction, must be one of North, South, East, West, Up, Down (case in-sensitive)")
        }
    }
}

fn preset(part: Option<&str>) -> anyhow::Result<CameraPreset> {
    match CameraPreset::from_str(word(part)?) {
        Some(preset) => Ok(preset),
        None => bail!("Invalid camera preset, must be one of front, back, top"),
    }
}

fn mode(part: Option<&str>) -> anyhow::Result<ColorMode> {
    match ColorMode::from_str(word(part)?) {
        Some(mode) => Ok(mode),
        None => bail!("Invalid mode, must be light or dark"),
    }
}
