use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraPreset {
    Front,
    Back,
    Top,
}

impl CameraPreset {
    pub fn from_str(string: &str) -> Option<CameraPreset> {
        match string.to_lowercase().as_str() {
            "front" => Some(CameraPreset::Front),
            "back" => Some(CameraPreset::Back),
            "top" => Some(CameraPreset::Top),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CameraPreset::Front => "front",
            CameraPreset::Back => "back",
            CameraPreset::Top => "top",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Light,
    Dark,
}

impl ColorMode {
    pub fn from_str(string: &str) -> Option<ColorMode> {
        match string.to_lowercase().as_str() {
            "light" => Some(ColorMode::Light),
            "dark" => Some(ColorMode::Dark),
            _ => None,
        }
    }
}
