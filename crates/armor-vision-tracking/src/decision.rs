use armor_vision_core::PixelRect;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Command {
    Standby = 0,
    Track = 1,
    Fire = 2,
}

impl Command {
    #[inline]
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Per-frame output of the tracker.
///
/// `x`/`y` are full-frame pixels (zero in standby). `roi` is the crop to use
/// for the next frame; `None` means the full frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDecision {
    pub command: Command,
    pub x: i32,
    pub y: i32,
    pub identifier: u8,
    pub roi: Option<PixelRect>,
}

impl TargetDecision {
    pub fn standby() -> Self {
        Self {
            command: Command::Standby,
            x: 0,
            y: 0,
            identifier: 0,
            roi: None,
        }
    }
}

impl Default for TargetDecision {
    fn default() -> Self {
        Self::standby()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_bytes_are_stable() {
        assert_eq!(Command::Standby.as_byte(), 0);
        assert_eq!(Command::Track.as_byte(), 1);
        assert_eq!(Command::Fire.as_byte(), 2);
    }

    #[test]
    fn decision_serializes_with_lowercase_command() {
        let d = TargetDecision {
            command: Command::Fire,
            x: 320,
            y: 240,
            identifier: 0,
            roi: Some(PixelRect::new(300, 220, 40, 40)),
        };
        let json = serde_json::to_value(d).expect("serialize");
        assert_eq!(json["command"], "fire");
        assert_eq!(json["roi"]["width"], 40);
        let standby = serde_json::to_value(TargetDecision::standby()).expect("serialize");
        assert!(standby["roi"].is_null());
    }
}
