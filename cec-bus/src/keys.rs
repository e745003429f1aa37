//! Remote-control key vocabulary
//!
//! CEC forwards remote keys as "user control" codes, one byte per key. The
//! well-known keys the gateway works with are modeled as a closed enum so a
//! typo in a key name is caught before anything reaches the bus; codes the
//! enum does not name can still be sent through the `Code` escape hatch by
//! passing a hex literal such as "0x6b".

use std::fmt;

/// A CEC user-control key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Select,
    Up,
    Down,
    Left,
    Right,
    RootMenu,
    SetupMenu,
    Exit,
    /// Numeric key 0-9. The invariant `0 <= digit <= 9` is enforced by
    /// [`KeyCode::digit`]; the variant itself is not constructible with a
    /// larger value through any parsing path.
    Digit(u8),
    ChannelUp,
    ChannelDown,
    Power,
    VolumeUp,
    VolumeDown,
    Mute,
    Play,
    Stop,
    Pause,
    Record,
    Rewind,
    FastForward,
    /// Raw user-control code, the escape hatch for keys without a name here
    Code(u8),
}

impl KeyCode {
    /// Creates the key for a decimal digit.
    ///
    /// Returns `None` when `digit` is greater than 9.
    pub fn digit(digit: u8) -> Option<Self> {
        (digit <= 9).then_some(KeyCode::Digit(digit))
    }

    /// Parses a key identifier: either a key name ("volup", "select", ...)
    /// or a hex user-control code literal ("0x41").
    pub fn parse(identifier: &str) -> Option<Self> {
        let name = identifier.to_lowercase();
        let known = match name.as_str() {
            "select" | "ok" => KeyCode::Select,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "rootmenu" | "menu" => KeyCode::RootMenu,
            "setupmenu" | "setup" => KeyCode::SetupMenu,
            "exit" => KeyCode::Exit,
            "channelup" => KeyCode::ChannelUp,
            "channeldown" => KeyCode::ChannelDown,
            "power" => KeyCode::Power,
            "volup" | "volumeup" => KeyCode::VolumeUp,
            "voldown" | "volumedown" => KeyCode::VolumeDown,
            "mute" => KeyCode::Mute,
            "play" => KeyCode::Play,
            "stop" => KeyCode::Stop,
            "pause" => KeyCode::Pause,
            "record" => KeyCode::Record,
            "rewind" => KeyCode::Rewind,
            "fastforward" | "forward" => KeyCode::FastForward,
            _ => {
                let hex = name.strip_prefix("0x")?;
                let code = u8::from_str_radix(hex, 16).ok()?;
                return Some(KeyCode::Code(code));
            }
        };
        Some(known)
    }

    /// The one-byte user-control code sent on the bus for this key.
    pub fn code(&self) -> u8 {
        match self {
            KeyCode::Select => 0x00,
            KeyCode::Up => 0x01,
            KeyCode::Down => 0x02,
            KeyCode::Left => 0x03,
            KeyCode::Right => 0x04,
            KeyCode::RootMenu => 0x09,
            KeyCode::SetupMenu => 0x0A,
            KeyCode::Exit => 0x0D,
            // Digits occupy the 0x20-0x29 block, digit value prefixed into it.
            KeyCode::Digit(d) => 0x20 + d,
            KeyCode::ChannelUp => 0x30,
            KeyCode::ChannelDown => 0x31,
            KeyCode::Power => 0x40,
            KeyCode::VolumeUp => 0x41,
            KeyCode::VolumeDown => 0x42,
            KeyCode::Mute => 0x43,
            KeyCode::Play => 0x44,
            KeyCode::Stop => 0x45,
            KeyCode::Pause => 0x46,
            KeyCode::Record => 0x47,
            KeyCode::Rewind => 0x48,
            KeyCode::FastForward => 0x49,
            KeyCode::Code(code) => *code,
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.code())
    }
}
