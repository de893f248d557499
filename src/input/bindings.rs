//! Key bindings
//!
//! Maps each `Action` to a key by name (`"W"`, `"Space"`, `"Escape"`...),
//! so bindings can live in the RON config file.

use std::collections::BTreeMap;
use macroquad::input::KeyCode;
use serde::{Deserialize, Serialize};
use super::Action;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    keys: BTreeMap<Action, String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = [
            (Action::MoveFront, "W"),
            (Action::MoveBack, "S"),
            (Action::MoveRight, "D"),
            (Action::MoveLeft, "A"),
            (Action::MoveUp, "E"),
            (Action::MoveDown, "Q"),
            (Action::ReportCell, "Space"),
            (Action::Quit, "Escape"),
        ]
        .into_iter()
        .map(|(action, key)| (action, key.to_string()))
        .collect();
        Self { keys }
    }
}

impl KeyBindings {
    /// Bind (or rebind) an action
    #[cfg(test)]
    pub fn bind(&mut self, action: Action, key: &str) {
        self.keys.insert(action, key.to_string());
    }

    /// Key bound to an action, if any and if its name parses
    pub fn key_for(&self, action: Action) -> Option<KeyCode> {
        self.keys.get(&action).and_then(|name| parse_key_code(name))
    }

    /// (action, key) pairs for every valid binding
    pub fn resolved(&self) -> Vec<(Action, KeyCode)> {
        Action::ALL
            .into_iter()
            .filter_map(|action| self.key_for(action).map(|k| (action, k)))
            .collect()
    }

    /// Every binding must name a known key
    pub fn validate(&self) -> Result<(), String> {
        for (action, name) in &self.keys {
            if parse_key_code(name).is_none() {
                return Err(format!("unknown key {:?} bound to {:?}", name, action));
            }
        }
        Ok(())
    }
}

/// Parse a key name (case-insensitive for letters)
pub fn parse_key_code(name: &str) -> Option<KeyCode> {
    let key = match name.trim() {
        "Space" => KeyCode::Space,
        "Escape" => KeyCode::Escape,
        "Enter" => KeyCode::Enter,
        "Tab" => KeyCode::Tab,
        "Backspace" => KeyCode::Backspace,
        "LeftShift" => KeyCode::LeftShift,
        "RightShift" => KeyCode::RightShift,
        "LeftControl" => KeyCode::LeftControl,
        "RightControl" => KeyCode::RightControl,
        "LeftAlt" => KeyCode::LeftAlt,
        "RightAlt" => KeyCode::RightAlt,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "0" => KeyCode::Key0,
        "1" => KeyCode::Key1,
        "2" => KeyCode::Key2,
        "3" => KeyCode::Key3,
        "4" => KeyCode::Key4,
        "5" => KeyCode::Key5,
        "6" => KeyCode::Key6,
        "7" => KeyCode::Key7,
        "8" => KeyCode::Key8,
        "9" => KeyCode::Key9,
        other => return parse_letter(other),
    };
    Some(key)
}

fn parse_letter(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    let c = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() {
        return None;
    }
    let key = match c {
        'A' => KeyCode::A,
        'B' => KeyCode::B,
        'C' => KeyCode::C,
        'D' => KeyCode::D,
        'E' => KeyCode::E,
        'F' => KeyCode::F,
        'G' => KeyCode::G,
        'H' => KeyCode::H,
        'I' => KeyCode::I,
        'J' => KeyCode::J,
        'K' => KeyCode::K,
        'L' => KeyCode::L,
        'M' => KeyCode::M,
        'N' => KeyCode::N,
        'O' => KeyCode::O,
        'P' => KeyCode::P,
        'Q' => KeyCode::Q,
        'R' => KeyCode::R,
        'S' => KeyCode::S,
        'T' => KeyCode::T,
        'U' => KeyCode::U,
        'V' => KeyCode::V,
        'W' => KeyCode::W,
        'X' => KeyCode::X,
        'Y' => KeyCode::Y,
        'Z' => KeyCode::Z,
        _ => return None,
    };
    Some(key)
}
