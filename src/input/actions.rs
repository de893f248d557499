//! Game action definitions
//!
//! Logical actions the maze game reacts to. Physical keys are bound to
//! these through `KeyBindings`.

use serde::{Deserialize, Serialize};

/// All possible game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    // Movement
    MoveFront,
    MoveBack,
    MoveRight,
    MoveLeft,
    MoveUp,
    MoveDown,

    /// Print the player's map cell
    ReportCell,
    /// Close the window
    Quit,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::MoveFront,
        Action::MoveBack,
        Action::MoveRight,
        Action::MoveLeft,
        Action::MoveUp,
        Action::MoveDown,
        Action::ReportCell,
        Action::Quit,
    ];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Compact set of held actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionSet(u16);

impl ActionSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    pub fn contains(&self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = ActionSet::new();
        for action in iter {
            set.insert(action);
        }
        set
    }
}
