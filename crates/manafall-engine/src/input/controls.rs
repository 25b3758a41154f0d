//! Folds raw key events into per-tick player intents.
//!
//! Movement keys are level-triggered (held). Jump, attacks and dash are
//! edge-triggered: one press yields one intent, and host key-repeat is ignored.

use serde::{Deserialize, Serialize};

use crate::input::queue::InputEvent;

/// Key codes (DOM `keyCode` values) for each control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: u32,
    pub right: u32,
    pub jump: u32,
    pub drop: u32,
    pub basic_attack: u32,
    pub strong_attack: u32,
    pub dash: u32,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: 37,
            right: 39,
            jump: 38,
            drop: 40,
            basic_attack: 88,
            strong_attack: 90,
            dash: 67,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Left,
    Right,
    Jump,
    Drop,
    BasicAttack,
    StrongAttack,
    Dash,
}

impl Control {
    const COUNT: usize = 7;

    fn index(self) -> usize {
        self as usize
    }
}

impl KeyBindings {
    fn control_for(&self, key_code: u32) -> Option<Control> {
        let table = [
            (self.left, Control::Left),
            (self.right, Control::Right),
            (self.jump, Control::Jump),
            (self.drop, Control::Drop),
            (self.basic_attack, Control::BasicAttack),
            (self.strong_attack, Control::StrongAttack),
            (self.dash, Control::Dash),
        ];
        table
            .iter()
            .find(|(code, _)| *code == key_code)
            .map(|&(_, control)| control)
    }
}

/// What the player asked for during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intents {
    /// -1 left, 0 none, +1 right.
    pub horizontal: f32,
    pub drop: bool,
    pub jump: bool,
    pub basic_attack: bool,
    pub strong_attack: bool,
    pub dash: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ControlState {
    bindings: KeyBindings,
    held: [bool; Control::COUNT],
    pressed: [bool; Control::COUNT],
}

impl ControlState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: [false; Control::COUNT],
            pressed: [false; Control::COUNT],
        }
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown { key_code } => {
                if let Some(control) = self.bindings.control_for(key_code) {
                    let i = control.index();
                    if !self.held[i] {
                        self.pressed[i] = true;
                    }
                    self.held[i] = true;
                }
            }
            InputEvent::KeyUp { key_code } => {
                if let Some(control) = self.bindings.control_for(key_code) {
                    self.held[control.index()] = false;
                }
            }
        }
    }

    pub fn apply_all(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        for event in events {
            self.apply(event);
        }
    }

    fn is_held(&self, control: Control) -> bool {
        self.held[control.index()]
    }

    /// Intents for the next tick. Consumes pending presses.
    pub fn take_intents(&mut self) -> Intents {
        let axis = |held: bool| if held { 1.0 } else { 0.0 };
        let intents = Intents {
            horizontal: axis(self.is_held(Control::Right)) - axis(self.is_held(Control::Left)),
            drop: self.is_held(Control::Drop),
            jump: self.pressed[Control::Jump.index()],
            basic_attack: self.pressed[Control::BasicAttack.index()],
            strong_attack: self.pressed[Control::StrongAttack.index()],
            dash: self.pressed[Control::Dash.index()],
        };
        self.pressed = [false; Control::COUNT];
        intents
    }

    /// Forget every held key (focus loss, level change).
    pub fn release_all(&mut self) {
        self.held = [false; Control::COUNT];
        self.pressed = [false; Control::COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(key_code: u32) -> InputEvent {
        InputEvent::KeyDown { key_code }
    }

    fn up(key_code: u32) -> InputEvent {
        InputEvent::KeyUp { key_code }
    }

    #[test]
    fn horizontal_axis_from_held_keys() {
        let mut c = ControlState::new(KeyBindings::default());
        c.apply(down(37));
        assert_eq!(c.take_intents().horizontal, -1.0);
        assert_eq!(c.take_intents().horizontal, -1.0);
        c.apply(down(39));
        assert_eq!(c.take_intents().horizontal, 0.0);
        c.apply(up(37));
        assert_eq!(c.take_intents().horizontal, 1.0);
    }

    #[test]
    fn actions_fire_once_per_press() {
        let mut c = ControlState::new(KeyBindings::default());
        c.apply_all([down(38), down(88), down(67)]);
        let first = c.take_intents();
        assert!(first.jump && first.basic_attack && first.dash);
        assert!(!first.strong_attack);
        let second = c.take_intents();
        assert!(!second.jump && !second.basic_attack && !second.dash);
    }

    #[test]
    fn key_repeat_is_not_a_new_press() {
        let mut c = ControlState::new(KeyBindings::default());
        c.apply(down(90));
        assert!(c.take_intents().strong_attack);
        c.apply(down(90));
        assert!(!c.take_intents().strong_attack);
        c.apply(up(90));
        c.apply(down(90));
        assert!(c.take_intents().strong_attack);
    }

    #[test]
    fn drop_is_held() {
        let mut c = ControlState::new(KeyBindings::default());
        c.apply(down(40));
        assert!(c.take_intents().drop);
        assert!(c.take_intents().drop);
        c.apply(up(40));
        assert!(!c.take_intents().drop);
    }

    #[test]
    fn unbound_keys_are_ignored_and_release_all_clears() {
        let mut c = ControlState::new(KeyBindings::default());
        c.apply(down(13));
        assert_eq!(c.take_intents(), Intents::default());
        c.apply_all([down(37), down(38)]);
        c.release_all();
        assert_eq!(c.take_intents(), Intents::default());
    }

    #[test]
    fn custom_bindings() {
        let bindings = KeyBindings {
            jump: 32,
            ..Default::default()
        };
        let mut c = ControlState::new(bindings);
        c.apply(down(32));
        assert!(c.take_intents().jump);
        c.apply(down(38));
        assert!(!c.take_intents().jump);
    }
}
