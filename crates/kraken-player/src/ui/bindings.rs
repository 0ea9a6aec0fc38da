//! Keyboard bindings and input handling.
//!
//! Centralizes all keyboard shortcuts and key mapping logic.

use kraken_fx::EffectKind;
use nannou::prelude::*;

/// Actions that can be triggered by key presses
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    // App-level
    Quit,
    ShowHelp,

    // Transport
    TogglePlay,
    NextTrack,
    PreviousTrack,
    ToggleShuffle,
    CycleRepeat,
    AdjustVolume(i32),

    // Effects
    NextEffect,
    PreviousEffect,
    SelectEffect(EffectKind),
    NextVisualizer,
    PreviousVisualizer,
    AdjustQuantity(i32),
    AdjustSize(i32),
    AdjustSpeed(i32),
}

/// Number keys 1-8 in effect order
fn effect_for_digit(key: Key) -> Option<EffectKind> {
    let index = match key {
        Key::Key1 => 0,
        Key::Key2 => 1,
        Key::Key3 => 2,
        Key::Key4 => 3,
        Key::Key5 => 4,
        Key::Key6 => 5,
        Key::Key7 => 6,
        Key::Key8 => 7,
        _ => return None,
    };
    EffectKind::ALL.get(index).copied()
}

/// Parse a key into an action; `shift` selects the reverse direction
pub fn parse_key(key: Key, shift: bool) -> Option<Action> {
    if let Some(kind) = effect_for_digit(key) {
        return Some(Action::SelectEffect(kind));
    }

    match key {
        Key::Q => Some(Action::Quit),
        Key::H => Some(Action::ShowHelp),

        Key::Space => Some(Action::TogglePlay),
        Key::N => Some(Action::NextTrack),
        Key::P => Some(Action::PreviousTrack),
        Key::S => Some(Action::ToggleShuffle),
        Key::R => Some(Action::CycleRepeat),
        Key::Up => Some(Action::AdjustVolume(5)),
        Key::Down => Some(Action::AdjustVolume(-5)),

        Key::E if shift => Some(Action::PreviousEffect),
        Key::E => Some(Action::NextEffect),
        Key::V if shift => Some(Action::PreviousVisualizer),
        Key::V => Some(Action::NextVisualizer),

        Key::LBracket => Some(Action::AdjustQuantity(-5)),
        Key::RBracket => Some(Action::AdjustQuantity(5)),
        Key::Minus => Some(Action::AdjustSize(-1)),
        Key::Equals => Some(Action::AdjustSize(1)),
        Key::Comma => Some(Action::AdjustSpeed(-5)),
        Key::Period => Some(Action::AdjustSpeed(5)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_reverses_cycling() {
        assert_eq!(parse_key(Key::E, false), Some(Action::NextEffect));
        assert_eq!(parse_key(Key::E, true), Some(Action::PreviousEffect));
        assert_eq!(parse_key(Key::V, false), Some(Action::NextVisualizer));
        assert_eq!(parse_key(Key::V, true), Some(Action::PreviousVisualizer));
    }

    #[test]
    fn test_digits_pick_effects_in_order() {
        assert_eq!(parse_key(Key::Key1, false), Some(Action::SelectEffect(EffectKind::None)));
        assert_eq!(parse_key(Key::Key4, false), Some(Action::SelectEffect(EffectKind::Stars)));
        assert_eq!(parse_key(Key::Key8, true), Some(Action::SelectEffect(EffectKind::Fireflies)));
        assert_eq!(parse_key(Key::Key9, false), None);
    }

    #[test]
    fn test_parameter_keys() {
        assert_eq!(parse_key(Key::LBracket, false), Some(Action::AdjustQuantity(-5)));
        assert_eq!(parse_key(Key::RBracket, false), Some(Action::AdjustQuantity(5)));
        assert_eq!(parse_key(Key::Minus, false), Some(Action::AdjustSize(-1)));
        assert_eq!(parse_key(Key::Equals, false), Some(Action::AdjustSize(1)));
        assert_eq!(parse_key(Key::Comma, false), Some(Action::AdjustSpeed(-5)));
        assert_eq!(parse_key(Key::Period, false), Some(Action::AdjustSpeed(5)));
    }

    #[test]
    fn test_transport_keys() {
        assert_eq!(parse_key(Key::Space, false), Some(Action::TogglePlay));
        assert_eq!(parse_key(Key::N, false), Some(Action::NextTrack));
        assert_eq!(parse_key(Key::P, false), Some(Action::PreviousTrack));
        assert_eq!(parse_key(Key::Up, false), Some(Action::AdjustVolume(5)));
        assert_eq!(parse_key(Key::Q, true), Some(Action::Quit));
        assert_eq!(parse_key(Key::Z, false), None);
    }
}
