use crate::camera::{Intent, Sign};

/// Logical controls, independent of the key that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
}

/// Folds press/release transitions into the current `Intent`. A press sets
/// its axis; a release clears that axis back to zero.
#[derive(Debug, Default)]
pub struct InputDispatcher {
    intent: Intent,
}

impl InputDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn press(&mut self, control: Control) -> Intent {
        match control {
            Control::Forward => self.intent.walk = Sign::Positive,
            Control::Backward => self.intent.walk = Sign::Negative,
            Control::TurnLeft => self.intent.turn = Sign::Negative,
            Control::TurnRight => self.intent.turn = Sign::Positive,
        }
        self.intent
    }

    pub fn release(&mut self, control: Control) -> Intent {
        match control {
            Control::Forward | Control::Backward => self.intent.walk = Sign::Zero,
            Control::TurnLeft | Control::TurnRight => self.intent.turn = Sign::Zero,
        }
        self.intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_sets_and_release_clears() {
        let mut input = InputDispatcher::new();
        assert_eq!(input.intent(), Intent::IDLE);

        let i = input.press(Control::Forward);
        assert_eq!(i.walk, Sign::Positive);
        let i = input.press(Control::TurnLeft);
        assert_eq!((i.turn, i.walk), (Sign::Negative, Sign::Positive));

        let i = input.release(Control::Forward);
        assert_eq!((i.turn, i.walk), (Sign::Negative, Sign::Zero));
        assert_eq!(input.release(Control::TurnLeft), Intent::IDLE);
    }

    #[test]
    fn release_of_either_key_stops_the_axis() {
        let mut input = InputDispatcher::new();
        input.press(Control::Forward);
        input.press(Control::Backward);
        assert_eq!(input.intent().walk, Sign::Negative);
        assert_eq!(input.release(Control::Forward).walk, Sign::Zero);
    }
}
