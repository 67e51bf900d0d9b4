//! Selection gesture as an explicit state machine.
//!
//! The selector window feeds pointer and timer inputs into [`Selector::handle`]
//! and performs the returned [`Effect`]. Nothing here touches the toolkit.

use eframe::egui::{Pos2, Rect};
use std::time::{Duration, Instant};

use crate::capture::{ScreenPoint, ScreenRegion};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SelectorState {
    Idle,
    Selecting {
        start_local: Pos2,
        start_screen: ScreenPoint,
        current_local: Pos2,
    },
    /// Surface hidden, waiting for the window manager before grabbing.
    Capturing { region: ScreenRegion, due: Instant },
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SelectorInput {
    Press { local: Pos2, screen: ScreenPoint },
    Drag { local: Pos2 },
    Release { screen: ScreenPoint },
    Cancel,
    Tick(Instant),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    None,
    Redraw,
    Hide,
    Capture(ScreenRegion),
    Close,
}

pub struct Selector {
    state: SelectorState,
    capture_delay: Duration,
}

impl Selector {
    pub fn new(capture_delay: Duration) -> Self {
        Self {
            state: SelectorState::Idle,
            capture_delay,
        }
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    /// Outline of the selection in progress, in window-local coordinates.
    pub fn outline(&self) -> Option<Rect> {
        match self.state {
            SelectorState::Selecting {
                start_local,
                current_local,
                ..
            } => Some(Rect::from_two_pos(start_local, current_local)),
            _ => None,
        }
    }

    /// Deadline of a pending capture, used to schedule the next repaint.
    pub fn capture_due(&self) -> Option<Instant> {
        match self.state {
            SelectorState::Capturing { due, .. } => Some(due),
            _ => None,
        }
    }

    pub fn handle(&mut self, input: SelectorInput, now: Instant) -> Effect {
        let (next, effect) = transition(self.state, input, now, self.capture_delay);
        if next != self.state {
            log::debug!("Selector {:?} -> {:?}", self.state, next);
        }
        self.state = next;
        effect
    }
}

fn transition(
    state: SelectorState,
    input: SelectorInput,
    now: Instant,
    delay: Duration,
) -> (SelectorState, Effect) {
    use SelectorState::*;

    match (state, input) {
        (Finished, _) => (Finished, Effect::None),
        (_, SelectorInput::Cancel) => (Finished, Effect::Close),

        // A fresh press replaces any outline still on screen.
        (Idle | Selecting { .. }, SelectorInput::Press { local, screen }) => (
            Selecting {
                start_local: local,
                start_screen: screen,
                current_local: local,
            },
            Effect::Redraw,
        ),
        (
            Selecting {
                start_local,
                start_screen,
                ..
            },
            SelectorInput::Drag { local },
        ) => (
            Selecting {
                start_local,
                start_screen,
                current_local: local,
            },
            Effect::Redraw,
        ),
        (Selecting { start_screen, .. }, SelectorInput::Release { screen }) => {
            match ScreenRegion::from_corners(start_screen, screen) {
                Some(region) => (
                    Capturing {
                        region,
                        due: now + delay,
                    },
                    Effect::Hide,
                ),
                None => (Finished, Effect::Close),
            }
        }
        (Capturing { region, due }, SelectorInput::Tick(at)) if at >= due => {
            (Finished, Effect::Capture(region))
        }
        (state, _) => (state, Effect::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    const DELAY: Duration = Duration::from_millis(80);

    fn press(selector: &mut Selector, x: i32, y: i32, now: Instant) -> Effect {
        selector.handle(
            SelectorInput::Press {
                local: pos2(x as f32, y as f32),
                screen: ScreenPoint::new(x + 100, y + 50),
            },
            now,
        )
    }

    fn release(selector: &mut Selector, x: i32, y: i32, now: Instant) -> Effect {
        selector.handle(
            SelectorInput::Release {
                screen: ScreenPoint::new(x + 100, y + 50),
            },
            now,
        )
    }

    #[test]
    fn drag_updates_only_far_corner() {
        let now = Instant::now();
        let mut selector = Selector::new(DELAY);
        press(&mut selector, 10, 10, now);
        selector.handle(SelectorInput::Drag { local: pos2(40.0, 5.0) }, now);
        selector.handle(SelectorInput::Drag { local: pos2(60.0, 30.0) }, now);

        let outline = selector.outline().unwrap();
        assert_eq!(outline, Rect::from_min_max(pos2(10.0, 10.0), pos2(60.0, 30.0)));
    }

    #[test]
    fn release_hides_then_captures_after_delay() {
        let now = Instant::now();
        let mut selector = Selector::new(DELAY);
        press(&mut selector, 60, 40, now);
        assert_eq!(release(&mut selector, 10, 20, now), Effect::Hide);
        assert_eq!(selector.capture_due(), Some(now + DELAY));

        assert_eq!(
            selector.handle(SelectorInput::Tick(now + Duration::from_millis(10)), now),
            Effect::None
        );
        let effect = selector.handle(SelectorInput::Tick(now + DELAY), now);
        assert_eq!(
            effect,
            Effect::Capture(ScreenRegion {
                left: 110,
                top: 70,
                right: 160,
                bottom: 90,
            })
        );
        assert_eq!(selector.state(), SelectorState::Finished);
    }

    #[test]
    fn one_pixel_wide_release_closes_without_capture() {
        let now = Instant::now();
        let mut selector = Selector::new(DELAY);
        press(&mut selector, 10, 0, now);
        assert_eq!(release(&mut selector, 11, 50, now), Effect::Close);
        assert_eq!(
            selector.handle(SelectorInput::Tick(now + DELAY), now),
            Effect::None
        );
    }

    #[test]
    fn two_by_two_release_captures() {
        let now = Instant::now();
        let mut selector = Selector::new(DELAY);
        press(&mut selector, 10, 10, now);
        assert_eq!(release(&mut selector, 12, 12, now), Effect::Hide);
    }

    #[test]
    fn cancel_during_capture_delay_drops_the_capture() {
        let now = Instant::now();
        let mut selector = Selector::new(DELAY);
        press(&mut selector, 0, 0, now);
        release(&mut selector, 100, 100, now);
        assert_eq!(selector.handle(SelectorInput::Cancel, now), Effect::Close);
        assert_eq!(
            selector.handle(SelectorInput::Tick(now + DELAY), now),
            Effect::None
        );
    }

    #[test]
    fn release_without_press_is_ignored() {
        let now = Instant::now();
        let mut selector = Selector::new(DELAY);
        assert_eq!(release(&mut selector, 10, 10, now), Effect::None);
        assert_eq!(selector.state(), SelectorState::Idle);
    }

    #[test]
    fn pointer_input_is_ignored_while_capturing() {
        let now = Instant::now();
        let mut selector = Selector::new(DELAY);
        press(&mut selector, 0, 0, now);
        release(&mut selector, 30, 30, now);
        assert_eq!(press(&mut selector, 5, 5, now), Effect::None);
        assert!(selector.capture_due().is_some());
    }
}
