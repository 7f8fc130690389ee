#![forbid(unsafe_code)]

//! Gesture lifecycle events and a raw-pointer recognizer.
//!
//! The stack controller consumes [`GestureEvent`]s through a single entry
//! point. Hosts that already have a pan/tap recognizer map its callbacks onto
//! [`GesturePhase`] directly; hosts that only see raw pointer samples feed
//! them through [`PointerRecognizer`].
//!
//! # State Machine
//!
//! ```text
//!            Down                 travel > slop
//!   Idle ──────────▶ Pressed ─────────────────────▶ Dragging
//!    ▲                  │ Up → Tapped                 │ Move → Moved
//!    │                  │ Cancel → (nothing)          │ Up → Ended
//!    └──────────────────┴─────────────────────────────┴ Cancel → Cancelled
//! ```
//!
//! # Invariants
//!
//! 1. Tap and drag never both emit for the same press.
//! 2. Every emitted `Began` is followed by exactly one `Ended` or `Cancelled`
//!    unless [`PointerRecognizer::reset`] is called.
//! 3. `Began` carries the press location, not the location that crossed the
//!    slop, so drag deltas include the slop distance.

use crate::geometry::{Point, SurfaceId};

/// Discrete lifecycle of one interaction with a card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GesturePhase {
    /// Drag began with the pointer at this container location.
    Began(Point),
    /// Pointer moved while dragging.
    Moved(Point),
    /// Pointer released while dragging.
    Ended(Point),
    /// The gesture source cancelled the drag.
    Cancelled,
    /// The gesture source gave up recognizing the drag.
    Failed,
    /// A press released without dragging.
    Tapped(Point),
}

impl GesturePhase {
    /// Whether this phase terminates a drag.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Ended(_) | Self::Cancelled | Self::Failed)
    }
}

/// A gesture phase aimed at one card surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub target: SurfaceId,
    pub phase: GesturePhase,
}

impl GestureEvent {
    #[must_use]
    pub const fn new(target: SurfaceId, phase: GesturePhase) -> Self {
        Self { target, phase }
    }
}

/// Raw pointer sample kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// Raw pointer sample in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub kind: PointerKind,
    pub position: Point,
}

impl PointerSample {
    #[must_use]
    pub const fn new(kind: PointerKind, position: Point) -> Self {
        Self { kind, position }
    }
}

/// Thresholds for [`PointerRecognizer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecognizerConfig {
    /// Euclidean travel before a press becomes a drag (default: 4.0).
    pub slop: f64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self { slop: 4.0 }
    }
}

#[derive(Debug, Clone, Copy)]
struct Press {
    start: Point,
    dragging: bool,
}

/// Converts raw pointer samples into [`GesturePhase`]s.
#[derive(Debug, Clone, Default)]
pub struct PointerRecognizer {
    config: RecognizerConfig,
    press: Option<Press>,
}

impl PointerRecognizer {
    #[must_use]
    pub fn new(config: RecognizerConfig) -> Self {
        Self {
            config,
            press: None,
        }
    }

    /// Process one sample, returning the phases it produces (zero, one, or
    /// `Began` followed by `Moved` when a move crosses the slop).
    pub fn process(&mut self, sample: PointerSample) -> Vec<GesturePhase> {
        let mut out = Vec::with_capacity(2);
        let pos = sample.position;

        match sample.kind {
            PointerKind::Down => {
                // A second Down without Up abandons the previous press.
                if let Some(prev) = self.press.take()
                    && prev.dragging
                {
                    out.push(GesturePhase::Cancelled);
                }
                self.press = Some(Press {
                    start: pos,
                    dragging: false,
                });
            }
            PointerKind::Move => {
                let slop = self.config.slop;
                if let Some(press) = self.press.as_mut() {
                    if !press.dragging {
                        let d = pos - press.start;
                        if d.x.hypot(d.y) > slop {
                            press.dragging = true;
                            out.push(GesturePhase::Began(press.start));
                        }
                    }
                    if press.dragging {
                        out.push(GesturePhase::Moved(pos));
                    }
                }
            }
            PointerKind::Up => {
                if let Some(press) = self.press.take() {
                    out.push(if press.dragging {
                        GesturePhase::Ended(pos)
                    } else {
                        GesturePhase::Tapped(pos)
                    });
                }
            }
            PointerKind::Cancel => {
                if let Some(press) = self.press.take()
                    && press.dragging
                {
                    out.push(GesturePhase::Cancelled);
                }
            }
        }

        out
    }

    /// Whether a drag is currently in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|p| p.dragging)
    }

    /// Drop any in-flight press without emitting.
    pub fn reset(&mut self) {
        self.press = None;
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(kind: PointerKind, x: f64, y: f64) -> PointerSample {
        PointerSample::new(kind, Point::new(x, y))
    }

    #[test]
    fn press_release_in_place_is_tap() {
        let mut r = PointerRecognizer::default();
        assert!(r.process(sample(PointerKind::Down, 10.0, 10.0)).is_empty());
        assert!(r.process(sample(PointerKind::Move, 11.0, 11.0)).is_empty());
        assert_eq!(
            r.process(sample(PointerKind::Up, 11.0, 11.0)),
            vec![GesturePhase::Tapped(Point::new(11.0, 11.0))]
        );
        assert!(!r.is_dragging());
    }

    #[test]
    fn crossing_slop_begins_at_press_location() {
        let mut r = PointerRecognizer::default();
        r.process(sample(PointerKind::Down, 10.0, 10.0));
        let out = r.process(sample(PointerKind::Move, 20.0, 10.0));
        assert_eq!(
            out,
            vec![
                GesturePhase::Began(Point::new(10.0, 10.0)),
                GesturePhase::Moved(Point::new(20.0, 10.0)),
            ]
        );
        assert!(r.is_dragging());
        assert_eq!(
            r.process(sample(PointerKind::Up, 30.0, 12.0)),
            vec![GesturePhase::Ended(Point::new(30.0, 12.0))]
        );
    }

    #[test]
    fn drag_never_also_taps() {
        let mut r = PointerRecognizer::default();
        r.process(sample(PointerKind::Down, 0.0, 0.0));
        r.process(sample(PointerKind::Move, 50.0, 0.0));
        let out = r.process(sample(PointerKind::Up, 0.0, 0.0));
        assert!(!out.iter().any(|p| matches!(p, GesturePhase::Tapped(_))));
    }

    #[test]
    fn cancel_only_reported_for_active_drag() {
        let mut r = PointerRecognizer::default();
        r.process(sample(PointerKind::Down, 0.0, 0.0));
        assert!(r.process(sample(PointerKind::Cancel, 0.0, 0.0)).is_empty());

        r.process(sample(PointerKind::Down, 0.0, 0.0));
        r.process(sample(PointerKind::Move, 9.0, 0.0));
        assert_eq!(
            r.process(sample(PointerKind::Cancel, 9.0, 0.0)),
            vec![GesturePhase::Cancelled]
        );
    }

    #[test]
    fn move_without_press_is_ignored() {
        let mut r = PointerRecognizer::default();
        assert!(r.process(sample(PointerKind::Move, 100.0, 0.0)).is_empty());
        assert!(r.process(sample(PointerKind::Up, 100.0, 0.0)).is_empty());
    }

    #[test]
    fn reset_is_silent() {
        let mut r = PointerRecognizer::default();
        r.process(sample(PointerKind::Down, 0.0, 0.0));
        r.process(sample(PointerKind::Move, 40.0, 0.0));
        r.reset();
        assert!(!r.is_dragging());
        assert!(r.process(sample(PointerKind::Up, 40.0, 0.0)).is_empty());
    }

    #[test]
    fn terminal_phases() {
        assert!(GesturePhase::Ended(Point::ZERO).is_terminal());
        assert!(GesturePhase::Cancelled.is_terminal());
        assert!(GesturePhase::Failed.is_terminal());
        assert!(!GesturePhase::Moved(Point::ZERO).is_terminal());
        assert!(!GesturePhase::Tapped(Point::ZERO).is_terminal());
    }
}
