#![forbid(unsafe_code)]

//! Drag resolution: pointer delta to card pose, and gesture-end verdicts.
//!
//! Everything here is a pure function of the drag geometry. The stack
//! controller feeds it the top card's `original_center`, the live pointer
//! delta, and the card width, then applies the resulting [`CardPose`].
//!
//! # Invariants
//!
//! 1. Feedback alphas are always within `[0.0, 1.0]`.
//! 2. At most one of `like_alpha` / `dislike_alpha` is non-zero.
//! 3. `classify` returns [`Verdict::Cancel`] whenever `|dx| < width * threshold`.
//!
//! # Failure Modes
//!
//! - Non-positive or non-finite width: the pose is translated only (no
//!   rotation, no feedback) instead of dividing by zero.
//! - Non-finite delta: classified as cancel.

use crate::geometry::Point;

/// Outcome reported to the delegate when a card leaves the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackResult {
    Like,
    Dislike,
}

impl StackResult {
    /// `+1.0` for like (rightward), `-1.0` for dislike.
    #[inline]
    #[must_use]
    pub const fn direction(self) -> f64 {
        match self {
            Self::Like => 1.0,
            Self::Dislike => -1.0,
        }
    }
}

/// Classification of a finished gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Like,
    Dislike,
    /// Return the card to where the gesture started.
    Cancel,
}

impl Verdict {
    /// The dismissal result, if the verdict dismisses the card.
    #[must_use]
    pub const fn result(self) -> Option<StackResult> {
        match self {
            Self::Like => Some(StackResult::Like),
            Self::Dislike => Some(StackResult::Dislike),
            Self::Cancel => None,
        }
    }
}

/// Constants shaping how a drag is rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DragTuning {
    /// Radians of rotation per card-width of horizontal travel (default: 0.35).
    pub rotation_factor: f64,
    /// Feedback amplification; indicators saturate at `1 / alpha_gain` of the
    /// card width (default: 2.5, i.e. 40%).
    pub alpha_gain: f64,
    /// Horizontal exit distance in card widths for a dismissal (default: 1.33).
    pub exit_distance: f64,
    /// Whether the card tilts while dragged (default: true).
    pub model_rotation: bool,
}

impl Default for DragTuning {
    fn default() -> Self {
        Self {
            rotation_factor: 0.35,
            alpha_gain: 2.5,
            exit_distance: 1.33,
            model_rotation: true,
        }
    }
}

/// Full visual state of the top card.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CardPose {
    pub center: Point,
    /// Rotation in radians, positive is clockwise.
    pub rotation: f64,
    pub like_alpha: f64,
    pub dislike_alpha: f64,
}

impl CardPose {
    /// Untransformed pose at `center` with both indicators hidden.
    #[must_use]
    pub const fn resting(center: Point) -> Self {
        Self {
            center,
            rotation: 0.0,
            like_alpha: 0.0,
            dislike_alpha: 0.0,
        }
    }
}

/// Pose of a card dragged by `delta` from `original_center`.
#[must_use]
pub fn resolve_pose(original_center: Point, delta: Point, width: f64, tuning: &DragTuning) -> CardPose {
    let center = original_center + delta;
    if !(width.is_finite() && width > 0.0) {
        return CardPose::resting(center);
    }

    let ratio = delta.x / width;
    let rotation = if tuning.model_rotation {
        ratio * tuning.rotation_factor
    } else {
        0.0
    };
    let like_alpha = if delta.x > 0.0 {
        (ratio * tuning.alpha_gain).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let dislike_alpha = if delta.x < 0.0 {
        (-ratio * tuning.alpha_gain).clamp(0.0, 1.0)
    } else {
        0.0
    };

    CardPose {
        center,
        rotation,
        like_alpha,
        dislike_alpha,
    }
}

/// Classify a gesture that ended with the card at `final_center`.
///
/// `threshold` is a fraction of `width`; horizontal travel strictly below it
/// snaps back.
#[must_use]
pub fn classify(original_center: Point, final_center: Point, width: f64, threshold: f64) -> Verdict {
    let dx = final_center.x - original_center.x;
    if !dx.is_finite() || dx == 0.0 || dx.abs() < width * threshold {
        return Verdict::Cancel;
    }
    if dx > 0.0 { Verdict::Like } else { Verdict::Dislike }
}

/// Off-screen pose for a card leaving with `result`.
///
/// The card travels `exit_distance` widths from `original_center`
/// horizontally, keeps whatever vertical offset and tilt `current` already
/// has, and shows only the matching indicator at full strength.
#[must_use]
pub fn exit_pose(
    original_center: Point,
    current: &CardPose,
    width: f64,
    result: StackResult,
    tuning: &DragTuning,
) -> CardPose {
    let travel = result.direction() * tuning.exit_distance * width.max(0.0);
    let (like_alpha, dislike_alpha) = match result {
        StackResult::Like => (1.0, 0.0),
        StackResult::Dislike => (0.0, 1.0),
    };
    CardPose {
        center: Point::new(original_center.x + travel, current.center.y),
        rotation: current.rotation,
        like_alpha,
        dislike_alpha,
    }
}
