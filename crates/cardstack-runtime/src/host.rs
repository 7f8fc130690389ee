#![forbid(unsafe_code)]

//! Collaborator contracts consumed by the stack controller.
//!
//! The controller owns one [`CardStackDelegate`] (data source plus dismissal
//! and tap notifications) and one [`StackRenderer`] (display tree, layout and
//! animation). Both run on the controller's thread; no call blocks.
//!
//! # Animation contract
//!
//! [`StackRenderer::animate`] starts a timed transition and returns
//! immediately. When it finishes, the host must call
//! [`StackController::animation_finished`](crate::controller::StackController::animation_finished)
//! with the same ticket, exactly once.

use std::time::Duration;

use cardstack_core::drag::{CardPose, StackResult};
use cardstack_core::geometry::{Rect, SurfaceId};
use cardstack_core::offsets::LayoutOffsets;

use crate::card::{CardHandles, CardRecord};

/// Identifies one requested animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationTicket(pub u64);

/// What an animation transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Move a card (and its feedback indicators) to `to`.
    Pose { card: CardHandles, to: CardPose },
    /// Settle every card at its most recently applied offsets.
    Layout,
}

/// Supplies cards and receives stack notifications.
pub trait CardStackDelegate {
    /// Card content for window slot `index`, or `None` when the data is
    /// exhausted. Indices requested within one load are strictly increasing.
    fn provide_card(&mut self, index: usize) -> Option<CardRecord>;

    /// Called once per dismissed card, while it is still at position 0.
    fn on_dismissed(&mut self, card: &CardRecord, result: StackResult);

    /// Called when the top card is tapped.
    fn on_tapped(&mut self, _card: &CardRecord) {}
}

/// Rendering, layout and animation capabilities.
pub trait StackRenderer {
    /// Insert a card's surface into the display tree, behind existing cards.
    fn attach(&mut self, card: &CardHandles);

    /// Remove a card's surface from the display tree.
    fn detach(&mut self, card: &CardHandles);

    /// Constrain a card inside the container with `offsets`.
    fn apply_offsets(&mut self, surface: SurfaceId, offsets: LayoutOffsets);

    /// Drop the constraints installed by [`apply_offsets`](Self::apply_offsets).
    fn release_offsets(&mut self, surface: SurfaceId);

    /// Enable or disable input on a card.
    fn set_interactive(&mut self, surface: SurfaceId, interactive: bool);

    /// Current frame of a card in container coordinates.
    fn frame(&self, surface: SurfaceId) -> Rect;

    /// Apply a pose immediately, without animation.
    fn apply_pose(&mut self, card: &CardHandles, pose: &CardPose);

    /// Run a layout pass synchronously so offset changes are visible now.
    fn layout_now(&mut self);

    /// Start an animation; completion is reported through the ticket.
    fn animate(&mut self, ticket: AnimationTicket, duration: Duration, motion: Motion);
}
