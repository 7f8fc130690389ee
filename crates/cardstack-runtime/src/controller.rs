#![forbid(unsafe_code)]

//! Stack controller: the card window, drag sessions, and dismissals.
//!
//! [`StackController`] owns the ordered window of materialized cards, the
//! delegate that supplies them, and the renderer that shows them. Hosts drive
//! it with four kinds of input: load calls ([`reload_cards`],
//! [`continue_loading_cards`]), programmatic dismissals ([`like_top_card`],
//! [`dislike_top_card`]), gesture events ([`handle_gesture`]), and animation
//! completions ([`animation_finished`]).
//!
//! # State Machine
//!
//! ```text
//!          Began                    Ended (|dx| ≥ threshold)
//!   Idle ─────────▶ Dragging ───────────────────────────────▶ Animating
//!    ▲  like/dislike(animated) ─────────────────────────────▶   │
//!    │                  │ Ended (below threshold) / Cancelled    │
//!    │                  └──────────────▶ Animating (snap-back)   │
//!    └──────────────────── animation_finished(ticket) ◀──────────┘
//! ```
//!
//! # Invariants
//!
//! 1. Window positions are `0..n` in queue order between operations.
//! 2. Exactly the card at position 0 is interactive (none when empty).
//! 3. At most one transform animation is outstanding (animation-lock);
//!    layout passes never hold the lock.
//! 4. `on_dismissed` fires once per evicted card, before the remaining cards
//!    are renumbered.
//! 5. `reload_cards` tears down any session or pending animation; a late
//!    completion for a torn-down ticket is ignored.
//!
//! # Failure Modes
//!
//! Every degenerate call (dismiss on an empty window, gesture with no
//! session, gesture aimed at a card other than the top) is a silent no-op,
//! logged at `debug`.
//!
//! [`reload_cards`]: StackController::reload_cards
//! [`continue_loading_cards`]: StackController::continue_loading_cards
//! [`like_top_card`]: StackController::like_top_card
//! [`dislike_top_card`]: StackController::dislike_top_card
//! [`handle_gesture`]: StackController::handle_gesture
//! [`animation_finished`]: StackController::animation_finished

use std::collections::VecDeque;

use cardstack_core::drag::{self, CardPose, StackResult};
use cardstack_core::geometry::Point;
use cardstack_core::gesture::{GestureEvent, GesturePhase};
use cardstack_core::offsets::OffsetPolicy;
use tracing::{debug, info, trace};

use crate::card::CardRecord;
use crate::config::{StackConfig, StackConfigError};
use crate::host::{AnimationTicket, CardStackDelegate, Motion, StackRenderer};

const TARGET: &str = "cardstack.controller";

/// Coarse controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackPhase {
    /// No drag session and no transform animation.
    Idle,
    /// The top card is tracking the pointer.
    Dragging,
    /// A dismissal or snap-back animation is running.
    Animating,
}

/// Transient state of one interaction with the top card.
#[derive(Debug, Clone, Copy)]
struct DragSession {
    original_center: Point,
    drag_start: Point,
    width: f64,
    pose: CardPose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Dismiss(StackResult),
    SnapBack,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    ticket: AnimationTicket,
    pending: Pending,
}

/// Swipeable card stack controller.
pub struct StackController<D, R> {
    config: StackConfig,
    policy: OffsetPolicy,
    delegate: D,
    renderer: R,
    cards: VecDeque<CardRecord>,
    session: Option<DragSession>,
    in_flight: Option<InFlight>,
    last_ticket: u64,
}

impl<D, R> std::fmt::Debug for StackController<D, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackController")
            .field("cards", &self.cards.len())
            .field("phase", &self.phase())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<D: CardStackDelegate, R: StackRenderer> StackController<D, R> {
    /// Create a controller with an empty window.
    ///
    /// Nothing is loaded until the host calls [`reload_cards`](Self::reload_cards).
    pub fn new(config: StackConfig, delegate: D, renderer: R) -> Result<Self, StackConfigError> {
        let config = config.validated()?;
        Ok(Self {
            policy: config.offset_policy(),
            config,
            delegate,
            renderer,
            cards: VecDeque::new(),
            session: None,
            in_flight: None,
            last_ticket: 0,
        })
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Drop every card and load a fresh window from index 0.
    ///
    /// Any drag session or pending animation is abandoned.
    pub fn reload_cards(&mut self) {
        info!(target: TARGET, dropped = self.cards.len(), "reloading cards");
        self.clear_cards();
        self.session = None;
        self.in_flight = None;
        self.load_cards(0, self.config.max_simultaneous_cards);
    }

    /// Append cards until the window is full or the delegate runs out.
    pub fn continue_loading_cards(&mut self) {
        self.load_cards(self.cards.len(), self.config.max_simultaneous_cards);
    }

    fn clear_cards(&mut self) {
        for card in self.cards.drain(..) {
            self.renderer.detach(&card.handles());
            self.renderer.release_offsets(card.surface());
        }
    }

    fn load_cards(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }

        for index in start..end {
            let Some(mut card) = self.delegate.provide_card(index) else {
                debug!(target: TARGET, index, "card source exhausted");
                break;
            };

            card.place(index, self.policy.offsets_for(index));
            self.renderer.attach(&card.handles());
            self.renderer.apply_offsets(card.surface(), card.offsets());
            self.renderer.set_interactive(card.surface(), card.is_interactive());
            debug!(target: TARGET, index, surface = %card.surface(), "card loaded");
            self.cards.push_back(card);
        }

        self.debug_check_window();
    }

    // -----------------------------------------------------------------------
    // Dismissal
    // -----------------------------------------------------------------------

    /// Dismiss the top card to the right.
    pub fn like_top_card(&mut self, animated: bool) {
        self.dismiss_top_card(StackResult::Like, animated);
    }

    /// Dismiss the top card to the left.
    pub fn dislike_top_card(&mut self, animated: bool) {
        self.dismiss_top_card(StackResult::Dislike, animated);
    }

    fn dismiss_top_card(&mut self, result: StackResult, animated: bool) {
        if let Some(flight) = self.in_flight {
            debug!(target: TARGET, ticket = flight.ticket.0, ?result, "animation in progress, dismissal ignored");
            return;
        }
        let Some(top) = self.cards.front() else {
            debug!(target: TARGET, ?result, "dismissal on empty stack ignored");
            return;
        };
        let handles = top.handles();

        let session = match self.session.take() {
            Some(session) => session,
            None => {
                let frame = self.renderer.frame(handles.surface);
                DragSession {
                    original_center: frame.center(),
                    drag_start: frame.center(),
                    width: frame.width(),
                    pose: CardPose::resting(frame.center()),
                }
            }
        };
        let target = drag::exit_pose(
            session.original_center,
            &session.pose,
            session.width,
            result,
            &self.config.drag,
        );

        if animated {
            let ticket = self.next_ticket();
            self.renderer.animate(
                ticket,
                self.config.dismiss_duration(),
                Motion::Pose {
                    card: handles,
                    to: target,
                },
            );
            self.session = Some(DragSession {
                pose: target,
                ..session
            });
            self.in_flight = Some(InFlight {
                ticket,
                pending: Pending::Dismiss(result),
            });
        } else {
            self.renderer.apply_pose(&handles, &target);
            self.finish_dismissal(result, false);
        }
    }

    fn finish_dismissal(&mut self, result: StackResult, animated: bool) {
        let Some(top) = self.cards.front() else {
            return;
        };
        info!(target: TARGET, surface = %top.surface(), ?result, "card dismissed");
        self.delegate.on_dismissed(top, result);
        self.evict_top(animated);
    }

    /// Remove the top card, shift the rest forward, and backfill the tail.
    fn evict_top(&mut self, animated: bool) {
        let Some(evicted) = self.cards.pop_front() else {
            return;
        };
        self.renderer.detach(&evicted.handles());
        self.renderer.release_offsets(evicted.surface());

        let index_offset = self.policy.index_offset;
        for card in &mut self.cards {
            card.update_offsets(index_offset);
            self.renderer.apply_offsets(card.surface(), card.offsets());
        }
        if let Some(top) = self.cards.front_mut() {
            top.set_interactive(true);
            self.renderer.set_interactive(top.surface(), true);
        }

        if animated {
            let ticket = self.next_ticket();
            self.renderer
                .animate(ticket, self.config.layout_duration(), Motion::Layout);
        } else {
            self.renderer.layout_now();
        }

        debug!(target: TARGET, remaining = self.cards.len(), "card evicted");
        self.continue_loading_cards();
    }

    // -----------------------------------------------------------------------
    // Gestures
    // -----------------------------------------------------------------------

    /// Feed one gesture event aimed at a card.
    ///
    /// Only events targeting the top card are considered.
    pub fn handle_gesture(&mut self, event: GestureEvent) {
        let Some(top) = self.cards.front() else {
            debug!(target: TARGET, phase = ?event.phase, "gesture on empty stack ignored");
            return;
        };
        if event.target != top.surface() {
            debug!(target: TARGET, target_surface = %event.target, "gesture on non-top card ignored");
            return;
        }
        let handles = top.handles();

        if let GesturePhase::Tapped(_) = event.phase {
            if self.in_flight.is_none() && self.session.is_none() {
                self.delegate.on_tapped(top);
            }
            return;
        }

        if let Some(flight) = self.in_flight {
            debug!(target: TARGET, ticket = flight.ticket.0, phase = ?event.phase, "animation in progress, gesture ignored");
            return;
        }

        match event.phase {
            GesturePhase::Began(location) => {
                if self.session.is_some() {
                    debug!(target: TARGET, "drag already active, begin ignored");
                    return;
                }
                let frame = self.renderer.frame(handles.surface);
                self.session = Some(DragSession {
                    original_center: frame.center(),
                    drag_start: location,
                    width: frame.width(),
                    pose: CardPose::resting(frame.center()),
                });
                debug!(target: TARGET, surface = %handles.surface, "drag began");
            }
            GesturePhase::Moved(location) => {
                let tuning = self.config.drag;
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                session.pose = drag::resolve_pose(
                    session.original_center,
                    location - session.drag_start,
                    session.width,
                    &tuning,
                );
                trace!(target: TARGET, x = session.pose.center.x, rotation = session.pose.rotation, "drag moved");
                self.renderer.apply_pose(&handles, &session.pose);
            }
            GesturePhase::Ended(location) => {
                let tuning = self.config.drag;
                let threshold = self.config.action_trigger_threshold;
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                session.pose = drag::resolve_pose(
                    session.original_center,
                    location - session.drag_start,
                    session.width,
                    &tuning,
                );
                let verdict = drag::classify(
                    session.original_center,
                    session.pose.center,
                    session.width,
                    threshold,
                );
                debug!(target: TARGET, ?verdict, "drag ended");
                match verdict.result() {
                    Some(result) => self.dismiss_top_card(result, true),
                    None => self.snap_back(),
                }
            }
            GesturePhase::Cancelled | GesturePhase::Failed => {
                debug!(target: TARGET, phase = ?event.phase, "drag cancelled");
                self.snap_back();
            }
            GesturePhase::Tapped(_) => {}
        }
    }

    fn snap_back(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let Some(handles) = self.cards.front().map(CardRecord::handles) else {
            return;
        };
        let ticket = self.next_ticket();
        self.renderer.animate(
            ticket,
            self.config.snap_back_duration(),
            Motion::Pose {
                card: handles,
                to: CardPose::resting(session.original_center),
            },
        );
        self.in_flight = Some(InFlight {
            ticket,
            pending: Pending::SnapBack,
        });
    }

    // -----------------------------------------------------------------------
    // Animation completion
    // -----------------------------------------------------------------------

    /// Report that the animation started with `ticket` has finished.
    pub fn animation_finished(&mut self, ticket: AnimationTicket) {
        match self.in_flight {
            Some(flight) if flight.ticket == ticket => {
                self.in_flight = None;
                self.session = None;
                match flight.pending {
                    Pending::Dismiss(result) => self.finish_dismissal(result, true),
                    Pending::SnapBack => {
                        debug!(target: TARGET, ticket = ticket.0, "snap-back settled");
                    }
                }
            }
            _ => {
                trace!(target: TARGET, ticket = ticket.0, "untracked animation finished");
            }
        }
    }

    fn next_ticket(&mut self) -> AnimationTicket {
        self.last_ticket += 1;
        AnimationTicket(self.last_ticket)
    }
}

// ---------------------------------------------------------------------------
// Introspection
// ---------------------------------------------------------------------------

impl<D, R> StackController<D, R> {
    /// Cards in the window, top first.
    pub fn cards(&self) -> impl ExactSizeIterator<Item = &CardRecord> + '_ {
        self.cards.iter()
    }

    #[must_use]
    pub fn card(&self, position: usize) -> Option<&CardRecord> {
        self.cards.get(position)
    }

    #[must_use]
    pub fn top_card(&self) -> Option<&CardRecord> {
        self.cards.front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn phase(&self) -> StackPhase {
        if self.in_flight.is_some() {
            StackPhase::Animating
        } else if self.session.is_some() {
            StackPhase::Dragging
        } else {
            StackPhase::Idle
        }
    }

    /// Whether the animation-lock is held.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Consume the controller, returning its collaborators.
    pub fn into_parts(self) -> (D, R) {
        (self.delegate, self.renderer)
    }

    fn debug_check_window(&self) {
        debug_assert!(
            self.cards
                .iter()
                .enumerate()
                .all(|(i, c)| c.position() == i && c.is_interactive() == (i == 0)),
            "window positions must be contiguous with only the top interactive"
        );
    }
}
