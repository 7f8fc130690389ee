#![forbid(unsafe_code)]

//! Test harness for cardstack.
//!
//! - [`ScriptedDeck`]: a [`CardStackDelegate`] over a list of labels that
//!   drops dismissed items from its backing list, the way a host's data
//!   source does, and records every notification.
//! - [`RecordingRenderer`]: a [`StackRenderer`] that models surfaces in
//!   memory, records every call, and holds animations until the test
//!   completes them with [`finish_next`] or [`finish_all`].

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use cardstack_core::drag::{CardPose, StackResult};
use cardstack_core::geometry::{Point, Rect, SurfaceId};
use cardstack_core::gesture::{GestureEvent, GesturePhase};
use cardstack_core::offsets::LayoutOffsets;
use cardstack_runtime::card::{CardHandles, CardRecord};
use cardstack_runtime::config::StackConfig;
use cardstack_runtime::controller::StackController;
use cardstack_runtime::host::{AnimationTicket, CardStackDelegate, Motion, StackRenderer};

// ---------------------------------------------------------------------------
// ScriptedDeck
// ---------------------------------------------------------------------------

/// Delegate backed by a list of labelled items.
///
/// Dismissed items are dropped from the backing list, so window index `i`
/// always maps to the `i`-th undismissed item.
///
/// Item `n` of the initial list is shown on `SurfaceId(n * 10)` with like and
/// dislike indicators on `n * 10 + 1` and `n * 10 + 2`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDeck {
    items: Vec<(u64, String)>,
    labels: HashMap<SurfaceId, String>,
    /// Every index passed to `provide_card`, in order.
    pub requested: Vec<usize>,
    /// `(label, result)` for every dismissal, in order.
    pub dismissed: Vec<(String, StackResult)>,
    /// Window position of each dismissed card when it was reported.
    pub dismissed_positions: Vec<usize>,
    /// Labels of tapped cards, in order.
    pub tapped: Vec<String>,
}

impl ScriptedDeck {
    /// A deck that removes dismissed items from its backing list.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<(u64, String)> = labels
            .into_iter()
            .enumerate()
            .map(|(n, label)| (n as u64, label.into()))
            .collect();
        let labels = items
            .iter()
            .map(|(id, label)| (Self::surface_for(*id), label.clone()))
            .collect();
        Self {
            items,
            labels,
            ..Self::default()
        }
    }

    fn surface_for(id: u64) -> SurfaceId {
        SurfaceId(id * 10)
    }

    /// Label shown on `surface`.
    #[must_use]
    pub fn label_of(&self, surface: SurfaceId) -> Option<&str> {
        self.labels.get(&surface).map(String::as_str)
    }

    /// Items not yet dismissed.
    pub fn remaining(&self) -> usize {
        self.items.len()
    }

    /// Labels of the items not yet dismissed, in source order.
    pub fn remaining_labels(&self) -> Vec<&str> {
        self.items.iter().map(|(_, label)| label.as_str()).collect()
    }
}

impl CardStackDelegate for ScriptedDeck {
    fn provide_card(&mut self, index: usize) -> Option<CardRecord> {
        self.requested.push(index);
        let &(id, _) = self.items.get(index)?;
        let surface = Self::surface_for(id);
        Some(
            CardRecord::new(surface)
                .with_like_surface(SurfaceId(surface.0 + 1))
                .with_dislike_surface(SurfaceId(surface.0 + 2)),
        )
    }

    fn on_dismissed(&mut self, card: &CardRecord, result: StackResult) {
        let label = self
            .label_of(card.surface())
            .unwrap_or_default()
            .to_string();
        if card.position() < self.items.len() {
            self.items.remove(card.position());
        }
        self.dismissed_positions.push(card.position());
        self.dismissed.push((label, result));
    }

    fn on_tapped(&mut self, card: &CardRecord) {
        let label = self
            .label_of(card.surface())
            .unwrap_or_default()
            .to_string();
        self.tapped.push(label);
    }
}

// ---------------------------------------------------------------------------
// RecordingRenderer
// ---------------------------------------------------------------------------

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Attach(SurfaceId),
    Detach(SurfaceId),
    ApplyOffsets(SurfaceId, LayoutOffsets),
    ReleaseOffsets(SurfaceId),
    SetInteractive(SurfaceId, bool),
    ApplyPose(SurfaceId, CardPose),
    LayoutNow,
    Animate(AnimationTicket, Duration, Motion),
}

/// An animation the renderer has started but the test has not finished.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingAnimation {
    pub ticket: AnimationTicket,
    pub duration: Duration,
    pub motion: Motion,
}

#[derive(Debug, Clone, Default)]
struct SurfaceModel {
    attached: bool,
    offsets: Option<LayoutOffsets>,
    interactive: bool,
    pose: Option<CardPose>,
}

/// In-memory renderer.
///
/// Cards are laid out inside `container`, inset by their offsets on each
/// side. Animations update the model to their end state at once (as a
/// presentation layer would) and stay pending until finished.
#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    container: Rect,
    surfaces: HashMap<SurfaceId, SurfaceModel>,
    alphas: HashMap<SurfaceId, f64>,
    pending: VecDeque<PendingAnimation>,
    /// Every call, in order.
    pub calls: Vec<RenderCall>,
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new(Rect::new(0.0, 0.0, 330.0, 480.0))
    }
}

impl RecordingRenderer {
    #[must_use]
    pub fn new(container: Rect) -> Self {
        Self {
            container,
            surfaces: HashMap::new(),
            alphas: HashMap::new(),
            pending: VecDeque::new(),
            calls: Vec::new(),
        }
    }

    /// Frame a card occupies at rest, given its offsets.
    #[must_use]
    pub fn resting_frame(&self, offsets: LayoutOffsets) -> Rect {
        let c = self.container;
        Rect::new(
            c.origin.x + offsets.leading,
            c.origin.y + offsets.leading,
            (c.width() - offsets.leading - offsets.trailing).max(0.0),
            (c.height() - offsets.leading - offsets.trailing).max(0.0),
        )
    }

    /// Attached surfaces.
    pub fn attached(&self) -> Vec<SurfaceId> {
        let mut out: Vec<SurfaceId> = self
            .surfaces
            .iter()
            .filter(|(_, m)| m.attached)
            .map(|(id, _)| *id)
            .collect();
        out.sort();
        out
    }

    #[must_use]
    pub fn is_attached(&self, surface: SurfaceId) -> bool {
        self.surfaces.get(&surface).is_some_and(|m| m.attached)
    }

    #[must_use]
    pub fn is_interactive(&self, surface: SurfaceId) -> bool {
        self.surfaces.get(&surface).is_some_and(|m| m.interactive)
    }

    #[must_use]
    pub fn offsets_of(&self, surface: SurfaceId) -> Option<LayoutOffsets> {
        self.surfaces.get(&surface).and_then(|m| m.offsets)
    }

    #[must_use]
    pub fn pose_of(&self, surface: SurfaceId) -> Option<CardPose> {
        self.surfaces.get(&surface).and_then(|m| m.pose)
    }

    /// Last opacity set on a feedback surface (0.0 if never set).
    #[must_use]
    pub fn alpha_of(&self, surface: SurfaceId) -> f64 {
        self.alphas.get(&surface).copied().unwrap_or(0.0)
    }

    pub fn pending(&self) -> impl ExactSizeIterator<Item = &PendingAnimation> + '_ {
        self.pending.iter()
    }

    /// Pop the oldest pending animation.
    pub fn take_next(&mut self) -> Option<PendingAnimation> {
        self.pending.pop_front()
    }

    fn model(&mut self, surface: SurfaceId) -> &mut SurfaceModel {
        self.surfaces.entry(surface).or_default()
    }

    fn set_pose(&mut self, card: &CardHandles, pose: &CardPose) {
        self.model(card.surface).pose = Some(*pose);
        if let Some(like) = card.like_surface {
            self.alphas.insert(like, pose.like_alpha);
        }
        if let Some(dislike) = card.dislike_surface {
            self.alphas.insert(dislike, pose.dislike_alpha);
        }
    }
}

impl StackRenderer for RecordingRenderer {
    fn attach(&mut self, card: &CardHandles) {
        self.calls.push(RenderCall::Attach(card.surface));
        let model = self.model(card.surface);
        model.attached = true;
        model.pose = None;
    }

    fn detach(&mut self, card: &CardHandles) {
        self.calls.push(RenderCall::Detach(card.surface));
        let model = self.model(card.surface);
        model.attached = false;
        model.interactive = false;
    }

    fn apply_offsets(&mut self, surface: SurfaceId, offsets: LayoutOffsets) {
        self.calls.push(RenderCall::ApplyOffsets(surface, offsets));
        self.model(surface).offsets = Some(offsets);
    }

    fn release_offsets(&mut self, surface: SurfaceId) {
        self.calls.push(RenderCall::ReleaseOffsets(surface));
        self.model(surface).offsets = None;
    }

    fn set_interactive(&mut self, surface: SurfaceId, interactive: bool) {
        self.calls.push(RenderCall::SetInteractive(surface, interactive));
        self.model(surface).interactive = interactive;
    }

    fn frame(&self, surface: SurfaceId) -> Rect {
        let model = self.surfaces.get(&surface).cloned().unwrap_or_default();
        let rest = self.resting_frame(model.offsets.unwrap_or_default());
        match model.pose {
            Some(pose) => Rect::centered_at(pose.center, rest.size),
            None => rest,
        }
    }

    fn apply_pose(&mut self, card: &CardHandles, pose: &CardPose) {
        self.calls.push(RenderCall::ApplyPose(card.surface, *pose));
        self.set_pose(card, pose);
    }

    fn layout_now(&mut self) {
        self.calls.push(RenderCall::LayoutNow);
    }

    fn animate(&mut self, ticket: AnimationTicket, duration: Duration, motion: Motion) {
        self.calls.push(RenderCall::Animate(ticket, duration, motion));
        if let Motion::Pose { card, to } = motion {
            self.set_pose(&card, &to);
        }
        self.pending.push_back(PendingAnimation {
            ticket,
            duration,
            motion,
        });
    }
}

// ---------------------------------------------------------------------------
// Controller helpers
// ---------------------------------------------------------------------------

/// Controller type used throughout the scenario tests.
pub type TestStack = StackController<ScriptedDeck, RecordingRenderer>;

/// Build a controller over `labels` with `config` and load the first window.
///
/// # Panics
///
/// Panics if `config` is invalid.
pub fn loaded_stack<I, S>(labels: I, config: StackConfig) -> TestStack
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut stack = StackController::new(config, ScriptedDeck::new(labels), RecordingRenderer::default())
        .unwrap_or_else(|e| panic!("invalid test config: {e}"));
    stack.reload_cards();
    stack
}

/// Complete the oldest pending animation. Returns `false` if none was pending.
pub fn finish_next<D: CardStackDelegate>(stack: &mut StackController<D, RecordingRenderer>) -> bool {
    match stack.renderer_mut().take_next() {
        Some(anim) => {
            stack.animation_finished(anim.ticket);
            true
        }
        None => false,
    }
}

/// Complete pending animations until none remain (including any started by
/// completions). Returns how many were finished.
pub fn finish_all<D: CardStackDelegate>(stack: &mut StackController<D, RecordingRenderer>) -> usize {
    let mut finished = 0;
    while finish_next(stack) {
        finished += 1;
    }
    finished
}

/// Labels of the window, top first.
pub fn window_labels(stack: &TestStack) -> Vec<String> {
    stack
        .cards()
        .map(|c| {
            stack
                .delegate()
                .label_of(c.surface())
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

/// Positions of the window, top first.
pub fn window_positions<D, R>(stack: &StackController<D, R>) -> Vec<usize> {
    stack.cards().map(CardRecord::position).collect()
}

/// Drag the top card horizontally by `dx` from the middle of its frame and
/// release. Does nothing on an empty stack.
pub fn swipe(stack: &mut TestStack, dx: f64) {
    let Some(top) = stack.top_card() else {
        return;
    };
    let surface = top.surface();
    let start: Point = stack.renderer().frame(surface).center();
    let end = start.offset_by(dx, 0.0);
    for phase in [
        GesturePhase::Began(start),
        GesturePhase::Moved(start.offset_by(dx / 2.0, 0.0)),
        GesturePhase::Moved(end),
        GesturePhase::Ended(end),
    ] {
        stack.handle_gesture(GestureEvent::new(surface, phase));
    }
}
