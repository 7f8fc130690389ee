#![forbid(unsafe_code)]

//! cardstack public facade crate.
//!
//! Re-exports the types a host needs to embed a swipeable card stack and
//! offers a prelude for day-to-day usage.
//!
//! A host implements [`CardStackDelegate`] (cards and notifications) and
//! [`StackRenderer`] (display and animation), hands both to
//! [`StackController::new`], calls [`StackController::reload_cards`], and
//! then forwards gesture events and animation completions.

// --- Core re-exports -------------------------------------------------------

pub use cardstack_core::drag::{CardPose, DragTuning, StackResult, Verdict};
pub use cardstack_core::geometry::{Point, Rect, Size, SurfaceId};
pub use cardstack_core::gesture::{
    GestureEvent, GesturePhase, PointerKind, PointerRecognizer, PointerSample, RecognizerConfig,
};
pub use cardstack_core::offsets::{LayoutOffsets, OffsetPolicy};

// --- Runtime re-exports ----------------------------------------------------

pub use cardstack_runtime::{
    AnimationTicket, CardHandles, CardRecord, CardStackDelegate, Motion, StackConfig,
    StackConfigError, StackController, StackPhase, StackRenderer,
};

pub mod prelude {
    pub use crate::{
        CardRecord, CardStackDelegate, GestureEvent, GesturePhase, Point, StackConfig,
        StackController, StackRenderer, StackResult, SurfaceId,
    };

    pub use crate::{core, runtime};
}

pub use cardstack_core as core;
pub use cardstack_runtime as runtime;
