#![forbid(unsafe_code)]

//! Core: geometry, layout offsets, drag resolution, and gesture events.
//!
//! # Role in cardstack
//! `cardstack-core` holds the pure pieces of a swipeable card stack. Nothing
//! here talks to a host: no rendering, no data source, no animation runtime.
//! The runtime (`cardstack-runtime`) composes these into the stack controller.
//!
//! # Primary responsibilities
//! - **Geometry**: points, sizes, rects, and opaque [`geometry::SurfaceId`] handles.
//! - **Offsets**: the receding-stack inset policy.
//! - **Drag**: pointer delta to pose, and like/dislike/cancel verdicts.
//! - **Gesture**: lifecycle events plus a raw-pointer recognizer.

pub mod drag;
pub mod geometry;
pub mod gesture;
pub mod offsets;

pub use drag::{CardPose, DragTuning, StackResult, Verdict};
pub use geometry::{Point, Rect, Size, SurfaceId};
pub use gesture::{GestureEvent, GesturePhase};
pub use offsets::{LayoutOffsets, OffsetPolicy};
