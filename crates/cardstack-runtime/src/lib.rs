#![forbid(unsafe_code)]

//! Runtime: the stack controller and its collaborator contracts.
//!
//! # Role in cardstack
//! `cardstack-runtime` turns the pure pieces of `cardstack-core` into a
//! running card stack. It owns the window of [`card::CardRecord`]s, asks the
//! [`host::CardStackDelegate`] for new cards, drives the
//! [`host::StackRenderer`], and resolves gestures into dismissals.
//!
//! # Threading
//! Everything runs on the host's UI thread. No call blocks; animations report
//! completion through [`controller::StackController::animation_finished`].

pub mod card;
pub mod config;
pub mod controller;
pub mod host;

pub use card::{CardHandles, CardRecord};
pub use config::{StackConfig, StackConfigError};
pub use controller::{StackController, StackPhase};
pub use host::{AnimationTicket, CardStackDelegate, Motion, StackRenderer};
