#![forbid(unsafe_code)]

//! Layout offset policy: the cascading inset that makes cards behind the top
//! one recede.
//!
//! A card at stack position `p` is inset from its container by
//! `leading = default + index * p` on the leading/top side and
//! `trailing = default - index * p` on the trailing/bottom side, so each card
//! further back sits a little lower and a little narrower.
//!
//! # Invariants
//!
//! 1. `offsets_for(0)` is `{ default, default }`.
//! 2. `offsets_for(p).advance(index) == offsets_for(p - 1)` for `p >= 1`:
//!    shifting a card forward by one slot is an incremental update, never a
//!    recomputation.

/// Margins applied to one card inside the stack container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutOffsets {
    /// Inset on the leading and top edges.
    pub leading: f64,
    /// Inset on the trailing and bottom edges.
    pub trailing: f64,
}

impl LayoutOffsets {
    #[inline]
    #[must_use]
    pub const fn new(leading: f64, trailing: f64) -> Self {
        Self { leading, trailing }
    }

    /// Shift offsets for a card that moved one slot toward the top.
    #[inline]
    #[must_use]
    pub fn advance(self, index_offset: f64) -> Self {
        Self {
            leading: self.leading - index_offset,
            trailing: self.trailing + index_offset,
        }
    }
}

/// Maps a stack position to the [`LayoutOffsets`] used to render it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetPolicy {
    /// Base margin for the top card.
    pub default_offset: f64,
    /// Per-depth increment.
    pub index_offset: f64,
}

impl Default for OffsetPolicy {
    fn default() -> Self {
        Self {
            default_offset: 15.0,
            index_offset: 5.0,
        }
    }
}

impl OffsetPolicy {
    #[must_use]
    pub const fn new(default_offset: f64, index_offset: f64) -> Self {
        Self {
            default_offset,
            index_offset,
        }
    }

    /// Offsets for a card at `position` (0 = top).
    #[must_use]
    pub fn offsets_for(&self, position: usize) -> LayoutOffsets {
        let depth = self.index_offset * position as f64;
        LayoutOffsets {
            leading: self.default_offset + depth,
            trailing: self.default_offset - depth,
        }
    }
}
