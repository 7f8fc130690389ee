#![forbid(unsafe_code)]

//! Card record: one slot of the visible stack window.

use cardstack_core::geometry::SurfaceId;
use cardstack_core::offsets::LayoutOffsets;

/// The surface handles of a card, bundled for the renderer.
///
/// Feedback handles are non-owning: the controller may change their opacity
/// but the host decides when they exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardHandles {
    pub surface: SurfaceId,
    pub like_surface: Option<SurfaceId>,
    pub dislike_surface: Option<SurfaceId>,
}

/// One materialized card.
///
/// The delegate builds it with [`CardRecord::new`] and the feedback builders;
/// `position`, `offsets` and `interactive` belong to the controller and are
/// assigned when the card is loaded into the window.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRecord {
    surface: SurfaceId,
    like_surface: Option<SurfaceId>,
    dislike_surface: Option<SurfaceId>,
    position: usize,
    offsets: LayoutOffsets,
    interactive: bool,
}

impl CardRecord {
    /// A card showing `surface`, with no feedback indicators.
    #[must_use]
    pub fn new(surface: SurfaceId) -> Self {
        Self {
            surface,
            like_surface: None,
            dislike_surface: None,
            position: 0,
            offsets: LayoutOffsets::default(),
            interactive: false,
        }
    }

    #[must_use]
    pub fn with_like_surface(mut self, surface: SurfaceId) -> Self {
        self.like_surface = Some(surface);
        self
    }

    #[must_use]
    pub fn with_dislike_surface(mut self, surface: SurfaceId) -> Self {
        self.dislike_surface = Some(surface);
        self
    }

    #[inline]
    #[must_use]
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    #[inline]
    #[must_use]
    pub fn like_surface(&self) -> Option<SurfaceId> {
        self.like_surface
    }

    #[inline]
    #[must_use]
    pub fn dislike_surface(&self) -> Option<SurfaceId> {
        self.dislike_surface
    }

    /// Zero-based rank in the window; 0 is the top card.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Offsets currently applied to the card's layout.
    #[inline]
    #[must_use]
    pub fn offsets(&self) -> LayoutOffsets {
        self.offsets
    }

    /// Whether the card accepts input. Only the top card does.
    #[inline]
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    #[must_use]
    pub fn handles(&self) -> CardHandles {
        CardHandles {
            surface: self.surface,
            like_surface: self.like_surface,
            dislike_surface: self.dislike_surface,
        }
    }

    /// Move the card one slot toward the top after an eviction ahead of it.
    ///
    /// Offsets shift by exactly `index_offset`; they are not recomputed.
    pub fn update_offsets(&mut self, index_offset: f64) {
        self.position = self.position.saturating_sub(1);
        self.offsets = self.offsets.advance(index_offset);
    }

    pub(crate) fn place(&mut self, position: usize, offsets: LayoutOffsets) {
        self.position = position;
        self.offsets = offsets;
        self.interactive = position == 0;
    }

    pub(crate) fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }
}
