//! End-to-end scenarios for the stack controller: loading, eviction,
//! gestures, and the animation-lock.

use cardstack_core::drag::StackResult;
use cardstack_core::geometry::{Point, SurfaceId};
use cardstack_core::gesture::{
    GestureEvent, GesturePhase, PointerKind, PointerRecognizer, PointerSample,
};
use cardstack_harness::{
    RenderCall, finish_all, finish_next, loaded_stack, swipe, window_labels, window_positions,
};
use cardstack_runtime::config::StackConfig;
use cardstack_runtime::controller::StackPhase;
use cardstack_runtime::host::{Motion, StackRenderer};

const FIVE: [&str; 5] = ["A", "B", "C", "D", "E"];

fn top_surface(stack: &cardstack_harness::TestStack) -> SurfaceId {
    stack.top_card().expect("stack not empty").surface()
}

fn send(stack: &mut cardstack_harness::TestStack, phase: GesturePhase) {
    let target = top_surface(stack);
    stack.handle_gesture(GestureEvent::new(target, phase));
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn reload_loads_first_window_in_order() {
    let stack = loaded_stack(FIVE, StackConfig::default());
    assert_eq!(window_labels(&stack), vec!["A", "B", "C"]);
    assert_eq!(window_positions(&stack), vec![0, 1, 2]);

    let interactive: Vec<bool> = stack.cards().map(|c| c.is_interactive()).collect();
    assert_eq!(interactive, vec![true, false, false]);
    for card in stack.cards() {
        assert_eq!(
            stack.renderer().is_interactive(card.surface()),
            card.position() == 0
        );
        assert!(stack.renderer().is_attached(card.surface()));
    }
}

#[test]
fn reload_with_short_source_stops_at_first_missing_card() {
    let config = StackConfig {
        max_simultaneous_cards: 5,
        ..StackConfig::default()
    };
    let stack = loaded_stack(["A", "B"], config);
    assert_eq!(window_labels(&stack), vec!["A", "B"]);
    assert_eq!(stack.delegate().requested, vec![0, 1, 2]);
}

#[test]
fn loaded_cards_get_fanned_offsets() {
    let stack = loaded_stack(FIVE, StackConfig::default());
    let policy = stack.config().offset_policy();
    for card in stack.cards() {
        assert_eq!(card.offsets(), policy.offsets_for(card.position()));
        assert_eq!(
            stack.renderer().offsets_of(card.surface()),
            Some(policy.offsets_for(card.position()))
        );
    }
}

#[test]
fn continue_loading_when_full_is_a_noop() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    let calls_before = stack.renderer().calls.len();
    let requested_before = stack.delegate().requested.clone();

    stack.continue_loading_cards();

    assert_eq!(window_labels(&stack), vec!["A", "B", "C"]);
    assert_eq!(stack.renderer().calls.len(), calls_before);
    assert_eq!(stack.delegate().requested, requested_before);
}

#[test]
fn reload_detaches_and_releases_everything_first() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    stack.renderer_mut().calls.clear();
    stack.reload_cards();

    let calls = &stack.renderer().calls;
    let first_attach = calls
        .iter()
        .position(|c| matches!(c, RenderCall::Attach(_)))
        .unwrap();
    let detaches = calls[..first_attach]
        .iter()
        .filter(|c| matches!(c, RenderCall::Detach(_)))
        .count();
    let releases = calls[..first_attach]
        .iter()
        .filter(|c| matches!(c, RenderCall::ReleaseOffsets(_)))
        .count();
    assert_eq!((detaches, releases), (3, 3));
    assert_eq!(window_labels(&stack), vec!["A", "B", "C"]);
}

// ============================================================================
// Eviction
// ============================================================================

#[test]
fn like_dislike_walkthrough() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());

    stack.like_top_card(false);
    assert_eq!(
        stack.delegate().dismissed,
        vec![("A".to_string(), StackResult::Like)]
    );
    assert_eq!(window_labels(&stack), vec!["B", "C", "D"]);
    assert_eq!(window_positions(&stack), vec![0, 1, 2]);

    stack.dislike_top_card(false);
    assert_eq!(
        stack.delegate().dismissed.last(),
        Some(&("B".to_string(), StackResult::Dislike))
    );
    assert_eq!(window_labels(&stack), vec!["C", "D", "E"]);

    stack.dislike_top_card(false);
    assert_eq!(window_labels(&stack), vec!["D", "E"]);
    assert_eq!(window_positions(&stack), vec![0, 1]);
    assert_eq!(stack.delegate().dismissed.len(), 3);

    stack.like_top_card(false);
    stack.like_top_card(false);
    assert!(stack.is_empty());
    stack.like_top_card(false);
    assert_eq!(stack.delegate().dismissed.len(), 5);
}

#[test]
fn eviction_shifts_offsets_and_promotes_next_card() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    let policy = stack.config().offset_policy();
    let a = top_surface(&stack);
    let b = stack.card(1).unwrap().surface();
    stack.renderer_mut().calls.clear();

    stack.like_top_card(false);

    let calls = &stack.renderer().calls;
    let idx = |needle: &RenderCall| calls.iter().position(|c| c == needle).unwrap();
    let detach = idx(&RenderCall::Detach(a));
    let release = idx(&RenderCall::ReleaseOffsets(a));
    let shift = idx(&RenderCall::ApplyOffsets(b, policy.offsets_for(0)));
    let promote = idx(&RenderCall::SetInteractive(b, true));
    let layout = idx(&RenderCall::LayoutNow);
    let backfill = calls
        .iter()
        .position(|c| matches!(c, RenderCall::Attach(_)))
        .unwrap();
    assert!(detach < release && release < shift && shift < promote);
    assert!(promote < layout && layout < backfill);

    assert!(!stack.renderer().is_attached(a));
    assert_eq!(stack.renderer().offsets_of(a), None);
    assert!(stack.renderer().is_interactive(b));
}

#[test]
fn dismissal_is_reported_while_card_is_still_on_top() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    stack.like_top_card(false);
    stack.like_top_card(true);
    finish_all(&mut stack);
    assert_eq!(stack.delegate().dismissed_positions, vec![0, 0]);
    assert_eq!(stack.delegate().requested, vec![0, 1, 2, 2, 2]);
}

// ============================================================================
// Animated dismissal and the animation-lock
// ============================================================================

#[test]
fn animated_like_flies_off_then_evicts() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    let a = top_surface(&stack);
    let frame = stack.renderer().frame(a);

    stack.like_top_card(true);
    assert_eq!(stack.phase(), StackPhase::Animating);
    assert!(stack.delegate().dismissed.is_empty());

    let anim = *stack.renderer().pending().next().unwrap();
    match anim.motion {
        Motion::Pose { card, to } => {
            assert_eq!(card.surface, a);
            assert!((to.center.x - (frame.center().x + 1.33 * frame.width())).abs() < 1e-9);
            assert_eq!(to.center.y, frame.center().y);
        }
        Motion::Layout => panic!("expected pose motion"),
    }

    assert!(finish_next(&mut stack));
    assert_eq!(stack.delegate().dismissed.len(), 1);
    assert_eq!(window_labels(&stack), vec!["B", "C", "D"]);
    assert!(!stack.is_animating());

    // The layout pass started by the eviction does not hold the lock.
    let layout = stack.renderer().pending().next().copied().unwrap();
    assert_eq!(layout.motion, Motion::Layout);
    assert_eq!(layout.duration, stack.config().layout_duration());
    stack.dislike_top_card(true);
    assert!(stack.is_animating());
}

#[test]
fn double_like_before_completion_dismisses_once() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    stack.like_top_card(true);
    stack.like_top_card(true);
    stack.dislike_top_card(false);
    finish_all(&mut stack);

    assert_eq!(
        stack.delegate().dismissed,
        vec![("A".to_string(), StackResult::Like)]
    );
    assert_eq!(window_labels(&stack), vec!["B", "C", "D"]);
}

#[test]
fn drag_begin_during_animation_is_ignored() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    let a = top_surface(&stack);
    stack.like_top_card(true);
    let before = stack.renderer().calls.len();

    stack.handle_gesture(GestureEvent::new(a, GesturePhase::Began(Point::new(1.0, 1.0))));
    stack.handle_gesture(GestureEvent::new(a, GesturePhase::Moved(Point::new(90.0, 1.0))));

    assert_eq!(stack.renderer().calls.len(), before);
    assert_eq!(stack.phase(), StackPhase::Animating);
}

#[test]
fn stale_completion_after_reload_is_ignored() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    stack.like_top_card(true);
    stack.reload_cards();
    assert_eq!(stack.phase(), StackPhase::Idle);

    finish_all(&mut stack);
    assert!(stack.delegate().dismissed.is_empty());
    assert_eq!(window_labels(&stack), vec!["A", "B", "C"]);
}

// ============================================================================
// Gestures
// ============================================================================

#[test]
fn drag_moves_card_and_fades_in_like_indicator() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    let a = top_surface(&stack);
    let frame = stack.renderer().frame(a);
    let start = frame.center();
    let card = stack.top_card().unwrap().handles();

    send(&mut stack, GesturePhase::Began(start));
    assert_eq!(stack.phase(), StackPhase::Dragging);
    send(&mut stack, GesturePhase::Moved(start.offset_by(0.2 * frame.width(), 12.0)));

    let pose = stack.renderer().pose_of(a).unwrap();
    assert_eq!(pose.center, start.offset_by(0.2 * frame.width(), 12.0));
    assert!((pose.rotation - 0.2 * 0.35).abs() < 1e-9);
    assert!((stack.renderer().alpha_of(card.like_surface.unwrap()) - 0.5).abs() < 1e-9);
    assert_eq!(stack.renderer().alpha_of(card.dislike_surface.unwrap()), 0.0);

    send(&mut stack, GesturePhase::Moved(start.offset_by(-frame.width(), 0.0)));
    assert_eq!(stack.renderer().alpha_of(card.like_surface.unwrap()), 0.0);
    assert_eq!(stack.renderer().alpha_of(card.dislike_surface.unwrap()), 1.0);
}

#[test]
fn threshold_boundary_decides_between_cancel_and_like() {
    let eps = 1e-6;
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    let width = stack.renderer().frame(top_surface(&stack)).width();

    swipe(&mut stack, 0.25 * width - eps);
    finish_all(&mut stack);
    assert!(stack.delegate().dismissed.is_empty());
    assert_eq!(window_labels(&stack), vec!["A", "B", "C"]);

    swipe(&mut stack, 0.25 * width + eps);
    finish_all(&mut stack);
    assert_eq!(
        stack.delegate().dismissed,
        vec![("A".to_string(), StackResult::Like)]
    );
}

#[test]
fn leftward_swipe_dislikes() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    swipe(&mut stack, -200.0);
    finish_all(&mut stack);
    assert_eq!(
        stack.delegate().dismissed,
        vec![("A".to_string(), StackResult::Dislike)]
    );
}

#[test]
fn snap_back_returns_to_original_center() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    let a = top_surface(&stack);
    let origin = stack.renderer().frame(a).center();

    send(&mut stack, GesturePhase::Began(origin));
    send(&mut stack, GesturePhase::Moved(origin.offset_by(40.0, 30.0)));
    send(&mut stack, GesturePhase::Ended(origin.offset_by(40.0, 30.0)));

    assert_eq!(stack.phase(), StackPhase::Animating);
    let anim = *stack.renderer().pending().next().unwrap();
    assert_eq!(anim.duration, stack.config().snap_back_duration());
    match anim.motion {
        Motion::Pose { to, .. } => {
            assert_eq!(to.center, origin);
            assert_eq!((to.rotation, to.like_alpha, to.dislike_alpha), (0.0, 0.0, 0.0));
        }
        Motion::Layout => panic!("expected pose motion"),
    }
    finish_all(&mut stack);
    assert_eq!(stack.phase(), StackPhase::Idle);
}

#[test]
fn cancelled_and_failed_always_snap_back() {
    for terminal in [GesturePhase::Cancelled, GesturePhase::Failed] {
        let mut stack = loaded_stack(FIVE, StackConfig::default());
        let origin = stack.renderer().frame(top_surface(&stack)).center();
        send(&mut stack, GesturePhase::Began(origin));
        send(&mut stack, GesturePhase::Moved(origin.offset_by(500.0, 0.0)));
        send(&mut stack, terminal);
        finish_all(&mut stack);

        assert!(stack.delegate().dismissed.is_empty());
        assert_eq!(
            stack.renderer().pose_of(top_surface(&stack)).unwrap().center,
            origin
        );
    }
}

#[test]
fn programmatic_like_keeps_vertical_drag_offset() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    let a = top_surface(&stack);
    let frame = stack.renderer().frame(a);
    let origin = frame.center();

    send(&mut stack, GesturePhase::Began(origin));
    send(&mut stack, GesturePhase::Moved(origin.offset_by(20.0, 40.0)));
    stack.like_top_card(true);

    let anim = *stack.renderer().pending().next().unwrap();
    let Motion::Pose { to, .. } = anim.motion else {
        panic!("expected pose motion");
    };
    assert!((to.center.x - (origin.x + 1.33 * frame.width())).abs() < 1e-9);
    assert_eq!(to.center.y, origin.y + 40.0);

    finish_all(&mut stack);
    assert_eq!(stack.delegate().dismissed.len(), 1);
}

#[test]
fn events_for_other_cards_are_ignored() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    let b = stack.card(1).unwrap().surface();
    stack.renderer_mut().calls.clear();

    stack.handle_gesture(GestureEvent::new(b, GesturePhase::Began(Point::ZERO)));
    stack.handle_gesture(GestureEvent::new(b, GesturePhase::Moved(Point::new(300.0, 0.0))));
    stack.handle_gesture(GestureEvent::new(b, GesturePhase::Ended(Point::new(300.0, 0.0))));
    stack.handle_gesture(GestureEvent::new(b, GesturePhase::Tapped(Point::ZERO)));

    assert_eq!(stack.phase(), StackPhase::Idle);
    assert!(stack.renderer().calls.is_empty());
    assert!(stack.delegate().tapped.is_empty());
}

#[test]
fn move_without_begin_is_ignored() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    stack.renderer_mut().calls.clear();
    send(&mut stack, GesturePhase::Moved(Point::new(300.0, 0.0)));
    send(&mut stack, GesturePhase::Ended(Point::new(300.0, 0.0)));
    send(&mut stack, GesturePhase::Cancelled);
    assert!(stack.renderer().calls.is_empty());
    assert_eq!(stack.phase(), StackPhase::Idle);
}

#[test]
fn taps_only_reach_delegate_when_idle() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    let origin = stack.renderer().frame(top_surface(&stack)).center();

    send(&mut stack, GesturePhase::Began(origin));
    send(&mut stack, GesturePhase::Moved(origin.offset_by(20.0, 0.0)));
    send(&mut stack, GesturePhase::Tapped(origin));
    assert_eq!(stack.phase(), StackPhase::Dragging);
    assert!(stack.delegate().tapped.is_empty());

    send(&mut stack, GesturePhase::Cancelled);
    assert_eq!(stack.phase(), StackPhase::Animating);
    send(&mut stack, GesturePhase::Tapped(origin));
    assert!(stack.delegate().tapped.is_empty());

    finish_all(&mut stack);
    send(&mut stack, GesturePhase::Tapped(origin));
    assert_eq!(stack.delegate().tapped, vec!["A".to_string()]);
}

#[test]
fn reload_tears_down_active_drag() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    let origin = stack.renderer().frame(top_surface(&stack)).center();
    send(&mut stack, GesturePhase::Began(origin));
    send(&mut stack, GesturePhase::Moved(origin.offset_by(60.0, 0.0)));

    stack.reload_cards();
    assert_eq!(stack.phase(), StackPhase::Idle);

    // The old session is gone, so its end event does nothing.
    send(&mut stack, GesturePhase::Ended(origin.offset_by(200.0, 0.0)));
    finish_all(&mut stack);
    assert!(stack.delegate().dismissed.is_empty());
}

#[test]
fn recognizer_taps_reach_delegate() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    let a = top_surface(&stack);
    let center = stack.renderer().frame(a).center();
    let mut recognizer = PointerRecognizer::default();

    for sample in [
        PointerSample::new(PointerKind::Down, center),
        PointerSample::new(PointerKind::Up, center.offset_by(1.0, 0.0)),
    ] {
        for phase in recognizer.process(sample) {
            stack.handle_gesture(GestureEvent::new(a, phase));
        }
    }

    assert_eq!(stack.delegate().tapped, vec!["A".to_string()]);
    assert_eq!(window_labels(&stack), vec!["A", "B", "C"]);
}

#[test]
fn recognizer_drag_dismisses() {
    let mut stack = loaded_stack(FIVE, StackConfig::default());
    let a = top_surface(&stack);
    let center = stack.renderer().frame(a).center();
    let mut recognizer = PointerRecognizer::default();

    for sample in [
        PointerSample::new(PointerKind::Down, center),
        PointerSample::new(PointerKind::Move, center.offset_by(-30.0, 0.0)),
        PointerSample::new(PointerKind::Move, center.offset_by(-150.0, 5.0)),
        PointerSample::new(PointerKind::Up, center.offset_by(-150.0, 5.0)),
    ] {
        for phase in recognizer.process(sample) {
            stack.handle_gesture(GestureEvent::new(a, phase));
        }
    }
    finish_all(&mut stack);

    assert_eq!(
        stack.delegate().dismissed,
        vec![("A".to_string(), StackResult::Dislike)]
    );
    assert!(stack.delegate().tapped.is_empty());
}
