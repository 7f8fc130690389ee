#![no_main]

use arbitrary::Arbitrary;
use cardstack_core::geometry::Point;
use cardstack_core::gesture::{GestureEvent, GesturePhase};
use cardstack_harness::{finish_next, loaded_stack, window_positions};
use cardstack_runtime::config::StackConfig;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Like(bool),
    Dislike(bool),
    Reload,
    Continue,
    Finish,
    Began(i16, i16),
    Moved(i16, i16),
    Ended(i16, i16),
    Cancelled,
    Tapped,
}

#[derive(Debug, Arbitrary)]
struct Input {
    deck_len: u8,
    max_cards: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let deck_len = usize::from(input.deck_len % 16);
    let config = StackConfig {
        max_simultaneous_cards: usize::from(input.max_cards % 6).max(1),
        ..StackConfig::default()
    };
    let labels: Vec<String> = (0..deck_len).map(|i| i.to_string()).collect();
    let mut stack = loaded_stack(labels, config);
    let point = |x: i16, y: i16| Point::new(f64::from(x), f64::from(y));

    for op in input.ops.iter().take(256) {
        let target = stack.top_card().map(|c| c.surface());
        let phase = match *op {
            Op::Like(animated) => {
                stack.like_top_card(animated);
                None
            }
            Op::Dislike(animated) => {
                stack.dislike_top_card(animated);
                None
            }
            Op::Reload => {
                stack.reload_cards();
                None
            }
            Op::Continue => {
                stack.continue_loading_cards();
                None
            }
            Op::Finish => {
                finish_next(&mut stack);
                None
            }
            Op::Began(x, y) => Some(GesturePhase::Began(point(x, y))),
            Op::Moved(x, y) => Some(GesturePhase::Moved(point(x, y))),
            Op::Ended(x, y) => Some(GesturePhase::Ended(point(x, y))),
            Op::Cancelled => Some(GesturePhase::Cancelled),
            Op::Tapped => Some(GesturePhase::Tapped(Point::ZERO)),
        };
        if let (Some(target), Some(phase)) = (target, phase) {
            stack.handle_gesture(GestureEvent::new(target, phase));
        }

        let n = stack.len();
        assert_eq!(window_positions(&stack), (0..n).collect::<Vec<_>>());
        assert!(n <= stack.config().max_simultaneous_cards);
        assert_eq!(
            stack.cards().filter(|c| c.is_interactive()).count(),
            usize::from(n > 0)
        );
        assert_eq!(
            stack.delegate().dismissed.len() + stack.delegate().remaining(),
            deck_len
        );
    }
});
