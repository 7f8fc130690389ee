#![no_main]

use cardstack_core::geometry::Point;
use cardstack_core::gesture::{GesturePhase, PointerKind, PointerRecognizer, PointerSample};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut recognizer = PointerRecognizer::default();
    let mut open_drag = false;

    for chunk in data.chunks_exact(3) {
        let kind = match chunk[0] % 4 {
            0 => PointerKind::Down,
            1 => PointerKind::Move,
            2 => PointerKind::Up,
            _ => PointerKind::Cancel,
        };
        let position = Point::new(f64::from(chunk[1]), f64::from(chunk[2]));

        for phase in recognizer.process(PointerSample::new(kind, position)) {
            match phase {
                GesturePhase::Began(_) => {
                    assert!(!open_drag, "Began while a drag is open");
                    open_drag = true;
                }
                GesturePhase::Moved(_) => assert!(open_drag, "Moved outside a drag"),
                GesturePhase::Ended(_) | GesturePhase::Cancelled => {
                    assert!(open_drag, "drag terminated twice");
                    open_drag = false;
                }
                GesturePhase::Tapped(_) => assert!(!open_drag, "tap during drag"),
                GesturePhase::Failed => unreachable!("recognizer never fails"),
            }
        }
        assert_eq!(recognizer.is_dragging(), open_drag);
    }
});
