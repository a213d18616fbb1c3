extern crate keyscan;

/// Run a key sequence on a keyboard and compare the output events.
///
/// Each sequence item is `[row, col, pressed, delay]`, `delay` is the number of scan cycles
/// (milliseconds with the default config) before the raw level changes.
#[macro_export]
macro_rules! key_sequence_test {
    (keyboard: $keyboard:expr, sequence: [$([$row:expr, $col:expr, $pressed:expr, $delay:expr]),* $(,)?], expected_events: [$($event:expr),* $(,)?]) => {{
        let mut keyboard = $keyboard;
        let sequence = $crate::key_sequence![$([$row, $col, $pressed, $delay]),*];
        let expected_events: ::std::vec::Vec<keyscan::event::OutputEvent> = vec![$($event),*];
        let events = $crate::common::run_key_sequence(&mut keyboard, &sequence, $crate::common::SETTLE_CYCLES);
        assert_eq!(expected_events, events, "expected left but actually right");
    }};
}

// a rust macro to create a key sequence to simulate key presses
#[macro_export]
macro_rules! key_sequence {
    ($([$row:expr, $col:expr, $pressed:expr, $delay:expr]),* $(,)?) => {
        vec![
            $(
                $crate::common::TestKeyPress {
                    row: $row,
                    col: $col,
                    pressed: $pressed,
                    delay: $delay,
                },
            )*
        ]
    };
}

/// `KeyDown` of a key in the HID keyboard page
#[macro_export]
macro_rules! down {
    ($key: ident) => {
        keyscan::event::OutputEvent::KeyDown(keyscan::types::keycode::KeyCode::Hid(
            keyscan::types::keycode::HidKeyCode::$key,
        ))
    };
}

/// `KeyUp` of a key in the HID keyboard page
#[macro_export]
macro_rules! up {
    ($key: ident) => {
        keyscan::event::OutputEvent::KeyUp(keyscan::types::keycode::KeyCode::Hid(
            keyscan::types::keycode::HidKeyCode::$key,
        ))
    };
}
