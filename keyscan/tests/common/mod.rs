#![allow(dead_code)]

pub mod test_macro;

use keyscan::config::KeyboardConfig;
use keyscan::debounce::DebouncerTrait;
use keyscan::event::OutputEvent;
use keyscan::keyboard::Keyboard;
use keyscan::matrix::RawMatrix;
use keyscan::types::action::KeyAction;
use keyscan::{a, custom, k, layer, lt, media, mo, tg};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Cycles run after the last key change, enough for it to pass the default debounce window
pub const SETTLE_CYCLES: u32 = 20;

#[derive(Debug, Clone)]
pub struct TestKeyPress {
    pub row: u8,
    pub col: u8,
    pub pressed: bool,
    pub delay: u32, // Scan cycles before this key change
}

/// Drive a keyboard with raw matrix snapshots built from a key sequence, collect its output.
pub fn run_key_sequence<const ROW: usize, const COL: usize, const NUM_LAYER: usize, D: DebouncerTrait<ROW, COL>>(
    keyboard: &mut Keyboard<'_, ROW, COL, NUM_LAYER, D>,
    key_sequence: &[TestKeyPress],
    settle_cycles: u32,
) -> Vec<OutputEvent> {
    let mut raw: RawMatrix<ROW, COL> = RawMatrix::new();
    let mut events = Vec::new();

    for key in key_sequence {
        run_cycles(keyboard, &raw, key.delay, &mut events);
        raw.set(key.row as usize, key.col as usize, key.pressed);
    }
    run_cycles(keyboard, &raw, settle_cycles, &mut events);

    events
}

/// Run `cycles` scan cycles on the same raw snapshot
pub fn run_cycles<const ROW: usize, const COL: usize, const NUM_LAYER: usize, D: DebouncerTrait<ROW, COL>>(
    keyboard: &mut Keyboard<'_, ROW, COL, NUM_LAYER, D>,
    raw: &RawMatrix<ROW, COL>,
    cycles: u32,
    events: &mut Vec<OutputEvent>,
) {
    let mut sink: heapless::Vec<OutputEvent, 32> = heapless::Vec::new();
    for _ in 0..cycles {
        keyboard.process_matrix(raw, &mut sink);
        events.extend_from_slice(&sink);
        sink.clear();
    }
}

pub fn create_keyboard<const ROW: usize, const COL: usize, const NUM_LAYER: usize>(
    keymap: &'static [[[KeyAction; COL]; ROW]; NUM_LAYER],
    config: KeyboardConfig,
) -> Keyboard<'static, ROW, COL, NUM_LAYER> {
    Keyboard::new(keymap, &config).unwrap()
}

// KEYMAP
// Layer 0: (1,1) = A, (4,0) = LT(3, Esc), (5,0) = MO(2), (5,1) = TG(2), (0,0) = B
// Layer 2: (1,1) passthrough, (0,0) = C
// Layer 3: (1,1) = Kc1, (0,0) = passthrough
#[rustfmt::skip]
pub static SCENARIO_KEYMAP: [[[KeyAction; 2]; 6]; 4] = [
    layer!([
        [k!(B), a!(NoOp)],
        [a!(NoOp), k!(A)],
        [a!(NoOp), a!(NoOp)],
        [a!(NoOp), a!(NoOp)],
        [lt!(3, Escape), a!(NoOp)],
        [mo!(2), tg!(2)]
    ]),
    layer!([
        [a!(Passthrough), a!(Passthrough)],
        [a!(Passthrough), a!(Passthrough)],
        [a!(Passthrough), a!(Passthrough)],
        [a!(Passthrough), a!(Passthrough)],
        [a!(Passthrough), a!(Passthrough)],
        [a!(Passthrough), a!(Passthrough)]
    ]),
    layer!([
        [k!(C), a!(Passthrough)],
        [a!(Passthrough), a!(Passthrough)],
        [a!(Passthrough), a!(Passthrough)],
        [a!(Passthrough), a!(Passthrough)],
        [a!(Passthrough), a!(Passthrough)],
        [a!(Passthrough), a!(Passthrough)]
    ]),
    layer!([
        [a!(Passthrough), a!(Passthrough)],
        [a!(Passthrough), k!(Kc1)],
        [a!(Passthrough), a!(Passthrough)],
        [a!(Passthrough), a!(Passthrough)],
        [a!(Passthrough), a!(Passthrough)],
        [a!(Passthrough), a!(Passthrough)]
    ]),
];

pub fn create_scenario_keyboard() -> Keyboard<'static, 6, 2, 4> {
    create_keyboard(&SCENARIO_KEYMAP, KeyboardConfig::default())
}

// Custom action ids of the TKL keymap, handled by the host firmware
pub const APPLE_FN: u8 = 0;
pub const BL_DEC: u8 = 1;
pub const BL_INC: u8 = 2;
pub const BL_TOGG: u8 = 3;
pub const RGB_TOG: u8 = 4;
pub const RGB_VAI: u8 = 5;
pub const RGB_VAD: u8 = 6;
pub const RGB_MOD: u8 = 7;
pub const RGB_HUI: u8 = 8;
pub const RGB_HUD: u8 = 9;
pub const RGB_SAI: u8 = 10;
pub const RGB_SAD: u8 = 11;
pub const MU_MOD: u8 = 12;
pub const AU_TOG: u8 = 13;
pub const RESET: u8 = 14;
pub const CLICK_FREQ_HIGHER: u8 = 21;
pub const CLICK_FREQ_LOWER: u8 = 22;
pub const CLICK_TIME_LONGER: u8 = 23;
pub const CLICK_TIME_SHORTER: u8 = 24;
pub const CLICK_TOGGLE: u8 = 25;

pub const TKL_MAC: u8 = 0;
pub const TKL_WIN: u8 = 1;
pub const TKL_FUNC: u8 = 2;
pub const TKL_SETTINGS: u8 = 3;

/// An 87-key TKL keymap: macOS base layer, toggled Windows layer, Esc/Fn layer and a settings
/// layer toggled from the Fn layer.
#[rustfmt::skip]
pub static TKL_KEYMAP: [[[KeyAction; 17]; 6]; 4] = [
    // macOS
    layer!([
        [k!(CapsLock), k!(F1), k!(F2), k!(F3), k!(F4), k!(F5), k!(F6), k!(F7), k!(F8), k!(F9), k!(F10), k!(F11), k!(F12), k!(PrintScreen), k!(ScrollLock), k!(Pause), a!(NoOp)],
        [k!(Grave), k!(Kc1), k!(Kc2), k!(Kc3), k!(Kc4), k!(Kc5), k!(Kc6), k!(Kc7), k!(Kc8), k!(Kc9), k!(Kc0), k!(Minus), k!(Equal), k!(Backspace), custom!(0), k!(Home), k!(PageUp)],
        [k!(Tab), k!(Q), k!(W), k!(E), k!(R), k!(T), k!(Y), k!(U), k!(I), k!(O), k!(P), k!(LeftBracket), k!(RightBracket), k!(Backslash), k!(Delete), k!(End), k!(PageDown)],
        [lt!(2, Escape), k!(A), k!(S), k!(D), k!(F), k!(G), k!(H), k!(J), k!(K), k!(L), k!(Semicolon), k!(Quote), k!(Enter), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp)],
        [k!(LShift), k!(Z), k!(X), k!(C), k!(V), k!(B), k!(N), k!(M), k!(Comma), k!(Dot), k!(Slash), k!(RShift), k!(Up), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp)],
        [k!(LCtrl), k!(LAlt), k!(LGui), k!(Space), a!(NoOp), k!(RGui), k!(RAlt), k!(RCtrl), k!(Left), k!(Down), k!(Right), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp)]
    ]),
    // Windows
    layer!([
        [k!(CapsLock), k!(F1), k!(F2), k!(F3), k!(F4), k!(F5), k!(F6), k!(F7), k!(F8), k!(F9), k!(F10), k!(F11), k!(F12), k!(PrintScreen), k!(ScrollLock), k!(Pause), a!(NoOp)],
        [k!(Grave), k!(Kc1), k!(Kc2), k!(Kc3), k!(Kc4), k!(Kc5), k!(Kc6), k!(Kc7), k!(Kc8), k!(Kc9), k!(Kc0), k!(Minus), k!(Equal), k!(Backspace), k!(Insert), k!(Home), k!(PageUp)],
        [k!(Tab), k!(Q), k!(W), k!(E), k!(R), k!(T), k!(Y), k!(U), k!(I), k!(O), k!(P), k!(LeftBracket), k!(RightBracket), k!(Backslash), k!(Delete), k!(End), k!(PageDown)],
        [lt!(2, Escape), k!(A), k!(S), k!(D), k!(F), k!(G), k!(H), k!(J), k!(K), k!(L), k!(Semicolon), k!(Quote), k!(Enter), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp)],
        [k!(LShift), k!(Z), k!(X), k!(C), k!(V), k!(B), k!(N), k!(M), k!(Comma), k!(Dot), k!(Slash), k!(RShift), k!(Up), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp)],
        [k!(LCtrl), k!(LGui), k!(LAlt), k!(Space), a!(NoOp), k!(RAlt), k!(RGui), k!(RCtrl), k!(Left), k!(Down), k!(Right), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp)]
    ]),
    // Function
    layer!([
        [k!(Escape), a!(Passthrough), a!(Passthrough), a!(Passthrough), a!(Passthrough), a!(Passthrough), a!(Passthrough), a!(Passthrough), a!(Passthrough), a!(Passthrough), a!(Passthrough), a!(Passthrough), a!(Passthrough), a!(Passthrough), a!(Passthrough), a!(Passthrough), a!(NoOp)],
        [a!(Passthrough), k!(F1), k!(F2), k!(F3), k!(F4), k!(F5), k!(F6), k!(F7), k!(F8), k!(F9), k!(F10), k!(F11), k!(F12), k!(Delete), k!(Insert), a!(Passthrough), a!(Passthrough)],
        [a!(NoOp), a!(NoOp), k!(PageUp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), k!(Up), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(Passthrough), a!(Passthrough), a!(Passthrough)],
        [a!(NoOp), k!(Home), k!(PageDown), k!(End), a!(NoOp), a!(NoOp), a!(NoOp), k!(Left), k!(Down), k!(Right), a!(NoOp), a!(NoOp), tg!(1), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp)],
        [a!(Passthrough), a!(NoOp), k!(Delete), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), media!(Mute), media!(VolumeDecrement), media!(VolumeIncrement), a!(NoOp), tg!(3), a!(Passthrough), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp)],
        [a!(Passthrough), a!(Passthrough), a!(Passthrough), k!(PageDown), a!(Passthrough), a!(Passthrough), a!(Passthrough), a!(Passthrough), a!(Passthrough), a!(Passthrough), a!(Passthrough), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp)]
    ]),
    // Settings
    layer!([
        [k!(Escape), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp)],
        [a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), custom!(1), custom!(2), custom!(3), custom!(4), custom!(5), a!(NoOp)],
        [custom!(12), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), custom!(22), custom!(7), custom!(6), a!(NoOp)],
        [custom!(13), custom!(21), custom!(23), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), custom!(14), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp)],
        [custom!(25), custom!(22), custom!(24), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), tg!(3), custom!(8), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp)],
        [a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), custom!(11), custom!(9), custom!(10), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp), a!(NoOp)]
    ]),
];

pub fn create_tkl_keyboard() -> Keyboard<'static, 6, 17, 4> {
    create_keyboard(&TKL_KEYMAP, KeyboardConfig::default())
}
