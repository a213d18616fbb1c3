use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Receiver;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// Physical position of a switch in the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyPos {
    pub row: u8,
    pub col: u8,
}

impl KeyPos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// Raw switch levels read in one scan cycle, `true` means the circuit is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMatrix<const ROW: usize, const COL: usize> {
    levels: [[bool; COL]; ROW],
}

impl<const ROW: usize, const COL: usize> Default for RawMatrix<ROW, COL> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ROW: usize, const COL: usize> RawMatrix<ROW, COL> {
    pub const fn new() -> Self {
        Self {
            levels: [[false; COL]; ROW],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.levels[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, level: bool) {
        self.levels[row][col] = level;
    }

    pub fn clear(&mut self) {
        self.levels = [[false; COL]; ROW];
    }
}

/// The debounced state of every key.
///
/// Only the debouncer writes it. It's kept between scan cycles and compared with the previous
/// copy to detect key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixState<const ROW: usize, const COL: usize> {
    pressed: [[bool; COL]; ROW],
}

impl<const ROW: usize, const COL: usize> Default for MatrixState<ROW, COL> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ROW: usize, const COL: usize> MatrixState<ROW, COL> {
    pub const fn new() -> Self {
        Self {
            pressed: [[false; COL]; ROW],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.pressed[row][col]
    }

    pub fn is_pressed(&self, pos: KeyPos) -> bool {
        self.pressed[pos.row as usize][pos.col as usize]
    }

    pub fn toggle(&mut self, row: usize, col: usize) {
        self.pressed[row][col] = !self.pressed[row][col];
    }

    /// Number of keys currently pressed
    pub fn pressed_count(&self) -> usize {
        self.pressed.iter().flatten().filter(|p| **p).count()
    }
}

/// Reads the raw level of every switch once.
///
/// A scanner only samples hardware, it never touches layers or actions.
pub trait MatrixScanner<const ROW: usize, const COL: usize> {
    /// Overwrite `raw` with the current level of every position.
    fn scan(&mut self, raw: &mut RawMatrix<ROW, COL>);
}

/// Matrix is the physical pcb layout of the keyboard matrix.
///
/// Without the `col2row` feature, output pins drive rows and input pins read columns.
/// With `col2row` it's the other way around.
pub struct Matrix<In: InputPin, Out: OutputPin, D: DelayNs, const INPUT_PIN_NUM: usize, const OUTPUT_PIN_NUM: usize> {
    /// Input pins of the pcb matrix
    input_pins: [In; INPUT_PIN_NUM],
    /// Output pins of the pcb matrix
    output_pins: [Out; OUTPUT_PIN_NUM],
    /// Delay used to let a driven line settle before reading
    delay: D,
}

impl<In: InputPin, Out: OutputPin, D: DelayNs, const INPUT_PIN_NUM: usize, const OUTPUT_PIN_NUM: usize>
    Matrix<In, Out, D, INPUT_PIN_NUM, OUTPUT_PIN_NUM>
{
    /// Create a matrix from input and output pins.
    pub fn new(input_pins: [In; INPUT_PIN_NUM], output_pins: [Out; OUTPUT_PIN_NUM], delay: D) -> Self {
        Matrix {
            input_pins,
            output_pins,
            delay,
        }
    }

    /// Drive each output pin in turn and report the level of every input pin.
    ///
    /// A failed pin read is reported as released.
    fn strobe(&mut self, mut report: impl FnMut(usize, usize, bool)) {
        for (out_idx, out_pin) in self.output_pins.iter_mut().enumerate() {
            // Pull up output pin, wait 1us ensuring the change comes into effect
            out_pin.set_high().ok();
            self.delay.delay_us(1);
            for (in_idx, in_pin) in self.input_pins.iter_mut().enumerate() {
                report(out_idx, in_idx, in_pin.is_high().ok().unwrap_or_default());
            }
            // Pull it back to low
            out_pin.set_low().ok();
        }
    }
}

#[cfg(not(feature = "col2row"))]
impl<In: InputPin, Out: OutputPin, D: DelayNs, const INPUT_PIN_NUM: usize, const OUTPUT_PIN_NUM: usize>
    MatrixScanner<OUTPUT_PIN_NUM, INPUT_PIN_NUM> for Matrix<In, Out, D, INPUT_PIN_NUM, OUTPUT_PIN_NUM>
{
    fn scan(&mut self, raw: &mut RawMatrix<OUTPUT_PIN_NUM, INPUT_PIN_NUM>) {
        self.strobe(|out_idx, in_idx, level| raw.set(out_idx, in_idx, level));
    }
}

#[cfg(feature = "col2row")]
impl<In: InputPin, Out: OutputPin, D: DelayNs, const INPUT_PIN_NUM: usize, const OUTPUT_PIN_NUM: usize>
    MatrixScanner<INPUT_PIN_NUM, OUTPUT_PIN_NUM> for Matrix<In, Out, D, INPUT_PIN_NUM, OUTPUT_PIN_NUM>
{
    fn scan(&mut self, raw: &mut RawMatrix<INPUT_PIN_NUM, OUTPUT_PIN_NUM>) {
        self.strobe(|out_idx, in_idx, level| raw.set(in_idx, out_idx, level));
    }
}

/// A raw level change of a single switch, reported from outside the scan loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawKeyChange {
    pub pos: KeyPos,
    pub pressed: bool,
}

impl RawKeyChange {
    pub const fn new(row: u8, col: u8, pressed: bool) -> Self {
        Self {
            pos: KeyPos::new(row, col),
            pressed,
        }
    }
}

/// A matrix fed by a channel instead of GPIO.
///
/// An interrupt handler, a split peripheral or a test pushes [`RawKeyChange`]s into the
/// channel. Each scan drains the channel in order and applies the changes to the held levels,
/// so a change is seen either in full by the current cycle or by the next one.
pub struct QueuedMatrix<'q, M: RawMutex, const ROW: usize, const COL: usize, const N: usize> {
    receiver: Receiver<'q, M, RawKeyChange, N>,
    levels: RawMatrix<ROW, COL>,
}

impl<'q, M: RawMutex, const ROW: usize, const COL: usize, const N: usize> QueuedMatrix<'q, M, ROW, COL, N> {
    pub fn new(receiver: Receiver<'q, M, RawKeyChange, N>) -> Self {
        Self {
            receiver,
            levels: RawMatrix::new(),
        }
    }
}

impl<'q, M: RawMutex, const ROW: usize, const COL: usize, const N: usize> MatrixScanner<ROW, COL>
    for QueuedMatrix<'q, M, ROW, COL, N>
{
    fn scan(&mut self, raw: &mut RawMatrix<ROW, COL>) {
        while let Ok(change) = self.receiver.try_receive() {
            let (row, col) = (change.pos.row as usize, change.pos.col as usize);
            if row < ROW && col < COL {
                self.levels.set(row, col, change.pressed);
            } else {
                warn!("Dropping raw change outside of the matrix: {:?}", change.pos);
            }
        }
        *raw = self.levels;
    }
}
