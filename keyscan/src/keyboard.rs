use embassy_time::{Duration, Ticker};
use heapless::Deque;

use crate::config::KeyboardConfig;
use crate::debounce::{DebouncerTrait, DefaultDebouncer};
use crate::dispatcher::Dispatcher;
use crate::error::ConfigError;
use crate::event::{EventDetector, EventSink, KeyEvent, OutputEvent};
use crate::keymap::KeyMap;
use crate::layer::LayerStack;
use crate::matrix::{MatrixScanner, MatrixState, RawMatrix};
use crate::types::action::KeyAction;

/// Maximum number of output events held back while the sink is full
pub const EVENT_BACKLOG_SIZE: usize = 32;

/// Routes events through the backlog while it isn't empty, so they reach the sink in order.
struct BackloggedSink<'s, S: EventSink> {
    sink: &'s mut S,
    backlog: &'s mut Deque<OutputEvent, EVENT_BACKLOG_SIZE>,
}

impl<'s, S: EventSink> BackloggedSink<'s, S> {
    fn new(sink: &'s mut S, backlog: &'s mut Deque<OutputEvent, EVENT_BACKLOG_SIZE>) -> Self {
        Self { sink, backlog }
    }
}

impl<S: EventSink> EventSink for BackloggedSink<'_, S> {
    fn try_emit(&mut self, event: OutputEvent) -> Result<(), OutputEvent> {
        if self.backlog.is_empty() && self.sink.try_emit(event).is_ok() {
            return Ok(());
        }
        self.backlog.push_back(event)
    }
}

/// The whole engine state.
///
/// Each call of [`Keyboard::process_matrix`] is one scan cycle: debounce the raw snapshot, fire
/// the expired timers, then resolve and dispatch every key event of the cycle in row-major order.
pub struct Keyboard<
    'a,
    const ROW: usize,
    const COL: usize,
    const NUM_LAYER: usize,
    D: DebouncerTrait<ROW, COL> = DefaultDebouncer<ROW, COL>,
> {
    keymap: KeyMap<'a, ROW, COL, NUM_LAYER>,

    debouncer: D,

    /// Debounced key state
    state: MatrixState<ROW, COL>,

    /// Active layers
    layers: LayerStack<NUM_LAYER>,

    /// Layer which resolved the press of each key, its release is resolved on the same layer
    layer_cache: [[u8; COL]; ROW],

    dispatcher: Dispatcher,

    /// Output events the sink couldn't take yet
    backlog: Deque<OutputEvent, EVENT_BACKLOG_SIZE>,

    /// Scratch buffer for [`Keyboard::poll`]
    raw: RawMatrix<ROW, COL>,

    /// Current scan cycle
    cycle: u32,

    scan_interval: Duration,
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> Keyboard<'a, ROW, COL, NUM_LAYER> {
    /// Create a keyboard with the default debouncer.
    pub fn new(
        layers: &'a [[[KeyAction; COL]; ROW]; NUM_LAYER],
        config: &KeyboardConfig,
    ) -> Result<Self, ConfigError> {
        Self::with_debouncer(layers, config, DefaultDebouncer::default())
    }
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize, D: DebouncerTrait<ROW, COL>>
    Keyboard<'a, ROW, COL, NUM_LAYER, D>
{
    /// Create a keyboard with a custom debouncer, its window is set from `config`.
    pub fn with_debouncer(
        layers: &'a [[[KeyAction; COL]; ROW]; NUM_LAYER],
        config: &KeyboardConfig,
        mut debouncer: D,
    ) -> Result<Self, ConfigError> {
        let keymap = KeyMap::new(layers)?;
        let timing = config.timing()?;
        info!("Keyboard timing in scan cycles: {:?}", timing);
        debouncer.set_window(timing.debounce);

        Ok(Keyboard {
            keymap,
            debouncer,
            state: MatrixState::new(),
            layers: LayerStack::new(),
            layer_cache: [[0; COL]; ROW],
            dispatcher: Dispatcher::new(&timing, config.behavior.tap_hold.mode),
            backlog: Deque::new(),
            raw: RawMatrix::new(),
            cycle: 0,
            scan_interval: config.scan_interval,
        })
    }

    /// Run the scan loop forever, one cycle per scan interval.
    pub async fn run(&mut self, scanner: &mut impl MatrixScanner<ROW, COL>, sink: &mut impl EventSink) -> ! {
        info!("Start scanning matrix, interval: {}us", self.scan_interval.as_micros());
        let mut ticker = Ticker::every(self.scan_interval);
        loop {
            self.poll(scanner, sink);
            ticker.next().await;
        }
    }

    /// Scan the matrix once and process the result.
    pub fn poll(&mut self, scanner: &mut impl MatrixScanner<ROW, COL>, sink: &mut impl EventSink) {
        scanner.scan(&mut self.raw);
        let raw = self.raw;
        self.process_matrix(&raw, sink);
    }

    /// Run one scan cycle on a raw snapshot.
    ///
    /// Events that `sink` refused in earlier cycles are sent first. Events it refuses now are
    /// held back, up to [`EVENT_BACKLOG_SIZE`], and the rest are dropped.
    pub fn process_matrix(&mut self, raw: &RawMatrix<ROW, COL>, sink: &mut impl EventSink) {
        self.cycle = self.cycle.wrapping_add(1);
        self.flush_backlog(sink);

        let previous = self.state;
        self.debouncer.debounce(raw, &mut self.state);

        self.dispatcher
            .tick(self.cycle, &mut self.layers, &mut BackloggedSink::new(sink, &mut self.backlog));

        let current = self.state;
        for event in EventDetector::new(&previous, &current, self.cycle) {
            self.process_key_event(event, sink);
        }
    }

    /// Resolve and dispatch a single key event.
    ///
    /// [`Keyboard::process_matrix`] calls this for every detected event. Calling it directly
    /// bypasses the debouncer and the stable key state.
    pub fn process_key_event(&mut self, event: KeyEvent, sink: &mut impl EventSink) {
        let (row, col) = (event.pos.row as usize, event.pos.col as usize);
        if row >= ROW || col >= COL {
            warn!("Key event outside of the matrix: {:?}", event);
            return;
        }

        let mut sink = BackloggedSink::new(sink, &mut self.backlog);

        // Pending keys may change the layers before this event is resolved
        self.dispatcher.before_key_event(&event, &mut self.layers, &mut sink);

        let action = if event.pressed() {
            let (layer, action) = self.keymap.resolve_with_layer(event.pos, &self.layers);
            self.layer_cache[row][col] = layer;
            action
        } else {
            // Releasing a pressed key, use cached layer and restore the cache
            let layer = core::mem::take(&mut self.layer_cache[row][col]);
            self.keymap.action_at(event.pos, layer)
        };
        trace!("Key event {:?} resolved to {:?}", event, action);

        match action {
            KeyAction::NoOp | KeyAction::Passthrough => (),
            _ => self.dispatcher.dispatch(action, &event, &mut self.layers, &mut sink),
        }

        self.dispatcher.after_key_event(&event, &mut self.layers, &mut sink);
    }

    fn flush_backlog(&mut self, sink: &mut impl EventSink) {
        while let Some(event) = self.backlog.pop_front() {
            if let Err(event) = sink.try_emit(event) {
                // Can't fail, the slot was just freed
                self.backlog.push_front(event).ok();
                break;
            }
        }
    }

    /// Number of output events held back for the next cycle
    pub fn pending_events(&self) -> usize {
        self.backlog.len()
    }

    pub fn layers(&self) -> &LayerStack<NUM_LAYER> {
        &self.layers
    }

    pub fn matrix_state(&self) -> &MatrixState<ROW, COL> {
        &self.state
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn keymap(&self) -> &KeyMap<'a, ROW, COL, NUM_LAYER> {
        &self.keymap
    }

    /// Number of scan cycles processed so far, wrapping
    pub fn cycle(&self) -> u32 {
        self.cycle
    }
}
