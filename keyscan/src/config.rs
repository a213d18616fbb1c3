use embassy_time::Duration;

use crate::error::ConfigError;

/// The config struct for the keyboard engine.
///
/// All durations are converted once into scan cycles by [`KeyboardConfig::timing`], the engine
/// itself only counts cycles.
#[derive(Clone, Debug)]
pub struct KeyboardConfig {
    /// Time between two scan cycles
    pub scan_interval: Duration,
    pub debounce: DebounceConfig,
    pub behavior: BehaviorConfig,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_millis(1),
            debounce: DebounceConfig::default(),
            behavior: BehaviorConfig::default(),
        }
    }
}

/// Debounce config
#[derive(Clone, Copy, Debug)]
pub struct DebounceConfig {
    /// How long a raw level must be observed before it's accepted
    pub window: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(5),
        }
    }
}

/// Config for configurable action behavior
#[derive(Clone, Debug, Default)]
pub struct BehaviorConfig {
    pub tap_hold: TapHoldConfig,
    pub one_shot: OneShotConfig,
}

/// What a pending dual-role key does when another key is pressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapHoldMode {
    /// Resolve every pending dual-role key as hold before the interrupting key is processed
    #[default]
    HoldOnInterrupt,
    /// Other keys don't affect a pending dual-role key, only its release or the timeout decides
    IgnoreInterrupt,
}

/// Configuration for dual-role keys
#[derive(Clone, Copy, Debug)]
pub struct TapHoldConfig {
    pub hold_timeout: Duration,
    pub mode: TapHoldMode,
}

impl Default for TapHoldConfig {
    fn default() -> Self {
        Self {
            hold_timeout: Duration::from_millis(200),
            mode: TapHoldMode::default(),
        }
    }
}

/// Config for one shot layers
#[derive(Clone, Copy, Debug)]
pub struct OneShotConfig {
    pub timeout: Duration,
}

impl Default for OneShotConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(1),
        }
    }
}

/// Timing of the engine, in scan cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleTiming {
    pub debounce: u16,
    pub hold_timeout: u32,
    pub one_shot_timeout: u32,
}

impl KeyboardConfig {
    /// Validate the config and convert every duration to a number of scan cycles.
    ///
    /// Durations are rounded up, so any non-zero duration lasts at least one cycle.
    pub fn timing(&self) -> Result<CycleTiming, ConfigError> {
        let debounce = self.cycles(self.debounce.window, "debounce.window")?;
        Ok(CycleTiming {
            debounce: u16::try_from(debounce).map_err(|_| ConfigError::DurationTooLong {
                name: "debounce.window",
            })?,
            hold_timeout: self.cycles(self.behavior.tap_hold.hold_timeout, "tap_hold.hold_timeout")?,
            one_shot_timeout: self.cycles(self.behavior.one_shot.timeout, "one_shot.timeout")?,
        })
    }

    fn cycles(&self, duration: Duration, name: &'static str) -> Result<u32, ConfigError> {
        let interval = self.scan_interval.as_micros();
        if interval == 0 {
            return Err(ConfigError::ZeroScanInterval);
        }
        u32::try_from(duration.as_micros().div_ceil(interval)).map_err(|_| ConfigError::DurationTooLong { name })
    }
}
