use gloo_timers::callback::Interval;
use yew::prelude::*;

/// Refresh cadences used across the console's screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollInterval {
    Seconds10,
    Seconds30,
    Seconds60,
    Minutes5,
}

impl PollInterval {
    /// Cadence for dashboard screens.
    pub const DASHBOARD: PollInterval = PollInterval::Seconds30;
    /// Cadence for list screens.
    pub const LIST: PollInterval = PollInterval::Seconds60;

    pub fn as_millis(self) -> u32 {
        match self {
            PollInterval::Seconds10 => 10_000,
            PollInterval::Seconds30 => 30_000,
            PollInterval::Seconds60 => 60_000,
            PollInterval::Minutes5 => 300_000,
        }
    }
}

/// Re-invoke `on_tick` at a fixed cadence while the screen is mounted.
///
/// The timer starts on mount and is dropped by the effect cleanup on
/// unmount or cadence change; `None` disables polling. Ticks do not wait
/// for a still-pending refresh: both calls proceed and the one resolving
/// last wins.
#[hook]
pub fn use_polling(interval: Option<PollInterval>, on_tick: Callback<()>) {
    use_effect_with(interval, move |interval| {
        let handle = interval.map(|interval| {
            Interval::new(interval.as_millis(), move || {
                tracing::debug!("poll tick after {}ms", interval.as_millis());
                on_tick.emit(());
            })
        });
        move || drop(handle)
    });
}
