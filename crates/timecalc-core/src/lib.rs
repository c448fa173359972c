//! # timecalc Core Library
//!
//! Interval scheduling and cascading countdown engine. A user enters an
//! ordered list of durations; the engine projects when the whole list will
//! be done, warns when that runs past a cutoff time of day, and can count
//! the first interval down live, moving on to the next one on expiry.
//!
//! ## Architecture
//!
//! - **Interval parsing**: `MM` / `HMM` text to minutes
//! - **Cutoffs**: latched, per-threshold violation detection
//! - **Schedule engine**: owns the interval list and recomputes on demand
//! - **Countdown**: a wall-clock-based state machine; the caller invokes
//!   `tick()` periodically, usually from a [`TokioTicker`]
//! - **Session**: the facade a UI layer drives and subscribes to
//!
//! ## Key Components
//!
//! - [`ScheduleEngine`]: Interval list ownership and recomputation
//! - [`CountdownController`]: Countdown state machine
//! - [`Session`]: UI-facing event handlers and observers
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod cutoff;
pub mod error;
pub mod events;
pub mod format;
pub mod interval;
pub mod schedule;
pub mod session;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use cutoff::{CutoffEvaluator, CutoffThreshold, CutoffViolation};
pub use error::{ConfigError, CountdownError, IntervalParseError, ScheduleError};
pub use events::{Event, EventSink};
pub use interval::{parse_interval, Interval};
pub use schedule::{compute_schedule, ScheduleEngine, ScheduleState};
pub use session::Session;
pub use storage::Config;
pub use timer::{
    CountdownController, CountdownPhase, CountdownState, ManualTicks, Tick, TickOutcome,
    TickScheduler, TokioTicker,
};
