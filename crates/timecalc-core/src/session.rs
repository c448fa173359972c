//! The facade a UI layer drives.
//!
//! A session wires the schedule engine, the countdown controller, a clock
//! and a tick scheduler together. Every `on_*` handler mutates state, then
//! recomputes the schedule and publishes the resulting [`Event`]s to all
//! subscribers. Everything runs on the caller's thread; the tick scheduler
//! only delivers `Tick`s back to the owner, who feeds them to `on_tick`.

use chrono::NaiveDateTime;

use crate::clock::Clock;
use crate::error::{CountdownError, ScheduleError};
use crate::events::{Event, EventSink};
use crate::format;
use crate::interval::Interval;
use crate::schedule::{ScheduleEngine, ScheduleState};
use crate::storage::Config;
use crate::timer::{
    CountdownController, CountdownLeg, CountdownState, Tick, TickOutcome, TickScheduler,
};

pub struct Session<C: Clock, T: TickScheduler> {
    engine: ScheduleEngine,
    countdown: CountdownController,
    clock: C,
    ticks: T,
    /// Last successfully computed state; kept through parse errors.
    last_state: Option<ScheduleState>,
    sinks: Vec<Box<dyn EventSink>>,
}

impl<C: Clock, T: TickScheduler> Session<C, T> {
    pub fn new(engine: ScheduleEngine, countdown: CountdownController, clock: C, ticks: T) -> Self {
        Self {
            engine,
            countdown,
            clock,
            ticks,
            last_state: None,
            sinks: Vec::new(),
        }
    }

    /// Session using the configured cutoffs and cascade policy.
    pub fn from_config(config: &Config, clock: C, ticks: T) -> Self {
        Self::new(
            ScheduleEngine::new(config.cutoff_evaluator()),
            CountdownController::new(config.countdown.auto_cascade),
            clock,
            ticks,
        )
    }

    pub fn subscribe(&mut self, sink: impl EventSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn intervals(&self) -> &[Interval] {
        self.engine.intervals()
    }

    pub fn schedule_state(&self) -> Option<&ScheduleState> {
        self.last_state.as_ref()
    }

    pub fn countdown_state(&self) -> &CountdownState {
        self.countdown.state()
    }

    pub fn engine(&self) -> &ScheduleEngine {
        &self.engine
    }

    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    pub fn is_exhausted(&self) -> bool {
        self.engine.is_exhausted()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Start the clock stream and publish the initial labels.
    pub fn open(&mut self) {
        self.ticks.start_clock_ticks();
        self.publish_clock();
        self.publish_intervals();
        let _ = self.recompute();
    }

    pub fn close(&mut self) {
        self.ticks.cancel_countdown_ticks();
        self.ticks.cancel_clock_ticks();
    }

    // ── UI handlers ──────────────────────────────────────────────────

    /// Text in slot `position` changed.
    ///
    /// Unknown positions are rejected without touching state. A malformed
    /// value is accepted into the slot; the recompute then reports it.
    pub fn on_interval_text_changed(
        &mut self,
        position: usize,
        text: impl Into<String>,
    ) -> Result<(), ScheduleError> {
        self.engine.set_text(position, text)?;
        self.publish_intervals();
        let _ = self.recompute();
        Ok(())
    }

    pub fn on_add_interval(&mut self) {
        self.engine.add_interval();
        self.publish_intervals();
        let _ = self.recompute();
    }

    pub fn on_remove_last_interval(&mut self) -> bool {
        let removed = self.engine.remove_last();
        if removed {
            self.publish_intervals();
            let _ = self.recompute();
        }
        removed
    }

    pub fn on_start_countdown(&mut self) -> Result<CountdownLeg, CountdownError> {
        let now = self.clock.now();
        match self.countdown.start(&mut self.engine, now) {
            Ok(leg) => {
                self.ticks.start_countdown_ticks();
                self.publish(Event::CountdownStarted {
                    minutes: leg.minutes,
                    target: leg.target,
                    at: now,
                });
                self.publish_intervals();
                let _ = self.recompute();
                Ok(leg)
            }
            Err(err) => {
                if !self.countdown.state().active() {
                    self.ticks.cancel_countdown_ticks();
                    self.publish(Event::CountdownIdle {
                        message: err.to_string(),
                        at: now,
                    });
                }
                Err(err)
            }
        }
    }

    /// Returns the restored interval #1 text, if a countdown was running.
    pub fn on_stop_countdown(&mut self) -> Option<String> {
        self.ticks.cancel_countdown_ticks();
        let restored = self.countdown.stop(&mut self.engine)?;
        let now = self.clock.now();
        self.publish(Event::CountdownStopped {
            restored_text: restored.clone(),
            at: now,
        });
        self.publish(Event::CountdownIdle {
            message: format::eta_label(None),
            at: now,
        });
        self.publish_intervals();
        let _ = self.recompute();
        Some(restored)
    }

    pub fn on_tick(&mut self, tick: Tick) {
        match tick {
            Tick::Second => self.on_second_tick(),
            Tick::Minute => self.on_minute_tick(),
        }
    }

    pub fn on_second_tick(&mut self) {
        let now = self.clock.now();
        let before = self.engine.first().raw_text.clone();

        match self.countdown.tick(&mut self.engine, now) {
            TickOutcome::Inactive => {}
            TickOutcome::Counting { remaining_secs } => {
                self.publish(Event::CountdownTick {
                    remaining_secs,
                    label: format::eta_label(Some(remaining_secs)),
                    at: now,
                });
                if self.engine.first().raw_text != before {
                    self.publish_intervals();
                    let _ = self.recompute();
                }
            }
            TickOutcome::Expired {
                changed_at, next, ..
            } => {
                self.publish(Event::OrderChanged {
                    changed_at,
                    label: format::order_changed_label(changed_at.time()),
                    at: now,
                });
                self.publish_intervals();
                let _ = self.recompute();
                match next {
                    Some(leg) => {
                        // Realign the stream to the new target.
                        self.ticks.start_countdown_ticks();
                        self.publish(Event::CountdownStarted {
                            minutes: leg.minutes,
                            target: leg.target,
                            at: now,
                        });
                    }
                    None => {
                        self.ticks.cancel_countdown_ticks();
                        self.publish(Event::CountdownIdle {
                            message: format::eta_label(None),
                            at: now,
                        });
                    }
                }
            }
        }
    }

    pub fn on_minute_tick(&mut self) {
        self.publish_clock();
        let _ = self.recompute();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn recompute(&mut self) -> Result<&ScheduleState, ScheduleError> {
        let now = self.clock.now();
        match self.engine.recompute(now) {
            Ok(state) => {
                self.publish(Event::ScheduleRecomputed {
                    result_text: format::result_label(&state),
                    warning_text: format::warning_label(state.violation.as_ref()),
                    state: state.clone(),
                    at: now,
                });
                Ok(self.last_state.insert(state))
            }
            Err(err) => {
                self.publish(Event::ScheduleInvalid {
                    position: err.position(),
                    message: format::invalid_label(err.position()),
                    at: now,
                });
                Err(err)
            }
        }
    }

    fn publish_clock(&mut self) {
        let label = format::current_time_label(&self.clock.now_zoned());
        let at = self.clock.now();
        self.publish(Event::ClockRefreshed { label, at });
    }

    fn publish_intervals(&mut self) {
        let event = Event::IntervalsChanged {
            intervals: self.engine.intervals().to_vec(),
            at: self.now(),
        };
        self.publish(event);
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    fn publish(&mut self, event: Event) {
        for sink in &mut self.sinks {
            sink.publish(&event);
        }
    }
}
