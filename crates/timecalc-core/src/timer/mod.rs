mod countdown;
pub mod ticker;

pub use countdown::{
    CountdownController, CountdownLeg, CountdownPhase, CountdownState, TickOutcome,
};
pub use ticker::{ManualTicks, Tick, TickScheduler, TokioTicker};
