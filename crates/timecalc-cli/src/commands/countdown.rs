use std::io::Write;

use clap::Args;
use timecalc_core::{format, Config, Event, Session, SystemClock, TokioTicker};
use tokio::sync::mpsc;

#[derive(Args)]
pub struct CountdownArgs {
    /// Interval values, in order (MM or HMM, e.g. 45 or 130)
    #[arg(required = true)]
    pub intervals: Vec<String>,
    /// Stop after the first interval instead of moving on to the next
    #[arg(long)]
    pub no_cascade: bool,
    /// Emit events as JSON lines instead of status text
    #[arg(long)]
    pub json: bool,
}

/// Turn an event into a status line; `None` means "nothing to show".
///
/// Countdown ticks are rendered on a single rewritten line.
fn render(event: &Event) -> Option<String> {
    match event {
        Event::ClockRefreshed { label, .. } => Some(label.clone()),
        Event::ScheduleRecomputed {
            result_text,
            warning_text,
            ..
        } => {
            if warning_text.is_empty() {
                Some(result_text.clone())
            } else {
                Some(format!("{result_text}\n{warning_text}"))
            }
        }
        Event::ScheduleInvalid { message, .. } => Some(message.clone()),
        Event::CountdownStarted { minutes, target, .. } => Some(format!(
            "Counting down {} (until {})",
            format::format_duration(u64::from(*minutes)),
            format::format_clock(target.time())
        )),
        Event::CountdownTick { label, .. } => Some(label.clone()),
        Event::OrderChanged { label, .. } => Some(label.clone()),
        Event::CountdownStopped { restored_text, .. } => {
            Some(format!("Countdown stopped; Interval 1 restored to '{restored_text}'"))
        }
        Event::CountdownIdle { message, .. } => Some(message.clone()),
        Event::IntervalsChanged { .. } => None,
    }
}

fn printer(json: bool) -> impl FnMut(&Event) {
    move |event: &Event| {
        let mut out = std::io::stdout().lock();
        if json {
            if let Ok(line) = serde_json::to_string(event) {
                let _ = writeln!(out, "{line}");
            }
            return;
        }
        let Some(text) = render(event) else {
            return;
        };
        if matches!(event, Event::CountdownTick { .. }) {
            let _ = write!(out, "\r{text}");
            let _ = out.flush();
        } else {
            let _ = writeln!(out, "\r{text}");
        }
    }
}

pub fn run(args: CountdownArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    if args.no_cascade {
        config.countdown.auto_cascade = false;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(config, args))
}

async fn drive(config: Config, args: CountdownArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let ticker = TokioTicker::new(tx, config.tick_period(), config.clock_period());
    let mut session = Session::from_config(&config, SystemClock, ticker);
    session.subscribe(printer(args.json));

    for (i, text) in args.intervals.iter().enumerate() {
        if i > 0 {
            session.on_add_interval();
        }
        session.on_interval_text_changed(i + 1, text.clone())?;
    }
    session.open();
    session.on_start_countdown()?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            tick = rx.recv() => {
                let Some(tick) = tick else { break };
                session.on_tick(tick);
                if !session.countdown_state().active() {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                session.on_stop_countdown();
                break;
            }
        }
    }

    session.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn intervals_changed_is_silent() {
        let at = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let event = Event::IntervalsChanged {
            intervals: Vec::new(),
            at,
        };
        assert_eq!(render(&event), None);
    }

    #[test]
    fn started_shows_duration_and_target() {
        let at = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let event = Event::CountdownStarted {
            minutes: 90,
            target: at + chrono::Duration::minutes(90),
            at,
        };
        assert_eq!(
            render(&event).as_deref(),
            Some("Counting down 1 hr 30 min (until 10:30 AM)")
        );
    }
}
