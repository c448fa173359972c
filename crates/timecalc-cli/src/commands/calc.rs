use chrono::{Local, NaiveDateTime, NaiveTime};
use clap::Args;
use timecalc_core::{format, Config, ScheduleEngine};

#[derive(Args)]
pub struct CalcArgs {
    /// Interval values, in order (MM or HMM, e.g. 45 or 130)
    pub intervals: Vec<String>,
    /// Pretend the current time is HH:MM (24-hour)
    #[arg(long)]
    pub now: Option<String>,
    /// Print the schedule state as JSON
    #[arg(long)]
    pub json: bool,
}

fn resolve_now(now: Option<&str>) -> Result<NaiveDateTime, Box<dyn std::error::Error>> {
    let current = Local::now().naive_local();
    match now {
        None => Ok(current),
        Some(raw) => {
            let time = NaiveTime::parse_from_str(raw, "%H:%M")
                .map_err(|e| format!("invalid --now '{raw}': {e}"))?;
            Ok(current.date().and_time(time))
        }
    }
}

pub fn run(args: CalcArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let now = resolve_now(args.now.as_deref())?;
    let engine = ScheduleEngine::with_texts(config.cutoff_evaluator(), args.intervals);

    let state = match engine.recompute(now) {
        Ok(state) => state,
        Err(e) => return Err(format::invalid_label(e.position()).into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    match args.now {
        // Only the time of day was given; there is no zone to show.
        Some(_) => println!("Current Time: {}", format::format_clock(now.time())),
        None => println!("{}", format::current_time_label(&Local::now())),
    }
    for interval in engine.intervals() {
        println!("  {} {}", interval.label(), interval.raw_text);
    }
    println!("{}", format::result_label(&state));
    let warning = format::warning_label(state.violation.as_ref());
    if !warning.is_empty() {
        println!("{warning}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_override_sets_time_of_day() {
        let now = resolve_now(Some("14:50")).unwrap();
        assert_eq!(now.time(), NaiveTime::from_hms_opt(14, 50, 0).unwrap());
    }

    #[test]
    fn now_override_rejects_garbage() {
        assert!(resolve_now(Some("2pm")).is_err());
    }
}
