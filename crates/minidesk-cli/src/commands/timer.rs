use std::io::Write;

use clap::Subcommand;
use minidesk_core::storage::Database;
use minidesk_core::timer::{
    now_ms, Direction, ElapsedScheduler, IntervalScheduler, SessionClock, SessionType,
    TimerDriver,
};
use minidesk_core::{Config, Event};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

const CLOCK_KEY: &str = "session_clock";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the countdown, or pause it if it is running
    Toggle,
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Return to an idle work session at full length
    Reset,
    /// Lengthen (+) or shorten (-) a session by one minute
    Adjust {
        /// Session to change: work or break
        session: SessionType,
        /// + or -
        #[arg(allow_hyphen_values = true)]
        direction: Direction,
    },
    /// Print current clock state as JSON
    Status,
    /// Print finished-session statistics as JSON
    Stats,
    /// Run the countdown in the foreground, reading commands from stdin
    Run,
}

/// Clock state persisted between invocations.
struct TimerSession {
    db: Database,
    config: Config,
    driver: TimerDriver<ElapsedScheduler>,
}

impl TimerSession {
    fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let db = Database::open()?;
        let config = Config::load()?;
        let driver = load_driver(&db, &config);
        let mut session = Self { db, config, driver };
        let missed = session.driver.catch_up(now_ms());
        session.record(&missed);
        Ok(session)
    }

    /// Log finished sessions if enabled in config.
    fn record(&self, events: &[Event]) {
        record_sessions(&self.db, &self.config, events);
    }

    fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        save_driver(&self.db, &self.driver)
    }
}

fn load_driver(db: &Database, config: &Config) -> TimerDriver<ElapsedScheduler> {
    match db.kv_get(CLOCK_KEY) {
        Ok(Some(json)) => match serde_json::from_str::<TimerDriver<ElapsedScheduler>>(&json) {
            Ok(driver) => return driver,
            Err(e) => warn!("discarding unreadable clock state: {e}"),
        },
        Ok(None) => debug!("no saved clock, starting fresh"),
        Err(e) => warn!("failed to read clock state: {e}"),
    }
    TimerDriver::new(
        SessionClock::with_durations(config.durations()),
        ElapsedScheduler::new(),
    )
}

fn save_driver(
    db: &Database,
    driver: &TimerDriver<ElapsedScheduler>,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(driver)?;
    db.kv_set(CLOCK_KEY, &json)?;
    Ok(())
}

fn record_sessions(db: &Database, config: &Config, events: &[Event]) {
    if !config.timer.record_sessions {
        return;
    }
    for event in events {
        if let Event::SessionSwitched {
            from,
            completed_secs,
            at,
            ..
        } = event
        {
            if let Err(e) = db.record_session(*from, *completed_secs, *at) {
                warn!("failed to record {from} session: {e}");
            }
        }
    }
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TimerSession::open()?;

    match action {
        TimerAction::Toggle => {
            let event = session.driver.toggle_running();
            print_event(&event)?;
        }
        TimerAction::Start => {
            if session.driver.clock().is_running() {
                print_event(&session.driver.clock().snapshot())?;
            } else {
                let event = session.driver.toggle_running();
                print_event(&event)?;
            }
        }
        TimerAction::Pause => {
            if session.driver.clock().is_running() {
                let event = session.driver.toggle_running();
                print_event(&event)?;
            } else {
                print_event(&session.driver.clock().snapshot())?;
            }
        }
        TimerAction::Reset => {
            let event = session.driver.reset();
            print_event(&event)?;
        }
        TimerAction::Adjust { session: target, direction } => {
            let event = session.driver.adjust_duration(target, direction);
            print_event(&event)?;
        }
        TimerAction::Status => {
            print_event(&session.driver.clock().snapshot())?;
        }
        TimerAction::Stats => {
            let stats = session.db.session_stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        TimerAction::Run => return run_foreground(session),
    }

    session.save()
}

/// One line of input in the foreground loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Toggle,
    Reset,
    Adjust(SessionType, Direction),
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let cmd = match line.trim().to_ascii_lowercase().as_str() {
        "" | "p" | "pause" | "start" => Command::Toggle,
        "r" | "reset" => Command::Reset,
        "w+" => Command::Adjust(SessionType::Work, Direction::Increase),
        "w-" => Command::Adjust(SessionType::Work, Direction::Decrease),
        "b+" => Command::Adjust(SessionType::Break, Direction::Increase),
        "b-" => Command::Adjust(SessionType::Break, Direction::Decrease),
        "q" | "quit" | "exit" => Command::Quit,
        _ => return None,
    };
    Some(cmd)
}

fn render(clock: &SessionClock) {
    print!(
        "\r{:<5} {} [{:?}]      ",
        clock.active_session().as_str().to_uppercase(),
        clock.display(),
        clock.status()
    );
    if let Err(e) = std::io::stdout().flush() {
        warn!("failed to flush timer display: {e}");
    }
}

fn run_foreground(session: TimerSession) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let TimerSession { db, config, driver } = session;
    let clock = runtime.block_on(foreground(driver.into_clock(), &db, &config))?;
    save_driver(&db, &TimerDriver::new(clock, ElapsedScheduler::new()))
}

async fn foreground(
    clock: SessionClock,
    db: &Database,
    config: &Config,
) -> Result<SessionClock, Box<dyn std::error::Error>> {
    let mut driver = TimerDriver::new(clock, IntervalScheduler::new());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("enter: p start/pause, r reset, w+/w-/b+/b- adjust, q quit");
    render(driver.clock());

    loop {
        tokio::select! {
            _ = driver.scheduler_mut().next_tick() => {
                if let Some(event) = driver.fire() {
                    info!(kind = event.kind(), "session boundary");
                    record_sessions(db, config, std::slice::from_ref(&event));
                    print!("\x07");
                }
                render(driver.clock());
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Some(Command::Toggle) => {
                        driver.toggle_running();
                    }
                    Some(Command::Reset) => {
                        driver.reset();
                    }
                    Some(Command::Adjust(target, direction)) => {
                        driver.adjust_duration(target, direction);
                    }
                    Some(Command::Quit) => break,
                    None => eprintln!("unknown command: {}", line.trim()),
                }
                render(driver.clock());
            }
        }
    }

    println!();
    Ok(driver.into_clock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn parses_foreground_commands() {
        assert_eq!(parse_command("p"), Some(Command::Toggle));
        assert_eq!(parse_command(""), Some(Command::Toggle));
        assert_eq!(parse_command(" R "), Some(Command::Reset));
        assert_eq!(
            parse_command("b-"),
            Some(Command::Adjust(SessionType::Break, Direction::Decrease))
        );
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("snooze"), None);
    }

    #[test]
    fn only_switch_events_are_recorded() {
        let db = Database::open_memory().unwrap();
        let config = Config::default();
        let mut driver = TimerDriver::new(
            SessionClock::with_durations(minidesk_core::DurationStore::new(60, 60)),
            ElapsedScheduler::new(),
        );
        let mut events = vec![driver.toggle_running()];
        let t0 = driver.scheduler().last_tick_epoch_ms().unwrap();
        events.extend(driver.catch_up(t0 + 60_000));
        record_sessions(&db, &config, &events);
        assert_eq!(db.session_stats().unwrap().work_sessions, 1);
    }

    #[test]
    fn recording_can_be_disabled() {
        let db = Database::open_memory().unwrap();
        let mut config = Config::default();
        config.timer.record_sessions = false;
        let event = Event::SessionSwitched {
            from: SessionType::Work,
            to: SessionType::Break,
            completed_secs: 1500,
            duration_secs: 300,
            at: Utc::now(),
        };
        record_sessions(&db, &config, &[event]);
        assert_eq!(db.session_stats().unwrap().total_sessions, 0);
    }
}
