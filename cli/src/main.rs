use clap::{Args, Parser, Subcommand, ValueEnum};
use tocsin_cli::CliContext;
use tocsin_cli::commands::{self, Schedule};
use tocsin_cli::parse;
use tocsin_cli::readline;
use tocsin_core::{AlarmsConfig, AlarmsConfigExt, TimeUnit, Timestamp};

fn main() -> Result<(), String> {
    let _log_guard = tocsin_cli::logging::init();

    let config = AlarmsConfig::load_or_default();
    let mut ctx = CliContext::new(config);

    while let Some(line) = readline()? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &mut ctx) {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => println!("{err}"),
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "software alarms on a simulated clock")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct HandlerArgs {
    /// Text printed when the alarm fires
    #[arg(short, long)]
    label: Option<String>,

    /// Byte passed to the handler
    #[arg(short, long)]
    param: Option<u8>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fire once at an epoch time or 'YYYY-MM-DD HH:MM:SS'
    TriggerOnce {
        #[arg(short, long)]
        at: String,
        #[command(flatten)]
        handler: HandlerArgs,
    },
    /// Fire once at the next HH:MM[:SS]
    AlarmOnce {
        #[arg(short, long)]
        at: String,
        #[command(flatten)]
        handler: HandlerArgs,
    },
    /// Fire every day at HH:MM[:SS]
    AlarmRepeat {
        #[arg(short, long)]
        at: String,
        #[command(flatten)]
        handler: HandlerArgs,
    },
    /// Fire once at the next weekday and HH:MM[:SS]
    WeeklyOnce {
        #[arg(short, long)]
        day: String,
        #[arg(short, long)]
        at: String,
        #[command(flatten)]
        handler: HandlerArgs,
    },
    /// Fire every week on a weekday at HH:MM[:SS]
    WeeklyRepeat {
        #[arg(short, long)]
        day: String,
        #[arg(short, long)]
        at: String,
        #[command(flatten)]
        handler: HandlerArgs,
    },
    /// Fire once after a number of seconds
    TimerOnce {
        #[arg(short, long)]
        secs: Timestamp,
        #[command(flatten)]
        handler: HandlerArgs,
    },
    /// Fire every number of seconds
    TimerRepeat {
        #[arg(short, long)]
        secs: Timestamp,
        #[command(flatten)]
        handler: HandlerArgs,
    },
    List,
    Free {
        #[arg(short, long)]
        id: u8,
    },
    Enable {
        #[arg(short, long)]
        id: u8,
    },
    Disable {
        #[arg(short, long)]
        id: u8,
    },
    /// Replace an alarm's stored seconds value
    Write {
        #[arg(short, long)]
        id: u8,
        #[arg(short, long)]
        value: Timestamp,
    },
    Now,
    Next,
    Stats,
    /// Advance simulated time, servicing alarms throughout
    Advance {
        #[arg(short, long)]
        secs: u64,
    },
    /// Advance until a calendar field reads the given value
    WaitFor {
        #[arg(short, long, value_enum)]
        unit: UnitArg,
        #[arg(short, long)]
        digits: u16,
    },
    /// Advance until a calendar field next changes
    Rollover {
        #[arg(short, long, value_enum)]
        unit: UnitArg,
    },
    Exit,
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitArg {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
}

impl From<UnitArg> for TimeUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Millisecond => TimeUnit::Millisecond,
            UnitArg::Second => TimeUnit::Second,
            UnitArg::Minute => TimeUnit::Minute,
            UnitArg::Hour => TimeUnit::Hour,
            UnitArg::Day => TimeUnit::Day,
        }
    }
}

fn respond(line: &str, ctx: &mut CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "tocsin".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    let Some(command) = cli.command else {
        return Ok(false);
    };

    match command {
        Commands::TriggerOnce { at, handler } => {
            let at = parse::epoch(&at)?;
            commands::create(ctx, Schedule::TriggerOnce { at }, handler.label, handler.param)?
        }
        Commands::AlarmOnce { at, handler } => {
            let hms = parse::time_of_day(&at)?;
            commands::create(ctx, Schedule::AlarmOnce { hms }, handler.label, handler.param)?
        }
        Commands::AlarmRepeat { at, handler } => {
            let hms = parse::time_of_day(&at)?;
            commands::create(ctx, Schedule::AlarmRepeat { hms }, handler.label, handler.param)?
        }
        Commands::WeeklyOnce { day, at, handler } => {
            let day = parse::weekday(&day)?;
            let hms = parse::time_of_day(&at)?;
            commands::create(ctx, Schedule::WeeklyOnce { day, hms }, handler.label, handler.param)?
        }
        Commands::WeeklyRepeat { day, at, handler } => {
            let day = parse::weekday(&day)?;
            let hms = parse::time_of_day(&at)?;
            commands::create(ctx, Schedule::WeeklyRepeat { day, hms }, handler.label, handler.param)?
        }
        Commands::TimerOnce { secs, handler } => {
            commands::create(ctx, Schedule::TimerOnce { secs }, handler.label, handler.param)?
        }
        Commands::TimerRepeat { secs, handler } => {
            commands::create(ctx, Schedule::TimerRepeat { secs }, handler.label, handler.param)?
        }
        Commands::List => commands::list(ctx),
        Commands::Free { id } => commands::free(ctx, id),
        Commands::Enable { id } => commands::set_enabled(ctx, id, true),
        Commands::Disable { id } => commands::set_enabled(ctx, id, false),
        Commands::Write { id, value } => commands::write(ctx, id, value),
        Commands::Now => commands::show_now(ctx),
        Commands::Next => commands::show_next(ctx),
        Commands::Stats => commands::show_stats(ctx),
        Commands::Advance { secs } => commands::advance(ctx, secs),
        Commands::WaitFor { unit, digits } => commands::wait_for(ctx, unit.into(), digits),
        Commands::Rollover { unit } => commands::rollover(ctx, unit.into()),
        Commands::Exit => {
            commands::exit()?;
            return Ok(true);
        }
    }
    Ok(false)
}
