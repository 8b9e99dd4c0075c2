//! picoLog host tool - Main Entry Point
//!
//! Drives a picoLog light logger over its USB serial port: configure and start
//! sampling, dump the stored samples to a file and plot them.

use anyhow::Context;
use clap::Parser;
use picolog::{
    analysis::{export_csv, reduce, SeriesStatistics},
    backend::{Command, DeviceSession, LineTransport, Reply, ScriptedTransport, SerialTransport},
    cli::{adc_separator, confirm, convert_filter, Args, Commands},
    config::{now_start, parse_start, AppConfig, AppendMode, IntervalSetting, START_INPUT_FORMAT},
    dump::{DumpOptions, DumpParser, ParseOptions},
    frontend::show_plot,
    PicoLogError,
};
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(convert_filter(args.verbose.log_level_filter()).into())
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = AppConfig::load_or_default(args.config.as_deref());
    args.apply(&mut config);

    if let Err(e) = config.validate() {
        println!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<PicoLogError>().map(PicoLogError::root) {
            // The device refused; the session itself is fine
            Some(PicoLogError::CommandFailed { command, response }) => {
                println!("{}", response);
                println!("error: {} failed", command);
                ExitCode::SUCCESS
            }
            _ => {
                println!("error: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn run(args: &Args, config: &AppConfig) -> anyhow::Result<()> {
    if let Commands::Visualize {
        no_window, csv, ..
    } = &args.command
    {
        return visualize(config, *no_window, csv.as_deref());
    }

    match &args.replay {
        Some(path) => {
            tracing::info!("Replaying device replies from {}", path.display());
            drive(&args.command, config, ScriptedTransport::from_file(path)?)
        }
        None => drive(&args.command, config, SerialTransport::open(&config.serial)?),
    }
}

fn drive<T: LineTransport>(
    command: &Commands,
    config: &AppConfig,
    transport: T,
) -> anyhow::Result<()> {
    let mut session = DeviceSession::new(transport);
    session.probe()?;

    match command {
        Commands::Sample => {
            println!("sampling ...");
            report(Command::Sample, session.start_sampling()?);
        }
        Commands::Dump { .. } => dump(&mut session, config)?,
        Commands::Remove { yes } => {
            if *yes || ask("Delete sample data on Pico?")? {
                report(Command::Remove, session.remove_samples()?);
            }
        }
        Commands::Format { yes } => {
            if *yes || ask("Format flash on Pico?")? {
                report(Command::Format, session.format_flash()?);
            }
        }
        Commands::Adc { count, delay_ms } => {
            for i in 0..*count {
                let reading = session.read_adc()?;
                print!("0x{:04x}{}", reading, adc_separator(i));
                io::stdout().flush()?;
                std::thread::sleep(Duration::from_millis(*delay_ms));
            }
            println!("OK");
        }
        Commands::SetDate { datetime } => {
            let start = match datetime {
                Some(text) => match parse_start(text) {
                    Ok(start) => start,
                    Err(e) => {
                        tracing::debug!("{}", e);
                        println!("error: input not valid");
                        return Ok(());
                    }
                },
                None => {
                    let start = now_start();
                    println!("{}", start.format(START_INPUT_FORMAT));
                    start
                }
            };
            report(Command::SetDate, session.set_start(&start)?);
        }
        Commands::SetInterval { interval } => {
            let Ok(requested) = interval.parse::<IntervalSetting>() else {
                println!("error: input not valid");
                return Ok(());
            };
            if let Some(warning) = requested.warning() {
                println!("{}", warning);
            }
            let (_, reply) = session.set_interval(requested.seconds as u64)?;
            report(Command::SetInterval, reply);
        }
        Commands::SetAppend { mode } => {
            let Ok(mode) = mode.parse::<AppendMode>() else {
                println!("error: input not valid");
                return Ok(());
            };
            report(Command::SetAppend, session.set_append(mode)?);
        }
        Commands::Visualize { .. } => {}
    }

    let stats = session.transport().stats();
    tracing::debug!(
        "{} lines sent, {} received, {} timeouts",
        stats.lines_sent,
        stats.lines_received,
        stats.timeouts
    );
    Ok(())
}

/// Print the device's reply the way the operator expects it
fn report(command: Command, reply: Reply) {
    match reply {
        Ok(_) => println!("OK"),
        Err(failure) => {
            println!("{}", failure);
            println!("error: {} failed", command);
        }
    }
}

fn ask(question: &str) -> anyhow::Result<bool> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    Ok(confirm(question, &mut input, &mut output)?)
}

fn dump<T: LineTransport>(
    session: &mut DeviceSession<T>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    println!("dumping ...");
    let options = DumpOptions {
        idle_ends_block: config.dump.idle_ends_block,
    };

    let result = session.dump_to_file(&config.dump.path, options, |n| {
        print!("\r{}", n);
        let _ = io::stdout().flush();
    });

    match result {
        Ok(summary) => {
            println!(" OK");
            tracing::info!(
                "{} data lines written to {}",
                summary.data_lines,
                config.dump.path.display()
            );
            Ok(())
        }
        Err(e) if e.is_command_failure() => Err(e.into()),
        Err(e) => {
            println!();
            Err(e).with_context(|| format!("dump into {} incomplete", config.dump.path.display()))
        }
    }
}

fn visualize(config: &AppConfig, no_window: bool, csv: Option<&Path>) -> anyhow::Result<()> {
    let parser = DumpParser::new(ParseOptions {
        strict_word_count: config.dump.strict_word_count,
    });
    let series = parser
        .parse_file(&config.dump.path)
        .with_context(|| format!("{} not usable", config.dump.path.display()))?;
    let averaged = reduce(&series, config.plot.averaging_factor)?;

    println!("{}", SeriesStatistics::from_series(&averaged));

    if let Some(path) = csv {
        export_csv(&averaged, path)?;
    }

    if !no_window {
        let title = format!("picoLog - {}", config.dump.path.display());
        show_plot(&averaged, &config.plot, &title)?;
    }
    Ok(())
}
