mod logger;

use std::thread::sleep;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn, LevelFilter};

use megatec::{Command, FrameAssembler, HidSession, HidTransport, UpsStatus};

use logger::LOGGER;

#[derive(Debug, Parser)]
#[command(author, version, about = "Polls a Megatec Q1 UPS over USB HID")]
struct Args {
    /// USB vendor ID of the UPS, hex (0x...) or decimal
    #[arg(short, long, value_parser = parse_usb_id, default_value = "0x0665")]
    vid: u16,

    /// USB product ID of the UPS, hex (0x...) or decimal
    #[arg(short, long, value_parser = parse_usb_id, default_value = "0x5161")]
    pid: u16,

    /// Timeout applied to each HID read
    #[arg(long, default_value = "5s")]
    timeout: humantime::Duration,

    /// Enable protocol-level logging
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Poll the UPS once and print its status
    Status,

    /// Poll the UPS repeatedly
    Watch {
        /// Delay between polls
        #[arg(long, default_value = "10s")]
        interval: humantime::Duration,
    },
}

fn parse_usb_id(value: &str) -> Result<u16, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|err| format!("invalid USB ID {value:?}: {err}"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(if args.verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    });

    let session = HidSession::new().context("Failed to initialize the HID library")?;
    let mut transport = session
        .open(args.vid, args.pid)
        .context("Failed to open UPS device")?;
    info!("UPS device connected");

    let assembler = FrameAssembler {
        read_timeout: *args.timeout,
        ..Default::default()
    };

    match args.command {
        CliCommand::Status => {
            let status = poll(&assembler, &mut transport)?;
            print_report(&status);
        }
        CliCommand::Watch { interval } => loop {
            match poll(&assembler, &mut transport) {
                Ok(status) => print_report(&status),
                Err(error) => warn!("Poll failed: {error:#}"),
            }
            sleep(*interval);
        },
    }

    Ok(())
}

fn poll(assembler: &FrameAssembler, transport: &mut HidTransport) -> Result<UpsStatus> {
    let message = assembler.exchange(transport, Command::STATUS_QUERY)?;
    Ok(UpsStatus::parse(&message)?)
}

fn print_report(status: &UpsStatus) {
    println!("Input Voltage: {:.1} V", status.input_voltage);
    println!("Output Voltage: {:.1} V", status.output_voltage);
    println!("Battery Voltage: {:.1} V", status.battery_voltage);
    println!("Load: {:.1} %", status.load);
    println!("Frequency: {:.1} Hz", status.frequency);
    println!("Battery/Sound/AVR: {:.2}", status.avr);
    println!("Temperature: {:.1} C", status.temperature);
    println!("Error or Status Code: {}", status.error_code);
}
