//! Host-side stand-in for the kernel glue around the HT2020 core.
//!
//! Emulates boards sitting in reset state behind chosen base addresses, loads
//! the driver with an optional `io=` list, replays the classic demonstration
//! (read channels 0 and 1 of the first enabled port, write `0x55` to channel
//! 2) and unloads again.
//!
//! ```text
//! ht2020-sim [io=0xNNN,...] [--board 0xNNN,...] [--busy 0xNNN,...] [--level LEVEL]
//! ```
//!
//! `--board` defaults to `0x100`. `--busy` pre-claims the 8-bit window of the
//! given base addresses for another driver.

mod logger;

use kernel_ht2020::device::DeviceNode;
use kernel_ht2020::{
    ChannelError, ChannelIndex, ChannelSession, DriverConfig, Ht2020, InitError, IoParam, ParamError, Platform,
};
use kernel_mmio::{ClaimError, FakeBus, IoRegion, RegionArbiter, RegionTable};
use log::LevelFilter;
use logger::StderrLogger;
use std::env;
use std::process::ExitCode;

const PLATFORM: Platform = Platform::ARMADILLO_460;
const DEMO_VALUE: u8 = 0x55;

#[derive(Debug, thiserror::Error)]
enum SimError {
    #[error("usage: {0}")]
    Usage(String),
    #[error(transparent)]
    Param(#[from] ParamError),
    #[error("ht2020: {0}")]
    Init(#[from] InitError),
    #[error("{node}: {source}")]
    Channel { node: String, source: ChannelError },
    #[error("cannot occupy window: {0}")]
    Claim(#[from] ClaimError),
}

impl SimError {
    fn errno(&self) -> i32 {
        match self {
            Self::Usage(_) | Self::Claim(_) => kernel_ht2020::errno::EINVAL,
            Self::Param(e) => e.errno(),
            Self::Init(e) => e.errno(),
            Self::Channel { source, .. } => source.errno(),
        }
    }
}

struct Options {
    io: IoParam,
    boards: IoParam,
    busy: IoParam,
    level: LevelFilter,
}

fn parse_args() -> Result<Options, SimError> {
    let mut opts = Options {
        io: IoParam::empty(),
        boards: IoParam::from_slice(&[0x100])?,
        busy: IoParam::empty(),
        level: LevelFilter::Info,
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--board" => opts.boards = value_of(&mut args, "--board")?.parse()?,
            "--busy" => opts.busy = value_of(&mut args, "--busy")?.parse()?,
            "--level" => {
                let level = value_of(&mut args, "--level")?;
                opts.level = level
                    .parse()
                    .map_err(|_| SimError::Usage(format!("unknown log level {level:?}")))?;
            }
            _ if arg.starts_with("io=") => opts.io = arg.parse()?,
            _ => return Err(SimError::Usage(format!("unexpected argument {arg:?}"))),
        }
    }
    Ok(opts)
}

fn value_of(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, SimError> {
    args.next()
        .ok_or_else(|| SimError::Usage(format!("{flag} needs a value")))
}

/// A bus with a board in reset state behind every base in `boards`.
fn emulated_bus(boards: &IoParam) -> FakeBus {
    let bus = FakeBus::new();
    for &base in boards.as_slice() {
        bus.load(PLATFORM.io8(base), &[0, 0, 0, 0xFF]);
    }
    bus
}

fn demo(drv: &Ht2020<FakeBus>, port: u32) -> Result<(), SimError> {
    for offset in 0..2 {
        let channel = ChannelIndex::of(port, offset);
        let node = node_name(drv, channel);
        let mut session = ChannelSession::open(channel);
        let value = drv
            .read_channel(&mut session)
            .map_err(|source| SimError::Channel { node: node.clone(), source })?;
        if let Some(value) = value.byte() {
            println!("Read /dev/{node}: {value:#04x}");
        }
    }

    let channel = ChannelIndex::of(port, 2);
    let node = node_name(drv, channel);
    println!("Write /dev/{node} = {DEMO_VALUE:#04x}");
    let mut session = ChannelSession::open(channel);
    drv.write_channel(&mut session, DEMO_VALUE)
        .map_err(|source| SimError::Channel { node, source })?;
    Ok(())
}

fn node_name(drv: &Ht2020<FakeBus>, channel: ChannelIndex) -> String {
    DeviceNode::for_channel(drv.table(), channel)
        .map_or_else(|_| format!("channel{}", channel.into_bits()), |n| n.to_string())
}

fn run() -> Result<(), SimError> {
    let opts = parse_args()?;
    if StderrLogger::new(opts.level).init().is_err() {
        eprintln!("logger already installed");
    }

    let mut arbiter = RegionTable::<64>::new();
    for &base in opts.busy.as_slice() {
        arbiter.request_region(IoRegion::new(PLATFORM.io8(base), 4), "other")?;
    }

    let config = if opts.io.is_empty() {
        DriverConfig::probing(PLATFORM)
    } else {
        DriverConfig::explicit(PLATFORM, opts.io)
    };
    let mut drv = Ht2020::init(&config, emulated_bus(&opts.boards), &mut arbiter)?;

    for (port, base) in drv.enabled_ports() {
        println!("port {port:2}: {base:#x}");
    }

    let result = drv
        .enabled_ports()
        .next()
        .and_then(|(port, _)| u32::try_from(port).ok())
        .map_or(Ok(()), |port| demo(&drv, port));

    let released = drv.teardown(&mut arbiter);
    log::debug!("unloaded, {released} window(s) released");
    result
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(u8::try_from(e.errno()).unwrap_or(1))
        }
    }
}
