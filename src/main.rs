//! DDR4 All-Banks Simulator CLI.
//!
//! The main executable for the device model. It loads a configuration,
//! prints the resolved device parameters and, when given a trace, replays it
//! through the in-order controller and reports statistics.
//!
//! # Usage
//!
//! ```text
//! ddr4-ab --config configs/default.toml --trace configs/sample.trace
//! ddr4-ab --dump-timing -vv
//! ```

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ddr4_ab::common::{Command, Level, Result};
use ddr4_ab::config::Config;
use ddr4_ab::dram::{Ddr4Ab, CHANNEL_WIDTH, PREFETCH_SIZE, STANDARD_NAME};
use ddr4_ab::sim::{load_trace, Controller};

/// Command-line arguments for the DDR4 all-banks simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "DDR4 All-Banks Timing Simulator")]
struct Args {
    #[arg(short, long, default_value = "configs/default.toml")]
    config: String,

    /// Request trace to replay.
    #[arg(short, long)]
    trace: Option<String>,

    /// Print the channel and rank timing constraints.
    #[arg(long)]
    dump_timing: bool,

    /// Print statistics as JSON.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        tracing::error!(error = %e, "simulation aborted");
        eprintln!("\n[!] FATAL: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = Config::from_file(&args.config)?;
    let device = config.build_device()?;
    print_summary(&device, &config);

    if args.dump_timing {
        dump_timing(&device);
    }

    let Some(trace_path) = &args.trace else {
        return Ok(());
    };

    let requests = load_trace(trace_path, device.spec())?;
    println!("[*] Replaying {} requests from {}", requests.len(), trace_path);

    let mut controller = Controller::new(device, &config.controller)?;
    controller.run(&requests)?;

    if args.json {
        match controller.stats.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("[!] could not serialize statistics: {}", e),
        }
    } else {
        controller.stats.print();
    }
    Ok(())
}

fn print_summary(device: &Ddr4Ab, config: &Config) {
    let spec = device.spec();
    let s = &spec.speed_entry;

    println!("Device Configuration");
    println!("--------------------");
    println!("Standard:");
    println!("  Name:               {}", STANDARD_NAME);
    println!(
        "  Prefetch / Channel: {}n / {} bit",
        PREFETCH_SIZE, CHANNEL_WIDTH
    );
    println!("Organization:");
    println!("  Name:               {}", spec.org);
    println!("  Density:            {} Mb", spec.org_entry.size_mb);
    println!("  Width:              x{}", spec.org_entry.dq);
    println!(
        "  Hierarchy:          {} ch, {} ra, {} bg, {} ba",
        spec.count(Level::Channel),
        spec.count(Level::Rank),
        spec.count(Level::BankGroup),
        spec.count(Level::Bank)
    );
    println!("  Rows / Columns:     {} / {}", spec.count(Level::Row), spec.count(Level::Column));
    println!("  Page Size:          {} B", spec.org_entry.page_size());
    println!("Speed:");
    println!("  Name:               {}", spec.speed);
    println!("  Rate:               {} MT/s", s.rate);
    println!("  Clock:              {:.3} MHz ({:.3} ns)", s.freq, s.tck);
    println!("  Refresh Mode:       {}", spec.refresh_mode);
    println!(
        "  CL-RCD-RP-RAS:      {}-{}-{}-{}",
        s.n_cl, s.n_rcd, s.n_rp, s.n_ras
    );
    println!("  nRRDS / nRRDL:      {} / {}", s.n_rrds, s.n_rrdl);
    println!("  nFAW:               {}", s.n_faw);
    println!("  nRFC / nREFI:       {} / {}", s.n_rfc, s.n_refi);
    println!("  nXS:                {}", s.n_xs);
    println!("  Read Latency:       {}", spec.read_latency);
    println!("Controller:");
    println!("  Page Policy:        {:?}", config.controller.page_policy);
    println!(
        "  Refresh:            {}",
        if config.controller.refresh {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    println!("--------------------");
}

fn dump_timing(device: &Ddr4Ab) {
    println!("Timing Constraints");
    println!("--------------------");
    for level in [Level::Channel, Level::Rank] {
        for prev in Command::ALL {
            for e in device.timing().entries(level, prev) {
                println!(
                    "  {:<3} {:<5} -> {:<5} dist {} {:>5} cyc{}",
                    level.label(),
                    prev.name(),
                    e.cmd.name(),
                    e.dist,
                    e.val,
                    if e.sibling { " (sibling)" } else { "" }
                );
            }
        }
    }
    println!("--------------------");
}
