//! Simulation statistics collection and reporting.
//!
//! Tracks command counts, request outcomes, row buffer behavior and read
//! latency during a trace replay.

use std::time::Instant;

use serde::Serialize;

use crate::common::Command;

/// Simulation statistics structure tracking all performance metrics.
#[derive(Debug, Clone, Serialize)]
pub struct SimStats {
    #[serde(skip)]
    start_time: Instant,
    pub cycles: u64,

    /// Issued commands, indexed by [`Command::index`].
    pub commands: [u64; Command::COUNT],

    pub reads: u64,
    pub writes: u64,
    pub refreshes: u64,
    pub power_downs: u64,
    pub self_refreshes: u64,

    pub row_hits: u64,
    pub row_misses: u64,
    pub row_conflicts: u64,

    /// Sum of read latencies in cycles.
    pub read_latency_sum: u64,
    pub stall_cycles: u64,
}

impl Default for SimStats {
    /// Returns the default value.
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            commands: [0; Command::COUNT],
            reads: 0,
            writes: 0,
            refreshes: 0,
            power_downs: 0,
            self_refreshes: 0,
            row_hits: 0,
            row_misses: 0,
            row_conflicts: 0,
            read_latency_sum: 0,
            stall_cycles: 0,
        }
    }
}

impl SimStats {
    /// Counts one issued command.
    pub fn record_command(&mut self, command: Command) {
        self.commands[command.index()] += 1;
    }

    /// Number of times `command` was issued.
    pub fn command_count(&self, command: Command) -> u64 {
        self.commands[command.index()]
    }

    /// Mean read latency in cycles, zero before any read.
    pub fn avg_read_latency(&self) -> f64 {
        if self.reads == 0 {
            0.0
        } else {
            self.read_latency_sum as f64 / self.reads as f64
        }
    }

    /// Serializes the statistics as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Prints a formatted summary of all simulation statistics.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = if self.cycles == 0 { 1 } else { self.cycles };
        let accesses = self.row_hits + self.row_misses + self.row_conflicts;
        let pct = |n: u64, d: u64| {
            if d == 0 {
                0.0
            } else {
                (n as f64 / d as f64) * 100.0
            }
        };

        println!("\n==========================================================");
        println!("DDR4 ALL-BANKS SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {:.4} s", seconds);
        println!("sim_cycles               {}", self.cycles);
        println!(
            "stall_cycles             {} ({:.2}%)",
            self.stall_cycles,
            pct(self.stall_cycles, cyc)
        );
        println!("----------------------------------------------------------");
        println!("REQUESTS");
        println!("  req.read               {}", self.reads);
        println!("  req.write              {}", self.writes);
        println!("  req.refresh            {}", self.refreshes);
        println!("  req.power_down         {}", self.power_downs);
        println!("  req.self_refresh       {}", self.self_refreshes);
        println!("  read_latency.avg       {:.2}", self.avg_read_latency());
        println!("----------------------------------------------------------");
        println!("ROW BUFFER");
        println!(
            "  row.hit                {} ({:.2}%)",
            self.row_hits,
            pct(self.row_hits, accesses)
        );
        println!(
            "  row.miss               {} ({:.2}%)",
            self.row_misses,
            pct(self.row_misses, accesses)
        );
        println!(
            "  row.conflict           {} ({:.2}%)",
            self.row_conflicts,
            pct(self.row_conflicts, accesses)
        );
        println!("----------------------------------------------------------");
        println!("COMMANDS");
        for cmd in Command::ALL {
            println!("  cmd.{:<18} {}", cmd.name(), self.command_count(cmd));
        }
        println!("==========================================================");
    }
}
