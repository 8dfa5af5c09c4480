//! In-Order Request Controller.
//!
//! Serves requests one at a time against a single device tree. Each cycle
//! the controller asks the device which command the current request needs
//! next, issues it if the timing tracker allows, and otherwise waits. A
//! request completes when its own command (RD, WR, REF, PDE or SRE, or the
//! auto-precharge forms under a closed-page policy) is issued.
//!
//! Row buffer outcomes are classified on arrival:
//! * **Hit:** the requested row is already open.
//! * **Conflict:** a different row is open and must be precharged.
//! * **Miss:** the bank is closed and must be activated.

use tracing::{debug, trace};

use crate::common::{Address, Command, DramError, Level, RequestType, Result, State};
use crate::config::{Config, ControllerConfig, PagePolicy};
use crate::dram::{Ddr4Ab, DeviceTree, TimingTracker};
use crate::sim::Request;
use crate::stats::SimStats;

/// Cycle-level controller owning one device instance.
pub struct Controller {
    device: Ddr4Ab,
    tree: DeviceTree,
    tracker: TimingTracker,
    page_policy: PagePolicy,
    refresh: bool,
    max_stall_cycles: u64,
    clk: u64,
    next_refresh: u64,
    /// Statistics gathered so far.
    pub stats: SimStats,
}

impl Controller {
    /// Creates a controller with a fresh tree for `device`.
    ///
    /// # Errors
    ///
    /// Fails if the device's channel or rank count is zero.
    pub fn new(device: Ddr4Ab, config: &ControllerConfig) -> Result<Self> {
        let tree = device.build_tree()?;
        let tracker = TimingTracker::new(&tree, device.timing());
        let next_refresh = device.spec().speed_entry.n_refi;
        Ok(Self {
            device,
            tree,
            tracker,
            page_policy: config.page_policy,
            refresh: config.refresh,
            max_stall_cycles: config.max_stall_cycles,
            clk: 0,
            next_refresh,
            stats: SimStats::default(),
        })
    }

    /// Builds device and controller from a full configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.build_device()?, &config.controller)
    }

    /// The device engine.
    pub fn device(&self) -> &Ddr4Ab {
        &self.device
    }

    /// The device tree in its current state.
    pub fn tree(&self) -> &DeviceTree {
        &self.tree
    }

    /// The timing tracker in its current state.
    pub fn tracker(&self) -> &TimingTracker {
        &self.tracker
    }

    /// Current cycle.
    pub fn clk(&self) -> u64 {
        self.clk
    }

    /// Serves every request in order.
    pub fn run(&mut self, requests: &[Request]) -> Result<()> {
        for request in requests {
            self.serve(request)?;
        }
        Ok(())
    }

    /// Serves one request, returning the cycle its command was issued.
    pub fn serve(&mut self, request: &Request) -> Result<u64> {
        if self.refresh {
            self.refresh_if_due()?;
        }

        let start = self.clk;
        let command = request.kind.translate();
        if command.is_accessing() {
            self.classify_row(command, &request.addr)?;
        }

        let issued = self.serve_command(command, &request.addr)?;

        match request.kind {
            RequestType::Read => {
                self.stats.reads += 1;
                self.stats.read_latency_sum += issued + self.device.spec().read_latency - start;
            }
            RequestType::Write => self.stats.writes += 1,
            RequestType::Refresh => self.stats.refreshes += 1,
            RequestType::PowerDown => self.stats.power_downs += 1,
            RequestType::SelfRefresh => self.stats.self_refreshes += 1,
        }
        Ok(issued)
    }

    fn classify_row(&mut self, command: Command, addr: &Address) -> Result<()> {
        if self.device.check_row_hit(&self.tree, command, addr)? {
            self.stats.row_hits += 1;
        } else if self.device.check_row_open(&self.tree, command, addr)? {
            self.stats.row_conflicts += 1;
        } else {
            self.stats.row_misses += 1;
        }
        Ok(())
    }

    /// Refreshes every rank not in self-refresh once per elapsed refresh
    /// interval.
    ///
    /// A powered-down rank exits power-down first and re-enters it after the
    /// refresh.
    fn refresh_if_due(&mut self) -> Result<()> {
        let interval = self.device.spec().speed_entry.n_refi;
        let channels = self.device.spec().count(Level::Channel);
        let ranks = self.device.spec().count(Level::Rank);

        while self.clk >= self.next_refresh {
            debug!(clk = self.clk, "refresh due");
            for ch in 0..channels {
                for ra in 0..ranks {
                    let Some(rank) = self.tree.rank(ch, ra) else {
                        continue;
                    };
                    let addr = Address::rank(ch, ra);
                    let powered_down = match self.tree.node(rank).state {
                        Some(State::SelfRefresh) => continue,
                        Some(State::ActPowerDown) | Some(State::PrePowerDown) => true,
                        _ => false,
                    };
                    if powered_down {
                        self.serve_command(Command::Pdx, &addr)?;
                    }
                    self.serve_command(Command::Ref, &addr)?;
                    self.stats.refreshes += 1;
                    if powered_down {
                        self.serve_command(Command::Pde, &addr)?;
                    }
                }
            }
            self.next_refresh += interval;
        }
        Ok(())
    }

    /// Issues prerequisites of `target` and then `target` itself.
    ///
    /// Under a closed-page policy a resolved RD or WR goes out as RDA or WRA.
    fn serve_command(&mut self, target: Command, addr: &Address) -> Result<u64> {
        let auto_precharge = self.page_policy == PagePolicy::ClosedAp;
        let mut last_progress = self.clk;
        loop {
            let mut command = self.device.decode(&self.tree, target, addr)?;
            let completes = command == target;
            if completes && auto_precharge {
                command = command.with_auto_precharge();
            }
            if self.tracker.check(&self.tree, command, addr, self.clk) {
                self.issue(command, addr)?;
                let issued = self.clk;
                self.tick();
                if completes {
                    return Ok(issued);
                }
                last_progress = issued;
                continue;
            }

            self.stats.stall_cycles += 1;
            self.tick();
            let waited = self.clk - last_progress;
            if waited > self.max_stall_cycles {
                return Err(DramError::Stalled {
                    command,
                    cycles: waited,
                });
            }
        }
    }

    fn issue(&mut self, command: Command, addr: &Address) -> Result<()> {
        trace!(clk = self.clk, %command, %addr, "issue");
        self.device.update_state(&mut self.tree, command, addr)?;
        self.tracker
            .update(&self.tree, self.device.timing(), command, addr, self.clk);
        self.stats.record_command(command);
        Ok(())
    }

    fn tick(&mut self) {
        self.clk += 1;
        self.stats.cycles = self.clk;
    }
}
