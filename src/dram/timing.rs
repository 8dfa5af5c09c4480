//! Timing Constraint Table.
//!
//! Minimum distances between commands, keyed by the level and the command
//! just issued. Each entry names a following command and the number of
//! cycles that must pass before it may be issued at the same node or, for
//! sibling entries, at the other ranks sharing the data bus.
//!
//! In all-banks mode every bank of a rank moves together, so constraints a
//! per-bank device places at bank or bank-group level (tRCD, tRAS, tRP,
//! tRRD_L, tCCD_L, tWTR_L) live at rank level. Bank groups and banks carry
//! no entries.

use serde::Serialize;

use crate::common::{Command, Level};
use crate::dram::speed::SpeedEntry;

/// One minimum-distance rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TimingEntry {
    /// Command constrained by this rule.
    pub cmd: Command,
    /// Which past issue the distance counts from: 1 for the most recent,
    /// 4 for the four-activate window.
    pub dist: usize,
    /// Minimum distance in cycles.
    pub val: u64,
    /// Applies to sibling nodes rather than the issuing node.
    pub sibling: bool,
}

/// Binding delay for one `dist` between a pair of commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Delay {
    pub cycles: u64,
    pub dist: usize,
}

/// Timing rules indexed by level and issued command.
#[derive(Clone, Debug)]
pub struct TimingTable {
    cells: [[Vec<TimingEntry>; Command::COUNT]; Level::COUNT],
}

const READS: [Command; 2] = [Command::Rd, Command::Rda];
const WRITES: [Command; 2] = [Command::Wr, Command::Wra];
const ACCESSES: [Command; 4] = [Command::Rd, Command::Rda, Command::Wr, Command::Wra];
const CLOSES: [Command; 2] = [Command::Pre, Command::Prea];

impl TimingTable {
    /// A table with no rules.
    pub fn empty() -> Self {
        Self {
            cells: std::array::from_fn(|_| std::array::from_fn(|_| Vec::new())),
        }
    }

    /// Builds the all-banks timing rules from resolved parameters.
    pub fn new(s: &SpeedEntry) -> Self {
        let mut t = Self::empty();

        // Channel: data bus occupancy
        t.add_all(Level::Channel, &READS, &READS, s.n_bl);
        t.add_all(Level::Channel, &WRITES, &WRITES, s.n_bl);

        let rank = Level::Rank;

        // CAS <-> CAS. All-banks accesses always hit the same bank group, so
        // only the long variants apply.
        t.add_all(rank, &READS, &READS, s.n_ccdl);
        t.add_all(rank, &WRITES, &WRITES, s.n_ccdl);
        t.add_all(rank, &READS, &WRITES, (s.n_cl + s.n_bl + 2).saturating_sub(s.n_cwl));
        t.add_all(rank, &WRITES, &READS, s.n_cwl + s.n_bl + s.n_wtrl);

        // CAS <-> CAS between sibling ranks
        t.add_all_sibling(rank, &READS, &READS, s.n_bl + s.n_rtrs);
        t.add_all_sibling(rank, &READS, &WRITES, s.n_bl + s.n_rtrs);
        t.add_all_sibling(
            rank,
            &READS,
            &WRITES,
            (s.n_cl + s.n_bl + s.n_rtrs).saturating_sub(s.n_cwl),
        );
        t.add_all_sibling(
            rank,
            &WRITES,
            &READS,
            (s.n_cwl + s.n_bl + s.n_rtrs).saturating_sub(s.n_cl),
        );

        // CAS <-> RAS
        t.add_all(rank, &[Command::Act], &ACCESSES, s.n_rcd);
        t.add_all(rank, &[Command::Rd], &CLOSES, s.n_rtp);
        t.add_all(rank, &[Command::Wr], &CLOSES, s.n_cwl + s.n_bl + s.n_wr);
        t.add(rank, Command::Rda, Command::Act, 1, s.n_rtp + s.n_rp);
        t.add(
            rank,
            Command::Wra,
            Command::Act,
            1,
            s.n_cwl + s.n_bl + s.n_wr + s.n_rp,
        );

        // CAS <-> PD
        t.add_all(rank, &READS, &[Command::Pde], s.n_cl + s.n_bl + 1);
        t.add(rank, Command::Wr, Command::Pde, 1, s.n_cwl + s.n_bl + s.n_wr);
        t.add(
            rank,
            Command::Wra,
            Command::Pde,
            1,
            s.n_cwl + s.n_bl + s.n_wr + 1,
        );
        t.add_all(rank, &[Command::Pdx], &ACCESSES, s.n_xp);

        // RAS <-> RAS
        t.add(rank, Command::Act, Command::Act, 1, s.n_rrdl);
        t.add(rank, Command::Act, Command::Act, 4, s.n_faw);
        t.add(rank, Command::Act, Command::Act, 1, s.n_rc);
        t.add_all(rank, &[Command::Act], &[Command::Prea, Command::Pre], s.n_ras);
        t.add_all(rank, &[Command::Prea, Command::Pre], &[Command::Act], s.n_rp);

        // RAS <-> REF
        t.add(rank, Command::Act, Command::Ref, 1, s.n_rc);
        t.add_all(rank, &CLOSES, &[Command::Ref], s.n_rp);
        t.add(rank, Command::Rda, Command::Ref, 1, s.n_rtp + s.n_rp);
        t.add(
            rank,
            Command::Wra,
            Command::Ref,
            1,
            s.n_cwl + s.n_bl + s.n_wr + s.n_rp,
        );
        t.add(rank, Command::Ref, Command::Act, 1, s.n_rfc);

        // RAS <-> PD
        t.add(rank, Command::Act, Command::Pde, 1, 1);
        t.add_all(
            rank,
            &[Command::Pdx],
            &[Command::Act, Command::Pre, Command::Prea],
            s.n_xp,
        );

        // RAS <-> SR
        t.add_all(rank, &CLOSES, &[Command::Sre], s.n_rp);
        t.add(rank, Command::Srx, Command::Act, 1, s.n_xs);

        // REF <-> REF
        t.add(rank, Command::Ref, Command::Ref, 1, s.n_rfc);

        // REF <-> PD, REF <-> SR
        t.add(rank, Command::Ref, Command::Pde, 1, 1);
        t.add(rank, Command::Pdx, Command::Ref, 1, s.n_xp);
        t.add(rank, Command::Srx, Command::Ref, 1, s.n_xs);

        // PD <-> PD, PD <-> SR
        t.add(rank, Command::Pde, Command::Pdx, 1, s.n_pd);
        t.add(rank, Command::Pdx, Command::Pde, 1, s.n_xp);
        t.add(rank, Command::Pdx, Command::Sre, 1, s.n_xp);
        t.add(rank, Command::Srx, Command::Pde, 1, s.n_xs);

        // SR <-> SR
        t.add(rank, Command::Sre, Command::Srx, 1, s.n_ckesr);
        t.add(rank, Command::Srx, Command::Sre, 1, s.n_xs);

        t
    }

    /// Appends one rule. A `dist` of 0 names no past issue and is ignored.
    pub fn add(&mut self, level: Level, prev: Command, next: Command, dist: usize, val: u64) {
        self.push(level, prev, next, dist, val, false);
    }

    /// Appends one rule for sibling nodes.
    pub fn add_sibling(&mut self, level: Level, prev: Command, next: Command, val: u64) {
        self.push(level, prev, next, 1, val, true);
    }

    fn push(&mut self, level: Level, prev: Command, cmd: Command, dist: usize, val: u64, sibling: bool) {
        if dist == 0 {
            return;
        }
        self.cells[level.index()][prev.index()].push(TimingEntry {
            cmd,
            dist,
            val,
            sibling,
        });
    }

    fn add_all(&mut self, level: Level, prevs: &[Command], nexts: &[Command], val: u64) {
        for &prev in prevs {
            for &next in nexts {
                self.add(level, prev, next, 1, val);
            }
        }
    }

    fn add_all_sibling(&mut self, level: Level, prevs: &[Command], nexts: &[Command], val: u64) {
        for &prev in prevs {
            for &next in nexts {
                self.add_sibling(level, prev, next, val);
            }
        }
    }

    /// Every rule triggered by issuing `command` at `level`.
    pub fn entries(&self, level: Level, command: Command) -> &[TimingEntry] {
        &self.cells[level.index()][command.index()]
    }

    /// Deepest issue history any rule of (`level`, `command`) looks back to.
    pub fn max_dist(&self, level: Level, command: Command) -> usize {
        self.entries(level, command)
            .iter()
            .filter(|e| !e.sibling)
            .map(|e| e.dist)
            .max()
            .unwrap_or(0)
    }

    /// Binding delays from `issued` to `next`, one per `dist`, ascending.
    ///
    /// When several rules cover the same pair and `dist` the largest one
    /// binds. An empty result means the pair is unconstrained at this level.
    pub fn minimum_delay(
        &self,
        level: Level,
        issued: Command,
        next: Command,
        sibling: bool,
    ) -> Vec<Delay> {
        let mut delays: Vec<Delay> = Vec::new();
        for e in self.entries(level, issued) {
            if e.cmd != next || e.sibling != sibling {
                continue;
            }
            match delays.iter_mut().find(|d| d.dist == e.dist) {
                Some(d) => d.cycles = d.cycles.max(e.val),
                None => delays.push(Delay {
                    cycles: e.val,
                    dist: e.dist,
                }),
            }
        }
        delays.sort_by_key(|d| d.dist);
        delays
    }
}
