//! Integration tests for the timing table and the timing tracker.

use ddr4_ab::common::{Address, Command, Level};
use ddr4_ab::dram::{Ddr4Ab, Delay, DeviceTree, RefreshMode, TimingTable, TimingTracker};

/// Creates the default part with one channel and `ranks` ranks.
fn setup(ranks: usize) -> (Ddr4Ab, DeviceTree) {
    let mut device = Ddr4Ab::configure("DDR4_8Gb_x8", "DDR4_3200", RefreshMode::X1).unwrap();
    device.set_channel_number(1);
    device.set_rank_number(ranks);
    let tree = device.build_tree().unwrap();
    (device, tree)
}

fn delay(cycles: u64, dist: usize) -> Delay {
    Delay { cycles, dist }
}

/// Tests the activate spacing rules, including the four-activate window.
#[test]
fn test_act_to_act_delays() {
    let (device, _) = setup(1);
    let s = &device.spec().speed_entry;
    let delays = device.minimum_delay(Level::Rank, Command::Act, Command::Act, false);
    assert_eq!(
        delays,
        vec![delay(s.n_rrdl.max(s.n_rc), 1), delay(s.n_faw, 4)]
    );
    assert_eq!(s.n_faw, 34);
}

/// Tests representative rank and channel rules.
#[test]
fn test_rank_and_channel_rules() {
    let (device, _) = setup(1);
    let s = &device.spec().speed_entry;

    let d = device.minimum_delay(Level::Rank, Command::Act, Command::Rd, false);
    assert_eq!(d, vec![delay(s.n_rcd, 1)]);
    let d = device.minimum_delay(Level::Rank, Command::Ref, Command::Act, false);
    assert_eq!(d, vec![delay(s.n_rfc, 1)]);
    let d = device.minimum_delay(Level::Rank, Command::Rd, Command::Wr, false);
    assert_eq!(d, vec![delay(s.n_cl + s.n_bl + 2 - s.n_cwl, 1)]);
    let d = device.minimum_delay(Level::Rank, Command::Wr, Command::Rd, false);
    assert_eq!(d, vec![delay(s.n_cwl + s.n_bl + s.n_wtrl, 1)]);
    let d = device.minimum_delay(Level::Rank, Command::Sre, Command::Srx, false);
    assert_eq!(d, vec![delay(s.n_ckesr, 1)]);
    let d = device.minimum_delay(Level::Channel, Command::Rd, Command::Rda, false);
    assert_eq!(d, vec![delay(s.n_bl, 1)]);
}

/// Tests that sibling-rank rules are kept apart and the largest binds.
#[test]
fn test_sibling_rules() {
    let (device, _) = setup(2);
    let s = &device.spec().speed_entry;

    let d = device.minimum_delay(Level::Rank, Command::Rd, Command::Wr, true);
    let expected = (s.n_bl + s.n_rtrs).max(s.n_cl + s.n_bl + s.n_rtrs - s.n_cwl);
    assert_eq!(d, vec![delay(expected, 1)]);

    let d = device.minimum_delay(Level::Rank, Command::Rd, Command::Rd, true);
    assert_eq!(d, vec![delay(s.n_bl + s.n_rtrs, 1)]);
    assert!(device
        .minimum_delay(Level::Rank, Command::Act, Command::Act, true)
        .is_empty());
}

/// Tests that unconstrained pairs and lower levels have no rules.
#[test]
fn test_unconstrained_pairs() {
    let (device, _) = setup(1);
    assert!(device
        .minimum_delay(Level::Rank, Command::Pde, Command::Act, false)
        .is_empty());
    for level in [Level::BankGroup, Level::Bank, Level::Row, Level::Column] {
        for cmd in Command::ALL {
            assert!(device.timing().entries(level, cmd).is_empty());
        }
    }
}

/// Tests the rolling four-activate window on a hand-built table.
#[test]
fn test_four_activate_window() {
    let (_, tree) = setup(1);
    let mut table = TimingTable::empty();
    table.add(Level::Rank, Command::Act, Command::Act, 1, 2);
    table.add(Level::Rank, Command::Act, Command::Act, 4, 20);

    let mut tracker = TimingTracker::new(&tree, &table);
    let addrs = [
        Address::column(0, 0, 0, 0, 1, 0),
        Address::column(0, 0, 1, 0, 1, 0),
        Address::column(0, 0, 2, 0, 1, 0),
        Address::column(0, 0, 3, 0, 1, 0),
    ];
    for (i, addr) in addrs.iter().enumerate() {
        let clk = 2 * i as u64;
        assert!(tracker.check(&tree, Command::Act, addr, clk));
        tracker.update(&tree, &table, Command::Act, addr, clk);
    }

    let fifth = Address::column(0, 0, 0, 1, 1, 0);
    assert!(!tracker.check(&tree, Command::Act, &fifth, 8));
    assert!(!tracker.check(&tree, Command::Act, &fifth, 19));
    assert!(tracker.check(&tree, Command::Act, &fifth, 20));

    // the window rolls forward from the second activate
    tracker.update(&tree, &table, Command::Act, &fifth, 20);
    assert!(!tracker.check(&tree, Command::Act, &fifth, 21));
    assert!(tracker.check(&tree, Command::Act, &fifth, 22));
}

/// Tests activate-to-read spacing on the real table.
#[test]
fn test_tracker_act_to_read() {
    let (device, tree) = setup(1);
    let n_rcd = device.spec().speed_entry.n_rcd;
    let mut tracker = TimingTracker::new(&tree, device.timing());
    let addr = Address::column(0, 0, 0, 0, 5, 0);

    tracker.update(&tree, device.timing(), Command::Act, &addr, 100);
    assert!(!tracker.check(&tree, Command::Rd, &addr, 100 + n_rcd - 1));
    assert!(tracker.check(&tree, Command::Rd, &addr, 100 + n_rcd));

    let rank = tree.rank(0, 0).unwrap();
    assert_eq!(tracker.next_issue(rank, Command::Rd), 100 + n_rcd);
}

/// Tests read spacing on the same rank and on a sibling rank.
#[test]
fn test_tracker_sibling_ranks() {
    let (device, tree) = setup(2);
    let s = device.spec().speed_entry;
    let mut tracker = TimingTracker::new(&tree, device.timing());
    let rank0 = Address::column(0, 0, 0, 0, 5, 0);
    let rank1 = Address::column(0, 1, 0, 0, 5, 0);

    tracker.update(&tree, device.timing(), Command::Rd, &rank0, 100);

    // same rank: long CAS-to-CAS
    assert!(!tracker.check(&tree, Command::Rd, &rank0, 100 + s.n_ccdl - 1));
    assert!(tracker.check(&tree, Command::Rd, &rank0, 100 + s.n_ccdl));

    // other rank: burst plus rank switch
    let rd = 100 + s.n_bl + s.n_rtrs;
    assert!(!tracker.check(&tree, Command::Rd, &rank1, rd - 1));
    assert!(tracker.check(&tree, Command::Rd, &rank1, rd));

    let wr = 100 + s.n_cl + s.n_bl + s.n_rtrs - s.n_cwl;
    assert!(!tracker.check(&tree, Command::Wr, &rank1, wr - 1));
    assert!(tracker.check(&tree, Command::Wr, &rank1, wr));
}

/// Tests that the tracker rejects addresses outside the tree.
#[test]
fn test_tracker_unknown_channel() {
    let (device, tree) = setup(1);
    let tracker = TimingTracker::new(&tree, device.timing());
    assert!(!tracker.check(&tree, Command::Ref, &Address::rank(3, 0), 0));
    assert!(tracker.check(&tree, Command::Ref, &Address::rank(0, 0), 0));
}

/// Tests that an out-of-range rank, bank group or bank is never legal.
#[test]
fn test_tracker_out_of_range_index() {
    let (device, tree) = setup(2);
    let tracker = TimingTracker::new(&tree, device.timing());
    assert!(!tracker.check(&tree, Command::Ref, &Address::rank(0, 2), 0));
    assert!(!tracker.check(&tree, Command::Rd, &Address::column(0, 5, 0, 0, 0, 0), 0));
    assert!(!tracker.check(&tree, Command::Rd, &Address::column(0, 0, 4, 0, 0, 0), 0));
    assert!(!tracker.check(&tree, Command::Rd, &Address::column(0, 0, 0, 4, 0, 0), 0));
    assert!(tracker.check(&tree, Command::Rd, &Address::column(0, 1, 3, 3, 0, 0), 0));
}

/// Tests that a rule with no past issue to count from is dropped.
#[test]
fn test_zero_dist_rule_dropped() {
    let (device, tree) = setup(1);
    let mut timing = device.timing().clone();
    timing.add(Level::Rank, Command::Act, Command::Rd, 0, 1_000);
    assert!(timing
        .entries(Level::Rank, Command::Act)
        .iter()
        .all(|e| e.dist > 0));

    let mut tracker = TimingTracker::new(&tree, &timing);
    let addr = Address::column(0, 0, 0, 0, 5, 0);
    tracker.update(&tree, &timing, Command::Act, &addr, 10);
    let s = &device.spec().speed_entry;
    assert!(tracker.check(&tree, Command::Rd, &addr, 10 + s.n_rcd));
}
