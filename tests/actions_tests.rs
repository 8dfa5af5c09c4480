//! Integration tests for state update actions and row-state predicates.

use ddr4_ab::common::{Address, Command, DramError, Level, State};
use ddr4_ab::dram::{Ddr4Ab, DeviceTree, RefreshMode, RowPredicateTable};

/// Creates a one-channel device with `ranks` ranks and a fresh tree.
fn setup(ranks: usize) -> (Ddr4Ab, DeviceTree) {
    let mut device = Ddr4Ab::configure("DDR4_4Gb_x16", "DDR4_2400R", RefreshMode::X1).unwrap();
    device.set_channel_number(1);
    device.set_rank_number(ranks);
    let tree = device.build_tree().unwrap();
    (device, tree)
}

fn assert_rank_closed(tree: &DeviceTree, channel: usize, rank: usize) {
    let rank = tree.rank(channel, rank).unwrap();
    for bank in tree.banks_of_rank(rank) {
        let node = tree.node(bank);
        assert_eq!(node.state, Some(State::Closed));
        assert!(node.row_state.is_empty());
    }
}

/// Tests that a fresh tree starts powered up with closed banks.
#[test]
fn test_initial_states() {
    let (_, tree) = setup(2);
    for rank in tree.ranks() {
        assert_eq!(tree.node(rank).state, Some(State::PowerUp));
        assert_eq!(tree.banks_of_rank(rank).len(), 8);
    }
    assert_rank_closed(&tree, 0, 0);
    assert_eq!(tree.node(tree.channels()[0]).state, None);
}

/// Tests that ACT on one bank opens the same row in every bank of the rank.
#[test]
fn test_activate_opens_whole_rank() {
    let (device, mut tree) = setup(1);
    device
        .update_state(&mut tree, Command::Act, &Address::column(0, 0, 1, 2, 77, 0))
        .unwrap();

    let rank = tree.rank(0, 0).unwrap();
    for bank in tree.banks_of_rank(rank) {
        assert!(device.is_row_open(&tree, bank, Command::Rd).unwrap());
        assert!(device.is_row_hit(&tree, bank, Command::Rd, 77).unwrap());
        assert!(device.is_row_hit(&tree, bank, Command::Wr, 77).unwrap());
        assert!(!device.is_row_hit(&tree, bank, Command::Rd, 78).unwrap());

        let node = tree.node(bank);
        assert_eq!(node.state, Some(State::Opened));
        assert_eq!(node.row_state.len(), 1);
        assert_eq!(node.row_state.get(&77), Some(&State::Opened));
    }
}

/// Tests that a second ACT replaces the open row everywhere.
#[test]
fn test_activate_replaces_row() {
    let (device, mut tree) = setup(1);
    let bank = tree.locate(&Address::column(0, 0, 0, 0, 0, 0), Level::Bank).unwrap();
    device.apply_completion(Level::Bank, Command::Act, &mut tree, bank, 10).unwrap();
    device.apply_completion(Level::Bank, Command::Act, &mut tree, bank, 20).unwrap();

    let rank = tree.rank(0, 0).unwrap();
    for b in tree.banks_of_rank(rank) {
        assert!(!tree.node(b).is_row_open(10));
        assert!(tree.node(b).is_row_open(20));
    }
}

/// Tests that a node addressed at the wrong level is rejected untouched.
#[test]
fn test_completion_level_mismatch() {
    let (device, mut tree) = setup(1);
    let rank = tree.rank(0, 0).unwrap();
    let result = device.apply_completion(Level::Bank, Command::Act, &mut tree, rank, 10);
    assert!(matches!(result, Err(DramError::InvalidHierarchy(_))));
    assert_rank_closed(&tree, 0, 0);

    let result = device.resolve_prerequisite(Level::Bank, Command::Rd, &tree, rank, 10);
    assert!(matches!(result, Err(DramError::InvalidHierarchy(_))));
}

/// Tests that PRE and the auto-precharge accesses close the whole rank.
#[test]
fn test_precharge_closes_whole_rank() {
    for closing in [Command::Pre, Command::Rda, Command::Wra] {
        let (device, mut tree) = setup(1);
        let addr = Address::column(0, 0, 1, 3, 5, 8);
        device.update_state(&mut tree, Command::Act, &addr).unwrap();
        device.update_state(&mut tree, closing, &addr).unwrap();
        assert_rank_closed(&tree, 0, 0);
    }
}

/// Tests that plain reads and writes leave the row open.
#[test]
fn test_access_keeps_row_open() {
    let (device, mut tree) = setup(1);
    let addr = Address::column(0, 0, 0, 1, 5, 8);
    device.update_state(&mut tree, Command::Act, &addr).unwrap();
    device.update_state(&mut tree, Command::Rd, &addr).unwrap();
    device.update_state(&mut tree, Command::Wr, &addr).unwrap();
    assert!(device.check_row_hit(&tree, Command::Rd, &addr).unwrap());
}

/// Tests that PREA on an already closed rank changes nothing.
#[test]
fn test_precharge_all_idempotent() {
    let (device, mut tree) = setup(1);
    let rank = Address::rank(0, 0);
    device.update_state(&mut tree, Command::Prea, &rank).unwrap();
    assert_rank_closed(&tree, 0, 0);
    device.update_state(&mut tree, Command::Prea, &rank).unwrap();
    assert_rank_closed(&tree, 0, 0);
    assert_eq!(tree.node(tree.rank(0, 0).unwrap()).state, Some(State::PowerUp));
}

/// Tests that a rank-wide action stays inside its rank.
#[test]
fn test_activate_does_not_cross_ranks() {
    let (device, mut tree) = setup(2);
    device
        .update_state(&mut tree, Command::Act, &Address::column(0, 1, 0, 0, 3, 0))
        .unwrap();
    assert_rank_closed(&tree, 0, 0);
    assert!(device
        .check_row_hit(&tree, Command::Rd, &Address::column(0, 1, 1, 3, 3, 0))
        .unwrap());
    assert!(!device
        .check_row_open(&tree, Command::Rd, &Address::column(0, 0, 1, 3, 3, 0))
        .unwrap());
}

/// Tests that power-down entry depends on whether rows are open.
#[test]
fn test_power_down_state_choice() {
    let (device, mut tree) = setup(1);
    let rank_addr = Address::rank(0, 0);
    let rank = tree.rank(0, 0).unwrap();

    device.update_state(&mut tree, Command::Pde, &rank_addr).unwrap();
    assert_eq!(tree.node(rank).state, Some(State::PrePowerDown));
    device.update_state(&mut tree, Command::Pdx, &rank_addr).unwrap();
    assert_eq!(tree.node(rank).state, Some(State::PowerUp));

    device
        .update_state(&mut tree, Command::Act, &Address::column(0, 0, 0, 0, 1, 0))
        .unwrap();
    device.update_state(&mut tree, Command::Pde, &rank_addr).unwrap();
    assert_eq!(tree.node(rank).state, Some(State::ActPowerDown));
    device.update_state(&mut tree, Command::Pdx, &rank_addr).unwrap();
    assert_eq!(tree.node(rank).state, Some(State::PowerUp));
}

/// Tests self-refresh entry and exit.
#[test]
fn test_self_refresh_round_trip() {
    let (device, mut tree) = setup(1);
    let rank_addr = Address::rank(0, 0);
    let rank = tree.rank(0, 0).unwrap();

    device.update_state(&mut tree, Command::Sre, &rank_addr).unwrap();
    assert_eq!(tree.node(rank).state, Some(State::SelfRefresh));
    device.update_state(&mut tree, Command::Srx, &rank_addr).unwrap();
    assert_eq!(tree.node(rank).state, Some(State::PowerUp));
}

/// Tests that refresh leaves node state untouched.
#[test]
fn test_refresh_has_no_state_effect() {
    let (device, mut tree) = setup(1);
    device.update_state(&mut tree, Command::Ref, &Address::rank(0, 0)).unwrap();
    assert_rank_closed(&tree, 0, 0);
    assert_eq!(tree.node(tree.rank(0, 0).unwrap()).state, Some(State::PowerUp));
}

/// Tests that row predicates only answer for bank-level accesses.
#[test]
fn test_row_predicate_cells() {
    let hit = RowPredicateTable::row_hit();
    let open = RowPredicateTable::row_open();
    assert!(hit.get(Level::Bank, Command::Rd).is_some());
    assert!(hit.get(Level::Bank, Command::Wr).is_some());
    assert!(hit.get(Level::Rank, Command::Rd).is_none());
    assert!(open.get(Level::Bank, Command::Act).is_none());

    let (device, tree) = setup(1);
    let rank = tree.rank(0, 0).unwrap();
    assert!(!device.is_row_hit(&tree, rank, Command::Rd, 0).unwrap());
    assert!(!device.is_row_open(&tree, rank, Command::Rd).unwrap());
}
