//! Full-pipeline integration tests for the six concrete scenarios in
//! spec.md §8, run through the public `AssignmentEngine`/`LotDeduper`
//! surface rather than any single phase in isolation.

use chrono::{NaiveDate, NaiveTime};
use lot_dispatch::domain::{
    AssignabilityStatus, FixedPinRegistry, Inspector, Lot, LotIdentity, ProductMaster,
    ProductProcessRate, Provenance, ShippingDate, SkillLevel, SkillMatrix, SkillRow,
    VacationSchedule,
};
use lot_dispatch::master::MasterSnapshot;
use lot_dispatch::{AssignmentEngine, DedupOptions, EngineConfig, LotDeduper};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 7, 29).unwrap()
}

fn inspector_with_hours(id: &str, hours: u32) -> Inspector {
    Inspector {
        inspector_id: id.into(),
        name: id.into(),
        shift_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        shift_end: NaiveTime::from_hms_opt(8 + hours, 0, 0).unwrap(),
        is_new_product_team_member: false,
    }
}

fn lot(product: &str, id: &str, qty: i64, shipping_date: NaiveDate) -> Lot {
    Lot {
        identity: LotIdentity::ProductionLotId(id.into()),
        product_number: product.into(),
        product_name: "Widget".into(),
        customer: "Acme".into(),
        shipping_date: ShippingDate::Date(shipping_date),
        lot_quantity: qty,
        instruction_date: Some(shipping_date),
        machine: Some("M1".into()),
        current_process_number: Some("10".into()),
        current_process_name: "Final inspection".into(),
        secondary_process: None,
        provenance: Provenance::Normal,
    }
}

fn products_60s_per_unit() -> ProductMaster {
    ProductMaster::from_rows(vec![ProductProcessRate {
        product_number: "P1".into(),
        process_number: "10".into(),
        seconds_per_unit: 60.0,
    }])
}

#[test]
fn scenario_a_simple_split_pins_skill_three_and_fills_least_loaded() {
    let snapshot = MasterSnapshot {
        products: products_60s_per_unit(),
        inspectors: vec![
            inspector_with_hours("A", 8),
            inspector_with_hours("B", 8),
            inspector_with_hours("C", 8),
        ],
        skills: SkillMatrix::from_rows(vec![
            SkillRow { product_number: "P1".into(), process_number: None, inspector_id: "A".into(), level: SkillLevel::new(3).unwrap() },
            SkillRow { product_number: "P1".into(), process_number: None, inspector_id: "B".into(), level: SkillLevel::new(1).unwrap() },
            SkillRow { product_number: "P1".into(), process_number: None, inspector_id: "C".into(), level: SkillLevel::new(2).unwrap() },
        ]),
        vacations: VacationSchedule::from_absences(vec![("C".to_string(), today())]),
    };
    let pins = FixedPinRegistry::default();
    let config = EngineConfig::default();

    // C is on vacation today, so it must be filtered out of the pool.
    let engine_input = vec![lot("P1", "L1", 360, today())];
    let engine = AssignmentEngine::new(&snapshot, &pins, &config);
    let result = engine.run(engine_input, today());

    assert_eq!(result.rows.len(), 1);
    let row = &result.rows[0];
    assert_eq!(row.assignability_status, AssignabilityStatus::Assigned);
    assert_eq!(row.crew_size(), 2);
    assert_eq!(row.divided_time, 3.0);
    let ids: Vec<&str> = row.slots.iter().map(|m| m.inspector_id.as_str()).collect();
    assert!(ids.contains(&"A"));
    assert!(ids.contains(&"B"));
    assert!(!ids.contains(&"C"));
}

#[test]
fn scenario_b_same_part_cap_spreads_two_lots_across_two_inspectors() {
    let snapshot = MasterSnapshot {
        products: products_60s_per_unit(),
        inspectors: vec![inspector_with_hours("A", 8), inspector_with_hours("B", 8)],
        skills: SkillMatrix::from_rows(vec![
            SkillRow { product_number: "P1".into(), process_number: None, inspector_id: "A".into(), level: SkillLevel::new(1).unwrap() },
            SkillRow { product_number: "P1".into(), process_number: None, inspector_id: "B".into(), level: SkillLevel::new(1).unwrap() },
        ]),
        vacations: VacationSchedule::default(),
    };
    let pins = FixedPinRegistry::default();
    let config = EngineConfig::default();

    // Each lot is 3.0h (180 units * 60s / 3600). Two lots on the same
    // product would push one inspector to 6.0h > H_product=4.0 if both
    // landed on the same person, so the engine must split them.
    let lots = vec![
        lot("P1", "L1", 180, today()),
        lot("P1", "L2", 180, today()),
    ];
    let engine = AssignmentEngine::new(&snapshot, &pins, &config);
    let result = engine.run(lots, today());

    assert_eq!(result.rows.len(), 2);
    assert!(result.rows.iter().all(|r| r.assignability_status == AssignabilityStatus::Assigned));
    let first_inspector = result.rows[0].slots[0].inspector_id.clone();
    let second_inspector = result.rows[1].slots[0].inspector_id.clone();
    assert_ne!(first_inspector, second_inspector);

    for inspector_id in ["A", "B"] {
        assert!(result.final_state.product_hours_of(inspector_id, "P1") <= config.h_product + 1e-9);
    }
}

#[test]
fn scenario_c_dedup_priority_keeps_same_day_cleaning_row() {
    let far_future = NaiveDate::from_ymd_opt(2099, 12, 31).unwrap();
    let mut cleaning = lot("P1", "", 10, today());
    cleaning.shipping_date = ShippingDate::SameDayCleaning;
    cleaning.provenance = Provenance::Cleaning;
    cleaning.identity = LotIdentity::Composite {
        product_number: "P1".into(),
        machine: Some("M1".into()),
        instruction_date: Some(today()),
        cleaning_instruction_row: Some(1),
    };

    let mut future = lot("P1", "", 10, far_future);
    future.identity = LotIdentity::Composite {
        product_number: "P1".into(),
        machine: Some("M1".into()),
        instruction_date: Some(today()),
        cleaning_instruction_row: None,
    };

    let deduper = LotDeduper::new(DedupOptions::default());
    let result = deduper.dedupe(vec![cleaning, future], today());

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].provenance, Provenance::Cleaning);
}

#[test]
fn scenario_d_repair_swaps_over_part_inspector_off_the_later_lot() {
    use lot_dispatch::domain::{AssignmentRow, CrewMember, DailyState};
    use lot_dispatch::engine::{detect_violations, repair_row};

    // Phase 1's own per-assignment filters never let a fresh pick exceed a
    // cap, so an over-part state can only arise from something outside
    // Phase 1's control (e.g. a seat-chart re-ingest). Build that state
    // directly, the way repair's own unit tests do, and drive it through
    // the public detect/repair entry points.
    let snapshot = MasterSnapshot {
        products: ProductMaster::default(),
        inspectors: vec![inspector_with_hours("X", 8), inspector_with_hours("Y", 8), inspector_with_hours("Z", 8)],
        skills: SkillMatrix::from_rows(vec![
            SkillRow { product_number: "Q".into(), process_number: None, inspector_id: "X".into(), level: SkillLevel::new(2).unwrap() },
            SkillRow { product_number: "Q".into(), process_number: None, inspector_id: "Y".into(), level: SkillLevel::new(1).unwrap() },
            SkillRow { product_number: "Q".into(), process_number: None, inspector_id: "Z".into(), level: SkillLevel::new(2).unwrap() },
        ]),
        vacations: VacationSchedule::default(),
    };
    let config = EngineConfig::default();
    let earlier = today();
    let later = today() + chrono::Duration::days(1);

    let make_row = |ship_date: NaiveDate| AssignmentRow {
        lot: lot("Q", "L", 100, ship_date),
        inspection_time_hours: 2.5,
        required_crew_size: 1,
        divided_time: 2.5,
        slots: vec![CrewMember { inspector_id: "X".into(), name: "X".into(), skill_level: Some(2), is_new_team_pick: false }],
        assignability_status: AssignabilityStatus::Assigned,
    };
    let mut rows = vec![make_row(earlier), make_row(later)];

    let violations = detect_violations(&rows, &snapshot, &config, today());
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].inspector_id, "X");
    // The later-ship-date row is the one picked for repair.
    assert_eq!(violations[0].row_index, 1);

    let mut state = DailyState::recompute_from_rows(&rows, today());
    repair_row(&violations[0], &mut rows[1], &snapshot, &mut state, &config, today());

    assert_ne!(rows[1].slots[0].inspector_id, "X");
    assert!(detect_violations(&rows, &snapshot, &config, today()).iter().all(|v| v.inspector_id != "X"));
}

#[test]
fn scenario_e_single_candidate_crew_of_two_is_unassigned_capacity() {
    let snapshot = MasterSnapshot {
        products: products_60s_per_unit(),
        inspectors: vec![inspector_with_hours("A", 8)],
        skills: SkillMatrix::from_rows(vec![SkillRow {
            product_number: "P1".into(),
            process_number: None,
            inspector_id: "A".into(),
            level: SkillLevel::new(2).unwrap(),
        }]),
        vacations: VacationSchedule::default(),
    };
    let pins = FixedPinRegistry::default();
    let config = EngineConfig::default();

    // 360 units * 60s / 3600 = 6.0h => required_crew_size 2, but only one
    // candidate inspector exists.
    let engine = AssignmentEngine::new(&snapshot, &pins, &config);
    let result = engine.run(vec![lot("P1", "L1", 360, today())], today());

    assert_eq!(result.rows.len(), 1);
    let row = &result.rows[0];
    assert_eq!(row.assignability_status, AssignabilityStatus::UnassignedCapacity);
    assert!(row.slots.is_empty());
    assert_eq!(row.divided_time, 0.0);
}

#[test]
fn scenario_f_fairness_rebalance_narrows_the_spread() {
    let ids = ["A", "B", "C", "D", "E"];
    let snapshot = MasterSnapshot {
        products: ProductMaster::from_rows(vec![ProductProcessRate {
            product_number: "P1".into(),
            process_number: "10".into(),
            seconds_per_unit: 60.0,
        }]),
        inspectors: ids.iter().map(|id| inspector_with_hours(id, 12)).collect(),
        skills: SkillMatrix::from_rows(ids.iter().map(|id| SkillRow {
            product_number: "P1".into(),
            process_number: None,
            inspector_id: id.to_string(),
            level: SkillLevel::new(2).unwrap(),
        })),
        vacations: VacationSchedule::default(),
    };
    let pins = FixedPinRegistry::default();
    let config = EngineConfig::default();

    // 150 units * 60s / 3600 = 2.5h per lot, under H_required so each lot
    // keeps crew_size 1. Eight lots give Phase 1's least-loaded picker and
    // Phase 3's rebalance enough lots to work with across five inspectors.
    let lots: Vec<Lot> = (0..8)
        .map(|i| lot("P1", &format!("L{i}"), 150, today()))
        .collect();
    let engine = AssignmentEngine::new(&snapshot, &pins, &config);
    let result = engine.run(lots, today());

    let totals: Vec<f64> = ids.iter().map(|id| result.final_state.daily_hours_of(id)).collect();
    let max = totals.iter().cloned().fold(f64::MIN, f64::max);
    let min = totals.iter().cloned().fold(f64::MAX, f64::min);
    let mean = totals.iter().sum::<f64>() / totals.len() as f64;
    assert!(max - min <= config.imbalance_threshold_ratio * mean + 1e-6);
}
