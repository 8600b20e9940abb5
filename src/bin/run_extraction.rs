//! CLI entry point: reads one JSON run request from stdin, runs the full
//! shortage → dedup → assignment pipeline, and writes the result as JSON to
//! stdout. Replaces the teacher's Tauri `main.rs` now that the GUI shell is
//! out of scope — this binary exists for scripting and smoke-testing the
//! library, not as the production entry point.

use chrono::NaiveDate;
use lot_dispatch::domain::{
    FixedPinRegistry, FixedPinRule, Inspector, ProductMaster, ProductProcessRate, SkillMatrix,
    SkillRow, VacationSchedule,
};
use lot_dispatch::error::DispatchResult;
use lot_dispatch::master::MasterSnapshot;
use lot_dispatch::shortage::{
    AdvanceRegistration, CleaningRequestRow, InventoryLotRow, NonInspectionLot, ShipmentRow,
};
use lot_dispatch::{AssignmentEngine, AssignmentRow, DedupOptions, EngineConfig, LotDeduper, ShortageResolver};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{Read, Write};
use tracing::info;

#[derive(Debug, Deserialize)]
struct RunRequest {
    today: NaiveDate,

    products: Vec<ProductProcessRate>,
    inspectors: Vec<Inspector>,
    skills: Vec<SkillRow>,
    #[serde(default)]
    vacations: Vec<(String, NaiveDate)>,
    #[serde(default)]
    fixed_pins: Vec<FixedPinRule>,

    #[serde(default)]
    excluded_products: HashSet<String>,
    #[serde(default)]
    inspection_target_keywords: Vec<String>,

    #[serde(default)]
    shipments: Vec<ShipmentRow>,
    #[serde(default)]
    inventory: Vec<InventoryLotRow>,
    #[serde(default)]
    cleaning_requests: Vec<CleaningRequestRow>,
    #[serde(default)]
    advance_registrations: Vec<AdvanceRegistration>,

    #[serde(default)]
    dedup_blank_is_wildcard: Option<bool>,
    #[serde(default)]
    engine_config: Option<EngineConfig>,
}

#[derive(Debug, Serialize)]
struct RunResponse {
    rows: Vec<AssignmentRow>,
    non_inspection_lots: Vec<NonInspectionLot>,
    daily_hours: std::collections::HashMap<String, f64>,
}

fn main() -> DispatchResult<()> {
    lot_dispatch::logging::init();

    let mut raw_input = String::new();
    std::io::stdin()
        .read_to_string(&mut raw_input)
        .expect("failed to read run request from stdin");
    let request: RunRequest =
        serde_json::from_str(&raw_input).expect("run request is not valid JSON");

    let snapshot = MasterSnapshot {
        products: ProductMaster::from_rows(request.products),
        inspectors: request.inspectors,
        skills: SkillMatrix::from_rows(request.skills),
        vacations: VacationSchedule::from_absences(request.vacations),
    };
    let pins = FixedPinRegistry::from_rules(request.fixed_pins);
    let config = request.engine_config.unwrap_or_default();

    let resolver = ShortageResolver::new(request.excluded_products, request.inspection_target_keywords);
    let (lots, non_inspection_lots) = resolver.resolve(
        request.today,
        &request.shipments,
        &request.inventory,
        &request.cleaning_requests,
        &request.advance_registrations,
    );
    info!(lot_count = lots.len(), "resolved lot set");

    let dedup_options = DedupOptions {
        blank_is_wildcard: request.dedup_blank_is_wildcard.unwrap_or(true),
    };
    let lots = LotDeduper::new(dedup_options).dedupe(lots, request.today);
    info!(lot_count = lots.len(), "deduplicated lot set");

    let engine = AssignmentEngine::new(&snapshot, &pins, &config);
    let result = engine.run(lots, request.today);

    let response = RunResponse {
        rows: result.rows,
        non_inspection_lots,
        daily_hours: result.final_state.daily_hours,
    };

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, &response).expect("failed to serialize response");
    handle.write_all(b"\n").ok();

    Ok(())
}
