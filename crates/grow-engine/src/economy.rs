//! Cost accounting: the tick accumulator and ledger recording.
//!
//! All purchase prices are scaled by the world's `item_price_multiplier`
//! before they hit the ledger.  Per-tick totals flow through a
//! [`TickAccumulator`]; [`finalize_tick`] folds the accumulator into the
//! running financial summary and emits a `finance.tick` event.

use grow_core::{IdGenerator, Tick, TickLength};
use grow_catalog::BlueprintRepository;
use grow_events::{EventCollector, EventLevel};
use grow_state::{LedgerCategory, LedgerEntry, LedgerEntryType, WorldState};
use serde_json::json;

/// Amounts below this are treated as zero (multiplier rounding noise).
const AMOUNT_TOLERANCE: f64 = 1e-9;

/// Totals gathered while processing one tick (or one compound command).
#[derive(Clone, Debug, Default)]
pub struct TickAccumulator {
    pub revenue: f64,
    pub expenses: f64,
    pub capex: f64,
    pub opex: f64,
    pub maintenance: f64,
    pub energy_kwh: f64,
    pub water_liters: f64,
    pub nutrients_grams: f64,
}

impl TickAccumulator {
    pub fn new() -> Self {
        Self::default()
    }
}

// ── Ledger recording ──────────────────────────────────────────────────────────

/// Record an expense: ledger entry, cash decrement, accumulator update.
pub fn record_expense(
    state: &mut WorldState,
    ids: &IdGenerator,
    amount: f64,
    category: LedgerCategory,
    description: impl Into<String>,
    tick: Tick,
    timestamp_unix_ms: i64,
    accumulator: &mut TickAccumulator,
) {
    if !(amount.is_finite() && amount > AMOUNT_TOLERANCE) {
        return;
    }
    state.finances.cash_on_hand -= amount;
    accumulator.expenses += amount;
    match category {
        LedgerCategory::Device | LedgerCategory::Structure | LedgerCategory::Capital => {
            accumulator.capex += amount;
        }
        LedgerCategory::Maintenance => {
            accumulator.maintenance += amount;
            accumulator.opex += amount;
        }
        _ => accumulator.opex += amount,
    }
    state.finances.ledger.push(LedgerEntry {
        id: ids.next("ledger"),
        tick,
        timestamp_unix_ms,
        amount,
        entry_type: LedgerEntryType::Expense,
        category,
        description: description.into(),
    });
}

/// Record an income: ledger entry, cash increment, accumulator update.
pub fn record_income(
    state: &mut WorldState,
    ids: &IdGenerator,
    amount: f64,
    category: LedgerCategory,
    description: impl Into<String>,
    tick: Tick,
    timestamp_unix_ms: i64,
    accumulator: &mut TickAccumulator,
) {
    if !(amount.is_finite() && amount > AMOUNT_TOLERANCE) {
        return;
    }
    state.finances.cash_on_hand += amount;
    accumulator.revenue += amount;
    state.finances.ledger.push(LedgerEntry {
        id: ids.next("ledger"),
        tick,
        timestamp_unix_ms,
        amount,
        entry_type: LedgerEntryType::Income,
        category,
        description: description.into(),
    });
}

/// Charge the capital cost of `quantity` devices of one blueprint.
///
/// Unpriced blueprints cost nothing (the catalog treats missing prices as
/// "free"); returns the charged total.
pub fn record_device_purchase(
    state: &mut WorldState,
    repository: &BlueprintRepository,
    ids: &IdGenerator,
    blueprint_id: &str,
    quantity: u32,
    description: impl Into<String>,
    tick: Tick,
    timestamp_unix_ms: i64,
    accumulator: &mut TickAccumulator,
    events: &mut EventCollector,
) -> f64 {
    let Some(price) = repository.device_price(blueprint_id) else {
        return 0.0;
    };
    if quantity == 0 {
        return 0.0;
    }
    let base_cost = price.capital_expenditure.max(0.0) * quantity as f64;
    let multiplier = state.metadata.economics.item_price_multiplier;
    let total = base_cost * multiplier;
    if total <= AMOUNT_TOLERANCE {
        return 0.0;
    }

    record_expense(
        state,
        ids,
        total,
        LedgerCategory::Device,
        description,
        tick,
        timestamp_unix_ms,
        accumulator,
    );
    events.queue(
        "finance.devicePurchased",
        json!({
            "blueprintId": blueprint_id,
            "quantity": quantity,
            "unitCost": price.capital_expenditure,
            "totalCost": total,
        }),
        EventLevel::Info,
    );
    total
}

/// Fold accumulator totals into the world summary without tick settlement
/// (used by compound commands such as zone duplication).
pub fn apply_accumulator(state: &mut WorldState, accumulator: &TickAccumulator) {
    let summary = &mut state.finances.summary;
    summary.total_revenue += accumulator.revenue;
    summary.total_expenses += accumulator.expenses;
    summary.total_maintenance += accumulator.maintenance;
    summary.net_income = summary.total_revenue - summary.total_expenses;
}

// ── Tick settlement ───────────────────────────────────────────────────────────

/// Accrue structure and room rent for one tick.
pub fn accrue_rent(
    state: &mut WorldState,
    ids: &IdGenerator,
    tick: Tick,
    tick_length: TickLength,
    timestamp_unix_ms: i64,
    accumulator: &mut TickAccumulator,
) {
    let hours = tick_length.as_hours();
    if hours <= 0.0 {
        return;
    }
    let room_rate = state.metadata.economics.rent_per_sqm_room_per_tick;

    let charges: Vec<(String, f64)> = state
        .structures
        .iter()
        .map(|structure| {
            let room_area: f64 = structure.rooms.iter().map(|r| r.area).sum();
            let amount = structure.rent_per_hour * hours + room_area * room_rate;
            (structure.name.clone(), amount)
        })
        .collect();

    for (name, amount) in charges {
        record_expense(
            state,
            ids,
            amount,
            LedgerCategory::Rent,
            format!("Rent: {name}"),
            tick,
            timestamp_unix_ms,
            accumulator,
        );
    }
}

/// Charge the utilities the accumulator gathered during the device phase.
pub fn settle_utilities(
    state: &mut WorldState,
    ids: &IdGenerator,
    tick: Tick,
    timestamp_unix_ms: i64,
    accumulator: &mut TickAccumulator,
) {
    let prices = state.finances.utility_prices;
    let base = accumulator.energy_kwh * prices.price_per_kwh
        + accumulator.water_liters * prices.price_per_liter_water
        + accumulator.nutrients_grams * prices.price_per_gram_nutrients;
    let total = base * state.metadata.economics.item_price_multiplier;
    record_expense(
        state,
        ids,
        total,
        LedgerCategory::Utilities,
        "Utility consumption",
        tick,
        timestamp_unix_ms,
        accumulator,
    );
}

/// Fold the accumulator into the summary, stamp the per-tick figures, and
/// emit `finance.tick`.
pub fn finalize_tick(
    state: &mut WorldState,
    tick: Tick,
    accumulator: &TickAccumulator,
    events: &mut EventCollector,
) {
    let summary = &mut state.finances.summary;
    summary.total_revenue += accumulator.revenue;
    summary.total_expenses += accumulator.expenses;
    summary.total_maintenance += accumulator.maintenance;
    summary.last_tick_revenue = accumulator.revenue;
    summary.last_tick_expenses = accumulator.expenses;
    summary.net_income = summary.total_revenue - summary.total_expenses;

    events.queue(
        "finance.tick",
        json!({
            "tick": tick.0,
            "revenue": accumulator.revenue,
            "expenses": accumulator.expenses,
            "energyKwh": accumulator.energy_kwh,
            "waterLiters": accumulator.water_liters,
            "cashOnHand": state.finances.cash_on_hand,
        }),
        EventLevel::Info,
    );
}
