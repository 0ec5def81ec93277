//! Finances: cash, the append-only ledger, and the running summary.

use grow_core::Tick;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LedgerEntryType {
    Income,
    Expense,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LedgerCategory {
    Capital,
    Structure,
    Device,
    Inventory,
    Rent,
    Utilities,
    Maintenance,
    Sales,
    Other,
}

/// One ledger line.  Entries are append-only; corrections are new entries.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub tick: Tick,
    pub timestamp_unix_ms: i64,
    pub amount: f64,
    pub entry_type: LedgerEntryType,
    pub category: LedgerCategory,
    pub description: String,
}

#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub total_maintenance: f64,
    pub net_income: f64,
    pub last_tick_revenue: f64,
    pub last_tick_expenses: f64,
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilityPrices {
    pub price_per_kwh: f64,
    pub price_per_liter_water: f64,
    pub price_per_gram_nutrients: f64,
}

impl Default for UtilityPrices {
    fn default() -> Self {
        Self {
            price_per_kwh: 0.32,
            price_per_liter_water: 0.002,
            price_per_gram_nutrients: 0.05,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finances {
    pub cash_on_hand: f64,
    pub ledger: Vec<LedgerEntry>,
    pub summary: FinancialSummary,
    pub utility_prices: UtilityPrices,
}

impl Finances {
    pub fn with_capital(initial_capital: f64) -> Self {
        Self {
            cash_on_hand: initial_capital.max(0.0),
            ledger: Vec::new(),
            summary: FinancialSummary::default(),
            utility_prices: UtilityPrices::default(),
        }
    }

    /// `true` if `amount` can be spent without going negative.
    #[inline]
    pub fn can_afford(&self, amount: f64) -> bool {
        self.cash_on_hand + crate::geometry::EPSILON >= amount
    }
}
