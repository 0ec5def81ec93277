//! Price-table record types.
//!
//! Prices are kept separate from blueprints (as in any real catalog feed) so
//! a price update never touches blueprint identity.  All prices are base
//! values; the world's `item_price_multiplier` is applied at purchase time.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodPrice {
    pub method_id: String,
    /// One-off cost of preparing a zone for this method.
    pub setup_cost: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPrice {
    pub slug: String,
    pub cost_per_unit: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstratePrice {
    pub slug: String,
    pub cost_per_liter: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePrice {
    pub blueprint_id: String,
    pub capital_expenditure: f64,
    /// Base cost of one scheduled service.
    pub maintenance_base_cost: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestPrice {
    pub strain_id: String,
    pub price_per_gram: f64,
}
