//! Finance services: inventory sales and utility price updates.

use grow_core::DomainError;
use grow_command::{CommandContext, CommandReply};
use grow_events::EventLevel;
use grow_state::{HarvestStage, LedgerCategory};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::economy::{self, TickAccumulator};

// ── Intents / results ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellInventoryIntent {
    pub lot_id: String,
    /// Grams to sell; omit to sell the whole lot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grams: Option<f64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilityPricesPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_kwh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_liter_water: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_gram_nutrients: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellInventoryResult {
    pub lot_id: String,
    pub grams_sold: f64,
    pub revenue: f64,
}

fn path(command: &str, tail: &[&str]) -> Vec<String> {
    let mut p = vec![command.to_string()];
    p.extend(tail.iter().map(|s| s.to_string()));
    p
}

// ── sellInventory ─────────────────────────────────────────────────────────────

pub fn sell_inventory(
    intent: &SellInventoryIntent,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<SellInventoryResult>, DomainError> {
    let command = ctx.command;

    let (strain_id, available, quality, stage) = {
        let batch = ctx
            .state
            .inventory
            .harvest
            .iter()
            .find(|b| b.id == intent.lot_id)
            .ok_or_else(|| {
                DomainError::not_found(
                    format!("Harvest lot {} was not found.", intent.lot_id),
                    path(command, &["lotId"]),
                )
            })?;
        (batch.strain_id.clone(), batch.weight_grams, batch.quality, batch.stage)
    };

    if stage == HarvestStage::Waste {
        return Err(DomainError::invalid_state(
            "Lot has spoiled and cannot be sold.",
            path(command, &["lotId"]),
        ));
    }

    let grams = intent.grams.unwrap_or(available);
    if grams - available > grow_state::EPSILON {
        return Err(DomainError::conflict(
            format!("Requested {grams:.1} g exceeds the lot's {available:.1} g."),
            path(command, &["grams"]),
        ));
    }

    let price_per_gram = ctx
        .repository
        .harvest_price(&strain_id)
        .map(|p| p.price_per_gram.max(0.0))
        .unwrap_or(0.0);
    let mut warnings = Vec::new();
    if price_per_gram <= 0.0 {
        warnings.push(format!("No market price on file for strain {strain_id}; sold at zero."));
    }

    let multiplier = ctx.state.metadata.economics.harvest_price_multiplier;
    let revenue = grams * price_per_gram * quality.clamp(0.0, 1.0) * multiplier;

    // Apply: shrink or remove the lot, then book the income.
    {
        let inventory = &mut ctx.state.inventory;
        if let Some(index) = inventory.harvest.iter().position(|b| b.id == intent.lot_id) {
            let remaining = inventory.harvest[index].weight_grams - grams;
            if remaining <= grow_state::EPSILON {
                inventory.harvest.remove(index);
            } else {
                inventory.harvest[index].weight_grams = remaining;
            }
        }
    }

    let timestamp = grow_core::time::unix_ms_now();
    let mut accumulator = TickAccumulator::new();
    economy::record_income(
        ctx.state,
        ctx.ids,
        revenue,
        LedgerCategory::Sales,
        format!("Harvest sale: {grams:.1} g of {strain_id}"),
        ctx.tick,
        timestamp,
        &mut accumulator,
    );
    economy::apply_accumulator(ctx.state, &accumulator);

    ctx.events.queue(
        "finance.inventorySold",
        json!({
            "lotId": intent.lot_id,
            "strainId": strain_id,
            "grams": grams,
            "revenue": revenue,
        }),
        EventLevel::Info,
    );

    Ok(CommandReply::with_warnings(
        SellInventoryResult { lot_id: intent.lot_id.clone(), grams_sold: grams, revenue },
        warnings,
    ))
}

// ── setUtilityPrices ──────────────────────────────────────────────────────────

pub fn set_utility_prices(
    patch: &UtilityPricesPatch,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<()>, DomainError> {
    let prices = &mut ctx.state.finances.utility_prices;
    if let Some(kwh) = patch.price_per_kwh {
        prices.price_per_kwh = kwh;
    }
    if let Some(water) = patch.price_per_liter_water {
        prices.price_per_liter_water = water;
    }
    if let Some(nutrients) = patch.price_per_gram_nutrients {
        prices.price_per_gram_nutrients = nutrients;
    }
    let applied = *prices;

    ctx.events.queue(
        "finance.utilityPricesUpdated",
        json!({
            "pricePerKwh": applied.price_per_kwh,
            "pricePerLiterWater": applied.price_per_liter_water,
            "pricePerGramNutrients": applied.price_per_gram_nutrients,
        }),
        EventLevel::Info,
    );

    Ok(CommandReply::empty())
}
