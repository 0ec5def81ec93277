//! `finance.*` — inventory sales and utility prices.

use grow_core::CommandError;
use grow_command::{CommandRegistry, CommandSpec, PayloadReader, Preprocess};
use grow_engine::finance::{self, SellInventoryIntent, UtilityPricesPatch};
use serde_json::Value;

use super::encode;

pub fn register(registry: &mut CommandRegistry) {
    registry.register(
        "finance",
        "sellInventory",
        CommandSpec::new("finance.sellInventory", Preprocess::None, |payload, ctx| {
            let intent = parse_sell_inventory(&payload)?;
            encode(finance::sell_inventory(&intent, ctx)?)
        }),
    );
    registry.register(
        "finance",
        "setUtilityPrices",
        CommandSpec::new("finance.setUtilityPrices", Preprocess::None, |payload, ctx| {
            let patch = parse_set_utility_prices(&payload)?;
            encode(finance::set_utility_prices(&patch, ctx)?)
        }),
    );
}

fn parse_sell_inventory(payload: &Value) -> Result<SellInventoryIntent, Vec<CommandError>> {
    let mut reader = PayloadReader::root("finance.sellInventory", payload)?;
    let lot_id = reader.require_identifier("lotId");
    let grams = reader.optional_positive_number("grams");
    reader.finish()?;
    Ok(SellInventoryIntent { lot_id, grams })
}

fn parse_set_utility_prices(payload: &Value) -> Result<UtilityPricesPatch, Vec<CommandError>> {
    let mut reader = PayloadReader::root("finance.setUtilityPrices", payload)?;
    let patch = UtilityPricesPatch {
        price_per_kwh: reader.optional_positive_number("pricePerKwh"),
        price_per_liter_water: reader.optional_positive_number("pricePerLiterWater"),
        price_per_gram_nutrients: reader.optional_positive_number("pricePerGramNutrients"),
    };
    if patch.price_per_kwh.is_none()
        && patch.price_per_liter_water.is_none()
        && patch.price_per_gram_nutrients.is_none()
    {
        reader.error("pricePerKwh", "At least one price must be provided.");
    }
    reader.finish()?;
    Ok(patch)
}
