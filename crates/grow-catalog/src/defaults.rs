//! Built-in catalog for tests and demos.
//!
//! The set is intentionally small but covers every lookup path a command can
//! take: two methods with different compatibility sets, containers whose
//! footprints exercise the capacity math, and prices for each kind.

use crate::blueprints::{
    ContainerBlueprint, CultivationMethodBlueprint, DeviceBlueprint, RoomPurpose, StrainBlueprint,
    StructureBlueprint, SubstrateBlueprint,
};
use crate::prices::{ContainerPrice, DevicePrice, HarvestPrice, MethodPrice, SubstratePrice};
use crate::repository::BlueprintRepository;

impl BlueprintRepository {
    /// A ready-to-use catalog with a representative blueprint of each kind.
    pub fn with_defaults() -> Self {
        let mut repo = Self::new();

        // ── Cultivation methods ───────────────────────────────────────────
        repo.add_method(CultivationMethodBlueprint {
            id: "method-basic-soil".into(),
            slug: "basic-soil".into(),
            name: "Basic Soil Pots".into(),
            compatible_container_types: vec!["pot".into(), "bag".into()],
            compatible_substrate_types: vec!["soil".into()],
            default_container_slug: Some("pot-10l".into()),
            default_substrate_slug: Some("soil-allmix".into()),
        });
        repo.add_method(CultivationMethodBlueprint {
            id: "method-hydro-tray".into(),
            slug: "hydro-tray".into(),
            name: "Recirculating Hydro Trays".into(),
            compatible_container_types: vec!["tray".into()],
            compatible_substrate_types: vec!["rockwool".into(), "coco".into()],
            default_container_slug: Some("tray-flood-1m".into()),
            default_substrate_slug: Some("rockwool-slab".into()),
        });
        // Accepts anything — both compatibility sets empty.
        repo.add_method(CultivationMethodBlueprint {
            id: "method-open-bench".into(),
            slug: "open-bench".into(),
            name: "Open Bench".into(),
            compatible_container_types: vec![],
            compatible_substrate_types: vec![],
            default_container_slug: None,
            default_substrate_slug: None,
        });

        // ── Containers ────────────────────────────────────────────────────
        repo.add_container(ContainerBlueprint {
            id: "container-pot-10l".into(),
            slug: "pot-10l".into(),
            name: "10 L Round Pot".into(),
            container_type: "pot".into(),
            footprint_area: 0.25,
            volume_liters: 10.0,
            packing_density: 0.8,
        });
        repo.add_container(ContainerBlueprint {
            id: "container-tray-flood-1m".into(),
            slug: "tray-flood-1m".into(),
            name: "1 m² Flood Tray".into(),
            container_type: "tray".into(),
            footprint_area: 1.0,
            volume_liters: 40.0,
            packing_density: 0.9,
        });
        // Unit footprint and density — the reference container for capacity
        // arithmetic in tests.
        repo.add_container(ContainerBlueprint {
            id: "container-bench-2m".into(),
            slug: "bench-2m".into(),
            name: "2 m² Bench Module".into(),
            container_type: "bench".into(),
            footprint_area: 2.0,
            volume_liters: 60.0,
            packing_density: 1.0,
        });

        // ── Substrates ────────────────────────────────────────────────────
        repo.add_substrate(SubstrateBlueprint {
            id: "substrate-soil-allmix".into(),
            slug: "soil-allmix".into(),
            name: "All-Mix Soil".into(),
            substrate_type: "soil".into(),
        });
        repo.add_substrate(SubstrateBlueprint {
            id: "substrate-rockwool-slab".into(),
            slug: "rockwool-slab".into(),
            name: "Rockwool Slab".into(),
            substrate_type: "rockwool".into(),
        });
        repo.add_substrate(SubstrateBlueprint {
            id: "substrate-coco-brick".into(),
            slug: "coco-brick".into(),
            name: "Coco Brick".into(),
            substrate_type: "coco".into(),
        });

        // ── Devices ───────────────────────────────────────────────────────
        repo.add_device(DeviceBlueprint {
            id: "device-led-600".into(),
            name: "LED Panel 600W".into(),
            kind: "Lamp".into(),
            power_draw_kw: 0.6,
            coverage_area: 1.5,
        });
        repo.add_device(DeviceBlueprint {
            id: "device-split-ac".into(),
            name: "Split Climate Unit".into(),
            kind: "ClimateUnit".into(),
            power_draw_kw: 1.2,
            coverage_area: 25.0,
        });
        repo.add_device(DeviceBlueprint {
            id: "device-dehumidifier".into(),
            name: "Dehumidifier".into(),
            kind: "HumidityControlUnit".into(),
            power_draw_kw: 0.4,
            coverage_area: 20.0,
        });
        repo.add_device(DeviceBlueprint {
            id: "device-co2-injector".into(),
            name: "CO₂ Injector".into(),
            kind: "CO2Injector".into(),
            power_draw_kw: 0.05,
            coverage_area: 30.0,
        });

        // ── Strains ───────────────────────────────────────────────────────
        repo.add_strain(StrainBlueprint {
            id: "strain-ak47".into(),
            name: "AK-47".into(),
            optimal_temperature_min: 20.0,
            optimal_temperature_max: 27.0,
            optimal_humidity_min: 0.45,
            optimal_humidity_max: 0.65,
            growth_rate_grams_per_hour: 0.08,
            vegetative_after_hours: 336.0,
            flowering_after_hours: 1_008.0,
            harvest_after_hours: 2_016.0,
        });
        repo.add_strain(StrainBlueprint {
            id: "strain-northern-lights".into(),
            name: "Northern Lights".into(),
            optimal_temperature_min: 19.0,
            optimal_temperature_max: 26.0,
            optimal_humidity_min: 0.4,
            optimal_humidity_max: 0.6,
            growth_rate_grams_per_hour: 0.07,
            vegetative_after_hours: 312.0,
            flowering_after_hours: 960.0,
            harvest_after_hours: 1_920.0,
        });

        // ── Structures & room purposes ────────────────────────────────────
        repo.add_structure(StructureBlueprint {
            id: "structure-warehouse-small".into(),
            name: "Small Warehouse".into(),
            length: 20.0,
            width: 10.0,
            height: 4.0,
            rental_cost_per_sqm_per_month: 12.0,
            upfront_fee: 10_000.0,
        });
        repo.add_structure(StructureBlueprint {
            id: "structure-warehouse-large".into(),
            name: "Large Warehouse".into(),
            length: 50.0,
            width: 24.0,
            height: 6.0,
            rental_cost_per_sqm_per_month: 9.0,
            upfront_fee: 45_000.0,
        });
        for (id, name) in [
            ("purpose-growroom", "Growroom"),
            ("purpose-processing", "Processing"),
            ("purpose-breakroom", "Breakroom"),
            ("purpose-storage", "Storage"),
        ] {
            repo.add_room_purpose(RoomPurpose { id: id.into(), name: name.into() });
        }

        // ── Prices ────────────────────────────────────────────────────────
        repo.add_method_price(MethodPrice { method_id: "method-basic-soil".into(), setup_cost: 400.0 });
        repo.add_method_price(MethodPrice { method_id: "method-hydro-tray".into(), setup_cost: 1_200.0 });
        repo.add_method_price(MethodPrice { method_id: "method-open-bench".into(), setup_cost: 150.0 });
        repo.add_container_price(ContainerPrice { slug: "pot-10l".into(), cost_per_unit: 8.5 });
        repo.add_container_price(ContainerPrice { slug: "tray-flood-1m".into(), cost_per_unit: 95.0 });
        repo.add_container_price(ContainerPrice { slug: "bench-2m".into(), cost_per_unit: 180.0 });
        repo.add_substrate_price(SubstratePrice { slug: "soil-allmix".into(), cost_per_liter: 0.6 });
        repo.add_substrate_price(SubstratePrice { slug: "rockwool-slab".into(), cost_per_liter: 1.1 });
        repo.add_substrate_price(SubstratePrice { slug: "coco-brick".into(), cost_per_liter: 0.8 });
        repo.add_device_price(DevicePrice {
            blueprint_id: "device-led-600".into(),
            capital_expenditure: 950.0,
            maintenance_base_cost: 45.0,
        });
        repo.add_device_price(DevicePrice {
            blueprint_id: "device-split-ac".into(),
            capital_expenditure: 2_400.0,
            maintenance_base_cost: 120.0,
        });
        repo.add_device_price(DevicePrice {
            blueprint_id: "device-dehumidifier".into(),
            capital_expenditure: 650.0,
            maintenance_base_cost: 35.0,
        });
        repo.add_device_price(DevicePrice {
            blueprint_id: "device-co2-injector".into(),
            capital_expenditure: 320.0,
            maintenance_base_cost: 20.0,
        });
        repo.add_harvest_price(HarvestPrice { strain_id: "strain-ak47".into(), price_per_gram: 6.5 });
        repo.add_harvest_price(HarvestPrice {
            strain_id: "strain-northern-lights".into(),
            price_per_gram: 5.8,
        });

        repo
    }
}
