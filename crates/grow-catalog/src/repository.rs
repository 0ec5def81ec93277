//! `BlueprintRepository` — the lookup service consumed by command handlers.

use rustc_hash::FxHashMap;

use crate::blueprints::{
    ContainerBlueprint, CultivationMethodBlueprint, DeviceBlueprint, RoomPurpose, StrainBlueprint,
    StructureBlueprint, SubstrateBlueprint,
};
use crate::prices::{ContainerPrice, DevicePrice, HarvestPrice, MethodPrice, SubstratePrice};

/// Immutable, fully indexed catalog.
///
/// Containers and substrates are indexed twice (by id and by slug) because
/// intents reference them by id while method defaults reference them by slug.
#[derive(Default)]
pub struct BlueprintRepository {
    methods: FxHashMap<String, CultivationMethodBlueprint>,
    containers: FxHashMap<String, ContainerBlueprint>,
    containers_by_slug: FxHashMap<String, String>,
    substrates: FxHashMap<String, SubstrateBlueprint>,
    substrates_by_slug: FxHashMap<String, String>,
    devices: FxHashMap<String, DeviceBlueprint>,
    strains: FxHashMap<String, StrainBlueprint>,
    structures: FxHashMap<String, StructureBlueprint>,
    room_purposes: FxHashMap<String, RoomPurpose>,

    method_prices: FxHashMap<String, MethodPrice>,
    container_prices: FxHashMap<String, ContainerPrice>,
    substrate_prices: FxHashMap<String, SubstratePrice>,
    device_prices: FxHashMap<String, DevicePrice>,
    harvest_prices: FxHashMap<String, HarvestPrice>,
}

impl BlueprintRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Registration (used by the loader and the defaults set) ────────────

    pub fn add_method(&mut self, blueprint: CultivationMethodBlueprint) {
        self.methods.insert(blueprint.id.clone(), blueprint);
    }

    pub fn add_container(&mut self, blueprint: ContainerBlueprint) {
        self.containers_by_slug.insert(blueprint.slug.clone(), blueprint.id.clone());
        self.containers.insert(blueprint.id.clone(), blueprint);
    }

    pub fn add_substrate(&mut self, blueprint: SubstrateBlueprint) {
        self.substrates_by_slug.insert(blueprint.slug.clone(), blueprint.id.clone());
        self.substrates.insert(blueprint.id.clone(), blueprint);
    }

    pub fn add_device(&mut self, blueprint: DeviceBlueprint) {
        self.devices.insert(blueprint.id.clone(), blueprint);
    }

    pub fn add_strain(&mut self, blueprint: StrainBlueprint) {
        self.strains.insert(blueprint.id.clone(), blueprint);
    }

    pub fn add_structure(&mut self, blueprint: StructureBlueprint) {
        self.structures.insert(blueprint.id.clone(), blueprint);
    }

    pub fn add_room_purpose(&mut self, purpose: RoomPurpose) {
        self.room_purposes.insert(purpose.id.clone(), purpose);
    }

    pub fn add_method_price(&mut self, price: MethodPrice) {
        self.method_prices.insert(price.method_id.clone(), price);
    }

    pub fn add_container_price(&mut self, price: ContainerPrice) {
        self.container_prices.insert(price.slug.clone(), price);
    }

    pub fn add_substrate_price(&mut self, price: SubstratePrice) {
        self.substrate_prices.insert(price.slug.clone(), price);
    }

    pub fn add_device_price(&mut self, price: DevicePrice) {
        self.device_prices.insert(price.blueprint_id.clone(), price);
    }

    pub fn add_harvest_price(&mut self, price: HarvestPrice) {
        self.harvest_prices.insert(price.strain_id.clone(), price);
    }

    // ── Blueprint lookups ─────────────────────────────────────────────────

    pub fn cultivation_method(&self, id: &str) -> Option<&CultivationMethodBlueprint> {
        self.methods.get(id)
    }

    pub fn container(&self, id: &str) -> Option<&ContainerBlueprint> {
        self.containers.get(id)
    }

    pub fn container_by_slug(&self, slug: &str) -> Option<&ContainerBlueprint> {
        self.containers_by_slug.get(slug).and_then(|id| self.containers.get(id))
    }

    pub fn substrate(&self, id: &str) -> Option<&SubstrateBlueprint> {
        self.substrates.get(id)
    }

    pub fn substrate_by_slug(&self, slug: &str) -> Option<&SubstrateBlueprint> {
        self.substrates_by_slug.get(slug).and_then(|id| self.substrates.get(id))
    }

    pub fn device(&self, id: &str) -> Option<&DeviceBlueprint> {
        self.devices.get(id)
    }

    pub fn strain(&self, id: &str) -> Option<&StrainBlueprint> {
        self.strains.get(id)
    }

    pub fn structure(&self, id: &str) -> Option<&StructureBlueprint> {
        self.structures.get(id)
    }

    pub fn room_purpose(&self, id: &str) -> Option<&RoomPurpose> {
        self.room_purposes.get(id)
    }

    pub fn list_structures(&self) -> Vec<&StructureBlueprint> {
        let mut all: Vec<_> = self.structures.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn list_strains(&self) -> Vec<&StrainBlueprint> {
        let mut all: Vec<_> = self.strains.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn list_devices(&self) -> Vec<&DeviceBlueprint> {
        let mut all: Vec<_> = self.devices.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    // ── Price lookups ─────────────────────────────────────────────────────

    pub fn method_price(&self, method_id: &str) -> Option<&MethodPrice> {
        self.method_prices.get(method_id)
    }

    pub fn container_price(&self, slug: &str) -> Option<&ContainerPrice> {
        self.container_prices.get(slug)
    }

    pub fn substrate_price(&self, slug: &str) -> Option<&SubstratePrice> {
        self.substrate_prices.get(slug)
    }

    pub fn device_price(&self, blueprint_id: &str) -> Option<&DevicePrice> {
        self.device_prices.get(blueprint_id)
    }

    pub fn harvest_price(&self, strain_id: &str) -> Option<&HarvestPrice> {
        self.harvest_prices.get(strain_id)
    }
}
