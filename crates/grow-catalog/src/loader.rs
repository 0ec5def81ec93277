//! CSV catalog loader.
//!
//! # Directory layout
//!
//! `load_catalog_dir` reads the files below from one directory.  Blueprint
//! files are required; price files are optional (commands treat missing
//! prices as "free", reporting cost `None`).
//!
//! | File                       | Required | Record                         |
//! |----------------------------|----------|--------------------------------|
//! | `cultivation_methods.csv`  | yes      | method + compatibility sets    |
//! | `containers.csv`           | yes      | container geometry             |
//! | `substrates.csv`           | yes      | substrate types                |
//! | `devices.csv`              | no       | device templates               |
//! | `strains.csv`              | no       | strain optima                  |
//! | `structures.csv`           | no       | rentable structures            |
//! | `room_purposes.csv`        | no       | purpose ids                    |
//! | `prices.csv`               | no       | unified price rows             |
//!
//! Compatible-type sets are pipe-separated in one cell (`pot|bag`); an empty
//! cell means "any type accepted".
//!
//! # `prices.csv` format
//!
//! ```csv
//! kind,key,amount,extra
//! method,method-basic-soil,400,
//! container,pot-10l,8.5,
//! substrate,soil-allmix,0.6,
//! device,device-led-600,950,45
//! harvest,strain-ak47,6.5,
//! ```
//!
//! `extra` is only read for `device` rows (maintenance base cost).

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::blueprints::{
    ContainerBlueprint, CultivationMethodBlueprint, DeviceBlueprint, RoomPurpose, StrainBlueprint,
    StructureBlueprint, SubstrateBlueprint,
};
use crate::prices::{ContainerPrice, DevicePrice, HarvestPrice, MethodPrice, SubstratePrice};
use crate::repository::BlueprintRepository;
use crate::{CatalogError, CatalogResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct MethodRecord {
    id: String,
    slug: String,
    name: String,
    compatible_container_types: String,
    compatible_substrate_types: String,
    default_container_slug: String,
    default_substrate_slug: String,
}

#[derive(Deserialize)]
struct ContainerRecord {
    id: String,
    slug: String,
    name: String,
    container_type: String,
    footprint_area: f64,
    volume_liters: f64,
    packing_density: f64,
}

#[derive(Deserialize)]
struct SubstrateRecord {
    id: String,
    slug: String,
    name: String,
    substrate_type: String,
}

#[derive(Deserialize)]
struct DeviceRecord {
    id: String,
    name: String,
    kind: String,
    power_draw_kw: f64,
    coverage_area: f64,
}

#[derive(Deserialize)]
struct StrainRecord {
    id: String,
    name: String,
    optimal_temperature_min: f64,
    optimal_temperature_max: f64,
    optimal_humidity_min: f64,
    optimal_humidity_max: f64,
    growth_rate_grams_per_hour: f64,
    vegetative_after_hours: f64,
    flowering_after_hours: f64,
    harvest_after_hours: f64,
}

#[derive(Deserialize)]
struct StructureRecord {
    id: String,
    name: String,
    length: f64,
    width: f64,
    height: f64,
    rental_cost_per_sqm_per_month: f64,
    upfront_fee: f64,
}

#[derive(Deserialize)]
struct RoomPurposeRecord {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct PriceRecord {
    kind: String,
    key: String,
    amount: f64,
    extra: Option<f64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a full catalog from `dir`.  See the module docs for the layout.
pub fn load_catalog_dir(dir: &Path) -> CatalogResult<BlueprintRepository> {
    let mut repo = BlueprintRepository::new();

    load_methods(&mut repo, open(dir, "cultivation_methods.csv")?.as_slice(), "cultivation_methods.csv")?;
    load_containers(&mut repo, open(dir, "containers.csv")?.as_slice(), "containers.csv")?;
    load_substrates(&mut repo, open(dir, "substrates.csv")?.as_slice(), "substrates.csv")?;

    if let Some(data) = open_optional(dir, "devices.csv")? {
        load_devices(&mut repo, data.as_slice(), "devices.csv")?;
    }
    if let Some(data) = open_optional(dir, "strains.csv")? {
        load_strains(&mut repo, data.as_slice(), "strains.csv")?;
    }
    if let Some(data) = open_optional(dir, "structures.csv")? {
        load_structures(&mut repo, data.as_slice(), "structures.csv")?;
    }
    if let Some(data) = open_optional(dir, "room_purposes.csv")? {
        load_room_purposes(&mut repo, data.as_slice(), "room_purposes.csv")?;
    }
    if let Some(data) = open_optional(dir, "prices.csv")? {
        load_prices(&mut repo, data.as_slice(), "prices.csv")?;
    }

    Ok(repo)
}

/// Parse cultivation methods from any `Read` source (e.g. a `Cursor` in
/// tests) into `repo`.
pub fn load_methods<R: Read>(
    repo: &mut BlueprintRepository,
    reader: R,
    file: &str,
) -> CatalogResult<()> {
    for row in records::<MethodRecord, R>(reader, file)? {
        repo.add_method(CultivationMethodBlueprint {
            id: row.id,
            slug: row.slug,
            name: row.name,
            compatible_container_types: split_set(&row.compatible_container_types),
            compatible_substrate_types: split_set(&row.compatible_substrate_types),
            default_container_slug: non_empty(row.default_container_slug),
            default_substrate_slug: non_empty(row.default_substrate_slug),
        });
    }
    Ok(())
}

pub fn load_containers<R: Read>(
    repo: &mut BlueprintRepository,
    reader: R,
    file: &str,
) -> CatalogResult<()> {
    for row in records::<ContainerRecord, R>(reader, file)? {
        repo.add_container(ContainerBlueprint {
            id: row.id,
            slug: row.slug,
            name: row.name,
            container_type: row.container_type,
            footprint_area: row.footprint_area,
            volume_liters: row.volume_liters,
            packing_density: row.packing_density,
        });
    }
    Ok(())
}

pub fn load_substrates<R: Read>(
    repo: &mut BlueprintRepository,
    reader: R,
    file: &str,
) -> CatalogResult<()> {
    for row in records::<SubstrateRecord, R>(reader, file)? {
        repo.add_substrate(SubstrateBlueprint {
            id: row.id,
            slug: row.slug,
            name: row.name,
            substrate_type: row.substrate_type,
        });
    }
    Ok(())
}

pub fn load_devices<R: Read>(
    repo: &mut BlueprintRepository,
    reader: R,
    file: &str,
) -> CatalogResult<()> {
    for row in records::<DeviceRecord, R>(reader, file)? {
        repo.add_device(DeviceBlueprint {
            id: row.id,
            name: row.name,
            kind: row.kind,
            power_draw_kw: row.power_draw_kw,
            coverage_area: row.coverage_area,
        });
    }
    Ok(())
}

pub fn load_strains<R: Read>(
    repo: &mut BlueprintRepository,
    reader: R,
    file: &str,
) -> CatalogResult<()> {
    for row in records::<StrainRecord, R>(reader, file)? {
        repo.add_strain(StrainBlueprint {
            id: row.id,
            name: row.name,
            optimal_temperature_min: row.optimal_temperature_min,
            optimal_temperature_max: row.optimal_temperature_max,
            optimal_humidity_min: row.optimal_humidity_min,
            optimal_humidity_max: row.optimal_humidity_max,
            growth_rate_grams_per_hour: row.growth_rate_grams_per_hour,
            vegetative_after_hours: row.vegetative_after_hours,
            flowering_after_hours: row.flowering_after_hours,
            harvest_after_hours: row.harvest_after_hours,
        });
    }
    Ok(())
}

pub fn load_structures<R: Read>(
    repo: &mut BlueprintRepository,
    reader: R,
    file: &str,
) -> CatalogResult<()> {
    for row in records::<StructureRecord, R>(reader, file)? {
        repo.add_structure(StructureBlueprint {
            id: row.id,
            name: row.name,
            length: row.length,
            width: row.width,
            height: row.height,
            rental_cost_per_sqm_per_month: row.rental_cost_per_sqm_per_month,
            upfront_fee: row.upfront_fee,
        });
    }
    Ok(())
}

pub fn load_room_purposes<R: Read>(
    repo: &mut BlueprintRepository,
    reader: R,
    file: &str,
) -> CatalogResult<()> {
    for row in records::<RoomPurposeRecord, R>(reader, file)? {
        repo.add_room_purpose(RoomPurpose { id: row.id, name: row.name });
    }
    Ok(())
}

pub fn load_prices<R: Read>(
    repo: &mut BlueprintRepository,
    reader: R,
    file: &str,
) -> CatalogResult<()> {
    for row in records::<PriceRecord, R>(reader, file)? {
        match row.kind.as_str() {
            "method" => repo.add_method_price(MethodPrice {
                method_id: row.key,
                setup_cost: row.amount,
            }),
            "container" => repo.add_container_price(ContainerPrice {
                slug: row.key,
                cost_per_unit: row.amount,
            }),
            "substrate" => repo.add_substrate_price(SubstratePrice {
                slug: row.key,
                cost_per_liter: row.amount,
            }),
            "device" => repo.add_device_price(DevicePrice {
                blueprint_id: row.key,
                capital_expenditure: row.amount,
                maintenance_base_cost: row.extra.unwrap_or(0.0),
            }),
            "harvest" => repo.add_harvest_price(HarvestPrice {
                strain_id: row.key,
                price_per_gram: row.amount,
            }),
            other => {
                return Err(CatalogError::Parse {
                    file: file.to_string(),
                    message: format!("unknown price kind {other:?}"),
                })
            }
        }
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn records<T: serde::de::DeserializeOwned, R: Read>(
    reader: R,
    file: &str,
) -> CatalogResult<Vec<T>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<T>()
        .map(|row| {
            row.map_err(|e| CatalogError::Parse {
                file: file.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

fn open(dir: &Path, file: &str) -> CatalogResult<Vec<u8>> {
    Ok(std::fs::read(dir.join(file))?)
}

fn open_optional(dir: &Path, file: &str) -> CatalogResult<Option<Vec<u8>>> {
    let path = dir.join(file);
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(std::fs::read(path)?))
}

/// Split a pipe-separated type set; empty cell → empty set ("any").
fn split_set(cell: &str) -> Vec<String> {
    cell.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(cell: String) -> Option<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
