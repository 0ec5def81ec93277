//! Unit tests for the blueprint catalog.

#[cfg(test)]
mod defaults {
    use crate::BlueprintRepository;

    #[test]
    fn every_kind_is_represented() {
        let repo = BlueprintRepository::with_defaults();
        assert!(repo.cultivation_method("method-basic-soil").is_some());
        assert!(repo.container("container-pot-10l").is_some());
        assert!(repo.substrate("substrate-soil-allmix").is_some());
        assert!(repo.device("device-led-600").is_some());
        assert!(repo.strain("strain-ak47").is_some());
        assert!(repo.structure("structure-warehouse-small").is_some());
        assert!(repo.room_purpose("purpose-growroom").is_some());
    }

    #[test]
    fn slug_lookups_resolve_to_the_same_blueprint() {
        let repo = BlueprintRepository::with_defaults();
        let by_id = repo.container("container-pot-10l").unwrap();
        let by_slug = repo.container_by_slug("pot-10l").unwrap();
        assert_eq!(by_id.id, by_slug.id);

        let substrate = repo.substrate_by_slug("rockwool-slab").unwrap();
        assert_eq!(substrate.substrate_type, "rockwool");
    }

    #[test]
    fn prices_exist_for_default_blueprints() {
        let repo = BlueprintRepository::with_defaults();
        assert_eq!(repo.method_price("method-basic-soil").unwrap().setup_cost, 400.0);
        assert_eq!(repo.container_price("pot-10l").unwrap().cost_per_unit, 8.5);
        assert_eq!(repo.substrate_price("soil-allmix").unwrap().cost_per_liter, 0.6);
        assert!(repo.device_price("device-led-600").is_some());
        assert!(repo.harvest_price("strain-ak47").is_some());
    }

    #[test]
    fn open_bench_accepts_any_type() {
        let repo = BlueprintRepository::with_defaults();
        let method = repo.cultivation_method("method-open-bench").unwrap();
        assert!(method.compatible_container_types.is_empty());
        assert!(method.compatible_substrate_types.is_empty());
    }

    #[test]
    fn listings_are_sorted_by_id() {
        let repo = BlueprintRepository::with_defaults();
        let structures = repo.list_structures();
        assert_eq!(structures.len(), 2);
        assert!(structures[0].id < structures[1].id);
    }
}

#[cfg(test)]
mod loader {
    use crate::loader::{load_containers, load_methods, load_prices};
    use crate::BlueprintRepository;

    #[test]
    fn methods_parse_pipe_separated_sets() {
        let csv = "\
id,slug,name,compatible_container_types,compatible_substrate_types,default_container_slug,default_substrate_slug
method-a,a,Method A,pot|bag,soil,pot-10l,soil-allmix
method-b,b,Method B,,,,
";
        let mut repo = BlueprintRepository::new();
        load_methods(&mut repo, csv.as_bytes(), "cultivation_methods.csv").unwrap();

        let a = repo.cultivation_method("method-a").unwrap();
        assert_eq!(a.compatible_container_types, vec!["pot", "bag"]);
        assert_eq!(a.default_container_slug.as_deref(), Some("pot-10l"));

        let b = repo.cultivation_method("method-b").unwrap();
        assert!(b.compatible_container_types.is_empty());
        assert!(b.default_container_slug.is_none());
    }

    #[test]
    fn containers_round_trip_geometry() {
        let csv = "\
id,slug,name,container_type,footprint_area,volume_liters,packing_density
container-x,x,X,pot,0.25,10,0.8
";
        let mut repo = BlueprintRepository::new();
        load_containers(&mut repo, csv.as_bytes(), "containers.csv").unwrap();
        let x = repo.container_by_slug("x").unwrap();
        assert_eq!(x.footprint_area, 0.25);
        assert_eq!(x.volume_liters, 10.0);
    }

    #[test]
    fn unified_prices_dispatch_by_kind() {
        let csv = "\
kind,key,amount,extra
method,method-a,400,
container,x,8.5,
device,device-led-600,950,45
";
        let mut repo = BlueprintRepository::new();
        load_prices(&mut repo, csv.as_bytes(), "prices.csv").unwrap();
        assert_eq!(repo.method_price("method-a").unwrap().setup_cost, 400.0);
        assert_eq!(repo.device_price("device-led-600").unwrap().maintenance_base_cost, 45.0);
    }

    #[test]
    fn unknown_price_kind_is_a_parse_error() {
        let csv = "kind,key,amount,extra\nwidget,w,1,\n";
        let mut repo = BlueprintRepository::new();
        let err = load_prices(&mut repo, csv.as_bytes(), "prices.csv").unwrap_err();
        assert!(err.to_string().contains("unknown price kind"));
    }

    #[test]
    fn malformed_row_reports_file() {
        let csv = "id,slug,name,container_type,footprint_area,volume_liters,packing_density\nbad,row,Oops,pot,not-a-number,10,1\n";
        let mut repo = BlueprintRepository::new();
        let err = load_containers(&mut repo, csv.as_bytes(), "containers.csv").unwrap_err();
        assert!(err.to_string().contains("containers.csv"));
    }
}
