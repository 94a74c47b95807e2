//! Golden path through the process-wide registry and link-time discovery

use mapper::{
    FailurePolicy, MapParameters, MapperConfig, MapperError, MapperFactory, MapperRegistry,
    ServiceScope, TypePair,
};
use mapper_e2e_tests::{
    run_all, run_scenario, sample_customer, sample_order, sample_products, CustomerDto,
    CustomerRecord, Order, OrderView, Product, ProductSummary, TaxRate, SCENARIOS,
};
use std::io::Write;

fn taxed_factory() -> MapperFactory {
    let scope = ServiceScope::new("checkout").with(TaxRate { percent: 19 });
    MapperFactory::global().with_scope(scope)
}

#[test_log::test(tokio::test)]
async fn test_discovered_mappers_are_registered() {
    let registry = MapperRegistry::global();
    registry.ensure_initialized().await;

    assert!(registry.is_initialized());
    assert_eq!(
        registry
            .descriptors(&TypePair::of::<Product, ProductSummary>())
            .len(),
        2
    );
    assert!(registry.contains(&TypePair::of::<Order, OrderView>()));
    assert!(!registry.contains(&TypePair::of::<CustomerRecord, CustomerDto>()));
    assert_eq!(registry.metadata().source, "inventory");
}

#[tokio::test]
async fn test_product_summary_composes_both_mappers() {
    let factory = MapperFactory::global();
    let params = MapParameters::new().with("currency", "CHF");
    let products = sample_products();

    let summary = factory
        .map::<Product, ProductSummary>(&products[0], Some(&params))
        .await
        .unwrap();

    assert_eq!(
        summary,
        ProductSummary {
            id: 1,
            sku: "KB-01".to_string(),
            name: "Keyboard".to_string(),
            price: "49.99 CHF".to_string(),
            availability: "in stock".to_string(),
        }
    );
}

#[tokio::test]
async fn test_mapper_failure_reaches_caller() {
    let mut product = sample_products().remove(0);
    product.price_cents = -1;

    let err = MapperFactory::global()
        .map::<Product, ProductSummary>(&product, None)
        .await
        .unwrap_err();

    assert!(matches!(err, MapperError::Failed { .. }));
    assert!(err.to_string().contains("negative price"));
}

#[tokio::test]
async fn test_order_view_uses_scope_service() {
    let view = taxed_factory()
        .map::<Order, OrderView>(&sample_order(), None)
        .await
        .unwrap();

    assert_eq!(
        view,
        OrderView {
            number: "SO-1001".to_string(),
            line_count: 2,
            net_cents: 11903,
            gross_cents: 14164,
        }
    );
}

#[tokio::test]
async fn test_order_view_without_service_degrades_to_field_copy() {
    let factory = MapperFactory::global().with_scope(ServiceScope::new("bare"));

    let view = factory
        .map::<Order, OrderView>(&sample_order(), None)
        .await
        .unwrap();

    assert_eq!(view.number, "SO-1001");
    assert_eq!(view.line_count, 0);
    assert_eq!(view.gross_cents, 0);
}

#[tokio::test]
async fn test_strict_config_surfaces_missing_service() {
    let config = MapperConfig {
        name: "strict-e2e".to_string(),
        materialization_failure: FailurePolicy::Error,
        ..MapperConfig::default()
    };
    let factory =
        MapperFactory::with_config(MapperRegistry::global(), ServiceScope::new("bare"), &config);

    let err = factory
        .map::<Order, OrderView>(&sample_order(), None)
        .await
        .unwrap_err();
    assert!(err.is_resolution_error());
}

#[tokio::test]
async fn test_unregistered_pair_uses_lenient_copy() {
    let dto = MapperFactory::global()
        .map::<CustomerRecord, CustomerDto>(&sample_customer(), None)
        .await
        .unwrap();

    assert_eq!(
        dto,
        CustomerDto {
            name: "Ada".to_string(),
            email: None,
            age: 36,
            newsletter: true,
        }
    );
}

#[tokio::test]
async fn test_registered_only_leaves_unregistered_target_alone() {
    let mut dto = CustomerDto {
        name: "kept".to_string(),
        ..CustomerDto::default()
    };

    MapperFactory::global()
        .map_with_registered_mapper::<CustomerRecord, CustomerDto>(
            &sample_customer(),
            &mut dto,
            None,
        )
        .await
        .unwrap();

    assert_eq!(dto.name, "kept");
}

#[tokio::test]
async fn test_all_scenarios_pass() {
    let reports = run_all(&taxed_factory()).await.unwrap();

    let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, SCENARIOS.to_vec());
    assert_eq!(reports[0].mapped, 3);
}

#[tokio::test]
async fn test_unknown_scenario_is_rejected() {
    let err = run_scenario(&MapperFactory::global(), "inventory")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("unknown scenario"));
}

#[tokio::test]
async fn test_config_file_drives_strict_copy() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "name = \"file-config\"").unwrap();
    writeln!(file, "[field_copy]").unwrap();
    writeln!(file, "lenient_conversion = false").unwrap();

    let config = MapperConfig::from_file(file.path()).unwrap();
    let factory = MapperFactory::with_config(
        MapperRegistry::global(),
        ServiceScope::new("file").with(TaxRate { percent: 7 }),
        &config,
    );

    let report = run_scenario(&factory, "customers").await.unwrap();
    assert_eq!(report.mapped, 1);

    let dto = factory
        .map::<CustomerRecord, CustomerDto>(&sample_customer(), None)
        .await
        .unwrap();
    assert_eq!(dto.age, 0);
    assert!(!dto.newsletter);
}
