//! Mapping scenarios shared by the runner and the integration tests

use crate::fixtures::{
    sample_customer, sample_order, sample_products, CustomerDto, CustomerRecord, Order,
    OrderView, Product, ProductSummary, TaxRate,
};
use anyhow::{ensure, Context, Result};
use mapper::{MapParameters, MapperFactory};
use serde::Serialize;
use std::time::Instant;

/// Scenario names accepted by [`run_scenario`]
pub const SCENARIOS: &[&str] = &["catalog", "orders", "customers"];

/// Outcome of one scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub mapped: usize,
    pub duration_us: u128,
    pub notes: Vec<String>,
}

impl ScenarioReport {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            mapped: 0,
            duration_us: 0,
            notes: Vec::new(),
        }
    }
}

/// Run one scenario by name
pub async fn run_scenario(factory: &MapperFactory, name: &str) -> Result<ScenarioReport> {
    let started = Instant::now();
    let mut report = match name {
        "catalog" => catalog(factory).await,
        "orders" => orders(factory).await,
        "customers" => customers(factory).await,
        other => anyhow::bail!("unknown scenario '{}'", other),
    }
    .with_context(|| format!("scenario '{}' failed", name))?;

    report.duration_us = started.elapsed().as_micros();
    tracing::info!(
        scenario = name,
        mapped = report.mapped,
        duration_us = report.duration_us as u64,
        "Scenario passed"
    );
    Ok(report)
}

pub async fn run_all(factory: &MapperFactory) -> Result<Vec<ScenarioReport>> {
    let mut reports = Vec::with_capacity(SCENARIOS.len());
    for name in SCENARIOS {
        reports.push(run_scenario(factory, name).await?);
    }
    Ok(reports)
}

/// Two discovered mappers compose into one product summary
async fn catalog(factory: &MapperFactory) -> Result<ScenarioReport> {
    let mut report = ScenarioReport::new("catalog");
    let products = sample_products();
    let params = MapParameters::new().with("currency", "USD");

    let summaries: Vec<ProductSummary> = factory
        .map_list::<Product, ProductSummary, _>(&products, Some(&params))
        .await?;

    ensure!(summaries.len() == products.len(), "list length changed");
    for (product, summary) in products.iter().zip(&summaries) {
        ensure!(summary.id == product.id, "summary out of order for {}", product.sku);
        ensure!(summary.price.ends_with("USD"), "price not formatted: {}", summary.price);
    }
    ensure!(summaries[1].availability == "sold out", "stock not evaluated");

    report.mapped = summaries.len();
    report.notes.push(format!("first price {}", summaries[0].price));
    Ok(report)
}

/// Scope-dependent mapper; without the tax service the field copy takes over
async fn orders(factory: &MapperFactory) -> Result<ScenarioReport> {
    let mut report = ScenarioReport::new("orders");
    let order = sample_order();

    let view = factory.map::<Order, OrderView>(&order, None).await?;
    ensure!(view.number == order.number, "order number not mapped");

    if factory.resolver().scope().contains::<TaxRate>() {
        ensure!(view.line_count == order.lines.len(), "line count not computed");
        ensure!(view.gross_cents >= view.net_cents, "gross below net");
        report.notes.push(format!("gross {} cents", view.gross_cents));
    } else {
        ensure!(view.line_count == 0, "order mapper ran without its tax service");
        report.notes.push("tax service missing, field copy used".to_string());
    }

    report.mapped = 1;
    Ok(report)
}

/// No registered mapper; lenient field copy converts the loose fields
async fn customers(factory: &MapperFactory) -> Result<ScenarioReport> {
    let mut report = ScenarioReport::new("customers");
    let record = sample_customer();

    let dto = factory
        .map::<CustomerRecord, CustomerDto>(&record, None)
        .await?;
    ensure!(dto.name == record.name, "name not copied");
    ensure!(dto.email.is_none(), "email invented");

    if factory.resolver().copier().lenient_conversion() {
        ensure!(dto.age == 36 && dto.newsletter, "lenient conversion skipped fields");
    } else {
        ensure!(dto.age == 0 && !dto.newsletter, "strict copy converted fields");
    }

    report.mapped = 1;
    Ok(report)
}
