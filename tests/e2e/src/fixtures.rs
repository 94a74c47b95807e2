//! Domain fixtures and the mappers registered for them

use async_trait::async_trait;
use mapper::{submit_mapper, MapParameters, Mapper, MapperError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub sku: String,
    pub name: String,
    pub price_cents: i64,
    pub stock: u32,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: u64,
    pub sku: String,
    pub name: String,
    pub price: String,
    pub availability: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub sku: String,
    pub quantity: u32,
    pub unit_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub number: String,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderView {
    pub number: String,
    pub line_count: usize,
    pub net_cents: i64,
    pub gross_cents: i64,
}

/// Source with loosely typed fields; no mapper is registered for it
#[derive(Debug, Clone, Serialize)]
pub struct CustomerRecord {
    pub name: String,
    pub age: String,
    pub newsletter: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDto {
    pub name: String,
    pub email: Option<String>,
    pub age: u32,
    pub newsletter: bool,
}

/// Tax rate service resolved from the mapping scope
#[derive(Debug, Clone, Copy)]
pub struct TaxRate {
    pub percent: i64,
}

/// Copies identity fields and derives availability from stock
#[derive(Debug, Default)]
pub struct ProductIdentityMapper;

#[async_trait]
impl Mapper<Product, ProductSummary> for ProductIdentityMapper {
    async fn map(
        &self,
        from: &Product,
        to: &mut ProductSummary,
        _parameters: Option<&MapParameters>,
    ) -> Result<(), MapperError> {
        to.id = from.id;
        to.sku = from.sku.clone();
        to.name = from.name.clone();
        to.availability = if from.stock > 0 {
            "in stock".to_string()
        } else {
            "sold out".to_string()
        };
        Ok(())
    }
}

/// Formats the price; reads the `currency` parameter (default `EUR`)
#[derive(Debug, Default)]
pub struct ProductPriceMapper;

#[async_trait]
impl Mapper<Product, ProductSummary> for ProductPriceMapper {
    async fn map(
        &self,
        from: &Product,
        to: &mut ProductSummary,
        parameters: Option<&MapParameters>,
    ) -> Result<(), MapperError> {
        let currency = parameters
            .and_then(|p| p.get_str("currency"))
            .unwrap_or("EUR");
        if from.price_cents < 0 {
            return Err(MapperError::failed(
                "ProductPriceMapper",
                format!("negative price for {}", from.sku),
            ));
        }
        to.price = format!(
            "{}.{:02} {}",
            from.price_cents / 100,
            from.price_cents % 100,
            currency
        );
        Ok(())
    }
}

/// Totals an order; needs a [`TaxRate`] in scope
#[derive(Debug)]
pub struct OrderViewMapper {
    tax: Arc<TaxRate>,
}

impl OrderViewMapper {
    pub fn new(tax: Arc<TaxRate>) -> Self {
        Self { tax }
    }
}

#[async_trait]
impl Mapper<Order, OrderView> for OrderViewMapper {
    async fn map(
        &self,
        from: &Order,
        to: &mut OrderView,
        _parameters: Option<&MapParameters>,
    ) -> Result<(), MapperError> {
        let net: i64 = from
            .lines
            .iter()
            .map(|line| line.unit_cents * i64::from(line.quantity))
            .sum();

        to.number = from.number.clone();
        to.line_count = from.lines.len();
        to.net_cents = net;
        to.gross_cents = net + net * self.tax.percent / 100;
        Ok(())
    }
}

// Identity and price touch disjoint fields, so discovery order does not matter
submit_mapper!(Product => ProductSummary, ProductIdentityMapper);
submit_mapper!(Product => ProductSummary, ProductPriceMapper);
submit_mapper!(Order => OrderView, OrderViewMapper, |scope| {
    Ok(OrderViewMapper::new(scope.require::<TaxRate>()?))
});

pub fn sample_products() -> Vec<Product> {
    vec![
        Product {
            id: 1,
            sku: "KB-01".to_string(),
            name: "Keyboard".to_string(),
            price_cents: 4999,
            stock: 12,
        },
        Product {
            id: 2,
            sku: "MS-02".to_string(),
            name: "Mouse".to_string(),
            price_cents: 1905,
            stock: 0,
        },
        Product {
            id: 3,
            sku: "MN-03".to_string(),
            name: "Monitor".to_string(),
            price_cents: 18900,
            stock: 3,
        },
    ]
}

pub fn sample_order() -> Order {
    Order {
        number: "SO-1001".to_string(),
        lines: vec![
            OrderLine {
                sku: "KB-01".to_string(),
                quantity: 2,
                unit_cents: 4999,
            },
            OrderLine {
                sku: "MS-02".to_string(),
                quantity: 1,
                unit_cents: 1905,
            },
        ],
    }
}

pub fn sample_customer() -> CustomerRecord {
    CustomerRecord {
        name: "Ada".to_string(),
        age: "36".to_string(),
        newsletter: "true".to_string(),
    }
}
