// src/db/fixtures.rs
//
// Dados de teste compartilhados. Janeiro/2024 começa numa segunda-feira.
//
//   dia 1 (seg): Tomate 40, Alface 20          = 60
//   dia 2 (ter): Tomate 80, Batata 25          = 105
//   dia 3 (qua): Cebola 30                     = 30
//   dia 5 (sex): Tomate 16, Alface 8, Batata 10 = 34
//   dia 7 (dom): Batata 50, Tomate 24          = 74
//
// Preço/kg: Tomate 8, Alface 4, Batata 5, Cebola 6.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    db::SalesSnapshot,
    models::sales::{Product, SaleRecord},
};

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

pub fn product(id: &str, name: &str, price_per_kg: &str) -> Product {
    Product {
        product_id: id.to_string(),
        name: name.to_string(),
        price_per_kg: Some(dec(price_per_kg)),
        avg_unit_weight_kg: Some(dec("0.5")),
    }
}

pub fn sale(id: &str, date: NaiveDate, value: &str) -> SaleRecord {
    SaleRecord {
        product_id: id.to_string(),
        date,
        sale_value: dec(value),
    }
}

pub fn sample_products() -> Vec<Product> {
    vec![
        product("1", "Tomate", "8"),
        product("2", "Alface", "4"),
        product("3", "Batata", "5"),
        product("4", "Cebola", "6"),
    ]
}

pub fn sample_snapshot() -> SalesSnapshot {
    let sales = vec![
        sale("1", date(1), "40"),
        sale("2", date(1), "20"),
        sale("1", date(2), "80"),
        sale("3", date(2), "25"),
        sale("4", date(3), "30"),
        sale("1", date(5), "16"),
        sale("2", date(5), "8"),
        sale("3", date(5), "10"),
        sale("3", date(7), "50"),
        sale("1", date(7), "24"),
    ];
    SalesSnapshot::new(sample_products(), sales).unwrap()
}
