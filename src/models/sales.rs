// src/models/sales.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;

// --- 1. Produtos (tabela da planilha) ---
// Preço e peso podem vir vazios da planilha; a falta só vira erro
// quando o cálculo realmente precisa do valor.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub price_per_kg: Option<Decimal>,
    pub avg_unit_weight_kg: Option<Decimal>,
}

// --- 2. Vendas (cada linha é uma transação) ---
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub product_id: String,
    pub date: NaiveDate,
    pub sale_value: Decimal,
}

// --- 3. Intervalo de datas (inclusivo nas duas pontas) ---
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
