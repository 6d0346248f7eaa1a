// src/db/snapshot.rs

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use crate::{
    common::error::AppError,
    models::sales::{DateRange, Product, SaleRecord},
};

// O "banco" do painel: as duas tabelas carregadas uma única vez no início
// e compartilhadas (somente leitura) por todos os serviços via Arc.
#[derive(Debug)]
pub struct SalesSnapshot {
    products: Vec<Product>,
    index: HashMap<String, usize>,
    sales: Vec<SaleRecord>,
}

impl SalesSnapshot {
    pub fn new(products: Vec<Product>, sales: Vec<SaleRecord>) -> Result<Self, AppError> {
        let mut index = HashMap::with_capacity(products.len());
        for (pos, product) in products.iter().enumerate() {
            if index.insert(product.product_id.clone(), pos).is_some() {
                return Err(AppError::DataQuality {
                    product_id: product.product_id.clone(),
                    reason: "ID de produto duplicado na tabela de produtos".into(),
                });
            }
        }

        Ok(Self { products, index, sales })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn sales(&self) -> &[SaleRecord] {
        &self.sales
    }

    // Left join: None quando o ID não existe no cadastro
    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.index.get(product_id).map(|&pos| &self.products[pos])
    }

    /// Vendas dentro do intervalo (inclusivo). Sem intervalo, todo o histórico.
    pub fn sales_in(&self, range: Option<DateRange>) -> impl Iterator<Item = &SaleRecord> {
        self.sales
            .iter()
            .filter(move |sale| range.is_none_or(|r| r.contains(sale.date)))
    }

    /// Nomes distintos, na ordem da planilha
    pub fn product_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|p| p.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.sales.iter().map(|s| s.date).min()?;
        let max = self.sales.iter().map(|s| s.date).max()?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::{date, product, sale, sample_snapshot};

    #[test]
    fn test_duplicate_product_id_is_rejected() {
        let result = SalesSnapshot::new(
            vec![product("1", "Tomate", "8.00"), product("1", "Batata", "5.00")],
            vec![],
        );
        assert!(matches!(result, Err(AppError::DataQuality { product_id, .. }) if product_id == "1"));
    }

    #[test]
    fn test_product_lookup_is_left_join() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.product("1").map(|p| p.name.as_str()), Some("Tomate"));
        assert!(snapshot.product("999").is_none());
    }

    #[test]
    fn test_sales_in_range_is_inclusive() {
        let snapshot = SalesSnapshot::new(
            vec![product("1", "Tomate", "8.00")],
            vec![
                sale("1", date(1), "10"),
                sale("1", date(2), "20"),
                sale("1", date(3), "30"),
                sale("1", date(4), "40"),
            ],
        )
        .unwrap();

        let range = DateRange::new(date(2), date(3));
        let dates: Vec<_> = snapshot.sales_in(Some(range)).map(|s| s.date).collect();
        assert_eq!(dates, vec![date(2), date(3)]);
        assert_eq!(snapshot.sales_in(None).count(), 4);
    }

    #[test]
    fn test_product_names_are_distinct_in_table_order() {
        let snapshot = SalesSnapshot::new(
            vec![
                product("1", "Tomate", "8.00"),
                product("2", "Alface", "3.00"),
                product("3", "Tomate", "9.00"),
            ],
            vec![],
        )
        .unwrap();
        assert_eq!(snapshot.product_names(), vec!["Tomate", "Alface"]);
    }

    #[test]
    fn test_date_bounds() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.date_bounds(), Some((date(1), date(7))));

        let empty = SalesSnapshot::new(vec![], vec![]).unwrap();
        assert_eq!(empty.date_bounds(), None);
    }
}
