// src/models/dashboard.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

// 1. Faturamento por dia (Gráfico de evolução diária)
// Só existem linhas para datas com venda; dias sem venda ficam de fora.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub total_value: Decimal,
}

// 2. Melhor Dia (com os itens vendidos naquele dia)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestDay {
    pub date: NaiveDate,
    pub total: Decimal,
    pub line_items: Vec<SoldLineItem>,
}

// Produto sem cadastro aparece com nome None (left join)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoldLineItem {
    pub product_name: Option<String>,
    pub sale_value: Decimal,
}

// 3. Pior Dia
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorstDay {
    pub date: NaiveDate,
    pub total: Decimal,
}

// 4. Ranking por peso (kg vendidos)
// `total_weight_kg` é None para vendas cujo produto não está cadastrado:
// sem preço por kg não há como calcular o peso.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWeight {
    pub product_name: Option<String>,
    pub total_weight_kg: Option<Decimal>,
}

// 5. Fatia do gráfico de pizza (com "Outros" agrupado no final)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSlice {
    pub label: String,
    pub total_weight_kg: Decimal,
    pub share_pct: Decimal,
}

// 6. Faturamento por dia da semana
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayRevenue {
    /// 1 = segunda-feira ... 7 = domingo
    pub weekday_number: u32,
    pub weekday: String,
    pub total: Decimal,
    pub products: Vec<ProductShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductShare {
    pub product_name: Option<String>,
    pub value: Decimal,
    pub share_pct: Decimal,
}

// 7. Dia de pico de um produto
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakDay {
    pub date: NaiveDate,
    pub value: Decimal,
}

// 8. Resumo do período (Os Cards do painel)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_revenue: Decimal,
    pub total_revenue_display: String,
    pub mean_daily_revenue: Option<Decimal>,
    pub best_day: Option<DayCard>,
    pub worst_day: Option<DayCard>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCard {
    pub date: NaiveDate,
    pub weekday: String,
    pub total: Decimal,
    pub total_display: String,
    /// Diferença para a média diária do período
    pub vs_mean: Option<Decimal>,
}

// 9. Limites de datas (valores padrão dos filtros)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateBounds {
    pub first_sale: NaiveDate,
    pub last_sale: NaiveDate,
}
