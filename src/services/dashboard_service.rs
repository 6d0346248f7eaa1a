// src/services/dashboard_service.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;

use crate::{
    common::{
        error::AppError,
        format::{format_brl, weekday_label},
    },
    db::SalesSnapshot,
    models::{
        dashboard::{
            BestDay, DailyRevenue, DashboardSummary, DateBounds, DayCard, DistributionSlice,
            PeakDay, ProductShare, ProductWeight, SoldLineItem, WeekdayRevenue, WorstDay,
        },
        sales::DateRange,
    },
};

/// Fatias abaixo deste percentual vão para "Outros" no gráfico de pizza.
pub const LONG_TAIL_THRESHOLD_PCT: u32 = 3;
pub const OTHERS_LABEL: &str = "Outros";

#[derive(Clone)]
pub struct DashboardService {
    snapshot: Arc<SalesSnapshot>,
}

impl DashboardService {
    pub fn new(snapshot: Arc<SalesSnapshot>) -> Self {
        Self { snapshot }
    }

    // Soma por data. BTreeMap mantém as datas em ordem crescente,
    // o que define o desempate (a menor data vence).
    fn daily_totals(&self, range: Option<DateRange>) -> BTreeMap<NaiveDate, Decimal> {
        let mut totals = BTreeMap::new();
        for sale in self.snapshot.sales_in(range) {
            *totals.entry(sale.date).or_insert(Decimal::ZERO) += sale.sale_value;
        }
        totals
    }

    fn product_name(&self, product_id: &str) -> Option<String> {
        self.snapshot.product(product_id).map(|p| p.name.clone())
    }

    pub fn date_bounds(&self) -> Option<DateBounds> {
        self.snapshot
            .date_bounds()
            .map(|(first_sale, last_sale)| DateBounds { first_sale, last_sale })
    }

    pub fn product_names(&self) -> Vec<String> {
        self.snapshot.product_names().into_iter().map(str::to_string).collect()
    }

    // --- 1. Faturamento diário ---
    pub fn daily_revenue(&self, range: Option<DateRange>) -> Vec<DailyRevenue> {
        self.daily_totals(range)
            .into_iter()
            .map(|(date, total_value)| DailyRevenue { date, total_value })
            .collect()
    }

    // --- 2. Melhor dia ---
    pub fn best_day(&self, range: Option<DateRange>) -> Option<BestDay> {
        let (date, total) = extreme_day(&self.daily_totals(range), |candidate, current| {
            candidate > current
        })?;

        let line_items = self
            .snapshot
            .sales_in(range)
            .filter(|sale| sale.date == date)
            .map(|sale| SoldLineItem {
                product_name: self.product_name(&sale.product_id),
                sale_value: sale.sale_value,
            })
            .collect();

        Some(BestDay { date, total, line_items })
    }

    // --- 3. Pior dia ---
    pub fn worst_day(&self, range: Option<DateRange>) -> Option<WorstDay> {
        extreme_day(&self.daily_totals(range), |candidate, current| candidate < current)
            .map(|(date, total)| WorstDay { date, total })
    }

    // --- 4. Média diária (média das somas por data, não das linhas) ---
    pub fn mean_daily_revenue(&self, range: Option<DateRange>) -> Option<Decimal> {
        let totals = self.daily_totals(range);
        if totals.is_empty() {
            return None;
        }
        let sum: Decimal = totals.values().sum();
        Some(sum / Decimal::from(totals.len() as u64))
    }

    // --- 5. Faturamento total ---
    pub fn total_revenue(&self, range: Option<DateRange>) -> Decimal {
        self.snapshot.sales_in(range).map(|sale| sale.sale_value).sum()
    }

    // --- 6. Ranking por peso vendido ---
    pub fn product_weight_ranking(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<ProductWeight>, AppError> {
        let mut weights: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut has_unresolved = false;

        for sale in self.snapshot.sales_in(range) {
            // Left join: venda sem produto cadastrado não some, vai para a linha sem nome
            let Some(product) = self.snapshot.product(&sale.product_id) else {
                has_unresolved = true;
                continue;
            };

            let price = match product.price_per_kg {
                Some(price) if price > Decimal::ZERO => price,
                Some(_) => {
                    return Err(AppError::DataQuality {
                        product_id: product.product_id.clone(),
                        reason: "preço por kg zerado ou negativo".into(),
                    });
                }
                None => {
                    return Err(AppError::DataQuality {
                        product_id: product.product_id.clone(),
                        reason: "preço por kg ausente".into(),
                    });
                }
            };

            let weight = sale.sale_value.checked_div(price).ok_or_else(|| AppError::DataQuality {
                product_id: product.product_id.clone(),
                reason: "peso fora do intervalo representável".into(),
            })?;
            *weights.entry(product.name.clone()).or_insert(Decimal::ZERO) += weight;
        }

        let mut ranking: Vec<ProductWeight> = weights
            .into_iter()
            .map(|(name, weight)| ProductWeight {
                product_name: Some(name),
                total_weight_kg: Some(weight),
            })
            .collect();
        // sort_by é estável: empates ficam em ordem alfabética
        ranking.sort_by(|a, b| b.total_weight_kg.cmp(&a.total_weight_kg));

        if has_unresolved {
            tracing::debug!("Ranking com vendas de produtos não cadastrados");
            ranking.push(ProductWeight {
                product_name: None,
                total_weight_kg: None,
            });
        }

        Ok(ranking)
    }

    // --- 7. Faturamento por dia da semana (segunda -> domingo) ---
    pub fn weekday_breakdown(&self, range: Option<DateRange>) -> Vec<WeekdayRevenue> {
        let mut grouped: BTreeMap<u32, (Weekday, BTreeMap<Option<String>, Decimal>)> =
            BTreeMap::new();

        for sale in self.snapshot.sales_in(range) {
            let weekday = sale.date.weekday();
            let (_, products) = grouped
                .entry(weekday.number_from_monday())
                .or_insert_with(|| (weekday, BTreeMap::new()));
            *products
                .entry(self.product_name(&sale.product_id))
                .or_insert(Decimal::ZERO) += sale.sale_value;
        }

        grouped
            .into_iter()
            .map(|(weekday_number, (weekday, products))| {
                let total: Decimal = products.values().sum();
                let mut shares: Vec<ProductShare> = products
                    .into_iter()
                    .map(|(product_name, value)| ProductShare {
                        product_name,
                        value,
                        share_pct: percentage(value, total),
                    })
                    .collect();
                // Produto sem cadastro vai para o fim
                shares.sort_by_key(|share| share.product_name.is_none());

                WeekdayRevenue {
                    weekday_number,
                    weekday: weekday_label(weekday).to_string(),
                    total,
                    products: shares,
                }
            })
            .collect()
    }

    // --- 8. Dia em que um produto mais vendeu ---
    pub fn peak_day_for_product(
        &self,
        product_name: &str,
        range: Option<DateRange>,
    ) -> Option<PeakDay> {
        let mut totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for sale in self.snapshot.sales_in(range) {
            let matches = self
                .snapshot
                .product(&sale.product_id)
                .is_some_and(|p| p.name == product_name);
            if matches {
                *totals.entry(sale.date).or_insert(Decimal::ZERO) += sale.sale_value;
            }
        }

        extreme_day(&totals, |candidate, current| candidate > current)
            .map(|(date, value)| PeakDay { date, value })
    }

    // --- 9. Distribuição (pizza) com "Outros" ---
    pub fn distribution(
        &self,
        range: Option<DateRange>,
        threshold_pct: Decimal,
    ) -> Result<Vec<DistributionSlice>, AppError> {
        let ranking = self.product_weight_ranking(range)?;
        Ok(long_tail_bucketing(&ranking, threshold_pct))
    }

    // --- 10. Resumo (cards do painel) ---
    pub fn summary(&self, range: Option<DateRange>) -> DashboardSummary {
        let total_revenue = self.total_revenue(range);
        let mean = self.mean_daily_revenue(range);

        let card = |date: NaiveDate, total: Decimal| DayCard {
            date,
            weekday: weekday_label(date.weekday()).to_string(),
            total,
            total_display: format_brl(total),
            vs_mean: mean.map(|m| total - m),
        };

        DashboardSummary {
            total_revenue,
            total_revenue_display: format_brl(total_revenue),
            mean_daily_revenue: mean,
            best_day: self.best_day(range).map(|best| card(best.date, best.total)),
            worst_day: self.worst_day(range).map(|worst| card(worst.date, worst.total)),
        }
    }
}

// Percorre as datas em ordem e só troca quando o candidato é estritamente melhor
fn extreme_day(
    totals: &BTreeMap<NaiveDate, Decimal>,
    is_better: impl Fn(Decimal, Decimal) -> bool,
) -> Option<(NaiveDate, Decimal)> {
    totals.iter().fold(None, |best, (&date, &total)| match best {
        Some((_, current)) if !is_better(total, current) => best,
        _ => Some((date, total)),
    })
}

fn percentage(part: Decimal, total: Decimal) -> Decimal {
    (part * Decimal::ONE_HUNDRED)
        .checked_div(total)
        .unwrap_or(Decimal::ZERO)
}

/// Agrupa a cauda longa do ranking numa fatia "Outros".
///
/// Cada produto recebe sua participação no peso total. Quem fica abaixo de
/// `threshold_pct` é somado em "Outros" (sempre a última fatia); os demais
/// passam intactos, na ordem do ranking. Linhas sem peso calculável
/// (produto não cadastrado) ficam fora da distribuição.
pub fn long_tail_bucketing(ranking: &[ProductWeight], threshold_pct: Decimal) -> Vec<DistributionSlice> {
    let weighted: Vec<(&str, Decimal)> = ranking
        .iter()
        .filter_map(|entry| Some((entry.product_name.as_deref()?, entry.total_weight_kg?)))
        .collect();

    let total: Decimal = weighted.iter().map(|(_, weight)| *weight).sum();
    if total.is_zero() {
        return Vec::new();
    }

    let mut slices = Vec::with_capacity(weighted.len() + 1);
    let mut others = Decimal::ZERO;
    let mut has_others = false;

    for (name, weight) in weighted {
        let share_pct = percentage(weight, total);
        if share_pct < threshold_pct {
            others += weight;
            has_others = true;
        } else {
            slices.push(DistributionSlice {
                label: name.to_string(),
                total_weight_kg: weight,
                share_pct,
            });
        }
    }

    if has_others {
        slices.push(DistributionSlice {
            label: OTHERS_LABEL.to_string(),
            total_weight_kg: others,
            share_pct: percentage(others, total),
        });
    }

    slices
}
