// src/db/loader.rs

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    common::error::AppError,
    db::SalesSnapshot,
    models::sales::{Product, SaleRecord},
};

// Formato de data usado na planilha de vendas (mês/dia/ano)
const SALE_DATE_FORMAT: &str = "%m/%d/%Y";

// --- Linhas cruas das planilhas (tudo texto, normalizado logo abaixo) ---
#[derive(Debug, Deserialize)]
struct ProductRow {
    #[serde(rename = "ID_PRODUTO")]
    product_id: String,
    #[serde(rename = "NOME_PRODUTO")]
    name: String,
    #[serde(rename = "PREÇO_KG", default)]
    price_per_kg: String,
    #[serde(rename = "PESO_MEDIO_UNITARIO_KG", default)]
    avg_unit_weight_kg: String,
}

#[derive(Debug, Deserialize)]
struct SaleRow {
    #[serde(rename = "ID_PRODUTO")]
    product_id: String,
    #[serde(rename = "DATA")]
    date: String,
    #[serde(rename = "VALOR_VENDA")]
    sale_value: String,
}

/// Converte a URL de edição do Google Sheets para a URL de exportação em CSV.
///
/// `.../edit?gid=123#gid=123` vira `.../export?format=csv&gid=123`.
/// Qualquer outra URL volta sem alteração.
pub fn sheet_export_url(url: &str) -> String {
    let Some((base, _)) = url.split_once("/edit") else {
        return url.to_string();
    };
    let Some((_, after_gid)) = url.split_once("gid=") else {
        return url.to_string();
    };

    let gid: String = after_gid.chars().take_while(|c| c.is_ascii_digit()).collect();
    if gid.is_empty() {
        return url.to_string();
    }

    format!("{base}/export?format=csv&gid={gid}")
}

/// Lê o conteúdo de uma fonte: URL http(s) ou caminho local.
pub async fn fetch_source(source: &str) -> Result<String, AppError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let url = sheet_export_url(source);
        tracing::info!("📥 Baixando planilha de {}", url);
        let text = reqwest::get(&url)
            .await?
            .error_for_status()?
            .text()
            .await?;
        return Ok(text);
    }

    tracing::info!("📂 Lendo planilha local {}", source);
    Ok(tokio::fs::read_to_string(source).await?)
}

// "1.234,50" -> 1234.50 | "12,5" -> 12.5 | "12.5" -> 12.5 | "" -> None
// Com vírgula, pontos só valem como separador de milhar ("1.234,5");
// "1,234.56" e "12.34,5" são rejeitados em vez de virar outro número.
fn parse_decimal(raw: &str) -> Result<Option<Decimal>, rust_decimal::Error> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let normalized = match raw.split_once(',') {
        Some((int_part, frac_part)) => {
            if frac_part.contains([',', '.']) || !has_thousands_groups(int_part) {
                return Err(rust_decimal::Error::ErrorString(format!(
                    "separadores decimais inválidos em '{raw}'"
                )));
            }
            format!("{}.{}", int_part.replace('.', ""), frac_part)
        }
        None => raw.to_string(),
    };
    Decimal::from_str(&normalized).map(Some)
}

// "1.234.567" ok | "1234" ok | "12.34" não
fn has_thousands_groups(int_part: &str) -> bool {
    let digits = int_part.trim_start_matches('-');
    if !digits.contains('.') {
        return true;
    }

    let mut groups = digits.split('.');
    let leading = groups.next().unwrap_or_default();
    (1..=3).contains(&leading.len()) && groups.all(|group| group.len() == 3)
}

fn csv_reader(text: &str) -> csv::Reader<&[u8]> {
    // Remove o BOM do UTF-8 se existir
    let text = text.trim_start_matches('\u{FEFF}');
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

pub fn parse_products(text: &str) -> Result<Vec<Product>, AppError> {
    let mut reader = csv_reader(text);
    let headers = reader.headers()?.clone();
    let mut products = Vec::new();

    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: ProductRow = record.deserialize(Some(&headers))?;

        let price_per_kg = parse_decimal(&row.price_per_kg).map_err(|_| AppError::Parse {
            line,
            field: "PREÇO_KG",
            value: row.price_per_kg.clone(),
        })?;
        let avg_unit_weight_kg =
            parse_decimal(&row.avg_unit_weight_kg).map_err(|_| AppError::Parse {
                line,
                field: "PESO_MEDIO_UNITARIO_KG",
                value: row.avg_unit_weight_kg.clone(),
            })?;

        if price_per_kg.is_none() {
            tracing::warn!("⚠️ Produto '{}' sem preço por kg (linha {})", row.product_id, line);
        }

        products.push(Product {
            product_id: row.product_id,
            name: row.name,
            price_per_kg,
            avg_unit_weight_kg,
        });
    }

    Ok(products)
}

pub fn parse_sales(text: &str) -> Result<Vec<SaleRecord>, AppError> {
    let mut reader = csv_reader(text);
    let headers = reader.headers()?.clone();
    let mut sales = Vec::new();

    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: SaleRow = record.deserialize(Some(&headers))?;

        let date = NaiveDate::parse_from_str(&row.date, SALE_DATE_FORMAT).map_err(|_| {
            AppError::Parse { line, field: "DATA", value: row.date.clone() }
        })?;

        // Valor da venda é obrigatório: vazio também é erro
        let sale_value = match parse_decimal(&row.sale_value) {
            Ok(Some(value)) => value,
            _ => {
                return Err(AppError::Parse {
                    line,
                    field: "VALOR_VENDA",
                    value: row.sale_value,
                });
            }
        };

        sales.push(SaleRecord {
            product_id: row.product_id,
            date,
            sale_value,
        });
    }

    Ok(sales)
}

/// Busca e normaliza as duas planilhas, montando o snapshot imutável da sessão.
pub async fn load_snapshot(
    products_source: &str,
    sales_source: &str,
) -> Result<SalesSnapshot, AppError> {
    let (products_text, sales_text) =
        tokio::try_join!(fetch_source(products_source), fetch_source(sales_source))?;

    let products = parse_products(&products_text)?;
    let sales = parse_sales(&sales_text)?;

    let snapshot = SalesSnapshot::new(products, sales)?;

    let orphan_sales = snapshot
        .sales()
        .iter()
        .filter(|s| snapshot.product(&s.product_id).is_none())
        .count();
    if orphan_sales > 0 {
        tracing::warn!("⚠️ {} vendas com produto não cadastrado", orphan_sales);
    }

    tracing::info!(
        "✅ Planilhas carregadas: {} produtos, {} vendas",
        snapshot.products().len(),
        snapshot.sales().len()
    );

    Ok(snapshot)
}
