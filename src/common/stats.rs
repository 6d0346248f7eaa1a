// src/common/stats.rs
//
// Estatística simples usada pelo painel: reta de mínimos quadrados e média móvel.

use rust_decimal::Decimal;

/// Ajusta uma reta `y = slope * x + intercept` por mínimos quadrados.
///
/// Retorna `None` quando não há pelo menos dois valores distintos de `x`.
pub fn fit_line(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (sxx, sxy) = points.iter().fold((0.0, 0.0), |(sxx, sxy), (x, y)| {
        let dx = x - mean_x;
        (sxx + dx * dx, sxy + dx * (y - mean_y))
    });

    // Todos os x iguais: reta indefinida
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

/// Média móvel simples (sem pesos). Tamanho da saída: `len - window + 1`,
/// ou vazio quando a série é menor que a janela.
pub fn moving_average(values: &[Decimal], window: usize) -> Vec<Decimal> {
    if window == 0 || values.len() < window {
        return Vec::new();
    }

    let divisor = Decimal::from(window as u64);
    let mut sum: Decimal = values[..window].iter().sum();
    let mut out = Vec::with_capacity(values.len() - window + 1);
    out.push(sum / divisor);

    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out.push(sum / divisor);
    }
    out
}
