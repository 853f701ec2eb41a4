//! Self-contained HTML report rendering.
//!
//! No external assets: styles are inlined so the file can be opened from
//! disk or attached to an email as-is.

use std::collections::BTreeMap;

use lomarosa_core::{
  classify::{StockHealth, StockLevel},
  derive::WeeksOfStock,
};

use crate::{config::DashboardConfig, product::ProductRow, stats::InventoryStats};

pub fn render(
  rows: &[ProductRow],
  stats: &InventoryStats,
  config: &DashboardConfig,
  generated_at: &str,
) -> String {
  format!(
    r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
  body {{ font-family: Arial, sans-serif; margin: 0; background: #f5f6fa; color: #2c3e50; }}
  header {{ background: #2c3e50; color: #fff; padding: 24px 32px; }}
  header h1 {{ margin: 0 0 4px 0; font-size: 24px; }}
  header p {{ margin: 0; color: #bdc3c7; font-size: 13px; }}
  main {{ padding: 24px 32px; }}
  .cards {{ display: flex; flex-wrap: wrap; gap: 16px; margin-bottom: 32px; }}
  .card {{ background: #fff; border-radius: 8px; padding: 16px 24px; min-width: 160px;
           box-shadow: 0 1px 3px rgba(0,0,0,0.1); }}
  .card .value {{ font-size: 28px; font-weight: bold; }}
  .card .label {{ font-size: 12px; color: #7f8c8d; text-transform: uppercase; }}
  table {{ border-collapse: collapse; width: 100%; background: #fff; margin-bottom: 32px;
           box-shadow: 0 1px 3px rgba(0,0,0,0.1); }}
  th {{ background: #34495e; color: #fff; padding: 8px 12px; text-align: left; font-size: 13px; }}
  td {{ padding: 8px 12px; border-bottom: 1px solid #ecf0f1; font-size: 13px; }}
  .critico {{ color: #c0392b; font-weight: bold; }}
  .advertencia {{ color: #e67e22; font-weight: bold; }}
  .adecuado {{ color: #27ae60; }}
  .sin-datos {{ color: #7f8c8d; }}
  footer {{ padding: 16px 32px; color: #7f8c8d; font-size: 12px; }}
</style>
</head>
<body>
<header>
  <h1>{title}</h1>
  <p>{company} · Actualizado: {generated_at}</p>
</header>
<main>
{cards}
<h2>Cobertura por producto</h2>
{coverage_table}
<h2>Productos críticos o sin stock</h2>
{critical_table}
<h2>Resumen por familia</h2>
{family_table}
</main>
<footer>{company}</footer>
</body>
</html>
"#,
    title = html_escape(&config.title),
    company = html_escape(&config.company),
    generated_at = generated_at,
    cards = render_cards(stats),
    coverage_table = render_coverage_table(rows),
    critical_table = render_critical_table(rows),
    family_table = render_family_table(rows),
  )
}

fn render_cards(stats: &InventoryStats) -> String {
  let card = |value: String, label: &str| {
    format!(
      "  <div class=\"card\"><div class=\"value\">{value}</div>\
       <div class=\"label\">{label}</div></div>\n"
    )
  };
  format!(
    "<div class=\"cards\">\n{}{}{}{}{}{}</div>",
    card(stats.total_productos.to_string(), "Productos con stock"),
    card(stats.productos_disponibles.to_string(), "Sobre el promedio"),
    card(stats.productos_sin_stock.to_string(), "Bajo el promedio"),
    card(format!("{:.1} kg", stats.stock_total_kilos), "Stock total"),
    card(stats.productos_criticos.to_string(), "Críticos"),
    card(stats.productos_bajo_stock.to_string(), "Stock bajo"),
  )
}

fn coverage_cell(row: &ProductRow) -> (String, &'static str) {
  let class = match row.health {
    StockHealth::Error => "sin-datos",
    StockHealth::Agotado | StockHealth::Critico => "critico",
    StockHealth::SinDatos => "sin-datos",
    StockHealth::Advertencia => "advertencia",
    StockHealth::Adecuado => "adecuado",
  };
  let text = match row.coverage {
    WeeksOfStock::Weeks(w) => format!("{w:.1} semanas"),
    _ => row.health.label().to_string(),
  };
  (text, class)
}

fn render_coverage_table(rows: &[ProductRow]) -> String {
  let mut out = String::from(
    "<table>\n<tr><th>Código</th><th>Producto</th><th>Stock (kg)</th>\
     <th>Promedio semanal</th><th>Cobertura</th><th>Estado</th></tr>\n",
  );
  for row in rows {
    let (coverage, class) = coverage_cell(row);
    let average = match row.weekly_average {
      Some(avg) => format!("{avg:.1}"),
      None => "—".to_string(),
    };
    out.push_str(&format!(
      "<tr><td>{code}</td><td>{product}</td><td>{stock:.1}</td>\
       <td>{average}</td><td class=\"{class}\">{coverage}</td>\
       <td class=\"{class}\">{health}</td></tr>\n",
      code = html_escape(&row.record.code),
      product = html_escape(&row.record.product),
      stock = row.record.quantity,
      health = row.health.label(),
    ));
  }
  out.push_str("</table>");
  out
}

fn render_critical_table(rows: &[ProductRow]) -> String {
  let mut critical: Vec<&ProductRow> = rows
    .iter()
    .filter(|r| {
      matches!(r.level, StockLevel::SinStock | StockLevel::Critico)
    })
    .collect();
  critical.sort_by(|a, b| {
    a.record
      .quantity
      .partial_cmp(&b.record.quantity)
      .unwrap_or(std::cmp::Ordering::Equal)
  });

  if critical.is_empty() {
    return "<p>No hay productos críticos ni agotados.</p>".to_string();
  }

  let mut out = String::from(
    "<table>\n<tr><th>Código</th><th>Producto</th>\
     <th>Stock (kg)</th><th>Nivel</th></tr>\n",
  );
  for row in critical {
    out.push_str(&format!(
      "<tr><td>{code}</td><td>{product}</td><td>{stock:.1}</td>\
       <td class=\"critico\">{level}</td></tr>\n",
      code = html_escape(&row.record.code),
      product = html_escape(&row.record.product),
      stock = row.record.quantity,
      level = row.level.label(),
    ));
  }
  out.push_str("</table>");
  out
}

fn render_family_table(rows: &[ProductRow]) -> String {
  // family -> (total kg, product count)
  let mut families: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
  for row in rows {
    let entry = families.entry(row.family).or_insert((0.0, 0));
    entry.0 += row.record.quantity;
    entry.1 += 1;
  }

  let mut out = String::from(
    "<table>\n<tr><th>Familia</th><th>Productos</th>\
     <th>Stock total (kg)</th><th>Promedio (kg)</th></tr>\n",
  );
  for (family, (total, count)) in families {
    out.push_str(&format!(
      "<tr><td>{family}</td><td>{count}</td><td>{total:.1}</td>\
       <td>{mean:.1}</td></tr>\n",
      mean = total / count as f64,
    ));
  }
  out.push_str("</table>");
  out
}

fn html_escape(text: &str) -> String {
  text
    .replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
    .replace('"', "&quot;")
}
