//! Plain-text rendering of views and reports.

use std::fmt::Write;

use agua_lib::report::{CorteCaja, EstadoCuenta};
use agua_views::PageMarker;
use agua_views::form::DropdownOption;
use agua_views::table::TableView;
use rust_decimal::Decimal;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

fn money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

/// Renders a table snapshot as aligned columns plus the page window.
pub fn render_table(view: &TableView) -> String {
    if view.loading {
        return "Cargando...".to_string();
    }

    let mut out = String::new();
    if !view.search.is_empty() {
        let _ = writeln!(out, "Búsqueda: \"{}\"", view.search);
    }
    if view.rows.is_empty() {
        out.push_str("Sin resultados");
        return out;
    }

    let mut widths: Vec<usize> = view.headers.iter().map(|h| h.chars().count()).collect();
    for row in &view.rows {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let id_width = view
        .rows
        .iter()
        .map(|r| r.id.chars().count())
        .max()
        .unwrap_or(0)
        .max(2);

    let header: Vec<String> = view
        .headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w))
        .collect();
    let _ = writeln!(out, "{}  {}", pad("Id", id_width), header.join("  ").trim_end());
    for row in &view.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c, *w))
            .collect();
        let _ = writeln!(out, "{}  {}", pad(&row.id, id_width), cells.join("  ").trim_end());
    }

    let window: Vec<String> = view
        .window
        .iter()
        .map(|marker| match marker {
            PageMarker::Page(n) if *n == view.page => format!("[{}]", n),
            PageMarker::Page(n) => n.to_string(),
            PageMarker::Ellipsis => "…".to_string(),
        })
        .collect();
    let _ = write!(
        out,
        "Página {} de {} ({} registros)  {}",
        view.page,
        view.total_pages,
        view.total_items,
        window.join(" ")
    );
    out
}

/// Numbered dropdown entries with matches in bold.
pub fn render_dropdown(options: &[DropdownOption]) -> String {
    if options.is_empty() {
        return "  (sin coincidencias)".to_string();
    }
    let mut out = String::new();
    for (i, option) in options.iter().enumerate() {
        let label: String = option
            .segments
            .iter()
            .map(|s| {
                if s.highlighted {
                    format!("{}{}{}", BOLD, s.text, RESET)
                } else {
                    s.text.clone()
                }
            })
            .collect();
        let _ = writeln!(out, "  {}) {}", i + 1, label);
    }
    out.trim_end().to_string()
}

pub fn render_corte(corte: &CorteCaja) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Corte de caja del {} al {}", corte.desde, corte.hasta);
    let _ = writeln!(out, "Pagos: {}", corte.total_pagos());
    let _ = writeln!(out, "Bruto: {}", money(corte.bruto));
    let _ = writeln!(out, "Descuentos: {}", money(corte.descuentos));
    let _ = writeln!(out, "Neto: {}", money(corte.neto));
    out.push_str("Por método:\n");
    for (metodo, total) in &corte.por_metodo {
        let _ = writeln!(out, "  {} {}", pad(metodo.as_str(), 14), money(*total));
    }
    out.push_str("Por cobrador:");
    for grupo in &corte.por_cobrador {
        let _ = write!(
            out,
            "\n  {} {:>3} pagos  {}",
            pad(&grupo.nombre, 20),
            grupo.pagos,
            money(grupo.neto)
        );
    }
    out
}

pub fn render_estado(estado: &EstadoCuenta) -> String {
    let cuenta = &estado.cuentahabiente;
    let mut out = String::new();
    let _ = writeln!(out, "Estado de cuenta {} - {}", cuenta.numero_cuenta, cuenta.nombre);
    let _ = writeln!(out, "{}", cuenta.direccion);
    for m in &estado.movimientos {
        let cargo = if m.cargo.is_zero() { String::new() } else { money(m.cargo) };
        let abono = if m.abono.is_zero() { String::new() } else { money(m.abono) };
        let _ = writeln!(
            out,
            "{}  {}  {:>12}  {:>12}  {:>12}",
            m.fecha,
            pad(&m.concepto, 28),
            cargo,
            abono,
            money(m.saldo)
        );
    }
    let _ = write!(
        out,
        "Cargos {}  Abonos {}  Saldo {}{}",
        money(estado.total_cargos),
        money(estado.total_abonos),
        money(estado.saldo),
        if estado.tiene_adeudo() { " (con adeudo)" } else { "" }
    );
    out
}
