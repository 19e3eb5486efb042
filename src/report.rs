//! Plain-text rendering of a field view. Values are rounded to two decimals
//! here and nowhere else.

use std::fmt::Write;

use crate::view::FieldView;

const EMPTY_MESSAGE: &str = "No fields yet, add one to see projections.";

pub fn render_table(view: &FieldView<'_>) -> String {
    if view.is_empty() {
        return format!("{EMPTY_MESSAGE}\n");
    }

    let name_width = view
        .rows
        .iter()
        .map(|row| row.field.name().chars().count())
        .chain(std::iter::once("Total".len()))
        .max()
        .unwrap_or(5);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<name_width$}  {:>10}  {:<10}  {:>14}  {:>14}",
        "Name", "Area (ha)", "Crop", "Baseline (t)", "Adjusted (t)"
    );
    for row in &view.rows {
        let _ = writeln!(
            out,
            "{:<name_width$}  {:>10.2}  {:<10}  {:>14.2}  {:>14.2}",
            row.field.name(),
            row.field.area(),
            row.field.crop().label(),
            row.baseline_yield,
            row.adjusted_yield
        );
    }
    let _ = writeln!(
        out,
        "{:<name_width$}  {:>10.2}  {:<10}  {:>14.2}  {:>14.2}",
        "Total",
        view.totals.total_area,
        "-",
        view.totals.total_baseline_yield,
        view.totals.total_adjusted_yield
    );
    out
}
