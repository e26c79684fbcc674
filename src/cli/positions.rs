use super::ui;
use crate::core::portfolio::{Portfolio, RefreshReport};
use crate::core::PurchasedPosition;
use anyhow::Result;
use comfy_table::Cell;

pub fn positions_table(positions: &[PurchasedPosition]) -> String {
    let mut table = ui::new_table(&["Scheme", "Units", "Unit Value", "Holding", "Purchased"]);

    let mut total = 0.0;
    for position in positions {
        let holding = position.value.map(|value| position.units * value);
        total += holding.unwrap_or_default();
        table.add_row(vec![
            Cell::new(&position.scheme_name),
            ui::number_cell(position.units),
            ui::format_optional_cell(position.value, |v| format!("{v:.2}")),
            ui::format_optional_cell(holding, |v| format!("{v:.2}")),
            ui::format_optional_cell(position.purchase_time, |t| {
                t.format("%Y-%m-%d %H:%M").to_string()
            }),
        ]);
    }

    format!(
        "{}\n\n{}\n\n{}: {}",
        ui::style_text("Purchased Funds", ui::StyleType::Title),
        table,
        ui::style_text("Total Value", ui::StyleType::TotalLabel),
        ui::style_text(&format!("{total:.2}"), ui::StyleType::TotalValue)
    )
}

pub fn report_summary(report: &RefreshReport) -> String {
    let mut output = ui::style_text(
        &format!("Updated {} scheme(s)", report.updated.len()),
        ui::StyleType::Subtle,
    );
    for (scheme, reason) in &report.failed {
        output.push('\n');
        output.push_str(&ui::style_text(
            &format!("Could not refresh {scheme}: {reason}"),
            ui::StyleType::Error,
        ));
    }
    output
}

pub fn print_positions(positions: &[PurchasedPosition]) {
    if positions.is_empty() {
        println!("No purchased funds yet.");
    } else {
        println!("{}", positions_table(positions));
    }
}

pub async fn show(portfolio: &Portfolio) -> Result<()> {
    portfolio.reload().await?;
    print_positions(&portfolio.positions().await);
    Ok(())
}

/// Loads the positions and revalues them once, right away.
pub async fn refresh(portfolio: &Portfolio) -> Result<()> {
    portfolio.reload().await?;
    let scheme_count = {
        let mut names: Vec<_> = portfolio
            .positions()
            .await
            .into_iter()
            .map(|p| p.scheme_name)
            .collect();
        names.sort();
        names.dedup();
        names.len()
    };

    let pb = ui::new_progress_bar(scheme_count as u64, true);
    pb.set_message("Refreshing values...");
    let pb_clone = pb.clone();
    let report = portfolio
        .refresh_values_with_progress(&move || pb_clone.inc(1))
        .await;
    pb.finish_and_clear();

    print_positions(&portfolio.positions().await);
    println!("\n{}", report_summary(&report));
    Ok(())
}
