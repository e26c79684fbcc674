use super::ui;
use crate::core::browser::{BrowserPhase, FundBrowser};
use crate::core::{FundFamily, FundGateway, Scheme};
use anyhow::{Result, anyhow};
use comfy_table::Cell;
use std::sync::Arc;

pub fn families_table(families: &[FundFamily]) -> String {
    let mut table = ui::new_table(&["#", "Fund Family"]);
    for (i, family) in families.iter().enumerate() {
        table.add_row(vec![Cell::new(i + 1), Cell::new(family.id())]);
    }
    table.to_string()
}

pub fn schemes_table(family: &str, schemes: &[Scheme]) -> String {
    let mut table = ui::new_table(&["Code", "Scheme", "NAV", "Category"]);
    for scheme in schemes {
        table.add_row(vec![
            Cell::new(&scheme.code),
            Cell::new(scheme.display_name()),
            ui::format_optional_cell(scheme.nav, |n| format!("{n:.4}")),
            Cell::new(scheme.category.as_deref().unwrap_or("")),
        ]);
    }

    format!(
        "Family: {}\n\n{}",
        ui::style_text(family, ui::StyleType::Title),
        table
    )
}

pub async fn families(gateway: &dyn FundGateway) -> Result<()> {
    let families = gateway.list_families().await?;
    if families.is_empty() {
        println!("The backend reported no fund families.");
        return Ok(());
    }
    println!("{}", families_table(&families));
    Ok(())
}

pub async fn schemes(gateway: Arc<dyn FundGateway>, family: &str) -> Result<()> {
    let browser = FundBrowser::new(gateway);
    browser.select_family(family).await;

    let view = browser.view().await;
    match view.phase {
        BrowserPhase::SchemesLoaded if view.schemes.is_empty() => {
            println!("No schemes found for {family}.");
            Ok(())
        }
        BrowserPhase::SchemesLoaded => {
            println!("{}", schemes_table(family, &view.schemes));
            Ok(())
        }
        BrowserPhase::LoadError(message) => Err(anyhow!(message)),
        BrowserPhase::NoFamilySelected | BrowserPhase::LoadingSchemes => {
            Err(anyhow!("No fund family selected"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemes_table_lists_codes_and_names() {
        let schemes = vec![Scheme::new("120503", "Axis Bluechip Fund")];
        let output = schemes_table("Axis Mutual Fund", &schemes);
        assert!(output.contains("120503"));
        assert!(output.contains("Axis Bluechip Fund"));
        assert!(output.contains("N/A"));
    }

    #[test]
    fn test_families_table_numbers_rows() {
        let output = families_table(&[FundFamily::from("Axis"), FundFamily::from("HDFC")]);
        assert!(output.contains("Axis"));
        assert!(output.contains("HDFC"));
        assert!(output.contains('2'));
    }
}
