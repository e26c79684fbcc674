use super::ui;
use crate::core::purchase::{PurchaseOutcome, PurchaseWorkflow};
use anyhow::Result;
use tracing::info;

pub async fn run(workflow: &PurchaseWorkflow, scheme_code: &str, units: Option<u32>) -> Result<()> {
    let units = units.unwrap_or(workflow.default_units());
    info!(scheme_code, units, "Submitting purchase");
    match workflow.buy(scheme_code, Some(units)).await {
        PurchaseOutcome::Completed {
            confirmation,
            reload_error,
        } => {
            println!(
                "{}",
                ui::style_text(&confirmation.message, ui::StyleType::Success)
            );
            if let Some(value) = confirmation.current_value {
                println!(
                    "{}",
                    ui::style_text(&format!("Unit value: {value:.2}"), ui::StyleType::Subtle)
                );
            }
            if let Some(reason) = reload_error {
                println!(
                    "{}",
                    ui::style_text(
                        &format!("Could not reload purchased funds: {reason}"),
                        ui::StyleType::Error
                    )
                );
            }
            Ok(())
        }
        PurchaseOutcome::Failed(e) => Err(e.into()),
    }
}
