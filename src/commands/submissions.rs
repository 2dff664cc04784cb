use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, CellAlignment, Table};

use crate::config;
use crate::formatting;
use crate::store::{JsonFileStore, ScenarioStore};

/// Render the recent-submissions listing the sales team works from.
pub fn list_submissions(limit: usize) -> Result<()> {
    let store_config = config::get_config().store.clone().unwrap_or_default();
    let store = JsonFileStore::new(store_config.directory)?;
    let summaries = store.recent(limit)?;

    if summaries.is_empty() {
        println!("No submissions recorded");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "ID", "Date", "Company", "Contact", "Email", "Annual Savings", "ROI", "Payback", "Safe",
    ]);

    for summary in &summaries {
        table.add_row(vec![
            summary.id.to_string(),
            summary.created_at.format("%Y-%m-%d").to_string(),
            summary.company_name.clone(),
            summary.full_name.clone(),
            summary.email.clone(),
            formatting::currency_whole(summary.total_annual_savings),
            formatting::percent(summary.annual_roi),
            format!("{} mo", formatting::months(summary.payback_months)),
            if summary.is_safe { "yes" } else { "REVIEW" }.to_string(),
        ]);
    }
    for column in table.column_iter_mut().skip(5).take(3) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    println!("{}", table);
    Ok(())
}
