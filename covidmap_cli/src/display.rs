use comfy_table::{presets::NOTHING, *};

use covidmap::{assemble::format_thousands, reshape::CasesByDate};

/// Build a table of the `max_results` most recent dates (or all of them).
pub fn dates_table(cases: &CasesByDate, max_results: Option<usize>) -> anyhow::Result<Table> {
    let skip = max_results
        .map(|max| cases.len().saturating_sub(max))
        .unwrap_or_default();
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Date").add_attribute(Attribute::Bold),
            Cell::new("Locations").add_attribute(Attribute::Bold),
            Cell::new("Confirmed cases").add_attribute(Attribute::Bold),
        ])
        .set_style(comfy_table::TableComponent::BottomBorder, '─')
        .set_style(comfy_table::TableComponent::MiddleHeaderIntersections, '─')
        .set_style(comfy_table::TableComponent::HeaderLines, '─')
        .set_style(comfy_table::TableComponent::BottomBorderIntersections, '─')
        .set_style(comfy_table::TableComponent::TopBorder, '─')
        .set_style(comfy_table::TableComponent::TopBorderIntersections, '─');
    for case_table in cases.iter().skip(skip) {
        table.add_row(vec![
            case_table.date.clone(),
            case_table.num_locations().to_string(),
            format_thousands(case_table.total_cases()?),
        ]);
    }
    for index in [1, 2] {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    Ok(table)
}

pub fn display_dates(cases: &CasesByDate, max_results: Option<usize>) -> anyhow::Result<()> {
    println!("\n{}", dates_table(cases, max_results)?);
    Ok(())
}
