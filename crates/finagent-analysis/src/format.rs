//! Markdown rendering of statement tables

use crate::statement::StatementTable;
use comfy_table::Table;
use comfy_table::presets::ASCII_MARKDOWN;

/// Placeholder for a table without rows
pub const EMPTY_TABLE: &str = "_No data available._";

const ABSENT_CELL: &str = "-";

/// Render a table as markdown; absent cells show as `-`
pub fn format_table(table: &StatementTable) -> String {
    if table.is_empty() {
        return EMPTY_TABLE.to_string();
    }

    let mut out = Table::new();
    out.load_preset(ASCII_MARKDOWN);

    let mut header = vec!["Line Item".to_string()];
    header.extend(table.periods().iter().cloned());
    out.set_header(header);

    for row in table.rows() {
        let mut cells = vec![row.label.clone()];
        cells.extend(row.values.iter().map(|v| format_value(*v)));
        out.add_row(cells);
    }

    out.to_string()
}

/// Whole numbers without decimals, fractions below 0.01 with four
/// decimals, everything else with two
pub fn format_value(value: Option<f64>) -> String {
    let Some(v) = value else {
        return ABSENT_CELL.to_string();
    };
    // -0.0 + 0.0 is +0.0
    let v = v + 0.0;

    if v.fract().abs() < f64::EPSILON {
        format!("{v:.0}")
    } else if v.abs() < 0.01 {
        format!("{v:.4}")
    } else {
        format!("{v:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(None), "-");
        assert_eq!(format_value(Some(1_500_000.0)), "1500000");
        assert_eq!(format_value(Some(-3.0)), "-3");
        assert_eq!(format_value(Some(2.456)), "2.46");
    }

    #[test]
    fn test_negative_zero_and_small_ratios() {
        assert_eq!(format_value(Some(-0.0)), "0");
        assert_eq!(format_value(Some(0.003)), "0.0030");
        assert_eq!(format_value(Some(-0.0042)), "-0.0042");
        assert_eq!(format_value(Some(0.01)), "0.01");
    }

    #[test]
    fn test_empty_table_placeholder() {
        assert_eq!(format_table(&StatementTable::new(["2023"])), EMPTY_TABLE);
    }

    #[test]
    fn test_markdown_table() {
        let table = StatementTable::new(["2023", "2022"])
            .with_row("Revenue", vec![Some(100.0), None])
            .with_row("Dividend Coverage Ratio", vec![Some(1.25), Some(3.0)]);

        let text = format_table(&table);
        let lines: Vec<&str> = text.lines().collect();

        // header, separator, two rows
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Line Item") && lines[0].contains("2022"));
        assert!(lines[2].contains("Revenue") && lines[2].contains("100"));
        let cells: Vec<&str> = lines[2].split('|').map(str::trim).collect();
        assert_eq!(cells[1..4], ["Revenue", "100", "-"]);
        assert!(lines[3].contains("1.25"));
        assert!(lines.iter().all(|l| l.starts_with('|')));
    }

    #[test]
    fn test_rendering_is_stable() {
        let table = StatementTable::new(["2023"]).with_row("Cash", vec![Some(7.0)]);
        assert_eq!(format_table(&table), format_table(&table));
    }
}
