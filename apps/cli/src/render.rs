//! # Rendering
//!
//! Turns command results into text for the terminal, or JSON for `--json`.
//!
//! ## Bill Banner
//! ```text
//! ================================================================================
//!                                  THE CAKE SHOP
//! ================================================================================
//! BILL #1001                                                     Date: 2024-05-01
//! --------------------------------------------------------------------------------
//! No.  Item Code       Qty      Sale Price   Discount   Disc. Price  Line Total
//! --------------------------------------------------------------------------------
//! 1    Cake124         2        Rs.15.00     10%        Rs.13.50     Rs.27.00
//! --------------------------------------------------------------------------------
//! Grand Total:                                                           Rs.27.00
//! ================================================================================
//! ```
//!
//! Every function returns the text; printing is left to the caller.

use serde::Serialize;

use till_core::pricing::format_plain;
use till_core::{Bill, Item, ItemRecord};
use till_store::{TaxExport, TaxFileReport};

use crate::commands::basket::BasketView;
use crate::commands::tax::CleanupCounts;
use crate::error::AppError;
use crate::state::AppConfig;

/// Banner and table width.
pub const WIDTH: usize = 80;

fn border() -> String {
    "=".repeat(WIDTH)
}

fn divider() -> String {
    "-".repeat(WIDTH)
}

/// Pretty JSON for `--json` output.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn line_header() -> String {
    format!(
        "{:<4} {:<15} {:<8} {:<12} {:<10} {:<12} {:<12}",
        "No.", "Item Code", "Qty", "Sale Price", "Discount", "Disc. Price", "Line Total"
    )
}

fn line_row(config: &AppConfig, number: usize, record: &ItemRecord) -> String {
    format!(
        "{:<4} {:<15} {:<8} {:<12} {:<10} {:<12} {:<12}",
        number,
        record.item_code,
        record.quantity,
        config.format_currency(record.sale_price),
        format!("{}%", format_plain(record.discount_percent)),
        config.format_currency(record.discounted_price),
        config.format_currency(record.line_total()),
    )
    .trim_end()
    .to_string()
}

/// Basket lines with their 1-based positions and the basket total.
pub fn basket_table(config: &AppConfig, view: &BasketView) -> String {
    if view.items.is_empty() {
        return "Basket is empty.".to_string();
    }

    let mut lines = vec![line_header(), divider()];
    for (index, record) in view.items.iter().enumerate() {
        lines.push(line_row(config, index + 1, record));
    }

    lines.push(divider());
    lines.push(format!(
        "{:<68}{}",
        "Basket Total:",
        config.format_currency(view.total)
    ));
    lines.join("\n")
}

/// One item after add or update, with its computed discounted price.
pub fn item_summary(config: &AppConfig, item: &Item) -> String {
    let mut text = format!(
        "{}  cost {}  sale {}  discount {}%  discounted {}  x{}",
        item.item_code(),
        config.format_currency(item.cost()),
        config.format_currency(item.sale_price()),
        format_plain(item.discount_percent()),
        config.format_currency(item.discounted_price()),
        item.quantity()
    );
    if item.is_below_cost() {
        text.push_str("  (below cost)");
    }
    text
}

/// Full bill printout.
pub fn bill_banner(config: &AppConfig, bill: &Bill) -> String {
    let mut lines = vec![
        border(),
        format!("{:^width$}", config.store.name, width = WIDTH),
        border(),
        format!(
            "{:<40}{:>40}",
            format!("BILL #{}", bill.id()),
            format!("Date: {}", bill.created_on().format("%Y-%m-%d"))
        ),
        divider(),
        line_header(),
        divider(),
    ];

    for (index, record) in bill.items().iter().enumerate() {
        lines.push(line_row(config, index + 1, record));
    }

    lines.push(divider());
    lines.push(format!(
        "{:<40}{:>40}",
        "Grand Total:",
        config.format_currency(bill.grand_total())
    ));
    lines.push(border());

    lines
        .into_iter()
        .map(|line| line.trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One row per bill.
pub fn bills_table(config: &AppConfig, bills: &[Bill]) -> String {
    if bills.is_empty() {
        return "No bills yet.".to_string();
    }

    let mut lines = vec![
        format!("{:<8} {:<12} {:>6} {:>14}", "Bill", "Date", "Items", "Grand Total"),
        divider(),
    ];

    for bill in bills {
        lines.push(format!(
            "{:<8} {:<12} {:>6} {:>14}",
            bill.id(),
            bill.created_on().format("%Y-%m-%d").to_string(),
            bill.item_count(),
            config.format_currency(bill.grand_total())
        ));
    }

    lines.join("\n")
}

/// Confirmation line after a tax file was written.
pub fn export_summary(export: &TaxExport) -> String {
    let bills = if export.bills == 1 { "bill" } else { "bills" };
    format!(
        "Tax Transaction File generated successfully: '{}' ({} lines from {} {})",
        export.path.display(),
        export.lines,
        export.bills,
        bills
    )
}

/// Line-by-line verification result.
pub fn tax_report(config: &AppConfig, report: &TaxFileReport) -> String {
    let mut lines = vec![
        format!("Tax file: {}", report.path.display()),
        format!(
            "{:<6} {:<15} {:>10} {:>12}  {}",
            "Line", "Item Code", "Checksum", "Profit", "Status"
        ),
        divider(),
    ];

    for line in &report.lines {
        let status = if line.is_valid() {
            "OK".to_string()
        } else {
            let problems: Vec<String> = line.problems.iter().map(ToString::to_string).collect();
            format!("INVALID: {}", problems.join("; "))
        };

        lines.push(format!(
            "{:<6} {:<15} {:>10} {:>12}  {}",
            line.line_number,
            line.item_code,
            line.stated_checksum,
            config.format_currency(line.profit),
            status
        ));
    }

    lines.push(divider());
    lines.push(format!(
        "Valid: {}  Invalid: {}  Total profit: {}",
        report.valid_count,
        report.invalid_count,
        config.format_currency(report.total_profit)
    ));
    lines.join("\n")
}

/// What a tax file cleanup dropped.
pub fn cleanup_summary(counts: &CleanupCounts) -> String {
    format!(
        "Removed {} invalid and {} zero-profit lines",
        counts.invalid, counts.zero_profit
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn cake_bill() -> Bill {
        let record = Item::new("Cake124", 10.0, 15.0, 10.0, 2).unwrap().to_record();
        Bill::new(1001, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), vec![record]).unwrap()
    }

    #[test]
    fn test_bill_banner() {
        let text = bill_banner(&AppConfig::default(), &cake_bill());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=".repeat(WIDTH));
        assert_eq!(lines[1].trim(), "THE CAKE SHOP");
        assert!(lines[3].starts_with("BILL #1001"));
        assert!(lines[3].ends_with("Date: 2024-05-01"));
        assert!(lines[7].starts_with("1    Cake124"));
        assert!(lines[7].contains("10%"));
        assert!(lines[7].ends_with("Rs.27.00"));
        assert!(lines[9].starts_with("Grand Total:"));
        assert!(lines[9].ends_with("Rs.27.00"));
    }

    #[test]
    fn test_basket_table() {
        let config = AppConfig::default();
        let empty = BasketView {
            items: Vec::new(),
            total: 0.0,
        };
        assert_eq!(basket_table(&config, &empty), "Basket is empty.");

        let view = BasketView {
            items: vec![
                Item::new("Cake124", 10.0, 15.0, 10.0, 2).unwrap().to_record(),
                Item::new("Lemon_01", 3.0, 5.0, 5.0, 1).unwrap().to_record(),
            ],
            total: 31.75,
        };
        let text = basket_table(&config, &view);
        assert!(text.contains("\n2    Lemon_01"));
        assert!(text.ends_with("Rs.31.75"));
    }

    #[test]
    fn test_cleanup_summary() {
        let counts = CleanupCounts {
            invalid: 2,
            zero_profit: 0,
        };
        assert_eq!(cleanup_summary(&counts), "Removed 2 invalid and 0 zero-profit lines");
    }

    #[test]
    fn test_item_summary_flags_below_cost() {
        let config = AppConfig::default();
        let item = Item::new("Bun", 2.0, 1.5, 0.0, 1).unwrap();
        assert!(item_summary(&config, &item).ends_with("(below cost)"));
    }

    #[test]
    fn test_bills_table() {
        let config = AppConfig::default();
        assert_eq!(bills_table(&config, &[]), "No bills yet.");

        let text = bills_table(&config, &[cake_bill()]);
        assert!(text.lines().nth(2).unwrap().starts_with("1001     2024-05-01"));
    }

    #[test]
    fn test_bill_json() {
        let json = to_json(&cake_bill()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["billId"], 1001);
        assert_eq!(value["createdOn"], "2024-05-01");
        assert_eq!(value["items"][0]["itemCode"], "Cake124");
    }
}
