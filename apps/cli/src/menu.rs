//! # Interactive Menu
//!
//! The operator loop: pick an action, answer the prompts, see the result.
//!
//! ## Menu
//! ```text
//!   Add item            ─► code, cost, sale price, discount %, quantity
//!   View basket
//!   Delete item         ─► line number
//!   Update item         ─► line number, new prices and quantity
//!   Generate bill       ─► prints the bill, clears the basket
//!   Search bill         ─► bill number
//!   Generate tax file   ─► all bills / one bill
//!   Verify tax file     ─► path, then edit / delete / clean up / save
//!   Exit
//! ```
//!
//! A failed action prints its error and returns to the menu. Only a broken
//! terminal ends the loop early.

use std::path::Path;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use tracing::debug;

use till_core::pricing::discounted_price;
use till_core::validation::{
    validate_discount, validate_item_code, validate_price, validate_quantity,
};
use till_core::{BillId, Item};
use till_store::{TaxFileReport, TaxLineEdit};

use crate::commands::basket::{self, LinePrices};
use crate::commands::bill;
use crate::commands::tax::{self, Cleanup, CleanupCounts, ExportScope};
use crate::error::{AppError, ErrorCode};
use crate::render;
use crate::state::Session;

const MENU: [&str; 9] = [
    "Add item",
    "View basket",
    "Delete item",
    "Update item",
    "Generate bill",
    "Search bill",
    "Generate tax file",
    "Verify tax file",
    "Exit",
];

/// Runs the menu until the operator picks Exit.
pub fn run_menu(session: &mut Session) -> Result<(), AppError> {
    let theme = ColorfulTheme::default();

    loop {
        println!();
        let choice = Select::with_theme(&theme)
            .with_prompt(format!("{} · menu", session.config.store.name))
            .items(&MENU)
            .default(0)
            .interact()?;

        debug!(action = MENU[choice], "Menu action");

        let result = match choice {
            0 => add_items(session, &theme),
            1 => {
                println!("\n{}", basket_screen(session));
                Ok(())
            }
            2 => delete_items(session, &theme),
            3 => update_items(session, &theme),
            4 => generate_bill(session),
            5 => search_bill(session, &theme),
            6 => generate_tax_file(session, &theme),
            7 => verify_tax_file(session, &theme),
            _ => {
                println!("\nGoodbye!");
                return Ok(());
            }
        };

        if let Err(err) = result {
            if err.code == ErrorCode::InputError {
                return Err(err);
            }
            println!("\n{}", err);
        }
    }
}

// =============================================================================
// Prompts
// =============================================================================

fn prompt_code(theme: &ColorfulTheme, current: Option<&str>) -> Result<String, AppError> {
    let mut input = Input::<String>::with_theme(theme)
        .with_prompt("Item code")
        .validate_with(|code: &String| validate_item_code(code.trim()));
    if let Some(code) = current {
        input = input.default(code.to_string());
    }
    Ok(input.interact_text()?.trim().to_string())
}

fn prompt_price(
    theme: &ColorfulTheme,
    label: &str,
    field: &'static str,
    current: Option<f64>,
) -> Result<f64, AppError> {
    let mut input = Input::<f64>::with_theme(theme)
        .with_prompt(label)
        .validate_with(move |value: &f64| validate_price(field, *value));
    if let Some(value) = current {
        input = input.default(value);
    }
    Ok(input.interact_text()?)
}

fn prompt_discount(theme: &ColorfulTheme, current: Option<f64>) -> Result<f64, AppError> {
    let mut input = Input::<f64>::with_theme(theme)
        .with_prompt("Discount %")
        .validate_with(|value: &f64| validate_discount(*value));
    if let Some(value) = current {
        input = input.default(value);
    }
    Ok(input.interact_text()?)
}

fn prompt_quantity(theme: &ColorfulTheme, current: Option<i64>) -> Result<i64, AppError> {
    let mut input = Input::<i64>::with_theme(theme)
        .with_prompt("Quantity")
        .validate_with(|value: &i64| validate_quantity(*value));
    if let Some(value) = current {
        input = input.default(value);
    }
    Ok(input.interact_text()?)
}

fn prompt_position(theme: &ColorfulTheme, action: &str) -> Result<usize, AppError> {
    Ok(Input::<usize>::with_theme(theme)
        .with_prompt(format!("Line number to {}", action))
        .interact_text()?)
}

fn prompt_bill_id(theme: &ColorfulTheme, prompt: &str) -> Result<BillId, AppError> {
    Ok(Input::<BillId>::with_theme(theme)
        .with_prompt(prompt)
        .interact_text()?)
}

fn confirm(theme: &ColorfulTheme, prompt: &str, default: bool) -> Result<bool, AppError> {
    Ok(Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

fn go_again(theme: &ColorfulTheme) -> Result<bool, AppError> {
    confirm(theme, "Go again?", false)
}

/// Prompts for prices and quantity. `None` when the operator declines a
/// sale price below cost.
fn prompt_prices(
    session: &Session,
    theme: &ColorfulTheme,
    current: Option<&Item>,
) -> Result<Option<LinePrices>, AppError> {
    let cost = prompt_price(theme, "Cost", "cost", current.map(Item::cost))?;
    let sale_price = prompt_price(theme, "Sale price", "sale price", current.map(Item::sale_price))?;

    if sale_price < cost {
        println!("Warning: sale price is less than cost");
        if !confirm(theme, "Continue?", false)? {
            return Ok(None);
        }
    }

    let discount_percent = prompt_discount(theme, current.map(Item::discount_percent))?;
    println!(
        "Discounted price: {}",
        session
            .config
            .format_currency(discounted_price(sale_price, discount_percent))
    );

    let quantity = prompt_quantity(theme, current.map(Item::quantity))?;

    Ok(Some(LinePrices {
        cost,
        sale_price,
        discount_percent,
        quantity,
    }))
}

fn basket_screen(session: &Session) -> String {
    render::basket_table(&session.config, &basket::view_basket(session))
}

/// Prints a command error and keeps going, unless the terminal failed.
fn report(result: Result<(), AppError>) -> Result<(), AppError> {
    match result {
        Err(err) if err.code != ErrorCode::InputError => {
            println!("\n{}", err);
            Ok(())
        }
        other => other,
    }
}

// =============================================================================
// Actions
// =============================================================================

fn add_items(session: &mut Session, theme: &ColorfulTheme) -> Result<(), AppError> {
    loop {
        println!();
        let code = prompt_code(theme, None)?;

        match prompt_prices(session, theme, None)? {
            Some(prices) => report(basket::add_item(session, &code, prices).map(|item| {
                println!("\nItem Added Successfully");
                println!("{}", render::item_summary(&session.config, &item));
            }))?,
            None => println!("\nItem not added"),
        }

        if !go_again(theme)? {
            return Ok(());
        }
    }
}

fn delete_items(session: &mut Session, theme: &ColorfulTheme) -> Result<(), AppError> {
    loop {
        if session.basket.is_empty() {
            println!("\nBasket is empty. Nothing to delete.");
            return Ok(());
        }

        println!("\n{}", basket_screen(session));
        let position = prompt_position(theme, "delete")?;

        report(basket::delete_item(session, position).map(|item| {
            println!("\nItem Deleted Successfully ({})", item.item_code());
        }))?;

        if !go_again(theme)? {
            return Ok(());
        }
    }
}

fn update_items(session: &mut Session, theme: &ColorfulTheme) -> Result<(), AppError> {
    loop {
        if session.basket.is_empty() {
            println!("\nBasket is empty. Nothing to update.");
            return Ok(());
        }

        println!("\n{}", basket_screen(session));
        let position = prompt_position(theme, "update")?;

        match session.basket.get(position).cloned() {
            None => println!(
                "\nLine {} does not exist (basket has {} items)",
                position,
                session.basket.len()
            ),
            Some(current) => {
                println!("\nUpdating item: {}", current.item_code());
                println!("Current: {}", render::item_summary(&session.config, &current));

                match prompt_prices(session, theme, Some(&current))? {
                    Some(prices) => {
                        report(basket::update_item(session, position, prices).map(|item| {
                            println!("\nItem Updated Successfully");
                            println!("{}", render::item_summary(&session.config, &item));
                        }))?
                    }
                    None => println!("\nItem not updated"),
                }
            }
        }

        if !go_again(theme)? {
            return Ok(());
        }
    }
}

fn generate_bill(session: &mut Session) -> Result<(), AppError> {
    if session.basket.is_empty() {
        println!("\nCannot generate bill: Basket is empty");
        return Ok(());
    }

    let generated = bill::generate_bill(session)?;

    println!("\n{}", render::bill_banner(&session.config, &generated.bill));
    println!("\nBill Generated Successfully");
    if let Some(err) = generated.save_error {
        println!(
            "Warning: bill #{} was not saved to disk: {}",
            generated.bill.id(),
            err.message
        );
    }
    println!("Basket has been cleared");
    Ok(())
}

fn search_bill(session: &Session, theme: &ColorfulTheme) -> Result<(), AppError> {
    let bill_id = prompt_bill_id(theme, "Bill ID to search")?;
    let found = bill::find_bill(session, bill_id)?;
    println!("\n{}", render::bill_banner(&session.config, found));
    Ok(())
}

fn generate_tax_file(session: &Session, theme: &ColorfulTheme) -> Result<(), AppError> {
    if session.ledger.is_empty() {
        println!("\nNo bills available to generate tax transaction files");
        return Ok(());
    }

    let choice = Select::with_theme(theme)
        .with_prompt("Tax Transaction File")
        .items(&["All bills", "A specific bill", "Back"])
        .default(0)
        .interact()?;

    let scope = match choice {
        0 => ExportScope::AllBills,
        1 => ExportScope::Bill(prompt_bill_id(theme, "Bill ID to generate TTF for")?),
        _ => return Ok(()),
    };

    let export = tax::export_tax_file(session, scope)?;
    println!("\n{}", render::export_summary(&export));
    Ok(())
}

const TAX_ACTIONS: [&str; 6] = [
    "Edit a line",
    "Delete an invalid line",
    "Delete all invalid lines",
    "Delete all zero-profit lines",
    "Save changes",
    "Back",
];

fn verify_tax_file(session: &Session, theme: &ColorfulTheme) -> Result<(), AppError> {
    let default_path = session.ledger.config().tax_all_path();

    let path = Input::<String>::with_theme(theme)
        .with_prompt("Tax file to verify")
        .default(default_path.display().to_string())
        .interact_text()?;

    let mut file_report = tax::verify_tax_file(session, Path::new(path.trim()))?;
    let mut unsaved = false;

    loop {
        println!("\n{}", render::tax_report(&session.config, &file_report));

        let choice = Select::with_theme(theme)
            .with_prompt("Tax file")
            .items(&TAX_ACTIONS)
            .default(TAX_ACTIONS.len() - 1)
            .interact()?;

        match choice {
            0 => {
                let line_number = prompt_line_number(theme, "edit")?;
                if let Some(edit) = prompt_tax_edit(session, theme, &file_report, line_number)? {
                    report(tax::edit_tax_line(&mut file_report, line_number, edit).map(|line| {
                        unsaved = true;
                        println!("\nLine {} updated, checksum {}", line_number, line.stated_checksum);
                    }))?;
                }
            }
            1 => {
                let line_number = prompt_line_number(theme, "delete")?;
                report(tax::delete_tax_line(&mut file_report, line_number).map(|line| {
                    unsaved = true;
                    println!("\nLine {} deleted ({})", line.line_number, line.item_code);
                }))?;
            }
            2 | 3 => {
                let cleanup = Cleanup {
                    invalid: choice == 2,
                    zero_profit: choice == 3,
                };
                let counts = tax::clean_tax_report(&mut file_report, cleanup);
                unsaved |= counts != CleanupCounts::default();
                println!("\n{}", render::cleanup_summary(&counts));
            }
            4 => {
                let written = tax::save_tax_file(session, &file_report)?;
                unsaved = false;
                println!("\nSaved {} lines to '{}'", written, file_report.path.display());
            }
            _ => {
                if unsaved && confirm(theme, "Save changes before leaving?", true)? {
                    let written = tax::save_tax_file(session, &file_report)?;
                    println!("\nSaved {} lines to '{}'", written, file_report.path.display());
                }
                return Ok(());
            }
        }
    }
}

fn prompt_line_number(theme: &ColorfulTheme, action: &str) -> Result<u64, AppError> {
    Ok(Input::<u64>::with_theme(theme)
        .with_prompt(format!("File line to {}", action))
        .interact_text()?)
}

/// Prompts for new values of a tax line, starting from the current ones.
/// `None` when the line does not exist or a sale below cost is declined.
fn prompt_tax_edit(
    session: &Session,
    theme: &ColorfulTheme,
    report: &TaxFileReport,
    line_number: u64,
) -> Result<Option<TaxLineEdit>, AppError> {
    let Some(current) = report.line(line_number).cloned() else {
        println!("\nTax file has no line {}", line_number);
        return Ok(None);
    };

    let item_code = prompt_code(theme, Some(&current.item_code))?;
    let cost = prompt_price(theme, "Cost", "cost", Some(current.cost))?;
    let sale_price = prompt_price(theme, "Sale price", "sale price", Some(current.sale_price))?;

    if sale_price < cost {
        println!("Warning: sale price is less than cost");
        if !confirm(theme, "Continue?", false)? {
            println!("\nLine not updated");
            return Ok(None);
        }
    }

    let discount_percent = prompt_discount(theme, Some(current.discount_percent))?;
    println!(
        "Discounted price: {}",
        session
            .config
            .format_currency(discounted_price(sale_price, discount_percent))
    );

    Ok(Some(TaxLineEdit {
        item_code,
        cost,
        sale_price,
        discount_percent,
    }))
}
