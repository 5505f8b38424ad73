//! One-shot subcommands against a throwaway data directory.

use clap::Parser;
use tempfile::TempDir;

use till_cli::cli::Cli;
use till_cli::commands::basket::{add_item, LinePrices};
use till_cli::commands::bill::generate_bill;
use till_cli::error::ErrorCode;
use till_cli::state::{AppConfig, Session};

fn run(dir: &TempDir, args: &[&str]) -> Result<(), till_cli::error::AppError> {
    let data_dir = dir.path().to_string_lossy().to_string();
    let mut argv = vec!["till", "--data-dir", data_dir.as_str()];
    argv.extend_from_slice(args);
    till_cli::run(Cli::parse_from(argv))
}

fn bill_one_cake(dir: &TempDir) {
    let config = AppConfig::default().with_data_dir(Some(dir.path().to_path_buf()));
    let mut session = Session::new(config);
    add_item(
        &mut session,
        "Cake124",
        LinePrices {
            cost: 10.0,
            sale_price: 15.0,
            discount_percent: 10.0,
            quantity: 2,
        },
    )
    .unwrap();
    generate_bill(&mut session).unwrap();
}

#[test]
fn bills_list_on_empty_dir() {
    let dir = TempDir::new().unwrap();
    assert!(run(&dir, &["bills", "list"]).is_ok());
}

#[test]
fn export_without_bills_fails() {
    let dir = TempDir::new().unwrap();
    let err = run(&dir, &["export"]).unwrap_err();
    assert_eq!(err.code, ErrorCode::NothingToDo);
}

#[test]
fn stored_bill_is_shown_and_exported() {
    let dir = TempDir::new().unwrap();
    bill_one_cake(&dir);

    assert!(run(&dir, &["bills", "show", "1001", "--json"]).is_ok());
    assert_eq!(
        run(&dir, &["bills", "show", "1002"]).unwrap_err().code,
        ErrorCode::NotFound
    );

    run(&dir, &["export", "--bill", "1001"]).unwrap();
    let ttf = dir.path().join("TaxFiles/ttf_1001.csv");
    assert!(ttf.exists());

    let ttf_arg = ttf.to_string_lossy().to_string();
    assert!(run(&dir, &["verify", ttf_arg.as_str()]).is_ok());
}

#[test]
fn verify_missing_file_is_a_storage_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.csv").to_string_lossy().to_string();

    let err = run(&dir, &["verify", missing.as_str()]).unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageError);
}

#[test]
fn verify_can_drop_invalid_lines_and_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ttf_hand_edited.csv");
    std::fs::write(
        &path,
        "ItemCode,Cost,SalePrice,Discount,DiscountedPrice,Checksum\n\
         Lemon_01,3.00,5.00,5,4.75,20\n\
         Lemon_01,3.00,5.00,5,9.75,20\n",
    )
    .unwrap();
    let path_arg = path.to_string_lossy().to_string();

    run(&dir, &["verify", path_arg.as_str(), "--drop-invalid"]).unwrap();
    assert!(std::fs::read_to_string(&path).unwrap().contains("9.75"));

    run(&dir, &["verify", path_arg.as_str(), "--drop-invalid", "--save"]).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "ItemCode,Cost,SalePrice,Discount,DiscountedPrice,Checksum\n\
         Lemon_01,3.00,5.00,5,4.75,20\n"
    );
}
