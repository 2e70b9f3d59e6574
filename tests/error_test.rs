//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use ref_image_matcher::error::MatcherError;
use ref_image_matcher::scanner;
use ref_image_matcher::workbook::{listing, sales::SalesSheet};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"), None, false);
    assert!(matches!(result, Err(MatcherError::FolderNotFound(_))));
}

/// 画像のないフォルダをスキャンした場合
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let result = scanner::scan_folder(dir.path(), None, false);
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// 不正なベースURL
#[test]
fn test_scan_with_invalid_base_url() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("SAP_Retail_Imtiaz.jpg"), b"dummy").unwrap();

    let result = scanner::scan_folder(dir.path(), Some("not a url"), false);
    assert!(matches!(result, Err(MatcherError::InvalidUrl(_))));
}

/// 存在しない売上シート
#[test]
fn test_missing_sales_workbook() {
    let result = SalesSheet::load(Path::new("/nonexistent/sales.xlsx"), "Reference Images' URL");
    assert!(matches!(result, Err(MatcherError::FileNotFound(_))));
}

/// CompanyName 列が無い売上シート
#[test]
fn test_sales_without_company_column() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("sales.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Client").unwrap();
    sheet.write_string(1, 0, "PSO").unwrap();
    workbook.save(&path).unwrap();

    let err = SalesSheet::load(&path, "Reference Images' URL").unwrap_err();
    match err {
        MatcherError::MissingColumn { column, .. } => assert_eq!(column, "CompanyName"),
        other => panic!("MissingColumn のはず: {:?}", other),
    }
}

/// File URL 列が無い画像一覧
#[test]
fn test_listing_without_url_column() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("listing.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "File Name").unwrap();
    sheet.write_string(1, 0, "SAP_Retail_Imtiaz.jpg").unwrap();
    workbook.save(&path).unwrap();

    let result = listing::read_listing(&path);
    assert!(matches!(result, Err(MatcherError::MissingColumn { .. })));
}

/// ワークブックでないファイル
#[test]
fn test_corrupt_workbook() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("broken.xlsx");
    std::fs::write(&path, b"this is not a zip").unwrap();

    let result = listing::read_listing(&path);
    assert!(matches!(result, Err(MatcherError::ExcelRead(_))));
}

/// MatcherErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        MatcherError::Config("テスト設定エラー".to_string()),
        MatcherError::FileNotFound("sales.xlsx".to_string()),
        MatcherError::FolderNotFound("/path/to/folder".to_string()),
        MatcherError::MissingColumn {
            column: "CompanyName".to_string(),
            file: "sales.xlsx".to_string(),
        },
        MatcherError::EmptyWorkbook("empty.xlsx".to_string()),
        MatcherError::NoImagesFound("フォルダ".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// コア側のエラーが変換されること
#[test]
fn test_core_error_conversion() {
    let core = ref_image_common::Error::InvalidInput("threshold".to_string());
    let err: MatcherError = core.into();
    assert!(matches!(err, MatcherError::Core(_)));
    assert!(format!("{}", err).contains("threshold"));
}
