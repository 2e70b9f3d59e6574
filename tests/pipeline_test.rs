//! スキャンから照合ログまでの統合テスト

use ref_image_common::{FactorName, MatchStrength};
use ref_image_matcher::config::Config;
use ref_image_matcher::workbook::{listing, read_first_sheet, sales::SalesSheet};
use ref_image_matcher::{pipeline, report, scanner};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::tempdir;

const BASE_URL: &str = "https://example.sharepoint.com/sites/Branding/Reference Repository/";

fn create_images(folder: &Path) {
    for name in [
        "SAPS4HANA_Oil&Gas_PSO.jpg",
        "Qlik_Licenses_Retail_Imtiaz.png",
        "Qlik_SLA_Conglomerate_IBL.jpeg",
        "Holiday Party.jpg",
        "notes.txt",
    ] {
        std::fs::write(folder.join(name), b"dummy").unwrap();
    }
}

fn create_sales(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in ["CompanyName", "Industry", "Scope"].iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    let rows = [
        ("PSO", "Oil & Gas", "SAPS4HANA implementation"),
        ("Imtiaz", "Retail", "Qlik Licenses"),
        ("International Brands Limited", "Conglomerate", "Qlik SLA"),
    ];
    for (i, (name, industry, scope)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, *name).unwrap();
        sheet.write_string(row, 1, *industry).unwrap();
        sheet.write_string(row, 2, *scope).unwrap();
    }
    workbook.save(path).unwrap();
}

#[test]
fn test_scan_match_and_log() {
    let dir = tempdir().expect("Failed to create temp dir");
    let images_dir = dir.path().join("images");
    std::fs::create_dir_all(&images_dir).unwrap();
    create_images(&images_dir);

    let sales_path = dir.path().join("sales.xlsx");
    create_sales(&sales_path);

    // 1. スキャンと画像一覧
    let entries = scanner::scan_folder(&images_dir, Some(BASE_URL), false).unwrap();
    assert_eq!(entries.len(), 4, "txtは除外されるはず");
    let listing_path = dir.path().join("Reference_Images.xlsx");
    listing::write_listing(&entries, &listing_path).unwrap();
    let images = listing::read_listing(&listing_path).unwrap();
    assert_eq!(images.len(), 4);
    assert!(images
        .iter()
        .all(|i| i.url.starts_with("https://example.sharepoint.com/sites/Branding/Reference%20Repository/")));

    // 2. 照合
    let config = Config::default();
    let matcher = config.build_matcher().unwrap();
    let mut sheet = SalesSheet::load(&sales_path, &config.reference_column).unwrap();
    let results = pipeline::match_images(&matcher, &images, sheet.records(), false);
    assert_eq!(results.len(), 4);

    let by_name = |name: &str| results.iter().find(|r| r.filename == name).unwrap();
    let pso = by_name("SAPS4HANA_Oil&Gas_PSO.jpg");
    assert_eq!(pso.matched_record.as_ref().map(|m| m.index), Some(0));
    assert!(pso.matched_factors.contains(&FactorName::ProductHit));
    assert_eq!(pso.strength, MatchStrength::High);

    let ibl = by_name("Qlik_SLA_Conglomerate_IBL.jpeg");
    assert_eq!(ibl.matched_record.as_ref().map(|m| m.index), Some(2));
    assert!(ibl.matched_factors.contains(&FactorName::CompanyAcronym));

    let party = by_name("Holiday Party.jpg");
    assert!(party.matched_record.is_none());
    assert!(party.tokens.degraded);

    let summary = pipeline::RunSummary::from_results(&results, sheet.records(), matcher.config().threshold);
    assert_eq!(summary.matched, 3);
    assert_eq!(summary.companies_with_images, 3);

    // 3. 書き出し
    assert_eq!(sheet.apply_matches(&results), 3);
    let output = dir.path().join("Sales_Compiled_Sheet_Updated.xlsx");
    sheet.save(&output).unwrap();
    let log_path = dir.path().join("Matching_Details_Log.xlsx");
    report::write_match_log(&results, sheet.records(), &summary, &log_path).unwrap();

    let log = read_first_sheet(&log_path).unwrap();
    assert_eq!(log.rows.len(), 4, "ファイルごとに1行");
    let company_col = log.column("Matched Company").unwrap();
    let none_rows = (0..log.rows.len())
        .filter(|&row| log.cell(row, company_col).as_text() == report::NO_MATCH)
        .count();
    assert_eq!(none_rows, 1);

    let updated = SalesSheet::load(&output, &config.reference_column).unwrap();
    assert_eq!(updated.reference_urls(1).len(), 1);
    assert!(updated.reference_urls(1)[0].ends_with("Qlik_Licenses_Retail_Imtiaz.png"));
}

#[test]
fn test_raised_threshold_leaves_weak_matches_unassigned() {
    let mut config = Config::default();
    config.matching.threshold = 5.0;
    let matcher = config.build_matcher().unwrap();

    let images = vec![ref_image_common::ImageRef::new("SAP_Retail_Imtiaz.jpg", "u")];
    let records = vec![ref_image_common::CompanyRecord::new("Imtiaz").with_industry("Retail")];
    let results = pipeline::match_images(&matcher, &images, &records, false);

    assert!(results[0].matched_record.is_none());
    assert!(results[0].score > 0.0, "最良候補のスコアは残る");
}
