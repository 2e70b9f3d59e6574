//! 照合ログ（Matching Details Log）の出力

use crate::error::Result;
use crate::pipeline::RunSummary;
use crate::workbook::{write_table, Cell, Table};
use chrono::Local;
use ref_image_common::{CompanyRecord, MatchResult, Token};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// 一致しなかった行の会社名欄
pub const NO_MATCH: &str = "NONE";

const LOG_HEADERS: &[&str] = &[
    "File Name",
    "File URL",
    "Product",
    "Scope",
    "Industry",
    "Company Candidate",
    "Matched Company",
    "Matched Industry",
    "Score",
    "Strength",
    "Matched Factors",
    "Details",
];

fn token_cell(token: &Option<Token>) -> Cell {
    match token {
        Some(t) => Cell::Text(t.display.clone()),
        None => Cell::Empty,
    }
}

/// 照合結果を1ファイル1行の表にする
pub fn log_table(results: &[MatchResult], records: &[CompanyRecord]) -> Table {
    let rows = results
        .iter()
        .map(|result| {
            let matched = result.matched_record.as_ref();
            let matched_industry = matched
                .and_then(|m| records.get(m.index))
                .and_then(|r| r.industry.clone())
                .map(Cell::Text)
                .unwrap_or(Cell::Empty);

            vec![
                Cell::Text(result.filename.clone()),
                Cell::Text(result.url.clone()),
                token_cell(&result.tokens.product),
                token_cell(&result.tokens.scope),
                token_cell(&result.tokens.industry),
                Cell::Text(result.tokens.company_candidate.clone()),
                Cell::Text(matched.map_or(NO_MATCH.to_string(), |m| m.name.clone())),
                matched_industry,
                Cell::Number((result.score * 100.0).round() / 100.0),
                Cell::Text(result.strength.to_string()),
                Cell::Text(result.factor_summary()),
                Cell::Text(result.detail_summary()),
            ]
        })
        .collect();

    Table {
        headers: LOG_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}

/// 集計シートの (項目, 値)
pub fn summary_rows(summary: &RunSummary) -> Vec<(&'static str, Cell)> {
    let count = |n: usize| Cell::Number(n as f64);
    vec![
        ("Generated At", Cell::Text(Local::now().format("%Y-%m-%d %H:%M:%S").to_string())),
        ("Total Images", count(summary.total_images)),
        ("Matched", count(summary.matched)),
        ("Unmatched", count(summary.unmatched)),
        ("High", count(summary.high)),
        ("Medium", count(summary.medium)),
        ("Low", count(summary.low)),
        ("Fallback Parses", count(summary.degraded)),
        ("Companies With Images", count(summary.companies_with_images)),
        ("Distinct Industries", count(summary.distinct_industries)),
        ("Skipped Records", count(summary.invalid_records)),
        ("Threshold", Cell::Number(summary.threshold)),
    ]
}

/// 照合ログを書き出す（Details シートと Summary シート）
pub fn write_match_log(
    results: &[MatchResult],
    records: &[CompanyRecord],
    summary: &RunSummary,
    path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();

    let details = workbook.add_worksheet();
    details.set_name("Details")?;
    write_table(details, &log_table(results, records))?;
    details.set_column_width(0, 40)?;
    details.set_column_width(1, 60)?;
    details.set_column_width(11, 80)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name("Summary")?;
    let bold = Format::new().set_bold();
    for (row, (label, value)) in summary_rows(summary).into_iter().enumerate() {
        let row = row as u32;
        sheet.write_string_with_format(row, 0, label, &bold)?;
        match value {
            Cell::Text(s) => {
                sheet.write_string(row, 1, s)?;
            }
            Cell::Number(n) => {
                sheet.write_number(row, 1, n)?;
            }
            _ => {}
        }
    }
    sheet.set_column_width(0, 24)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    workbook.save(path)?;
    Ok(())
}
