//! 売上シート
//!
//! 会社レコードを取り出し、照合結果のURLを参照画像列に追記して書き戻す。
//! 元のセルは型を保ったまま書き出す。

use super::{read_first_sheet, write_table, Cell, Table};
use crate::error::Result;
use ref_image_common::{CompanyRecord, MatchResult};
use rust_xlsxwriter::Workbook;
use std::collections::BTreeSet;
use std::path::Path;

pub const COMPANY_COLUMN: &str = "CompanyName";
pub const INDUSTRY_COLUMN: &str = "Industry";
pub const DESCRIPTION_COLUMN: &str = "Description";
pub const SCOPE_COLUMN: &str = "Scope";

/// 読み込んだ売上シート
#[derive(Debug, Clone)]
pub struct SalesSheet {
    table: Table,
    reference_col: usize,
    records: Vec<CompanyRecord>,
    /// 参照画像列を新規に作ったか
    pub created_reference_column: bool,
}

impl SalesSheet {
    /// 売上シートを読み込む。参照画像列が無ければ作る。
    pub fn load(path: &Path, reference_column: &str) -> Result<Self> {
        let table = read_first_sheet(path)?;
        Self::from_table(table, path, reference_column)
    }

    pub fn from_table(mut table: Table, path: &Path, reference_column: &str) -> Result<Self> {
        let name_col = table.require_column(COMPANY_COLUMN, path)?;
        let industry_col = table.column(INDUSTRY_COLUMN);
        let description_col = table.column(DESCRIPTION_COLUMN);
        let scope_col = table.column(SCOPE_COLUMN);

        let optional = |table: &Table, row: usize, col: Option<usize>| {
            col.and_then(|c| table.cell(row, c).as_optional_text())
        };

        let records = (0..table.rows.len())
            .map(|row| CompanyRecord {
                name: table.cell(row, name_col).as_text(),
                industry: optional(&table, row, industry_col),
                description: optional(&table, row, description_col),
                scope: optional(&table, row, scope_col),
            })
            .collect();

        let (reference_col, created_reference_column) = match table.column(reference_column) {
            Some(col) => (col, false),
            None => (table.add_column(reference_column), true),
        };

        Ok(Self {
            table,
            reference_col,
            records,
            created_reference_column,
        })
    }

    /// 行順の会社レコード（照合結果の index はこの並び）
    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    /// 業種列の異なり数
    pub fn distinct_industries(&self) -> usize {
        self.records
            .iter()
            .filter_map(|r| r.industry.as_deref())
            .map(|i| i.trim().to_lowercase())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// 一致した行の参照画像セルへURLを追記する。追記した件数を返す。
    ///
    /// 既に同じURLが入っているセルには追加しない。
    pub fn apply_matches(&mut self, results: &[MatchResult]) -> usize {
        let mut applied = 0;
        for result in results {
            let Some(matched) = &result.matched_record else {
                continue;
            };
            if result.url.is_empty() {
                continue;
            }

            let current = self
                .table
                .cell(matched.index, self.reference_col)
                .as_optional_text();
            let updated = match current {
                Some(existing) if existing.lines().any(|line| line.trim() == result.url) => continue,
                Some(existing) => format!("{}\n{}", existing, result.url),
                None => result.url.clone(),
            };
            self.table
                .set_cell(matched.index, self.reference_col, Cell::Text(updated));
            applied += 1;
        }
        applied
    }

    /// 参照画像セルの値（テスト・表示用）
    pub fn reference_urls(&self, row: usize) -> Vec<String> {
        self.table
            .cell(row, self.reference_col)
            .as_optional_text()
            .map(|text| text.lines().map(|l| l.trim().to_string()).collect())
            .unwrap_or_default()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        write_table(worksheet, &self.table)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        workbook.save(path)?;
        Ok(())
    }
}
