//! ワークブック入出力
//!
//! 読み込みは calamine、書き込みは rust_xlsxwriter。
//! どちらも先頭シートの1行目をヘッダーとして扱う。

pub mod listing;
pub mod sales;

use crate::error::{MatcherError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Worksheet};
use std::path::Path;

/// セル値（型は書き戻し時にも保つ）
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excel のシリアル値（書き戻し時に日付書式を付ける）
    DateTime(f64),
}

impl Cell {
    /// 前後の空白を除いた文字列表現（空セルは空文字）
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::DateTime(serial) => Cell::Number(*serial).as_text(),
        }
    }

    /// 空白のみ・"nan" は値なしとみなす
    pub fn as_optional_text(&self) -> Option<String> {
        let text = self.as_text();
        if text.is_empty() || text.eq_ignore_ascii_case("nan") {
            None
        } else {
            Some(text)
        }
    }
}

impl From<&Data> for Cell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(d) => Cell::DateTime(d.as_f64()),
            other => Cell::Text(other.to_string()),
        }
    }
}

/// ヘッダー付きの表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// 列名で列番号を探す（前後の空白と大文字小文字は無視）
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
    }

    pub fn require_column(&self, name: &str, file: &Path) -> Result<usize> {
        self.column(name).ok_or_else(|| MatcherError::MissingColumn {
            column: name.to_string(),
            file: file.display().to_string(),
        })
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&Cell::Empty)
    }

    /// 列を末尾に追加し、その列番号を返す
    pub fn add_column(&mut self, name: &str) -> usize {
        self.headers.push(name.to_string());
        self.headers.len() - 1
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: Cell) {
        if let Some(cells) = self.rows.get_mut(row) {
            if cells.len() <= col {
                cells.resize(col + 1, Cell::Empty);
            }
            cells[col] = value;
        }
    }
}

/// 先頭シートを読み込む
pub fn read_first_sheet(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(MatcherError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| MatcherError::EmptyWorkbook(path.display().to_string()))??;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|header| header.iter().map(|c| Cell::from(c).as_text()).collect())
        .unwrap_or_default();

    // 空行も残す（行位置は入力と同じ）
    let rows = rows
        .map(|row| row.iter().map(Cell::from).collect::<Vec<_>>())
        .collect();

    Ok(Table { headers, rows })
}

/// 表をワークシートに書き込む（1行目はヘッダー）
pub fn write_table(worksheet: &mut Worksheet, table: &Table) -> Result<()> {
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = row_idx as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) => {
                    worksheet.write_string(row_num, col, s)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(row_num, col, *n)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(row_num, col, *b)?;
                }
                Cell::DateTime(serial) => {
                    worksheet.write_number_with_format(row_num, col, *serial, &date_format)?;
                }
            }
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    Ok(())
}
