//! 画像一覧ワークブック（File Name / File URL / Size）

use super::{read_first_sheet, write_table, Cell, Table};
use crate::error::Result;
use crate::scanner::{format_file_size, ImageEntry};
use ref_image_common::ImageRef;
use rust_xlsxwriter::Workbook;
use std::path::Path;

pub const FILE_NAME_COLUMN: &str = "File Name";
pub const FILE_URL_COLUMN: &str = "File URL";
pub const SIZE_COLUMN: &str = "Size";

/// 画像一覧を読み込む（ファイル名が空の行は捨てる）
pub fn read_listing(path: &Path) -> Result<Vec<ImageRef>> {
    let table = read_first_sheet(path)?;
    let name_col = table.require_column(FILE_NAME_COLUMN, path)?;
    let url_col = table.require_column(FILE_URL_COLUMN, path)?;

    let images = (0..table.rows.len())
        .filter_map(|row| {
            let file_name = table.cell(row, name_col).as_optional_text()?;
            let url = table.cell(row, url_col).as_text();
            Some(ImageRef::new(file_name, url))
        })
        .collect();

    Ok(images)
}

/// 画像一覧を書き出す
pub fn write_listing(entries: &[ImageEntry], path: &Path) -> Result<()> {
    let table = Table {
        headers: vec![
            FILE_NAME_COLUMN.to_string(),
            FILE_URL_COLUMN.to_string(),
            SIZE_COLUMN.to_string(),
        ],
        rows: entries
            .iter()
            .map(|e| {
                vec![
                    Cell::Text(e.file_name.clone()),
                    Cell::Text(e.url.clone()),
                    Cell::Text(format_file_size(e.size_bytes)),
                ]
            })
            .collect(),
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Images")?;
    write_table(worksheet, &table)?;
    worksheet.set_column_width(0, 45)?;
    worksheet.set_column_width(1, 90)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    workbook.save(path)?;
    Ok(())
}
