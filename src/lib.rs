//! ref-image-matcher
//!
//! 画像フォルダのスキャン、ワークブック入出力、一括照合、照合ログ出力。
//! 照合そのものは `ref-image-common` が行う。

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod workbook;
