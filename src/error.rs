use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("必須列がありません: {column} ({file})")]
    MissingColumn { column: String, file: String },

    #[error("シートがありません: {0}")]
    EmptyWorkbook(String),

    #[error("Excel読み込みエラー: {0}")]
    ExcelRead(#[from] calamine::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("URLが不正: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("照合エラー: {0}")]
    Core(#[from] ref_image_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),
}

pub type Result<T> = std::result::Result<T, MatcherError>;
