//! Reference Image Common Library
//!
//! 画像ファイル名の分解と、売上シートの会社レコードとの照合を行うコア。
//! I/Oは持たず、CLI側から (ファイル名, URL) と会社レコードを受け取る。

pub mod types;
pub mod error;
pub mod alias;
pub mod vocabulary;
pub mod config;
pub mod parser;
pub mod factors;
pub mod matcher;

pub use types::{
    CompanyRecord, Contribution, FactorName, FilenameTokens, ImageRef, Layout, MatchResult,
    MatchStrength, RecordRef, Token,
};
pub use alias::{IndustryTable, KeywordRule};
pub use vocabulary::Vocabulary;
pub use config::{MatchConfig, Weights};
pub use error::{Error, Result};
pub use parser::{parse, FilenameParser};
pub use matcher::{count_invalid_records, Matcher, ScoredRecord};
