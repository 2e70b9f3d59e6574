//! 照合処理の型定義
//!
//! CLIと照合コアで共有される型:
//! - FilenameTokens: ファイル名パーサーの出力
//! - CompanyRecord: 売上シートの1行
//! - MatchResult: 1ファイル分の照合結果

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// ファイル名から切り出したトークン
///
/// `display` は表示用の元の表記、`key` は比較用の小文字表記。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub display: String,
    pub key: String,
}

impl Token {
    pub fn new(raw: &str) -> Self {
        let display = raw.trim().to_string();
        let key = display.to_lowercase();
        Self { display, key }
    }
}

/// どのファイル名レイアウトで分解したか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Product_Industry_Company
    ProductIndustryCompany,
    /// Product_Scope_Industry_Company
    ProductScopeIndustryCompany,
    /// Product_Industry_Industry2_Company
    ProductIndustryPairCompany,
    /// 既知のレイアウトに当てはまらない
    Fallback,
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::ProductIndustryCompany => write!(f, "Product_Industry_Company"),
            Layout::ProductScopeIndustryCompany => write!(f, "Product_Scope_Industry_Company"),
            Layout::ProductIndustryPairCompany => write!(f, "Product_Industry_Industry2_Company"),
            Layout::Fallback => write!(f, "fallback"),
        }
    }
}

/// ファイル名パーサーの出力
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilenameTokens {
    pub product: Option<Token>,
    pub scope: Option<Token>,
    pub industry: Option<Token>,
    /// 業種の正規化済みトークン（industry がある場合のみ）
    pub industry_canonical: Option<String>,
    /// 会社名候補（常に空でない）
    pub company_candidate: String,
    /// 区切り文字で分割した全セグメント
    pub parts: Vec<String>,
    pub layout: Layout,
    /// フォールバックの推定を使った
    pub degraded: bool,
}

/// 売上シートの1行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl CompanyRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// 会社名が空の行は照合対象にしない
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// 照合対象の画像（ファイル名とアクセス用URL）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub file_name: String,
    pub url: String,
}

impl ImageRef {
    pub fn new(file_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            url: url.into(),
        }
    }
}

/// スコアに寄与する要素
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FactorName {
    CompanyExact,
    CompanySubstring,
    CompanyAcronym,
    CompanyFuzzy,
    IndustryMatch,
    IndustryPartial,
    ProductHit,
    ScopeHit,
    KeywordHit,
    /// ファイル名がフォールバックで分解された（加点なし）
    ParseDegraded,
}

impl FactorName {
    pub fn is_company(&self) -> bool {
        matches!(
            self,
            FactorName::CompanyExact
                | FactorName::CompanySubstring
                | FactorName::CompanyAcronym
                | FactorName::CompanyFuzzy
        )
    }
}

impl std::fmt::Display for FactorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FactorName::CompanyExact => "CompanyExact",
            FactorName::CompanySubstring => "CompanySubstring",
            FactorName::CompanyAcronym => "CompanyAcronym",
            FactorName::CompanyFuzzy => "CompanyFuzzy",
            FactorName::IndustryMatch => "IndustryMatch",
            FactorName::IndustryPartial => "IndustryPartial",
            FactorName::ProductHit => "ProductHit",
            FactorName::ScopeHit => "ScopeHit",
            FactorName::KeywordHit => "KeywordHit",
            FactorName::ParseDegraded => "ParseDegraded",
        };
        write!(f, "{}", name)
    }
}

/// 1つの要素による加点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub factor: FactorName,
    pub weight: f64,
    pub detail: String,
}

impl Contribution {
    pub fn new(factor: FactorName, weight: f64, detail: impl Into<String>) -> Self {
        Self {
            factor,
            weight,
            detail: detail.into(),
        }
    }
}

/// 一致の強さ（ログ表示用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrength {
    High,
    Medium,
    Low,
    None,
}

impl std::fmt::Display for MatchStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStrength::High => write!(f, "high"),
            MatchStrength::Medium => write!(f, "medium"),
            MatchStrength::Low => write!(f, "low"),
            MatchStrength::None => write!(f, "none"),
        }
    }
}

/// 照合で選ばれたレコード（入力スライス上の位置と会社名）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    pub index: usize,
    pub name: String,
}

/// 1ファイル分の照合結果
///
/// `matched_record` は `score >= threshold` のときだけ入る。
/// 不一致の場合も score と要素は最良候補のものを残す（診断用）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub filename: String,
    pub url: String,
    pub tokens: FilenameTokens,
    pub matched_record: Option<RecordRef>,
    pub score: f64,
    pub matched_factors: BTreeSet<FactorName>,
    pub contributions: Vec<Contribution>,
    pub strength: MatchStrength,
}

impl MatchResult {
    pub fn is_matched(&self) -> bool {
        self.matched_record.is_some()
    }

    /// 要素名をカンマ区切りで返す
    pub fn factor_summary(&self) -> String {
        self.matched_factors
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// 加点の詳細を "; " 区切りで返す
    pub fn detail_summary(&self) -> String {
        self.contributions
            .iter()
            .map(|c| format!("{} (+{:.2})", c.detail, c.weight))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
