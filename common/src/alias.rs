//! 業種エイリアス変換モジュール
//!
//! 業種名の表記ゆれ（"Oil & Gas" / "Oil&Gas" / "Energy" など）を
//! 1つの正規化トークンにまとめる。比較は常にこのトークン同士で行う。

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 部分一致ルール（小売のサブ業種など）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub canonical: String,
}

/// 業種の正規化テーブル
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndustryTable {
    /// 完全一致エイリアス（小文字） → 正規化トークン
    #[serde(default)]
    pub aliases: HashMap<String, String>,
    /// 完全一致しなかった場合に順に試す部分一致ルール
    #[serde(default)]
    pub keyword_rules: Vec<KeywordRule>,
}

const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("oil & gas", "energy"),
    ("oil and gas", "energy"),
    ("oil&gas", "energy"),
    ("oil", "energy"),
    ("gas", "energy"),
    ("energy", "energy"),
    ("utilities", "energy"),
    ("utility", "energy"),
    ("power", "energy"),
    ("power transmission", "energy"),
    ("food & beverage", "food&bev"),
    ("food and beverage", "food&bev"),
    ("food&beverage", "food&bev"),
    ("food&bev", "food&bev"),
    ("f&b", "food&bev"),
    ("food", "food&bev"),
    ("banking & finance", "bankingfinance"),
    ("banking and finance", "bankingfinance"),
    ("banking&finance", "bankingfinance"),
    ("banking finance", "bankingfinance"),
    ("banking", "bankingfinance"),
    ("finance", "bankingfinance"),
    ("financial services", "bankingfinance"),
    ("consumer products", "consumerproducts"),
    ("consumer goods", "consumerproducts"),
    ("fmcg", "consumerproducts"),
    ("it services", "itservices"),
    ("it service", "itservices"),
    ("higher education", "education"),
    ("education", "education"),
    ("telecommunications", "telecom"),
    ("telecommunication", "telecom"),
    ("telecom", "telecom"),
    ("public sector", "government"),
    ("public sector/govt", "government"),
    ("public sector/finance", "government"),
    ("government", "government"),
    ("govt", "government"),
    ("automobile", "auto"),
    ("automotive", "auto"),
    ("auto", "auto"),
    ("pharma", "pharmaceutical"),
    ("pharmaceuticals", "pharmaceutical"),
    ("pharmaceutical", "pharmaceutical"),
    ("retail", "retail"),
];

/// 小売のサブ業種は名前に含まれる語で判定する
const RETAIL_KEYWORDS: &[&str] = &[
    "retail",
    "supermarket",
    "hypermarket",
    "grocery",
    "market",
    "mart",
    "store",
    "shop",
];

impl IndustryTable {
    /// 組み込みテーブル
    pub fn builtin() -> Self {
        let aliases = BUILTIN_ALIASES
            .iter()
            .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
            .collect();
        let keyword_rules = RETAIL_KEYWORDS
            .iter()
            .map(|keyword| KeywordRule {
                keyword: keyword.to_string(),
                canonical: "retail".to_string(),
            })
            .collect();
        Self {
            aliases,
            keyword_rules,
        }
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(json)?;
        Ok(table)
    }

    /// 設定をマージ（後から追加した設定が優先）
    ///
    /// キーワードルールは追加分を先に試すよう前に挿入する。
    pub fn merge(&mut self, other: &IndustryTable) {
        for (alias, canonical) in &other.aliases {
            self.aliases
                .insert(collapse_whitespace(&alias.to_lowercase()), canonical.clone());
        }
        let mut rules = other.keyword_rules.clone();
        rules.extend(self.keyword_rules.drain(..));
        self.keyword_rules = rules;
    }

    /// 業種名を正規化トークンに変換する
    ///
    /// 1. 空白を整えた小文字表記で完全一致
    /// 2. 英数字と `&` だけ残した表記で完全一致
    /// 3. 部分一致ルール
    /// 4. 英数字のみの表記（どれにも当たらなかった場合）
    ///
    /// 空文字や記号だけの入力は `None`。
    pub fn canonicalize(&self, raw: &str) -> Option<String> {
        let lowered = collapse_whitespace(&raw.to_lowercase());
        if lowered.is_empty() {
            return None;
        }

        if let Some(canonical) = self.aliases.get(&lowered) {
            return Some(canonical.clone());
        }

        let compact: String = lowered
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '&')
            .collect();
        if let Some(canonical) = self.aliases.get(&compact) {
            return Some(canonical.clone());
        }

        if let Some(rule) = self.keyword_rule_for(&lowered) {
            return Some(rule.canonical.clone());
        }

        let fallback: String = lowered.chars().filter(|c| c.is_alphanumeric()).collect();
        if fallback.is_empty() {
            None
        } else {
            Some(fallback)
        }
    }

    /// テーブルに載っている業種か（フォールバック表記は含まない）
    pub fn is_known(&self, raw: &str) -> bool {
        let lowered = collapse_whitespace(&raw.to_lowercase());
        if lowered.is_empty() {
            return false;
        }
        let compact: String = lowered
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '&')
            .collect();
        self.aliases.contains_key(&lowered)
            || self.aliases.contains_key(&compact)
            || self.keyword_rule_for(&lowered).is_some()
    }

    /// 単語単位（末尾の複数形 `s` は許容）でキーワードルールを探す
    fn keyword_rule_for(&self, lowered: &str) -> Option<&KeywordRule> {
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric() && c != '&')
            .filter(|w| !w.is_empty())
            .collect();
        self.keyword_rules.iter().find(|rule| {
            let keyword_lower = rule.keyword.to_lowercase();
            let keyword: Vec<&str> = keyword_lower.split_whitespace().collect();
            !keyword.is_empty()
                && words.windows(keyword.len()).any(|window| {
                    let (last, init) = (window.len() - 1, &window[..window.len() - 1]);
                    init == &keyword[..last]
                        && (window[last] == keyword[last]
                            || window[last].strip_suffix('s') == Some(keyword[last]))
                })
        })
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
