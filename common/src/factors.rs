//! スコア要素
//!
//! 各要素は `(Query, CompanyRecord, FactorContext)` を受け取り加点を返す純粋関数。
//! 会社名要素だけは候補の足切りを兼ねるので `company_factor` として別扱い。

use crate::alias::IndustryTable;
use crate::config::MatchConfig;
use crate::types::{CompanyRecord, Contribution, FactorName, FilenameTokens};
use regex::Regex;
use std::collections::BTreeSet;
use strsim::jaro_winkler;

/// 頭字語を作るときに読み飛ばす語
const ACRONYM_FILLERS: &[&str] = &["private", "pvt", "the", "of", "and"];

/// この文字数以下は略号として扱う
const SHORT_CODE_LEN: usize = 4;

/// 会社名以外の要素の関数型
pub type FactorFn = fn(&Query, &CompanyRecord, &FactorContext) -> Vec<Contribution>;

/// 会社名以外の要素（評価順）
pub const SECONDARY_FACTORS: &[FactorFn] = &[industry_factor, product_scope_factor, keyword_factor];

/// 要素評価に必要な設定
pub struct FactorContext<'a> {
    pub config: &'a MatchConfig,
    pub industries: &'a IndustryTable,
}

/// ファイル名トークンから比較用の値を前計算したもの
#[derive(Debug, Clone)]
pub struct Query<'a> {
    pub tokens: &'a FilenameTokens,
    /// 英数字のみの小文字会社名候補
    pub company_norm: String,
    /// 会社名候補が複数語のときの頭文字
    pub company_initials: Option<String>,
    /// キーワード要素で使う語
    pub keywords: BTreeSet<String>,
}

impl<'a> Query<'a> {
    pub fn new(tokens: &'a FilenameTokens, config: &MatchConfig) -> Self {
        let company_norm = normalize(&tokens.company_candidate);
        let company_initials = initials(&words(&tokens.company_candidate), &[]);

        let mut sources: Vec<&str> = tokens.parts.iter().map(String::as_str).collect();
        sources.push(&tokens.company_candidate);
        sources.extend(tokens.product.iter().map(|t| t.display.as_str()));
        sources.extend(tokens.industry.iter().map(|t| t.display.as_str()));

        let keywords = sources
            .iter()
            .flat_map(|s| words(s))
            .filter(|w| w.chars().count() >= config.min_keyword_len)
            .collect();

        Self {
            tokens,
            company_norm,
            company_initials,
            keywords,
        }
    }
}

/// 英数字のみの小文字表記
pub fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// 小文字の単語に分割する（`&` は単語の一部として残す）
pub fn words(value: &str) -> Vec<String> {
    lazy_static::lazy_static! {
        static ref WORD_RE: Regex = Regex::new(r"[\p{L}\p{N}&]+").unwrap();
    }
    WORD_RE
        .find_iter(value)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// 各語の頭文字（2語未満なら None）
fn initials(words: &[String], skip: &[&str]) -> Option<String> {
    let kept: Vec<&String> = words
        .iter()
        .filter(|w| !skip.contains(&w.as_str()))
        .filter(|w| w.chars().next().is_some_and(|c| c.is_alphabetic()))
        .collect();
    if kept.len() < 2 {
        return None;
    }
    Some(kept.iter().filter_map(|w| w.chars().next()).collect())
}

/// 会社名の頭字語の候補（全語 / 補助語を除いた語）
pub fn acronyms(name: &str) -> Vec<String> {
    let name_words = words(name);
    let mut found = Vec::new();
    let no_skip: &[&str] = &[];
    for skip in [no_skip, ACRONYM_FILLERS] {
        if let Some(acronym) = initials(&name_words, skip) {
            if !found.contains(&acronym) {
                found.push(acronym);
            }
        }
    }
    found
}

/// 会社名要素
///
/// 完全一致 → 部分一致 → 頭字語 → あいまい一致 の順に最初に成立したものだけを返す。
/// `None` の場合、そのレコードは候補から外れる。
pub fn company_factor(query: &Query, record: &CompanyRecord, ctx: &FactorContext) -> Option<Contribution> {
    let weights = &ctx.config.weights;
    let candidate = query.company_norm.as_str();
    let name = normalize(&record.name);
    if candidate.is_empty() || name.is_empty() {
        return None;
    }

    if candidate == name {
        return Some(Contribution::new(
            FactorName::CompanyExact,
            weights.company_exact,
            "Exact company name match",
        ));
    }

    let shorter = candidate.chars().count().min(name.chars().count());
    if shorter >= ctx.config.min_substring_len
        && substring_match(candidate, &name, &query.tokens.company_candidate, &record.name)
    {
        return Some(Contribution::new(
            FactorName::CompanySubstring,
            weights.company_substring,
            format!("Company name '{}' contains '{}'", record.name, query.tokens.company_candidate),
        ));
    }

    if candidate.chars().count() >= 2 && acronyms(&record.name).iter().any(|a| a == candidate) {
        return Some(Contribution::new(
            FactorName::CompanyAcronym,
            weights.company_acronym,
            format!("'{}' is the acronym of '{}'", query.tokens.company_candidate, record.name),
        ));
    }
    if query.company_initials.as_deref() == Some(name.as_str()) {
        return Some(Contribution::new(
            FactorName::CompanyAcronym,
            weights.company_acronym,
            format!("'{}' is the acronym of '{}'", record.name, query.tokens.company_candidate),
        ));
    }

    if candidate.chars().count() >= ctx.config.min_substring_len {
        let best = std::iter::once(name.clone())
            .chain(
                words(&record.name)
                    .into_iter()
                    .map(|w| normalize(&w))
                    .filter(|w| w.chars().count() >= ctx.config.min_substring_len),
            )
            .map(|w| jaro_winkler(candidate, &w))
            .fold(0.0_f64, f64::max);
        if best >= ctx.config.fuzzy_floor {
            return Some(Contribution::new(
                FactorName::CompanyFuzzy,
                weights.company_fuzzy,
                format!("Company name similar to '{}' ({:.2})", record.name, best),
            ));
        }
    }

    None
}

/// 一方が他方に含まれるか。短い略号は相手側の語頭に現れた場合だけ認める
/// （"IBL" は "Possible" の途中にあっても一致としない）。
fn substring_match(candidate: &str, name: &str, candidate_raw: &str, name_raw: &str) -> bool {
    let at_word_start = |short: &str, long_raw: &str| {
        words(long_raw)
            .iter()
            .map(|w| normalize(w))
            .any(|w| w.starts_with(short))
    };

    if name.contains(candidate) {
        candidate.chars().count() > SHORT_CODE_LEN || at_word_start(candidate, name_raw)
    } else if candidate.contains(name) {
        name.chars().count() > SHORT_CODE_LEN || at_word_start(name, candidate_raw)
    } else {
        false
    }
}

/// 業種要素: 正規化トークンの一致
pub fn industry_factor(query: &Query, record: &CompanyRecord, ctx: &FactorContext) -> Vec<Contribution> {
    let Some(ours) = query.tokens.industry_canonical.as_deref() else {
        return Vec::new();
    };
    let Some(theirs) = record
        .industry
        .as_deref()
        .and_then(|industry| ctx.industries.canonicalize(industry))
    else {
        return Vec::new();
    };

    let weights = &ctx.config.weights;
    if ours == theirs {
        return vec![Contribution::new(
            FactorName::IndustryMatch,
            weights.industry_match,
            format!("Industry match ({})", theirs),
        )];
    }

    let long_enough = ours.len() >= 3 && theirs.len() >= 3;
    if long_enough && (ours.contains(theirs.as_str()) || theirs.contains(ours)) {
        return vec![Contribution::new(
            FactorName::IndustryPartial,
            weights.industry_partial,
            format!("Industry partial match ({} / {})", ours, theirs),
        )];
    }

    Vec::new()
}

/// 製品・スコープ要素: 説明欄またはスコープ欄に含まれるか
pub fn product_scope_factor(query: &Query, record: &CompanyRecord, ctx: &FactorContext) -> Vec<Contribution> {
    let weights = &ctx.config.weights;
    let mut hits = Vec::new();

    let checks = [
        (query.tokens.product.as_ref(), FactorName::ProductHit, weights.product_hit, "Product"),
        (query.tokens.scope.as_ref(), FactorName::ScopeHit, weights.scope_hit, "Scope"),
    ];
    for (token, factor, weight, label) in checks {
        let Some(token) = token else { continue };
        if let Some(field) = find_in_record(&token.key, record) {
            hits.push(Contribution::new(
                factor,
                weight,
                format!("{} '{}' in {}", label, token.display, field),
            ));
        }
    }

    hits
}

/// 単複を区別せずに説明欄・スコープ欄を探す
fn find_in_record(key: &str, record: &CompanyRecord) -> Option<&'static str> {
    let needle = singular(key.trim());
    if needle.chars().count() < 2 {
        return None;
    }
    let fields = [
        (record.description.as_deref(), "description"),
        (record.scope.as_deref(), "scope"),
    ];
    fields.into_iter().find_map(|(value, label)| {
        value
            .filter(|v| v.to_lowercase().contains(needle))
            .map(|_| label)
    })
}

fn singular(key: &str) -> &str {
    if key.len() > 3 && key.ends_with('s') && !key.ends_with("ss") {
        &key[..key.len() - 1]
    } else {
        key
    }
}

/// キーワード要素: ファイル名の語が説明欄に単語として現れた数だけ加点（上限あり）
pub fn keyword_factor(query: &Query, record: &CompanyRecord, ctx: &FactorContext) -> Vec<Contribution> {
    let Some(description) = record.description.as_deref() else {
        return Vec::new();
    };
    let description_words: BTreeSet<String> = words(description).into_iter().collect();
    let found: Vec<&str> = query
        .keywords
        .iter()
        .filter(|k| description_words.contains(*k))
        .map(String::as_str)
        .collect();
    if found.is_empty() {
        return Vec::new();
    }

    let weights = &ctx.config.weights;
    let bonus = (found.len() as f64 * weights.keyword_hit).min(weights.keyword_cap);
    vec![Contribution::new(
        FactorName::KeywordHit,
        bonus,
        format!("Keywords in description: {}", found.join(", ")),
    )]
}
