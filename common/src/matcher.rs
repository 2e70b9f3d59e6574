//! 会社照合モジュール
//!
//! 1ファイル分のトークンを全レコードと比較し、最高スコアのレコードを選ぶ。
//! 入力にも自身にも副作用を持たないので、ファイル単位で並列に呼び出してよい。

use crate::config::MatchConfig;
use crate::error::Result;
use crate::factors::{company_factor, FactorContext, Query, SECONDARY_FACTORS};
use crate::parser::FilenameParser;
use crate::types::{
    CompanyRecord, Contribution, FactorName, FilenameTokens, ImageRef, MatchResult, RecordRef,
};
use std::collections::BTreeSet;

/// 1レコード分の採点結果
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub index: usize,
    pub score: f64,
    pub contributions: Vec<Contribution>,
}

/// 照合器（設定・パーサーを保持するだけで状態は持たない）
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatchConfig,
    parser: FilenameParser,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            config: MatchConfig::default(),
            parser: FilenameParser::default(),
        }
    }
}

impl Matcher {
    /// 設定を検証して照合器を作る
    pub fn new(config: MatchConfig, parser: FilenameParser) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, parser })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn parse(&self, filename: &str) -> FilenameTokens {
        self.parser.parse(filename)
    }

    /// 1レコードを採点する。会社名要素が成立しなければ `None`。
    pub fn score_record(&self, query: &Query, index: usize, record: &CompanyRecord) -> Option<ScoredRecord> {
        if !record.is_valid() {
            return None;
        }
        let ctx = FactorContext {
            config: &self.config,
            industries: self.parser.industries(),
        };

        let mut contributions = vec![company_factor(query, record, &ctx)?];
        for factor in SECONDARY_FACTORS {
            contributions.extend(factor(query, record, &ctx));
        }
        let score = contributions.iter().map(|c| c.weight).sum();

        Some(ScoredRecord {
            index,
            score,
            contributions,
        })
    }

    /// 最高スコアのレコードを返す（同点は入力順で先のもの）
    pub fn best_candidate(&self, tokens: &FilenameTokens, records: &[CompanyRecord]) -> Option<ScoredRecord> {
        let query = Query::new(tokens, &self.config);
        let mut best: Option<ScoredRecord> = None;

        for (index, record) in records.iter().enumerate() {
            let Some(scored) = self.score_record(&query, index, record) else {
                continue;
            };
            if best.as_ref().map_or(true, |b| scored.score > b.score) {
                best = Some(scored);
            }
        }

        best
    }

    /// 分解済みトークンを照合する
    pub fn match_tokens(&self, image: &ImageRef, tokens: FilenameTokens, records: &[CompanyRecord]) -> MatchResult {
        let best = self.best_candidate(&tokens, records);

        // 候補が無ければ score 0・要素なし（推定分解は tokens.degraded で分かる）
        let (score, contributions, matched_record) = match best {
            Some(mut scored) => {
                let matched = (scored.score >= self.config.threshold).then(|| RecordRef {
                    index: scored.index,
                    name: records[scored.index].name.clone(),
                });
                if tokens.degraded {
                    scored.contributions.push(Contribution::new(
                        FactorName::ParseDegraded,
                        0.0,
                        format!("Fallback filename layout ({})", tokens.layout),
                    ));
                }
                (scored.score, scored.contributions, matched)
            }
            None => (0.0, Vec::new(), None),
        };

        let matched_factors: BTreeSet<FactorName> = contributions.iter().map(|c| c.factor).collect();
        let strength = self.config.strength(score, matched_record.is_some());

        MatchResult {
            filename: image.file_name.clone(),
            url: image.url.clone(),
            tokens,
            matched_record,
            score,
            matched_factors,
            contributions,
            strength,
        }
    }

    /// ファイル名を分解して照合する
    pub fn match_image(&self, image: &ImageRef, records: &[CompanyRecord]) -> MatchResult {
        let tokens = self.parse(&image.file_name);
        self.match_tokens(image, tokens, records)
    }

    /// 入力順を保って全画像を照合する
    pub fn match_all(&self, images: &[ImageRef], records: &[CompanyRecord]) -> Vec<MatchResult> {
        images.iter().map(|image| self.match_image(image, records)).collect()
    }
}

/// 会社名が空で照合対象外になるレコード数
pub fn count_invalid_records(records: &[CompanyRecord]) -> usize {
    records.iter().filter(|r| !r.is_valid()).count()
}
