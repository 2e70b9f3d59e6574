//! ファイル名パーサー
//!
//! 画像ファイル名（例: `SAPS4HANA_Oil&Gas_PSO.jpg`）を
//! 製品・スコープ・業種・会社名候補に分解する。
//!
//! 対応レイアウト（優先順）:
//! 1. 3セグメント → `Product_Industry_Company`
//! 2. 4セグメントで2番目がスコープ語 → `Product_Scope_Industry_Company`
//! 3. 4セグメントで3番目だけが既知の業種 → 同上（スコープ語は未登録扱い）
//! 4. その他の4セグメント → `Product_Industry_Industry2_Company`
//! 5. それ以外 → 最後のセグメントを会社名候補とするフォールバック
//!
//! 分解に失敗することはない。会社名候補は必ず空でない。

use crate::alias::IndustryTable;
use crate::types::{FilenameTokens, Layout, Token};
use crate::vocabulary::Vocabulary;
use regex::Regex;

/// 入力が空だった場合の会社名候補
pub const UNNAMED_COMPANY: &str = "unnamed";

/// 語彙と業種テーブルを持つパーサー
#[derive(Debug, Clone)]
pub struct FilenameParser {
    vocabulary: Vocabulary,
    industries: IndustryTable,
}

impl Default for FilenameParser {
    fn default() -> Self {
        Self::new(Vocabulary::builtin(), IndustryTable::builtin())
    }
}

/// レイアウト判定中の途中結果
#[derive(Default)]
struct Draft<'a> {
    product: Option<&'a str>,
    scope: Option<&'a str>,
    industry: Option<String>,
    industry_canonical: Option<String>,
    company: Option<String>,
}

impl FilenameParser {
    pub fn new(vocabulary: Vocabulary, industries: IndustryTable) -> Self {
        Self {
            vocabulary,
            industries,
        }
    }

    pub fn industries(&self) -> &IndustryTable {
        &self.industries
    }

    /// ファイル名を分解する
    pub fn parse(&self, filename: &str) -> FilenameTokens {
        let stem = strip_image_extension(filename.trim());
        let parts = split_segments(stem);

        let (mut draft, layout, degraded) = match parts[..] {
            [] => (Draft::default(), Layout::Fallback, true),
            [product, industry, company] => (
                Draft {
                    product: Some(product),
                    industry: Some(industry.to_string()),
                    company: Some(company.to_string()),
                    ..Default::default()
                },
                Layout::ProductIndustryCompany,
                false,
            ),
            [product, second, third, company] => self.four_segments(product, second, third, company),
            _ => (self.best_effort(&parts), Layout::Fallback, true),
        };

        if draft.industry_canonical.is_none() {
            draft.industry_canonical = draft
                .industry
                .as_deref()
                .and_then(|industry| self.industries.canonicalize(industry));
        }

        let company_candidate = draft
            .company
            .filter(|c| !c.trim().is_empty())
            .map(|c| c.trim().to_string())
            .unwrap_or_else(|| fallback_company(stem, filename));

        FilenameTokens {
            product: draft.product.map(Token::new),
            scope: draft.scope.map(Token::new),
            industry: draft.industry.as_deref().map(Token::new),
            industry_canonical: draft.industry_canonical,
            company_candidate,
            parts: parts.iter().map(|p| p.to_string()).collect(),
            layout,
            degraded,
        }
    }

    fn four_segments<'a>(
        &self,
        product: &'a str,
        second: &'a str,
        third: &'a str,
        company: &'a str,
    ) -> (Draft<'a>, Layout, bool) {
        if self.vocabulary.is_scope(second) {
            let draft = Draft {
                product: Some(product),
                scope: Some(second),
                industry: Some(third.to_string()),
                company: Some(company.to_string()),
                ..Default::default()
            };
            return (draft, Layout::ProductScopeIndustryCompany, false);
        }

        if self.industries.is_known(third) && !self.industries.is_known(second) {
            let draft = Draft {
                product: Some(product),
                scope: Some(second),
                industry: Some(third.to_string()),
                company: Some(company.to_string()),
                ..Default::default()
            };
            return (draft, Layout::ProductScopeIndustryCompany, true);
        }

        let draft = Draft {
            product: Some(product),
            industry: Some(format!("{} {}", second, third)),
            industry_canonical: self.pair_canonical(second, third),
            company: Some(company.to_string()),
            ..Default::default()
        };
        (draft, Layout::ProductIndustryPairCompany, false)
    }

    /// 2つの業種セグメントをまとめて正規化する（"Oil", "Gas" → "Oil & Gas"）
    fn pair_canonical(&self, first: &str, second: &str) -> Option<String> {
        let joined = [format!("{} & {}", first, second), format!("{} {}", first, second)];
        if let Some(known) = joined.iter().find(|j| self.industries.is_known(j)) {
            return self.industries.canonicalize(known);
        }
        [first, second]
            .iter()
            .find(|segment| self.industries.is_known(segment))
            .and_then(|segment| self.industries.canonicalize(segment))
            .or_else(|| self.industries.canonicalize(&joined[1]))
    }

    /// 既知レイアウト以外: 最後のセグメントを会社名候補とし、残りは語彙で拾う
    fn best_effort<'a>(&self, parts: &[&'a str]) -> Draft<'a> {
        let Some((company, rest)) = parts.split_last() else {
            return Draft::default();
        };

        let mut draft = Draft {
            company: Some(company.to_string()),
            ..Default::default()
        };

        let mut middle = rest;
        if let Some((first, tail)) = rest.split_first() {
            if self.vocabulary.is_product(first) {
                draft.product = Some(*first);
                middle = tail;
            }
        }

        draft.scope = middle.iter().copied().find(|s| self.vocabulary.is_scope(s));
        draft.industry = middle
            .iter()
            .find(|s| Some(**s) != draft.scope && self.industries.is_known(s))
            .map(|s| s.to_string());

        draft
    }
}

/// 組み込み語彙でファイル名を分解する
pub fn parse(filename: &str) -> FilenameTokens {
    FilenameParser::default().parse(filename)
}

/// 既知の画像拡張子だけを取り除く（"Co.Ltd" のようなドットは残す）
pub fn strip_image_extension(filename: &str) -> &str {
    lazy_static::lazy_static! {
        static ref IMAGE_EXT_RE: Regex =
            Regex::new(r"(?i)\.(jpe?g|png|gif|bmp|webp|tiff?)$").unwrap();
    }
    match IMAGE_EXT_RE.find(filename) {
        Some(m) => &filename[..m.start()],
        None => filename,
    }
}

/// `_` があれば `_` で、なければ空白で区切る。空のセグメントは捨てる。
pub fn split_segments(stem: &str) -> Vec<&str> {
    if stem.contains('_') {
        stem.split('_')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    } else {
        stem.split_whitespace().collect()
    }
}

fn fallback_company(stem: &str, filename: &str) -> String {
    [stem.trim(), filename.trim()]
        .iter()
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| UNNAMED_COMPANY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display(token: &Option<Token>) -> Option<&str> {
        token.as_ref().map(|t| t.display.as_str())
    }

    #[test]
    fn test_product_industry_company() {
        let tokens = parse("SAPS4HANA_Oil&Gas_PSO");
        assert_eq!(display(&tokens.product), Some("SAPS4HANA"));
        assert_eq!(display(&tokens.industry), Some("Oil&Gas"));
        assert_eq!(display(&tokens.scope), None);
        assert_eq!(tokens.company_candidate, "PSO");
        assert_eq!(tokens.layout, Layout::ProductIndustryCompany);
        assert!(!tokens.degraded);
    }

    #[test]
    fn test_product_scope_industry_company() {
        let tokens = parse("Qlik_SLA_Conglomerate_IBL");
        assert_eq!(display(&tokens.product), Some("Qlik"));
        assert_eq!(display(&tokens.scope), Some("SLA"));
        assert_eq!(display(&tokens.industry), Some("Conglomerate"));
        assert_eq!(tokens.company_candidate, "IBL");
        assert_eq!(tokens.layout, Layout::ProductScopeIndustryCompany);
    }

    #[test]
    fn test_extension_is_stripped() {
        let tokens = parse("Qlik_Licenses_Retail_Imtiaz.JPG");
        assert_eq!(display(&tokens.scope), Some("Licenses"));
        assert_eq!(tokens.company_candidate, "Imtiaz");
        assert_eq!(tokens.industry_canonical.as_deref(), Some("retail"));
    }

    #[test]
    fn test_non_image_dot_is_kept() {
        let tokens = parse("SAP_Retail_Acme Co.Ltd");
        assert_eq!(tokens.company_candidate, "Acme Co.Ltd");
    }

    #[test]
    fn test_comparison_keys_are_lowercase() {
        let tokens = parse("SAPS4HANA_Oil&Gas_PSO");
        let industry = tokens.industry.unwrap();
        assert_eq!(industry.key, "oil&gas");
        assert_eq!(tokens.product.unwrap().key, "saps4hana");
        assert_eq!(tokens.company_candidate, "PSO");
    }

    #[test]
    fn test_unrecognised_scope_before_known_industry() {
        let tokens = parse("Qlik_Dashboards_Retail_Imtiaz");
        assert_eq!(display(&tokens.scope), Some("Dashboards"));
        assert_eq!(display(&tokens.industry), Some("Retail"));
        assert_eq!(tokens.layout, Layout::ProductScopeIndustryCompany);
        assert!(tokens.degraded);
    }

    #[test]
    fn test_industry_pair_is_joined() {
        let tokens = parse("SAP_Oil_Gas_PSO");
        assert_eq!(display(&tokens.industry), Some("Oil Gas"));
        assert_eq!(tokens.layout, Layout::ProductIndustryPairCompany);
        let table = IndustryTable::builtin();
        assert_eq!(tokens.industry_canonical, table.canonicalize("Oil & Gas"));
    }

    #[test]
    fn test_two_segments_with_known_product() {
        let tokens = parse("Qlik_Imtiaz");
        assert_eq!(display(&tokens.product), Some("Qlik"));
        assert_eq!(tokens.company_candidate, "Imtiaz");
        assert!(tokens.degraded);
    }

    #[test]
    fn test_two_segments_with_unknown_first() {
        let tokens = parse("Banner_Imtiaz");
        assert_eq!(tokens.product, None);
        assert_eq!(tokens.company_candidate, "Imtiaz");
    }

    #[test]
    fn test_single_segment() {
        let tokens = parse("PSO.png");
        assert_eq!(tokens.company_candidate, "PSO");
        assert_eq!(tokens.layout, Layout::Fallback);
        assert!(tokens.degraded);
    }

    #[test]
    fn test_many_segments_use_vocabulary() {
        let tokens = parse("SAP_Licenses_Retail_Phase2_Imtiaz");
        assert_eq!(display(&tokens.product), Some("SAP"));
        assert_eq!(display(&tokens.scope), Some("Licenses"));
        assert_eq!(display(&tokens.industry), Some("Retail"));
        assert_eq!(tokens.company_candidate, "Imtiaz");
        assert_eq!(tokens.parts.len(), 5);
    }

    #[test]
    fn test_space_delimited_when_no_underscore() {
        let tokens = parse("Qlik Retail Imtiaz");
        assert_eq!(display(&tokens.product), Some("Qlik"));
        assert_eq!(tokens.company_candidate, "Imtiaz");
    }

    #[test]
    fn test_double_underscore_is_collapsed() {
        let tokens = parse("SAPS4HANA__Oil&Gas_ PSO ");
        assert_eq!(tokens.parts, vec!["SAPS4HANA", "Oil&Gas", "PSO"]);
        assert_eq!(tokens.company_candidate, "PSO");
    }

    #[test]
    fn test_company_candidate_never_empty() {
        for name in ["", "   ", "___", ".jpg", "_ _", "a", "x_y_z_w_v_u"] {
            let tokens = parse(name);
            assert!(!tokens.company_candidate.is_empty(), "empty candidate for {:?}", name);
        }
        assert_eq!(parse("").company_candidate, UNNAMED_COMPANY);
        assert_eq!(parse(".jpg").company_candidate, ".jpg");
    }
}
