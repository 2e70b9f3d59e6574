//! 一括照合パイプライン
//!
//! 画像ごとの照合は互いに独立なので rayon で並列に回し、入力順のまま集める。

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use rayon::prelude::*;
use ref_image_common::{count_invalid_records, CompanyRecord, ImageRef, MatchResult, MatchStrength, Matcher};
use std::collections::BTreeSet;

/// 照合結果の集計
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub total_images: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    /// フォールバックで分解したファイル名
    pub degraded: usize,
    /// 会社名が空で対象外になった行
    pub invalid_records: usize,
    /// 1件以上の画像が付いた会社数
    pub companies_with_images: usize,
    pub distinct_industries: usize,
    pub threshold: f64,
}

impl RunSummary {
    pub fn from_results(results: &[MatchResult], records: &[CompanyRecord], threshold: f64) -> Self {
        let count = |strength: MatchStrength| results.iter().filter(|r| r.strength == strength).count();
        let matched = results.iter().filter(|r| r.is_matched()).count();

        let companies_with_images = results
            .iter()
            .filter_map(|r| r.matched_record.as_ref().map(|m| m.index))
            .collect::<BTreeSet<_>>()
            .len();

        let distinct_industries = records
            .iter()
            .filter_map(|r| r.industry.as_deref())
            .map(|i| i.trim().to_lowercase())
            .filter(|i| !i.is_empty())
            .collect::<BTreeSet<_>>()
            .len();

        Self {
            total_images: results.len(),
            matched,
            unmatched: results.len() - matched,
            high: count(MatchStrength::High),
            medium: count(MatchStrength::Medium),
            low: count(MatchStrength::Low),
            degraded: results.iter().filter(|r| r.tokens.degraded).count(),
            invalid_records: count_invalid_records(records),
            companies_with_images,
            distinct_industries,
            threshold,
        }
    }
}

fn progress_bar(len: usize, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template("  [{elapsed_precise}] {bar:30.cyan/blue} {pos}/{len} 照合中...")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
    pb.set_style(style);
    pb
}

/// 全画像を照合する（結果は入力順）
pub fn match_images(
    matcher: &Matcher,
    images: &[ImageRef],
    records: &[CompanyRecord],
    show_progress: bool,
) -> Vec<MatchResult> {
    let invalid = count_invalid_records(records);
    if invalid > 0 {
        warn!("会社名が空の行を{}件スキップします", invalid);
    }

    let pb = progress_bar(images.len(), show_progress);
    let results: Vec<MatchResult> = images
        .par_iter()
        .map(|image| {
            let result = matcher.match_image(image, records);
            pb.inc(1);
            result
        })
        .collect();
    pb.finish_and_clear();

    for result in &results {
        if result.tokens.degraded {
            warn!(
                "ファイル名の形式が想定外です: {} ({})",
                result.filename, result.tokens.layout
            );
        }
        match &result.matched_record {
            Some(matched) => debug!(
                "{} -> {} (score {:.2}, {})",
                result.filename,
                matched.name,
                result.score,
                result.factor_summary()
            ),
            None => debug!("{} -> 一致なし (best score {:.2})", result.filename, result.score),
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<CompanyRecord> {
        vec![
            CompanyRecord::new("PSO").with_industry("Oil & Gas"),
            CompanyRecord::new("Imtiaz").with_industry("Retail"),
            CompanyRecord::new(""),
        ]
    }

    fn images() -> Vec<ImageRef> {
        [
            "SAPS4HANA_Oil&Gas_PSO.jpg",
            "Qlik_Licenses_Retail_Imtiaz.png",
            "Qlik_SLA_Energy_PSO.jpg",
            "Random.jpg",
        ]
        .iter()
        .map(|name| ImageRef::new(*name, format!("https://files/{}", name)))
        .collect()
    }

    #[test]
    fn test_parallel_results_keep_input_order() {
        let matcher = Matcher::default();
        let images = images();
        let results = match_images(&matcher, &images, &records(), false);
        let sequential = matcher.match_all(&images, &records());
        assert_eq!(results, sequential);
    }

    #[test]
    fn test_summary_counts() {
        let matcher = Matcher::default();
        let recs = records();
        let results = match_images(&matcher, &images(), &recs, false);
        let summary = RunSummary::from_results(&results, &recs, 0.35);

        assert_eq!(summary.total_images, 4);
        assert_eq!(summary.matched, 3);
        assert_eq!(summary.unmatched, 1);
        assert_eq!(summary.high + summary.medium + summary.low, 3);
        assert_eq!(summary.invalid_records, 1);
        assert_eq!(summary.companies_with_images, 2);
        assert_eq!(summary.distinct_industries, 2);
        assert_eq!(summary.degraded, 1);
    }
}
