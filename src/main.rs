use anyhow::{Context, Result};
use clap::Parser;
use ref_image_matcher::{cli, config, error, pipeline, report, scanner, workbook};
use cli::{Cli, Commands};
use config::Config;
use ref_image_common::{ImageRef, Matcher};
use log::warn;
use std::path::Path;
use workbook::{listing, sales::SalesSheet};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::init_from_env(env_logger::Env::default().default_filter_or(default_level));

    let mut config = Config::load().context("設定の読み込みに失敗しました")?;

    match cli.command {
        Commands::Scan { folder, base_url, output, recursive } => {
            println!("🔍 ref-image - 画像スキャン\n");

            let base_url = base_url.or_else(|| config.base_url.clone());
            let output = output.unwrap_or_else(|| config.listing_file.clone());

            println!("[1/2] 画像をスキャン中...");
            let entries = scanner::scan_folder(&folder, base_url.as_deref(), recursive)?;
            println!("✔ {}枚の画像を検出\n", entries.len());

            println!("[2/2] 画像一覧を保存中...");
            listing::write_listing(&entries, &output)
                .with_context(|| format!("画像一覧を保存できません: {}", output.display()))?;
            println!("✔ 画像一覧を保存: {}", output.display());

            println!("\n✅ スキャン完了");
        }

        Commands::Match { listing: listing_path, sales, output, log, threshold } => {
            println!("🔗 ref-image - 会社照合\n");

            if let Some(threshold) = threshold {
                config.matching.threshold = threshold;
            }
            let matcher = config.build_matcher()?;

            println!("[1/4] 画像一覧を読み込み中...");
            let images = listing::read_listing(&listing_path)
                .with_context(|| format!("画像一覧を読み込めません: {}", listing_path.display()))?;
            println!("✔ {}件の画像\n", images.len());

            let output = output.unwrap_or_else(|| config.output_file.clone());
            let log = log.unwrap_or_else(|| config.log_file.clone());
            match_and_save(&config, &matcher, &images, &sales, &output, &log, cli.verbose)?;

            println!("\n✅ 照合完了");
        }

        Commands::Run { folder, sales, base_url, refresh, output, threshold, recursive } => {
            println!("🚀 ref-image - 一括処理\n");

            if let Some(threshold) = threshold {
                config.matching.threshold = threshold;
            }
            let matcher = config.build_matcher()?;
            let base_url = base_url.or_else(|| config.base_url.clone());
            let listing_path = config.listing_file.clone();

            // 1. 画像一覧（既存があれば再利用）
            let images = if listing_path.exists() && !refresh {
                println!("[1/4] 既存の画像一覧を使用: {}", listing_path.display());
                listing::read_listing(&listing_path)?
            } else {
                println!("[1/4] 画像をスキャン中...");
                let entries = scanner::scan_folder(&folder, base_url.as_deref(), recursive)?;
                listing::write_listing(&entries, &listing_path)?;
                entries.iter().map(|e| e.to_image_ref()).collect()
            };
            println!("✔ {}件の画像\n", images.len());

            if images.is_empty() {
                return Err(error::MatcherError::NoImagesFound(folder.display().to_string()).into());
            }

            let output = output.unwrap_or_else(|| config.output_file.clone());
            let log = config.log_file.clone();
            match_and_save(&config, &matcher, &images, &sales, &output, &log, cli.verbose)?;

            println!("\n✅ 完了");
        }

        Commands::Parse { filenames } => {
            let matcher = config.build_matcher()?;
            for filename in filenames {
                let tokens = matcher.parse(&filename);
                println!("{}", filename);
                println!("  レイアウト: {}{}", tokens.layout, if tokens.degraded { " (推定)" } else { "" });
                println!("  製品: {}", tokens.product.map(|t| t.display).unwrap_or_default());
                println!("  スコープ: {}", tokens.scope.map(|t| t.display).unwrap_or_default());
                println!(
                    "  業種: {} [{}]",
                    tokens.industry.map(|t| t.display).unwrap_or_default(),
                    tokens.industry_canonical.unwrap_or_default()
                );
                println!("  会社名候補: {}", tokens.company_candidate);
            }
        }

        Commands::Config { set_base_url, set_threshold, show } => {
            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ ベースURLを設定しました");
            }

            if let Some(threshold) = set_threshold {
                config.set_threshold(threshold)?;
                println!("✔ 閾値を設定しました");
            }

            if show {
                println!("設定:");
                println!("  パス: {}", Config::config_path()?.display());
                println!("  ベースURL: {}", config.base_url.as_deref().unwrap_or("未設定"));
                println!("  画像一覧: {}", config.listing_file.display());
                println!("  出力: {}", config.output_file.display());
                println!("  照合ログ: {}", config.log_file.display());
                println!("  参照画像列: {}", config.reference_column);
                println!("  閾値: {}", config.matching.threshold);
            }
        }
    }

    Ok(())
}

/// 売上シートを読み込み、照合して、更新シートと照合ログを保存する
fn match_and_save(
    config: &Config,
    matcher: &Matcher,
    images: &[ImageRef],
    sales_path: &Path,
    output: &Path,
    log_path: &Path,
    verbose: bool,
) -> Result<()> {
    println!("[2/4] 売上シートを読み込み中...");
    let mut sheet = SalesSheet::load(sales_path, &config.reference_column)
        .with_context(|| format!("売上シートを読み込めません: {}", sales_path.display()))?;
    if sheet.created_reference_column {
        warn!("列 '{}' が無いため追加します", config.reference_column);
    }
    println!("✔ {}社（業種{}種）\n", sheet.records().len(), sheet.distinct_industries());

    println!("[3/4] 照合中...");
    let results = pipeline::match_images(matcher, images, sheet.records(), !verbose);
    let summary = pipeline::RunSummary::from_results(&results, sheet.records(), matcher.config().threshold);
    let applied = sheet.apply_matches(&results);
    println!(
        "✔ 一致 {}件 / 不一致 {}件（高 {} / 中 {} / 低 {}）\n",
        summary.matched, summary.unmatched, summary.high, summary.medium, summary.low
    );

    println!("[4/4] 結果を保存中...");
    sheet
        .save(output)
        .with_context(|| format!("売上シートを保存できません: {}", output.display()))?;
    println!("✔ {}件のURLを追記: {}", applied, output.display());

    report::write_match_log(&results, sheet.records(), &summary, log_path)
        .with_context(|| format!("照合ログを保存できません: {}", log_path.display()))?;
    println!("✔ 照合ログを保存: {}", log_path.display());

    Ok(())
}
