use crate::error::{MatcherError, Result};
use ref_image_common::{FilenameParser, IndustryTable, MatchConfig, Matcher, Vocabulary};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 画像URLのベース（.env でも指定可）
pub const ENV_BASE_URL: &str = "REF_IMAGE_BASE_URL";
/// 一致閾値の上書き
pub const ENV_THRESHOLD: &str = "REF_IMAGE_THRESHOLD";

pub const DEFAULT_REFERENCE_COLUMN: &str = "Reference Images' URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 共有フォルダのURL（ファイル名を連結して画像URLにする）
    pub base_url: Option<String>,
    /// 画像一覧ワークブック
    pub listing_file: PathBuf,
    /// 更新後の売上シート
    pub output_file: PathBuf,
    /// 照合ログ
    pub log_file: PathBuf,
    /// URLを書き込む列名
    pub reference_column: String,
    pub matching: MatchConfig,
    /// 組み込み語彙への追加
    pub vocabulary: Vocabulary,
    /// 組み込み業種テーブルへの追加・上書き
    pub industry_aliases: IndustryTable,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// 設定ファイルを読み込み、.env と環境変数で上書きする
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config
        } else {
            Self::default_config()
        };

        // .env が無いのは正常
        dotenvy::dotenv().ok();
        config.apply_env()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MatcherError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ref-image").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            base_url: None,
            listing_file: PathBuf::from("Reference_Images.xlsx"),
            output_file: PathBuf::from("Sales_Compiled_Sheet_Updated.xlsx"),
            log_file: PathBuf::from("Matching_Details_Log.xlsx"),
            reference_column: DEFAULT_REFERENCE_COLUMN.into(),
            matching: MatchConfig::default(),
            vocabulary: Vocabulary::default(),
            industry_aliases: IndustryTable::default(),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                self.base_url = Some(url.trim().to_string());
            }
        }
        if let Ok(value) = std::env::var(ENV_THRESHOLD) {
            self.matching.threshold = value.trim().parse().map_err(|_| {
                MatcherError::Config(format!("{} が数値ではありません: {}", ENV_THRESHOLD, value))
            })?;
        }
        Ok(())
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        url::Url::parse(&url)?;
        self.base_url = Some(url);
        self.save()
    }

    pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
        self.matching.threshold = threshold;
        self.matching.validate()?;
        self.save()
    }

    /// 組み込み語彙・業種テーブルに設定分をマージして照合器を作る
    pub fn build_matcher(&self) -> Result<Matcher> {
        let mut vocabulary = Vocabulary::builtin();
        vocabulary.merge(&self.vocabulary);

        let mut industries = IndustryTable::builtin();
        industries.merge(&self.industry_aliases);

        let matcher = Matcher::new(self.matching.clone(), FilenameParser::new(vocabulary, industries))?;
        Ok(matcher)
    }
}
