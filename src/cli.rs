use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ref-image")]
#[command(about = "参照画像のファイル名から売上シートの会社を照合するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像フォルダをスキャンして画像一覧ワークブックを作成
    Scan {
        /// 画像フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 画像URLのベース（省略時は設定値、無ければローカルパス）
        #[arg(long)]
        base_url: Option<String>,

        /// 出力ワークブック（デフォルト: 設定の listing_file）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// 画像一覧と売上シートを照合
    Match {
        /// 画像一覧ワークブック
        #[arg(required = true)]
        listing: PathBuf,

        /// 売上シート
        #[arg(required = true)]
        sales: PathBuf,

        /// 更新後の売上シート（デフォルト: 設定の output_file）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 照合ログ（デフォルト: 設定の log_file）
        #[arg(long)]
        log: Option<PathBuf>,

        /// 一致閾値（0.0以上）
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// スキャンから照合まで一括実行
    Run {
        /// 画像フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 売上シート
        #[arg(required = true)]
        sales: PathBuf,

        /// 画像URLのベース
        #[arg(long)]
        base_url: Option<String>,

        /// 既存の画像一覧を使わずに再スキャン
        #[arg(long)]
        refresh: bool,

        /// 更新後の売上シート
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 一致閾値
        #[arg(long)]
        threshold: Option<f64>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// ファイル名の分解結果を表示
    Parse {
        /// 画像ファイル名
        #[arg(required = true)]
        filenames: Vec<String>,
    },

    /// 設定を表示/編集
    Config {
        /// 画像URLのベースを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 一致閾値を設定
        #[arg(long)]
        set_threshold: Option<f64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
