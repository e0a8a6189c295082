use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfusion")]
#[command(about = "写真を並べてPDFにまとめるツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像からPDFを生成（非対話）
    Build {
        /// 画像ファイルまたはフォルダ（指定順にページ化）
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// 出力ディレクトリ（デフォルト: 設定値 → ダウンロードフォルダ）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// キャプション "ページ番号=テキスト"（1始まり、複数指定可）
        #[arg(short, long = "caption")]
        captions: Vec<CaptionArg>,

        /// 保存の代わりに共有する
        #[arg(long)]
        share: bool,

        /// PDF画像品質 (high/medium/low)
        #[arg(long)]
        quality: Option<PdfQuality>,

        /// 出力ファイル名
        #[arg(long)]
        file_name: Option<String>,
    },

    /// 対話的にページを編集してPDFを出力
    Edit {
        /// 最初に取り込む画像ファイルまたはフォルダ
        inputs: Vec<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 保存先ディレクトリを設定
        #[arg(long)]
        set_output_dir: Option<PathBuf>,

        /// 共有コマンドを設定（{file} と {title} を置換）
        #[arg(long)]
        set_share_command: Option<String>,

        /// キャプション用TrueTypeフォントを設定
        #[arg(long)]
        set_font: Option<PathBuf>,

        /// PDF画像品質を設定
        #[arg(long)]
        set_quality: Option<PdfQuality>,

        /// 設定を初期値に戻す
        #[arg(long)]
        reset: bool,
    },
}

/// `--caption 2=Hello` 形式の引数
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionArg {
    /// 1始まりのページ番号
    pub page: usize,
    pub text: String,
}

impl std::str::FromStr for CaptionArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (page, text) = s
            .split_once('=')
            .ok_or_else(|| format!("Invalid caption: {}. Use PAGE=TEXT", s))?;
        let page: usize = page
            .trim()
            .parse()
            .map_err(|_| format!("Invalid page number: {}", page))?;
        if page == 0 {
            return Err("Page numbers start at 1".to_string());
        }
        Ok(CaptionArg {
            page,
            text: text.replace("\\n", "\n"),
        })
    }
}

/// 出力方法
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    Save,
    Share,
}

/// PDF画像品質設定
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PdfQuality {
    /// 高品質: 長辺2400px
    High,
    /// 中品質: 長辺1600px（デフォルト）
    #[default]
    Medium,
    /// 低品質: 長辺1000px
    Low,
}

impl PdfQuality {
    /// 埋め込み画像の長辺の上限（px）
    pub fn max_long_edge(&self) -> u32 {
        match self {
            PdfQuality::High => 2400,
            PdfQuality::Medium => 1600,
            PdfQuality::Low => 1000,
        }
    }
}

impl std::str::FromStr for PdfQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" | "h" => Ok(PdfQuality::High),
            "medium" | "med" | "m" => Ok(PdfQuality::Medium),
            "low" | "l" => Ok(PdfQuality::Low),
            _ => Err(format!("Unknown quality: {}. Use high, medium, or low", s)),
        }
    }
}

impl std::fmt::Display for PdfQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PdfQuality::High => write!(f, "high"),
            PdfQuality::Medium => write!(f, "medium"),
            PdfQuality::Low => write!(f, "low"),
        }
    }
}
