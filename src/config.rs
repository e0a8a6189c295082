use crate::cli::PdfQuality;
use crate::error::{PdfusionError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 既定の出力ファイル名
pub const DEFAULT_FILE_NAME: &str = "PDFusion_document.pdf";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 保存先（未設定ならダウンロードフォルダ）
    pub output_dir: Option<PathBuf>,
    pub file_name: String,
    /// 共有コマンド（argv、{file} と {title} を置換）
    pub share_command: Option<Vec<String>>,
    /// キャプション用TrueTypeフォント
    pub font_path: Option<PathBuf>,
    pub pdf_quality: PdfQuality,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: None,
            file_name: DEFAULT_FILE_NAME.into(),
            share_command: None,
            font_path: None,
            pdf_quality: PdfQuality::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PdfusionError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("pdfusion"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// 保存先ディレクトリ（設定 → ダウンロード → カレント）
    pub fn resolve_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// "cmd --flag {file}" 形式の文字列を argv に分割して設定する
    pub fn set_share_command(&mut self, command: &str) -> Result<()> {
        let argv: Vec<String> = command.split_whitespace().map(str::to_string).collect();
        if argv.is_empty() {
            self.share_command = None;
            return Ok(());
        }
        if !argv.iter().any(|a| a.contains("{file}")) {
            return Err(PdfusionError::Config(
                "共有コマンドには {file} を含めてください".into(),
            ));
        }
        self.share_command = Some(argv);
        Ok(())
    }
}
