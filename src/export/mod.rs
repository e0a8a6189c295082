pub mod pdf;
pub mod deliver;

use crate::cli::{OutputMode, PdfQuality};
use crate::config::Config;
use crate::error::{PdfusionError, Result};
use deliver::{save_to_dir, CommandShare, ShareRequest, ShareTarget, Unsupported, SHARE_TITLE};
use pdf::RenderOptions;
use pdfusion_common::{Notice, Page, PdfLayout};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// エクスポート設定
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
    pub file_name: String,
    pub quality: PdfQuality,
    pub font_path: Option<PathBuf>,
}

impl ExportSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.resolve_output_dir(),
            file_name: config.file_name.clone(),
            quality: config.pdf_quality,
            font_path: config.font_path.clone(),
        }
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            title: SHARE_TITLE.to_string(),
            quality: self.quality,
            font_path: self.font_path.clone(),
            layout: PdfLayout::a4(),
        }
    }
}

/// 設定から共有先を決める
pub fn share_target_from_config(config: &Config) -> Arc<dyn ShareTarget> {
    match &config.share_command {
        Some(argv) if !argv.is_empty() => Arc::new(CommandShare::new(argv.clone())),
        _ => Arc::new(Unsupported),
    }
}

/// 受け渡し結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Saved(PathBuf),
    Shared,
    /// 共有非対応のため保存にフォールバックした
    SavedInsteadOfShare(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub page_count: usize,
    pub delivery: Delivery,
}

impl ExportOutcome {
    pub fn saved_path(&self) -> Option<&PathBuf> {
        match &self.delivery {
            Delivery::Saved(path) | Delivery::SavedInsteadOfShare(path) => Some(path),
            Delivery::Shared => None,
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        match self.delivery {
            Delivery::Saved(_) => vec![Notice::saved()],
            Delivery::Shared => vec![Notice::shared()],
            Delivery::SavedInsteadOfShare(_) => vec![Notice::share_unsupported()],
        }
    }
}

/// エクスポート結果を通知に変換する。失敗はここでログに残す
pub fn report(result: &Result<ExportOutcome>) -> Vec<Notice> {
    match result {
        Ok(outcome) => outcome.notices(),
        Err(PdfusionError::EmptyDocument) => vec![Notice::empty_export()],
        Err(err) => {
            log::error!("export failed: {}", err);
            vec![Notice::export_failed()]
        }
    }
}

/// PDFエクスポート
///
/// 同時に走るエクスポートは1つだけ。後から来た要求は先行分の完了を待つ。
pub struct Exporter {
    settings: ExportSettings,
    share: Arc<dyn ShareTarget>,
    lock: Mutex<()>,
}

impl Exporter {
    pub fn new(settings: ExportSettings, share: Arc<dyn ShareTarget>) -> Self {
        Self {
            settings,
            share,
            lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(ExportSettings::from_config(config), share_target_from_config(config))
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub async fn export(&self, pages: &[Page], mode: OutputMode) -> Result<ExportOutcome> {
        if pages.is_empty() {
            return Err(PdfusionError::EmptyDocument);
        }

        let _guard = self.lock.lock().await;
        log::info!("exporting {} page(s) ({:?})", pages.len(), mode);

        let bytes = pdf::render_pdf(pages, &self.settings.render_options()).await?;

        let delivery = match mode {
            OutputMode::Save => Delivery::Saved(self.save(&bytes)?),
            OutputMode::Share if !self.share.can_share_files() => {
                log::warn!("share target cannot share files; saving instead");
                Delivery::SavedInsteadOfShare(self.save(&bytes)?)
            }
            OutputMode::Share => {
                self.share_bytes(bytes).await?;
                Delivery::Shared
            }
        };

        Ok(ExportOutcome {
            page_count: pages.len(),
            delivery,
        })
    }

    fn save(&self, bytes: &[u8]) -> Result<PathBuf> {
        let path = save_to_dir(&self.settings.output_dir, &self.settings.file_name, bytes)?;
        log::info!("saved {}", path.display());
        Ok(path)
    }

    async fn share_bytes(&self, bytes: Vec<u8>) -> Result<()> {
        let share = Arc::clone(&self.share);
        let file_name = self.settings.file_name.clone();
        tokio::task::spawn_blocking(move || {
            share.share(&ShareRequest {
                title: SHARE_TITLE,
                file_name: &file_name,
                bytes: &bytes,
            })
        })
        .await
        .map_err(|e| PdfusionError::ShareFailed(format!("共有タスクが異常終了しました: {}", e)))?
    }
}
