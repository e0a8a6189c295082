//! 画像取り込み
//!
//! ファイルごとに非同期で読み込み・デコードし、選択順を保ったまま結合する。
//! 失敗したファイルはスキップして `ImportReport::failures` に記録する。

use crate::error::{PdfusionError, Result};
use crate::scanner;
use futures::future::{join_all, FutureExt};
use image::{ImageFormat, ImageReader};
use pdfusion_common::{ImportFailure, PageImage, ViewState};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 取り込み結果（成功分は入力順）
#[derive(Debug, Default)]
pub struct ImportReport {
    pub images: Vec<PageImage>,
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.failures.is_empty()
    }

    /// ビュー状態に反映する（追加は一括、失敗は通知）
    pub fn apply_to(self, state: &mut ViewState) -> usize {
        let added = state.apply_import(self.images, &self.failures);
        added.len()
    }
}

/// PDF描画側でもデコードできる形式
const SUPPORTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
];

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// バイト列をデコードして PageImage にする
///
/// 全体をデコードして壊れたファイルをここで弾く。保持するのは元のバイト列。
pub fn decode_image(file_name: &str, data: Vec<u8>) -> Result<PageImage> {
    let reader = ImageReader::new(Cursor::new(data.as_slice()))
        .with_guessed_format()
        .map_err(|e| PdfusionError::ImageLoad(format!("{}: {}", file_name, e)))?;
    match reader.format() {
        Some(format) if SUPPORTED_FORMATS.contains(&format) => {}
        Some(format) => {
            return Err(PdfusionError::ImageLoad(format!(
                "{}: 未対応の画像形式です ({:?})",
                file_name, format
            )));
        }
        None => {
            return Err(PdfusionError::ImageLoad(format!("{}: 未対応の画像形式です", file_name)));
        }
    }
    let decoded = reader
        .decode()
        .map_err(|e| PdfusionError::ImageLoad(format!("{}: {}", file_name, e)))?;

    let orientation = scanner::read_orientation(&data).unwrap_or(1);
    let data: Arc<[u8]> = data.into();
    Ok(PageImage::new(file_name, data, decoded.width(), decoded.height())
        .with_orientation(orientation))
}

/// 1ファイルを読み込む
pub async fn load_file(path: &Path) -> Result<PageImage> {
    let file_name = display_name(path);
    let data = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PdfusionError::FileNotFound(path.display().to_string())
        } else {
            PdfusionError::ImageLoad(format!("{}: {}", file_name, e))
        }
    })?;

    tokio::task::spawn_blocking(move || decode_image(&file_name, data))
        .await
        .map_err(|e| PdfusionError::ImageLoad(format!("デコードタスクが異常終了しました: {}", e)))?
}

/// 複数ファイルを並行して読み込み、入力順で結合する
pub async fn import_files(paths: &[PathBuf]) -> ImportReport {
    import_files_with_progress(paths, || {}).await
}

/// `import_files` と同じ。1ファイル終わるごとに `on_done` を呼ぶ
pub async fn import_files_with_progress<F>(paths: &[PathBuf], on_done: F) -> ImportReport
where
    F: Fn(),
{
    let results = join_all(
        paths
            .iter()
            .map(|path| load_file(path).inspect(|_| on_done())),
    )
    .await;

    let mut report = ImportReport::default();
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(image) => {
                log::debug!("imported {} ({}x{})", image.file_name, image.width, image.height);
                report.images.push(image);
            }
            Err(err) => {
                log::warn!("import failed for {}: {}", path.display(), err);
                report.failures.push(ImportFailure {
                    file_name: display_name(path),
                    reason: err.to_string(),
                });
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use tempfile::tempdir;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_image_reads_size() {
        let image = decode_image("red.png", png_bytes(30, 20)).unwrap();
        assert_eq!(image.file_name, "red.png");
        assert_eq!((image.width, image.height), (30, 20));
        assert_eq!(image.orientation, 1);
        assert!(!image.data.is_empty());
    }

    #[test]
    fn test_decode_image_rejects_garbage() {
        let err = decode_image("junk.jpg", b"definitely not an image".to_vec()).unwrap_err();
        assert!(matches!(err, PdfusionError::ImageLoad(_)));
        assert!(err.to_string().contains("junk.jpg"));
    }

    #[test]
    fn test_decode_image_rejects_formats_pdf_cannot_embed() {
        let img = RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Qoi).unwrap();

        let err = decode_image("b.qoi", out.into_inner()).unwrap_err();
        assert!(matches!(err, PdfusionError::ImageLoad(_)));
        assert!(err.to_string().contains("b.qoi"));
    }

    #[tokio::test]
    async fn test_import_skips_and_reports_failures() {
        let dir = tempdir().unwrap();
        let good1 = dir.path().join("1.png");
        let bad = dir.path().join("2.png");
        let good2 = dir.path().join("3.png");
        let missing = dir.path().join("4.png");
        std::fs::write(&good1, png_bytes(40, 30)).unwrap();
        std::fs::write(&bad, b"broken").unwrap();
        std::fs::write(&good2, png_bytes(10, 50)).unwrap();

        let report = import_files(&[good1, bad, good2, missing]).await;

        let names: Vec<_> = report.images.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["1.png", "3.png"]);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].file_name, "2.png");
        assert_eq!(report.failures[1].file_name, "4.png");
    }

    #[tokio::test]
    async fn test_apply_to_selects_first_import() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        std::fs::write(&a, png_bytes(8, 8)).unwrap();
        std::fs::write(&b, png_bytes(8, 8)).unwrap();

        let mut state = ViewState::new();
        let added = import_files(&[a, b]).await.apply_to(&mut state);

        assert_eq!(added, 2);
        assert_eq!(state.pages.len(), 2);
        assert_eq!(state.pages.selected_id(), Some(state.pages.pages()[0].id));
        assert!(state.notices.is_empty());
    }
}
