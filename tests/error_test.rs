//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use pdfusion::cli::{CaptionArg, OutputMode};
use pdfusion::config::Config;
use pdfusion::error::PdfusionError;
use pdfusion::export::{self, Exporter};
use pdfusion::{import, scanner};
use pdfusion_common::{Error as CommonError, PageId, ViewState};
use std::path::Path;
use tempfile::tempdir;

/// 存在しない入力があっても他のファイルは取り込まれる
#[tokio::test]
async fn test_missing_input_does_not_block_others() {
    let dir = tempdir().expect("Failed to create temp dir");
    let good = dir.path().join("a.png");
    let mut out = std::io::Cursor::new(Vec::new());
    image::RgbImage::new(8, 8)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    std::fs::write(&good, out.into_inner()).unwrap();
    let gone = dir.path().join("gone.png");

    let files = scanner::collect_inputs(&[good, gone]).unwrap();
    assert_eq!(files.len(), 2);

    let report = import::import_files(&files).await;
    assert_eq!(report.images.len(), 1);
    assert_eq!(report.images[0].file_name, "a.png");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file_name, "gone.png");
    assert!(report.failures[0].reason.contains("gone.png"));
}

/// 存在しないフォルダは入力エラー
#[test]
fn test_scan_missing_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"));
    assert!(matches!(result, Err(PdfusionError::FileNotFound(_))));
}

/// 画像のないフォルダを指定した場合
#[test]
fn test_collect_folder_without_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let files = scanner::collect_inputs(&[dir.path().to_path_buf()]).unwrap();
    assert!(files.is_empty());
}

/// 空のままエクスポートした場合は通知だけで何も書かない
#[tokio::test]
async fn test_empty_export_has_no_side_effect() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut config = Config::default();
    config.output_dir = Some(dir.path().to_path_buf());
    let exporter = Exporter::from_config(&config);

    for mode in [OutputMode::Save, OutputMode::Share] {
        let result = exporter.export(&[], mode).await;
        assert!(matches!(result, Err(PdfusionError::EmptyDocument)));

        let notices = export::report(&result);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "Cannot generate PDF");
        assert_eq!(notices[0].description, "Please add at least one page.");
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

/// 壊れたファイルはスキップして通知する
#[tokio::test]
async fn test_corrupt_import_is_skipped_and_reported() {
    let dir = tempdir().expect("Failed to create temp dir");
    let broken = dir.path().join("broken.jpg");
    std::fs::write(&broken, b"\xFF\xD8 truncated").unwrap();

    let report = import::import_files(&[broken]).await;
    assert!(report.images.is_empty());
    assert_eq!(report.failures.len(), 1);

    let mut state = ViewState::new();
    assert_eq!(report.apply_to(&mut state), 0);
    assert!(state.pages.is_empty());
    let notice = state.notices.current().expect("通知がない");
    assert!(notice.is_error());
    assert!(notice.description.starts_with("broken.jpg"));
}

/// 存在しないページへの操作
#[test]
fn test_operations_on_unknown_page() {
    let mut state = ViewState::new();
    let ghost = PageId(42);
    assert_eq!(state.delete(ghost), Err(CommonError::PageNotFound(ghost)));
    assert_eq!(state.duplicate(ghost), Err(CommonError::PageNotFound(ghost)));
    assert!(matches!(state.open_caption_editor(), Err(CommonError::NoSelection)));

    // 上位エラーへの変換
    let err: PdfusionError = CommonError::PageNotFound(ghost).into();
    assert!(err.to_string().contains("#42"));
}

/// 不正なキャプション引数
#[test]
fn test_invalid_caption_args() {
    assert!("Hello".parse::<CaptionArg>().is_err());
    assert!("0=Hello".parse::<CaptionArg>().is_err());
    assert!("x=Hello".parse::<CaptionArg>().is_err());
    assert_eq!(
        "2=a\\nb".parse::<CaptionArg>().unwrap(),
        CaptionArg { page: 2, text: "a\nb".into() }
    );
}

/// 壊れた設定ファイル
#[test]
fn test_broken_config_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = Config::load_from(&path);
    assert!(matches!(result, Err(PdfusionError::JsonParse(_))));
}

/// 保存先がファイルだった場合
#[tokio::test]
async fn test_save_into_file_path_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, "x").unwrap();

    let result = pdfusion::export::deliver::save_to_dir(Path::new(&blocker), "a.pdf", b"%PDF");
    assert!(matches!(result, Err(PdfusionError::Io(_))));
}
