use anyhow::{Context, Result};
use image::DynamicImage;
use pdfusion::config::Config;
use pdfusion::scanner::IMAGE_EXTENSIONS;
use pdfusion_common::PageImage;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub fn pick_images() -> Vec<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_files()
        .unwrap_or_default()
}

/// 和文キャプションを表示できそうなシステムフォント
const SYSTEM_CJK_FONTS: &[&str] = &[
    r"C:\Windows\Fonts\meiryo.ttc",
    r"C:\Windows\Fonts\msgothic.ttc",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
];

/// プレビュー用フォントの候補。PDFと同じ表示になるよう設定のフォントを先頭にする
pub fn font_candidates(configured: Option<&Path>) -> Vec<PathBuf> {
    configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(SYSTEM_CJK_FONTS.iter().map(PathBuf::from))
        .collect()
}

/// 候補から最初に読めたフォント
pub fn load_first_font(candidates: &[PathBuf]) -> Option<(String, Vec<u8>)> {
    candidates.iter().find_map(|path| {
        let data = fs::read(path).ok()?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "caption".to_string());
        log::info!("preview font: {}", path.display());
        Some((name, data))
    })
}

/// 設定を読む。読めなければ既定値
pub fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(err) => {
            log::warn!("config load failed, using defaults: {err}");
            Config::default()
        }
    }
}

/// 設定ディレクトリの pdfusion-desktop.log に書き出す
pub fn init_logging() -> Result<()> {
    let dir = Config::config_dir()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join("pdfusion-desktop.log");
    let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
    let config = ConfigBuilder::new().add_filter_allow_str("pdfusion").build();
    WriteLogger::init(LevelFilter::Info, config, file).context("install logger")?;
    Ok(())
}

fn orient(image: DynamicImage, orientation: u8) -> DynamicImage {
    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}

/// プレビュー用にデコードして RGBA にする（正立・縮小済み）
pub fn decode_preview(image: &PageImage, max_edge: u32) -> Result<([usize; 2], Vec<u8>)> {
    let decoded = image::load_from_memory(&image.data)
        .with_context(|| format!("decode {}", image.file_name))?;
    let preview = orient(decoded, image.orientation).thumbnail(max_edge, max_edge);
    let size = [preview.width() as usize, preview.height() as usize];
    Ok((size, preview.to_rgba8().into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        RgbImage::new(width, height).write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn preview_respects_orientation_and_limit() {
        let page = PageImage::new("a.png", png(400, 200), 400, 200).with_orientation(6);
        let (size, pixels) = decode_preview(&page, 100).unwrap();
        assert_eq!(size, [50, 100]);
        assert_eq!(pixels.len(), 50 * 100 * 4);
    }

    #[test]
    fn configured_font_comes_first() {
        let candidates = font_candidates(Some(Path::new("/fonts/caption.ttf")));
        assert_eq!(candidates[0], PathBuf::from("/fonts/caption.ttf"));
        assert_eq!(candidates.len(), SYSTEM_CJK_FONTS.len() + 1);
        assert_eq!(font_candidates(None).len(), SYSTEM_CJK_FONTS.len());
    }

    #[test]
    fn first_readable_font_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("MyFont.ttf");
        std::fs::write(&font, b"font bytes").unwrap();

        let candidates = vec![dir.path().join("missing.ttf"), font];
        let (name, data) = load_first_font(&candidates).unwrap();
        assert_eq!(name, "MyFont");
        assert_eq!(data, b"font bytes");
        assert!(load_first_font(&[dir.path().join("none.ttf")]).is_none());
    }

    #[test]
    fn preview_reports_broken_data() {
        let page = PageImage::new("broken.png", b"nope".to_vec(), 1, 1);
        let err = decode_preview(&page, 100).unwrap_err();
        assert!(format!("{err:#}").contains("broken.png"));
    }
}
