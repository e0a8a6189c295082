use crate::cli::PdfQuality;
use crate::error::{PdfusionError, Result};
use pdfusion_common::export::pdf_core::{plan_page, PagePlan};
use pdfusion_common::{Page, PdfLayout};
use printpdf::image_crate::{self, imageops::FilterType, DynamicImage, Rgb, RgbImage};
use printpdf::{BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;

/// 埋め込み画像の基準解像度
const IMAGE_DPI: f32 = 300.0;
const MM_PER_INCH: f32 = 25.4;

/// PDF描画オプション
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub title: String,
    pub quality: PdfQuality,
    pub font_path: Option<PathBuf>,
    pub layout: PdfLayout,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "PDFusion".into(),
            quality: PdfQuality::default(),
            font_path: None,
            layout: PdfLayout::a4(),
        }
    }
}

/// 読み込み済み1ページ（Orientation適用・縮小済み）
struct LoadedPage {
    image: DynamicImage,
    plan: PagePlan,
}

/// EXIF Orientation を適用して正立させる
fn apply_orientation(image: DynamicImage, orientation: u8) -> DynamicImage {
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

/// 透過を白背景に合成してRGBにする
fn flatten_to_rgb(image: DynamicImage) -> DynamicImage {
    if !image.color().has_alpha() {
        return DynamicImage::ImageRgb8(image.to_rgb8());
    }
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let rgb = RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    });
    DynamicImage::ImageRgb8(rgb)
}

/// PDF埋め込み用に画像をデコードする
fn decode_for_pdf(data: &[u8], orientation: u8, quality: PdfQuality) -> Result<DynamicImage> {
    let image = image_crate::load_from_memory(data)
        .map_err(|e| PdfusionError::ImageLoad(e.to_string()))?;
    let image = apply_orientation(image, orientation);

    let limit = quality.max_long_edge();
    let image = if image.width().max(image.height()) > limit {
        image.resize(limit, limit, FilterType::Triangle)
    } else {
        image
    };
    Ok(flatten_to_rgb(image))
}

/// 1ページ分の画像を読み込み、配置を計算する
async fn load_page(page: &Page, options: &RenderOptions) -> Result<LoadedPage> {
    let data: Arc<[u8]> = page.image.data.clone();
    let orientation = page.image.orientation;
    let quality = options.quality;
    let file_name = page.image.file_name.clone();

    let image = tokio::task::spawn_blocking(move || decode_for_pdf(&data, orientation, quality))
        .await
        .map_err(|e| PdfusionError::PdfGeneration(format!("画像読み込みタスクが異常終了しました: {}", e)))?
        .map_err(|e| PdfusionError::PdfGeneration(format!("{}: {}", file_name, e)))?;

    let plan = plan_page(&options.layout, page, (image.width(), image.height()));
    if plan.dropped_lines > 0 {
        log::warn!(
            "caption of page {} overflows the page; {} line(s) dropped",
            page.id,
            plan.dropped_lines
        );
    }
    Ok(LoadedPage { image, plan })
}

fn load_font(doc: &PdfDocumentReference, font_path: Option<&PathBuf>) -> Result<IndirectFontRef> {
    match font_path {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| PdfusionError::PdfGeneration(format!("フォント読み込みエラー {}: {}", path.display(), e)))?;
            doc.add_external_font(BufReader::new(file))
                .map_err(|e| PdfusionError::PdfGeneration(format!("フォント追加エラー: {:?}", e)))
        }
        None => doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| PdfusionError::PdfGeneration(format!("フォント追加エラー: {:?}", e))),
    }
}

/// 読み込み済みページからPDFを組み立ててバイト列にする
fn write_document(pages: &[LoadedPage], options: &RenderOptions) -> Result<Vec<u8>> {
    let layout = &options.layout;
    let page_w = Mm(layout.page_width_mm);
    let page_h = Mm(layout.page_height_mm);

    let (doc, first_page, first_layer) = PdfDocument::new(options.title.clone(), page_w, page_h, "Layer 1");
    let font = load_font(&doc, options.font_path.as_ref())?;

    for (index, loaded) in pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(page_w, page_h, "Layer 1")
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        // 画像（PDFは左下原点なので下端から変換）
        let rect = loaded.plan.placement.image;
        let natural_w_mm = loaded.image.width() as f32 / IMAGE_DPI * MM_PER_INCH;
        let natural_h_mm = loaded.image.height() as f32 / IMAGE_DPI * MM_PER_INCH;
        Image::from_dynamic_image(&loaded.image).add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(rect.x)),
                translate_y: Some(Mm(layout.page_height_mm - rect.bottom())),
                scale_x: Some(rect.width / natural_w_mm),
                scale_y: Some(rect.height / natural_h_mm),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );

        // キャプション
        if let Some(region) = &loaded.plan.placement.caption {
            for (line_no, line) in loaded.plan.caption_lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                layer.use_text(
                    line.clone(),
                    region.font_size_pt,
                    Mm(region.x),
                    Mm(layout.page_height_mm - region.baseline(line_no)),
                    &font,
                );
            }
        }
    }

    let mut bytes = Vec::new();
    {
        let mut writer = BufWriter::new(&mut bytes);
        doc.save(&mut writer)
            .map_err(|e| PdfusionError::PdfGeneration(format!("PDF保存エラー: {:?}", e)))?;
        writer
            .into_inner()
            .map_err(|e| PdfusionError::PdfGeneration(format!("PDF保存エラー: {}", e)))?;
    }
    Ok(bytes)
}

/// ページ列をPDFに変換する
///
/// 画像の読み込みは1ページずつ順に待つ。ページ数0はエラー。
pub async fn render_pdf(pages: &[Page], options: &RenderOptions) -> Result<Vec<u8>> {
    if pages.is_empty() {
        return Err(PdfusionError::EmptyDocument);
    }

    let mut loaded = Vec::with_capacity(pages.len());
    for page in pages {
        loaded.push(load_page(page, options).await?);
    }
    write_document(&loaded, options)
}
