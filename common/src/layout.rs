//! レイアウト設定モジュール
//!
//! mm基準のレイアウト定義。座標はページ左上原点・下向きY（mm）で扱い、
//! PDF座標（左下原点）への変換は描画側で行う。

// ============================================
// mm基準レイアウト
// ============================================

/// A4サイズ（mm）
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// 余白設定（mm）
pub const MARGIN_MM: f32 = 10.0;

/// キャプション
pub const CAPTION_FONT_SIZE_PT: f32 = 12.0;
pub const CAPTION_LINE_HEIGHT_FACTOR: f32 = 1.15;
/// Helveticaの平均字幅（em）。折り返し文字数の見積もりに使う
pub const AVG_GLYPH_WIDTH_EM: f32 = 0.5;

/// 利用可能幅（mm）
pub const USABLE_WIDTH_MM: f32 = A4_WIDTH_MM - MARGIN_MM * 2.0; // 190mm
/// 利用可能高さ（キャプションなし、mm）
pub const USABLE_HEIGHT_MM: f32 = A4_HEIGHT_MM - MARGIN_MM * 2.0; // 277mm
/// 利用可能高さ（キャプションあり、上半分、mm）
pub const USABLE_HEIGHT_WITH_CAPTION_MM: f32 = A4_HEIGHT_MM / 2.0 - MARGIN_MM * 1.5; // 133.5mm
/// キャプション1行目ベースライン（上から、mm）
pub const CAPTION_TOP_MM: f32 = A4_HEIGHT_MM / 2.0 + MARGIN_MM / 2.0; // 153.5mm

// ============================================
// 変換係数
// ============================================

/// mm → pt変換 (1mm = 72/25.4 pt ≈ 2.835pt)
pub const MM_TO_PT: f32 = 72.0 / 25.4;

// ============================================
// 配置計算
// ============================================

/// 矩形（mm、左上原点）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// キャプション領域
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionRegion {
    pub x: f32,
    /// 1行目ベースライン（上から、mm）
    pub first_baseline: f32,
    pub width: f32,
    pub font_size_pt: f32,
    pub line_height_mm: f32,
    /// 最終行ベースラインの下限（上から、mm）
    pub max_baseline: f32,
}

impl CaptionRegion {
    /// 収まる最大行数
    pub fn max_lines(&self) -> usize {
        if self.max_baseline < self.first_baseline {
            return 0;
        }
        ((self.max_baseline - self.first_baseline) / self.line_height_mm).floor() as usize + 1
    }

    /// n行目（0始まり）のベースライン
    pub fn baseline(&self, line: usize) -> f32 {
        self.first_baseline + line as f32 * self.line_height_mm
    }

    /// 1行に収まる文字数の見積もり
    pub fn chars_per_line(&self) -> usize {
        let glyph_mm = pt_to_mm(self.font_size_pt * AVG_GLYPH_WIDTH_EM);
        ((self.width / glyph_mm).floor() as usize).max(1)
    }
}

/// 1ページ分の配置結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    pub image: Rect,
    pub caption: Option<CaptionRegion>,
}

/// PDFレイアウト設定
#[derive(Debug, Clone)]
pub struct PdfLayout {
    /// ページ幅（mm）
    pub page_width_mm: f32,
    /// ページ高さ（mm）
    pub page_height_mm: f32,
    /// マージン（mm）
    pub margin_mm: f32,
    /// キャプション文字サイズ（pt）
    pub caption_font_size_pt: f32,
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self::a4()
    }
}

impl PdfLayout {
    pub fn a4() -> Self {
        Self {
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            margin_mm: MARGIN_MM,
            caption_font_size_pt: CAPTION_FONT_SIZE_PT,
        }
    }

    /// 利用可能幅（mm）
    pub fn usable_width_mm(&self) -> f32 {
        self.page_width_mm - self.margin_mm * 2.0
    }

    /// 画像に使える高さ（mm）。キャプションがあれば上半分のみ
    pub fn usable_height_mm(&self, has_caption: bool) -> f32 {
        if has_caption {
            self.page_height_mm / 2.0 - self.margin_mm * 1.5
        } else {
            self.page_height_mm - self.margin_mm * 2.0
        }
    }

    pub fn caption_region(&self) -> CaptionRegion {
        CaptionRegion {
            x: self.margin_mm,
            first_baseline: self.page_height_mm / 2.0 + self.margin_mm / 2.0,
            width: self.usable_width_mm(),
            font_size_pt: self.caption_font_size_pt,
            line_height_mm: pt_to_mm(self.caption_font_size_pt * CAPTION_LINE_HEIGHT_FACTOR),
            max_baseline: self.page_height_mm - self.margin_mm,
        }
    }

    /// 画像（表示サイズpx）をページに配置する
    pub fn place(&self, image_size: (u32, u32), has_caption: bool) -> PagePlacement {
        let available = (self.usable_width_mm(), self.usable_height_mm(has_caption));
        let (width, height) = fit_within(image_size, available);
        PagePlacement {
            image: Rect {
                x: (self.page_width_mm - width) / 2.0,
                y: self.margin_mm,
                width,
                height,
            },
            caption: has_caption.then(|| self.caption_region()),
        }
    }
}

/// 縦横比を保ったまま available に収まる最大サイズを求める
///
/// 画像の方が横長なら幅合わせ、そうでなければ高さ合わせ。
pub fn fit_within(source: (u32, u32), available: (f32, f32)) -> (f32, f32) {
    let (src_w, src_h) = source;
    let (avail_w, avail_h) = available;
    if src_w == 0 || src_h == 0 {
        return (0.0, 0.0);
    }

    let image_ratio = src_w as f32 / src_h as f32;
    let area_ratio = avail_w / avail_h;

    if image_ratio > area_ratio {
        (avail_w, avail_w / image_ratio)
    } else {
        (avail_h * image_ratio, avail_h)
    }
}

// ============================================
// ヘルパー関数
// ============================================

/// mm → pt 変換
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

/// pt → mm 変換
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / MM_TO_PT
}
