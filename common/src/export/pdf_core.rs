//! PDF export core utilities shared by CLI/desktop.
//!
//! ページごとの配置とキャプション行を計算する。PDFの書き出し自体は
//! 呼び出し側（printpdf）で行う。

use crate::layout::{CaptionRegion, PagePlacement, PdfLayout};
use crate::types::Page;

/// 1ページ分の描画計画（mm、左上原点）
#[derive(Debug, Clone)]
pub struct PagePlan {
    pub placement: PagePlacement,
    pub caption_lines: Vec<String>,
    /// 領域に収まらず落とした行数
    pub dropped_lines: usize,
}

impl PagePlan {
    pub fn has_caption(&self) -> bool {
        self.placement.caption.is_some()
    }
}

/// キャプションを領域幅で折り返す
///
/// 改行はそのまま維持する。収まらない行は切り捨て、その数を返す。
pub fn wrap_caption(text: &str, region: &CaptionRegion) -> (Vec<String>, usize) {
    let width = region.chars_per_line();
    let mut lines: Vec<String> = textwrap::wrap(text, width)
        .into_iter()
        .map(|line| line.into_owned())
        .collect();

    let max_lines = region.max_lines();
    let dropped = lines.len().saturating_sub(max_lines);
    lines.truncate(max_lines);
    (lines, dropped)
}

/// ページの描画計画を作る
///
/// `display_size` はOrientation適用後の画像サイズ（px）。
pub fn plan_page(layout: &PdfLayout, page: &Page, display_size: (u32, u32)) -> PagePlan {
    let placement = layout.place(display_size, page.has_caption());
    let (caption_lines, dropped_lines) = match &placement.caption {
        Some(region) => wrap_caption(&page.text, region),
        None => (Vec::new(), 0),
    };
    PagePlan {
        placement,
        caption_lines,
        dropped_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PageId, PageImage};

    fn page(text: &str) -> Page {
        Page {
            id: PageId(1),
            image: PageImage::new("a.jpg", vec![], 3000, 2000),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_plan_without_caption() {
        let layout = PdfLayout::a4();
        let plan = plan_page(&layout, &page(""), (3000, 2000));
        assert!(!plan.has_caption());
        assert!(plan.caption_lines.is_empty());
        assert!((plan.placement.image.width - 190.0).abs() < 0.01);
    }

    #[test]
    fn test_plan_with_short_caption() {
        let layout = PdfLayout::a4();
        let plan = plan_page(&layout, &page("Hello"), (3000, 2000));
        assert!(plan.has_caption());
        assert_eq!(plan.caption_lines, vec!["Hello".to_string()]);
        assert_eq!(plan.dropped_lines, 0);
    }

    #[test]
    fn test_wrap_respects_width_and_newlines() {
        let region = PdfLayout::a4().caption_region();
        let long = "word ".repeat(60);
        let text = format!("first line\n{}", long.trim_end());
        let (lines, dropped) = wrap_caption(&text, &region);
        assert_eq!(lines[0], "first line");
        assert!(lines.len() >= 3);
        assert!(lines.iter().all(|l| l.chars().count() <= region.chars_per_line()));
        assert_eq!(dropped, 0);
    }

    #[test]
    fn test_wrap_drops_overflowing_lines() {
        let region = PdfLayout::a4().caption_region();
        let text = vec!["line"; 40].join("\n");
        let (lines, dropped) = wrap_caption(&text, &region);
        assert_eq!(lines.len(), region.max_lines());
        assert_eq!(dropped, 40 - region.max_lines());
    }
}
