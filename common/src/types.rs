//! ページの型定義
//!
//! CLIとデスクトップで共有される型:
//! - PageId: コレクション内で一意なページID
//! - PageImage: 取り込んだ画像のエンコード済みデータ
//! - Page: 画像 + キャプションの1ページ

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// ページID（位置とは無関係、ページの生存期間中は不変）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageId(pub u64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 取り込んだ画像
///
/// `data` は元ファイルのバイト列そのもの。複製ページとは共有する。
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    pub file_name: String,
    pub data: Arc<[u8]>,
    /// 保存されているラスタの幅（回転前、px）
    pub width: u32,
    /// 保存されているラスタの高さ（回転前、px）
    pub height: u32,
    /// EXIF Orientation (1..=8)
    pub orientation: u8,
}

impl PageImage {
    pub fn new(file_name: impl Into<String>, data: impl Into<Arc<[u8]>>, width: u32, height: u32) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
            width,
            height,
            orientation: 1,
        }
    }

    pub fn with_orientation(mut self, orientation: u8) -> Self {
        self.orientation = if (1..=8).contains(&orientation) { orientation } else { 1 };
        self
    }

    /// 90度回転を含むOrientationか（5..=8は幅と高さが入れ替わる）
    pub fn is_transposed(&self) -> bool {
        matches!(self.orientation, 5..=8)
    }

    /// 表示上のサイズ（Orientation適用後、px）
    pub fn display_size(&self) -> (u32, u32) {
        if self.is_transposed() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}

/// 1ページ = 画像1枚 + キャプション
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: PageId,
    pub image: PageImage,
    /// キャプション（空ならキャプション欄なし）
    pub text: String,
}

impl Page {
    pub fn has_caption(&self) -> bool {
        !self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_size_swaps_for_rotated() {
        let image = PageImage::new("a.jpg", vec![0u8; 4], 4000, 3000);
        assert_eq!(image.display_size(), (4000, 3000));

        let rotated = image.clone().with_orientation(6);
        assert_eq!(rotated.display_size(), (3000, 4000));

        let mirrored = image.with_orientation(2);
        assert_eq!(mirrored.display_size(), (4000, 3000));
    }

    #[test]
    fn test_invalid_orientation_falls_back() {
        let image = PageImage::new("a.jpg", vec![], 10, 20).with_orientation(42);
        assert_eq!(image.orientation, 1);
    }

    #[test]
    fn test_page_id_display() {
        assert_eq!(PageId(7).to_string(), "#7");
    }
}
