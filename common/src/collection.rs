//! ページコレクション
//!
//! 並び順がそのままPDFのページ順・サムネイル順になる。
//! IDはコレクションごとの単調増加カウンタから払い出す（時刻に依存しない）。

use crate::error::{Error, Result};
use crate::types::{Page, PageId, PageImage};

/// 並べ替え方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" | "l" | "prev" => Ok(Direction::Left),
            "right" | "r" | "next" => Ok(Direction::Right),
            _ => Err(format!("Unknown direction: {}. Use left or right", s)),
        }
    }
}

/// 順序付きページ列 + 選択状態
#[derive(Debug, Clone, Default)]
pub struct PageCollection {
    pages: Vec<Page>,
    selected: Option<PageId>,
    next_id: u64,
}

impl PageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn selected_id(&self) -> Option<PageId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Page> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub fn index_of(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|p| p.id == id)
    }

    fn require_index(&self, id: PageId) -> Result<usize> {
        self.index_of(id).ok_or(Error::PageNotFound(id))
    }

    fn allocate_id(&mut self) -> PageId {
        self.next_id += 1;
        PageId(self.next_id)
    }

    /// 画像をまとめて末尾に追加する
    ///
    /// 追加前が空だった場合は先頭ページを選択する。追加したIDを返す。
    pub fn append_images(&mut self, images: impl IntoIterator<Item = PageImage>) -> Vec<PageId> {
        let mut added = Vec::new();
        for image in images {
            let id = self.allocate_id();
            self.pages.push(Page {
                id,
                image,
                text: String::new(),
            });
            added.push(id);
        }
        if self.selected.is_none() {
            self.selected = self.pages.first().map(|p| p.id);
        }
        added
    }

    pub fn select(&mut self, id: PageId) -> Result<()> {
        self.require_index(id)?;
        self.selected = Some(id);
        Ok(())
    }

    /// ページを削除
    ///
    /// 選択中のページを消した場合は新しい先頭ページ（なければNone）を選択する。
    pub fn delete(&mut self, id: PageId) -> Result<Page> {
        let index = self.require_index(id)?;
        let removed = self.pages.remove(index);
        if self.selected == Some(id) {
            self.selected = self.pages.first().map(|p| p.id);
        }
        Ok(removed)
    }

    /// ページを複製して直後に挿入（新しいIDを返す）
    pub fn duplicate(&mut self, id: PageId) -> Result<PageId> {
        let index = self.require_index(id)?;
        let mut copy = self.pages[index].clone();
        copy.id = self.allocate_id();
        let new_id = copy.id;
        self.pages.insert(index + 1, copy);
        Ok(new_id)
    }

    /// 隣のページと入れ替える。端では何もせず false を返す
    pub fn move_page(&mut self, id: PageId, direction: Direction) -> Result<bool> {
        let index = self.require_index(id)?;
        let target = match direction {
            Direction::Left => index.checked_sub(1),
            Direction::Right => Some(index + 1).filter(|&i| i < self.pages.len()),
        };
        match target {
            Some(target) => {
                self.pages.swap(index, target);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn set_text(&mut self, id: PageId, text: impl Into<String>) -> Result<()> {
        let index = self.require_index(id)?;
        self.pages[index].text = text.into();
        Ok(())
    }
}
