use pdfusion_common::{Notice, Page, PageCollection, PageId, ViewState};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct AppState {
    pub view: ViewState,
    pub importing: bool,
    pub exporting: bool,
}

impl AppState {
    /// エクスポート開始。実行中または空なら None（空は通知を出す）
    pub fn begin_export(&mut self) -> Option<Vec<Page>> {
        if self.exporting {
            return None;
        }
        if self.view.pages.is_empty() {
            self.view.notices.push(Notice::empty_export());
            return None;
        }
        self.exporting = true;
        self.view.notices.push(Notice::generating());
        Some(self.view.pages.pages().to_vec())
    }

    pub fn finish_export(&mut self, notices: Vec<Notice>) {
        self.exporting = false;
        for notice in notices {
            self.view.notices.push(notice);
        }
    }

    /// 1始まりのページ番号
    pub fn page_number(&self, id: PageId) -> Option<usize> {
        self.view.pages.index_of(id).map(|i| i + 1)
    }
}

/// ページごとのプレビュー（デコード中・失敗も覚えておく）
#[derive(Debug)]
pub struct PreviewCache<T> {
    ready: HashMap<PageId, T>,
    inflight: HashSet<PageId>,
    failed: HashSet<PageId>,
}

impl<T> Default for PreviewCache<T> {
    fn default() -> Self {
        Self {
            ready: HashMap::new(),
            inflight: HashSet::new(),
            failed: HashSet::new(),
        }
    }
}

impl<T> PreviewCache<T> {
    pub fn get(&self, id: PageId) -> Option<&T> {
        self.ready.get(&id)
    }

    pub fn is_failed(&self, id: PageId) -> bool {
        self.failed.contains(&id)
    }

    pub fn has_inflight(&self) -> bool {
        !self.inflight.is_empty()
    }

    /// デコードを始めるべきなら true を返し、デコード中として記録する
    pub fn start(&mut self, id: PageId) -> bool {
        if self.ready.contains_key(&id) || self.inflight.contains(&id) || self.failed.contains(&id) {
            return false;
        }
        self.inflight.insert(id);
        true
    }

    /// デコード結果を受け取る。ページが既に消えていれば捨てて false
    pub fn finish(&mut self, id: PageId, preview: Option<T>, pages: &PageCollection) -> bool {
        self.inflight.remove(&id);
        if pages.get(id).is_none() {
            return false;
        }
        match preview {
            Some(preview) => {
                self.ready.insert(id, preview);
            }
            None => {
                self.failed.insert(id);
            }
        }
        true
    }

    /// コレクションにないページの分を捨てる
    pub fn retain_pages(&mut self, pages: &PageCollection) {
        self.ready.retain(|id, _| pages.get(*id).is_some());
        self.inflight.retain(|id| pages.get(*id).is_some());
        self.failed.retain(|id| pages.get(*id).is_some());
    }
}
