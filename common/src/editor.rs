//! 編集画面の状態
//!
//! 選択状態・キャプション下書き・通知を明示的なフィールドとして持つ。
//! 変更はUIスレッド（CLIではメインタスク）からのみ行う。

use crate::collection::{Direction, PageCollection};
use crate::error::{Error, Result};
use crate::notice::{Notice, NoticeBoard};
use crate::types::{Page, PageId, PageImage};

/// キャプション編集ダイアログの下書き
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionDraft {
    pub page_id: PageId,
    pub text: String,
}

/// 取り込みに失敗したファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    pub file_name: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ViewState {
    pub pages: PageCollection,
    pub draft: Option<CaptionDraft>,
    pub notices: NoticeBoard,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_page(&self) -> Option<&Page> {
        self.pages.selected()
    }

    /// 取り込み結果を一括で反映する（成功分は順序通り追加、失敗分は通知）
    pub fn apply_import(&mut self, images: Vec<PageImage>, failures: &[ImportFailure]) -> Vec<PageId> {
        for failure in failures {
            self.notices.push(Notice::import_failed(&failure.file_name, &failure.reason));
        }
        self.pages.append_images(images)
    }

    pub fn select(&mut self, id: PageId) -> Result<()> {
        self.pages.select(id)
    }

    pub fn delete(&mut self, id: PageId) -> Result<()> {
        self.pages.delete(id)?;
        if self.draft.as_ref().is_some_and(|d| d.page_id == id) {
            self.draft = None;
        }
        Ok(())
    }

    pub fn duplicate(&mut self, id: PageId) -> Result<PageId> {
        self.pages.duplicate(id)
    }

    pub fn move_page(&mut self, id: PageId, direction: Direction) -> Result<bool> {
        self.pages.move_page(id, direction)
    }

    /// 選択中ページのキャプションで下書きを開く
    pub fn open_caption_editor(&mut self) -> Result<&mut CaptionDraft> {
        let page = self.pages.selected().ok_or(Error::NoSelection)?;
        let draft = CaptionDraft {
            page_id: page.id,
            text: page.text.clone(),
        };
        Ok(self.draft.insert(draft))
    }

    pub fn is_editing_caption(&self) -> bool {
        self.draft.is_some()
    }

    pub fn update_draft(&mut self, text: impl Into<String>) {
        if let Some(draft) = self.draft.as_mut() {
            draft.text = text.into();
        }
    }

    /// 下書きを確定する。下書きがなければ false
    pub fn save_caption(&mut self) -> Result<bool> {
        let Some(draft) = self.draft.take() else {
            return Ok(false);
        };
        self.pages.set_text(draft.page_id, draft.text)?;
        Ok(true)
    }

    pub fn cancel_caption(&mut self) {
        self.draft = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> PageImage {
        PageImage::new(name, vec![0u8; 8], 640, 480)
    }

    #[test]
    fn test_caption_committed_only_on_save() {
        let mut state = ViewState::new();
        let ids = state.apply_import(vec![image("a.jpg")], &[]);

        state.open_caption_editor().unwrap();
        state.update_draft("Draft text");
        assert_eq!(state.pages.get(ids[0]).unwrap().text, "");

        assert!(state.save_caption().unwrap());
        assert_eq!(state.pages.get(ids[0]).unwrap().text, "Draft text");
        assert!(!state.is_editing_caption());
    }

    #[test]
    fn test_caption_discarded_on_cancel() {
        let mut state = ViewState::new();
        let ids = state.apply_import(vec![image("a.jpg")], &[]);
        state.pages.set_text(ids[0], "keep").unwrap();

        let draft = state.open_caption_editor().unwrap();
        assert_eq!(draft.text, "keep");
        state.update_draft("throw away");
        state.cancel_caption();

        assert_eq!(state.pages.get(ids[0]).unwrap().text, "keep");
        assert!(!state.save_caption().unwrap());
    }

    #[test]
    fn test_open_editor_without_selection() {
        let mut state = ViewState::new();
        assert_eq!(state.open_caption_editor().unwrap_err(), Error::NoSelection);
    }

    #[test]
    fn test_delete_drops_draft_of_deleted_page() {
        let mut state = ViewState::new();
        let ids = state.apply_import(vec![image("a.jpg"), image("b.jpg")], &[]);
        state.open_caption_editor().unwrap();
        state.delete(ids[0]).unwrap();
        assert!(state.draft.is_none());
        assert_eq!(state.pages.selected_id(), Some(ids[1]));
    }

    #[test]
    fn test_import_failures_become_notices() {
        let mut state = ViewState::new();
        let failures = vec![ImportFailure {
            file_name: "bad.png".into(),
            reason: "unsupported".into(),
        }];
        let ids = state.apply_import(vec![image("ok.jpg")], &failures);
        assert_eq!(ids.len(), 1);
        assert_eq!(state.notices.len(), 1);
        assert_eq!(state.notices.current().unwrap().title, "Import failed");
    }

    #[test]
    fn test_scenario_import_caption_duplicate() {
        let mut state = ViewState::new();
        let ids = state.apply_import(vec![image("1.jpg"), image("2.jpg")], &[]);
        assert_eq!(state.pages.len(), 2);
        assert_eq!(state.pages.selected_id(), Some(ids[0]));

        state.select(ids[1]).unwrap();
        state.open_caption_editor().unwrap();
        state.update_draft("Hello");
        state.save_caption().unwrap();
        assert_eq!(state.pages.get(ids[1]).unwrap().text, "Hello");

        let copy = state.duplicate(ids[0]).unwrap();
        let order: Vec<_> = state.pages.pages().iter().map(|p| p.id).collect();
        assert_eq!(order, vec![ids[0], copy, ids[1]]);
    }
}
