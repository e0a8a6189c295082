//! 対話式ページ編集モジュール
//!
//! 端末上で取り込み・並べ替え・キャプション編集・出力を行う。

use crate::cli::OutputMode;
use crate::config::Config;
use crate::error::Result;
use crate::export::{self, Exporter};
use crate::import;
use crate::scanner;
use dialoguer::{Confirm, Input, Select};
use pdfusion_common::{Direction, Notice, NoticeLevel, Page, PageId, ViewState};
use std::path::PathBuf;

/// 対話アクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// 画像を追加
    AddImages,
    /// ページを選択
    Select,
    /// キャプションを編集
    EditCaption,
    /// 選択ページを複製
    Duplicate,
    /// 選択ページを削除
    Delete,
    /// 左へ移動
    MoveLeft,
    /// 右へ移動
    MoveRight,
    /// PDFを保存
    Save,
    /// PDFを共有
    Share,
    /// 終了
    Quit,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::AddImages => "画像を追加",
            Action::Select => "ページを選択",
            Action::EditCaption => "キャプションを編集",
            Action::Duplicate => "複製",
            Action::Delete => "削除",
            Action::MoveLeft => "前へ移動",
            Action::MoveRight => "後ろへ移動",
            Action::Save => "PDFを保存",
            Action::Share => "PDFを共有",
            Action::Quit => "終了",
        }
    }

    /// 現在の状態で使えるアクション
    pub fn available(state: &ViewState) -> Vec<Action> {
        let mut actions = vec![Action::AddImages];
        if let Some(page) = state.selected_page() {
            let index = state.pages.index_of(page.id).unwrap_or(0);
            actions.extend([Action::Select, Action::EditCaption, Action::Duplicate, Action::Delete]);
            if index > 0 {
                actions.push(Action::MoveLeft);
            }
            if index + 1 < state.pages.len() {
                actions.push(Action::MoveRight);
            }
        }
        // ページがなくても選べる（空の出力は通知で断る）
        actions.extend([Action::Save, Action::Share, Action::Quit]);
        actions
    }
}

/// 一覧表示用の1行
pub fn page_label(index: usize, page: &Page, selected: bool) -> String {
    let marker = if selected { "*" } else { " " };
    let (w, h) = page.image.display_size();
    let caption = page.text.lines().next().unwrap_or("");
    let caption = if caption.chars().count() > 30 {
        format!("{}…", caption.chars().take(30).collect::<String>())
    } else {
        caption.to_string()
    };
    if caption.is_empty() {
        format!("{} {:>2}. {} ({}x{})", marker, index + 1, page.image.file_name, w, h)
    } else {
        format!("{} {:>2}. {} ({}x{}) 「{}」", marker, index + 1, page.image.file_name, w, h, caption)
    }
}

fn print_pages(state: &ViewState) {
    if state.pages.is_empty() {
        println!("（ページがありません。画像を追加してください）");
        return;
    }
    let selected = state.pages.selected_id();
    for (index, page) in state.pages.pages().iter().enumerate() {
        println!("{}", page_label(index, page, selected == Some(page.id)));
    }
}

fn print_notice(notice: &Notice) {
    let icon = match notice.level {
        NoticeLevel::Info => "…",
        NoticeLevel::Success => "✔",
        NoticeLevel::Error => "✖",
    };
    println!("{} {}: {}", icon, notice.title, notice.description);
}

fn flush_notices(state: &mut ViewState) {
    for notice in state.notices.drain().iter().rev() {
        print_notice(notice);
    }
}

async fn add_images(state: &mut ViewState, paths: &[PathBuf]) {
    match scanner::collect_inputs(paths) {
        Ok(files) => {
            let report = import::import_files(&files).await;
            let added = report.apply_to(state);
            println!("✔ {}枚の画像を追加", added);
        }
        Err(err) => println!("✖ {}", err),
    }
}

async fn run_export(state: &mut ViewState, exporter: &Exporter, mode: OutputMode) {
    if !state.pages.is_empty() {
        print_notice(&Notice::generating());
    }
    let result = exporter.export(state.pages.pages(), mode).await;
    if let Ok(outcome) = &result {
        if let Some(path) = outcome.saved_path() {
            println!("✔ PDF出力: {}", path.display());
        }
    }
    for notice in export::report(&result) {
        state.notices.push(notice);
    }
}

fn choose_page(state: &ViewState) -> Result<Option<PageId>> {
    let selected = state.pages.selected_id();
    let items: Vec<String> = state
        .pages
        .pages()
        .iter()
        .enumerate()
        .map(|(i, p)| page_label(i, p, selected == Some(p.id)))
        .collect();
    let default = selected.and_then(|id| state.pages.index_of(id)).unwrap_or(0);
    let choice = Select::new()
        .with_prompt("ページを選択")
        .items(&items)
        .default(default)
        .interact_opt()?;
    Ok(choice.map(|i| state.pages.pages()[i].id))
}

fn edit_caption(state: &mut ViewState) -> Result<()> {
    let initial = state.open_caption_editor()?.text.replace('\n', "\\n");
    let text: String = Input::new()
        .with_prompt("キャプション（\\n で改行、空で削除）")
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?;
    state.update_draft(text.replace("\\n", "\n"));

    if Confirm::new().with_prompt("保存しますか？").default(true).interact()? {
        state.save_caption()?;
        println!("✔ キャプションを保存しました");
    } else {
        state.cancel_caption();
        println!("キャプションの変更を破棄しました");
    }
    Ok(())
}

/// 対話式でページを編集
pub async fn run_interactive_editor(inputs: &[PathBuf], config: &Config) -> Result<()> {
    let exporter = Exporter::from_config(config);
    let mut state = ViewState::new();

    println!("📄 PDFusion - ページ編集");
    println!("保存先: {}", exporter.settings().output_dir.display());
    println!("---\n");

    if !inputs.is_empty() {
        add_images(&mut state, inputs).await;
    }

    loop {
        flush_notices(&mut state);
        println!();
        print_pages(&state);
        println!();

        let actions = Action::available(&state);
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        let choice = Select::new()
            .with_prompt("操作")
            .items(&labels)
            .default(0)
            .interact_opt()?;
        let Some(choice) = choice else {
            break;
        };
        let selected = state.pages.selected_id();

        match (actions[choice], selected) {
            (Action::AddImages, _) => {
                let line: String = Input::new()
                    .with_prompt("画像ファイルまたはフォルダ（スペース区切り）")
                    .allow_empty(true)
                    .interact_text()?;
                let paths: Vec<PathBuf> = line.split_whitespace().map(PathBuf::from).collect();
                if !paths.is_empty() {
                    add_images(&mut state, &paths).await;
                }
            }
            (Action::Select, _) => {
                if let Some(id) = choose_page(&state)? {
                    state.select(id)?;
                }
            }
            (Action::EditCaption, Some(_)) => edit_caption(&mut state)?,
            (Action::Duplicate, Some(id)) => {
                state.duplicate(id)?;
            }
            (Action::Delete, Some(id)) => {
                if Confirm::new().with_prompt("このページを削除しますか？").default(false).interact()? {
                    state.delete(id)?;
                }
            }
            (Action::MoveLeft, Some(id)) => {
                state.move_page(id, Direction::Left)?;
            }
            (Action::MoveRight, Some(id)) => {
                state.move_page(id, Direction::Right)?;
            }
            (Action::Save, _) => run_export(&mut state, &exporter, OutputMode::Save).await,
            (Action::Share, _) => run_export(&mut state, &exporter, OutputMode::Share).await,
            (Action::Quit, _) => break,
            _ => {}
        }
    }

    flush_notices(&mut state);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfusion_common::PageImage;

    fn state_with(n: usize) -> ViewState {
        let mut state = ViewState::new();
        let images = (0..n)
            .map(|i| PageImage::new(format!("{}.jpg", i + 1), vec![0u8], 400, 300))
            .collect();
        state.apply_import(images, &[]);
        state
    }

    #[test]
    fn test_actions_for_empty_state() {
        let actions = Action::available(&ViewState::new());
        assert_eq!(actions, vec![Action::AddImages, Action::Save, Action::Share, Action::Quit]);
    }

    #[test]
    fn test_move_actions_follow_position() {
        let mut state = state_with(3);
        let actions = Action::available(&state);
        assert!(!actions.contains(&Action::MoveLeft));
        assert!(actions.contains(&Action::MoveRight));

        let last = state.pages.pages()[2].id;
        state.select(last).unwrap();
        let actions = Action::available(&state);
        assert!(actions.contains(&Action::MoveLeft));
        assert!(!actions.contains(&Action::MoveRight));
    }

    #[test]
    fn test_page_label() {
        let mut state = state_with(1);
        let id = state.pages.pages()[0].id;
        let page = state.pages.get(id).unwrap();
        assert_eq!(page_label(0, page, true), "*  1. 1.jpg (400x300)");

        state.pages.set_text(id, "Hello\nsecond line").unwrap();
        let page = state.pages.get(id).unwrap();
        assert_eq!(page_label(0, page, false), "   1. 1.jpg (400x300) 「Hello」");
    }
}
