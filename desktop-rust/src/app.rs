use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use eframe::egui::{self, Color32, RichText};
use eframe::egui::{FontData, FontDefinitions, FontFamily};
use pdfusion::cli::OutputMode;
use pdfusion::config::Config;
use pdfusion::error::{PdfusionError, Result as PdfResult};
use pdfusion::export::{self, ExportOutcome, Exporter};
use pdfusion::import::{self, ImportReport};
use pdfusion_common::{Direction, ImportFailure, NoticeLevel, PageId, PageImage};

use crate::io::{decode_preview, font_candidates, load_first_font, pick_images};
use crate::model::{AppState, PreviewCache};

const PREVIEW_MAX_EDGE: u32 = 1600;
const THUMB_SIZE: egui::Vec2 = egui::vec2(96.0, 96.0);

pub struct DesktopApp {
    state: AppState,
    exporter: Arc<Exporter>,
    rx: Receiver<UiMessage>,
    tx: Sender<UiMessage>,
    previews: PreviewCache<egui::TextureHandle>,
}

enum UiMessage {
    ImportDone(ImportReport),
    ExportDone(PdfResult<ExportOutcome>),
    Thumb(ThumbData),
}

struct ThumbData {
    id: PageId,
    size: [usize; 2],
    pixels: Vec<u8>,
}

/// ページ操作（描画中に集めて、描画後にまとめて適用する）
#[derive(Debug, Clone, Copy)]
enum PageAction {
    Select(PageId),
    Delete(PageId),
    Duplicate(PageId),
    Move(PageId, Direction),
    EditCaption,
    SaveCaption,
    CancelCaption,
}

/// 非同期処理をこのスレッド専用のランタイムで待つ
fn block_on<F: std::future::Future>(future: F) -> std::io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

impl DesktopApp {
    pub fn new(config: Config) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            state: AppState::default(),
            exporter: Arc::new(Exporter::from_config(&config)),
            rx,
            tx,
            previews: PreviewCache::default(),
        }
    }

    fn add_images(&mut self) {
        if self.state.importing {
            return;
        }
        let paths = pick_images();
        if paths.is_empty() {
            return;
        }
        self.start_import(paths);
    }

    fn start_import(&mut self, paths: Vec<PathBuf>) {
        self.state.importing = true;
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let report = match block_on(import::import_files(&paths)) {
                Ok(report) => report,
                Err(err) => ImportReport {
                    images: Vec::new(),
                    failures: paths
                        .iter()
                        .map(|p| ImportFailure {
                            file_name: p.display().to_string(),
                            reason: err.to_string(),
                        })
                        .collect(),
                },
            };
            let _ = tx.send(UiMessage::ImportDone(report));
        });
    }

    fn start_export(&mut self, mode: OutputMode) {
        let Some(pages) = self.state.begin_export() else {
            return;
        };
        let exporter = Arc::clone(&self.exporter);
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let result = block_on(async move { exporter.export(&pages, mode).await })
                .map_err(PdfusionError::from)
                .and_then(|r| r);
            let _ = tx.send(UiMessage::ExportDone(result));
        });
    }

    fn request_texture(&mut self, id: PageId, image: &PageImage) {
        if !self.previews.start(id) {
            return;
        }
        let tx = self.tx.clone();
        let image = image.clone();

        std::thread::spawn(move || {
            let thumb = match decode_preview(&image, PREVIEW_MAX_EDGE) {
                Ok((size, pixels)) => ThumbData { id, size, pixels },
                Err(err) => {
                    log::warn!("preview failed: {err:#}");
                    ThumbData { id, size: [0, 0], pixels: Vec::new() }
                }
            };
            let _ = tx.send(UiMessage::Thumb(thumb));
        });
    }

    fn poll_messages(&mut self, ctx: &egui::Context) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::ImportDone(report) => {
                    self.state.importing = false;
                    let added = report.apply_to(&mut self.state.view);
                    log::info!("imported {added} page(s)");
                }
                UiMessage::ExportDone(result) => {
                    self.state.finish_export(export::report(&result));
                }
                UiMessage::Thumb(thumb) => {
                    let texture = (thumb.size[0] > 0 && thumb.size[1] > 0).then(|| {
                        let color_image = egui::ColorImage::from_rgba_unmultiplied(thumb.size, &thumb.pixels);
                        ctx.load_texture(
                            format!("page-{}", thumb.id.0),
                            color_image,
                            egui::TextureOptions::LINEAR,
                        )
                    });
                    if !self.previews.finish(thumb.id, texture, &self.state.view.pages) {
                        log::debug!("dropped preview for removed page {}", thumb.id);
                    }
                }
            }
        }
    }

    fn apply(&mut self, action: PageAction) {
        let view = &mut self.state.view;
        let result = match action {
            PageAction::Select(id) => view.select(id),
            PageAction::Delete(id) => view.delete(id),
            PageAction::Duplicate(id) => view.duplicate(id).map(|_| ()),
            PageAction::Move(id, direction) => view.move_page(id, direction).map(|_| ()),
            PageAction::EditCaption => view.open_caption_editor().map(|_| ()),
            PageAction::SaveCaption => view.save_caption().map(|_| ()),
            PageAction::CancelCaption => {
                view.cancel_caption();
                Ok(())
            }
        };
        if let Err(err) = result {
            log::warn!("{action:?} failed: {err}");
        }

        self.previews.retain_pages(&self.state.view.pages);
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("PDFusion");
            ui.label(RichText::new(format!("{} pages", self.state.view.pages.len())).color(Color32::from_gray(170)));
            ui.separator();
            if ui
                .add_enabled(!self.state.importing, egui::Button::new("Add Images"))
                .clicked()
            {
                self.add_images();
            }
            if self.state.importing {
                ui.spinner();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let enabled = !self.state.exporting;
                if ui.add_enabled(enabled, egui::Button::new("Download")).clicked() {
                    self.start_export(OutputMode::Save);
                }
                if ui.add_enabled(enabled, egui::Button::new("Share")).clicked() {
                    self.start_export(OutputMode::Share);
                }
                if self.state.exporting {
                    ui.spinner();
                }
            });
        });
    }

    fn render_empty(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 3.0);
            ui.label(RichText::new("No pages yet").size(22.0).strong());
            ui.label("Add photos to start building your PDF.");
            ui.add_space(12.0);
            if ui
                .add_enabled(!self.state.importing, egui::Button::new("Add Images"))
                .clicked()
            {
                self.add_images();
            }
        });
    }

    fn render_preview(&mut self, ui: &mut egui::Ui, actions: &mut Vec<PageAction>) {
        let Some(page) = self.state.view.selected_page().cloned() else {
            ui.label("Select a page to preview.");
            return;
        };
        let count = self.state.view.pages.len();
        let number = self.state.page_number(page.id).unwrap_or(1);

        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("Page {number} / {count}")).strong());
            ui.label(RichText::new(&page.image.file_name).color(Color32::from_gray(170)));
            ui.separator();
            if ui.button("Edit Caption").clicked() {
                actions.push(PageAction::EditCaption);
            }
            if ui.button("Duplicate").clicked() {
                actions.push(PageAction::Duplicate(page.id));
            }
            if ui.add_enabled(number > 1, egui::Button::new("◀ Move")).clicked() {
                actions.push(PageAction::Move(page.id, Direction::Left));
            }
            if ui.add_enabled(number < count, egui::Button::new("Move ▶")).clicked() {
                actions.push(PageAction::Move(page.id, Direction::Right));
            }
            if ui
                .button(RichText::new("Delete").color(Color32::from_rgb(230, 90, 90)))
                .clicked()
            {
                actions.push(PageAction::Delete(page.id));
            }
        });
        ui.separator();

        let caption_height = if page.has_caption() { 80.0 } else { 0.0 };
        let available = ui.available_size() - egui::vec2(0.0, caption_height);
        let (w, h) = page.image.display_size();
        let scale = (available.x / w.max(1) as f32)
            .min(available.y / h.max(1) as f32)
            .max(0.0);
        let size = egui::vec2(w as f32 * scale, h as f32 * scale);

        ui.vertical_centered(|ui| {
            if let Some(texture) = self.previews.get(page.id) {
                ui.add(egui::Image::new(texture).fit_to_exact_size(size));
            } else if self.previews.is_failed(page.id) {
                ui.allocate_ui(size, |ui| ui.label("Preview unavailable"));
            } else {
                self.request_texture(page.id, &page.image);
                ui.allocate_ui(size, |ui| ui.spinner());
            }
            if page.has_caption() {
                ui.add_space(8.0);
                ui.label(RichText::new(&page.text).size(14.0));
            }
        });
    }

    fn render_thumbnails(&mut self, ui: &mut egui::Ui, actions: &mut Vec<PageAction>) {
        let selected = self.state.view.pages.selected_id();
        let pages = self.state.view.pages.pages().to_vec();

        egui::ScrollArea::horizontal().show(ui, |ui| {
            ui.horizontal(|ui| {
                for (index, page) in pages.iter().enumerate() {
                    let is_selected = selected == Some(page.id);
                    let frame = egui::Frame::none()
                        .stroke(egui::Stroke::new(
                            2.0,
                            if is_selected { Color32::from_rgb(246, 196, 69) } else { Color32::from_gray(50) },
                        ))
                        .rounding(egui::Rounding::same(6.0))
                        .inner_margin(egui::Margin::same(4.0));

                    let inner = frame.show(ui, |ui| {
                        ui.vertical(|ui| {
                            if let Some(texture) = self.previews.get(page.id) {
                                ui.add(egui::Image::new(texture).fit_to_exact_size(THUMB_SIZE));
                            } else {
                                self.request_texture(page.id, &page.image);
                                ui.allocate_ui_with_layout(
                                    THUMB_SIZE,
                                    egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                                    |ui| {
                                        ui.label("...");
                                    },
                                );
                            }
                            ui.label(RichText::new(format!("{}", index + 1)).size(12.0));
                        });
                    });

                    let response = inner.response.interact(egui::Sense::click());
                    if response.clicked() {
                        actions.push(PageAction::Select(page.id));
                    }
                }
            });
        });
    }

    fn render_caption_dialog(&mut self, ctx: &egui::Context, actions: &mut Vec<PageAction>) {
        let Some(draft) = self.state.view.draft.as_mut() else {
            return;
        };
        egui::Window::new("Edit Caption")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut draft.text)
                        .desired_rows(4)
                        .desired_width(360.0)
                        .hint_text("Add a caption for this page"),
                );
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        actions.push(PageAction::SaveCaption);
                    }
                    if ui.button("Cancel").clicked() {
                        actions.push(PageAction::CancelCaption);
                    }
                });
            });
    }

    fn render_toasts(&mut self, ctx: &egui::Context) {
        self.state.view.notices.prune();
        let notices = self.state.view.notices.all();
        if notices.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -140.0))
            .show(ctx, |ui| {
                for notice in notices.iter().take(4) {
                    let accent = match notice.level {
                        NoticeLevel::Info => Color32::from_rgb(110, 160, 240),
                        NoticeLevel::Success => Color32::from_rgb(90, 190, 120),
                        NoticeLevel::Error => Color32::from_rgb(230, 90, 90),
                    };
                    egui::Frame::popup(ui.style())
                        .stroke(egui::Stroke::new(1.0, accent))
                        .show(ui, |ui| {
                            ui.set_width(260.0);
                            ui.label(RichText::new(&notice.title).strong().color(accent));
                            ui.label(&notice.description);
                        });
                    ui.add_space(6.0);
                }
            });
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

/// 設定のキャプション用フォント（なければ和文システムフォント）を予備フォントに加える
pub fn configure_fonts(ctx: &egui::Context, font_path: Option<&Path>) {
    let Some((name, data)) = load_first_font(&font_candidates(font_path)) else {
        log::warn!("no caption font found; non-Latin captions may not render");
        return;
    };

    let mut fonts = FontDefinitions::default();
    fonts.font_data.insert(name.clone(), FontData::from_owned(data));
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        // 既定フォントで描けない文字だけ拾う
        fonts.families.entry(family).or_default().push(name.clone());
    }
    ctx.set_fonts(fonts);
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.importing || self.state.exporting || self.previews.has_inflight() {
            ctx.request_repaint();
        }
        self.poll_messages(ctx);

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_header(ui);
            ui.add_space(4.0);
        });

        if !self.state.view.pages.is_empty() {
            egui::TopBottomPanel::bottom("thumbnails")
                .resizable(false)
                .show(ctx, |ui| {
                    ui.add_space(4.0);
                    self.render_thumbnails(ui, &mut actions);
                    ui.add_space(4.0);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.view.pages.is_empty() {
                self.render_empty(ui);
            } else {
                self.render_preview(ui, &mut actions);
            }
        });

        self.render_caption_dialog(ctx, &mut actions);
        self.render_toasts(ctx);

        for action in actions {
            self.apply(action);
        }
    }
}
