use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfusion::{cli, config, error, export, import, logging, scanner, session};
use cli::{Cli, Commands, OutputMode};
use config::Config;
use error::{PdfusionError, Result};
use export::{ExportSettings, Exporter};
use pdfusion_common::{NoticeLevel, ViewState};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Build { inputs, output, captions, share, quality, file_name } => {
            println!("📄 PDFusion - PDF生成\n");

            // 1. 入力収集
            println!("[1/3] 画像を収集中...");
            let files = scanner::collect_inputs(&inputs)?;
            println!("✔ {}件の画像を検出\n", files.len());

            // 2. 取り込み
            println!("[2/3] 画像を読み込み中...");
            let bar = ProgressBar::new(files.len() as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{bar:40} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            let report = import::import_files_with_progress(&files, || bar.inc(1)).await;
            bar.finish_and_clear();

            let mut state = ViewState::new();
            let added = report.apply_to(&mut state);
            for notice in state.notices.drain().iter().rev() {
                println!("✖ {}", notice);
            }
            println!("✔ {}ページを追加\n", added);

            for caption in &captions {
                let page = state
                    .pages
                    .pages()
                    .get(caption.page - 1)
                    .map(|p| p.id)
                    .ok_or_else(|| {
                        PdfusionError::InvalidArgument(format!(
                            "ページ{}はありません（全{}ページ）",
                            caption.page,
                            state.pages.len()
                        ))
                    })?;
                state.pages.set_text(page, caption.text.clone())?;
            }

            // 3. 出力
            println!("[3/3] PDFを生成中...");
            let mut settings = ExportSettings::from_config(&config);
            if let Some(dir) = output {
                settings.output_dir = dir;
            }
            if let Some(name) = file_name {
                settings.file_name = name;
            }
            if let Some(quality) = quality {
                settings.quality = quality;
            }
            let exporter = Exporter::new(settings, export::share_target_from_config(&config));
            let mode = if share { OutputMode::Share } else { OutputMode::Save };

            let result = exporter.export(state.pages.pages(), mode).await;
            let notices = export::report(&result);
            for notice in &notices {
                let icon = if notice.level == NoticeLevel::Error { "✖" } else { "✔" };
                println!("{} {}", icon, notice);
            }
            let outcome = result?;
            if let Some(path) = outcome.saved_path() {
                println!("✔ PDF出力: {}", path.display());
            }

            println!("\n✅ {}ページのPDFを出力しました", outcome.page_count);
        }

        Commands::Edit { inputs } => {
            session::run_interactive_editor(&inputs, &config).await?;
        }

        Commands::Config { show, set_output_dir, set_share_command, set_font, set_quality, reset } => {
            let mut config = if reset { Config::default() } else { config };
            let changed = reset
                || set_output_dir.is_some()
                || set_share_command.is_some()
                || set_font.is_some()
                || set_quality.is_some();

            if let Some(dir) = set_output_dir {
                config.output_dir = Some(dir);
            }
            if let Some(command) = set_share_command {
                config.set_share_command(&command)?;
            }
            if let Some(font) = set_font {
                if !font.exists() {
                    return Err(PdfusionError::FileNotFound(font.display().to_string()));
                }
                config.font_path = Some(font);
            }
            if let Some(quality) = set_quality {
                config.pdf_quality = quality;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  保存先: {}", config.resolve_output_dir().display());
                println!("  ファイル名: {}", config.file_name);
                println!("  画像品質: {}", config.pdf_quality);
                println!(
                    "  共有コマンド: {}",
                    config.share_command.as_ref().map(|c| c.join(" ")).unwrap_or_else(|| "未設定（保存にフォールバック）".into())
                );
                println!(
                    "  フォント: {}",
                    config.font_path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "Helvetica（組み込み）".into())
                );
            }
        }
    }

    Ok(())
}
