//! 出力先への受け渡し（保存・共有）

use crate::error::{PdfusionError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// 共有時に渡すタイトル
pub const SHARE_TITLE: &str = "PDF Document from PDFusion";

/// 共有するファイル
pub struct ShareRequest<'a> {
    pub title: &'a str,
    pub file_name: &'a str,
    pub bytes: &'a [u8],
}

/// プラットフォームの共有機能
pub trait ShareTarget: Send + Sync {
    /// ファイル共有に対応しているか（共有前に確認する）
    fn can_share_files(&self) -> bool;

    fn share(&self, request: &ShareRequest<'_>) -> Result<()>;
}

/// 共有機能なし
#[derive(Debug, Default, Clone, Copy)]
pub struct Unsupported;

impl ShareTarget for Unsupported {
    fn can_share_files(&self) -> bool {
        false
    }

    fn share(&self, _request: &ShareRequest<'_>) -> Result<()> {
        Err(PdfusionError::ShareFailed("共有機能がありません".into()))
    }
}

/// 外部コマンドで共有する
///
/// PDFを一時ディレクトリに書き出してからコマンドを実行する。
/// 引数中の `{file}` と `{title}` を置換する。
#[derive(Debug, Clone)]
pub struct CommandShare {
    argv: Vec<String>,
    staging_dir: PathBuf,
}

impl CommandShare {
    pub fn new(argv: Vec<String>) -> Self {
        let staging_dir = std::env::temp_dir().join(format!("pdfusion-share-{}", std::process::id()));
        Self { argv, staging_dir }
    }

    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    fn expand_args(&self, file: &Path, title: &str) -> Vec<String> {
        let file = file.to_string_lossy();
        self.argv
            .iter()
            .map(|arg| arg.replace("{file}", &file).replace("{title}", title))
            .collect()
    }
}

impl ShareTarget for CommandShare {
    fn can_share_files(&self) -> bool {
        !self.argv.is_empty()
    }

    fn share(&self, request: &ShareRequest<'_>) -> Result<()> {
        std::fs::create_dir_all(&self.staging_dir)?;
        let file = self.staging_dir.join(request.file_name);
        std::fs::write(&file, request.bytes)?;

        let args = self.expand_args(&file, request.title);
        let (program, rest) = args
            .split_first()
            .ok_or_else(|| PdfusionError::ShareFailed("共有コマンドが空です".into()))?;

        log::info!("sharing {} via {}", file.display(), program);
        let status = Command::new(program)
            .args(rest)
            .status()
            .map_err(|e| PdfusionError::ShareFailed(format!("{}: {}", program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(PdfusionError::ShareFailed(format!("{} が終了コード {:?} で終了しました", program, status.code())))
        }
    }
}

/// ブラウザのダウンロードと同じ要領で重複しないパスを決める
///
/// `name.pdf` → `name (1).pdf` → `name (2).pdf` ...
pub fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let extension = path.extension().and_then(|s| s.to_str());

    (1..)
        .map(|n| match extension {
            Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
            None => dir.join(format!("{} ({})", stem, n)),
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// 保存先ディレクトリに書き出す
pub fn save_to_dir(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = unique_path(dir, file_name);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_unique_path_adds_suffix() {
        let dir = tempdir().unwrap();
        let name = "PDFusion_document.pdf";
        assert_eq!(unique_path(dir.path(), name), dir.path().join(name));

        std::fs::write(dir.path().join(name), b"x").unwrap();
        assert_eq!(unique_path(dir.path(), name), dir.path().join("PDFusion_document (1).pdf"));

        std::fs::write(dir.path().join("PDFusion_document (1).pdf"), b"x").unwrap();
        assert_eq!(unique_path(dir.path(), name), dir.path().join("PDFusion_document (2).pdf"));
    }

    #[test]
    fn test_save_to_dir_never_overwrites() {
        let dir = tempdir().unwrap();
        let first = save_to_dir(dir.path(), "doc.pdf", b"one").unwrap();
        let second = save_to_dir(dir.path(), "doc.pdf", b"two").unwrap();
        assert_ne!(first, second);
        assert_eq!(std::fs::read(&first).unwrap(), b"one");
        assert_eq!(std::fs::read(&second).unwrap(), b"two");
    }

    #[test]
    fn test_unsupported_cannot_share() {
        assert!(!Unsupported.can_share_files());
    }

    #[test]
    fn test_command_share_expands_placeholders() {
        let share = CommandShare::new(vec!["send".into(), "--subject={title}".into(), "{file}".into()]);
        let args = share.expand_args(Path::new("/tmp/a.pdf"), SHARE_TITLE);
        assert_eq!(args, vec!["send", "--subject=PDF Document from PDFusion", "/tmp/a.pdf"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_share_runs_program() {
        let dir = tempdir().unwrap();
        let copy_target = dir.path().join("shared.pdf");
        let share = CommandShare::new(vec![
            "cp".into(),
            "{file}".into(),
            copy_target.to_string_lossy().to_string(),
        ])
        .with_staging_dir(dir.path().join("staging"));

        share
            .share(&ShareRequest {
                title: SHARE_TITLE,
                file_name: "PDFusion_document.pdf",
                bytes: b"%PDF-1.3",
            })
            .unwrap();
        assert_eq!(std::fs::read(&copy_target).unwrap(), b"%PDF-1.3");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_share_reports_failure() {
        let dir = tempdir().unwrap();
        let share = CommandShare::new(vec!["false".into(), "{file}".into()]).with_staging_dir(dir.path());
        let err = share
            .share(&ShareRequest {
                title: SHARE_TITLE,
                file_name: "x.pdf",
                bytes: b"",
            })
            .unwrap_err();
        assert!(matches!(err, PdfusionError::ShareFailed(_)));
    }
}
