use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfusionError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF生成エラー: {0}")]
    PdfGeneration(String),

    #[error("ページがありません。少なくとも1ページ追加してください")]
    EmptyDocument,

    #[error("共有に失敗しました: {0}")]
    ShareFailed(String),

    #[error("引数が不正です: {0}")]
    InvalidArgument(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] pdfusion_common::Error),
}

impl From<dialoguer::Error> for PdfusionError {
    fn from(err: dialoguer::Error) -> Self {
        PdfusionError::Prompt(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PdfusionError>;
