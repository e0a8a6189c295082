//! PDFusion Common Library
//!
//! CLIとデスクトップで共有される型とユーティリティ

pub mod types;
pub mod layout;
pub mod collection;
pub mod editor;
pub mod notice;
pub mod error;
pub mod export;

pub use types::{Page, PageId, PageImage};
pub use layout::PdfLayout;
pub use collection::{Direction, PageCollection};
pub use editor::{CaptionDraft, ImportFailure, ViewState};
pub use notice::{Notice, NoticeBoard, NoticeLevel};
pub use error::{Error, Result};
