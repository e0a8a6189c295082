//! エラー型定義

use crate::types::PageId;
use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Page not found: {0}")]
    PageNotFound(PageId),

    #[error("No page is selected")]
    NoSelection,
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_page_not_found() {
        let error = Error::PageNotFound(PageId(12));
        assert_eq!(error.to_string(), "Page not found: #12");
    }

    #[test]
    fn test_error_display_no_selection() {
        assert_eq!(Error::NoSelection.to_string(), "No page is selected");
    }

    #[test]
    fn test_error_debug() {
        let debug = format!("{:?}", Error::PageNotFound(PageId(3)));
        assert!(debug.contains("PageNotFound"));
    }
}
