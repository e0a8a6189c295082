//! ログ初期化

use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

/// 端末（stderr）へのログ出力を初期化する
///
/// 通常は警告以上、`--verbose` 指定時はデバッグまで出す。
pub fn init(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    let config = ConfigBuilder::new()
        .add_filter_allow_str("pdfusion")
        .set_time_level(LevelFilter::Off)
        .build();

    // 二重初期化は無視
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}
