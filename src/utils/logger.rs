use crate::config::OutputFormat;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 依輸出格式與 verbose 決定預設過濾條件；`RUST_LOG` 有設定時優先
fn default_directive(format: OutputFormat, verbose: bool) -> &'static str {
    match (format, verbose) {
        (_, true) => "gpa_calc=debug,info",
        (OutputFormat::Text, false) => "gpa_calc=info",
        // JSON 報告給程式讀取，只留警告以上
        (OutputFormat::Json, false) => "gpa_calc=warn",
    }
}

/// 日誌一律寫到 stderr，stdout 只放報告。
///
/// 文字報告配 compact 日誌，JSON 報告配 JSON 日誌。
pub fn init_logger(format: OutputFormat, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(format, verbose)));
    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        OutputFormat::Text => registry.with(layer.compact()).init(),
        OutputFormat::Json => registry.with(layer.json()).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_follows_format() {
        assert_eq!(default_directive(OutputFormat::Text, false), "gpa_calc=info");
        assert_eq!(default_directive(OutputFormat::Json, false), "gpa_calc=warn");
        assert_eq!(default_directive(OutputFormat::Json, true), "gpa_calc=debug,info");
    }
}
