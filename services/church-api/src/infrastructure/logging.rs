/// ログ基盤モジュール
///
/// Lambda環境とローカルサーバー向けの構造化ログ設定を提供する。
/// イベントのフィールドはJSONのトップレベルに展開する（CloudWatch Logs Insightsで検索するため）。
use std::sync::Once;

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// ログサブスクライバー初期化用の同期プリミティブ
static INIT: Once = Once::new();

/// フラットなJSON形式のfmtレイヤー
fn json_layer<S, W>(make_writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .flatten_event(true)
        .with_current_span(false)
        .with_writer(make_writer)
}

/// ログサブスクライバーを初期化する
///
/// 環境変数`RUST_LOG`（未設定ならinfo）でフィルタリングし、標準出力へ書き込む。
/// 複数回呼び出しても初期化は最初の1回のみ。
pub fn init_logging() {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        // 他で初期化済みの場合は何もしない
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer(std::io::stdout))
            .try_init();
    });
}

#[cfg(test)]
#[derive(Clone, Default)]
struct CapturedWriter(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl std::io::Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// クロージャ実行中に出力されたログを本番と同じJSON形式で取得する（テスト用）
///
/// 1行を1つのJSONオブジェクトとして返す。
#[cfg(test)]
pub(crate) fn capture_logs<F: FnOnce()>(f: F) -> Vec<serde_json::Value> {
    let writer = CapturedWriter::default();
    let buffer = writer.0.clone();

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new("debug"))
        .with(json_layer(move || writer.clone()));
    tracing::subscriber::with_default(subscriber, f);

    let output = buffer.lock().unwrap();
    String::from_utf8_lossy(&output)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_idempotent() {
        init_logging();
        init_logging();
    }

    /// フィールドは`fields`にネストせずトップレベルに出る
    #[test]
    fn test_json_fields_are_flattened() {
        let logs = capture_logs(|| {
            tracing::warn!(partition_key = "events", row_key = "r1", "スキップ");
        });

        assert_eq!(logs.len(), 1);
        let line = &logs[0];
        assert_eq!(line["level"], "WARN");
        assert_eq!(line["message"], "スキップ");
        assert_eq!(line["partition_key"], "events");
        assert_eq!(line["row_key"], "r1");
        assert!(line.get("fields").is_none());
        assert!(line["target"].as_str().unwrap().starts_with("church_api"));
        assert!(line["filename"].as_str().unwrap().ends_with("logging.rs"));
        assert!(line["line_number"].is_number());
    }

    /// スパン情報は出力しない
    #[test]
    fn test_current_span_is_omitted() {
        let logs = capture_logs(|| {
            let span = tracing::info_span!("request", path = "/events");
            let _guard = span.enter();
            tracing::info!(count = 3, "イベント一覧を返却");
        });

        let line = logs
            .iter()
            .find(|line| line["message"] == "イベント一覧を返却")
            .unwrap();
        assert_eq!(line["count"], 3);
        assert!(line.get("span").is_none());
    }
}
