//! ローカル開発用HTTPサーバー
//!
//! Lambdaと同じルーターをaxum::serveで起動する。
//! DynamoDB Local等に接続する場合は`TABLE_STORE_CONNECTION_STRING`で
//! エンドポイントを指定する。

use std::net::SocketAddr;
use std::sync::Arc;

use church_api::application::{create_router, AppState};
use church_api::infrastructure::{init_logging, DynamoTableRepository, TableStoreConfig};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};

/// コマンドライン引数
#[derive(Parser, Debug)]
#[command(name = "local_server")]
#[command(about = "教会APIをローカルで起動")]
struct CliArgs {
    /// バインドするアドレス
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// リッスンするポート
    #[arg(long, short = 'p', env = "PORT", default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_logging();

    let args = CliArgs::parse();

    let config = TableStoreConfig::from_env().await.map_err(|e| {
        error!(error = %e, "テーブルストア設定の読み込みに失敗");
        e
    })?;

    let repository =
        DynamoTableRepository::new(config.client().clone(), config.table_name().to_string());
    let app = create_router(AppState::new(Arc::new(repository)));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!(%addr, table_name = %config.table_name(), "リッスン開始");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // シグナル受信後は処理中のリクエストの完了を待って終了
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("サーバーが正常に停止しました");
    Ok(())
}

/// SIGINT / SIGTERM を待機
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Ctrl+C シグナルハンドラーの登録に失敗");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "SIGTERM シグナルハンドラーの登録に失敗");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Ctrl+C (SIGINT) を受信しました。graceful shutdownを開始します");
        }
        _ = terminate => {
            info!("SIGTERM を受信しました。graceful shutdownを開始します");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // 注: Rust 2024エディションでset_var/remove_varはunsafe
    unsafe fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) };
    }

    unsafe fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) };
    }

    #[test]
    #[serial(port_env)]
    fn test_default_args() {
        unsafe { remove_env("PORT") };

        let args = CliArgs::try_parse_from(["local_server"]).unwrap();
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.port, 8080);
    }

    #[test]
    #[serial(port_env)]
    fn test_port_from_env() {
        unsafe { set_env("PORT", "9090") };

        let args = CliArgs::try_parse_from(["local_server"]).unwrap();
        assert_eq!(args.port, 9090);

        // 引数が環境変数より優先される
        let args = CliArgs::try_parse_from(["local_server", "--port", "3000"]).unwrap();
        assert_eq!(args.port, 3000);

        unsafe { remove_env("PORT") };
    }

    #[test]
    #[serial(port_env)]
    fn test_explicit_args() {
        let args =
            CliArgs::try_parse_from(["local_server", "--host", "0.0.0.0", "--port", "3000"])
                .unwrap();
        assert_eq!(args.host, "0.0.0.0");
        assert_eq!(args.port, 3000);
    }
}
