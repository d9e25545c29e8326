/// テーブルストア接続設定
///
/// 接続文字列とテーブル名を環境変数から読み込み、DynamoDBクライアントを構築する。
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use thiserror::Error;

/// 接続文字列の環境変数名
pub const CONNECTION_STRING_ENV: &str = "TABLE_STORE_CONNECTION_STRING";

/// テーブル名の環境変数名
pub const TABLE_NAME_ENV: &str = "TABLE_NAME";

/// デフォルトのテーブル名
pub const DEFAULT_TABLE_NAME: &str = "events";

/// テーブルストア設定のエラー型
#[derive(Debug, Error, PartialEq)]
pub enum TableStoreConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid connection string segment: {0}")]
    InvalidConnectionString(String),
}

/// 接続文字列から読み取った設定
///
/// 形式: `Region=eu-north-1;Endpoint=http://localhost:8000`
/// キーは大文字小文字を区別しない。未知のキーは無視する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// AWSリージョン（未指定ならaws-configの既定の解決順）
    pub region: Option<String>,
    /// エンドポイントURL（DynamoDB Local等）
    pub endpoint: Option<String>,
}

impl ConnectionSettings {
    /// 接続文字列をパース
    ///
    /// 空のセグメントは読み飛ばす。`=`を含まないセグメントはエラー。
    pub fn parse(connection_string: &str) -> Result<Self, TableStoreConfigError> {
        let mut settings = Self::default();

        for segment in connection_string.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = segment.split_once('=').ok_or_else(|| {
                TableStoreConfigError::InvalidConnectionString(segment.to_string())
            })?;
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            match key.trim().to_ascii_lowercase().as_str() {
                "region" => settings.region = Some(value.to_string()),
                "endpoint" | "endpointurl" => settings.endpoint = Some(value.to_string()),
                _ => {}
            }
        }

        Ok(settings)
    }
}

/// 環境変数の値から接続設定とテーブル名を決定
///
/// 接続文字列が未設定（空白のみを含む）の場合は起動不可のエラー。
pub fn resolve_settings(
    connection_string: Option<String>,
    table_name: Option<String>,
) -> Result<(ConnectionSettings, String), TableStoreConfigError> {
    let connection_string = connection_string
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| TableStoreConfigError::MissingEnvVar(CONNECTION_STRING_ENV.to_string()))?;

    let settings = ConnectionSettings::parse(&connection_string)?;
    let table_name = table_name
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());

    Ok((settings, table_name))
}

/// テーブル名とクライアントを持つテーブルストア設定
#[derive(Debug, Clone)]
pub struct TableStoreConfig {
    /// DynamoDBクライアントインスタンス
    client: DynamoDbClient,
    /// テーブル名
    table_name: String,
}

impl TableStoreConfig {
    /// 環境変数から設定を読み込み、DynamoDBクライアントを作成
    ///
    /// 環境変数:
    /// - TABLE_STORE_CONNECTION_STRING: 接続文字列（必須）
    /// - TABLE_NAME: テーブル名（デフォルト: events）
    /// - AWS認証情報: aws-configにより自動読み込み
    pub async fn from_env() -> Result<Self, TableStoreConfigError> {
        let (settings, table_name) = resolve_settings(
            std::env::var(CONNECTION_STRING_ENV).ok(),
            std::env::var(TABLE_NAME_ENV).ok(),
        )?;

        let client = Self::build_client(&settings).await;
        Ok(Self { client, table_name })
    }

    /// 接続設定からDynamoDBクライアントを構築
    pub async fn build_client(settings: &ConnectionSettings) -> DynamoDbClient {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &settings.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let aws_config = loader.load().await;
        DynamoDbClient::new(&aws_config)
    }

    /// 明示的な値で作成（テスト用）
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    /// DynamoDBクライアントへの参照を取得
    pub fn client(&self) -> &DynamoDbClient {
        &self.client
    }

    /// テーブル名を取得
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}
