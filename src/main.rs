use shop_order_management::adapter::driven::{
    ConsoleLogger, MySqlItemRepository, MySqlMemberRepository, MySqlOrderProjectionReader,
    MySqlOrderRepository,
};
use shop_order_management::adapter::driver::rest_api::{create_router, AppStateInner};
use shop_order_management::adapter::{DatabaseConfig, DatabaseMigration};
use shop_order_management::application::service::{
    ItemApplicationService, MemberApplicationService, OrderApplicationService, OrderQueryService,
};

use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== ショップ注文管理システム REST API ===");
    println!();

    // .envファイルから環境変数を読み込む
    dotenvy::dotenv().ok();

    // データベース設定を読み込む
    let config = DatabaseConfig::from_env()?;
    println!(
        "データベース設定を読み込みました: {}:{}",
        config.host, config.port
    );

    // 接続プールを作成
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_string())
        .await?;
    println!("データベース接続プールを作成しました");

    // マイグレーションを実行
    let migration = DatabaseMigration::new(pool.clone());
    migration.run().await?;
    println!("データベースマイグレーションを実行しました");

    // ロガーを作成
    let logger = Arc::new(ConsoleLogger::new());

    // アプリケーションサービスを作成
    let order_service = Arc::new(OrderApplicationService::new(
        MySqlOrderRepository::new(pool.clone()),
        MySqlMemberRepository::new(pool.clone()),
        MySqlItemRepository::new(pool.clone()),
        logger.clone(),
    ));
    let member_service = Arc::new(MemberApplicationService::new(
        MySqlMemberRepository::new(pool.clone()),
        logger.clone(),
    ));
    let item_service = Arc::new(ItemApplicationService::new(Arc::new(
        MySqlItemRepository::new(pool.clone()),
    )));
    let order_query_service = Arc::new(OrderQueryService::new(Arc::new(
        MySqlOrderProjectionReader::new(pool.clone()),
    )));

    // アプリケーション状態を構築
    let state = AppStateInner {
        order_service,
        member_service,
        item_service,
        order_query_service,
    };

    // ルーターを作成
    let app = create_router()
        .layer(CorsLayer::permissive())
        .with_state(state);

    // サーバーを起動
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    println!("サーバーを起動しました: http://0.0.0.0:3000");
    println!();
    println!("利用可能なエンドポイント:");
    println!("  GET  /health                    - ヘルスチェック");
    println!("  POST /members                   - 会員登録");
    println!("  GET  /members                   - 会員一覧取得");
    println!("  GET  /members/:member_id        - 会員詳細取得");
    println!("  PUT  /members/:member_id        - 会員名変更");
    println!("  POST /items                     - 書籍登録");
    println!("  GET  /items                     - 商品一覧取得");
    println!("  GET  /items/:item_id            - 商品詳細取得");
    println!("  POST /orders                    - 注文発注");
    println!("  POST /orders/:order_id/cancel   - 注文キャンセル");
    println!("  GET  /orders?strategy=...       - 注文一覧取得（join|batch|flat）");
    println!("  GET  /orders/:order_id          - 注文詳細取得");

    axum::serve(listener, app).await?;

    Ok(())
}
