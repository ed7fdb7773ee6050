// アプリケーションサービス
// 書き込みパス（ライフサイクル操作）と読み取りパス（プロジェクション）を提供する

mod item_service;
mod member_service;
mod order_query_service;
mod order_service;

pub use item_service::ItemApplicationService;
pub use member_service::MemberApplicationService;
pub use order_query_service::OrderQueryService;
pub use order_service::OrderApplicationService;
