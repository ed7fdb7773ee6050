use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 会員登録用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct CreateMemberRequest {
    pub name: String,
    pub city: String,
    pub street: String,
    pub zipcode: String,
}

/// 会員名変更用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct UpdateMemberRequest {
    pub name: String,
}

/// 書籍登録用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub price: i64,
    pub stock_quantity: u32,
    pub author: String,
    pub isbn: String,
}

/// 注文発注用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub member_id: Uuid,
    pub item_id: Uuid,
    pub count: u32,
}

/// 注文一覧取得用のクエリパラメータ
#[derive(Deserialize)]
pub struct OrdersQueryParams {
    pub strategy: Option<String>,
}
