use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use uuid::Uuid;

use crate::adapter::driven::{
    MySqlItemRepository, MySqlMemberRepository, MySqlOrderRepository,
};
use crate::adapter::driver::request_dto::{
    CreateItemRequest, CreateMemberRequest, OrdersQueryParams, PlaceOrderRequest,
    UpdateMemberRequest,
};
use crate::adapter::driver::response_dto::{ItemResponse, MemberResponse};
use crate::application::projection::{OrderProjection, ProjectionStrategy};
use crate::application::service::{
    ItemApplicationService, MemberApplicationService, OrderApplicationService, OrderQueryService,
};
use crate::application::ApplicationError;
use crate::domain::model::{Address, ItemId, MemberId, OrderId};

// REST API用のレスポンスDTO
#[derive(Serialize, Deserialize)]
pub struct CreateMemberResponse {
    pub member_id: Uuid,
}

#[derive(Serialize, Deserialize)]
pub struct CreateItemResponse {
    pub item_id: Uuid,
}

#[derive(Serialize, Deserialize)]
pub struct PlaceOrderResponse {
    pub order_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

// アプリケーションサービスを含む状態
pub type AppState = AppStateInner;

#[derive(Clone)]
pub struct AppStateInner {
    pub order_service: Arc<
        OrderApplicationService<MySqlOrderRepository, MySqlMemberRepository, MySqlItemRepository>,
    >,
    pub member_service: Arc<MemberApplicationService<MySqlMemberRepository>>,
    pub item_service: Arc<ItemApplicationService>,
    pub order_query_service: Arc<OrderQueryService>,
}

// REST APIルーターを作成
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/members", post(create_member))
        .route("/members", get(get_members))
        .route("/members/:member_id", get(get_member_by_id))
        .route("/members/:member_id", put(update_member))
        .route("/items", post(create_item))
        .route("/items", get(get_items))
        .route("/items/:item_id", get(get_item_by_id))
        .route("/orders", post(place_order))
        .route("/orders/:order_id/cancel", post(cancel_order))
        .route("/orders", get(get_orders))
        .route("/orders/:order_id", get(get_order_by_id))
}

// ヘルスチェックエンドポイント
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "shop-order-management",
        "version": "0.1.0"
    }))
}

// 会員登録エンドポイント
async fn create_member(
    State(state): State<AppState>,
    Json(request): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<CreateMemberResponse>), (StatusCode, Json<ApiError>)> {
    let address = match Address::new(request.city, request.street, request.zipcode) {
        Ok(addr) => addr,
        Err(err) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiError {
                    error: format!("{}", err),
                    code: "INVALID_ADDRESS".to_string(),
                }),
            ))
        }
    };

    match state.member_service.join(request.name, address).await {
        Ok(member_id) => Ok((
            StatusCode::CREATED,
            Json(CreateMemberResponse {
                member_id: member_id.as_uuid(),
            }),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 会員一覧取得エンドポイント
async fn get_members(
    State(state): State<AppState>,
) -> Result<Json<Vec<MemberResponse>>, (StatusCode, Json<ApiError>)> {
    match state.member_service.get_all_members().await {
        Ok(members) => {
            let response: Vec<MemberResponse> =
                members.iter().map(MemberResponse::from_member).collect();
            Ok(Json(response))
        }
        Err(err) => Err(map_application_error(err)),
    }
}

// 会員詳細取得エンドポイント
async fn get_member_by_id(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<MemberResponse>, (StatusCode, Json<ApiError>)> {
    let member_id = MemberId::from_uuid(member_id);

    match state.member_service.get_member_by_id(member_id).await {
        Ok(Some(member)) => Ok(Json(MemberResponse::from_member(&member))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: "指定された会員が見つかりません".to_string(),
                code: "MEMBER_NOT_FOUND".to_string(),
            }),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 会員名変更エンドポイント
async fn update_member(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
    Json(request): Json<UpdateMemberRequest>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let member_id = MemberId::from_uuid(member_id);

    match state
        .member_service
        .update_member_name(member_id, request.name)
        .await
    {
        Ok(()) => Ok(StatusCode::OK),
        Err(err) => Err(map_application_error(err)),
    }
}

// 書籍登録エンドポイント
async fn create_item(
    State(state): State<AppState>,
    Json(request): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<CreateItemResponse>), (StatusCode, Json<ApiError>)> {
    match state
        .item_service
        .create_book(
            request.name,
            request.price,
            request.stock_quantity,
            request.author,
            request.isbn,
        )
        .await
    {
        Ok(item_id) => Ok((
            StatusCode::CREATED,
            Json(CreateItemResponse {
                item_id: item_id.as_uuid(),
            }),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 商品一覧取得エンドポイント
async fn get_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<ItemResponse>>, (StatusCode, Json<ApiError>)> {
    match state.item_service.get_all_items().await {
        Ok(items) => {
            let response: Vec<ItemResponse> = items.iter().map(ItemResponse::from_item).collect();
            Ok(Json(response))
        }
        Err(err) => Err(map_application_error(err)),
    }
}

// 商品詳細取得エンドポイント
async fn get_item_by_id(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ItemResponse>, (StatusCode, Json<ApiError>)> {
    let item_id = ItemId::from_uuid(item_id);

    match state.item_service.get_item_by_id(item_id).await {
        Ok(Some(item)) => Ok(Json(ItemResponse::from_item(&item))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: "指定された商品が見つかりません".to_string(),
                code: "ITEM_NOT_FOUND".to_string(),
            }),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 注文発注エンドポイント
async fn place_order(
    State(state): State<AppState>,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>), (StatusCode, Json<ApiError>)> {
    let member_id = MemberId::from_uuid(request.member_id);
    let item_id = ItemId::from_uuid(request.item_id);

    match state
        .order_service
        .place_order(member_id, item_id, request.count)
        .await
    {
        Ok(order_id) => Ok((
            StatusCode::CREATED,
            Json(PlaceOrderResponse {
                order_id: order_id.as_uuid(),
            }),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 注文キャンセルエンドポイント
async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let order_id = OrderId::from_uuid(order_id);

    match state.order_service.cancel_order(order_id).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(err) => Err(map_application_error(err)),
    }
}

// 注文一覧取得エンドポイント
// strategyクエリパラメータでプロジェクションのクエリ形を選択できる
async fn get_orders(
    State(state): State<AppState>,
    query: Result<Query<OrdersQueryParams>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<Vec<OrderProjection>>, (StatusCode, Json<ApiError>)> {
    let Query(params) = query.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "無効なクエリパラメータです".to_string(),
                code: "INVALID_PARAMETER".to_string(),
            }),
        )
    })?;

    let strategy = resolve_strategy(params.strategy)?;

    match state.order_query_service.get_orders(strategy).await {
        Ok(orders) => Ok(Json(orders)),
        Err(err) => Err(map_application_error(err)),
    }
}

// strategyクエリパラメータを解決する
// 指定がない場合はバッチ戦略を使用する
fn resolve_strategy(
    param: Option<String>,
) -> Result<ProjectionStrategy, (StatusCode, Json<ApiError>)> {
    match param {
        Some(strategy_str) => match ProjectionStrategy::from_string(&strategy_str) {
            Ok(strategy) => Ok(strategy),
            Err(_) => Err((
                StatusCode::BAD_REQUEST,
                Json(ApiError {
                    error: format!("無効な戦略値: {}", strategy_str),
                    code: "INVALID_STRATEGY".to_string(),
                }),
            )),
        },
        None => Ok(ProjectionStrategy::Batch),
    }
}

// 注文詳細取得エンドポイント
async fn get_order_by_id(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderProjection>, (StatusCode, Json<ApiError>)> {
    let order_id = OrderId::from_uuid(order_id);

    match state.order_query_service.get_order_by_id(order_id).await {
        Ok(Some(order)) => Ok(Json(order)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: "指定された注文が見つかりません".to_string(),
                code: "ORDER_NOT_FOUND".to_string(),
            }),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// アプリケーションエラーをHTTPエラーにマッピング
fn map_application_error(err: ApplicationError) -> (StatusCode, Json<ApiError>) {
    match err {
        ApplicationError::DomainError(domain_err) => map_domain_error(domain_err),
        ApplicationError::RepositoryError(repo_err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError {
                error: format!("{}", repo_err),
                code: "REPOSITORY_ERROR".to_string(),
            }),
        ),
        ApplicationError::NotFound(msg) => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: msg,
                code: "NOT_FOUND".to_string(),
            }),
        ),
        ApplicationError::DuplicateMember(msg) => (
            StatusCode::CONFLICT,
            Json(ApiError {
                error: msg,
                code: "DUPLICATE_MEMBER".to_string(),
            }),
        ),
    }
}

// ドメインエラーを適切なHTTPステータスコードとエラーコードにマッピング
fn map_domain_error(
    domain_err: crate::domain::error::DomainError,
) -> (StatusCode, Json<ApiError>) {
    use crate::domain::error::DomainError;

    match domain_err {
        DomainError::OutOfStock {
            requested,
            available,
        } => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: format!(
                    "在庫不足です（要求数量: {}, 現在庫数: {}）",
                    requested, available
                ),
                code: "OUT_OF_STOCK".to_string(),
            }),
        ),
        DomainError::AlreadyDelivered => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "配送完了済みの注文はキャンセルできません".to_string(),
                code: "ALREADY_DELIVERED".to_string(),
            }),
        ),
        DomainError::InvalidOrderState(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: msg,
                code: "INVALID_ORDER_STATE".to_string(),
            }),
        ),
        DomainError::InvalidQuantity => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "無効な数量です".to_string(),
                code: "INVALID_QUANTITY".to_string(),
            }),
        ),
        DomainError::InvalidAddress(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: msg,
                code: "INVALID_ADDRESS".to_string(),
            }),
        ),
        DomainError::OrderValidation(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: msg,
                code: "ORDER_VALIDATION".to_string(),
            }),
        ),
        DomainError::InvalidValue(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: msg,
                code: "INVALID_VALUE".to_string(),
            }),
        ),
    }
}


#[cfg(test)]
mod error_handling_tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::domain::error::DomainError;

    #[test]
    fn test_map_application_error_not_found() {
        let app_error = ApplicationError::NotFound("リソースが見つかりません".to_string());
        let (status, Json(api_error)) = map_application_error(app_error);

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(api_error.code, "NOT_FOUND");
        assert_eq!(api_error.error, "リソースが見つかりません");
    }

    #[test]
    fn test_map_application_error_duplicate_member() {
        let app_error = ApplicationError::DuplicateMember("userA".to_string());
        let (status, Json(api_error)) = map_application_error(app_error);

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(api_error.code, "DUPLICATE_MEMBER");
    }

    #[test]
    fn test_map_domain_error_out_of_stock() {
        let app_error = ApplicationError::DomainError(DomainError::OutOfStock {
            requested: 13,
            available: 10,
        });
        let (status, Json(api_error)) = map_application_error(app_error);

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.code, "OUT_OF_STOCK");
        assert!(api_error.error.contains("13"));
        assert!(api_error.error.contains("10"));
    }

    #[test]
    fn test_map_domain_error_already_delivered() {
        let app_error = ApplicationError::DomainError(DomainError::AlreadyDelivered);
        let (status, Json(api_error)) = map_application_error(app_error);

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.code, "ALREADY_DELIVERED");
    }

    #[test]
    fn test_api_error_structure() {
        let api_error = ApiError {
            error: "テストエラー".to_string(),
            code: "TEST_ERROR".to_string(),
        };

        // JSON シリアライゼーションのテスト
        let json = serde_json::to_string(&api_error).unwrap();
        assert!(json.contains("テストエラー"));
        assert!(json.contains("TEST_ERROR"));

        // JSON デシリアライゼーションのテスト
        let deserialized: ApiError = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.error, "テストエラー");
        assert_eq!(deserialized.code, "TEST_ERROR");
    }
}
