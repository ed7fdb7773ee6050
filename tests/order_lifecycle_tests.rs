use shop_order_management::application::projection::{
    AddressProjection, OrderItemProjection, OrderProjection, OrderProjectionReader,
    ProjectionStrategy,
};
use shop_order_management::application::service::{
    MemberApplicationService, OrderApplicationService, OrderQueryService,
};
use shop_order_management::application::ApplicationError;
use shop_order_management::domain::error::DomainError;
use shop_order_management::domain::model::{
    Address, Item, ItemId, Member, MemberId, Order, OrderId, OrderStatus,
};
use shop_order_management::domain::port::{
    ItemRepository, Logger, MemberRepository, OrderRepository, RepositoryError,
};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

// テスト用のロガー（何も出力しない）
struct NullLogger;

impl Logger for NullLogger {
    fn debug(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
    fn info(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
    fn warn(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
    fn error(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
}

// インメモリ会員リポジトリ
#[derive(Clone)]
struct InMemoryMemberRepository {
    members: Arc<Mutex<HashMap<MemberId, Member>>>,
}

impl InMemoryMemberRepository {
    fn new() -> Self {
        Self {
            members: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn save(&self, member: &Member) -> Result<(), RepositoryError> {
        let mut members = self.members.lock().await;

        // 会員名のユニーク制約（別IDの同名会員は保存できない）
        let collides = members
            .values()
            .any(|m| m.id() != member.id() && m.name() == member.name());
        if collides {
            return Err(RepositoryError::OperationFailed(format!(
                "会員名が重複しています: {}",
                member.name()
            )));
        }

        members.insert(member.id(), member.clone());
        Ok(())
    }

    async fn find_by_id(&self, member_id: MemberId) -> Result<Option<Member>, RepositoryError> {
        Ok(self.members.lock().await.get(&member_id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Member>, RepositoryError> {
        Ok(self
            .members
            .lock()
            .await
            .values()
            .filter(|m| m.name() == name)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Member>, RepositoryError> {
        Ok(self.members.lock().await.values().cloned().collect())
    }

    fn next_identity(&self) -> MemberId {
        MemberId::new()
    }
}

// インメモリ商品リポジトリ
// 注文リポジトリと商品ストアを共有し、ユニットオブワークの結果が見えるようにする
#[derive(Clone)]
struct InMemoryItemRepository {
    items: Arc<Mutex<HashMap<ItemId, Item>>>,
}

impl InMemoryItemRepository {
    fn new(items: Arc<Mutex<HashMap<ItemId, Item>>>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn save(&self, item: &Item) -> Result<(), RepositoryError> {
        self.items.lock().await.insert(item.id(), item.clone());
        Ok(())
    }

    async fn find_by_id(&self, item_id: ItemId) -> Result<Option<Item>, RepositoryError> {
        Ok(self.items.lock().await.get(&item_id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Item>, RepositoryError> {
        Ok(self.items.lock().await.values().cloned().collect())
    }

    fn next_identity(&self) -> ItemId {
        ItemId::new()
    }
}

// インメモリ注文リポジトリ
// save は注文と在庫変更を1つのユニットオブワークとしてコミットする
#[derive(Clone)]
struct InMemoryOrderRepository {
    orders: Arc<Mutex<HashMap<OrderId, Order>>>,
    items: Arc<Mutex<HashMap<ItemId, Item>>>,
}

impl InMemoryOrderRepository {
    fn new(items: Arc<Mutex<HashMap<ItemId, Item>>>) -> Self {
        Self {
            orders: Arc::new(Mutex::new(HashMap::new())),
            items,
        }
    }

    async fn order_count(&self) -> usize {
        self.orders.lock().await.len()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: &Order, touched_items: &[Item]) -> Result<(), RepositoryError> {
        self.orders.lock().await.insert(order.id(), order.clone());

        let mut items = self.items.lock().await;
        for item in touched_items {
            items.insert(item.id(), item.clone());
        }

        Ok(())
    }

    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.orders.lock().await.get(&order_id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(self.orders.lock().await.values().cloned().collect())
    }

    fn next_identity(&self) -> OrderId {
        OrderId::new()
    }
}

// インメモリ注文プロジェクションリーダー
// どの戦略でも同じストアから同じ形状のDTOを構築する
struct InMemoryOrderProjectionReader {
    orders: Arc<Mutex<HashMap<OrderId, Order>>>,
    members: Arc<Mutex<HashMap<MemberId, Member>>>,
    items: Arc<Mutex<HashMap<ItemId, Item>>>,
}

impl InMemoryOrderProjectionReader {
    fn new(
        orders: Arc<Mutex<HashMap<OrderId, Order>>>,
        members: Arc<Mutex<HashMap<MemberId, Member>>>,
        items: Arc<Mutex<HashMap<ItemId, Item>>>,
    ) -> Self {
        Self {
            orders,
            members,
            items,
        }
    }

    async fn build_projection(&self, order: &Order) -> Result<OrderProjection, RepositoryError> {
        let members = self.members.lock().await;
        let member = members.get(&order.member_id()).ok_or_else(|| {
            RepositoryError::FetchFailed("会員が見つかりません".to_string())
        })?;

        let items = self.items.lock().await;
        let mut order_items = Vec::new();
        for order_item in order.order_items() {
            let item = items.get(&order_item.item_id()).ok_or_else(|| {
                RepositoryError::FetchFailed("商品が見つかりません".to_string())
            })?;
            order_items.push(OrderItemProjection {
                item_name: item.name().to_string(),
                order_price: order_item.order_price(),
                count: order_item.count(),
            });
        }

        let address = order.delivery().address();
        Ok(OrderProjection {
            order_id: order.id().as_uuid(),
            member_name: member.name().to_string(),
            order_date: order.order_date(),
            status: order.status().to_string(),
            address: AddressProjection {
                city: address.city().to_string(),
                street: address.street().to_string(),
                zipcode: address.zipcode().to_string(),
            },
            order_items,
        })
    }

    async fn build_all(&self) -> Result<Vec<OrderProjection>, RepositoryError> {
        let orders: Vec<Order> = self.orders.lock().await.values().cloned().collect();
        let mut projections = Vec::new();
        for order in &orders {
            projections.push(self.build_projection(order).await?);
        }
        // 注文日時の降順で並べる
        projections.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(projections)
    }
}

#[async_trait]
impl OrderProjectionReader for InMemoryOrderProjectionReader {
    async fn find_order_by_id(
        &self,
        order_id: OrderId,
    ) -> Result<Option<OrderProjection>, RepositoryError> {
        let order = self.orders.lock().await.get(&order_id).cloned();
        match order {
            Some(order) => Ok(Some(self.build_projection(&order).await?)),
            None => Ok(None),
        }
    }

    async fn find_orders_with_join(&self) -> Result<Vec<OrderProjection>, RepositoryError> {
        self.build_all().await
    }

    async fn find_orders_with_batch(&self) -> Result<Vec<OrderProjection>, RepositoryError> {
        self.build_all().await
    }

    async fn find_orders_with_flat_join(&self) -> Result<Vec<OrderProjection>, RepositoryError> {
        self.build_all().await
    }
}

// テスト用のフィクスチャ一式
struct TestFixture {
    order_service: OrderApplicationService<
        InMemoryOrderRepository,
        InMemoryMemberRepository,
        InMemoryItemRepository,
    >,
    member_service: MemberApplicationService<InMemoryMemberRepository>,
    order_repository: InMemoryOrderRepository,
    member_repository: InMemoryMemberRepository,
    item_repository: InMemoryItemRepository,
}

fn build_fixture() -> TestFixture {
    let logger: Arc<dyn Logger> = Arc::new(NullLogger);
    let item_store = Arc::new(Mutex::new(HashMap::new()));

    let order_repository = InMemoryOrderRepository::new(item_store.clone());
    let member_repository = InMemoryMemberRepository::new();
    let item_repository = InMemoryItemRepository::new(item_store);

    let order_service = OrderApplicationService::new(
        order_repository.clone(),
        member_repository.clone(),
        item_repository.clone(),
        logger.clone(),
    );
    let member_service = MemberApplicationService::new(member_repository.clone(), logger);

    TestFixture {
        order_service,
        member_service,
        order_repository,
        member_repository,
        item_repository,
    }
}

fn test_address() -> Address {
    Address::new(
        "seoul".to_string(),
        "뱅뱅사거리 35-10".to_string(),
        "123-123".to_string(),
    )
    .unwrap()
}

async fn register_member(fixture: &TestFixture, name: &str) -> MemberId {
    fixture
        .member_service
        .join(name.to_string(), test_address())
        .await
        .unwrap()
}

async fn register_book(fixture: &TestFixture, name: &str, price: i64, stock: u32) -> ItemId {
    let item = Item::book(
        ItemId::new(),
        name.to_string(),
        price,
        stock,
        "김영한".to_string(),
        "1234".to_string(),
    )
    .unwrap();
    fixture.item_repository.save(&item).await.unwrap();
    item.id()
}

#[tokio::test]
async fn test_place_order_creates_order_and_decrements_stock() {
    let fixture = build_fixture();
    let member_id = register_member(&fixture, "userA").await;
    let item_id = register_book(&fixture, "OLD JPA", 35000, 10).await;

    let order_id = fixture
        .order_service
        .place_order(member_id, item_id, 3)
        .await
        .unwrap();

    let order = fixture
        .order_repository
        .find_by_id(order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status(), OrderStatus::Order);
    assert_eq!(order.order_items().len(), 1);
    assert_eq!(order.total_price(), 105000);

    // 配送先は注文時点の会員住所
    assert_eq!(order.delivery().address().city(), "seoul");

    // 在庫が減少している
    let item = fixture
        .item_repository
        .find_by_id(item_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.stock_quantity(), 7);

    // 会員に注文の参照が付与されている
    let member = fixture
        .member_repository
        .find_by_id(member_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(member.orders(), &[order_id]);
}

#[tokio::test]
async fn test_place_order_out_of_stock_persists_nothing() {
    let fixture = build_fixture();
    let member_id = register_member(&fixture, "userA").await;
    let item_id = register_book(&fixture, "OLD JPA", 35000, 10).await;

    let result = fixture.order_service.place_order(member_id, item_id, 13).await;

    match result {
        Err(ApplicationError::DomainError(DomainError::OutOfStock {
            requested,
            available,
        })) => {
            assert_eq!(requested, 13);
            assert_eq!(available, 10);
        }
        other => panic!("在庫不足エラーを期待しましたが: {:?}", other.err()),
    }

    // 注文も在庫減少も永続化されていない
    assert_eq!(fixture.order_repository.order_count().await, 0);
    let item = fixture
        .item_repository
        .find_by_id(item_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.stock_quantity(), 10);
}

#[tokio::test]
async fn test_place_order_with_unknown_member_fails() {
    let fixture = build_fixture();
    let item_id = register_book(&fixture, "OLD JPA", 35000, 10).await;

    let result = fixture
        .order_service
        .place_order(MemberId::new(), item_id, 1)
        .await;

    assert!(matches!(result, Err(ApplicationError::NotFound(_))));
}

#[tokio::test]
async fn test_cancel_order_restores_stock() {
    let fixture = build_fixture();
    let member_id = register_member(&fixture, "userA").await;
    let item_id = register_book(&fixture, "OLD JPA", 35000, 10).await;

    let order_id = fixture
        .order_service
        .place_order(member_id, item_id, 3)
        .await
        .unwrap();

    fixture.order_service.cancel_order(order_id).await.unwrap();

    let order = fixture
        .order_repository
        .find_by_id(order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status(), OrderStatus::Cancel);

    // 在庫が元に戻っている
    let item = fixture
        .item_repository
        .find_by_id(item_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.stock_quantity(), 10);
}

#[tokio::test]
async fn test_cancel_order_twice_fails_without_double_restore() {
    let fixture = build_fixture();
    let member_id = register_member(&fixture, "userA").await;
    let item_id = register_book(&fixture, "OLD JPA", 35000, 10).await;

    let order_id = fixture
        .order_service
        .place_order(member_id, item_id, 3)
        .await
        .unwrap();

    fixture.order_service.cancel_order(order_id).await.unwrap();
    let second = fixture.order_service.cancel_order(order_id).await;

    assert!(matches!(
        second,
        Err(ApplicationError::DomainError(DomainError::InvalidOrderState(_)))
    ));

    // 在庫が二重に戻っていない
    let item = fixture
        .item_repository
        .find_by_id(item_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.stock_quantity(), 10);
}

#[tokio::test]
async fn test_cancel_delivered_order_fails_and_changes_nothing() {
    let fixture = build_fixture();
    let member_id = register_member(&fixture, "userA").await;
    let item_id = register_book(&fixture, "OLD JPA", 35000, 10).await;

    let order_id = fixture
        .order_service
        .place_order(member_id, item_id, 3)
        .await
        .unwrap();

    // 配送完了にする
    let mut order = fixture
        .order_repository
        .find_by_id(order_id)
        .await
        .unwrap()
        .unwrap();
    order.complete_delivery();
    fixture.order_repository.save(&order, &[]).await.unwrap();

    let result = fixture.order_service.cancel_order(order_id).await;

    assert!(matches!(
        result,
        Err(ApplicationError::DomainError(DomainError::AlreadyDelivered))
    ));

    // ステータスも在庫も変化していない
    let order = fixture
        .order_repository
        .find_by_id(order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status(), OrderStatus::Order);

    let item = fixture
        .item_repository
        .find_by_id(item_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.stock_quantity(), 7);
}

#[tokio::test]
async fn test_join_rejects_duplicate_member_name() {
    let fixture = build_fixture();
    register_member(&fixture, "userA").await;

    let result = fixture
        .member_service
        .join("userA".to_string(), test_address())
        .await;

    assert!(matches!(result, Err(ApplicationError::DuplicateMember(_))));
}

#[tokio::test]
async fn test_save_with_colliding_name_and_different_id_fails() {
    // サービス層の事前チェックを同時にすり抜けた2件目の登録を想定し、
    // リポジトリを直接呼んでユニーク制約で拒否されることを確認する
    let fixture = build_fixture();
    let first_id = register_member(&fixture, "userA").await;

    let second = Member::new(MemberId::new(), "userA".to_string(), test_address()).unwrap();
    let result = fixture.member_repository.save(&second).await;

    assert!(matches!(result, Err(RepositoryError::OperationFailed(_))));

    // 既存会員の行が上書きされていない
    let stored = fixture
        .member_repository
        .find_by_id(first_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id(), first_id);
    assert_eq!(stored.name(), "userA");

    // 2件目のIDに対応する行は存在しない
    assert!(fixture
        .member_repository
        .find_by_id(second.id())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_rename_to_existing_name_fails_and_changes_nothing() {
    let fixture = build_fixture();
    register_member(&fixture, "userA").await;
    let member_b = register_member(&fixture, "userB").await;

    let result = fixture
        .member_service
        .update_member_name(member_b, "userA".to_string())
        .await;

    assert!(matches!(result, Err(ApplicationError::RepositoryError(_))));

    // どちらの会員も元の名前のまま
    let stored = fixture
        .member_repository
        .find_by_id(member_b)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name(), "userB");
    assert_eq!(
        fixture
            .member_repository
            .find_by_name("userA")
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_join_with_different_case_name_succeeds() {
    // 会員名の一意性は大文字小文字を区別する
    let fixture = build_fixture();
    register_member(&fixture, "memberA").await;

    let member_id = fixture
        .member_service
        .join("membera".to_string(), test_address())
        .await
        .unwrap();

    let member = fixture
        .member_repository
        .find_by_id(member_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(member.name(), "membera");
}

#[tokio::test]
async fn test_joined_member_is_retrievable_by_id() {
    let fixture = build_fixture();
    let member_id = register_member(&fixture, "userA").await;

    let member = fixture
        .member_service
        .get_member_by_id(member_id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(member.id(), member_id);
    assert_eq!(member.name(), "userA");
    assert_eq!(member.address().street(), "뱅뱅사거리 35-10");
}

#[tokio::test]
async fn test_all_projection_strategies_return_identical_results() {
    let fixture = build_fixture();
    let member_id = register_member(&fixture, "userA").await;
    let item_id = register_book(&fixture, "OLD JPA", 35000, 10).await;
    let item_id2 = register_book(&fixture, "NEW JPA", 20000, 5).await;

    fixture
        .order_service
        .place_order(member_id, item_id, 3)
        .await
        .unwrap();
    fixture
        .order_service
        .place_order(member_id, item_id2, 1)
        .await
        .unwrap();

    let reader = InMemoryOrderProjectionReader::new(
        fixture.order_repository.orders.clone(),
        fixture.member_repository.members.clone(),
        fixture.order_repository.items.clone(),
    );
    let query_service = OrderQueryService::new(Arc::new(reader));

    let join = query_service
        .get_orders(ProjectionStrategy::Join)
        .await
        .unwrap();
    let batch = query_service
        .get_orders(ProjectionStrategy::Batch)
        .await
        .unwrap();
    let flat = query_service
        .get_orders(ProjectionStrategy::FlatJoin)
        .await
        .unwrap();

    // どの戦略でも結果の形状と内容は同一
    assert_eq!(join, batch);
    assert_eq!(batch, flat);
    assert_eq!(join.len(), 2);

    // プロジェクションは完全にマテリアライズされたDTO
    let projection = join
        .iter()
        .find(|p| p.order_items[0].item_name == "OLD JPA")
        .unwrap();
    assert_eq!(projection.member_name, "userA");
    assert_eq!(projection.status, "ORDER");
    assert_eq!(projection.order_items[0].order_price, 35000);
    assert_eq!(projection.order_items[0].count, 3);
    assert_eq!(projection.address.city, "seoul");
}
