// 出力ポート
// ドメイン層が外部に依存する機能をトレイトとして定義
// アダプター層でこれらのトレイトを実装する

use crate::domain::model::{Item, ItemId, Member, MemberId, Order, OrderId};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// ロガートレイト
/// ログ出力を抽象化するポート
pub trait Logger: Send + Sync {
    /// デバッグレベルのログを出力
    fn debug(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 情報レベルのログを出力
    fn info(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 警告レベルのログを出力
    fn warn(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// エラーレベルのログを出力
    fn error(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );
}

/// リポジトリエラー型
/// リポジトリ操作で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::enum_variant_names)]
pub enum RepositoryError {
    /// データベース接続に失敗
    ConnectionFailed(String),
    /// 操作に失敗
    OperationFailed(String),
    /// データの取得に失敗
    FetchFailed(String),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            RepositoryError::OperationFailed(msg) => write!(f, "Operation failed: {}", msg),
            RepositoryError::FetchFailed(msg) => write!(f, "Fetch failed: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// 会員リポジトリトレイト
/// 会員集約の永続化を抽象化する
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// 会員を保存する
    /// 会員名は一意であり、別IDの会員と同名で保存しようとすると失敗する
    /// （サービス層の事前チェックをすり抜けた同時登録もここで拒否される）
    ///
    /// # Arguments
    /// * `member` - 保存する会員
    ///
    /// # Returns
    /// * `Ok(())` - 保存成功
    /// * `Err(RepositoryError)` - 保存失敗（会員名の重複を含む）
    async fn save(&self, member: &Member) -> Result<(), RepositoryError>;

    /// 会員IDで会員を検索する
    ///
    /// # Arguments
    /// * `member_id` - 検索する会員ID
    ///
    /// # Returns
    /// * `Ok(Some(Member))` - 会員が見つかった
    /// * `Ok(None)` - 会員が見つからなかった
    /// * `Err(RepositoryError)` - 検索失敗
    async fn find_by_id(&self, member_id: MemberId) -> Result<Option<Member>, RepositoryError>;

    /// 会員名で会員を検索する（完全一致、大文字小文字を区別）
    ///
    /// # Arguments
    /// * `name` - 検索する会員名
    ///
    /// # Returns
    /// * `Ok(Vec<Member>)` - 該当する会員のリスト
    /// * `Err(RepositoryError)` - 検索失敗
    async fn find_by_name(&self, name: &str) -> Result<Vec<Member>, RepositoryError>;

    /// すべての会員を取得する
    ///
    /// # Returns
    /// * `Ok(Vec<Member>)` - 会員のリスト
    /// * `Err(RepositoryError)` - 取得失敗
    async fn find_all(&self) -> Result<Vec<Member>, RepositoryError>;

    /// 新しい一意の会員IDを生成する
    fn next_identity(&self) -> MemberId;
}

/// 商品リポジトリトレイト
/// 商品集約の永続化を抽象化する
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// 商品を保存する
    ///
    /// # Arguments
    /// * `item` - 保存する商品
    ///
    /// # Returns
    /// * `Ok(())` - 保存成功
    /// * `Err(RepositoryError)` - 保存失敗
    async fn save(&self, item: &Item) -> Result<(), RepositoryError>;

    /// 商品IDで商品を検索する
    ///
    /// # Arguments
    /// * `item_id` - 検索する商品ID
    ///
    /// # Returns
    /// * `Ok(Some(Item))` - 商品が見つかった
    /// * `Ok(None)` - 商品が見つからなかった
    /// * `Err(RepositoryError)` - 検索失敗
    async fn find_by_id(&self, item_id: ItemId) -> Result<Option<Item>, RepositoryError>;

    /// すべての商品を取得する
    ///
    /// # Returns
    /// * `Ok(Vec<Item>)` - 商品のリスト
    /// * `Err(RepositoryError)` - 取得失敗
    async fn find_all(&self) -> Result<Vec<Item>, RepositoryError>;

    /// 新しい一意の商品IDを生成する
    fn next_identity(&self) -> ItemId;
}

/// 注文リポジトリトレイト
/// 注文集約の永続化を抽象化する
/// save は注文と、同じ操作で在庫が変化した商品を
/// 1つのユニットオブワーク（トランザクション）でまとめてコミットする
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 注文と在庫が変化した商品を保存する
    /// すべての変更が一括でコミットされるか、すべて失敗するかのいずれか
    ///
    /// # Arguments
    /// * `order` - 保存する注文（配送と注文明細をカスケード保存）
    /// * `touched_items` - 同じ操作で在庫が変化した商品
    ///
    /// # Returns
    /// * `Ok(())` - 保存成功
    /// * `Err(RepositoryError)` - 保存失敗（部分的な変更は残らない）
    async fn save(&self, order: &Order, touched_items: &[Item]) -> Result<(), RepositoryError>;

    /// 注文IDで注文を検索する
    ///
    /// # Arguments
    /// * `order_id` - 検索する注文ID
    ///
    /// # Returns
    /// * `Ok(Some(Order))` - 注文が見つかった
    /// * `Ok(None)` - 注文が見つからなかった
    /// * `Err(RepositoryError)` - 検索失敗
    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// すべての注文を取得する
    /// 作成日時の降順で並べて返す
    ///
    /// # Returns
    /// * `Ok(Vec<Order>)` - 注文のリスト
    /// * `Err(RepositoryError)` - 取得失敗
    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError>;

    /// 新しい一意の注文IDを生成する
    fn next_identity(&self) -> OrderId;
}
