use crate::application::ApplicationError;
use crate::domain::model::{Item, ItemId};
use crate::domain::port::ItemRepository;
use std::sync::Arc;

/// 商品アプリケーションサービス
/// 商品の登録と読み取りを提供する
pub struct ItemApplicationService {
    item_repository: Arc<dyn ItemRepository>,
}

impl ItemApplicationService {
    /// 新しい商品アプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `item_repository` - 商品リポジトリ
    pub fn new(item_repository: Arc<dyn ItemRepository>) -> Self {
        Self { item_repository }
    }

    /// 新しい書籍商品を登録
    ///
    /// # Arguments
    /// * `name` - 商品名
    /// * `price` - 価格
    /// * `stock_quantity` - 初期在庫数
    /// * `author` - 著者
    /// * `isbn` - ISBN
    ///
    /// # Returns
    /// * `Ok(ItemId)` - 登録された商品のID
    /// * `Err(ApplicationError)` - 登録失敗
    pub async fn create_book(
        &self,
        name: String,
        price: i64,
        stock_quantity: u32,
        author: String,
        isbn: String,
    ) -> Result<ItemId, ApplicationError> {
        let item_id = self.item_repository.next_identity();
        let item = Item::book(item_id, name, price, stock_quantity, author, isbn)?;
        self.item_repository.save(&item).await?;
        Ok(item_id)
    }

    /// 商品IDで商品を取得
    ///
    /// # Returns
    /// * `Ok(Some(Item))` - 商品が見つかった
    /// * `Ok(None)` - 商品が見つからなかった
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_item_by_id(&self, item_id: ItemId) -> Result<Option<Item>, ApplicationError> {
        self.item_repository
            .find_by_id(item_id)
            .await
            .map_err(ApplicationError::from)
    }

    /// すべての商品を取得
    pub async fn get_all_items(&self) -> Result<Vec<Item>, ApplicationError> {
        self.item_repository
            .find_all()
            .await
            .map_err(ApplicationError::from)
    }
}
