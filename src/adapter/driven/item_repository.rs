use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{Item, ItemId, ItemKind};
use crate::domain::port::{ItemRepository, RepositoryError};
use async_trait::async_trait;
use sqlx::{MySql, Pool, Row};

/// MySQL商品リポジトリ
/// MySQLデータベースを使用して商品を永続化する
pub struct MySqlItemRepository {
    pool: Pool<MySql>,
}

impl MySqlItemRepository {
    /// 新しいMySQL商品リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    ///
    /// # Returns
    /// * MySqlItemRepositoryのインスタンス
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// データベースの行から商品を再構築する
    fn build_item_from_row(row: &sqlx::mysql::MySqlRow) -> Result<Item, RepositoryError> {
        let item_id_str: String = row.get("id");
        let item_id = ItemId::from_string(&item_id_str).map_err(|e| {
            RepositoryError::FetchFailed(format!("商品IDの解析に失敗しました: {}", e))
        })?;

        let kind = ItemKind::Book {
            author: row.get("author"),
            isbn: row.get("isbn"),
        };

        Ok(Item::reconstruct(
            item_id,
            row.get("name"),
            row.get("price"),
            row.get("stock_quantity"),
            kind,
        ))
    }
}

#[async_trait]
impl ItemRepository for MySqlItemRepository {
    async fn save(&self, item: &Item) -> Result<(), RepositoryError> {
        let ItemKind::Book { author, isbn } = item.kind();

        sqlx::query(
            r#"
            INSERT INTO items (id, name, price, stock_quantity, author, isbn)
            VALUES (?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                name = VALUES(name),
                price = VALUES(price),
                stock_quantity = VALUES(stock_quantity),
                author = VALUES(author),
                isbn = VALUES(isbn)
            "#,
        )
        .bind(item.id().to_string())
        .bind(item.name())
        .bind(item.price())
        .bind(item.stock_quantity())
        .bind(author)
        .bind(isbn)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("商品の保存に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn find_by_id(&self, item_id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, price, stock_quantity, author, isbn FROM items WHERE id = ?",
        )
        .bind(item_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("商品の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        match row {
            Some(row) => Ok(Some(Self::build_item_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Item>, RepositoryError> {
        // 作成日時の昇順で並べる
        let rows = sqlx::query(
            "SELECT id, name, price, stock_quantity, author, isbn FROM items ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("商品一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let mut items = Vec::new();
        for row in &rows {
            items.push(Self::build_item_from_row(row)?);
        }

        Ok(items)
    }

    fn next_identity(&self) -> ItemId {
        ItemId::new()
    }
}
