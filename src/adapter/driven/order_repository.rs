use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{
    Address, Delivery, DeliveryStatus, Item, ItemId, MemberId, Order, OrderId, OrderItem,
    OrderStatus,
};
use crate::domain::port::{OrderRepository, RepositoryError};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{MySql, Pool, Row};

/// MySQL注文リポジトリ
/// MySQLデータベースを使用して注文を永続化する
/// 注文・配送・注文明細・在庫の変更を1つのトランザクションでコミットする
pub struct MySqlOrderRepository {
    pool: Pool<MySql>,
}

impl MySqlOrderRepository {
    /// 新しいMySQL注文リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    ///
    /// # Returns
    /// * MySqlOrderRepositoryのインスタンス
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// データベースの行から注文オブジェクトのリストを構築する
    /// JOINされた結果から複数の注文を再構築する
    /// 入力行の並び順（注文の初出順）を保つ
    fn build_orders_from_rows(
        rows: Vec<sqlx::mysql::MySqlRow>,
    ) -> Result<Vec<Order>, RepositoryError> {
        use std::collections::HashMap;

        // 注文IDごとにグループ化（初出順を保持する）
        let mut group_index: HashMap<String, usize> = HashMap::new();
        let mut order_groups: Vec<(String, Vec<&sqlx::mysql::MySqlRow>)> = Vec::new();
        for row in &rows {
            let order_id: String = row.get("id");
            match group_index.get(&order_id) {
                Some(&idx) => order_groups[idx].1.push(row),
                None => {
                    group_index.insert(order_id.clone(), order_groups.len());
                    order_groups.push((order_id, vec![row]));
                }
            }
        }

        let mut orders = Vec::new();

        for (order_id_str, order_rows) in order_groups {
            if order_rows.is_empty() {
                continue;
            }

            // 最初の行から注文の基本情報を取得
            let first_row = order_rows[0];

            let order_id = OrderId::from_string(&order_id_str).map_err(|e| {
                RepositoryError::FetchFailed(format!("注文IDの解析に失敗しました: {}", e))
            })?;

            let order = Self::build_order(order_id, first_row, &order_rows)?;
            orders.push(order);
        }

        Ok(orders)
    }

    /// 1つの注文分の行から注文集約を再構築する
    fn build_order(
        order_id: OrderId,
        first_row: &sqlx::mysql::MySqlRow,
        order_rows: &[&sqlx::mysql::MySqlRow],
    ) -> Result<Order, RepositoryError> {
        let member_id = MemberId::from_string(first_row.get("member_id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("会員IDの解析に失敗しました: {}", e))
        })?;

        let status = OrderStatus::from_string(first_row.get("status")).map_err(|e| {
            RepositoryError::FetchFailed(format!("注文ステータスの解析に失敗しました: {}", e))
        })?;

        let delivery_status = DeliveryStatus::from_string(first_row.get("delivery_status"))
            .map_err(|e| {
                RepositoryError::FetchFailed(format!("配送ステータスの解析に失敗しました: {}", e))
            })?;

        // 配送先住所を再構築
        let address = Address::new(
            first_row.get("city"),
            first_row.get("street"),
            first_row.get("zipcode"),
        )
        .map_err(|e| {
            RepositoryError::FetchFailed(format!("配送先住所の構築に失敗しました: {}", e))
        })?;

        let delivery = Delivery::reconstruct(delivery_status, address);

        let order_date: NaiveDateTime = first_row.get("order_date");
        let order_date: DateTime<Utc> = DateTime::from_naive_utc_and_offset(order_date, Utc);

        // 注文明細を再構築
        let mut order_items = Vec::new();
        for row in order_rows {
            if let (Some(item_id_str), Some(order_price), Some(count)) = (
                row.get::<Option<String>, _>("item_id"),
                row.get::<Option<i64>, _>("order_price"),
                row.get::<Option<u32>, _>("count"),
            ) {
                let item_id = ItemId::from_string(&item_id_str).map_err(|e| {
                    RepositoryError::FetchFailed(format!("商品IDの解析に失敗しました: {}", e))
                })?;

                order_items.push(OrderItem::reconstruct(item_id, order_price, count));
            }
        }

        // 注文集約を再構築
        Order::reconstruct(order_id, member_id, delivery, order_items, order_date, status)
            .map_err(|e| {
                RepositoryError::FetchFailed(format!("注文集約の再構築に失敗しました: {}", e))
            })
    }
}

#[async_trait]
impl OrderRepository for MySqlOrderRepository {
    async fn save(&self, order: &Order, touched_items: &[Item]) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!("トランザクション開始に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        // 注文データをordersテーブルにUPSERT（配送情報も同じ行に保存）
        let delivery = order.delivery();
        sqlx::query(
            r#"
            INSERT INTO orders (id, member_id, status, order_date, delivery_status, city, street, zipcode)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                status = VALUES(status),
                delivery_status = VALUES(delivery_status),
                city = VALUES(city),
                street = VALUES(street),
                zipcode = VALUES(zipcode)
            "#,
        )
        .bind(order.id().to_string())
        .bind(order.member_id().to_string())
        .bind(order.status().to_string())
        .bind(order.order_date().naive_utc())
        .bind(delivery.status().to_string())
        .bind(delivery.address().city())
        .bind(delivery.address().street())
        .bind(delivery.address().zipcode())
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("注文の保存に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        // 既存の注文明細を削除してから挿入し直す
        sqlx::query("DELETE FROM order_items WHERE order_id = ?")
            .bind(order.id().to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("注文明細の削除に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        // 注文明細データをorder_itemsテーブルにINSERT
        for order_item in order.order_items() {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, item_id, order_price, `count`)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(order.id().to_string())
            .bind(order_item.item_id().to_string())
            .bind(order_item.order_price())
            .bind(order_item.count())
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("注文明細の保存に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;
        }

        // 同じ操作で在庫が変化した商品を同一トランザクションで更新
        for item in touched_items {
            sqlx::query("UPDATE items SET stock_quantity = ? WHERE id = ?")
                .bind(item.stock_quantity())
                .bind(item.id().to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DatabaseError::QueryError(format!("在庫の更新に失敗しました: {}", e))
                })
                .map_err(RepositoryError::from)?;
        }

        // トランザクションをコミット
        tx.commit()
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!(
                    "トランザクションのコミットに失敗しました: {}",
                    e
                ))
            })
            .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError> {
        // ordersテーブルとorder_itemsテーブルをJOINして取得
        let rows = sqlx::query(
            r#"
            SELECT
                o.id, o.member_id, o.status, o.order_date,
                o.delivery_status, o.city, o.street, o.zipcode,
                oi.item_id, oi.order_price, oi.`count`
            FROM orders o
            LEFT JOIN order_items oi ON o.id = oi.order_id
            WHERE o.id = ?
            ORDER BY oi.id ASC
            "#,
        )
        .bind(order_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("注文の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        if rows.is_empty() {
            return Ok(None);
        }

        let row_refs: Vec<&sqlx::mysql::MySqlRow> = rows.iter().collect();
        let order = Self::build_order(order_id, row_refs[0], &row_refs)?;

        Ok(Some(order))
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        // ordersテーブルとorder_itemsテーブルをJOINして全注文を取得
        // 作成日時の降順で並べる
        let rows = sqlx::query(
            r#"
            SELECT
                o.id, o.member_id, o.status, o.order_date,
                o.delivery_status, o.city, o.street, o.zipcode,
                oi.item_id, oi.order_price, oi.`count`
            FROM orders o
            LEFT JOIN order_items oi ON o.id = oi.order_id
            ORDER BY o.created_at DESC, oi.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("注文一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Self::build_orders_from_rows(rows)
    }

    fn next_identity(&self) -> OrderId {
        OrderId::new()
    }
}
