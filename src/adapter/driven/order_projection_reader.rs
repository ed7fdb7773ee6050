use crate::adapter::database_error::DatabaseError;
use crate::application::projection::{
    AddressProjection, OrderItemProjection, OrderProjection, OrderProjectionReader,
};
use crate::domain::model::OrderId;
use crate::domain::port::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{MySql, Pool, Row};
use std::collections::HashMap;
use uuid::Uuid;

/// MySQL注文プロジェクションリーダー
/// 読み取り専用クエリを実行し、完全にマテリアライズされたDTOを返す
/// 同じ結果を3つのクエリ形（ジョイン・バッチ・フラットジョイン）で取得できる
pub struct MySqlOrderProjectionReader {
    pool: Pool<MySql>,
}

impl MySqlOrderProjectionReader {
    /// 新しいMySQL注文プロジェクションリーダーを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    ///
    /// # Returns
    /// * MySqlOrderProjectionReaderのインスタンス
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// ルート行（注文＋会員名＋配送先）から明細が空のプロジェクションを構築する
    fn build_root_from_row(
        row: &sqlx::mysql::MySqlRow,
    ) -> Result<OrderProjection, RepositoryError> {
        let order_id_str: String = row.get("id");
        let order_id = Uuid::parse_str(&order_id_str).map_err(|e| {
            RepositoryError::FetchFailed(format!("注文IDの解析に失敗しました: {}", e))
        })?;

        let order_date: NaiveDateTime = row.get("order_date");
        let order_date: DateTime<Utc> = DateTime::from_naive_utc_and_offset(order_date, Utc);

        Ok(OrderProjection {
            order_id,
            member_name: row.get("member_name"),
            order_date,
            status: row.get("status"),
            address: AddressProjection {
                city: row.get("city"),
                street: row.get("street"),
                zipcode: row.get("zipcode"),
            },
            order_items: Vec::new(),
        })
    }

    /// ルートクエリ
    /// 注文・会員・配送先をジョインして1回で取得する（明細は含まない）
    async fn fetch_roots(&self) -> Result<Vec<OrderProjection>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                o.id, m.name AS member_name, o.order_date, o.status,
                o.city, o.street, o.zipcode
            FROM orders o
            INNER JOIN members m ON o.member_id = m.id
            ORDER BY o.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DatabaseError::QueryError(format!("注文ルートの取得に失敗しました: {}", e))
        })
        .map_err(RepositoryError::from)?;

        let mut roots = Vec::new();
        for row in &rows {
            roots.push(Self::build_root_from_row(row)?);
        }

        Ok(roots)
    }

    /// 明細行からOrderItemProjectionを構築する
    fn build_item_from_row(row: &sqlx::mysql::MySqlRow) -> OrderItemProjection {
        OrderItemProjection {
            item_name: row.get("item_name"),
            order_price: row.get("order_price"),
            count: row.get("count"),
        }
    }
}

#[async_trait]
impl OrderProjectionReader for MySqlOrderProjectionReader {
    async fn find_order_by_id(
        &self,
        order_id: OrderId,
    ) -> Result<Option<OrderProjection>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT
                o.id, m.name AS member_name, o.order_date, o.status,
                o.city, o.street, o.zipcode
            FROM orders o
            INNER JOIN members m ON o.member_id = m.id
            WHERE o.id = ?
            "#,
        )
        .bind(order_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("注文の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let mut projection = match row {
            Some(row) => Self::build_root_from_row(&row)?,
            None => return Ok(None),
        };

        let item_rows = sqlx::query(
            r#"
            SELECT i.name AS item_name, oi.order_price, oi.`count`
            FROM order_items oi
            INNER JOIN items i ON oi.item_id = i.id
            WHERE oi.order_id = ?
            ORDER BY oi.id ASC
            "#,
        )
        .bind(order_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("注文明細の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        projection.order_items = item_rows.iter().map(Self::build_item_from_row).collect();

        Ok(Some(projection))
    }

    async fn find_orders_with_join(&self) -> Result<Vec<OrderProjection>, RepositoryError> {
        // ルートを1回のジョインで取得し、注文ごとに明細クエリを発行する
        // クエリ回数は 1 + 注文数
        let mut roots = self.fetch_roots().await?;

        for projection in &mut roots {
            let item_rows = sqlx::query(
                r#"
                SELECT i.name AS item_name, oi.order_price, oi.`count`
                FROM order_items oi
                INNER JOIN items i ON oi.item_id = i.id
                WHERE oi.order_id = ?
                ORDER BY oi.id ASC
                "#,
            )
            .bind(projection.order_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("注文明細の取得に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

            projection.order_items = item_rows.iter().map(Self::build_item_from_row).collect();
        }

        Ok(roots)
    }

    async fn find_orders_with_batch(&self) -> Result<Vec<OrderProjection>, RepositoryError> {
        // ルートを1回、全注文の明細をIN句で1回取得する
        // クエリ回数は注文数に依存せず常に2
        let mut roots = self.fetch_roots().await?;

        if roots.is_empty() {
            return Ok(roots);
        }

        // IN句のプレースホルダを注文数分生成する
        let placeholders = vec!["?"; roots.len()].join(", ");
        let sql = format!(
            r#"
            SELECT oi.order_id, i.name AS item_name, oi.order_price, oi.`count`
            FROM order_items oi
            INNER JOIN items i ON oi.item_id = i.id
            WHERE oi.order_id IN ({})
            ORDER BY oi.id ASC
            "#,
            placeholders
        );

        let mut query = sqlx::query(&sql);
        for projection in &roots {
            query = query.bind(projection.order_id.to_string());
        }

        let item_rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("注文明細の一括取得に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        // 注文IDで明細をグループ化してルートに割り当てる
        let mut items_by_order: HashMap<String, Vec<OrderItemProjection>> = HashMap::new();
        for row in &item_rows {
            let order_id: String = row.get("order_id");
            items_by_order
                .entry(order_id)
                .or_default()
                .push(Self::build_item_from_row(row));
        }

        for projection in &mut roots {
            if let Some(items) = items_by_order.remove(&projection.order_id.to_string()) {
                projection.order_items = items;
            }
        }

        Ok(roots)
    }

    async fn find_orders_with_flat_join(&self) -> Result<Vec<OrderProjection>, RepositoryError> {
        // グラフ全体を1回のジョインで平坦に取得する
        // 注文×明細分の重複行をアプリケーション側で再グループ化する
        let rows = sqlx::query(
            r#"
            SELECT
                o.id, m.name AS member_name, o.order_date, o.status,
                o.city, o.street, o.zipcode,
                i.name AS item_name, oi.order_price, oi.`count`
            FROM orders o
            INNER JOIN members m ON o.member_id = m.id
            LEFT JOIN order_items oi ON o.id = oi.order_id
            LEFT JOIN items i ON oi.item_id = i.id
            ORDER BY o.created_at DESC, oi.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DatabaseError::QueryError(format!("注文一覧の平坦取得に失敗しました: {}", e))
        })
        .map_err(RepositoryError::from)?;

        // 注文の初出順を保ったまま再グループ化する
        let mut index_by_order: HashMap<Uuid, usize> = HashMap::new();
        let mut projections: Vec<OrderProjection> = Vec::new();

        for row in &rows {
            let order_id_str: String = row.get("id");
            let order_id = Uuid::parse_str(&order_id_str).map_err(|e| {
                RepositoryError::FetchFailed(format!("注文IDの解析に失敗しました: {}", e))
            })?;

            let idx = match index_by_order.get(&order_id) {
                Some(&idx) => idx,
                None => {
                    index_by_order.insert(order_id, projections.len());
                    projections.push(Self::build_root_from_row(row)?);
                    projections.len() - 1
                }
            };

            if let (Some(item_name), Some(order_price), Some(count)) = (
                row.get::<Option<String>, _>("item_name"),
                row.get::<Option<i64>, _>("order_price"),
                row.get::<Option<u32>, _>("count"),
            ) {
                projections[idx].order_items.push(OrderItemProjection {
                    item_name,
                    order_price,
                    count,
                });
            }
        }

        Ok(projections)
    }
}
