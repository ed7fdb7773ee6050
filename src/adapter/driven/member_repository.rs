use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{Address, Member, MemberId, OrderId};
use crate::domain::port::{MemberRepository, RepositoryError};
use async_trait::async_trait;
use sqlx::{MySql, Pool, Row};

/// MySQL会員リポジトリ
/// MySQLデータベースを使用して会員を永続化する
pub struct MySqlMemberRepository {
    pool: Pool<MySql>,
}

impl MySqlMemberRepository {
    /// 新しいMySQL会員リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    ///
    /// # Returns
    /// * MySqlMemberRepositoryのインスタンス
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// データベースの行から会員集約を再構築する
    /// 注文IDの参照リストは別クエリで取得する
    async fn build_member_from_row(
        &self,
        row: &sqlx::mysql::MySqlRow,
    ) -> Result<Member, RepositoryError> {
        let member_id_str: String = row.get("id");
        let member_id = MemberId::from_string(&member_id_str).map_err(|e| {
            RepositoryError::FetchFailed(format!("会員IDの解析に失敗しました: {}", e))
        })?;

        let address = Address::new(row.get("city"), row.get("street"), row.get("zipcode"))
            .map_err(|e| {
                RepositoryError::FetchFailed(format!("住所の構築に失敗しました: {}", e))
            })?;

        // 会員が行った注文のID参照を取得
        let order_rows = sqlx::query("SELECT id FROM orders WHERE member_id = ?")
            .bind(member_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("注文参照の取得に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        let mut orders = Vec::new();
        for order_row in &order_rows {
            let order_id_str: String = order_row.get("id");
            let order_id = OrderId::from_string(&order_id_str).map_err(|e| {
                RepositoryError::FetchFailed(format!("注文IDの解析に失敗しました: {}", e))
            })?;
            orders.push(order_id);
        }

        Ok(Member::reconstruct(
            member_id,
            row.get("name"),
            address,
            orders,
        ))
    }
}

#[async_trait]
impl MemberRepository for MySqlMemberRepository {
    async fn save(&self, member: &Member) -> Result<(), RepositoryError> {
        // IDで既存判定してからINSERT / UPDATEを使い分ける
        // ON DUPLICATE KEYのアップサートは会員名のユニークインデックスにも反応し、
        // 別IDの新規会員が既存会員の行を上書きしてしまうため使わない
        // 会員名の衝突はユニークインデックス違反としてエラーになる
        let exists = sqlx::query("SELECT 1 FROM members WHERE id = ?")
            .bind(member.id().to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("会員の存在確認に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?
            .is_some();

        if exists {
            sqlx::query(
                r#"
                UPDATE members
                SET name = ?, city = ?, street = ?, zipcode = ?
                WHERE id = ?
                "#,
            )
            .bind(member.name())
            .bind(member.address().city())
            .bind(member.address().street())
            .bind(member.address().zipcode())
            .bind(member.id().to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("会員の更新に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;
        } else {
            sqlx::query(
                r#"
                INSERT INTO members (id, name, city, street, zipcode)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(member.id().to_string())
            .bind(member.name())
            .bind(member.address().city())
            .bind(member.address().street())
            .bind(member.address().zipcode())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("会員の保存に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;
        }

        Ok(())
    }

    async fn find_by_id(&self, member_id: MemberId) -> Result<Option<Member>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, city, street, zipcode FROM members WHERE id = ?",
        )
        .bind(member_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("会員の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        match row {
            Some(row) => Ok(Some(self.build_member_from_row(&row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Member>, RepositoryError> {
        // 完全一致で検索（name列はutf8mb4_binなので大文字小文字を区別する）
        let rows = sqlx::query(
            "SELECT id, name, city, street, zipcode FROM members WHERE name = ?",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("会員名検索に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let mut members = Vec::new();
        for row in &rows {
            members.push(self.build_member_from_row(row).await?);
        }

        Ok(members)
    }

    async fn find_all(&self) -> Result<Vec<Member>, RepositoryError> {
        // 作成日時の昇順で並べる
        let rows = sqlx::query(
            "SELECT id, name, city, street, zipcode FROM members ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("会員一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let mut members = Vec::new();
        for row in &rows {
            members.push(self.build_member_from_row(row).await?);
        }

        Ok(members)
    }

    fn next_identity(&self) -> MemberId {
        MemberId::new()
    }
}
