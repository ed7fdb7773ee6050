use crate::application::ApplicationError;
use crate::domain::model::{Address, Member, MemberId};
use crate::domain::port::{Logger, MemberRepository};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 会員アプリケーションサービス
pub struct MemberApplicationService<MR>
where
    MR: MemberRepository,
{
    member_repository: MR,
    logger: Arc<dyn Logger>,
}

impl<MR> MemberApplicationService<MR>
where
    MR: MemberRepository,
{
    /// 新しい会員アプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `member_repository` - 会員リポジトリ
    /// * `logger` - ロガー
    pub fn new(member_repository: MR, logger: Arc<dyn Logger>) -> Self {
        Self {
            member_repository,
            logger,
        }
    }

    /// 会員を登録する
    /// 同名の会員が既に存在する場合は DuplicateMember で拒否する（完全一致）
    /// 同時登録の競合は永続化層の name 一意制約が最終的に防ぐ
    ///
    /// # Arguments
    /// * `name` - 会員名
    /// * `address` - 住所
    ///
    /// # Returns
    /// * `Ok(MemberId)` - 登録された会員のID
    /// * `Err(ApplicationError)` - 登録失敗
    pub async fn join(&self, name: String, address: Address) -> Result<MemberId, ApplicationError> {
        let correlation_id = Uuid::new_v4();

        let existing = self.member_repository.find_by_name(&name).await?;
        if !existing.is_empty() {
            self.logger.warn(
                "MemberApplicationService",
                "会員登録を拒否しました（同名の会員が存在します）",
                Some(correlation_id),
                Some(HashMap::from([("name".to_string(), name.clone())])),
            );
            return Err(ApplicationError::DuplicateMember(format!(
                "既に存在する会員です: {}",
                name
            )));
        }

        let member_id = self.member_repository.next_identity();
        let member = Member::new(member_id, name, address)?;
        self.member_repository.save(&member).await?;

        self.logger.info(
            "MemberApplicationService",
            "会員を登録しました",
            Some(correlation_id),
            Some(HashMap::from([(
                "member_id".to_string(),
                member_id.to_string(),
            )])),
        );

        Ok(member_id)
    }

    /// 会員IDで会員を取得
    ///
    /// # Arguments
    /// * `member_id` - 会員ID
    ///
    /// # Returns
    /// * `Ok(Some(Member))` - 会員が見つかった
    /// * `Ok(None)` - 会員が見つからなかった
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_member_by_id(
        &self,
        member_id: MemberId,
    ) -> Result<Option<Member>, ApplicationError> {
        self.member_repository
            .find_by_id(member_id)
            .await
            .map_err(ApplicationError::from)
    }

    /// すべての会員を取得
    pub async fn get_all_members(&self) -> Result<Vec<Member>, ApplicationError> {
        self.member_repository
            .find_all()
            .await
            .map_err(ApplicationError::from)
    }

    /// 会員名で会員を取得（完全一致）
    pub async fn get_members_by_name(&self, name: &str) -> Result<Vec<Member>, ApplicationError> {
        self.member_repository
            .find_by_name(name)
            .await
            .map_err(ApplicationError::from)
    }

    /// 会員名を変更する
    ///
    /// # Arguments
    /// * `member_id` - 会員ID
    /// * `name` - 新しい会員名
    ///
    /// # Returns
    /// * `Ok(())` - 変更成功
    /// * `Err(ApplicationError)` - 変更失敗
    pub async fn update_member_name(
        &self,
        member_id: MemberId,
        name: String,
    ) -> Result<(), ApplicationError> {
        let mut member = self
            .member_repository
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("会員が見つかりません: {}", member_id))
            })?;

        member.rename(name)?;
        self.member_repository.save(&member).await?;
        Ok(())
    }
}
