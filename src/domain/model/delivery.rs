use crate::domain::model::{Address, DeliveryStatus};

/// 配送
/// 注文集約が値として所有する（配送のライフタイム = 注文のライフタイム）
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    status: DeliveryStatus,
    address: Address,
}

impl Delivery {
    /// 配送準備中の配送を作成
    /// 注文作成時は会員の住所を配送先とする
    pub fn ready(address: Address) -> Self {
        Self {
            status: DeliveryStatus::Ready,
            address,
        }
    }

    /// データベースから取得したデータで配送を再構築
    /// リポジトリでの使用を想定
    pub fn reconstruct(status: DeliveryStatus, address: Address) -> Self {
        Self { status, address }
    }

    /// 配送ステータスを取得
    pub fn status(&self) -> DeliveryStatus {
        self.status
    }

    /// 配送先住所を取得
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// 配送を完了にする
    pub fn complete(&mut self) {
        self.status = DeliveryStatus::Completed;
    }

    /// 配送が完了済みかチェック
    pub fn is_completed(&self) -> bool {
        self.status == DeliveryStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_address() -> Address {
        Address::new(
            "東京都".to_string(),
            "道玄坂1-1-1".to_string(),
            "1500043".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_ready_delivery_has_ready_status() {
        let delivery = Delivery::ready(test_address());
        assert_eq!(delivery.status(), DeliveryStatus::Ready);
        assert!(!delivery.is_completed());
    }

    #[test]
    fn test_complete_delivery() {
        let mut delivery = Delivery::ready(test_address());
        delivery.complete();
        assert_eq!(delivery.status(), DeliveryStatus::Completed);
        assert!(delivery.is_completed());
    }

    #[test]
    fn test_delivery_keeps_address() {
        let delivery = Delivery::ready(test_address());
        assert_eq!(delivery.address().city(), "東京都");
        assert_eq!(delivery.address().zipcode(), "1500043");
    }
}
