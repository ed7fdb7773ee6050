/// ドメイン層のエラー型
/// ビジネスルール違反を表現する
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 在庫不足（要求数量が現在庫数を超えている）
    OutOfStock { requested: u32, available: u32 },
    /// 配送完了済みの注文をキャンセルしようとした
    AlreadyDelivered,
    /// 無効な注文状態（例: キャンセル済みの注文を再キャンセルしようとした）
    InvalidOrderState(String),
    /// 無効な数量（例: 0の数量）
    InvalidQuantity,
    /// 無効な住所（例: 市区町村が空）
    InvalidAddress(String),
    /// 注文の検証失敗（例: 注文明細が空の状態で注文を作成しようとした）
    OrderValidation(String),
    /// 無効な値
    InvalidValue(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::OutOfStock {
                requested,
                available,
            } => write!(
                f,
                "Out of stock: requested {} but only {} available",
                requested, available
            ),
            DomainError::AlreadyDelivered => {
                write!(f, "Already delivered: cancellation is not allowed")
            }
            DomainError::InvalidOrderState(msg) => write!(f, "Invalid order state: {}", msg),
            DomainError::InvalidQuantity => write!(f, "Invalid quantity"),
            DomainError::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
            DomainError::OrderValidation(msg) => write!(f, "Order validation failed: {}", msg),
            DomainError::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
