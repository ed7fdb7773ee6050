use crate::domain::model::{Item, ItemKind, Member};
use serde::Serialize;

/// 会員用のレスポンスDTO
#[derive(Serialize)]
pub struct MemberResponse {
    pub member_id: String,
    pub name: String,
    pub city: String,
    pub street: String,
    pub zipcode: String,
    pub order_ids: Vec<String>,
}

/// 商品用のレスポンスDTO
#[derive(Serialize)]
pub struct ItemResponse {
    pub item_id: String,
    pub name: String,
    pub price: i64,
    pub stock_quantity: u32,
    pub author: String,
    pub isbn: String,
}

impl MemberResponse {
    /// ドメインオブジェクトからMemberResponseを作成
    pub fn from_member(member: &Member) -> Self {
        Self {
            member_id: member.id().to_string(),
            name: member.name().to_string(),
            city: member.address().city().to_string(),
            street: member.address().street().to_string(),
            zipcode: member.address().zipcode().to_string(),
            order_ids: member.orders().iter().map(|id| id.to_string()).collect(),
        }
    }
}

impl ItemResponse {
    /// ドメインオブジェクトからItemResponseを作成
    pub fn from_item(item: &Item) -> Self {
        let ItemKind::Book { author, isbn } = item.kind();
        Self {
            item_id: item.id().to_string(),
            name: item.name().to_string(),
            price: item.price(),
            stock_quantity: item.stock_quantity(),
            author: author.clone(),
            isbn: isbn.clone(),
        }
    }
}
