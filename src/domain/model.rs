// ドメインモデル（エンティティと値オブジェクト）

mod value_objects;
mod member;
mod item;
mod delivery;
mod order;

pub use value_objects::{
    OrderId, MemberId, ItemId,
    Address,
    OrderStatus,
    DeliveryStatus,
};

pub use member::Member;
pub use item::{Item, ItemKind};
pub use delivery::Delivery;
pub use order::{Order, OrderItem};
