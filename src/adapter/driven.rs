// 駆動される側アダプター（リポジトリ実装など）

mod console_logger;
mod item_repository;
mod member_repository;
mod order_projection_reader;
mod order_repository;

pub use console_logger::ConsoleLogger;
pub use item_repository::MySqlItemRepository;
pub use member_repository::MySqlMemberRepository;
pub use order_projection_reader::MySqlOrderProjectionReader;
pub use order_repository::MySqlOrderRepository;
