// ドメイン層
// エンティティ・値オブジェクト・ドメインエラー・出力ポートを定義する

pub mod error;
pub mod model;
pub mod port;
