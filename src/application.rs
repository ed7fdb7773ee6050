// アプリケーション層
// ユースケースのオーケストレーションとエラー変換を担う

pub mod error;
pub mod projection;
pub mod service;

pub use error::ApplicationError;
