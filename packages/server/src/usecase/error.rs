//! UseCase 層のエラー型定義

use thiserror::Error;

use crate::domain::RepositoryError;

/// WebSocket 接続（レジストリ登録）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// 同一 client_id のクライアントが既に接続中
    #[error("client '{0}' is already connected")]
    DuplicateClientId(String),
}

/// join / next_partner 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// クライアントが既に待機中、またはセッション参加中
    #[error("client '{0}' is already waiting or in a session")]
    AlreadyActive(String),

    /// その他の Repository エラー
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for JoinError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::AlreadyActive(id) => JoinError::AlreadyActive(id),
            other => JoinError::Repository(other),
        }
    }
}

/// チャットメッセージ転送のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// 送信者がアクティブなセッションに参加していない
    ///
    /// 仕様上これはエラー応答にはならず、呼び出し側で silent no-op として
    /// 吸収される（best-effort リレー）。
    #[error("sender '{0}' has no active session")]
    NotInSession(String),

    /// セッションのメッセージログが満杯
    #[error("session message log is full")]
    MessageLogFull,

    /// その他の Repository エラー
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for RelayError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotInSession(id) => RelayError::NotInSession(id),
            RepositoryError::Domain(crate::domain::DomainError::MessageLogFull) => {
                RelayError::MessageLogFull
            }
            other => RelayError::Repository(other),
        }
    }
}
