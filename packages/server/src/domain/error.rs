//! ドメイン層のエラー型定義

use thiserror::Error;

/// Value Object / Entity の生成・操作で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// クライアント ID が不正（空、または長すぎる）
    #[error("invalid client id: {0}")]
    InvalidClientId(String),

    /// メッセージ内容が不正（空、または長すぎる）
    #[error("invalid message content (length: {0})")]
    InvalidMessageContent(usize),

    /// 自分自身とのペアリングは許可されない
    #[error("client '{0}' cannot be paired with itself")]
    SelfPairing(String),

    /// セッションのメッセージログが満杯
    #[error("session message log is full")]
    MessageLogFull,

    /// chat モード以外のセッションにはメッセージを記録できない
    #[error("session mode does not carry a message log")]
    NotAChatSession,
}

/// Repository 操作で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// クライアントが既に待機中、またはセッション参加中
    #[error("client '{0}' is already waiting or in a session")]
    AlreadyActive(String),

    /// クライアントがアクティブなセッションに参加していない
    #[error("client '{0}' has no active session")]
    NotInSession(String),

    /// ドメイン層のエラーをそのまま伝搬
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// メッセージ送信（push）で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 対象クライアントが接続されていない
    #[error("client '{0}' is not connected")]
    ClientNotFound(String),

    /// 同じ ID のクライアントが既に接続されている
    #[error("client '{0}' is already connected")]
    DuplicateClient(String),

    /// 送信チャンネルへの書き込みに失敗
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
