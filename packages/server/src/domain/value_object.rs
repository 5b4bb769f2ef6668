//! Value Object 定義
//!
//! 不変条件を型で保証するための小さなラッパー群。
//! 生成時にバリデーションを行い、不正な値はドメインに入れない。

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// クライアント ID の最大長（文字数）
const CLIENT_ID_MAX_LENGTH: usize = 64;

/// メッセージ内容の最大長（文字数）
const MESSAGE_CONTENT_MAX_LENGTH: usize = 2000;

/// クライアントを識別する ID（接続ごとに固定）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(String);

impl ClientId {
    /// Create a new ClientId, validating that it is non-empty and within length limits.
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() || value.chars().count() > CLIENT_ID_MAX_LENGTH {
            return Err(DomainError::InvalidClientId(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// セッション（2者ペア）を識別する ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// SessionId のファクトリ
///
/// UUID v4 を使って衝突しない ID を生成する。
pub struct SessionIdFactory;

impl SessionIdFactory {
    pub fn generate() -> SessionId {
        SessionId(uuid::Uuid::new_v4().to_string())
    }

    /// テスト用: 既知の文字列から SessionId を作る
    pub fn from_string(value: String) -> SessionId {
        SessionId(value)
    }
}

/// セッションの種別（チャット / ビデオシグナリング）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    Chat,
    Video,
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionMode::Chat => write!(f, "chat"),
            SessionMode::Video => write!(f, "video"),
        }
    }
}

/// メッセージ内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent(String);

impl MessageContent {
    /// Create new MessageContent, validating that it is non-empty and within length limits.
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() || value.chars().count() > MESSAGE_CONTENT_MAX_LENGTH {
            return Err(DomainError::InvalidMessageContent(value.chars().count()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix タイムスタンプ（JST、ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_valid() {
        // テスト項目: 正常な文字列から ClientId が生成できる
        // given (前提条件):
        let value = "alice".to_string();

        // when (操作):
        let result = ClientId::new(value);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "alice");
    }

    #[test]
    fn test_client_id_empty_rejected() {
        // テスト項目: 空文字列の ClientId は拒否される
        // given (前提条件):
        let value = "".to_string();

        // when (操作):
        let result = ClientId::new(value);

        // then (期待する結果):
        assert!(matches!(result, Err(DomainError::InvalidClientId(_))));
    }

    #[test]
    fn test_client_id_too_long_rejected() {
        // テスト項目: 64 文字を超える ClientId は拒否される
        // given (前提条件):
        let value = "a".repeat(65);

        // when (操作):
        let result = ClientId::new(value);

        // then (期待する結果):
        assert!(matches!(result, Err(DomainError::InvalidClientId(_))));
    }

    #[test]
    fn test_client_id_counts_chars_not_bytes() {
        // テスト項目: 上限はバイト数ではなく文字数で判定される
        // given (前提条件): 64 文字（バイト数では 192）のマルチバイト文字列
        let value = "あ".repeat(64);

        // when (操作):
        let result = ClientId::new(value);

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[test]
    fn test_session_id_factory_generates_unique_ids() {
        // テスト項目: SessionIdFactory が毎回異なる ID を生成する
        // given (前提条件):

        // when (操作):
        let id1 = SessionIdFactory::generate();
        let id2 = SessionIdFactory::generate();

        // then (期待する結果):
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_message_content_valid() {
        // テスト項目: 正常な文字列から MessageContent が生成できる
        // given (前提条件):
        let value = "hello".to_string();

        // when (操作):
        let result = MessageContent::new(value);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "hello");
    }

    #[test]
    fn test_message_content_empty_rejected() {
        // テスト項目: 空のメッセージ内容は拒否される
        // given (前提条件):
        let value = "".to_string();

        // when (操作):
        let result = MessageContent::new(value);

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(DomainError::InvalidMessageContent(0))
        ));
    }

    #[test]
    fn test_message_content_too_long_rejected() {
        // テスト項目: 2000 文字を超えるメッセージ内容は拒否される
        // given (前提条件):
        let value = "x".repeat(2001);

        // when (操作):
        let result = MessageContent::new(value);

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(DomainError::InvalidMessageContent(2001))
        ));
    }

    #[test]
    fn test_message_content_counts_chars_not_bytes() {
        // テスト項目: 上限はバイト数ではなく文字数で判定される
        // given (前提条件): 2000 文字（バイト数では 6000）のマルチバイト文字列
        let value = "あ".repeat(2000);

        // when (操作):
        let result = MessageContent::new(value);

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[test]
    fn test_session_mode_display() {
        // テスト項目: SessionMode が小文字で表示される
        // given (前提条件):

        // when (操作) / then (期待する結果):
        assert_eq!(SessionMode::Chat.to_string(), "chat");
        assert_eq!(SessionMode::Video.to_string(), "video");
    }
}
