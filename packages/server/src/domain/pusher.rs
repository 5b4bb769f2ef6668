//! MessagePusher trait 定義
//!
//! クライアントへの通知送信を抽象化します。送信は fire-and-forget であり、
//! 配送失敗が状態変更をロールバックすることはありません（best-effort）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::MessagePushError;
use super::value_object::ClientId;

/// クライアントへの送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// メッセージ送信の抽象化
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    ///
    /// 同じ ID が既に登録されている場合は `DuplicateClient` を返す。
    async fn register_client(
        &self,
        client_id: ClientId,
        sender: PusherChannel,
    ) -> Result<(), MessagePushError>;

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, client_id: &ClientId);

    /// 特定のクライアントにメッセージを送信
    async fn push_to(&self, client_id: &ClientId, content: &str) -> Result<(), MessagePushError>;

    /// 複数のクライアントにメッセージを送信（部分失敗を許容）
    async fn broadcast(
        &self,
        targets: Vec<ClientId>,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 接続中の全クライアント ID を取得
    async fn connected_clients(&self) -> Vec<ClientId>;

    /// 接続中のクライアント数を取得
    async fn connected_count(&self) -> usize;
}
