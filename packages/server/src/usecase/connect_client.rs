//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - WebSocket 接続時のレジストリ登録（重複チェック含む）
//!
//! ### なぜこのテストが必要か
//! - 同一 client_id の二重接続を upgrade 前に拒否できることを保証
//! - レジストリ登録と接続者数の整合性を確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規クライアントの接続
//! - 異常系：重複した client_id での接続試行

use std::sync::Arc;

use crate::domain::{ClientId, MessagePushError, MessagePusher, PusherChannel};

use super::error::ConnectError;

/// クライアント接続のユースケース
///
/// マッチメイキング状態には触れない。待機キューへの参加は接続後に
/// join イベントで行われるため、ここではレジストリ登録のみを扱う。
pub struct ConnectClientUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// クライアント接続を実行
    ///
    /// # Arguments
    ///
    /// * `client_id` - 接続するクライアントの ID（Domain Model）
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 接続成功
    /// * `Err(ConnectError)` - 同一 ID が既に接続中
    pub async fn execute(
        &self,
        client_id: ClientId,
        sender: PusherChannel,
    ) -> Result<(), ConnectError> {
        match self
            .message_pusher
            .register_client(client_id.clone(), sender)
            .await
        {
            Ok(()) => Ok(()),
            Err(MessagePushError::DuplicateClient(id)) => {
                Err(ConnectError::DuplicateClientId(id))
            }
            // register_client は重複以外のエラーを返さない
            Err(e) => {
                tracing::error!("Unexpected register_client error: {}", e);
                Err(ConnectError::DuplicateClientId(
                    client_id.as_str().to_string(),
                ))
            }
        }
    }

    /// 接続中の全クライアントにイベントをブロードキャスト（user_count_update 用）
    pub async fn broadcast_to_all(&self, message: &str) -> Result<(), String> {
        let targets = self.message_pusher.connected_clients().await;
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }

    /// 接続中のクライアント数を取得
    pub async fn connected_count(&self) -> usize {
        self.message_pusher.connected_count().await
    }
}
