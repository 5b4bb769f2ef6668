//! WebSocket イベント DTO
//!
//! ## 入力バリデーション
//!
//! 受信イベントはタグ付き enum へのデシリアライズそのものがバリデーションに
//! なります。必須フィールドの欠落や未知のイベント種別は serde のエラーとして
//! 入口で拒否され、不定値がコアに到達することはありません。
//!
//! ## フィールド命名
//!
//! ワイヤ上のフィールド名はクライアントとの互換のため camelCase です。
//! イベント種別はトップレベルの `type` タグで判別します。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::SessionMode;

/// クライアント → サーバーの受信イベント
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// パートナー探索の開始（chat / video 共通）
    #[serde(rename_all = "camelCase")]
    Join {
        user_id: String,
        mode: SessionMode,
        /// 任意の preference バッグ。受理されるがマッチングには使用されない。
        #[serde(default)]
        preferences: Option<Value>,
    },
    /// video モード join の別表現（モバイルクライアント互換）
    #[serde(rename_all = "camelCase")]
    JoinVideoQueue {
        user_id: String,
        #[serde(default)]
        platform: Option<String>,
    },
    /// チャットメッセージの送信
    #[serde(rename_all = "camelCase")]
    SendMessage { room_id: String, message: String },
    /// タイピングインジケータ
    #[serde(rename_all = "camelCase")]
    Typing { room_id: String, is_typing: bool },
    /// WebRTC offer
    #[serde(rename_all = "camelCase")]
    Offer {
        #[serde(default)]
        room_id: Option<String>,
        payload: Value,
    },
    /// WebRTC answer
    #[serde(rename_all = "camelCase")]
    Answer {
        #[serde(default)]
        room_id: Option<String>,
        payload: Value,
    },
    /// ICE candidate
    #[serde(rename_all = "camelCase")]
    IceCandidate {
        #[serde(default)]
        room_id: Option<String>,
        payload: Value,
    },
    /// 現在のセッションを終了して次のパートナーを探す（video）
    NextPartner,
    /// 明示的な退室（chat）
    #[serde(rename_all = "camelCase")]
    LeaveRoom {
        #[serde(default)]
        room_id: Option<String>,
    },
    /// 明示的な退室（video）
    #[serde(rename_all = "camelCase")]
    LeaveVideo {
        #[serde(default)]
        room_id: Option<String>,
    },
}

/// サーバー → クライアントの送信イベント
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// 待機プールに投入された
    WaitingForPartner,
    /// マッチ成立。video モードでは partner_id は常に null。
    #[serde(rename_all = "camelCase")]
    PartnerFound {
        room_id: String,
        partner_id: Option<String>,
        is_repeat_connection: bool,
    },
    /// 相手が退室・切断し、セッションが終了した
    PartnerDisconnected,
    /// チャットメッセージの転送
    #[serde(rename_all = "camelCase")]
    NewMessage {
        id: String,
        text: String,
        sender: String,
        timestamp: i64,
    },
    /// タイピングインジケータの転送
    #[serde(rename_all = "camelCase")]
    UserTyping { is_typing: bool },
    /// WebRTC offer の転送
    Offer { payload: Value },
    /// WebRTC answer の転送
    Answer { payload: Value },
    /// ICE candidate の転送
    IceCandidate { payload: Value },
    /// 接続中クライアント総数の更新
    #[serde(rename_all = "camelCase")]
    UserCountUpdate { count: usize },
}

impl ServerEvent {
    /// Serialize to the wire format.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("server event is always serializable")
    }
}
