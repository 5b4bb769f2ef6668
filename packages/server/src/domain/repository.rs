//! Repository trait 定義
//!
//! ドメイン層が必要とするマッチメイキング状態（待機プール・接続履歴・
//! セッションテーブル）へのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 単一権限モデル
//!
//! 待機プール・履歴・セッションテーブルへの変更は全てこの trait を経由し、
//! 各メソッドは 1 回のロック取得で完結するアトミックな複合操作です。
//! 2 つの変更操作が部分的に交錯することはありません。

use async_trait::async_trait;
use serde::Serialize;

use super::entity::{ChatMessage, Session};
use super::error::RepositoryError;
use super::value_object::{ClientId, MessageContent, SessionId, SessionMode, Timestamp};

/// join 操作の結果
#[derive(Debug, Clone)]
pub enum JoinOutcome {
    /// パートナーが見つかり、セッションが生成された
    Matched {
        session: Session,
        /// リクエスタから見た相手
        partner: ClientId,
        /// この 2 人が過去にペアになったことがあるか
        repeat: bool,
    },
    /// パートナー不在、待機プールに投入された
    Waiting,
}

/// leave 操作の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// 待機プールから削除されたか
    pub was_waiting: bool,
    /// セッションが終了した場合、その ID と通知すべき相手
    pub ended_session: Option<(SessionId, ClientId)>,
}

impl LeaveOutcome {
    /// 何の状態変化も起きなかったか（冪等な再呼び出し）
    pub fn is_noop(&self) -> bool {
        !self.was_waiting && self.ended_session.is_none()
    }
}

/// next_partner 操作の結果
#[derive(Debug, Clone)]
pub enum NextPartnerOutcome {
    /// video セッション（または video 待機）からの乗り換えが行われた
    Rotated {
        /// 通知すべき旧パートナー
        departed: Option<ClientId>,
        /// 再マッチの結果
        rejoin: JoinOutcome,
    },
    /// 呼び出し元が video モードにいないため、何も起きなかった
    Ignored,
}

/// 統計情報（読み取り専用エンドポイント用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairingStats {
    /// アクティブなセッション数
    pub active_sessions: usize,
    /// chat モードで待機中のクライアント数
    pub waiting_chat: usize,
    /// video モードで待機中のクライアント数
    pub waiting_video: usize,
    /// 累計ペアリング数
    pub total_pairings: u64,
}

/// マッチメイキング状態への Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait PairingRepository: Send + Sync {
    /// パートナー探索 or 待機プール投入をアトミックに実行
    ///
    /// クライアントが既に待機中またはセッション参加中の場合は
    /// `RepositoryError::AlreadyActive` を返す。マッチ成立時は両者の
    /// 待機エントリを削除し、履歴を対称に記録した上でセッションを生成する。
    async fn join(
        &self,
        client_id: ClientId,
        mode: SessionMode,
        now: Timestamp,
    ) -> Result<JoinOutcome, RepositoryError>;

    /// 明示的離脱・切断時のクリーンアップをアトミックに実行（冪等）
    async fn leave(&self, client_id: &ClientId) -> Result<LeaveOutcome, RepositoryError>;

    /// 現在の video セッションを teardown し、同一操作内で待機プールに再投入する
    ///
    /// モードは呼び出し元の現在の状態（セッションまたは待機エントリ）から
    /// 導出される。video モードにいないクライアントからの呼び出しは
    /// `NextPartnerOutcome::Ignored` として吸収され、chat セッションが
    /// 巻き添えで終了することはない。
    /// 「セッション参加中」と「待機中」を同時に観測されることはない。
    async fn next_partner(
        &self,
        client_id: ClientId,
        now: Timestamp,
    ) -> Result<NextPartnerOutcome, RepositoryError>;

    /// チャットメッセージをセッションログに追加し、転送先の相手を解決する
    ///
    /// 送信者がセッションに参加していない場合は `NotInSession` を返す。
    async fn append_chat_message(
        &self,
        sender: ClientId,
        content: MessageContent,
        now: Timestamp,
    ) -> Result<(ChatMessage, ClientId), RepositoryError>;

    /// 送信者のアクティブセッションと相手を解決する（一時的シグナル転送用）
    async fn peer_of(&self, client_id: &ClientId) -> Option<(SessionId, ClientId)>;

    /// 2 者が過去にペアになったことがあるか
    async fn has_paired(&self, a: &ClientId, b: &ClientId) -> bool;

    /// 統計情報を取得
    async fn stats(&self) -> PairingStats;

    /// リテンション期間を超えた接続履歴を削除し、削除件数を返す
    async fn prune_history(&self, now: Timestamp, retention_millis: i64) -> usize;
}
