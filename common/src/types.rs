//! 送信処理の型定義
//!
//! CLI以外のフロントエンドからも使う型（I/Oはレポートの保存・読み込みのみ）:
//! - TlsMode: SMTP接続の暗号化方式
//! - Participant: 名簿の1行
//! - RecipientOutcome: 参加者ごとの送信結果
//! - SendReport: バッチ全体の結果

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// SMTP接続の暗号化方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// 平文で接続後にSTARTTLS（既定、587番）
    #[default]
    Starttls,
    /// 最初からTLS（465番）
    Tls,
    /// 暗号化なし（ローカルの中継サーバ向け）
    None,
}

impl TlsMode {
    /// 方式ごとの標準ポート
    pub fn default_port(&self) -> u16 {
        match self {
            TlsMode::Starttls => 587,
            TlsMode::Tls => 465,
            TlsMode::None => 25,
        }
    }
}

impl std::str::FromStr for TlsMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "starttls" => Ok(TlsMode::Starttls),
            "tls" | "ssl" | "smtps" => Ok(TlsMode::Tls),
            "none" | "plain" => Ok(TlsMode::None),
            _ => Err(Error::Config(format!(
                "不明なTLSモード: {}。starttls, tls, none のいずれかを指定してください",
                s
            ))),
        }
    }
}

impl std::fmt::Display for TlsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TlsMode::Starttls => write!(f, "starttls"),
            TlsMode::Tls => write!(f, "tls"),
            TlsMode::None => write!(f, "none"),
        }
    }
}

/// 参加者（名簿の1行）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// 名簿上の行番号（1始まり、ヘッダー行を含む）
    pub row: usize,
    pub name: String,
    pub email: String,
}

/// スキップ理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// 修了証ファイルが見つからない
    NoCertificate,
    /// 名前が空
    MissingName,
    /// メールアドレスが空
    MissingEmail,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoCertificate => write!(f, "修了証が見つかりません"),
            SkipReason::MissingName => write!(f, "名前が空です"),
            SkipReason::MissingEmail => write!(f, "メールアドレスが空です"),
        }
    }
}

/// 参加者ごとの送信状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "camelCase")]
pub enum SendStatus {
    Sent,
    Skipped(SkipReason),
    /// 個別の失敗（宛先不正・添付読み込み失敗など）。バッチは継続
    Failed(String),
    /// 致命的エラーでバッチが中断したため未処理
    NotAttempted,
}

impl SendStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SendStatus::Sent => "送信済み",
            SendStatus::Skipped(_) => "スキップ",
            SendStatus::Failed(_) => "失敗",
            SendStatus::NotAttempted => "未送信",
        }
    }
}

/// 参加者ごとの結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientOutcome {
    pub row: usize,
    pub name: String,
    pub email: String,
    /// 照合された修了証ファイル名
    #[serde(default)]
    pub certificate: Option<String>,
    pub status: SendStatus,
}

impl RecipientOutcome {
    pub fn new(participant: &Participant, certificate: Option<String>, status: SendStatus) -> Self {
        Self {
            row: participant.row,
            name: participant.name.clone(),
            email: participant.email.clone(),
            certificate,
            status,
        }
    }
}

/// バッチ全体の送信レポート
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReport {
    /// 作成日時（RFC 3339）
    #[serde(default)]
    pub generated_at: String,
    /// ドライラン（実際には送信していない）
    #[serde(default)]
    pub dry_run: bool,
    /// 中断理由（致命的エラー時のみ）
    #[serde(default)]
    pub aborted: Option<String>,
    pub outcomes: Vec<RecipientOutcome>,
}

impl SendReport {
    fn count(&self, pred: impl Fn(&SendStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    pub fn sent_count(&self) -> usize {
        self.count(|s| matches!(s, SendStatus::Sent))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|s| matches!(s, SendStatus::Skipped(_)))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|s| matches!(s, SendStatus::Failed(_)))
    }

    pub fn not_attempted_count(&self) -> usize {
        self.count(|s| matches!(s, SendStatus::NotAttempted))
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    /// JSONで保存
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// JSONから読み込み
    pub fn load_json(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
