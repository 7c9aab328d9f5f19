//! 修了証一括送信
//!
//! 名簿の各参加者について修了証を照合し、見つかれば添付して送信する。
//! - 照合できない参加者はスキップして続行
//! - 接続・認証エラーはバッチ全体を中断し、残りは未送信として記録
//! - 添付の読み込み失敗や宛先不正はその参加者のみ失敗扱いで続行

use crate::error::Result;
use crate::mailer::message::render_body;
use crate::mailer::{CertificateMail, Mailer};
use crate::{roster, scanner};
use cert_mailer_common::matcher::{find_certificate_detailed, MatchKind};
use cert_mailer_common::{
    CandidateSet, Participant, RecipientOutcome, SendReport, SendStatus, SkipReason,
};
use std::path::{Path, PathBuf};

/// 送信オプション
#[derive(Debug, Clone)]
pub struct SendOptions {
    pub subject: String,
    /// 本文（`{name}` を参加者名に置換）
    pub body: String,
    /// 一度割り当てた修了証を以降の照合候補から外す
    pub unique: bool,
}

/// 参加者ごとの割り当て
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub participant: Participant,
    pub certificate: Option<String>,
    /// 照合段階（見つからなかった場合は None）
    pub kind: Option<MatchKind>,
    pub skip: Option<SkipReason>,
}

pub struct CertificateSender {
    participants: Vec<Participant>,
    certificates_folder: PathBuf,
    candidates: CandidateSet,
    options: SendOptions,
}

impl CertificateSender {
    /// 名簿を読み込み、修了証フォルダのスナップショットを取る
    pub fn new(
        roster_path: &Path,
        certificates_folder: &Path,
        sheet: Option<&str>,
        options: SendOptions,
    ) -> Result<Self> {
        let participants = roster::load_roster(roster_path, sheet)?;
        let candidates = scanner::scan_certificates(certificates_folder)?;

        Ok(Self::from_parts(
            participants,
            certificates_folder.to_path_buf(),
            candidates,
            options,
        ))
    }

    pub fn from_parts(
        participants: Vec<Participant>,
        certificates_folder: PathBuf,
        candidates: CandidateSet,
        options: SendOptions,
    ) -> Self {
        Self {
            participants,
            certificates_folder,
            candidates,
            options,
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    /// 全参加者の割り当てを計算（送信はしない）
    pub fn plan(&self) -> Vec<Assignment> {
        // unique モードでは割り当て済みを除いた残りを照合対象にする
        let mut remaining: Vec<String> = self.candidates.files().to_vec();

        self.participants
            .iter()
            .map(|p| {
                if p.name.trim().is_empty() {
                    return Assignment::skipped(p, SkipReason::MissingName);
                }
                if p.email.is_empty() {
                    return Assignment::skipped(p, SkipReason::MissingEmail);
                }

                let found = if self.options.unique {
                    find_certificate_detailed(&p.name, &remaining)
                } else {
                    find_certificate_detailed(&p.name, self.candidates.files())
                }
                .map(|m| (m.file_name.to_string(), m.kind));

                match found {
                    Some((file_name, kind)) => {
                        if self.options.unique {
                            remaining.retain(|f| f != &file_name);
                        }
                        Assignment {
                            participant: p.clone(),
                            certificate: Some(file_name),
                            kind: Some(kind),
                            skip: None,
                        }
                    }
                    None => Assignment::skipped(p, SkipReason::NoCertificate),
                }
            })
            .collect()
    }

    pub fn send_all<M: Mailer + ?Sized>(&self, mailer: &mut M) -> SendReport {
        self.send_all_with(mailer, |_| {})
    }

    /// 全参加者に送信し、1件ごとに `on_outcome` を呼ぶ
    pub fn send_all_with<M, F>(&self, mailer: &mut M, mut on_outcome: F) -> SendReport
    where
        M: Mailer + ?Sized,
        F: FnMut(&RecipientOutcome),
    {
        let mut report = SendReport::default();

        // 送信前に接続・ログインを確認（失敗時は1通も送らない）
        if let Err(e) = mailer.verify() {
            report.aborted = Some(e.to_string());
        }

        for assignment in self.plan() {
            let status = match (&assignment.certificate, assignment.skip) {
                // スキップは中断後もスキップとして記録
                (None, reason) => SendStatus::Skipped(reason.unwrap_or(SkipReason::NoCertificate)),
                // 中断後の残りは未送信
                _ if report.is_aborted() => SendStatus::NotAttempted,
                (Some(file_name), _) => {
                    match self.deliver(mailer, &assignment.participant, file_name) {
                        Ok(()) => SendStatus::Sent,
                        Err(DeliveryError::Fatal(reason)) => {
                            report.aborted = Some(reason.clone());
                            SendStatus::Failed(reason)
                        }
                        Err(DeliveryError::Recipient(reason)) => SendStatus::Failed(reason),
                    }
                }
            };

            let outcome =
                RecipientOutcome::new(&assignment.participant, assignment.certificate, status);
            on_outcome(&outcome);
            report.outcomes.push(outcome);
        }

        report
    }

    fn deliver<M: Mailer + ?Sized>(
        &self,
        mailer: &mut M,
        participant: &Participant,
        file_name: &str,
    ) -> std::result::Result<(), DeliveryError> {
        let path = self.certificates_folder.join(file_name);
        let attachment = std::fs::read(&path).map_err(|e| {
            DeliveryError::Recipient(format!("添付ファイルを読み込めません: {} ({})", path.display(), e))
        })?;

        let mail = CertificateMail {
            recipient_name: participant.name.clone(),
            recipient_email: participant.email.clone(),
            subject: self.options.subject.clone(),
            body: render_body(&self.options.body, &participant.name),
            attachment,
            attachment_name: file_name.to_string(),
        };

        mailer.send(&mail).map_err(|e| {
            if e.is_fatal() {
                DeliveryError::Fatal(e.to_string())
            } else {
                DeliveryError::Recipient(e.to_string())
            }
        })
    }
}

/// 送信前の照合結果をレポートにまとめる
pub fn plan_report(assignments: &[Assignment]) -> SendReport {
    SendReport {
        generated_at: chrono::Local::now().to_rfc3339(),
        dry_run: true,
        aborted: None,
        outcomes: assignments.iter().map(Assignment::to_outcome).collect(),
    }
}

impl Assignment {
    /// 送信前の照合結果としてのレポート行（照合済みは未送信扱い）
    pub fn to_outcome(&self) -> RecipientOutcome {
        let status = match self.skip {
            Some(reason) => SendStatus::Skipped(reason),
            None => SendStatus::NotAttempted,
        };
        RecipientOutcome::new(&self.participant, self.certificate.clone(), status)
    }

    fn skipped(participant: &Participant, reason: SkipReason) -> Self {
        Self {
            participant: participant.clone(),
            certificate: None,
            kind: None,
            skip: Some(reason),
        }
    }
}

enum DeliveryError {
    /// バッチ全体を中断
    Fatal(String),
    /// この参加者のみ失敗
    Recipient(String),
}
