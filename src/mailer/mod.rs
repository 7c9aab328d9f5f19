//! メール送信
//!
//! - `SmtpMailer`: lettre の同期SMTPトランスポートで送信
//! - `ConsoleMailer`: 送信内容を表示するだけ（ドライラン）

mod console;
pub mod message;
mod smtp;

pub use console::ConsoleMailer;
pub use smtp::SmtpMailer;

use thiserror::Error;

/// 修了証メール1通分
#[derive(Debug, Clone)]
pub struct CertificateMail {
    pub recipient_name: String,
    pub recipient_email: String,
    pub subject: String,
    pub body: String,
    pub attachment: Vec<u8>,
    pub attachment_name: String,
}

/// 送信エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("SMTP接続エラー: {0}")]
    Connection(String),

    #[error("SMTP認証エラー: {0}")]
    Auth(String),

    #[error("宛先アドレスが不正: {0}")]
    InvalidAddress(String),

    #[error("サーバが送信を拒否: {0}")]
    Rejected(String),

    #[error("メール作成エラー: {0}")]
    Build(String),
}

impl MailError {
    /// 接続・認証エラーはバッチ全体を中断する
    pub fn is_fatal(&self) -> bool {
        matches!(self, MailError::Connection(_) | MailError::Auth(_))
    }
}

/// 送信手段
pub trait Mailer {
    /// 接続とログインを確認
    fn verify(&mut self) -> Result<(), MailError> {
        Ok(())
    }

    fn send(&mut self, mail: &CertificateMail) -> Result<(), MailError>;
}

impl<M: Mailer + ?Sized> Mailer for Box<M> {
    fn verify(&mut self) -> Result<(), MailError> {
        (**self).verify()
    }

    fn send(&mut self, mail: &CertificateMail) -> Result<(), MailError> {
        (**self).send(mail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_errors() {
        assert!(MailError::Connection("refused".into()).is_fatal());
        assert!(MailError::Auth("535".into()).is_fatal());
        assert!(!MailError::InvalidAddress("x".into()).is_fatal());
        assert!(!MailError::Rejected("550".into()).is_fatal());
        assert!(!MailError::Build("x".into()).is_fatal());
    }
}
