//! SMTP送信（lettre）
//!
//! 接続は1本だけプールし、バッチ全体で使い回す。`SmtpMailer` の破棄で切断される。

use super::message::{build_message, mailbox};
use super::{CertificateMail, MailError, Mailer};
use crate::config::MailSettings;
use cert_mailer_common::TlsMode;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::PoolConfig;
use lettre::{SmtpTransport, Transport};

/// 認証失敗を示す応答コード
const AUTH_FAILURE_CODES: &[&str] = &["530", "534", "535"];

pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &MailSettings) -> Result<Self, MailError> {
        let builder = match settings.tls {
            TlsMode::Starttls => SmtpTransport::starttls_relay(&settings.server)
                .map_err(|e| MailError::Connection(e.to_string()))?,
            TlsMode::Tls => SmtpTransport::relay(&settings.server)
                .map_err(|e| MailError::Connection(e.to_string()))?,
            TlsMode::None => SmtpTransport::builder_dangerous(&settings.server),
        };

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.sender_email.clone(),
                settings.password.clone(),
            ))
            .pool_config(PoolConfig::new().max_size(1))
            .build();

        let from = mailbox(&settings.sender_email, settings.sender_name.as_deref())?;

        Ok(Self { transport, from })
    }
}

impl Mailer for SmtpMailer {
    fn verify(&mut self) -> Result<(), MailError> {
        match self.transport.test_connection() {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailError::Connection("サーバが応答しません".into())),
            Err(e) => Err(classify(&e)),
        }
    }

    fn send(&mut self, mail: &CertificateMail) -> Result<(), MailError> {
        let message = build_message(&self.from, mail)?;
        self.transport.send(&message).map(|_| ()).map_err(|e| classify(&e))
    }
}

/// lettre のエラーを接続・認証・個別拒否に分類
fn classify(err: &lettre::transport::smtp::Error) -> MailError {
    let code = err.status().map(|c| c.to_string());
    classify_parts(
        code.as_deref(),
        err.is_transient() || err.is_permanent(),
        err.to_string(),
    )
}

fn classify_parts(code: Option<&str>, is_response: bool, message: String) -> MailError {
    match code {
        Some(c) if AUTH_FAILURE_CODES.contains(&c) => MailError::Auth(message),
        Some(_) if is_response => MailError::Rejected(message),
        _ => MailError::Connection(message),
    }
}
