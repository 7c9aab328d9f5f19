//! ドライラン用: 送信内容を表示するだけで接続しない

use super::message::mailbox;
use super::{CertificateMail, MailError, Mailer};

#[derive(Debug, Default)]
pub struct ConsoleMailer {
    verbose: bool,
    sent: usize,
}

impl ConsoleMailer {
    pub fn new(verbose: bool) -> Self {
        Self { verbose, sent: 0 }
    }

    /// 表示した件数
    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl Mailer for ConsoleMailer {
    fn send(&mut self, mail: &CertificateMail) -> Result<(), MailError> {
        // 実送信と同じく宛先の形式だけは確認する
        mailbox(&mail.recipient_email, Some(&mail.recipient_name))?;

        println!(
            "  [dry-run] {} <{}> ← {} ({} bytes)",
            mail.recipient_name,
            mail.recipient_email,
            mail.attachment_name,
            mail.attachment.len()
        );
        if self.verbose {
            println!("    件名: {}", mail.subject);
            for line in mail.body.lines() {
                println!("    | {}", line);
            }
        }

        self.sent += 1;
        Ok(())
    }
}
