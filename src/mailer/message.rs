//! 修了証メールの組み立て（multipart/mixed: 本文 + 添付1件）

use super::{CertificateMail, MailError};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::{Address, Message};
use std::path::Path;

const NAME_PLACEHOLDER: &str = "{name}";

/// 拡張子 → Content-Type
const ATTACHMENT_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
];

const FALLBACK_TYPE: &str = "application/octet-stream";

/// 本文の `{name}` を参加者名に置換
pub fn render_body(template: &str, name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, name)
}

pub fn content_type_for(file_name: &str) -> Result<ContentType, MailError> {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let mime = ATTACHMENT_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, m)| *m)
        .unwrap_or(FALLBACK_TYPE);

    ContentType::parse(mime).map_err(|e| MailError::Build(e.to_string()))
}

pub fn mailbox(email: &str, name: Option<&str>) -> Result<Mailbox, MailError> {
    let address: Address = email
        .parse()
        .map_err(|e| MailError::InvalidAddress(format!("{} ({})", email, e)))?;
    let name = name.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string);
    Ok(Mailbox::new(name, address))
}

pub fn build_message(from: &Mailbox, mail: &CertificateMail) -> Result<Message, MailError> {
    let to = mailbox(&mail.recipient_email, Some(&mail.recipient_name))?;
    let content_type = content_type_for(&mail.attachment_name)?;

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(mail.subject.clone())
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(mail.body.clone()))
                .singlepart(
                    Attachment::new(mail.attachment_name.clone())
                        .body(mail.attachment.clone(), content_type),
                ),
        )
        .map_err(|e| MailError::Build(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail(email: &str) -> CertificateMail {
        CertificateMail {
            recipient_name: "Ann Lee".into(),
            recipient_email: email.into(),
            subject: "Participation Certificate".into(),
            body: render_body("Dear {name},", "Ann Lee"),
            attachment: b"%PDF-1.4 dummy".to_vec(),
            attachment_name: "Ann_Lee.pdf".into(),
        }
    }

    #[test]
    fn test_render_body() {
        assert_eq!(render_body("Dear {name}, hi {name}", "Bo"), "Dear Bo, hi Bo");
        assert_eq!(render_body("No placeholder", "Bo"), "No placeholder");
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.PDF").unwrap(), ContentType::parse("application/pdf").unwrap());
        assert_eq!(content_type_for("a.jpeg").unwrap(), ContentType::parse("image/jpeg").unwrap());
        assert_eq!(
            content_type_for("README").unwrap(),
            ContentType::parse("application/octet-stream").unwrap()
        );
    }

    #[test]
    fn test_mailbox_invalid_address() {
        let err = mailbox("not-an-address", None).unwrap_err();
        assert!(matches!(err, MailError::InvalidAddress(_)));
    }

    #[test]
    fn test_build_message_has_attachment() {
        let from = mailbox("events@example.com", Some("Events")).unwrap();
        let message = build_message(&from, &mail("ann@example.com")).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(raw.contains("ann@example.com"));
        assert!(raw.contains("events@example.com"));
        assert!(raw.contains("Subject: Participation Certificate"));
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("application/pdf"));
        assert!(raw.contains("Ann_Lee.pdf"));
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let from = mailbox("events@example.com", None).unwrap();
        let err = build_message(&from, &mail("ann at example")).unwrap_err();
        assert!(matches!(err, MailError::InvalidAddress(_)));
    }
}
