//! cert-mailer Common Library
//!
//! 修了証照合ロジックと送信結果の共有型

pub mod error;
pub mod matcher;
pub mod similarity;
pub mod types;

pub use error::{Error, Result};
pub use matcher::{find_certificate, find_certificate_detailed, CandidateSet, CertificateMatch, MatchKind};
pub use types::{Participant, RecipientOutcome, SendReport, SendStatus, SkipReason, TlsMode};
