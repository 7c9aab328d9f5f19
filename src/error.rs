use crate::mailer::MailError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CertMailerError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("送信元アドレスが設定されていません。`cert-mailer config --set-sender YOUR_ADDRESS` で設定してください")]
    MissingSender,

    #[error("SMTPパスワードが設定されていません。環境変数 CERT_MAILER_SMTP_PASSWORD か `cert-mailer config --set-password` で設定してください")]
    MissingPassword,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("名簿に必須列がありません: {0}")]
    MissingColumn(String),

    #[error("名簿の読み込みに失敗: {0}")]
    Spreadsheet(String),

    #[error("名簿が空です: {0}")]
    EmptySheet(String),

    #[error("シートが見つかりません: {0}")]
    SheetNotFound(String),

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error("レポート生成エラー: {0}")]
    ReportGeneration(String),

    #[error("未対応のレポート形式: {0}（.json または .xlsx を指定してください）")]
    UnsupportedReportFormat(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] cert_mailer_common::Error),
}

impl From<calamine::Error> for CertMailerError {
    fn from(e: calamine::Error) -> Self {
        CertMailerError::Spreadsheet(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for CertMailerError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        CertMailerError::ReportGeneration(e.to_string())
    }
}

impl From<dialoguer::Error> for CertMailerError {
    fn from(e: dialoguer::Error) -> Self {
        CertMailerError::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CertMailerError>;
