use crate::error::{CertMailerError, Result};
use cert_mailer_common::TlsMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_SMTP_SERVER: &str = "CERT_MAILER_SMTP_SERVER";
pub const ENV_SMTP_PORT: &str = "CERT_MAILER_SMTP_PORT";
pub const ENV_SENDER_EMAIL: &str = "CERT_MAILER_SENDER_EMAIL";
pub const ENV_SMTP_PASSWORD: &str = "CERT_MAILER_SMTP_PASSWORD";

const DEFAULT_SUBJECT: &str = "Participation Certificate";

const DEFAULT_BODY: &str = "Dear {name},

Thank you for participating in our event. Please find attached your certificate of participation.

Best regards,";

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub smtp_server: String,
    /// 未設定なら暗号化方式の標準ポート
    pub smtp_port: Option<u16>,
    pub tls: TlsMode,
    pub sender_email: Option<String>,
    pub sender_name: Option<String>,
    pub sender_password: Option<String>,
    pub subject: String,
    /// 本文（`{name}` を参加者名に置換）
    pub body: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

// パスワードはログに出さない
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("tls", &self.tls)
            .field("sender_email", &self.sender_email)
            .field("sender_name", &self.sender_name)
            .field("sender_password", &self.sender_password.as_ref().map(|_| "***"))
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    /// 送信しないコマンド用。読み込めなければ警告して既定値を使う
    pub fn load_or_default() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_or_default_from(&path),
            Err(e) => {
                eprintln!("⚠ {}。既定の設定を使用します", e);
                Self::default_config()
            }
        }
    }

    pub fn load_or_default_from(config_path: &Path) -> Self {
        Self::load_from(config_path).unwrap_or_else(|e| {
            eprintln!("⚠ 設定ファイルを読み込めません（既定値を使用）: {}", e);
            Self::default_config()
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CertMailerError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("cert-mailer").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            smtp_server: "smtp.gmail.com".into(),
            smtp_port: None,
            tls: TlsMode::Starttls,
            sender_email: None,
            sender_name: None,
            sender_password: None,
            subject: DEFAULT_SUBJECT.into(),
            body: DEFAULT_BODY.into(),
        }
    }

    pub fn effective_port(&self) -> u16 {
        self.smtp_port.unwrap_or_else(|| self.tls.default_port())
    }
}

/// SMTP接続設定（環境変数と設定ファイルを統合した結果）
#[derive(Clone)]
pub struct MailSettings {
    pub server: String,
    pub port: u16,
    pub tls: TlsMode,
    pub sender_email: String,
    pub sender_name: Option<String>,
    pub password: String,
}

impl std::fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailSettings")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("tls", &self.tls)
            .field("sender_email", &self.sender_email)
            .field("sender_name", &self.sender_name)
            .field("password", &"***")
            .finish()
    }
}

impl MailSettings {
    /// 環境変数を優先して解決
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::resolve(config, |key| std::env::var(key).ok())
    }

    pub fn resolve<F>(config: &Config, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let server = lookup(ENV_SMTP_SERVER).unwrap_or_else(|| config.smtp_server.clone());

        let port = match lookup(ENV_SMTP_PORT) {
            Some(p) => p.trim().parse::<u16>().map_err(|_| {
                CertMailerError::Config(format!("{} が不正です: {}", ENV_SMTP_PORT, p))
            })?,
            None => config.effective_port(),
        };

        let sender_email = lookup(ENV_SENDER_EMAIL)
            .or_else(|| config.sender_email.clone())
            .ok_or(CertMailerError::MissingSender)?;

        let password = lookup(ENV_SMTP_PASSWORD)
            .or_else(|| config.sender_password.clone())
            .ok_or(CertMailerError::MissingPassword)?;

        Ok(Self {
            server,
            port,
            tls: config.tls,
            sender_email,
            sender_name: config.sender_name.clone(),
            password,
        })
    }
}
