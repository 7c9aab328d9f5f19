use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cert-mailer")]
#[command(about = "参加者名簿から修了証を照合し、メールで一括送信するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 修了証を照合して送信
    Send {
        /// 参加者名簿（xlsx/xls/ods、Name列とEmail列が必須）
        #[arg(required = true)]
        roster: PathBuf,

        /// 修了証フォルダのパス
        #[arg(required = true)]
        certificates: PathBuf,

        /// シート名（省略時は先頭シート）
        #[arg(long)]
        sheet: Option<String>,

        /// 件名（省略時は設定ファイルの値）
        #[arg(long)]
        subject: Option<String>,

        /// 同じ修了証を複数の参加者に割り当てない
        #[arg(long)]
        unique: bool,

        /// 送信せずに内容を表示
        #[arg(long)]
        dry_run: bool,

        /// 送信レポートの出力先（.json / .xlsx）
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// 確認プロンプトを省略
        #[arg(short, long)]
        yes: bool,
    },

    /// 照合結果のみ表示（送信しない）
    Match {
        /// 参加者名簿
        #[arg(required = true)]
        roster: PathBuf,

        /// 修了証フォルダのパス
        #[arg(required = true)]
        certificates: PathBuf,

        /// シート名（省略時は先頭シート）
        #[arg(long)]
        sheet: Option<String>,

        /// 同じ修了証を複数の参加者に割り当てない
        #[arg(long)]
        unique: bool,

        /// 照合結果の出力先（.json / .xlsx）
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// SMTPサーバへの接続とログインを確認
    Check,

    /// 設定を表示/編集
    Config {
        /// SMTPサーバ
        #[arg(long)]
        set_server: Option<String>,

        /// SMTPポート
        #[arg(long)]
        set_port: Option<u16>,

        /// 暗号化方式 (starttls/tls/none)
        #[arg(long)]
        set_tls: Option<String>,

        /// 送信元アドレス
        #[arg(long)]
        set_sender: Option<String>,

        /// 送信者名
        #[arg(long)]
        set_sender_name: Option<String>,

        /// パスワードを対話入力で設定
        #[arg(long)]
        set_password: bool,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
