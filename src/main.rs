use cert_mailer::{cli, config, error, mailer, report, sender};
use cert_mailer_common::{MatchKind, SendStatus, TlsMode};
use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, MailSettings};
use dialoguer::{Confirm, Password};
use error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use mailer::{ConsoleMailer, Mailer, SmtpMailer};
use sender::{Assignment, CertificateSender, SendOptions};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("\n❌ {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Send { roster, certificates, sheet, subject, unique, dry_run, report: report_path, yes } => {
            println!("📨 cert-mailer - 修了証送信{}\n", if dry_run { " (ドライラン)" } else { "" });

            // ドライランはSMTP設定を使わないため、設定が壊れていても続行する
            let config = if dry_run { Config::load_or_default() } else { Config::load()? };

            // 1. 名簿・修了証フォルダ読み込み
            println!("[1/3] 名簿と修了証フォルダを読み込み中...");
            let options = SendOptions {
                subject: subject.unwrap_or_else(|| config.subject.clone()),
                body: config.body.clone(),
                unique,
            };
            let sender = CertificateSender::new(&roster, &certificates, sheet.as_deref(), options)?;
            println!(
                "✔ 参加者 {}名 / 修了証 {}件\n",
                sender.participants().len(),
                sender.candidates().len()
            );

            // 2. 照合
            println!("[2/3] 修了証を照合中...");
            let assignments = sender.plan();
            print_assignments(&assignments, cli.verbose);
            let matched = assignments.iter().filter(|a| a.certificate.is_some()).count();
            println!("✔ {}/{}名の修了証を照合\n", matched, assignments.len());

            if matched == 0 {
                println!("送信対象がありません");
                if let Some(path) = report_path {
                    report::export_report(&sender::plan_report(&assignments), &path)?;
                    println!("✔ 照合結果を保存: {}", path.display());
                }
                return Ok(());
            }

            if !dry_run && !yes {
                let proceed = Confirm::new()
                    .with_prompt(format!("{}名に送信しますか？", matched))
                    .default(false)
                    .interact()?;
                if !proceed {
                    println!("中止しました");
                    return Ok(());
                }
            }

            // 3. 送信
            println!("[3/3] 送信中...");
            let mut mailer: Box<dyn Mailer> = if dry_run {
                Box::new(ConsoleMailer::new(cli.verbose))
            } else {
                let settings = MailSettings::from_config(&config)?;
                if cli.verbose {
                    println!("  SMTP: {}:{} ({})", settings.server, settings.port, settings.tls);
                }
                Box::new(SmtpMailer::new(&settings)?)
            };

            let progress = if dry_run {
                ProgressBar::hidden()
            } else {
                progress_bar(assignments.len() as u64)
            };

            // 非表示のバーは println も出力しないため直接表示する
            let emit = |line: String| {
                if progress.is_hidden() {
                    println!("{}", line);
                } else {
                    progress.println(line);
                }
            };

            let mut send_report = sender.send_all_with(&mut mailer, |outcome| {
                match &outcome.status {
                    SendStatus::Sent => emit(format!(
                        "✔ {} <{}> に送信: {}",
                        outcome.name,
                        outcome.email,
                        outcome.certificate.as_deref().unwrap_or("")
                    )),
                    SendStatus::Skipped(reason) => {
                        emit(format!("⚠ {}: {}。スキップします", outcome.name, reason))
                    }
                    SendStatus::Failed(message) => {
                        emit(format!("✘ {} <{}>: {}", outcome.name, outcome.email, message))
                    }
                    SendStatus::NotAttempted => {}
                }
                progress.inc(1);
            });
            progress.finish_and_clear();
            drop(mailer);

            send_report.generated_at = chrono::Local::now().to_rfc3339();
            send_report.dry_run = dry_run;

            if let Some(path) = report_path {
                report::export_report(&send_report, &path)?;
                println!("✔ レポートを保存: {}", path.display());
            }

            println!();
            report::print_summary(&send_report);

            if let Some(reason) = &send_report.aborted {
                eprintln!("\n❌ 送信を中断しました: {}", reason);
                std::process::exit(1);
            }

            println!("\n✅ 送信完了");
        }

        Commands::Match { roster, certificates, sheet, unique, report: report_path } => {
            println!("🔍 cert-mailer - 修了証照合\n");
            let config = Config::load_or_default();

            let options = SendOptions {
                subject: config.subject.clone(),
                body: config.body.clone(),
                unique,
            };
            let sender = CertificateSender::new(&roster, &certificates, sheet.as_deref(), options)?;
            let assignments = sender.plan();
            print_assignments(&assignments, true);

            let matched = assignments.iter().filter(|a| a.certificate.is_some()).count();
            println!("\n✔ {}/{}名の修了証を照合", matched, assignments.len());

            if let Some(path) = report_path {
                report::export_report(&sender::plan_report(&assignments), &path)?;
                println!("✔ 照合結果を保存: {}", path.display());
            }
        }

        Commands::Check => {
            println!("🔌 cert-mailer - 接続確認\n");
            let config = Config::load()?;
            let settings = MailSettings::from_config(&config)?;
            println!("- {}:{} ({}) に接続中...", settings.server, settings.port, settings.tls);
            let mut mailer = SmtpMailer::new(&settings)?;
            mailer.verify()?;
            println!("✔ 接続・ログインに成功しました ({})", settings.sender_email);
        }

        Commands::Config { set_server, set_port, set_tls, set_sender, set_sender_name, set_password, show } => {
            let mut config = Config::load()?;
            let mut changed = false;

            if let Some(server) = set_server {
                config.smtp_server = server;
                changed = true;
            }
            if let Some(port) = set_port {
                config.smtp_port = Some(port);
                changed = true;
            }
            if let Some(tls) = set_tls {
                config.tls = tls.parse::<TlsMode>()?;
                changed = true;
            }
            if let Some(sender) = set_sender {
                config.sender_email = Some(sender);
                changed = true;
            }
            if let Some(name) = set_sender_name {
                config.sender_name = Some(name);
                changed = true;
            }
            if set_password {
                let password = Password::new()
                    .with_prompt("SMTPパスワード")
                    .interact()?;
                config.sender_password = Some(password);
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  SMTPサーバ: {}", config.smtp_server);
                println!("  ポート: {}", config.effective_port());
                println!("  暗号化: {}", config.tls);
                println!("  送信元: {}", config.sender_email.as_deref().unwrap_or("未設定"));
                println!("  送信者名: {}", config.sender_name.as_deref().unwrap_or("未設定"));
                println!("  パスワード: {}", if config.sender_password.is_some() { "設定済み" } else { "未設定" });
                println!("  件名: {}", config.subject);
            }
        }
    }

    Ok(())
}

fn print_assignments(assignments: &[Assignment], verbose: bool) {
    for a in assignments {
        match (&a.certificate, a.kind) {
            (Some(file), Some(MatchKind::Fuzzy { ratio })) => {
                println!("  ✔ {} → {} (あいまい一致 {:.0}%)", a.participant.name, file, ratio * 100.0)
            }
            (Some(file), _) => {
                if verbose {
                    println!("  ✔ {} → {}", a.participant.name, file);
                }
            }
            (None, _) => println!(
                "  ⚠ {}行目 {}: {}",
                a.participant.row,
                a.participant.name,
                a.skip.map(|r| r.to_string()).unwrap_or_default()
            ),
        }
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let style = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    ProgressBar::new(len).with_style(style)
}
