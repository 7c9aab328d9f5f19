pub mod excel;

use crate::error::{CertMailerError, Result};
use cert_mailer_common::SendReport;
use std::path::Path;

/// 送信レポートを出力（拡張子で形式を判定: .json / .xlsx）
pub fn export_report(report: &SendReport, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    match ext.as_str() {
        "json" => report.save_json(path)?,
        "xlsx" => excel::generate_excel(report, path)?,
        _ => return Err(CertMailerError::UnsupportedReportFormat(path.display().to_string())),
    }

    Ok(())
}

/// 集計を表示
pub fn print_summary(report: &SendReport) {
    println!("結果:");
    println!("  送信済み: {}", report.sent_count());
    println!("  スキップ: {}", report.skipped_count());
    println!("  失敗: {}", report.failed_count());
    if report.not_attempted_count() > 0 {
        println!("  未送信: {}", report.not_attempted_count());
    }
    if let Some(reason) = &report.aborted {
        println!("  ⚠ 中断: {}", reason);
    }
}
