//! 送信レポートのExcel出力

use crate::error::Result;
use cert_mailer_common::{SendReport, SendStatus};
use rust_xlsxwriter::{Format, FormatBorder, Workbook};
use std::path::Path;

const HEADERS: &[(&str, f64)] = &[
    ("行", 6.0),
    ("氏名", 24.0),
    ("メールアドレス", 32.0),
    ("修了証", 32.0),
    ("状態", 10.0),
    ("詳細", 48.0),
];

pub fn generate_excel(report: &SendReport, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold().set_border(FormatBorder::Thin);
    let cell_format = Format::new().set_border(FormatBorder::Thin);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("送信結果")?;

    for (col, (title, width)) in HEADERS.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, *width)?;
        worksheet.write_string_with_format(0, col, *title, &header_format)?;
    }

    for (i, outcome) in report.outcomes.iter().enumerate() {
        let row = (i + 1) as u32;
        let detail = match &outcome.status {
            SendStatus::Skipped(reason) => reason.to_string(),
            SendStatus::Failed(message) => message.clone(),
            SendStatus::Sent | SendStatus::NotAttempted => String::new(),
        };

        worksheet.write_number_with_format(row, 0, outcome.row as f64, &cell_format)?;
        worksheet.write_string_with_format(row, 1, &outcome.name, &cell_format)?;
        worksheet.write_string_with_format(row, 2, &outcome.email, &cell_format)?;
        worksheet.write_string_with_format(
            row,
            3,
            outcome.certificate.as_deref().unwrap_or(""),
            &cell_format,
        )?;
        worksheet.write_string_with_format(row, 4, outcome.status.label(), &cell_format)?;
        worksheet.write_string_with_format(row, 5, &detail, &cell_format)?;
    }

    // 集計・中断理由は末尾に
    let mut row = report.outcomes.len() as u32 + 2;
    if let Some(reason) = &report.aborted {
        worksheet.write_string(row, 0, "中断")?;
        worksheet.write_string(row, 1, reason)?;
        row += 1;
    }
    if report.dry_run {
        worksheet.write_string(row, 0, "ドライラン")?;
        row += 1;
    }
    if !report.generated_at.is_empty() {
        worksheet.write_string(row, 0, "作成日時")?;
        worksheet.write_string(row, 1, &report.generated_at)?;
    }

    workbook.save(output_path)?;
    Ok(())
}
