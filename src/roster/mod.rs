//! 参加者名簿の読み込み
//!
//! 1行目をヘッダーとして `Name` 列と `Email` 列を探し、2行目以降を参加者として読む。
//! 列名は大文字小文字を区別する。

mod cell;

use crate::error::{CertMailerError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use cert_mailer_common::Participant;
use std::path::Path;

pub const NAME_COLUMN: &str = "Name";
pub const EMAIL_COLUMN: &str = "Email";

const ROSTER_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// 名簿ファイルを読み込む
///
/// `sheet` 省略時は先頭シート。必須列がなければ `MissingColumn`。
pub fn load_roster(path: &Path, sheet: Option<&str>) -> Result<Vec<Participant>> {
    if !path.is_file() {
        return Err(CertMailerError::FileNotFound(path.display().to_string()));
    }

    let supported = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .map(|e| ROSTER_EXTENSIONS.contains(&e.as_str()))
        .unwrap_or(false);
    if !supported {
        return Err(CertMailerError::Spreadsheet(format!(
            "未対応の形式です: {}（{}）",
            path.display(),
            ROSTER_EXTENSIONS.join(", ")
        )));
    }

    let mut workbook = open_workbook_auto(path)?;

    let range = match sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|s| s == name) {
                return Err(CertMailerError::SheetNotFound(name.to_string()));
            }
            workbook.worksheet_range(name)?
        }
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| CertMailerError::EmptySheet(path.display().to_string()))??,
    };

    participants_from_range(&range, &path.display().to_string())
}

/// シート範囲から参加者を抽出
pub fn participants_from_range(range: &Range<Data>, source: &str) -> Result<Vec<Participant>> {
    // 範囲はデータのある最初のセルから始まる
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| CertMailerError::EmptySheet(source.to_string()))?;

    let name_col = find_column(header, NAME_COLUMN)?;
    let email_col = find_column(header, EMAIL_COLUMN)?;

    let mut participants = Vec::new();
    for (offset, row) in rows.enumerate() {
        if row.iter().all(cell::is_blank) {
            continue;
        }

        let name = row.get(name_col).map(cell::to_text).unwrap_or_default();
        let email = row.get(email_col).map(cell::to_text).unwrap_or_default();

        participants.push(Participant {
            // ヘッダー行の次から、1始まり
            row: first_row + offset + 2,
            name,
            email: email.trim().to_string(),
        });
    }

    Ok(participants)
}

fn find_column(header: &[Data], column: &str) -> Result<usize> {
    header
        .iter()
        .position(|c| matches!(c, Data::String(s) if s == column))
        .ok_or_else(|| CertMailerError::MissingColumn(column.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_of(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), value);
            }
        }
        range
    }

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn test_participants_from_range() {
        let range = range_of(vec![
            vec![s("Email"), s("Name"), s("Team")],
            vec![s(" ann@example.com "), s("Ann Lee"), s("A")],
            vec![s("bob@example.com"), s("Bob  Ray"), s("B")],
        ]);

        let participants = participants_from_range(&range, "test").unwrap();
        assert_eq!(participants.len(), 2);
        assert_eq!(participants[0].row, 2);
        assert_eq!(participants[0].name, "Ann Lee");
        assert_eq!(participants[0].email, "ann@example.com");
        // 名前はそのまま（空白の正規化は照合側）
        assert_eq!(participants[1].name, "Bob  Ray");
        assert_eq!(participants[1].row, 3);
    }

    #[test]
    fn test_missing_email_column() {
        let range = range_of(vec![vec![s("Name"), s("Mail")], vec![s("Ann"), s("a@x.org")]]);
        let err = participants_from_range(&range, "test").unwrap_err();
        assert!(matches!(err, CertMailerError::MissingColumn(ref c) if c == "Email"));
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        let range = range_of(vec![vec![s("name"), s("Email")]]);
        let err = participants_from_range(&range, "test").unwrap_err();
        assert!(matches!(err, CertMailerError::MissingColumn(ref c) if c == "Name"));
    }

    #[test]
    fn test_blank_rows_are_dropped() {
        let range = range_of(vec![
            vec![s("Name"), s("Email")],
            vec![Data::Empty, Data::Empty],
            vec![s("Cy"), Data::Empty],
        ]);

        let participants = participants_from_range(&range, "test").unwrap();
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].name, "Cy");
        assert_eq!(participants[0].email, "");
        assert_eq!(participants[0].row, 3);
    }

    #[test]
    fn test_empty_range() {
        let range: Range<Data> = Range::empty();
        let err = participants_from_range(&range, "test").unwrap_err();
        assert!(matches!(err, CertMailerError::EmptySheet(_)));
    }

    #[test]
    fn test_load_roster_missing_file() {
        let err = load_roster(Path::new("/nonexistent/roster.xlsx"), None).unwrap_err();
        assert!(matches!(err, CertMailerError::FileNotFound(_)));
    }

    #[test]
    fn test_load_roster_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        std::fs::write(&path, "Name,Email\n").unwrap();
        let err = load_roster(&path, None).unwrap_err();
        assert!(matches!(err, CertMailerError::Spreadsheet(_)));
    }
}
