use crate::error::{CertMailerError, Result};
use cert_mailer_common::CandidateSet;
use std::path::Path;
use walkdir::WalkDir;

/// 修了証フォルダを一度だけ読み込み、ファイル名のスナップショットを作る
///
/// 直下のファイルのみ（再帰しない）。拡張子での絞り込みはせず、ファイル名はそのまま使う。
pub fn scan_certificates(folder: &Path) -> Result<CandidateSet> {
    if !folder.is_dir() {
        return Err(CertMailerError::FolderNotFound(folder.display().to_string()));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)  // 直下のみ（再帰しない）
    {
        // 読み取れないフォルダは空扱いにせずエラーにする
        let entry = entry.map_err(std::io::Error::from)?;

        // シンボリックリンクはリンク先で判定
        if !entry.path().is_file() {
            continue;
        }

        match entry.file_name().to_str() {
            Some(name) => files.push(name.to_string()),
            None => eprintln!(
                "⚠ UTF-8でないファイル名を無視します: {}",
                entry.path().display()
            ),
        }
    }

    // ファイル名でソート
    files.sort();

    Ok(CandidateSet::new(files))
}
