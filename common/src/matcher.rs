//! 修了証ファイル照合モジュール
//!
//! 参加者名から修了証ファイル名を1つ選ぶ。
//!
//! 1. 直接一致: 空白を `_` に置換した名前を含む最初のファイル
//! 2. あいまい一致: 拡張子を除いたファイル名との類似度が最大かつ
//!    閾値（0.7）を厳密に超えるファイル
//!
//! 照合は (名前, 候補一覧) だけで決まる純粋関数で、候補一覧を変更しない。

use crate::similarity;

/// あいまい一致の閾値（この値ちょうどは不採用）
pub const FUZZY_THRESHOLD: f64 = 0.7;

/// 照合段階
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    /// 部分文字列として含まれる
    Direct,
    /// 類似度による一致
    Fuzzy { ratio: f64 },
}

/// 照合結果の詳細
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateMatch<'a> {
    pub file_name: &'a str,
    pub kind: MatchKind,
}

/// 修了証フォルダのスナップショット
///
/// 起動時に一度だけ読み込んだファイル名一覧。順序を保持し、実行中に変化しない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    files: Vec<String>,
}

impl CandidateSet {
    pub fn new(files: Vec<String>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// 参加者名に対応するファイルを探す
    pub fn find(&self, name: &str) -> Option<&str> {
        find_certificate(name, &self.files)
    }
}

impl FromIterator<String> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// 参加者名の正規化（空白 → `_` のみ）
pub fn normalize_name(name: &str) -> String {
    name.replace(' ', "_")
}

/// 拡張子を除いたファイル名
///
/// 最後の `.` より前を返す。先頭のドット（`.hidden` など）は拡張子区切りとみなさない。
pub fn file_stem(file_name: &str) -> &str {
    let leading_dots = file_name.len() - file_name.trim_start_matches('.').len();
    match file_name[leading_dots..].rfind('.') {
        Some(pos) => &file_name[..leading_dots + pos],
        None => file_name,
    }
}

/// 参加者名に対応する修了証ファイル名を返す
pub fn find_certificate<'a>(name: &str, candidates: &'a [String]) -> Option<&'a str> {
    find_certificate_detailed(name, candidates).map(|m| m.file_name)
}

/// 照合段階と類似度つきで修了証ファイル名を返す
pub fn find_certificate_detailed<'a>(
    name: &str,
    candidates: &'a [String],
) -> Option<CertificateMatch<'a>> {
    let normalized = normalize_name(name);

    // 直接一致: 一覧順で最初のもの（より具体的な後方の一致は優先しない）
    if let Some(direct) = candidates
        .iter()
        .find(|f| f.contains(normalized.as_str()) || f.starts_with(normalized.as_str()))
    {
        return Some(CertificateMatch {
            file_name: direct,
            kind: MatchKind::Direct,
        });
    }

    // あいまい一致: 同率なら先に見つかったものを維持
    let mut best: Option<(&'a str, f64)> = None;
    let mut best_ratio = 0.0;
    for file_name in candidates {
        let ratio = similarity::ratio(&normalized, file_stem(file_name));
        if ratio > best_ratio && ratio > FUZZY_THRESHOLD {
            best = Some((file_name, ratio));
            best_ratio = ratio;
        }
    }

    best.map(|(file_name, ratio)| CertificateMatch {
        file_name,
        kind: MatchKind::Fuzzy { ratio },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("John Smith"), "John_Smith");
        assert_eq!(normalize_name(" Mary  Ann "), "_Mary__Ann_");
        assert_eq!(normalize_name("Already_Joined"), "Already_Joined");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("John_Smith.pdf"), "John_Smith");
        assert_eq!(file_stem("archive.tar.gz"), "archive.tar");
        assert_eq!(file_stem("README"), "README");
        assert_eq!(file_stem(".hidden"), ".hidden");
        assert_eq!(file_stem("..cert.png"), "..cert");
        assert_eq!(file_stem("trailing."), "trailing");
    }

    #[test]
    fn test_direct_substring_match() {
        let c = files(&["John_Smith_cert.pdf"]);
        assert_eq!(find_certificate("John Smith", &c), Some("John_Smith_cert.pdf"));
    }

    #[test]
    fn test_direct_match_is_case_sensitive() {
        // 大文字小文字は区別し、類似度も 16/25 で閾値以下
        let c = files(&["john_smith_cert.pdf"]);
        assert_eq!(find_certificate("John Smith", &c), None);
    }

    #[test]
    fn test_direct_match_prefers_listing_order() {
        let c = files(&["cert_Ann_Lee_2023.pdf", "Ann_Lee.pdf"]);
        assert_eq!(find_certificate("Ann Lee", &c), Some("cert_Ann_Lee_2023.pdf"));
    }

    #[test]
    fn test_direct_match_wins_over_closer_fuzzy() {
        let c = files(&["Jon_Smyth.pdf", "x_Jon_Smit_y.pdf"]);
        assert_eq!(find_certificate("Jon Smit", &c), Some("x_Jon_Smit_y.pdf"));
    }

    #[test]
    fn test_fuzzy_match_above_threshold() {
        let c = files(&["John_Smith.pdf"]);
        let m = find_certificate_detailed("Jon Smyth", &c).unwrap();
        assert_eq!(m.file_name, "John_Smith.pdf");
        match m.kind {
            MatchKind::Fuzzy { ratio } => assert!((ratio - 16.0 / 19.0).abs() < 1e-12),
            MatchKind::Direct => panic!("直接一致になってはいけない"),
        }
    }

    #[test]
    fn test_no_match_below_threshold() {
        let c = files(&["bob.pdf", "carol.pdf"]);
        assert_eq!(find_certificate("Alice", &c), None);
    }

    #[test]
    fn test_exact_threshold_is_rejected() {
        let c = files(&["abcdefgxyz.pdf"]);
        assert_eq!(find_certificate("abcdefghij", &c), None);
    }

    #[test]
    fn test_empty_candidates() {
        assert_eq!(find_certificate("Anyone", &[]), None);
        assert_eq!(find_certificate("", &[]), None);
    }

    #[test]
    fn test_fuzzy_tie_keeps_first() {
        // 両方とも類似度 0.9
        let c = files(&["abcdefghiX.pdf", "abcdefghiY.pdf"]);
        assert_eq!(find_certificate("abcdefghij", &c), Some("abcdefghiX.pdf"));
    }

    #[test]
    fn test_fuzzy_prefers_higher_ratio_later() {
        let c = files(&["abcdefghXY.pdf", "abcdefghiX.pdf"]);
        assert_eq!(find_certificate("abcdefghij", &c), Some("abcdefghiX.pdf"));
    }

    #[test]
    fn test_deterministic() {
        let c = files(&["Jane_Doe.pdf", "Jane_Dough.png", "J_Doe.pdf"]);
        let first = find_certificate("Jane Do", &c);
        for _ in 0..10 {
            assert_eq!(find_certificate("Jane Do", &c), first);
        }
    }

    #[test]
    fn test_candidate_set_find() {
        let set: CandidateSet = vec!["Ann_Lee.pdf".to_string()].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert_eq!(set.find("Ann Lee"), Some("Ann_Lee.pdf"));
        assert_eq!(set.files(), &["Ann_Lee.pdf".to_string()]);
    }
}
