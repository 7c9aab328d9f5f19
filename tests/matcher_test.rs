//! 修了証照合の統合テスト
//!
//! フォルダのスナップショットと照合ロジックを組み合わせて検証

use cert_mailer::scanner::scan_certificates;
use cert_mailer_common::matcher::{find_certificate, find_certificate_detailed, MatchKind};
use cert_mailer_common::similarity;
use tempfile::tempdir;

fn names(files: &[&str]) -> Vec<String> {
    files.iter().map(|f| f.to_string()).collect()
}

#[test]
fn test_match_against_scanned_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    for f in ["Alice_Wong.pdf", "Bob_Ray.png", "John_Smith_cert.pdf"] {
        std::fs::write(dir.path().join(f), b"x").unwrap();
    }

    let set = scan_certificates(dir.path()).unwrap();
    assert_eq!(set.find("John Smith"), Some("John_Smith_cert.pdf"));
    assert_eq!(set.find("Bob Ray"), Some("Bob_Ray.png"));
    assert_eq!(set.find("Alise Wong"), Some("Alice_Wong.pdf"));
    assert_eq!(set.find("Zed"), None);
}

#[test]
fn test_direct_match_returns_earliest_regardless_of_similarity() {
    let c = names(&["zz_Jane_Doe_zz_old_version.pdf", "Jane_Doe.pdf"]);
    let m = find_certificate_detailed("Jane Doe", &c).unwrap();
    assert_eq!(m.file_name, "zz_Jane_Doe_zz_old_version.pdf");
    assert_eq!(m.kind, MatchKind::Direct);
}

#[test]
fn test_fuzzy_example_ratio() {
    let r = similarity::ratio("Jon_Smyth", "John_Smith");
    assert!(r > 0.7);
    assert_eq!(find_certificate("Jon Smyth", &names(&["John_Smith.pdf"])), Some("John_Smith.pdf"));
}

#[test]
fn test_no_match_for_unrelated_names() {
    assert_eq!(find_certificate("Alice", &names(&["bob.pdf", "carol.pdf"])), None);
}

#[test]
fn test_threshold_boundary() {
    // 14/20 = 0.7 ちょうど → 不採用
    let exact = names(&["abcdefgxyz.pdf"]);
    assert_eq!(similarity::ratio("abcdefghij", "abcdefgxyz"), 0.7);
    assert_eq!(find_certificate("abcdefghij", &exact), None);

    // 16/20 = 0.8 → 採用
    let above = names(&["abcdefghyz.pdf"]);
    assert_eq!(find_certificate("abcdefghij", &above), Some("abcdefghyz.pdf"));
}

#[test]
fn test_extension_is_not_compared() {
    // 拡張子を除いた "abcdefghi" と比較（18/19）
    let c = names(&["abcdefghi.verylongextension"]);
    assert_eq!(find_certificate("abcdefghij", &c), Some("abcdefghi.verylongextension"));
}

#[test]
fn test_empty_candidate_set() {
    for name in ["", "Anyone", "John Smith"] {
        assert_eq!(find_certificate(name, &[]), None);
    }
}

#[test]
fn test_repeated_calls_are_identical() {
    let c = names(&["Jane_Doe.pdf", "Jane_Dough.png", "J_Doe.pdf", "Janet_Do.pdf"]);
    let expected = find_certificate_detailed("Jane Dow", &c);
    for _ in 0..20 {
        assert_eq!(find_certificate_detailed("Jane Dow", &c), expected);
    }
    // 入力は変化しない
    assert_eq!(c.len(), 4);
}
