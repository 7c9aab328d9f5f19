//! 文字列類似度（最長一致ブロック方式）
//!
//! 2つの文字列の最長共通ブロックを見つけ、その左右の残りに対して
//! 再帰的に同じ処理を行う。一致した文字数の合計 M から
//! `2 * M / (len(a) + len(b))` を類似度とする。

use std::collections::HashMap;

/// 人気要素（出現頻度の高い文字）を索引から外す判定を行う最小長
const AUTOJUNK_MIN_LEN: usize = 200;

/// 一致ブロック
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
    /// a 側の開始位置（文字単位）
    pub a_start: usize,
    /// b 側の開始位置（文字単位）
    pub b_start: usize,
    pub size: usize,
}

/// 比較器
///
/// `b` 側の文字位置索引を一度だけ構築し、一致ブロック探索で使い回す。
struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    fn new(a: &str, b: &str) -> Self {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        // 長い文字列では頻出文字を索引から除外
        let n = b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let limit = n / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b2j }
    }

    /// a[alo..ahi] と b[blo..bhi] の最長一致ブロックを探す
    ///
    /// 同じ長さの候補が複数ある場合は a 側で最も早いもの、
    /// さらに同じなら b 側で最も早いものを返す。
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchingBlock {
        let mut best_i = alo;
        let mut best_j = blo;
        let mut best_size = 0;

        // j2len[j] = a[i-1] と b[j] で終わる一致の長さ
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut new_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = if j > 0 {
                        j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                    } else {
                        1
                    };
                    new_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        // 索引から外した頻出文字でも、両側で一致していれば延長する
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        MatchingBlock {
            a_start: best_i,
            b_start: best_j,
            size: best_size,
        }
    }

    fn matching_blocks(&self) -> Vec<MatchingBlock> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            let (i, j, k) = (block.a_start, block.b_start, block.size);
            blocks.push(block);
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        blocks.sort_by_key(|b| (b.a_start, b.b_start));
        blocks
    }
}

/// 一致ブロック一覧（位置順）
pub fn matching_blocks(a: &str, b: &str) -> Vec<MatchingBlock> {
    SequenceMatcher::new(a, b).matching_blocks()
}

/// 類似度を計算（0.0〜1.0）
///
/// 両方が空文字列の場合は 1.0。
pub fn ratio(a: &str, b: &str) -> f64 {
    let matcher = SequenceMatcher::new(a, b);
    let total = matcher.a.len() + matcher.b.len();
    if total == 0 {
        return 1.0;
    }

    let matches: usize = matcher.matching_blocks().iter().map(|b| b.size).sum();
    2.0 * matches as f64 / total as f64
}
