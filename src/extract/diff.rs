/// Alignments whose changed middle section would need more DP cells than
/// this are treated as unclassifiable rewrites.
pub const MAX_ALIGNMENT_CELLS: usize = 4_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Equal(char),
    /// Present in the clean text, missing from the typo text.
    Removed(char),
    /// Present only in the typo text.
    Added(char),
}

impl EditOp {
    pub fn is_equal(&self) -> bool {
        matches!(self, Self::Equal(_))
    }
}

/// Character-level edit script turning `clean` into `typo`.
///
/// Common prefix and suffix are emitted as `Equal` without entering the DP.
/// Inside the changed region a longest-common-subsequence alignment is walked
/// forward, preferring removals on ties so a one-for-one replacement reads
/// `Removed, Added`.
pub fn edit_script(clean: &str, typo: &str) -> Option<Vec<EditOp>> {
    let a: Vec<char> = clean.chars().collect();
    let b: Vec<char> = typo.chars().collect();

    let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let mid_a = &a[prefix..a.len() - suffix];
    let mid_b = &b[prefix..b.len() - suffix];

    let n = mid_a.len();
    let m = mid_b.len();
    if (n + 1).saturating_mul(m + 1) > MAX_ALIGNMENT_CELLS {
        return None;
    }

    let mut script = Vec::with_capacity(a.len().max(b.len()) + 1);
    script.extend(a[..prefix].iter().map(|&c| EditOp::Equal(c)));

    // lcs[i * w + j] = LCS length of mid_a[i..] and mid_b[j..]
    let w = m + 1;
    let mut lcs = vec![0u32; (n + 1) * w];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i * w + j] = if mid_a[i] == mid_b[j] {
                lcs[(i + 1) * w + j + 1] + 1
            } else {
                lcs[(i + 1) * w + j].max(lcs[i * w + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < n || j < m {
        if i < n && j < m && mid_a[i] == mid_b[j] {
            script.push(EditOp::Equal(mid_a[i]));
            i += 1;
            j += 1;
        } else if j == m || (i < n && lcs[(i + 1) * w + j] >= lcs[i * w + j + 1]) {
            script.push(EditOp::Removed(mid_a[i]));
            i += 1;
        } else {
            script.push(EditOp::Added(mid_b[j]));
            j += 1;
        }
    }

    script.extend(a[a.len() - suffix..].iter().map(|&c| EditOp::Equal(c)));
    Some(script)
}

/// Renders a script in a compact `ndiff`-like notation, e.g. `" h- e+ a l"`.
pub fn render(script: &[EditOp]) -> String {
    let mut out = String::with_capacity(script.len() * 2);
    for op in script {
        let (tag, c) = match op {
            EditOp::Equal(c) => (' ', c),
            EditOp::Removed(c) => ('-', c),
            EditOp::Added(c) => ('+', c),
        };
        out.push(tag);
        out.push(*c);
    }
    out
}
