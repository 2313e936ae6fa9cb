//! Line-level diff engine for the document revision workspace.
//!
//! Computes a classified line-by-line difference between two text revisions
//! using the longest-common-subsequence (LCS) dynamic-programming table. The
//! output is an ordered `Vec<DiffLine>` whose `Add`/`Unchanged` lines
//! concatenate to the new revision exactly, and whose `Remove`/`Unchanged`
//! lines concatenate to the old revision exactly.
//!
//! The engine is pure and deterministic: no allocation-order or hash-order
//! effects reach the output, and the cost model is symmetric (no preference
//! for adds over removes beyond what the LCS yields).
//!
//! Lines are split with `split_inclusive('\n')`, so every line carries its
//! terminating newline (except a final unterminated line). This makes
//! reconstruction a plain concatenation and means a file gaining or losing
//! its trailing newline shows up as a real change, the same way git reports it.

/// The change classification of one emitted diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    /// Present in both revisions at this position.
    Unchanged,
    /// Present only in the new revision.
    Add,
    /// Present only in the old revision.
    Remove,
    /// A paired Remove+Add collapsed by [`compact_modifies`]. Never produced
    /// by [`diff`] itself — presentation compaction only.
    Modify,
}

/// One classified line of a computed difference.
///
/// `line_number` is 1-based and sequential in output order. `content` is the
/// new-side text for `Add`/`Unchanged`/`Modify` and the old-side text for
/// `Remove`; `old_content` is populated only on `Modify` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: DiffKind,
    pub line_number: u32,
    pub content: String,
    pub old_content: Option<String>,
}

impl DiffLine {
    /// Returns the line content without its terminating newline, for display.
    pub fn text(&self) -> &str {
        self.content.trim_end_matches('\n')
    }
}

/// Aggregate counts over a computed diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

/// Default cap on the `m * n` DP table size before [`diff_with_limit`] falls
/// back to whole-document replacement. 4M cells is ~2000 × 2000 lines.
pub const DEFAULT_MAX_CELLS: usize = 4_000_000;

/// Computes the line diff between `old` and `new` with the default size cap.
///
/// Equivalent to `diff_with_limit(old, new, DEFAULT_MAX_CELLS)`.
pub fn diff(old: &str, new: &str) -> Vec<DiffLine> {
    diff_with_limit(old, new, DEFAULT_MAX_CELLS)
}

/// Computes the line diff between `old` and `new`.
///
/// When the DP table would exceed `max_cells` (`old_lines * new_lines`), the
/// O(m·n) LCS is skipped and the result is a whole-document replacement:
/// every old line as `Remove` followed by every new line as `Add`. That
/// output still satisfies both reconstruction properties, it just carries no
/// `Unchanged` anchors.
///
/// Empty `old` yields all-`Add`; empty `new` yields all-`Remove`; identical
/// inputs yield all-`Unchanged`; two empty inputs yield an empty diff.
pub fn diff_with_limit(old: &str, new: &str, max_cells: usize) -> Vec<DiffLine> {
    let a = split_lines(old);
    let b = split_lines(new);

    if a.len().saturating_mul(b.len()) > max_cells {
        return replace_all(&a, &b);
    }

    let common = lcs(&a, &b);
    classify(&a, &b, &common)
}

/// Splits `text` into lines, each retaining its terminating newline.
///
/// Empty input produces no lines (so `diff("", "")` is empty rather than a
/// spurious single-empty-line match).
fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split_inclusive('\n').collect()
    }
}

/// Recovers the longest common subsequence of `a` and `b`.
///
/// Standard DP recurrence over a `(m+1) x (n+1)` table stored flat, then a
/// backtrack from `dp[m][n]` collecting shared lines in reverse.
fn lcs<'a>(a: &[&'a str], b: &[&str]) -> Vec<&'a str> {
    let m = a.len();
    let n = b.len();
    let mut dp = vec![0u32; (m + 1) * (n + 1)];
    let idx = |i: usize, j: usize| i * (n + 1) + j;

    for i in 1..=m {
        for j in 1..=n {
            dp[idx(i, j)] = if a[i - 1] == b[j - 1] {
                dp[idx(i - 1, j - 1)] + 1
            } else {
                dp[idx(i - 1, j)].max(dp[idx(i, j - 1)])
            };
        }
    }

    let mut common = Vec::with_capacity(dp[idx(m, n)] as usize);
    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] {
            common.push(a[i - 1]);
            i -= 1;
            j -= 1;
        } else if dp[idx(i - 1, j)] >= dp[idx(i, j - 1)] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    common.reverse();
    common
}

/// Walks `a` and `b` against the LCS, emitting classified lines.
///
/// Between consecutive LCS anchors, old-only lines come out as `Remove`
/// before new-only lines come out as `Add`. Line numbers are assigned
/// 1-based in output order.
fn classify(a: &[&str], b: &[&str], common: &[&str]) -> Vec<DiffLine> {
    let mut out = Vec::with_capacity(a.len() + b.len() - common.len());
    let (mut i, mut j, mut k) = (0, 0, 0);

    while i < a.len() || j < b.len() {
        let anchor = common.get(k).copied();
        if i < a.len() && anchor != Some(a[i]) {
            push(&mut out, DiffKind::Remove, a[i]);
            i += 1;
        } else if j < b.len() && anchor != Some(b[j]) {
            push(&mut out, DiffKind::Add, b[j]);
            j += 1;
        } else {
            // Both cursors sit on the current anchor.
            push(&mut out, DiffKind::Unchanged, a[i]);
            i += 1;
            j += 1;
            k += 1;
        }
    }

    out
}

/// Emits the whole-document-replacement diff used above the size cap.
fn replace_all(a: &[&str], b: &[&str]) -> Vec<DiffLine> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    for line in a {
        push(&mut out, DiffKind::Remove, line);
    }
    for line in b {
        push(&mut out, DiffKind::Add, line);
    }
    out
}

fn push(out: &mut Vec<DiffLine>, kind: DiffKind, content: &str) {
    out.push(DiffLine {
        kind,
        line_number: out.len() as u32 + 1,
        content: content.to_owned(),
        old_content: None,
    });
}

/// Collapses each `Remove` immediately followed by an `Add` into one
/// `Modify` line carrying both sides, renumbering the result sequentially.
///
/// Presentation-only: the collapsed output no longer satisfies the plain
/// concatenation reconstruction, so callers keep the original diff for
/// anything other than display. Within a run of removes followed by adds,
/// only the last remove pairs with the first add — the same pairing the
/// pending-removed display loop uses.
pub fn compact_modifies(lines: &[DiffLine]) -> Vec<DiffLine> {
    let mut out: Vec<DiffLine> = Vec::with_capacity(lines.len());
    let mut pending_removed: Option<&DiffLine> = None;

    for line in lines {
        match line.kind {
            DiffKind::Remove => {
                if let Some(prev) = pending_removed.take() {
                    out.push(prev.clone());
                }
                pending_removed = Some(line);
            }
            DiffKind::Add => {
                if let Some(prev) = pending_removed.take() {
                    out.push(DiffLine {
                        kind: DiffKind::Modify,
                        line_number: 0,
                        content: line.content.clone(),
                        old_content: Some(prev.content.clone()),
                    });
                } else {
                    out.push(line.clone());
                }
            }
            _ => {
                if let Some(prev) = pending_removed.take() {
                    out.push(prev.clone());
                }
                out.push(line.clone());
            }
        }
    }
    if let Some(prev) = pending_removed.take() {
        out.push(prev.clone());
    }

    for (n, line) in out.iter_mut().enumerate() {
        line.line_number = n as u32 + 1;
    }
    out
}

/// Counts added, removed, and unchanged lines. `Modify` counts as one add
/// plus one remove.
pub fn stats(lines: &[DiffLine]) -> DiffStats {
    let mut s = DiffStats::default();
    for line in lines {
        match line.kind {
            DiffKind::Add => s.added += 1,
            DiffKind::Remove => s.removed += 1,
            DiffKind::Unchanged => s.unchanged += 1,
            DiffKind::Modify => {
                s.added += 1;
                s.removed += 1;
            }
        }
    }
    s
}

/// True when the diff carries no change at all (only `Unchanged` lines, or
/// nothing). This is the "no changes detected" signal consumed upstream.
pub fn is_unchanged(lines: &[DiffLine]) -> bool {
    lines
        .iter()
        .all(|line| line.kind == DiffKind::Unchanged)
}

/// Reconstructs the new revision from the `Add`/`Unchanged`/`Modify` lines.
pub fn new_side(lines: &[DiffLine]) -> String {
    let mut text = String::new();
    for line in lines {
        match line.kind {
            DiffKind::Add | DiffKind::Unchanged | DiffKind::Modify => text.push_str(&line.content),
            DiffKind::Remove => {}
        }
    }
    text
}

/// Reconstructs the old revision from the `Remove`/`Unchanged`/`Modify` lines.
pub fn old_side(lines: &[DiffLine]) -> String {
    let mut text = String::new();
    for line in lines {
        match line.kind {
            DiffKind::Remove | DiffKind::Unchanged => text.push_str(&line.content),
            DiffKind::Modify => {
                if let Some(old) = &line.old_content {
                    text.push_str(old);
                }
            }
            DiffKind::Add => {}
        }
    }
    text
}
