use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// Default size of the ranked list.
pub const DEFAULT_TOP_N: usize = 50;
/// Commands seen at least this often count as "well-known" for typo analysis.
pub const HIGH_FREQ_CUTOFF: i64 = 3;
/// Alias candidates must be longer than this many characters...
pub const ALIAS_MIN_LEN: usize = 15;
/// ...and used more than this many times.
pub const ALIAS_MIN_FREQ: i64 = 10;

/// One stored command and how often it occurred. Counts are always >= 1;
/// a command is only ever stored because it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandRecord {
    pub command: String,
    pub frequency: i64,
}

/// A rare leading token that sits one edit away from a well-known one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypoCandidate {
    pub suspect: String,
    pub reference: String,
    pub distance: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasSuggestion {
    pub command: String,
    pub frequency: i64,
    pub suggested_alias: String,
}

/// Sort records by frequency descending, ties broken by command string
/// ascending so repeated runs produce identical output.
pub fn rank(records: &[CommandRecord]) -> Vec<CommandRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.command.cmp(&b.command))
    });
    ranked
}

/// The `n` most frequent records, ranked.
pub fn top_n(records: &[CommandRecord], n: usize) -> Vec<CommandRecord> {
    let mut ranked = rank(records);
    ranked.truncate(n);
    ranked
}

/// The leading whitespace-delimited word, typically the executable name.
fn leading_token(command: &str) -> &str {
    command.split_whitespace().next().unwrap_or("")
}

/// Edit distance over characters: insertions, deletions, substitutions,
/// and adjacent transpositions each count as one edit. Transpositions
/// matter here because swapped keystrokes (`gti` for `git`) are the most
/// common shell typo. No shortcut exits: the typo check needs the exact
/// distance, not an approximation.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut d = vec![vec![0usize; b_len + 1]; a_len + 1];
    for (i, row) in d.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b_len {
        d[0][j] = j;
    }

    for i in 1..=a_len {
        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            d[i][j] = (d[i - 1][j] + 1)
                .min(d[i][j - 1] + 1)
                .min(d[i - 1][j - 1] + cost);
            if i > 1
                && j > 1
                && a_chars[i - 1] == b_chars[j - 2]
                && a_chars[i - 2] == b_chars[j - 1]
            {
                d[i][j] = d[i][j].min(d[i - 2][j - 2] + 1);
            }
        }
    }

    d[a_len][b_len]
}

/// Flag rare leading tokens that are exactly one edit away from a token
/// belonging to a frequent command.
///
/// Records at or above `cutoff` form the reference vocabulary; everything
/// below it is scanned against that vocabulary. Frequencies are summed per
/// token on both sides, so `git status` and `git log` back the same `git`
/// reference entry. Each distinct rare token yields at most one candidate,
/// matched to the reference token with the highest combined frequency
/// (ties go to the lexically smaller token). Output is sorted by suspect.
pub fn detect_typos(records: &[CommandRecord], cutoff: i64) -> Vec<TypoCandidate> {
    let mut reference: BTreeMap<&str, i64> = BTreeMap::new();
    let mut rare: BTreeMap<&str, i64> = BTreeMap::new();

    for record in records {
        let token = leading_token(&record.command);
        if token.is_empty() {
            continue;
        }
        let side = if record.frequency >= cutoff {
            &mut reference
        } else {
            &mut rare
        };
        *side.entry(token).or_insert(0) += record.frequency;
    }

    let mut candidates = Vec::new();

    for &token in rare.keys() {
        let token_len = token.chars().count();
        // Single-character tokens produce too many false positives //
        if token_len < 2 {
            continue;
        }
        // A token that also backs a frequent command is not a typo of itself //
        if reference.contains_key(token) {
            continue;
        }

        let mut best: Option<(&str, i64)> = None;
        for (&ref_token, &ref_freq) in &reference {
            if token_len.abs_diff(ref_token.chars().count()) > 1 {
                continue;
            }
            if edit_distance(token, ref_token) != 1 {
                continue;
            }
            // BTreeMap iterates ascending, so on equal frequency the
            // lexically smaller token is already in place
            match best {
                Some((_, best_freq)) if ref_freq <= best_freq => {}
                _ => best = Some((ref_token, ref_freq)),
            }
        }

        if let Some((ref_token, _)) = best {
            candidates.push(TypoCandidate {
                suspect: token.to_string(),
                reference: ref_token.to_string(),
                distance: 1,
            });
        }
    }

    candidates
}

// Initials of the whitespace-delimited words, lowercased. Commands without
// at least two usable initials (one-word commands, option soup) fall back
// to their first two non-space characters.
fn alias_base(command: &str) -> String {
    let initials: String = command
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if initials.chars().count() >= 2 {
        initials.to_lowercase()
    } else {
        command
            .chars()
            .filter(|c| !c.is_whitespace())
            .take(2)
            .collect::<String>()
            .to_lowercase()
    }
}

/// Long, frequently used commands worth aliasing: strictly longer than
/// `min_len` characters and used strictly more than `min_freq` times.
/// Candidates are walked in ranked order so alias collisions pick up their
/// numeric suffixes (`gs`, `gs2`, ...) the same way every run.
pub fn suggest_aliases(
    records: &[CommandRecord],
    min_len: usize,
    min_freq: i64,
) -> Vec<AliasSuggestion> {
    let mut taken: HashMap<String, u32> = HashMap::new();
    let mut suggestions = Vec::new();

    for record in rank(records) {
        if record.command.chars().count() <= min_len || record.frequency <= min_freq {
            continue;
        }
        let base = alias_base(&record.command);
        let uses = taken.entry(base.clone()).or_insert(0);
        *uses += 1;
        let suggested_alias = if *uses == 1 {
            base
        } else {
            format!("{}{}", base, *uses)
        };
        suggestions.push(AliasSuggestion {
            command: record.command,
            frequency: record.frequency,
            suggested_alias,
        });
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(command: &str, frequency: i64) -> CommandRecord {
        CommandRecord {
            command: command.to_string(),
            frequency,
        }
    }

    #[test]
    fn rank_orders_by_frequency_then_lexically() {
        let records = vec![
            record("ls", 2),
            record("git status", 5),
            record("cargo build", 2),
        ];
        let ranked = rank(&records);
        assert_eq!(ranked[0].command, "git status");
        assert_eq!(ranked[1].command, "cargo build");
        assert_eq!(ranked[2].command, "ls");
    }

    #[test]
    fn top_n_truncates_and_handles_short_input() {
        let records = vec![record("ls", 1), record("pwd", 3)];
        assert_eq!(top_n(&records, 1).len(), 1);
        assert_eq!(top_n(&records, 1)[0].command, "pwd");
        assert_eq!(top_n(&records, 10).len(), 2);
        assert_eq!(top_n(&records, 0).len(), 0);
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("git", "git"), 0);
        assert_eq!(edit_distance("gti", "git"), 1); // adjacent swap is one edit
        assert_eq!(edit_distance("gi", "git"), 1);
        assert_eq!(edit_distance("gits", "git"), 1);
        assert_eq!(edit_distance("gat", "git"), 1);
        assert_eq!(edit_distance("gitx2", "git"), 2);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", ""), 3);
    }

    #[test]
    fn detects_a_transposition() {
        let records = vec![record("git status", 100), record("gti status", 1)];
        let typos = detect_typos(&records, 3);
        assert_eq!(typos.len(), 1);
        assert_eq!(typos[0].suspect, "gti");
        assert_eq!(typos[0].reference, "git");
        assert_eq!(typos[0].distance, 1);
    }

    #[test]
    fn detects_one_substitution() {
        let records = vec![record("git status", 100), record("gut status", 1)];
        let typos = detect_typos(&records, 3);
        assert_eq!(typos.len(), 1);
        assert_eq!(typos[0].suspect, "gut");
        assert_eq!(typos[0].reference, "git");
        assert_eq!(typos[0].distance, 1);
    }

    #[test]
    fn detects_one_deletion() {
        let records = vec![record("git status", 100), record("gt status", 1)];
        let typos = detect_typos(&records, 3);
        assert_eq!(typos.len(), 1);
        assert_eq!(typos[0].suspect, "gt");
        assert_eq!(typos[0].reference, "git");
    }

    #[test]
    fn detects_one_insertion() {
        let records = vec![record("git status", 100), record("gbit status", 1)];
        let typos = detect_typos(&records, 3);
        assert_eq!(typos.len(), 1);
        assert_eq!(typos[0].suspect, "gbit");
    }

    #[test]
    fn ignores_two_edits_away() {
        let records = vec![record("git status", 100), record("gitx2 status", 1)];
        assert!(detect_typos(&records, 3).is_empty());
    }

    #[test]
    fn known_token_is_not_its_own_typo() {
        // "git" backs a frequent command, so the rare "git st" is fine //
        let records = vec![record("git status", 100), record("git st", 1)];
        assert!(detect_typos(&records, 3).is_empty());
    }

    #[test]
    fn skips_single_character_tokens() {
        let records = vec![record("ls -la", 100), record("l", 1)];
        assert!(detect_typos(&records, 3).is_empty());
    }

    #[test]
    fn prefers_the_more_frequent_reference() {
        let records = vec![
            record("cat notes.txt", 50),
            record("car notes.txt", 5),
            record("caz notes.txt", 1),
        ];
        let typos = detect_typos(&records, 3);
        assert_eq!(typos.len(), 1);
        assert_eq!(typos[0].reference, "cat");
    }

    #[test]
    fn equal_frequency_ties_go_lexically() {
        let records = vec![
            record("car a", 5),
            record("cat b", 5),
            record("caz x", 1),
        ];
        let typos = detect_typos(&records, 3);
        assert_eq!(typos.len(), 1);
        assert_eq!(typos[0].reference, "car");
    }

    #[test]
    fn reference_frequency_sums_across_commands() {
        // "git" appears under two frequent commands (3 + 3 = 6), beating
        // the single "got" command at 5
        let records = vec![
            record("git status", 3),
            record("git log", 3),
            record("got somewhere", 5),
            record("gft x", 1),
        ];
        let typos = detect_typos(&records, 3);
        assert_eq!(typos.len(), 1);
        assert_eq!(typos[0].reference, "git");
    }

    #[test]
    fn typo_output_is_sorted_by_suspect() {
        let records = vec![
            record("git status", 100),
            record("ls -la", 100),
            record("lz -la", 1),
            record("gut status", 1),
        ];
        let typos = detect_typos(&records, 3);
        assert_eq!(typos.len(), 2);
        assert_eq!(typos[0].suspect, "gut");
        assert_eq!(typos[1].suspect, "lz");
    }

    #[test]
    fn alias_filter_is_strict_on_both_bounds() {
        let records = vec![
            record("12345678901234567890", 11),  // len 20, freq 11: in
            record("123456789012345", 100),      // len 15: out
            record(&"x".repeat(100), 10),        // freq 10: out
        ];
        let suggestions = suggest_aliases(&records, ALIAS_MIN_LEN, ALIAS_MIN_FREQ);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].command, "12345678901234567890");
        assert_eq!(suggestions[0].frequency, 11);
    }

    #[test]
    fn alias_uses_word_initials() {
        let records = vec![record("git status --short --branch", 20)];
        let suggestions = suggest_aliases(&records, ALIAS_MIN_LEN, ALIAS_MIN_FREQ);
        assert_eq!(suggestions[0].suggested_alias, "gs");
    }

    #[test]
    fn alias_collisions_get_numeric_suffixes() {
        let records = vec![
            record("git status --short --branch", 30),
            record("git stash --include-untracked", 20),
        ];
        let suggestions = suggest_aliases(&records, ALIAS_MIN_LEN, ALIAS_MIN_FREQ);
        assert_eq!(suggestions.len(), 2);
        // Ranked order: the more frequent command claims the bare alias //
        assert_eq!(suggestions[0].suggested_alias, "gs");
        assert_eq!(suggestions[1].suggested_alias, "gs2");
    }

    #[test]
    fn one_word_alias_falls_back_to_prefix() {
        let records = vec![record("dockercomposeupbuild", 20)];
        let suggestions = suggest_aliases(&records, ALIAS_MIN_LEN, ALIAS_MIN_FREQ);
        assert_eq!(suggestions[0].suggested_alias, "do");
    }

    #[test]
    fn end_to_end_scenario() {
        // ["git status", "gti status", "git status", "#123", " ls"] after
        // ingestion filtering leaves two records
        let records = vec![record("git status", 2), record("gti status", 1)];

        let top = top_n(&records, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].command, "git status");
        assert_eq!(top[0].frequency, 2);

        // Cutoff 2 makes freq 2 frequent and freq 1 rare //
        let typos = detect_typos(&records, 2);
        assert_eq!(typos.len(), 1);
        assert_eq!(typos[0].suspect, "gti");
        assert_eq!(typos[0].reference, "git");
        assert_eq!(typos[0].distance, 1);
    }
}
