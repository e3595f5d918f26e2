// crates/geokey-core/src/trie.rs

//! Character trie with whole-word and suffix payloads.
//!
//! Every indexed token is inserted once per suffix: the zero-offset walk
//! lands the record id in `full_ids`, every other offset lands it in
//! `suffix_ids`. Lookups therefore get substring matching for free — the
//! only cost is the subtree collect at the end of the query walk.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::mem;

use serde::Serialize;

use crate::model::GeoItem;
use crate::text::preprocess;

/// Where a token walk terminated relative to the indexed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordKind {
    /// The walk started at offset zero: this node ends a whole word.
    Full,
    /// The walk started mid-word: this node ends a suffix only.
    Suffix,
}

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<char, TrieNode>,
    /// Ids whose indexed word starts at the root and ends here.
    full_ids: Vec<i64>,
    /// Ids indexed via a non-zero-offset suffix ending here.
    suffix_ids: Vec<i64>,
}

impl TrieNode {
    /// Append an id to the right payload slot, skipping duplicates.
    /// The vectors are tiny (a handful of ids per terminal) so a linear
    /// scan beats a set here.
    fn push_id(&mut self, id: i64, kind: WordKind) {
        let ids = match kind {
            WordKind::Full => &mut self.full_ids,
            WordKind::Suffix => &mut self.suffix_ids,
        };
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    fn collect_into(&self, exact: bool, out: &mut HashSet<i64>) {
        out.extend(self.full_ids.iter().copied());
        if !exact {
            out.extend(self.suffix_ids.iter().copied());
        }
        for child in self.children.values() {
            child.collect_into(exact, out);
        }
    }
}

/// Aggregate statistics over the trie, for sizing and tuning.
#[derive(Debug, Clone, Serialize)]
pub struct TrieInfo {
    pub depth: usize,
    pub prefix_nodes: usize,
    pub full_containers: usize,
    pub full_items: usize,
    pub suffix_containers: usize,
    pub suffix_items: usize,
    /// log(prefix_nodes) base depth — rough fan-out of the tree.
    pub branching: f64,
    pub full_density: f64,
    pub suffix_density: f64,
    pub ratio_full_prefix: f64,
    pub ratio_suffix_prefix: f64,
    pub ratio_suffix_full_containers: f64,
    pub ratio_suffix_full_items: f64,
    pub payload_containers: usize,
    pub payload_items: usize,
    pub payload_density: f64,
    /// Estimated heap footprint; node maps dominate, so this is a floor.
    pub estimated_bytes: usize,
    pub alphabet: String,
    pub indexed: usize,
}

#[derive(Default)]
struct Tally {
    depth: usize,
    prefix_nodes: usize,
    full_containers: usize,
    full_items: usize,
    suffix_containers: usize,
    suffix_items: usize,
}

/// The search index. One per engine.
#[derive(Default)]
pub struct Trie {
    root: TrieNode,
    alphabet: BTreeSet<char>,
    indexed: usize,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records fed through [`Trie::index_item`].
    pub fn indexed(&self) -> usize {
        self.indexed
    }

    /// Walk/create nodes along `word` and record `id` at the terminal.
    fn add_word(&mut self, id: i64, word: &str, kind: WordKind) {
        let mut node = &mut self.root;
        for c in word.chars() {
            self.alphabet.insert(c);
            node = node.children.entry(c).or_default();
        }
        node.push_id(id, kind);
    }

    /// Index one token: the whole word plus every proper suffix.
    fn add_token(&mut self, id: i64, token: &str) {
        let chars: Vec<char> = token.chars().collect();
        for i in 0..chars.len() {
            let suffix: String = chars[i..].iter().collect();
            let kind = if i == 0 { WordKind::Full } else { WordKind::Suffix };
            self.add_word(id, &suffix, kind);
        }
    }

    /// Add all names of an item under `id`: both languages, current and
    /// former name, every token. Re-adding is a no-op for the id sets.
    pub fn index_item(&mut self, id: i64, item: &GeoItem) {
        for name in item.names() {
            for sub in name.sub_names() {
                for token in preprocess(sub) {
                    self.add_token(id, &token);
                }
            }
        }
        self.indexed += 1;
    }

    /// Walk down from the root following `query` tokens and collect ids.
    ///
    /// `exact` restricts collection to whole-word terminals. Token sets
    /// combine as: intersection for two tokens or any exact query,
    /// union-of-pairwise-intersections for longer non-exact queries
    /// (tolerates one missing word), identity for a single token.
    pub fn lookup(&self, query: &str, exact: bool) -> HashSet<i64> {
        let tokens = preprocess(query);
        if tokens.is_empty() {
            return HashSet::new();
        }

        let mut word_ids: Vec<HashSet<i64>> = Vec::with_capacity(tokens.len());
        for token in &tokens {
            word_ids.push(self.walk_token(token, exact));
        }

        if word_ids.len() == 2 || exact {
            return intersect_all(&word_ids);
        }
        if word_ids.len() > 2 {
            // union of pairwise intersections
            let mut out = HashSet::new();
            for i in 0..word_ids.len() {
                for j in (i + 1)..word_ids.len() {
                    out.extend(word_ids[i].intersection(&word_ids[j]).copied());
                }
            }
            return out;
        }
        word_ids.pop().unwrap_or_default()
    }

    fn walk_token(&self, token: &str, exact: bool) -> HashSet<i64> {
        let mut node = &self.root;
        for c in token.chars() {
            match node.children.get(&c) {
                Some(child) => node = child,
                // dead-end for this word
                None => return HashSet::new(),
            }
        }
        let mut out = HashSet::new();
        node.collect_into(exact, &mut out);
        out
    }

    /// Union of all ids stored anywhere in the trie.
    pub fn collect_all(&self, exact: bool) -> HashSet<i64> {
        let mut out = HashSet::new();
        self.root.collect_into(exact, &mut out);
        out
    }

    /// Sorted set of characters seen during indexing.
    pub fn alphabet(&self) -> String {
        self.alphabet.iter().collect()
    }

    /// Plain-text rendering of the structure, one terminal per line:
    /// `prefix: [ids]` for whole words, `prefix~ [ids]` for suffixes.
    /// Debugging aid; output grows with the trie, use on small indexes.
    pub fn show<W: std::io::Write>(&self, out: &mut W) -> std::io::Result<()> {
        show_node(&self.root, String::new(), out)
    }

    pub fn info(&self) -> TrieInfo {
        let mut tally = Tally::default();
        analyze(&self.root, 0, &mut tally);

        let payload_containers = tally.full_containers + tally.suffix_containers;
        let payload_items = tally.full_items + tally.suffix_items;

        let estimated_bytes = tally.prefix_nodes
            * (mem::size_of::<TrieNode>() + mem::size_of::<char>())
            + payload_items * mem::size_of::<i64>();

        TrieInfo {
            depth: tally.depth,
            prefix_nodes: tally.prefix_nodes,
            full_containers: tally.full_containers,
            full_items: tally.full_items,
            suffix_containers: tally.suffix_containers,
            suffix_items: tally.suffix_items,
            branching: round2(log_base(tally.prefix_nodes, tally.depth)),
            full_density: round2(ratio(tally.full_items, tally.full_containers)),
            suffix_density: round2(ratio(tally.suffix_items, tally.suffix_containers)),
            ratio_full_prefix: round2(ratio(tally.full_containers, tally.prefix_nodes)),
            ratio_suffix_prefix: round2(ratio(tally.suffix_containers, tally.prefix_nodes)),
            ratio_suffix_full_containers: round2(ratio(
                tally.suffix_containers,
                tally.full_containers,
            )),
            ratio_suffix_full_items: round2(ratio(tally.suffix_items, tally.full_items)),
            payload_containers,
            payload_items,
            payload_density: round2(ratio(payload_items, payload_containers)),
            estimated_bytes,
            alphabet: self.alphabet(),
            indexed: self.indexed,
        }
    }
}

fn show_node<W: std::io::Write>(
    node: &TrieNode,
    prefix: String,
    out: &mut W,
) -> std::io::Result<()> {
    if !node.full_ids.is_empty() {
        writeln!(out, "{prefix}: {:?}", node.full_ids)?;
    }
    if !node.suffix_ids.is_empty() {
        writeln!(out, "{prefix}~ {:?}", node.suffix_ids)?;
    }
    let mut keys: Vec<char> = node.children.keys().copied().collect();
    keys.sort_unstable();
    for c in keys {
        let mut next = prefix.clone();
        next.push(c);
        show_node(&node.children[&c], next, out)?;
    }
    Ok(())
}

fn analyze(node: &TrieNode, depth: usize, tally: &mut Tally) {
    tally.depth = tally.depth.max(depth);
    if !node.full_ids.is_empty() {
        tally.full_containers += 1;
        tally.full_items += node.full_ids.len();
    }
    if !node.suffix_ids.is_empty() {
        tally.suffix_containers += 1;
        tally.suffix_items += node.suffix_ids.len();
    }
    for child in node.children.values() {
        tally.prefix_nodes += 1;
        analyze(child, depth + 1, tally);
    }
}

fn intersect_all(sets: &[HashSet<i64>]) -> HashSet<i64> {
    let Some((first, rest)) = sets.split_first() else {
        return HashSet::new();
    };
    first
        .iter()
        .filter(|id| rest.iter().all(|s| s.contains(*id)))
        .copied()
        .collect()
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        return 0.0;
    }
    num as f64 / den as f64
}

fn log_base(value: usize, base: usize) -> f64 {
    if value == 0 || base < 2 {
        return 0.0;
    }
    (value as f64).ln() / (base as f64).ln()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GeoItem, GeoLevel, Name};

    fn region(name: &str, name_uk: &str) -> GeoItem {
        GeoItem::root(
            GeoLevel::Region,
            Name::new(name, None),
            Name::new(name_uk, None),
        )
    }

    fn ids(set: &HashSet<i64>) -> Vec<i64> {
        let mut v: Vec<i64> = set.iter().copied().collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn whole_word_is_exact_hit() {
        let mut trie = Trie::new();
        trie.index_item(1, &region("Kyiv Region", "Київська область"));

        assert_eq!(ids(&trie.lookup("kyiv", true)), vec![1]);
        assert_eq!(ids(&trie.lookup("область", true)), vec![1]);
    }

    #[test]
    fn suffix_hits_only_in_inexact_mode() {
        let mut trie = Trie::new();
        trie.index_item(1, &region("Kyiv Region", "Київська область"));

        assert_eq!(ids(&trie.lookup("yiv", false)), vec![1]);
        assert!(trie.lookup("yiv", true).is_empty());
    }

    #[test]
    fn missing_character_is_dead_end() {
        let mut trie = Trie::new();
        trie.index_item(1, &region("Kyiv Region", "Київська область"));

        assert!(trie.lookup("kyivz", false).is_empty());
        assert!(trie.lookup("qqq", false).is_empty());
    }

    #[test]
    fn add_is_idempotent() {
        let mut trie = Trie::new();
        let item = region("Kyiv Region", "Київська область");
        trie.index_item(1, &item);
        let before = ids(&trie.collect_all(false));

        trie.index_item(1, &item);
        assert_eq!(ids(&trie.collect_all(false)), before);
        // and no terminal grew a duplicate id
        assert_eq!(ids(&trie.lookup("kyiv", true)), vec![1]);
    }

    #[test]
    fn two_word_query_intersects() {
        let mut trie = Trie::new();
        trie.index_item(1, &region("Kyiv Region", "Київська область"));
        trie.index_item(2, &region("Kyiv", "Київ"));

        assert_eq!(ids(&trie.lookup("kyiv region", false)), vec![1]);
        assert_eq!(ids(&trie.lookup("kyiv", false)), vec![1, 2]);
    }

    #[test]
    fn three_word_union_of_pairs() {
        let mut trie = Trie::new();
        trie.index_item(1, &region("alpha beta gamma", "а б в"));
        trie.index_item(2, &region("alpha beta", "а б"));

        // `delta` misses everywhere, but alpha∩beta still carries both ids
        assert_eq!(ids(&trie.lookup("alpha beta delta", false)), vec![1, 2]);
        // exact mode stays strict
        assert!(trie.lookup("alpha beta delta", true).is_empty());
        assert_eq!(ids(&trie.lookup("alpha beta gamma", true)), vec![1]);
    }

    #[test]
    fn old_names_index_as_full_words() {
        let mut trie = Trie::new();
        let item = GeoItem::root(
            GeoLevel::City,
            Name::new("Dnipro", Some("Dnipropetrovsk")),
            Name::new("Дніпро", Some("Дніпропетровськ")),
        );
        trie.index_item(7, &item);

        assert_eq!(ids(&trie.lookup("dnipropetrovsk", true)), vec![7]);
        assert_eq!(ids(&trie.lookup("дніпро", true)), vec![7]);
    }

    #[test]
    fn empty_query_is_empty_set() {
        let mut trie = Trie::new();
        trie.index_item(1, &region("Kyiv", "Київ"));
        assert!(trie.lookup("", false).is_empty());
        assert!(trie.lookup("   ", true).is_empty());
        assert!(trie.lookup("...", false).is_empty());
    }

    #[test]
    fn show_renders_terminals() {
        let mut trie = Trie::new();
        trie.index_item(1, &region("ab", "ab"));

        let mut out = Vec::new();
        trie.show(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "ab: [1]\nb~ [1]\n");
    }

    #[test]
    fn info_counts_containers() {
        let mut trie = Trie::new();
        trie.index_item(1, &region("ab", "аб"));

        let info = trie.info();
        // "ab": full at b-terminal of path a-b, suffix at standalone b; same for "аб"
        assert_eq!(info.full_containers, 2);
        assert_eq!(info.suffix_containers, 2);
        assert_eq!(info.depth, 2);
        assert_eq!(info.indexed, 1);
        assert_eq!(info.alphabet, "abаб");
    }
}
