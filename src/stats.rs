//! Descriptive statistics of a lexicon, as two-column tables.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use serde::Serialize;

use crate::loader::Lexicon;

/// A titled two-column table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsTable {
    pub title: &'static str,
    pub headers: [&'static str; 2],
    pub rows: Vec<(String, String)>,
}

impl StatsTable {
    fn new(title: &'static str, headers: [&'static str; 2]) -> Self {
        Self {
            title,
            headers,
            rows: Vec::new(),
        }
    }

    fn row(mut self, label: impl Into<String>, value: impl ToString) -> Self {
        self.rows.push((label.into(), value.to_string()));
        self
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    /// Borderless table with centered headers.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table border=\"0\" class=\"dataframe\">\n");
        html.push_str("  <thead>\n    <tr style=\"text-align: center;\">\n");
        for header in self.headers {
            let _ = writeln!(html, "      <th>{}</th>", escape(header));
        }
        html.push_str("    </tr>\n  </thead>\n  <tbody>\n");
        for (label, value) in &self.rows {
            let _ = writeln!(
                html,
                "    <tr>\n      <td>{}</td>\n      <td>{}</td>\n    </tr>",
                escape(label),
                escape(value)
            );
        }
        html.push_str("  </tbody>\n</table>");
        html
    }
}

/// Total, lexical and non-lexical frame counts.
pub fn frame_stats(lexicon: &Lexicon) -> StatsTable {
    let total = lexicon.frames().count();
    let lexical = lexicon.frames().filter(|f| f.is_lexical()).count();

    StatsTable::new("Frame", ["Metric", "Frequency"])
        .row("number of lexical frames", lexical)
        .row("number of non-lexical frames", total - lexical)
        .row("total number of frames", total)
}

/// LU count and mean number of LUs per lexical frame.
pub fn lu_stats(lexicon: &Lexicon) -> StatsTable {
    let per_frame: Vec<usize> = lexicon
        .frames()
        .filter(|f| f.is_lexical())
        .map(|f| f.lu_ids.len())
        .collect();

    StatsTable::new("LUs", ["Metric", "Value"])
        .row("total number of LUs", lexicon.lu_count())
        .row("LUs per lexical frame", format!("{:.1}", mean(&per_frame)))
}

/// LU count per POS tag, most frequent first.
pub fn lu_per_pos_stats(lexicon: &Lexicon) -> StatsTable {
    let mut per_pos: BTreeMap<&str, usize> = BTreeMap::new();
    for lu in lexicon.lus() {
        *per_pos.entry(lu.pos.as_str()).or_default() += 1;
    }
    let mut counts: Vec<(&str, usize)> = per_pos.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts.into_iter().fold(
        StatsTable::new("LUs per POS", ["Part of speech tag", "Number of LUs"]),
        |table, (pos, count)| table.row(pos, count),
    )
}

/// Number of LUs per lexeme count, by ascending lexeme count.
pub fn lexeme_stats(lexicon: &Lexicon) -> StatsTable {
    let mut per_count: BTreeMap<usize, usize> = BTreeMap::new();
    for lu in lexicon.lus() {
        *per_count.entry(lu.lexemes.len()).or_default() += 1;
    }

    per_count.into_iter().fold(
        StatsTable::new("Lexemes per LU", ["Number of lexemes", "LUs"]),
        |table, (lexemes, lus)| table.row(lexemes.to_string(), lus),
    )
}

/// Minimum, mean and maximum number of frames evoked by one `lemma.pos`.
pub fn ambiguity_stats(lexicon: &Lexicon) -> StatsTable {
    let mut frames_per_name: BTreeMap<&str, BTreeSet<u64>> = BTreeMap::new();
    for lu in lexicon.lus() {
        frames_per_name
            .entry(lu.name.as_str())
            .or_default()
            .insert(lu.frame_id);
    }
    let ambiguity: Vec<usize> = frames_per_name.values().map(BTreeSet::len).collect();

    StatsTable::new("Ambiguity", ["Metric", "Value"])
        .row("Minimum ambiguity", ambiguity.iter().min().copied().unwrap_or(0))
        .row("Mean ambiguity", format!("{:.1}", mean(&ambiguity)))
        .row("Maximum ambiguity", ambiguity.iter().max().copied().unwrap_or(0))
}

pub fn all_stats(lexicon: &Lexicon) -> Vec<StatsTable> {
    vec![
        frame_stats(lexicon),
        lu_stats(lexicon),
        lu_per_pos_stats(lexicon),
        lexeme_stats(lexicon),
        ambiguity_stats(lexicon),
    ]
}

/// One HTML page with an `<h2>` title and a table per statistic.
pub fn stats_html(lexicon: &Lexicon) -> String {
    let mut html = String::from("<html>\n<body>\n");
    for table in all_stats(lexicon) {
        let _ = writeln!(html, "<h2>{}</h2>", escape(table.title));
        html.push_str(&table.to_html());
        html.push('\n');
    }
    html.push_str("</body>\n</html>");
    html
}

fn mean(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<usize>() as f64 / values.len() as f64
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(format!("{:.1}", mean(&[1, 2, 2])), "1.7");
    }

    #[test]
    fn test_table_html() {
        let table = StatsTable::new("LUs", ["Metric", "Value"]).row("a<b", 3);
        let html = table.to_html();
        assert!(html.starts_with("<table border=\"0\""));
        assert!(html.contains("<td>a&lt;b</td>"));
        assert!(html.contains("<th>Metric</th>"));
        assert_eq!(table.get("a<b"), Some("3"));
    }
}
