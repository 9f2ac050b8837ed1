use super::model::ScoredRecord;

// ---------------------------------------------------------------------------
// Search predicate
// ---------------------------------------------------------------------------

/// Case-insensitive substring search over planet and host names.
/// An absent or empty query matches everything. Whitespace is part of the
/// needle.
#[derive(Debug, Clone, Default)]
pub struct NameQuery {
    needle: Option<String>,
}

impl NameQuery {
    pub fn new(query: Option<&str>) -> Self {
        let needle = query.filter(|q| !q.is_empty()).map(str::to_lowercase);
        NameQuery { needle }
    }

    /// Whether the record's planet or host name contains the query.
    /// A missing host name never matches.
    pub fn matches(&self, rec: &ScoredRecord) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };
        let contains = |s: &str| s.to_lowercase().contains(needle.as_str());
        contains(&rec.record.planet_name)
            || rec.record.host_name.as_deref().is_some_and(contains)
    }
}

// ---------------------------------------------------------------------------
// Filter + sort
// ---------------------------------------------------------------------------

/// Return indices of records matching `query`, ordered by descending
/// habitability. Ties keep table order.
pub fn matching_indices(records: &[ScoredRecord], query: Option<&str>) -> Vec<usize> {
    let query = NameQuery::new(query);
    let mut indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, rec)| query.matches(rec))
        .map(|(i, _)| i)
        .collect();
    // `sort_by` is stable.
    indices.sort_by(|&a, &b| records[b].habitability().cmp(&records[a].habitability()));
    indices
}

/// Records matching `query`, highest habitability first.
pub fn filter_and_sort<'a>(records: &'a [ScoredRecord], query: Option<&str>) -> Vec<&'a ScoredRecord> {
    matching_indices(records, query)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use crate::habitability::score::HabitabilityScores;

    fn row(name: &str, host: Option<&str>, habitability: u8) -> ScoredRecord {
        ScoredRecord {
            record: Record {
                planet_name: name.into(),
                host_name: host.map(Into::into),
                ..Default::default()
            },
            scores: HabitabilityScores {
                habitability,
                ..Default::default()
            },
        }
    }

    fn table() -> Vec<ScoredRecord> {
        vec![
            row("Kepler-442b", Some("Kepler-442"), 72),
            row("TRAPPIST-1e", Some("TRAPPIST-1"), 85),
        ]
    }

    fn names(rows: &[&ScoredRecord]) -> Vec<String> {
        rows.iter().map(|r| r.record.planet_name.clone()).collect()
    }

    #[test]
    fn query_matches_case_insensitively() {
        let t = table();
        let out = filter_and_sort(&t, Some("trap"));
        assert_eq!(names(&out), vec!["TRAPPIST-1e"]);
        assert_eq!(out[0].habitability(), 85);
    }

    #[test]
    fn empty_query_returns_everything_sorted() {
        let t = table();
        for q in [None, Some("")] {
            let out = filter_and_sort(&t, q);
            assert_eq!(names(&out), vec!["TRAPPIST-1e", "Kepler-442b"]);
        }
    }

    #[test]
    fn whitespace_is_matched_literally() {
        let t = vec![
            row("Kepler-442b", Some("Kepler-442"), 72),
            row("TRAPPIST-1e", Some("TRAPPIST-1"), 85),
            row("HD 40307 g", Some("HD 40307"), 30),
        ];
        assert_eq!(names(&filter_and_sort(&t, Some(" "))), vec!["HD 40307 g"]);
        assert!(filter_and_sort(&t, Some("Kepler-442 ")).is_empty());
        assert!(filter_and_sort(&t[..2], Some("   ")).is_empty());
    }

    #[test]
    fn host_name_matches_and_null_host_never_does() {
        let t = vec![
            row("b", Some("Gliese 667 C"), 40),
            row("Gliese-orphan", None, 50),
            row("c", None, 90),
        ];
        let out = filter_and_sort(&t, Some("gliese"));
        assert_eq!(names(&out), vec!["Gliese-orphan", "b"]);
        assert!(filter_and_sort(&t, Some("667 c")).len() == 1);
    }

    #[test]
    fn ties_keep_table_order() {
        let t = vec![
            row("first", None, 50),
            row("top", None, 70),
            row("second", None, 50),
            row("third", None, 50),
        ];
        assert_eq!(matching_indices(&t, None), vec![1, 0, 2, 3]);
    }

    #[test]
    fn no_match_and_empty_table_give_empty_results() {
        let t = table();
        assert!(filter_and_sort(&t, Some("proxima")).is_empty());
        assert!(filter_and_sort(&[], Some("x")).is_empty());
        assert!(filter_and_sort(&[], None).is_empty());
    }
}
