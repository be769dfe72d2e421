//! Hashtag ranking for the trends chart, plus popular/related/niche buckets.

use std::collections::HashMap;

use crate::scenario::{HashtagFrequency, ScenarioRecord};

/// Default number of bars in the trends chart.
pub const DEFAULT_TOP_N: usize = 10;

/// One chart bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashtagCount {
    pub name: String,
    pub count: u64,
}

/// Sort by count descending and keep the first `top_n`.
///
/// The sort is stable: equal counts keep the order the service sent.
pub fn rank_top_hashtags(frequencies: &[HashtagFrequency], top_n: usize) -> Vec<HashtagCount> {
    let mut ranked: Vec<HashtagCount> = frequencies
        .iter()
        .map(|f| HashtagCount {
            name: f.name.clone(),
            count: f.count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(top_n);
    ranked
}

/// Count hashtag occurrences across scenarios, in first-seen order.
/// Used when the service does not send `top_hashtags`.
pub fn count_scenario_hashtags(scenarios: &[ScenarioRecord]) -> Vec<HashtagFrequency> {
    let mut order: Vec<HashtagFrequency> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tag in scenarios.iter().flat_map(|s| s.hashtags.iter()) {
        match index.get(tag.as_str()) {
            Some(&i) => order[i].count += 1,
            None => {
                index.insert(tag.as_str(), order.len());
                order.push(HashtagFrequency::new(tag.clone(), 1));
            }
        }
    }

    order
}

/// Chart data for a response: the service's frequencies when present,
/// otherwise counts derived from the scenarios themselves.
pub fn chart_data(
    top_hashtags: Option<&[HashtagFrequency]>,
    scenarios: &[ScenarioRecord],
    top_n: usize,
) -> Vec<HashtagCount> {
    match top_hashtags {
        Some(freqs) => rank_top_hashtags(freqs, top_n),
        None => rank_top_hashtags(&count_scenario_hashtags(scenarios), top_n),
    }
}

/// Hashtags grouped for the trends screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashtagBuckets {
    /// The ranked chart entries.
    pub popular: Vec<String>,
    /// Submitted hashtags that some scenario echoed back.
    pub related: Vec<String>,
    /// Tags used by exactly one scenario.
    pub niche: Vec<String>,
}

/// Split hashtags into buckets. A tag lands in at most one bucket, checked
/// in the order popular, related, niche.
pub fn bucket_hashtags(
    chart: &[HashtagCount],
    scenarios: &[ScenarioRecord],
    submitted: &[String],
) -> HashtagBuckets {
    let popular: Vec<String> = chart.iter().map(|c| c.name.clone()).collect();

    let mut related: Vec<String> = Vec::new();
    for tag in submitted {
        let echoed = scenarios.iter().any(|s| s.hashtags.contains(tag));
        if echoed && !popular.contains(tag) && !related.contains(tag) {
            related.push(tag.clone());
        }
    }

    // Per-scenario presence, not raw occurrences.
    let mut usage: Vec<(&str, usize)> = Vec::new();
    for scenario in scenarios {
        let mut seen: Vec<&str> = Vec::new();
        for tag in &scenario.hashtags {
            if seen.contains(&tag.as_str()) {
                continue;
            }
            seen.push(tag.as_str());
            match usage.iter_mut().find(|(name, _)| *name == tag.as_str()) {
                Some((_, n)) => *n += 1,
                None => usage.push((tag.as_str(), 1)),
            }
        }
    }

    let niche = usage
        .into_iter()
        .filter(|(name, n)| {
            *n == 1
                && !popular.iter().any(|p| p == name)
                && !related.iter().any(|r| r == name)
        })
        .map(|(name, _)| name.to_string())
        .collect();

    HashtagBuckets {
        popular,
        related,
        niche,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ContentGuidance;

    fn freq(name: &str, count: u64) -> HashtagFrequency {
        HashtagFrequency::new(name, count)
    }

    fn scenario(tags: &[&str]) -> ScenarioRecord {
        ScenarioRecord {
            scenario: "s".into(),
            reason: "r".into(),
            hashtags: tags.iter().map(|t| t.to_string()).collect(),
            content_guidance: ContentGuidance::default(),
        }
    }

    fn names(counts: &[HashtagCount]) -> Vec<(&str, u64)> {
        counts.iter().map(|c| (c.name.as_str(), c.count)).collect()
    }

    #[test]
    fn ranks_descending_by_count() {
        let ranked = rank_top_hashtags(&[freq("a", 5), freq("b", 9), freq("c", 1)], DEFAULT_TOP_N);
        assert_eq!(names(&ranked), vec![("b", 9), ("a", 5), ("c", 1)]);
    }

    #[test]
    fn truncates_to_top_n() {
        let freqs: Vec<_> = (0..15).map(|i| freq(&format!("t{i}"), i)).collect();
        let ranked = rank_top_hashtags(&freqs, DEFAULT_TOP_N);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].name, "t14");
        assert_eq!(ranked[9].name, "t5");
    }

    #[test]
    fn ties_keep_service_order() {
        let ranked = rank_top_hashtags(&[freq("x", 2), freq("y", 3), freq("z", 2)], 10);
        assert_eq!(names(&ranked), vec![("y", 3), ("x", 2), ("z", 2)]);
    }

    #[test]
    fn empty_input_gives_empty_chart() {
        assert!(rank_top_hashtags(&[], 10).is_empty());
    }

    #[test]
    fn falls_back_to_scenario_counts() {
        let scenarios = vec![scenario(&["#a", "#b"]), scenario(&["#b", "#c"]), scenario(&["#b"])];
        let chart = chart_data(None, &scenarios, 10);
        assert_eq!(names(&chart), vec![("#b", 3), ("#a", 1), ("#c", 1)]);
    }

    #[test]
    fn service_frequencies_win_over_derived_counts() {
        let scenarios = vec![scenario(&["#a"])];
        let chart = chart_data(Some(&[freq("#z", 7)][..]), &scenarios, 10);
        assert_eq!(names(&chart), vec![("#z", 7)]);
    }

    #[test]
    fn buckets_are_disjoint() {
        let scenarios = vec![
            scenario(&["#pop", "#mine", "#solo1"]),
            scenario(&["#pop", "#shared"]),
            scenario(&["#shared", "#solo2"]),
        ];
        let chart = vec![HashtagCount {
            name: "#pop".into(),
            count: 2,
        }];
        let submitted = vec!["#mine".to_string(), "#pop".to_string(), "#absent".to_string()];

        let buckets = bucket_hashtags(&chart, &scenarios, &submitted);
        assert_eq!(buckets.popular, vec!["#pop"]);
        assert_eq!(buckets.related, vec!["#mine"]);
        assert_eq!(buckets.niche, vec!["#solo1", "#solo2"]);
    }

    #[test]
    fn repeated_tag_within_one_scenario_is_still_niche() {
        let scenarios = vec![scenario(&["#twice", "#twice"])];
        let buckets = bucket_hashtags(&[], &scenarios, &[]);
        assert_eq!(buckets.niche, vec!["#twice"]);
    }
}
