use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use super::model::{ParamValue, VideoRecord};
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Grouping configuration
// ---------------------------------------------------------------------------

/// Ordered grouping parameters: primary first, optional secondary.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupingConfig {
    params: Vec<String>,
}

impl GroupingConfig {
    pub fn new<S: Into<String>>(params: impl IntoIterator<Item = S>) -> Result<Self, ConfigError> {
        let params: Vec<String> = params.into_iter().map(Into::into).collect();
        if params.is_empty() || params.len() > 2 {
            return Err(ConfigError::GroupingParamCount(params.len()));
        }
        if params.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::EmptyGroupingParam);
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn primary(&self) -> &str {
        &self.params[0]
    }

    pub fn secondary(&self) -> Option<&str> {
        self.params.get(1).map(String::as_str)
    }
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            params: vec!["maxsepturn".to_string(), "vis".to_string()],
        }
    }
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// Composite group key: `(name, value)` per grouping parameter, in config order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey(pub Vec<(String, ParamValue)>);

impl GroupKey {
    pub fn value(&self, name: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.0)
    }
}

impl fmt::Display for GroupKey {
    /// `maxsepturn=3_vis=10`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "_")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

/// Records sharing one exact composite key.
#[derive(Debug, Clone)]
pub struct Group {
    pub key: GroupKey,
    pub members: Vec<VideoRecord>,
}

/// Bucket records by the configured parameters and return the groups in
/// complexity order.
///
/// A record missing any grouping parameter is dropped.
pub fn group_records(records: &[VideoRecord], config: &GroupingConfig) -> Vec<Group> {
    let mut buckets: BTreeMap<GroupKey, Vec<VideoRecord>> = BTreeMap::new();
    let mut dropped = 0usize;

    for rec in records {
        let key: Option<Vec<(String, ParamValue)>> = config
            .params()
            .iter()
            .map(|name| rec.param(name).map(|v| (name.clone(), ParamValue(v))))
            .collect();
        match key {
            Some(key) => buckets.entry(GroupKey(key)).or_default().push(rec.clone()),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        log::debug!(
            "dropped {dropped} records missing one of {:?}",
            config.params()
        );
    }

    let mut groups: Vec<Group> = buckets
        .into_iter()
        .map(|(key, members)| Group { key, members })
        .collect();
    sort_groups(&mut groups, config);
    groups
}

/// Stable sort: primary ascending, then secondary ascending.
pub fn sort_groups(groups: &mut [Group], config: &GroupingConfig) {
    groups.sort_by(|a, b| compare_keys(&a.key, &b.key, config));
}

/// Compare two keys by the primary parameter, then the secondary.
pub fn compare_keys(a: &GroupKey, b: &GroupKey, config: &GroupingConfig) -> Ordering {
    let primary = config.primary();
    compare_values(a.value(primary), b.value(primary)).then_with(|| match config.secondary() {
        Some(secondary) => compare_values(a.value(secondary), b.value(secondary)),
        None => Ordering::Equal,
    })
}

/// Missing values sort after every present value; two missing values tie.
pub fn compare_values(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => ParamValue(x).cmp(&ParamValue(y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// Ranked selection
// ---------------------------------------------------------------------------

/// A representative video with the complexity rank of its group.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedVideo {
    pub record: VideoRecord,
    /// 1-based position of the group in complexity order.
    pub complexity_rank: usize,
    pub group_key: GroupKey,
}

/// Pick one member uniformly at random from each group; rank follows the
/// order of `groups`.
pub fn rank_groups<R: Rng + ?Sized>(groups: &[Group], rng: &mut R) -> Vec<RankedVideo> {
    groups
        .iter()
        .filter_map(|group| group.members.choose(&mut *rng).map(|rec| (group, rec)))
        .enumerate()
        .map(|(index, (group, rec))| RankedVideo {
            record: rec.clone(),
            complexity_rank: index + 1,
            group_key: group.key.clone(),
        })
        .collect()
}

/// Group, sort and select in one step.
pub fn ranked_selection<R: Rng + ?Sized>(
    records: &[VideoRecord],
    config: &GroupingConfig,
    rng: &mut R,
) -> Vec<RankedVideo> {
    rank_groups(&group_records(records, config), rng)
}

// ---------------------------------------------------------------------------
// Sampling and ordering helpers
// ---------------------------------------------------------------------------

/// A shuffled copy of `items`.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

/// Uniform sample of `size` items without replacement, in random order.
///
/// When `items` has no more than `size` entries all of them come back shuffled.
pub fn random_subset<T: Clone, R: Rng + ?Sized>(items: &[T], size: usize, rng: &mut R) -> Vec<T> {
    if items.len() <= size {
        return shuffled(items, rng);
    }
    let mut picked: Vec<T> = items.choose_multiple(rng, size).cloned().collect();
    picked.shuffle(rng);
    picked
}

/// Array-move: take the item at `from` and insert it at `to`.
///
/// Returns `false` (and leaves `items` untouched) when either index is out of
/// range.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    true
}

/// Outcome of checking a user order against the complexity ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderCheck {
    Sorted,
    /// `position` is the 0-based index of the first item ranked lower than
    /// its predecessor.
    OutOfOrder { position: usize },
    /// Nothing to check.
    Empty,
}

/// Pass when the ranks are monotonically non-decreasing.
pub fn check_order<I>(ranks: I) -> OrderCheck
where
    I: IntoIterator,
    I::Item: PartialOrd,
{
    let mut ranks = ranks.into_iter().peekable();
    if ranks.peek().is_none() {
        return OrderCheck::Empty;
    }
    let mut prev: Option<I::Item> = None;
    for (position, rank) in ranks.enumerate() {
        if let Some(p) = &prev {
            if *p > rank {
                return OrderCheck::OutOfOrder { position };
            }
        }
        prev = Some(rank);
    }
    OrderCheck::Sorted
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn rec(id: &str) -> VideoRecord {
        VideoRecord::new(id, id)
    }

    #[test]
    fn config_rejects_bad_param_counts() {
        assert_eq!(
            GroupingConfig::new(Vec::<String>::new()),
            Err(ConfigError::GroupingParamCount(0))
        );
        assert_eq!(
            GroupingConfig::new(["a", "b", "c"]),
            Err(ConfigError::GroupingParamCount(3))
        );
        assert_eq!(
            GroupingConfig::new(["a", " "]),
            Err(ConfigError::EmptyGroupingParam)
        );
        let cfg = GroupingConfig::new(["maxsepturn"]).unwrap();
        assert_eq!(cfg.primary(), "maxsepturn");
        assert_eq!(cfg.secondary(), None);
    }

    #[test]
    fn groups_by_single_parameter() {
        let records = vec![
            rec("v/t_maxsepturn=3_vis=2"),
            rec("v/t_maxsepturn=6_vis=2"),
            rec("v/t_maxsepturn=3_vis=4"),
        ];
        let cfg = GroupingConfig::new(["maxsepturn"]).unwrap();
        let groups = group_records(&records, &cfg);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members.len(), 2);
        assert_eq!(groups[1].members.len(), 1);
        assert_eq!(groups[0].key.to_string(), "maxsepturn=3");
    }

    #[test]
    fn records_missing_a_parameter_are_dropped() {
        let records = vec![
            rec("v/t_maxsepturn=3_vis=2"),
            rec("v/t_maxsepturn=3"),
            rec("v/t_vis=2"),
        ];
        let groups = group_records(&records, &GroupingConfig::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members.len(), 1);
    }

    #[test]
    fn negative_zero_shares_a_group_with_zero() {
        let records = vec![rec("v/t_maxsepturn=0_vis=1"), rec("v/t_maxsepturn=-0_vis=1")];
        let groups = group_records(&records, &GroupingConfig::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members.len(), 2);
        assert_eq!(groups[0].key.to_string(), "maxsepturn=0_vis=1");
    }

    #[test]
    fn single_parameter_grouping_ignores_other_values() {
        let cfg = GroupingConfig::new(["vis"]).unwrap();
        let a = GroupKey(vec![("vis".into(), ParamValue(2.0))]);
        let b = GroupKey(vec![("vis".into(), ParamValue(2.0)), ("pop".into(), ParamValue(9.0))]);
        assert_eq!(compare_keys(&a, &b, &cfg), Ordering::Equal);
    }

    #[test]
    fn secondary_breaks_ties_numerically() {
        let records = vec![
            rec("v/t_maxsepturn=3_vis=10"),
            rec("v/t_maxsepturn=6_vis=1"),
            rec("v/t_maxsepturn=3_vis=5"),
        ];
        let groups = group_records(&records, &GroupingConfig::default());
        let keys: Vec<String> = groups.iter().map(|g| g.key.to_string()).collect();
        assert_eq!(
            keys,
            vec!["maxsepturn=3_vis=5", "maxsepturn=3_vis=10", "maxsepturn=6_vis=1"]
        );

        let mut rng = StdRng::seed_from_u64(1);
        let ranked = rank_groups(&groups, &mut rng);
        assert_eq!(ranked[0].group_key.value("vis"), Some(5.0));
        assert_eq!(ranked[0].complexity_rank, 1);
        assert_eq!(ranked[2].complexity_rank, 3);
    }

    #[test]
    fn missing_values_sort_last() {
        assert_eq!(compare_values(Some(1e9), None), Ordering::Less);
        assert_eq!(compare_values(None, Some(-1.0)), Ordering::Greater);
        assert_eq!(compare_values(None, None), Ordering::Equal);

        let cfg = GroupingConfig::default();
        let full = GroupKey(vec![
            ("maxsepturn".into(), ParamValue(3.0)),
            ("vis".into(), ParamValue(8.0)),
        ]);
        let partial = GroupKey(vec![("maxsepturn".into(), ParamValue(3.0))]);
        assert_eq!(compare_keys(&full, &partial, &cfg), Ordering::Less);
    }

    #[test]
    fn representative_selection_is_deterministic_for_a_seed() {
        let records: Vec<VideoRecord> = (0..20)
            .map(|i| rec(&format!("v/t_maxsepturn={}_vis=2_pop={i}", i % 4)))
            .collect();
        let cfg = GroupingConfig::default();

        let a = ranked_selection(&records, &cfg, &mut StdRng::seed_from_u64(7));
        let b = ranked_selection(&records, &cfg, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
        for (i, r) in a.iter().enumerate() {
            assert_eq!(r.complexity_rank, i + 1);
            assert_eq!(r.record.param("maxsepturn"), Some(i as f64));
        }
    }

    #[test]
    fn subset_of_small_dataset_returns_everything() {
        let items = vec![1, 2, 3];
        let mut rng = StdRng::seed_from_u64(3);
        let subset = random_subset(&items, 5, &mut rng);
        assert_eq!(subset.len(), 3);
        let set: BTreeSet<_> = subset.into_iter().collect();
        assert_eq!(set, BTreeSet::from([1, 2, 3]));
    }

    #[test]
    fn subset_samples_without_replacement() {
        let items: Vec<u32> = (0..50).collect();
        let mut rng = StdRng::seed_from_u64(11);
        let subset = random_subset(&items, 5, &mut rng);
        assert_eq!(subset.len(), 5);
        let set: BTreeSet<_> = subset.iter().copied().collect();
        assert_eq!(set.len(), 5);
        assert!(subset.iter().all(|v| items.contains(v)));
    }

    #[test]
    fn check_order_detects_inversions() {
        assert_eq!(check_order([1, 2, 3, 4, 5]), OrderCheck::Sorted);
        assert_eq!(
            check_order([1, 3, 2, 4, 5]),
            OrderCheck::OutOfOrder { position: 2 }
        );
        assert_eq!(check_order([2, 2, 3]), OrderCheck::Sorted);
        assert_eq!(check_order(Vec::<usize>::new()), OrderCheck::Empty);
    }

    #[test]
    fn move_item_reorders_like_array_move() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        assert!(move_item(&mut items, 0, 2));
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);
        assert!(move_item(&mut items, 3, 0));
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
        assert!(!move_item(&mut items, 4, 0));
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
    }
}
