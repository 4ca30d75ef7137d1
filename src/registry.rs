//! Enumerates deletion groups and resolves short identifiers against them.

use crate::errors::CoreError;
use crate::fs::FileSystem;
use crate::identifier::{ContainerName, GroupId};
use crate::models::DeletionGroup;
use std::path::{Path, PathBuf};

/// View over the deletion groups stored in one trash root.
pub struct Registry<'a> {
    fs: &'a dyn FileSystem,
    root: PathBuf,
}

impl<'a> Registry<'a> {
    pub fn new(fs: &'a dyn FileSystem, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists every deletion group, oldest first.
    ///
    /// Children that are not directories or whose names fall outside the
    /// container naming scheme are skipped.
    pub fn groups(&self) -> crate::Result<Vec<DeletionGroup>> {
        let mut groups = Vec::new();
        for child in self.fs.list_dir(&self.root)? {
            let Some(name) = child.file_name().and_then(|n| n.to_str()) else {
                log::warn!("skipping non UTF-8 entry {}", child.display());
                continue;
            };
            let Some(parsed) = ContainerName::parse(name) else {
                log::warn!("skipping foreign entry {} in trash", child.display());
                continue;
            };
            if !self.fs.is_dir(&child) {
                log::warn!("skipping {}: not a directory", child.display());
                continue;
            }
            groups.push(DeletionGroup::new(parsed, &self.root));
        }
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    /// Maps every requested short id to exactly one deletion group.
    ///
    /// Fails on the first id (in request order) that matches nothing or more
    /// than one group; nothing is returned unless every id resolves. Ids that
    /// resolve to an already bound group are dropped from the result.
    pub fn resolve(&self, short_ids: &[String]) -> crate::Result<Vec<(String, DeletionGroup)>> {
        let groups = self.groups()?;
        let ids: Vec<GroupId> = groups.iter().map(|g| g.id().clone()).collect();

        let mut bound: Vec<(String, DeletionGroup)> = Vec::with_capacity(short_ids.len());
        for short_id in short_ids {
            let index = match_prefix(&ids, short_id)?;
            let group = &groups[index];
            if bound.iter().any(|(_, g)| g.name == group.name) {
                log::debug!("{short_id} names group {} again, skipping", group.id());
                continue;
            }
            bound.push((short_id.clone(), group.clone()));
        }
        Ok(bound)
    }
}

/// Returns the index of the single id having `prefix` as a prefix.
///
/// Classification depends only on the set of matching ids, never on the
/// order in which `ids` are scanned.
pub fn match_prefix(ids: &[GroupId], prefix: &str) -> crate::Result<usize> {
    if prefix.is_empty() {
        return Err(CoreError::invalid_input("empty deletion group id"));
    }
    let matches: Vec<usize> = ids
        .iter()
        .enumerate()
        .filter(|(_, id)| id.matches_prefix(prefix))
        .map(|(index, _)| index)
        .collect();

    match matches.as_slice() {
        [] => Err(CoreError::NotFound(prefix.to_string())),
        [single] => Ok(*single),
        many => {
            let mut names: Vec<String> = many.iter().map(|&i| ids[i].to_string()).collect();
            names.sort();
            Err(CoreError::Ambiguous {
                id: prefix.to_string(),
                matches: names,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::RealFileSystem;
    use proptest::prelude::*;
    use std::fs;

    fn ids(values: &[&str]) -> Vec<GroupId> {
        values.iter().map(|v| GroupId::new(*v)).collect()
    }

    #[test]
    fn prefix_resolution_classifies_matches() {
        let stored = ids(&["abc123", "abc999", "xyz000"]);
        assert!(matches!(match_prefix(&stored, "abc"), Err(CoreError::Ambiguous { .. })));
        assert_eq!(match_prefix(&stored, "abc1").unwrap(), 0);
        assert!(matches!(match_prefix(&stored, "q"), Err(CoreError::NotFound(id)) if id == "q"));
        assert_eq!(match_prefix(&stored, "xyz000").unwrap(), 2);
    }

    #[test]
    fn empty_prefix_is_rejected() {
        let stored = ids(&["abc123"]);
        assert!(matches!(match_prefix(&stored, ""), Err(CoreError::InvalidInput(_))));
    }

    fn make_trash(names: &[&str]) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        for name in names {
            fs::create_dir(tmp.path().join(name)).unwrap();
        }
        tmp
    }

    #[test]
    fn groups_skip_foreign_entries() {
        let tmp = make_trash(&["2020-01-01T00-00-00-abc123", "2019-05-05T10-00-00-xyz000", "lost+found"]);
        fs::write(tmp.path().join("2020-01-01T00-00-00-file1"), b"x").unwrap();

        let registry = Registry::new(&RealFileSystem, tmp.path());
        let names: Vec<String> = registry
            .groups()
            .unwrap()
            .iter()
            .map(|g| g.container_name())
            .collect();
        assert_eq!(names, vec!["2019-05-05T10-00-00-xyz000", "2020-01-01T00-00-00-abc123"]);
    }

    #[test]
    fn resolve_is_all_or_nothing() {
        let tmp = make_trash(&[
            "2020-01-01T00-00-00-abc123",
            "2020-01-01T00-00-01-abc999",
            "2020-01-01T00-00-02-xyz000",
        ]);
        let registry = Registry::new(&RealFileSystem, tmp.path());

        let err = registry
            .resolve(&["abc1".to_string(), "doesnotexist".to_string()])
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(id) if id == "doesnotexist"));

        let resolved = registry.resolve(&["abc1".to_string(), "x".to_string()]).unwrap();
        let got: Vec<(&str, &str)> = resolved
            .iter()
            .map(|(short, g)| (short.as_str(), g.id().as_str()))
            .collect();
        assert_eq!(got, vec![("abc1", "abc123"), ("x", "xyz000")]);
    }

    #[test]
    fn resolve_binds_each_group_once() {
        let tmp = make_trash(&["2020-01-01T00-00-00-abc123"]);
        let registry = Registry::new(&RealFileSystem, tmp.path());
        let resolved = registry
            .resolve(&["abc".to_string(), "abc123".to_string()])
            .unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].0, "abc");
    }

    proptest! {
        #[test]
        fn classification_ignores_scan_order(
            stored in proptest::collection::hash_set("[a-c]{1,4}", 1..8),
            prefix in "[a-c]{1,2}",
        ) {
            let forward: Vec<GroupId> = stored.iter().map(|s| GroupId::new(s.as_str())).collect();
            let mut backward = forward.clone();
            backward.reverse();

            let pick = |ids: &[GroupId]| match match_prefix(ids, &prefix) {
                Ok(index) => Ok(ids[index].clone()),
                Err(CoreError::NotFound(_)) => Err("not found".to_string()),
                Err(CoreError::Ambiguous { matches, .. }) => Err(matches.join(",")),
                Err(other) => Err(other.to_string()),
            };
            prop_assert_eq!(pick(&forward), pick(&backward));
        }
    }
}
