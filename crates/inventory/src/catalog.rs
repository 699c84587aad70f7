//! Explicit and excluded catalogs of item/type/source names.
//!
//! A catalog entry is a name the user has declared for selection menus,
//! independent of whether any movement references it yet. Removal is a soft
//! delete: the name goes into an exclusion set and historical movements are
//! untouched. Selectable sets are derived as
//! `(explicit ∪ observed-in-movements) − excluded`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use stockdeck_core::{DomainError, DomainResult};

/// Which catalog an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Item,
    Type,
    Source,
}

/// User-declared names plus soft-delete exclusion sets.
///
/// Exclusion dominates when a name sits in both an explicit set and its
/// exclusion set; a subsequent explicit add clears the exclusion again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    items: BTreeSet<String>,
    /// Type names scoped under their parent item.
    types: BTreeMap<String, BTreeSet<String>>,
    sources: BTreeSet<String>,

    excluded_items: BTreeSet<String>,
    excluded_types: BTreeMap<String, BTreeSet<String>>,
    excluded_sources: BTreeSet<String>,
}

fn validated(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an entry. Idempotent; clears a prior exclusion of the same name.
    pub fn add(&mut self, kind: CatalogKind, name: &str, parent: Option<&str>) -> DomainResult<()> {
        match kind {
            CatalogKind::Item => self.add_item(name),
            CatalogKind::Type => {
                let parent = parent
                    .ok_or_else(|| DomainError::validation("type entries require a parent item"))?;
                self.add_type(parent, name)
            }
            CatalogKind::Source => self.add_source(name),
        }
    }

    /// Soft-delete an entry: excluded from selection menus from now on.
    pub fn remove(&mut self, kind: CatalogKind, name: &str, parent: Option<&str>) -> DomainResult<()> {
        match kind {
            CatalogKind::Item => self.remove_item(name),
            CatalogKind::Type => {
                let parent = parent
                    .ok_or_else(|| DomainError::validation("type entries require a parent item"))?;
                self.remove_type(parent, name)
            }
            CatalogKind::Source => self.remove_source(name),
        }
    }

    pub fn add_item(&mut self, name: &str) -> DomainResult<()> {
        let name = validated(name)?;
        self.excluded_items.remove(&name);
        self.items.insert(name);
        Ok(())
    }

    pub fn remove_item(&mut self, name: &str) -> DomainResult<()> {
        let name = validated(name)?;
        self.excluded_items.insert(name);
        Ok(())
    }

    pub fn add_type(&mut self, item: &str, name: &str) -> DomainResult<()> {
        let item = validated(item)?;
        let name = validated(name)?;
        self.excluded_types.entry(item.clone()).or_default().remove(&name);
        self.types.entry(item.clone()).or_default().insert(name);
        // Declaring a type implies its parent item.
        self.items.insert(item);
        Ok(())
    }

    pub fn remove_type(&mut self, item: &str, name: &str) -> DomainResult<()> {
        let item = validated(item)?;
        let name = validated(name)?;
        self.excluded_types.entry(item).or_default().insert(name);
        Ok(())
    }

    pub fn add_source(&mut self, name: &str) -> DomainResult<()> {
        let name = validated(name)?;
        self.excluded_sources.remove(&name);
        self.sources.insert(name);
        Ok(())
    }

    pub fn remove_source(&mut self, name: &str) -> DomainResult<()> {
        let name = validated(name)?;
        self.excluded_sources.insert(name);
        Ok(())
    }

    /// Whether a source name has been declared (excluded or not).
    pub fn has_source(&self, name: &str) -> bool {
        self.sources.contains(name)
    }

    /// Items offered for selection, given the item names observed in the log.
    pub fn selectable_items<'a>(&self, observed: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut names = self.items.clone();
        names.extend(observed.into_iter().map(str::to_owned));
        names.retain(|n| !self.excluded_items.contains(n));
        names.into_iter().collect()
    }

    /// Types offered for selection under `item`.
    pub fn selectable_types<'a>(
        &self,
        item: &str,
        observed: impl IntoIterator<Item = &'a str>,
    ) -> Vec<String> {
        let mut names = self.types.get(item).cloned().unwrap_or_default();
        names.extend(observed.into_iter().map(str::to_owned));
        if let Some(excluded) = self.excluded_types.get(item) {
            names.retain(|n| !excluded.contains(n));
        }
        names.into_iter().collect()
    }

    /// Sources offered for selection.
    pub fn selectable_sources<'a>(&self, observed: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut names = self.sources.clone();
        names.extend(observed.into_iter().map(str::to_owned));
        names.retain(|n| !self.excluded_sources.contains(n));
        names.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent() {
        let mut catalog = Catalog::new();
        catalog.add_item("Boxes").unwrap();
        catalog.add_item("Boxes").unwrap();

        assert_eq!(catalog.selectable_items([]), vec!["Boxes".to_string()]);
    }

    #[test]
    fn add_rejects_blank_names() {
        let mut catalog = Catalog::new();
        let err = catalog.add_item("   ").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn removed_entries_disappear_from_selection() {
        let mut catalog = Catalog::new();
        catalog.add_item("Boxes").unwrap();
        catalog.add_item("Tapes").unwrap();
        catalog.remove_item("Boxes").unwrap();

        assert_eq!(catalog.selectable_items([]), vec!["Tapes".to_string()]);
    }

    #[test]
    fn exclusion_dominates_observed_names() {
        let mut catalog = Catalog::new();
        catalog.remove_item("Boxes").unwrap();

        // "Boxes" only exists because movements reference it; exclusion still wins.
        assert!(catalog.selectable_items(["Boxes"]).is_empty());
    }

    #[test]
    fn re_adding_clears_the_exclusion() {
        let mut catalog = Catalog::new();
        catalog.add_item("Boxes").unwrap();
        catalog.remove_item("Boxes").unwrap();
        catalog.add_item("Boxes").unwrap();

        assert_eq!(catalog.selectable_items([]), vec!["Boxes".to_string()]);
    }

    #[test]
    fn observed_only_names_are_selectable() {
        let catalog = Catalog::new();
        assert_eq!(catalog.selectable_items(["Gloves"]), vec!["Gloves".to_string()]);
    }

    #[test]
    fn types_are_scoped_under_their_parent() {
        let mut catalog = Catalog::new();
        catalog.add_type("Boxes", "Small").unwrap();
        catalog.add_type("Tapes", "Clear").unwrap();

        assert_eq!(catalog.selectable_types("Boxes", []), vec!["Small".to_string()]);
        assert_eq!(catalog.selectable_types("Tapes", []), vec!["Clear".to_string()]);
        // Declaring a type implies the parent item.
        assert_eq!(
            catalog.selectable_items([]),
            vec!["Boxes".to_string(), "Tapes".to_string()]
        );
    }

    #[test]
    fn removed_type_only_affects_its_parent() {
        let mut catalog = Catalog::new();
        catalog.add_type("Boxes", "Small").unwrap();
        catalog.add_type("Tapes", "Small").unwrap();
        catalog.remove_type("Boxes", "Small").unwrap();

        assert!(catalog.selectable_types("Boxes", []).is_empty());
        assert_eq!(catalog.selectable_types("Tapes", []), vec!["Small".to_string()]);
    }

    #[test]
    fn sources_behave_like_items() {
        let mut catalog = Catalog::new();
        catalog.add_source("Warehouse").unwrap();
        catalog.remove_source("Warehouse").unwrap();

        assert!(catalog.selectable_sources([]).is_empty());
        assert!(catalog.has_source("Warehouse"));
    }
}
