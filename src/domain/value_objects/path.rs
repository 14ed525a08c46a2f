//! Request path resolution.
//!
//! Infers, from an unannotated path, which components name resources, which
//! are ancestor identifiers and which is the target identifier:
//!
//! ```text
//! /threads                                  -> collection, no parents
//! /threads/<tid>/messages                   -> collection, {threads: tid}
//! /threads/<tid>/messages/<mid>             -> entity mid, {threads: tid}
//! ```

use uuid::Uuid;

/// Path resolution failures. All of them are client errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("error parsing URL: expected a resource name and identifier for each parent, found {count} leading components")]
    UnpairedSegments { count: usize },

    #[error("error parsing URL: path does not address resource '{expected}'")]
    ResourceMismatch { expected: String },

    #[error("error parsing URL: '{name}' is not a parent resource of '{resource}'")]
    UnknownParent { name: String, resource: String },

    #[error("error parsing URL: expected parent resource '{expected}', found '{name}'")]
    MisplacedParent { name: String, expected: String },

    #[error("error parsing URL: '{resource}' must be addressed under parent resource '{name}'")]
    MissingParent { name: String, resource: String },

    #[error("error parsing URL: parent resource '{name}' appears more than once")]
    DuplicateParent { name: String },

    #[error("error decoding UUID of path component '{component}': '{value}'")]
    MalformedParentId { component: String, value: String },

    #[error("error decoding UUID: '{value}'")]
    MalformedId { value: String },
}

/// Ancestor resource name to identifier, in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentIds {
    entries: Vec<(String, Uuid)>,
}

impl ParentIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ancestor. Returns false, leaving the map untouched, if the name
    /// is already present.
    pub fn insert(&mut self, name: impl Into<String>, id: Uuid) -> bool {
        let name = name.into();
        if self.get(&name).is_some() {
            return false;
        }
        self.entries.push((name, id));
        true
    }

    pub fn get(&self, name: &str) -> Option<Uuid> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Uuid)> {
        self.entries.iter().map(|(n, id)| (n.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, Uuid)> for ParentIds {
    fn from_iter<T: IntoIterator<Item = (N, Uuid)>>(iter: T) -> Self {
        let mut ids = ParentIds::new();
        for (name, id) in iter {
            ids.insert(name, id);
        }
        ids
    }
}

/// Result of resolving a request path against one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub parents: ParentIds,
    /// Target entity; `None` for a request on the whole collection.
    pub id: Option<Uuid>,
}

/// Resolves paths for one registered resource.
#[derive(Debug, Clone)]
pub struct PathResolver {
    resource: String,
    /// Ancestor resource names, outermost first.
    ancestry: Vec<String>,
}

impl PathResolver {
    pub fn new(resource: impl Into<String>, ancestry: Vec<String>) -> Self {
        Self {
            resource: resource.into(),
            ancestry,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Resolve `path`. A path whose last component is the resource name is a
    /// collection request; otherwise the last component must be an entity
    /// identifier following the resource name.
    pub fn resolve(&self, path: &str) -> Result<ResolvedPath, PathError> {
        let components = split_path(path);
        match components.split_last() {
            Some((last, leading)) if *last == self.resource => Ok(ResolvedPath {
                parents: self.parents(leading)?,
                id: None,
            }),
            Some((last, leading)) => {
                let id = Uuid::parse_str(last).map_err(|_| PathError::MalformedId {
                    value: last.to_string(),
                })?;
                match leading.split_last() {
                    Some((name, ancestors)) if *name == self.resource => Ok(ResolvedPath {
                        parents: self.parents(ancestors)?,
                        id: Some(id),
                    }),
                    _ => Err(self.mismatch()),
                }
            }
            None => Err(self.mismatch()),
        }
    }

    /// Resolve a path that must address the whole collection.
    pub fn resolve_collection(&self, path: &str) -> Result<ParentIds, PathError> {
        match self.resolve(path)? {
            ResolvedPath { parents, id: None } => Ok(parents),
            ResolvedPath { id: Some(_), .. } => Err(self.mismatch()),
        }
    }

    /// Resolve a path that must address a single entity.
    pub fn resolve_entity(&self, path: &str) -> Result<(ParentIds, Uuid), PathError> {
        let components = split_path(path);
        if components.last() == Some(&self.resource.as_str()) {
            // `/<resource>/<resource>` style paths land here: the trailing
            // component must be an identifier.
            return Err(PathError::MalformedId {
                value: self.resource.clone(),
            });
        }
        match self.resolve(path)? {
            ResolvedPath {
                parents,
                id: Some(id),
            } => Ok((parents, id)),
            ResolvedPath { id: None, .. } => Err(self.mismatch()),
        }
    }

    /// Read `(name, id)` pairs that must name every ancestor, outermost
    /// first.
    fn parents(&self, components: &[&str]) -> Result<ParentIds, PathError> {
        if components.len() % 2 != 0 {
            return Err(PathError::UnpairedSegments {
                count: components.len(),
            });
        }

        let mut parents = ParentIds::new();
        for (position, pair) in components.chunks_exact(2).enumerate() {
            let (name, value) = (pair[0], pair[1]);
            if parents.get(name).is_some() {
                return Err(PathError::DuplicateParent {
                    name: name.to_string(),
                });
            }
            match self.ancestry.get(position) {
                Some(expected) if expected == name => {}
                Some(expected) if self.ancestry.iter().any(|a| a == name) => {
                    return Err(PathError::MisplacedParent {
                        name: name.to_string(),
                        expected: expected.clone(),
                    });
                }
                _ => {
                    return Err(PathError::UnknownParent {
                        name: name.to_string(),
                        resource: self.resource.clone(),
                    });
                }
            }
            let id = Uuid::parse_str(value).map_err(|_| PathError::MalformedParentId {
                component: name.to_string(),
                value: value.to_string(),
            })?;
            parents.insert(name, id);
        }

        if let Some(missing) = self.ancestry.get(parents.len()) {
            return Err(PathError::MissingParent {
                name: missing.clone(),
                resource: self.resource.clone(),
            });
        }
        Ok(parents)
    }

    fn mismatch(&self) -> PathError {
        PathError::ResourceMismatch {
            expected: self.resource.clone(),
        }
    }
}

/// `/`-delimited components of a path, without the leading empty one.
pub fn split_path(path: &str) -> Vec<&str> {
    path.strip_prefix('/').unwrap_or(path).split('/').collect()
}
