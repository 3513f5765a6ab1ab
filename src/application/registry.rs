//! Registry of everything an invocation can reach
//!
//! Built once at startup and passed by reference; nothing in it changes
//! after construction.

use std::sync::Arc;

use crate::application::operation::{CommandNode, CommandTree, OperationGroup};
use crate::application::operations::{GetInfo, GetVersion, SetVersion};
use crate::application::services::DocumentService;
use crate::domain::PatternError;
use crate::infrastructure::document::{message_patterns, DocumentBackend, HeaderBackend};

/// Namespace keys of the forks.
pub const COMMAND_DEST: &str = "command";
pub const GET_DEST: &str = "get_command";
pub const SET_DEST: &str = "set_command";

pub struct Registry {
    documents: Arc<DocumentService>,
    tree: CommandTree,
}

impl Registry {
    /// Registry over the real document backend.
    pub fn new() -> Result<Self, PatternError> {
        Self::with_deps(Arc::new(HeaderBackend))
    }

    /// Registry over a custom backend (for testing).
    pub fn with_deps(backend: Arc<dyn DocumentBackend>) -> Result<Self, PatternError> {
        let documents = Arc::new(DocumentService::new(backend, message_patterns()?));
        let tree = command_tree(&documents);
        Ok(Self { documents, tree })
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    pub fn documents(&self) -> &Arc<DocumentService> {
        &self.documents
    }
}

fn command_tree(documents: &Arc<DocumentService>) -> CommandTree {
    let get = OperationGroup::new(GET_DEST)
        .with("version", CommandNode::leaf(GetVersion::new(Arc::clone(documents))))
        .with("info", CommandNode::leaf(GetInfo::new(Arc::clone(documents))));
    let set = OperationGroup::new(SET_DEST)
        .with("version", CommandNode::leaf(SetVersion::new(Arc::clone(documents))));

    CommandTree::new(OperationGroup::new(COMMAND_DEST).with("get", get).with("set", set))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::infrastructure::document::{DocumentInfo, RewriteError};
    use itertools::Itertools;
    use std::io;
    use std::path::Path;

    /// Backend that only ever sees empty files.
    struct EmptyFiles;

    impl DocumentBackend for EmptyFiles {
        fn read_version(&self, _path: &Path) -> io::Result<String> {
            Err(io::Error::other("Error: End-of-File, expected line"))
        }

        fn inspect(&self, path: &Path) -> io::Result<DocumentInfo> {
            self.read_version(path).map(|version| DocumentInfo {
                version,
                size_bytes: 0,
                has_eof_marker: false,
            })
        }

        fn write_version(
            &self,
            input: &Path,
            _output: &Path,
            _version: &str,
        ) -> Result<String, RewriteError> {
            self.read_version(input).map_err(RewriteError::Read)
        }
    }

    #[test]
    fn given_real_backend_when_building_registry_then_tree_has_get_and_set() {
        let registry = Registry::new().unwrap();

        let root = registry.tree().root();

        assert_eq!(root.dest(), COMMAND_DEST);
        assert_eq!(root.names().join(","), "get,set");
    }

    #[test]
    fn given_registry_when_inspecting_forks_then_each_lists_its_leaves() {
        let registry = Registry::new().unwrap();
        let root = registry.tree().root();

        let Some(CommandNode::Fork(get)) = root.child("get") else {
            panic!("'get' is not a fork");
        };
        let Some(CommandNode::Fork(set)) = root.child("set") else {
            panic!("'set' is not a fork");
        };

        assert_eq!(get.dest(), GET_DEST);
        assert_eq!(get.names().collect_vec(), vec!["version", "info"]);
        assert_eq!(set.dest(), SET_DEST);
        assert_eq!(set.names().collect_vec(), vec!["version"]);
    }

    #[test]
    fn given_custom_backend_when_building_registry_then_service_uses_its_patterns() {
        let registry = Registry::with_deps(Arc::new(EmptyFiles)).unwrap();

        let failure = registry
            .documents()
            .version(Path::new("empty.pdf"))
            .unwrap_err();

        assert_eq!(failure.kind(), ErrorKind::DocumentTruncated);
    }
}
