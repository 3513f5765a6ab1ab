//! Operations and the command tree that dispatches to them
//!
//! A [`CommandNode`] is either a leaf wrapping one [`Operation`] or a fork
//! ([`OperationGroup`]) that picks a named child. The argument parser
//! guarantees a child is selected at every fork before anything executes, so
//! the tree behaves the same at any depth.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use clap::{ArgMatches, Command};
use serde_json::Value;
use tracing::debug;

use crate::application::sink::{OutputFormat, OutputSink};
use crate::domain::{ClassifiedFailure, ErrorKind};

/// Global argument ids, declared on the root command.
pub const FORMAT_ARG: &str = "format";
pub const VERBOSE_ARG: &str = "verbose";

/// What an operation hands back: its structured value or a classified failure.
pub type OperationResult = Result<Value, ClassifiedFailure>;

/// A unit of work reachable from the command line.
pub trait Operation {
    /// Register this operation's flags and positionals on `command`.
    fn declare(&self, command: Command) -> Command;

    /// Run against parsed arguments, narrating through `sink`.
    fn execute(&self, args: &Namespace, sink: &mut dyn OutputSink) -> OperationResult;
}

pub enum CommandNode {
    Leaf(Box<dyn Operation>),
    Fork(OperationGroup),
}

impl CommandNode {
    pub fn leaf(operation: impl Operation + 'static) -> Self {
        CommandNode::Leaf(Box::new(operation))
    }

    pub fn declare(&self, command: Command) -> Command {
        match self {
            CommandNode::Leaf(operation) => operation.declare(command),
            CommandNode::Fork(group) => group.declare(command),
        }
    }

    pub fn execute(&self, args: &Namespace, sink: &mut dyn OutputSink) -> OperationResult {
        match self {
            CommandNode::Leaf(operation) => operation.execute(args, sink),
            CommandNode::Fork(group) => group.execute(args, sink),
        }
    }
}

impl From<OperationGroup> for CommandNode {
    fn from(group: OperationGroup) -> Self {
        CommandNode::Fork(group)
    }
}

/// A fork: named children under one sub-command chooser.
pub struct OperationGroup {
    dest: String,
    children: Vec<(String, CommandNode)>,
}

impl OperationGroup {
    /// `dest` is the namespace key the chosen child's name is recorded under.
    pub fn new(dest: impl Into<String>) -> Self {
        Self {
            dest: dest.into(),
            children: Vec::new(),
        }
    }

    /// Add a child.
    ///
    /// # Panics
    /// If a sibling with the same name exists.
    pub fn with(mut self, name: impl Into<String>, node: impl Into<CommandNode>) -> Self {
        let name = name.into();
        assert!(
            self.child(&name).is_none(),
            "duplicate command '{}' under '{}'",
            name,
            self.dest
        );
        self.children.push((name, node.into()));
        self
    }

    pub fn dest(&self) -> &str {
        &self.dest
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(name, _)| name.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    pub fn declare(&self, command: Command) -> Command {
        let command = command.subcommand_required(true);
        self.children.iter().fold(command, |command, (name, node)| {
            command.subcommand(node.declare(Command::new(name.clone())))
        })
    }

    pub fn execute(&self, args: &Namespace, sink: &mut dyn OutputSink) -> OperationResult {
        let name = args.selection(&self.dest).ok_or_else(|| self.unregistered("<none>"))?;
        let child = self.child(name).ok_or_else(|| self.unregistered(name))?;
        debug!(dest = %self.dest, command = name, "dispatching");
        child.execute(args, sink)
    }

    fn unregistered(&self, name: &str) -> ClassifiedFailure {
        ClassifiedFailure::with_arguments(
            ErrorKind::InternalUnregisteredCommand,
            [("dest", self.dest.as_str()), ("command", name)],
        )
    }
}

/// The whole tree, rooted at a fork.
pub struct CommandTree {
    root: OperationGroup,
}

impl CommandTree {
    /// # Panics
    /// If two forks anywhere in the tree share a `dest`.
    pub fn new(root: OperationGroup) -> Self {
        let mut seen = HashSet::new();
        collect_dests(&root, &mut seen);
        Self { root }
    }

    pub fn root(&self) -> &OperationGroup {
        &self.root
    }

    pub fn declare(&self, command: Command) -> Command {
        self.root.declare(command)
    }

    pub fn execute(&self, args: &Namespace, sink: &mut dyn OutputSink) -> OperationResult {
        self.root.execute(args, sink)
    }

    /// Record every fork's selection from parsed `matches`.
    pub fn resolve(&self, matches: &ArgMatches) -> Namespace {
        let mut selections = BTreeMap::new();
        let mut group = &self.root;
        let mut current = matches;
        while let Some((name, sub)) = current.subcommand() {
            selections.insert(group.dest.clone(), name.to_string());
            current = sub;
            match group.child(name) {
                Some(CommandNode::Fork(next)) => group = next,
                _ => break,
            }
        }
        Namespace::new(selections, current.clone())
    }
}

fn collect_dests<'a>(group: &'a OperationGroup, seen: &mut HashSet<&'a str>) {
    assert!(
        seen.insert(group.dest.as_str()),
        "duplicate dest '{}' in command tree",
        group.dest
    );
    for (_, node) in &group.children {
        if let CommandNode::Fork(child) = node {
            collect_dests(child, seen);
        }
    }
}

/// Parsed arguments: the name chosen at each fork plus the leaf's values.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    selections: BTreeMap<String, String>,
    matches: ArgMatches,
}

impl Namespace {
    pub fn new(selections: BTreeMap<String, String>, matches: ArgMatches) -> Self {
        Self {
            selections,
            matches,
        }
    }

    /// Name of the child chosen at the fork keyed by `dest`.
    pub fn selection(&self, dest: &str) -> Option<&str> {
        self.selections.get(dest).map(String::as_str)
    }

    pub fn path(&self, id: &str) -> Option<&PathBuf> {
        self.matches.try_get_one::<PathBuf>(id).ok().flatten()
    }

    pub fn string(&self, id: &str) -> Option<&String> {
        self.matches.try_get_one::<String>(id).ok().flatten()
    }

    /// Output format given on the command line, if any.
    pub fn format(&self) -> Option<OutputFormat> {
        self.matches
            .try_get_one::<OutputFormat>(FORMAT_ARG)
            .ok()
            .flatten()
            .copied()
    }

    pub fn verbosity(&self) -> u8 {
        self.matches
            .try_get_one::<u8>(VERBOSE_ARG)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(0)
    }
}
