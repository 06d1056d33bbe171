//! Post-order walk with an explicit in-progress stack.

use std::collections::HashMap;
use std::sync::Arc;

use crate::components::{Capabilities, ComponentId};
use crate::error::DependencyError;

use super::Dependencies;

/// One element taking part in resolution.
pub(crate) trait Node {
    fn id(&self) -> &ComponentId;
    fn capabilities(&self) -> &Capabilities;
    fn resolve(&self, deps: &mut Dependencies<'_>) -> Result<(), DependencyError>;
}

/// Computes the processing order of a fixed set of nodes. Single use.
pub(crate) struct Resolver {
    nodes: Vec<Arc<dyn Node>>,
    index: HashMap<ComponentId, usize>,
    stack: Vec<usize>,
    finished: Vec<bool>,
    order: Vec<usize>,
    /// First failure seen; sticky even if a requester ignored it.
    failed: Option<DependencyError>,
}

impl Resolver {
    /// Nodes must be given in registration order, with unique ids.
    pub(crate) fn new(nodes: Vec<Arc<dyn Node>>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id().clone(), i))
            .collect();
        let finished = vec![false; nodes.len()];
        Self {
            nodes,
            index,
            stack: Vec::new(),
            finished,
            order: Vec::new(),
            failed: None,
        }
    }

    /// Runs the walk; returns node indices, dependencies first.
    pub(crate) fn resolve(mut self) -> Result<Vec<usize>, DependencyError> {
        for root in 0..self.nodes.len() {
            self.visit(root)?;
        }
        match self.failed {
            Some(err) => Err(err),
            None => Ok(self.order),
        }
    }

    /// Resolves `idx` and everything it pulls in.
    ///
    /// Once any node failed, every later visit reports that first failure, so a
    /// requester discarding a lookup error cannot hide a cycle or a rejection.
    pub(super) fn visit(&mut self, idx: usize) -> Result<(), DependencyError> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        if self.finished[idx] {
            return Ok(());
        }
        if let Some(pos) = self.stack.iter().position(|&i| i == idx) {
            let mut path: Vec<ComponentId> = self.stack[pos..]
                .iter()
                .map(|&i| self.nodes[i].id().clone())
                .collect();
            path.push(self.nodes[idx].id().clone());
            return Err(self.fail(DependencyError::Cycle { path }));
        }

        let depth = self.stack.len();
        self.stack.push(idx);
        let node = Arc::clone(&self.nodes[idx]);
        let res = node.resolve(&mut Dependencies::new(self, idx));
        self.stack.truncate(depth);

        if let Err(err) = res {
            return Err(self.fail(err));
        }
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        self.finished[idx] = true;
        self.order.push(idx);
        Ok(())
    }

    /// Records `err` unless an earlier failure is already recorded; returns the recorded one.
    fn fail(&mut self, err: DependencyError) -> DependencyError {
        self.failed.get_or_insert(err).clone()
    }

    pub(super) fn node(&self, idx: usize) -> &dyn Node {
        self.nodes[idx].as_ref()
    }

    pub(super) fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Indices of every node exposing `T`, in registration order.
    pub(super) fn providers<T>(&self) -> Vec<usize>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.capabilities().contains::<T>())
            .map(|(i, _)| i)
            .collect()
    }
}
