//! Causality Oracles
//!
//! Topological depth is the tie-break the ordering policies fall back on
//! when two events are otherwise equal. It is the position of an actor in
//! a topological sort of its *immediate* composite container, so actors in
//! different containers are never compared by depth in a meaningful way.
//!
//! Two oracles are provided:
//! - `ContainerGraph`: derives depths from the container's connections
//! - `DepthTable`: depths given explicitly (tests, precomputed schedules)

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;

use super::provider::CausalityOracle;
use super::types::ActorId;
use crate::domain::error::SchedulingError;

type DepthResult = Result<Arc<BTreeMap<ActorId, usize>>, SchedulingError>;

#[derive(Debug, Default, Clone)]
struct Container {
    actors: BTreeSet<ActorId>,
    edges: BTreeSet<(ActorId, ActorId)>,
}

/// Causality oracle over composite containers
///
/// Depths are computed with Kahn's algorithm. Among actors that become
/// ready together the smallest `ActorId` is taken first, so the order is
/// a pure function of the graph.
///
/// # Example
///
/// ```rust
/// use ptides_sched::domain::actor::{ActorId, CausalityOracle, ContainerGraph};
///
/// let (src, mid, sink) = (ActorId::new(2), ActorId::new(0), ActorId::new(1));
/// let mut graph = ContainerGraph::new();
/// graph.add_actor("platform", src);
/// graph.add_actor("platform", mid);
/// graph.add_actor("platform", sink);
/// graph.connect(src, mid).unwrap();
/// graph.connect(mid, sink).unwrap();
///
/// assert_eq!(graph.topological_depth(src).unwrap(), 0);
/// assert_eq!(graph.topological_depth(sink).unwrap(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ContainerGraph {
    containers: BTreeMap<String, Container>,
    membership: HashMap<ActorId, String>,
    cache: RwLock<HashMap<String, DepthResult>>,
}

impl ContainerGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `actor` in `container`, moving it if it was elsewhere
    pub fn add_actor(&mut self, container: &str, actor: ActorId) {
        if let Some(previous) = self.membership.remove(&actor) {
            if let Some(old) = self.containers.get_mut(&previous) {
                old.actors.remove(&actor);
                old.edges.retain(|(from, to)| *from != actor && *to != actor);
            }
        }
        self.containers
            .entry(container.to_string())
            .or_default()
            .actors
            .insert(actor);
        self.membership.insert(actor, container.to_string());
        self.cache.get_mut().clear();
    }

    /// Add a dependency `from -> to` inside one container
    ///
    /// # Errors
    /// `NoCausalityInterface` if either actor has no container,
    /// `InvalidScenario` if they live in different containers.
    pub fn connect(&mut self, from: ActorId, to: ActorId) -> Result<(), SchedulingError> {
        let from_container = self
            .membership
            .get(&from)
            .ok_or(SchedulingError::NoCausalityInterface(from))?;
        let to_container = self
            .membership
            .get(&to)
            .ok_or(SchedulingError::NoCausalityInterface(to))?;
        if from_container != to_container {
            return Err(SchedulingError::InvalidScenario(format!(
                "{from} ({from_container}) and {to} ({to_container}) are in different containers"
            )));
        }
        let name = from_container.clone();
        if let Some(container) = self.containers.get_mut(&name) {
            container.edges.insert((from, to));
        }
        self.cache.get_mut().clear();
        Ok(())
    }

    /// Container of `actor`
    pub fn container_of(&self, actor: ActorId) -> Option<&str> {
        self.membership.get(&actor).map(String::as_str)
    }

    fn depths(&self, name: &str) -> DepthResult {
        if let Some(cached) = self.cache.read().get(name) {
            return cached.clone();
        }
        let computed = self
            .containers
            .get(name)
            .map_or_else(|| Ok(Arc::new(BTreeMap::new())), |c| sort_container(name, c));
        self.cache.write().insert(name.to_string(), computed.clone());
        computed
    }
}

fn sort_container(name: &str, container: &Container) -> DepthResult {
    let mut in_degree: BTreeMap<ActorId, usize> =
        container.actors.iter().map(|actor| (*actor, 0)).collect();
    for (_, to) in &container.edges {
        *in_degree.entry(*to).or_default() += 1;
    }

    let mut ready: BTreeSet<ActorId> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(actor, _)| *actor)
        .collect();
    let mut depths = BTreeMap::new();

    while let Some(actor) = ready.pop_first() {
        depths.insert(actor, depths.len());
        for (_, to) in container.edges.range((actor, ActorId::new(0))..=(actor, ActorId::new(usize::MAX))) {
            if let Some(degree) = in_degree.get_mut(to) {
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(*to);
                }
            }
        }
    }

    if depths.len() < in_degree.len() {
        let stuck = in_degree
            .keys()
            .find(|actor| !depths.contains_key(*actor))
            .copied()
            .unwrap_or(ActorId::new(0));
        return Err(SchedulingError::CausalityLoop {
            container: name.to_string(),
            actor: stuck,
        });
    }
    Ok(Arc::new(depths))
}

impl CausalityOracle for ContainerGraph {
    fn topological_depth(&self, actor: ActorId) -> Result<usize, SchedulingError> {
        let container = self
            .membership
            .get(&actor)
            .ok_or(SchedulingError::NoCausalityInterface(actor))?;
        let depths = self.depths(container)?;
        depths
            .get(&actor)
            .copied()
            .ok_or(SchedulingError::NoCausalityInterface(actor))
    }
}

/// Explicit actor-to-depth table
#[derive(Debug, Default, Clone)]
pub struct DepthTable {
    depths: HashMap<ActorId, usize>,
}

impl DepthTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the depth of `actor`
    pub fn set(&mut self, actor: ActorId, depth: usize) -> &mut Self {
        self.depths.insert(actor, depth);
        self
    }
}

impl FromIterator<(ActorId, usize)> for DepthTable {
    fn from_iter<I: IntoIterator<Item = (ActorId, usize)>>(iter: I) -> Self {
        Self {
            depths: iter.into_iter().collect(),
        }
    }
}

impl CausalityOracle for DepthTable {
    fn topological_depth(&self, actor: ActorId) -> Result<usize, SchedulingError> {
        self.depths
            .get(&actor)
            .copied()
            .ok_or(SchedulingError::NoCausalityInterface(actor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: usize) -> ActorId {
        ActorId::new(n)
    }

    #[test]
    fn test_chain_depths() {
        let mut graph = ContainerGraph::new();
        for n in [5, 3, 1] {
            graph.add_actor("top", id(n));
        }
        graph.connect(id(5), id(3)).unwrap();
        graph.connect(id(3), id(1)).unwrap();

        assert_eq!(graph.topological_depth(id(5)).unwrap(), 0);
        assert_eq!(graph.topological_depth(id(3)).unwrap(), 1);
        assert_eq!(graph.topological_depth(id(1)).unwrap(), 2);
    }

    #[test]
    fn test_independent_actors_ordered_by_id() {
        let mut graph = ContainerGraph::new();
        graph.add_actor("top", id(7));
        graph.add_actor("top", id(2));
        assert_eq!(graph.topological_depth(id(2)).unwrap(), 0);
        assert_eq!(graph.topological_depth(id(7)).unwrap(), 1);
    }

    #[test]
    fn test_depth_is_per_container() {
        let mut graph = ContainerGraph::new();
        graph.add_actor("left", id(0));
        graph.add_actor("left", id(1));
        graph.add_actor("right", id(2));
        graph.connect(id(0), id(1)).unwrap();

        assert_eq!(graph.topological_depth(id(1)).unwrap(), 1);
        assert_eq!(graph.topological_depth(id(2)).unwrap(), 0);
        assert_eq!(graph.container_of(id(2)), Some("right"));
    }

    #[test]
    fn test_cross_container_connection_rejected() {
        let mut graph = ContainerGraph::new();
        graph.add_actor("left", id(0));
        graph.add_actor("right", id(1));
        assert!(matches!(
            graph.connect(id(0), id(1)),
            Err(SchedulingError::InvalidScenario(_))
        ));
    }

    #[test]
    fn test_uncontained_actor_has_no_causality_interface() {
        let graph = ContainerGraph::new();
        assert_eq!(
            graph.topological_depth(id(9)).unwrap_err(),
            SchedulingError::NoCausalityInterface(id(9))
        );
    }

    #[test]
    fn test_cycle_reported() {
        let mut graph = ContainerGraph::new();
        graph.add_actor("loop", id(0));
        graph.add_actor("loop", id(1));
        graph.connect(id(0), id(1)).unwrap();
        graph.connect(id(1), id(0)).unwrap();

        let err = graph.topological_depth(id(0)).unwrap_err();
        assert!(matches!(err, SchedulingError::CausalityLoop { .. }));
    }

    #[test]
    fn test_cache_invalidated_on_change() {
        let mut graph = ContainerGraph::new();
        graph.add_actor("top", id(0));
        graph.add_actor("top", id(1));
        assert_eq!(graph.topological_depth(id(0)).unwrap(), 0);

        graph.connect(id(1), id(0)).unwrap();
        assert_eq!(graph.topological_depth(id(0)).unwrap(), 1);
    }

    #[test]
    fn test_depth_table() {
        let table: DepthTable = [(id(0), 2), (id(1), 5)].into_iter().collect();
        assert_eq!(table.topological_depth(id(1)).unwrap(), 5);
        assert!(table.topological_depth(id(3)).is_err());
    }
}
