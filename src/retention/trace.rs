use std::collections::{HashMap, HashSet};

use crate::config::TraversalLimits;
use crate::error::TraceError;
use crate::heap::{EdgeKind, HeapSnapshot, ObjectId};

use super::graph::{RetentionEdge, RetentionGraph, RetentionNode};

/// Edge on some shortest path from the instance, recorded while walking referrers.
struct Link {
    referrer: ObjectId,
    referent: ObjectId,
    kind: EdgeKind,
}

/// Which references a search may follow and which roots end it.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Reach {
    /// Strong edges only, ending at a strong root.
    Strong,
    /// Every edge, ending at any root.
    Any,
}

/// Shortest root-to-instance paths found by one layered search.
struct Paths {
    roots: Vec<ObjectId>,
    nodes: Vec<ObjectId>,
    links: Vec<Link>,
}

/// Walks referrer edges outward from `instance` until the nearest GC roots.
///
/// Two breadth-first searches run over the referrers. The first follows strong
/// edges only and stops at the nearest strong root; the second follows every
/// edge and stops at the nearest root of any kind. The returned graph is the
/// union of the shortest paths each one found, so a weak hold closer to the
/// instance never hides the strong chain behind it. When no strong chain
/// exists the graph holds only the weak paths.
///
/// Each object is expanded at most once per search, so reference cycles end the
/// branch that re-enters them. Exceeding a limit on the strong search fails the
/// trace.
pub fn trace_to_roots<S: HeapSnapshot + ?Sized>(
    snapshot: &S,
    instance: ObjectId,
    limits: TraversalLimits,
) -> Result<RetentionGraph, TraceError> {
    if snapshot.type_name_of(instance).is_none() {
        return Err(TraceError::UnknownObject(instance));
    }

    let strong = match search(snapshot, instance, limits, Reach::Strong) {
        Ok(paths) => Some(paths),
        Err(TraceError::Unrooted(_)) => None,
        Err(err) => return Err(err),
    };
    let any = match search(snapshot, instance, limits, Reach::Any) {
        Ok(paths) => Some(paths),
        Err(err) if strong.is_some() => {
            log::debug!("keeping strong path only for object {instance}: {err}");
            None
        }
        Err(err) => return Err(err),
    };

    Ok(assemble(snapshot, instance, strong.into_iter().chain(any)))
}

/// Layered search from `instance`; stops at the first layer holding a root that `reach` accepts.
fn search<S: HeapSnapshot + ?Sized>(
    snapshot: &S,
    instance: ObjectId,
    limits: TraversalLimits,
    reach: Reach,
) -> Result<Paths, TraceError> {
    let is_root = |id: ObjectId| match snapshot.root_kind(id) {
        Some(kind) => reach == Reach::Any || kind.is_strong(),
        None => false,
    };

    let mut depth_of: HashMap<ObjectId, usize> = HashMap::new();
    depth_of.insert(instance, 0);
    let mut discovered = vec![instance];
    let mut links = Vec::new();
    let mut frontier = vec![instance];
    let mut depth = 0;

    let roots = loop {
        let found: Vec<ObjectId> = frontier.iter().copied().filter(|&id| is_root(id)).collect();
        if !found.is_empty() {
            break found;
        }
        if frontier.is_empty() {
            return Err(TraceError::Unrooted(instance));
        }
        if depth >= limits.max_depth {
            return Err(TraceError::DepthExceeded {
                instance,
                limit: limits.max_depth,
            });
        }

        depth += 1;
        let mut next = Vec::new();
        for &referent in &frontier {
            for reference in snapshot.referrers(referent) {
                if reach == Reach::Strong && !reference.kind.is_strong() {
                    continue;
                }
                match depth_of.get(&reference.referrer) {
                    // Another referent in the previous layer; still a shortest route.
                    Some(&seen) if seen == depth => {}
                    // Already expanded closer to the instance.
                    Some(_) => continue,
                    None => {
                        if depth_of.len() >= limits.max_nodes {
                            return Err(TraceError::NodeBudgetExceeded {
                                instance,
                                limit: limits.max_nodes,
                            });
                        }
                        depth_of.insert(reference.referrer, depth);
                        discovered.push(reference.referrer);
                        next.push(reference.referrer);
                    }
                }
                links.push(Link {
                    referrer: reference.referrer,
                    referent,
                    kind: reference.kind.clone(),
                });
            }
        }
        frontier = next;
    };

    Ok(prune(roots, &discovered, links))
}

/// Keeps only what lies on a path from one of `roots` down to the instance.
fn prune(roots: Vec<ObjectId>, discovered: &[ObjectId], links: Vec<Link>) -> Paths {
    let mut outgoing: HashMap<ObjectId, Vec<usize>> = HashMap::new();
    for (i, link) in links.iter().enumerate() {
        outgoing.entry(link.referrer).or_default().push(i);
    }

    let mut kept: HashSet<ObjectId> = HashSet::new();
    let mut kept_links: HashSet<usize> = HashSet::new();
    let mut worklist: Vec<ObjectId> = roots.clone();
    while let Some(id) = worklist.pop() {
        if !kept.insert(id) {
            continue;
        }
        if let Some(indices) = outgoing.get(&id) {
            for &i in indices {
                kept_links.insert(i);
                worklist.push(links[i].referent);
            }
        }
    }

    Paths {
        roots,
        nodes: discovered
            .iter()
            .copied()
            .filter(|id| kept.contains(id))
            .collect(),
        links: links
            .into_iter()
            .enumerate()
            .filter(|(i, _)| kept_links.contains(i))
            .map(|(_, link)| link)
            .collect(),
    }
}

/// Merges path sets in order, dropping repeated nodes and edges.
fn assemble<S: HeapSnapshot + ?Sized>(
    snapshot: &S,
    instance: ObjectId,
    parts: impl Iterator<Item = Paths>,
) -> RetentionGraph {
    let mut roots: HashSet<ObjectId> = HashSet::new();
    let mut order: Vec<ObjectId> = Vec::new();
    let mut seen_nodes: HashSet<ObjectId> = HashSet::new();
    let mut edges: Vec<RetentionEdge> = Vec::new();
    let mut seen_edges: HashSet<(ObjectId, ObjectId, EdgeKind)> = HashSet::new();

    for part in parts {
        roots.extend(part.roots);
        for id in part.nodes {
            if seen_nodes.insert(id) {
                order.push(id);
            }
        }
        for link in part.links {
            if seen_edges.insert((link.referrer, link.referent, link.kind.clone())) {
                edges.push(RetentionEdge {
                    from: link.referrer,
                    to: link.referent,
                    kind: link.kind,
                });
            }
        }
    }

    let nodes = order
        .into_iter()
        .map(|id| RetentionNode {
            id,
            type_name: snapshot.type_name_of(id).unwrap_or("<unknown>").to_string(),
            root: if roots.contains(&id) {
                snapshot.root_kind(id).cloned()
            } else {
                None
            },
        })
        .collect();

    RetentionGraph::new(instance, nodes, edges)
}
