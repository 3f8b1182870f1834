//! In-memory graph index built from a tenant's snapshot.
//!
//! The index answers every engine query without further I/O. Snapshots
//! are plain JSON documents (`graph.json`) with `nodes` and `edges`
//! arrays; building the index drops edges whose endpoints are unknown.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use polyrag_types::{GraphEdge, GraphNode, KnowledgeGraph, SourceGraph};

/// Separator used when one node aggregates multiple source documents.
pub const SOURCE_SEPARATOR: &str = "<SEP>";

/// On-disk snapshot of a tenant's graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// All nodes in the graph.
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    /// All edges in the graph.
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

/// Queryable in-memory form of a `GraphSnapshot`.
#[derive(Debug)]
pub struct GraphIndex {
    nodes: HashMap<String, GraphNode>,
    edges: Vec<GraphEdge>,
    adjacency: HashMap<String, Vec<usize>>,
}

impl GraphIndex {
    /// Builds an index from a snapshot.
    pub fn build(snapshot: GraphSnapshot) -> Self {
        let nodes: HashMap<String, GraphNode> = snapshot
            .nodes
            .into_iter()
            .map(|n| (n.id.clone(), n))
            .collect();

        let mut edges = Vec::new();
        let mut adjacency: HashMap<String, Vec<usize>> = HashMap::new();
        for edge in snapshot.edges {
            if !nodes.contains_key(&edge.source) || !nodes.contains_key(&edge.target) {
                continue;
            }
            let idx = edges.len();
            adjacency.entry(edge.source.clone()).or_default().push(idx);
            adjacency.entry(edge.target.clone()).or_default().push(idx);
            edges.push(edge);
        }

        Self {
            nodes,
            edges,
            adjacency,
        }
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns all labels, sorted and deduplicated.
    pub fn labels(&self) -> Vec<String> {
        let set: BTreeSet<&String> = self.nodes.values().flat_map(|n| &n.labels).collect();
        set.into_iter().cloned().collect()
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Degree of a node (0 for unknown nodes).
    pub fn degree(&self, id: &str) -> usize {
        self.adjacency.get(id).map_or(0, Vec::len)
    }

    /// Ids of the nodes adjacent to `id`.
    fn neighbor_ids(&self, id: &str) -> Vec<&str> {
        let Some(incident) = self.adjacency.get(id) else {
            return Vec::new();
        };
        incident
            .iter()
            .map(|&i| {
                let e = &self.edges[i];
                if e.source == id {
                    e.target.as_str()
                } else {
                    e.source.as_str()
                }
            })
            .collect()
    }

    /// Breadth-first subgraph around the nodes carrying `label`.
    ///
    /// Truncation under the `max_nodes` budget keeps nodes by hop
    /// distance first, then by degree within the cut hop.
    pub fn subgraph(&self, label: &str, max_depth: usize, max_nodes: usize) -> KnowledgeGraph {
        let mut start: Vec<&str> = self
            .nodes
            .values()
            .filter(|n| n.id == label || n.labels.iter().any(|l| l == label))
            .map(|n| n.id.as_str())
            .collect();
        self.sort_by_degree(&mut start);

        let mut truncated = false;
        if start.len() > max_nodes {
            start.truncate(max_nodes);
            truncated = true;
        }

        let mut visited: HashSet<&str> = start.iter().copied().collect();
        let mut ordered: Vec<&str> = start.clone();
        let mut frontier: VecDeque<&str> = start.into();

        for _ in 0..max_depth {
            if frontier.is_empty() || truncated {
                break;
            }
            let mut next: Vec<&str> = Vec::new();
            for id in frontier.drain(..) {
                for neighbor in self.neighbor_ids(id) {
                    if !visited.contains(neighbor) && !next.contains(&neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            self.sort_by_degree(&mut next);
            if ordered.len() + next.len() > max_nodes {
                next.truncate(max_nodes - ordered.len());
                truncated = true;
            }
            for id in &next {
                visited.insert(id);
                ordered.push(id);
            }
            frontier = next.into();
        }

        self.materialize(&ordered, &visited, truncated)
    }

    /// The node, its immediate neighbors, and the connecting edges.
    pub fn neighbors(&self, node_id: &str) -> Option<KnowledgeGraph> {
        self.nodes.get(node_id)?;
        let mut ordered = vec![node_id];
        let mut visited: HashSet<&str> = ordered.iter().copied().collect();
        let mut around = self.neighbor_ids(node_id);
        self.sort_by_degree(&mut around);
        for id in around {
            if visited.insert(id) {
                ordered.push(id);
            }
        }
        Some(self.materialize(&ordered, &visited, false))
    }

    /// Nodes and relationships extracted from one source document.
    ///
    /// A node matches when its `source_id` property equals `source_id`
    /// or lists it in a `<SEP>`-separated aggregate.
    pub fn by_source(&self, source_id: &str) -> SourceGraph {
        let matches = |n: &GraphNode| {
            n.source_id()
                .is_some_and(|s| s.split(SOURCE_SEPARATOR).any(|p| p == source_id))
        };

        let mut nodes: Vec<GraphNode> =
            self.nodes.values().filter(|&n| matches(n)).cloned().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let relationships = self
            .edges
            .iter()
            .filter(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
            .cloned()
            .collect();

        SourceGraph {
            nodes,
            relationships,
        }
    }

    /// Sorts ids by degree (descending), breaking ties by id for
    /// reproducible truncation.
    fn sort_by_degree(&self, ids: &mut [&str]) {
        ids.sort_by(|&a, &b| self.degree(b).cmp(&self.degree(a)).then_with(|| a.cmp(b)));
    }

    fn materialize(
        &self,
        ordered: &[&str],
        visited: &HashSet<&str>,
        truncated: bool,
    ) -> KnowledgeGraph {
        let nodes = ordered
            .iter()
            .filter_map(|id| self.nodes.get(*id))
            .cloned()
            .collect();
        let edges = self
            .edges
            .iter()
            .filter(|e| visited.contains(e.source.as_str()) && visited.contains(e.target.as_str()))
            .cloned()
            .collect();
        KnowledgeGraph {
            nodes,
            edges,
            is_truncated: truncated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn node(id: &str, labels: &[&str], source: Option<&str>) -> GraphNode {
        let mut properties = Map::new();
        if let Some(s) = source {
            properties.insert("source_id".into(), json!(s));
        }
        GraphNode {
            id: id.into(),
            labels: labels.iter().map(|s| s.to_string()).collect(),
            properties,
        }
    }

    fn edge(source: &str, target: &str) -> GraphEdge {
        GraphEdge {
            source: source.into(),
            target: target.into(),
            relation: "related".into(),
            properties: Map::new(),
        }
    }

    /// a - b - c - d chain plus hub node h connected to b and c.
    fn chain_index() -> GraphIndex {
        GraphIndex::build(GraphSnapshot {
            nodes: vec![
                node("a", &["topic"], Some("doc-1")),
                node("b", &["topic"], Some("doc-1<SEP>doc-2")),
                node("c", &[], Some("doc-2")),
                node("d", &[], None),
                node("h", &["hub"], None),
            ],
            edges: vec![
                edge("a", "b"),
                edge("b", "c"),
                edge("c", "d"),
                edge("h", "b"),
                edge("h", "c"),
            ],
        })
    }

    #[test]
    fn labels_sorted_and_deduplicated() {
        assert_eq!(chain_index().labels(), vec!["hub", "topic"]);
    }

    #[test]
    fn dangling_edges_dropped() {
        let index = GraphIndex::build(GraphSnapshot {
            nodes: vec![node("a", &[], None)],
            edges: vec![edge("a", "ghost")],
        });
        assert_eq!(index.degree("a"), 0);
    }

    #[test]
    fn subgraph_respects_depth() {
        let kg = chain_index().subgraph("a", 1, 100);
        let ids: Vec<&str> = kg.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(!kg.is_truncated);
    }

    #[test]
    fn subgraph_truncates_by_degree_within_hop() {
        // From a at depth 2 the second hop is {c, h}; with a budget of 3
        // only one of them fits and h (degree 2) loses to c (degree 3).
        let kg = chain_index().subgraph("a", 2, 3);
        let ids: Vec<&str> = kg.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(kg.is_truncated);
    }

    #[test]
    fn subgraph_by_label_starts_at_all_carriers() {
        let kg = chain_index().subgraph("topic", 0, 100);
        let ids: Vec<&str> = kg.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"a") && ids.contains(&"b"));
    }

    #[test]
    fn subgraph_unknown_label_is_empty() {
        let kg = chain_index().subgraph("nope", 3, 100);
        assert!(kg.nodes.is_empty());
        assert!(kg.edges.is_empty());
    }

    #[test]
    fn neighbors_returns_incident_edges() {
        let kg = chain_index().neighbors("b").expect("node exists");
        let ids: Vec<&str> = kg.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids[0], "b");
        assert_eq!(ids.len(), 4); // b + a, c, h
        assert_eq!(kg.edges.len(), 4); // a-b, b-c, h-b, h-c (all within set)
    }

    #[test]
    fn neighbors_of_unknown_node_is_none() {
        assert!(chain_index().neighbors("ghost").is_none());
    }

    #[test]
    fn by_source_matches_separated_aggregates() {
        let sg = chain_index().by_source("doc-2");
        let ids: Vec<&str> = sg.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert_eq!(sg.relationships.len(), 1);
    }

    #[test]
    fn by_source_unknown_document_is_empty() {
        assert!(chain_index().by_source("doc-99").nodes.is_empty());
    }
}
