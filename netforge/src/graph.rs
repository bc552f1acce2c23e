//! Petgraph view of a compiled circuit.
//!
//! A read-only graph built from a [`Circuit`] for downstream connectivity
//! queries: which components share a net, which nets touch a component,
//! paths between components. Edges follow each pin's own net field (the
//! authoritative assignment), so stale membership entries left behind by
//! reconnection contribute no edges.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;

use crate::model::{Circuit, Component, Net};

/// Node in the circuit graph.
#[derive(Debug, Clone, Serialize)]
pub enum GraphNode {
    Component(Component),
    Net(Net),
}

impl GraphNode {
    pub fn as_component(&self) -> Option<&Component> {
        match self {
            GraphNode::Component(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_net(&self) -> Option<&Net> {
        match self {
            GraphNode::Net(n) => Some(n),
            _ => None,
        }
    }
}

/// Edge in the circuit graph: one pin connecting a component to a net.
#[derive(Debug, Clone, Serialize)]
pub struct PinEdge {
    pub pin_name: String,
    pub direction: String,
    pub role: Option<String>,
}

/// Graph representation of a compiled circuit.
#[derive(Debug, Clone)]
pub struct CircuitGraph {
    graph: DiGraph<GraphNode, PinEdge>,
    component_indices: HashMap<String, NodeIndex>,
    net_indices: HashMap<String, NodeIndex>,
}

impl CircuitGraph {
    /// Build the graph view of a circuit.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        let mut graph = DiGraph::new();
        let mut component_indices = HashMap::new();
        let mut net_indices = HashMap::new();

        for component in circuit.components.values() {
            let idx = graph.add_node(GraphNode::Component(component.clone()));
            component_indices.insert(component.id.clone(), idx);
        }
        for net in circuit.nets.values() {
            let idx = graph.add_node(GraphNode::Net(net.clone()));
            net_indices.insert(net.id.clone(), idx);
        }

        for component in circuit.components.values() {
            let comp_idx = component_indices[&component.id];
            for pin in component.pins() {
                if let Some(net_id) = &pin.net {
                    if let Some(&net_idx) = net_indices.get(net_id) {
                        graph.add_edge(
                            comp_idx,
                            net_idx,
                            PinEdge {
                                pin_name: pin.name.clone(),
                                direction: pin.direction.clone(),
                                role: pin.role.clone(),
                            },
                        );
                    }
                }
            }
        }

        Self {
            graph,
            component_indices,
            net_indices,
        }
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.component_indices
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
            .and_then(|n| n.as_component())
    }

    pub fn net(&self, id: &str) -> Option<&Net> {
        self.net_indices
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
            .and_then(|n| n.as_net())
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.graph.node_weights().filter_map(|n| n.as_component())
    }

    pub fn nets(&self) -> impl Iterator<Item = &Net> {
        self.graph.node_weights().filter_map(|n| n.as_net())
    }

    /// All nets a component's pins are assigned to.
    pub fn nets_for_component(&self, id: &str) -> Vec<&Net> {
        let Some(&comp_idx) = self.component_indices.get(id) else {
            return Vec::new();
        };

        self.graph
            .edges_directed(comp_idx, Direction::Outgoing)
            .filter_map(|edge| self.graph.node_weight(edge.target()).and_then(|n| n.as_net()))
            .collect()
    }

    /// All components with at least one pin assigned to a net.
    pub fn components_on_net(&self, net_id: &str) -> Vec<&Component> {
        let Some(&net_idx) = self.net_indices.get(net_id) else {
            return Vec::new();
        };

        self.graph
            .edges_directed(net_idx, Direction::Incoming)
            .filter_map(|edge| {
                self.graph
                    .node_weight(edge.source())
                    .and_then(|n| n.as_component())
            })
            .collect()
    }

    /// The pin connecting a component to a net, if any.
    pub fn connection_pin(&self, component_id: &str, net_id: &str) -> Option<&PinEdge> {
        let comp_idx = self.component_indices.get(component_id)?;
        let net_idx = self.net_indices.get(net_id)?;

        self.graph
            .edges_connecting(*comp_idx, *net_idx)
            .next()
            .map(|e| e.weight())
    }

    /// Shortest component-to-component path through nets. Net hops are
    /// rendered as `[NET_ID]`.
    pub fn find_path(&self, from_id: &str, to_id: &str) -> Option<Vec<String>> {
        use petgraph::algo::astar;

        let from_idx = self.component_indices.get(from_id)?;
        let to_idx = self.component_indices.get(to_id)?;

        // traverse edges in both directions: component->net edges are the
        // only kind, but paths must cross nets back to other components
        let undirected: petgraph::graph::UnGraph<(), ()> = petgraph::graph::UnGraph::from_edges(
            self.graph
                .edge_references()
                .map(|e| (e.source().index() as u32, e.target().index() as u32)),
        );

        // nodes with no edges are absent from the undirected view
        if from_idx.index() >= undirected.node_count() || to_idx.index() >= undirected.node_count()
        {
            return None;
        }

        let result = astar(
            &undirected,
            petgraph::graph::NodeIndex::new(from_idx.index()),
            |n| n.index() == to_idx.index(),
            |_| 1,
            |_| 0,
        );

        result.map(|(_, path)| {
            path.into_iter()
                .filter_map(
                    |idx| match self.graph.node_weight(NodeIndex::new(idx.index())) {
                        Some(GraphNode::Component(c)) => Some(c.id.clone()),
                        Some(GraphNode::Net(n)) => Some(format!("[{}]", n.id)),
                        None => None,
                    },
                )
                .collect()
        })
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            component_count: self.component_indices.len(),
            net_count: self.net_indices.len(),
            connection_count: self.graph.edge_count(),
        }
    }
}

/// Size summary of a circuit graph.
#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    pub component_count: usize,
    pub net_count: usize,
    pub connection_count: usize,
}
