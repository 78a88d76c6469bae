use std::collections::HashMap;

use super::elements::{Agent, AgentCluster, AgentId, Obstacle, Waypoint, RESERVED_AGENT_ID};

/// Which agent class a bulk removal reports to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalFilter {
    Pedestrians,
    Polygons,
}

impl RemovalFilter {
    fn matches(&self, agent: &Agent) -> bool {
        match self {
            RemovalFilter::Pedestrians => !agent.agent_type.is_polygon(),
            RemovalFilter::Polygons => agent.agent_type.is_polygon(),
        }
    }

    fn name_prefix(&self) -> &'static str {
        match self {
            RemovalFilter::Pedestrians => "person",
            RemovalFilter::Polygons => "polygon",
        }
    }
}

/// Authoritative in-memory store of agents, clusters, waypoints and
/// obstacles. One instance is owned by the scene service; there is no
/// process-wide scene singleton.
#[derive(Debug, Default)]
pub struct SceneRegistry {
    agents: Vec<Agent>,
    clusters: Vec<AgentCluster>,
    waypoints: HashMap<String, Waypoint>,
    obstacles: Vec<Obstacle>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_agent(&mut self, agent: Agent) {
        self.agents.push(agent);
    }

    pub fn add_agent_cluster(&mut self, cluster: AgentCluster) {
        self.clusters.push(cluster);
    }

    pub fn add_waypoint(&mut self, waypoint: Waypoint) {
        self.waypoints.insert(waypoint.id.clone(), waypoint);
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Removes the agent with the given id. Unknown ids are a no-op.
    pub fn remove_agent(&mut self, id: AgentId) {
        self.agents.retain(|a| a.id != id);
    }

    /// Removes a waypoint by id. Unknown ids are a no-op.
    pub fn remove_waypoint(&mut self, id: &str) {
        self.waypoints.remove(id);
    }

    pub fn remove_all_obstacles(&mut self) {
        self.obstacles.clear();
    }

    /// Ordered snapshot of all agents, insertion order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn clusters(&self) -> &[AgentCluster] {
        &self.clusters
    }

    pub fn waypoint(&self, id: &str) -> Option<&Waypoint> {
        self.waypoints.get(id)
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// Shared bulk-removal pass behind both remove-all operations and the
    /// respawn old-name computation.
    ///
    /// Walks the full agent list once, skipping the reserved agent. Every
    /// other agent is removed together with its waypoints, regardless of the
    /// filter; only agents matching the filter contribute a backend name
    /// (`person_<n>` / `polygon_<n>`, position counter starting at 1).
    /// Removing non-matching agents as well mirrors the original simulator
    /// and is relied upon by the respawn flow.
    pub fn remove_agents_matching(&mut self, filter: RemovalFilter) -> Vec<String> {
        let snapshot = self.agents.clone();

        let mut names = Vec::new();
        let mut count = 1;
        for agent in snapshot {
            if agent.id == RESERVED_AGENT_ID {
                continue;
            }
            for waypoint_id in &agent.waypoint_ids {
                self.remove_waypoint(waypoint_id);
            }
            self.remove_agent(agent.id);
            if filter.matches(&agent) {
                names.push(format!("{}_{}", filter.name_prefix(), count));
                count += 1;
            }
        }
        names
    }
}
