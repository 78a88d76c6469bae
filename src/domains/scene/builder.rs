use rand::Rng;

use crate::common::DomainResult;

use super::elements::{
    Agent, AgentCluster, AgentType, ClusterSpec, ModelDescriptor, Position, Waypoint,
    WaypointBehavior,
};
use super::ids::{IdAllocator, IdSpace};
use super::registry::SceneRegistry;

/// Translates an incoming cluster specification into scene entities plus the
/// model descriptors the backend needs to mirror them. Borrows the registry
/// and the id allocator for the duration of one operation.
pub struct ClusterBuilder<'a> {
    registry: &'a mut SceneRegistry,
    ids: &'a mut IdAllocator,
}

impl<'a> ClusterBuilder<'a> {
    pub fn new(registry: &'a mut SceneRegistry, ids: &'a mut IdAllocator) -> Self {
        Self { registry, ids }
    }

    /// Builds one agent cluster from a pedestrian/polygon specification.
    ///
    /// Returns exactly `spec.count` descriptors, all sharing the spawn pose
    /// and resource path. Descriptor naming is asymmetric by contract:
    /// pedestrian models are named after the specification id, polygon models
    /// after their allocated instance id.
    pub fn build_cluster(&mut self, spec: &ClusterSpec) -> DomainResult<Vec<ModelDescriptor>> {
        let spread = spec.agent_type.spread();
        let waypoint_ids = self.register_waypoints(spec);
        self.registry.add_agent_cluster(AgentCluster {
            position: spec.position,
            count: spec.count,
            spread,
            agent_type: spec.agent_type,
            waypoint_ids: waypoint_ids.clone(),
        });

        let space = if spec.agent_type.is_polygon() {
            IdSpace::Polygon
        } else {
            IdSpace::Pedestrian
        };
        let block = self.ids.next_block(space, spec.count)?;

        let mut models = Vec::with_capacity(spec.count);
        for id in block {
            self.spawn_member(spec, id, spread, &waypoint_ids);
            let (name, namespace) = if spec.agent_type.is_polygon() {
                (format!("polygon_{}", id), format!("crowdsim_polygon_{}", id))
            } else {
                (format!("person_{}", spec.id), format!("crowdsim_agent_{}", id))
            };
            models.push(ModelDescriptor {
                resource_path: spec.resource_path.clone(),
                name,
                namespace,
                pose: spec.position,
            });
        }
        Ok(models)
    }

    /// The spawn-polygons variant: always draws from the polygon id space,
    /// uses a fixed (2, 2) spread, and names models after the specification
    /// id with a `crowdsim_polyg_` namespace.
    pub fn build_polygon_cluster(
        &mut self,
        spec: &ClusterSpec,
    ) -> DomainResult<Vec<ModelDescriptor>> {
        let spread = (2.0, 2.0);
        let waypoint_ids = self.register_waypoints(spec);
        self.registry.add_agent_cluster(AgentCluster {
            position: spec.position,
            count: spec.count,
            spread,
            agent_type: spec.agent_type,
            waypoint_ids: waypoint_ids.clone(),
        });

        let block = self.ids.next_block(IdSpace::Polygon, spec.count)?;

        let mut models = Vec::with_capacity(spec.count);
        for id in block {
            self.spawn_member(spec, id, spread, &waypoint_ids);
            models.push(ModelDescriptor {
                resource_path: spec.resource_path.clone(),
                name: format!("polygon_{}", spec.id),
                namespace: format!("crowdsim_polyg_{}", id),
                pose: spec.position,
            });
        }
        Ok(models)
    }

    /// Registers the specification's waypoints under derived ids
    /// (`<specId>_<index>`) and returns those ids.
    fn register_waypoints(&mut self, spec: &ClusterSpec) -> Vec<String> {
        let mut waypoint_ids = Vec::with_capacity(spec.waypoints.len());
        for (index, triple) in spec.waypoints.iter().enumerate() {
            let id = format!("{}_{}", spec.id, index);
            self.registry.add_waypoint(Waypoint {
                id: id.clone(),
                position: Position::new(triple.x, triple.y),
                radius: triple.radius,
                behavior: WaypointBehavior::Simple,
            });
            waypoint_ids.push(id);
        }
        waypoint_ids
    }

    /// Creates one agent in the registry, scattered uniformly inside the
    /// cluster's spread box around the spawn position.
    fn spawn_member(
        &mut self,
        spec: &ClusterSpec,
        id: u64,
        spread: (f64, f64),
        waypoint_ids: &[String],
    ) {
        let mut rng = rand::thread_rng();
        let (dx, dy) = spread;
        let position = Position::new(
            spec.position.x + rng.gen_range(-dx / 2.0..=dx / 2.0),
            spec.position.y + rng.gen_range(-dy / 2.0..=dy / 2.0),
        );
        self.registry.add_agent(Agent {
            id,
            agent_type: spec.agent_type,
            position,
            waypoint_ids: waypoint_ids.to_vec(),
        });
    }
}
