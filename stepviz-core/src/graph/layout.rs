//! Layouts
//!
//! A layout assigns one 2D position to every node. The engine treats it
//! as an opaque service; the only contract is "given nodes and edges,
//! return one position per node".
//!
//! # Spring Layout
//!
//! [`SpringLayout`] is a small force-directed simulation:
//!
//! 1. Every pair of nodes repels with strength `repulsion / d²`.
//! 2. Every edge pulls its endpoints toward `ideal_length` with strength
//!    `attraction * (d - ideal_length)`.
//! 3. A weak centre gravity keeps disconnected parts from drifting.
//! 4. Velocities are damped each iteration and capped at `ideal_length`.
//!
//! The simulation starts from a circle, so it is fully deterministic. The
//! result is recentred and scaled into `[-scale, scale]` on both axes.

use std::f64::consts::TAU;

use indexmap::IndexMap;

use super::node::{NodeId, Position};
use crate::config::LayoutConfig;

/// Softening term added to squared distances.
const SOFTENING: f64 = 0.01;

/// Assigns positions to nodes.
pub trait Layout: Send + Sync {
    /// Compute one position per entry of `nodes`.
    ///
    /// `edges` only references IDs in `nodes`.
    fn positions(
        &self,
        nodes: &[NodeId],
        edges: &[(NodeId, NodeId)],
    ) -> IndexMap<NodeId, Position>;
}

/// Places nodes evenly on a circle, in the order given.
#[derive(Debug, Clone, Copy)]
pub struct CircularLayout {
    radius: f64,
}

impl CircularLayout {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }
}

impl Default for CircularLayout {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Layout for CircularLayout {
    fn positions(
        &self,
        nodes: &[NodeId],
        _edges: &[(NodeId, NodeId)],
    ) -> IndexMap<NodeId, Position> {
        circle(nodes, self.radius)
    }
}

fn circle(nodes: &[NodeId], radius: f64) -> IndexMap<NodeId, Position> {
    let n = nodes.len().max(1) as f64;
    nodes
        .iter()
        .enumerate()
        .map(|(i, &id)| {
            let angle = TAU * i as f64 / n;
            (id, Position::new(radius * angle.cos(), radius * angle.sin()))
        })
        .collect()
}

/// Force-directed layout.
#[derive(Debug, Clone, Default)]
pub struct SpringLayout {
    config: LayoutConfig,
}

impl SpringLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }
}

impl Layout for SpringLayout {
    fn positions(
        &self,
        nodes: &[NodeId],
        edges: &[(NodeId, NodeId)],
    ) -> IndexMap<NodeId, Position> {
        let cfg = &self.config;
        let n = nodes.len();
        if n == 0 {
            return IndexMap::new();
        }
        if n == 1 {
            return IndexMap::from([(nodes[0], Position::default())]);
        }

        let index: IndexMap<NodeId, usize> =
            nodes.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let links: Vec<(usize, usize)> = edges
            .iter()
            .filter_map(|(a, b)| Some((*index.get(a)?, *index.get(b)?)))
            .collect();

        let start_radius = cfg.ideal_length * (n as f64).sqrt();
        let mut pos: Vec<Position> = circle(nodes, start_radius).into_values().collect();
        let mut vel = vec![Position::default(); n];
        let mut force = vec![Position::default(); n];

        for _ in 0..cfg.iterations {
            for f in force.iter_mut() {
                *f = Position::default();
            }

            for i in 0..n {
                for j in (i + 1)..n {
                    let dx = pos[i].x - pos[j].x;
                    let dy = pos[i].y - pos[j].y;
                    let dist_sq = dx * dx + dy * dy + SOFTENING;
                    let dist = dist_sq.sqrt();
                    let magnitude = cfg.repulsion / dist_sq;
                    let (fx, fy) = (dx / dist * magnitude, dy / dist * magnitude);
                    force[i].x += fx;
                    force[i].y += fy;
                    force[j].x -= fx;
                    force[j].y -= fy;
                }
            }

            for &(a, b) in &links {
                let dx = pos[b].x - pos[a].x;
                let dy = pos[b].y - pos[a].y;
                let dist = (dx * dx + dy * dy + SOFTENING).sqrt();
                let magnitude = cfg.attraction * (dist - cfg.ideal_length);
                let (fx, fy) = (dx / dist * magnitude, dy / dist * magnitude);
                force[a].x += fx;
                force[a].y += fy;
                force[b].x -= fx;
                force[b].y -= fy;
            }

            for i in 0..n {
                force[i].x -= pos[i].x * cfg.gravity;
                force[i].y -= pos[i].y * cfg.gravity;

                vel[i].x = (vel[i].x + force[i].x * cfg.dt) * cfg.damping;
                vel[i].y = (vel[i].y + force[i].y * cfg.dt) * cfg.damping;
                let speed = vel[i].x.hypot(vel[i].y);
                if speed > cfg.ideal_length {
                    let k = cfg.ideal_length / speed;
                    vel[i].x *= k;
                    vel[i].y *= k;
                }

                pos[i].x += vel[i].x * cfg.dt;
                pos[i].y += vel[i].y * cfg.dt;
            }
        }

        rescale(&mut pos, cfg.scale);
        nodes.iter().copied().zip(pos).collect()
    }
}

/// Centre on the mean and fit into `[-scale, scale]`.
fn rescale(pos: &mut [Position], scale: f64) {
    let n = pos.len() as f64;
    let cx = pos.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = pos.iter().map(|p| p.y).sum::<f64>() / n;

    let extent = pos
        .iter()
        .map(|p| (p.x - cx).abs().max((p.y - cy).abs()))
        .fold(0.0_f64, f64::max);

    for p in pos.iter_mut() {
        if extent > 0.0 && extent.is_finite() {
            p.x = (p.x - cx) / extent * scale;
            p.y = (p.y - cy) / extent * scale;
        } else {
            *p = Position::default();
        }
    }
}
