//! `World`: flowers and their spatial index, the hive, weather, and deposit
//! accounting.
//!
//! # Spatial index
//!
//! Flowers are immovable, so every flower is inserted into an R-tree (via
//! `rstar`) once, when it is created.  Depleted flowers stay in the tree;
//! availability is filtered at query time.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use hive_core::{Bounds, FlowerId, SimRng, Vec2};

use crate::{Flower, Hive, NECTAR_EPS, Weather, WorldConfig, WorldError, WorldResult};

// ── R-tree flower entry ───────────────────────────────────────────────────────

#[derive(Clone)]
struct FlowerEntry {
    point: [f32; 2],
    id: FlowerId,
}

impl RTreeObject for FlowerEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for FlowerEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

/// The shared environment.  Owned by the scheduler; agents reach it through
/// `AgentContext`.
pub struct World {
    bounds: Bounds,
    config: WorldConfig,
    /// Public so the scheduler can read geometry and the queue backlog
    /// directly.  Mutate the queue only through `enqueue_delivery`/`receive`.
    pub hive: Hive,
    /// Stepped by the scheduler; read by foragers.
    pub weather: Weather,
    /// Indexed by `FlowerId`.
    flowers: Vec<Flower>,
    index: RTree<FlowerEntry>,
    total_deposited: f32,
}

impl World {
    pub fn new(width: f32, height: f32, config: WorldConfig) -> Self {
        let weather = Weather::new(&config.weather);
        Self {
            bounds: Bounds::new(width, height),
            config,
            hive: Hive::for_world(width, height),
            weather,
            flowers: Vec::new(),
            index: RTree::new(),
            total_deposited: 0.0,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    #[inline]
    pub fn flower(&self, id: FlowerId) -> Option<&Flower> {
        self.flowers.get(id.index())
    }

    pub fn flowers(&self) -> &[Flower] {
        &self.flowers
    }

    /// Total nectar processed into the hive stores.  Never decreases.
    #[inline]
    pub fn total_deposited(&self) -> f32 {
        self.total_deposited
    }

    /// Number of flowers that still have nectar.
    pub fn flowers_remaining(&self) -> usize {
        self.flowers.iter().filter(|f| f.is_available()).count()
    }

    // ── Flower placement ──────────────────────────────────────────────────

    /// Place `n` flowers around `at`: the first exactly at `at` (clamped into
    /// bounds), the rest scattered within `cluster_spread`.
    ///
    /// `capacity = None` draws each capacity from the configured range.
    pub fn add_flower_at(
        &mut self,
        at: Vec2,
        n: usize,
        capacity: Option<f32>,
        rng: &mut SimRng,
    ) -> WorldResult<Vec<FlowerId>> {
        if !at.is_finite() {
            return Err(WorldError::InvalidPosition { x: at.x, y: at.y });
        }
        if let Some(c) = capacity {
            if !(c.is_finite() && c > 0.0) {
                return Err(WorldError::InvalidAmount(c));
            }
        }

        let spread = self.config.cluster_spread;
        let mut ids = Vec::with_capacity(n);
        for i in 0..n {
            let pos = if i == 0 { at } else { rng.point_in_disc(at, spread) };
            let cap = match capacity {
                Some(c) => c,
                None => self.draw_capacity(rng),
            };
            ids.push(self.insert_flower(pos, cap));
        }
        Ok(ids)
    }

    /// Create one random patch of `n` flowers somewhere inside the world.
    pub fn add_flowers(&mut self, n: usize, rng: &mut SimRng) -> Vec<FlowerId> {
        let centre = self.random_patch_centre(rng);
        let (rmin, rmax) = (self.config.patch_radius_min, self.config.patch_radius_max);
        let radius = rng.within(rmin..=rmax);

        let mut ids = Vec::with_capacity(n);
        for _ in 0..n {
            let pos = rng.point_in_disc(centre, radius);
            let cap = self.draw_capacity(rng);
            ids.push(self.insert_flower(pos, cap));
        }
        ids
    }

    fn random_patch_centre(&self, rng: &mut SimRng) -> Vec2 {
        let (w, h) = (self.bounds.width, self.bounds.height);
        // Small worlds cannot honour the full edge margin; fall back to
        // the bounds margin so the range stays non-empty.
        let mx = if w > 2.0 * self.config.patch_edge_margin { self.config.patch_edge_margin } else { self.bounds.margin };
        let my = if h > 2.0 * self.config.patch_edge_margin { self.config.patch_edge_margin } else { self.bounds.margin };
        let x = if w - mx > mx { rng.uniform(mx..w - mx) } else { w * 0.5 };
        let y = if h - my > my { rng.uniform(my..h - my) } else { h * 0.5 };
        Vec2::new(x, y)
    }

    fn draw_capacity(&self, rng: &mut SimRng) -> f32 {
        rng.within(self.config.capacity_min..=self.config.capacity_max)
    }

    fn insert_flower(&mut self, pos: Vec2, capacity: f32) -> FlowerId {
        let id = FlowerId(self.flowers.len() as u32);
        let pos = self.bounds.clamp(pos);
        self.index.insert(FlowerEntry { point: pos.as_array(), id });
        self.flowers.push(Flower::new(id, pos, capacity));
        id
    }

    // ── Nectar economy ────────────────────────────────────────────────────

    /// Take up to `amount` from flower `id`; returns the amount actually
    /// taken (less than requested when the flower runs dry).
    pub fn consume_flower(&mut self, id: FlowerId, amount: f32) -> WorldResult<f32> {
        if !(amount.is_finite() && amount >= 0.0) {
            return Err(WorldError::InvalidAmount(amount));
        }
        let flower = self
            .flowers
            .get_mut(id.index())
            .ok_or(WorldError::UnknownFlower(id))?;

        let taken = amount.min(flower.remaining);
        flower.remaining -= taken;
        if flower.remaining < NECTAR_EPS {
            flower.remaining = 0.0;
        }
        flower.visited = true;
        debug_assert!(
            flower.remaining >= 0.0 && flower.remaining <= flower.capacity,
            "flower {} out of bounds: {}/{}",
            flower.id,
            flower.remaining,
            flower.capacity
        );
        Ok(taken)
    }

    /// Add processed nectar to the colony total.
    pub fn deposit_nectar(&mut self, amount: f32) -> WorldResult<()> {
        if !(amount.is_finite() && amount >= 0.0) {
            return Err(WorldError::InvalidAmount(amount));
        }
        self.total_deposited += amount;
        Ok(())
    }

    /// Hand a forager's load to the hive's receiver queue.
    pub fn enqueue_delivery(&mut self, amount: f32) -> WorldResult<()> {
        if !(amount.is_finite() && amount >= 0.0) {
            return Err(WorldError::InvalidAmount(amount));
        }
        self.hive.enqueue(amount);
        Ok(())
    }

    /// Process up to `capacity` from the receiver queue into
    /// `total_deposited`; returns the amount processed.
    pub fn receive(&mut self, capacity: f32) -> WorldResult<f32> {
        if !(capacity.is_finite() && capacity >= 0.0) {
            return Err(WorldError::InvalidAmount(capacity));
        }
        let drained = self.hive.process(capacity);
        self.deposit_nectar(drained)?;
        Ok(drained)
    }

    /// `true` while delivered nectar is waiting for receivers.
    #[inline]
    pub fn has_backlog(&self) -> bool {
        self.hive.receiver_queue > NECTAR_EPS
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The nearest flower with nectar within `radius` of `pos`.
    ///
    /// Equidistant candidates resolve to the lowest `FlowerId`.
    pub fn nearest_available_within(&self, pos: Vec2, radius: f32) -> Option<FlowerId> {
        if !(pos.is_finite() && radius >= 0.0) {
            return None;
        }
        let query = pos.as_array();
        self.index
            .locate_within_distance(query, radius * radius)
            .filter(|e| self.flowers[e.id.index()].is_available())
            .map(|e| (e.distance_2(&query), e.id))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, id)| id)
    }
}
