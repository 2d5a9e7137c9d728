//! The zone registry: `ZoneDefinition` in, immutable `ZoneModel` out.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over zone bounding boxes answers "which zone is
//! this point in?" for the live aggregator and for input sanity checks.  The
//! R-tree only narrows the candidates; the exact `Shape::contains` test
//! decides.

use rand::Rng;
use rstar::{AABB, RTree, RTreeObject};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use cf_core::{Point, ZoneIdx};

use crate::{Bounds, Shape, ZoneError, ZoneResult};

// ── ZoneDefinition ────────────────────────────────────────────────────────────

/// One zone record as supplied by the store configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneDefinition {
    pub id:        String,
    /// Display name.  Defaults to `id` when empty.
    #[serde(default)]
    pub label:     String,
    pub bounds:    Bounds,
    /// Display color passed through to the renderer untouched.
    #[serde(default)]
    pub color:     Option<String>,
    /// Declared neighbors.  Used only to sanity-check observed transitions.
    #[serde(default)]
    pub neighbors: Vec<String>,
}

impl ZoneDefinition {
    /// Convenience constructor for a rectangular zone with no neighbors.
    pub fn rect(id: &str, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            id:        id.to_string(),
            label:     id.to_string(),
            bounds:    Bounds::rect(min_x, min_y, max_x, max_y),
            color:     None,
            neighbors: Vec::new(),
        }
    }

    /// Builder-style setter for the declared neighbor ids.
    pub fn with_neighbors(mut self, neighbors: &[&str]) -> Self {
        self.neighbors = neighbors.iter().map(|s| s.to_string()).collect();
        self
    }
}

// ── Zone ──────────────────────────────────────────────────────────────────────

/// A loaded, validated zone.
#[derive(Clone, Debug)]
pub struct Zone {
    pub idx:   ZoneIdx,
    pub id:    String,
    pub label: String,
    pub color: Option<String>,
    shape:     Shape,
    /// Resolved neighbor indices, sorted and deduplicated.
    neighbors: Vec<ZoneIdx>,
    declares_neighbors: bool,
}

impl Zone {
    pub fn bounds(&self) -> &Bounds {
        self.shape.bounds()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn centroid(&self) -> Point {
        self.shape.centroid()
    }

    pub fn area(&self) -> f64 {
        self.shape.area()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.shape.contains(p)
    }

    /// Uniformly distributed point inside this zone.
    #[inline]
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        self.shape.random_point(rng)
    }

    pub fn neighbors(&self) -> &[ZoneIdx] {
        &self.neighbors
    }
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

struct ZoneEntry {
    envelope: AABB<[f64; 2]>,
    idx:      ZoneIdx,
}

impl RTreeObject for ZoneEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

// ── ZoneModel ─────────────────────────────────────────────────────────────────

/// Immutable description of a store's zones.
///
/// Zones are stored densely in load order; `ZoneIdx(i)` is `zones[i]`.
pub struct ZoneModel {
    zones:       Vec<Zone>,
    by_id:       FxHashMap<String, ZoneIdx>,
    spatial_idx: RTree<ZoneEntry>,
}

/// Validate `definitions` and build a [`ZoneModel`].
///
/// # Errors
///
/// - [`ZoneError::InvalidGeometry`] for degenerate (zero-area, non-finite,
///   self-intersecting) bounds.
/// - [`ZoneError::DuplicateZoneId`] when two definitions share an id.
/// - [`ZoneError::TooManyZones`] past the `ZoneIdx` range.
pub fn load_zones(definitions: Vec<ZoneDefinition>) -> ZoneResult<ZoneModel> {
    ZoneModel::load(definitions)
}

impl ZoneModel {
    /// See [`load_zones`].
    pub fn load(definitions: Vec<ZoneDefinition>) -> ZoneResult<Self> {
        if definitions.len() >= ZoneIdx::INVALID.index() {
            return Err(ZoneError::TooManyZones(definitions.len()));
        }

        let mut by_id: FxHashMap<String, ZoneIdx> = FxHashMap::default();
        let mut zones: Vec<Zone> = Vec::with_capacity(definitions.len());
        let mut declared: Vec<Vec<String>> = Vec::with_capacity(definitions.len());

        // ── Pass 1: geometry and identity ─────────────────────────────────
        for (i, def) in definitions.into_iter().enumerate() {
            let idx = ZoneIdx(i as u16);
            if by_id.contains_key(&def.id) {
                return Err(ZoneError::DuplicateZoneId(def.id));
            }
            let shape = Shape::new(def.bounds).map_err(|reason| ZoneError::InvalidGeometry {
                zone: def.id.clone(),
                reason,
            })?;
            by_id.insert(def.id.clone(), idx);

            let label = if def.label.is_empty() { def.id.clone() } else { def.label };
            declared.push(def.neighbors);
            zones.push(Zone {
                idx,
                id: def.id,
                label,
                color: def.color,
                shape,
                neighbors: Vec::new(),
                declares_neighbors: false,
            });
        }

        // ── Pass 2: resolve declared neighbors ────────────────────────────
        for (zone, names) in zones.iter_mut().zip(declared) {
            zone.declares_neighbors = !names.is_empty();
            for name in names {
                match by_id.get(&name) {
                    Some(&n) if n != zone.idx => zone.neighbors.push(n),
                    Some(_) => {}
                    None => warn!(zone = %zone.id, neighbor = %name, "dropping unknown neighbor"),
                }
            }
            zone.neighbors.sort_unstable();
            zone.neighbors.dedup();
        }

        // ── Spatial index ─────────────────────────────────────────────────
        let entries: Vec<ZoneEntry> = zones
            .iter()
            .map(|z| {
                let (lo, hi) = z.shape.bbox();
                ZoneEntry { envelope: AABB::from_corners([lo.x, lo.y], [hi.x, hi.y]), idx: z.idx }
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        info!(zones = zones.len(), "zone model loaded");
        Ok(Self { zones, by_id, spatial_idx })
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// All zones in load order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    // ── Index access (hot paths) ──────────────────────────────────────────

    /// The zone at `idx`.
    ///
    /// # Panics
    /// Panics if `idx` did not come from this model.
    #[inline]
    pub fn zone(&self, idx: ZoneIdx) -> &Zone {
        &self.zones[idx.index()]
    }

    #[inline]
    pub fn get(&self, idx: ZoneIdx) -> Option<&Zone> {
        self.zones.get(idx.index())
    }

    pub fn index_of(&self, id: &str) -> Option<ZoneIdx> {
        self.by_id.get(id).copied()
    }

    /// The external id of `idx`, or `"?"` for an index from another model.
    pub fn id_of(&self, idx: ZoneIdx) -> &str {
        self.get(idx).map_or("?", |z| z.id.as_str())
    }

    // ── Id-keyed queries ──────────────────────────────────────────────────

    fn by_id(&self, id: &str) -> ZoneResult<&Zone> {
        self.index_of(id)
            .map(|idx| self.zone(idx))
            .ok_or_else(|| ZoneError::UnknownZone(id.to_string()))
    }

    pub fn bounds_of(&self, id: &str) -> ZoneResult<&Bounds> {
        self.by_id(id).map(Zone::bounds)
    }

    pub fn centroid_of(&self, id: &str) -> ZoneResult<Point> {
        self.by_id(id).map(Zone::centroid)
    }

    pub fn contains_point(&self, id: &str, p: Point) -> ZoneResult<bool> {
        self.by_id(id).map(|z| z.contains(p))
    }

    /// Uniformly distributed point inside zone `id`, drawn from `rng`.
    pub fn random_point_in<R: Rng + ?Sized>(&self, id: &str, rng: &mut R) -> ZoneResult<Point> {
        self.by_id(id).map(|z| z.random_point(rng))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The zone containing `p`.  Where zones overlap, the one loaded first
    /// wins.  `None` if `p` is outside every zone.
    pub fn zone_at(&self, p: Point) -> Option<ZoneIdx> {
        if !p.is_finite() {
            return None;
        }
        self.spatial_idx
            .locate_in_envelope_intersecting(&AABB::from_point([p.x, p.y]))
            .filter(|e| self.zone(e.idx).contains(p))
            .map(|e| e.idx)
            .min()
    }

    /// Whether `a` and `b` are declared adjacent.
    ///
    /// `None` when either zone declares no neighbors at all, in which case
    /// the configuration has nothing to say about the pair.
    pub fn are_adjacent(&self, a: ZoneIdx, b: ZoneIdx) -> Option<bool> {
        let (za, zb) = (self.get(a)?, self.get(b)?);
        if !za.declares_neighbors || !zb.declares_neighbors {
            return None;
        }
        Some(za.neighbors.binary_search(&b).is_ok() || zb.neighbors.binary_search(&a).is_ok())
    }
}

impl std::fmt::Debug for ZoneModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneModel")
            .field("zones", &self.zones.iter().map(|z| z.id.as_str()).collect::<Vec<_>>())
            .finish()
    }
}
