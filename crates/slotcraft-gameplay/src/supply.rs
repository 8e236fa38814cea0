//! Material supply and free-pool replenishment.
//!
//! The free pool is the set of material instances the player can drag into
//! the grid. The supply manifest lists the material types that must always be
//! available there; after every craft the pool is restored to that
//! composition.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use slotcraft_common::{InstanceId, ItemType, SupplyError, SupplyResult};
use tracing::{debug, info};

/// A concrete material instance sitting in the free pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialInstance {
    /// Instance identifier.
    pub id: InstanceId,
    /// Material type.
    pub item_type: ItemType,
}

/// Type → count multiset of a pool.
pub type Composition = AHashMap<ItemType, usize>;

/// Materials available for the player to pick up.
#[derive(Debug, Clone, Default)]
pub struct FreePool {
    instances: Vec<MaterialInstance>,
}

impl FreePool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an instance.
    pub fn insert(&mut self, instance: MaterialInstance) {
        self.instances.push(instance);
    }

    /// Removes an instance by ID.
    pub fn remove(&mut self, id: InstanceId) -> Option<MaterialInstance> {
        let pos = self.instances.iter().position(|m| m.id == id)?;
        Some(self.instances.remove(pos))
    }

    /// Instances in insertion order.
    #[must_use]
    pub fn instances(&self) -> &[MaterialInstance] {
        &self.instances
    }

    /// Number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// True when the pool holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Counts instances per type.
    #[must_use]
    pub fn composition(&self) -> Composition {
        let mut counts = Composition::default();
        for instance in &self.instances {
            *counts.entry(instance.item_type.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// What a replenish pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplenishReport {
    /// Instances removed from the pool.
    pub destroyed: Vec<MaterialInstance>,
    /// Fresh instances added, one per manifest entry.
    pub spawned: Vec<MaterialInstance>,
}

impl ReplenishReport {
    /// Type tags of the spawned instances, in manifest order.
    #[must_use]
    pub fn spawned_types(&self) -> Vec<ItemType> {
        self.spawned.iter().map(|m| m.item_type.clone()).collect()
    }

    /// IDs of the destroyed instances.
    #[must_use]
    pub fn destroyed_ids(&self) -> Vec<InstanceId> {
        self.destroyed.iter().map(|m| m.id).collect()
    }
}

/// Keeps the free pool stocked with the manifest's materials.
#[derive(Debug, Clone)]
pub struct MaterialSupply {
    /// Types that must be present after every replenish.
    manifest: Vec<ItemType>,
    /// Respawn target; `None` when no pool is attached.
    pool: Option<FreePool>,
    /// Next instance ID to hand out.
    next_id: InstanceId,
}

impl MaterialSupply {
    /// Creates a supply with an empty pool attached.
    #[must_use]
    pub fn new(manifest: Vec<ItemType>) -> Self {
        Self {
            manifest,
            pool: Some(FreePool::new()),
            next_id: InstanceId::from_raw(1),
        }
    }

    /// Creates a supply with no respawn target.
    #[must_use]
    pub fn without_target(manifest: Vec<ItemType>) -> Self {
        Self {
            pool: None,
            ..Self::new(manifest)
        }
    }

    /// Material types in the manifest.
    #[must_use]
    pub fn manifest(&self) -> &[ItemType] {
        &self.manifest
    }

    /// Whether the supply must keep `item_type` available.
    #[must_use]
    pub fn supplies(&self, item_type: &ItemType) -> bool {
        self.manifest.contains(item_type)
    }

    /// The attached pool, if any.
    #[must_use]
    pub fn pool(&self) -> Option<&FreePool> {
        self.pool.as_ref()
    }

    /// True when a pool is attached.
    #[must_use]
    pub fn has_target(&self) -> bool {
        self.pool.is_some()
    }

    /// Attaches a pool, returning the previous one.
    pub fn attach_target(&mut self, pool: FreePool) -> Option<FreePool> {
        self.pool.replace(pool)
    }

    /// Detaches the pool. Later replenishes fail until one is attached.
    pub fn detach_target(&mut self) -> Option<FreePool> {
        self.pool.take()
    }

    /// Pool composition; empty when no pool is attached.
    #[must_use]
    pub fn composition(&self) -> Composition {
        self.pool.as_ref().map(FreePool::composition).unwrap_or_default()
    }

    /// Removes an instance the player picked up.
    pub fn take(&mut self, id: InstanceId) -> Option<MaterialInstance> {
        self.pool.as_mut()?.remove(id)
    }

    /// Restores the pool to the manifest composition.
    ///
    /// Destroys every pooled instance whose type appears in the manifest, then
    /// spawns one fresh instance per manifest entry. Instances of other types
    /// are left alone. Never touches the crafting grid.
    pub fn replenish(&mut self) -> SupplyResult<ReplenishReport> {
        let Some(pool) = self.pool.as_mut() else {
            return Err(SupplyError::MissingSupplyTarget);
        };

        let manifest = &self.manifest;
        let (destroyed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut pool.instances)
            .into_iter()
            .partition(|m| manifest.contains(&m.item_type));
        pool.instances = kept;

        let mut spawned = Vec::with_capacity(manifest.len());
        for item_type in manifest {
            let instance = MaterialInstance {
                id: self.next_id,
                item_type: item_type.clone(),
            };
            self.next_id = self.next_id.next();
            debug!("Spawned {} as instance {}", item_type, instance.id.raw());
            pool.insert(instance.clone());
            spawned.push(instance);
        }

        info!(
            "Replenished supply: {} destroyed, {} spawned",
            destroyed.len(),
            spawned.len()
        );

        Ok(ReplenishReport { destroyed, spawned })
    }
}
