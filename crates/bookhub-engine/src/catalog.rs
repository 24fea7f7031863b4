//! Resource catalog.

use std::collections::BTreeMap;

use chrono::NaiveTime;

use bookhub_core::BookingError;
use bookhub_core::result::BookingResult;
use bookhub_core::types::{Money, ResourceId};
use bookhub_entity::Resource;

/// Immutable catalog of the venue's bookable resources.
///
/// Catalog data is owned outside the engine; this type only validates it at
/// construction and serves lookups.
#[derive(Debug, Clone)]
pub struct ResourceCatalog {
    resources: BTreeMap<ResourceId, Resource>,
}

impl ResourceCatalog {
    /// Build a catalog from externally owned resource data.
    pub fn new(resources: Vec<Resource>) -> BookingResult<Self> {
        for resource in &resources {
            resource.validate()?;
        }
        Ok(Self {
            resources: resources.into_iter().map(|r| (r.id, r)).collect(),
        })
    }

    /// The venue's default game tables, open 09:00–22:00.
    pub fn seed() -> Self {
        let open = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN);
        let close = NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN);
        let games = [
            ("Snooker", 100),
            ("PS5 Gaming", 100),
            ("Pool/8-Ball", 100),
            ("Foosball", 80),
        ];

        let resources = games
            .into_iter()
            .filter_map(|(name, rate)| {
                Resource::new(name, Money::from_major(rate), open, close).ok()
            })
            .collect();
        // Seed data is statically valid, so new() cannot fail here.
        Self::new(resources).unwrap_or(Self {
            resources: BTreeMap::new(),
        })
    }

    /// Look up a resource by id.
    pub fn get(&self, resource_id: ResourceId) -> BookingResult<&Resource> {
        self.resources
            .get(&resource_id)
            .ok_or(BookingError::ResourceNotFound { resource_id })
    }

    /// All resources, in id order.
    pub fn all(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Number of resources in the catalog.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
