// Registry trait for the monitored entities of each dashboard
use crate::domain::entity::{Domain, Entity};

pub trait EntityRegistry: Send + Sync {
    /// All entities of a domain, in registration order
    fn list_entities(&self, domain: Domain) -> &[Entity];

    /// Entity used when a lookup misses
    fn default_entity(&self, domain: Domain) -> &Entity;

    fn find_entity(&self, domain: Domain, entity_id: &str) -> Option<&Entity> {
        self.list_entities(domain).iter().find(|e| e.id == entity_id)
    }

    /// Look up an entity, falling back to the domain default for unknown ids
    fn resolve(&self, domain: Domain, entity_id: &str) -> &Entity {
        match self.find_entity(domain, entity_id) {
            Some(entity) => entity,
            None => {
                let fallback = self.default_entity(domain);
                tracing::warn!(
                    "Unknown {} entity {:?}, using {}",
                    domain,
                    entity_id,
                    fallback.id
                );
                fallback
            }
        }
    }

    /// First entity whose keyword occurs in an already lowercased text
    fn match_keyword(&self, domain: Domain, lowered: &str) -> Option<&Entity> {
        self.list_entities(domain)
            .iter()
            .find(|e| e.matched_keyword(lowered).is_some())
    }
}
