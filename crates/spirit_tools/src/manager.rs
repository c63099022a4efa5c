//! # Agent Manager
//!
//! Owns every live agent and drives them once per world tick.
//!
//! Agents are stored in an `EntityRegistry`, so the id an agent carries is
//! the same generational handle callers use to look it up. A returned agent
//! is removed in the same tick; its handle stops resolving.

use spirit_core::{EntityId, EntityRegistry, PlayerId};
use spirit_economy::SummonToken;

use crate::agent::{AgentRecord, ReturnReport, SpiritAgent, TickOutcome};
use crate::config::SpiritConfig;
use crate::error::SpiritResult;
use crate::events::{AgentEvent, EventSender};
use crate::world::World;

/// Registry and driver of summoned agents.
pub struct AgentManager {
    /// Live agents.
    agents: EntityRegistry<SpiritAgent>,
    /// Lifecycle configuration shared by all agents.
    config: SpiritConfig,
    /// Outcome sink, if anyone listens.
    events: Option<EventSender>,
}

impl AgentManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new(config: SpiritConfig) -> Self {
        Self {
            agents: EntityRegistry::new(),
            config,
            events: None,
        }
    }

    /// Builder: publishes outcomes to `events`.
    #[must_use]
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Lifecycle configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &SpiritConfig {
        &self.config
    }

    /// Number of live agents.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.agents.len()
    }

    /// Returns true if no agent is live.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Registers an agent built from its own id.
    pub fn spawn_agent(&mut self, make: impl FnOnce(EntityId) -> SpiritAgent) -> EntityId {
        self.agents.spawn_with(make)
    }

    /// Looks up an agent.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&SpiritAgent> {
        self.agents.get(id)
    }

    /// Looks up an agent mutably.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut SpiritAgent> {
        self.agents.get_mut(id)
    }

    /// Iterates live agents.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &SpiritAgent)> {
        self.agents.iter()
    }

    /// The agent deployed with this token, if any.
    #[must_use]
    pub fn find_by_token(&self, token: &SummonToken) -> Option<EntityId> {
        self.agents
            .iter()
            .find(|(_, agent)| agent.token().is_some_and(|t| t.token_id == token.token_id))
            .map(|(id, _)| id)
    }

    /// Agents owned by a player.
    pub fn agents_of(&self, owner: PlayerId) -> impl Iterator<Item = EntityId> + '_ {
        self.agents
            .iter()
            .filter(move |(_, agent)| agent.owner_id() == Some(owner))
            .map(|(id, _)| id)
    }

    /// Whether a player has a deployed agent.
    #[must_use]
    pub fn is_summoned(&self, owner: PlayerId) -> bool {
        self.agents_of(owner).next().is_some()
    }

    /// Ticks every agent once and removes those that returned.
    ///
    /// Returns each agent's outcome in registry order.
    pub fn tick<W: World + ?Sized>(&mut self, world: &mut W) -> Vec<(EntityId, TickOutcome)> {
        let mut outcomes = Vec::with_capacity(self.agents.len());
        for (id, agent) in self.agents.iter_mut() {
            let outcome = agent.tick(world, &self.config);
            if let Some(events) = &self.events {
                if let Some(event) = event_for(id, agent.owner_id(), &outcome) {
                    events.send(event);
                }
            }
            outcomes.push((id, outcome));
        }

        for (id, outcome) in &outcomes {
            if matches!(outcome, TickOutcome::Returned(_)) {
                self.agents.despawn(*id);
            }
        }
        outcomes
    }

    /// Forces one agent to return now.
    ///
    /// Returns `None` if the id does not resolve.
    pub fn recall<W: World + ?Sized>(&mut self, world: &mut W, id: EntityId) -> Option<ReturnReport> {
        let agent = self.agents.get_mut(id)?;
        let owner = agent.owner_id();
        let report = agent.recall(world)?;
        self.agents.despawn(id);

        self.publish(returned_event(id, owner, &report));
        Some(report)
    }

    /// Forces every agent of a player to return.
    pub fn recall_owner<W: World + ?Sized>(&mut self, world: &mut W, owner: PlayerId) -> Vec<ReturnReport> {
        let ids: Vec<EntityId> = self.agents_of(owner).collect();
        ids.into_iter().filter_map(|id| self.recall(world, id)).collect()
    }

    /// Durable records of every live agent.
    #[must_use]
    pub fn save_all(&self) -> Vec<AgentRecord> {
        self.agents.iter().map(|(_, agent)| agent.to_record()).collect()
    }

    /// Recreates agents from records, returning their new ids.
    pub fn restore(&mut self, records: impl IntoIterator<Item = AgentRecord>) -> Vec<EntityId> {
        let ids: Vec<EntityId> = records
            .into_iter()
            .map(|record| self.agents.spawn_with(|id| SpiritAgent::from_record(id, record)))
            .collect();
        tracing::info!(restored = ids.len(), "Spirit agents restored");
        ids
    }

    /// Encodes every live agent as a JSON array of records.
    ///
    /// # Errors
    ///
    /// Returns `SpiritError::Codec` if serialization fails.
    pub fn save_json(&self) -> SpiritResult<String> {
        Ok(serde_json::to_string(&self.save_all())?)
    }

    /// Recreates agents from a JSON array of records.
    ///
    /// # Errors
    ///
    /// Returns `SpiritError::Codec` for malformed JSON; nothing is restored
    /// in that case.
    pub fn restore_json(&mut self, source: &str) -> SpiritResult<Vec<EntityId>> {
        let records: Vec<AgentRecord> = serde_json::from_str(source)?;
        Ok(self.restore(records))
    }

    /// Publishes an event if a sink is attached.
    pub(crate) fn publish(&self, event: AgentEvent) {
        if let Some(events) = &self.events {
            events.send(event);
        }
    }
}

/// The event published for a tick outcome, if any.
fn event_for(agent: EntityId, owner: Option<PlayerId>, outcome: &TickOutcome) -> Option<AgentEvent> {
    match outcome {
        TickOutcome::Idle | TickOutcome::Progressed { .. } | TickOutcome::TargetLost(_) => None,
        TickOutcome::TargetAcquired(pos) => Some(AgentEvent::TargetAcquired { agent, pos: *pos }),
        TickOutcome::BlockMined {
            pos,
            material,
            items,
            experience,
        } => Some(AgentEvent::BlockMined {
            agent,
            pos: *pos,
            material: *material,
            items: items.clone(),
            experience: *experience,
        }),
        TickOutcome::Returned(report) => Some(returned_event(agent, owner, report)),
    }
}

fn returned_event(agent: EntityId, owner: Option<PlayerId>, report: &ReturnReport) -> AgentEvent {
    AgentEvent::Returned {
        agent,
        owner,
        reason: report.reason,
        delivered_to_owner: report.delivered_to_owner,
        items: report.items.clone(),
        experience: report.experience,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spirit_shared::Vec3;

    use crate::events::EventBus;
    use crate::sandbox::SandboxWorld;

    #[test]
    fn test_unowned_agent_idles_until_expiry() {
        let mut world = SandboxWorld::new();
        let config = SpiritConfig {
            despawn_age: 3,
            ..SpiritConfig::default()
        };
        let (sender, receiver) = EventBus::create_pair(16);
        let mut manager = AgentManager::new(config).with_events(sender);
        let id = manager.spawn_agent(|id| SpiritAgent::new(id, Vec3::ZERO));

        assert_eq!(manager.tick(&mut world), vec![(id, TickOutcome::Idle)]);
        assert_eq!(manager.tick(&mut world), vec![(id, TickOutcome::Idle)]);
        let outcomes = manager.tick(&mut world);
        assert!(matches!(outcomes[0].1, TickOutcome::Returned(_)));
        assert!(manager.is_empty());
        assert!(manager.get(id).is_none());

        let events = receiver.drain();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], AgentEvent::Returned { owner: None, .. }));
    }

    #[test]
    fn test_save_and_restore_json() {
        let mut manager = AgentManager::new(SpiritConfig::default());
        let owner = PlayerId::random();
        manager.spawn_agent(|id| {
            let mut agent = SpiritAgent::new(id, Vec3::new(4.0, 5.0, 6.0));
            agent.set_owner(owner, EntityId::new(0, 0));
            agent
        });

        let json = manager.save_json().unwrap();
        let mut reloaded = AgentManager::new(SpiritConfig::default());
        let ids = reloaded.restore_json(&json).unwrap();

        assert_eq!(ids.len(), 1);
        assert!(reloaded.is_summoned(owner));
        assert_eq!(reloaded.get(ids[0]).map(SpiritAgent::position), Some(Vec3::new(4.0, 5.0, 6.0)));
        assert!(reloaded.restore_json("[{").is_err());
        assert_eq!(reloaded.len(), 1);
    }
}
