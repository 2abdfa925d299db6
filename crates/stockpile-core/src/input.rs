//! Raw-material storage and the delivery-request state machine.
//!
//! Each resource type an [`InputBuffer`] holds runs its own two-state
//! machine, re-evaluated on every [`InputBuffer::tick_requests`]:
//!
//! - **NoRequest → Requesting** when the slot's fill ratio is at or below
//!   `request_threshold`: a [`DeliveryRequest`] is posted to the registry.
//! - **Requesting → NoRequest** when the fill ratio is at or above
//!   `fulfill_threshold`: the request is retired.
//!
//! The gap between the two thresholds is a hysteresis band; a slot hovering
//! inside it never churns requests. Order across resource types does not
//! matter.

use crate::config::InputConfig;
use crate::error::{Collaborator, ConfigError, MissingCollaborator};
use crate::fixed::Fixed64;
use crate::id::BufferId;
use crate::registry::{DeliveryRequest, PositionProvider, RegistryHandle};
use crate::resource::{ResourceSlot, ResourceType};

/// A request transition made during one [`InputBuffer::tick_requests`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestEvent {
    Created(DeliveryRequest),
    Retired(DeliveryRequest),
}

/// Holds the required input slots of one facility.
#[derive(Debug)]
pub struct InputBuffer {
    owner: BufferId,
    slots: Vec<ResourceSlot>,
    priority: u8,
    request_threshold: Fixed64,
    fulfill_threshold: Fixed64,
    /// Back-references into the registry's bookkeeping, one per resource type.
    active: [Option<DeliveryRequest>; ResourceType::COUNT],
    registry: Option<RegistryHandle>,
    position: Box<dyn PositionProvider>,
}

impl InputBuffer {
    /// Build from validated configuration.
    ///
    /// Without a registry the buffer still stores and hands out stock, but
    /// never posts requests; this is logged once here.
    pub fn new(
        owner: BufferId,
        config: &InputConfig,
        registry: Option<RegistryHandle>,
        position: impl PositionProvider + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let slots = config
            .slots
            .iter()
            .map(|s| ResourceSlot::with_amount(s.resource_type, s.initial, s.capacity))
            .collect::<Result<Vec<_>, _>>()?;

        if registry.is_none() {
            MissingCollaborator::new(owner.to_string(), Collaborator::RequestRegistry).report();
        }

        Ok(Self {
            owner,
            slots,
            priority: config.priority,
            request_threshold: config.request_threshold,
            fulfill_threshold: config.fulfill_threshold,
            active: [None; ResourceType::COUNT],
            registry,
            position: Box::new(position),
        })
    }

    // -----------------------------------------------------------------------
    // Request state machine
    // -----------------------------------------------------------------------

    /// Re-evaluate every slot against the thresholds and post or retire
    /// requests. Returns the transitions made, in slot order.
    pub fn tick_requests(&mut self) -> Vec<RequestEvent> {
        let mut events = Vec::new();
        let Some(registry) = self.registry.as_ref() else {
            return events;
        };

        for slot in &self.slots {
            let resource_type = slot.resource_type();
            let fill = slot.fill_ratio();
            let active = &mut self.active[resource_type.index()];

            match *active {
                None if fill <= self.request_threshold => {
                    let request = DeliveryRequest {
                        owner: self.owner,
                        resource_type,
                        priority: self.priority,
                        destination: self.position.delivery_point(),
                    };
                    registry.borrow_mut().create_request(&request);
                    *active = Some(request);
                    log::debug!("{} requested {resource_type} (fill {fill})", self.owner);
                    events.push(RequestEvent::Created(request));
                }
                Some(request) if fill >= self.fulfill_threshold => {
                    registry.borrow_mut().fulfill_request(&request);
                    *active = None;
                    log::debug!("{} retired {resource_type} request (fill {fill})", self.owner);
                    events.push(RequestEvent::Retired(request));
                }
                _ => {}
            }
        }

        events
    }

    /// The registry retired this buffer's request on its own (cargo was
    /// delivered). Clears the active record without calling back into the
    /// registry. Returns whether a request was active.
    pub fn on_request_fulfilled(&mut self, resource_type: ResourceType) -> bool {
        self.active[resource_type.index()].take().is_some()
    }

    /// True while at least one resource type has an open request.
    pub fn is_requesting(&self) -> bool {
        self.active.iter().any(Option::is_some)
    }

    pub fn active_request(&self, resource_type: ResourceType) -> Option<&DeliveryRequest> {
        self.active[resource_type.index()].as_ref()
    }

    // -----------------------------------------------------------------------
    // Stock
    // -----------------------------------------------------------------------

    /// Whether every slot holds at least `cost` units.
    pub fn has_enough_resources(&self, cost: Fixed64) -> bool {
        self.slots.iter().all(|s| s.current_amount() >= cost)
    }

    /// Take `cost` from every slot.
    ///
    /// Callers check [`has_enough_resources`](Self::has_enough_resources)
    /// first; a slot that is short is drained to zero.
    pub fn consume_resources(&mut self, cost: Fixed64) {
        debug_assert!(
            self.has_enough_resources(cost),
            "{} consumed {cost} without enough stock",
            self.owner
        );
        for slot in &mut self.slots {
            let _removed = slot.remove(cost);
        }
    }

    /// Accept a delivery. Returns the amount that fit; zero when this buffer
    /// has no slot for `resource_type` or the slot is full.
    #[must_use = "returns the amount accepted; the rest stays with the carrier"]
    pub fn add_resource(&mut self, resource_type: ResourceType, amount: Fixed64) -> Fixed64 {
        match self.slot_mut(resource_type) {
            Some(slot) => slot.add(amount),
            None => Fixed64::ZERO,
        }
    }

    pub fn slot(&self, resource_type: ResourceType) -> Option<&ResourceSlot> {
        self.slots.iter().find(|s| s.resource_type() == resource_type)
    }

    fn slot_mut(&mut self, resource_type: ResourceType) -> Option<&mut ResourceSlot> {
        self.slots
            .iter_mut()
            .find(|s| s.resource_type() == resource_type)
    }

    pub fn slots(&self) -> &[ResourceSlot] {
        &self.slots
    }

    pub fn owner(&self) -> BufferId {
        self.owner
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn has_registry(&self) -> bool {
        self.registry.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SlotConfig;
    use crate::fixed::f64_to_fixed64 as fx;
    use crate::id::GridPos;
    use crate::test_utils::{RecordingRegistry, recording_registry};

    fn smelter_input() -> InputConfig {
        InputConfig::new(vec![
            SlotConfig::new(ResourceType::IronOre, fx(100.0)).with_initial(fx(30.0)),
            SlotConfig::new(ResourceType::Coal, fx(50.0)).with_initial(fx(50.0)),
        ])
    }

    fn buffer_with(
        config: &InputConfig,
    ) -> (InputBuffer, std::rc::Rc<std::cell::RefCell<RecordingRegistry>>) {
        let (recorder, handle) = recording_registry();
        let buffer = InputBuffer::new(BufferId(1), config, Some(handle), GridPos::new(4, 2)).unwrap();
        (buffer, recorder)
    }

    fn set(buffer: &mut InputBuffer, resource_type: ResourceType, amount: f64) {
        buffer
            .slot_mut(resource_type)
            .unwrap()
            .set_amount(fx(amount));
    }

    #[test]
    fn invalid_config_rejected() {
        let mut config = smelter_input();
        config.priority = 0;
        let result = InputBuffer::new(BufferId(1), &config, None, GridPos::default());
        assert!(matches!(result, Err(ConfigError::PriorityOutOfRange(0))));
    }

    #[test]
    fn hysteresis_cycle() {
        let (mut buffer, recorder) = buffer_with(&smelter_input());

        // 30% is above the 25% request threshold.
        assert!(buffer.tick_requests().is_empty());

        set(&mut buffer, ResourceType::IronOre, 24.0);
        let events = buffer.tick_requests();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], RequestEvent::Created(r) if r.resource_type == ResourceType::IronOre));
        assert_eq!(recorder.borrow().created.len(), 1);

        // Anywhere inside the band: nothing.
        for amount in [24.0, 40.0, 60.0, 79.0] {
            set(&mut buffer, ResourceType::IronOre, amount);
            assert!(buffer.tick_requests().is_empty());
        }
        assert_eq!(recorder.borrow().created.len(), 1);
        assert!(recorder.borrow().fulfilled.is_empty());

        set(&mut buffer, ResourceType::IronOre, 81.0);
        let events = buffer.tick_requests();
        assert!(matches!(events[..], [RequestEvent::Retired(_)]));
        assert_eq!(recorder.borrow().fulfilled.len(), 1);
        assert!(buffer.tick_requests().is_empty());

        set(&mut buffer, ResourceType::IronOre, 24.0);
        buffer.tick_requests();
        assert_eq!(recorder.borrow().created.len(), 2);
    }

    #[test]
    fn request_carries_priority_and_destination() {
        let mut config = smelter_input();
        config.priority = 5;
        let (mut buffer, recorder) = buffer_with(&config);
        set(&mut buffer, ResourceType::Coal, 0.0);
        buffer.tick_requests();

        let request = recorder.borrow().created[0];
        assert_eq!(request.owner, BufferId(1));
        assert_eq!(request.resource_type, ResourceType::Coal);
        assert_eq!(request.priority, 5);
        assert_eq!(request.destination, GridPos::new(4, 2));
        assert_eq!(buffer.active_request(ResourceType::Coal), Some(&request));
    }

    #[test]
    fn resource_types_are_independent() {
        let (mut buffer, recorder) = buffer_with(&smelter_input());
        set(&mut buffer, ResourceType::IronOre, 10.0);
        set(&mut buffer, ResourceType::Coal, 5.0);

        assert_eq!(buffer.tick_requests().len(), 2);
        assert!(buffer.is_requesting());

        set(&mut buffer, ResourceType::Coal, 50.0);
        let events = buffer.tick_requests();
        assert!(matches!(events[..], [RequestEvent::Retired(r)] if r.resource_type == ResourceType::Coal));
        assert!(buffer.is_requesting());
        assert!(buffer.active_request(ResourceType::IronOre).is_some());
        assert!(buffer.active_request(ResourceType::Coal).is_none());
        assert_eq!(recorder.borrow().created.len(), 2);
    }

    #[test]
    fn empty_buffer_requests_immediately() {
        let config = InputConfig::new(vec![SlotConfig::new(ResourceType::Wood, fx(40.0))]);
        let (mut buffer, _) = buffer_with(&config);
        assert_eq!(buffer.tick_requests().len(), 1);
        assert!(buffer.is_requesting());
    }

    #[test]
    fn no_registry_never_requests() {
        let mut buffer =
            InputBuffer::new(BufferId(9), &smelter_input(), None, GridPos::default()).unwrap();
        set(&mut buffer, ResourceType::IronOre, 0.0);
        assert!(buffer.tick_requests().is_empty());
        assert!(!buffer.is_requesting());
        assert!(!buffer.has_registry());
    }

    #[test]
    fn registry_side_fulfillment_clears_record() {
        let (mut buffer, recorder) = buffer_with(&smelter_input());
        set(&mut buffer, ResourceType::IronOre, 0.0);
        buffer.tick_requests();

        assert!(buffer.on_request_fulfilled(ResourceType::IronOre));
        assert!(!buffer.is_requesting());
        assert!(!buffer.on_request_fulfilled(ResourceType::IronOre));

        // Still low, so a fresh request goes up next tick; the registry is
        // not asked to retire the old one.
        buffer.tick_requests();
        assert_eq!(recorder.borrow().created.len(), 2);
        assert!(recorder.borrow().fulfilled.is_empty());
    }

    #[test]
    fn add_resource_clamps_and_matches_type() {
        let (mut buffer, _) = buffer_with(&smelter_input());
        assert_eq!(buffer.add_resource(ResourceType::IronOre, fx(100.0)), fx(70.0));
        assert_eq!(buffer.add_resource(ResourceType::IronOre, fx(5.0)), Fixed64::ZERO);
        assert_eq!(buffer.add_resource(ResourceType::Wood, fx(5.0)), Fixed64::ZERO);
        assert_eq!(
            buffer.slot(ResourceType::IronOre).unwrap().current_amount(),
            fx(100.0)
        );
    }

    #[test]
    fn has_enough_and_consume() {
        let (mut buffer, _) = buffer_with(&smelter_input());
        assert!(buffer.has_enough_resources(fx(30.0)));
        assert!(!buffer.has_enough_resources(fx(31.0)));

        buffer.consume_resources(fx(2.0));
        assert_eq!(
            buffer.slot(ResourceType::IronOre).unwrap().current_amount(),
            fx(28.0)
        );
        assert_eq!(
            buffer.slot(ResourceType::Coal).unwrap().current_amount(),
            fx(48.0)
        );
    }

    #[test]
    fn no_slots_always_has_enough() {
        let config = InputConfig::new(Vec::new());
        let (mut buffer, _) = buffer_with(&config);
        assert!(buffer.has_enough_resources(fx(1.0)));
        assert!(buffer.tick_requests().is_empty());
    }
}
