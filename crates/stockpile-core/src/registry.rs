//! Contracts between the economy and the logistics layer.
//!
//! Input buffers post and retire [`DeliveryRequest`]s through a
//! [`RequestRegistry`] injected at construction. The registry's own
//! matching and dispatch are not this crate's concern; [`LogisticsBoard`]
//! is a bookkeeping-only implementation.
//!
//! [`LogisticsBoard`]: crate::board::LogisticsBoard

use crate::id::{BufferId, GridPos};
use crate::resource::ResourceType;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

// ---------------------------------------------------------------------------
// DeliveryRequest
// ---------------------------------------------------------------------------

/// A standing ask for one resource type to be brought to a facility.
///
/// At most one is active per `(owner, resource_type)` at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliveryRequest {
    pub owner: BufferId,
    pub resource_type: ResourceType,
    /// 1 (lowest) to 5 (highest).
    pub priority: u8,
    /// Where carts should drop the cargo.
    pub destination: GridPos,
}

// ---------------------------------------------------------------------------
// RequestRegistry
// ---------------------------------------------------------------------------

/// Receives request lifecycle calls from input buffers.
///
/// Both calls are fire-and-forget: the caller assumes they succeed.
pub trait RequestRegistry: std::fmt::Debug {
    /// A buffer has dropped to its request threshold for this resource.
    fn create_request(&mut self, request: &DeliveryRequest);

    /// The buffer recovered past its fulfill threshold; retire the request.
    fn fulfill_request(&mut self, request: &DeliveryRequest);
}

/// Shared, thread-confined handle to a registry. Every buffer on the same
/// board holds a clone.
pub type RegistryHandle = Rc<RefCell<dyn RequestRegistry>>;

// ---------------------------------------------------------------------------
// PositionProvider
// ---------------------------------------------------------------------------

/// Supplies the facility's reference delivery coordinate.
///
/// Read once each time a request is created.
pub trait PositionProvider: std::fmt::Debug {
    fn delivery_point(&self) -> GridPos;
}

impl PositionProvider for GridPos {
    fn delivery_point(&self) -> GridPos {
        *self
    }
}
