//! A bookkeeping-only request registry.
//!
//! [`LogisticsBoard`] records which delivery requests are open and lists
//! them by priority. It does not match requests to carts or plan routes;
//! a dispatcher reads [`LogisticsBoard::open_requests`] and calls
//! [`LogisticsBoard::complete`] when a delivery is done.

use crate::id::{BufferId, RequestId};
use crate::registry::{DeliveryRequest, RequestRegistry};
use crate::resource::ResourceType;
use slotmap::SlotMap;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Posted {
    request: DeliveryRequest,
    /// Posting order, for FIFO among equal priorities.
    seq: u64,
}

/// Open delivery requests, keyed by [`RequestId`].
#[derive(Debug, Default)]
pub struct LogisticsBoard {
    posted: SlotMap<RequestId, Posted>,
    by_owner: HashMap<(BufferId, ResourceType), RequestId>,
    next_seq: u64,
    total_created: u64,
    total_retired: u64,
}

impl LogisticsBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open requests.
    pub fn len(&self) -> usize {
        self.posted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posted.is_empty()
    }

    pub fn get(&self, id: RequestId) -> Option<&DeliveryRequest> {
        self.posted.get(id).map(|p| &p.request)
    }

    /// The open request for this owner and resource, if any.
    pub fn find(&self, owner: BufferId, resource_type: ResourceType) -> Option<RequestId> {
        self.by_owner.get(&(owner, resource_type)).copied()
    }

    /// Open requests, highest priority first, oldest first within a priority.
    pub fn open_requests(&self) -> Vec<(RequestId, &DeliveryRequest)> {
        let mut open: Vec<(RequestId, &Posted)> = self.posted.iter().collect();
        open.sort_by(|(_, a), (_, b)| {
            b.request
                .priority
                .cmp(&a.request.priority)
                .then(a.seq.cmp(&b.seq))
        });
        open.into_iter().map(|(id, p)| (id, &p.request)).collect()
    }

    /// The request a dispatcher should serve next.
    pub fn highest_priority(&self) -> Option<(RequestId, &DeliveryRequest)> {
        self.open_requests().into_iter().next()
    }

    /// Take a request off the board after its cargo was delivered.
    ///
    /// The caller must tell the owning buffer via
    /// [`InputBuffer::on_request_fulfilled`](crate::input::InputBuffer::on_request_fulfilled)
    /// so it can post again later.
    pub fn complete(&mut self, id: RequestId) -> Option<DeliveryRequest> {
        let posted = self.posted.remove(id)?;
        let request = posted.request;
        self.by_owner.remove(&(request.owner, request.resource_type));
        self.total_retired += 1;
        Some(request)
    }

    /// Requests ever posted.
    pub fn total_created(&self) -> u64 {
        self.total_created
    }

    /// Requests ever retired, by the owner or by [`complete`](Self::complete).
    pub fn total_retired(&self) -> u64 {
        self.total_retired
    }
}

impl RequestRegistry for LogisticsBoard {
    fn create_request(&mut self, request: &DeliveryRequest) {
        let key = (request.owner, request.resource_type);
        if self.by_owner.contains_key(&key) {
            log::warn!(
                "{} already has an open {} request; ignoring duplicate",
                request.owner,
                request.resource_type
            );
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = self.posted.insert(Posted {
            request: *request,
            seq,
        });
        self.by_owner.insert(key, id);
        self.total_created += 1;
    }

    fn fulfill_request(&mut self, request: &DeliveryRequest) {
        match self.find(request.owner, request.resource_type) {
            Some(id) => {
                self.complete(id);
            }
            None => log::debug!(
                "{} retired a {} request the board no longer holds",
                request.owner,
                request.resource_type
            ),
        }
    }
}
