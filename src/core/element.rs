//! Frozen route steps and their origin chains
//!
//! A [`PathElement`] is a cheap, clonable handle to an immutable step. Steps
//! link backwards through `origin`; since the search may continue several
//! branches from one prefix, the elements form a tree held together by
//! reference counts. A prefix lives as long as any descendant or outside
//! holder still points at it.

use std::fmt;
use std::rc::Rc;

use crate::core::distance::{round_up_meters, DistanceFn};
use crate::core::message::MessageData;
use crate::core::position::{GeoPoint, Positioned};
use crate::core::traffic::TrafficLoad;

/// The search algorithm's mutable path, as seen by the factory.
pub trait InProgressPath {
    /// Node the path currently ends at
    fn target(&self) -> &dyn Positioned;

    /// Elevation at the target in quarter meters
    fn elevation_quantized(&self) -> i16;

    /// Last element frozen from this path, if any
    fn origin_element(&self) -> Option<&PathElement>;

    /// Cost accumulated up to the target
    fn cost(&self) -> i32;

    /// Time/energy payload of the path, shared with frozen elements
    fn message(&self) -> Option<&Rc<MessageData>>;
}

/// Owned [`InProgressPath`] for building steps without a live search, and for
/// re-threading decoded records into a chain.
#[derive(Debug, Clone, Default)]
pub struct PendingStep {
    pub target: GeoPoint,
    pub origin: Option<PathElement>,
    pub cost: i32,
    pub message: Option<Rc<MessageData>>,
}

impl InProgressPath for PendingStep {
    fn target(&self) -> &dyn Positioned {
        &self.target
    }

    fn elevation_quantized(&self) -> i16 {
        self.target.elevation_quantized
    }

    fn origin_element(&self) -> Option<&PathElement> {
        self.origin.as_ref()
    }

    fn cost(&self) -> i32 {
        self.cost
    }

    fn message(&self) -> Option<&Rc<MessageData>> {
        self.message.as_ref()
    }
}

/// Variant chosen at construction, never changed afterwards
#[derive(Debug)]
pub(crate) enum Variant {
    Plain,
    Traffic(TrafficLoad),
}

struct Node {
    longitude: i32,
    latitude: i32,
    elevation_quantized: i16,
    cost: i32,
    origin: Option<PathElement>,
    message: Option<Rc<MessageData>>,
    variant: Variant,
}

impl Drop for Node {
    // Unlink uniquely owned ancestors one by one so long routes don't recurse.
    fn drop(&mut self) {
        let mut next = self.origin.take();
        while let Some(element) = next {
            match Rc::try_unwrap(element.0) {
                Ok(mut node) => next = node.origin.take(),
                Err(_) => break,
            }
        }
    }
}

/// One frozen step of a computed route
#[derive(Clone)]
pub struct PathElement(Rc<Node>);

impl PathElement {
    /// Freeze the current step of an in-progress path.
    ///
    /// Position, elevation, origin, cost and message are taken from `path`.
    /// The origin and message are shared, not copied.
    pub fn from_path<P: InProgressPath + ?Sized>(path: &P, track_traffic: bool) -> Self {
        let target = path.target();
        Self::build(
            target.longitude(),
            target.latitude(),
            path.elevation_quantized(),
            path.cost(),
            path.origin_element().cloned(),
            path.message().cloned(),
            track_traffic,
        )
    }

    /// Low-level constructor: zero cost and no message.
    pub fn create(
        longitude: i32,
        latitude: i32,
        elevation_quantized: i16,
        origin: Option<PathElement>,
        track_traffic: bool,
    ) -> Self {
        Self::build(
            longitude,
            latitude,
            elevation_quantized,
            0,
            origin,
            None,
            track_traffic,
        )
    }

    /// Detached plain element, as produced by decoding a record
    pub(crate) fn detached(
        longitude: i32,
        latitude: i32,
        elevation_quantized: i16,
        cost: i32,
    ) -> Self {
        Self::build(longitude, latitude, elevation_quantized, cost, None, None, false)
    }

    fn build(
        longitude: i32,
        latitude: i32,
        elevation_quantized: i16,
        cost: i32,
        origin: Option<PathElement>,
        message: Option<Rc<MessageData>>,
        track_traffic: bool,
    ) -> Self {
        let variant = if track_traffic {
            Variant::Traffic(TrafficLoad::default())
        } else {
            Variant::Plain
        };
        PathElement(Rc::new(Node {
            longitude,
            latitude,
            elevation_quantized,
            cost,
            origin,
            message,
            variant,
        }))
    }

    pub fn cost(&self) -> i32 {
        self.0.cost
    }

    /// Preceding step, `None` at the start of a route
    pub fn origin(&self) -> Option<&PathElement> {
        self.0.origin.as_ref()
    }

    pub fn message(&self) -> Option<&Rc<MessageData>> {
        self.0.message.as_ref()
    }

    /// Elapsed time in seconds, 0 when no message is attached
    pub fn time(&self) -> f32 {
        self.message().map_or(0.0, |m| m.time())
    }

    /// Does nothing when no message is attached
    pub fn set_time(&self, time: f32) {
        if let Some(message) = self.message() {
            message.set_time(time);
        }
    }

    /// Energy, 0 when no message is attached
    pub fn energy(&self) -> f32 {
        self.message().map_or(0.0, |m| m.energy())
    }

    /// Does nothing when no message is attached
    pub fn set_energy(&self, energy: f32) {
        if let Some(message) = self.message() {
            message.set_energy(energy);
        }
    }

    /// Distance to any positioned entity in whole meters, `floor(d) + 1`.
    pub fn distance_to<P, D>(&self, other: &P, distance: &D) -> i32
    where
        P: Positioned + ?Sized,
        D: DistanceFn + ?Sized,
    {
        round_up_meters(distance.distance(
            self.0.longitude,
            self.0.latitude,
            other.longitude(),
            other.latitude(),
        ))
    }

    /// True if both handles point at the same element
    pub fn ptr_eq(&self, other: &PathElement) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// This element followed by its origins, back to the start of the route
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Number of elements from the route start up to and including this one
    pub fn chain_len(&self) -> usize {
        self.ancestors().count()
    }

    /// Elements from the route start to this one, in travel order
    pub fn route(&self) -> Vec<PathElement> {
        let mut elements: Vec<PathElement> = self.ancestors().cloned().collect();
        elements.reverse();
        log::debug!("Reconstructed route of {} elements ending at {}", elements.len(), self);
        elements
    }

    pub(crate) fn variant(&self) -> &Variant {
        &self.0.variant
    }
}

impl Positioned for PathElement {
    fn longitude(&self) -> i32 {
        self.0.longitude
    }

    fn latitude(&self) -> i32 {
        self.0.latitude
    }

    fn elevation_quantized(&self) -> i16 {
        self.0.elevation_quantized
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.0.longitude, self.0.latitude)
    }
}

impl fmt::Debug for PathElement {
    // Origin printed by position only; the full chain can be very long.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathElement")
            .field("longitude", &self.0.longitude)
            .field("latitude", &self.0.latitude)
            .field("elevation_quantized", &self.0.elevation_quantized)
            .field("cost", &self.0.cost)
            .field("origin", &self.origin().map(|o| o.to_string()))
            .field("message", &self.0.message)
            .field("variant", &self.0.variant)
            .finish()
    }
}

/// Iterator over an origin chain, see [`PathElement::ancestors`]
pub struct Ancestors<'a> {
    next: Option<&'a PathElement>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a PathElement;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.origin();
        Some(current)
    }
}
