//! Per-edge traffic load on traffic-tracking path elements
//!
//! Elements built with `track_traffic = true` carry a [`TrafficLoad`]. Load is
//! added with [`PathElement::add_traffic`], moved towards the route start on
//! [`PathElement::register`], and flushed to the origin with distance decay on
//! [`PathElement::unregister`]. On plain elements all three are no-ops, so
//! chain-walking code can call them on every element.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::cell::Cell;
use std::io::{Read, Write};

use crate::core::config::TrafficConfig;
use crate::core::element::{PathElement, Variant};
use crate::core::error::Result;
use crate::core::position::Positioned;

/// Accumulated load of a traffic-tracking element
#[derive(Debug, Default)]
pub struct TrafficLoad {
    register_count: Cell<u32>,
    far: Cell<f32>,
    near: Cell<f32>,
}

impl TrafficLoad {
    fn add(&self, far: f32, near: f32) {
        self.far.set(self.far.get() + far);
        self.near.set(self.near.get() + near);
    }

    fn take(&self) -> (f32, f32) {
        (self.far.take(), self.near.take())
    }
}

/// One reported edge: load between an element and its origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrafficRecord {
    /// Position key of the element
    pub from_id: i64,
    /// Position key of its origin
    pub to_id: i64,
    /// Weighted load, `-1` for a zero-cost edge
    pub load: i32,
}

impl TrafficRecord {
    /// Size of an encoded record in bytes
    pub const SIZE: usize = 20;

    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_i64::<BigEndian>(self.from_id)?;
        writer.write_i64::<BigEndian>(self.to_id)?;
        writer.write_i32::<BigEndian>(self.load)?;
        Ok(())
    }

    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            from_id: reader.read_i64::<BigEndian>()?,
            to_id: reader.read_i64::<BigEndian>()?,
            load: reader.read_i32::<BigEndian>()?,
        })
    }
}

/// Receiver of edges whose load crossed the report threshold
pub trait TrafficSink {
    fn record(&mut self, record: TrafficRecord) -> Result<()>;
}

impl TrafficSink for Vec<TrafficRecord> {
    fn record(&mut self, record: TrafficRecord) -> Result<()> {
        self.push(record);
        Ok(())
    }
}

/// Writes reported edges as big-endian `i64, i64, i32` records
pub struct TrafficWriter<W: Write> {
    inner: W,
    written: usize,
}

impl<W: Write> TrafficWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> TrafficSink for TrafficWriter<W> {
    fn record(&mut self, record: TrafficRecord) -> Result<()> {
        record.write_to(&mut self.inner)?;
        self.written += 1;
        Ok(())
    }
}

impl PathElement {
    /// Whether this element was built as traffic-tracking
    pub fn tracks_traffic(&self) -> bool {
        matches!(self.variant(), Variant::Traffic(_))
    }

    /// Add load to this element. No-op on plain elements.
    pub fn add_traffic(&self, traffic: f32) {
        if let Variant::Traffic(load) = self.variant() {
            load.add(traffic, traffic);
        }
    }

    /// Current `(far, near)` load, `None` on plain elements
    pub fn traffic_load(&self) -> Option<(f32, f32)> {
        match self.variant() {
            Variant::Traffic(load) => Some((load.far.get(), load.near.get())),
            Variant::Plain => None,
        }
    }

    /// Number of outstanding registrations, 0 on plain elements
    pub fn register_count(&self) -> u32 {
        match self.variant() {
            Variant::Traffic(load) => load.register_count.get(),
            Variant::Plain => 0,
        }
    }

    /// Register this element as part of a live path.
    ///
    /// The first registration also registers the origin and hands this
    /// element's accumulated load over to it, so the load of a chain always
    /// sits one step closer to the route start than where it was added.
    pub fn register(&self) {
        // Walk up while registrations are first-time, then move the loads
        // from the top down.
        let mut handovers: Vec<(PathElement, PathElement)> = Vec::new();
        let mut current = self.clone();
        loop {
            let Variant::Traffic(load) = current.variant() else {
                break;
            };
            let count = load.register_count.get();
            load.register_count.set(count + 1);
            if count != 0 {
                break;
            }
            let Some(origin) = current.origin().cloned() else {
                break;
            };
            if !origin.tracks_traffic() {
                break;
            }
            handovers.push((current, origin.clone()));
            current = origin;
        }

        for (element, origin) in handovers.iter().rev() {
            if let (Variant::Traffic(load), Variant::Traffic(origin_load)) =
                (element.variant(), origin.variant())
            {
                let (far, near) = load.take();
                origin_load.add(far, near);
            }
        }
    }

    /// Drop one registration.
    ///
    /// When the last registration goes away the accumulated load is flushed
    /// to the origin, decayed by the cost of the edge, and the edge is
    /// reported to `sink` if its weighted load exceeds the threshold (or the
    /// edge has zero cost). Returns `true` when the count reached zero.
    pub fn unregister<S: TrafficSink + ?Sized>(
        &self,
        config: &TrafficConfig,
        sink: &mut S,
    ) -> Result<bool> {
        let Variant::Traffic(load) = self.variant() else {
            return Ok(false);
        };
        let count = load.register_count.get();
        if count == 0 {
            return Ok(false);
        }
        load.register_count.set(count - 1);
        if count > 1 {
            return Ok(false);
        }

        let Some(origin) = self.origin() else {
            return Ok(true);
        };
        let Variant::Traffic(origin_load) = origin.variant() else {
            return Ok(true);
        };

        let (far, near) = load.take();
        let cost_delta = f64::from(self.cost()) - f64::from(origin.cost());
        origin_load.add(
            (f64::from(far) * (-cost_delta / config.far_decay_length).exp()) as f32,
            (f64::from(near) * (-cost_delta / config.near_decay_length).exp()) as f32,
        );

        let edge_load = if self.cost() == origin.cost() {
            -1
        } else {
            (config.far_weight * f64::from(far) + config.near_weight * f64::from(near)) as i32
        };
        if edge_load == -1 || edge_load > config.report_threshold {
            log::debug!("Traffic edge {} -> {}: load {}", self, origin, edge_load);
            sink.record(TrafficRecord {
                from_id: self.unique_id(),
                to_id: origin.unique_id(),
                load: edge_load,
            })?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::position::split_position_id;

    fn chain(track_traffic: bool, costs: &[i32]) -> Vec<PathElement> {
        use crate::core::element::PendingStep;
        use crate::core::position::GeoPoint;

        let mut elements: Vec<PathElement> = Vec::new();
        for (i, cost) in costs.iter().enumerate() {
            let step = PendingStep {
                target: GeoPoint::new(i as i32 * 10, i as i32 * 20),
                origin: elements.last().cloned(),
                cost: *cost,
                message: None,
            };
            elements.push(PathElement::from_path(&step, track_traffic));
        }
        elements
    }

    #[test]
    fn test_plain_element_ignores_traffic() {
        let elements = chain(false, &[0, 100]);
        let e = &elements[1];
        assert!(!e.tracks_traffic());
        e.add_traffic(500.0);
        e.register();
        let mut sink: Vec<TrafficRecord> = Vec::new();
        assert!(!e.unregister(&TrafficConfig::default(), &mut sink).unwrap());
        assert_eq!(e.traffic_load(), None);
        assert_eq!(e.register_count(), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_add_traffic_accumulates() {
        let e = PathElement::create(0, 0, 0, None, true);
        e.add_traffic(1.5);
        e.add_traffic(2.0);
        assert_eq!(e.traffic_load(), Some((3.5, 3.5)));
    }

    #[test]
    fn test_register_moves_load_one_step_up() {
        let elements = chain(true, &[0, 100, 200]);
        elements[1].add_traffic(10.0);
        elements[2].add_traffic(20.0);

        elements[2].register();

        assert_eq!(elements[0].traffic_load(), Some((10.0, 10.0)));
        assert_eq!(elements[1].traffic_load(), Some((20.0, 20.0)));
        assert_eq!(elements[2].traffic_load(), Some((0.0, 0.0)));
        assert!(elements.iter().all(|e| e.register_count() == 1));
    }

    #[test]
    fn test_second_register_only_counts() {
        let elements = chain(true, &[0, 100]);
        elements[1].register();
        elements[1].add_traffic(5.0);
        elements[1].register();
        assert_eq!(elements[1].register_count(), 2);
        assert_eq!(elements[0].register_count(), 1);
        assert_eq!(elements[1].traffic_load(), Some((5.0, 5.0)));
    }

    #[test]
    fn test_unregister_flushes_with_decay_and_reports() {
        let config = TrafficConfig {
            far_decay_length: 100.0,
            near_decay_length: 50.0,
            far_weight: 1.0,
            near_weight: 0.0,
            report_threshold: 10,
        };
        let elements = chain(true, &[0, 100]);
        elements[1].register();
        elements[1].add_traffic(40.0);

        let mut sink: Vec<TrafficRecord> = Vec::new();
        assert!(elements[1].unregister(&config, &mut sink).unwrap());

        let (far, near) = elements[0].traffic_load().unwrap();
        assert!((far - 40.0 * (-1.0f32).exp()).abs() < 1e-4);
        assert!((near - 40.0 * (-2.0f32).exp()).abs() < 1e-4);
        assert_eq!(elements[1].traffic_load(), Some((0.0, 0.0)));

        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].load, 40);
        assert_eq!(split_position_id(sink[0].from_id), (10, 20));
        assert_eq!(split_position_id(sink[0].to_id), (0, 0));
    }

    #[test]
    fn test_unregister_below_threshold_is_silent() {
        let elements = chain(true, &[0, 100]);
        elements[1].register();
        elements[1].add_traffic(1.0);
        let mut sink: Vec<TrafficRecord> = Vec::new();
        assert!(elements[1]
            .unregister(&TrafficConfig::default(), &mut sink)
            .unwrap());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_zero_cost_edge_always_reported() {
        let elements = chain(true, &[50, 50]);
        elements[1].register();
        let mut sink: Vec<TrafficRecord> = Vec::new();
        elements[1]
            .unregister(&TrafficConfig::default(), &mut sink)
            .unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].load, -1);
    }

    #[test]
    fn test_unregister_waits_for_last_registration() {
        let elements = chain(true, &[0, 100]);
        elements[1].register();
        elements[1].register();
        let mut sink: Vec<TrafficRecord> = Vec::new();
        let config = TrafficConfig::default();
        assert!(!elements[1].unregister(&config, &mut sink).unwrap());
        assert!(elements[1].unregister(&config, &mut sink).unwrap());
        // unbalanced
        assert!(!elements[1].unregister(&config, &mut sink).unwrap());
    }

    #[test]
    fn test_unregister_on_plain_origin_keeps_load() {
        let origin = PathElement::create(0, 0, 0, None, false);
        let e = PathElement::create(10, 20, 0, Some(origin), true);
        e.add_traffic(9000.0);
        e.register();
        assert_eq!(e.register_count(), 1);

        let mut sink: Vec<TrafficRecord> = Vec::new();
        assert!(e.unregister(&TrafficConfig::default(), &mut sink).unwrap());
        assert_eq!(e.register_count(), 0);
        assert_eq!(e.traffic_load(), Some((9000.0, 9000.0)));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_unregister_without_origin() {
        let e = PathElement::create(0, 0, 0, None, true);
        e.add_traffic(9000.0);
        e.register();
        let mut sink: Vec<TrafficRecord> = Vec::new();
        assert!(e.unregister(&TrafficConfig::default(), &mut sink).unwrap());
        assert_eq!(e.traffic_load(), Some((9000.0, 9000.0)));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_traffic_writer_encoding() {
        let mut writer = TrafficWriter::new(Vec::new());
        let record = TrafficRecord {
            from_id: 0x0102_0304_0506_0708,
            to_id: -2,
            load: 5000,
        };
        writer.record(record).unwrap();
        assert_eq!(writer.written(), 1);

        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), TrafficRecord::SIZE);
        assert_eq!(&bytes[..8], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(TrafficRecord::read_from(&mut bytes.as_slice()).unwrap(), record);
    }
}
