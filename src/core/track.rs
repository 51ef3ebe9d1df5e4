//! Routes reconstructed from a goal element

use serde::Serialize;

use crate::core::distance::DistanceFn;
use crate::core::element::{PathElement, PendingStep};
use crate::core::error::{Error, Result};
use crate::core::position::{GeoPoint, Positioned};

/// Totals over a track, for reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub elements: usize,
    pub distance_meters: i64,
    pub cost: i32,
    pub ascend_meters: f64,
    pub time_seconds: f32,
    pub energy: f32,
    pub start: Option<String>,
    pub goal: Option<String>,
}

/// Elements of one route in travel order
#[derive(Debug, Clone)]
pub struct Track {
    elements: Vec<PathElement>,
}

impl Track {
    /// Walk the origin chain back from `goal`
    pub fn from_goal(goal: &PathElement) -> Self {
        Self {
            elements: goal.route(),
        }
    }

    /// Link detached elements (e.g. decoded records) into a fresh chain in
    /// the given order. Costs are kept; messages and traffic state are not.
    pub fn rethread<I>(elements: I) -> Result<Self>
    where
        I: IntoIterator<Item = PathElement>,
    {
        let mut last: Option<PathElement> = None;
        let mut count = 0usize;
        for element in elements {
            let step = PendingStep {
                target: GeoPoint::new(element.longitude(), element.latitude())
                    .with_elevation(element.elevation_quantized()),
                origin: last.take(),
                cost: element.cost(),
                message: None,
            };
            last = Some(PathElement::from_path(&step, false));
            count += 1;
        }
        let goal = last.ok_or_else(|| Error::InvalidInput("no elements to rethread".into()))?;
        log::debug!("Rethreaded {} elements", count);
        Ok(Self::from_goal(&goal))
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn start(&self) -> Option<&PathElement> {
        self.elements.first()
    }

    pub fn goal(&self) -> Option<&PathElement> {
        self.elements.last()
    }

    /// Accumulated cost at the goal
    pub fn cost(&self) -> i32 {
        self.goal().map_or(0, PathElement::cost)
    }

    /// Sum of rounded step distances in meters
    pub fn distance<D: DistanceFn + ?Sized>(&self, distance: &D) -> i64 {
        self.elements
            .windows(2)
            .map(|pair| i64::from(pair[0].distance_to(&pair[1], distance)))
            .sum()
    }

    /// Sum of elevation gains in meters
    pub fn ascend(&self) -> f64 {
        self.elements
            .windows(2)
            .map(|pair| (pair[1].elevation_meters() - pair[0].elevation_meters()).max(0.0))
            .sum()
    }

    /// Elapsed time at the goal, 0 without time tracking
    pub fn total_time(&self) -> f32 {
        self.goal().map_or(0.0, PathElement::time)
    }

    /// Energy at the goal, 0 without energy tracking
    pub fn total_energy(&self) -> f32 {
        self.goal().map_or(0.0, PathElement::energy)
    }

    /// Add the same load to every element; plain elements ignore it
    pub fn add_traffic(&self, traffic: f32) {
        for element in &self.elements {
            element.add_traffic(traffic);
        }
    }

    pub fn summary<D: DistanceFn + ?Sized>(&self, distance: &D) -> TrackSummary {
        TrackSummary {
            elements: self.len(),
            distance_meters: self.distance(distance),
            cost: self.cost(),
            ascend_meters: self.ascend(),
            time_seconds: self.total_time(),
            energy: self.total_energy(),
            start: self.start().map(|e| e.to_string()),
            goal: self.goal().map(|e| e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::core::message::MessageData;

    fn unit_distance(_: i32, _: i32, _: i32, _: i32) -> f64 {
        9.5
    }

    fn sample_track() -> Track {
        let a = PathElement::create(0, 0, 400, None, false);
        let b = PathElement::create(1, 1, 404, Some(a), false);
        let c = PathElement::create(2, 2, 396, Some(b), false);
        let step = PendingStep {
            target: GeoPoint::new(3, 3).with_elevation(408),
            origin: Some(c),
            cost: 250,
            message: Some(Rc::new(MessageData::new(60.0, 7.5))),
        };
        Track::from_goal(&PathElement::from_path(&step, false))
    }

    #[test]
    fn test_track_totals() {
        let track = sample_track();
        assert_eq!(track.len(), 4);
        assert_eq!(track.start().unwrap().longitude(), 0);
        assert_eq!(track.cost(), 250);
        assert_eq!(track.distance(&unit_distance), 30);
        // +1.0, -2.0, +3.0
        assert_eq!(track.ascend(), 4.0);
        assert_eq!(track.total_time(), 60.0);
        assert_eq!(track.total_energy(), 7.5);
    }

    #[test]
    fn test_summary() {
        let summary = sample_track().summary(&unit_distance);
        assert_eq!(summary.elements, 4);
        assert_eq!(summary.start.as_deref(), Some("0_0"));
        assert_eq!(summary.goal.as_deref(), Some("3_3"));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["distance_meters"], 30);
    }

    #[test]
    fn test_rethread_keeps_order_and_cost() {
        let detached: Vec<PathElement> = (0..4)
            .map(|i| PathElement::detached(i, i, 0, i * 10))
            .collect();
        let track = Track::rethread(detached).unwrap();
        assert_eq!(track.len(), 4);
        assert_eq!(track.goal().unwrap().cost(), 30);
        assert_eq!(track.goal().unwrap().chain_len(), 4);
        assert!(track.start().unwrap().origin().is_none());
    }

    #[test]
    fn test_rethread_empty() {
        let err = Track::rethread(Vec::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_add_traffic_on_mixed_chain() {
        let a = PathElement::create(0, 0, 0, None, true);
        let b = PathElement::create(1, 1, 0, Some(a), false);
        let c = PathElement::create(2, 2, 0, Some(b), true);
        let track = Track::from_goal(&c);
        track.add_traffic(2.0);
        let loads: Vec<_> = track.elements().iter().map(|e| e.traffic_load()).collect();
        assert_eq!(loads, vec![Some((2.0, 2.0)), None, Some((2.0, 2.0))]);
    }
}
