//! Time/energy payload attached to path elements
//!
//! A [`MessageData`] is owned by the in-progress path and shared by reference
//! with every element frozen from it. Time and energy sit in `Cell`s so a
//! smoothing pass can rewrite them after the elements are frozen.

use serde::Serialize;
use std::cell::Cell;

/// Descriptive data carried along with a step. Not interpreted by this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Annotations {
    /// Tags of the way the step travels on, e.g. `highway=residential`
    pub way_tags: Option<String>,
    /// Tags of the target node, e.g. `highway=traffic_signals`
    pub node_tags: Option<String>,
    /// Length of the link in meters
    pub link_distance: i32,
    /// Turn angle at the step's start node, in degrees
    pub turn_angle: f32,
    pub elevation_cost: i32,
    pub turn_cost: i32,
    pub node_cost: i32,
    pub initial_cost: i32,
}

/// Elapsed time and energy at a step, plus opaque annotations
#[derive(Debug, Default)]
pub struct MessageData {
    time: Cell<f32>,
    energy: Cell<f32>,
    annotations: Annotations,
}

impl MessageData {
    pub fn new(time: f32, energy: f32) -> Self {
        Self {
            time: Cell::new(time),
            energy: Cell::new(energy),
            annotations: Annotations::default(),
        }
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Elapsed time in seconds
    pub fn time(&self) -> f32 {
        self.time.get()
    }

    pub fn set_time(&self, time: f32) {
        self.time.set(time);
    }

    pub fn energy(&self) -> f32 {
        self.energy.get()
    }

    pub fn set_energy(&self, energy: f32) {
        self.energy.set(energy);
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}
