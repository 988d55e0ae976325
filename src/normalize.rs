// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Metrics normalizer.
//!
//! Turns raw usage and capacity quantities into display units, joins node
//! usage to node capacity by name and derives utilization percentages. All
//! functions here are pure; a refresh simply reruns them on fresh input.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::types::error::Error;
use crate::types::metrics::{NodeCapacityRecord, NodeUsageRecord, PodUsageRecord};

mod quantity;

pub use quantity::{
    convert_cpu_cores_to_milli, convert_cpu_nano_to_milli, convert_memory_ki_to_mebi,
    first_number,
};

pub const UNAVAILABLE: &str = "unavailable";

/// A value that may be unknown for the current refresh.
///
/// Serializes as the bare value, or as the string `"unavailable"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Measure<T> {
    Available(T),
    Unavailable,
}

impl<T> Measure<T> {
    pub fn available(self) -> Option<T> {
        match self {
            Measure::Available(v) => Some(v),
            Measure::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Measure::Available(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Measure<U> {
        match self {
            Measure::Available(v) => Measure::Available(f(v)),
            Measure::Unavailable => Measure::Unavailable,
        }
    }
}

impl<T> From<Option<T>> for Measure<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Measure::Available(v),
            None => Measure::Unavailable,
        }
    }
}

impl<T: Serialize> Serialize for Measure<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Measure::Available(v) => v.serialize(serializer),
            Measure::Unavailable => serializer.serialize_str(UNAVAILABLE),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Measure<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Available(v) => v.fmt(f),
            Measure::Unavailable => f.write_str(UNAVAILABLE),
        }
    }
}

/// Utilization percentage, rounded to two decimal places.
///
/// Serializes as a number and displays as `"12.50%"`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Percent(f64);

impl Percent {
    pub fn new(value: f64) -> Self {
        Self((value * 100.0).round() / 100.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

/// Anything [`compute_percent`] can read a number from.
pub trait PercentInput {
    fn numeric(&self) -> Option<f64>;
}

impl PercentInput for &str {
    fn numeric(&self) -> Option<f64> {
        first_number(self)
    }
}

impl PercentInput for String {
    fn numeric(&self) -> Option<f64> {
        first_number(self)
    }
}

impl PercentInput for u64 {
    fn numeric(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl PercentInput for f64 {
    fn numeric(&self) -> Option<f64> {
        self.is_finite().then_some(*self)
    }
}

impl<T: PercentInput> PercentInput for Measure<T> {
    fn numeric(&self) -> Option<f64> {
        match self {
            Measure::Available(v) => v.numeric(),
            Measure::Unavailable => None,
        }
    }
}

/// `(usage / capacity) * 100`, rounded to two decimals.
///
/// Unavailable when either side carries no number or capacity is zero.
pub fn compute_percent(capacity: impl PercentInput, usage: impl PercentInput) -> Measure<Percent> {
    match (capacity.numeric(), usage.numeric()) {
        (Some(capacity), Some(usage)) if capacity != 0.0 => {
            Measure::Available(Percent::new((usage / capacity) * 100.0))
        }
        _ => Measure::Unavailable,
    }
}

/// Two-slice pie chart input. Neither slice is ever negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChartSplit {
    pub used: u64,
    pub remaining: u64,
}

impl ChartSplit {
    pub fn total(&self) -> u64 {
        self.used.saturating_add(self.remaining)
    }
}

/// Splits a resource into used and remaining slices.
///
/// A negative remaining (usage above capacity) is clamped to 0, and an
/// unknown capacity contributes nothing.
pub fn derive_chart_split(used: u64, remaining: Measure<i64>) -> ChartSplit {
    let remaining = match remaining {
        Measure::Available(r) => u64::try_from(r).unwrap_or(0),
        Measure::Unavailable => 0,
    };
    ChartSplit { used, remaining }
}

fn chart_split_against(used: u64, capacity: Measure<u64>) -> ChartSplit {
    let remaining = capacity.map(|c| {
        i64::try_from(c)
            .unwrap_or(i64::MAX)
            .saturating_sub(i64::try_from(used).unwrap_or(i64::MAX))
    });
    derive_chart_split(used, remaining)
}

/// Normalized view of one node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeView {
    pub name: String,
    pub cpu_usage_milli: u64,
    pub memory_usage_mebi: u64,
    pub cpu_capacity_milli: Measure<u64>,
    pub memory_capacity_mebi: Measure<u64>,
    pub cpu_percent: Measure<Percent>,
    pub memory_percent: Measure<Percent>,
}

impl NodeView {
    pub fn cpu_chart(&self) -> ChartSplit {
        chart_split_against(self.cpu_usage_milli, self.cpu_capacity_milli)
    }

    pub fn memory_chart(&self) -> ChartSplit {
        chart_split_against(self.memory_usage_mebi, self.memory_capacity_mebi)
    }

    pub fn has_capacity(&self) -> bool {
        self.cpu_capacity_milli.is_available()
    }
}

/// Normalized view of one pod, taken from its first container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PodView {
    pub name: String,
    pub namespace: String,
    pub cpu_usage_milli: Measure<u64>,
    pub memory_usage_mebi: Measure<u64>,
}

/// Joins node usage to node capacity by name.
///
/// Produces exactly one view per usage record, in usage order. When several
/// capacity records share a name the first one wins; a node without any
/// capacity record gets unavailable capacity and percentages.
pub fn join_node_usage_with_capacity(
    usage: &[NodeUsageRecord],
    capacity: &[NodeCapacityRecord],
) -> Result<Vec<NodeView>, Error> {
    usage
        .iter()
        .map(|node| {
            let cpu_usage_milli = convert_cpu_nano_to_milli(&node.cpu_usage_raw)?;
            let memory_usage_mebi = convert_memory_ki_to_mebi(&node.memory_usage_raw)?;

            let (cpu_capacity_milli, memory_capacity_mebi) =
                match capacity.iter().find(|c| c.name == node.name) {
                    Some(c) => (
                        Measure::Available(convert_cpu_cores_to_milli(&c.cpu_capacity_raw)?),
                        Measure::Available(convert_memory_ki_to_mebi(&c.memory_capacity_raw)?),
                    ),
                    None => (Measure::Unavailable, Measure::Unavailable),
                };

            Ok(NodeView {
                name: node.name.clone(),
                cpu_usage_milli,
                memory_usage_mebi,
                cpu_capacity_milli,
                memory_capacity_mebi,
                cpu_percent: compute_percent(cpu_capacity_milli, cpu_usage_milli),
                memory_percent: compute_percent(memory_capacity_mebi, memory_usage_mebi),
            })
        })
        .collect()
}

/// Normalizes pod usage using only the first container of each pod.
///
/// A pod without containers, or whose first container lacks a usage field,
/// reports that field as unavailable.
pub fn normalize_pods(pods: &[PodUsageRecord]) -> Result<Vec<PodView>, Error> {
    pods.iter()
        .map(|pod| {
            let first = pod.containers.first();
            let cpu = first
                .and_then(|c| c.cpu_usage_raw.as_deref())
                .map(convert_cpu_nano_to_milli)
                .transpose()?;
            let memory = first
                .and_then(|c| c.memory_usage_raw.as_deref())
                .map(convert_memory_ki_to_mebi)
                .transpose()?;

            Ok(PodView {
                name: pod.name.clone(),
                namespace: pod.namespace.clone(),
                cpu_usage_milli: cpu.into(),
                memory_usage_mebi: memory.into(),
            })
        })
        .collect()
}
