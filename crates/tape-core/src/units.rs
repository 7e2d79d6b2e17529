//! Display units for measured lengths
//!
//! World space is expressed in meters. A [`LengthUnit`] converts a world
//! distance into the number shown to the user.

use serde::{Deserialize, Serialize};

/// Unit used to display measured distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    /// Meters (factor 1)
    Meters,
    /// Centimeters (factor 100)
    #[default]
    Centimeters,
    /// Millimeters (factor 1000)
    Millimeters,
    /// Inches (factor 1 / 0.0254)
    Inches,
}

impl LengthUnit {
    /// All selectable units, in menu order
    pub const ALL: &'static [LengthUnit] = &[
        LengthUnit::Centimeters,
        LengthUnit::Millimeters,
        LengthUnit::Meters,
        LengthUnit::Inches,
    ];

    /// Multiplier from world units (meters) to this unit
    pub fn factor(&self) -> f32 {
        match self {
            LengthUnit::Meters => 1.0,
            LengthUnit::Centimeters => 100.0,
            LengthUnit::Millimeters => 1000.0,
            LengthUnit::Inches => 1.0 / 0.0254,
        }
    }

    /// Short suffix appended to label text
    pub fn suffix(&self) -> &'static str {
        match self {
            LengthUnit::Meters => "m",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Millimeters => "mm",
            LengthUnit::Inches => "in",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LengthUnit::Meters => "Meters",
            LengthUnit::Centimeters => "Centimeters",
            LengthUnit::Millimeters => "Millimeters",
            LengthUnit::Inches => "Inches",
        }
    }

    /// Convert a world distance into this unit
    pub fn convert(&self, world_distance: f32) -> f32 {
        world_distance * self.factor()
    }

    /// Format an already converted value, e.g. `"200.0 cm"`
    pub fn format(&self, value: f32, decimals: usize) -> String {
        format!("{:.*} {}", decimals, value, self.suffix())
    }
}
