//! Attribute caps for a single build: position, physical dimensions and the 21 rated attributes.
//! The record shape matches what the lookup service returns, so it round-trips through the cache unchanged.

pub mod approx;
pub mod bounds;
pub mod length;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use approx::{approximate, approximate_center, is_modeled};
pub use bounds::{center_bounds, validate_center, BoundsError, PhysicalBounds, CENTER_BOUNDS};
pub use length::{format_length, parse_catalog_height, parse_length, LengthError};

/// The rated attributes of a build, in the order the game's builder lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    CloseShot,
    DrivingLayup,
    DrivingDunk,
    StandingDunk,
    PostControl,
    MidRangeShot,
    ThreePointShot,
    FreeThrow,
    PassAccuracy,
    BallHandle,
    SpeedWithBall,
    InteriorDefense,
    PerimeterDefense,
    Steal,
    Block,
    OffensiveRebound,
    DefensiveRebound,
    Speed,
    Agility,
    Strength,
    Vertical,
}

impl Attribute {
    pub const ALL: [Attribute; 21] = [
        Self::CloseShot,
        Self::DrivingLayup,
        Self::DrivingDunk,
        Self::StandingDunk,
        Self::PostControl,
        Self::MidRangeShot,
        Self::ThreePointShot,
        Self::FreeThrow,
        Self::PassAccuracy,
        Self::BallHandle,
        Self::SpeedWithBall,
        Self::InteriorDefense,
        Self::PerimeterDefense,
        Self::Steal,
        Self::Block,
        Self::OffensiveRebound,
        Self::DefensiveRebound,
        Self::Speed,
        Self::Agility,
        Self::Strength,
        Self::Vertical,
    ];

    /// Name as it appears in the badge requirement catalog.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::CloseShot => "Close Shot",
            Self::DrivingLayup => "Driving Layup",
            Self::DrivingDunk => "Driving Dunk",
            Self::StandingDunk => "Standing Dunk",
            Self::PostControl => "Post Control",
            Self::MidRangeShot => "Mid-Range Shot",
            Self::ThreePointShot => "Three-Point Shot",
            Self::FreeThrow => "Free Throw",
            Self::PassAccuracy => "Pass Accuracy",
            Self::BallHandle => "Ball Handle",
            Self::SpeedWithBall => "Speed With Ball",
            Self::InteriorDefense => "Interior Defense",
            Self::PerimeterDefense => "Perimeter Defense",
            Self::Steal => "Steal",
            Self::Block => "Block",
            Self::OffensiveRebound => "Offensive Rebound",
            Self::DefensiveRebound => "Defensive Rebound",
            Self::Speed => "Speed",
            Self::Agility => "Agility",
            Self::Strength => "Strength",
            Self::Vertical => "Vertical",
        }
    }

    /// JSON field name on [AttributeCaps] (and in scraped datasets).
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::CloseShot => "close_shot",
            Self::DrivingLayup => "driving_layup",
            Self::DrivingDunk => "driving_dunk",
            Self::StandingDunk => "standing_dunk",
            Self::PostControl => "post_control",
            Self::MidRangeShot => "mid_range_shot",
            Self::ThreePointShot => "three_point_shot",
            Self::FreeThrow => "free_throw",
            Self::PassAccuracy => "pass_accuracy",
            Self::BallHandle => "ball_handle",
            Self::SpeedWithBall => "speed_with_ball",
            Self::InteriorDefense => "interior_defense",
            Self::PerimeterDefense => "perimeter_defense",
            Self::Steal => "steal",
            Self::Block => "block",
            Self::OffensiveRebound => "offensive_rebound",
            Self::DefensiveRebound => "defensive_rebound",
            Self::Speed => "speed",
            Self::Agility => "agility",
            Self::Strength => "strength",
            Self::Vertical => "vertical",
        }
    }

    /// Builder group the attribute is shown under.
    pub fn group(&self) -> &'static str {
        match self {
            Self::CloseShot
            | Self::DrivingLayup
            | Self::DrivingDunk
            | Self::StandingDunk
            | Self::PostControl => "Finishing",
            Self::MidRangeShot | Self::ThreePointShot | Self::FreeThrow => "Shooting",
            Self::PassAccuracy | Self::BallHandle | Self::SpeedWithBall => "Playmaking",
            Self::InteriorDefense | Self::PerimeterDefense | Self::Steal | Self::Block => {
                "Defense"
            }
            Self::OffensiveRebound | Self::DefensiveRebound => "Rebounding",
            Self::Speed | Self::Agility | Self::Strength | Self::Vertical => "Physicals",
        }
    }

    /// Resolve a catalog attribute name. "Layup" is accepted as an alias for Driving Layup.
    pub fn from_catalog_name(name: &str) -> Option<Attribute> {
        let trimmed = name.trim();
        if trimmed == "Layup" {
            return Some(Self::DrivingLayup);
        }
        Self::ALL
            .into_iter()
            .find(|attr| attr.display_name() == trimmed)
    }

    pub fn from_field_name(name: &str) -> Option<Attribute> {
        Self::ALL.into_iter().find(|attr| attr.field_name() == name)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Attribute caps for one position/height/wingspan/weight combination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeCaps {
    pub position: String,
    pub height: u32,
    pub wingspan: u32,
    pub weight: u32,
    pub close_shot: u8,
    pub driving_layup: u8,
    pub driving_dunk: u8,
    pub standing_dunk: u8,
    pub post_control: u8,
    pub mid_range_shot: u8,
    pub three_point_shot: u8,
    pub free_throw: u8,
    pub pass_accuracy: u8,
    pub ball_handle: u8,
    pub speed_with_ball: u8,
    pub interior_defense: u8,
    pub perimeter_defense: u8,
    pub steal: u8,
    pub block: u8,
    pub offensive_rebound: u8,
    pub defensive_rebound: u8,
    pub speed: u8,
    pub strength: u8,
    pub vertical: u8,
    pub agility: u8,
}

impl AttributeCaps {
    /// Physical dimensions only; every attribute starts at 0.
    pub fn new(position: impl Into<String>, height: u32, wingspan: u32, weight: u32) -> Self {
        Self {
            position: position.into(),
            height,
            wingspan,
            weight,
            ..Self::default()
        }
    }

    pub fn get(&self, attribute: Attribute) -> u8 {
        match attribute {
            Attribute::CloseShot => self.close_shot,
            Attribute::DrivingLayup => self.driving_layup,
            Attribute::DrivingDunk => self.driving_dunk,
            Attribute::StandingDunk => self.standing_dunk,
            Attribute::PostControl => self.post_control,
            Attribute::MidRangeShot => self.mid_range_shot,
            Attribute::ThreePointShot => self.three_point_shot,
            Attribute::FreeThrow => self.free_throw,
            Attribute::PassAccuracy => self.pass_accuracy,
            Attribute::BallHandle => self.ball_handle,
            Attribute::SpeedWithBall => self.speed_with_ball,
            Attribute::InteriorDefense => self.interior_defense,
            Attribute::PerimeterDefense => self.perimeter_defense,
            Attribute::Steal => self.steal,
            Attribute::Block => self.block,
            Attribute::OffensiveRebound => self.offensive_rebound,
            Attribute::DefensiveRebound => self.defensive_rebound,
            Attribute::Speed => self.speed,
            Attribute::Agility => self.agility,
            Attribute::Strength => self.strength,
            Attribute::Vertical => self.vertical,
        }
    }

    pub fn set(&mut self, attribute: Attribute, value: u8) {
        let slot = match attribute {
            Attribute::CloseShot => &mut self.close_shot,
            Attribute::DrivingLayup => &mut self.driving_layup,
            Attribute::DrivingDunk => &mut self.driving_dunk,
            Attribute::StandingDunk => &mut self.standing_dunk,
            Attribute::PostControl => &mut self.post_control,
            Attribute::MidRangeShot => &mut self.mid_range_shot,
            Attribute::ThreePointShot => &mut self.three_point_shot,
            Attribute::FreeThrow => &mut self.free_throw,
            Attribute::PassAccuracy => &mut self.pass_accuracy,
            Attribute::BallHandle => &mut self.ball_handle,
            Attribute::SpeedWithBall => &mut self.speed_with_ball,
            Attribute::InteriorDefense => &mut self.interior_defense,
            Attribute::PerimeterDefense => &mut self.perimeter_defense,
            Attribute::Steal => &mut self.steal,
            Attribute::Block => &mut self.block,
            Attribute::OffensiveRebound => &mut self.offensive_rebound,
            Attribute::DefensiveRebound => &mut self.defensive_rebound,
            Attribute::Speed => &mut self.speed,
            Attribute::Agility => &mut self.agility,
            Attribute::Strength => &mut self.strength,
            Attribute::Vertical => &mut self.vertical,
        };
        *slot = value;
    }

    /// Builder-style [set](AttributeCaps::set), handy for fixtures.
    pub fn with(mut self, attribute: Attribute, value: u8) -> Self {
        self.set(attribute, value);
        self
    }

    /// Mean cap across all 21 attributes.
    pub fn average_cap(&self) -> f64 {
        let total: u32 = Attribute::ALL
            .iter()
            .map(|attr| u32::from(self.get(*attr)))
            .sum();
        f64::from(total) / Attribute::ALL.len() as f64
    }
}
