//! Valid weight and wingspan ranges per Center height, as observed in the character builder.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalBounds {
    pub height: u32,
    pub min_weight: u32,
    pub max_weight: u32,
    pub min_wingspan: u32,
    pub max_wingspan: u32,
    pub default_weight: u32,
}

impl PhysicalBounds {
    pub fn wingspans(&self) -> impl Iterator<Item = u32> {
        self.min_wingspan..=self.max_wingspan
    }

    pub fn weights(&self, step: u32) -> impl Iterator<Item = u32> {
        (self.min_weight..=self.max_weight).step_by(step.max(1) as usize)
    }
}

const fn bounds(
    height: u32,
    min_weight: u32,
    max_weight: u32,
    min_wingspan: u32,
    max_wingspan: u32,
    default_weight: u32,
) -> PhysicalBounds {
    PhysicalBounds {
        height,
        min_weight,
        max_weight,
        min_wingspan,
        max_wingspan,
        default_weight,
    }
}

/// 6'7" through 7'4".
pub const CENTER_BOUNDS: [PhysicalBounds; 10] = [
    bounds(79, 215, 270, 79, 85, 243),
    bounds(80, 215, 275, 80, 86, 245),
    bounds(81, 215, 285, 81, 87, 250),
    bounds(82, 215, 285, 82, 88, 250),
    bounds(83, 215, 290, 83, 89, 253),
    bounds(84, 215, 290, 84, 90, 253),
    bounds(85, 220, 290, 85, 91, 255),
    bounds(86, 220, 290, 86, 92, 255),
    bounds(87, 230, 290, 87, 93, 260),
    bounds(88, 230, 290, 88, 94, 260),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundsError {
    #[error("height {0}\" is not a valid Center height")]
    Height(u32),
    #[error("weight {weight} lbs outside {min}-{max} for this height")]
    Weight { weight: u32, min: u32, max: u32 },
    #[error("wingspan {wingspan}\" outside {min}\"-{max}\" for this height")]
    Wingspan { wingspan: u32, min: u32, max: u32 },
}

pub fn center_bounds(height: u32) -> Option<&'static PhysicalBounds> {
    CENTER_BOUNDS.iter().find(|b| b.height == height)
}

pub fn validate_center(height: u32, wingspan: u32, weight: u32) -> Result<(), BoundsError> {
    let b = center_bounds(height).ok_or(BoundsError::Height(height))?;
    if weight < b.min_weight || weight > b.max_weight {
        return Err(BoundsError::Weight {
            weight,
            min: b.min_weight,
            max: b.max_weight,
        });
    }
    if wingspan < b.min_wingspan || wingspan > b.max_wingspan {
        return Err(BoundsError::Wingspan {
            wingspan,
            min: b.min_wingspan,
            max: b.max_wingspan,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_builds_are_valid() {
        for b in &CENTER_BOUNDS {
            assert_eq!(
                validate_center(b.height, b.min_wingspan, b.default_weight),
                Ok(())
            );
        }
    }

    #[test]
    fn out_of_range_inputs_are_reported() {
        assert_eq!(validate_center(70, 75, 200), Err(BoundsError::Height(70)));
        assert!(matches!(
            validate_center(79, 82, 300),
            Err(BoundsError::Weight { max: 270, .. })
        ));
        assert!(matches!(
            validate_center(79, 90, 243),
            Err(BoundsError::Wingspan { max: 85, .. })
        ));
    }

    #[test]
    fn weight_steps_include_both_ends_when_aligned() {
        let b = center_bounds(79).unwrap();
        let weights: Vec<u32> = b.weights(5).collect();
        assert_eq!(weights.first(), Some(&215));
        assert_eq!(weights.last(), Some(&270));
        assert_eq!(weights.len(), 12);
        assert_eq!(b.wingspans().count(), 7);
    }
}
