//! Local approximation of Center attribute caps, used when the lookup service is unreachable.
//!
//! Only the attributes whose caps have been pinned down by in-game testing are modelled;
//! everything else reports `None` and is filled with 0 in the resulting record.

use super::{Attribute, AttributeCaps};

/// Approximate one attribute cap. `None` means the attribute is not modelled for this build.
pub fn approximate(attribute: Attribute, height: u32, _wingspan: u32, _weight: u32) -> Option<u8> {
    match attribute {
        Attribute::CloseShot | Attribute::PassAccuracy => Some(99),
        Attribute::DrivingLayup => match height {
            79 => Some(99),
            88 => Some(62),
            _ => None,
        },
        _ => None,
    }
}

pub fn is_modeled(attribute: Attribute, height: u32, wingspan: u32, weight: u32) -> bool {
    approximate(attribute, height, wingspan, weight).is_some()
}

/// Full record for a Center build; unmodelled attributes are 0.
pub fn approximate_center(height: u32, wingspan: u32, weight: u32) -> AttributeCaps {
    let mut caps = AttributeCaps::new("Center", height, wingspan, weight);
    for attr in Attribute::ALL {
        caps.set(attr, approximate(attr, height, wingspan, weight).unwrap_or(0));
    }
    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_caps_ignore_dimensions() {
        for height in [79, 84, 88] {
            assert_eq!(approximate(Attribute::CloseShot, height, 90, 250), Some(99));
            assert_eq!(approximate(Attribute::PassAccuracy, height, 90, 250), Some(99));
        }
    }

    #[test]
    fn driving_layup_known_only_at_extremes() {
        assert_eq!(approximate(Attribute::DrivingLayup, 79, 79, 215), Some(99));
        assert_eq!(approximate(Attribute::DrivingLayup, 88, 91, 260), Some(62));
        assert!(!is_modeled(Attribute::DrivingLayup, 84, 87, 250));
    }

    #[test]
    fn record_fills_unmodelled_with_zero() {
        let caps = approximate_center(88, 91, 260);
        assert_eq!(caps.position, "Center");
        assert_eq!(caps.driving_layup, 62);
        assert_eq!(caps.vertical, 0);
        assert_eq!((caps.height, caps.wingspan, caps.weight), (88, 91, 260));
    }
}
