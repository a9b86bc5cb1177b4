//! Region classification and marker colors.
//!
//! The table is closed: every region id the controller sends resolves to
//! exactly one class, and anything unlisted is [`RegionClass::Unclassified`]
//! with the default gray.

/// Fill color for PACs in an unlisted region.
pub const DEFAULT_COLOR: &str = "#6b7280";

/// Known region classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionClass {
    /// `sector_alpha`
    SectorAlpha,
    /// `sector_beta`
    SectorBeta,
    /// `sector_gamma`
    SectorGamma,
    /// `global_grid`
    GlobalGrid,
    /// Any other region id.
    Unclassified,
}

impl RegionClass {
    /// Classify a region id. Matching is exact and case-sensitive.
    pub fn classify(region_id: &str) -> Self {
        match region_id {
            "sector_alpha" => Self::SectorAlpha,
            "sector_beta" => Self::SectorBeta,
            "sector_gamma" => Self::SectorGamma,
            "global_grid" => Self::GlobalGrid,
            _ => Self::Unclassified,
        }
    }

    /// Fill color for this class.
    pub const fn color(self) -> &'static str {
        match self {
            Self::SectorAlpha => "#3b82f6",
            Self::SectorBeta => "#10b981",
            Self::SectorGamma => "#f59e0b",
            Self::GlobalGrid => "#8b5cf6",
            Self::Unclassified => DEFAULT_COLOR,
        }
    }
}

/// Fill color for a region id.
pub fn region_color(region_id: &str) -> &'static str {
    RegionClass::classify(region_id).color()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listed_regions_have_fixed_colors() {
        assert_eq!(region_color("sector_alpha"), "#3b82f6");
        assert_eq!(region_color("sector_beta"), "#10b981");
        assert_eq!(region_color("sector_gamma"), "#f59e0b");
        assert_eq!(region_color("global_grid"), "#8b5cf6");
    }

    #[test]
    fn unknown_regions_fall_back_to_default() {
        assert_eq!(region_color("unknown_zone"), DEFAULT_COLOR);
        assert_eq!(region_color(""), DEFAULT_COLOR);
        assert_eq!(region_color("SECTOR_ALPHA"), DEFAULT_COLOR);
    }
}
