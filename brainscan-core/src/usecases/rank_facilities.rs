use super::prelude::*;
use crate::util::sort::{DistanceTo, SortByDistance};

/// Rank the facilities by their distance from the center of the query.
///
/// Facilities with the same distance keep the order in which they
/// have been reported by the locator.
pub fn rank_facilities(ctx: &QueryContext, facilities: Vec<Facility>) -> RankedFacilities {
    let mut ranked: Vec<_> = facilities
        .into_iter()
        .filter_map(|facility| {
            let distance = facility.distance_to(ctx.center);
            if !distance.is_valid() {
                log::warn!(
                    "Ignoring facility '{}' at {} with invalid distance",
                    facility.name,
                    facility.pos
                );
                return None;
            }
            Some(RankedFacility { facility, distance })
        })
        .collect();
    ranked.sort_by_distance();
    RankedFacilities::from_sorted(ranked)
}
