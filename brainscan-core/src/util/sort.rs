use brainscan_entities::{facility::*, geo::*};

pub trait DistanceTo {
    fn distance_to(&self, pos: MapPoint) -> Distance;
}

impl DistanceTo for Facility {
    fn distance_to(&self, pos: MapPoint) -> Distance {
        MapPoint::distance(pos, self.pos)
    }
}

pub trait SortByDistance {
    /// Stable sort, i.e. entries with equal distances keep their order.
    fn sort_by_distance(&mut self);
}

impl SortByDistance for [RankedFacility] {
    fn sort_by_distance(&mut self) {
        self.sort_by(|a, b| a.distance.to_meters().total_cmp(&b.distance.to_meters()));
    }
}
