use super::*;

/// Renders a ranked result set, e.g. as map markers and a list panel.
///
/// Marker `i` and list entry `i` always belong to facility `i`
/// of the installed result set.
pub trait FacilityPresenter {
    /// Remove all markers and list entries of the previous result.
    fn retire(&mut self);

    /// Show the facilities in the given order around the reference position.
    fn install(&mut self, center: MapPoint, facilities: &RankedFacilities);
}

impl<P> FacilityPresenter for Box<P>
where
    P: FacilityPresenter + ?Sized,
{
    fn retire(&mut self) {
        (**self).retire();
    }

    fn install(&mut self, center: MapPoint, facilities: &RankedFacilities) {
        (**self).install(center, facilities);
    }
}
