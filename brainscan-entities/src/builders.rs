pub trait Builder {
    type Build;
    fn build() -> Self::Build;
}

pub use self::facility_builder::*;

pub mod facility_builder {

    use super::*;
    use crate::{facility::*, geo::*};

    #[derive(Debug)]
    pub struct FacilityBuild {
        facility: Facility,
    }

    impl FacilityBuild {
        pub fn name(mut self, name: &str) -> Self {
            self.facility.name = name.into();
            self
        }
        pub fn phone(mut self, phone: &str) -> Self {
            self.facility.phone = Some(phone.into());
            self
        }
        pub fn address(mut self, address: &str) -> Self {
            self.facility.address = Some(address.into());
            self
        }
        pub fn kind(mut self, kind: &str) -> Self {
            self.facility.kind = Some(kind.into());
            self
        }
        pub fn pos(mut self, pos: MapPoint) -> Self {
            self.facility.pos = pos;
            self
        }
        pub fn finish(self) -> Facility {
            self.facility
        }
    }

    impl Builder for Facility {
        type Build = FacilityBuild;
        fn build() -> FacilityBuild {
            FacilityBuild {
                facility: Facility {
                    name: Facility::DEFAULT_NAME.into(),
                    phone: None,
                    address: None,
                    kind: None,
                    pos: MapPoint::default(),
                },
            }
        }
    }
}
