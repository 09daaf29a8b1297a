use brainscan_application::prelude::{Advisory, FacilityPresenter, Severity};
use brainscan_entities::{diagnosis::Prediction, facility::RankedFacilities, geo::MapPoint};
use serde_json::{json, Value};
use std::io::{self, Write};

const CENTER_LABEL: &str = "Your Location";

/// A map marker of a ranked facility.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub pos: MapPoint,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub name: String,
    pub distance_km: f64,
    pub kind: String,
    pub address: String,
    pub phone: String,
}

/// Keeps the marker collection and the list panel of the
/// installed result set in the same order.
#[derive(Debug, Default)]
pub struct TerminalPresenter {
    center: Option<MapPoint>,
    markers: Vec<Marker>,
    entries: Vec<ListEntry>,
}

impl TerminalPresenter {
    pub fn center(&self) -> Option<MapPoint> {
        self.center
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    /// Resolve the marker that belongs to list entry `index`.
    pub fn select(&self, index: usize) -> Option<&Marker> {
        debug_assert_eq!(self.markers.len(), self.entries.len());
        self.markers.get(index)
    }

    pub fn write_list<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (i, entry) in self.entries.iter().enumerate() {
            writeln!(out, "{:>3}. {} ({:.1} km)", i + 1, entry.name, entry.distance_km)?;
            writeln!(out, "     Type:    {}", entry.kind)?;
            writeln!(out, "     Address: {}", entry.address)?;
            writeln!(out, "     Phone:   {}", entry.phone)?;
        }
        Ok(())
    }

    /// The reference position and all markers as GeoJSON `FeatureCollection`.
    pub fn to_geojson(&self) -> Value {
        let center = self.center.map(|pos| {
            json!({
                "type": "Feature",
                "geometry": point(pos),
                "properties": { "name": CENTER_LABEL, "role": "center" }
            })
        });
        let facilities = self
            .markers
            .iter()
            .zip(&self.entries)
            .enumerate()
            .map(|(i, (marker, entry))| {
                json!({
                    "type": "Feature",
                    "geometry": point(marker.pos),
                    "properties": {
                        "role": "facility",
                        "rank": i + 1,
                        "name": entry.name,
                        "distance_km": entry.distance_km,
                        "type": entry.kind,
                        "address": entry.address,
                        "phone": entry.phone,
                        "popup": marker.popup,
                    }
                })
            });
        let features: Vec<_> = center.into_iter().chain(facilities).collect();
        json!({ "type": "FeatureCollection", "features": features })
    }
}

fn point(pos: MapPoint) -> Value {
    let (lat, lng) = pos.to_lat_lng_deg();
    json!({ "type": "Point", "coordinates": [lng, lat] })
}

impl FacilityPresenter for TerminalPresenter {
    fn retire(&mut self) {
        log::debug!("Removing {} markers", self.markers.len());
        self.center = None;
        self.markers.clear();
        self.entries.clear();
    }

    fn install(&mut self, center: MapPoint, facilities: &RankedFacilities) {
        self.center = Some(center);
        for ranked in facilities.iter() {
            let f = &ranked.facility;
            let entry = ListEntry {
                name: f.name.clone(),
                distance_km: ranked.distance.to_km(),
                kind: f.display_kind().to_owned(),
                address: f.display_address().to_owned(),
                phone: f.display_phone().to_owned(),
            };
            let popup = format!(
                "{}\n{}\nDistance: {:.1} km\nPhone: {}",
                entry.name, entry.address, entry.distance_km, entry.phone
            );
            self.markers.push(Marker { pos: f.pos, popup });
            self.entries.push(entry);
        }
    }
}

pub fn advisory_line(advisory: &Advisory) -> String {
    let symbol = match advisory.severity() {
        Severity::Success => "✓",
        Severity::Info => "i",
        Severity::Warning => "!",
        Severity::Error => "✗",
    };
    format!("[{symbol}] {advisory}")
}

pub fn write_prediction<W: Write>(out: &mut W, prediction: &Prediction) -> io::Result<()> {
    writeln!(
        out,
        "Diagnosis:  {} ({:.1}% confidence)",
        prediction.class,
        prediction.confidence_percent()
    )?;
    if !prediction.confidence_scores.is_empty() {
        writeln!(out, "Confidence breakdown:")?;
        for (class, score) in &prediction.confidence_scores {
            writeln!(out, "  {:<12}{:>6.1}%", class.as_ref(), score * 100.0)?;
        }
    }
    if let Some(time) = prediction.processing_time {
        writeln!(out, "Processing time: {:.2}s", time.as_secs_f64())?;
    }
    if let Some(id) = &prediction.request_id {
        writeln!(out, "Request ID: {id}")?;
    }
    Ok(())
}
