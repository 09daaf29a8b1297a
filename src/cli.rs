use crate::{
    config::{Classifier, Config, LocationGateway},
    render::{self, TerminalPresenter},
};
use anyhow::{anyhow, bail, Context, Result};
use brainscan_application::prelude::*;
use brainscan_core::{
    gateways::location::LocationProvider,
    usecases,
    util::validate::MAX_UPLOAD_SIZE,
};
use brainscan_entities::{geo::MapPoint, upload::ImageUpload};
use brainscan_gateways::{
    classifier::ClassificationService,
    geolocation::{FixedPosition, IpApi},
    overpass::Overpass,
};
use clap::{Args, Parser, Subcommand};
use std::{fs, io, path::PathBuf};

/// Brain MRI tumor classification and nearby hospital search
#[derive(Debug, Parser)]
#[command(name = "brainscan", version, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Find the hospitals nearest to the current position
    Hospitals {
        #[command(flatten)]
        position: PositionArgs,

        /// Write the markers as GeoJSON into this file
        #[arg(long, value_name = "FILE")]
        geojson: Option<PathBuf>,

        /// Show the marker of list entry N (starting at 1)
        #[arg(long, value_name = "N")]
        select: Option<usize>,
    },
    /// Classify a brain MRI scan
    Analyze {
        /// JPEG, PNG, BMP, TIFF or DICOM file
        image: PathBuf,

        /// Search nearby hospitals if a tumor is detected
        #[arg(long)]
        find_hospitals: bool,

        #[command(flatten)]
        position: PositionArgs,
    },
    /// Check the connection to the classification service
    Health,
}

#[derive(Debug, Args)]
struct PositionArgs {
    /// Latitude of the current position in degrees
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude of the current position in degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,
}

impl PositionArgs {
    fn position(&self) -> Result<Option<MapPoint>> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => MapPoint::try_from_lat_lng_deg(lat, lng)
                .map(Some)
                .ok_or_else(|| anyhow!("Invalid position: {lat},{lng}")),
            _ => Ok(None),
        }
    }
}

pub async fn run() -> Result<()> {
    let Cli { config, command } = Cli::parse();
    let cfg = Config::try_load_from_file_or_default(config.as_ref())?;
    match command {
        Command::Hospitals {
            position,
            geojson,
            select,
        } => find_hospitals(&cfg, position.position()?, geojson, select).await,
        Command::Analyze {
            image,
            find_hospitals: search,
            position,
        } => {
            let position = position.position()?;
            let tumor_detected = analyze(&cfg, image, search).await?;
            if tumor_detected && search {
                find_hospitals(&cfg, position, None, None).await?;
            }
            Ok(())
        }
        Command::Health => {
            let service = classification_service(&cfg)?;
            let advisory = check_service(&service).await;
            println!("{}", render::advisory_line(&advisory));
            if advisory.severity() == Severity::Error {
                bail!("The classification service is not available");
            }
            Ok(())
        }
    }
}

fn classification_service(cfg: &Config) -> Result<ClassificationService> {
    let Classifier { api_url, timeout } = &cfg.classifier;
    let service = ClassificationService::new(api_url.clone(), *timeout)?;
    Ok(service)
}

fn location_provider(
    cfg: &Config,
    position: Option<MapPoint>,
) -> Result<Box<dyn LocationProvider + Send + Sync>> {
    if let Some(pos) = position {
        log::debug!("Using the given position {pos}");
        return Ok(Box::new(FixedPosition::new(pos)));
    }
    let provider: Box<dyn LocationProvider + Send + Sync> = match &cfg.location {
        LocationGateway::IpApi { api_url } => Box::new(IpApi::new(
            api_url.clone(),
            cfg.discovery.geolocation_timeout,
        )?),
        LocationGateway::None => Box::new(FixedPosition::unavailable()),
    };
    Ok(provider)
}

async fn find_hospitals(
    cfg: &Config,
    position: Option<MapPoint>,
    geojson: Option<PathBuf>,
    select: Option<usize>,
) -> Result<()> {
    let location = location_provider(cfg, position)?;
    let locator = Overpass::new(
        cfg.overpass.api_url.clone(),
        cfg.overpass.server_timeout,
        cfg.discovery.query_timeout,
    )?;
    let discovery = Discovery::new(location, locator, TerminalPresenter::default(), cfg.discovery);

    println!("Searching hospitals...");
    let report = discovery.discover().await;
    for advisory in &report.advisories {
        println!("{}", render::advisory_line(advisory));
    }
    match report.outcome {
        DiscoveryOutcome::Ranked(_) => {}
        DiscoveryOutcome::LocatorFailed(err) => return Err(err.into()),
        DiscoveryOutcome::Superseded => return Ok(()),
    }
    println!("Search center: {}", report.center);

    discovery.with_presenter(|presenter| -> Result<()> {
        presenter.write_list(&mut io::stdout().lock())?;
        if let Some(path) = &geojson {
            let json = serde_json::to_string_pretty(&presenter.to_geojson())?;
            fs::write(path, json)
                .with_context(|| format!("Could not write GeoJSON to {}", path.display()))?;
            println!("Wrote {} markers to {}", presenter.markers().len(), path.display());
        }
        if let Some(n) = select {
            let marker = n
                .checked_sub(1)
                .and_then(|index| presenter.select(index))
                .ok_or_else(|| anyhow!("There is no list entry {n}"))?;
            println!("\nMarker at {}:\n{}", marker.pos, marker.popup);
        }
        Ok(())
    })
}

/// Returns whether a tumor has been detected.
async fn analyze(cfg: &Config, image: PathBuf, find_hospitals: bool) -> Result<bool> {
    let service = classification_service(cfg)?;
    let health = check_service(&service).await;
    println!("{}", render::advisory_line(&health));

    let upload = read_upload(image)?;
    println!("Analyzing {} ...", upload.file_name);
    let report = analyze_scan(&service, &upload).await?;
    render::write_prediction(&mut io::stdout().lock(), &report.prediction)?;
    for advisory in &report.advisories {
        if matches!(advisory, Advisory::TumorDetected(_)) && !find_hospitals {
            continue;
        }
        println!("{}", render::advisory_line(advisory));
    }
    if report.tumor_detected() && !find_hospitals {
        println!("Run again with --find-hospitals to search nearby hospitals.");
    }
    Ok(report.tumor_detected())
}

fn read_upload(path: PathBuf) -> Result<ImageUpload> {
    let len = fs::metadata(&path)
        .with_context(|| format!("Could not read {}", path.display()))?
        .len();
    let size = usize::try_from(len).unwrap_or(usize::MAX);
    if size > MAX_UPLOAD_SIZE {
        return Err(usecases::Error::UploadTooLarge { size }.into());
    }
    let data = fs::read(&path).with_context(|| format!("Could not read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = path
        .extension()
        .and_then(|ext| content_type(&ext.to_string_lossy()))
        .map(ToOwned::to_owned);
    Ok(ImageUpload {
        file_name,
        content_type,
        data,
    })
}

fn content_type(extension: &str) -> Option<&'static str> {
    let content_type = match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "dcm" => "application/dicom",
        _ => return None,
    };
    Some(content_type)
}
