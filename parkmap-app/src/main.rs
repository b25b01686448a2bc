use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use parkmap::{
    diff::{count_highlighted, diff_tile, DiffStyle, Sensitivity, SensitivityRange},
    tiles::{TileSource, TimeOfDay},
    LatLng, ParkCatalog, TileCoordinate,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "parkmap-app")]
#[command(about = "Park map tile tools: extents, tile URLs and highlight diffs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the padded Web-Mercator extent of a park's tiles
    Extent {
        /// Park id, e.g. `wdw`
        park: String,
    },
    /// Write a highlight diff of two tiles
    Diff {
        before: PathBuf,
        after: PathBuf,
        /// Output PNG
        out: PathBuf,
        /// ΔE threshold
        #[arg(long, conflicts_with = "sensitivity")]
        threshold: Option<f64>,
        /// Slider position, 0 to 100; higher flags more pixels
        #[arg(long)]
        sensitivity: Option<i32>,
    },
    /// Print the URL of one tile, with XYZ row numbering
    TileUrl {
        park: String,
        /// Map version code
        code: String,
        z: u8,
        x: u32,
        y: u32,
        /// Request night-time tiles from relayed sources
        #[arg(long)]
        night: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Extent { park } => print_extent(&park),
        Commands::Diff {
            before,
            after,
            out,
            threshold,
            sensitivity,
        } => write_diff(&before, &after, &out, threshold, sensitivity),
        Commands::TileUrl {
            park,
            code,
            z,
            x,
            y,
            night,
        } => print_tile_url(&park, &code, TileCoordinate::new(z, x, y), night),
    }
}

fn print_extent(park_id: &str) -> anyhow::Result<()> {
    let park = ParkCatalog::builtin()
        .get(park_id)
        .ok_or_else(|| anyhow!("unknown park '{}'", park_id))?;
    let extent = park
        .island_extent()
        .ok_or_else(|| anyhow!("park '{}' has no tile bounds", park_id))?;

    let [min_x, min_y, max_x, max_y] = extent.to_array();
    let center = LatLng::from_mercator(extent.center());
    println!("{} ({})", park.name, park.park_id);
    println!("extent: [{:.2}, {:.2}, {:.2}, {:.2}]", min_x, min_y, max_x, max_y);
    println!("size:   {:.0} m x {:.0} m", extent.width(), extent.height());
    println!("center: {:.6}, {:.6}", center.lat, center.lng);
    Ok(())
}

fn write_diff(
    before: &Path,
    after: &Path,
    out: &Path,
    threshold: Option<f64>,
    sensitivity: Option<i32>,
) -> anyhow::Result<()> {
    let threshold = match (threshold, sensitivity) {
        (Some(t), _) if !t.is_finite() || t < 0.0 => {
            bail!("threshold must be a non-negative number")
        }
        (Some(t), _) => t,
        (None, Some(s)) => Sensitivity::new(SensitivityRange::default(), s).threshold(),
        (None, None) => Sensitivity::default().threshold(),
    };

    let before_img = image::open(before)
        .with_context(|| format!("reading {}", before.display()))?
        .to_rgba8();
    let after_img = image::open(after)
        .with_context(|| format!("reading {}", after.display()))?
        .to_rgba8();

    let diff = diff_tile(&before_img, &after_img, threshold)?;
    diff.save(out)
        .with_context(|| format!("writing {}", out.display()))?;

    let changed = count_highlighted(&diff, &DiffStyle::default());
    let total = diff.width() as usize * diff.height() as usize;
    log::info!("wrote {}", out.display());
    println!(
        "threshold {:.1}: {} of {} pixels changed ({:.1}%)",
        threshold,
        changed,
        total,
        if total == 0 { 0.0 } else { changed as f64 * 100.0 / total as f64 }
    );
    Ok(())
}

fn print_tile_url(
    park_id: &str,
    code: &str,
    coord: TileCoordinate,
    night: bool,
) -> anyhow::Result<()> {
    if !coord.is_valid() {
        bail!("tile {}/{}/{} does not exist", coord.zoom, coord.x, coord.y);
    }
    let park = ParkCatalog::builtin()
        .get(park_id)
        .ok_or_else(|| anyhow!("unknown park '{}'", park_id))?;
    let mode = if night {
        TimeOfDay::Nighttime
    } else {
        TimeOfDay::Daytime
    };

    let source = park.tile_source(code, mode)?;
    println!("{}", source.url(&coord));
    Ok(())
}
