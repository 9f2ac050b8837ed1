use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Write a synthetic exoplanet catalog for offline use.
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
struct Args {
    /// Output file
    #[arg(default_value = "sample_catalog.parquet")]
    output: PathBuf,

    /// Number of planets
    #[arg(short, long, default_value_t = 500)]
    count: usize,

    /// RNG seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
}

const FACILITIES: [&str; 6] = [
    "Kepler",
    "K2",
    "Transiting Exoplanet Survey Satellite (TESS)",
    "La Silla Observatory",
    "W. M. Keck Observatory",
    "Spitzer Space Telescope",
];

struct Planet {
    name: String,
    host: String,
    year: i64,
    radius: Option<f64>,
    mass: Option<f64>,
    eq_temp: Option<f64>,
    star_temp: Option<f64>,
    star_mass: Option<f64>,
    facility: Option<&'static str>,
}

/// One host with 1–4 planets. Radii are log-uniform between 0.5 and 20
/// Earth radii; roughly one in ten optional values is missing.
fn generate_system(rng: &mut StdRng, host_no: usize) -> Vec<Planet> {
    let facility = FACILITIES[rng.gen_range(0..FACILITIES.len())];
    let host = format!("{}-{}", facility.split_whitespace().next().unwrap_or("Star"), host_no);
    let star_temp: f64 = rng.gen_range(2500.0..7500.0);
    let star_mass = (star_temp / 5772.0).powf(1.6);
    let year = rng.gen_range(1995..=2024);
    let n_planets = rng.gen_range(1..=4);

    (0..n_planets)
        .map(|i| {
            let radius = 10f64.powf(rng.gen_range(0.5f64.log10()..20f64.log10()));
            // Inner planets are hotter.
            let eq_temp = star_temp * 0.05 * (1.0 + rng.gen_range(0.0..1.5)) / (1.0 + i as f64 * 0.6);
            let mut maybe = |v: f64| (!rng.gen_bool(0.1)).then_some(v);
            Planet {
                name: format!("{host} {}", (b'b' + i as u8) as char),
                host: host.clone(),
                year,
                radius: maybe(radius),
                mass: maybe(radius.powf(2.06)),
                eq_temp: maybe(eq_temp),
                star_temp: maybe(star_temp),
                star_mass: maybe(star_mass),
                facility: Some(facility),
            }
        })
        .collect()
}

fn float_column<F: Fn(&Planet) -> Option<f64>>(planets: &[Planet], f: F) -> ArrayRef {
    Arc::new(planets.iter().map(f).collect::<Float64Array>())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut planets = Vec::with_capacity(args.count);
    let mut host_no = 1;
    while planets.len() < args.count {
        planets.extend(generate_system(&mut rng, host_no));
        host_no += 1;
    }
    planets.truncate(args.count);

    let schema = Arc::new(Schema::new(vec![
        Field::new("pl_name", DataType::Utf8, false),
        Field::new("hostname", DataType::Utf8, false),
        Field::new("disc_year", DataType::Int64, true),
        Field::new("pl_rade", DataType::Float64, true),
        Field::new("pl_masse", DataType::Float64, true),
        Field::new("pl_eqt", DataType::Float64, true),
        Field::new("st_teff", DataType::Float64, true),
        Field::new("st_mass", DataType::Float64, true),
        Field::new("disc_facility", DataType::Utf8, true),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(planets.iter().map(|p| p.name.as_str()))),
        Arc::new(StringArray::from_iter_values(planets.iter().map(|p| p.host.as_str()))),
        Arc::new(planets.iter().map(|p| Some(p.year)).collect::<Int64Array>()),
        float_column(&planets, |p| p.radius),
        float_column(&planets, |p| p.mass),
        float_column(&planets, |p| p.eq_temp),
        float_column(&planets, |p| p.star_temp),
        float_column(&planets, |p| p.star_mass),
        Arc::new(planets.iter().map(|p| p.facility).collect::<StringArray>()),
    ];

    let batch =
        RecordBatch::try_new(schema.clone(), columns).context("Failed to create RecordBatch")?;

    let file = std::fs::File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("Failed to create writer")?;
    writer.write(&batch).context("Failed to write batch")?;
    writer.close().context("Failed to close writer")?;

    println!(
        "Wrote {} planets around {} hosts to {}",
        planets.len(),
        host_no - 1,
        args.output.display()
    );
    Ok(())
}
