use passforge_generate::output::table::render_table;
use passforge_generate::{GenerationDriver, GenerationProfile};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let profile = GenerationProfile {
        length_min: 12,
        length_max: 16,
        seed: Some(42),
        ..GenerationProfile::default()
    };
    let outcome = GenerationDriver::from_profile(&profile).run(&profile)?;

    println!("{}", render_table(&outcome.rows));
    for failure in &outcome.failures {
        eprintln!("{}: {}", failure.values.canonical_key(), failure.error);
    }
    Ok(())
}
