use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::Path;

use inductive_mapper::{EnrichedFact, MapperPipeline};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: inductive-mapper <facts.json> [out_dir]");
        std::process::exit(1);
    }

    let facts_path = Path::new(&args[1]);
    let out_dir = Path::new(args.get(2).map(String::as_str).unwrap_or("out"));

    run_filing(facts_path, out_dir)
}

fn run_filing(facts_path: &Path, out_dir: &Path) -> Result<()> {
    println!("📋 Inductive Mapper - fact classification pipeline");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load enriched facts
    println!("\n📂 Loading facts...");
    let raw = fs::read_to_string(facts_path)
        .with_context(|| format!("Failed to read facts file: {:?}", facts_path))?;
    let facts: Vec<EnrichedFact> =
        serde_json::from_str(&raw).context("Failed to parse enriched facts JSON")?;
    println!("✓ Loaded {} facts", facts.len());

    // 2. Run the pipeline
    println!("\n🔁 Processing filing...");
    let pipeline = MapperPipeline::new();
    let report = pipeline
        .process_filing(&facts)
        .context("Filing processing failed")?;
    if report.dropped_facts > 0 {
        println!("⚠ Dropped {} malformed facts", report.dropped_facts);
    }

    // 3. Write statement artifacts
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", out_dir))?;

    println!("\n💾 Writing artifacts...");
    for (statement_type, statement) in &report.statements {
        let path = out_dir.join(format!("statement_{}.json", statement_type.as_str()));
        fs::write(&path, serde_json::to_string_pretty(statement)?)
            .with_context(|| format!("Failed to write {:?}", path))?;
        println!("✓ {}", statement.summary());
    }

    // 4. Write null-quality report
    let report_path = out_dir.join("null_quality_report.json");
    fs::write(
        &report_path,
        serde_json::to_string_pretty(&report.null_quality)?,
    )
    .with_context(|| format!("Failed to write {:?}", report_path))?;

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ {}", report.null_quality.summary_line());
    for timing in &report.phase_timings {
        println!("   {} took {}ms", timing.phase, timing.elapsed_ms);
    }

    Ok(())
}
