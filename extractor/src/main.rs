//! Equipdata CLI - extract equipment specifications from the BOQ/BOM workbook
//!
//! ```bash
//! equipdata extract TOOL_BOQ_BOM.xlsm          # Write data/equipment_data.json
//! equipdata extract -o out.json --report run.json
//! equipdata inspect TOOL_BOQ_BOM.xlsm          # Show headers and column mapping
//! equipdata validate data/equipment_data.json  # Check a document against the schema
//! ```

use clap::{Parser, Subcommand};
use equipdata::config::{Overrides, Settings};
use equipdata::transform::layout::{column_letter, parse_column_ref};
use equipdata::{read_sheet, run, sheet_names, validate_equipment_data, ExtractionReport, ResolvedColumns};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "equipdata")]
#[command(about = "Extract inverter and PV specifications into a model-keyed JSON document", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the equipment tables and write the JSON document
    Extract {
        /// Source workbook (default: EQUIPDATA_INPUT)
        input: Option<PathBuf>,

        /// Output file (default: EQUIPDATA_OUTPUT or data/equipment_data.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sheet to read (default: "DATA EQUIP")
        #[arg(short, long)]
        sheet: Option<String>,

        /// PV capacity column, index or letter (default: AM)
        #[arg(long, value_parser = column_arg)]
        pv_capacity_col: Option<usize>,

        /// PV open-circuit voltage column, index or letter (default: AP)
        #[arg(long, value_parser = column_arg)]
        pv_voc_col: Option<usize>,

        /// Also write a run report (counts, skipped PV rows, warnings)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Skip schema validation of the output
        #[arg(long)]
        no_validate: bool,
    },

    /// Show the header row and how each field resolves
    Inspect {
        /// Source workbook
        input: PathBuf,

        /// Sheet to read (default: "DATA EQUIP")
        #[arg(short, long)]
        sheet: Option<String>,
    },

    /// Validate an equipment JSON document
    Validate {
        /// Document to check
        input: PathBuf,
    },
}

fn column_arg(s: &str) -> Result<usize, String> {
    parse_column_ref(s).ok_or_else(|| format!("'{}' is not a column index or letter within A..XFD", s))
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input,
            output,
            sheet,
            pv_capacity_col,
            pv_voc_col,
            report,
            no_validate,
        } => cmd_extract(
            Overrides {
                input,
                output,
                sheet_name: sheet,
                pv_capacity_col,
                pv_voc_col,
            },
            report.as_deref(),
            no_validate,
        ),

        Commands::Inspect { input, sheet } => cmd_inspect(&input, sheet),

        Commands::Validate { input } => cmd_validate(&input),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_extract(
    overrides: Overrides,
    report: Option<&Path>,
    no_validate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?.apply(overrides);
    let input = settings.require_input()?;
    let options = settings.extract_options(no_validate);

    let result = run(input, &settings.output, &options)?;

    eprintln!("\n📊 Inverters: {}", result.data.inverters.len());
    eprintln!("📊 PVs: {}", result.data.photovoltaics.len());
    if !result.skipped.is_empty() {
        eprintln!("⚠️  PV rows skipped: {}", result.skipped.len());
    }

    if let Some(report_path) = report {
        ExtractionReport::new(&result, input, &settings.output).write(report_path)?;
        eprintln!("💾 Report written to: {}", report_path.display());
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_inspect(input: &Path, sheet: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?.apply(Overrides {
        sheet_name: sheet,
        ..Default::default()
    });

    // CSV exports have no sheet list
    if let Ok(names) = sheet_names(input) {
        println!("Sheets: {}", names.join(", "));
    }

    let grid = read_sheet(input, &settings.sheet_name)?;
    println!("Sheet: {} ({} data rows, header on row {})", grid.sheet, grid.rows.len(), grid.header_row);
    println!("\nHeaders:");
    for (i, label) in grid.headers.iter().enumerate() {
        if !label.trim().is_empty() {
            println!("  [{:>3}] {:<4} {}", i, column_letter(i), label);
        }
    }

    println!("\nResolution:");
    let columns = ResolvedColumns::resolve(&grid.headers);
    for (label, column) in columns.entries() {
        match column {
            Some(c) => println!("  {:<24} → {} ({})", label, c.letter(), c.index),
            None => println!("  {:<24} → not found", label),
        }
    }

    let pv = settings.pv_columns;
    for (name, index) in [("PV capacity", pv.capacity), ("PV Voc", pv.voc)] {
        let header = grid.headers.get(index).map(String::as_str).unwrap_or("<beyond last column>");
        println!("  {:<24} → {} ({}) pinned, header '{}'", name, column_letter(index), index, header);
    }

    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let content = fs::read_to_string(input)?;
    let document: Value = serde_json::from_str(&content)?;

    match validate_equipment_data(&document) {
        Ok(()) => {
            let count = |key: &str| document[key].as_object().map(|o| o.len()).unwrap_or(0);
            eprintln!(
                "✅ Valid: {} inverters, {} PVs",
                count("inverters"),
                count("photovoltaics")
            );
            Ok(())
        }
        Err(errors) => {
            for err in errors.iter().take(10) {
                eprintln!("   - {}", err);
            }
            Err(format!("{} schema violations", errors.len()).into())
        }
    }
}
