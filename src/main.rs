// enroll-pdf: Render insurance enrollment forms and calibrate their field layouts

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use enroll_pdf::editor::{CalibrationSession, Section};
use enroll_pdf::error::{AppError, Result};
use enroll_pdf::form_type::FormType;
use enroll_pdf::images::load_image_source;
use enroll_pdf::record::{format_date_display, load_records};
use enroll_pdf::render::{render_to_page, DirectorySink, PageSink, FORM_PAGE};
use enroll_pdf::script::{parse_script, run_script};
use enroll_pdf::store::{FileStore, LayoutStore};
use enroll_pdf::summary::{Summary, SummaryRequest};

// ============================================================================
// Data Structures
// ============================================================================

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Render insurance enrollment forms onto calibrated templates")]
struct Args {
    /// Directory holding calibrated layouts and imported templates
    #[arg(long, env = "ENROLL_PDF_STORE", default_value = ".enroll-pdf", global = true)]
    store: PathBuf,

    /// Date (YYYY-MM-DD format, defaults to today)
    #[arg(short, long, global = true)]
    date: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render application records (one record or a JSON array) as PDFs
    Render {
        /// Application record file
        #[arg(short, long)]
        record: String,

        /// Form to render (defaults to each record's InsuranceLine)
        #[arg(short, long)]
        form_type: Option<FormType>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Landscape summary of many applications
    Summary {
        /// JSON array of application records
        #[arg(long)]
        records: String,

        /// Agent named in the footer
        #[arg(short, long)]
        agent: String,

        /// CIC number shown in the heading (defaults to NA)
        #[arg(long)]
        cic: Option<String>,

        /// Commodity to keep, or ALL
        #[arg(long, default_value = "ALL")]
        crop: String,

        /// First planting date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Last planting date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Inspect or manage a form's calibrated layout
    Layout {
        #[command(subcommand)]
        action: LayoutAction,
    },

    /// Replay a calibration script against a form's layout
    Calibrate {
        #[arg(short, long)]
        form_type: FormType,

        /// Script file, one editor command per line
        #[arg(short, long)]
        script: PathBuf,
    },

    /// Manage background templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },
}

#[derive(Subcommand, Debug)]
enum LayoutAction {
    /// List field positions in page millimetres
    Show {
        #[arg(short, long)]
        form_type: FormType,

        /// all, profile or form
        #[arg(long, default_value = "all", value_parser = parse_section)]
        section: Section,
    },
    /// Write the layout as JSON (to stdout without FILE)
    Export {
        #[arg(short, long)]
        form_type: FormType,
        file: Option<PathBuf>,
    },
    /// Apply positions from an exported layout and save them
    Import {
        #[arg(short, long)]
        form_type: FormType,
        file: PathBuf,
    },
    /// Drop the saved layout and go back to the defaults
    Reset {
        #[arg(short, long)]
        form_type: FormType,
    },
}

#[derive(Subcommand, Debug)]
enum TemplateAction {
    /// Import a scanned form (file path or URL)
    Import {
        #[arg(short, long)]
        form_type: FormType,
        source: String,
    },
    /// Show which forms have an imported template
    Status,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let today = parse_date(&args.date)?;
    let mut store = LayoutStore::new(FileStore::open(&args.store)?);

    match args.command {
        Command::Render {
            record,
            form_type,
            output,
        } => {
            let records = load_records(&record)?;
            let mut sink = DirectorySink::new(&output);
            for record in &records {
                let form_type = match form_type {
                    Some(t) => t,
                    None => record.insurance_line()?,
                };
                let page = render_to_page(record, form_type, &mut store, today)?;
                let path = sink.save(&page.file_name, &page.bytes)?;
                println!("✓ Generated: {}", path.display());
            }
            println!("  Forms: {}", records.len());
            println!("  Date: {}", format_date_display(&today));
        }

        Command::Summary {
            records,
            agent,
            cic,
            crop,
            from,
            to,
            output,
        } => {
            let records = load_records(&records)?;
            let request = SummaryRequest {
                agent,
                cic,
                crop: SummaryRequest::crop_filter(&crop),
                from: parse_optional_date(&from)?,
                to: parse_optional_date(&to)?,
            };
            let summary = Summary::build(&records, &request, today)?;
            let bytes = summary.render()?;
            let path = DirectorySink::new(&output).save(&summary.file_name(), &bytes)?;

            println!("✓ Generated: {}", path.display());
            println!("  {}", summary.totals_line());
        }

        Command::Layout { action } => run_layout(action, &mut store)?,

        Command::Calibrate { form_type, script } => {
            let text = std::fs::read_to_string(&script)
                .map_err(|e| AppError::ScriptError(format!("{}: {}", script.display(), e)))?;
            let commands = parse_script(&text)?;
            let base_dir = script.parent().unwrap_or_else(|| Path::new("."));

            let mut session = CalibrationSession::open(&store, form_type);
            run_script(&mut session, &mut store, &commands, base_dir)?;

            println!("✓ Replayed {} command(s)", commands.len());
            println!("  Form: {}", session.form_type());
            if session.is_dirty() {
                println!("  Unsaved edits were discarded (end the script with 'save' to keep them)");
            }
        }

        Command::Template { action } => match action {
            TemplateAction::Import { form_type, source } => {
                let bytes = load_image_source(&source)?;
                CalibrationSession::open(&store, form_type).import_template(&mut store, &bytes)?;
                println!("✓ Template imported for {}", form_type);
            }
            TemplateAction::Status => {
                for (form_type, present) in store.template_status() {
                    let state = if present { "imported" } else { "none (bundled blank page)" };
                    println!("{:<10} {}", form_type.to_string(), state);
                }
            }
        },
    }

    Ok(())
}

fn run_layout(action: LayoutAction, store: &mut LayoutStore<FileStore>) -> Result<()> {
    match action {
        LayoutAction::Show { form_type, section } => {
            let session = CalibrationSession::open(store, form_type);
            for marker in session.markers(section, FORM_PAGE) {
                println!(
                    "{:<28} {:>7.2} {:>7.2}  {}",
                    marker.key, marker.x, marker.y, marker.label
                );
            }
        }
        LayoutAction::Export { form_type, file } => {
            let json = CalibrationSession::open(store, form_type).export_layout()?;
            match file {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("✓ Exported: {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        LayoutAction::Import { form_type, file } => {
            let json = std::fs::read_to_string(&file)
                .map_err(|e| AppError::ImportError(format!("{}: {}", file.display(), e)))?;
            let mut session = CalibrationSession::open(store, form_type);
            let applied = session.import_layout(store, &json)?;
            println!("✓ Imported {} field position(s) for {}", applied, form_type);
        }
        LayoutAction::Reset { form_type } => {
            CalibrationSession::open(store, form_type).reset_to_default(store)?;
            println!("✓ {} layout reset to defaults", form_type);
        }
    }
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_date(date_str: &Option<String>) -> Result<NaiveDate> {
    match date_str {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| AppError::DateError(s.clone())),
        None => Ok(Local::now().date_naive()),
    }
}

fn parse_optional_date(date_str: &Option<String>) -> Result<Option<NaiveDate>> {
    match date_str {
        Some(_) => parse_date(date_str).map(Some),
        None => Ok(None),
    }
}

fn parse_section(value: &str) -> std::result::Result<Section, String> {
    match value.to_ascii_lowercase().as_str() {
        "all" => Ok(Section::All),
        "profile" => Ok(Section::Profile),
        "form" => Ok(Section::Form),
        other => Err(format!("expected all, profile or form, found '{}'", other)),
    }
}
