//! yolomark: step through a directory of images and edit their YOLO labels.
//!
//! Every image has a sibling label file with one box per line
//! (`class center_x center_y width height`, normalized). While an image is
//! open its boxes live in pixel space as [`sample::Sample`]s owned by a
//! [`sample::SampleGrouper`]; edits arrive as [`session::EditEvent`]s and are
//! written back when the image is left.
//!
//! # Modules
//!
//! - [`geom`]: pixel/normalized boxes, image sizes, six-decimal truncation
//! - [`categories`]: the `.names` file
//! - [`sample`]: boxes, edit flags and category grouping
//! - [`label_file`]: label file reading and writing
//! - [`images`]: directory scan for images with label files
//! - [`session`]: navigation with save-then-load and edit events
//! - [`report`]: text/JSON reports for the CLI
//! - [`error`]: error types

pub mod categories;
pub mod error;
pub mod geom;
pub mod images;
pub mod label_file;
pub mod logging;
pub mod report;
pub mod sample;
pub mod session;

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::warn;

pub use error::YolomarkError;

use categories::CategoryNames;
use geom::{Pixel, Rect};
use report::ImageReport;
use session::{EditEvent, Position, SaveOutcome, Session, SessionOptions};

/// The yolomark CLI application.
#[derive(Parser)]
#[command(name = "yolomark")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Log debug messages to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List the images of a directory that have label files.
    List(ListArgs),
    /// Show the boxes of one image grouped by category.
    Show(ShowArgs),
    /// Edit the boxes of one image and save its label file.
    Edit(EditArgs),
    /// Rewrite every label file of a directory in canonical form.
    Normalize(NormalizeArgs),
    /// Count boxes per category across a directory.
    Summary(SummaryArgs),
}

/// Options shared by every command that loads labels.
#[derive(clap::Args)]
struct LabelArgs {
    /// Category names file, one name per line.
    #[arg(long, env = "YOLOMARK_NAMES")]
    names: PathBuf,

    /// Seed for category display colors.
    #[arg(long, env = "YOLOMARK_COLOR_SEED")]
    color_seed: Option<u64>,

    /// Scale images down to at most this height before converting boxes to
    /// pixels.
    #[arg(long)]
    max_display_height: Option<u32>,
}

impl LabelArgs {
    fn session_options(&self, dry_run: bool) -> SessionOptions {
        SessionOptions {
            color_seed: self.color_seed,
            max_display_height: self.max_display_height,
            dry_run,
            ..Default::default()
        }
    }
}

/// Arguments for the list subcommand.
#[derive(clap::Args)]
struct ListArgs {
    /// Image directory.
    dir: PathBuf,

    /// Output format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the show subcommand.
#[derive(clap::Args)]
struct ShowArgs {
    /// Image file; its label file is the same path with a .txt extension.
    image: PathBuf,

    #[command(flatten)]
    labels: LabelArgs,

    /// Hide every box of this category (repeatable).
    #[arg(long = "hide-category", value_name = "CATEGORY")]
    hide_category: Vec<usize>,

    /// Leave hidden boxes out of the output.
    #[arg(long)]
    visible_only: bool,

    /// Output format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the edit subcommand.
#[derive(clap::Args)]
struct EditArgs {
    /// Image file; its label file is the same path with a .txt extension.
    image: PathBuf,

    #[command(flatten)]
    labels: LabelArgs,

    /// Reassign the box on a label line (0-based) to a category.
    #[arg(long = "set", value_name = "LINE=CATEGORY", value_parser = parse_set)]
    set: Vec<(usize, String)>,

    /// Drop a pending reassignment made earlier on the command line.
    #[arg(long = "reset", value_name = "LINE")]
    reset: Vec<usize>,

    /// Delete the box on a label line (0-based).
    #[arg(long = "delete", value_name = "LINE")]
    delete: Vec<usize>,

    /// Add a box in display pixels.
    #[arg(long = "add", value_name = "CATEGORY:LEFT,TOP,RIGHT,BOTTOM", value_parser = parse_add)]
    add: Vec<DrawnBox>,

    /// Print the new label file instead of writing it.
    #[arg(long)]
    dry_run: bool,
}

/// Arguments for the normalize subcommand.
#[derive(clap::Args)]
struct NormalizeArgs {
    /// Image directory.
    dir: PathBuf,

    #[command(flatten)]
    labels: LabelArgs,

    /// Print the label files that would change instead of writing them.
    #[arg(long)]
    dry_run: bool,
}

/// Arguments for the summary subcommand.
#[derive(clap::Args)]
struct SummaryArgs {
    /// Image directory.
    dir: PathBuf,

    #[command(flatten)]
    labels: LabelArgs,

    /// Output format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

#[derive(Clone, Debug)]
struct DrawnBox {
    category: usize,
    corners: Rect<Pixel>,
}

fn parse_set(raw: &str) -> Result<(usize, String), String> {
    let (line, category) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected LINE=CATEGORY, got '{raw}'"))?;
    let line = line
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("invalid line number '{line}'"))?;
    Ok((line, category.to_string()))
}

fn parse_add(raw: &str) -> Result<DrawnBox, String> {
    let (category, corners) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected CATEGORY:LEFT,TOP,RIGHT,BOTTOM, got '{raw}'"))?;
    let category = category
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("invalid category '{category}'"))?;
    let values = corners
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|_| format!("invalid box corners '{corners}'"))?;
    let [left, top, right, bottom] = values[..] else {
        return Err(format!("expected 4 corner values, got {}", values.len()));
    };
    Ok(DrawnBox {
        category,
        corners: Rect::new(left, top, right, bottom),
    })
}

/// Run the yolomark CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), YolomarkError> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    match cli.command {
        Some(Commands::List(args)) => run_list(args),
        Some(Commands::Show(args)) => run_show(args),
        Some(Commands::Edit(args)) => run_edit(args),
        Some(Commands::Normalize(args)) => run_normalize(args),
        Some(Commands::Summary(args)) => run_summary(args),
        None => {
            println!("yolomark {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Edit YOLO bounding-box labels.");
            println!();
            println!("Run 'yolomark --help' for usage information.");
            Ok(())
        }
    }
}

fn check_output_format(output: &str) -> Result<(), YolomarkError> {
    match output {
        "text" | "json" => Ok(()),
        other => Err(YolomarkError::InvalidArgument(format!(
            "unsupported output format '{other}' (supported: text, json)"
        ))),
    }
}

/// Execute the list subcommand.
fn run_list(args: ListArgs) -> Result<(), YolomarkError> {
    check_output_format(&args.output)?;
    let list = images::scan_image_dir(&args.dir)?;

    if args.output == "json" {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    for (index, entry) in list.entries.iter().enumerate() {
        println!(
            "{:>4}  {}  {}",
            index,
            entry.image_path.display(),
            entry.label_path.display()
        );
    }
    println!(
        "{} image(s) with labels, {} skipped",
        list.len(),
        list.skipped.len()
    );
    Ok(())
}

/// Execute the show subcommand.
fn run_show(args: ShowArgs) -> Result<(), YolomarkError> {
    check_output_format(&args.output)?;
    let names = CategoryNames::read(&args.labels.names)?;
    let mut session = Session::for_image(&args.image, names, args.labels.session_options(true))?;
    session.next()?;

    for category in &args.hide_category {
        session.apply(EditEvent::SetGroupVisibility {
            category: *category,
            visible: false,
        })?;
    }

    let image = session.current().ok_or(YolomarkError::NoImageLoaded)?;
    let report = ImageReport::new(image, session.names(), args.visible_only);
    if args.output == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

/// Execute the edit subcommand.
fn run_edit(args: EditArgs) -> Result<(), YolomarkError> {
    let names = CategoryNames::read(&args.labels.names)?;
    let mut session = Session::for_image(
        &args.image,
        names,
        args.labels.session_options(args.dry_run),
    )?;
    session.next()?;

    let mut events = Vec::new();
    for (line, input) in args.set {
        events.push(EditEvent::EditCategory {
            sample: sample_on_line(&session, line)?,
            input,
        });
    }
    for line in args.reset {
        events.push(EditEvent::EditCategory {
            sample: sample_on_line(&session, line)?,
            input: String::new(),
        });
    }
    for line in args.delete {
        events.push(EditEvent::SetSampleDeleted {
            sample: sample_on_line(&session, line)?,
            deleted: true,
        });
    }
    for drawn in args.add {
        events.push(EditEvent::DrawBox {
            category: drawn.category,
            corners: drawn.corners,
        });
    }

    let mut discarded = 0;
    for event in events {
        match session.apply(event) {
            Ok(_) => {}
            Err(err) if err.is_recoverable() => {
                warn!("edit discarded: {err}");
                eprintln!("warning: {err}; edit discarded");
                discarded += 1;
            }
            Err(err) => return Err(err),
        }
    }

    let label_path = session
        .current()
        .map(|image| image.entry.label_path.clone())
        .ok_or(YolomarkError::NoImageLoaded)?;

    match session.save_current()? {
        SaveOutcome::Written { lines } => {
            println!("Saved {} box(es) to {}", lines, label_path.display())
        }
        SaveOutcome::DryRun { content } => print!("{content}"),
        SaveOutcome::Unchanged | SaveOutcome::NothingLoaded => {
            println!("No changes to {}", label_path.display())
        }
    }
    if discarded > 0 {
        println!("{discarded} edit(s) discarded");
    }
    Ok(())
}

fn sample_on_line(session: &Session, line: usize) -> Result<sample::SampleId, YolomarkError> {
    session
        .current()
        .and_then(|image| image.grouper.find_by_line(line))
        .ok_or_else(|| YolomarkError::InvalidArgument(format!("no box on label line {line}")))
}

/// Execute the normalize subcommand.
fn run_normalize(args: NormalizeArgs) -> Result<(), YolomarkError> {
    let mut session = Session::open(
        &args.dir,
        &args.labels.names,
        args.labels.session_options(args.dry_run),
    )?;

    let mut changed = 0;
    let mut total = 0;
    while let Position::Image(_) = session.next()? {
        total += 1;
        let Some(image) = session.current() else {
            break;
        };
        let label_path = image.entry.label_path.clone();
        let rendered = label_file::render_label_file(&image.grouper);
        let existing = fs::read_to_string(&label_path).map_err(YolomarkError::Io)?;
        if rendered == existing {
            continue;
        }

        changed += 1;
        match session.write_current()? {
            SaveOutcome::DryRun { content } => {
                println!("== {}", label_path.display());
                print!("{content}");
            }
            SaveOutcome::Written { .. } => println!("normalized {}", label_path.display()),
            SaveOutcome::Unchanged | SaveOutcome::NothingLoaded => {}
        }
    }

    let verb = if args.dry_run { "would change" } else { "changed" };
    println!("{changed} of {total} label file(s) {verb}");
    Ok(())
}

/// Execute the summary subcommand.
fn run_summary(args: SummaryArgs) -> Result<(), YolomarkError> {
    check_output_format(&args.output)?;
    let mut session = Session::open(&args.dir, &args.labels.names, args.labels.session_options(true))?;
    let report = report::summarize(&mut session)?;

    if args.output == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}
