use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use webtrees_report::{
    FilesystemMediaStore, HtmlReport, Orientation, PageFormat, PdfReport, Report, ReportConfig,
    ReportDocument, StaticLocale, TextDirection,
};

mod sample;

/// Renders the sample births report.
///
/// PDF output needs the fonts described in `assets/fonts/README.md`, either
/// under `assets/fonts` or in the directory named by `REPORT_FONTS_DIR`.
#[derive(Parser)]
#[command(author, version, about = "Render the sample report as PDF or HTML")]
struct Cli {
    /// Output format.
    #[arg(value_enum)]
    target: Target,

    /// Page format name, e.g. A4, LETTER or LEGAL.
    #[arg(long, default_value = "A4")]
    format: String,

    /// Page orientation.
    #[arg(long, value_enum, default_value_t = OrientationArg::Portrait)]
    orientation: OrientationArg,

    /// Lay the report out right to left.
    #[arg(long)]
    rtl: bool,

    /// Output file. Defaults to `report.pdf` or `report.html`.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Directory media object files are resolved against.
    #[arg(long)]
    media_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Pdf,
    Html,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Orientation::Portrait,
            OrientationArg::Landscape => Orientation::Landscape,
        }
    }
}

impl Target {
    fn default_output(self) -> PathBuf {
        match self {
            Target::Pdf => PathBuf::from("report.pdf"),
            Target::Html => PathBuf::from("report.html"),
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = ReportConfig::new()
        .with_page_format(PageFormat::from_name(&cli.format))
        .with_orientation(cli.orientation.into());
    let document = ReportDocument::new(config);
    let locale = StaticLocale::new().with_direction(if cli.rtl {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    });

    let media_root = cli.media_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let mut report: Box<dyn Report> = match cli.target {
        Target::Pdf => Box::new(
            PdfReport::new(document).with_media_store(FilesystemMediaStore::new(&media_root)),
        ),
        Target::Html => Box::new(
            HtmlReport::new(document).with_media_store(FilesystemMediaStore::new(&media_root)),
        ),
    };

    sample::build(report.as_mut(), &locale)?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.target.default_output());
    let mut writer = BufWriter::new(File::create(&output)?);
    report.run(&mut writer)?;
    log::info!("wrote {}", output.display());
    println!("{}", output.display());
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
