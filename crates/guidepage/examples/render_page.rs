use clap::ArgAction;
use clap::Parser;
use guidepage::LoadState;
use guidepage::PageConfig;
use guidepage::PageController;
use guidepage::logging::init_logging;
use guidepage::shell::default_document;
use std::path::PathBuf;
use std::process::ExitCode;
use url::Url;

/// Loads a markdown guide into the default page shell and prints the result.
#[derive(Parser, Debug)]
#[command(name = "render_page", about)]
struct Args {
    /// Guide locations, tried in order (file paths or http(s) URLs).
    #[arg(required = true)]
    sources: Vec<String>,

    /// JSON page configuration; sources given on the command line replace its list.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Page URL; its fragment is scrolled into view once the guide is in.
    #[arg(long)]
    location: Option<Url>,

    /// Print the table of contents instead of the page.
    #[arg(long)]
    toc: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };
    runtime.block_on(run(args))
}

async fn run(args: Args) -> ExitCode {
    let config = match &args.config {
        Some(path) => match PageConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => PageConfig::default(),
    };
    let mut config = config.with_sources(args.sources);
    if let Some(location) = args.location {
        config = config.with_location(location);
    }

    let doc = match default_document() {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    #[allow(unused_mut)]
    let mut page = PageController::new(doc, config);
    #[cfg(feature = "syntect")]
    if let Some(highlighter) = guidepage::guidepage_syntax::auto::default_highlighter() {
        page = page.with_highlighter(highlighter);
    }

    let failed = matches!(page.start().await, LoadState::Failed);
    page.settle();

    if args.toc {
        for entry in page.toc() {
            let indent = if entry.level >= 3 { "  " } else { "" };
            println!("{indent}- [{}](#{})", entry.text, entry.id);
        }
    } else {
        println!("{}", page.document().to_html());
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
