use chrono::Local;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use wallcast::check::{self, Finding};
use wallcast::loader::{self, DataLoader, DirFetcher, Fetcher, LoadState, Stderr};
use wallcast::page::{Page, PageOptions};
use wallcast::serve::{self, ServeMode};

#[derive(Parser, Debug)]
#[command(name = "wallcast")]
#[command(author, version, about = "Render the through-wall audio leakage case-study page")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the page to a static HTML file
    Render {
        /// Site root (holds assets/ and pkg/)
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Data file, relative to the root (the browser always fetches the
        /// default path, so this only applies to pre-rendering)
        #[arg(long, default_value = loader::DATA_PATH, conflicts_with = "shell")]
        data: String,

        /// Output file ("-" for stdout)
        #[arg(short, long, default_value = "index.html")]
        output: PathBuf,

        /// Emit only the skeleton; the browser loads the data at runtime
        #[arg(long)]
        shell: bool,

        /// Module path of the wasm glue script
        #[arg(long, default_value = "./pkg/wallcast_web.js")]
        script: String,

        /// Don't reference any script (sections won't animate in)
        #[arg(long, conflicts_with = "script")]
        no_script: bool,

        /// Page title
        #[arg(long)]
        title: Option<String>,

        /// Open the rendered page in the browser
        #[arg(long)]
        open: bool,
    },

    /// Start a local preview server
    Serve {
        /// Site root (holds assets/ and pkg/)
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Port to listen on
        #[arg(short, long, default_value_t = serve::DEFAULT_PORT)]
        port: u16,

        /// Render server-side on every request instead of relying on pkg/
        #[arg(long)]
        prerender: bool,

        /// Don't open a browser
        #[arg(long)]
        no_open: bool,
    },

    /// Check that every audio clip exists and decodes
    Check {
        /// Site root (holds assets/ and pkg/)
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Data file, relative to the root
        #[arg(long, default_value = loader::DATA_PATH)]
        data: String,

        /// Emit the report as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Only show problems
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() {
    let args = Args::parse();

    let code = match args.command {
        Command::Render { root, data, output, shell, script, no_script, title, open } => {
            let mut options = PageOptions {
                script_src: if no_script { None } else { Some(script) },
                runtime_load: shell,
                generated: Some(Local::now().to_rfc3339()),
                ..PageOptions::default()
            };
            if let Some(title) = title {
                options.title = title;
            }
            run_render(&root, &data, &output, &options, shell, open)
        }
        Command::Serve { root, port, prerender, no_open } => {
            let mode = if prerender { ServeMode::Prerender } else { ServeMode::Runtime };
            match serve::start(port, root, mode, !no_open) {
                Ok(()) => 0,
                Err(e) => {
                    eprintln!("Server error: {}", e);
                    1
                }
            }
        }
        Command::Check { root, data, json, quiet } => run_check(&root, &data, json, quiet),
    };

    std::process::exit(code);
}

/// Fetcher that serves the configured data path in place of the default one.
struct DataOverride {
    inner: DirFetcher,
    data: String,
}

impl Fetcher for DataOverride {
    fn fetch(&self, path: &str) -> loader::Result<String> {
        if path == loader::DATA_PATH {
            self.inner.fetch(&self.data)
        } else {
            self.inner.fetch(path)
        }
    }
}

fn run_render(
    root: &Path,
    data: &str,
    output: &Path,
    options: &PageOptions,
    shell: bool,
    open_after: bool,
) -> i32 {
    let mut page = Page::new(options);

    if !shell {
        let fetcher = DataOverride { inner: DirFetcher::new(root), data: data.to_string() };
        let state = loader::load(&mut DataLoader::new(), &fetcher, &mut page, &mut Stderr);
        if state != LoadState::Rendered {
            return 1;
        }
    }

    let html = page.to_html();

    if output.as_os_str() == "-" {
        let mut stdout = io::stdout();
        if let Err(e) = stdout.write_all(html.as_bytes()).and_then(|_| stdout.flush()) {
            eprintln!("Failed to write page: {}", e);
            return 1;
        }
        return 0;
    }

    if let Err(e) = std::fs::write(output, &html) {
        eprintln!("Failed to write page: {}", e);
        return 1;
    }
    eprintln!("\x1b[32mPage saved: {}\x1b[0m", output.display());

    if open_after {
        if let Err(e) = open::that(output) {
            eprintln!("Failed to open page: {}", e);
        }
    }
    0
}

fn run_check(root: &Path, data: &str, json: bool, quiet: bool) -> i32 {
    let pb = if !quiet && !json {
        let pb = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}") {
            pb.set_style(style.progress_chars("=>-"));
        }
        Some(pb)
    } else {
        None
    };

    let report = match check::check_site(root, data, pb.as_ref()) {
        Ok(r) => r,
        Err(e) => {
            if let Some(pb) = pb {
                pb.finish_and_clear();
            }
            eprintln!("{}", e);
            return 2;
        }
    };

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                return 2;
            }
        }
        return if report.is_clean() { 0 } else { 1 };
    }

    if !quiet {
        eprintln!("\x1b[1mwallcast - asset check\x1b[0m");
        eprintln!("{}", "─".repeat(70));
    }

    for finding in &report.findings {
        let color = match finding {
            Finding::UnknownContext { .. } => "\x1b[33m", // Yellow
            _ => "\x1b[31m",                              // Red
        };
        println!("{}✗\x1b[0m {}", color, finding);
    }
    for orphan in &report.orphans {
        println!("\x1b[90m? unreferenced {}\x1b[0m", orphan.display());
    }

    if !quiet {
        eprintln!("\n{}", "─".repeat(70));
        eprintln!("  Clips checked:  {}", report.refs_checked);
        if report.remote_skipped > 0 {
            eprintln!("  Remote skipped: {}", report.remote_skipped);
        }
        eprintln!("  Problems:       {}", report.findings.len());
        eprintln!("  Orphans:        {}", report.orphans.len());
    }

    if report.is_clean() {
        if !quiet {
            eprintln!("\n\x1b[32m✓ All clips present and decodable.\x1b[0m");
        }
        0
    } else {
        1
    }
}
