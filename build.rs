// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: formula file
fn formula_file_arg() -> Arg {
    Arg::new("file")
        .required(true)
        .value_name("FILE")
        .help("Formula file (.rb or .toml)")
}

fn build_cli() -> Command {
    Command::new("sedot")
        .version(concat!("v", env!("CARGO_PKG_VERSION")))
        .author("Sedot Contributors")
        .about("Download videos from Instagram posts/reels and Threads")
        .args_conflicts_with_subcommands(true)
        .arg(
            Arg::new("urls")
                .value_name("URL")
                .num_args(1..)
                .help("Instagram or Threads post URLs"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Directory to save videos into [default: downloads]"),
        )
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .action(ArgAction::SetTrue)
                .help("Replace files that already exist"),
        )
        .arg(
            Arg::new("dry_run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Fetch metadata only, do not download"),
        )
        .arg(
            Arg::new("show_metadata")
                .long("show-metadata")
                .action(ArgAction::SetTrue)
                .help("Print the metadata table before downloading"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging on stderr"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Suppress progress bars and informational output"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Configuration file (default: $SEDOT_CONFIG, then the user config dir)"),
        )
        .subcommand(
            Command::new("formula")
                .about("Lint, verify and render package formulas")
                .subcommand_required(true)
                .subcommand(
                    Command::new("lint")
                        .about("Validate formula files without touching the network")
                        .arg(Arg::new("files").required(true).num_args(1..).help("Formula files")),
                )
                .subcommand(
                    Command::new("verify")
                        .about("Download the source archive and check its digest")
                        .arg(formula_file_arg())
                        .arg(
                            Arg::new("cache")
                                .long("cache")
                                .default_value("formula-cache")
                                .help("Directory for downloaded archives"),
                        ),
                )
                .subcommand(
                    Command::new("digest")
                        .about("Print the SHA-256 of a local archive or URL")
                        .arg(Arg::new("source").required(true).help("Path or http(s) URL")),
                )
                .subcommand(
                    Command::new("render")
                        .about("Render a formula as Homebrew Ruby, optionally bumped to a new release")
                        .arg(formula_file_arg())
                        .arg(Arg::new("version").long("version").help("New release version"))
                        .arg(Arg::new("sha256").long("sha256").help("SHA-256 of the new release archive"))
                        .arg(
                            Arg::new("toml")
                                .long("toml")
                                .action(ArgAction::SetTrue)
                                .help("Emit TOML instead of Ruby"),
                        ),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell", "elvish"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("sedot.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
