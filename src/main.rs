//! jyedit - command-line harness
//!
//! Drives the document engine from the shell: show the tree projection of a
//! file, reformat it, or apply a single tree label edit.

use clap::{Parser, Subcommand};
use jyedit::config::{load_config, save_config_silent};
use jyedit::document::Document;
use jyedit::error::Result;
use jyedit::i18n::Translations;
use jyedit::state::Session;
use jyedit::structured::Address;
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Application name constant.
const APP_NAME: &str = "jyedit";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// UI language tag for labels ("en", "jp"); defaults to the saved setting
    #[arg(short, long)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tree projection of a file
    Tree {
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Reformat a file as pretty-printed JSON
    FormatJson {
        #[arg(required = true)]
        file: PathBuf,
        /// Write the result back to the file instead of printing it
        #[arg(short, long)]
        write: bool,
    },
    /// Reformat a file as block-style YAML
    FormatYaml {
        #[arg(required = true)]
        file: PathBuf,
        /// Write the result back to the file instead of printing it
        #[arg(short, long)]
        write: bool,
    },
    /// Apply one tree label edit ("key: value" or a new key name)
    Edit {
        #[arg(required = true)]
        file: PathBuf,
        /// Node address, e.g. /servers/0/name
        #[arg(required = true)]
        pointer: String,
        /// New label text
        #[arg(required = true)]
        label: String,
        /// Treat the node as a sequence element (renames are disabled)
        #[arg(long)]
        sequence_element: bool,
        /// Write the result back to the file instead of printing it
        #[arg(short, long)]
        write: bool,
    },
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    info!("Starting {}", APP_NAME);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", APP_NAME, e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_config();
    let translations = Translations::from_tag(cli.lang.as_deref().unwrap_or(&settings.language));
    let mut session = Session::new(settings);

    match cli.command {
        Commands::Tree { file } => {
            let doc = open(&mut session, &file)?;
            print_tree(doc, &translations);
        }
        Commands::FormatJson { file, write } => {
            let doc = open(&mut session, &file)?;
            doc.reformat_as_json()?;
            finish(&mut session, write)?;
        }
        Commands::FormatYaml { file, write } => {
            let doc = open(&mut session, &file)?;
            doc.reformat_as_yaml()?;
            finish(&mut session, write)?;
        }
        Commands::Edit {
            file,
            pointer,
            label,
            sequence_element,
            write,
        } => {
            let doc = open(&mut session, &file)?;
            let address = Address::decode(&pointer);
            doc.commit_node_edit(&address, sequence_element, &label);
            finish(&mut session, write)?;
        }
    }
    Ok(())
}

fn open<'a>(session: &'a mut Session, file: &Path) -> Result<&'a mut Document> {
    session.open_file(file)?;
    session
        .active_mut()
        .ok_or_else(|| jyedit::error::Error::Application("No active document".to_string()))
}

fn print_tree(doc: &Document, translations: &Translations) {
    println!(
        "{} [{}]",
        doc.title_with(&translations.get("Untitled")),
        doc.format().display_name()
    );
    for node in doc.nodes() {
        println!("{}{}    {}", "  ".repeat(node.depth), node.label, node.address);
    }
}

/// Print the active document, or save it when `write` is set.
fn finish(session: &mut Session, write: bool) -> Result<()> {
    if write {
        session.save_active()?;
        save_config_silent(session.settings());
    } else if let Some(doc) = session.active() {
        print!("{}", doc.text_for_save());
        if !doc.text().ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
