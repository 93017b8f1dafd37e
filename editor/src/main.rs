//! Decision set rule editor.
//!
//! Edits the document stored under `.rule-editor/` by replaying command
//! batches through the same reducer the interactive editor uses, and checks
//! documents against the schema, the structural invariants and the catalogs.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use rule_editor::core::catalog::value_options;
use rule_editor::core::document::DecisionSet;
use rule_editor::core::references::dangling_references;
use rule_editor::core::types::Outcome;
use rule_editor::exit_codes;
use rule_editor::io::catalog_store::load_catalog;
use rule_editor::io::commands::read_commands;
use rule_editor::io::config::{EditorConfig, load_config};
use rule_editor::io::document_store::{
    load_document, read_raw, render_document, validate_document, write_document,
};
use rule_editor::io::init::{EditorPaths, InitOptions, init_editor};
use rule_editor::logging;
use rule_editor::session::{EditorSession, Hooks};

#[derive(Parser)]
#[command(
    name = "rule-editor",
    version,
    about = "Edit and check decision set rule documents"
)]
struct Cli {
    /// Project root containing `.rule-editor/`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.rule-editor/` with config, schema, document and catalog.
    Init {
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
        /// Start from a loop rule.
        #[arg(long = "loop")]
        loop_rule: bool,
    },
    /// Normalize a raw document and print (or write) the result.
    Normalize {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check the stored document against the schema and invariants.
    Validate,
    /// Replay a command batch (JSON array or JSON Lines) on the stored document.
    Apply {
        commands: PathBuf,
        /// Print the resulting document instead of writing it.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the value picker options derived from the catalog.
    Options,
    /// List references missing from the catalog.
    Refs,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let paths = EditorPaths::new(&cli.root);
    match cli.command {
        Command::Init { force, loop_rule } => cmd_init(&cli.root, force, loop_rule),
        Command::Normalize { input, output } => {
            let cfg = load_config(&paths.config_path)?;
            cmd_normalize(&cfg, &input, output.as_deref())
        }
        Command::Validate => {
            let cfg = load_config(&paths.config_path)?;
            cmd_validate(&paths, &cfg)
        }
        Command::Apply { commands, dry_run } => {
            let cfg = load_config(&paths.config_path)?;
            cmd_apply(&paths, &cfg, &commands, dry_run)
        }
        Command::Options => {
            let cfg = load_config(&paths.config_path)?;
            let catalog = load_catalog(&paths.catalog_path(&cfg))?;
            print_json(&value_options(&catalog), cfg.pretty)?;
            Ok(exit_codes::OK)
        }
        Command::Refs => {
            let cfg = load_config(&paths.config_path)?;
            cmd_refs(&paths, &cfg)
        }
    }
}

fn cmd_init(root: &Path, force: bool, loop_rule: bool) -> Result<i32> {
    let paths = init_editor(root, &InitOptions { force, loop_rule })?;
    info!(dir = %paths.editor_dir.display(), "initialized editor");
    Ok(exit_codes::OK)
}

fn cmd_normalize(cfg: &EditorConfig, input: &Path, output: Option<&Path>) -> Result<i32> {
    let normalized = load_document(input)?;
    for repair in &normalized.repairs {
        eprintln!("repaired: {}", repair);
    }
    match output {
        Some(path) => write_document(path, &normalized.document, cfg.pretty)?,
        None => print!("{}", render_document(&normalized.document, cfg.pretty)?),
    }
    Ok(exit_codes::OK)
}

fn cmd_validate(paths: &EditorPaths, cfg: &EditorConfig) -> Result<i32> {
    let document_path = paths.document_path(cfg);
    validate_document(&paths.schema_path, &document_path)?;
    println!("ok");
    Ok(exit_codes::OK)
}

#[derive(Debug, Serialize)]
struct ApplySummary {
    commands: usize,
    changed: usize,
    rejections: Vec<Rejection>,
}

#[derive(Debug, Serialize)]
struct Rejection {
    /// 1-based position in the batch.
    index: usize,
    error: String,
}

fn cmd_apply(
    paths: &EditorPaths,
    cfg: &EditorConfig,
    commands_path: &Path,
    dry_run: bool,
) -> Result<i32> {
    let document_path = paths.document_path(cfg);
    let raw = read_raw(&document_path)?;
    let commands = read_commands(commands_path)?;

    let submitted: Rc<RefCell<Option<DecisionSet>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&submitted);
    let hooks = Hooks::default().with_submit(move |doc| *sink.borrow_mut() = Some(doc.clone()));
    let mut session = EditorSession::open(&raw, Box::new(hooks));

    let mut summary = ApplySummary {
        commands: commands.len(),
        changed: 0,
        rejections: Vec::new(),
    };
    for (index, command) in commands.iter().enumerate() {
        let result = session.dispatch_value(command);
        if let Some(err) = result.rejection {
            summary.rejections.push(Rejection {
                index: index + 1,
                error: err.to_string(),
            });
        } else if result.outcome == Outcome::Changed {
            summary.changed += 1;
        }
    }
    session.submit();

    let document = submitted
        .borrow_mut()
        .take()
        .context("submit produced no document")?;
    if dry_run {
        print!("{}", render_document(&document, cfg.pretty)?);
    } else {
        write_document(&document_path, &document, cfg.pretty)?;
        print_json(&summary, cfg.pretty)?;
    }

    if cfg.strict && !summary.rejections.is_empty() {
        return Ok(exit_codes::REJECTED);
    }
    Ok(exit_codes::OK)
}

fn cmd_refs(paths: &EditorPaths, cfg: &EditorConfig) -> Result<i32> {
    let normalized = load_document(&paths.document_path(cfg))?;
    let catalog = load_catalog(&paths.catalog_path(cfg))?;
    let dangling = dangling_references(&normalized.document, &catalog);
    print_json(&json!({ "dangling": dangling }), cfg.pretty)?;
    if dangling.is_empty() {
        Ok(exit_codes::OK)
    } else {
        Ok(exit_codes::DANGLING)
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let payload = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("serialize json")?;
    println!("{}", payload);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init_loop() {
        let cli = Cli::parse_from(["rule-editor", "init", "--loop"]);
        assert!(matches!(
            cli.command,
            Command::Init {
                force: false,
                loop_rule: true
            }
        ));
    }

    #[test]
    fn parse_apply_dry_run_with_root() {
        let cli = Cli::parse_from([
            "rule-editor",
            "apply",
            "cmds.jsonl",
            "--dry-run",
            "--root",
            "/tmp/x",
        ]);
        assert_eq!(cli.root, PathBuf::from("/tmp/x"));
        let Command::Apply { commands, dry_run } = cli.command else {
            panic!("expected apply");
        };
        assert_eq!(commands, PathBuf::from("cmds.jsonl"));
        assert!(dry_run);
    }

    #[test]
    fn parse_normalize_output() {
        let cli = Cli::parse_from(["rule-editor", "normalize", "in.json", "-o", "out.json"]);
        assert!(matches!(
            cli.command,
            Command::Normalize { output: Some(_), .. }
        ));
    }
}
