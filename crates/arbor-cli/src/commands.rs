use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use tracing::debug;

use arbor_engine::{
    ChangeKind, ChangeRecord, Engine, EngineConfig, HierarchicalIndex, Node, Session, Tree,
};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let engine = Engine::new(load_config(cli.config.as_deref())?)?;
    let report = match cli.command {
        Command::Show(args) => cmd_show(&engine, cli.format, args)?,
        Command::Drop(args) => cmd_drop(&engine, cli.format, args)?,
        Command::Toggle(args) => cmd_toggle(&engine, cli.format, args)?,
        Command::Classify(args) => cmd_classify(&engine, cli.format, args)?,
        Command::Diff(args) => cmd_diff(&engine, cli.format, args)?,
    };
    println!("{report}");
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: EngineConfig = toml::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("validating config {}", path.display()))?;
    debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

fn load_tree(path: &Path) -> anyhow::Result<Tree> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading tree {}", path.display()))?;
    let tree = Tree::from_json(&text).with_context(|| format!("parsing tree {}", path.display()))?;
    debug!(path = %path.display(), nodes = tree.node_count(), "loaded tree");
    Ok(tree)
}

fn save_tree(tree: &Tree, path: &Path) -> anyhow::Result<()> {
    fs::write(path, tree.to_json_pretty()?)
        .with_context(|| format!("writing tree {}", path.display()))
}

fn cmd_show(engine: &Engine, format: OutputFormat, args: ShowArgs) -> anyhow::Result<String> {
    let tree = load_tree(&args.tree)?;
    match format {
        OutputFormat::Json => Ok(tree.to_json_pretty()?),
        OutputFormat::Text => {
            if tree.is_empty() {
                return Ok("(empty tree)".into());
            }
            let mut lines = Vec::new();
            for (offset, root) in tree.roots().iter().enumerate() {
                outline(engine, root, HierarchicalIndex::root(offset), &mut lines);
            }
            Ok(lines.join("\n"))
        }
    }
}

fn outline(engine: &Engine, node: &Node, index: HierarchicalIndex, lines: &mut Vec<String>) {
    let indent = "  ".repeat(index.depth() - 1);
    let address = engine.format_index(&index).cyan();
    match node.children() {
        Some(children) => {
            let state = if node.is_expanded() { "" } else { " (collapsed)" };
            lines.push(format!(
                "{indent}{address} {}/ #{}{}",
                node.label().bold(),
                node.id(),
                state.dimmed()
            ));
            for (offset, child) in children.iter().enumerate() {
                outline(engine, child, index.child(offset), lines);
            }
        }
        None => lines.push(format!("{indent}{address} {} #{}", node.label(), node.id())),
    }
}

fn cmd_drop(engine: &Engine, format: OutputFormat, args: DropArgs) -> anyhow::Result<String> {
    let tree = load_tree(&args.tree)?;
    let mut session = Session::new(engine.clone(), tree)?;
    let changes = session
        .drop_item(&args.drag, args.operation, &args.target)
        .with_context(|| {
            format!(
                "dropping {} {} {}",
                args.drag, args.operation, args.target
            )
        })?;

    if let Some(output) = &args.output {
        save_tree(session.tree(), output)?;
    }

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&changes)?),
        OutputFormat::Text => {
            let mut report = format!(
                "{} Moved {} {} {}",
                "✓".green().bold(),
                args.drag.yellow(),
                args.operation,
                args.target.yellow()
            );
            report.push_str(&render_changes(&changes));
            if let Some(output) = &args.output {
                report.push_str(&format!("\nWrote {}", output.display()));
            }
            Ok(report)
        }
    }
}

fn cmd_toggle(engine: &Engine, format: OutputFormat, args: ToggleArgs) -> anyhow::Result<String> {
    let tree = load_tree(&args.tree)?;
    let mut session = Session::new(engine.clone(), tree)?;
    session
        .toggle_expanded(&args.index)
        .with_context(|| format!("toggling {}", args.index))?;

    match &args.output {
        Some(output) => {
            save_tree(session.tree(), output)?;
            match format {
                OutputFormat::Json => Ok(json!({ "toggled": args.index }).to_string()),
                OutputFormat::Text => Ok(format!(
                    "{} Toggled {}, wrote {}",
                    "✓".green().bold(),
                    args.index.yellow(),
                    output.display()
                )),
            }
        }
        None => Ok(session.tree().to_json_pretty()?),
    }
}

fn cmd_classify(
    engine: &Engine,
    format: OutputFormat,
    args: ClassifyArgs,
) -> anyhow::Result<String> {
    let tree = load_tree(&args.tree)?;
    let affordance = engine.classify_affordance(&tree, &args.drag, &args.target, args.operation)?;
    match format {
        OutputFormat::Json => Ok(json!({
            "affordance": affordance.to_string(),
            "class": affordance.css_class(),
            "permitted": affordance.is_permitted(),
        })
        .to_string()),
        OutputFormat::Text => {
            let label = if affordance.is_permitted() {
                affordance.to_string().green()
            } else {
                affordance.to_string().red()
            };
            Ok(format!("{label} ({})", affordance.css_class()))
        }
    }
}

fn cmd_diff(engine: &Engine, format: OutputFormat, args: DiffArgs) -> anyhow::Result<String> {
    let before = load_tree(&args.before)?;
    let after = load_tree(&args.after)?;
    let diff = engine.diff(&before, &after)?;
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&diff.changes)?),
        OutputFormat::Text => {
            if diff.is_empty() {
                return Ok("No changes.".into());
            }
            let mut report = format!(
                "{} added, {} removed, {} reparented, {} reordered",
                diff.additions(),
                diff.removals(),
                diff.reparents(),
                diff.reorders()
            );
            report.push_str(&render_changes(&diff.changes));
            Ok(report)
        }
    }
}

fn render_changes(changes: &[ChangeRecord]) -> String {
    if changes.is_empty() {
        return format!("\n  {}", "no changes".dimmed());
    }
    changes
        .iter()
        .map(|record| {
            let line = record.to_string();
            let line = match record.change {
                ChangeKind::Added => line.green(),
                ChangeKind::Removed => line.red(),
                ChangeKind::Reparented => line.yellow(),
                ChangeKind::DisplayOrderChanged => line.normal(),
            };
            format!("\n  {line}")
        })
        .collect()
}
