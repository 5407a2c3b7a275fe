//! `qarec` - CLI for qarecords
//!
//! This binary provides the command-line interface for entering, editing,
//! searching, importing and exporting question/answer records.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{BufRead, Write};

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use tracing::debug;

use qarecords::cli::{
    AddCommand, Cli, Command, ConfigCommand, EditCommand, ExportCommand, OutputFormat,
    SearchCommand,
};
use qarecords::{
    csv, init_logging, Config, EntryOutcome, Error, FileStore, Record, RecordStore,
    ViewController,
};

type Controller = ViewController<FileStore>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    let view = cli.command.view();
    match cli.command {
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        command => {
            let mut controller = open_controller(&config);
            if let Some(view) = view {
                controller.set_view(view);
            }
            handle_records(&config, &mut controller, command)
        }
    }
}

fn open_controller(config: &Config) -> Controller {
    let store = RecordStore::with_key(
        FileStore::open(config.data_dir()),
        config.storage.key.clone(),
    );
    ViewController::open(store).with_duplicate_check(config.entry.confirm_duplicates)
}

fn handle_records(
    config: &Config,
    controller: &mut Controller,
    command: Command,
) -> anyhow::Result<()> {
    match command {
        Command::Add(cmd) => handle_add(controller, &cmd),
        Command::Edit(cmd) => handle_edit(controller, cmd),
        Command::Delete(cmd) => {
            controller.remove(&cmd.id)?;
            println!("Record deleted.");
            Ok(())
        }
        Command::Import(cmd) => {
            let text = std::fs::read_to_string(&cmd.file)
                .with_context(|| format!("failed to read {}", cmd.file.display()))?;
            match controller.import_csv(&text)? {
                Some(summary) => println!("{summary}"),
                None => println!("Nothing to import."),
            }
            Ok(())
        }
        Command::Search(cmd) => handle_search(controller, &cmd),
        Command::Export(cmd) => handle_export(config, controller, &cmd),
        Command::Status(_) | Command::Config(_) => Ok(()),
    }
}

fn handle_add(controller: &mut Controller, cmd: &AddCommand) -> anyhow::Result<()> {
    let outcome = if cmd.yes {
        controller.enter(&cmd.question, &cmd.answer, &mut |_: &str| true)?
    } else {
        controller.enter(&cmd.question, &cmd.answer, &mut prompt_stdin)?
    };

    match outcome {
        EntryOutcome::Added(record) => {
            println!("Record saved successfully!");
            println!("  id: {}", record.id);
        }
        EntryOutcome::Declined => println!("Record not saved."),
    }
    Ok(())
}

fn handle_edit(controller: &mut Controller, cmd: EditCommand) -> anyhow::Result<()> {
    let current = controller
        .get(&cmd.id)
        .ok_or_else(|| Error::record_not_found(&cmd.id))?;
    let question = cmd.question.unwrap_or_else(|| current.question.clone());
    let answer = cmd.answer.unwrap_or_else(|| current.answer.clone());

    controller.edit(&cmd.id, &question, &answer)?;
    println!("Record updated successfully!");
    Ok(())
}

fn handle_search(controller: &Controller, cmd: &SearchCommand) -> anyhow::Result<()> {
    let term = cmd.query.as_deref().unwrap_or("");
    let mut results = controller.search(term);
    if let Some(limit) = cmd.limit {
        results.truncate(limit);
    }
    debug!(term, count = results.len(), "Search finished");

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Table => print_table(&results),
        OutputFormat::Plain => {
            if results.is_empty() {
                println!("No records found.");
            }
            for record in results {
                println!("[{}]", record.id);
                println!("Q: {}", record.question);
                println!("A: {}", record.answer);
                println!();
            }
        }
    }
    Ok(())
}

fn print_table(records: &[&Record]) {
    let id_width = records
        .iter()
        .map(|r| r.id.chars().count())
        .chain(std::iter::once(2))
        .max()
        .unwrap_or(2);
    let question_width = records
        .iter()
        .map(|r| r.question.chars().count())
        .chain(std::iter::once(8))
        .max()
        .unwrap_or(8)
        .min(60);

    println!("{:<id_width$}  {:<question_width$}  ANSWER", "ID", "QUESTION");
    for record in records {
        println!(
            "{:<id_width$}  {:<question_width$}  {}",
            record.id,
            truncate(&record.question, question_width),
            record.answer
        );
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn handle_export(
    config: &Config,
    controller: &Controller,
    cmd: &ExportCommand,
) -> anyhow::Result<()> {
    let Some(content) = controller.export_csv() else {
        println!("No records found to download.");
        return Ok(());
    };

    if cmd.stdout {
        write_csv(&mut std::io::stdout().lock(), &content)?;
        return Ok(());
    }

    let path = cmd.output.clone().unwrap_or_else(|| {
        csv::export_file_name(&config.export.file_prefix, Local::now().date_naive()).into()
    });
    std::fs::write(&path, content)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!(
        "Exported {} records to {}",
        controller.records().len(),
        path.display()
    );
    Ok(())
}

/// Write export text exactly as generated, with no trailing newline.
fn write_csv(out: &mut impl Write, content: &str) -> std::io::Result<()> {
    out.write_all(content.as_bytes())?;
    out.flush()
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let controller = open_controller(config);
    let store_path = controller.store().inner().path_for(controller.store().key());

    if json {
        let status = serde_json::json!({
            "store_path": store_path,
            "store_exists": store_path.exists(),
            "records": controller.records().len(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("qarec status");
        println!("------------");
        println!("Store:    {}", store_path.display());
        println!("Exists:   {}", store_path.exists());
        println!("Records:  {}", controller.records().len());
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data directory:     {}", config.data_dir().display());
                println!("  Key:                {}", config.storage.key);
                println!("  Store file:         {}", config.store_path().display());
                println!();
                println!("[Entry]");
                println!("  Confirm duplicates: {}", config.entry.confirm_duplicates);
                println!();
                println!("[Export]");
                println!("  File prefix:        {}", config.export.file_prefix);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

/// Ask on stdin; anything other than y/yes declines.
fn prompt_stdin(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut line = String::new();
    if std::io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}
