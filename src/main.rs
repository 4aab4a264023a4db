use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::Parser;

use multiedit::cli::CliArgs;
use multiedit::commands::Cmd;
use multiedit::messages::{EditorMsg, Msg, SessionMsg};
use multiedit::model::{AppModel, Document};
use multiedit::update::{try_update, update};
use multiedit::MultieditConfig;

fn main() -> Result<()> {
    multiedit::tracing::init();

    let args = CliArgs::parse();
    let run = match args.into_config() {
        Ok(run) => run,
        Err(e) => bail!(e),
    };

    let config = match &run.config_path {
        Some(path) => MultieditConfig::load_from(path)?,
        None => MultieditConfig::load(),
    };

    let document = Document::from_file(run.file.clone())
        .with_context(|| format!("Failed to open {}", run.file.display()))?;
    let mut model = AppModel::new(document, config);

    if let Some((line, column)) = run.initial_position {
        update(&mut model, Msg::Editor(EditorMsg::SetCursorPosition { line, column }));
    }

    let cmd = try_update(&mut model, run.start)
        .with_context(|| format!("No session started in {}", run.file.display()))?;
    report(cmd.as_ref());

    let mut stdout = std::io::stdout().lock();
    let Some(replacement) = run.replace else {
        for (pos, region) in model.region_positions() {
            writeln!(stdout, "{}:{}\t{}", pos.line + 1, pos.column + 1, region.text(&model.document))?;
        }
        return Ok(());
    };

    try_update(&mut model, Msg::Session(SessionMsg::Paste(replacement)))
        .context("Failed to replace regions")?;
    tracing::info!(
        regions = model.session.regions().len(),
        "replaced every region"
    );

    if run.in_place {
        std::fs::write(&run.file, model.document.text())
            .with_context(|| format!("Failed to write {}", run.file.display()))?;
    } else {
        stdout.write_all(model.document.text().as_bytes())?;
    }
    Ok(())
}

/// Status messages go to stderr so stdout stays usable in pipelines
fn report(cmd: Option<&Cmd>) {
    if let Some(cmd) = cmd {
        for message in cmd.messages() {
            eprintln!("{}", message);
        }
    }
}
