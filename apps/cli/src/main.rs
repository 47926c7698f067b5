use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{config, DocenteEditor, EditorError, HttpDocenteDirectory, Mutation};
use shared::domain::{Docente, DocenteId, DraftField};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "docentes", about = "Manage the docente directory from the terminal")]
struct Cli {
    /// Overrides the configured API base URL.
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        /// Case-insensitive substring matched against `nombre`.
        #[arg(long, default_value = "")]
        filter: String,
        #[arg(long)]
        json: bool,
    },
    Create {
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        especialidad: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        nombre: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        especialidad: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = config::load_settings().context("failed to load settings")?;
    if let Some(api_url) = &cli.api_url {
        settings.api_base_url = config::normalize_base_url(api_url)?;
    }
    tracing::debug!(api = %settings.api_base_url, "using docente directory");

    let directory = HttpDocenteDirectory::from_settings(&settings)?;
    let mut editor = DocenteEditor::new(Arc::new(directory));
    run(&mut editor, cli.command).await
}

async fn run(editor: &mut DocenteEditor, command: Command) -> Result<()> {
    match command {
        Command::List { filter, json } => {
            editor.refresh().await?;
            editor.set_filter(filter);
            let visible = editor.visible_docentes();
            if json {
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else if visible.is_empty() {
                println!("no docentes found");
            } else {
                for docente in visible {
                    println!("{}", format_docente(docente));
                }
            }
        }
        Command::Create {
            nombre,
            email,
            especialidad,
        } => {
            editor.update_field(DraftField::Nombre, nombre);
            editor.update_field(DraftField::Email, email);
            editor.update_field(DraftField::Especialidad, especialidad);
            submit(editor).await?;
        }
        Command::Update {
            id,
            nombre,
            email,
            especialidad,
        } => {
            editor.refresh().await?;
            let target = editor
                .docentes()
                .iter()
                .find(|d| d.id == DocenteId(id))
                .cloned()
                .with_context(|| format!("docente {id} not found"))?;
            editor.begin_edit(&target);
            for (field, value) in [
                (DraftField::Nombre, nombre),
                (DraftField::Email, email),
                (DraftField::Especialidad, especialidad),
            ] {
                if let Some(value) = value {
                    editor.update_field(field, value);
                }
            }
            submit(editor).await?;
        }
        Command::Delete { id } => {
            let id = DocenteId(id);
            editor.remove(id).await?;
            println!("{}", describe(Mutation::Deleted(id)));
        }
    }

    Ok(())
}

async fn submit(editor: &mut DocenteEditor) -> Result<()> {
    match editor.submit().await {
        Ok(mutation) => {
            println!("{}", describe(mutation));
            Ok(())
        }
        Err(EditorError::Validation(errors)) => {
            for message in errors.messages() {
                eprintln!("- {message}");
            }
            bail!("draft rejected by validation");
        }
        Err(err) => Err(err.into()),
    }
}

fn describe(mutation: Mutation) -> String {
    match mutation {
        Mutation::Created => "created docente".to_string(),
        Mutation::Updated(id) => format!("updated docente {id}"),
        Mutation::Deleted(id) => format!("deleted docente {id}"),
    }
}

fn format_docente(docente: &Docente) -> String {
    format!(
        "{:>5}  {}  <{}>  {}",
        docente.id, docente.nombre, docente.email, docente.especialidad
    )
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn update_accepts_partial_fields() {
        let cli = Cli::try_parse_from([
            "docentes",
            "--api-url",
            "http://10.0.0.2:3000",
            "update",
            "5",
            "--email",
            "ana@escuela.mx",
        ])
        .expect("parse");
        assert_eq!(cli.api_url.as_deref(), Some("http://10.0.0.2:3000"));
        match cli.command {
            Command::Update {
                id,
                nombre,
                email,
                especialidad,
            } => {
                assert_eq!(id, 5);
                assert_eq!(nombre, None);
                assert_eq!(email.as_deref(), Some("ana@escuela.mx"));
                assert_eq!(especialidad, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn create_requires_every_field() {
        assert!(Cli::try_parse_from(["docentes", "create", "--nombre", "Ana"]).is_err());
    }

    #[test]
    fn formats_docente_line() {
        let docente = Docente {
            id: DocenteId(7),
            nombre: "Ana".into(),
            email: "a@b.com".into(),
            especialidad: "Math".into(),
        };
        assert_eq!(format_docente(&docente), "    7  Ana  <a@b.com>  Math");
    }

    #[test]
    fn describes_mutations() {
        assert_eq!(describe(Mutation::Created), "created docente");
        assert_eq!(describe(Mutation::Updated(DocenteId(3))), "updated docente 3");
    }
}
