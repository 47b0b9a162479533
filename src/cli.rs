// src/cli.rs
//! Command-line surface: `scout`, `render`, `publish`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::admin::load_admin_config;
use crate::config::{DataPaths, DEFAULT_ISSUE_BODY_PATH, ENV_ISSUE_BODY_PATH};
use crate::model::{CandidateStore, IssueArchive};
use crate::publish::{read_document, Publisher};
use crate::render::render_issue;
use crate::scout::{scout, sources_from_config, ScoutOptions};
use crate::store::{JsonFileStore, Store};

#[derive(Parser, Debug)]
#[command(name = "ketogo-curator")]
#[command(about = "Feed scout, review checklist renderer and weekly issue publisher")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub paths: DataPaths,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch configured feeds into the backlog
    Scout,
    /// Print the review checklist (markdown) to stdout
    Render,
    /// Publish ticked items from the edited checklist
    Publish {
        /// Edited checklist document
        #[arg(long, env = ENV_ISSUE_BODY_PATH, default_value = DEFAULT_ISSUE_BODY_PATH)]
        issue_body: PathBuf,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    let paths = cli.paths;
    match cli.command {
        Command::Scout => {
            let admin = load_admin_config(&paths.admin)?;
            let store: JsonFileStore<CandidateStore> = JsonFileStore::new(&paths.candidates);
            let sources = sources_from_config(&admin);
            scout(&store, &sources, ScoutOptions::from(&admin)).await?;
            println!("Scout completed");
        }
        Command::Render => {
            let admin = load_admin_config(&paths.admin)?;
            let store: JsonFileStore<CandidateStore> = JsonFileStore::new(&paths.candidates);
            print!("{}", render_issue(&admin, &store.load()?));
        }
        Command::Publish { issue_body } => {
            // Missing input aborts before any store is read or written.
            let document = read_document(&issue_body)?;
            let admin = load_admin_config(&paths.admin)?;
            let candidates: JsonFileStore<CandidateStore> = JsonFileStore::new(&paths.candidates);
            let archive: JsonFileStore<IssueArchive> = JsonFileStore::new(&paths.numeri);
            let today = chrono::Local::now().date_naive();
            let outcome = Publisher::new(&candidates, &archive, admin.publication_name)
                .publish(&document, today)?;
            println!("{}", outcome.summary());
        }
    }
    Ok(())
}
