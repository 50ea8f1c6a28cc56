//! CLI runner - executes commands

use crate::aggregator::{Aggregation, CorrelationStrategy};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::TrackerClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::pagination::Cursor;
use crate::services::ActivityQuery;
use crate::types::SortOrder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::io::Write;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command against the configured API, writing to stdout
    pub async fn run(&self) -> Result<()> {
        let client = TrackerClient::new(self.load_config()?)?;
        self.execute(&client, &mut std::io::stdout()).await
    }

    /// Run the CLI command with an existing client
    pub async fn execute(&self, client: &TrackerClient, out: &mut (dyn Write + Send)) -> Result<()> {
        match &self.cli.command {
            Commands::Me => {
                let me = client.current_user().await?;
                self.emit(out, &me)
            }
            Commands::Stories {
                project,
                filter,
                limit,
                ..
            } => {
                let cursor = client.stories().iterate(*project, filter.as_deref()).await?;
                info!(project, total = cursor.total().total(), "Listing stories");
                self.drain(cursor, *limit, out).await
            }
            Commands::Activity {
                project,
                sort_order,
                since_version,
            } => {
                let mut query = ActivityQuery::new();
                if let Some(order) = sort_order {
                    query = query.sort_order(order.parse::<SortOrder>()?);
                }
                if let Some(version) = since_version {
                    query = query.since_version(*version);
                }
                let cursor = client.activity().iterate(*project, &query).await?;
                self.drain(cursor, None, out).await
            }
            Commands::Aggregate {
                project,
                stories,
                by_id,
                ..
            } => {
                let strategy = if *by_id {
                    CorrelationStrategy::ById
                } else {
                    CorrelationStrategy::ByUrl
                };
                let mut aggregation = client.aggregation(strategy);
                for &story_id in stories {
                    aggregation.queue_story_bundle(*project, story_id);
                }
                aggregation.dispatch().await?;

                for &story_id in stories {
                    let value = Self::story_report(&aggregation, *project, story_id);
                    self.emit(out, &value)?;
                }
                Ok(())
            }
        }
    }

    /// Load configuration, applying per-command overrides
    pub fn load_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::load(self.cli.config.as_deref())?;
        match &self.cli.command {
            Commands::Stories {
                page_size: Some(page_size),
                ..
            } => config.page_size = *page_size,
            Commands::Aggregate {
                batch_size: Some(batch_size),
                ..
            } => config.batch_size = *batch_size,
            _ => {}
        }
        config.validate()?;
        Ok(config)
    }

    async fn drain<T>(
        &self,
        mut cursor: Cursor<T>,
        limit: Option<usize>,
        out: &mut (dyn Write + Send),
    ) -> Result<()>
    where
        T: DeserializeOwned + Serialize,
    {
        let mut emitted = 0;
        while limit.map_or(true, |limit| emitted < limit) {
            match cursor.next().await {
                Ok(Some(item)) => {
                    self.emit(out, &item)?;
                    emitted += 1;
                }
                Ok(None) => break,
                Err(e) if e.is_decode() => warn!(error = %e, "Skipping undecodable item"),
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn story_report(aggregation: &Aggregation, project_id: u64, story_id: u64) -> Value {
        match aggregation.strategy() {
            CorrelationStrategy::ById => match aggregation.bundle(story_id) {
                Ok(bundle) => json!({
                    "story_id": story_id,
                    "story": bundle.story,
                    "comments": bundle.comments,
                    "reviews": bundle.reviews,
                }),
                Err(e) => json!({"story_id": story_id, "error": e.to_string()}),
            },
            CorrelationStrategy::ByUrl => json!({
                "story_id": story_id,
                "story": Self::part(aggregation.story(project_id, story_id)),
                "comments": Self::part(aggregation.comments(project_id, story_id)),
                "reviews": Self::part(aggregation.reviews(project_id, story_id)),
            }),
        }
    }

    fn part<T: Serialize>(result: Result<T>) -> Value {
        match result.and_then(|value| Ok(serde_json::to_value(value)?)) {
            Ok(value) => value,
            Err(e) => json!({"error": e.to_string()}),
        }
    }

    fn emit<T: Serialize>(&self, out: &mut (dyn Write + Send), value: &T) -> Result<()> {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        writeln!(out, "{line}")?;
        Ok(())
    }
}
