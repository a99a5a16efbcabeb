use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::ServiceContext;
use crate::cli::output::{list_table, output, render_list, CommandOutput};
use crate::domain::models::{Bound, Config, SearchResult};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Name fragment to look for
    pub term: String,

    /// Maximum number of results; negative means no limit
    #[arg(short, long, allow_negative_numbers = true)]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct SearchOutput {
    pub results: Vec<SearchResult>,
}

impl CommandOutput for SearchOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["type", "name", "url"]);
        for result in &self.results {
            table.add_row(vec![
                result.kind.to_string(),
                result.name.clone(),
                result.url.clone(),
            ]);
        }
        render_list("result", &table, self.results.len())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: SearchArgs, config: &Config, json_mode: bool) -> Result<()> {
    let context = ServiceContext::from_config(config)?;
    let limit = args.limit.map_or(Bound::Unbounded, Bound::from_signed);

    let results = context.search.search(&args.term, limit).await?;
    output(&SearchOutput { results }, json_mode);
    Ok(())
}
