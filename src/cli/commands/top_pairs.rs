use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::ServiceContext;
use crate::cli::output::{list_table, output, render_list, CommandOutput};
use crate::domain::models::{Bound, Config, PairResult};
use crate::infrastructure::http::DEFAULT_TOP_PAIRS_LIMIT;
use crate::services::PairQuery;

#[derive(Args, Debug)]
pub struct TopPairsArgs {
    /// Only pairs sharing at least this many episodes; negative means no minimum
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<i64>,

    /// Only pairs sharing at most this many episodes; negative means no maximum
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<i64>,

    /// Maximum number of pairs [default: 20]; negative means no limit
    #[arg(short, long, allow_negative_numbers = true)]
    pub limit: Option<i64>,
}

impl TopPairsArgs {
    pub fn query(&self) -> PairQuery {
        let bound = |value: Option<i64>| value.map_or(Bound::Unbounded, Bound::from_signed);
        PairQuery {
            min: bound(self.min),
            max: bound(self.max),
            limit: self
                .limit
                .map_or(Bound::At(DEFAULT_TOP_PAIRS_LIMIT), Bound::from_signed),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct TopPairsOutput {
    pub pairs: Vec<PairResult>,
}

impl CommandOutput for TopPairsOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["episodes", "character 1", "character 2"]);
        for pair in &self.pairs {
            table.add_row(vec![
                pair.episodes.to_string(),
                pair.character1.name.clone(),
                pair.character2.name.clone(),
            ]);
        }
        render_list("pair", &table, self.pairs.len())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: TopPairsArgs, config: &Config, json_mode: bool) -> Result<()> {
    let context = ServiceContext::from_config(config)?;

    let pairs = context.pairs.top_pairs(args.query()).await?;
    output(&TopPairsOutput { pairs }, json_mode);
    Ok(())
}
