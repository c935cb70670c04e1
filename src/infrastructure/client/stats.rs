use anyhow::Result;

use super::ReadlogClient;
use crate::domain::stats::{ChartData, FictionFilter, FilterCriteria, Metric};

pub struct StatsClient<'a> {
    client: &'a ReadlogClient,
}

impl<'a> StatsClient<'a> {
    pub fn new(client: &'a ReadlogClient) -> Self {
        Self { client }
    }

    pub async fn monthly(&self, criteria: &FilterCriteria, metric: Metric) -> Result<ChartData> {
        let mut url = self.client.endpoint("api/v1/stats/monthly")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("metric", metric.as_str());
            for genre in &criteria.genres {
                pairs.append_pair("genre", genre);
            }
            if criteria.fiction != FictionFilter::All {
                pairs.append_pair("fiction", criteria.fiction.as_str());
            }
            if let Some(start) = criteria.start {
                pairs.append_pair("start", &start.to_string());
            }
            if let Some(end) = criteria.end {
                pairs.append_pair("end", &end.to_string());
            }
        }
        self.client.get_json(url).await
    }
}
