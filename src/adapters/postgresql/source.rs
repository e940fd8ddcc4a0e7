//! PostgreSQL implementation of the sample source trait

use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{day_query, earliest_query, ArchiveRow};
use crate::adapters::source::SampleSource;
use crate::domain::{QueryError, Sample, StationId, UtcDay};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Sample source reading a wview-style archive table
pub struct PostgresSampleSource {
    client: PostgreSQLClient,
    station: StationId,
    table: String,
}

impl PostgresSampleSource {
    pub fn new(client: PostgreSQLClient, station: StationId, table: impl Into<String>) -> Self {
        Self {
            client,
            station,
            table: table.into(),
        }
    }

    pub fn client(&self) -> &PostgreSQLClient {
        &self.client
    }
}

#[async_trait]
impl SampleSource for PostgresSampleSource {
    fn station(&self) -> &StationId {
        &self.station
    }

    async fn earliest_sample(&self) -> Result<Option<DateTime<Utc>>, QueryError> {
        let rows = self.client.query(&earliest_query(&self.table), &[]).await?;

        let earliest: Option<i64> = match rows.first() {
            Some(row) => row.try_get(0).map_err(|e| QueryError::MalformedRow {
                station: self.station.to_string(),
                message: e.to_string(),
            })?,
            None => None,
        };

        earliest
            .map(|secs| {
                DateTime::from_timestamp(secs, 0).ok_or(QueryError::MalformedTimestamp {
                    station: self.station.to_string(),
                    value: secs,
                })
            })
            .transpose()
    }

    async fn query_samples(&self, day: UtcDay) -> Result<Vec<Sample>, QueryError> {
        let start = day.start().timestamp();
        let end = day.end().timestamp();

        let rows = self
            .client
            .query(&day_query(&self.table), &[&start, &end])
            .await?;

        tracing::debug!(
            station = %self.station,
            day = %day,
            rows = rows.len(),
            "Queried samples"
        );

        rows.iter()
            .map(|row| ArchiveRow::from_row(&self.station, row)?.into_sample(&self.station))
            .collect()
    }
}
