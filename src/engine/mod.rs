//! Extraction engine module
//!
//! Runs one extraction: resolves every requested object to its API calls,
//! applies the failure policy and writes the resulting tables.
//!
//! # Overview
//!
//! - v3 collections are fetched once and written to their own table
//! - v1 reports are fetched once per day of the window; each row carries
//!   the day as `date`
//! - Tickets are fetched last, once, when `tickets` or `tickets_messages` is
//!   requested; ticket messages then fan out per ticket into the
//!   `tickets_messages` and `tickets_messages_content` tables

mod types;

pub use types::{RunConfig, RunStats};

use crate::catalog::ObjectKind;
use crate::client::LiveAgentClient;
use crate::error::{Error, Result};
use crate::output::TableWriter;
use crate::partition::DateWindow;
use crate::schema::TableId;
use crate::types::{JsonObject, JsonValue};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Table an object's records are written to
pub fn table_for(kind: ObjectKind) -> TableId {
    match kind {
        ObjectKind::Agents => TableId::Agents,
        ObjectKind::Calls => TableId::Calls,
        ObjectKind::Chats => TableId::Chats,
        ObjectKind::Companies => TableId::Companies,
        ObjectKind::Contacts => TableId::Contacts,
        ObjectKind::Departments => TableId::Departments,
        ObjectKind::Tags => TableId::Tags,
        ObjectKind::Tickets => TableId::Tickets,
        ObjectKind::TicketsMessages => TableId::TicketsMessages,
        ObjectKind::TicketsHistory => TableId::TicketsHistory,
        ObjectKind::AgentReport => TableId::AgentReport,
        ObjectKind::RankingAgentsReport => TableId::RankingAgentsReport,
        ObjectKind::AgentAvailability => TableId::AgentAvailability,
        ObjectKind::AgentAvailabilityChats => TableId::AgentAvailabilityChats,
        ObjectKind::CallsAvailability => TableId::CallsAvailability,
        ObjectKind::Conversations => TableId::Conversations,
    }
}

/// Messages of one ticket
struct TicketMessages {
    ticket_id: String,
    messages: Vec<JsonValue>,
}

/// Extraction run over a fixed object list
pub struct Extractor {
    client: LiveAgentClient,
    window: DateWindow,
    objects: Vec<ObjectKind>,
    config: RunConfig,
    stats: RunStats,
}

impl Extractor {
    pub fn new(
        client: LiveAgentClient,
        window: DateWindow,
        objects: Vec<ObjectKind>,
        config: RunConfig,
    ) -> Self {
        Self {
            client,
            window,
            objects,
            config,
            stats: RunStats::default(),
        }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Download every requested object and write its tables
    pub async fn run(mut self) -> Result<RunStats> {
        let start = Instant::now();
        info!("Downloading data from {}.", self.window);

        let objects = self.objects.clone();
        for kind in objects.iter().copied() {
            if matches!(kind, ObjectKind::Tickets | ObjectKind::TicketsMessages) {
                continue;
            }

            info!("Downloading {kind} data.");
            let result = self.extract_object(kind).await;
            self.settle(&[kind], result)?;
        }

        let ticket_objects: Vec<ObjectKind> = objects
            .iter()
            .copied()
            .filter(|k| matches!(k, ObjectKind::Tickets | ObjectKind::TicketsMessages))
            .collect();

        if !ticket_objects.is_empty() {
            info!("Downloading ticket data.");
            let with_messages = ticket_objects.contains(&ObjectKind::TicketsMessages);

            match self.extract_tickets().await {
                Ok(tickets) if with_messages => {
                    let result = self.extract_ticket_messages(&tickets).await;
                    self.settle(&[ObjectKind::TicketsMessages], result)?;
                }
                Ok(_) => {}
                Err(e) => self.settle(&ticket_objects, Err(e))?,
            }
        }

        self.stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            "Wrote {} rows into {} tables in {}ms",
            self.stats.total_rows(),
            self.stats.tables_written(),
            self.stats.duration_ms
        );
        if !self.stats.is_success() {
            warn!("Skipped objects: {}", self.stats.failed_objects.join(", "));
        }

        Ok(self.stats)
    }

    /// Apply the failure policy to the outcome of `kinds`.
    ///
    /// Configuration and output failures always abort the run.
    fn settle(&mut self, kinds: &[ObjectKind], result: Result<()>) -> Result<()> {
        let Err(e) = result else {
            return Ok(());
        };

        let fatal = e.is_config() || matches!(e, Error::Output { .. } | Error::Io(_));
        if self.config.fail_on_error || fatal {
            return Err(e);
        }

        let names: Vec<&str> = kinds.iter().map(|k| k.name()).collect();
        error!("Failed to download {}: {e}", names.join(", "));
        for kind in kinds {
            self.stats.add_failure(kind.name());
        }
        Ok(())
    }

    async fn extract_object(&mut self, kind: ObjectKind) -> Result<()> {
        if kind.is_daily_report() {
            return self.extract_report(kind).await;
        }

        let records = match kind {
            ObjectKind::Conversations => {
                self.client
                    .get_conversations(&self.window.from_string())
                    .await?
            }
            _ => self.client.fetch_collection(kind, &self.window).await?,
        };

        let mut writer = self.open(table_for(kind))?;
        writer.write_records(&records, &JsonObject::new())?;
        self.finish(writer)
    }

    /// Fetch a report day by day; the table is written once every day is in
    async fn extract_report(&mut self, kind: ObjectKind) -> Result<()> {
        let mut days = Vec::new();

        for day in self.window.days() {
            let records = self
                .client
                .fetch_report(kind, &day.start(), &day.end())
                .await?;
            debug!("{kind} {}: {} records", day.label(), records.len());
            days.push((day.label(), records));
        }

        let mut writer = self.open(table_for(kind))?;
        for (date, records) in &days {
            let mut extra = JsonObject::new();
            extra.insert("date".to_string(), JsonValue::String(date.clone()));
            writer.write_records(records, &extra)?;
        }
        self.finish(writer)
    }

    async fn extract_tickets(&mut self) -> Result<Vec<JsonValue>> {
        let tickets = self.client.get_tickets(&self.window).await?;

        let mut writer = self.open(TableId::Tickets)?;
        writer.write_records(&tickets, &JsonObject::new())?;
        self.finish(writer)?;

        Ok(tickets)
    }

    async fn extract_ticket_messages(&mut self, tickets: &[JsonValue]) -> Result<()> {
        let ticket_ids: Vec<String> = tickets
            .iter()
            .filter_map(|t| {
                let id = t.get("id").and_then(record_id);
                if id.is_none() {
                    warn!("Skipping ticket without id");
                }
                id
            })
            .collect();

        info!("Processing messages for {} tickets.", ticket_ids.len());

        let mut fetched = Vec::with_capacity(ticket_ids.len());
        for ticket_id in ticket_ids {
            let messages = self
                .client
                .get_ticket_messages(&ticket_id, &self.window)
                .await?;
            fetched.push(TicketMessages {
                ticket_id,
                messages,
            });
        }

        let mut messages_writer = self.open(TableId::TicketsMessages)?;
        let mut content_writer = self.open(TableId::TicketsMessagesContent)?;

        for ticket in &fetched {
            let mut ticket_extra = JsonObject::new();
            ticket_extra.insert(
                "ticket_id".to_string(),
                JsonValue::String(ticket.ticket_id.clone()),
            );
            messages_writer.write_records(&ticket.messages, &ticket_extra)?;

            for message in &ticket.messages {
                let Some(contents) = message.get("messages").and_then(JsonValue::as_array) else {
                    continue;
                };
                let mut content_extra = JsonObject::new();
                content_extra.insert(
                    "message_id".to_string(),
                    message.get("id").cloned().unwrap_or(JsonValue::Null),
                );
                content_writer.write_records(contents, &content_extra)?;
            }
        }

        self.finish(messages_writer)?;
        self.finish(content_writer)
    }

    fn open(&self, table: TableId) -> Result<TableWriter> {
        TableWriter::create(&self.config.output_dir, table, self.config.incremental)
    }

    fn finish(&mut self, writer: TableWriter) -> Result<()> {
        let table = writer.schema().name;
        let rows = writer.close()?;
        info!("Table {table}: {rows} rows");
        self.stats.add_table(table, rows);
        Ok(())
    }
}

/// Identifier of a record as text
fn record_id(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
