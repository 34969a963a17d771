//! AURA application integrating sessions and the negotiation engine

use crate::config::NegotiationConfig;
use crate::error::Result;
use crate::negotiation::policy::format_amount;
use crate::negotiation::{
    ChatMessage, CounterReply, NegotiationRecord, NegotiationStatus, NegotiationSummary,
    OfferDecision, OfferRequest,
};
use crate::types::SessionId;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::commands::{SessionCommand, SessionLine};
use super::session::SessionRegistry;

/// Main AURA application
#[derive(Clone)]
pub struct AuraApp {
    sessions: SessionRegistry,
    config: NegotiationConfig,
}

impl AuraApp {
    pub fn new(config: NegotiationConfig) -> Self {
        Self {
            sessions: SessionRegistry::new(),
            config,
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Open a new session seeded with the demo borrowers
    pub async fn open_session(&self) -> SessionId {
        self.sessions.open(self.config.clone()).await
    }

    pub async fn close_session(&self, session_id: &SessionId) -> bool {
        self.sessions.close(session_id).await
    }

    pub async fn start_negotiation(
        &self,
        session_id: &SessionId,
        user_id: &str,
        request: OfferRequest,
    ) -> Result<NegotiationRecord> {
        let engine = self.sessions.get(session_id).await?;
        let mut engine = engine.lock().await;
        let record = engine.start_negotiation(user_id, request).clone();
        Ok(record)
    }

    pub async fn accept_offer(
        &self,
        session_id: &SessionId,
        user_id: &str,
    ) -> Result<NegotiationRecord> {
        let engine = self.sessions.get(session_id).await?;
        let mut engine = engine.lock().await;
        let record = engine.accept_offer(user_id)?.clone();
        Ok(record)
    }

    pub async fn counter_offer(
        &self,
        session_id: &SessionId,
        user_id: &str,
        text: &str,
    ) -> Result<CounterReply> {
        let engine = self.sessions.get(session_id).await?;
        let mut engine = engine.lock().await;
        Ok(engine.handle_counter_offer_text(user_id, text))
    }

    pub async fn decide_offer(
        &self,
        session_id: &SessionId,
        user_id: &str,
    ) -> Result<Option<OfferDecision>> {
        let engine = self.sessions.get(session_id).await?;
        let engine = engine.lock().await;
        Ok(engine.decide_offer(user_id))
    }

    pub async fn auto_negotiate(&self, session_id: &SessionId) -> Result<usize> {
        let engine = self.sessions.get(session_id).await?;
        let mut engine = engine.lock().await;
        Ok(engine.auto_negotiate_all())
    }

    pub async fn reset(&self, session_id: &SessionId) -> Result<()> {
        let engine = self.sessions.get(session_id).await?;
        engine.lock().await.reset();
        Ok(())
    }

    pub async fn summary(&self, session_id: &SessionId) -> Result<NegotiationSummary> {
        let engine = self.sessions.get(session_id).await?;
        let summary = engine.lock().await.summary();
        Ok(summary)
    }

    /// Scripted walk through the demo borrowers
    pub async fn run_demo(&self) -> Result<NegotiationSummary> {
        let session_id = self.open_session().await;

        let offered = self.auto_negotiate(&session_id).await?;
        tracing::info!("Demo: auto-negotiation reached {} borrowers", offered);

        let steps = [
            ("USR1001", "I can only give 300"),
            ("USR1002", "100"),
            ("USR1004", "₹600 is fine"),
        ];
        for (user_id, text) in steps {
            let reply = self.counter_offer(&session_id, user_id, text).await?;
            tracing::info!("Demo: {} said {:?} -> {}", user_id, text, reply.reply);
        }

        self.accept_offer(&session_id, "USR1002").await?;
        // Repeated accept leaves the recovered total untouched
        self.accept_offer(&session_id, "USR1002").await?;

        let summary = self.summary(&session_id).await?;
        self.close_session(&session_id).await;
        Ok(summary)
    }

    /// Execute one interactive command. Returns `None` on quit.
    pub async fn execute(&self, session_id: &SessionId, line: &str) -> Result<Option<String>> {
        let parsed = match SessionLine::parse_line(line) {
            Ok(parsed) => parsed,
            Err(e) => return Ok(Some(e.render().to_string())),
        };

        let output = match parsed.command {
            SessionCommand::Start {
                user_id,
                offer,
                expiry,
            } => {
                let request = OfferRequest {
                    offer_amount: offer,
                    expiry_days: expiry,
                    ..OfferRequest::default()
                };
                let record = self.start_negotiation(session_id, &user_id, request).await?;
                record
                    .last_message
                    .unwrap_or_else(|| format!("{} is already {}", user_id, record.status))
            }
            SessionCommand::Accept { user_id } => {
                let record = self.accept_offer(session_id, &user_id).await?;
                format!(
                    "{} restructured at ₹{}",
                    record.user_id,
                    format_amount(record.offer_amount)
                )
            }
            SessionCommand::Counter { user_id, text } => {
                self.counter_offer(session_id, &user_id, &text.join(" "))
                    .await?
                    .reply
            }
            SessionCommand::Decide { user_id } => {
                match self.decide_offer(session_id, &user_id).await? {
                    Some(decision) => {
                        format!("{}\n  rationale: {}", decision.message, decision.rationale)
                    }
                    None => format!("No active negotiation for {}.", user_id),
                }
            }
            SessionCommand::Auto => {
                let count = self.auto_negotiate(session_id).await?;
                format!("Sent {} offers", count)
            }
            SessionCommand::Reset => {
                self.reset(session_id).await?;
                "Session reset".to_string()
            }
            SessionCommand::Select { user_id } => {
                let engine = self.sessions.get(session_id).await?;
                engine.lock().await.select_user(&user_id)?;
                format!("Active borrower: {}", user_id)
            }
            SessionCommand::Show { user_id } => {
                let engine = self.sessions.get(session_id).await?;
                let engine = engine.lock().await;
                match engine.record(&user_id) {
                    Some(record) => render_record(record, engine.chat_tail(&user_id, 5)),
                    None => format!("No active negotiation for {}.", user_id),
                }
            }
            SessionCommand::Summary => render_summary(&self.summary(session_id).await?),
            SessionCommand::Quit => return Ok(None),
        };

        Ok(Some(output))
    }

    /// Read commands from stdin until EOF or `quit`
    pub async fn run_interactive(&self) -> Result<()> {
        let session_id = self.open_session().await;
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        let banner = format!("Session {} ready. Type `help` for commands.\n> ", session_id);
        stdout.write_all(banner.as_bytes()).await?;
        stdout.flush().await?;

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                stdout.write_all(b"> ").await?;
                stdout.flush().await?;
                continue;
            }

            let output = match self.execute(&session_id, &line).await {
                Ok(Some(output)) => output,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Command failed: {}", e);
                    format!("error: {}", e)
                }
            };

            stdout.write_all(format!("{}\n> ", output.trim_end()).as_bytes()).await?;
            stdout.flush().await?;
        }

        self.close_session(&session_id).await;
        Ok(())
    }
}

fn render_record(record: &NegotiationRecord, chat: Option<&[ChatMessage]>) -> String {
    let mut out = format!(
        "{} ({})\n  status: {}\n  wallet: ₹{}  missed: ₹{}\n  offer: ₹{} for {} days",
        record.user_id,
        record.name,
        record.status,
        format_amount(record.wallet),
        format_amount(record.missed_amount),
        format_amount(record.offer_amount),
        record.expiry_days
    );
    for message in chat.unwrap_or_default() {
        out.push_str(&format!("\n  [{:?}] {}", message.role, message.message));
    }
    out
}

/// Plain-text rendering of a session summary
pub fn render_summary(summary: &NegotiationSummary) -> String {
    let mut out = format!(
        "Funds recovered: ₹{}\n",
        format_amount(summary.total_recovered)
    );
    for status in NegotiationStatus::ALL {
        out.push_str(&format!("  {:<13} {}\n", status.as_str(), summary.count(status)));
    }

    let mut records: Vec<&NegotiationRecord> = summary.negotiations.values().collect();
    records.sort_by(|a, b| a.user_id.cmp(&b.user_id));
    out.push_str("Borrowers:\n");
    for record in records {
        out.push_str(&format!(
            "  {} {:<8} {:<13} offer ₹{} / {} days\n",
            record.user_id,
            record.name,
            record.status.as_str(),
            format_amount(record.offer_amount),
            record.expiry_days
        ));
    }

    let tail = &summary.log[summary.log.len().saturating_sub(10)..];
    out.push_str("Recent activity:\n");
    for entry in tail {
        out.push_str(&format!("  {}\n", entry.message));
    }
    out
}
