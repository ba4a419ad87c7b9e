//! Operator CLI for Payment Rails recipients.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;

use clap::{Parser, Subcommand};
use ortho_config::OrthoConfig;
use paymentrails::{
    ClientSettings, Gateway, Recipient, RecipientAttributes, RecipientId, SearchQuery,
};
use serde_json::{Map, Value, json};
use tokio::runtime::Builder;
use tracing::{Subscriber, warn};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// `paymentrails` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "paymentrails",
    about = "Manage Payment Rails recipients from the command line",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Recipient operations.
    #[command(subcommand)]
    Recipients(RecipientsCommand),
}

#[derive(Debug, Clone, Subcommand)]
enum RecipientsCommand {
    /// Search recipients by term or field filters.
    Search {
        /// Free-text search term.
        #[arg(long, conflicts_with = "filter")]
        term: Option<String>,
        /// Field filter as `key=value`; repeatable.
        #[arg(long, value_name = "key=value", value_parser = parse_filter)]
        filter: Vec<(String, String)>,
        /// Page to fetch.
        #[arg(long)]
        page: Option<u32>,
        /// Records per page.
        #[arg(long = "page-size")]
        page_size: Option<u32>,
    },
    /// Fetch one recipient.
    Find {
        /// Recipient identifier.
        id: String,
    },
    /// Create a recipient.
    Create {
        /// Attribute as `key=value`; values parse as JSON when possible.
        #[arg(long = "attr", value_name = "key=value", value_parser = parse_attribute, required = true)]
        attributes: Vec<(String, Value)>,
    },
    /// Update a recipient.
    Update {
        /// Recipient identifier.
        id: String,
        /// Attribute as `key=value`; values parse as JSON when possible.
        #[arg(long = "attr", value_name = "key=value", value_parser = parse_attribute, required = true)]
        attributes: Vec<(String, Value)>,
    },
    /// Delete a recipient.
    Delete {
        /// Recipient identifier.
        id: String,
    },
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    if let Err(e) = log_subscriber(EnvFilter::from_default_env(), io::stderr).try_init() {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = ClientSettings::load_from_iter([OsString::from("paymentrails")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let config = settings
        .into_config()
        .map_err(|error| io::Error::other(format!("invalid settings: {error}")))?;
    let recipients = Gateway::new(config)
        .recipient()
        .map_err(|error| io::Error::other(format!("create recipient gateway: {error}")))?;

    let Command::Recipients(command) = args.command;
    let output = match command {
        RecipientsCommand::Search {
            term,
            filter,
            page,
            page_size,
        } => {
            let query = search_query(term, filter, page, page_size);
            let results = recipients.search(query).await.map_err(command_error)?;
            json!({
                "recipients": results.iter().map(recipient_json).collect::<Vec<_>>(),
                "meta": results.meta(),
            })
        }
        RecipientsCommand::Find { id } => {
            let recipient = recipients
                .find(&recipient_id(&id)?)
                .await
                .map_err(command_error)?;
            recipient_json(&recipient)
        }
        RecipientsCommand::Create { attributes } => {
            let recipient = recipients
                .create(&attribute_map(attributes))
                .await
                .map_err(command_error)?;
            recipient_json(&recipient)
        }
        RecipientsCommand::Update { id, attributes } => {
            let recipient = recipients
                .update(&recipient_id(&id)?, &attribute_map(attributes))
                .await
                .map_err(command_error)?;
            recipient_json(&recipient)
        }
        RecipientsCommand::Delete { id } => {
            let deleted = recipients
                .delete(&recipient_id(&id)?)
                .await
                .map_err(command_error)?;
            json!({"id": id, "deleted": deleted})
        }
    };

    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|error| io::Error::other(format!("render output: {error}")))?;
    println!("{rendered}");
    Ok(())
}

/// JSON log subscriber; stdout stays reserved for command output.
fn log_subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt()
        .with_env_filter(filter)
        .json()
        .with_writer(writer)
        .finish()
}

fn search_query(
    term: Option<String>,
    filter: Vec<(String, String)>,
    page: Option<u32>,
    page_size: Option<u32>,
) -> SearchQuery {
    let mut query = match term {
        Some(term) => SearchQuery::basic(term),
        None if filter.is_empty() => SearchQuery::all(),
        None => SearchQuery::advanced(filter),
    };
    if let Some(page) = page {
        query = query.with_page(page);
    }
    if let Some(page_size) = page_size {
        query = query.with_page_size(page_size);
    }
    query
}

fn attribute_map(attributes: Vec<(String, Value)>) -> RecipientAttributes {
    RecipientAttributes::from(attributes.into_iter().collect::<Map<String, Value>>())
}

fn recipient_id(raw: &str) -> io::Result<RecipientId> {
    RecipientId::new(raw).map_err(|error| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid recipient id '{raw}': {error}"),
        )
    })
}

fn recipient_json(recipient: &Recipient) -> Value {
    Value::Object(recipient.fields().clone())
}

fn command_error(error: paymentrails::GatewayError) -> io::Error {
    io::Error::other(format!("recipients command failed: {error}"))
}

fn split_pair(raw: &str) -> Result<(&str, &str), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("key must not be empty in '{raw}'"));
    }
    Ok((key, value))
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    split_pair(raw).map(|(key, value)| (key.to_owned(), value.to_owned()))
}

/// Parse `key=value`, reading the value as JSON and falling back to a string.
fn parse_attribute(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = split_pair(raw)?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.to_owned(), value))
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[rstest]
    fn log_events_go_to_the_diagnostic_writer() {
        let captured = CapturedLog::default();
        let sink = captured.clone();
        let subscriber = log_subscriber(EnvFilter::new("debug"), move || sink.clone());

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(status = 200_u16, "payment rails request completed");
        });

        let logged = String::from_utf8(captured.0.lock().expect("log buffer lock").clone())
            .expect("utf-8 log output");
        let line: Value = serde_json::from_str(logged.trim()).expect("one JSON log line");
        assert_eq!(
            line.pointer("/fields/message"),
            Some(&json!("payment rails request completed"))
        );
        assert_eq!(line.pointer("/fields/status"), Some(&json!(200)));
    }

    #[rstest]
    #[case::string("email=tom@example.com", "email", json!("tom@example.com"))]
    #[case::number("limit=5", "limit", json!(5))]
    #[case::object(r#"address={"country":"CA"}"#, "address", json!({"country": "CA"}))]
    #[case::keeps_equals_in_value("note=a=b", "note", json!("a=b"))]
    #[case::quoted("zip=\"01234\"", "zip", json!("01234"))]
    fn attributes_parse_json_or_fall_back_to_strings(
        #[case] raw: &str,
        #[case] key: &str,
        #[case] value: Value,
    ) {
        assert_eq!(parse_attribute(raw), Ok((key.to_owned(), value)));
    }

    #[rstest]
    #[case::missing_separator("email")]
    #[case::empty_key("=value")]
    fn malformed_pairs_are_rejected(#[case] raw: &str) {
        assert!(parse_filter(raw).is_err());
        assert!(parse_attribute(raw).is_err());
    }

    #[rstest]
    fn search_arguments_build_queries() {
        assert_eq!(
            search_query(Some("tom".to_owned()), Vec::new(), Some(2), None),
            SearchQuery::basic("tom").with_page(2)
        );
        assert_eq!(
            search_query(None, vec![("status".to_owned(), "active".to_owned())], None, Some(10)),
            SearchQuery::advanced([("status", "active")]).with_page_size(10)
        );
        assert_eq!(search_query(None, Vec::new(), None, None), SearchQuery::all());
    }

    #[rstest]
    fn cli_parses_recipient_commands() {
        let args = CliArgs::try_parse_from([
            "paymentrails",
            "recipients",
            "update",
            "R-1",
            "--attr",
            "email=new@example.com",
            "--attr",
            "type=business",
        ])
        .expect("arguments parse");
        let Command::Recipients(RecipientsCommand::Update { id, attributes }) = args.command else {
            panic!("expected update command");
        };
        assert_eq!(id, "R-1");
        assert_eq!(
            attribute_map(attributes).to_value(),
            json!({"email": "new@example.com", "type": "business"})
        );
    }

    #[rstest]
    fn term_and_filter_conflict() {
        let result = CliArgs::try_parse_from([
            "paymentrails",
            "recipients",
            "search",
            "--term",
            "tom",
            "--filter",
            "status=active",
        ]);
        assert!(result.is_err());
    }
}
