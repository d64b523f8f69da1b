use std::path::PathBuf;

use callfire_text::{
    CallFireClient, Config, MessageText, PhoneNumber, RawPhoneNumber, SendOptions, SendText,
    SenderId, ValidationError,
};
use clap::Parser;
use phonenumber::country;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CALLFIRE_LOG";

/// Send a text broadcast through CallFire and print one status snapshot.
///
/// Credentials come from --config or from CALLFIRE_USERNAME / CALLFIRE_PASSWORD
/// (and optionally CALLFIRE_BASE_URL).
#[derive(Parser, Debug)]
#[command(name = "callfire-text", version)]
struct Cli {
    /// Message body
    #[arg(long)]
    message: String,

    /// Recipient numbers, comma-separated or repeated
    #[arg(long, value_delimiter = ',', required = true)]
    to: Vec<String>,

    /// Normalize --to numbers with this default region (ISO code, e.g. US)
    #[arg(long, value_name = "REGION", value_parser = parse_region)]
    region: Option<country::Id>,

    /// Caller id or short code to send from
    #[arg(long)]
    from: Option<String>,

    /// JSON config file with base_url, username and password
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the REST root (e.g. http://dev.callfire.com/api/1.0/rest)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env(LOG_ENV))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) => Config::from_json_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url)?;
    }

    let to = recipients(cli.to, cli.region)?;
    let options = SendOptions {
        from: cli.from.map(SenderId::new).transpose()?,
    };
    let request = SendText::to_many(to, MessageText::new(cli.message)?, options)?;

    let client = CallFireClient::from_config(&config)?;
    let broadcast = client.send_and_lookup(request).await?;
    tracing::info!(broadcast_id = %broadcast.id, "status snapshot received");

    print!("{}", broadcast.status);
    Ok(())
}

fn parse_region(value: &str) -> Result<country::Id, String> {
    value
        .trim()
        .to_ascii_uppercase()
        .parse::<country::Id>()
        .map_err(|_| format!("unknown region code: {value}"))
}

/// Without a region numbers are passed through untouched.
fn recipients(
    numbers: Vec<String>,
    region: Option<country::Id>,
) -> Result<Vec<RawPhoneNumber>, ValidationError> {
    numbers
        .into_iter()
        .map(|number| match region {
            Some(region) => PhoneNumber::parse(Some(region), number).map(RawPhoneNumber::from),
            None => RawPhoneNumber::new(number),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_codes_are_case_insensitive() {
        assert_eq!(parse_region("us"), Ok(country::Id::US));
        assert!(parse_region("nowhere").is_err());
    }

    #[test]
    fn recipients_pass_through_without_region() {
        let raw = recipients(vec!["(213) 221-2227".to_owned()], None).unwrap();
        assert_eq!(raw[0].raw(), "(213) 221-2227");
    }

    #[test]
    fn recipients_are_normalized_with_region() {
        let raw = recipients(
            vec!["(213) 221-2227".to_owned(), "+1 213 221 2228".to_owned()],
            Some(country::Id::US),
        )
        .unwrap();
        let raw: Vec<&str> = raw.iter().map(RawPhoneNumber::raw).collect();
        assert_eq!(raw, ["12132212227", "12132212228"]);
    }

    #[test]
    fn invalid_numbers_fail_with_region() {
        let err = recipients(vec!["call me".to_owned()], Some(country::Id::US)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPhoneNumber { .. }));
    }

    #[test]
    fn cli_accepts_comma_separated_recipients() {
        let cli = Cli::try_parse_from([
            "callfire-text",
            "--message",
            "hi",
            "--to",
            "12132212227,12132212228",
            "--region",
            "US",
        ])
        .unwrap();
        assert_eq!(cli.to, ["12132212227", "12132212228"]);
        assert_eq!(cli.region, Some(country::Id::US));
    }
}
