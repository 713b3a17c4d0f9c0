#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Command line front end: sends one email through the SMTP adapter

use std::{fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use smtp_adapter::{
    domain::{
        config::{resolve, RawConfig},
        delivery::{Mailer, SmtpAdapter},
        message::{Address, Attachment, EmailMessage},
    },
    infrastructure::email::transport_for,
};
use tracing::info;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// Path to the JSON adapter configuration
    #[arg(long, env = "SMTP_ADAPTER_CONFIG")]
    pub config: PathBuf,

    /// Sender, `email` or `Name <email>`
    #[arg(long, env = "SMTP_ADAPTER_FROM")]
    pub from: Address,

    /// Primary recipients
    #[arg(long, required = true)]
    pub to: Vec<Address>,

    /// Carbon copy recipients
    #[arg(long)]
    pub cc: Vec<Address>,

    /// Blind carbon copy recipients
    #[arg(long)]
    pub bcc: Vec<Address>,

    /// Subject line
    #[arg(long)]
    pub subject: Option<String>,

    /// Plain text body
    #[arg(long)]
    pub text: Option<String>,

    /// HTML body
    #[arg(long)]
    pub html: Option<String>,

    /// Files to attach
    #[arg(long)]
    pub attach: Vec<PathBuf>,
}

impl Args {
    fn email(&self) -> Result<EmailMessage> {
        let mut email = EmailMessage::new(self.from.clone());

        email.subject = self.subject.clone();
        email.to = self.to.clone();
        email.cc = self.cc.clone();
        email.bcc = self.bcc.clone();
        email.text_body = self.text.clone();
        email.html_body = self.html.clone();

        for path in &self.attach {
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| anyhow!("{} is not a file", path.display()))?;
            let data =
                fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

            email.attachments.push(Attachment::new(filename, data));
        }

        Ok(email)
    }
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let raw: RawConfig = serde_json::from_str(
        &fs::read_to_string(&args.config)
            .with_context(|| format!("failed to read {}", args.config.display()))?,
    )
    .with_context(|| format!("invalid configuration in {}", args.config.display()))?;

    let transport_name = resolve(&raw)?.transport;
    let transport = transport_for(&transport_name)
        .ok_or_else(|| anyhow!("unknown transport {:?}", transport_name))?;

    let adapter = SmtpAdapter::new(raw, transport)?;
    let email = args.email()?;

    let receipt = Mailer::deliver(&adapter, email).await?;

    info!("delivered: {}", receipt.response);
    println!("{}", receipt.response);

    Ok(())
}
