use clap::{Parser, Subcommand};
use console::{style, Term};
use payrelay::{
    CreateInvoiceParams, CreateWithdrawalParams, PayRelayClient, PayRelayError, PayRelaySettings,
};
use serde::Serialize;
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(arg_required_else_help(true), version)]
pub struct Opts {
    #[clap(flatten)]
    pub settings: PayRelaySettings,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Create and look up invoices
    #[clap(subcommand)]
    Invoice(InvoiceCommand),

    /// Manage LNURL withdrawal links
    #[clap(subcommand)]
    Withdrawal(WithdrawalCommand),
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum InvoiceCommand {
    /// Create an invoice
    Create { amount: u64 },

    /// Show an invoice
    Get { id: String },
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum WithdrawalCommand {
    /// Create a withdrawal link
    Create {
        amount: u64,
        description: String,
        #[clap(long)]
        webhook_url: Option<String>,
    },

    /// Show a withdrawal link and its state
    Get { id: String },

    /// Delete a withdrawal link
    Delete { id: String },
}

pub fn init_tracing() {
    // stdout is reserved for command output
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();
}

pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<PayRelayError>()
        .is_some_and(PayRelayError::is_not_found)
}

pub fn is_cancelled(err: &anyhow::Error) -> bool {
    err.downcast_ref::<PayRelayError>()
        .is_some_and(PayRelayError::is_cancelled)
}

fn print_json<T: Serialize>(term: &Term, value: &T) -> anyhow::Result<()> {
    term.write_line(&serde_json::to_string_pretty(value)?)?;
    Ok(())
}

pub async fn execute(
    client: &PayRelayClient,
    command: Command,
    term: &Term,
) -> anyhow::Result<()> {
    match command {
        Command::Invoice(InvoiceCommand::Create { amount }) => {
            let invoice = client
                .invoices()
                .create_invoice(&CreateInvoiceParams { amount })
                .await?;
            print_json(term, &invoice)?;
        }
        Command::Invoice(InvoiceCommand::Get { id }) => {
            let invoice = client.invoices().query_invoice(&id).await?;
            print_json(term, &invoice)?;
        }
        Command::Withdrawal(WithdrawalCommand::Create {
            amount,
            description,
            webhook_url,
        }) => {
            let params = CreateWithdrawalParams {
                amount,
                description,
                webhook_url,
            };
            let withdrawal = client.lnurl().create_withdrawal(&params).await?;
            print_json(term, &withdrawal)?;
        }
        Command::Withdrawal(WithdrawalCommand::Get { id }) => {
            let withdrawal = client.lnurl().query_withdrawal(&id).await?;
            print_json(term, &withdrawal)?;
        }
        Command::Withdrawal(WithdrawalCommand::Delete { id }) => {
            client.lnurl().delete_withdrawal(&id).await?;
            term.write_line(&format!("Withdrawal {} deleted", style(id).cyan()))?;
        }
    }
    Ok(())
}
