use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use transport_ledger::{
    client::{
        api::DEFAULT_API_URL,
        export::{default_file_name, export_to_xlsx},
        form::FormField,
        DateRange, TableView, TransportApiClient, TransportForm,
    },
    config,
    models::transport::TransportRecord,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    config::init_tracing(&cli.log_level, false);

    let client = TransportApiClient::new(cli.api_url.clone())?;
    debug!(api_url = %client.base_url(), "transport-cli starting");

    match cli.command {
        Commands::Add(args) => handle_add(&client, args, cli.json).await?,
        Commands::List(args) => handle_list(&client, args, cli.json).await?,
        Commands::Pay(args) => handle_pay(&client, args, cli.json).await?,
        Commands::Edit(args) => handle_edit(&client, args, cli.json).await?,
        Commands::Delete(args) => handle_delete(&client, args, cli.json).await?,
        Commands::Export(args) => handle_export(&client, args, cli.json).await?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "transport-cli",
    about = "Record, list, settle and export vehicle-transport jobs",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "TRANSPORT_API_URL",
        default_value = DEFAULT_API_URL,
        help = "Base URL of the transport API"
    )]
    api_url: String,
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[arg(long, global = true, default_value = "warn", help = "Log level for CLI diagnostics")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new record
    Add(RecordFields),
    /// List records with optional filters, followed by summary stats
    List(FilterArgs),
    /// Mark a record's balance as paid now
    Pay(IdArgs),
    /// Edit an existing record
    Edit(EditArgs),
    /// Delete a record
    Delete(DeleteArgs),
    /// Export the filtered records to an xlsx file
    Export(ExportArgs),
}

#[derive(Args, Default)]
struct RecordFields {
    #[arg(long, help = "Job date (YYYY-MM-DD or DD/MM/YYYY)")]
    date: Option<String>,
    #[arg(long, help = "Vehicle registration number")]
    vehicle_no: Option<String>,
    #[arg(long)]
    driver_name: Option<String>,
    #[arg(long)]
    driver_mobile: Option<String>,
    #[arg(long)]
    place: Option<String>,
    #[arg(long)]
    transport_name: Option<String>,
    #[arg(long = "rent", help = "Rent amount")]
    rent_amount: Option<String>,
    #[arg(long = "advance", help = "Advance amount")]
    advance_amount: Option<String>,
    #[arg(long, help = "Date the advance was paid; defaults to --date")]
    advance_date: Option<String>,
    #[arg(long, help = "cash or phonepay")]
    advance_type: Option<String>,
}

impl RecordFields {
    fn apply_to(&self, form: &mut TransportForm) {
        let fields = [
            (FormField::Date, &self.date),
            (FormField::VehicleNo, &self.vehicle_no),
            (FormField::DriverName, &self.driver_name),
            (FormField::DriverMobile, &self.driver_mobile),
            (FormField::Place, &self.place),
            (FormField::TransportName, &self.transport_name),
            (FormField::RentAmount, &self.rent_amount),
            (FormField::AdvanceAmount, &self.advance_amount),
            (FormField::AdvanceDate, &self.advance_date),
            (FormField::AdvanceType, &self.advance_type),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                form.set_field(field, value);
            }
        }
    }
}

#[derive(Args, Default)]
struct FilterArgs {
    #[arg(long, help = "Case-insensitive text to match in any column")]
    search: Option<String>,
    #[arg(long, help = "Earliest record date, inclusive (YYYY-MM-DD)")]
    from: Option<NaiveDate>,
    #[arg(long, help = "Latest record date, inclusive (YYYY-MM-DD)")]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    fn into_view(self, records: Vec<TransportRecord>) -> TableView {
        TableView::new(records)
            .with_search(self.search.unwrap_or_default())
            .with_date_range(DateRange::new(self.from, self.to))
    }
}

#[derive(Args)]
struct IdArgs {
    #[arg(help = "Record id")]
    id: Uuid,
}

#[derive(Args)]
struct EditArgs {
    #[arg(help = "Record id")]
    id: Uuid,
    #[command(flatten)]
    fields: RecordFields,
}

#[derive(Args)]
struct DeleteArgs {
    #[arg(help = "Record id")]
    id: Uuid,
    #[arg(long, action = ArgAction::SetTrue, help = "Skip the confirmation prompt")]
    yes: bool,
}

#[derive(Args)]
struct ExportArgs {
    #[arg(long, help = "Output file; defaults to transport_records_DD-MM-YYYY.xlsx")]
    output: Option<PathBuf>,
    #[command(flatten)]
    filters: FilterArgs,
}

async fn handle_add(client: &TransportApiClient, args: RecordFields, json: bool) -> Result<()> {
    let mut form = TransportForm::new();
    args.apply_to(&mut form);
    if args.advance_date.is_none() {
        let date = form.date.clone();
        form.set_field(FormField::AdvanceDate, &date);
    }

    let payload = form.to_payload()?;
    let record = client.create(&payload).await?;

    if json {
        print_json(&record)?;
    } else {
        println!("Data saved successfully!");
        render_record(&record);
    }
    Ok(())
}

async fn handle_list(client: &TransportApiClient, args: FilterArgs, json: bool) -> Result<()> {
    let view = args.into_view(client.list().await?);

    if json {
        #[derive(Serialize)]
        struct ListOutput<'a> {
            records: Vec<&'a TransportRecord>,
            stats: transport_ledger::client::TableStats,
        }
        print_json(&ListOutput {
            records: view.filtered(),
            stats: view.stats(),
        })?;
    } else {
        print!("{}", view.render_table());
        let stats = view.stats();
        println!();
        println!(
            "Total: {}  Paid: {}  Pending: {}  Outstanding balance: {}",
            stats.total, stats.paid, stats.pending, stats.outstanding_balance
        );
    }
    Ok(())
}

async fn handle_pay(client: &TransportApiClient, args: IdArgs, json: bool) -> Result<()> {
    let updated = client.mark_paid(args.id).await?;

    if json {
        print_json(&updated)?;
        return Ok(());
    }
    match updated {
        Some(record) => {
            println!("Payment status updated successfully!");
            render_record(&record);
        }
        None => println!("Record {} not found", args.id),
    }
    Ok(())
}

async fn handle_edit(client: &TransportApiClient, args: EditArgs, json: bool) -> Result<()> {
    let records = client.list().await?;
    let view = TableView::new(records);
    let existing = view
        .find(args.id)
        .ok_or_else(|| anyhow!("Record {} not found", args.id))?;

    let mut form = TransportForm::from_record(existing);
    args.fields.apply_to(&mut form);
    let payload = form.to_payload()?;

    let updated = client.update(args.id, &payload).await?;
    if json {
        print_json(&updated)?;
        return Ok(());
    }
    match updated {
        Some(record) => {
            println!("Data updated successfully!");
            render_record(&record);
        }
        None => println!("Record {} no longer exists", args.id),
    }
    Ok(())
}

async fn handle_delete(client: &TransportApiClient, args: DeleteArgs, json: bool) -> Result<()> {
    if !args.yes && !confirm("Are you sure you want to delete this record?")? {
        println!("Cancelled");
        return Ok(());
    }

    let confirmation = client.delete(args.id).await?;
    if json {
        print_json(&confirmation)?;
    } else {
        println!("{}", confirmation.message);
    }
    Ok(())
}

async fn handle_export(client: &TransportApiClient, args: ExportArgs, json: bool) -> Result<()> {
    let view = args.filters.into_view(client.list().await?);
    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(default_file_name(Local::now().date_naive())));

    let rows = export_to_xlsx(view.filtered(), &path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    if json {
        print_json(&serde_json::json!({ "path": path, "rows": rows }))?;
    } else {
        println!("Exported {} records to {}", rows, path.display());
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_record(record: &TransportRecord) {
    println!(
        "- {} • {} • {} • rent {} • advance {} ({}) • balance {} {}",
        record.id,
        record.date.format("%d/%m/%Y"),
        record.vehicle_no,
        record.rent_amount,
        record.advance_amount,
        record.advance_type,
        record.balance_amount,
        record.balance_status
    );
}
