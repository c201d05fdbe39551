use analytics::{
    PeriodSelection, aggregate, aggregate_many, category_breakdown, category_insights, month_series,
    month_totals, overall_totals, portfolio_insights, summarize,
};
use anyhow::{Context, Result, bail};
use calendar::{CycleLocator, initial_schedule};
use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand};
use configuration::{Config, StorageBackend, init_tracing, load_config, load_config_from};
use core_types::{EntryPatch, EntryType, FinancialEntry, NewEntry};
use database::subscribe_to_changes;
use events::EntryEvent;
use rust_decimal::Decimal;
use std::path::PathBuf;
use uuid::Uuid;

mod render;
mod store;

use store::Store;

/// The main entry point for the Cyclebook application.
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("Failed to load configuration")?;
    if let Some(backend) = cli.backend {
        config.storage.backend = backend;
    }

    // Held until exit so the log file is flushed.
    let _log_guard = init_tracing(&config.logging)?;

    let calendar = config.cycle_calendar()?;
    let locator = match cli.today {
        Some(day) => CycleLocator::new(calendar, day),
        None => CycleLocator::from_clock(calendar),
    };
    tracing::debug!(today = %locator.today(), backend = ?config.storage.backend, "Starting");

    let app = App { config, locator };
    let listen = matches!(cli.command, Commands::Watch);
    let store = Store::open(&app.config, cli.source.as_deref(), listen).await?;

    // Execute the appropriate command
    match cli.command {
        Commands::Status => app.status(&store).await,
        Commands::Cycles(args) => app.cycles(&store, args).await,
        Commands::Schedule(args) => app.schedule(args),
        Commands::Report(args) => app.report(&store, args).await,
        Commands::Categories(args) => app.categories(&store, args).await,
        Commands::Month(args) => app.month(&store, args).await,
        Commands::List(args) => app.list(&store, args).await,
        Commands::Add(args) => app.add(&store, args).await,
        Commands::Update(args) => app.update(&store, args).await,
        Commands::Delete(args) => app.delete(&store, args).await,
        Commands::Export(args) => app.export(&store, args).await,
        Commands::Watch => app.watch(&store).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Tracks income, expenses and investments across 14-day work cycles.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of ./config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pin "today" to this date (format: YYYY-MM-DD).
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Override the configured storage backend.
    #[arg(long, global = true, value_enum)]
    backend: Option<StorageBackend>,

    /// JSON entry file for the in-memory backend; created on first write.
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show where today falls in the cycle system.
    Status,
    /// List the cycles of the reporting window with their totals.
    Cycles(CyclesArgs),
    /// Print the schedule of the first cycles.
    Schedule(ScheduleArgs),
    /// Per-cycle figures, portfolio summary and insights.
    Report(PeriodArgs),
    /// Category breakdown for a period.
    Categories(PeriodArgs),
    /// Daily totals for one month.
    Month(MonthArgs),
    /// List stored entries, newest first.
    List(ListArgs),
    /// Record a new entry.
    Add(AddArgs),
    /// Change fields of an existing entry.
    Update(UpdateArgs),
    /// Remove an entry.
    Delete(DeleteArgs),
    /// Write every entry as JSON.
    Export(ExportArgs),
    /// Print a line for every change to the entries until interrupted.
    Watch,
}

#[derive(Args)]
struct CyclesArgs {
    /// Number of cycles to show; defaults to `calendar.window_size`.
    #[arg(long)]
    count: Option<u32>,
}

#[derive(Args)]
struct ScheduleArgs {
    #[arg(long, default_value_t = 10)]
    count: u32,
}

#[derive(Args)]
struct PeriodArgs {
    /// current, recent or all.
    #[arg(long, default_value = "all")]
    period: PeriodSelection,
}

#[derive(Args)]
struct MonthArgs {
    /// Defaults to the current year.
    #[arg(long)]
    year: Option<i32>,
    /// 1-12; defaults to the current month.
    #[arg(long)]
    month: Option<u32>,
}

#[derive(Args)]
struct ListArgs {
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Args)]
struct AddArgs {
    /// expense, income or investment.
    #[arg(long = "type")]
    entry_type: EntryType,
    #[arg(long)]
    category: String,
    #[arg(long)]
    amount: Decimal,
    /// Defaults to today (format: YYYY-MM-DD).
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args)]
struct UpdateArgs {
    id: Uuid,
    #[arg(long = "type")]
    entry_type: Option<EntryType>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    amount: Option<Decimal>,
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long, conflicts_with = "clear_description")]
    description: Option<String>,
    /// Remove the description.
    #[arg(long)]
    clear_description: bool,
}

impl UpdateArgs {
    fn into_patch(self) -> EntryPatch {
        let description = if self.clear_description {
            Some(None)
        } else {
            self.description.map(Some)
        };
        EntryPatch {
            entry_type: self.entry_type,
            category: self.category,
            amount: self.amount,
            date: self.date,
            description,
        }
    }
}

#[derive(Args)]
struct DeleteArgs {
    id: Uuid,
}

#[derive(Args)]
struct ExportArgs {
    /// Write to this file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

struct App {
    config: Config,
    locator: CycleLocator,
}

impl App {
    async fn entries(&self, store: &Store) -> Result<Vec<FinancialEntry>> {
        store.repo().list_entries().await.context("Failed to load entries")
    }

    async fn status(&self, store: &Store) -> Result<()> {
        let info = self.locator.current_cycle_info()?;
        for line in render::status_lines(self.locator.today(), &info) {
            println!("{line}");
        }

        let entries = self.entries(store).await?;
        println!();
        println!("{}", render::totals_line("All entries", &overall_totals(&entries)));

        if let Some(cycle) = self.locator.current_cycle()? {
            let current = aggregate(&entries, &cycle);
            println!("{}", render::aggregates_table(std::slice::from_ref(&current)));
        }
        Ok(())
    }

    async fn cycles(&self, store: &Store, args: CyclesArgs) -> Result<()> {
        let count = args.count.unwrap_or(self.config.calendar.window_size);
        let cycles = self.locator.cycles_window(count)?;
        let entries = self.entries(store).await?;
        let aggregates = aggregate_many(&entries, &cycles);
        println!("{}", render::cycles_table(&cycles, &aggregates, self.locator.today()));
        Ok(())
    }

    fn schedule(&self, args: ScheduleArgs) -> Result<()> {
        let rows = initial_schedule(self.locator.calendar(), args.count)?;
        println!("{}", render::schedule_table(&rows));
        Ok(())
    }

    async fn selected_entries(
        &self,
        store: &Store,
        period: PeriodSelection,
    ) -> Result<(Vec<calendar::WorkCycle>, Vec<FinancialEntry>)> {
        let cycles = period.select_cycles(
            &self.locator,
            self.config.calendar.window_size,
            self.config.analytics.recent_cycles,
        )?;
        let entries = self.entries(store).await?;
        Ok((cycles, entries))
    }

    async fn report(&self, store: &Store, args: PeriodArgs) -> Result<()> {
        let (cycles, entries) = self.selected_entries(store, args.period).await?;
        let aggregates = aggregate_many(&entries, &cycles);
        if aggregates.is_empty() {
            println!("No entries in the {} period.", args.period);
            return Ok(());
        }

        println!("{}", render::aggregates_table(&aggregates));
        let summary = summarize(&aggregates);
        println!("{}", render::summary_table(&summary));
        for line in render::insight_lines(&portfolio_insights(&summary, &self.config.analytics.insights)) {
            println!("{line}");
        }
        Ok(())
    }

    async fn categories(&self, store: &Store, args: PeriodArgs) -> Result<()> {
        let (cycles, entries) = self.selected_entries(store, args.period).await?;
        let in_period = entries
            .iter()
            .filter(|entry| cycles.iter().any(|cycle| cycle.contains(entry.date)));
        let breakdown = category_breakdown(in_period);

        println!("{}", render::categories_table(&breakdown));
        for line in render::insight_lines(&category_insights(&breakdown, &self.config.analytics.insights)) {
            println!("{line}");
        }
        Ok(())
    }

    async fn month(&self, store: &Store, args: MonthArgs) -> Result<()> {
        let today = self.locator.today();
        let year = args.year.unwrap_or(today.year());
        let month = args.month.unwrap_or(today.month());

        let entries = self.entries(store).await?;
        let series = month_series(&entries, year, month)?;
        let totals = month_totals(&entries, year, month)?;
        println!("{}", render::month_table(&series, &totals));
        Ok(())
    }

    async fn list(&self, store: &Store, args: ListArgs) -> Result<()> {
        let mut entries = self.entries(store).await?;
        if let Some(limit) = args.limit {
            entries.truncate(limit);
        }
        println!("{}", render::entries_table(&entries));
        Ok(())
    }

    async fn add(&self, store: &Store, args: AddArgs) -> Result<()> {
        let entry = NewEntry {
            entry_type: args.entry_type,
            category: args.category,
            amount: args.amount,
            date: args.date.unwrap_or(self.locator.today()),
            description: args.description,
        };
        let created = store.repo().create_entry(entry).await.context("Failed to add entry")?;
        store.persist().await?;

        match self.locator.cycle_for_date(created.date)? {
            Some(cycle) => println!("Added {} to {}", created.id, cycle.label()),
            None => println!("Added {} (before the cycle system starts)", created.id),
        }
        Ok(())
    }

    async fn update(&self, store: &Store, args: UpdateArgs) -> Result<()> {
        let id = args.id;
        let patch = args.into_patch();
        if patch.is_empty() {
            bail!("Nothing to update; pass at least one field");
        }
        let updated = store
            .repo()
            .update_entry(id, patch)
            .await
            .with_context(|| format!("Failed to update entry {id}"))?;
        store.persist().await?;
        println!("{}", render::entries_table(std::slice::from_ref(&updated)));
        Ok(())
    }

    async fn delete(&self, store: &Store, args: DeleteArgs) -> Result<()> {
        if !store.repo().delete_entry(args.id).await? {
            bail!("No entry with id {}", args.id);
        }
        store.persist().await?;
        println!("Deleted {}", args.id);
        Ok(())
    }

    async fn export(&self, store: &Store, args: ExportArgs) -> Result<()> {
        let entries = self.entries(store).await?;
        let json = serde_json::to_string_pretty(&entries)?;
        match args.output {
            Some(path) => {
                tokio::fs::write(&path, json)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                tracing::info!(path = %path.display(), count = entries.len(), "Exported entries");
            }
            None => println!("{json}"),
        }
        Ok(())
    }

    async fn watch(&self, store: &Store) -> Result<()> {
        if self.config.storage.backend == StorageBackend::Memory {
            println!("The memory backend only sees changes made by this process.");
        }
        let subscription = subscribe_to_changes(store.repo(), |event: &EntryEvent| {
            println!("{}", describe(event));
        });
        println!("Watching for entry changes. Press Ctrl-C to stop.");

        tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
        subscription.unsubscribe();
        Ok(())
    }
}

fn describe(event: &EntryEvent) -> String {
    match event {
        EntryEvent::Created(entry) => format!("created {} ({} {})", entry.id, entry.entry_type, render::money(entry.amount)),
        EntryEvent::Updated(entry) => format!("updated {}", entry.id),
        EntryEvent::Deleted { id } => format!("deleted {id}"),
        EntryEvent::RemoteChange(change) => match change.id {
            Some(id) => format!("{} {id}", change.operation.to_lowercase()),
            None => change.operation.to_lowercase(),
        },
        EntryEvent::Resync => "missed some changes; reload".to_string(),
    }
}
