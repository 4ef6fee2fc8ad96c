use anyhow::{anyhow, bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use matri::catalog::CATALOG;
use matri::model::{AlertSeverity, MaternalStage, Profile, ProfilePatch};
use matri::resources::{ContactAction, EMERGENCY_RESOURCES, WARNING_SIGNS};
use matri::rules::select_content;
use matri::Matri;

#[derive(Parser)]
#[clap(name = "matri", version, about = "Maternal-health companion from the command line")]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and print alerts, appointments, check-ins and reading
    Summary {
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    /// Print the reading list for a stage, without signing in
    Content {
        /// pre-pregnancy, pregnancy or postpartum
        #[clap(long)]
        stage: Option<String>,
        /// Week of pregnancy, 1 to 42
        #[clap(long)]
        week: Option<u8>,
    },
    /// Print emergency hotlines and warning signs
    Resources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("matri=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Summary { email, password } => summary(&email, &password).await,
        Command::Content { stage, week } => content(stage.as_deref(), week),
        Command::Resources => {
            resources();
            Ok(())
        }
    }
}

async fn summary(email: &str, password: &str) -> anyhow::Result<()> {
    let matri = Matri::from_env().context("reading SUPABASE_URL and SUPABASE_ANON_KEY")?;
    let mut account = matri.account();
    let ctx = account.sign_in(email, password).await?;

    let mut store = matri.record_store();
    let report = store.load(&ctx).await;
    for failure in &report.failures {
        eprintln!("warning: {}", failure);
    }
    let profile = account.load_profile(&ctx).await?.cloned();

    let now = Utc::now();
    match &profile {
        Some(profile) => println!("{} ({})", profile.display_name, profile.stage_label()),
        None => println!("Your journey"),
    }

    let alert = store.safety_alert(now);
    if alert.triggered {
        let level = match alert.severity {
            AlertSeverity::Severe => "SEVERE",
            _ => "NOTICE",
        };
        let tags: Vec<&str> = alert.matched_tags.iter().map(|tag| tag.label()).collect();
        println!("\n[{}] {}\n  symptoms: {}", level, alert.message, tags.join(", "));
    }

    println!("\nUpcoming appointments");
    for appointment in store.upcoming_appointments(now.date_naive()) {
        println!(
            "  {} {}  {} ({})",
            appointment.date,
            appointment.time.format("%H:%M"),
            appointment.title,
            appointment.category.as_str()
        );
    }

    println!("\nRecent check-ins");
    for entry in store.recent_symptoms(now) {
        let tags: Vec<&str> = entry.tags.iter().map(|tag| tag.label()).collect();
        println!(
            "  {}  {}  {}",
            entry.logged_at.format("%Y-%m-%d %H:%M"),
            entry.mood.label(),
            tags.join(", ")
        );
    }

    println!("\nFor you");
    for item in store.educational_content(profile.as_ref()) {
        println!("  {} {}: {}", item.icon, item.title, item.description);
    }

    account.sign_out().await?;
    info!("done");
    Ok(())
}

fn content(stage: Option<&str>, week: Option<u8>) -> anyhow::Result<()> {
    let stage = stage
        .map(|raw| MaternalStage::parse(raw).ok_or_else(|| anyhow!("unknown stage {:?}", raw)))
        .transpose()?;
    if week.is_some() && stage.is_none() {
        bail!("--week needs --stage pregnancy");
    }

    let patch = ProfilePatch {
        stage,
        gestational_week: week,
        ..Default::default()
    };
    let profile = patch.apply_to(&Profile::new("local", "You"))?;

    println!("{}", profile.stage_label());
    for item in select_content(Some(&profile), &CATALOG) {
        println!("  {} {}: {}", item.icon, item.title, item.description);
    }
    Ok(())
}

fn resources() {
    for resource in EMERGENCY_RESOURCES.iter() {
        let reach = match resource.action() {
            ContactAction::Call(number) => format!("call {}", number),
            ContactAction::Text(instruction) => instruction,
        };
        let marker = if resource.urgent { "!" } else { " " };
        println!(
            "{} {:<20} {:<22} {}",
            marker, resource.title, reach, resource.description
        );
    }

    println!("\nContact your provider right away if you notice:");
    for sign in WARNING_SIGNS.iter() {
        println!("  - {}", sign);
    }
}
