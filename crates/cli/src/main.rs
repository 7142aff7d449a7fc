mod prompt;
mod render;

use anyhow::Context;
use clap::{Parser, Subcommand};
use clinic_core::config::backend_url_from_env_value;
use clinic_core::constants::BACKEND_URL_ENV;
use clinic_core::format::{iso_to_datetime_local, parse_datetime_local};
use clinic_core::models::VisitStatus;
use clinic_core::validation::local_now;
use clinic_core::views::{
    PatientDetailView, PatientForm, PatientListView, Screen, StatusFilter, VisitForm,
};
use clinic_core::{ApiClient, AppStore, ClientConfig, Prompter, Route};
use prompt::TerminalPrompter;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic administration CLI")]
struct Cli {
    /// Backend root URL (default: $CLINIC_BACKEND_URL or http://localhost:3001)
    #[arg(long, global = true)]
    backend_url: Option<String>,
    /// Answer yes to every confirmation
    #[arg(long, short = 'y', global = true)]
    yes: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List patients, one page at a time
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        /// Filter by first or last name
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a patient card with their visits
    Show {
        /// Patient ID
        id: String,
        /// Only visits with this status (SCHEDULED, COMPLETED, CANCELED or all)
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// Only visits on this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Open a client route, e.g. /patients/<id>
    Open {
        path: String,
    },
    /// Add a patient
    AddPatient {
        first_name: String,
        last_name: String,
        /// Date of birth (YYYY-MM-DD)
        date_of_birth: String,
        phone_number: String,
        email: String,
    },
    /// Edit a patient; omitted fields keep their current value
    EditPatient {
        /// Patient ID
        id: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        date_of_birth: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete a patient and all of their visits
    DeletePatient {
        /// Patient ID
        id: String,
    },
    /// Add a visit
    AddVisit {
        /// Patient ID
        patient_id: String,
        /// Local date and time (YYYY-MM-DDTHH:MM) or an ISO timestamp, not in the past
        visit_date: String,
        diagnosis: String,
        treatment: String,
        #[arg(long, default_value_t = VisitStatus::Scheduled)]
        status: VisitStatus,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit a visit; omitted fields keep their current value
    EditVisit {
        /// Patient ID
        patient_id: String,
        /// Visit ID
        visit_id: String,
        /// Local date and time (YYYY-MM-DDTHH:MM) or an ISO timestamp
        #[arg(long)]
        visit_date: Option<String>,
        #[arg(long)]
        diagnosis: Option<String>,
        #[arg(long)]
        treatment: Option<String>,
        #[arg(long)]
        status: Option<VisitStatus>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a visit
    DeleteVisit {
        /// Patient ID
        patient_id: String,
        /// Visit ID
        visit_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let backend_url = cli
        .backend_url
        .unwrap_or_else(|| backend_url_from_env_value(std::env::var(BACKEND_URL_ENV).ok()));
    let cfg = ClientConfig::for_backend(&backend_url).context("invalid backend URL")?;
    tracing::debug!(api_base = %cfg.api_base(), "using backend");

    let client = ApiClient::new(Arc::new(cfg));
    let app = AppStore::new(client.clone());
    let prompter: Arc<dyn Prompter> = Arc::new(TerminalPrompter::new(cli.yes));

    match cli.command {
        Some(Commands::List {
            page,
            limit,
            search,
        }) => {
            app.patients
                .fetch_patients(Some(page), Some(limit), search)
                .await?;
            print!("{}", render::patient_table(&app.patients.snapshot()));
        }
        Some(Commands::Show { id, status, date }) => {
            show_patient(&client, prompter, &id, status, date).await?;
        }
        Some(Commands::Open { path }) => match Route::resolve(&path) {
            Route::Patients => {
                let view = PatientListView::new(&app, prompter);
                view.load().await?;
                print!("{}", render::patient_table(&view.store().snapshot()));
            }
            Route::PatientDetail(id) => {
                show_patient(&client, prompter, &id, StatusFilter::All, None).await?;
            }
            Route::Contacts => println!("Контакты клиники"),
        },
        Some(Commands::AddPatient {
            first_name,
            last_name,
            date_of_birth,
            phone_number,
            email,
        }) => {
            let form = PatientForm {
                first_name,
                last_name,
                date_of_birth,
                phone_number,
                email,
            };
            let view = PatientListView::new(&app, prompter);
            let patient = view.create_patient(&form).await?;
            println!("ID: {}", patient.id);
        }
        Some(Commands::EditPatient {
            id,
            first_name,
            last_name,
            date_of_birth,
            phone_number,
            email,
        }) => {
            let view = PatientDetailView::new(client, prompter, id);
            view.load().await?;
            let mut form = view.edit_form().context("patient not found")?;
            override_with(&mut form.first_name, first_name);
            override_with(&mut form.last_name, last_name);
            override_with(&mut form.date_of_birth, date_of_birth);
            override_with(&mut form.phone_number, phone_number);
            override_with(&mut form.email, email);
            let patient = view.update_patient(&form).await?;
            print!("{}", render::patient_card(&patient));
        }
        Some(Commands::DeletePatient { id }) => {
            let view = PatientListView::new(&app, prompter);
            if !view.delete_patient(&id).await? {
                println!("Отменено.");
            }
        }
        Some(Commands::AddVisit {
            patient_id,
            visit_date,
            diagnosis,
            treatment,
            status,
            notes,
        }) => {
            let view = PatientDetailView::new(client, prompter, patient_id);
            let mut form = VisitForm::for_new_visit(local_now());
            form.set_visit_date(visit_date_input(visit_date), local_now())?;
            form.diagnosis = diagnosis;
            form.treatment = treatment;
            form.status = status;
            form.notes = notes.unwrap_or_default();
            let visit = view.visits().add_visit(&form).await?;
            println!("ID: {}", visit.id);
        }
        Some(Commands::EditVisit {
            patient_id,
            visit_id,
            visit_date,
            diagnosis,
            treatment,
            status,
            notes,
        }) => {
            let view = PatientDetailView::new(client, prompter, patient_id);
            view.load().await?;
            let visits = view.visits();
            let current = visits
                .snapshot()
                .visits
                .into_iter()
                .find(|v| v.id == visit_id)
                .with_context(|| format!("visit {visit_id} not found"))?;

            let mut form = VisitForm::from_visit(&current);
            override_with(&mut form.visit_date, visit_date.map(visit_date_input));
            override_with(&mut form.diagnosis, diagnosis);
            override_with(&mut form.treatment, treatment);
            override_with(&mut form.notes, notes);
            if let Some(status) = status {
                form.status = status;
            }
            visits.update_visit(&visit_id, &form).await?;
        }
        Some(Commands::DeleteVisit {
            patient_id,
            visit_id,
        }) => {
            let view = PatientDetailView::new(client, prompter, patient_id);
            if !view.visits().delete_visit(&visit_id).await? {
                println!("Отменено.");
            }
        }
        None => {
            println!("No command given. Use --help for usage.");
        }
    }

    Ok(())
}

async fn show_patient(
    client: &ApiClient,
    prompter: Arc<dyn Prompter>,
    id: &str,
    status: StatusFilter,
    date: Option<String>,
) -> anyhow::Result<()> {
    let view = PatientDetailView::new(client.clone(), prompter, id);
    // The screen state carries the failure; it is printed below.
    let _ = view.load().await;

    match view.screen() {
        Screen::Loading => {}
        Screen::Failed(message) => anyhow::bail!("Ошибка! {message}"),
        Screen::NotFound => println!("{}", clinic_core::messages::PATIENT_NOT_FOUND),
        Screen::Ready(patient) => {
            print!("{}", render::patient_card(&patient));
            println!();

            let visits = view.visits();
            visits.set_status_filter(status);
            visits.set_date_filter(date.unwrap_or_default());
            print!(
                "{}",
                render::visit_table(&visits.displayed_visits(), visits.empty_message())
            );
        }
    }
    Ok(())
}

fn override_with(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

/// Accept either a `datetime-local` value or a full ISO timestamp for a visit date.
fn visit_date_input(value: String) -> String {
    if parse_datetime_local(&value).is_some() {
        value
    } else {
        iso_to_datetime_local(&value)
    }
}
