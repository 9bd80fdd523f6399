use anyhow::{bail, Context};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

use studio_manager::{
    agenda::{balance, AppointmentBook, FilterMode, Notice},
    storage::{config::Config, ExpenseStore, ServiceStore, SqliteStore},
    studio::{find_service, format_cents, parse_cents, Appointment, Expense, Service},
    sync::GoogleCalendarExporter,
};

use crate::sample_appointments::add_sample_appointments;

pub const USAGE: &str = "\
Usage: studio-manager [--sample] <command>

Commands:
  agenda [today|week|month|all]
  book <YYYY-MM-DD> <HH:MM> <service> <client>
       [--price N] [--phone P] [--duration MIN] [--residence]
  delete <number> [today|week|month|all]
  sync
  services
  add-service <name> <price> [duration-minutes]
  expenses
  add-expense <name> <amount> [YYYY-MM-DD]
  balance [today|week|month|all]";

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command: Command,
    pub sample: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Agenda(Option<FilterMode>),
    Book(BookRequest),
    Delete { number: usize, mode: Option<FilterMode> },
    Sync,
    Services,
    AddService { name: String, price_cents: u64, duration_minutes: u32 },
    Expenses,
    AddExpense { name: String, amount_cents: u64, date: Option<NaiveDate> },
    Balance(Option<FilterMode>),
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookRequest {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub service: String,
    pub client: String,
    pub price_cents: Option<u64>,
    pub phone: Option<String>,
    pub duration_minutes: Option<u32>,
    pub in_residence: bool,
}

pub fn parse_cli_command<I>(args: I) -> Result<Invocation, String>
where
    I: IntoIterator<Item = String>,
{
    let mut sample = false;
    let mut words = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--sample" => sample = true,
            "--help" | "-h" => words.insert(0, "help".to_string()),
            _ => words.push(arg),
        }
    }

    let mut words = words.into_iter();
    let command = match words.next().as_deref() {
        None => Command::Agenda(None),
        Some("help") => Command::Help,
        Some("agenda") => Command::Agenda(optional_mode(words.next())?),
        Some("balance") => Command::Balance(optional_mode(words.next())?),
        Some("sync") => Command::Sync,
        Some("services") => Command::Services,
        Some("expenses") => Command::Expenses,
        Some("delete") => {
            let number = required(words.next(), "appointment number")?;
            let number = number
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("Invalid appointment number '{}'.", number))?;
            Command::Delete { number, mode: optional_mode(words.next())? }
        }
        Some("add-service") => {
            let name = required(words.next(), "service name")?;
            let price_cents = amount(&required(words.next(), "price")?)?;
            let duration_minutes = match words.next() {
                Some(value) => minutes(&value)?,
                None => 60,
            };
            Command::AddService { name, price_cents, duration_minutes }
        }
        Some("add-expense") => {
            let name = required(words.next(), "expense name")?;
            let amount_cents = amount(&required(words.next(), "amount")?)?;
            let date = words.next().map(|value| date(&value)).transpose()?;
            Command::AddExpense { name, amount_cents, date }
        }
        Some("book") => Command::Book(parse_book(&mut words)?),
        Some(other) => return Err(format!("Unknown command: {}", other)),
    };

    if let Some(extra) = words.next() {
        return Err(format!("Unexpected argument: {}", extra));
    }

    Ok(Invocation { command, sample })
}

fn parse_book(words: &mut impl Iterator<Item = String>) -> Result<BookRequest, String> {
    let date = date(&required(words.next(), "date")?)?;
    let time_str = required(words.next(), "time")?;
    let time = NaiveTime::parse_from_str(&time_str, "%H:%M")
        .map_err(|_| format!("Invalid time '{}'. Use HH:MM.", time_str))?;
    let service = required(words.next(), "service")?;
    let client = required(words.next(), "client name")?;

    let mut request = BookRequest {
        date,
        time,
        service,
        client,
        price_cents: None,
        phone: None,
        duration_minutes: None,
        in_residence: false,
    };

    while let Some(flag) = words.next() {
        match flag.as_str() {
            "--price" => request.price_cents = Some(amount(&required(words.next(), "price")?)?),
            "--phone" => request.phone = Some(required(words.next(), "phone")?),
            "--duration" => {
                request.duration_minutes = Some(minutes(&required(words.next(), "duration")?)?)
            }
            "--residence" => request.in_residence = true,
            other => return Err(format!("Unknown option for book: {}", other)),
        }
    }

    Ok(request)
}

fn required(value: Option<String>, what: &str) -> Result<String, String> {
    value.ok_or_else(|| format!("Missing {}.", what))
}

fn optional_mode(value: Option<String>) -> Result<Option<FilterMode>, String> {
    value.map(|v| v.parse()).transpose()
}

fn amount(value: &str) -> Result<u64, String> {
    parse_cents(value).ok_or_else(|| format!("Invalid amount '{}'.", value))
}

fn minutes(value: &str) -> Result<u32, String> {
    value
        .parse()
        .map_err(|_| format!("Invalid duration '{}'. Use whole minutes.", value))
}

fn date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Use YYYY-MM-DD.", value))
}

pub async fn run_command(invocation: Invocation) -> anyhow::Result<()> {
    if invocation.command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = Config::load_or_create().context("Failed to load configuration")?;
    let store = SqliteStore::open(&config.storage.database_path).with_context(|| {
        format!("Failed to open database {}", config.storage.database_path.display())
    })?;

    if invocation.sample {
        add_sample_appointments(&store).context("Failed to seed sample appointments")?;
    }

    let now = Local::now();
    let week_start = config.agenda.first_day_of_week;
    let default_mode = config.agenda.default_filter;

    match invocation.command {
        Command::Help => {}
        Command::Agenda(mode) => {
            let mut book = AppointmentBook::new(store, week_start)
                .with_filter(mode.unwrap_or(default_mode));
            let loaded = book.refresh(&now).map(|visible| visible.len());
            match loaded {
                Ok(_) => print_agenda(book.mode(), book.appointments()),
                Err(e) => {
                    tracing::error!("Failed to load appointments: {}", e);
                    print_notice(&Notice::from(&e));
                }
            }
        }
        Command::Delete { number, mode } => {
            let mut book = AppointmentBook::new(store, week_start)
                .with_filter(mode.unwrap_or(default_mode));
            book.refresh(&now).context("Failed to load appointments")?;
            match book.remove(number - 1) {
                Ok(removed) => print_notice(&Notice::Success(format!(
                    "Removed appointment with {} on {}.",
                    removed.client_name,
                    local_time(&removed.date).format("%Y-%m-%d %H:%M")
                ))),
                Err(e) => print_notice(&Notice::from(&e)),
            }
        }
        Command::Sync => {
            let exporter = GoogleCalendarExporter::from_config(&config.calendar).with_context(|| {
                format!("Set calendar.access_token in {}", Config::config_path().display())
            })?;
            let mut book = AppointmentBook::new(store, week_start).with_filter(default_mode);
            book.refresh(&now).context("Failed to load appointments")?;
            let result = book.sync_to_calendar(&exporter, &now).await;
            print_notice(&Notice::for_sync(&result));
        }
        Command::Book(request) => book_appointment(&store, request)?,
        Command::Services => {
            let services = store.list_services().context("Failed to load services")?;
            if services.is_empty() {
                println!("No services yet. Add one with add-service.");
            }
            for service in services {
                println!(
                    "{:<24} {:>9}  {} min",
                    service.name,
                    format_cents(service.price_cents),
                    service.duration_minutes
                );
            }
        }
        Command::AddService { name, price_cents, duration_minutes } => {
            let service = Service::new(name, price_cents, duration_minutes);
            store.upsert_service(&service).context("Failed to save service")?;
            print_notice(&Notice::Success(format!("Added service {}.", service.name)));
        }
        Command::Expenses => {
            let expenses = store.list_expenses().context("Failed to load expenses")?;
            if expenses.is_empty() {
                println!("No expenses recorded.");
            }
            for expense in expenses {
                println!(
                    "{}  {:<24} {:>9}",
                    local_time(&expense.date).format("%Y-%m-%d"),
                    expense.name,
                    format_cents(expense.amount_cents)
                );
            }
        }
        Command::AddExpense { name, amount_cents, date } => {
            let date = match date {
                Some(day) => local_to_utc(day, NaiveTime::MIN)?,
                None => now.with_timezone(&Utc),
            };
            let expense = Expense::new(name, date, amount_cents);
            store.upsert_expense(&expense).context("Failed to save expense")?;
            print_notice(&Notice::Success(format!("Recorded expense {}.", expense.name)));
        }
        Command::Balance(mode) => {
            let mode = mode.unwrap_or(default_mode);
            let mut book = AppointmentBook::new(store, week_start).with_filter(FilterMode::All);
            book.refresh(&now).context("Failed to load appointments")?;
            let expenses = book.store().list_expenses().context("Failed to load expenses")?;
            let result = balance(mode, book.all_appointments(), &expenses, &now, week_start);
            println!("Balance ({})", mode);
            println!("  Appointments: {}", result.appointment_count);
            println!("  Income:       {:>9}", format_cents(result.income_cents));
            println!("  Expenses:     {:>9}", format_cents(result.expense_cents));
            let net = result.net_cents();
            let sign = if net < 0 { "-" } else { "" };
            let net_label = format!("{}{}", sign, format_cents(net.unsigned_abs()));
            println!("  Net:          {:>9}", net_label);
        }
    }

    Ok(())
}

fn book_appointment(store: &SqliteStore, request: BookRequest) -> anyhow::Result<()> {
    use studio_manager::storage::AppointmentStore;

    let services = store.list_services().context("Failed to load services")?;
    let service = find_service(&services, &request.service);

    let price_cents = match (request.price_cents, service) {
        (Some(price), _) => price,
        (None, Some(service)) => service.price_cents,
        (None, None) => bail!(
            "Unknown service '{}'. Pass --price or add it with add-service.",
            request.service
        ),
    };
    let duration_minutes = request
        .duration_minutes
        .or(service.map(|s| s.duration_minutes))
        .unwrap_or(0);
    let service_type = service.map(|s| s.name.clone()).unwrap_or(request.service);

    let start = local_to_utc(request.date, request.time)?;
    let mut appointment = Appointment::new(start, service_type, price_cents, request.client)
        .with_duration_minutes(duration_minutes)
        .in_residence(request.in_residence);
    if let Some(phone) = request.phone {
        appointment = appointment.with_phone(phone);
    }

    store.upsert_appointment(&appointment).context("Failed to save appointment")?;
    tracing::info!("Booked appointment {}", appointment.id);
    print_notice(&Notice::Success(format!(
        "Booked {} for {} on {}.",
        appointment.service_type,
        appointment.client_name,
        local_time(&appointment.date).format("%Y-%m-%d %H:%M")
    )));
    Ok(())
}

fn local_to_utc(date: NaiveDate, time: NaiveTime) -> anyhow::Result<DateTime<Utc>> {
    let naive = date.and_time(time);
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => Ok(local.with_timezone(&Utc)),
        None => bail!("{} does not exist in the local time zone", naive),
    }
}

fn local_time(instant: &DateTime<Utc>) -> DateTime<Local> {
    instant.with_timezone(&Local)
}

fn print_agenda(mode: FilterMode, appointments: &[Appointment]) {
    println!("Appointments – {}", mode);
    println!();

    if appointments.is_empty() {
        println!("No appointments scheduled.");
        return;
    }

    for (position, appointment) in appointments.iter().enumerate() {
        println!("{:>3}. {}", position + 1, build_agenda_line(appointment));
    }
}

fn build_agenda_line(appointment: &Appointment) -> String {
    let start = local_time(&appointment.date);
    let mut line = format!(
        "{}  {} - {} ({})",
        start.format("%a %Y-%m-%d %H:%M"),
        appointment.service_type,
        appointment.client_name,
        format_cents(appointment.price_cents)
    );
    if let Some(phone) = &appointment.client_phone {
        line.push_str(&format!(" tel. {}", phone));
    }
    if appointment.in_residence {
        line.push_str(" [residence]");
    }
    if appointment.added_to_calendar {
        line.push_str(" [in calendar]");
    }
    line
}

fn print_notice(notice: &Notice) {
    match notice {
        Notice::Error(text) => eprintln!("{}", text),
        Notice::Success(text) => println!("{}", text),
    }
}
