use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use yansi::Paint;

use azadmin::api::{self, ApiContext, ApiError};
use azadmin::config::{self, DEFAULT_HOST, DEFAULT_PORT, SEARCH_DEBOUNCE};
use azadmin::models::{AppState, CredentialStore, Environment, RoleCode, UserCard, UserRecord};
use azadmin::routes::build_router;
use azadmin::services::debounce::SearchDebouncer;
use azadmin::services::forms::{parse_role_choice, validate_new_user, validate_upload};
use azadmin::services::session_gate::{self, GateDecision};
use azadmin::services::{load_credentials, persist_credentials, ConsoleView, OperationArgs, OperationKey};
use azadmin::utils::new_table;

fn http_client() -> reqwest::Client {
    match reqwest::Client::builder()
        .user_agent(format!("azadmin/{}", env!("CARGO_PKG_VERSION")))
        .build()
    {
        Ok(c) => c,
        Err(e) => fail("Failed to create HTTP client", e),
    }
}

fn build_state_from_env(env_file: Option<&str>) -> AppState {
    config::load_env_file(env_file);
    AppState::new(http_client(), config::get_api_base_url())
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    tracing::error!(%err, "{}", context);
    eprintln!("{}: {}", context.red(), err);
    process::exit(1);
}

async fn start_server(mut state: AppState, host: &str, port: u16, stylesheet: Option<String>) {
    if let Some(path) = stylesheet {
        match tokio::fs::read_to_string(&path).await {
            Ok(css) => {
                state.custom_css = Some(css);
                tracing::info!("Loaded custom stylesheet from {}", path);
            }
            Err(e) => fail(&format!("Failed to read custom stylesheet at {}", path), e),
        }
    }

    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => fail("Invalid host/port format", e),
    };
    tracing::info!(%addr, api = %state.api_base_url, "Starting admin console");
    let app = build_router(state);
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            println!("{} {}", "Web console running on".green(), format!("http://{}", addr).cyan());
            if let Err(e) = axum::serve(listener, app).await {
                fail("Server error", e);
            }
        }
        Err(e) => {
            eprintln!(
                "{}",
                "Stop the process using this port, or start the server with a different --port value.".yellow()
            );
            fail(&format!("Failed to bind to {}", addr), e);
        }
    }
}

/// CLI session: the shared client plus the file-backed credential store.
struct CliSession {
    client: reqwest::Client,
    base_url: String,
    path: PathBuf,
    store: CredentialStore,
}

impl CliSession {
    async fn open(env_file: Option<&str>) -> CliSession {
        config::load_env_file(env_file);
        let path = config::get_credentials_path();
        let store = load_credentials(&path).await;
        CliSession {
            client: http_client(),
            base_url: config::get_api_base_url(),
            path,
            store,
        }
    }

    fn anonymous(&self) -> ApiContext {
        ApiContext::new(self.client.clone(), &self.base_url, "")
    }

    /// Context for an authenticated command; exits when nobody is logged in.
    fn context(&self) -> ApiContext {
        match self.store.token() {
            Some(token) => ApiContext::new(self.client.clone(), &self.base_url, token),
            None => {
                eprintln!("{}", "Not logged in. Run `azadmin login <email> <password>` first.".red());
                process::exit(1);
            }
        }
    }

    async fn gate(&mut self) -> GateDecision {
        let decision = session_gate::evaluate(&self.client, &self.base_url, &mut self.store).await;
        self.save().await;
        decision
    }

    async fn save(&self) {
        if let Err(e) = persist_credentials(&self.path, &self.store).await {
            fail(&format!("Failed to write {}", self.path.display()), e);
        }
    }
}

fn print_users(users: &[UserRecord]) {
    if users.is_empty() {
        println!("{}", "No users found.".dim());
        return;
    }
    let mut table = new_table(&[
        "Email", "Role", "Enabled", "Last Login", "Queue Offset", "CPU", "GPU", "Memory", "Drive",
    ]);
    for user in users {
        let card = UserCard::from_record(user);
        table.add_row(vec![
            card.email.clone(),
            card.role_label.text.clone(),
            if card.is_enabled { "yes".to_string() } else { "no".to_string() },
            card.last_login.clone(),
            card.queue_offset_text(),
            card.cpu.clone(),
            card.gpu.clone(),
            card.memory.clone(),
            card.drive.clone(),
        ]);
    }
    println!("\n{table}\n");
}

fn print_view_header(view: &ConsoleView) {
    println!("{}", view.title.as_str().bold());
    if !view.meta.is_empty() {
        println!("{}", view.meta.as_str().dim());
    }
}

/// Status line of a finished operation; failures exit non-zero.
fn finish_view(view: &ConsoleView) {
    match &view.error {
        Some(err) => {
            eprintln!("{}", err.as_str().red());
            process::exit(1);
        }
        None => println!("{}", view.status.as_str().green()),
    }
}

fn print_charts(view: &ConsoleView) {
    let distribution = view.distribution();
    let user_count = view.users.as_ref().map(Vec::len).unwrap_or(0);
    if user_count == 0 {
        println!("{}", azadmin::services::charts::EMPTY_PLACEHOLDER.dim());
        return;
    }
    println!("{} users", user_count);
    for chart in distribution.charts() {
        let mut table = new_table(&[chart.title, "Users", "Share"]);
        for seg in &chart.segments {
            table.add_row(vec![seg.label.clone(), seg.value.to_string(), format!("{}%", seg.percent)]);
        }
        println!("\n{table}");
    }
    println!();
}

fn print_resources(view: &ConsoleView) {
    let Some(overview) = &view.resources else {
        return;
    };
    for env in &overview.environments {
        println!("\n{}", env.env.title().bold());
        match env.listing.error_text() {
            Some(err) => println!("{}", err.red()),
            None if env.listing.items().is_empty() => println!("{}", "No resources found.".dim()),
            None => {
                for item in env.listing.items() {
                    println!("  {}", item);
                }
            }
        }
    }
    println!();
}

/// Re-read a user after a mutation and show what the backend now holds.
async fn show_refreshed(ctx: &ApiContext, email: &str) {
    match api::users::refresh_user(ctx, email).await {
        Ok(Some(user)) => print_users(std::slice::from_ref(&user)),
        Ok(None) => println!("{} {}", "No user matches".dim(), email),
        Err(e) => eprintln!("{}: {}", "Failed to reload user".yellow(), e),
    }
}

fn mutation_outcome(result: Result<(), ApiError>, done: String, failed: &str) {
    match result {
        Ok(()) => println!("{}", done.green()),
        Err(e) => fail(failed, e.detail()),
    }
}

fn redraw_prompt(query: &str) -> std::io::Result<()> {
    use crossterm::{cursor::MoveToColumn, execute, terminal::{Clear, ClearType}};
    let mut out = std::io::stdout();
    execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    write!(out, "{} {}", "search>".cyan(), query)?;
    out.flush()
}

type SearchOutcome = (u64, String, Result<Vec<UserRecord>, ApiError>);

/// Live search: each keystroke restarts the debounce, Enter fires at once,
/// Esc or Ctrl-C leaves. Results from superseded searches are dropped.
async fn interactive_search(ctx: ApiContext) -> std::io::Result<()> {
    use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
    use crossterm::terminal;

    api::set_silent(true);
    let (mut debouncer, mut requests) = SearchDebouncer::new(SEARCH_DEBOUNCE);
    let board = debouncer.tickets();
    let (results_tx, mut results) = mpsc::unbounded_channel::<SearchOutcome>();
    let mut events = EventStream::new();
    let mut query = String::new();

    println!("{}", "Type to search by email. Enter searches now, Esc quits.".dim());
    terminal::enable_raw_mode()?;
    redraw_prompt(&query)?;
    loop {
        tokio::select! {
            event = events.next() => match event {
                None => break,
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Terminal event error");
                    break;
                }
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match key.code {
                        KeyCode::Esc => break,
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                        KeyCode::Enter => {
                            debouncer.submit(query.clone());
                        }
                        KeyCode::Backspace => {
                            query.pop();
                            debouncer.input(query.clone());
                        }
                        KeyCode::Char(c) => {
                            query.push(c);
                            debouncer.input(query.clone());
                        }
                        _ => {}
                    }
                    redraw_prompt(&query)?;
                }
                Some(Ok(_)) => {}
            },
            Some(request) = requests.recv() => {
                let ctx = ctx.clone();
                let tx = results_tx.clone();
                tokio::spawn(async move {
                    let result = api::users::list_users(&ctx, &request.query).await;
                    let _ = tx.send((request.ticket, request.query, result));
                });
            }
            Some((ticket, searched, result)) = results.recv() => {
                if !board.is_current(ticket) {
                    tracing::debug!(ticket, "Dropping stale search result");
                    continue;
                }
                terminal::disable_raw_mode()?;
                println!();
                println!("{}", OperationKey::ListUsers.output_title_with(Some(&searched)).bold());
                match result {
                    Ok(users) => print_users(&azadmin::models::operators_first(users)),
                    Err(e) => eprintln!("{}", e.to_string().red()),
                }
                terminal::enable_raw_mode()?;
                redraw_prompt(&query)?;
            }
        }
    }
    debouncer.cancel();
    terminal::disable_raw_mode()?;
    println!();
    Ok(())
}

#[derive(Parser)]
#[command(
    name = "azadmin",
    author,
    version,
    about = "Admin console for the Azaion user-management backend",
    long_about = r#"azadmin — manage users, hardware bindings and deployment resources of the Azaion backend.

Run the web console with `azadmin serve`, or use the commands below directly from a terminal.
Only Admin (40) and ApiAdmin (1000) accounts are admitted.

Examples:
  1) Web console:
      azadmin serve --host 127.0.0.1 --port 8080
  2) Sign in and list operators:
      azadmin login admin@example.com secret
      azadmin users list --search ops
  3) Fetch the staging installer:
      azadmin resources download --stage --dir ./downloads
"#,
    after_help = "Use `azadmin <subcommand> --help` to get subcommand specific options and usage examples."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Disable request/response logging
    #[arg(long, global = true)]
    silent: bool,
    /// Path to .env file
    #[arg(long, global = true)]
    env_file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web console
    Serve {
        /// Host to bind to
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Path to a custom stylesheet to serve instead of the default
        #[arg(long)]
        stylesheet: Option<String>,
    },
    /// Validate configuration and the stored session
    #[command(long_about = "Check API_BASE_URL and, when a session is stored, probe /currentuser with it.")]
    CheckConfig,
    /// Sign in and store the session token
    Login { email: String, password: String },
    /// Forget the stored session
    Logout,
    /// Show the signed-in account (re-checks its role)
    Whoami,
    /// Manage backend users
    Users {
        #[command(subcommand)]
        sub: UserCommands,
    },
    /// Hardware distribution of all users (CPU, GPU, memory)
    Charts,
    /// Deployment resources of both environments
    Resources {
        #[command(subcommand)]
        sub: ResourceCommands,
    },
    /// Upload a file into a backend folder
    Upload { file: PathBuf, folder: String },
    /// Remove every file from a backend folder
    #[command(long_about = "Permanently delete all files in a folder. Requires `--confirm CLEAR`.")]
    ClearFolder {
        folder: String,
        /// Type CLEAR to confirm
        #[arg(long, default_value = "")]
        confirm: String,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// List users, optionally filtered by email
    List {
        #[arg(long, short = 's', default_value = "")]
        search: String,
    },
    /// Interactive search; results refresh as you type
    Search,
    /// Full record of the signed-in account
    Current,
    /// Create a user
    Create {
        email: String,
        password: String,
        /// Role code (0, 10, 20, 30, 40, 50, 1000)
        #[arg(long, default_value = "")]
        role: String,
    },
    Enable { email: String },
    Disable { email: String },
    Delete { email: String },
    /// Clear the user's hardware binding
    ResetHardware { email: String },
    /// Change the user's role
    SetRole { email: String, code: String },
}

#[derive(Subcommand)]
enum ResourceCommands {
    /// List resources of both environments
    List,
    /// Download an installer
    Download {
        /// Use the staging environment
        #[arg(long)]
        stage: bool,
        /// Target directory (defaults to AZADMIN_DOWNLOAD_DIR)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

async fn run_users(session: &CliSession, sub: UserCommands) {
    match sub {
        UserCommands::List { search } => {
            let search = search.trim().to_string();
            let view = azadmin::services::run(OperationKey::ListUsers, &session.context(), OperationArgs::Search(search)).await;
            print_view_header(&view);
            print_users(view.users.as_deref().unwrap_or(&[]));
            finish_view(&view);
        }
        UserCommands::Search => {
            if let Err(e) = interactive_search(session.context()).await {
                let _ = crossterm::terminal::disable_raw_mode();
                fail("Interactive search failed", e);
            }
        }
        UserCommands::Current => {
            let view = azadmin::services::run(OperationKey::CurrentUser, &session.context(), OperationArgs::None).await;
            print_view_header(&view);
            print_users(view.users.as_deref().unwrap_or(&[]));
            finish_view(&view);
        }
        UserCommands::Create { email, password, role } => {
            let new_user = match validate_new_user(&email, &password, &role) {
                Ok(u) => u,
                Err(e) => fail("Invalid input", e),
            };
            let ctx = session.context();
            if let Err(e) = api::users::create_user(&ctx, &new_user.email, &new_user.password, new_user.role).await {
                fail("Failed to create user", e.detail());
            }
            println!("{}", "User created successfully!".green());
            show_refreshed(&ctx, &new_user.email).await;
        }
        UserCommands::Enable { email } => {
            let ctx = session.context();
            mutation_outcome(api::users::set_enabled(&ctx, &email, true).await, format!("User enabled: {}", email), "Failed to enable user");
            show_refreshed(&ctx, &email).await;
        }
        UserCommands::Disable { email } => {
            let ctx = session.context();
            mutation_outcome(api::users::set_enabled(&ctx, &email, false).await, format!("User disabled: {}", email), "Failed to disable user");
            show_refreshed(&ctx, &email).await;
        }
        UserCommands::Delete { email } => {
            let ctx = session.context();
            mutation_outcome(api::users::delete_user(&ctx, &email).await, format!("User deleted: {}", email), "Failed to delete user");
            show_refreshed(&ctx, &email).await;
        }
        UserCommands::ResetHardware { email } => {
            let ctx = session.context();
            mutation_outcome(api::users::reset_hardware(&ctx, &email).await, format!("Hardware reset for {}", email), "Failed to reset hardware");
            show_refreshed(&ctx, &email).await;
        }
        UserCommands::SetRole { email, code } => {
            let role = match parse_role_choice(&code) {
                Ok(r) if r != RoleCode::NONE || code.trim() == "0" => r,
                Ok(_) => fail("Invalid input", "role code is required"),
                Err(e) => fail("Invalid input", e),
            };
            let ctx = session.context();
            mutation_outcome(
                api::users::set_role(&ctx, &email, role).await,
                format!("Role of {} set to {}", email, role.label().text),
                "Failed to update role",
            );
            show_refreshed(&ctx, &email).await;
        }
    }
}

async fn run_resources(session: &CliSession, sub: ResourceCommands) {
    match sub {
        ResourceCommands::List => {
            let view = azadmin::services::run(OperationKey::ListResources, &session.context(), OperationArgs::None).await;
            print_view_header(&view);
            print_resources(&view);
            let failures = view.resources.as_ref().map(|o| o.failures()).unwrap_or(0);
            if failures == Environment::ALL.len() {
                eprintln!("{}", "Both environments failed to load".red());
                process::exit(1);
            }
        }
        ResourceCommands::Download { stage, dir } => {
            let env = if stage { Environment::Stage } else { Environment::Prod };
            let dir = dir.unwrap_or_else(config::get_download_dir);
            match api::resources::download_installer(&session.context(), env, &dir, true).await {
                Ok(path) => println!("{} {}", "Installer saved to".green(), path.display().to_string().cyan()),
                Err(e) => fail("Download failed", e),
            }
        }
    }
}

async fn upload(session: &CliSession, file: &Path, folder: &str) {
    let name = file.file_name().map(|n| n.to_string_lossy().into_owned());
    let folder = match validate_upload(name.as_deref(), folder) {
        Ok(f) => f,
        Err(e) => fail("Invalid input", e),
    };
    match api::files::upload_path(&session.context(), file, &folder).await {
        Ok(_) => println!(
            "{}",
            format!("File \"{}\" uploaded to \"{}\" successfully!", name.unwrap_or_default(), folder).green()
        ),
        Err(e) => fail("Failed to upload file", e),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }
    if cli.silent {
        api::set_silent(true);
    }
    let env_file = cli.env_file.as_deref();

    let Some(command) = cli.command else {
        let state = build_state_from_env(env_file);
        start_server(state, DEFAULT_HOST, DEFAULT_PORT, None).await;
        return;
    };

    match command {
        Commands::Serve { host, port, stylesheet } => {
            let state = build_state_from_env(env_file);
            start_server(state, &host, port, stylesheet).await;
        }
        Commands::CheckConfig => {
            let mut session = CliSession::open(env_file).await;
            println!("{} {}", "API_BASE_URL:".bold(), session.base_url);
            println!("{} {}", "Credential file:".bold(), session.path.display());
            if session.store.is_empty() {
                println!("{}", "No stored session; run `azadmin login` to verify API access.".yellow());
                return;
            }
            match session.gate().await {
                GateDecision::Granted(user) => {
                    println!("{} {} ({})", "Configuration looks valid; signed in as".green(), user.email, user.role_text());
                }
                GateDecision::Denied(reason) => fail("Configuration appears invalid", reason),
            }
        }
        Commands::Login { email, password } => {
            let mut session = CliSession::open(env_file).await;
            let email = email.trim().to_string();
            if email.is_empty() || password.is_empty() {
                fail("Invalid input", azadmin::services::forms::FormError::MissingCredentials);
            }
            let response = match api::auth::login(&session.anonymous(), &email, &password).await {
                Ok(r) => r,
                Err(e) => fail("Login failed", api::auth::login_failure_message(&e)),
            };
            if !session.store.store_login(response) {
                fail("Login failed", "response did not contain a token");
            }
            match session.gate().await {
                GateDecision::Granted(user) => {
                    println!("{} {} ({})", "Logged in as".green(), user.email, user.role_text());
                }
                GateDecision::Denied(reason) => fail("Access denied", reason),
            }
        }
        Commands::Logout => {
            let mut session = CliSession::open(env_file).await;
            session.store.clear();
            session.save().await;
            println!("{}", "Logged out".green());
        }
        Commands::Whoami => {
            let mut session = CliSession::open(env_file).await;
            match session.gate().await {
                GateDecision::Granted(user) => {
                    let mut table = new_table(&["Email", "Role"]);
                    table.add_row(vec![user.email.clone(), user.role_text()]);
                    println!("\n{table}\n");
                }
                GateDecision::Denied(reason) => fail("Not signed in", reason),
            }
        }
        Commands::Users { sub } => {
            let session = CliSession::open(env_file).await;
            run_users(&session, sub).await;
        }
        Commands::Charts => {
            let session = CliSession::open(env_file).await;
            let view = azadmin::services::run(OperationKey::ShowChart, &session.context(), OperationArgs::None).await;
            print_view_header(&view);
            print_charts(&view);
            finish_view(&view);
        }
        Commands::Resources { sub } => {
            let session = CliSession::open(env_file).await;
            run_resources(&session, sub).await;
        }
        Commands::Upload { file, folder } => {
            let session = CliSession::open(env_file).await;
            upload(&session, &file, &folder).await;
        }
        Commands::ClearFolder { folder, confirm } => {
            let session = CliSession::open(env_file).await;
            let args = OperationArgs::Clear { folder, confirmation: confirm };
            let view = azadmin::services::run(OperationKey::ClearFolder, &session.context(), args).await;
            print_view_header(&view);
            finish_view(&view);
        }
    }
}
