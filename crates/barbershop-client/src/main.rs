//! barbershop CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::debug;

use barbershop_api::{FileSessionStore, HttpBookingApi};
use barbershop_client::cli::{Cli, Command, ConfigAction};
use barbershop_client::commands::{self, Context, book::BookRequest};
use barbershop_client::config::ClientConfig;
use barbershop_client::error::{ClientError, ClientResult};
use barbershop_client::output::Renderer;
use barbershop_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            if let Some(hint) = e.hint() {
                eprintln!("hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let mut config = if let Some(ref path) = cli.config {
        ClientConfig::load_from(path).map_err(ClientError::Config)?
    } else {
        ClientConfig::load().map_err(ClientError::Config)?
    };

    // Flags take precedence over the file
    if let Some(ref base_url) = cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.api.timeout = timeout;
    }
    if cli.max_name_length.is_some() {
        config.display.max_name_length = cli.max_name_length;
    }
    config.debug |= cli.debug;
    config.trace |= cli.trace;

    if let Err(e) = init_tracing(config.tracing_config()) {
        eprintln!("warning: {}", e);
    }

    let format = cli.output_format();

    let Some(command) = cli.command else {
        println!("barbershop - Book a haircut from the terminal");
        println!();
        println!("Run 'barbershop --help' for usage information.");
        println!();
        println!("Quick start:");
        println!("  1. Log in:        barbershop login --email <EMAIL> --password env::MY_PASSWORD");
        println!("  2. Pick a barber: barbershop barbers");
        println!("  3. Pick a slot:   barbershop slots --barber <ID> --date 25/12/2024");
        println!("  4. Book it:       barbershop book --barber <ID> --service <ID> --slot <ID>");
        return Ok(());
    };

    let output = Renderer::new(format, config.display.clone());

    // Offline commands
    let text = match command {
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config)?,
            ConfigAction::Validate => commands::config::validate(&config)?,
            ConfigAction::Path => commands::config::path(&config)?,
        },
        Command::Normalize { kind, file } => commands::normalize::normalize(kind, &file)?,
        command => {
            let ctx = connect(&config, output)?;
            dispatch(&ctx, command).await?
        }
    };

    println!("{}", text);
    Ok(())
}

fn connect(config: &ClientConfig, output: Renderer) -> ClientResult<Context> {
    let api_config = config.api_config().map_err(ClientError::Config)?;

    let session = Arc::new(FileSessionStore::open(config.session_path())?);
    debug!(path = ?session.path(), base_url = %api_config.base_url, "connecting");

    let api = HttpBookingApi::new(api_config, session.clone())?;
    Ok(Context::new(Arc::new(api), session, output))
}

async fn dispatch(ctx: &Context, command: Command) -> ClientResult<String> {
    match command {
        Command::Barbers => commands::catalog::barbers(ctx).await,
        Command::Services => commands::catalog::services(ctx).await,
        Command::Slots { barber, date } => {
            commands::slots::slots(ctx, &barber, date.as_deref()).await
        }
        Command::Book {
            barber,
            service,
            slot,
            client,
            no_validate,
        } => {
            let request = BookRequest {
                barber_id: &barber,
                service_id: &service,
                time_id: &slot,
                client_id: client.as_deref(),
                validate: !no_validate,
            };
            commands::book::book(ctx, request).await
        }
        Command::Reservas => commands::agenda::reservas(ctx).await,
        Command::Agenda => commands::agenda::agenda(ctx).await,
        Command::Attend { id } => commands::agenda::attend(ctx, &id).await,
        Command::Cancel { id } => commands::agenda::cancel(ctx, &id).await,
        Command::Login { email, password } => commands::auth::login(ctx, &email, &password).await,
        Command::Logout => commands::auth::logout(ctx).await,
        Command::Whoami => commands::auth::whoami(ctx).await,
        Command::Config { .. } | Command::Normalize { .. } => {
            Err(ClientError::Input("command does not need the backend".to_string()))
        }
    }
}
