use clap::{Parser, Subcommand};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use recipebox_auth_types::password::PasswordHasher;
use recipebox_core::config::Config;
use recipebox_core::tracing::{DEFAULT_FILTER, init_tracing};
use recipebox_migration::Migrator;
use recipebox_server::config::RecipeboxConfig;
use recipebox_server::router::build_router;
use recipebox_server::state::AppState;
use recipebox_server::usecase::user::CreateSuperuserUseCase;

#[derive(Parser)]
#[command(name = "recipebox", about = "Recipe management API server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Create a staff account with every permission.
    CreateSuperuser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    init_tracing(DEFAULT_FILTER);

    let cli = Cli::parse();
    let config = RecipeboxConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .expect("failed to apply migrations");
        info!("migrations applied");
    }

    let state = AppState {
        db,
        hasher: PasswordHasher::new(config.bcrypt_cost),
        media_root: config.media_root,
        media_url: config.media_url,
        max_upload_bytes: config.max_upload_bytes,
    };

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(state, config.recipebox_port).await,
        Command::CreateSuperuser { email, password } => {
            let usecase = CreateSuperuserUseCase {
                repo: state.user_repo(),
                hasher: state.hasher,
            };
            match usecase.execute(&email, &password).await {
                Ok(user) => info!(user_id = %user.id, email = %user.email, "superuser created"),
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}

async fn serve(state: AppState, port: u16) {
    let router = build_router(state);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("recipebox listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
