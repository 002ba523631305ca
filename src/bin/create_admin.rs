use std::io::{self, Write};

use clap::Parser;
use sqlx::postgres::PgPoolOptions;

use bulletin_api::auth::passwords::PasswordService;

/// Provision an account directly in the database. The public API only ever
/// registers plain users, so this is the path to the first admin.
#[derive(Parser, Debug)]
#[command(name = "create_admin", about = "Create a Bulletin user account")]
struct Args {
    /// Email address for the account (case insensitive).
    #[arg(long)]
    email: String,

    /// Plaintext password to hash and store for this user.
    #[arg(long)]
    password: String,

    /// First name (2-50 characters).
    #[arg(long)]
    first_name: String,

    /// Last name (2-50 characters).
    #[arg(long)]
    last_name: String,

    /// Optional phone number.
    #[arg(long)]
    phone: Option<String>,

    /// Role to assign (`user` or `admin`).
    #[arg(long, default_value = "admin")]
    role: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();
    let email = args.email.trim().to_lowercase();

    if !email.contains('@') {
        writeln!(io::stderr(), "error: email must contain '@'")?;
        std::process::exit(1);
    }

    let role = match args.role.trim().to_lowercase().as_str() {
        "admin" => "admin",
        "user" => "user",
        other => {
            writeln!(
                io::stderr(),
                "error: unsupported role '{other}'. Use 'user' or 'admin'."
            )?;
            std::process::exit(1);
        }
    };

    let database_url = std::env::var("BULLETIN_DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    let existing =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE lower(email) = $1")
            .bind(&email)
            .fetch_one(&pool)
            .await?;

    if existing > 0 {
        writeln!(
            io::stderr(),
            "error: a user with email '{email}' already exists."
        )?;
        std::process::exit(1);
    }

    let password_service = PasswordService::new()
        .map_err(|err| io::Error::other(format!("argon2 init failed: {err}")))?;
    let password_hash = password_service
        .hash_password(&args.password)
        .map_err(|err| io::Error::other(format!("password hash failed: {err}")))?;

    let user_id: i32 = sqlx::query_scalar(
        "INSERT INTO users (first_name, last_name, email, password_hash, phone, role) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(&args.first_name)
    .bind(&args.last_name)
    .bind(&email)
    .bind(&password_hash)
    .bind(args.phone.as_deref())
    .bind(role)
    .fetch_one(&pool)
    .await?;

    println!("Created {role} user '{email}' with id {user_id}");
    Ok(())
}
