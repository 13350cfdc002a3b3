mod logging;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use prompt_client::{BackendConfig, PromptClient};
use prompt_shared::flow::{load_feed, load_profile, toggle_like, ProfileLoad};
use prompt_shared::feed::{excerpt, EMPTY_RESULT};
use prompt_shared::profile::NO_PROMPTS;
use prompt_shared::{AuthSession, Category, LikeToggle, ProfileState, ProfileTab, Prompt};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    Logout,

    Status,

    Feed {
        #[arg(short, long, default_value = "")]
        search: String,

        #[arg(short, long, default_value = "전체")]
        category: Category,
    },

    Profile,

    Like {
        #[arg(short, long)]
        id: String,
    },
}

/// Refresh the access token when it expires within this many seconds.
const REFRESH_LEEWAY_SECS: i64 = 60;

/// Keeps the last session (access and refresh token, expiry, user) as JSON
/// between runs.
struct SessionStore {
    session_path: PathBuf,
}

impl SessionStore {
    fn new(custom_path: Option<PathBuf>) -> Result<Self> {
        let session_path = match custom_path {
            Some(path) => path,
            None => {
                let home = dirs::home_dir().context("Failed to get home directory")?;
                home.join(".prompt_session.json")
            }
        };

        Ok(Self { session_path })
    }

    fn save(&self, session: &AuthSession) -> Result<()> {
        let json = serde_json::to_string_pretty(session).context("Failed to encode session")?;
        fs::write(&self.session_path, json)
            .with_context(|| format!("Failed to save session to {:?}", self.session_path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.session_path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.session_path, perms)?;
        }

        tracing::debug!("Session saved to {:?}", self.session_path);
        Ok(())
    }

    /// A missing, empty or unreadable session file all mean "not logged in".
    fn load(&self) -> Result<Option<AuthSession>> {
        let raw = match fs::read_to_string(&self.session_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).context("Failed to read session file"),
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<AuthSession>(&raw) {
            Ok(session) if !session.access_token.is_empty() => Ok(Some(session)),
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file {:?}: {}", self.session_path, e);
                Ok(None)
            }
        }
    }

    fn clear(&self) -> Result<()> {
        if self.session_path.exists() {
            fs::remove_file(&self.session_path).with_context(|| {
                format!("Failed to remove session file {:?}", self.session_path)
            })?;
            println!("✓ Session file removed");
        }
        Ok(())
    }
}

/// Hands the stored session to the client, trading the refresh token for a
/// new session first when the access token is about to expire. A failed
/// refresh keeps the old token: the feed then falls back to the anon key and
/// the profile asks for a new login.
async fn resume_session(
    client: &PromptClient,
    store: &SessionStore,
    session: AuthSession,
) -> Result<AuthSession> {
    let now = Utc::now().timestamp();

    if session.expires_within(now, REFRESH_LEEWAY_SECS) {
        if let Some(refresh_token) = session.refresh_token.as_deref() {
            match client.refresh(refresh_token).await {
                Ok(mut fresh) => {
                    fresh.stamp_expiry(now);
                    store.save(&fresh)?;
                    return Ok(fresh);
                }
                Err(e) => tracing::warn!("Session refresh failed: {}", e),
            }
        }
    }

    client.set_token(session.access_token.clone()).await;
    Ok(session)
}

fn connect() -> Result<PromptClient> {
    let config = BackendConfig::from_env().context("Backend is not configured")?;
    let client = PromptClient::new(config);
    tracing::debug!("Using backend at {}", client.base_url());
    Ok(client)
}

fn print_login_hint() {
    println!("❌ Not logged in. Please login first:");
    println!("   prompt-cli login --email <email> --password <password>");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let store = SessionStore::new(cli.session_file)?;

    match &cli.command {
        Commands::Login { email, password } => {
            let client = connect()?;
            println!("🔑 Logging in as: {}", email);

            match client.login(email, password).await {
                Ok(session) => {
                    println!("✅ Login successful!");
                    println!("   User ID: {}", session.user.id);
                    if let Some(email) = &session.user.email {
                        println!("   Email: {}", email);
                    }

                    let mut session = session;
                    session.stamp_expiry(Utc::now().timestamp());
                    store.save(&session)?;
                    println!("✓ Session saved to {:?}", store.session_path);
                }
                Err(e) => {
                    println!("❌ Login failed: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Logout => {
            if let Some(session) = store.load()? {
                let client = connect()?;
                client.set_token(session.access_token).await;
                if let Err(e) = client.logout().await {
                    tracing::warn!("Backend logout failed: {}", e);
                }
            }
            store.clear()?;
            println!("👋 Logged out");
        }

        Commands::Status => match store.load()? {
            Some(session) => {
                let token = &session.access_token;
                let preview: String = token.chars().take(20).collect();
                println!("🔑 Session file: {:?}", store.session_path);
                println!("   User ID: {}", session.user.id);
                if let Some(email) = &session.user.email {
                    println!("   Email: {}", email);
                }
                println!("   Token: {}...", preview);
                println!("   Length: {} characters", token.len());
                println!("   Expires: {}", format_expiry(session.expires_at));
                println!(
                    "   Refresh token: {}",
                    if session.refresh_token.is_some() { "stored" } else { "none" }
                );
                println!("\n   To verify the session, try: prompt-cli profile");
            }
            None => {
                println!("❌ No session found");
                println!("   Please login first: prompt-cli login --email <email> --password <password>");
            }
        },

        Commands::Feed { search, category } => {
            let client = connect()?;
            if let Some(session) = store.load()? {
                resume_session(&client, &store, session).await?;
            }

            let mut feed = load_feed(&client).await;
            feed.set_search(search.as_str());
            feed.set_category(*category);

            println!("🚀 최신 프롬프트 피드");
            println!(
                "   search: {:?} • category: {}",
                feed.search(),
                feed.category()
            );
            println!();

            let visible = feed.filtered();
            if visible.is_empty() {
                println!("   {}", EMPTY_RESULT);
            }
            for (i, prompt) in visible.iter().enumerate() {
                print_feed_card(i + 1, prompt);
            }
        }

        Commands::Profile => {
            let Some(session) = store.load()? else {
                print_login_hint();
                std::process::exit(1);
            };

            let client = connect()?;
            resume_session(&client, &store, session).await?;

            match load_profile(&client).await {
                ProfileLoad::RedirectToLogin => {
                    print_login_hint();
                    std::process::exit(1);
                }
                ProfileLoad::Ready(state) => print_profile(&state),
            }
        }

        Commands::Like { id } => {
            let Some(session) = store.load()? else {
                print_login_hint();
                std::process::exit(1);
            };

            let client = connect()?;
            resume_session(&client, &store, session).await?;

            let mut state = match load_profile(&client).await {
                ProfileLoad::RedirectToLogin => {
                    print_login_hint();
                    std::process::exit(1);
                }
                ProfileLoad::Ready(state) => state,
            };

            if !state.prompts().iter().any(|p| &p.id == id) {
                println!("❌ Prompt {} is not in your profile", id);
                println!("   Tip: Use 'profile' command to see your prompts");
                std::process::exit(1);
            }

            let toggle = toggle_like(&client, &mut state, id).await;
            let likes = state
                .prompts()
                .iter()
                .find(|p| &p.id == id)
                .map(|p| p.likes)
                .unwrap_or_default();

            match toggle {
                LikeToggle::Like => println!("{} Liked {} (★ {})", "✅".green(), id, likes),
                LikeToggle::Unlike => println!("{} Unliked {} (★ {})", "✅".green(), id, likes),
            }
        }
    }

    Ok(())
}

fn print_feed_card(position: usize, prompt: &Prompt) {
    println!("   {}. [{}] {}", position, prompt.id, prompt.title.bold());
    println!("      {}", excerpt(&prompt.description));
    println!(
        "      카테고리: {} • 조회수: {} • {}",
        prompt.category,
        prompt.views,
        format_created(&prompt.created_at)
    );
    println!();
}

fn print_profile(state: &ProfileState) {
    println!("👤 {}", state.email_label());
    println!();
    println!("📋 {} ({})", ProfileTab::Prompts.label(), state.prompts().len());

    if state.prompts().is_empty() {
        println!("   {}", NO_PROMPTS);
        return;
    }

    for (i, prompt) in state.prompts().iter().enumerate() {
        let star = format!("★ {}", prompt.likes);
        let star = if state.is_liked(&prompt.id) {
            star.yellow().bold()
        } else {
            star.dimmed()
        };

        println!("   {}. [{}] {}  {}", i + 1, prompt.id, prompt.title.bold(), star);
        println!("      {}", prompt.description);
        println!();
    }
}

fn format_expiry(expires_at: Option<i64>) -> String {
    match expires_at.and_then(|at| DateTime::<Utc>::from_timestamp(at, 0)) {
        Some(at) => at.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "unknown".to_string(),
    }
}

fn format_created(created_at: &str) -> String {
    DateTime::parse_from_rfc3339(created_at)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| created_at.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_at_is_shortened_when_parseable() {
        assert_eq!(
            format_created("2024-05-01T12:34:56.789012+00:00"),
            "2024-05-01 12:34"
        );
        assert_eq!(format_created("yesterday"), "yesterday");
    }

    #[test]
    fn expiry_is_shown_in_utc() {
        assert_eq!(format_expiry(Some(1_714_564_800)), "2024-05-01 12:00 UTC");
        assert_eq!(format_expiry(None), "unknown");
    }

    #[test]
    fn session_store_round_trips_full_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(Some(dir.path().join("session.json"))).unwrap();
        let session: AuthSession = serde_json::from_str(
            r#"{"access_token":"a","refresh_token":"r","expires_at":99,"user":{"id":"u1"}}"#,
        )
        .unwrap();

        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn unreadable_session_file_counts_as_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "eyJhbGciOiJIUzI1NiJ9.legacy").unwrap();

        let store = SessionStore::new(Some(path)).unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn category_flag_accepts_labels() {
        let cli = Cli::try_parse_from(["prompt-cli", "feed", "--category", "코드 생성"]).unwrap();
        match cli.command {
            Commands::Feed { search, category } => {
                assert_eq!(search, "");
                assert_eq!(category, Category::CodeGeneration);
            }
            _ => panic!("expected feed command"),
        }
    }

    #[test]
    fn category_flag_defaults_to_all() {
        let cli = Cli::try_parse_from(["prompt-cli", "feed", "-s", "gpt"]).unwrap();
        match cli.command {
            Commands::Feed { search, category } => {
                assert_eq!(search, "gpt");
                assert_eq!(category, Category::All);
            }
            _ => panic!("expected feed command"),
        }
    }
}
